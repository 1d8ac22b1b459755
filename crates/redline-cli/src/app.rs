//! CLI Application logic
//!
//! Contains the command-line interface implementation.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use redline_ast::FieldEntry;
use redline_core::{assemble, AnnotationMode, AssembleReport};
use redline_ooxml::{DocxWriter, StyleMap, Template};

use crate::config::Settings;

/// Config file looked up in the working directory
pub const DEFAULT_CONFIG: &str = "redline.toml";

#[derive(Parser, Debug)]
#[command(name = "redline")]
#[command(
    author,
    version,
    about = "Convert JSON review payloads to DOCX with tracked changes or comments",
    long_about = None
)]
struct Cli {
    /// Input JSON file, or "-" for stdin
    input: String,

    /// Output DOCX file
    #[arg(default_value = "output.docx")]
    output: PathBuf,

    /// Render annotations as tracked changes (default)
    #[arg(long)]
    trackchanges: bool,

    /// Render annotations as margin comments
    #[arg(long)]
    comments: bool,

    /// Template DOCX or DOTX file
    #[arg(short, long)]
    template: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Revision and comment author
    #[arg(long)]
    author: Option<String>,

    /// Comment initials
    #[arg(long)]
    initials: Option<String>,

    /// Document title
    #[arg(long)]
    title: Option<String>,

    /// Log annotation placement to stderr
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Apply command-line overrides on top of file settings
    fn apply_to(&self, settings: &mut Settings) {
        if self.comments {
            settings.review.mode = AnnotationMode::Comments;
        } else if self.trackchanges {
            settings.review.mode = AnnotationMode::TrackChanges;
        }
        if let Some(author) = &self.author {
            settings.review.author = author.clone();
        }
        if let Some(initials) = &self.initials {
            settings.review.initials = initials.clone();
        }
        if let Some(title) = &self.title {
            settings.layout.title = Some(title.clone());
        }
    }
}

/// Run the CLI application
///
/// This is the main entry point for the command-line interface.
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut settings = load_settings(cli.config.as_deref())?;
    cli.apply_to(&mut settings);

    convert_command(&cli.input, &cli.output, cli.template.as_deref(), &settings)?;
    Ok(())
}

/// Install the stderr log subscriber
///
/// `RUST_LOG` is honoured unless `verbose` forces debug output.
pub fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    // A subscriber may already be installed when embedded
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Execute the conversion
pub fn convert_command(
    input: &str,
    output: &Path,
    template: Option<&Path>,
    settings: &Settings,
) -> Result<AssembleReport> {
    let json = read_input(input)?;
    let entries = parse_entries(&json)?;
    debug!("Read {} field entries", entries.len());

    let options = settings.assemble_options();
    println!("Creating document with {}...", options.mode.label());

    let template = match template {
        Some(path) => load_template(path)?,
        None => Template::builtin(),
    };

    let date = options.attribution.date.clone();
    let (doc, report) = assemble(&entries, options);
    info!(
        "Applied {} annotation(s), skipped {}, relocated {}",
        report.applied, report.skipped, report.relocated
    );

    let mut writer = DocxWriter::new();
    writer.set_author(settings.review.author.clone());
    writer.set_modified(date);
    if let Some(title) = &settings.layout.title {
        writer.set_title(title.clone());
    }

    let bytes = writer
        .generate_with_template(&doc, template)
        .context("Failed to generate DOCX")?;
    fs::write(output, bytes)
        .with_context(|| format!("Failed to write output: {}", output.display()))?;

    println!("Document saved as {}", output.display());
    println!("Document created successfully!");

    Ok(report)
}

/// Read the review payload from a file, or from stdin for `-`
pub fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut json = String::new();
        std::io::stdin()
            .read_to_string(&mut json)
            .context("Failed to read stdin")?;
        return Ok(json);
    }

    let path = Path::new(input);
    if !path.exists() {
        bail!("File {} not found", input);
    }
    fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", input))
}

/// Parse the JSON field entries
pub fn parse_entries(json: &str) -> Result<Vec<FieldEntry>> {
    serde_json::from_str(json).context("Failed to parse JSON input")
}

/// Load a user template, warning about styles it does not define
fn load_template(path: &Path) -> Result<Template> {
    let mut template = Template::load(path)
        .with_context(|| format!("Failed to load template: {}", path.display()))?;

    let sheet = template
        .get_styles()
        .with_context(|| format!("Failed to read template styles: {}", path.display()))?;
    let missing = StyleMap::from_stylesheet(sheet).missing(sheet);
    if !missing.is_empty() {
        warn!(
            "Template {} does not define styles: {}",
            path.display(),
            missing.join(", ")
        );
    }

    Ok(template)
}

/// Load settings from a config file or use defaults
fn load_settings(config_path: Option<&Path>) -> Result<Settings> {
    let path = match config_path {
        Some(path) => {
            if !path.exists() {
                bail!("Config file not found: {}", path.display());
            }
            path
        }
        None => {
            let candidate = Path::new(DEFAULT_CONFIG);
            if !candidate.exists() {
                return Ok(Settings::default());
            }
            candidate
        }
    };

    debug!("Loading config {}", path.display());
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    Settings::from_toml_str(&content)
        .with_context(|| format!("Failed to parse config: {}", path.display()))
}
