//! redline CLI - Command-line interface library
//!
//! This library provides the CLI functionality for redline: reading a JSON
//! review payload, loading `redline.toml`, and writing the annotated DOCX.
//!
//! # Library Usage
//!
//! ```no_run
//! use std::path::Path;
//! use redline_cli::{convert_command, Settings};
//!
//! let mut settings = Settings::default();
//! settings.review.author = "Legal Team".to_string();
//! let report = convert_command("review.json", Path::new("review.docx"), None, &settings)?;
//! println!("{} annotations applied", report.applied);
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! # Binary Usage
//!
//! ```bash
//! # Tracked changes (default)
//! redline review.json review.docx
//!
//! # Margin comments, read from stdin, into a corporate template
//! cat review.json | redline - review.docx --comments --template corporate.dotx
//! ```

pub mod app;
pub mod config;

// Re-export main entry point and types
pub use app::{convert_command, init_logging, parse_entries, read_input, run_cli};
pub use config::{AnnotationSettings, LayoutSettings, ReviewSettings, Settings};
