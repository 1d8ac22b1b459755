//! Text helpers

/// Turn a field name into a heading title
///
/// Underscores become spaces; a letter is upper-cased when it follows a
/// non-letter (or starts the string) and lower-cased otherwise.
///
/// ```
/// use redline_core::text::field_title;
///
/// assert_eq!(field_title("sample_content"), "Sample Content");
/// assert_eq!(field_title("API_KEY_2go"), "Api Key 2Go");
/// ```
pub fn field_title(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut after_letter = false;

    for ch in name.chars() {
        let ch = if ch == '_' { ' ' } else { ch };
        if ch.is_alphabetic() {
            if after_letter {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            after_letter = true;
        } else {
            out.push(ch);
            after_letter = false;
        }
    }
    out
}

/// Character index of the first occurrence of `needle` in `haystack`
pub(crate) fn find_char_index(haystack: &str, needle: &str) -> Option<usize> {
    if needle.is_empty() {
        return None;
    }
    haystack
        .find(needle)
        .map(|byte| haystack[..byte].chars().count())
}

/// The characters `start..end` of `text`
pub(crate) fn char_slice(text: &str, start: usize, end: usize) -> String {
    text.chars().skip(start).take(end.saturating_sub(start)).collect()
}
