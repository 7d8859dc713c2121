//! Path utilities for output file naming

/// Characters that are not allowed in output file names
const RESERVED_CHARS: [char; 9] = ['\\', '/', '*', '?', ':', '"', '<', '>', '|'];

/// Replace reserved file-name characters with `_` and trim surrounding whitespace
pub fn safe_filename(name: &str) -> String {
    name.chars()
        .map(|c| if RESERVED_CHARS.contains(&c) { '_' } else { c })
        .collect::<String>()
        .trim()
        .to_string()
}
