use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Any character that may not appear in an export folder or archive name
    pub static ref NON_ALPHANUMERIC_REGEX: Regex = Regex::new(r"[^A-Za-z0-9]").unwrap();
}

/// Turn an event name into a folder/file-safe slug.
///
/// Every character outside `[A-Za-z0-9]` becomes `_`, then the result is
/// lowercased. Non-ASCII letters are replaced, not transliterated.
pub fn sanitize_name(name: &str) -> String {
    NON_ALPHANUMERIC_REGEX
        .replace_all(name, "_")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_name_replaces_and_lowercases() {
        assert_eq!(sanitize_name("Casamento João e Maria"), "casamento_jo_o_e_maria");
        assert_eq!(sanitize_name("Festa-2024!"), "festa_2024_");
        assert_eq!(sanitize_name("ABC123"), "abc123");
    }

    #[test]
    fn test_sanitize_name_edge_cases() {
        assert_eq!(sanitize_name(""), "");
        assert_eq!(sanitize_name("   "), "___");
        assert_eq!(sanitize_name("é"), "_"); // one char, one underscore
        // Kelvin sign and long s fold to ASCII letters case-insensitively
        assert_eq!(sanitize_name("\u{212A}elvin"), "_elvin");
        assert_eq!(sanitize_name("fe\u{17F}ta"), "fe_ta");
    }
}
