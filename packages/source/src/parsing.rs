//! Shared parsing utilities for feed fields.

/// Extracts a quarter number from the feed's quarter text.
///
/// Takes the first ASCII digit in the string (`"Q3"`, `"רבעון 3"`, `"3"`).
/// Returns `None` if there is no digit or it is outside 1-4.
#[must_use]
pub fn parse_quarter(s: &str) -> Option<u8> {
    let digit = s.bytes().find(u8::is_ascii_digit)?;
    let quarter = digit - b'0';
    (1..=4).contains(&quarter).then_some(quarter)
}

/// Trims a free-text feed field, mapping `None` to an empty string.
#[must_use]
pub fn clean_text(s: Option<&str>) -> String {
    s.map(str::trim).unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_quarter_variants() {
        assert_eq!(parse_quarter("Q1"), Some(1));
        assert_eq!(parse_quarter("רבעון 4"), Some(4));
        assert_eq!(parse_quarter("2"), Some(2));
    }

    #[test]
    fn rejects_unusable_quarters() {
        assert_eq!(parse_quarter(""), None);
        assert_eq!(parse_quarter("Q"), None);
        assert_eq!(parse_quarter("Q7"), None);
        assert_eq!(parse_quarter("Q0"), None);
    }

    #[test]
    fn cleans_text() {
        assert_eq!(clean_text(Some("  מחוז צפון ")), "מחוז צפון");
        assert_eq!(clean_text(None), "");
    }
}
