use std::borrow::Cow;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use validator::{ValidateEmail, ValidationError};

use crate::core::error::{AppError, Result};

lazy_static! {
    /// Matches a complete `<script ...>...</script>` block, across lines, any case
    /// - Matches: "<script>alert(1)</script>", "<SCRIPT src=x>\n</SCRIPT>"
    /// - Leaves: "<b>bold</b>", "script tag"
    pub static ref SCRIPT_BLOCK_REGEX: Regex =
        Regex::new(r"(?is)<script\b[^>]*>.*?</script>").unwrap();
}

/// Strip script blocks and surrounding whitespace from user supplied text
pub fn sanitize_text(raw: &str) -> String {
    SCRIPT_BLOCK_REGEX.replace_all(raw, "").trim().to_string()
}

/// Sanitize an optional field; blank input collapses to `None`
pub fn sanitize_optional(raw: Option<String>) -> Option<String> {
    raw.map(|value| sanitize_text(&value))
        .filter(|value| !value.is_empty())
}

/// Sanitize an optional field of a partial update.
///
/// Absent stays `None` (keep the stored value); a value that is blank after
/// sanitizing becomes `Some(None)` (clear the stored value).
pub fn sanitize_change(raw: Option<String>) -> Option<Option<String>> {
    raw.map(|value| sanitize_optional(Some(value)))
}

/// Validator for optional e-mail fields where a blank value clears the address
pub fn blank_or_email(email: &str) -> std::result::Result<(), ValidationError> {
    if email.trim().is_empty() || email.to_owned().validate_email() {
        return Ok(());
    }
    Err(ValidationError::new("email").with_message(Cow::from("Invalid email format")))
}

/// Strictly parse an optional enum label; blank counts as absent
pub fn parse_label<T>(raw: Option<String>, field: &str) -> Result<Option<T>>
where
    T: FromStr<Err = String>,
{
    match raw.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(label) => label
            .parse::<T>()
            .map(Some)
            .map_err(|e| AppError::Validation(format!("{}: {}", field, e))),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_removes_script_tags() {
        let input = "<script>alert(\"xss\")</script>  Hello  ";
        assert_eq!(sanitize_text(input), "Hello");
    }

    #[test]
    fn test_sanitize_handles_multiline_and_case() {
        let input = "before<SCRIPT type=\"text/javascript\">\nsteal()\n</Script>after";
        assert_eq!(sanitize_text(input), "beforeafter");
    }

    #[test]
    fn test_sanitize_keeps_other_markup() {
        assert_eq!(sanitize_text(" <b>bold</b> "), "<b>bold</b>");
        assert_eq!(sanitize_text("script tag"), "script tag");
    }

    #[test]
    fn test_parse_label() {
        use crate::features::defects::models::Priority;

        assert_eq!(
            parse_label::<Priority>(Some(" p2 ".to_string()), "priority").unwrap(),
            Some(Priority::P2)
        );
        assert_eq!(parse_label::<Priority>(Some("".to_string()), "priority").unwrap(), None);
        assert_eq!(parse_label::<Priority>(None, "priority").unwrap(), None);
        assert!(matches!(
            parse_label::<Priority>(Some("P9".to_string()), "priority"),
            Err(AppError::Validation(msg)) if msg.starts_with("priority:")
        ));
    }

    #[test]
    fn test_sanitize_change_distinguishes_absent_from_blank() {
        assert_eq!(sanitize_change(None), None);
        assert_eq!(sanitize_change(Some("  ".to_string())), Some(None));
        assert_eq!(
            sanitize_change(Some("<script>x()</script>".to_string())),
            Some(None)
        );
        assert_eq!(
            sanitize_change(Some(" Park ".to_string())),
            Some(Some("Park".to_string()))
        );
    }

    #[test]
    fn test_blank_or_email() {
        assert!(blank_or_email("").is_ok());
        assert!(blank_or_email("  ").is_ok());
        assert!(blank_or_email("kim@example.com").is_ok());
        assert!(blank_or_email("nope").is_err());
    }

    #[test]
    fn test_sanitize_optional_blank_is_none() {
        assert_eq!(sanitize_optional(Some("   ".to_string())), None);
        assert_eq!(sanitize_optional(None), None);
        assert_eq!(
            sanitize_optional(Some(" Kim ".to_string())),
            Some("Kim".to_string())
        );
    }
}
