//! Client-detail validation for the membership form.
//!
//! Each rule returns `None` when the input is acceptable or `Some(message)`.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{10}$").expect("phone regex"));
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex"));

pub const PHONE_DIGITS: usize = 10;

/// Keep digits only, truncated to ten.
pub fn normalize_phone(input: &str) -> String {
    input
        .chars()
        .filter(|c| c.is_ascii_digit())
        .take(PHONE_DIGITS)
        .collect()
}

pub fn validate_phone(phone: &str) -> Option<String> {
    if phone.is_empty() {
        return Some("Phone is required".into());
    }
    if !PHONE_RE.is_match(phone) {
        return Some("Phone must have exactly 10 digits".into());
    }
    None
}

pub fn validate_email(email: &str) -> Option<String> {
    if email.is_empty() {
        return Some("Email is required".into());
    }
    if !EMAIL_RE.is_match(email) {
        return Some("Enter a valid email".into());
    }
    None
}

/// First name plus two surnames at least, each part two characters or more.
pub fn validate_full_name(name: &str) -> Option<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Some("Full name is required".into());
    }
    let parts: Vec<&str> = trimmed.split_whitespace().collect();
    if parts.len() < 3 {
        return Some("Enter the full name (first name + 2 surnames minimum)".into());
    }
    if parts.iter().any(|p| p.chars().count() < 2) {
        return Some("Each name/surname must have at least 2 characters".into());
    }
    None
}

/// Per-field validation messages for one form submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub areas: Option<String>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.phone.is_none() && self.email.is_none() && self.areas.is_none()
    }

    pub fn messages(&self) -> Vec<&str> {
        [&self.name, &self.phone, &self.email, &self.areas]
            .into_iter()
            .filter_map(|m| m.as_deref())
            .collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.messages().join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone() {
        assert_eq!(validate_phone("5512345678"), None);
        assert!(validate_phone("").is_some());
        assert!(validate_phone("551234567").is_some());
        assert!(validate_phone("55123456789").is_some());
        assert_eq!(normalize_phone("(55) 1234-5678 ext 9"), "5512345678");
    }

    #[test]
    fn test_email() {
        assert_eq!(validate_email("ana@example.com"), None);
        assert!(validate_email("").is_some());
        assert!(validate_email("ana@example").is_some());
        assert!(validate_email("ana lopez@example.com").is_some());
    }

    #[test]
    fn test_full_name() {
        assert_eq!(validate_full_name("  Ana   Lopez Garcia "), None);
        assert_eq!(validate_full_name("Íñigo Peña Ñúñez"), None);
        assert!(validate_full_name("").is_some());
        assert!(validate_full_name("Ana Lopez").is_some());
        assert!(validate_full_name("Ana L Garcia").is_some());
    }

    #[test]
    fn test_errors_display_joins_messages() {
        let errors = ValidationErrors {
            phone: Some("bad phone".into()),
            areas: Some("no areas".into()),
            ..Default::default()
        };
        assert!(!errors.is_empty());
        assert_eq!(errors.to_string(), "bad phone; no areas");
        assert!(ValidationErrors::default().is_empty());
    }
}
