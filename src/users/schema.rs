use lazy_static::lazy_static;
use regex::Regex;

use crate::validate::FieldRule;

pub const CREATE: &[FieldRule] = &[
    FieldRule::string("firstname").required().max_length(255),
    FieldRule::string("lastname").required().max_length(255),
    FieldRule::string("email").required().max_length(255),
    FieldRule::string("password").required().max_length(255),
    FieldRule::string("city").max_length(255),
    FieldRule::string("language").max_length(255),
];

// Password is not updatable on this route.
pub const UPDATE: &[FieldRule] = &[
    FieldRule::string("firstname").max_length(255),
    FieldRule::string("lastname").max_length(255),
    FieldRule::string("email").max_length(255),
    FieldRule::string("city").max_length(255),
    FieldRule::string("language").max_length(255),
];

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_addresses() {
        assert!(is_valid_email("a@b.com"));
        assert!(is_valid_email("first.last@example.co.uk"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("two@@at.com"));
        assert!(!is_valid_email("spaces in@mail.com"));
        assert!(!is_valid_email("nodomain@"));
    }
}
