use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for validating phone numbers
    /// Optional leading "+", then 7-20 digits with single spaces or hyphens between them
    /// - Valid: "+977-9800000000", "9800000000", "+1 555 010 9999"
    /// - Invalid: "phone", "98--00", "+", "123"
    pub static ref PHONE_REGEX: Regex = Regex::new(r"^\+?[0-9](?:[ -]?[0-9]){6,19}$").unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_regex_valid() {
        assert!(PHONE_REGEX.is_match("+977-9800000000"));
        assert!(PHONE_REGEX.is_match("9800000000"));
        assert!(PHONE_REGEX.is_match("+1 555 010 9999"));
        assert!(PHONE_REGEX.is_match("01-4412345"));
    }

    #[test]
    fn test_phone_regex_invalid() {
        assert!(!PHONE_REGEX.is_match("phone"));
        assert!(!PHONE_REGEX.is_match("98--00")); // double separator
        assert!(!PHONE_REGEX.is_match("+")); // no digits
        assert!(!PHONE_REGEX.is_match("123")); // too short
        assert!(!PHONE_REGEX.is_match("")); // empty
        assert!(!PHONE_REGEX.is_match("980 ")); // trailing separator
    }
}
