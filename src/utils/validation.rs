use regex::Regex;
use std::sync::OnceLock;

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap())
}

fn phone_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // E.164-ish: optional +, 7 to 15 digits
    RE.get_or_init(|| Regex::new(r"^\+?[0-9]{7,15}$").unwrap())
}

pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

pub fn is_valid_phone(phone: &str) -> bool {
    phone_regex().is_match(phone)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        assert!(is_valid_email("maya@example.com"));
        assert!(is_valid_email("front.desk@studio.dance"));
    }

    #[test]
    fn test_invalid_emails() {
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("two@@example.com"));
        assert!(!is_valid_email("spaces in@example.com"));
    }

    #[test]
    fn test_phone_numbers() {
        assert!(is_valid_phone("+12125551234"));
        assert!(is_valid_phone("2125551234"));
        assert!(!is_valid_phone("call me"));
        assert!(!is_valid_phone("+1 212 555"));
    }
}
