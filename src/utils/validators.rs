use once_cell::sync::Lazy;
use regex::Regex;

// Numérotation ivoirienne à 10 chiffres (plan 2021)
static PHONE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+225[0-9]{10}$").unwrap());

static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap());

static CODE_ANNONCE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^AN-[2-9A-HJKMNP-Z]{8}$").unwrap());

pub fn validate_phone(phone: &str) -> bool {
    PHONE_REGEX.is_match(phone)
}

pub fn validate_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

pub fn validate_code_annonce(code: &str) -> bool {
    CODE_ANNONCE_REGEX.is_match(code)
}

pub fn sanitize_string(input: &str) -> String {
    input.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("+2250708123456"));
        assert!(!validate_phone("0708123456"));
        assert!(!validate_phone("+225070812345"));
        assert!(!validate_phone("+22507081234567"));
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("test@example.com"));
        assert!(validate_email("agent.immo@domaine.ci"));
        assert!(!validate_email("invalide"));
        assert!(!validate_email("@example.com"));
    }

    #[test]
    fn test_validate_code_annonce() {
        assert!(validate_code_annonce("AN-7F3K2Q9D"));
        assert!(!validate_code_annonce("AN-7F3K2Q9"));
        assert!(!validate_code_annonce("XX-7F3K2Q9D"));
        assert!(!validate_code_annonce("AN-7F3K2Q0D"));
    }
}
