//! Common validation utilities.

use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

lazy_static! {
    static ref UPPERCASE: Regex = Regex::new(r"[A-Z]").unwrap();
    static ref LOWERCASE: Regex = Regex::new(r"[a-z]").unwrap();
    static ref DIGIT: Regex = Regex::new(r"[0-9]").unwrap();
}

/// Validates password strength: at least 8 characters with one uppercase
/// letter, one lowercase letter, and one digit.
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        let mut err = ValidationError::new("password_length");
        err.message = Some("Password must be at least 8 characters".into());
        return Err(err);
    }
    if !UPPERCASE.is_match(password) {
        let mut err = ValidationError::new("password_uppercase");
        err.message = Some("Password must contain an uppercase letter".into());
        return Err(err);
    }
    if !LOWERCASE.is_match(password) {
        let mut err = ValidationError::new("password_lowercase");
        err.message = Some("Password must contain a lowercase letter".into());
        return Err(err);
    }
    if !DIGIT.is_match(password) {
        let mut err = ValidationError::new("password_digit");
        err.message = Some("Password must contain a digit".into());
        return Err(err);
    }
    Ok(())
}

/// Validates that a file name is safe to resolve against a storage directory.
///
/// Rejects empty names, path separators, parent-directory components, and
/// names starting with a dot.
pub fn validate_file_name(name: &str) -> Result<(), ValidationError> {
    let invalid = name.is_empty()
        || name.contains('/')
        || name.contains('\\')
        || name.contains("..")
        || name.starts_with('.')
        || name.contains('\0');

    if invalid {
        let mut err = ValidationError::new("file_name");
        err.message = Some("Invalid file name".into());
        return Err(err);
    }
    Ok(())
}

/// Validates that a file name has a `.pdf` extension (case-insensitive).
pub fn validate_pdf_extension(name: &str) -> Result<(), ValidationError> {
    if name.to_lowercase().ends_with(".pdf") {
        Ok(())
    } else {
        let mut err = ValidationError::new("pdf_extension");
        err.message = Some("Only PDF files are supported".into());
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_strength_accepts_valid() {
        assert!(validate_password_strength("Abcdef12").is_ok());
        assert!(validate_password_strength("longEnough9password").is_ok());
    }

    #[test]
    fn test_password_strength_rejects_short() {
        assert!(validate_password_strength("Ab1").is_err());
    }

    #[test]
    fn test_password_strength_rejects_missing_classes() {
        assert!(validate_password_strength("alllowercase1").is_err());
        assert!(validate_password_strength("ALLUPPERCASE1").is_err());
        assert!(validate_password_strength("NoDigitsHere").is_err());
    }

    #[test]
    fn test_file_name_accepts_plain_names() {
        assert!(validate_file_name("cat_wizard.pdf").is_ok());
        assert!(validate_file_name("Intro to Rust (2nd ed).pdf").is_ok());
    }

    #[test]
    fn test_file_name_rejects_traversal() {
        assert!(validate_file_name("../etc/passwd").is_err());
        assert!(validate_file_name("a/b.pdf").is_err());
        assert!(validate_file_name("a\\b.pdf").is_err());
        assert!(validate_file_name(".hidden").is_err());
        assert!(validate_file_name("").is_err());
    }

    #[test]
    fn test_pdf_extension() {
        assert!(validate_pdf_extension("book.pdf").is_ok());
        assert!(validate_pdf_extension("BOOK.PDF").is_ok());
        assert!(validate_pdf_extension("book.epub").is_err());
        assert!(validate_pdf_extension("book").is_err());
    }
}
