//! Field validation for the sign-in and sign-up forms.
//!
//! Every check is pure: the same input always yields the same `FieldErrors`,
//! and nothing outside the return value is touched. Checks for a field run in
//! order and the first failure wins.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

/// Minimum password length accepted by the sign-in form.
pub const SIGN_IN_MIN_PASSWORD: usize = 6;
/// Minimum password length accepted by the sign-up form.
pub const SIGN_UP_MIN_PASSWORD: usize = 8;
/// Minimum trimmed length of a full name.
pub const MIN_FULLNAME: usize = 3;

static EMAIL: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").ok());

/// Character classes a sign-up password must each hit at least once.
const PASSWORD_CLASS_PATTERNS: [&str; 4] = ["[a-z]", "[A-Z]", "[0-9]", "[@$!%*?&]"];

static PASSWORD_CLASSES: Lazy<Vec<Regex>> = Lazy::new(|| {
    PASSWORD_CLASS_PATTERNS
        .into_iter()
        .filter_map(|class| Regex::new(class).ok())
        .collect()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Fullname,
    Email,
    Password,
}

impl Field {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Fullname => "fullname",
            Self::Email => "email",
            Self::Password => "password",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    EmptyField,
    InvalidFormat,
    TooShort { min: usize },
    WeakPassword,
}

impl FieldError {
    /// Human-readable message shown next to `field`.
    #[must_use]
    pub fn message(self, field: Field) -> String {
        match (field, self) {
            (Field::Fullname, Self::EmptyField) => "Full name is required.".to_string(),
            (Field::Fullname, Self::TooShort { min }) => {
                format!("Full name must be at least {min} characters.")
            }
            (Field::Email, Self::EmptyField) => "Email is required.".to_string(),
            (Field::Email, Self::InvalidFormat) => "Please enter a valid email address.".to_string(),
            (Field::Password, Self::EmptyField) => "Password is required.".to_string(),
            (Field::Password, Self::TooShort { min }) => {
                format!("Password must be at least {min} characters long.")
            }
            (Field::Password, Self::WeakPassword) => "Password must include at least one uppercase letter, one lowercase letter, one number, and one special character.".to_string(),
            (field, _) => format!("Invalid {field}."),
        }
    }
}

/// Per-field validation outcome of one submit attempt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub fullname: Option<FieldError>,
    pub email: Option<FieldError>,
    pub password: Option<FieldError>,
}

impl FieldErrors {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fullname.is_none() && self.email.is_none() && self.password.is_none()
    }

    #[must_use]
    pub fn get(&self, field: Field) -> Option<FieldError> {
        match field {
            Field::Fullname => self.fullname,
            Field::Email => self.email,
            Field::Password => self.password,
        }
    }

    /// Message for `field`, empty when the field is valid.
    #[must_use]
    pub fn message(&self, field: Field) -> String {
        self.get(field)
            .map(|error| error.message(field))
            .unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, FieldError)> + '_ {
        [Field::Fullname, Field::Email, Field::Password]
            .into_iter()
            .filter_map(|field| self.get(field).map(|error| (field, error)))
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self
            .iter()
            .map(|(field, error)| error.message(field))
            .collect();
        f.write_str(&messages.join(" "))
    }
}

pub fn valid_email(email: &str) -> bool {
    EMAIL.as_ref().is_some_and(|re| re.is_match(email))
}

pub fn strong_password(password: &str) -> bool {
    PASSWORD_CLASSES.len() == PASSWORD_CLASS_PATTERNS.len()
        && PASSWORD_CLASSES.iter().all(|re| re.is_match(password))
}

fn check_email(email: &str) -> Option<FieldError> {
    if email.trim().is_empty() {
        Some(FieldError::EmptyField)
    } else if !valid_email(email) {
        Some(FieldError::InvalidFormat)
    } else {
        None
    }
}

// Length is counted in chars, so a non-BMP character such as an emoji counts once.
fn check_password_length(password: &str, min: usize) -> Option<FieldError> {
    if password.trim().is_empty() {
        Some(FieldError::EmptyField)
    } else if password.chars().count() < min {
        Some(FieldError::TooShort { min })
    } else {
        None
    }
}

/// Validate the sign-in form.
#[must_use]
pub fn validate_sign_in(email: &str, password: &str) -> FieldErrors {
    FieldErrors {
        fullname: None,
        email: check_email(email),
        password: check_password_length(password, SIGN_IN_MIN_PASSWORD),
    }
}

/// Validate the sign-up form.
#[must_use]
pub fn validate_sign_up(fullname: &str, email: &str, password: &str) -> FieldErrors {
    let fullname = fullname.trim();
    let fullname = if fullname.is_empty() {
        Some(FieldError::EmptyField)
    } else if fullname.chars().count() < MIN_FULLNAME {
        Some(FieldError::TooShort { min: MIN_FULLNAME })
    } else {
        None
    };

    let password = check_password_length(password, SIGN_UP_MIN_PASSWORD).or_else(|| {
        (!strong_password(password)).then_some(FieldError::WeakPassword)
    });

    FieldErrors {
        fullname,
        email: check_email(email),
        password,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_email() {
        let emails = vec![
            ("a@b.com", true),
            ("first.last@sub.example.org", true),
            ("user+tag@example.io", true),
            ("", false),
            ("plainaddress", false),
            ("no-dot@domain", false),
            ("two@@example.com", false),
            ("space in@example.com", false),
            (" a@b.com", false),
            ("@example.com", false),
            ("user@.", false),
        ];

        for (email, expected) in emails {
            assert_eq!(valid_email(email), expected, "email: {email:?}");
        }
    }

    #[test]
    fn test_strong_password() {
        assert!(strong_password("Abcdef1!"));
        assert!(strong_password("zZ9@zzzz"));
        assert!(!strong_password("Weakpass1"));
        assert!(!strong_password("weakpass1!"));
        assert!(!strong_password("WEAKPASS1!"));
        assert!(!strong_password("Weakpass!"));
        // only the listed special characters count
        assert!(!strong_password("Weakpass1#"));
    }

    #[test]
    fn test_sign_in_accepts_six_characters() {
        let errors = validate_sign_in("a@b.com", "abcdef");
        assert!(errors.is_empty());
        assert_eq!(errors.message(Field::Email), "");
        assert_eq!(errors.message(Field::Password), "");
    }

    #[test]
    fn test_sign_in_blank_fields() {
        let errors = validate_sign_in("   ", "   ");
        assert_eq!(errors.email, Some(FieldError::EmptyField));
        assert_eq!(errors.password, Some(FieldError::EmptyField));
        assert_eq!(errors.fullname, None);
        assert_eq!(errors.message(Field::Email), "Email is required.");
        assert_eq!(errors.message(Field::Password), "Password is required.");
    }

    #[test]
    fn test_sign_in_malformed_email_and_short_password() {
        let errors = validate_sign_in("not-an-email", "abc");
        assert_eq!(errors.email, Some(FieldError::InvalidFormat));
        assert_eq!(errors.password, Some(FieldError::TooShort { min: 6 }));
        assert_eq!(
            errors.message(Field::Password),
            "Password must be at least 6 characters long."
        );
    }

    #[test]
    fn test_sign_in_password_length_is_not_trimmed() {
        // leading/trailing spaces count toward the length
        let errors = validate_sign_in("a@b.com", " abcd ");
        assert!(errors.is_empty());
    }

    #[test]
    fn test_sign_up_valid() {
        let errors = validate_sign_up("Ada Lovelace", "ada@example.com", "Str0ng!pass");
        assert!(errors.is_empty());
        assert_eq!(errors.to_string(), "");
    }

    #[test]
    fn test_sign_up_fullname_rules() {
        assert_eq!(
            validate_sign_up("  ", "a@b.com", "Str0ng!pass").fullname,
            Some(FieldError::EmptyField)
        );
        assert_eq!(
            validate_sign_up(" Al ", "a@b.com", "Str0ng!pass").fullname,
            Some(FieldError::TooShort { min: 3 })
        );
        assert_eq!(
            validate_sign_up(" Ada ", "a@b.com", "Str0ng!pass").fullname,
            None
        );
        assert_eq!(
            validate_sign_up("Al", "a@b.com", "Str0ng!pass").message(Field::Fullname),
            "Full name must be at least 3 characters."
        );
    }

    #[test]
    fn test_sign_up_password_rules_in_order() {
        let check = |password: &str| validate_sign_up("Ada", "a@b.com", password).password;

        assert_eq!(check(""), Some(FieldError::EmptyField));
        assert_eq!(check("Ab1!"), Some(FieldError::TooShort { min: 8 }));
        assert_eq!(check("Weakpass1"), Some(FieldError::WeakPassword));
        assert_eq!(check("Str0ng!pass"), None);
    }

    #[test]
    fn test_sign_up_rejects_every_missing_class() {
        let missing_one_class = [
            "ABCDEF1!", // lowercase
            "abcdef1!", // uppercase
            "Abcdefg!", // digit
            "Abcdefg1", // special
        ];

        for password in missing_one_class {
            assert_eq!(
                validate_sign_up("Ada", "a@b.com", password).password,
                Some(FieldError::WeakPassword),
                "password: {password}"
            );
        }
    }

    #[test]
    fn test_sign_up_malformed_email() {
        let errors = validate_sign_up("Ada", "ada@localhost", "Str0ng!pass");
        assert_eq!(errors.email, Some(FieldError::InvalidFormat));
        assert_eq!(
            errors.message(Field::Email),
            "Please enter a valid email address."
        );
    }

    #[test]
    fn test_validation_is_idempotent() {
        let inputs = [
            ("", "", ""),
            ("Ada", "bad", "short"),
            ("Ada Lovelace", "ada@example.com", "Str0ng!pass"),
        ];

        for (fullname, email, password) in inputs {
            assert_eq!(
                validate_sign_up(fullname, email, password),
                validate_sign_up(fullname, email, password)
            );
            assert_eq!(
                validate_sign_in(email, password),
                validate_sign_in(email, password)
            );
        }
    }

    #[test]
    fn test_field_errors_display_joins_messages() {
        let errors = validate_sign_up("", "", "");
        assert_eq!(
            errors.to_string(),
            "Full name is required. Email is required. Password is required."
        );
        assert_eq!(errors.iter().count(), 3);
    }

    #[test]
    fn test_password_length_counts_chars() {
        // seven chars, eight UTF-16 units
        assert_eq!(
            validate_sign_up("Ada", "ada@example.com", "Ab1!xy\u{1F600}").password,
            Some(FieldError::TooShort { min: SIGN_UP_MIN_PASSWORD })
        );
        assert_eq!(
            validate_sign_up("Ada", "ada@example.com", "Ab1!xyz\u{1F600}").password,
            None
        );
        // five chars, six bytes
        assert_eq!(
            validate_sign_in("a@b.com", "abcd\u{e9}").password,
            Some(FieldError::TooShort { min: SIGN_IN_MIN_PASSWORD })
        );
    }
}
