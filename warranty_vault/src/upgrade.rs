//! Premium upgrade form and its validation rules.
//!
//! The upgrade flow collects four contact fields and submits them to the
//! payment endpoint. Country code and phone number are normalized as the
//! user types (digits only, bounded length), then every field is validated
//! independently so the form can show all problems at once. A failed
//! validation never reaches the network.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;

/// Permissive email shape check: something, an `@`, something, a dot,
/// something, none of it whitespace or a second `@`. Deliberately not
/// RFC 5322.
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static regex is valid"));
static COUNTRY_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,3}$").expect("static regex is valid"));
static PHONE_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{9,10}$").expect("static regex is valid"));

/// Maximum digits kept by country code normalization.
pub const COUNTRY_CODE_MAX_DIGITS: usize = 3;
/// Maximum digits kept by phone number normalization.
pub const PHONE_NUMBER_MAX_DIGITS: usize = 10;

/// Form fields, used as keys in validation error mappings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    FirstName,
    Email,
    CountryCode,
    PhoneNumber,
}

impl Field {
    /// Wire/display name of the field.
    pub fn name(self) -> &'static str {
        match self {
            Field::FirstName => "first_name",
            Field::Email => "email",
            Field::CountryCode => "country_code",
            Field::PhoneNumber => "phone_number",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Reason a single field failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("First name is required")]
    FirstNameRequired,
    #[error("Email is required")]
    EmailRequired,
    #[error("Please enter a valid email address")]
    EmailInvalid,
    #[error("Country code is required")]
    CountryCodeRequired,
    #[error("Country code must be 1-3 digits only")]
    CountryCodeInvalid,
    #[error("Phone number is required")]
    PhoneNumberRequired,
    #[error("Phone number must be 9-10 digits only")]
    PhoneNumberInvalid,
}

/// Field-to-reason mapping produced by a failed validation. Never empty
/// when returned from [`UpgradeForm::validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<Field, FieldError>);

impl ValidationErrors {
    fn insert(&mut self, field: Field, error: FieldError) {
        self.0.insert(field, error);
    }

    /// Reason the given field failed, if it did.
    pub fn get(&self, field: Field) -> Option<FieldError> {
        self.0.get(&field).copied()
    }

    /// Iterate failures in field order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, FieldError)> + '_ {
        self.0.iter().map(|(field, error)| (*field, *error))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, error) in self.iter() {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", field, error)?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Contact details submitted to request a premium payment charge.
///
/// Transient and in-memory only; serializes to the payment endpoint's
/// JSON payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpgradeForm {
    pub first_name: String,
    pub email: String,
    pub country_code: String,
    pub phone_number: String,
}

impl UpgradeForm {
    pub fn set_first_name(&mut self, value: &str) {
        self.first_name = value.to_string();
    }

    pub fn set_email(&mut self, value: &str) {
        self.email = value.to_string();
    }

    /// Keystroke-time restriction: digits only, at most 3.
    pub fn set_country_code(&mut self, value: &str) {
        self.country_code = normalize_country_code(value);
    }

    /// Keystroke-time restriction: digits only, at most 10.
    pub fn set_phone_number(&mut self, value: &str) {
        self.phone_number = normalize_phone_number(value);
    }

    /// Validate every field independently.
    ///
    /// Returns the full field-to-reason mapping on failure so the form can
    /// flag all problems at once. Success has no side effect; the caller
    /// dispatches the payment request.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        if self.first_name.trim().is_empty() {
            errors.insert(Field::FirstName, FieldError::FirstNameRequired);
        }

        if self.email.trim().is_empty() {
            errors.insert(Field::Email, FieldError::EmailRequired);
        } else if !EMAIL_RE.is_match(&self.email) {
            errors.insert(Field::Email, FieldError::EmailInvalid);
        }

        if self.country_code.trim().is_empty() {
            errors.insert(Field::CountryCode, FieldError::CountryCodeRequired);
        } else if !COUNTRY_CODE_RE.is_match(&self.country_code) {
            errors.insert(Field::CountryCode, FieldError::CountryCodeInvalid);
        }

        if self.phone_number.trim().is_empty() {
            errors.insert(Field::PhoneNumber, FieldError::PhoneNumberRequired);
        } else if !PHONE_NUMBER_RE.is_match(&self.phone_number) {
            errors.insert(Field::PhoneNumber, FieldError::PhoneNumberInvalid);
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Strip non-digit characters and truncate to 3 digits.
pub fn normalize_country_code(value: &str) -> String {
    normalize_digits(value, COUNTRY_CODE_MAX_DIGITS)
}

/// Strip non-digit characters and truncate to 10 digits.
pub fn normalize_phone_number(value: &str) -> String {
    normalize_digits(value, PHONE_NUMBER_MAX_DIGITS)
}

fn normalize_digits(value: &str, max_digits: usize) -> String {
    value
        .chars()
        .filter(char::is_ascii_digit)
        .take(max_digits)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> UpgradeForm {
        UpgradeForm {
            first_name: "Sara".to_string(),
            email: "sara@example.com".to_string(),
            country_code: "965".to_string(),
            phone_number: "512345678".to_string(),
        }
    }

    // === Normalization ===

    #[test]
    fn country_code_strips_non_digits() {
        assert_eq!(normalize_country_code("9a6b5"), "965");
    }

    #[test]
    fn country_code_truncates_to_three_digits() {
        assert_eq!(normalize_country_code("12345"), "123");
    }

    #[test]
    fn phone_number_strips_separators_and_truncates() {
        assert_eq!(normalize_phone_number("51-234-5678-99"), "5123456789");
    }

    #[test]
    fn setters_apply_normalization() {
        let mut form = UpgradeForm::default();
        form.set_country_code("+965");
        form.set_phone_number("+51 234 5678");
        assert_eq!(form.country_code, "965");
        assert_eq!(form.phone_number, "512345678");
    }

    #[test]
    fn first_name_and_email_setters_pass_through() {
        let mut form = UpgradeForm::default();
        form.set_first_name("Sara");
        form.set_email("Sara@Example.com");
        assert_eq!(form.first_name, "Sara");
        assert_eq!(form.email, "Sara@Example.com");
    }

    // === Email rule ===

    #[test]
    fn accepts_minimal_email() {
        let mut form = valid_form();
        form.email = "a@b.co".to_string();
        assert!(form.validate().is_ok());
    }

    #[test]
    fn rejects_empty_email() {
        let mut form = valid_form();
        form.email = String::new();
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get(Field::Email), Some(FieldError::EmailRequired));
    }

    #[test]
    fn rejects_email_without_dot() {
        let mut form = valid_form();
        form.email = "a@b".to_string();
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get(Field::Email), Some(FieldError::EmailInvalid));
    }

    #[test]
    fn rejects_email_without_at() {
        let mut form = valid_form();
        form.email = "ab.co".to_string();
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get(Field::Email), Some(FieldError::EmailInvalid));
    }

    #[test]
    fn rejects_email_with_double_at() {
        let mut form = valid_form();
        form.email = "a@@b.co".to_string();
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get(Field::Email), Some(FieldError::EmailInvalid));
    }

    #[test]
    fn rejects_email_with_whitespace() {
        let mut form = valid_form();
        form.email = "a b@c.co".to_string();
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get(Field::Email), Some(FieldError::EmailInvalid));
    }

    // === First name rule ===

    #[test]
    fn rejects_whitespace_only_first_name() {
        let mut form = valid_form();
        form.first_name = "   ".to_string();
        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors.get(Field::FirstName),
            Some(FieldError::FirstNameRequired)
        );
    }

    // === Country code rule ===

    #[test]
    fn single_digit_country_code_is_valid() {
        let mut form = valid_form();
        form.country_code = "1".to_string();
        assert!(form.validate().is_ok());
    }

    #[test]
    fn rejects_empty_country_code() {
        let mut form = valid_form();
        form.country_code = String::new();
        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors.get(Field::CountryCode),
            Some(FieldError::CountryCodeRequired)
        );
    }

    #[test]
    fn rejects_non_digit_country_code() {
        // Reachable only for values that bypassed the setters.
        let mut form = valid_form();
        form.country_code = "+96".to_string();
        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors.get(Field::CountryCode),
            Some(FieldError::CountryCodeInvalid)
        );
    }

    // === Phone number rule ===

    #[test]
    fn nine_and_ten_digit_phone_numbers_are_valid() {
        let mut form = valid_form();
        form.phone_number = "123456789".to_string();
        assert!(form.validate().is_ok());
        form.phone_number = "1234567890".to_string();
        assert!(form.validate().is_ok());
    }

    #[test]
    fn rejects_short_phone_number_even_after_normalization() {
        // Normalization enforces digits-only and the maximum, so the only
        // reachable invalid case is a below-minimum length.
        let mut form = valid_form();
        form.set_phone_number("12345678");
        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors.get(Field::PhoneNumber),
            Some(FieldError::PhoneNumberInvalid)
        );
    }

    #[test]
    fn rejects_empty_phone_number() {
        let mut form = valid_form();
        form.phone_number = String::new();
        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors.get(Field::PhoneNumber),
            Some(FieldError::PhoneNumberRequired)
        );
    }

    // === Independent evaluation ===

    #[test]
    fn reports_all_failures_at_once() {
        let form = UpgradeForm::default();
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.len(), 4);
        assert_eq!(
            errors.get(Field::FirstName),
            Some(FieldError::FirstNameRequired)
        );
        assert_eq!(errors.get(Field::Email), Some(FieldError::EmailRequired));
        assert_eq!(
            errors.get(Field::CountryCode),
            Some(FieldError::CountryCodeRequired)
        );
        assert_eq!(
            errors.get(Field::PhoneNumber),
            Some(FieldError::PhoneNumberRequired)
        );
    }

    #[test]
    fn valid_form_passes() {
        assert!(valid_form().validate().is_ok());
    }

    #[test]
    fn serializes_to_payment_payload() {
        let json = serde_json::to_value(valid_form()).unwrap();
        assert_eq!(json["first_name"], "Sara");
        assert_eq!(json["email"], "sara@example.com");
        assert_eq!(json["country_code"], "965");
        assert_eq!(json["phone_number"], "512345678");
    }

    #[test]
    fn display_joins_field_messages() {
        let form = UpgradeForm::default();
        let errors = form.validate().unwrap_err();
        let repr = errors.to_string();
        assert!(repr.contains("first_name: First name is required"));
        assert!(repr.contains("phone_number: Phone number is required"));
    }
}
