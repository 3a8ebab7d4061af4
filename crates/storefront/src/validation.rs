//! Delivery-form validation.
//!
//! One centralized validator returning a structured result: every
//! failing field is reported with its reason, instead of each field
//! surfacing its own error through a separate channel.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Delivery details submitted at checkout.
#[derive(Debug, Clone, Default)]
pub struct DeliveryForm {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub street: String,
    pub zip: String,
    pub city: String,
}

/// A delivery-form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Field {
    Name,
    Phone,
    Email,
    Street,
    Zip,
    City,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Name => "name",
            Self::Phone => "phone",
            Self::Email => "email",
            Self::Street => "street",
            Self::Zip => "zip",
            Self::City => "city",
        };
        write!(f, "{name}")
    }
}

/// Field-by-field validation failures.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<Field, &'static str>,
}

impl ValidationErrors {
    fn insert(&mut self, field: Field, reason: &'static str) {
        self.fields.insert(field, reason);
    }

    /// Whether any field failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The failure reason for `field`, if it failed.
    #[must_use]
    pub fn reason(&self, field: Field) -> Option<&'static str> {
        self.fields.get(&field).copied()
    }

    /// Iterate over failing fields and reasons.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &'static str)> + '_ {
        self.fields.iter().map(|(field, reason)| (*field, *reason))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, reason) in &self.fields {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{field}: {reason}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]+(?:\s[A-Za-z]+)+$").expect("Invalid regex"));

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\d()\-]{1,50}$").expect("Invalid regex"));

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}$").expect("Invalid regex")
});

static ZIP_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{5}$").expect("Invalid regex"));

/// Validate a delivery form.
///
/// Fields are trimmed before checking.
///
/// # Errors
///
/// Returns every failing field with its reason.
pub fn validate(form: &DeliveryForm) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let name = form.name.trim();
    if !(2..=50).contains(&name.len()) || !NAME_RE.is_match(name) {
        errors.insert(Field::Name, "Please enter first and last name");
    }

    if !PHONE_RE.is_match(form.phone.trim()) {
        errors.insert(Field::Phone, "Please enter a correct phone number");
    }

    if !EMAIL_RE.is_match(form.email.trim()) {
        errors.insert(Field::Email, "Please enter a correct email address");
    }

    if !(2..=50).contains(&form.street.trim().len()) {
        errors.insert(Field::Street, "Please enter a valid street name");
    }

    if !ZIP_RE.is_match(form.zip.trim()) {
        errors.insert(Field::Zip, "Please enter a valid zip code (5 digits)");
    }

    if !(2..=50).contains(&form.city.trim().len()) {
        errors.insert(Field::City, "Please enter a city");
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> DeliveryForm {
        DeliveryForm {
            name: "Ada Lovelace".to_string(),
            phone: "(040)555-1234".to_string(),
            email: "ada@example.com".to_string(),
            street: "Analytical Lane 7".to_string(),
            zip: "20095".to_string(),
            city: "Hamburg".to_string(),
        }
    }

    #[test]
    fn test_valid_form_passes() {
        assert!(validate(&valid_form()).is_ok());
    }

    #[test]
    fn test_single_word_name_is_rejected() {
        let mut form = valid_form();
        form.name = "Ada".to_string();

        let errors = validate(&form).expect_err("must fail");
        assert_eq!(
            errors.reason(Field::Name),
            Some("Please enter first and last name")
        );
        assert_eq!(errors.reason(Field::Email), None);
    }

    #[test]
    fn test_empty_phone_is_rejected() {
        let mut form = valid_form();
        form.phone = String::new();

        let errors = validate(&form).expect_err("must fail");
        assert!(errors.reason(Field::Phone).is_some());
    }

    #[test]
    fn test_mail_without_domain_is_rejected() {
        let mut form = valid_form();
        form.email = "ada@".to_string();

        let errors = validate(&form).expect_err("must fail");
        assert!(errors.reason(Field::Email).is_some());
    }

    #[test]
    fn test_zip_must_be_five_digits() {
        for bad in ["1234", "123456", "2009a"] {
            let mut form = valid_form();
            form.zip = bad.to_string();
            assert!(validate(&form).is_err(), "zip {bad:?} must be rejected");
        }
    }

    #[test]
    fn test_fields_are_trimmed() {
        let mut form = valid_form();
        form.name = "  Ada Lovelace  ".to_string();
        form.zip = " 20095 ".to_string();
        assert!(validate(&form).is_ok());
    }

    #[test]
    fn test_all_failures_are_collected() {
        let form = DeliveryForm::default();
        let errors = validate(&form).expect_err("must fail");

        assert_eq!(errors.iter().count(), 6);
        let rendered = errors.to_string();
        assert!(rendered.contains("name: Please enter first and last name"));
        assert!(rendered.contains("zip: Please enter a valid zip code (5 digits)"));
    }
}
