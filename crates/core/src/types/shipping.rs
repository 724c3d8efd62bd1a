//! Shipping details collected at checkout.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A shipping form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShippingField {
    FullName,
    Email,
    Phone,
    Address,
    City,
    PostalCode,
}

impl fmt::Display for ShippingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::FullName => "full name",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Address => "address",
            Self::City => "city",
            Self::PostalCode => "postal code",
        })
    }
}

/// Shipping details failed validation.
///
/// Every failing field is reported, not just the first.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid shipping details: {}", format_problems(.problems))]
pub struct ShippingError {
    pub problems: Vec<(ShippingField, &'static str)>,
}

impl ShippingError {
    /// Whether `field` is among the failing fields.
    #[must_use]
    pub fn has(&self, field: ShippingField) -> bool {
        self.problems.iter().any(|(f, _)| *f == field)
    }
}

fn format_problems(problems: &[(ShippingField, &'static str)]) -> String {
    problems
        .iter()
        .map(|(field, reason)| format!("{field} {reason}"))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Where and to whom an order ships.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingDetails {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ShippingDetails {
    const MIN_PHONE_DIGITS: usize = 7;
    const MAX_PHONE_DIGITS: usize = 15;

    /// Trim every field and check it.
    ///
    /// # Errors
    ///
    /// Returns [`ShippingError`] listing each field that is empty or malformed.
    pub fn validate(self) -> Result<Self, ShippingError> {
        let details = Self {
            full_name: self.full_name.trim().to_owned(),
            email: self.email.trim().to_owned(),
            phone: self.phone.trim().to_owned(),
            address: self.address.trim().to_owned(),
            city: self.city.trim().to_owned(),
            postal_code: self.postal_code.trim().to_owned(),
            notes: self
                .notes
                .map(|n| n.trim().to_owned())
                .filter(|n| !n.is_empty()),
        };

        let mut problems = Vec::new();
        for (field, value) in [
            (ShippingField::FullName, &details.full_name),
            (ShippingField::Address, &details.address),
            (ShippingField::City, &details.city),
            (ShippingField::PostalCode, &details.postal_code),
        ] {
            if value.is_empty() {
                problems.push((field, "is required"));
            }
        }

        if let Some(reason) = email_problem(&details.email) {
            problems.push((ShippingField::Email, reason));
        }
        if let Some(reason) = phone_problem(&details.phone) {
            problems.push((ShippingField::Phone, reason));
        }

        if problems.is_empty() {
            Ok(details)
        } else {
            Err(ShippingError { problems })
        }
    }
}

fn email_problem(email: &str) -> Option<&'static str> {
    if email.is_empty() {
        return Some("is required");
    }
    let mut parts = email.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) if !local.is_empty() && !domain.is_empty() => None,
        _ => Some("must look like name@domain"),
    }
}

fn phone_problem(phone: &str) -> Option<&'static str> {
    if phone.is_empty() {
        return Some("is required");
    }
    let body = phone.strip_prefix('+').unwrap_or(phone);
    if !body
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '-' | '(' | ')'))
    {
        return Some("may only contain digits, spaces, dashes and parentheses");
    }
    let digits = body.chars().filter(char::is_ascii_digit).count();
    if !(ShippingDetails::MIN_PHONE_DIGITS..=ShippingDetails::MAX_PHONE_DIGITS).contains(&digits) {
        return Some("must have 7 to 15 digits");
    }
    None
}
