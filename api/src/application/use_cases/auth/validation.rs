use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::domain::accounts::account::{default_display_name, normalize_email};

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\S+@\S+\.\S+$").expect("valid regex"));

pub const MIN_CREDENTIAL_LEN: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldIssue {
    Missing,
    Malformed,
    TooShort,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub issue: FieldIssue,
    pub message: String,
}

impl FieldError {
    fn missing(field: &'static str, label: &str) -> Self {
        Self {
            field,
            issue: FieldIssue::Missing,
            message: format!("{label} is required"),
        }
    }
}

/// Field-level failures collected during validation, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    pub fn fields(&self) -> Vec<&'static str> {
        self.0.iter().map(|e| e.field).collect()
    }

    pub fn missing_fields(&self) -> Vec<&'static str> {
        self.0
            .iter()
            .filter(|e| e.issue == FieldIssue::Missing)
            .map(|e| e.field)
            .collect()
    }

    fn push(&mut self, err: FieldError) {
        self.0.push(err);
    }

    fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, Self> {
        if self.is_empty() { Ok(value()) } else { Err(self) }
    }
}

/// Registration input that passed validation. The email is normalized and the
/// display name already defaulted.
pub struct ValidRegistration<'a> {
    pub email: String,
    pub credential: &'a str,
    pub display_name: String,
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

pub fn validate_registration<'a>(
    email: Option<&str>,
    credential: Option<&'a str>,
    display_name: Option<&str>,
) -> Result<ValidRegistration<'a>, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let email = present(email.map(str::trim)).map(normalize_email);
    match email.as_deref() {
        None => errors.push(FieldError::missing("email", "Email")),
        Some(e) if !EMAIL_RE.is_match(e) => errors.push(FieldError {
            field: "email",
            issue: FieldIssue::Malformed,
            message: "Please enter a valid email".into(),
        }),
        Some(_) => {}
    }

    let credential = present(credential);
    match credential {
        None => errors.push(FieldError::missing("credential", "Credential")),
        Some(c) if c.chars().count() < MIN_CREDENTIAL_LEN => errors.push(FieldError {
            field: "credential",
            issue: FieldIssue::TooShort,
            message: format!("Credential must be at least {MIN_CREDENTIAL_LEN} characters"),
        }),
        Some(_) => {}
    }

    errors.into_result(|| {
        let email = email.unwrap_or_default();
        let display_name = display_name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| default_display_name(&email));
        ValidRegistration {
            email,
            credential: credential.unwrap_or_default(),
            display_name,
        }
    })
}

/// Presence-only check used by login; format rules are not re-applied to
/// existing accounts.
pub fn validate_login<'a>(
    email: Option<&str>,
    credential: Option<&'a str>,
) -> Result<(String, &'a str), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    let email = present(email.map(str::trim)).map(normalize_email);
    if email.is_none() {
        errors.push(FieldError::missing("email", "Email"));
    }
    let credential = present(credential);
    if credential.is_none() {
        errors.push(FieldError::missing("credential", "Credential"));
    }
    errors.into_result(|| (email.unwrap_or_default(), credential.unwrap_or_default()))
}
