//! Field-level form validation for the auth flows.
//!
//! Runs before any network call; a failing form never reaches the backend.
//! Messages are the exact texts shown next to the fields.

use validator::{Validate, ValidateEmail, ValidationError, ValidationErrors};

#[derive(Debug, Clone, Validate)]
pub struct Credentials {
    #[validate(custom(function = validate_email_field))]
    pub email: String,
    #[validate(custom(function = validate_password))]
    pub password: String,
}

#[derive(Debug, Clone, Validate)]
pub struct Registration {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    #[validate(custom(function = validate_email_field))]
    pub email: String,
    #[validate(custom(function = validate_password))]
    pub password: String,
    #[validate(
        length(min = 1, message = "Confirm password is required"),
        must_match(other = password, message = "Passwords do not match")
    )]
    pub confirm_password: String,
}

/// One failing field with its user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Flattens `ValidationErrors` to one message per field, keeping form field
/// order. Only the first failing rule of a field is reported, so "required"
/// wins over format checks.
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut out: Vec<FieldError> = errors
        .field_errors()
        .iter()
        .filter_map(|(field, errs)| {
            let first = errs.first()?;
            Some(FieldError {
                field: field.to_string(),
                message: first
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{field} is invalid")),
            })
        })
        .collect();
    out.sort_by_key(|e| field_rank(&e.field));
    out
}

fn field_rank(field: &str) -> usize {
    const ORDER: [&str; 5] = [
        "first_name",
        "last_name",
        "email",
        "password",
        "confirm_password",
    ];
    ORDER
        .iter()
        .position(|f| *f == field)
        .unwrap_or(ORDER.len())
}

/// Required first, format second, so an empty field reports "is required"
/// rather than a format complaint.
fn validate_email_field(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some("Email is required".into());
        return Err(err);
    }
    if !email.validate_email() {
        let mut err = ValidationError::new("email");
        err.message = Some("Please enter a valid email address".into());
        return Err(err);
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some("Password is required".into());
        return Err(err);
    }
    if password.len() < 6 {
        let mut err = ValidationError::new("min_length");
        err.message = Some("Password must be at least 6 characters".into());
        return Err(err);
    }
    Ok(())
}
