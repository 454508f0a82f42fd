//! Field-level CV validation.
//!
//! `ValidationErrors` from a nested document come back as a tree (struct
//! blocks, entry lists, leaf fields). `field_errors` flattens that tree into
//! dotted paths like `experience[0].company` so a form can attach each
//! message to the control that caused it.

use validator::{Validate, ValidateEmail, ValidationError, ValidationErrors, ValidationErrorsKind};

use super::models::CvDocument;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Validates the whole document, flattening failures into field paths.
pub fn validate_document(document: &CvDocument) -> Result<(), Vec<FieldError>> {
    document.validate().map_err(|e| field_errors(&e))
}

/// One message per failing field, ordered by field path for stable output.
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut out = Vec::new();
    collect("", errors, &mut out);
    out.sort_by(|a, b| a.field.cmp(&b.field));
    out
}

fn collect(prefix: &str, errors: &ValidationErrors, out: &mut Vec<FieldError>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(list) => {
                if let Some(first) = list.first() {
                    out.push(FieldError {
                        field: path,
                        message: message_of(first),
                    });
                }
            }
            ValidationErrorsKind::Struct(inner) => collect(&path, inner, out),
            ValidationErrorsKind::List(entries) => {
                for (index, inner) in entries {
                    collect(&format!("{path}[{index}]"), inner, out);
                }
            }
        }
    }
}

fn message_of(error: &ValidationError) -> String {
    error
        .message
        .as_ref()
        .map(|m| m.to_string())
        .unwrap_or_else(|| error.code.to_string())
}

pub(super) fn validate_email_field(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some("Email is required".into());
        return Err(err);
    }
    if !value.validate_email() {
        let mut err = ValidationError::new("email");
        err.message = Some("Please enter a valid email address".into());
        return Err(err);
    }
    Ok(())
}
