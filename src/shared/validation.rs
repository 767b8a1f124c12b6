//! Validation Utilities

use validator::ValidationErrors;

use super::error::{AppError, FieldError};

/// Convert validation errors to AppError
pub fn validation_error(errors: ValidationErrors) -> AppError {
    let mut field_errors: Vec<FieldError> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| FieldError {
                field: field.to_string(),
                message: e.message.clone().map(|m| m.to_string()).unwrap_or_default(),
            })
        })
        .collect();

    // HashMap iteration order is unstable; keep the reported field deterministic.
    field_errors.sort_by(|a, b| a.field.cmp(&b.field));

    let message = field_errors
        .first()
        .map(|e| format!("{}: {}", e.field, e.message))
        .unwrap_or_else(|| "Validation failed".into());

    AppError::Validation(message)
}

/// Check a positive integer identifier taken from a path or query string.
pub fn require_positive_id(id: i32, what: &str) -> Result<i32, AppError> {
    if id <= 0 {
        return Err(AppError::BadRequest(format!("{} ID must be a positive integer", what)));
    }
    Ok(id)
}

/// Parse a raw path segment into a positive identifier.
pub fn parse_positive_id(raw: &str, what: &str) -> Result<i32, AppError> {
    let id: i32 = raw
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest(format!("{} ID must be a positive integer", what)))?;
    require_positive_id(id, what)
}
