// Common validation types and traits

use super::error::ApiError;

#[derive(Debug)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

/// Accumulates field errors so a request reports every problem at once
#[derive(Debug)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
        }
    }

    pub fn add_error(&mut self, field: &str, message: &str) {
        self.is_valid = false;
        self.errors.push(ValidationError {
            field: field.to_string(),
            message: message.to_string(),
        });
    }

    /// Records an error when a trimmed value is empty or longer than `max_len`
    pub fn check_text(&mut self, field: &str, value: &str, max_len: usize) {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            self.add_error(field, "is required");
        } else if trimmed.chars().count() > max_len {
            self.add_error(field, &format!("must not exceed {} characters", max_len));
        }
    }

    pub fn into_result(self) -> Result<(), ApiError> {
        if self.is_valid {
            Ok(())
        } else {
            Err(ApiError::from(self))
        }
    }
}

pub trait Validator<T> {
    fn validate(&self, data: &T) -> ValidationResult;
}
