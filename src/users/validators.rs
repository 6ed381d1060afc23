use super::models::{CreateUserRequest, UpdateUserRequest};
use crate::common::{ValidationResult, Validator};

const MAX_NAME_LEN: usize = 100;
const MAX_EMAIL_LEN: usize = 100;
const MAX_PHONE_LEN: usize = 15;
const MAX_GENDER_LEN: usize = 10;

pub struct UserValidator;

impl Validator<CreateUserRequest> for UserValidator {
    fn validate(&self, data: &CreateUserRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        result.check_text("name", &data.name, MAX_NAME_LEN);
        result.check_text("email", &data.email, MAX_EMAIL_LEN);
        if !data.email.trim().is_empty() && !is_plausible_email(data.email.trim()) {
            result.add_error("email", "must be a valid email address");
        }

        result.check_text("phone", &data.phone, MAX_PHONE_LEN);
        if !data.phone.trim().is_empty() && !is_plausible_phone(data.phone.trim()) {
            result.add_error("phone", "may only contain digits, spaces, '+' and '-'");
        }

        if let Some(gender) = &data.gender {
            if gender.trim().chars().count() > MAX_GENDER_LEN {
                result.add_error("gender", "must not exceed 10 characters");
            }
        }

        result
    }
}

impl Validator<UpdateUserRequest> for UserValidator {
    fn validate(&self, data: &UpdateUserRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if let Some(name) = non_blank(&data.name) {
            result.check_text("name", name, MAX_NAME_LEN);
        }
        if let Some(phone) = non_blank(&data.phone) {
            result.check_text("phone", phone, MAX_PHONE_LEN);
            if !is_plausible_phone(phone.trim()) {
                result.add_error("phone", "may only contain digits, spaces, '+' and '-'");
            }
        }
        if let Some(gender) = non_blank(&data.gender) {
            result.check_text("gender", gender, MAX_GENDER_LEN);
        }

        result
    }
}

pub fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    }
}

fn is_plausible_phone(phone: &str) -> bool {
    phone.chars().any(|c| c.is_ascii_digit())
        && phone
            .chars()
            .all(|c| c.is_ascii_digit() || c == '+' || c == '-' || c == ' ')
}
