// Helper functions for safe logging and request parsing

use serde_json::Value;

use super::error::ApiError;

/// Keys whose values are masked before a JSON body reaches the logs
const SENSITIVE_KEYS: &[&str] = &["phone", "email"];

/// Masks email addresses for safe logging
///
/// # Example
/// ```ignore
/// let masked = safe_email_log("user@example.com");
/// // Returns: "u***@example.com"
/// ```
pub fn safe_email_log(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {
            let first: String = local.chars().take(1).collect();
            format!("{}***@{}", first, domain)
        }
        _ => "***@***.***".to_string(),
    }
}

/// Masks a phone number, keeping the last two digits
pub fn safe_phone_log(phone: &str) -> String {
    let digits: Vec<char> = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() <= 2 {
        return "***".to_string();
    }
    let tail: String = digits[digits.len() - 2..].iter().collect();
    format!("***{}", tail)
}

/// Recursively masks contact details inside a JSON document
pub fn redact_contact_fields(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, field) in map.iter_mut() {
                if SENSITIVE_KEYS.contains(&key.as_str()) {
                    if let Value::String(s) = field {
                        *s = if key == "email" {
                            safe_email_log(s)
                        } else {
                            safe_phone_log(s)
                        };
                    }
                } else {
                    redact_contact_fields(field);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(redact_contact_fields),
        _ => {}
    }
}

/// Parses a numeric path segment, reporting `label` on failure
pub fn parse_id(raw: &str, label: &str) -> Result<i64, ApiError> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| ApiError::BadRequest(format!("Invalid {}", label)))
}
