use chrono::{NaiveDate, NaiveTime};
use regex::Regex;
use std::sync::OnceLock;

use super::models::CreateRideRequest;
use crate::common::{ApiError, ValidationResult, Validator};

const MAX_PLACE_LEN: usize = 200;

fn date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("static date regex"))
}

fn time_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d{2}:\d{2}$").expect("static time regex"))
}

/// Parses a `YYYY-MM-DD` calendar date
pub fn parse_ride_date(date: &str) -> Option<NaiveDate> {
    if !date_pattern().is_match(date) {
        return None;
    }
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

/// Parses an `HH:MM` time of day
pub fn parse_ride_time(time: &str) -> Option<NaiveTime> {
    if !time_pattern().is_match(time) {
        return None;
    }
    NaiveTime::parse_from_str(time, "%H:%M").ok()
}

/// Rejects anything that is not a `YYYY-MM-DD` date
pub fn validate_date_param(date: &str) -> Result<NaiveDate, ApiError> {
    parse_ride_date(date).ok_or_else(|| {
        ApiError::BadRequest("Invalid date format, expected YYYY-MM-DD".to_string())
    })
}

pub struct RideValidator;

impl Validator<CreateRideRequest> for RideValidator {
    fn validate(&self, data: &CreateRideRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        result.check_text("origin", &data.origin, MAX_PLACE_LEN);
        result.check_text("destination", &data.destination, MAX_PLACE_LEN);

        if parse_ride_date(data.date.trim()).is_none() {
            result.add_error("date", "Invalid date format, expected YYYY-MM-DD");
        }
        if parse_ride_time(data.time.trim()).is_none() {
            result.add_error("time", "Invalid time format, expected HH:mm");
        }

        if data.seats < 1 {
            result.add_error("seats", "must be at least 1");
        }

        if !data.price.is_finite() || data.price < 0.0 {
            result.add_error("price", "must be a non-negative amount");
        }

        result
    }
}
