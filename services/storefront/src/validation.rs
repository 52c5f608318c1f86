//! Input validation utilities

use chrono::{DateTime, Utc};
use regex::Regex;
use rust_decimal::Decimal;
use std::sync::OnceLock;

/// Longest accepted name or title
pub const MAX_NAME_LENGTH: usize = 200;

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.len() > 254 {
        return Err("Email must be at most 254 characters long".to_string());
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// Validate password
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }

    if password.len() < 8 {
        return Err("Password must be at least 8 characters long".to_string());
    }

    if password.len() > 128 {
        return Err("Password must be at most 128 characters long".to_string());
    }

    Ok(())
}

/// Validate a required name or title
pub fn validate_name(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{} is required", field));
    }

    if value.chars().count() > MAX_NAME_LENGTH {
        return Err(format!(
            "{} must be at most {} characters long",
            field, MAX_NAME_LENGTH
        ));
    }

    Ok(())
}

/// Validate a slug: lowercase ASCII words joined by single hyphens
pub fn validate_slug(slug: &str) -> Result<(), String> {
    static SLUG_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = SLUG_REGEX.get_or_init(|| {
        Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").expect("Failed to compile slug regex")
    });

    if !regex.is_match(slug) {
        return Err("Slug may only contain lowercase letters, digits and hyphens".to_string());
    }

    Ok(())
}

pub fn validate_price(field: &str, price: Decimal) -> Result<(), String> {
    if price < Decimal::ZERO {
        return Err(format!("{} must not be negative", field));
    }

    Ok(())
}

pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), String> {
    if !(-90.0..=90.0).contains(&latitude) {
        return Err("Latitude must be between -90 and 90".to_string());
    }

    if !(-180.0..=180.0).contains(&longitude) {
        return Err("Longitude must be between -180 and 180".to_string());
    }

    Ok(())
}

pub fn validate_window(
    valid_from: DateTime<Utc>,
    valid_until: DateTime<Utc>,
) -> Result<(), String> {
    if valid_until <= valid_from {
        return Err("Offer must end after it starts".to_string());
    }

    Ok(())
}
