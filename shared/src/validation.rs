//! Input validation functions
//!
//! The store itself accepts whatever the onboarding/UI collaborator hands
//! it; these helpers are for that collaborator to enforce sensible bounds
//! before a value ever reaches the store.

use chrono::{DateTime, Utc};

/// Validate daily cigarette consumption (1-100)
pub fn validate_cigarettes_per_day(count: u32) -> Result<(), String> {
    if count == 0 {
        return Err("Cigarettes per day must be at least 1".to_string());
    }
    if count > 100 {
        return Err("Cigarettes per day must be at most 100".to_string());
    }
    Ok(())
}

/// Validate pack size
pub fn validate_cigarettes_per_pack(count: u32) -> Result<(), String> {
    if count == 0 {
        return Err("Cigarettes per pack must be at least 1".to_string());
    }
    if count > 100 {
        return Err("Cigarettes per pack unreasonably large".to_string());
    }
    Ok(())
}

/// Validate pack price
pub fn validate_price_per_pack(price: f64) -> Result<(), String> {
    if price.is_nan() || price.is_infinite() {
        return Err("Pack price must be a valid number".to_string());
    }
    if price <= 0.0 {
        return Err("Pack price must be positive".to_string());
    }
    Ok(())
}

/// Validate craving intensity (1-10)
pub fn validate_craving_intensity(intensity: u8) -> Result<(), String> {
    if !(1..=10).contains(&intensity) {
        return Err("Craving intensity must be between 1 and 10".to_string());
    }
    Ok(())
}

/// Validate a goal target value
pub fn validate_goal_target(target: f64) -> Result<(), String> {
    if target.is_nan() || target.is_infinite() {
        return Err("Goal target must be a valid number".to_string());
    }
    if target <= 0.0 {
        return Err("Goal target must be positive".to_string());
    }
    Ok(())
}

/// Validate the quit instant against the current clock
pub fn validate_quit_instant(quit_instant: DateTime<Utc>) -> Result<(), String> {
    if quit_instant > Utc::now() {
        return Err("Quit date cannot be in the future".to_string());
    }
    Ok(())
}
