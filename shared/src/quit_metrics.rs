//! Quit-progress metric calculations
//!
//! Provides the derived values for a quit attempt: smoke-free days,
//! cigarettes avoided, money saved, and the health-recovery score.
//!
//! # Design Principles
//!
//! 1. **Pure Functions**: every calculation takes an explicit `now`, no
//!    hidden clock reads, no side effects
//! 2. **Recomputed on read**: nothing here is ever cached or persisted
//! 3. **Non-negative**: all derived values clamp at zero, even for a quit
//!    instant in the future

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Profile;

/// Health score gain per smoke-free day
const HEALTH_SCORE_PER_DAY: i64 = 2;

/// Health score ceiling
const MAX_HEALTH_SCORE: i64 = 100;

/// Derived quit-progress values at a single instant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuitStats {
    /// Whole days elapsed since the quit instant
    pub days_since_quit: i64,
    /// Cigarettes not smoked over those days
    pub cigarettes_avoided: i64,
    /// Money not spent, in the profile's pack currency
    pub money_saved: f64,
    /// Recovery score, 0-100
    pub health_score: i64,
}

/// Whole days between the quit instant and `now`, floored, never negative.
pub fn days_since_quit(quit_instant: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - quit_instant).num_days().max(0)
}

/// Cigarettes avoided over the given number of smoke-free days.
pub fn cigarettes_avoided(days_since_quit: i64, cigarettes_per_day: u32) -> i64 {
    days_since_quit * i64::from(cigarettes_per_day)
}

/// Money not spent on the avoided cigarettes.
///
/// A zero pack size degrades to 0 rather than dividing by zero.
pub fn money_saved(cigarettes_avoided: i64, cigarettes_per_pack: u32, price_per_pack: f64) -> f64 {
    if cigarettes_per_pack == 0 {
        return 0.0;
    }
    let packs_avoided = cigarettes_avoided as f64 / f64::from(cigarettes_per_pack);
    packs_avoided * price_per_pack
}

/// Recovery score: two points per smoke-free day, capped at 100.
pub fn health_score(days_since_quit: i64) -> i64 {
    (days_since_quit * HEALTH_SCORE_PER_DAY).min(MAX_HEALTH_SCORE)
}

/// Compute the full derived bundle for a profile at an explicit instant.
pub fn stats_at(profile: &Profile, now: DateTime<Utc>) -> QuitStats {
    let days = days_since_quit(profile.quit_instant, now);
    let avoided = cigarettes_avoided(days, profile.cigarettes_per_day);

    QuitStats {
        days_since_quit: days,
        cigarettes_avoided: avoided,
        money_saved: money_saved(avoided, profile.cigarettes_per_pack, profile.price_per_pack),
        health_score: health_score(days),
    }
}
