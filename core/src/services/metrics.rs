//! Reporting queries over the record store
//!
//! Everything here is computed on demand from the store's current state;
//! nothing is persisted and nothing is mutated.

use chrono::{DateTime, Utc};
use quitpath_shared::models::{DailyRecord, MoodLevel};

use crate::store::TrackerStore;

/// How many recent entries the mood trend and craving analysis consider
const RECENT_LIMIT: usize = 7;

/// One mood observation for trend displays
#[derive(Debug, Clone, PartialEq)]
pub struct MoodPoint {
    pub date: DateTime<Utc>,
    pub mood: MoodLevel,
}

/// Summary of the most recent craving entries
#[derive(Debug, Clone, PartialEq)]
pub struct CravingAnalysis {
    pub count: usize,
    /// Mean intensity, integer-truncating
    pub average_intensity: u32,
    /// Percentage of cravings resisted successfully
    pub success_rate_percent: f64,
}

/// Unlocked-versus-total achievement ratio
#[derive(Debug, Clone, PartialEq)]
pub struct AchievementCompletion {
    pub unlocked: usize,
    pub total: usize,
    pub ratio: f64,
}

/// Read-only metrics over a [`TrackerStore`]
pub struct MetricsAggregator;

impl MetricsAggregator {
    /// Daily records from the trailing seven-day window.
    pub fn weekly_records(store: &TrackerStore) -> Vec<DailyRecord> {
        store.records_in_window(7)
    }

    /// The up-to-seven most recent daily records paired with their mood,
    /// newest first.
    pub fn mood_trend(store: &TrackerStore) -> Vec<MoodPoint> {
        store
            .daily_records()
            .iter()
            .take(RECENT_LIMIT)
            .map(|r| MoodPoint {
                date: r.date,
                mood: r.mood,
            })
            .collect()
    }

    /// Summary over the up-to-seven most recent craving entries, or `None`
    /// when no cravings have been logged.
    pub fn craving_analysis(store: &TrackerStore) -> Option<CravingAnalysis> {
        let recent: Vec<_> = store.craving_records().iter().take(RECENT_LIMIT).collect();
        if recent.is_empty() {
            return None;
        }

        let intensity_sum: u32 = recent.iter().map(|c| u32::from(c.intensity)).sum();
        let successful = recent.iter().filter(|c| c.was_successful).count();

        Some(CravingAnalysis {
            count: recent.len(),
            average_intensity: intensity_sum / recent.len() as u32,
            success_rate_percent: successful as f64 / recent.len() as f64 * 100.0,
        })
    }

    /// Unlocked achievements over the full catalog.
    pub fn achievement_completion(store: &TrackerStore) -> AchievementCompletion {
        let total = store.achievements().len();
        let unlocked = store
            .achievements()
            .iter()
            .filter(|a| a.is_unlocked())
            .count();

        AchievementCompletion {
            unlocked,
            total,
            ratio: unlocked as f64 / total.max(1) as f64,
        }
    }
}
