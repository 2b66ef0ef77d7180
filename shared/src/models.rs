//! Data models for the QuitPath tracker
//!
//! Everything here is persisted as JSON through the core storage layer, so
//! every type derives `Serialize`/`Deserialize`. Derived quantities (days
//! since quit, money saved, goal progress) are never stored; see
//! [`crate::quit_metrics`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::quit_metrics::{self, QuitStats};

/// User profile describing the quit attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub quit_instant: DateTime<Utc>,
    pub cigarettes_per_day: u32,
    pub price_per_pack: f64,
    pub cigarettes_per_pack: u32,
    pub motivations: Vec<String>,
    pub avatar: Option<String>,
}

impl Profile {
    /// Derived values at an explicit instant; pure, recomputed on every call.
    pub fn stats_at(&self, now: DateTime<Utc>) -> QuitStats {
        quit_metrics::stats_at(self, now)
    }

    /// Derived values against the wall clock.
    pub fn stats(&self) -> QuitStats {
        self.stats_at(Utc::now())
    }

    pub fn days_since_quit(&self) -> i64 {
        self.stats().days_since_quit
    }

    pub fn cigarettes_avoided(&self) -> i64 {
        self.stats().cigarettes_avoided
    }

    pub fn money_saved(&self) -> f64 {
        self.stats().money_saved
    }

    pub fn health_score(&self) -> i64 {
        self.stats().health_score
    }
}

/// Mood recorded with a daily entry, ordered worst to best
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoodLevel {
    VeryBad,
    Bad,
    Neutral,
    Good,
    VeryGood,
}

impl MoodLevel {
    pub const ALL: [MoodLevel; 5] = [
        MoodLevel::VeryBad,
        MoodLevel::Bad,
        MoodLevel::Neutral,
        MoodLevel::Good,
        MoodLevel::VeryGood,
    ];

    /// Display glyph; presentation metadata, not used by core logic
    pub fn glyph(&self) -> &'static str {
        match self {
            MoodLevel::VeryBad => "😢",
            MoodLevel::Bad => "😕",
            MoodLevel::Neutral => "😐",
            MoodLevel::Good => "🙂",
            MoodLevel::VeryGood => "😊",
        }
    }

    /// Display color as a hex tag; presentation metadata
    pub fn color(&self) -> &'static str {
        match self {
            MoodLevel::VeryBad => "#F25C6B",
            MoodLevel::Bad => "#FF8A3D",
            MoodLevel::Neutral => "#8E8E93",
            MoodLevel::Good => "#61BAFF",
            MoodLevel::VeryGood => "#5CD6A6",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MoodLevel::VeryBad => "Very Bad",
            MoodLevel::Bad => "Bad",
            MoodLevel::Neutral => "Neutral",
            MoodLevel::Good => "Good",
            MoodLevel::VeryGood => "Very Good",
        }
    }
}

/// Daily tracking entry; at most one per local calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    pub did_smoke: bool,
    pub mood: MoodLevel,
    pub craving_count: u32,
    pub notes: Option<String>,
}

impl DailyRecord {
    pub fn new(date: DateTime<Utc>, did_smoke: bool, mood: MoodLevel, craving_count: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            did_smoke,
            mood,
            craving_count,
            notes: None,
        }
    }
}

/// Append-only craving log entry; multiple per day allowed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CravingRecord {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    /// Craving intensity, 1-10 inclusive
    pub intensity: u8,
    pub trigger: Option<String>,
    pub coping_strategy: Option<String>,
    pub duration_secs: Option<f64>,
    pub was_successful: bool,
}

impl CravingRecord {
    pub fn new(date: DateTime<Utc>, intensity: u8, was_successful: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            intensity,
            trigger: None,
            coping_strategy: None,
            duration_secs: None,
            was_successful,
        }
    }
}

/// User-defined numeric target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserGoal {
    pub id: Uuid,
    pub title: String,
    pub target_value: f64,
    pub current_value: f64,
    pub unit: String,
    pub icon: String,
    pub color: String,
    pub deadline: Option<DateTime<Utc>>,
    pub is_completed: bool,
}

impl UserGoal {
    /// Fraction of the target reached, clamped to [0, 1].
    ///
    /// A non-positive target degrades to 0 rather than dividing by zero.
    pub fn progress(&self) -> f64 {
        if self.target_value <= 0.0 {
            return 0.0;
        }
        (self.current_value / self.target_value).min(1.0)
    }
}

/// Achievement state for one catalog id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAchievement {
    pub id: Uuid,
    /// Stable key into the achievement catalog
    pub achievement_id: String,
    pub unlocked_at: Option<DateTime<Utc>>,
    /// Progress toward unlock, 0-1; pinned to 1.0 once unlocked
    pub progress: f64,
}

impl UserAchievement {
    /// A fresh, locked entry for the given catalog id.
    pub fn locked(achievement_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            achievement_id: achievement_id.into(),
            unlocked_at: None,
            progress: 0.0,
        }
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked_at.is_some()
    }
}

/// Notification preference block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationPreferences {
    pub enable_daily_reminders: bool,
    pub enable_motivation: bool,
    pub enable_craving_alerts: bool,
    pub enable_milestones: bool,
    pub quiet_hours_start: Option<DateTime<Utc>>,
    pub quiet_hours_end: Option<DateTime<Utc>>,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            enable_daily_reminders: true,
            enable_motivation: true,
            enable_craving_alerts: true,
            enable_milestones: true,
            quiet_hours_start: None,
            quiet_hours_end: None,
        }
    }
}

/// User preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    pub dark_mode: bool,
    pub selected_theme: String,
    pub enable_sounds: bool,
    pub enable_haptics: bool,
    pub language: String,
    pub notification_preferences: NotificationPreferences,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            dark_mode: false,
            selected_theme: "default".to_string(),
            enable_sounds: true,
            enable_haptics: true,
            language: "en".to_string(),
            notification_preferences: NotificationPreferences::default(),
        }
    }
}
