//! Achievement catalog and unlock engine
//!
//! The catalog is a data table mapping stable ids to optional unlock
//! predicates over the profile's derived stats. Ids without a wired
//! predicate stay locked until a rule lands; the evaluation loop never
//! needs to change for new entries.

use chrono::{DateTime, Utc};
use quitpath_shared::models::{Profile, UserAchievement};
use quitpath_shared::quit_metrics::QuitStats;
use tracing::debug;

/// One catalog entry: a stable id and, if wired, its unlock rule
pub struct AchievementRule {
    pub id: &'static str,
    pub predicate: Option<fn(&QuitStats) -> bool>,
}

fn first_day(stats: &QuitStats) -> bool {
    stats.days_since_quit >= 1
}

fn one_week(stats: &QuitStats) -> bool {
    stats.days_since_quit >= 7
}

fn hundred_saved(stats: &QuitStats) -> bool {
    stats.money_saved >= 100.0
}

fn one_month(stats: &QuitStats) -> bool {
    stats.days_since_quit >= 30
}

/// The fixed achievement catalog
pub const CATALOG: &[AchievementRule] = &[
    AchievementRule {
        id: "first_day",
        predicate: Some(first_day),
    },
    AchievementRule {
        id: "one_week",
        predicate: Some(one_week),
    },
    AchievementRule {
        id: "100_tl",
        predicate: Some(hundred_saved),
    },
    AchievementRule {
        id: "breath_master",
        predicate: None,
    },
    AchievementRule {
        id: "one_month",
        predicate: Some(one_month),
    },
    AchievementRule {
        id: "smoke_free_week",
        predicate: None,
    },
    AchievementRule {
        id: "craving_warrior",
        predicate: None,
    },
    AchievementRule {
        id: "three_months",
        predicate: None,
    },
    AchievementRule {
        id: "six_months",
        predicate: None,
    },
    AchievementRule {
        id: "one_year",
        predicate: None,
    },
];

/// A locked entry for every catalog id, in catalog order.
pub fn default_achievements() -> Vec<UserAchievement> {
    CATALOG
        .iter()
        .map(|rule| UserAchievement::locked(rule.id))
        .collect()
}

/// Achievement unlock evaluation
pub struct AchievementEngine;

impl AchievementEngine {
    /// Re-scan the full rule table against the profile's derived stats at
    /// `now` and unlock whatever newly qualifies.
    ///
    /// The locked-to-unlocked transition is one-directional: an already
    /// unlocked entry keeps its `unlocked_at` and progress untouched, and
    /// its id is never reported again. Returns the newly unlocked ids in
    /// catalog order.
    pub fn evaluate(
        profile: &Profile,
        achievements: &mut [UserAchievement],
        now: DateTime<Utc>,
    ) -> Vec<String> {
        let stats = profile.stats_at(now);
        let mut newly_unlocked = Vec::new();

        for rule in CATALOG {
            let Some(predicate) = rule.predicate else {
                continue;
            };
            if !predicate(&stats) {
                continue;
            }

            if let Some(entry) = achievements
                .iter_mut()
                .find(|a| a.achievement_id == rule.id && !a.is_unlocked())
            {
                entry.unlocked_at = Some(now);
                entry.progress = 1.0;
                debug!("achievement unlocked: {}", rule.id);
                newly_unlocked.push(rule.id.to_string());
            }
        }

        newly_unlocked
    }
}
