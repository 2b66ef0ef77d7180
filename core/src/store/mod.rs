//! The tracker record store
//!
//! Single process-wide owner of the profile, daily records, craving
//! records, goals, achievements, settings, and the onboarding flag.
//! Explicitly constructed with an injected [`Storage`] backend:
//! load-at-startup, save-on-mutation, no hidden global.
//!
//! Failure semantics: reads that fail or decode badly are treated as
//! absent (self-healing via defaults where defaults exist); writes are
//! best-effort and absorbed with a warning. The in-memory state is the
//! source of truth after every mutation.

use chrono::{DateTime, Duration, Local, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use quitpath_shared::models::{
    AppSettings, CravingRecord, DailyRecord, Profile, UserAchievement, UserGoal,
};

use crate::events::{EventChannel, TrackerEvent};
use crate::services::achievements::{default_achievements, AchievementEngine};
use crate::storage::{keys, Storage};

/// Whether two instants fall on the same day of the caller's local calendar.
fn same_local_day(a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
    a.with_timezone(&Local).date_naive() == b.with_timezone(&Local).date_naive()
}

/// Built-in goals created when storage holds none
fn default_goals(now: DateTime<Utc>) -> Vec<UserGoal> {
    vec![
        UserGoal {
            id: Uuid::new_v4(),
            title: "Smoke-Free for 30 Days".to_string(),
            target_value: 30.0,
            current_value: 0.0,
            unit: "days".to_string(),
            icon: "flame.fill".to_string(),
            color: "red".to_string(),
            deadline: Some(now + Duration::days(30)),
            is_completed: false,
        },
        UserGoal {
            id: Uuid::new_v4(),
            title: "Save 500 TL".to_string(),
            target_value: 500.0,
            current_value: 0.0,
            unit: "TL".to_string(),
            icon: "banknote.fill".to_string(),
            color: "green".to_string(),
            deadline: None,
            is_completed: false,
        },
        UserGoal {
            id: Uuid::new_v4(),
            title: "Complete 20 Workouts".to_string(),
            target_value: 20.0,
            current_value: 0.0,
            unit: "workouts".to_string(),
            icon: "figure.run".to_string(),
            color: "blue".to_string(),
            deadline: None,
            is_completed: false,
        },
    ]
}

/// Durable home for all tracked state
pub struct TrackerStore {
    profile: Option<Profile>,
    daily_records: Vec<DailyRecord>,
    craving_records: Vec<CravingRecord>,
    goals: Vec<UserGoal>,
    achievements: Vec<UserAchievement>,
    settings: AppSettings,
    has_completed_onboarding: bool,
    storage: Box<dyn Storage>,
    events: EventChannel,
}

impl TrackerStore {
    /// Construct over the given backend and load everything it holds.
    pub fn open(storage: Box<dyn Storage>) -> Self {
        let mut store = Self {
            profile: None,
            daily_records: Vec::new(),
            craving_records: Vec::new(),
            goals: Vec::new(),
            achievements: Vec::new(),
            settings: AppSettings::default(),
            has_completed_onboarding: false,
            storage,
            events: EventChannel::new(),
        };
        store.load();
        store
    }

    /// Read every entity from storage independently.
    ///
    /// Missing or undecodable daily records, craving records, or settings
    /// yield their empty/default value. Missing goals or achievements
    /// trigger creation of the built-in defaults, which are persisted
    /// immediately. Never fails to the caller.
    pub fn load(&mut self) {
        self.profile = read_entry(&*self.storage, keys::USER_PROFILE);
        self.daily_records =
            read_entry(&*self.storage, keys::DAILY_RECORDS).unwrap_or_default();
        self.craving_records =
            read_entry(&*self.storage, keys::CRAVING_RECORDS).unwrap_or_default();
        self.settings = read_entry(&*self.storage, keys::APP_SETTINGS).unwrap_or_default();
        self.has_completed_onboarding =
            read_entry(&*self.storage, keys::HAS_COMPLETED_ONBOARDING).unwrap_or(false);

        match read_entry::<Vec<UserGoal>>(&*self.storage, keys::USER_GOALS) {
            Some(goals) => self.goals = goals,
            None => {
                info!("no stored goals, creating defaults");
                self.goals = default_goals(Utc::now());
                persist(&mut *self.storage, keys::USER_GOALS, &self.goals);
            }
        }

        match read_entry::<Vec<UserAchievement>>(&*self.storage, keys::ACHIEVEMENTS) {
            Some(achievements) => self.achievements = achievements,
            None => {
                info!("no stored achievements, creating catalog defaults");
                self.achievements = default_achievements();
                persist(&mut *self.storage, keys::ACHIEVEMENTS, &self.achievements);
            }
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    pub fn daily_records(&self) -> &[DailyRecord] {
        &self.daily_records
    }

    pub fn craving_records(&self) -> &[CravingRecord] {
        &self.craving_records
    }

    pub fn goals(&self) -> &[UserGoal] {
        &self.goals
    }

    pub fn achievements(&self) -> &[UserAchievement] {
        &self.achievements
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    pub fn has_completed_onboarding(&self) -> bool {
        self.has_completed_onboarding
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Replace the profile and persist it.
    pub fn save_profile(&mut self, profile: Profile) {
        self.profile = Some(profile);
        persist(&mut *self.storage, keys::USER_PROFILE, &self.profile);
    }

    /// Insert or replace the daily record for its calendar day.
    ///
    /// A record already stored for the same local calendar day is replaced
    /// in place; otherwise the record is appended. The collection is then
    /// re-sorted newest first, persisted, and achievement rules are
    /// re-evaluated against the current profile.
    pub fn upsert_daily_record(&mut self, record: DailyRecord) {
        if let Some(existing) = self
            .daily_records
            .iter_mut()
            .find(|r| same_local_day(r.date, record.date))
        {
            *existing = record;
        } else {
            self.daily_records.push(record);
        }
        self.daily_records.sort_by(|a, b| b.date.cmp(&a.date));
        persist(&mut *self.storage, keys::DAILY_RECORDS, &self.daily_records);

        self.evaluate_achievements();
    }

    /// Append a craving entry; multiple per day are expected.
    pub fn append_craving_record(&mut self, record: CravingRecord) {
        self.craving_records.push(record);
        self.craving_records.sort_by(|a, b| b.date.cmp(&a.date));
        persist(
            &mut *self.storage,
            keys::CRAVING_RECORDS,
            &self.craving_records,
        );
    }

    /// Insert or replace a goal by id.
    ///
    /// A goal reaching its target (progress 1.0) on this write is pinned
    /// completed and announced once as a [`TrackerEvent::MilestoneReached`];
    /// later writes to an already-completed goal stay silent.
    pub fn upsert_goal(&mut self, mut goal: UserGoal) {
        let was_completed = self
            .goals
            .iter()
            .find(|g| g.id == goal.id)
            .map(|g| g.is_completed)
            .unwrap_or(false);

        let reached_target = goal.is_completed || goal.progress() >= 1.0;
        if reached_target {
            goal.is_completed = true;
        }
        let title = goal.title.clone();

        if let Some(existing) = self.goals.iter_mut().find(|g| g.id == goal.id) {
            *existing = goal;
        } else {
            self.goals.push(goal);
        }
        persist(&mut *self.storage, keys::USER_GOALS, &self.goals);

        if reached_target && !was_completed {
            self.events
                .emit(TrackerEvent::MilestoneReached { label: title });
        }
    }

    /// Replace the settings and persist them.
    pub fn save_settings(&mut self, settings: AppSettings) {
        self.settings = settings;
        persist(&mut *self.storage, keys::APP_SETTINGS, &self.settings);
    }

    /// One-way: mark onboarding as finished.
    pub fn complete_onboarding(&mut self) {
        self.has_completed_onboarding = true;
        persist(
            &mut *self.storage,
            keys::HAS_COMPLETED_ONBOARDING,
            &self.has_completed_onboarding,
        );
    }

    /// Unconditional, irreversible wipe of every entity.
    pub fn reset_all(&mut self) {
        info!("resetting all tracker data");
        self.profile = None;
        self.daily_records.clear();
        self.craving_records.clear();
        self.goals.clear();
        self.achievements.clear();
        self.settings = AppSettings::default();
        self.has_completed_onboarding = false;

        for key in keys::ALL {
            if let Err(err) = self.storage.remove(key) {
                warn!("failed to remove {key}: {err}");
            }
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// The daily record, if any, dated on the caller's current local day.
    pub fn record_for_today(&self) -> Option<&DailyRecord> {
        let now = Utc::now();
        self.daily_records
            .iter()
            .find(|r| same_local_day(r.date, now))
    }

    /// Daily records within the trailing `days`-day window ending now.
    ///
    /// Calendar-window semantics, boundary inclusive at exactly `days` days
    /// ago. Not the same windowing as [`Self::success_rate`].
    pub fn records_in_window(&self, days: i64) -> Vec<DailyRecord> {
        self.records_in_window_at(days, Utc::now())
    }

    /// [`Self::records_in_window`] at an explicit instant.
    pub fn records_in_window_at(&self, days: i64, now: DateTime<Utc>) -> Vec<DailyRecord> {
        let cutoff = now - Duration::days(days);
        self.daily_records
            .iter()
            .filter(|r| r.date >= cutoff)
            .cloned()
            .collect()
    }

    /// Fraction of smoke-free days over the most recent `days` records.
    ///
    /// Recency semantics: takes the first `min(days, available)` records
    /// after the newest-first sort, deliberately not the calendar window of
    /// [`Self::records_in_window`]. Returns 0.0 when no records qualify.
    pub fn success_rate(&self, days: usize) -> f64 {
        let recent = &self.daily_records[..self.daily_records.len().min(days)];
        if recent.is_empty() {
            return 0.0;
        }
        let clean = recent.iter().filter(|r| !r.did_smoke).count();
        clean as f64 / recent.len() as f64
    }

    // ========================================================================
    // Events
    // ========================================================================

    /// Register a callback for every emitted [`TrackerEvent`].
    pub fn subscribe(&mut self, listener: impl Fn(&TrackerEvent) + 'static) {
        self.events.subscribe(listener);
    }

    /// Drain events emitted since the last poll, oldest first.
    pub fn drain_events(&mut self) -> Vec<TrackerEvent> {
        self.events.drain()
    }

    /// Re-scan achievement rules against the current profile; no profile
    /// means nothing to evaluate.
    fn evaluate_achievements(&mut self) {
        let Some(profile) = self.profile.as_ref() else {
            return;
        };

        let newly_unlocked =
            AchievementEngine::evaluate(profile, &mut self.achievements, Utc::now());
        if newly_unlocked.is_empty() {
            return;
        }

        for id in newly_unlocked {
            self.events.emit(TrackerEvent::AchievementUnlocked { id });
        }
        persist(&mut *self.storage, keys::ACHIEVEMENTS, &self.achievements);
    }
}

/// Decode the entry under `key`, treating failures as absence.
fn read_entry<T: DeserializeOwned>(storage: &dyn Storage, key: &str) -> Option<T> {
    let bytes = match storage.get(key) {
        Ok(Some(bytes)) => bytes,
        Ok(None) => return None,
        Err(err) => {
            warn!("failed to read {key}, treating as absent: {err}");
            return None;
        }
    };

    match serde_json::from_slice(&bytes) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!("undecodable payload under {key}, treating as absent: {err}");
            None
        }
    }
}

/// Best-effort write; failures are logged, never raised.
fn persist<T: Serialize>(storage: &mut dyn Storage, key: &str, value: &T) {
    match serde_json::to_vec(value) {
        Ok(bytes) => {
            if let Err(err) = storage.set(key, &bytes) {
                warn!("failed to persist {key}: {err}");
            }
        }
        Err(err) => warn!("failed to encode {key}: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStorage, StorageError};
    use proptest::prelude::*;
    use quitpath_shared::models::MoodLevel;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Cloneable handle over one backing map, for reopen tests
    #[derive(Clone, Default)]
    struct SharedMemoryStorage(Rc<RefCell<MemoryStorage>>);

    impl Storage for SharedMemoryStorage {
        fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
            self.0.borrow().get(key)
        }

        fn set(&mut self, key: &str, bytes: &[u8]) -> Result<(), StorageError> {
            self.0.borrow_mut().set(key, bytes)
        }

        fn remove(&mut self, key: &str) -> Result<(), StorageError> {
            self.0.borrow_mut().remove(key)
        }
    }

    fn store() -> TrackerStore {
        TrackerStore::open(Box::new(MemoryStorage::new()))
    }

    fn record(days_ago: i64, did_smoke: bool) -> DailyRecord {
        DailyRecord::new(
            Utc::now() - Duration::days(days_ago),
            did_smoke,
            MoodLevel::Neutral,
            0,
        )
    }

    fn craving(days_ago: i64, intensity: u8, was_successful: bool) -> CravingRecord {
        CravingRecord::new(Utc::now() - Duration::days(days_ago), intensity, was_successful)
    }

    fn profile(days_ago: i64) -> Profile {
        Profile {
            name: "Deniz".to_string(),
            quit_instant: Utc::now() - Duration::days(days_ago),
            cigarettes_per_day: 20,
            price_per_pack: 60.0,
            cigarettes_per_pack: 20,
            motivations: vec!["family".to_string()],
            avatar: None,
        }
    }

    fn goal(target: f64, current: f64) -> UserGoal {
        UserGoal {
            id: Uuid::new_v4(),
            title: "Save 500 TL".to_string(),
            target_value: target,
            current_value: current,
            unit: "TL".to_string(),
            icon: "banknote.fill".to_string(),
            color: "green".to_string(),
            deadline: None,
            is_completed: false,
        }
    }

    #[test]
    fn test_fresh_store_creates_defaults() {
        let store = store();
        assert!(store.profile().is_none());
        assert!(store.daily_records().is_empty());
        assert!(store.craving_records().is_empty());
        assert_eq!(store.goals().len(), 3);
        assert_eq!(store.achievements().len(), 10);
        assert!(!store.has_completed_onboarding());
        assert_eq!(store.settings(), &AppSettings::default());
    }

    #[test]
    fn test_upsert_same_day_replaces() {
        let mut store = store();
        let day = Utc::now();

        store.upsert_daily_record(DailyRecord::new(day, true, MoodLevel::Bad, 5));
        store.upsert_daily_record(DailyRecord::new(day, false, MoodLevel::Neutral, 3));
        let last = DailyRecord::new(day, false, MoodLevel::Good, 1);
        store.upsert_daily_record(last.clone());

        assert_eq!(store.daily_records().len(), 1);
        assert_eq!(store.daily_records()[0], last);
    }

    #[test]
    fn test_upsert_distinct_days_sorted_newest_first() {
        let mut store = store();
        store.upsert_daily_record(record(2, false));
        store.upsert_daily_record(record(0, false));
        store.upsert_daily_record(record(1, true));

        let dates: Vec<_> = store.daily_records().iter().map(|r| r.date).collect();
        let mut sorted = dates.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(dates, sorted);
        assert_eq!(store.daily_records().len(), 3);
    }

    #[test]
    fn test_record_for_today() {
        let mut store = store();
        assert!(store.record_for_today().is_none());

        store.upsert_daily_record(record(1, true));
        assert!(store.record_for_today().is_none());

        let today = record(0, false);
        store.upsert_daily_record(today.clone());
        assert_eq!(store.record_for_today(), Some(&today));
    }

    #[test]
    fn test_records_in_window_boundary_inclusive() {
        let now = Utc::now();
        let mut store = store();
        store.upsert_daily_record(record(0, false));
        store.upsert_daily_record(record(7, false));
        store.upsert_daily_record(record(8, true));

        let window = store.records_in_window_at(7, now);
        assert_eq!(window.len(), 2);
        assert!(window.iter().all(|r| r.date >= now - Duration::days(7)));
    }

    #[test]
    fn test_success_rate_empty_is_zero() {
        let store = store();
        assert_eq!(store.success_rate(7), 0.0);
        assert_eq!(store.success_rate(0), 0.0);
    }

    #[test]
    fn test_success_rate_most_recent_n() {
        let mut store = store();
        store.upsert_daily_record(record(0, false));
        store.upsert_daily_record(record(1, false));
        store.upsert_daily_record(record(2, true));

        // all three: two clean out of three
        assert!((store.success_rate(7) - 2.0 / 3.0).abs() < f64::EPSILON);
        // only the two most recent, both clean
        assert_eq!(store.success_rate(2), 1.0);
        assert_eq!(store.success_rate(0), 0.0);
    }

    #[test]
    fn test_craving_records_append_only_sorted() {
        let mut store = store();
        store.append_craving_record(craving(1, 5, true));
        store.append_craving_record(craving(0, 8, false));
        // same day as an existing entry must not merge
        store.append_craving_record(craving(0, 3, true));

        assert_eq!(store.craving_records().len(), 3);
        let dates: Vec<_> = store.craving_records().iter().map(|c| c.date).collect();
        let mut sorted = dates.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(dates, sorted);
    }

    #[test]
    fn test_upsert_goal_replaces_by_id() {
        let mut store = store();
        let baseline = store.goals().len();

        let mut g = goal(500.0, 100.0);
        store.upsert_goal(g.clone());
        assert_eq!(store.goals().len(), baseline + 1);

        g.current_value = 250.0;
        store.upsert_goal(g.clone());
        assert_eq!(store.goals().len(), baseline + 1);
        let stored = store.goals().iter().find(|x| x.id == g.id).unwrap();
        assert_eq!(stored.current_value, 250.0);
    }

    #[test]
    fn test_goal_completion_emits_milestone_once() {
        let mut store = store();
        let mut g = goal(500.0, 100.0);
        store.upsert_goal(g.clone());
        assert!(store.drain_events().is_empty());

        g.current_value = 500.0;
        store.upsert_goal(g.clone());
        let events = store.drain_events();
        assert_eq!(
            events,
            vec![TrackerEvent::MilestoneReached {
                label: "Save 500 TL".to_string()
            }]
        );
        assert!(store.goals().iter().find(|x| x.id == g.id).unwrap().is_completed);

        // further writes to the completed goal stay silent
        g.current_value = 600.0;
        store.upsert_goal(g);
        assert!(store.drain_events().is_empty());
    }

    #[test]
    fn test_daily_record_unlocks_achievements() {
        let mut store = store();
        store.save_profile(profile(10));
        store.upsert_daily_record(record(0, false));

        let ids: Vec<_> = store
            .drain_events()
            .into_iter()
            .map(|e| match e {
                TrackerEvent::AchievementUnlocked { id } => id,
                other => panic!("unexpected event {other:?}"),
            })
            .collect();
        assert_eq!(ids, vec!["first_day", "one_week", "100_tl"]);

        // evaluation is idempotent across mutations
        store.upsert_daily_record(record(1, false));
        assert!(store.drain_events().is_empty());
    }

    #[test]
    fn test_no_profile_no_achievement_evaluation() {
        let mut store = store();
        store.upsert_daily_record(record(0, false));
        assert!(store.drain_events().is_empty());
        assert!(store.achievements().iter().all(|a| !a.is_unlocked()));
    }

    #[test]
    fn test_subscriber_sees_unlocks() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);

        let mut store = store();
        store.subscribe(move |event| {
            if let TrackerEvent::AchievementUnlocked { id } = event {
                sink.borrow_mut().push(id.clone());
            }
        });

        store.save_profile(profile(1));
        store.upsert_daily_record(record(0, false));
        assert_eq!(seen.borrow().as_slice(), ["first_day"]);
    }

    #[test]
    fn test_round_trip_every_entity() {
        let shared = SharedMemoryStorage::default();

        let mut first = TrackerStore::open(Box::new(shared.clone()));
        first.save_profile(profile(10));
        first.upsert_daily_record(record(0, false));
        first.append_craving_record(craving(0, 7, true));
        first.upsert_goal(goal(500.0, 120.0));
        let mut settings = AppSettings::default();
        settings.dark_mode = true;
        first.save_settings(settings.clone());
        first.complete_onboarding();

        let second = TrackerStore::open(Box::new(shared));
        assert_eq!(second.profile(), first.profile());
        assert_eq!(second.daily_records(), first.daily_records());
        assert_eq!(second.craving_records(), first.craving_records());
        assert_eq!(second.goals(), first.goals());
        assert_eq!(second.achievements(), first.achievements());
        assert_eq!(second.settings(), &settings);
        assert!(second.has_completed_onboarding());
    }

    #[test]
    fn test_reset_all_then_load_yields_defaults() {
        let shared = SharedMemoryStorage::default();

        let mut store = TrackerStore::open(Box::new(shared.clone()));
        store.save_profile(profile(10));
        store.upsert_daily_record(record(0, false));
        store.complete_onboarding();

        store.reset_all();
        assert!(store.profile().is_none());
        assert!(store.daily_records().is_empty());
        assert!(store.goals().is_empty());
        assert!(store.achievements().is_empty());
        assert!(!store.has_completed_onboarding());
        assert_eq!(store.settings(), &AppSettings::default());

        // a reload self-heals the built-in defaults
        store.load();
        assert!(store.profile().is_none());
        assert!(store.daily_records().is_empty());
        assert_eq!(store.goals().len(), 3);
        assert_eq!(store.achievements().len(), 10);
        assert!(store.achievements().iter().all(|a| !a.is_unlocked()));
        assert!(!store.has_completed_onboarding());
    }

    #[test]
    fn test_corrupt_payloads_treated_as_absent() {
        let mut backing = MemoryStorage::new();
        backing.set(keys::DAILY_RECORDS, b"{not json").unwrap();
        backing.set(keys::USER_GOALS, b"\xff\xfe").unwrap();
        backing.set(keys::APP_SETTINGS, b"42").unwrap();

        let store = TrackerStore::open(Box::new(backing));
        assert!(store.daily_records().is_empty());
        assert_eq!(store.goals().len(), 3);
        assert_eq!(store.settings(), &AppSettings::default());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        /// Property: any upsert sequence leaves at most one record per
        /// calendar day, sorted newest first
        #[test]
        fn prop_one_record_per_day(
            writes in prop::collection::vec((0i64..5, any::<bool>()), 1..20)
        ) {
            let mut store = store();
            for (days_ago, did_smoke) in writes {
                store.upsert_daily_record(record(days_ago, did_smoke));
            }

            let records = store.daily_records();
            for pair in records.windows(2) {
                prop_assert!(pair[0].date > pair[1].date);
                prop_assert!(!same_local_day(pair[0].date, pair[1].date));
            }
        }
    }
}
