//! Events exposed to collaborator layers
//!
//! The notification layer is an external consumer: the core only records
//! that something happened and offers two ways to find out, a registered
//! callback or a poll-and-drain queue. Firing mechanics (notification
//! content, scheduling) are the collaborator's concern.

/// State changes the core announces to collaborators
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerEvent {
    /// An achievement transitioned from locked to unlocked
    AchievementUnlocked { id: String },
    /// A user goal reached completion
    MilestoneReached { label: String },
}

type Listener = Box<dyn Fn(&TrackerEvent)>;

/// Callback-or-poll channel for [`TrackerEvent`]s
#[derive(Default)]
pub struct EventChannel {
    listeners: Vec<Listener>,
    pending: Vec<TrackerEvent>,
}

impl EventChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback invoked synchronously on every emitted event.
    pub fn subscribe(&mut self, listener: impl Fn(&TrackerEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Notify listeners and queue the event for polling consumers.
    pub fn emit(&mut self, event: TrackerEvent) {
        for listener in &self.listeners {
            listener(&event);
        }
        self.pending.push(event);
    }

    /// Take every event emitted since the last drain, oldest first.
    pub fn drain(&mut self) -> Vec<TrackerEvent> {
        std::mem::take(&mut self.pending)
    }
}
