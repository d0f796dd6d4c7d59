use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::focus::SessionState;

/// Every state change in the system produces an Event.
/// The presentation layer renders them; a level-up or a new badge is
/// celebrated from these signals, never from state fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    ProfileUpdated {
        has_onboarded: bool,
        is_authenticated: bool,
        at: DateTime<Utc>,
    },
    TasksAdded {
        count: usize,
        at: DateTime<Utc>,
    },
    TaskCompleted {
        task_id: String,
        tasks_completed: u32,
        at: DateTime<Utc>,
    },
    TaskDeleted {
        task_id: String,
        at: DateTime<Utc>,
    },
    XpAwarded {
        amount: u32,
        total_xp: u32,
        at: DateTime<Utc>,
    },
    LeveledUp {
        from: u32,
        to: u32,
        at: DateTime<Utc>,
    },
    StreakChanged {
        from: u32,
        to: u32,
        at: DateTime<Utc>,
    },
    BadgeEarned {
        badge_id: String,
        name: String,
        at: DateTime<Utc>,
    },
    FocusMinutesAdded {
        minutes: u32,
        total_minutes: u32,
        at: DateTime<Utc>,
    },
    StateReset {
        at: DateTime<Utc>,
    },
    SessionStarted {
        task_id: String,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    SessionPaused {
        remaining_secs: u64,
        pause_count: u32,
        at: DateTime<Utc>,
    },
    DistractionReported {
        idle_count: u32,
        at: DateTime<Utc>,
    },
    /// Pause/idle counters crossed a threshold; relief is on offer.
    BurnoutDetected {
        pause_count: u32,
        idle_count: u32,
        at: DateTime<Utc>,
    },
    BurnoutReliefAccepted {
        remaining_secs: u64,
        bonus_xp: u32,
        at: DateTime<Utc>,
    },
    BurnoutReliefDeclined {
        at: DateTime<Utc>,
    },
    MicroBreakSuggested {
        message: String,
        at: DateTime<Utc>,
    },
    SessionCompleted {
        task_id: String,
        xp_awarded: u32,
        bonus_xp: u32,
        focus_minutes: u32,
        at: DateTime<Utc>,
    },
    /// The session was dropped before it finished; nothing is granted.
    SessionAbandoned {
        task_id: String,
        at: DateTime<Utc>,
    },
    /// The session finished but its task was deleted or completed meanwhile.
    SessionRewardSkipped {
        task_id: String,
        at: DateTime<Utc>,
    },
    SessionSnapshot {
        state: SessionState,
        task_id: String,
        task_title: String,
        remaining_secs: u64,
        total_secs: u64,
        progress_pct: f64,
        pause_count: u32,
        idle_count: u32,
        bonus_xp: u32,
        burnout_prompt: bool,
        at: DateTime<Utc>,
    },
}
