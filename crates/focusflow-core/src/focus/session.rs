//! Focus session controller.
//!
//! A session counts down one task's estimated time. Like the rest of the
//! core it has no internal thread: the caller invokes `tick()` once per
//! elapsed second, or `catch_up()` with the current wall-clock time.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running <-> Paused
//!            |           |
//!            +-> Completed <-+
//! ```
//!
//! Pausing and reporting distractions feed two counters. Once either crosses
//! its threshold the session offers burnout relief: a one-time shorter
//! countdown in exchange for bonus XP.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{SessionError, ValidationError};
use crate::events::Event;
use crate::gamification::Action;
use crate::task::Task;
use crate::Result;

/// Shortest countdown burnout relief will leave, in seconds.
const RELIEF_FLOOR_SECS: u64 = 60;

pub const MICRO_BREAK_MESSAGE: &str =
    "Take 2 minutes. Stretch. Breathe. Look at something far away. You got this.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Idle,
    Running,
    Paused,
    /// Terminal.
    Completed,
}

/// Thresholds and reward for burnout relief.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BurnoutPolicy {
    /// Pauses before relief is offered.
    pub pause_threshold: u32,
    /// Distraction reports before relief is offered.
    pub idle_threshold: u32,
    pub bonus_xp: u32,
}

impl Default for BurnoutPolicy {
    fn default() -> Self {
        Self {
            pause_threshold: 3,
            idle_threshold: 2,
            bonus_xp: 15,
        }
    }
}

/// What a finished session hands back to the state machine.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOutcome {
    pub task_id: String,
    /// Task reward plus bonus.
    pub xp_awarded: u32,
    pub bonus_xp: u32,
    /// Whole minutes actually counted down, rounded.
    pub focus_minutes: u32,
    pub event: Event,
}

impl SessionOutcome {
    /// Actions to dispatch, in order, as one batch.
    pub fn actions(&self) -> Vec<Action> {
        let mut actions = vec![
            Action::CompleteTask(self.task_id.clone()),
            Action::AddXp(self.xp_awarded),
        ];
        if self.focus_minutes > 0 {
            actions.push(Action::AddFocusMinutes(self.focus_minutes));
        }
        actions
    }
}

/// One task's focus session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FocusSession {
    task: Task,
    #[serde(default)]
    policy: BurnoutPolicy,
    state: SessionState,
    /// Fixed at creation: estimated minutes times sixty.
    total_secs: u64,
    remaining_secs: u64,
    /// Seconds actually counted down, used for focus-minute accounting.
    #[serde(default)]
    focused_secs: u64,
    #[serde(default)]
    pause_count: u32,
    #[serde(default)]
    idle_count: u32,
    #[serde(default)]
    bonus_xp: u32,
    #[serde(default)]
    burnout_prompt: bool,
    #[serde(default)]
    relief_taken: bool,
    /// Wall-clock mark the next `catch_up` measures from, while running.
    #[serde(default)]
    last_mark: Option<DateTime<Utc>>,
}

impl FocusSession {
    /// Bind a session to a task.
    ///
    /// # Errors
    ///
    /// Refuses completed tasks and tasks without an estimated time.
    pub fn new(task: Task, policy: BurnoutPolicy) -> Result<Self> {
        if task.completed {
            return Err(SessionError::TaskAlreadyCompleted(task.id).into());
        }
        if task.estimated_time == 0 {
            return Err(ValidationError::ZeroDuration(task.id).into());
        }
        let total_secs = task.duration_secs();
        Ok(Self {
            task,
            policy,
            state: SessionState::Idle,
            total_secs,
            remaining_secs: total_secs,
            focused_secs: 0,
            pause_count: 0,
            idle_count: 0,
            bonus_xp: 0,
            burnout_prompt: false,
            relief_taken: false,
            last_mark: None,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn task(&self) -> &Task {
        &self.task
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn total_secs(&self) -> u64 {
        self.total_secs
    }

    pub fn pause_count(&self) -> u32 {
        self.pause_count
    }

    pub fn idle_count(&self) -> u32 {
        self.idle_count
    }

    pub fn bonus_xp(&self) -> u32 {
        self.bonus_xp
    }

    /// Whether the burnout relief offer is waiting for an answer.
    pub fn burnout_prompt_pending(&self) -> bool {
        self.burnout_prompt
    }

    /// XP the session will award if completed now.
    pub fn projected_xp(&self) -> u32 {
        self.task.xp_reward.saturating_add(self.bonus_xp)
    }

    /// 0.0 .. 100.0 progress against the original duration.
    pub fn progress_pct(&self) -> f64 {
        if self.total_secs == 0 {
            return 0.0;
        }
        let done = self.total_secs.saturating_sub(self.remaining_secs);
        (done as f64 / self.total_secs as f64 * 100.0).min(100.0)
    }

    /// `MM:SS` rendering of the remaining time.
    pub fn remaining_display(&self) -> String {
        format!("{:02}:{:02}", self.remaining_secs / 60, self.remaining_secs % 60)
    }

    pub fn snapshot(&self) -> Event {
        Event::SessionSnapshot {
            state: self.state,
            task_id: self.task.id.clone(),
            task_title: self.task.title.clone(),
            remaining_secs: self.remaining_secs,
            total_secs: self.total_secs,
            progress_pct: self.progress_pct(),
            pause_count: self.pause_count,
            idle_count: self.idle_count,
            bonus_xp: self.bonus_xp,
            burnout_prompt: self.burnout_prompt,
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Idle or paused -> running, resuming from the remaining time.
    pub fn start(&mut self) -> Option<Event> {
        match self.state {
            SessionState::Idle | SessionState::Paused => {
                self.state = SessionState::Running;
                self.last_mark = Some(Utc::now());
                Some(Event::SessionStarted {
                    task_id: self.task.id.clone(),
                    remaining_secs: self.remaining_secs,
                    at: Utc::now(),
                })
            }
            SessionState::Running | SessionState::Completed => None,
        }
    }

    /// Running -> paused. Counts toward burnout detection.
    pub fn pause(&mut self) -> Vec<Event> {
        if self.state != SessionState::Running {
            return Vec::new();
        }
        self.state = SessionState::Paused;
        self.last_mark = None;
        self.pause_count = self.pause_count.saturating_add(1);
        let mut events = vec![Event::SessionPaused {
            remaining_secs: self.remaining_secs,
            pause_count: self.pause_count,
            at: Utc::now(),
        }];
        events.extend(self.check_burnout());
        events
    }

    /// Count a distraction without changing the run state.
    pub fn report_distraction(&mut self) -> Vec<Event> {
        if self.state == SessionState::Completed {
            return Vec::new();
        }
        self.idle_count = self.idle_count.saturating_add(1);
        let mut events = vec![Event::DistractionReported {
            idle_count: self.idle_count,
            at: Utc::now(),
        }];
        events.extend(self.check_burnout());
        events
    }

    /// Pause for a suggested short break. Not counted as a pause.
    pub fn micro_break(&mut self) -> Option<Event> {
        match self.state {
            SessionState::Completed => None,
            _ => {
                if self.state == SessionState::Running {
                    self.state = SessionState::Paused;
                    self.last_mark = None;
                }
                Some(Event::MicroBreakSuggested {
                    message: MICRO_BREAK_MESSAGE.to_string(),
                    at: Utc::now(),
                })
            }
        }
    }

    /// Take the relief offer: shorter countdown, bonus XP. At most once.
    ///
    /// The countdown becomes `max(60, floor(remaining * 0.7))` seconds but
    /// never grows.
    pub fn accept_relief(&mut self) -> std::result::Result<Event, SessionError> {
        if self.state == SessionState::Completed {
            return Err(SessionError::SessionCompleted);
        }
        if !self.burnout_prompt {
            return Err(SessionError::NoPendingPrompt);
        }
        let reduced = (self.remaining_secs * 7 / 10).max(RELIEF_FLOOR_SECS);
        self.remaining_secs = reduced.min(self.remaining_secs);
        self.bonus_xp = self.bonus_xp.saturating_add(self.policy.bonus_xp);
        self.burnout_prompt = false;
        self.relief_taken = true;
        tracing::debug!(
            remaining_secs = self.remaining_secs,
            bonus_xp = self.bonus_xp,
            "burnout relief accepted"
        );
        Ok(Event::BurnoutReliefAccepted {
            remaining_secs: self.remaining_secs,
            bonus_xp: self.bonus_xp,
            at: Utc::now(),
        })
    }

    /// Dismiss the relief offer. Counters are kept, so it can come back.
    pub fn decline_relief(&mut self) -> std::result::Result<Event, SessionError> {
        if !self.burnout_prompt {
            return Err(SessionError::NoPendingPrompt);
        }
        self.burnout_prompt = false;
        Ok(Event::BurnoutReliefDeclined { at: Utc::now() })
    }

    /// Count down one second. Completes the session at zero.
    pub fn tick(&mut self) -> Option<SessionOutcome> {
        self.advance(1)
    }

    /// Apply every whole second elapsed since the last mark.
    ///
    /// Sub-second remainders carry over to the next call.
    pub fn catch_up(&mut self, now: DateTime<Utc>) -> Option<SessionOutcome> {
        if self.state != SessionState::Running {
            return None;
        }
        let mark = *self.last_mark.get_or_insert(now);
        let whole_secs = (now - mark).num_seconds();
        if whole_secs <= 0 {
            return None;
        }
        self.last_mark = Some(mark + chrono::Duration::seconds(whole_secs));
        self.advance(whole_secs as u64)
    }

    /// Finish the session, explicitly or because time ran out.
    pub fn complete(&mut self) -> Option<SessionOutcome> {
        if self.state == SessionState::Completed {
            return None;
        }
        self.state = SessionState::Completed;
        self.last_mark = None;
        self.burnout_prompt = false;

        let xp_awarded = self.projected_xp();
        let focus_minutes = u32::try_from((self.focused_secs + 30) / 60).unwrap_or(u32::MAX);
        tracing::debug!(task_id = %self.task.id, xp_awarded, focus_minutes, "focus session completed");
        Some(SessionOutcome {
            task_id: self.task.id.clone(),
            xp_awarded,
            bonus_xp: self.bonus_xp,
            focus_minutes,
            event: Event::SessionCompleted {
                task_id: self.task.id.clone(),
                xp_awarded,
                bonus_xp: self.bonus_xp,
                focus_minutes,
                at: Utc::now(),
            },
        })
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn advance(&mut self, secs: u64) -> Option<SessionOutcome> {
        if self.state != SessionState::Running {
            return None;
        }
        let step = secs.min(self.remaining_secs);
        self.remaining_secs -= step;
        self.focused_secs = self.focused_secs.saturating_add(step);
        if self.remaining_secs == 0 {
            return self.complete();
        }
        None
    }

    fn check_burnout(&mut self) -> Option<Event> {
        if self.relief_taken || self.burnout_prompt {
            return None;
        }
        let tripped = self.pause_count >= self.policy.pause_threshold
            || self.idle_count >= self.policy.idle_threshold;
        if !tripped {
            return None;
        }
        self.burnout_prompt = true;
        tracing::debug!(
            pause_count = self.pause_count,
            idle_count = self.idle_count,
            "burnout detected"
        );
        Some(Event::BurnoutDetected {
            pause_count: self.pause_count,
            idle_count: self.idle_count,
            at: Utc::now(),
        })
    }
}
