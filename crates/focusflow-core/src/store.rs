//! The application state store.
//!
//! [`Store`] owns the current [`AppState`], a persistence backend and a
//! clock. Every mutation goes through [`crate::gamification::apply`] and the
//! whole state is written back after each dispatch. Persistence failures
//! are logged and never surface; the in-memory state stays authoritative.
//!
//! A stored document that cannot be loaded is never overwritten: it is moved
//! aside through [`StateBackend::set_aside`] first, and if that fails the
//! store keeps running in memory without writing.

use chrono::Utc;

use crate::clock::{Clock, SystemClock};
use crate::error::ValidationError;
use crate::events::Event;
use crate::focus::SessionOutcome;
use crate::gamification::{apply, Action};
use crate::state::AppState;
use crate::storage::{document, StateBackend};

pub struct Store<B: StateBackend, C: Clock = SystemClock> {
    backend: B,
    clock: C,
    state: AppState,
    pretty: bool,
    writable: bool,
}

impl<B: StateBackend> Store<B> {
    /// Open against the system clock.
    pub fn with_backend(backend: B) -> Self {
        Self::open(backend, SystemClock)
    }
}

impl<B: StateBackend, C: Clock> Store<B, C> {
    /// Load the stored state, falling back to defaults on any failure.
    pub fn open(backend: B, clock: C) -> Self {
        let (state, writable) = match backend.load() {
            Ok(None) => (AppState::default(), true),
            Ok(Some(text)) => match document::decode(&text) {
                Ok(state) => (state, true),
                Err(e) => {
                    tracing::warn!(error = %e, "unreadable state document, starting from defaults");
                    (AppState::default(), Self::move_aside(&backend))
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, "failed to load state, starting from defaults");
                (AppState::default(), false)
            }
        };
        Self {
            backend,
            clock,
            state,
            pretty: true,
            writable,
        }
    }

    fn move_aside(backend: &B) -> bool {
        match backend.set_aside() {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(error = %e, "cannot move unreadable state aside, changes stay in memory");
                false
            }
        }
    }

    /// Pretty-print the persisted document (default `true`).
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    /// Apply one action and persist.
    pub fn dispatch(&mut self, action: Action) -> Vec<Event> {
        self.dispatch_all([action])
    }

    /// Apply actions in order at one moment, persisting once at the end.
    ///
    /// Nothing is written when every action was a no-op.
    pub fn dispatch_all(&mut self, actions: impl IntoIterator<Item = Action>) -> Vec<Event> {
        let at = self.clock.moment();
        let mut events = Vec::new();
        for action in actions {
            tracing::debug!(?action, "dispatch");
            let transition = apply(std::mem::take(&mut self.state), action, at);
            self.state = transition.state;
            events.extend(transition.events);
        }
        if !events.is_empty() {
            self.persist();
        }
        events
    }

    /// Complete a pending task and grant its reward as one batch.
    ///
    /// Completing an already completed task is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownTask`] if no task has this id.
    pub fn complete_task(&mut self, task_id: &str) -> Result<Vec<Event>, ValidationError> {
        let task = self
            .state
            .find_task(task_id)
            .ok_or_else(|| ValidationError::UnknownTask(task_id.to_string()))?;
        if task.completed {
            return Ok(Vec::new());
        }
        let actions = Action::finish_task(task, 0);
        Ok(self.dispatch_all(actions))
    }

    /// Record a finished focus session.
    ///
    /// Returns the session's completion event followed by the reward events.
    /// When the task was deleted or completed while the session ran, nothing
    /// is granted and a single [`Event::SessionRewardSkipped`] is returned.
    pub fn apply_outcome(&mut self, outcome: &SessionOutcome) -> Vec<Event> {
        let pending = self
            .state
            .find_task(&outcome.task_id)
            .is_some_and(|t| !t.completed);
        if !pending {
            tracing::warn!(task_id = %outcome.task_id, "session outcome for a task that is no longer pending");
            return vec![Event::SessionRewardSkipped {
                task_id: outcome.task_id.clone(),
                at: Utc::now(),
            }];
        }
        let mut events = vec![outcome.event.clone()];
        events.extend(self.dispatch_all(outcome.actions()));
        events
    }

    /// Return to the default state and persist it.
    pub fn logout(&mut self) -> Vec<Event> {
        self.dispatch(Action::Reset)
    }

    fn persist(&self) {
        if !self.writable {
            tracing::warn!("state not persisted: the stored document could not be loaded or moved aside");
            return;
        }
        let result = document::encode(&self.state, self.pretty)
            .and_then(|text| self.backend.save(&text));
        if let Err(e) = result {
            tracing::error!(error = %e, "failed to persist state");
        }
    }
}
