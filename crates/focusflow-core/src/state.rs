//! The persisted application state root.

use serde::{Deserialize, Serialize};

use crate::gamification::{badges, Profile};
use crate::task::{CompletedTask, Task};

/// Everything the app persists, saved and loaded as one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppState {
    pub profile: Profile,
    /// Tasks in insertion order; completed ones keep `completed = true`.
    pub tasks: Vec<Task>,
    pub completed_tasks: Vec<CompletedTask>,
    pub has_onboarded: bool,
    pub is_authenticated: bool,
}

impl AppState {
    pub fn find_task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Tasks not yet completed, in order.
    pub fn pending_tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(|t| !t.completed)
    }

    /// Restore derived consistency after loading a document.
    ///
    /// Adds any badge the counters already qualify for; never removes one.
    /// Returns the ids that were added.
    pub fn reconcile_badges(&mut self) -> Vec<&'static str> {
        let earned: Vec<&'static str> = badges::qualifying_badges(&self.profile)
            .map(|b| b.id)
            .filter(|id| !self.profile.has_badge(id))
            .collect();
        for id in &earned {
            self.profile.award_badge(id);
        }
        earned
    }
}
