//! Micro-task records produced by the breakdown engine.
//!
//! A task is created in a batch by [`breakdown::TaskBreakdown`], lives in the
//! pending collection until completed, and is then copied into the completed
//! collection as a [`CompletedTask`] carrying its completion timestamp.

pub mod breakdown;
pub mod templates;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub use breakdown::{extract_subject, validate_description, TaskBreakdown};
pub use templates::{MicroTaskTemplate, TaskTypeInfo, TaskTypeRule, TemplateCatalog};

/// Difficulty tier of a micro-task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Get human-readable display name
    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One atomic, time-boxed step of a larger task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    /// The free-text description this task was generated from.
    pub parent_task: String,
    pub title: String,
    /// Subject extracted from the parent description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    /// Estimated duration in minutes.
    pub estimated_time: u32,
    pub difficulty: Difficulty,
    pub xp_reward: u32,
    #[serde(default)]
    pub completed: bool,
    /// Position within the breakdown batch.
    #[serde(default)]
    pub order: usize,
    /// Legacy documents may not carry a creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Total focus duration of this task in seconds.
    pub fn duration_secs(&self) -> u64 {
        u64::from(self.estimated_time) * 60
    }

    /// Copy this task into the completed collection.
    pub fn to_completed(&self, at: DateTime<Utc>) -> CompletedTask {
        CompletedTask {
            task: Task {
                completed: true,
                ..self.clone()
            },
            completed_at: at,
        }
    }
}

/// A completed task. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedTask {
    #[serde(flatten)]
    pub task: Task,
    pub completed_at: DateTime<Utc>,
}

impl CompletedTask {
    pub fn id(&self) -> &str {
        &self.task.id
    }
}
