//! # FocusFlow Core Library
//!
//! This library provides the core logic of FocusFlow, a gamified study
//! companion. It follows a CLI-first philosophy: every operation is
//! available through the standalone `focusflow` binary, which is a thin
//! layer over this crate.
//!
//! ## Architecture
//!
//! - **Task Breakdown**: turns a free-text assignment into ordered,
//!   time-boxed micro-tasks with XP rewards
//! - **Gamification**: a pure reducer over [`AppState`] handling XP, levels,
//!   daily streaks, and badges
//! - **Focus Session**: a tick-driven countdown that tracks pauses and
//!   distractions and offers burnout relief
//! - **Storage**: one versioned JSON state document plus TOML configuration
//!
//! ## Key Components
//!
//! - [`TaskBreakdown`]: keyword classification and template expansion
//! - [`apply`]: the gamification state machine
//! - [`FocusSession`]: per-task countdown controller
//! - [`Store`]: owns the state, dispatches actions, persists after each one
//! - [`Config`]: application configuration management

pub mod clock;
pub mod error;
pub mod events;
pub mod focus;
pub mod gamification;
pub mod state;
pub mod storage;
pub mod store;
pub mod task;

pub use clock::{Clock, FixedClock, Moment, SystemClock};
pub use error::{ConfigError, CoreError, Result, SessionError, StorageError, ValidationError};
pub use events::Event;
pub use focus::{BurnoutPolicy, FocusSession, SessionOutcome, SessionState};
pub use gamification::{apply, Action, Badge, Profile, ProfilePatch, Transition, BADGES};
pub use state::AppState;
pub use storage::{Config, FileBackend, MemoryBackend, StateBackend};
pub use store::Store;
pub use task::{CompletedTask, Difficulty, Task, TaskBreakdown, TaskTypeInfo, TemplateCatalog};
