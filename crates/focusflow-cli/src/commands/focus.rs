//! Focus session commands.
//!
//! The CLI is not a long-running process, so the active session is saved to
//! `focus_session.json` between invocations and caught up to the wall clock
//! each time it is loaded.

use chrono::Utc;
use clap::{Subcommand, ValueEnum};
use focusflow_core::storage::data_dir;
use focusflow_core::{
    Config, Event, FileBackend, FocusSession, SessionError, SessionOutcome, SessionState,
    StateBackend, Store,
};

use super::{open_store, print_json, CommandResult};

const SESSION_FILE: &str = "focus_session.json";

#[derive(Subcommand)]
pub enum FocusAction {
    /// Start a focus session for a task
    Start {
        /// Task ID
        task_id: String,
    },
    /// Pause the countdown (counts toward burnout detection)
    Pause,
    /// Resume a paused countdown
    Resume,
    /// Report a distraction
    Distracted,
    /// Take a short micro-break
    Break,
    /// Answer the burnout relief offer
    Relief {
        #[arg(value_enum)]
        choice: ReliefChoice,
    },
    /// Finish the session and collect XP
    Done,
    /// Print the session state as JSON
    Status,
    /// Drop the session without rewards
    Abandon,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ReliefChoice {
    Accept,
    Decline,
}

type SessionResult<T> = Result<T, Box<dyn std::error::Error>>;

/// The session file, written atomically like the state document.
fn session_store() -> SessionResult<FileBackend> {
    Ok(FileBackend::at(data_dir()?.join(SESSION_FILE)))
}

fn load_session() -> SessionResult<Option<FocusSession>> {
    let Some(json) = session_store()?.load()? else {
        return Ok(None);
    };
    match serde_json::from_str::<FocusSession>(&json) {
        Ok(session) => Ok(Some(session)),
        Err(e) => {
            tracing::warn!(error = %e, "discarding unreadable focus session");
            discard_session()?;
            Ok(None)
        }
    }
}

fn save_session(session: &FocusSession) -> CommandResult {
    let json = serde_json::to_string_pretty(session)?;
    session_store()?.save(&json)?;
    Ok(())
}

/// Remove the saved session, if any.
pub fn discard_session() -> CommandResult {
    session_store()?.clear()?;
    Ok(())
}

/// Apply a finished session to the store and drop the session file.
fn finish(store: &mut Store<FileBackend>, outcome: SessionOutcome) -> SessionResult<Vec<Event>> {
    let events = store.apply_outcome(&outcome);
    discard_session()?;
    Ok(events)
}

/// Load the saved session and settle it if its countdown ran out since
/// the last invocation. A settled session is gone; its events are returned.
fn load_settled(store: &mut Store<FileBackend>) -> SessionResult<(Option<FocusSession>, Vec<Event>)> {
    let Some(mut session) = load_session()? else {
        return Ok((None, Vec::new()));
    };
    match session.catch_up(Utc::now()) {
        Some(outcome) => Ok((None, finish(store, outcome)?)),
        None => Ok((Some(session), Vec::new())),
    }
}

pub fn run(action: FocusAction) -> CommandResult {
    let config = Config::load_or_default();
    let mut store = open_store(&config)?;
    match action {
        FocusAction::Start { task_id } => start(&config, &mut store, &task_id),
        FocusAction::Abandon => abandon(&mut store),
        other => drive(&mut store, other),
    }
}

fn start(config: &Config, store: &mut Store<FileBackend>, task_id: &str) -> CommandResult {
    let (active, mut events) = load_settled(store)?;
    if let Some(active) = active {
        if active.state() != SessionState::Completed {
            return Err(format!(
                "a focus session is already active for task {}",
                active.task().id
            )
            .into());
        }
    }
    let task = store
        .state()
        .find_task(task_id)
        .cloned()
        .ok_or_else(|| format!("task not found: {task_id}"))?;
    let mut session = FocusSession::new(task, config.burnout_policy())?;
    events.extend(session.start());
    events.push(session.snapshot());
    save_session(&session)?;
    print_json(&events)
}

fn abandon(store: &mut Store<FileBackend>) -> CommandResult {
    let (session, settled) = load_settled(store)?;
    if !settled.is_empty() {
        // Finished before it could be dropped: the reward stands.
        return print_json(&settled);
    }
    let session = session.ok_or(SessionError::NoActiveSession)?;
    discard_session()?;
    print_json(&[Event::SessionAbandoned {
        task_id: session.task().id.clone(),
        at: Utc::now(),
    }])
}

fn drive(store: &mut Store<FileBackend>, action: FocusAction) -> CommandResult {
    let (session, settled) = load_settled(store)?;
    if !settled.is_empty() {
        return print_json(&settled);
    }
    let mut session = session.ok_or(SessionError::NoActiveSession)?;

    let mut events: Vec<Event> = match action {
        FocusAction::Pause => session.pause(),
        FocusAction::Resume => session.start().into_iter().collect(),
        FocusAction::Distracted => session.report_distraction(),
        FocusAction::Break => session.micro_break().into_iter().collect(),
        FocusAction::Relief { choice } => {
            let event = match choice {
                ReliefChoice::Accept => session.accept_relief()?,
                ReliefChoice::Decline => session.decline_relief()?,
            };
            vec![event]
        }
        FocusAction::Done => {
            let outcome = session.complete().ok_or(SessionError::SessionCompleted)?;
            return print_json(&finish(store, outcome)?);
        }
        FocusAction::Status | FocusAction::Start { .. } | FocusAction::Abandon => Vec::new(),
    };

    events.push(session.snapshot());
    save_session(&session)?;
    print_json(&events)
}
