//! Versioned JSON state document.
//!
//! The whole [`AppState`] is written as one document tagged with
//! `schemaVersion`. Loading fills missing fields from defaults, migrates
//! older documents step by step, and rejects documents written by a newer
//! schema.

use chrono::{DateTime, NaiveDate};
use serde_json::{Map, Value};

use crate::error::StorageError;
use crate::state::AppState;

/// Current document schema version.
///
/// Increment this when adding a migration.
pub const SCHEMA_VERSION: u32 = 1;

const VERSION_KEY: &str = "schemaVersion";

/// Serialize the full state as a versioned document.
pub fn encode(state: &AppState, pretty: bool) -> Result<String, StorageError> {
    let mut value = serde_json::to_value(state)?;
    if let Value::Object(ref mut root) = value {
        root.insert(VERSION_KEY.to_string(), Value::from(SCHEMA_VERSION));
    }
    let text = if pretty {
        serde_json::to_string_pretty(&value)?
    } else {
        serde_json::to_string(&value)?
    };
    Ok(text)
}

/// Parse a document, migrating it to the current schema.
///
/// # Errors
///
/// Fails on invalid JSON, a non-object root, wrongly typed fields, or a
/// schema version newer than [`SCHEMA_VERSION`].
pub fn decode(text: &str) -> Result<AppState, StorageError> {
    let value: Value = serde_json::from_str(text)?;
    let Value::Object(mut root) = value else {
        return Err(StorageError::Malformed("document root is not an object".into()));
    };

    let version = schema_version(&root)?;
    if version > SCHEMA_VERSION {
        return Err(StorageError::UnsupportedSchema {
            found: version,
            supported: SCHEMA_VERSION,
        });
    }
    migrate(&mut root, version);
    root.remove(VERSION_KEY);

    let mut state: AppState = serde_json::from_value(Value::Object(root))?;
    let added = state.reconcile_badges();
    if !added.is_empty() {
        tracing::debug!(?added, "restored badges implied by profile counters");
    }
    Ok(state)
}

/// Documents without a version are legacy (version 0).
fn schema_version(root: &Map<String, Value>) -> Result<u32, StorageError> {
    match root.get(VERSION_KEY) {
        None | Some(Value::Null) => Ok(0),
        Some(v) => v
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| StorageError::Malformed(format!("invalid {VERSION_KEY}: {v}"))),
    }
}

/// Apply all pending migrations in order.
fn migrate(root: &mut Map<String, Value>, from: u32) {
    if from < 1 {
        migrate_v1(root);
    }
}

/// v0 -> v1: legacy web/mobile documents.
///
/// - `lastActiveDate` was a `Date.toDateString()` value; becomes ISO or null
/// - a null or non-array `completedTasks` becomes empty
/// - `_leveledUp` leaked from the UI is dropped
fn migrate_v1(root: &mut Map<String, Value>) {
    root.remove("_leveledUp");

    if let Some(Value::Object(profile)) = root.get_mut("profile") {
        if let Some(slot) = profile.get_mut("lastActiveDate") {
            let migrated = slot
                .as_str()
                .and_then(parse_legacy_date)
                .map(|d| Value::String(d.format("%Y-%m-%d").to_string()))
                .unwrap_or(Value::Null);
            *slot = migrated;
        }
        // Legacy profiles wrote `null` for absent strings.
        for key in ["name", "email", "avatar", "authProvider"] {
            if matches!(profile.get(key), Some(Value::Null)) {
                profile.remove(key);
            }
        }
    }

    for key in ["tasks", "completedTasks"] {
        if !matches!(root.get(key), Some(Value::Array(_))) {
            root.insert(key.to_string(), Value::Array(Vec::new()));
        }
    }
}

/// Parse the date spellings older clients wrote.
///
/// Accepts `Sat Oct 17 2026`, `2026-10-17`, and RFC 3339 timestamps.
pub fn parse_legacy_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%a %b %d %Y")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::Moment;
    use crate::gamification::{apply, Action, ProfilePatch};
    use crate::task::TaskBreakdown;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    fn busy_state() -> AppState {
        let at = Moment::on(day());
        let mut state = apply(
            AppState::default(),
            Action::SetProfile {
                patch: ProfilePatch::name("Robin"),
                authenticated: true,
            },
            at,
        )
        .state;
        let tasks = TaskBreakdown::new().breakdown_at("read chapter 3", at.now);
        let first = tasks[0].id.clone();
        state = apply(state, Action::AddTasks(tasks), at).state;
        state = apply(state, Action::CompleteTask(first), at).state;
        apply(state, Action::AddXp(130), at).state
    }

    #[test]
    fn roundtrip_preserves_state() {
        let state = busy_state();
        for pretty in [true, false] {
            let text = encode(&state, pretty).unwrap();
            assert_eq!(decode(&text).unwrap(), state);
        }
    }

    #[test]
    fn encoded_document_carries_version_and_level() {
        let text = encode(&busy_state(), false).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["schemaVersion"], 1);
        assert_eq!(value["profile"]["level"], 2);
        assert_eq!(value["profile"]["lastActiveDate"], "2026-10-17");
    }

    #[test]
    fn legacy_document_is_migrated() {
        let legacy = r#"{
            "profile": {
                "name": "Kai", "email": "", "avatar": null, "authProvider": null,
                "xp": 140, "level": 2, "streak": 2,
                "lastActiveDate": "Fri Oct 16 2026",
                "badges": ["starter", "focused"], "tasksCompleted": 5
            },
            "tasks": [],
            "completedTasks": null,
            "hasOnboarded": true,
            "_leveledUp": true
        }"#;
        let state = decode(legacy).unwrap();
        assert_eq!(state.profile.name, "Kai");
        assert_eq!(state.profile.email, None);
        assert_eq!(state.profile.last_active_date, NaiveDate::from_ymd_opt(2026, 10, 16));
        assert_eq!(state.profile.total_focus_minutes, 0);
        assert!(state.completed_tasks.is_empty());
        assert!(state.has_onboarded);
        assert!(!state.is_authenticated);
    }

    #[test]
    fn partial_document_fills_defaults() {
        let state = decode(r#"{"hasOnboarded": true}"#).unwrap();
        assert!(state.has_onboarded);
        assert_eq!(state.profile, AppState::default().profile);
    }

    #[test]
    fn unparseable_legacy_date_becomes_absent() {
        let state = decode(r#"{"profile": {"lastActiveDate": "someday"}}"#).unwrap();
        assert_eq!(state.profile.last_active_date, None);
    }

    #[test]
    fn newer_schema_is_rejected() {
        let err = decode(r#"{"schemaVersion": 7}"#).unwrap_err();
        assert!(matches!(err, StorageError::UnsupportedSchema { found: 7, supported: 1 }));
    }

    #[test]
    fn non_object_root_is_rejected() {
        assert!(matches!(decode("[1,2]").unwrap_err(), StorageError::Malformed(_)));
        assert!(matches!(decode("{not json").unwrap_err(), StorageError::ParseFailed(_)));
    }

    #[test]
    fn badges_are_reconciled_with_counters() {
        let state = decode(r#"{"schemaVersion":1,"profile":{"xp":520,"badges":[]}}"#).unwrap();
        assert_eq!(state.profile.badges, vec!["starter", "focused", "elite"]);
    }

    #[test]
    fn legacy_date_spellings() {
        assert_eq!(parse_legacy_date("Sat Oct 17 2026"), Some(day()));
        assert_eq!(parse_legacy_date("2026-10-17"), Some(day()));
        assert_eq!(parse_legacy_date("2026-10-17T08:30:00Z"), Some(day()));
        assert_eq!(parse_legacy_date(""), None);
    }
}
