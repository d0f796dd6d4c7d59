//! Profile summary command.

use focusflow_core::{Config, Profile};
use serde::Serialize;

use super::{open_store, print_json, CommandResult};

/// Profile plus the derived level progress the UI shows.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProfileView<'a> {
    #[serde(flatten)]
    profile: &'a Profile,
    xp_into_level: u32,
    next_level_xp: u32,
    has_onboarded: bool,
    is_authenticated: bool,
    pending_tasks: usize,
}

pub fn run() -> CommandResult {
    let store = open_store(&Config::load_or_default())?;
    let state = store.state();
    print_json(&ProfileView {
        profile: &state.profile,
        xp_into_level: state.profile.xp_into_level(),
        next_level_xp: state.profile.next_level_xp(),
        has_onboarded: state.has_onboarded,
        is_authenticated: state.is_authenticated,
        pending_tasks: state.pending_tasks().count(),
    })
}
