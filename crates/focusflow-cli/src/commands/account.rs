//! Onboarding and the mocked sign-in flow.

use focusflow_core::{Action, Config, ProfilePatch};

use super::{open_store, print_json, CommandResult};

pub fn onboard(name: String) -> CommandResult {
    let name = name.trim();
    if name.is_empty() {
        return Err("name must not be empty".into());
    }
    let mut store = open_store(&Config::load_or_default())?;
    let events = store.dispatch(Action::SetProfile {
        patch: ProfilePatch::name(name),
        authenticated: false,
    });
    print_json(&events)
}

/// Authentication is mocked: whatever identity is given is accepted.
pub fn login(name: String, email: String, provider: String) -> CommandResult {
    if name.trim().is_empty() || email.trim().is_empty() {
        return Err("name and email must not be empty".into());
    }
    let mut store = open_store(&Config::load_or_default())?;
    let events = store.dispatch(Action::SetProfile {
        patch: ProfilePatch {
            name: Some(name.trim().to_string()),
            email: Some(email.trim().to_string()),
            avatar: None,
            auth_provider: Some(provider),
        },
        authenticated: true,
    });
    print_json(&events)
}

pub fn logout() -> CommandResult {
    let mut store = open_store(&Config::load_or_default())?;
    let events = store.logout();
    super::focus::discard_session()?;
    print_json(&events)
}
