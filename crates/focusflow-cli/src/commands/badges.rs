//! Badge catalog with earned flags.

use focusflow_core::{Badge, Config, BADGES};
use serde::Serialize;

use super::{open_store, print_json, CommandResult};

#[derive(Serialize)]
struct BadgeView {
    #[serde(flatten)]
    badge: &'static Badge,
    earned: bool,
}

pub fn run() -> CommandResult {
    let store = open_store(&Config::load_or_default())?;
    let profile = &store.state().profile;
    let badges: Vec<BadgeView> = BADGES
        .iter()
        .map(|badge| BadgeView {
            badge,
            earned: profile.has_badge(badge.id),
        })
        .collect();
    print_json(&badges)
}
