//! Static badge catalog.

use serde::Serialize;

use super::profile::Profile;

pub const STARTER_BADGE: &str = "starter";

/// Which profile counter a badge threshold applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Requirement {
    XpThreshold,
    StreakThreshold,
    TasksThreshold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    pub id: &'static str,
    pub name: &'static str,
    pub requirement_type: Requirement,
    pub requirement_value: u32,
}

impl Badge {
    /// Whether the profile's counters meet this badge's threshold.
    pub fn is_met_by(&self, profile: &Profile) -> bool {
        let counter = match self.requirement_type {
            Requirement::XpThreshold => profile.xp,
            Requirement::StreakThreshold => profile.streak,
            Requirement::TasksThreshold => profile.tasks_completed,
        };
        counter >= self.requirement_value
    }
}

const fn badge(id: &'static str, name: &'static str, requirement_type: Requirement, value: u32) -> Badge {
    Badge {
        id,
        name,
        requirement_type,
        requirement_value: value,
    }
}

/// Every badge, in display order.
pub const BADGES: &[Badge] = &[
    badge(STARTER_BADGE, "Starter", Requirement::XpThreshold, 0),
    badge("focused", "Focused", Requirement::XpThreshold, 100),
    badge("streak3", "On Fire", Requirement::StreakThreshold, 3),
    badge("centurion", "Centurion", Requirement::TasksThreshold, 10),
    badge("elite", "Elite", Requirement::XpThreshold, 500),
    badge("grinder", "Grinder", Requirement::XpThreshold, 1000),
    badge("streak7", "Unstoppable", Requirement::StreakThreshold, 7),
];

pub fn find_badge(id: &str) -> Option<&'static Badge> {
    BADGES.iter().find(|b| b.id == id)
}

/// Badges the profile's counters currently qualify for.
pub fn qualifying_badges(profile: &Profile) -> impl Iterator<Item = &'static Badge> + '_ {
    BADGES.iter().filter(move |b| b.is_met_by(profile))
}
