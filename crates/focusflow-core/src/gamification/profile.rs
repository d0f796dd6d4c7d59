//! User profile and level arithmetic.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::badges::STARTER_BADGE;

/// XP needed per level.
pub const XP_PER_LEVEL: u32 = 100;

/// Level for an XP total: `floor(xp / 100) + 1`.
pub fn level_for_xp(xp: u32) -> u32 {
    xp / XP_PER_LEVEL + 1
}

/// The player's profile.
///
/// The level is never stored: it is derived from `xp` on every read and the
/// persisted `level` field is ignored on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ProfileRecord", into = "ProfileRecord")]
pub struct Profile {
    pub name: String,
    pub email: Option<String>,
    pub avatar: Option<String>,
    pub auth_provider: Option<String>,
    pub xp: u32,
    /// Consecutive calendar days with an XP-earning action.
    pub streak: u32,
    pub last_active_date: Option<NaiveDate>,
    /// Earned badge ids in the order they were earned. Never shrinks.
    pub badges: Vec<String>,
    pub tasks_completed: u32,
    pub total_focus_minutes: u32,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: None,
            avatar: None,
            auth_provider: None,
            xp: 0,
            streak: 0,
            last_active_date: None,
            badges: vec![STARTER_BADGE.to_string()],
            tasks_completed: 0,
            total_focus_minutes: 0,
        }
    }
}

impl Profile {
    pub fn level(&self) -> u32 {
        level_for_xp(self.xp)
    }

    /// XP earned inside the current level (0..100).
    pub fn xp_into_level(&self) -> u32 {
        self.xp % XP_PER_LEVEL
    }

    /// XP total at which the next level starts.
    pub fn next_level_xp(&self) -> u32 {
        self.level().saturating_mul(XP_PER_LEVEL)
    }

    pub fn has_badge(&self, id: &str) -> bool {
        self.badges.iter().any(|b| b == id)
    }

    /// Add a badge id; returns false when it was already earned.
    pub fn award_badge(&mut self, id: &str) -> bool {
        if self.has_badge(id) {
            return false;
        }
        self.badges.push(id.to_string());
        true
    }
}

/// Fields a profile update may set. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfilePatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub avatar: Option<String>,
    pub auth_provider: Option<String>,
}

impl ProfilePatch {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub(crate) fn merge_into(self, profile: &mut Profile) {
        if let Some(name) = self.name {
            profile.name = name;
        }
        if let Some(email) = self.email {
            profile.email = Some(email);
        }
        if let Some(avatar) = self.avatar {
            profile.avatar = Some(avatar);
        }
        if let Some(provider) = self.auth_provider {
            profile.auth_provider = Some(provider);
        }
    }
}

/// Persisted shape of a profile. Every field is optional on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ProfileRecord {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    auth_provider: Option<String>,
    xp: u32,
    /// Written for readers of the document; recomputed on load.
    level: u32,
    streak: u32,
    last_active_date: Option<NaiveDate>,
    badges: Vec<String>,
    tasks_completed: u32,
    total_focus_minutes: u32,
}

impl Default for ProfileRecord {
    fn default() -> Self {
        Profile::default().into()
    }
}

impl From<Profile> for ProfileRecord {
    fn from(p: Profile) -> Self {
        Self {
            level: p.level(),
            name: p.name,
            email: p.email,
            avatar: p.avatar,
            auth_provider: p.auth_provider,
            xp: p.xp,
            streak: p.streak,
            last_active_date: p.last_active_date,
            badges: p.badges,
            tasks_completed: p.tasks_completed,
            total_focus_minutes: p.total_focus_minutes,
        }
    }
}

impl From<ProfileRecord> for Profile {
    fn from(r: ProfileRecord) -> Self {
        // Empty strings are how the web client spelled "absent".
        let non_empty = |s: Option<String>| s.filter(|v| !v.is_empty());
        let mut badges: Vec<String> = Vec::with_capacity(r.badges.len());
        for id in r.badges {
            if !badges.contains(&id) {
                badges.push(id);
            }
        }
        Self {
            name: r.name,
            email: non_empty(r.email),
            avatar: non_empty(r.avatar),
            auth_provider: non_empty(r.auth_provider),
            xp: r.xp,
            streak: r.streak,
            last_active_date: r.last_active_date,
            badges,
            tasks_completed: r.tasks_completed,
            total_focus_minutes: r.total_focus_minutes,
        }
    }
}
