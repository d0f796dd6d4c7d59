//! XP, levels, streaks and badges.
//!
//! All mutation of [`crate::AppState`] goes through [`apply`].

pub mod badges;
mod profile;
mod reducer;
mod streak;

pub use badges::{find_badge, qualifying_badges, Badge, Requirement, BADGES};
pub use profile::{level_for_xp, Profile, ProfilePatch, XP_PER_LEVEL};
pub use reducer::{apply, Action, Transition};
pub use streak::next_streak;
