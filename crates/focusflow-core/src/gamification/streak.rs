//! Day-granularity streak rule.

use chrono::NaiveDate;

/// Streak after an XP-earning action on `today`.
///
/// - same day as the last activity: unchanged
/// - the day after: +1
/// - anything else (no history, a gap, or a date in the future): 1
pub fn next_streak(current: u32, last_active: Option<NaiveDate>, today: NaiveDate) -> u32 {
    match last_active {
        Some(last) if last == today => current,
        Some(last) if today.pred_opt() == Some(last) => current.saturating_add(1),
        _ => 1,
    }
}
