//! Wall-clock access for the reducer and the focus session.
//!
//! The reducer never reads the clock itself: every transition receives a
//! [`Moment`], so transitions stay pure and tests can pin the calendar day.

use chrono::{DateTime, Duration, Local, NaiveDate, Utc};

/// A point in time plus the local calendar day it falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Moment {
    pub now: DateTime<Utc>,
    /// Local calendar day used for streak bookkeeping.
    pub today: NaiveDate,
}

impl Moment {
    /// The current moment, with `today` taken in local time.
    pub fn current() -> Self {
        let local = Local::now();
        Self {
            now: local.with_timezone(&Utc),
            today: local.date_naive(),
        }
    }

    pub fn new(now: DateTime<Utc>, today: NaiveDate) -> Self {
        Self { now, today }
    }

    /// A moment at noon UTC of the given day.
    pub fn on(today: NaiveDate) -> Self {
        let now = today
            .and_hms_opt(12, 0, 0)
            .map(|dt| dt.and_utc())
            .unwrap_or_else(Utc::now);
        Self { now, today }
    }
}

/// Source of [`Moment`]s.
pub trait Clock {
    fn moment(&self) -> Moment;
}

/// Reads the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn moment(&self) -> Moment {
        Moment::current()
    }
}

/// A clock pinned to a moment until moved explicitly.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    moment: Moment,
}

impl FixedClock {
    pub fn new(moment: Moment) -> Self {
        Self { moment }
    }

    pub fn on(today: NaiveDate) -> Self {
        Self::new(Moment::on(today))
    }

    pub fn set(&mut self, moment: Moment) {
        self.moment = moment;
    }

    /// Move forward by whole days, keeping the time of day.
    pub fn advance_days(&mut self, days: i64) {
        self.moment = Moment {
            now: self.moment.now + Duration::days(days),
            today: self.moment.today + Duration::days(days),
        };
    }
}

impl Clock for FixedClock {
    fn moment(&self) -> Moment {
        self.moment
    }
}
