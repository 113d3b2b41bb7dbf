use std::fmt;

use chrono::{DateTime, FixedOffset};

use crate::timestamp::parse_local_datetime;

const SECOND_MS: i64 = 1000;
const MINUTE_MS: i64 = 60 * SECOND_MS;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Remaining {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl Remaining {
    fn from_millis(left: i64) -> Self {
        Self {
            days: left / DAY_MS,
            hours: (left % DAY_MS) / HOUR_MS,
            minutes: (left % HOUR_MS) / MINUTE_MS,
            seconds: (left % MINUTE_MS) / SECOND_MS,
        }
    }
}

impl fmt::Display for Remaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}d {}h {}m {}s",
            self.days, self.hours, self.minutes, self.seconds
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CountdownTick {
    Remaining(Remaining),
    Started,
}

impl CountdownTick {
    pub fn text(&self, started_message: &str) -> String {
        match self {
            CountdownTick::Remaining(remaining) => remaining.to_string(),
            CountdownTick::Started => started_message.to_string(),
        }
    }

    pub fn is_started(&self) -> bool {
        matches!(self, CountdownTick::Started)
    }
}

/// Counts down to an event start. Once it reports `Started` it stays there,
/// even if the clock later moves backwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Countdown {
    target_ms: i64,
    started: bool,
}

impl Countdown {
    pub fn new(target: DateTime<FixedOffset>) -> Self {
        Self::from_millis(target.timestamp_millis())
    }

    pub fn from_millis(target_ms: i64) -> Self {
        Self {
            target_ms,
            started: false,
        }
    }

    pub fn tick(&mut self, now_ms: i64) -> CountdownTick {
        if self.started {
            return CountdownTick::Started;
        }
        let left = self.target_ms.saturating_sub(now_ms);
        if left <= 0 {
            self.started = true;
            return CountdownTick::Started;
        }
        CountdownTick::Remaining(Remaining::from_millis(left))
    }

    pub fn is_started(&self) -> bool {
        self.started
    }
}

/// Read a `data-event-date` value. Date-times without an offset are taken as
/// the viewer's local time; a bare date is UTC midnight.
pub fn parse_event_date(raw: &str, offset: &FixedOffset) -> Option<DateTime<FixedOffset>> {
    parse_local_datetime(raw, offset)
}
