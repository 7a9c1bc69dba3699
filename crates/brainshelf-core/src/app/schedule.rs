//! DailySchedule - 1 日 1 回の固定時刻（UTC）

use chrono::{DateTime, Duration, NaiveTime, Utc};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid time of day {hour:02}:{minute:02}")]
pub struct ScheduleError {
    pub hour: u32,
    pub minute: u32,
}

/// DailySchedule は毎日 hh:mm UTC に発火する
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailySchedule {
    at: NaiveTime,
}

impl DailySchedule {
    pub fn new(hour: u32, minute: u32) -> Result<Self, ScheduleError> {
        NaiveTime::from_hms_opt(hour, minute, 0)
            .map(|at| Self { at })
            .ok_or(ScheduleError { hour, minute })
    }

    /// `now` より厳密に後の次回発火時刻
    pub fn next_after(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let today = now.date_naive().and_time(self.at).and_utc();
        if today > now {
            today
        } else {
            today + Duration::days(1)
        }
    }
}

impl Default for DailySchedule {
    /// 02:00 UTC
    fn default() -> Self {
        Self {
            at: NaiveTime::from_hms_opt(2, 0, 0).unwrap_or(NaiveTime::MIN),
        }
    }
}
