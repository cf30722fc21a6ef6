use std::{collections::BTreeSet, fmt, str::FromStr};

use chrono::{NaiveTime, Timelike};
use thiserror::Error;

pub type ReminderId = uuid::Uuid;

/// Day of week as stored on a reminder, Sunday = 0 .. Saturday = 6.
pub type WeekdayNumber = u8;

/// Day of month as stored on a reminder, 1 ..= 31.
pub type DayOfMonth = u8;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid reminder time {0:?}, expected HH:MM")]
pub struct InvalidReminderTime(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderFireTime(NaiveTime);

impl ReminderFireTime {
    pub fn new(inner: NaiveTime) -> Self {
        let normalized_time = inner
            .with_second(0)
            .and_then(|t| t.with_nanosecond(0))
            .expect("Zero seconds and nanoseconds are always valid.");
        Self(normalized_time)
    }

    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self::new)
    }

    pub fn time(&self) -> &NaiveTime {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ReminderFireTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

impl FromStr for ReminderFireTime {
    type Err = InvalidReminderTime;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (hour, minute) = s
            .trim()
            .split_once(':')
            .ok_or_else(|| InvalidReminderTime(s.to_owned()))?;

        let hour = hour
            .parse::<u32>()
            .map_err(|_| InvalidReminderTime(s.to_owned()))?;
        let minute = minute
            .parse::<u32>()
            .map_err(|_| InvalidReminderTime(s.to_owned()))?;

        Self::from_hm(hour, minute).ok_or_else(|| InvalidReminderTime(s.to_owned()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReminderRepeat {
    None,
    Daily,
    Weekly,
    Monthly,
    /// A repeat kind this version does not know. Such reminders never fire.
    Unrecognized(String),
}

impl ReminderRepeat {
    pub fn as_str(&self) -> &str {
        match self {
            ReminderRepeat::None => "none",
            ReminderRepeat::Daily => "daily",
            ReminderRepeat::Weekly => "weekly",
            ReminderRepeat::Monthly => "monthly",
            ReminderRepeat::Unrecognized(other) => other,
        }
    }
}

impl From<&str> for ReminderRepeat {
    fn from(value: &str) -> Self {
        match value {
            "none" | "" => ReminderRepeat::None,
            "daily" => ReminderRepeat::Daily,
            "weekly" => ReminderRepeat::Weekly,
            "monthly" => ReminderRepeat::Monthly,
            other => ReminderRepeat::Unrecognized(other.to_owned()),
        }
    }
}

impl fmt::Display for ReminderRepeat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    pub id: ReminderId,
    pub text: String,
    pub fire_at: ReminderFireTime,
    pub repeat: ReminderRepeat,
    pub weekdays: BTreeSet<WeekdayNumber>,
    pub dates: BTreeSet<DayOfMonth>,
    pub done: bool,
}
