use std::collections::BTreeSet;

use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime, NaiveTime};

use remindo_models::{
    reminder::{DayOfMonth, Reminder, ReminderRepeat, WeekdayNumber},
    settings::MonthlyWrap,
};

const DAYS_IN_WEEK: u32 = 7;
const FLAT_MONTH_DAYS: i64 = 31;
// Every day-of-month 1..=31 shows up at least once in any two consecutive months.
const MAX_MONTHS_AHEAD: u32 = 12;

/// Works out when a reminder is due next.
///
/// Only the next occurrence is ever computed. The due scanner asks again on
/// every cycle, so no schedule state is kept between calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct OccurrenceCalculator {
    monthly_wrap: MonthlyWrap,
}

impl OccurrenceCalculator {
    pub fn new(monthly_wrap: MonthlyWrap) -> Self {
        Self { monthly_wrap }
    }

    /// Returns the first instant at or after `now` on which `reminder` fires,
    /// or `None` when it never fires again.
    pub fn next_occurrence(&self, reminder: &Reminder, now: NaiveDateTime) -> Option<NaiveDateTime> {
        let fire_at = *reminder.fire_at.time();
        let today_at = now.date().and_time(fire_at);
        let passed = today_at < now;

        match &reminder.repeat {
            ReminderRepeat::None => (!passed).then_some(today_at),
            ReminderRepeat::Daily => {
                if passed {
                    today_at.checked_add_days(Days::new(1))
                } else {
                    Some(today_at)
                }
            }
            ReminderRepeat::Weekly if reminder.weekdays.is_empty() => {
                if passed {
                    today_at.checked_add_days(Days::new(DAYS_IN_WEEK.into()))
                } else {
                    Some(today_at)
                }
            }
            ReminderRepeat::Weekly => next_weekday(&reminder.weekdays, today_at, passed),
            ReminderRepeat::Monthly if reminder.dates.is_empty() => {
                if passed {
                    today_at.checked_add_months(Months::new(1))
                } else {
                    Some(today_at)
                }
            }
            ReminderRepeat::Monthly => match self.monthly_wrap {
                MonthlyWrap::Calendar => next_calendar_date(&reminder.dates, now.date(), fire_at, passed),
                MonthlyWrap::Flat31 => next_flat_date(&reminder.dates, today_at, passed),
            },
            ReminderRepeat::Unrecognized(kind) => {
                log::debug!("Reminder {} has unknown repeat kind {kind:?}", reminder.id);
                None
            }
        }
    }
}

/// [`OccurrenceCalculator::next_occurrence`] with calendar month stepping.
pub fn next_occurrence(reminder: &Reminder, now: NaiveDateTime) -> Option<NaiveDateTime> {
    OccurrenceCalculator::default().next_occurrence(reminder, now)
}

fn next_weekday(
    weekdays: &BTreeSet<WeekdayNumber>,
    today_at: NaiveDateTime,
    passed: bool,
) -> Option<NaiveDateTime> {
    if weekdays.iter().any(|&d| u32::from(d) >= DAYS_IN_WEEK) {
        return None;
    }

    let today = today_at.weekday().num_days_from_sunday();
    let diff = weekdays
        .iter()
        .map(|&d| {
            let diff = (u32::from(d) + DAYS_IN_WEEK - today) % DAYS_IN_WEEK;
            if diff == 0 && passed { DAYS_IN_WEEK } else { diff }
        })
        .min()?;

    today_at.checked_add_days(Days::new(diff.into()))
}

fn next_calendar_date(
    dates: &BTreeSet<DayOfMonth>,
    today: NaiveDate,
    fire_at: NaiveTime,
    passed: bool,
) -> Option<NaiveDateTime> {
    if !dates_are_valid(dates) {
        return None;
    }

    let month_start = today.with_day(1)?;
    for offset in 0..=MAX_MONTHS_AHEAD {
        let month = month_start.checked_add_months(Months::new(offset))?;
        // Ascending order, so the first hit in a month is the earliest.
        let hit = dates
            .iter()
            .filter_map(|&d| month.with_day(d.into()))
            .find(|&candidate| candidate > today || (candidate == today && !passed));

        if let Some(date) = hit {
            return Some(date.and_time(fire_at));
        }
    }

    None
}

fn next_flat_date(
    dates: &BTreeSet<DayOfMonth>,
    today_at: NaiveDateTime,
    passed: bool,
) -> Option<NaiveDateTime> {
    if !dates_are_valid(dates) {
        return None;
    }

    let today = i64::from(today_at.day());
    let diff = dates
        .iter()
        .map(|&d| {
            let mut diff = i64::from(d) - today;
            if diff == 0 && passed {
                diff = FLAT_MONTH_DAYS;
            }
            if diff < 0 {
                diff += FLAT_MONTH_DAYS;
            }
            diff
        })
        .min()?;

    today_at.checked_add_days(Days::new(u64::try_from(diff).ok()?))
}

fn dates_are_valid(dates: &BTreeSet<DayOfMonth>) -> bool {
    dates.iter().all(|d| (1..=31).contains(d))
}

#[cfg(test)]
mod tests;
