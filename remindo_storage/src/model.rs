use std::collections::BTreeSet;

use remindo_models::reminder::{DayOfMonth, ReminderFireTime, ReminderRepeat, WeekdayNumber};

pub struct NewReminder {
    pub text: String,
    pub fire_at: ReminderFireTime,
    pub repeat: ReminderRepeat,
    pub weekdays: BTreeSet<WeekdayNumber>,
    pub dates: BTreeSet<DayOfMonth>,
}

impl NewReminder {
    pub fn new(text: impl Into<String>, fire_at: ReminderFireTime, repeat: ReminderRepeat) -> Self {
        Self {
            text: text.into(),
            fire_at,
            repeat,
            weekdays: BTreeSet::new(),
            dates: BTreeSet::new(),
        }
    }

    pub fn with_weekdays(mut self, weekdays: impl IntoIterator<Item = WeekdayNumber>) -> Self {
        self.weekdays = weekdays.into_iter().collect();
        self
    }

    pub fn with_dates(mut self, dates: impl IntoIterator<Item = DayOfMonth>) -> Self {
        self.dates = dates.into_iter().collect();
        self
    }
}
