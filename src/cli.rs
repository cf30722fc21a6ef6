use std::path::PathBuf;

use chrono::NaiveDateTime;
use clap::{Args, Parser, Subcommand, ValueEnum};
use remindo_models::reminder::{Reminder, ReminderFireTime, ReminderId, ReminderRepeat};
use remindo_scheduler::OccurrenceCalculator;
use remindo_storage::NewReminder;

#[derive(Parser, Debug)]
#[command(name = "remindo", version, about = "Personal reminder tracker")]
pub struct Cli {
    /// Reminder store to use instead of the configured one.
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Watch the store and notify due reminders until Ctrl-C.
    Run,
    /// Create a reminder.
    Add(AddArgs),
    /// Show every reminder with its next occurrence.
    List,
    /// Mark a reminder as done.
    Done { id: ReminderId },
}

#[derive(Args, Debug)]
pub struct AddArgs {
    pub text: String,

    /// Time of day, HH:MM.
    #[arg(long)]
    pub at: ReminderFireTime,

    #[arg(long, value_enum, default_value_t = RepeatArg::None)]
    pub repeat: RepeatArg,

    /// Weekday for weekly reminders, Sunday = 0. Repeatable.
    #[arg(long = "weekday", value_parser = clap::value_parser!(u8).range(0..=6))]
    pub weekdays: Vec<u8>,

    /// Day of month for monthly reminders. Repeatable.
    #[arg(long = "date", value_parser = clap::value_parser!(u8).range(1..=31))]
    pub dates: Vec<u8>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RepeatArg {
    None,
    Daily,
    Weekly,
    Monthly,
}

impl From<RepeatArg> for ReminderRepeat {
    fn from(value: RepeatArg) -> Self {
        match value {
            RepeatArg::None => ReminderRepeat::None,
            RepeatArg::Daily => ReminderRepeat::Daily,
            RepeatArg::Weekly => ReminderRepeat::Weekly,
            RepeatArg::Monthly => ReminderRepeat::Monthly,
        }
    }
}

impl AddArgs {
    pub fn into_new_reminder(self) -> NewReminder {
        NewReminder::new(self.text, self.at, self.repeat.into())
            .with_weekdays(self.weekdays)
            .with_dates(self.dates)
    }
}

const WEEKDAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// One line per reminder for `list`.
pub fn describe(reminder: &Reminder, calculator: &OccurrenceCalculator, now: NaiveDateTime) -> String {
    let repeat = match &reminder.repeat {
        ReminderRepeat::Weekly if !reminder.weekdays.is_empty() => {
            let days: Vec<&str> = reminder
                .weekdays
                .iter()
                .map(|&d| WEEKDAY_NAMES.get(usize::from(d)).copied().unwrap_or("?"))
                .collect();
            format!("weekly on {}", days.join(", "))
        }
        ReminderRepeat::Monthly if !reminder.dates.is_empty() => {
            let dates: Vec<String> = reminder.dates.iter().map(u8::to_string).collect();
            format!("monthly on {}", dates.join(", "))
        }
        other => other.to_string(),
    };

    let status = if reminder.done {
        "done".to_owned()
    } else {
        match calculator.next_occurrence(reminder, now) {
            Some(next) => format!("next {}", next.format("%Y-%m-%d %H:%M")),
            None => "no upcoming occurrence".to_owned(),
        }
    };

    format!(
        "{}  {} @ {}  ({repeat})  {status}",
        reminder.id, reminder.text, reminder.fire_at
    )
}
