pub mod json;
mod model;
mod reminder;

pub use model::NewReminder;
pub use reminder::{InMemoryReminderStorage, ReminderChange, ReminderStorage};
