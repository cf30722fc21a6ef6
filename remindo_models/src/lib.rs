pub mod reminder;
pub mod settings;
