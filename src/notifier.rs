use async_trait::async_trait;
use remindo_models::{reminder::Reminder, settings::TelegramSettings};
use remindo_scheduler::delivery::ReminderNotifier;
use teloxide::prelude::*;
use thiserror::Error;

/// Reports due reminders through the log.
pub struct LogNotifier;

#[async_trait]
impl ReminderNotifier for LogNotifier {
    async fn notify(&self, reminder: &Reminder) -> anyhow::Result<()> {
        log::info!(target: "remindo::reminder", "[{}] Reminder: {}", reminder.id, reminder.text);
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum TelegramNotifierError {
    #[error(transparent)]
    Telegram(#[from] teloxide::RequestError),
}

pub struct TelegramNotifier {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramNotifier {
    pub fn create(settings: &TelegramSettings) -> Self {
        let bot = Bot::new(settings.token.clone());

        Self {
            bot,
            chat_id: ChatId(settings.chat_id),
        }
    }
}

#[async_trait]
impl ReminderNotifier for TelegramNotifier {
    async fn notify(&self, reminder: &Reminder) -> anyhow::Result<()> {
        self.bot
            .send_message(self.chat_id, get_message_text(reminder))
            .await
            .map_err(TelegramNotifierError::from)?;

        Ok(())
    }
}

fn get_message_text(reminder: &Reminder) -> String {
    format!("🔔 {}", reminder.text)
}
