use async_trait::async_trait;

use remindo_models::reminder::Reminder;

/// Surfaces a due reminder to the user. The reminder id doubles as the
/// notification tag and the text is the payload.
#[async_trait]
pub trait ReminderNotifier: Send + Sync + 'static {
    async fn notify(&self, reminder: &Reminder) -> anyhow::Result<()>;
}
