use async_trait::async_trait;
use tokio::sync::RwLock;

use remindo_models::reminder::{Reminder, ReminderId, ReminderRepeat};

use crate::model::NewReminder;

/// Edits the full reminder list in place. Returns `true` when something
/// changed and the list has to be saved.
pub type ReminderChange = Box<dyn FnOnce(&mut Vec<Reminder>) -> bool + Send>;

/// Flat store of every reminder. Reads are full snapshots.
#[async_trait]
pub trait ReminderStorage: Send + Sync {
    async fn load_all(&self) -> anyhow::Result<Vec<Reminder>>;
    async fn save_all(&self, reminders: Vec<Reminder>) -> anyhow::Result<()>;

    /// Load, change and save as one step and return the resulting list.
    ///
    /// This default is not atomic. Stores shared between tasks override it
    /// to hold their lock from the load until the save.
    async fn modify(&self, change: ReminderChange) -> anyhow::Result<Vec<Reminder>> {
        let mut reminders = self.load_all().await?;
        if change(&mut reminders) {
            self.save_all(reminders.clone()).await?;
        }
        Ok(reminders)
    }

    async fn insert(&self, reminder: NewReminder) -> anyhow::Result<Reminder> {
        let NewReminder {
            text,
            fire_at,
            repeat,
            mut weekdays,
            mut dates,
        } = reminder;

        let text = text.trim().to_owned();
        anyhow::ensure!(!text.is_empty(), "Reminder text must not be empty");

        if repeat != ReminderRepeat::Weekly {
            weekdays.clear();
        }
        if repeat != ReminderRepeat::Monthly {
            dates.clear();
        }

        let created = Reminder {
            id: ReminderId::new_v4(),
            text,
            fire_at,
            repeat,
            weekdays,
            dates,
            done: false,
        };

        let stored = created.clone();
        self.modify(Box::new(move |reminders| {
            reminders.push(stored);
            true
        }))
        .await?;

        log::info!("Created reminder {}", created.id);
        Ok(created)
    }

    /// Returns the updated reminder, or `None` when no reminder has this id.
    async fn mark_done(&self, id: ReminderId) -> anyhow::Result<Option<Reminder>> {
        let reminders = self
            .modify(Box::new(move |reminders| {
                match reminders.iter_mut().find(|r| r.id == id) {
                    Some(reminder) => {
                        reminder.done = true;
                        true
                    }
                    None => false,
                }
            }))
            .await?;

        let updated = reminders.into_iter().find(|r| r.id == id);
        if updated.is_some() {
            log::info!("Marked reminder {id} as done");
        }
        Ok(updated)
    }
}

#[derive(Default)]
pub struct InMemoryReminderStorage {
    store: RwLock<Vec<Reminder>>,
}

impl InMemoryReminderStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reminders(reminders: Vec<Reminder>) -> Self {
        Self {
            store: RwLock::new(reminders),
        }
    }
}

#[async_trait]
impl ReminderStorage for InMemoryReminderStorage {
    async fn load_all(&self) -> anyhow::Result<Vec<Reminder>> {
        Ok(self.store.read().await.clone())
    }

    async fn save_all(&self, reminders: Vec<Reminder>) -> anyhow::Result<()> {
        *self.store.write().await = reminders;
        Ok(())
    }

    async fn modify(&self, change: ReminderChange) -> anyhow::Result<Vec<Reminder>> {
        let mut store = self.store.write().await;
        change(&mut store);
        Ok(store.clone())
    }
}
