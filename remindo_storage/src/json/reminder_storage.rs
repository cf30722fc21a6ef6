mod model;

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use model::ReminderStorageModel;
use remindo_models::reminder::Reminder;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::reminder::{ReminderChange, ReminderStorage};

#[derive(Debug, Error)]
pub enum JsonStorageError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Keeps every reminder in one JSON document on disk.
///
/// A record that cannot be understood is skipped with a warning instead of
/// failing the whole load, so one bad entry never hides the others.
pub struct JsonFileReminderStorage {
    path: PathBuf,
    file_lock: Mutex<()>,
}

impl JsonFileReminderStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            file_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> Result<Vec<Reminder>, JsonStorageError> {
        let _guard = self.file_lock.lock().await;
        self.read_locked().await
    }

    async fn write(&self, reminders: Vec<Reminder>) -> Result<(), JsonStorageError> {
        let _guard = self.file_lock.lock().await;
        self.write_locked(reminders).await
    }

    // Callers must hold `file_lock`.
    async fn read_locked(&self) -> Result<Vec<Reminder>, JsonStorageError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        let records: Vec<serde_json::Value> = serde_json::from_slice(&bytes)?;
        let reminders = records
            .into_iter()
            .enumerate()
            .filter_map(|(index, record)| parse_record(index, record))
            .collect();

        Ok(reminders)
    }

    // Callers must hold `file_lock`.
    async fn write_locked(&self, reminders: Vec<Reminder>) -> Result<(), JsonStorageError> {
        let records: Vec<ReminderStorageModel> = reminders.into_iter().map(Into::into).collect();
        let bytes = serde_json::to_vec_pretty(&records)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, bytes).await?;
        tokio::fs::rename(&tmp_path, &self.path).await?;

        log::debug!("Saved {} reminders to {}", records.len(), self.path.display());
        Ok(())
    }
}

fn parse_record(index: usize, record: serde_json::Value) -> Option<Reminder> {
    let model = match serde_json::from_value::<ReminderStorageModel>(record) {
        Ok(model) => model,
        Err(e) => {
            log::warn!("Skipping unreadable reminder record #{index}: {e}");
            return None;
        }
    };

    let id = model.id;
    match Reminder::try_from(model) {
        Ok(reminder) => Some(reminder),
        Err(e) => {
            log::warn!("Skipping reminder {id}: {e}");
            None
        }
    }
}

#[async_trait]
impl ReminderStorage for JsonFileReminderStorage {
    async fn load_all(&self) -> anyhow::Result<Vec<Reminder>> {
        Ok(self.read().await?)
    }

    async fn save_all(&self, reminders: Vec<Reminder>) -> anyhow::Result<()> {
        Ok(self.write(reminders).await?)
    }

    async fn modify(&self, change: ReminderChange) -> anyhow::Result<Vec<Reminder>> {
        let _guard = self.file_lock.lock().await;

        let mut reminders = self.read_locked().await?;
        if change(&mut reminders) {
            self.write_locked(reminders.clone()).await?;
        }

        Ok(reminders)
    }
}
