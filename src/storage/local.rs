use chrono::Utc;
use tokio::sync::Mutex;

use super::device::{AnyStore, DeviceStore, StoreError};
use super::{BackendError, MAX_NOTES, MAX_SESSION_NOTES, NoteBackend};
use crate::models::{Note, default_notes};

pub const DEFAULT_STORAGE_KEY: &str = "thanksgiving-gratitude-notes";

/// Notes kept on this device only. Never fails outward: unreadable data
/// falls back to the example notes and failed writes are logged.
#[derive(Debug)]
pub struct LocalBackend {
    store: AnyStore,
    key: String,
    notes: Mutex<Vec<Note>>,
}

impl LocalBackend {
    pub fn new(store: AnyStore, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            notes: Mutex::new(Vec::new()),
        }
    }

    /// Reads the stored list, substituting the example notes when it is
    /// absent or unreadable.
    pub async fn load(&self) -> Vec<Note> {
        let notes = match self.read_stored().await {
            Ok(Some(notes)) => notes,
            Ok(None) => default_notes(Utc::now()),
            Err(e) => {
                tracing::warn!("Could not read saved notes, falling back to defaults: {e}");
                default_notes(Utc::now())
            }
        };

        *self.notes.lock().await = notes.clone();
        notes
    }

    /// Saves `notes` (newest first) as the device's list.
    pub async fn persist(&self, notes: &[Note]) {
        *self.notes.lock().await = notes[..notes.len().min(MAX_SESSION_NOTES)].to_vec();
        self.write(notes).await;
    }

    async fn read_stored(&self) -> Result<Option<Vec<Note>>, StoreError> {
        let Some(raw) = self.store.get(&self.key).await? else {
            return Ok(None);
        };

        match serde_json::from_str::<serde_json::Value>(&raw)? {
            value @ serde_json::Value::Array(_) => Ok(Some(serde_json::from_value(value)?)),
            _ => Ok(None),
        }
    }

    async fn write(&self, notes: &[Note]) {
        let kept = &notes[..notes.len().min(MAX_NOTES)];

        let result = match serde_json::to_string(kept) {
            Ok(serialized) => self.store.set(&self.key, serialized).await,
            Err(e) => Err(e.into()),
        };

        if let Err(e) = result {
            tracing::warn!("Could not save notes: {e}");
        }
    }
}

impl NoteBackend for LocalBackend {
    fn is_shared(&self) -> bool {
        false
    }

    async fn fetch_notes(&self) -> Result<Vec<Note>, BackendError> {
        Ok(self.load().await)
    }

    async fn create_note(&self, note: &Note) -> Result<Note, BackendError> {
        let notes = {
            let mut notes = self.notes.lock().await;
            notes.insert(0, note.clone());
            notes.truncate(MAX_SESSION_NOTES);
            notes.clone()
        };

        self.write(&notes).await;
        Ok(note.clone())
    }
}
