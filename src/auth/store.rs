use std::{fs, path::PathBuf, sync::RwLock};

use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Serialize};

/// The locally persisted record representing a signed-in demo user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub email: String,
    pub display_name: String,
    pub established_at: DateTime<Utc>,
}

/// Durable storage for the single session record (`session.json` under the
/// app data directory). Malformed content on disk is treated as the absence
/// of a session: the file is removed and restore yields nothing.
pub struct SessionStore {
    path: PathBuf,
    data: RwLock<Option<SessionRecord>>,
}

impl SessionStore {
    pub fn new(path: PathBuf) -> Self {
        let data = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(record) => Some(record),
                Err(err) => {
                    warn!("Discarding malformed session record: {}", err);
                    let _ = fs::remove_file(&path);
                    None
                }
            },
            Err(_) => None,
        };

        Self {
            path,
            data: RwLock::new(data),
        }
    }

    pub fn current(&self) -> Option<SessionRecord> {
        self.data.read().unwrap().clone()
    }

    pub fn persist(&self, record: SessionRecord) {
        {
            let mut guard = self.data.write().unwrap();
            *guard = Some(record.clone());
        }
        // Storage failure leaves the in-memory session intact; the user just
        // signs in again after a restart.
        match serde_json::to_string_pretty(&record) {
            Ok(serialized) => {
                if let Err(err) = fs::write(&self.path, serialized) {
                    warn!("Failed to persist session to {}: {}", self.path.display(), err);
                }
            }
            Err(err) => warn!("Failed to serialize session record: {}", err),
        }
    }

    pub fn clear(&self) {
        *self.data.write().unwrap() = None;
        if self.path.exists() {
            if let Err(err) = fs::remove_file(&self.path) {
                warn!("Failed to remove persisted session: {}", err);
            }
        }
    }
}
