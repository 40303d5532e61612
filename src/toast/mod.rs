//! Transient user-facing notifications.
//!
//! The toast center owns the active toast set; the frontend renders it from
//! `toast-added` / `toast-dismissed` events. Every toast self-destructs after
//! a fixed delay unless dismissed explicitly first. Timers are independent
//! spawned tasks; overlapping toasts never cancel each other.

pub mod commands;

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tauri::{AppHandle, Emitter};
use tokio::sync::Mutex;
use uuid::Uuid;

pub const TOAST_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ToastSeverity {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Toast {
    pub id: Uuid,
    pub message: String,
    pub severity: ToastSeverity,
}

pub struct ToastCenter {
    inner: Arc<Mutex<Vec<Toast>>>,
    app_handle: Option<AppHandle>,
}

impl ToastCenter {
    /// Center wired to the running app; events reach the webview.
    pub fn attached(app_handle: AppHandle) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Vec::new())),
            app_handle: Some(app_handle),
        }
    }

    /// Center with no event sink. Used in tests.
    pub fn detached() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Vec::new())),
            app_handle: None,
        }
    }

    pub async fn success(&self, message: impl Into<String>) -> Toast {
        self.push(message, ToastSeverity::Success).await
    }

    pub async fn error(&self, message: impl Into<String>) -> Toast {
        self.push(message, ToastSeverity::Error).await
    }

    pub async fn info(&self, message: impl Into<String>) -> Toast {
        self.push(message, ToastSeverity::Info).await
    }

    pub async fn push(&self, message: impl Into<String>, severity: ToastSeverity) -> Toast {
        let toast = Toast {
            id: Uuid::new_v4(),
            message: message.into(),
            severity,
        };

        self.inner.lock().await.push(toast.clone());
        self.emit("toast-added", &toast);

        let center = self.clone();
        let id = toast.id;
        tokio::spawn(async move {
            tokio::time::sleep(TOAST_TTL).await;
            center.dismiss(id).await;
        });

        toast
    }

    /// Remove a toast immediately. A no-op if it already expired or was
    /// dismissed; the expiry task lands here too and must not double-emit.
    pub async fn dismiss(&self, id: Uuid) -> bool {
        let removed = {
            let mut toasts = self.inner.lock().await;
            let before = toasts.len();
            toasts.retain(|toast| toast.id != id);
            toasts.len() != before
        };

        if removed {
            self.emit("toast-dismissed", &id);
        }
        removed
    }

    pub async fn active(&self) -> Vec<Toast> {
        self.inner.lock().await.clone()
    }

    fn emit<P: Serialize + Clone>(&self, event: &str, payload: &P) {
        if let Some(handle) = &self.app_handle {
            let _ = handle.emit(event, payload.clone());
        }
    }
}

impl Clone for ToastCenter {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            app_handle: self.app_handle.clone(),
        }
    }
}
