//! Toast notifications.
//!
//! A [`NotificationPresenter`] owns its container: the list of toasts that
//! are currently visible. Create one at application setup and pass it (as an
//! `Arc`) to whatever needs to show messages, including
//! [`RequestClientBuilder::presenter`](crate::client::RequestClientBuilder::presenter).
//! Drawing the toasts is left to the embedding UI; this module only keeps
//! the records and their lifetimes.

use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::debug;
use uuid::Uuid;

pub const DEFAULT_DURATION: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    #[default]
    Info,
}

impl NotificationKind {
    /// Built-in palette used when the caller does not override colours.
    pub fn palette(&self) -> NotificationColors {
        let (background, text, border) = match self {
            NotificationKind::Success => ("#ecfdf5", "#065f46", "#10b981"),
            NotificationKind::Error => ("#fef2f2", "#991b1b", "#ef4444"),
            NotificationKind::Warning => ("#fffbeb", "#92400e", "#f59e0b"),
            NotificationKind::Info => ("#eff6ff", "#1e40af", "#3b82f6"),
        };
        NotificationColors {
            background: background.to_string(),
            text: text.to_string(),
            border: border.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationColors {
    pub background: String,
    pub text: String,
    pub border: String,
}

/// Everything `show` accepts. Colour fields left as `None` fall back to the
/// kind's palette.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationOptions {
    pub kind: NotificationKind,
    pub message: String,
    /// Zero keeps the toast until dismissed.
    pub duration: Duration,
    pub closeable: bool,
    pub background: Option<String>,
    pub text_color: Option<String>,
    pub border_color: Option<String>,
}

impl Default for NotificationOptions {
    fn default() -> Self {
        Self {
            kind: NotificationKind::Info,
            message: String::new(),
            duration: DEFAULT_DURATION,
            closeable: true,
            background: None,
            text_color: None,
            border_color: None,
        }
    }
}

impl NotificationOptions {
    pub fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Warning, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Info, message)
    }

    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn sticky(self) -> Self {
        self.duration(Duration::ZERO)
    }

    pub fn closeable(mut self, closeable: bool) -> Self {
        self.closeable = closeable;
        self
    }

    pub fn background(mut self, color: impl Into<String>) -> Self {
        self.background = Some(color.into());
        self
    }

    pub fn text_color(mut self, color: impl Into<String>) -> Self {
        self.text_color = Some(color.into());
        self
    }

    pub fn border_color(mut self, color: impl Into<String>) -> Self {
        self.border_color = Some(color.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ToastId(Uuid);

/// A toast currently held by the presenter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: ToastId,
    pub kind: NotificationKind,
    pub message: String,
    pub closeable: bool,
    pub colors: NotificationColors,
    pub created_at: Instant,
    pub expires_at: Option<Instant>,
}

impl Toast {
    pub fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

#[derive(Default)]
pub struct NotificationPresenter {
    container: Mutex<Vec<Toast>>,
}

impl NotificationPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&self, options: NotificationOptions) -> ToastId {
        let palette = options.kind.palette();
        let now = Instant::now();
        let toast = Toast {
            id: ToastId(Uuid::new_v4()),
            kind: options.kind,
            message: options.message,
            closeable: options.closeable,
            colors: NotificationColors {
                background: options.background.unwrap_or(palette.background),
                text: options.text_color.unwrap_or(palette.text),
                border: options.border_color.unwrap_or(palette.border),
            },
            created_at: now,
            expires_at: (!options.duration.is_zero()).then(|| now + options.duration),
        };
        debug!(kind = ?toast.kind, message = %toast.message, "toast shown");
        let id = toast.id;
        self.container.lock().unwrap().push(toast);
        id
    }

    /// Remove a toast. Returns false when it was already gone.
    pub fn dismiss(&self, id: ToastId) -> bool {
        let mut toasts = self.container.lock().unwrap();
        let before = toasts.len();
        toasts.retain(|t| t.id != id);
        toasts.len() < before
    }

    /// Drop every toast whose duration has elapsed at `now`; returns how many.
    pub fn prune_expired(&self, now: Instant) -> usize {
        let mut toasts = self.container.lock().unwrap();
        let before = toasts.len();
        toasts.retain(|t| !t.is_expired(now));
        before - toasts.len()
    }

    /// Toasts in the order they were shown.
    pub fn active(&self) -> Vec<Toast> {
        self.container.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.container.lock().unwrap().clear();
    }

    pub fn len(&self) -> usize {
        self.container.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
