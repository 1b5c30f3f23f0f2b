//! Validation and state reconciliation for a three-way percentage split.
//!
//! A submitted triple is validated, shown on the chart straight away, and
//! persisted in the background. Confirmed entries are prepended to a history
//! that is mirrored into a durable local cache.

pub mod bridge;
pub mod chart;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod history;
pub mod session;
pub mod validator;

pub use bridge::{AuthBridge, HttpPersistenceBridge, PersistenceBridge};
pub use chart::{ChartPresentationState, ChartSlice, ChartSnapshot, ChartSource};
pub use config::{load_settings, ClientSettings};
pub use coordinator::{PendingSubmission, SubmissionCoordinator};
pub use error::{AuthError, BridgeError, CacheError, SubmitError, ValidationError};
pub use history::HistoryStore;
pub use session::{AuthFlow, SessionStore};
pub use storage::{DurableCache, InMemoryCache};
pub use validator::validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

/// Transient message for the UI layer to show as a toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum ClientEvent {
    Notify(Notification),
    ChartChanged(ChartSnapshot),
    HistoryChanged { entries: usize },
}
