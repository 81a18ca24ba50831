//! User-facing notifications.
//!
//! A notification is appended to one of two scopes. The transient scope is
//! stored in `ViewData` and seen only by views rendered for the current
//! response. The carried-over scope is stored in `TempData` and survives
//! one redirect.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::data::{TempData, ViewData};
use crate::config::NOTIFICATIONS_SEGMENT;

/// Notification severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NotifyType {
    Success,
    Error,
}

impl NotifyType {
    pub const ALL: [NotifyType; 2] = [NotifyType::Success, NotifyType::Error];
}

impl fmt::Display for NotifyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotifyType::Success => f.write_str("Success"),
            NotifyType::Error => f.write_str("Error"),
        }
    }
}

/// Lifetime of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationScope {
    /// Current response only
    Transient,
    /// Next request only
    CarriedOver,
}

impl NotificationScope {
    pub fn from_persist(persist_for_next_request: bool) -> Self {
        if persist_for_next_request {
            NotificationScope::CarriedOver
        } else {
            NotificationScope::Transient
        }
    }
}

/// A single notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationEntry {
    pub severity: NotifyType,
    pub message: String,
}

/// Data key for a severity: `<namespace>.notifications.<severity>`.
pub fn notification_key(namespace: &str, severity: NotifyType) -> String {
    format!("{}.{}.{}", namespace, NOTIFICATIONS_SEGMENT, severity)
}

/// Append `message` to the bag selected by `scope`.
pub(crate) fn push_notification(
    namespace: &str,
    view_data: &mut ViewData,
    temp_data: &mut TempData,
    severity: NotifyType,
    message: String,
    scope: NotificationScope,
) {
    let key = notification_key(namespace, severity);
    match scope {
        NotificationScope::Transient => view_data.bag_mut().push_to_list(&key, message),
        NotificationScope::CarriedOver => temp_data.push_to_list(&key, message),
    }
}

/// Notifications ready for display, grouped by severity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NotificationSet {
    pub success: Vec<String>,
    pub error: Vec<String>,
}

impl NotificationSet {
    /// Collect both scopes. Carried-over entries come first since they were
    /// raised by the previous request; reading them consumes them.
    pub(crate) fn collect(namespace: &str, view_data: &ViewData, temp_data: &mut TempData) -> Self {
        let mut set = NotificationSet::default();
        for severity in NotifyType::ALL {
            let key = notification_key(namespace, severity);
            let mut messages = temp_data.take_list(&key);
            messages.extend(view_data.bag().list(&key));
            match severity {
                NotifyType::Success => set.success = messages,
                NotifyType::Error => set.error = messages,
            }
        }
        set
    }

    pub fn is_empty(&self) -> bool {
        self.success.is_empty() && self.error.is_empty()
    }

    /// All entries as (severity, message) pairs
    pub fn entries(&self) -> Vec<NotificationEntry> {
        let success = self.success.iter().map(|message| NotificationEntry {
            severity: NotifyType::Success,
            message: message.clone(),
        });
        let error = self.error.iter().map(|message| NotificationEntry {
            severity: NotifyType::Error,
            message: message.clone(),
        });
        success.chain(error).collect()
    }
}
