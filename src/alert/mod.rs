//! Alert module
//!
//! Fire-and-forget notification surface for signals, proposals, executions
//! and risk events

mod sink;

pub use sink::{LogAlertSink, MemoryAlertSink};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Agent name used for alerts raised by the risk engine itself
pub const RISK_AGENT: &str = "TYCHE";
/// Agent name used for system-level alerts
pub const SYSTEM_AGENT: &str = "SYSTEM";

/// Alert severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Info,
    Success,
    Warning,
    Danger,
}

/// Alert category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertCategory {
    Signal,
    Proposal,
    Risk,
    Execution,
    Error,
    System,
}

/// A user-visible notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: Uuid,
    pub level: AlertLevel,
    pub category: AlertCategory,
    pub title: String,
    pub message: String,
    pub agent: String,
    pub acknowledged: bool,
    pub timestamp: DateTime<Utc>,
}

impl Alert {
    /// Create a new, unacknowledged alert
    pub fn new(
        level: AlertLevel,
        category: AlertCategory,
        title: impl Into<String>,
        message: impl Into<String>,
        agent: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            level,
            category,
            title: title.into(),
            message: message.into(),
            agent: agent.into(),
            acknowledged: false,
            timestamp: Utc::now(),
        }
    }
}

/// Trait for alert destinations. Publishing never fails the caller.
pub trait AlertSink: Send + Sync {
    fn publish(&self, alert: Alert);
}
