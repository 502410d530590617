//! Alert sink implementations

use super::{Alert, AlertLevel, AlertSink};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Writes alerts to the tracing subscriber
#[derive(Debug, Clone, Copy, Default)]
pub struct LogAlertSink;

impl AlertSink for LogAlertSink {
    fn publish(&self, alert: Alert) {
        match alert.level {
            AlertLevel::Danger => tracing::error!(
                category = ?alert.category,
                agent = %alert.agent,
                title = %alert.title,
                "{}",
                alert.message
            ),
            AlertLevel::Warning => tracing::warn!(
                category = ?alert.category,
                agent = %alert.agent,
                title = %alert.title,
                "{}",
                alert.message
            ),
            AlertLevel::Info | AlertLevel::Success => tracing::info!(
                category = ?alert.category,
                agent = %alert.agent,
                title = %alert.title,
                "{}",
                alert.message
            ),
        }
    }
}

/// Keeps the most recent alerts in memory, newest first
#[derive(Clone)]
pub struct MemoryAlertSink {
    alerts: Arc<Mutex<VecDeque<Alert>>>,
    capacity: usize,
}

impl MemoryAlertSink {
    pub fn new(capacity: usize) -> Self {
        Self {
            alerts: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    /// Snapshot of stored alerts, newest first
    pub fn alerts(&self) -> Vec<Alert> {
        match self.alerts.lock() {
            Ok(alerts) => alerts.iter().cloned().collect(),
            Err(poisoned) => poisoned.into_inner().iter().cloned().collect(),
        }
    }

    /// Alerts whose title starts with `prefix`
    pub fn with_title_prefix(&self, prefix: &str) -> Vec<Alert> {
        self.alerts()
            .into_iter()
            .filter(|a| a.title.starts_with(prefix))
            .collect()
    }
}

impl Default for MemoryAlertSink {
    fn default() -> Self {
        Self::new(200)
    }
}

impl AlertSink for MemoryAlertSink {
    fn publish(&self, alert: Alert) {
        let mut alerts = match self.alerts.lock() {
            Ok(alerts) => alerts,
            Err(poisoned) => poisoned.into_inner(),
        };
        alerts.push_front(alert);
        alerts.truncate(self.capacity);
    }
}
