//! Automation settings

use crate::risk::RiskLimits;
use crate::signal::SignalFilters;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Dispatch mode for incoming signals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AutomationLevel {
    /// Alert only
    #[default]
    Manual,
    /// Create proposals for human approval
    SemiAuto,
    /// Submit orders autonomously when risk allows
    FullAuto,
}

impl std::fmt::Display for AutomationLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AutomationLevel::Manual => "manual",
            AutomationLevel::SemiAuto => "semi-auto",
            AutomationLevel::FullAuto => "full-auto",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for AutomationLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manual" => Ok(AutomationLevel::Manual),
            "semi-auto" => Ok(AutomationLevel::SemiAuto),
            "full-auto" => Ok(AutomationLevel::FullAuto),
            other => Err(format!(
                "unknown automation level '{other}' (expected manual, semi-auto or full-auto)"
            )),
        }
    }
}

/// Which alerts are published
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationPrefs {
    pub on_proposal: bool,
    pub on_execution: bool,
    pub on_risk_limit: bool,
    pub on_error: bool,
}

impl Default for NotificationPrefs {
    fn default() -> Self {
        Self {
            on_proposal: true,
            on_execution: true,
            on_risk_limit: true,
            on_error: true,
        }
    }
}

/// Process-wide automation configuration, persisted as one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AutomationSettings {
    /// Kill switch; false blocks every non-manual action
    pub enabled: bool,
    pub level: AutomationLevel,
    pub risk_limits: RiskLimits,
    pub signal_filters: SignalFilters,
    pub notifications: NotificationPrefs,
    pub last_modified: Option<DateTime<Utc>>,
    pub modified_by: Option<String>,
}

impl Default for AutomationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            level: AutomationLevel::Manual,
            risk_limits: RiskLimits::default(),
            signal_filters: SignalFilters::default(),
            notifications: NotificationPrefs::default(),
            last_modified: None,
            modified_by: None,
        }
    }
}

/// Partial settings update; absent fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsUpdate {
    pub enabled: Option<bool>,
    pub level: Option<AutomationLevel>,
    pub risk_limits: Option<RiskLimits>,
    pub signal_filters: Option<SignalFilters>,
    pub notifications: Option<NotificationPrefs>,
}

impl SettingsUpdate {
    pub fn is_empty(&self) -> bool {
        self == &SettingsUpdate::default()
    }
}

impl AutomationSettings {
    /// Apply a patch and stamp the audit fields
    pub fn apply(&mut self, update: SettingsUpdate, modified_by: &str, now: DateTime<Utc>) {
        if let Some(enabled) = update.enabled {
            self.enabled = enabled;
        }
        if let Some(level) = update.level {
            self.level = level;
        }
        if let Some(limits) = update.risk_limits {
            self.risk_limits = limits;
        }
        if let Some(filters) = update.signal_filters {
            self.signal_filters = filters;
        }
        if let Some(notifications) = update.notifications {
            self.notifications = notifications;
        }
        self.last_modified = Some(now);
        self.modified_by = Some(modified_by.to_string());
    }
}
