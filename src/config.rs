//! Configuration types for bond-autopilot

use crate::automation::AutomationSettings;
use crate::risk::TradingWindow;
use crate::telemetry::LogFormat;
use chrono::NaiveTime;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub market: MarketConfig,
    #[serde(default)]
    pub execution: ExecutionConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    /// Settings used until a settings document has been persisted
    #[serde(default)]
    pub automation: AutomationSettings,
}

/// Decision engine tuning
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EngineConfig {
    /// Minutes before a pending proposal goes inert
    #[serde(default = "default_proposal_ttl_minutes")]
    pub proposal_ttl_minutes: i64,

    /// Trailing percent and fixed-stop distance for protective orders
    #[serde(default = "default_stop_loss_pct")]
    pub stop_loss_pct: Decimal,

    /// Limit price offset from the signal price, in percent
    #[serde(default = "default_limit_buffer_pct")]
    pub limit_buffer_pct: Decimal,

    /// Portfolio value assumed when the live snapshot is unavailable
    #[serde(default = "default_fallback_portfolio_value")]
    pub fallback_portfolio_value: Decimal,

    /// Win rate used for sizing before any trade has completed
    #[serde(default = "default_win_rate")]
    pub default_win_rate: Decimal,

    /// Regular session open, UTC
    #[serde(default = "default_window_open")]
    pub trading_window_open: NaiveTime,

    /// Regular session close, UTC
    #[serde(default = "default_window_close")]
    pub trading_window_close: NaiveTime,

    /// Minimum seconds between signal processing runs
    #[serde(default = "default_signal_min_interval_secs")]
    pub signal_min_interval_secs: u64,

    /// Processed signals kept in history
    #[serde(default = "default_signal_history_limit")]
    pub signal_history_limit: usize,
}

fn default_proposal_ttl_minutes() -> i64 {
    crate::proposal::DEFAULT_PROPOSAL_TTL_MINUTES
}

fn default_stop_loss_pct() -> Decimal {
    Decimal::new(10, 0)
}

fn default_limit_buffer_pct() -> Decimal {
    Decimal::ONE
}

fn default_fallback_portfolio_value() -> Decimal {
    Decimal::new(100_000, 0)
}

fn default_win_rate() -> Decimal {
    Decimal::new(50, 0)
}

fn default_window_open() -> NaiveTime {
    TradingWindow::default().open
}

fn default_window_close() -> NaiveTime {
    TradingWindow::default().close
}

fn default_signal_min_interval_secs() -> u64 {
    60
}

fn default_signal_history_limit() -> usize {
    100
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            proposal_ttl_minutes: default_proposal_ttl_minutes(),
            stop_loss_pct: default_stop_loss_pct(),
            limit_buffer_pct: default_limit_buffer_pct(),
            fallback_portfolio_value: default_fallback_portfolio_value(),
            default_win_rate: default_win_rate(),
            trading_window_open: default_window_open(),
            trading_window_close: default_window_close(),
            signal_min_interval_secs: default_signal_min_interval_secs(),
            signal_history_limit: default_signal_history_limit(),
        }
    }
}

impl EngineConfig {
    pub fn trading_window(&self) -> TradingWindow {
        TradingWindow::new(self.trading_window_open, self.trading_window_close)
    }

    pub fn proposal_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.proposal_ttl_minutes)
    }
}

/// Persistence configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl StorageConfig {
    pub fn settings_path(&self) -> PathBuf {
        self.data_dir.join("automation-settings.json")
    }

    pub fn stats_path(&self) -> PathBuf {
        self.data_dir.join("daily-stats.json")
    }

    pub fn proposals_path(&self) -> PathBuf {
        self.data_dir.join("proposals.json")
    }

    pub fn journal_path(&self) -> PathBuf {
        self.data_dir.join("trade-journal.json")
    }
}

/// Portfolio data configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MarketConfig {
    /// JSON portfolio snapshot; without it every run uses fallback values
    pub snapshot_path: Option<PathBuf>,
}

/// Execution configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExecutionConfig {
    #[serde(default)]
    pub mode: ExecutionMode,
    /// Endpoint notified after each execution
    pub discussion_url: Option<String>,
}

/// Execution mode: simulated fills or no brokerage at all
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    #[default]
    Paper,
    Disabled,
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_format: LogFormat,
    pub metrics_port: Option<u16>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            metrics_port: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}
