//! Prometheus metrics

use metrics::{counter, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Counter metric types
#[derive(Debug, Clone, Copy)]
pub enum CounterMetric {
    /// Signals processed, labelled by outcome
    Signals,
    /// Risk evaluations, labelled by result
    RiskChecks,
    /// Entry orders, labelled by result
    Orders,
    /// Protective orders, labelled by result
    ProtectiveOrders,
    /// Proposal transitions, labelled by target status
    Proposals,
    /// Failed store writes, labelled by resource
    StoreFailures,
}

/// Gauge metric types
#[derive(Debug, Clone, Copy)]
pub enum GaugeMetric {
    /// Current drawdown percentage
    DrawdownPct,
    /// Worst drawdown in the current epoch
    MaxDrawdownPct,
    /// Trades executed today
    DailyTrades,
    /// Pending proposals
    PendingProposals,
    /// 1 when automation is enabled, 0 otherwise
    AutomationEnabled,
}

impl CounterMetric {
    fn name(self) -> &'static str {
        match self {
            CounterMetric::Signals => "autopilot_signals_total",
            CounterMetric::RiskChecks => "autopilot_risk_checks_total",
            CounterMetric::Orders => "autopilot_orders_total",
            CounterMetric::ProtectiveOrders => "autopilot_protective_orders_total",
            CounterMetric::Proposals => "autopilot_proposal_transitions_total",
            CounterMetric::StoreFailures => "autopilot_store_failures_total",
        }
    }
}

impl GaugeMetric {
    fn name(self) -> &'static str {
        match self {
            GaugeMetric::DrawdownPct => "autopilot_drawdown_pct",
            GaugeMetric::MaxDrawdownPct => "autopilot_max_drawdown_pct",
            GaugeMetric::DailyTrades => "autopilot_daily_trades",
            GaugeMetric::PendingProposals => "autopilot_pending_proposals",
            GaugeMetric::AutomationEnabled => "autopilot_automation_enabled",
        }
    }
}

/// Increment a counter with a single `result` label
pub fn increment(metric: CounterMetric, result: &'static str) {
    counter!(metric.name(), "result" => result).increment(1);
}

/// Set a gauge value
pub fn set_gauge(metric: GaugeMetric, value: f64) {
    gauge!(metric.name()).set(value);
}

/// Install the Prometheus recorder and HTTP listener
pub fn init_metrics(port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics exporter: {}", e))?;

    tracing::info!(%addr, "Prometheus metrics listening");
    Ok(())
}
