//! Periodic signal processing job

use super::{AutomationError, AutomationOrchestrator, SignalOutcome};
use crate::signal::Signal;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

/// Result of one signal within a run
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedSignal {
    pub timestamp: DateTime<Utc>,
    pub signal: Signal,
    /// Outcome label, or `error`
    pub result: String,
    /// Human-readable detail: filter reason, blocked reasons, order id or error
    pub detail: Option<String>,
}

impl ProcessedSignal {
    fn from_result(
        signal: Signal,
        result: &Result<SignalOutcome, AutomationError>,
        now: DateTime<Utc>,
    ) -> Self {
        let (label, detail) = match result {
            Ok(outcome) => (outcome.label().to_string(), outcome_detail(outcome)),
            Err(e) => ("error".to_string(), Some(e.to_string())),
        };
        Self {
            timestamp: now,
            signal,
            result: label,
            detail,
        }
    }
}

fn outcome_detail(outcome: &SignalOutcome) -> Option<String> {
    match outcome {
        SignalOutcome::Filtered { reason } | SignalOutcome::PositionTooSmall { reason } => {
            Some(reason.clone())
        }
        SignalOutcome::AlertCreated => None,
        SignalOutcome::ProposalCreated { proposal } => Some(proposal.id.clone()),
        SignalOutcome::Blocked { risk_check } => Some(risk_check.blocked_summary()),
        SignalOutcome::Executed(report) => Some(report.order_id.clone()),
        SignalOutcome::ExecutionFailed { error, .. } => Some(error.to_string()),
    }
}

/// Summary of a completed run
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub run: u64,
    pub started_at: DateTime<Utc>,
    pub results: Vec<ProcessedSignal>,
}

impl RunSummary {
    pub fn count(&self, label: &str) -> usize {
        self.results.iter().filter(|r| r.result == label).count()
    }
}

/// Job refusals
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProcessorError {
    #[error("Too soon: next run in {next_run_in_secs}s")]
    TooSoon { next_run_in_secs: i64 },
}

struct ProcessorState {
    last_run: Option<DateTime<Utc>>,
    run_count: u64,
    history: VecDeque<ProcessedSignal>,
}

/// Batch signal processor with a minimum interval between runs
pub struct SignalProcessor {
    orchestrator: Arc<AutomationOrchestrator>,
    min_interval: Duration,
    history_limit: usize,
    state: Mutex<ProcessorState>,
}

impl SignalProcessor {
    pub fn new(
        orchestrator: Arc<AutomationOrchestrator>,
        min_interval: Duration,
        history_limit: usize,
    ) -> Self {
        Self {
            orchestrator,
            min_interval,
            history_limit,
            state: Mutex::new(ProcessorState {
                last_run: None,
                run_count: 0,
                history: VecDeque::new(),
            }),
        }
    }

    pub async fn run(&self, signals: Vec<Signal>, force: bool) -> Result<RunSummary, ProcessorError> {
        self.run_at(signals, force, Utc::now()).await
    }

    /// Process `signals` in order. Unless `force` is set, refuses to start
    /// within `min_interval` of the previous run. Runs never overlap.
    pub async fn run_at(
        &self,
        signals: Vec<Signal>,
        force: bool,
        now: DateTime<Utc>,
    ) -> Result<RunSummary, ProcessorError> {
        let mut state = self.state.lock().await;

        if let Some(last) = state.last_run {
            let elapsed = now - last;
            if !force && elapsed < self.min_interval {
                let next_run_in_secs = (self.min_interval - elapsed).num_seconds().max(1);
                tracing::debug!(next_run_in_secs, "Signal run skipped");
                return Err(ProcessorError::TooSoon { next_run_in_secs });
            }
        }

        state.last_run = Some(now);
        state.run_count += 1;
        let run = state.run_count;
        tracing::info!(run, signals = signals.len(), force, "Signal run started");

        let mut results = Vec::with_capacity(signals.len());
        for signal in signals {
            let result = self.orchestrator.process_signal_at(&signal, now).await;
            if let Err(e) = &result {
                tracing::warn!(ticker = %signal.ticker, error = %e, "Signal failed");
            }
            results.push(ProcessedSignal::from_result(signal, &result, now));
        }

        for processed in &results {
            state.history.push_front(processed.clone());
        }
        state.history.truncate(self.history_limit);

        tracing::info!(run, processed = results.len(), "Signal run finished");
        Ok(RunSummary {
            run,
            started_at: now,
            results,
        })
    }

    /// Processed signals, newest first
    pub async fn history(&self) -> Vec<ProcessedSignal> {
        self.state.lock().await.history.iter().cloned().collect()
    }

    pub async fn run_count(&self) -> u64 {
        self.state.lock().await.run_count
    }

    pub async fn last_run(&self) -> Option<DateTime<Utc>> {
        self.state.lock().await.last_run
    }
}
