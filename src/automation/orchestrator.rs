//! Automation orchestrator
//!
//! Turns signals into alerts, proposals or orders depending on the automation
//! level, and owns the administrative operations (approve, reject, kill
//! switch, settings, stats reset).
//!
//! Shared state sits behind one lock per resource. The trading decision lock
//! is held from the portfolio snapshot through order submission and trade
//! recording, so two autonomous orders can never both clear a limit that only
//! one of them fits under. Lock order: decision, settings, stats, proposals,
//! journal.

use super::discussion::{spawn_discussion, DiscussionTrigger};
use super::{
    ApprovedTrade, AutomationError, AutomationLevel, AutomationSettings, AutomationStatus,
    ExecutionReport, SettingsUpdate, SignalOutcome,
};
use crate::alert::{Alert, AlertCategory, AlertLevel, AlertSink, RISK_AGENT, SYSTEM_AGENT};
use crate::config::EngineConfig;
use crate::execution::{
    limit_price_for, Broker, OrderAck, OrderRequest, OrderType, ProtectiveOrderResult,
    StopLossCascade,
};
use crate::journal::{JournalEntry, TradeJournal};
use crate::market::{MarketData, PortfolioSnapshot};
use crate::proposal::{ProposalSignal, ProposalStore, ProposedOrder, TradeProposal};
use crate::risk::{
    DailyStats, DailyStatsTracker, OrderCandidate, PositionSizer, RiskCheckResult, RiskPolicy,
    SizingDecision, TradeRecord,
};
use crate::signal::{FilterResult, Side, Signal};
use crate::storage::{JsonFileStore, MemoryStore, Store, StoreError};
use crate::telemetry::{self, CounterMetric, GaugeMetric};
use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// Warning attached to risk checks run against fallback portfolio values
pub const FALLBACK_PORTFOLIO_WARNING: &str = "Could not fetch portfolio - using fallback values";

/// External capabilities the orchestrator drives
pub struct Collaborators {
    pub broker: Arc<dyn Broker>,
    pub market: Arc<dyn MarketData>,
    pub alerts: Arc<dyn AlertSink>,
    pub discussion: Option<Arc<dyn DiscussionTrigger>>,
}

/// Durable storage for each shared resource
#[derive(Clone)]
pub struct Stores {
    pub settings: Arc<dyn Store<AutomationSettings>>,
    pub stats: Arc<dyn Store<DailyStats>>,
    pub proposals: Arc<dyn Store<Vec<TradeProposal>>>,
    pub journal: Arc<dyn Store<Vec<JournalEntry>>>,
}

impl Stores {
    /// Process-local stores, lost on exit
    pub fn in_memory() -> Self {
        Self {
            settings: Arc::new(MemoryStore::new()),
            stats: Arc::new(MemoryStore::new()),
            proposals: Arc::new(MemoryStore::new()),
            journal: Arc::new(MemoryStore::new()),
        }
    }

    /// JSON documents under `data_dir`
    pub fn json(config: &crate::config::StorageConfig) -> Self {
        Self {
            settings: Arc::new(JsonFileStore::new(config.settings_path())),
            stats: Arc::new(JsonFileStore::new(config.stats_path())),
            proposals: Arc::new(JsonFileStore::new(config.proposals_path())),
            journal: Arc::new(JsonFileStore::new(config.journal_path())),
        }
    }

    /// JSON documents with the default file names under `dir`
    pub fn json_in(dir: &Path) -> Self {
        Self::json(&crate::config::StorageConfig {
            data_dir: dir.to_path_buf(),
        })
    }
}

/// Sizing and risk verdict for one signal
struct Assessment {
    sizing: SizingDecision,
    risk_check: RiskCheckResult,
    limit_price: Decimal,
}

/// Composes sizing, risk, proposals and execution
pub struct AutomationOrchestrator {
    engine: EngineConfig,
    policy: RiskPolicy,
    sizer: PositionSizer,
    broker: Arc<dyn Broker>,
    market: Arc<dyn MarketData>,
    alerts: Arc<dyn AlertSink>,
    discussion: Option<Arc<dyn DiscussionTrigger>>,
    cascade: StopLossCascade,
    stores: Stores,
    decision_lock: Mutex<()>,
    settings: RwLock<AutomationSettings>,
    stats: Mutex<DailyStatsTracker>,
    proposals: Mutex<ProposalStore>,
    journal: Mutex<TradeJournal>,
}

impl AutomationOrchestrator {
    /// Load persisted state, falling back to `defaults` for settings and a
    /// fresh ledger for stats
    pub async fn load(
        engine: EngineConfig,
        collaborators: Collaborators,
        stores: Stores,
        defaults: AutomationSettings,
    ) -> Result<Self, AutomationError> {
        let settings = stores.settings.load().await?.unwrap_or(defaults);
        let stats = match stores.stats.load().await? {
            Some(stats) => DailyStatsTracker::new(stats),
            None => DailyStatsTracker::starting(Utc::now()),
        };
        let proposals = stores.proposals.load().await?.unwrap_or_default();
        let journal = TradeJournal::load(stores.journal.clone()).await?;

        tracing::info!(
            enabled = settings.enabled,
            level = %settings.level,
            proposals = proposals.len(),
            journal_entries = journal.entries().len(),
            broker_configured = collaborators.broker.is_configured(),
            "Automation state loaded"
        );
        telemetry::set_gauge(
            GaugeMetric::AutomationEnabled,
            if settings.enabled { 1.0 } else { 0.0 },
        );

        let cascade = StopLossCascade::new(collaborators.broker.clone(), collaborators.alerts.clone());
        Ok(Self {
            policy: RiskPolicy::new(engine.trading_window()),
            sizer: PositionSizer::default(),
            proposals: Mutex::new(ProposalStore::with_proposals(proposals, engine.proposal_ttl())),
            engine,
            broker: collaborators.broker,
            market: collaborators.market,
            alerts: collaborators.alerts,
            discussion: collaborators.discussion,
            cascade,
            stores,
            decision_lock: Mutex::new(()),
            settings: RwLock::new(settings),
            stats: Mutex::new(stats),
            journal: Mutex::new(journal),
        })
    }

    /// Process a signal at the current time
    pub async fn process_signal(&self, signal: &Signal) -> Result<SignalOutcome, AutomationError> {
        self.process_signal_at(signal, Utc::now()).await
    }

    /// Process a signal according to the current automation level.
    ///
    /// The kill switch is checked first: while disabled every signal yields
    /// `Blocked`, malformed ones included. Validation and filters run next,
    /// before any sizing or risk work.
    pub async fn process_signal_at(
        &self,
        signal: &Signal,
        now: DateTime<Utc>,
    ) -> Result<SignalOutcome, AutomationError> {
        let settings = self.settings.read().await.clone();
        if settings.enabled {
            signal.validate().map_err(AutomationError::InvalidSignal)?;
        }

        let outcome = if !settings.enabled {
            self.blocked(signal, RiskCheckResult::kill_switch(), &settings)
        } else if let FilterResult::Reject(reason) = settings.signal_filters.apply(signal) {
            SignalOutcome::Filtered {
                reason: reason.to_string(),
            }
        } else {
            match settings.level {
                AutomationLevel::Manual => self.alert_only(signal),
                AutomationLevel::SemiAuto => self.propose(signal, &settings, now).await,
                AutomationLevel::FullAuto => self.execute_autonomously(signal, now).await,
            }
        };

        telemetry::increment(CounterMetric::Signals, outcome.label());
        tracing::info!(
            ticker = %signal.ticker,
            action = %signal.action,
            confidence = %signal.confidence,
            agent = %signal.agent,
            level = %settings.level,
            outcome = outcome.label(),
            "Signal processed"
        );
        Ok(outcome)
    }

    fn alert_only(&self, signal: &Signal) -> SignalOutcome {
        let level = match signal.action {
            Side::Buy => AlertLevel::Success,
            Side::Sell => AlertLevel::Warning,
        };
        self.alerts.publish(Alert::new(
            level,
            AlertCategory::Signal,
            format!("{}: {} {}", signal.agent, signal.action.label(), signal.ticker),
            format!("{} (Confidence: {}%)", signal.reasoning, signal.confidence),
            signal.agent.clone(),
        ));
        SignalOutcome::AlertCreated
    }

    async fn propose(
        &self,
        signal: &Signal,
        settings: &AutomationSettings,
        now: DateTime<Utc>,
    ) -> SignalOutcome {
        let assessment = match self.assess(signal, settings, now).await {
            Ok(assessment) => assessment,
            Err(outcome) => return outcome,
        };

        let order = ProposedOrder {
            symbol: signal.ticker.clone(),
            qty: assessment.sizing.qty,
            side: signal.action,
            order_type: OrderType::Limit,
            limit_price: Some(assessment.limit_price),
            reference_price: signal.current_price,
        };

        let proposal = {
            let mut proposals = self.proposals.lock().await;
            let proposal = proposals.create(
                signal.agent.clone(),
                ProposalSignal::from(signal),
                order,
                assessment.risk_check,
                now,
            );
            self.persist_proposals(&mut proposals, now).await;
            proposal
        };
        telemetry::increment(CounterMetric::Proposals, "pending");

        if settings.notifications.on_proposal {
            self.alerts.publish(Alert::new(
                AlertLevel::Info,
                AlertCategory::Proposal,
                format!("Trade Proposal: {} {}", signal.action.label(), signal.ticker),
                format!(
                    "{} proposes {} shares. Awaiting approval.",
                    signal.agent, proposal.order.qty
                ),
                signal.agent.clone(),
            ));
        }

        SignalOutcome::ProposalCreated { proposal }
    }

    async fn execute_autonomously(&self, signal: &Signal, now: DateTime<Utc>) -> SignalOutcome {
        let guard = self.decision_lock.lock().await;

        // Settings may have changed while waiting for the decision lock
        let settings = self.settings.read().await.clone();
        if !settings.enabled {
            return self.blocked(signal, RiskCheckResult::kill_switch(), &settings);
        }

        let assessment = match self.assess(signal, &settings, now).await {
            Ok(assessment) => assessment,
            Err(outcome) => return outcome,
        };
        if !assessment.risk_check.allowed {
            return self.blocked(signal, assessment.risk_check, &settings);
        }

        let order = OrderRequest::limit_entry(
            signal.ticker.clone(),
            assessment.sizing.qty,
            signal.action,
            assessment.limit_price,
        );

        let ack = match self.broker.submit_order(&order).await {
            Ok(ack) => ack,
            Err(error) => {
                telemetry::increment(CounterMetric::Orders, "failed");
                tracing::error!(symbol = %order.symbol, qty = order.qty, error = %error, "Order submission failed");
                if settings.notifications.on_error {
                    self.alerts.publish(Alert::new(
                        AlertLevel::Danger,
                        AlertCategory::Error,
                        format!("Execution Failed: {}", signal.ticker),
                        error.to_string(),
                        signal.agent.clone(),
                    ));
                }
                return SignalOutcome::ExecutionFailed {
                    error,
                    risk_check: assessment.risk_check,
                };
            }
        };
        telemetry::increment(CounterMetric::Orders, "submitted");

        self.record_execution(&order, &ack, signal, now).await;
        drop(guard);

        let protection = self.protect_and_discuss(&order, signal.current_price).await;

        if settings.notifications.on_execution {
            let stop_note = if protection.as_ref().is_some_and(|p| p.is_protected()) {
                " Stop loss set."
            } else {
                ""
            };
            self.alerts.publish(Alert::new(
                AlertLevel::Success,
                AlertCategory::Execution,
                format!("Auto-Executed: {} {}", signal.action.label(), signal.ticker),
                format!(
                    "{} shares at ${}. Order ID: {}.{}",
                    order.qty, signal.current_price, ack.order_id, stop_note
                ),
                signal.agent.clone(),
            ));
        }

        SignalOutcome::Executed(ExecutionReport {
            order_id: ack.order_id,
            symbol: order.symbol,
            side: order.side,
            qty: order.qty,
            limit_price: order.limit_price,
            reference_price: signal.current_price,
            risk_check: assessment.risk_check,
            protection,
        })
    }

    /// Snapshot, drawdown update, sizing and risk evaluation. Any sizing
    /// failure short-circuits as `PositionTooSmall`.
    async fn assess(
        &self,
        signal: &Signal,
        settings: &AutomationSettings,
        now: DateTime<Utc>,
    ) -> Result<Assessment, SignalOutcome> {
        let (portfolio, live) = match self.market.portfolio_snapshot().await {
            Ok(snapshot) => (snapshot, true),
            Err(e) => {
                tracing::warn!(error = %e, fallback = %self.engine.fallback_portfolio_value, "Portfolio unavailable, using fallback values");
                (
                    PortfolioSnapshot::fallback(self.engine.fallback_portfolio_value),
                    false,
                )
            }
        };

        let stats = {
            let mut tracker = self.stats.lock().await;
            let rolled = tracker.rollover_if_new_day(now);
            if live {
                tracker.update_drawdown(portfolio.total_value);
            }
            if rolled || live {
                self.persist_stats(tracker.stats()).await;
            }
            tracker.stats().clone()
        };
        set_stats_gauges(&stats);

        let win_rate = self.win_rate().await;
        let sizing = match self.sizer.size(
            signal,
            win_rate,
            &settings.risk_limits,
            portfolio.total_value,
            signal.current_price,
        ) {
            Ok(sizing) => sizing,
            Err(e) => {
                tracing::info!(ticker = %signal.ticker, reason = %e, "Signal not sized");
                return Err(SignalOutcome::PositionTooSmall {
                    reason: e.to_string(),
                });
            }
        };

        let candidate = OrderCandidate::new(
            signal.ticker.clone(),
            sizing.qty,
            signal.action,
            signal.current_price,
        );
        let mut risk_check = self
            .policy
            .evaluate(settings, &stats, &portfolio, &candidate, now);
        if !live {
            risk_check = risk_check.with_leading_warning(FALLBACK_PORTFOLIO_WARNING);
        }
        telemetry::increment(
            CounterMetric::RiskChecks,
            if risk_check.allowed { "passed" } else { "blocked" },
        );

        tracing::debug!(
            ticker = %signal.ticker,
            qty = sizing.qty,
            allowed = risk_check.allowed,
            warnings = risk_check.warnings.len(),
            blocked = risk_check.blocked.len(),
            "Risk evaluated"
        );

        let limit_price =
            limit_price_for(signal.action, signal.current_price, self.engine.limit_buffer_pct);
        Ok(Assessment {
            sizing,
            risk_check,
            limit_price,
        })
    }

    fn blocked(
        &self,
        signal: &Signal,
        risk_check: RiskCheckResult,
        settings: &AutomationSettings,
    ) -> SignalOutcome {
        tracing::warn!(ticker = %signal.ticker, reasons = %risk_check.blocked_summary(), "Trade blocked");
        if settings.notifications.on_risk_limit {
            self.alerts.publish(Alert::new(
                AlertLevel::Danger,
                AlertCategory::Risk,
                format!("Trade Blocked: {}", signal.ticker),
                format!("Risk check failed: {}", risk_check.blocked_summary()),
                RISK_AGENT,
            ));
        }
        SignalOutcome::Blocked { risk_check }
    }

    /// Append the trade to the daily ledger and the journal at the
    /// signal's reference price; the buffered limit stays on the order
    async fn record_execution(
        &self,
        order: &OrderRequest,
        ack: &OrderAck,
        signal: &Signal,
        now: DateTime<Utc>,
    ) {
        let price = signal.current_price;
        let stats = {
            let mut tracker = self.stats.lock().await;
            tracker.rollover_if_new_day(now);
            tracker.record_trade(TradeRecord {
                timestamp: now,
                ticker: order.symbol.clone(),
                side: order.side,
                qty: order.qty,
                price,
            });
            self.persist_stats(tracker.stats()).await;
            tracker.stats().clone()
        };
        set_stats_gauges(&stats);

        let entry = JournalEntry {
            order_id: ack.order_id.clone(),
            timestamp: now,
            ticker: order.symbol.clone(),
            side: order.side,
            qty: order.qty,
            price,
            agent: signal.agent.clone(),
            reasoning: signal.reasoning.clone(),
            confidence: signal.confidence,
            pnl: None,
        };
        if let Err(e) = self.journal.lock().await.record(entry).await {
            self.store_failed("journal", &e);
        }

        tracing::info!(
            order_id = %ack.order_id,
            symbol = %order.symbol,
            side = %order.side,
            qty = order.qty,
            %price,
            trades_today = stats.trades_count,
            "Trade recorded"
        );
    }

    /// Stop-loss cascade for buys, then the detached discussion trigger
    async fn protect_and_discuss(
        &self,
        order: &OrderRequest,
        entry_price: Decimal,
    ) -> Option<ProtectiveOrderResult> {
        let protection = match order.side {
            Side::Buy => Some(
                self.cascade
                    .protect(&order.symbol, order.qty, entry_price, self.engine.stop_loss_pct)
                    .await,
            ),
            Side::Sell => None,
        };

        if let Some(trigger) = &self.discussion {
            spawn_discussion(trigger.clone(), order.symbol.clone());
        }
        protection
    }

    /// Approve a pending proposal and submit its order
    pub async fn approve_proposal(
        &self,
        id: &str,
        approved_by: &str,
    ) -> Result<ApprovedTrade, AutomationError> {
        self.approve_proposal_at(id, approved_by, Utc::now()).await
    }

    /// Approve and execute as one operation.
    ///
    /// `pending -> approved` is taken before submission so a concurrent
    /// approval fails with `InvalidState`; a broker failure releases the
    /// proposal back to `pending`.
    pub async fn approve_proposal_at(
        &self,
        id: &str,
        approved_by: &str,
        now: DateTime<Utc>,
    ) -> Result<ApprovedTrade, AutomationError> {
        let guard = self.decision_lock.lock().await;

        let settings = self.settings.read().await.clone();
        if !settings.enabled {
            tracing::warn!(id, "Approval refused: kill switch active");
            return Err(AutomationError::KillSwitchActive);
        }

        let approved = {
            let mut proposals = self.proposals.lock().await;
            let approved = proposals.approve(id, approved_by, now)?;
            self.persist_proposals(&mut proposals, now).await;
            approved
        };

        let order = approved.order.to_request();
        let ack = match self.broker.submit_order(&order).await {
            Ok(ack) => ack,
            Err(error) => {
                telemetry::increment(CounterMetric::Orders, "failed");
                tracing::error!(id, symbol = %order.symbol, error = %error, "Approved order failed");
                {
                    let mut proposals = self.proposals.lock().await;
                    if let Err(e) = proposals.release(id) {
                        tracing::error!(id, error = %e, "Could not release proposal");
                    }
                    self.persist_proposals(&mut proposals, now).await;
                }
                if settings.notifications.on_error {
                    self.alerts.publish(Alert::new(
                        AlertLevel::Danger,
                        AlertCategory::Error,
                        format!("Execution Failed: {}", order.symbol),
                        error.to_string(),
                        approved.agent.clone(),
                    ));
                }
                return Err(error.into());
            }
        };
        telemetry::increment(CounterMetric::Orders, "submitted");

        let executed = {
            let mut proposals = self.proposals.lock().await;
            let executed = proposals.mark_executed(id, &ack.order_id, now)?;
            self.persist_proposals(&mut proposals, now).await;
            executed
        };
        telemetry::increment(CounterMetric::Proposals, "executed");

        let signal = Signal {
            ticker: executed.signal.ticker.clone(),
            action: executed.signal.action,
            confidence: executed.signal.confidence,
            reasoning: executed.signal.reasoning.clone(),
            agent: executed.agent.clone(),
            current_price: executed.order.reference_price,
        };
        self.record_execution(&order, &ack, &signal, now).await;
        drop(guard);

        let protection = self
            .protect_and_discuss(&order, executed.order.reference_price)
            .await;

        if settings.notifications.on_execution {
            self.alerts.publish(Alert::new(
                AlertLevel::Success,
                AlertCategory::Execution,
                format!("Approved & Executed: {} {}", order.side.label(), order.symbol),
                format!("{} shares. Order ID: {}", order.qty, ack.order_id),
                executed.agent.clone(),
            ));
        }

        let execution = ExecutionReport {
            order_id: ack.order_id,
            symbol: order.symbol,
            side: order.side,
            qty: order.qty,
            limit_price: order.limit_price,
            reference_price: executed.order.reference_price,
            risk_check: executed.risk_check.clone(),
            protection,
        };
        Ok(ApprovedTrade {
            proposal: executed,
            execution,
        })
    }

    /// Reject a proposal; no side effects beyond persistence and logging
    pub async fn reject_proposal(
        &self,
        id: &str,
        reason: Option<String>,
    ) -> Result<TradeProposal, AutomationError> {
        self.reject_proposal_at(id, reason, Utc::now()).await
    }

    pub async fn reject_proposal_at(
        &self,
        id: &str,
        reason: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<TradeProposal, AutomationError> {
        let mut proposals = self.proposals.lock().await;
        let rejected = proposals.reject(id, reason, now)?;
        self.persist_proposals(&mut proposals, now).await;
        telemetry::increment(CounterMetric::Proposals, "rejected");

        tracing::info!(
            id,
            symbol = %rejected.order.symbol,
            reason = rejected.rejection_reason.as_deref().unwrap_or(""),
            "Proposal rejected"
        );
        Ok(rejected)
    }

    /// Disable all automation. Never gated and never fails; a failed save is
    /// logged and alerted.
    pub async fn kill_switch(&self) -> AutomationSettings {
        self.kill_switch_at(Utc::now()).await
    }

    pub async fn kill_switch_at(&self, now: DateTime<Utc>) -> AutomationSettings {
        let settings = {
            let mut settings = self.settings.write().await;
            settings.enabled = false;
            settings.last_modified = Some(now);
            settings.modified_by = Some("kill_switch".to_string());
            self.persist_settings(&settings).await;
            settings.clone()
        };
        telemetry::set_gauge(GaugeMetric::AutomationEnabled, 0.0);

        tracing::error!("KILL SWITCH ACTIVATED");
        self.alerts.publish(Alert::new(
            AlertLevel::Danger,
            AlertCategory::System,
            "KILL SWITCH ACTIVATED",
            "All automated trading has been halted.",
            SYSTEM_AGENT,
        ));
        settings
    }

    /// Apply a partial settings update
    pub async fn update_settings(&self, update: SettingsUpdate) -> AutomationSettings {
        self.update_settings_at(update, Utc::now()).await
    }

    pub async fn update_settings_at(
        &self,
        update: SettingsUpdate,
        now: DateTime<Utc>,
    ) -> AutomationSettings {
        let mut settings = self.settings.write().await;
        let was_enabled = settings.enabled;
        settings.apply(update, "user", now);
        self.persist_settings(&settings).await;

        if settings.enabled != was_enabled {
            tracing::warn!(enabled = settings.enabled, "Automation enabled flag changed");
        }
        tracing::info!(level = %settings.level, enabled = settings.enabled, "Settings updated");
        telemetry::set_gauge(
            GaugeMetric::AutomationEnabled,
            if settings.enabled { 1.0 } else { 0.0 },
        );
        settings.clone()
    }

    pub async fn settings(&self) -> AutomationSettings {
        self.settings.read().await.clone()
    }

    /// Settings, today's stats and pending count; never mutates state
    pub async fn status(&self) -> AutomationStatus {
        self.status_at(Utc::now()).await
    }

    pub async fn status_at(&self, now: DateTime<Utc>) -> AutomationStatus {
        let settings = self.settings.read().await.clone();
        let daily_stats = {
            let mut view = self.stats.lock().await.clone();
            view.rollover_if_new_day(now);
            view.stats().clone()
        };
        let pending_proposals = self.proposals.lock().await.pending_count(now);

        AutomationStatus {
            settings,
            daily_stats,
            pending_proposals,
            broker_configured: self.broker.is_configured(),
            win_rate: self.win_rate().await,
        }
    }

    /// Open proposals, or with `include_decided` every active one
    pub async fn list_proposals(
        &self,
        include_decided: bool,
        now: DateTime<Utc>,
    ) -> Vec<TradeProposal> {
        let proposals = self.proposals.lock().await;
        let list = if include_decided {
            proposals.list_active(now)
        } else {
            proposals.list_pending(now)
        };
        list.into_iter().cloned().collect()
    }

    pub async fn get_proposal(&self, id: &str) -> Option<TradeProposal> {
        self.proposals.lock().await.get(id).cloned()
    }

    /// Clear today's counters and restart the drawdown epoch
    pub async fn reset_daily_stats(&self) -> DailyStats {
        self.reset_daily_stats_at(Utc::now()).await
    }

    pub async fn reset_daily_stats_at(&self, now: DateTime<Utc>) -> DailyStats {
        let mut tracker = self.stats.lock().await;
        tracker.reset(now);
        self.persist_stats(tracker.stats()).await;
        set_stats_gauges(tracker.stats());

        tracing::info!(date = %tracker.stats().date, "Daily stats reset");
        tracker.stats().clone()
    }

    /// Attach realized P&L to a journaled order and add it to today's P&L
    pub async fn record_outcome(
        &self,
        order_id: &str,
        pnl: Decimal,
    ) -> Result<JournalEntry, AutomationError> {
        self.record_outcome_at(order_id, pnl, Utc::now()).await
    }

    pub async fn record_outcome_at(
        &self,
        order_id: &str,
        pnl: Decimal,
        now: DateTime<Utc>,
    ) -> Result<JournalEntry, AutomationError> {
        let entry = self
            .journal
            .lock()
            .await
            .record_outcome(order_id, pnl)
            .await?
            .ok_or_else(|| AutomationError::UnknownOrder(order_id.to_string()))?;

        let mut tracker = self.stats.lock().await;
        tracker.rollover_if_new_day(now);
        tracker.record_realized_pnl(pnl);
        self.persist_stats(tracker.stats()).await;

        tracing::info!(order_id, %pnl, total_pnl = %tracker.stats().total_pnl, "Trade outcome recorded");
        Ok(entry)
    }

    /// Trailing win rate from the journal, or the configured default
    pub async fn win_rate(&self) -> Decimal {
        self.journal
            .lock()
            .await
            .win_rate()
            .unwrap_or(self.engine.default_win_rate)
    }

    pub fn broker_configured(&self) -> bool {
        self.broker.is_configured()
    }

    async fn persist_settings(&self, settings: &AutomationSettings) {
        if let Err(e) = self.stores.settings.save(settings).await {
            self.store_failed("settings", &e);
        }
    }

    async fn persist_stats(&self, stats: &DailyStats) {
        if let Err(e) = self.stores.stats.save(stats).await {
            self.store_failed("daily_stats", &e);
        }
    }

    async fn persist_proposals(&self, proposals: &mut ProposalStore, now: DateTime<Utc>) {
        proposals.prune_expired(now);
        telemetry::set_gauge(
            GaugeMetric::PendingProposals,
            proposals.pending_count(now) as f64,
        );
        if let Err(e) = self.stores.proposals.save(&proposals.proposals().to_vec()).await {
            self.store_failed("proposals", &e);
        }
    }

    fn store_failed(&self, resource: &'static str, error: &StoreError) {
        telemetry::increment(CounterMetric::StoreFailures, resource);
        tracing::error!(resource, error = %error, "Failed to persist state");
        self.alerts.publish(Alert::new(
            AlertLevel::Danger,
            AlertCategory::Error,
            "Persistence Failed",
            format!("Could not save {resource}: {error}"),
            SYSTEM_AGENT,
        ));
    }
}

fn set_stats_gauges(stats: &DailyStats) {
    telemetry::set_gauge(
        GaugeMetric::DrawdownPct,
        stats.current_drawdown.to_f64().unwrap_or(0.0),
    );
    telemetry::set_gauge(
        GaugeMetric::MaxDrawdownPct,
        stats.max_drawdown.to_f64().unwrap_or(0.0),
    );
    telemetry::set_gauge(GaugeMetric::DailyTrades, f64::from(stats.trades_count));
}
