//! State survives restarts; store failures never fail a decision

use crate::support::*;
use bond_autopilot::automation::{AutomationLevel, SignalOutcome, Stores};
use bond_autopilot::proposal::ProposalStatus;
use bond_autopilot::storage::Store;
use rust_decimal_macros::dec;
use std::sync::Arc;
use tempfile::TempDir;

#[tokio::test]
async fn test_state_reloads_from_json() {
    let dir = TempDir::new().unwrap();

    let proposal_id = {
        let h = harness_with(
            settings(AutomationLevel::SemiAuto),
            ScriptedBroker::default(),
            Stores::json_in(dir.path()),
        )
        .await;
        let proposal = match h.orchestrator.process_signal_at(&tmv_buy(), in_session()).await.unwrap() {
            SignalOutcome::ProposalCreated { proposal } => proposal,
            other => panic!("expected proposal, got {other:?}"),
        };
        h.orchestrator.kill_switch_at(in_session()).await;
        proposal.id
    };

    // Defaults passed to the second load are ignored in favor of the saved document
    let h = harness_with(
        settings(AutomationLevel::FullAuto),
        ScriptedBroker::default(),
        Stores::json_in(dir.path()),
    )
    .await;

    let settings = h.orchestrator.settings().await;
    assert!(!settings.enabled);
    assert_eq!(settings.level, AutomationLevel::SemiAuto);
    assert_eq!(settings.modified_by.as_deref(), Some("kill_switch"));

    let proposal = h.orchestrator.get_proposal(&proposal_id).await.unwrap();
    assert_eq!(proposal.status, ProposalStatus::Pending);
    assert_eq!(proposal.order.qty, 200);
}

#[tokio::test]
async fn test_trades_and_journal_reload() {
    let dir = TempDir::new().unwrap();

    let order_id = {
        let h = harness_with(
            settings(AutomationLevel::FullAuto),
            ScriptedBroker::default(),
            Stores::json_in(dir.path()),
        )
        .await;
        match h.orchestrator.process_signal_at(&tmv_buy(), in_session()).await.unwrap() {
            SignalOutcome::Executed(report) => report.order_id,
            other => panic!("expected execution, got {other:?}"),
        }
    };
    assert!(dir.path().join("daily-stats.json").exists());
    assert!(dir.path().join("trade-journal.json").exists());

    let h = harness_with(
        settings(AutomationLevel::FullAuto),
        ScriptedBroker::default(),
        Stores::json_in(dir.path()),
    )
    .await;
    let status = h.orchestrator.status_at(in_session()).await;
    assert_eq!(status.daily_stats.trades_count, 1);

    let entry = h
        .orchestrator
        .record_outcome_at(&order_id, dec!(250), in_session())
        .await
        .unwrap();
    assert_eq!(entry.ticker, "TMV");
}

#[tokio::test]
async fn test_kill_switch_survives_failing_store() {
    let mut stores = Stores::in_memory();
    stores.settings = Arc::new(FailingStore);
    let h = harness_with(settings(AutomationLevel::FullAuto), ScriptedBroker::default(), stores).await;

    let settings = h.orchestrator.kill_switch_at(in_session()).await;

    assert!(!settings.enabled);
    assert!(!h.orchestrator.settings().await.enabled);
    assert_eq!(h.alerts.with_title_prefix("Persistence Failed").len(), 1);
    assert_eq!(h.alerts.with_title_prefix("KILL SWITCH ACTIVATED").len(), 1);

    let outcome = h.orchestrator.process_signal_at(&tmv_buy(), in_session()).await.unwrap();
    assert!(matches!(outcome, SignalOutcome::Blocked { .. }));
}

#[tokio::test]
async fn test_execution_survives_failing_store() {
    let mut stores = Stores::in_memory();
    stores.stats = Arc::new(FailingStore);
    stores.journal = Arc::new(FailingStore);
    let h = harness_with(settings(AutomationLevel::FullAuto), ScriptedBroker::default(), stores).await;

    let outcome = h.orchestrator.process_signal_at(&tmv_buy(), in_session()).await.unwrap();

    assert!(matches!(outcome, SignalOutcome::Executed(_)));
    assert_eq!(h.broker.entries().len(), 1);
    assert_eq!(h.orchestrator.status_at(in_session()).await.daily_stats.trades_count, 1);
    assert!(!h.alerts.with_title_prefix("Persistence Failed").is_empty());
}

#[tokio::test]
async fn test_expired_pending_proposals_pruned_on_save() {
    let dir = TempDir::new().unwrap();
    let h = harness_with(
        settings(AutomationLevel::SemiAuto),
        ScriptedBroker::default(),
        Stores::json_in(dir.path()),
    )
    .await;

    let stale = match h.orchestrator.process_signal_at(&tmv_buy(), in_session()).await.unwrap() {
        SignalOutcome::ProposalCreated { proposal } => proposal,
        other => panic!("expected proposal, got {other:?}"),
    };
    let rejected = match h.orchestrator.process_signal_at(&tmv_buy(), in_session()).await.unwrap() {
        SignalOutcome::ProposalCreated { proposal } => proposal,
        other => panic!("expected proposal, got {other:?}"),
    };
    h.orchestrator
        .reject_proposal_at(&rejected.id, None, in_session())
        .await
        .unwrap();

    let later = in_session() + chrono::Duration::minutes(31);
    h.orchestrator.process_signal_at(&tmv_buy(), later).await.unwrap();

    let saved = h.stores.proposals.load().await.unwrap().unwrap();
    assert_eq!(saved.len(), 2);
    assert!(saved.iter().all(|p| p.id != stale.id));
    assert!(saved.iter().any(|p| p.id == rejected.id && p.status == ProposalStatus::Rejected));
    assert!(h.orchestrator.get_proposal(&stale.id).await.is_none());
}
