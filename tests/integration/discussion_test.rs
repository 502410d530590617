//! Post-execution discussion trigger

use crate::support::*;
use bond_autopilot::automation::{AutomationLevel, SignalOutcome};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_failing_trigger_does_not_fail_execution() {
    let trigger = Arc::new(RecordingTrigger::failing());
    let h = harness_with_discussion(settings(AutomationLevel::FullAuto), trigger.clone()).await;

    let outcome = h
        .orchestrator
        .process_signal_at(&tmv_buy(), in_session())
        .await
        .unwrap();

    assert!(matches!(outcome, SignalOutcome::Executed(_)));
    assert_eq!(trigger.wait_for(1).await, vec!["TMV".to_string()]);

    let status = h.orchestrator.status_at(in_session()).await;
    assert_eq!(status.daily_stats.trades_count, 1);
    assert_eq!(h.broker.entries().len(), 1);
    assert!(h.alerts.with_title_prefix("Execution Failed").is_empty());
}

#[tokio::test]
async fn test_approved_trade_fires_trigger() {
    let trigger = Arc::new(RecordingTrigger::default());
    let h = harness_with_discussion(settings(AutomationLevel::SemiAuto), trigger.clone()).await;

    let SignalOutcome::ProposalCreated { proposal } = h
        .orchestrator
        .process_signal_at(&tmv_buy(), in_session())
        .await
        .unwrap()
    else {
        panic!("expected proposal");
    };
    assert!(trigger.calls().is_empty());

    h.orchestrator
        .approve_proposal_at(&proposal.id, "user", in_session())
        .await
        .unwrap();
    assert_eq!(trigger.wait_for(1).await, vec!["TMV".to_string()]);
}

#[tokio::test]
async fn test_trigger_not_fired_without_execution() {
    let trigger = Arc::new(RecordingTrigger::default());
    let mut blocked = settings(AutomationLevel::FullAuto);
    blocked.risk_limits.max_daily_trades = 0;
    let h = harness_with_discussion(blocked, trigger.clone()).await;

    let outcome = h
        .orchestrator
        .process_signal_at(&tmv_buy(), in_session())
        .await
        .unwrap();
    assert!(matches!(outcome, SignalOutcome::Blocked { .. }));

    let h = harness_with_discussion(settings(AutomationLevel::FullAuto), trigger.clone()).await;
    h.broker.fail_entry.store(true, Ordering::SeqCst);
    let outcome = h
        .orchestrator
        .process_signal_at(&tmv_buy(), in_session())
        .await
        .unwrap();
    assert!(matches!(outcome, SignalOutcome::ExecutionFailed { .. }));

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(trigger.calls().is_empty());
}
