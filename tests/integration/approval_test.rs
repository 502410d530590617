//! Proposal approval and rejection

use crate::support::*;
use bond_autopilot::automation::{AutomationError, AutomationLevel, SettingsUpdate, SignalOutcome};
use bond_autopilot::execution::ProtectiveOrderResult;
use bond_autopilot::proposal::{ProposalError, ProposalStatus, TradeProposal};
use chrono::Duration;
use rust_decimal_macros::dec;
use std::sync::atomic::Ordering;
use std::time::Duration as StdDuration;

async fn propose(h: &Harness) -> TradeProposal {
    match h
        .orchestrator
        .process_signal_at(&tmv_buy(), in_session())
        .await
        .unwrap()
    {
        SignalOutcome::ProposalCreated { proposal } => proposal,
        other => panic!("expected proposal, got {other:?}"),
    }
}

#[tokio::test]
async fn test_approve_executes_stored_order() {
    let h = harness(settings(AutomationLevel::SemiAuto)).await;
    let proposal = propose(&h).await;

    let approved = h
        .orchestrator
        .approve_proposal_at(&proposal.id, "user", in_session())
        .await
        .unwrap();

    assert_eq!(approved.proposal.status, ProposalStatus::Executed);
    assert_eq!(approved.proposal.approved_by.as_deref(), Some("user"));
    assert_eq!(
        approved.proposal.order_id.as_deref(),
        Some(approved.execution.order_id.as_str())
    );
    assert!(matches!(
        approved.execution.protection,
        Some(ProtectiveOrderResult::Trailing { .. })
    ));

    let entries = h.broker.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].qty, 200);
    assert_eq!(entries[0].limit_price, Some(dec!(50.50)));

    let status = h.orchestrator.status_at(in_session()).await;
    assert_eq!(status.daily_stats.trades_count, 1);
    assert_eq!(status.daily_stats.trades[0].price, dec!(50));
    assert_eq!(status.pending_proposals, 0);

    let alerts = h.alerts.with_title_prefix("Approved & Executed");
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].title, "Approved & Executed: BUY TMV");
}

#[tokio::test]
async fn test_approve_uses_snapshot_price_not_current_risk() {
    let h = harness(settings(AutomationLevel::SemiAuto)).await;
    let proposal = propose(&h).await;

    // Limits tightened after creation do not re-evaluate the proposal
    let mut limits = h.orchestrator.settings().await.risk_limits;
    limits.max_daily_trades = 0;
    h.orchestrator
        .update_settings_at(
            SettingsUpdate {
                risk_limits: Some(limits),
                ..Default::default()
            },
            in_session(),
        )
        .await;

    let approved = h
        .orchestrator
        .approve_proposal_at(&proposal.id, "user", in_session())
        .await
        .unwrap();
    assert!(approved.execution.risk_check.allowed);
}

#[tokio::test]
async fn test_second_approval_rejected() {
    let h = harness(settings(AutomationLevel::SemiAuto)).await;
    let proposal = propose(&h).await;

    h.orchestrator
        .approve_proposal_at(&proposal.id, "user", in_session())
        .await
        .unwrap();
    let err = h
        .orchestrator
        .approve_proposal_at(&proposal.id, "user", in_session())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AutomationError::Proposal(ProposalError::InvalidState {
            status: ProposalStatus::Executed,
            ..
        })
    ));
    assert_eq!(h.broker.entries().len(), 1);
}

#[tokio::test]
async fn test_concurrent_approvals_submit_once() {
    let h = harness_with(
        settings(AutomationLevel::SemiAuto),
        ScriptedBroker::with_delay(StdDuration::from_millis(20)),
        bond_autopilot::automation::Stores::in_memory(),
    )
    .await;
    let proposal = propose(&h).await;

    let (a, b) = tokio::join!(
        h.orchestrator.approve_proposal_at(&proposal.id, "alice", in_session()),
        h.orchestrator.approve_proposal_at(&proposal.id, "bob", in_session()),
    );

    assert_eq!([a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count(), 1);
    let err = a.err().or(b.err()).unwrap();
    assert!(matches!(
        err,
        AutomationError::Proposal(ProposalError::InvalidState { .. })
    ));
    assert_eq!(h.broker.entries().len(), 1);
}

#[tokio::test]
async fn test_expired_proposal_cannot_be_approved() {
    let h = harness(settings(AutomationLevel::SemiAuto)).await;
    let proposal = propose(&h).await;
    let late = in_session() + Duration::minutes(31);

    let err = h
        .orchestrator
        .approve_proposal_at(&proposal.id, "user", late)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AutomationError::Proposal(ProposalError::Expired { .. })
    ));
    assert!(h.broker.entries().is_empty());
    let stored = h.orchestrator.get_proposal(&proposal.id).await.unwrap();
    assert_eq!(stored.status, ProposalStatus::Pending);
    assert!(h.orchestrator.list_proposals(false, late).await.is_empty());
}

#[tokio::test]
async fn test_kill_switch_blocks_approval() {
    let h = harness(settings(AutomationLevel::SemiAuto)).await;
    let proposal = propose(&h).await;
    h.orchestrator.kill_switch_at(in_session()).await;

    let err = h
        .orchestrator
        .approve_proposal_at(&proposal.id, "user", in_session())
        .await
        .unwrap_err();
    assert!(matches!(err, AutomationError::KillSwitchActive));
    assert_eq!(
        h.orchestrator.get_proposal(&proposal.id).await.unwrap().status,
        ProposalStatus::Pending
    );

    h.orchestrator
        .update_settings_at(
            SettingsUpdate {
                enabled: Some(true),
                ..Default::default()
            },
            in_session(),
        )
        .await;
    assert!(h
        .orchestrator
        .approve_proposal_at(&proposal.id, "user", in_session())
        .await
        .is_ok());
}

#[tokio::test]
async fn test_broker_failure_releases_proposal() {
    let h = harness(settings(AutomationLevel::SemiAuto)).await;
    let proposal = propose(&h).await;
    h.broker.fail_entry.store(true, Ordering::SeqCst);

    let err = h
        .orchestrator
        .approve_proposal_at(&proposal.id, "user", in_session())
        .await
        .unwrap_err();
    assert!(matches!(err, AutomationError::Broker(_)));

    let stored = h.orchestrator.get_proposal(&proposal.id).await.unwrap();
    assert_eq!(stored.status, ProposalStatus::Pending);
    assert_eq!(stored.approved_by, None);
    assert_eq!(h.orchestrator.status_at(in_session()).await.daily_stats.trades_count, 0);
    assert_eq!(h.alerts.with_title_prefix("Execution Failed: TMV").len(), 1);

    h.broker.fail_entry.store(false, Ordering::SeqCst);
    let approved = h
        .orchestrator
        .approve_proposal_at(&proposal.id, "user", in_session())
        .await
        .unwrap();
    assert_eq!(approved.proposal.status, ProposalStatus::Executed);
}

#[tokio::test]
async fn test_reject_then_approve_fails() {
    let h = harness(settings(AutomationLevel::SemiAuto)).await;
    let proposal = propose(&h).await;

    let rejected = h
        .orchestrator
        .reject_proposal_at(&proposal.id, Some("duration risk".into()), in_session())
        .await
        .unwrap();
    assert_eq!(rejected.status, ProposalStatus::Rejected);
    assert_eq!(rejected.rejection_reason.as_deref(), Some("duration risk"));

    let err = h
        .orchestrator
        .approve_proposal_at(&proposal.id, "user", in_session())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AutomationError::Proposal(ProposalError::InvalidState {
            status: ProposalStatus::Rejected,
            ..
        })
    ));

    let listed = h.orchestrator.list_proposals(true, in_session()).await;
    assert_eq!(listed.len(), 1);
    assert!(h.orchestrator.list_proposals(false, in_session()).await.is_empty());
}

#[tokio::test]
async fn test_unknown_proposal() {
    let h = harness(settings(AutomationLevel::SemiAuto)).await;

    let err = h
        .orchestrator
        .approve_proposal_at("prop-0-abcdef", "user", in_session())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AutomationError::Proposal(ProposalError::NotFound(_))
    ));
    assert!(h
        .orchestrator
        .reject_proposal_at("prop-0-abcdef", None, in_session())
        .await
        .is_err());
}
