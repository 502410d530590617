//! Periodic signal processor

use crate::support::*;
use bond_autopilot::automation::{AutomationLevel, ProcessorError, SignalProcessor};
use chrono::Duration;
use rust_decimal_macros::dec;

async fn processor(level: AutomationLevel, history_limit: usize) -> (Harness, SignalProcessor) {
    let h = harness(settings(level)).await;
    let processor = SignalProcessor::new(h.orchestrator.clone(), Duration::seconds(60), history_limit);
    (h, processor)
}

#[tokio::test]
async fn test_run_processes_signals_in_order() {
    let (h, processor) = processor(AutomationLevel::SemiAuto, 100).await;

    let summary = processor
        .run_at(
            vec![tmv_buy(), buy("TLT", dec!(40), dec!(90)), buy("SPY", dec!(90), dec!(500))],
            false,
            in_session(),
        )
        .await
        .unwrap();

    assert_eq!(summary.run, 1);
    assert_eq!(summary.results.len(), 3);
    assert_eq!(summary.results[0].result, "proposal_created");
    assert_eq!(summary.count("filtered"), 2);
    assert_eq!(h.orchestrator.status_at(in_session()).await.pending_proposals, 1);
}

#[tokio::test]
async fn test_run_too_soon() {
    let (_h, processor) = processor(AutomationLevel::Manual, 100).await;
    processor.run_at(vec![tmv_buy()], false, in_session()).await.unwrap();

    let err = processor
        .run_at(vec![tmv_buy()], false, in_session() + Duration::seconds(30))
        .await
        .unwrap_err();
    assert_eq!(err, ProcessorError::TooSoon { next_run_in_secs: 30 });
    assert_eq!(processor.run_count().await, 1);

    let later = in_session() + Duration::seconds(60);
    assert!(processor.run_at(vec![], false, later).await.is_ok());
    assert_eq!(processor.last_run().await, Some(later));
}

#[tokio::test]
async fn test_force_bypasses_interval() {
    let (_h, processor) = processor(AutomationLevel::Manual, 100).await;
    processor.run_at(vec![tmv_buy()], false, in_session()).await.unwrap();

    let summary = processor
        .run_at(vec![tmv_buy()], true, in_session() + Duration::seconds(1))
        .await
        .unwrap();
    assert_eq!(summary.run, 2);
    assert_eq!(summary.results[0].result, "alert_created");
}

#[tokio::test]
async fn test_invalid_signal_recorded_as_error() {
    let (_h, processor) = processor(AutomationLevel::Manual, 100).await;

    let summary = processor
        .run_at(vec![buy("TMV", dec!(85), dec!(0)), tmv_buy()], false, in_session())
        .await
        .unwrap();

    assert_eq!(summary.results[0].result, "error");
    assert!(summary.results[0]
        .detail
        .as_deref()
        .is_some_and(|d| d.contains("must be positive")));
    assert_eq!(summary.results[1].result, "alert_created");
}

#[tokio::test]
async fn test_history_newest_first_and_bounded() {
    let (_h, processor) = processor(AutomationLevel::Manual, 3).await;

    processor
        .run_at(
            vec![buy("TMV", dec!(80), dec!(50)), buy("TBT", dec!(80), dec!(30))],
            false,
            in_session(),
        )
        .await
        .unwrap();
    processor
        .run_at(
            vec![buy("TBF", dec!(80), dec!(20)), buy("TLT", dec!(80), dec!(90))],
            true,
            in_session() + Duration::seconds(5),
        )
        .await
        .unwrap();

    let tickers: Vec<_> = processor
        .history()
        .await
        .into_iter()
        .map(|p| p.signal.ticker)
        .collect();
    assert_eq!(tickers, vec!["TLT", "TBF", "TBT"]);
}
