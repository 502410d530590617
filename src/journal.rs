//! Long-lived trade journal
//!
//! Every execution is appended with its source agent and reasoning. Realized
//! P&L attached later drives the trailing win rate used for sizing.

use crate::signal::Side;
use crate::storage::{Store, StoreError};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One executed trade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub order_id: String,
    pub timestamp: DateTime<Utc>,
    pub ticker: String,
    pub side: Side,
    pub qty: u64,
    pub price: Decimal,
    pub agent: String,
    #[serde(default)]
    pub reasoning: String,
    pub confidence: Decimal,
    /// Realized P&L once the position is closed
    #[serde(default)]
    pub pnl: Option<Decimal>,
}

/// Append-only journal backed by a store
pub struct TradeJournal {
    entries: Vec<JournalEntry>,
    store: Arc<dyn Store<Vec<JournalEntry>>>,
}

impl TradeJournal {
    /// Load persisted entries, starting empty when nothing is stored
    pub async fn load(store: Arc<dyn Store<Vec<JournalEntry>>>) -> Result<Self, StoreError> {
        let entries = store.load().await?.unwrap_or_default();
        tracing::debug!(entries = entries.len(), "Trade journal loaded");
        Ok(Self { entries, store })
    }

    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    /// Append an execution and persist
    pub async fn record(&mut self, entry: JournalEntry) -> Result<(), StoreError> {
        self.entries.push(entry);
        self.store.save(&self.entries).await
    }

    /// Attach realized P&L to the entry for `order_id`. Returns the updated
    /// entry, or `None` when the order is not in the journal.
    pub async fn record_outcome(
        &mut self,
        order_id: &str,
        pnl: Decimal,
    ) -> Result<Option<JournalEntry>, StoreError> {
        let Some(entry) = self.entries.iter_mut().find(|e| e.order_id == order_id) else {
            return Ok(None);
        };
        entry.pnl = Some(pnl);
        let updated = entry.clone();

        self.store.save(&self.entries).await?;
        Ok(Some(updated))
    }

    /// Percentage of completed trades with positive P&L, `None` when no trade
    /// has completed yet
    pub fn win_rate(&self) -> Option<Decimal> {
        let completed: Vec<Decimal> = self.entries.iter().filter_map(|e| e.pnl).collect();
        if completed.is_empty() {
            return None;
        }

        let wins = completed.iter().filter(|pnl| **pnl > Decimal::ZERO).count();
        Some(Decimal::from(wins) * dec!(100) / Decimal::from(completed.len()))
    }
}
