//! In-memory proposal lifecycle
//!
//! Expiry is lazy: expired pending proposals are filtered on read and every
//! transition out of `pending` re-checks the deadline. Callers prune and
//! persist [`ProposalStore::proposals`] after each mutation.

use super::{ProposalError, ProposalSignal, ProposalStatus, ProposedOrder, TradeProposal};
use crate::risk::RiskCheckResult;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

pub const DEFAULT_PROPOSAL_TTL_MINUTES: i64 = 30;

/// Owns every proposal and the only code path that changes their status
#[derive(Debug, Clone)]
pub struct ProposalStore {
    proposals: Vec<TradeProposal>,
    ttl: Duration,
}

impl ProposalStore {
    pub fn new(ttl: Duration) -> Self {
        Self::with_proposals(vec![], ttl)
    }

    /// Wrap previously persisted proposals
    pub fn with_proposals(proposals: Vec<TradeProposal>, ttl: Duration) -> Self {
        Self { proposals, ttl }
    }

    pub fn proposals(&self) -> &[TradeProposal] {
        &self.proposals
    }

    /// Create a pending proposal expiring after the TTL
    pub fn create(
        &mut self,
        agent: impl Into<String>,
        signal: ProposalSignal,
        order: ProposedOrder,
        risk_check: RiskCheckResult,
        now: DateTime<Utc>,
    ) -> TradeProposal {
        let proposal = TradeProposal {
            id: Self::next_id(now),
            agent: agent.into(),
            signal,
            order,
            status: ProposalStatus::Pending,
            risk_check,
            timestamp: now,
            expires_at: now + self.ttl,
            approved_at: None,
            approved_by: None,
            executed_at: None,
            order_id: None,
            rejection_reason: None,
        };

        tracing::info!(
            id = %proposal.id,
            symbol = %proposal.order.symbol,
            qty = proposal.order.qty,
            expires_at = %proposal.expires_at,
            "Proposal created"
        );
        self.proposals.push(proposal.clone());
        proposal
    }

    pub fn get(&self, id: &str) -> Option<&TradeProposal> {
        self.proposals.iter().find(|p| p.id == id)
    }

    /// Pending proposals still inside their TTL
    pub fn list_pending(&self, now: DateTime<Utc>) -> Vec<&TradeProposal> {
        self.proposals.iter().filter(|p| p.is_open(now)).collect()
    }

    /// Decided proposals plus open ones
    pub fn list_active(&self, now: DateTime<Utc>) -> Vec<&TradeProposal> {
        self.proposals.iter().filter(|p| p.is_active(now)).collect()
    }

    pub fn pending_count(&self, now: DateTime<Utc>) -> usize {
        self.proposals.iter().filter(|p| p.is_open(now)).count()
    }

    /// Drop expired pending proposals; decided ones are kept. Returns the
    /// number removed.
    pub fn prune_expired(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.proposals.len();
        self.proposals.retain(|p| p.is_active(now));
        let removed = before - self.proposals.len();
        if removed > 0 {
            tracing::debug!(removed, "Expired proposals pruned");
        }
        removed
    }

    /// Move a proposal to `to`.
    ///
    /// Allowed: `pending` to any decided status, and `approved` to
    /// `executed`. Leaving `pending` for `approved` or `executed` after
    /// `expires_at` fails with [`ProposalError::Expired`].
    pub fn transition(
        &mut self,
        id: &str,
        to: ProposalStatus,
        now: DateTime<Utc>,
    ) -> Result<TradeProposal, ProposalError> {
        self.apply(id, to, now, |_| {})
    }

    /// `pending` to `approved`, stamping the approver
    pub fn approve(
        &mut self,
        id: &str,
        approved_by: &str,
        now: DateTime<Utc>,
    ) -> Result<TradeProposal, ProposalError> {
        self.apply(id, ProposalStatus::Approved, now, |p| {
            p.approved_by = Some(approved_by.to_string());
        })
    }

    /// `approved` (or `pending`) to `executed` with the broker order id
    pub fn mark_executed(
        &mut self,
        id: &str,
        order_id: &str,
        now: DateTime<Utc>,
    ) -> Result<TradeProposal, ProposalError> {
        self.apply(id, ProposalStatus::Executed, now, |p| {
            p.order_id = Some(order_id.to_string());
        })
    }

    /// `pending` to `rejected`; allowed after expiry
    pub fn reject(
        &mut self,
        id: &str,
        reason: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<TradeProposal, ProposalError> {
        self.apply(id, ProposalStatus::Rejected, now, |p| {
            p.rejection_reason = reason;
        })
    }

    /// Return an `approved` proposal to `pending` after a failed submission
    pub fn release(&mut self, id: &str) -> Result<TradeProposal, ProposalError> {
        let proposal = self.find_mut(id)?;
        if proposal.status != ProposalStatus::Approved {
            return Err(ProposalError::InvalidState {
                id: id.to_string(),
                status: proposal.status,
            });
        }

        proposal.status = ProposalStatus::Pending;
        proposal.approved_at = None;
        proposal.approved_by = None;
        tracing::info!(id, "Proposal released back to pending");
        Ok(proposal.clone())
    }

    fn apply(
        &mut self,
        id: &str,
        to: ProposalStatus,
        now: DateTime<Utc>,
        stamp: impl FnOnce(&mut TradeProposal),
    ) -> Result<TradeProposal, ProposalError> {
        let proposal = self.find_mut(id)?;
        let from = proposal.status;

        let allowed = matches!(
            (from, to),
            (ProposalStatus::Pending, ProposalStatus::Approved)
                | (ProposalStatus::Pending, ProposalStatus::Rejected)
                | (ProposalStatus::Pending, ProposalStatus::Executed)
                | (ProposalStatus::Approved, ProposalStatus::Executed)
        );
        if !allowed {
            return Err(ProposalError::InvalidState {
                id: id.to_string(),
                status: from,
            });
        }

        if from == ProposalStatus::Pending
            && to != ProposalStatus::Rejected
            && proposal.is_expired(now)
        {
            return Err(ProposalError::Expired {
                id: id.to_string(),
                expired_at: proposal.expires_at,
            });
        }

        proposal.status = to;
        match to {
            ProposalStatus::Approved => proposal.approved_at = Some(now),
            ProposalStatus::Executed => proposal.executed_at = Some(now),
            ProposalStatus::Pending | ProposalStatus::Rejected => {}
        }
        stamp(proposal);

        tracing::info!(id, %from, %to, "Proposal transition");
        Ok(proposal.clone())
    }

    fn find_mut(&mut self, id: &str) -> Result<&mut TradeProposal, ProposalError> {
        self.proposals
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| ProposalError::NotFound(id.to_string()))
    }

    fn next_id(now: DateTime<Utc>) -> String {
        let suffix: String = Uuid::new_v4().simple().to_string().chars().take(6).collect();
        format!("prop-{}-{}", now.timestamp_millis(), suffix)
    }
}

impl Default for ProposalStore {
    fn default() -> Self {
        Self::new(Duration::minutes(DEFAULT_PROPOSAL_TTL_MINUTES))
    }
}
