//! Trade proposal module
//!
//! Sized, risk-annotated signals awaiting a human decision

mod store;
mod types;

pub use store::{ProposalStore, DEFAULT_PROPOSAL_TTL_MINUTES};
pub use types::{
    ProposalError, ProposalSignal, ProposalStatus, ProposedOrder, TradeProposal,
};
