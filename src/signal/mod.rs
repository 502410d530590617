//! Signal module
//!
//! Incoming agent signals and the gates they pass before sizing

mod filter;
mod types;

pub use filter::{FilterResult, RejectReason, SignalFilters};
pub use types::{Side, Signal};
