//! Automation module
//!
//! Settings, the signal orchestrator, the batch processor and the
//! best-effort discussion trigger

mod discussion;
mod orchestrator;
mod outcome;
mod runner;
mod settings;

pub use discussion::{spawn_discussion, DiscussionTrigger, HttpDiscussionTrigger};
pub use orchestrator::{AutomationOrchestrator, Collaborators, Stores, FALLBACK_PORTFOLIO_WARNING};
pub use outcome::{
    ApprovedTrade, AutomationError, AutomationStatus, ExecutionReport, SignalOutcome,
};
pub use runner::{ProcessedSignal, ProcessorError, RunSummary, SignalProcessor};
pub use settings::{AutomationLevel, AutomationSettings, NotificationPrefs, SettingsUpdate};
