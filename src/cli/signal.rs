//! Signal command implementation

use super::print_json;
use crate::automation::AutomationOrchestrator;
use crate::signal::{Side, Signal};
use clap::Args;
use rust_decimal::Decimal;

#[derive(Args, Debug)]
pub struct SignalArgs {
    /// Ticker to trade
    pub ticker: String,

    /// buy or sell
    pub action: Side,

    /// Confidence, 0-100
    #[arg(long)]
    pub confidence: Decimal,

    /// Reference price
    #[arg(long)]
    pub price: Decimal,

    /// Source agent
    #[arg(long, default_value = "DELPHI")]
    pub agent: String,

    /// Reasoning text
    #[arg(long, default_value = "")]
    pub reasoning: String,
}

impl SignalArgs {
    pub fn to_signal(&self) -> Signal {
        Signal::new(
            self.ticker.to_uppercase(),
            self.action,
            self.confidence,
            self.agent.to_uppercase(),
            self.price,
        )
        .with_reasoning(self.reasoning.clone())
    }

    pub async fn execute(&self, orchestrator: &AutomationOrchestrator) -> anyhow::Result<()> {
        let outcome = orchestrator.process_signal(&self.to_signal()).await?;
        print_json(&outcome)
    }
}
