//! bond-autopilot: automation and risk decision engine for bond-ETF trading
//!
//! This library provides the core components for:
//! - Signal filtering by confidence, agent and ticker
//! - Tiered position sizing from confidence and trailing win rate
//! - Pre-trade risk limits and daily drawdown tracking
//! - Trade proposals with lazy expiry for human approval
//! - Autonomous execution with a protective stop-loss cascade
//! - Kill switch, settings and stats administration
//! - JSON persistence, structured logging and metrics

pub mod alert;
pub mod automation;
pub mod cli;
pub mod config;
pub mod execution;
pub mod journal;
pub mod market;
pub mod proposal;
pub mod risk;
pub mod signal;
pub mod storage;
pub mod telemetry;
