//! Integration tests for the automation engine

mod approval_test;
mod discussion_test;
mod persistence_test;
mod runner_test;
mod support;
