//! Data models for the schema tools.
//!
//! This module re-exports all model types used throughout the application.

pub mod report;
pub mod target;

pub use report::{DumpOutcome, ProbeReport};
pub use target::ConnectionTarget;
