//! Conformance testing harness for mfmt.
//!
//! This crate provides:
//! - Fixture capture: record host C library `snprintf`/`sscanf` behavior as
//!   JSON reference data
//! - Fixture verify: compare the mfmt engines against captured fixtures
//! - Report generation: human-readable + machine-readable conformance reports
//! - Structured JSONL logging for harness runs

#![deny(unsafe_code)]

#[cfg(unix)]
pub mod capture;
pub mod conformance;
pub mod diff;
pub mod fixtures;
pub mod report;
pub mod runner;
pub mod structured_log;
pub mod verify;

pub use conformance::{CaseRun, ExecError, execute_fixture_case};
pub use fixtures::{FixtureCase, FixtureSet};
pub use report::ConformanceReport;
pub use runner::TestRunner;
pub use verify::{VerificationResult, VerificationSummary};
