//! Test execution engine.

use std::time::Instant;

use mfmt_core::FormatMode;

use crate::conformance::execute_fixture_case;
use crate::diff;
use crate::fixtures::{FixtureCase, FixtureSet};
use crate::structured_log::{LogEmitter, LogEntry, LogLevel, Outcome, StreamKind};
use crate::verify::VerificationResult;

/// Runs a fixture set and collects verification results.
pub struct TestRunner {
    /// Name of the test campaign.
    pub campaign: String,
    /// Engine mode being tested (`tolerant` or `strict`).
    pub mode: String,
}

impl TestRunner {
    /// Create a new test runner.
    #[must_use]
    pub fn new(campaign: impl Into<String>, mode: impl Into<String>) -> Self {
        Self {
            campaign: campaign.into(),
            mode: mode.into(),
        }
    }

    /// Run all fixtures in a set that apply to this runner's mode.
    pub fn run(&self, fixture_set: &FixtureSet) -> Vec<VerificationResult> {
        self.matching(fixture_set)
            .map(|case| self.verify_case(case))
            .collect()
    }

    /// Like [`TestRunner::run`], emitting one `case_result` log line per case.
    pub fn run_logged(
        &self,
        fixture_set: &FixtureSet,
        log: &mut LogEmitter,
    ) -> std::io::Result<Vec<VerificationResult>> {
        let mut results = Vec::new();
        for case in self.matching(fixture_set) {
            let started = Instant::now();
            let result = self.verify_case(case);
            let (level, outcome) = if result.passed {
                (LogLevel::Info, Outcome::Pass)
            } else {
                (LogLevel::Error, Outcome::Fail)
            };
            let mut entry = LogEntry::new(String::new(), level, "case_result")
                .with_campaign(&self.campaign)
                .with_stream(StreamKind::Conformance)
                .with_mode(FormatMode::from_str_loose(&self.mode).as_str())
                .with_case(&case.function, &case.name)
                .with_outcome(outcome)
                .with_duration_ms(started.elapsed().as_millis() as u64);
            if !result.passed {
                entry = entry.with_details(serde_json::json!({
                    "family": fixture_set.family,
                    "expected": result.expected,
                    "actual": result.actual,
                }));
            }
            log.emit_entry(entry)?;
            results.push(result);
        }
        Ok(results)
    }

    fn matching<'a>(&'a self, fixture_set: &'a FixtureSet) -> impl Iterator<Item = &'a FixtureCase> {
        fixture_set
            .cases
            .iter()
            .filter(|case| mode_matches(&self.mode, &case.mode))
    }

    fn verify_case(&self, case: &FixtureCase) -> VerificationResult {
        let (actual, diff) = execute_case(case, &self.mode);
        VerificationResult {
            case_name: case.name.clone(),
            spec_section: case.spec_section.clone(),
            mode: self.mode.clone(),
            passed: actual == case.expected_output,
            expected: case.expected_output.clone(),
            actual,
            diff,
        }
    }
}

fn mode_matches(active_mode: &str, case_mode: &str) -> bool {
    let active = active_mode.to_ascii_lowercase();
    let case = case_mode.to_ascii_lowercase();
    case == active || case == "both"
}

fn execute_case(case: &FixtureCase, active_mode: &str) -> (String, Option<String>) {
    match execute_fixture_case(&case.function, &case.inputs, active_mode) {
        Ok(run) => {
            let diff_out = if run.output != case.expected_output {
                let mut d = diff::render_diff(&case.expected_output, &run.output);
                if let Some(note) = &run.note {
                    d.push_str(note);
                    d.push('\n');
                }
                Some(d)
            } else {
                run.note
            };
            (run.output, diff_out)
        }
        Err(err) => {
            let actual = format!("unsupported:{err}");
            let diff_out = Some(diff::render_diff(&case.expected_output, &actual));
            (actual, diff_out)
        }
    }
}
