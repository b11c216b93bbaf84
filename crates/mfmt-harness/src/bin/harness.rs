//! CLI entrypoint for the mfmt conformance harness.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use mfmt_core::FormatMode;
use mfmt_harness::conformance::{ArgSpec, DEFAULT_CAPACITY, DestSpec, execute_fixture_case};
use mfmt_harness::structured_log::{
    ArtifactIndex, LogEmitter, LogEntry, LogLevel, Outcome, StreamKind, now_utc,
    validate_log_file,
};
use mfmt_harness::{ConformanceReport, FixtureSet, TestRunner, VerificationSummary};

/// Conformance tooling for the mfmt print/scan engines.
#[derive(Debug, Parser)]
#[command(name = "mfmt-harness")]
#[command(about = "Conformance testing harness for mfmt")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Capture host C library behavior as fixture files.
    #[cfg(unix)]
    Capture {
        /// Output directory for fixture JSON files.
        #[arg(long)]
        output: PathBuf,
        /// Family to capture (`print`, `scan`, or `all`).
        #[arg(long, default_value = "all")]
        family: String,
        /// Structured JSONL log path.
        #[arg(long)]
        log: Option<PathBuf>,
    },
    /// Verify the engines against fixture files.
    Verify {
        /// Directory containing fixture JSON files.
        #[arg(long, default_value = "tests/conformance/fixtures")]
        fixture: PathBuf,
        /// Engine mode to run (`tolerant`, `strict`, or `both`).
        #[arg(long, default_value = "both")]
        mode: String,
        /// Output report path (markdown; a `.json` twin is written alongside).
        #[arg(long)]
        report: Option<PathBuf>,
        /// Structured JSONL log path.
        #[arg(long)]
        log: Option<PathBuf>,
    },
    /// Format arguments with the print engine.
    Print {
        /// Format string.
        format: String,
        /// Arguments as `kind:value` (`int:-5`, `uint:7`, `char:a`, `str:hi`, `ptr:0x10`).
        args: Vec<String>,
        /// Output buffer capacity in bytes.
        #[arg(long, default_value_t = DEFAULT_CAPACITY)]
        capacity: usize,
        #[arg(long, default_value = "tolerant")]
        mode: String,
        /// Structured JSONL log path.
        #[arg(long)]
        log: Option<PathBuf>,
    },
    /// Parse input with the scan engine.
    Scan {
        /// Input text.
        input: String,
        /// Format string.
        format: String,
        /// Destinations (`int`, `uint`, `char`, `ptr`, `chars:N`, `str:N`).
        dests: Vec<String>,
        #[arg(long, default_value = "tolerant")]
        mode: String,
        /// Structured JSONL log path.
        #[arg(long)]
        log: Option<PathBuf>,
    },
    /// Check a format string for malformed directives.
    Validate {
        /// Format string.
        format: String,
    },
    /// Validate a structured JSONL log file.
    ValidateLog {
        /// Log file path.
        path: PathBuf,
    },
}

fn run_modes(mode: &str) -> Result<Vec<&'static str>, String> {
    match mode {
        "tolerant" => Ok(vec!["tolerant"]),
        "strict" => Ok(vec!["strict"]),
        "both" => Ok(vec!["tolerant", "strict"]),
        other => Err(format!(
            "Unsupported mode '{other}', expected tolerant|strict|both"
        )),
    }
}

fn open_log(
    path: Option<&PathBuf>,
    campaign: &str,
) -> std::io::Result<Option<LogEmitter>> {
    path.map(|p| LogEmitter::to_file(p, campaign, &format!("run-{}", std::process::id())))
        .transpose()
}

/// Log one `print`/`scan` subcommand invocation and its canonical output.
fn log_invocation(
    log: Option<&PathBuf>,
    function: &str,
    mode: &str,
    inputs: serde_json::Value,
    output: &str,
) -> std::io::Result<()> {
    let Some(mut emitter) = open_log(log, "cli")? else {
        return Ok(());
    };
    let (level, outcome) = if output.starts_with("error:") {
        (LogLevel::Warn, Outcome::Error)
    } else {
        (LogLevel::Info, Outcome::Pass)
    };
    emitter.emit_entry(
        LogEntry::new(String::new(), level, "invocation")
            .with_stream(StreamKind::Cli)
            .with_mode(FormatMode::from_str_loose(mode).as_str())
            .with_case(function, "adhoc")
            .with_outcome(outcome)
            .with_details(serde_json::json!({ "inputs": inputs, "output": output })),
    )?;
    emitter.flush()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        #[cfg(unix)]
        Command::Capture {
            output,
            family,
            log,
        } => {
            eprintln!("Capturing {family} fixtures to {}", output.display());
            std::fs::create_dir_all(&output)?;
            let mut emitter = open_log(log.as_ref(), "fixture-capture")?;
            for set in mfmt_harness::capture::capture_family(&family)? {
                let file = format!("{}.json", set.family.replace('/', "_"));
                let path = output.join(file);
                std::fs::write(&path, set.to_json()?)?;
                eprintln!("Wrote {} cases to {}", set.cases.len(), path.display());
                if let Some(emitter) = emitter.as_mut() {
                    emitter.emit_entry(
                        LogEntry::new(String::new(), LogLevel::Info, "fixtures_captured")
                            .with_stream(StreamKind::Capture)
                            .with_outcome(Outcome::Pass)
                            .with_artifacts(vec![path.display().to_string()])
                            .with_details(serde_json::json!({
                                "family": set.family,
                                "cases": set.cases.len(),
                            })),
                    )?;
                }
            }
            if let Some(emitter) = emitter.as_mut() {
                emitter.flush()?;
            }
        }
        Command::Verify {
            fixture,
            mode,
            report,
            log,
        } => {
            let modes = run_modes(&mode)?;
            eprintln!("Verifying against fixtures in {}", fixture.display());
            let fixture_sets = FixtureSet::load_dir(&fixture)?;
            if fixture_sets.is_empty() {
                return Err(format!("No fixture JSON files found in {}", fixture.display()).into());
            }

            let run_id = format!("run-{}", std::process::id());
            let mut emitter = match &log {
                Some(path) => Some(LogEmitter::to_file(path, "fixture-verify", &run_id)?),
                None => None,
            };

            let mut results = Vec::new();
            for m in &modes {
                let runner = TestRunner::new("fixture-verify", *m);
                for set in &fixture_sets {
                    match emitter.as_mut() {
                        Some(emitter) => results.extend(runner.run_logged(set, emitter)?),
                        None => results.extend(runner.run(set)),
                    }
                }
            }

            let summary = VerificationSummary::from_results(results);
            let report_doc = ConformanceReport {
                title: String::from("mfmt Conformance Report"),
                mode: modes.join("+"),
                timestamp: now_utc(),
                summary,
            };

            eprintln!(
                "Verification complete: total={}, passed={}, failed={}",
                report_doc.summary.total, report_doc.summary.passed, report_doc.summary.failed
            );
            for r in report_doc.summary.failures() {
                eprintln!("FAIL {} [{}]", r.case_name, r.mode);
                if let Some(d) = &r.diff {
                    eprintln!("{d}");
                }
            }

            let mut artifacts = Vec::new();
            if let Some(report_path) = &report {
                eprintln!("Writing report to {}", report_path.display());
                std::fs::write(report_path, report_doc.to_markdown())?;
                let json_path = report_path.with_extension("json");
                std::fs::write(&json_path, report_doc.to_json())?;
                artifacts.push(report_path.clone());
                artifacts.push(json_path);
            }

            if let (Some(emitter), Some(log_path)) = (emitter.as_mut(), &log) {
                let outcome = if report_doc.summary.all_passed() {
                    Outcome::Pass
                } else {
                    Outcome::Fail
                };
                let mut index = ArtifactIndex::new(&run_id, "fixture-verify");
                for path in &artifacts {
                    index.add_file(path, "report")?;
                }
                let index_path = log_path.with_extension("artifacts.json");
                std::fs::write(&index_path, index.to_json()?)?;

                emitter.emit_entry(
                    LogEntry::new(String::new(), LogLevel::Info, "run_complete")
                        .with_stream(StreamKind::Conformance)
                        .with_outcome(outcome)
                        .with_artifacts(vec![index_path.display().to_string()])
                        .with_details(serde_json::json!({
                            "total": report_doc.summary.total,
                            "passed": report_doc.summary.passed,
                            "failed": report_doc.summary.failed,
                        })),
                )?;
                emitter.flush()?;
            }

            if !report_doc.summary.all_passed() {
                return Err("Conformance verification failed".into());
            }
        }
        Command::Print {
            format,
            args,
            capacity,
            mode,
            log,
        } => {
            let args = args
                .iter()
                .map(|a| a.parse::<ArgSpec>())
                .collect::<Result<Vec<_>, _>>()?;
            let inputs = serde_json::json!({
                "format": format,
                "capacity": capacity,
                "args": args,
            });
            let run = execute_fixture_case("print", &inputs, &mode)?;
            println!("{}", run.output);
            log_invocation(log.as_ref(), "print", &mode, inputs, &run.output)?;
        }
        Command::Scan {
            input,
            format,
            dests,
            mode,
            log,
        } => {
            let dests = dests
                .iter()
                .map(|d| d.parse::<DestSpec>())
                .collect::<Result<Vec<_>, _>>()?;
            let inputs = serde_json::json!({
                "input": input,
                "format": format,
                "dests": dests,
            });
            let run = execute_fixture_case("scan", &inputs, &mode)?;
            println!("{}", run.output);
            log_invocation(log.as_ref(), "scan", &mode, inputs, &run.output)?;
        }
        Command::Validate { format } => match mfmt_core::validate(format.as_bytes()) {
            Ok(summary) => println!(
                "ok: {} conversion(s), {} literal byte(s)",
                summary.conversions, summary.literal_bytes
            ),
            Err(err) => return Err(err.into()),
        },
        Command::ValidateLog { path } => {
            let (lines, errors) = validate_log_file(&path)?;
            for err in &errors {
                eprintln!("{err}");
            }
            eprintln!("Validated {lines} line(s), {} error(s)", errors.len());
            if !errors.is_empty() {
                return Err("Log validation failed".into());
            }
        }
    }

    Ok(())
}
