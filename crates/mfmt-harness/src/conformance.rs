//! Fixture case execution against the mfmt engines.
//!
//! Fixture inputs are JSON objects. A `print` case carries:
//!
//! ```json
//! {"format": "%05d|%s", "capacity": 16, "args": [{"int": -42}, {"str": "ok"}]}
//! ```
//!
//! and a `scan` case carries:
//!
//! ```json
//! {"input": "12 ab", "format": "%d %s", "dests": ["int", {"str": 8}]}
//! ```
//!
//! Outputs are rendered in a canonical text form so fixtures captured from
//! the host C library compare byte-for-byte with the engine results:
//! - print: `"<logical length>:<buffer contents up to NUL>"`
//! - scan: `"<matched count>:[<slot>, <slot>, ...]"`, one entry per matched slot
//! - engine error: `"error:<message>"`

use std::str::FromStr;

use mfmt_core::{Arg, Dest, FormatMode, print_with, scan_with};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Buffer capacity used when a print case does not name one.
pub const DEFAULT_CAPACITY: usize = 256;

/// Reasons a fixture case cannot be run at all.
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("unsupported function '{0}'")]
    UnsupportedFunction(String),
    #[error("malformed inputs: {0}")]
    Inputs(#[from] serde_json::Error),
    #[error("argument #{index}: {reason}")]
    BadArgument { index: usize, reason: &'static str },
}

/// Argument slot description for a print case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArgSpec {
    Int(i32),
    Uint(u32),
    /// Single character; must be one byte long.
    Char(String),
    Str(String),
    Ptr(usize),
}

/// Destination slot description for a scan case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DestSpec {
    Int,
    Uint,
    Char,
    /// Character array of the given length for `%Nc`.
    Chars(usize),
    /// String buffer of the given capacity.
    Str(usize),
    Ptr,
}

impl FromStr for ArgSpec {
    type Err = String;

    /// Parse the command-line form `kind:value`, e.g. `int:-5` or `str:hi`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, value) = s
            .split_once(':')
            .ok_or_else(|| format!("expected kind:value, got '{s}'"))?;
        let bad = |e: std::num::ParseIntError| format!("bad {kind} value '{value}': {e}");
        match kind {
            "int" => value.parse().map(Self::Int).map_err(bad),
            "uint" => value.parse().map(Self::Uint).map_err(bad),
            "char" => Ok(Self::Char(value.to_string())),
            "str" => Ok(Self::Str(value.to_string())),
            "ptr" => {
                let digits = value
                    .strip_prefix("0x")
                    .or_else(|| value.strip_prefix("0X"))
                    .unwrap_or(value);
                usize::from_str_radix(digits, 16).map(Self::Ptr).map_err(bad)
            }
            other => Err(format!("unknown argument kind '{other}'")),
        }
    }
}

impl FromStr for DestSpec {
    type Err = String;

    /// Parse the command-line form: `int`, `uint`, `char`, `ptr`, `chars:N`, `str:N`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, size) = match s.split_once(':') {
            Some((kind, n)) => {
                let n = n
                    .parse::<usize>()
                    .map_err(|e| format!("bad size in '{s}': {e}"))?;
                (kind, Some(n))
            }
            None => (s, None),
        };
        match (kind, size) {
            ("int", None) => Ok(Self::Int),
            ("uint", None) => Ok(Self::Uint),
            ("char", None) => Ok(Self::Char),
            ("ptr", None) => Ok(Self::Ptr),
            ("chars", Some(n)) => Ok(Self::Chars(n)),
            ("str", Some(n)) => Ok(Self::Str(n)),
            _ => Err(format!("unknown destination '{s}'")),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PrintInputs {
    format: String,
    #[serde(default = "default_capacity")]
    capacity: usize,
    #[serde(default)]
    args: Vec<ArgSpec>,
}

#[derive(Debug, Deserialize)]
struct ScanInputs {
    input: String,
    format: String,
    #[serde(default)]
    dests: Vec<DestSpec>,
}

fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}

/// Result of running one fixture case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseRun {
    /// Canonical output of the engine.
    pub output: String,
    /// Free-form observation attached to the run.
    pub note: Option<String>,
}

/// Execute one fixture case under `mode` (`tolerant` or `strict`).
pub fn execute_fixture_case(
    function: &str,
    inputs: &serde_json::Value,
    mode: &str,
) -> Result<CaseRun, ExecError> {
    let mode = FormatMode::from_str_loose(mode);
    match function {
        "print" => {
            let inputs: PrintInputs = serde_json::from_value(inputs.clone())?;
            run_print(mode, &inputs)
        }
        "scan" => {
            let inputs: ScanInputs = serde_json::from_value(inputs.clone())?;
            run_scan(mode, &inputs)
        }
        other => Err(ExecError::UnsupportedFunction(other.to_string())),
    }
}

fn to_arg(index: usize, spec: &ArgSpec) -> Result<Arg<'_>, ExecError> {
    Ok(match spec {
        ArgSpec::Int(v) => Arg::Int(*v),
        ArgSpec::Uint(v) => Arg::Uint(*v),
        ArgSpec::Char(s) => match s.as_bytes() {
            [b] => Arg::Char(*b),
            _ => {
                return Err(ExecError::BadArgument {
                    index,
                    reason: "char argument must be exactly one byte",
                });
            }
        },
        ArgSpec::Str(s) => Arg::Str(s.as_bytes()),
        ArgSpec::Ptr(v) => Arg::Ptr(*v),
    })
}

fn run_print(mode: FormatMode, inputs: &PrintInputs) -> Result<CaseRun, ExecError> {
    let args = inputs
        .args
        .iter()
        .enumerate()
        .map(|(i, spec)| to_arg(i, spec))
        .collect::<Result<Vec<_>, _>>()?;

    let mut buf = vec![0u8; inputs.capacity];
    let output = match print_with(mode, &mut buf, inputs.format.as_bytes(), &args) {
        Ok(len) => print_output(len, &buf),
        Err(err) => format!("error:{err}"),
    };
    let note = (inputs.capacity > 0 && buf.iter().all(|&b| b != 0))
        .then(|| String::from("buffer not NUL-terminated"));
    Ok(CaseRun { output, note })
}

/// Owned storage backing one scan destination.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Slot {
    Int(i32),
    Uint(u32),
    Char(u8),
    Bytes(Vec<u8>),
    Ptr(usize),
}

impl Slot {
    fn for_spec(spec: DestSpec) -> Self {
        match spec {
            DestSpec::Int => Self::Int(0),
            DestSpec::Uint => Self::Uint(0),
            DestSpec::Char => Self::Char(0),
            DestSpec::Chars(n) | DestSpec::Str(n) => Self::Bytes(vec![0; n]),
            DestSpec::Ptr => Self::Ptr(0),
        }
    }

    fn render(&self, spec: DestSpec) -> String {
        match (self, spec) {
            (Self::Int(v), _) => v.to_string(),
            (Self::Uint(v), _) => v.to_string(),
            (Self::Char(c), _) => quote(std::slice::from_ref(c)),
            (Self::Bytes(b), DestSpec::Chars(_)) => quote(b),
            (Self::Bytes(b), _) => quote(c_string(b).as_bytes()),
            (Self::Ptr(v), _) => format!("{v:#x}"),
        }
    }
}

fn run_scan(mode: FormatMode, inputs: &ScanInputs) -> Result<CaseRun, ExecError> {
    let mut slots: Vec<Slot> = inputs.dests.iter().map(|&d| Slot::for_spec(d)).collect();

    let result = {
        let mut dests: Vec<Dest<'_>> = slots
            .iter_mut()
            .zip(&inputs.dests)
            .map(|(slot, spec)| match (slot, spec) {
                (Slot::Int(v), _) => Dest::Int(v),
                (Slot::Uint(v), _) => Dest::Uint(v),
                (Slot::Char(c), _) => Dest::Char(c),
                (Slot::Bytes(b), DestSpec::Chars(_)) => Dest::Chars(b),
                (Slot::Bytes(b), _) => Dest::Str(b),
                (Slot::Ptr(v), _) => Dest::Ptr(v),
            })
            .collect();
        scan_with(mode, inputs.input.as_bytes(), inputs.format.as_bytes(), &mut dests)
    };

    let output = match result {
        Ok(matched) => {
            let values: Vec<String> = slots
                .iter()
                .zip(&inputs.dests)
                .take(matched)
                .map(|(slot, &spec)| slot.render(spec))
                .collect();
            scan_output(matched, &values)
        }
        Err(err) => format!("error:{err}"),
    };
    Ok(CaseRun { output, note: None })
}

/// Canonical print output: logical length, then the buffer text.
pub(crate) fn print_output(len: usize, buf: &[u8]) -> String {
    format!("{len}:{}", c_string(buf))
}

/// Canonical scan output: matched count, then the matched slot values.
pub(crate) fn scan_output(matched: usize, values: &[String]) -> String {
    format!("{matched}:[{}]", values.join(", "))
}

/// Debug-quoted rendering of a byte string.
pub(crate) fn quote(bytes: &[u8]) -> String {
    format!("{:?}", String::from_utf8_lossy(bytes))
}

/// Contents of a C string buffer up to (not including) the first NUL.
pub(crate) fn c_string(buf: &[u8]) -> String {
    let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    String::from_utf8_lossy(&buf[..end]).into_owned()
}
