//! Host C library fixture capture.
//!
//! Runs single-conversion vectors through the host `snprintf`/`sscanf` and
//! serializes inputs/outputs as JSON fixtures for later verification.
//!
//! Only vectors on which the bounded engines are meant to agree with C are
//! captured. Zero-capacity buffers, `%Ns` precision-style truncation, the
//! null-pointer spelling, and inputs that end before the first conversion
//! are covered by the hand-written fixtures instead.

#![allow(unsafe_code)]

use std::ffi::{CString, c_char, c_int, c_uint, c_void};

use crate::conformance::{ArgSpec, DestSpec, c_string, print_output, quote, scan_output};
use crate::fixtures::{FixtureCase, FixtureSet};
use crate::structured_log;

struct PrintVector {
    name: &'static str,
    format: &'static str,
    capacity: usize,
    arg: Option<ArgSpec>,
}

struct ScanVector {
    name: &'static str,
    input: &'static str,
    format: &'static str,
    dest: DestSpec,
}

fn print_vectors() -> Vec<PrintVector> {
    let v = |name, format, capacity, arg| PrintVector {
        name,
        format,
        capacity,
        arg,
    };
    vec![
        v("literal_only", "Hello, World!", 64, None),
        v("percent_escape", "100%%", 64, None),
        v("int_basic", "Value: %d", 64, Some(ArgSpec::Int(42))),
        v("int_negative", "%d", 64, Some(ArgSpec::Int(-123))),
        v("int_min", "%d", 64, Some(ArgSpec::Int(i32::MIN))),
        v("int_width", "[%5d]", 64, Some(ArgSpec::Int(42))),
        v("int_zero_pad_sign", "%05d", 64, Some(ArgSpec::Int(-42))),
        v("uint_large", "%u", 64, Some(ArgSpec::Uint(4_000_000_000))),
        v("hex_lower", "%x", 64, Some(ArgSpec::Uint(0xDEAD_BEEF))),
        v("hex_upper", "%X", 64, Some(ArgSpec::Uint(255))),
        v("hex_zero_pad", "%08x", 64, Some(ArgSpec::Uint(0xBEEF))),
        v("hex_negative_int", "%x", 64, Some(ArgSpec::Int(-1))),
        v("char_basic", "Char: %c", 64, Some(ArgSpec::Char("A".into()))),
        v("char_width", "[%3c]", 64, Some(ArgSpec::Char("z".into()))),
        v("str_basic", "%s!", 64, Some(ArgSpec::Str("hello".into()))),
        v("str_width", "[%10s]", 64, Some(ArgSpec::Str("hi".into()))),
        v("str_empty", "[%s]", 64, Some(ArgSpec::Str(String::new()))),
        v("ptr_value", "%p", 64, Some(ArgSpec::Ptr(0x1000))),
        v("truncate_literal", "hello world", 6, None),
        v("truncate_int", "%d", 4, Some(ArgSpec::Int(123_456))),
        v("truncate_to_nul_only", "abc", 1, None),
        v("truncate_padding", "%20s", 8, Some(ArgSpec::Str("x".into()))),
    ]
}

fn scan_vectors() -> Vec<ScanVector> {
    let v = |name, input, format, dest| ScanVector {
        name,
        input,
        format,
        dest,
    };
    vec![
        v("int_basic", "42", "%d", DestSpec::Int),
        v("int_negative", "-17", "%d", DestSpec::Int),
        v("int_leading_space", " \t 8", "%d", DestSpec::Int),
        v("int_width", "12345", "%3d", DestSpec::Int),
        v("int_no_digits", "abc", "%d", DestSpec::Int),
        v("int_after_literal", "ID:77", "ID:%d", DestSpec::Int),
        v("int_then_percent", "50%", "%d%%", DestSpec::Int),
        v("uint_large", "4000000000", "%u", DestSpec::Uint),
        v("hex_plain", "ff", "%x", DestSpec::Uint),
        v("hex_prefixed", "0x1F", "%x", DestSpec::Uint),
        v("hex_upper", "DEADBEEF", "%X", DestSpec::Uint),
        v("char_keeps_space", " a", "%c", DestSpec::Char),
        v("char_after_space_directive", "   q", " %c", DestSpec::Char),
        v("chars_width", "abcdef", "%3c", DestSpec::Chars(3)),
        v("str_skips_space", "  word rest", "%s", DestSpec::Str(64)),
        v("str_width", "abcdefg", "%4s", DestSpec::Str(64)),
        v("ptr_hex", "0x1000", "%p", DestSpec::Ptr),
    ]
}

enum HostArg {
    Int(c_int),
    Uint(c_uint),
    Str(CString),
    Ptr(*const c_void),
}

fn host_arg(spec: &ArgSpec) -> Option<HostArg> {
    Some(match spec {
        ArgSpec::Int(v) => HostArg::Int(*v),
        ArgSpec::Uint(v) => HostArg::Uint(*v),
        ArgSpec::Char(s) => HostArg::Int(c_int::from(*s.as_bytes().first()?)),
        ArgSpec::Str(s) => HostArg::Str(CString::new(s.as_str()).ok()?),
        ArgSpec::Ptr(v) => HostArg::Ptr(*v as *const c_void),
    })
}

/// Run one print vector through the host `snprintf`.
fn host_print(vector: &PrintVector) -> Option<String> {
    if vector.capacity == 0 {
        return None;
    }
    let fmt = CString::new(vector.format).ok()?;
    let arg = vector.arg.as_ref().map(host_arg);
    let mut buf = vec![0u8; vector.capacity];
    let out = buf.as_mut_ptr().cast::<c_char>();
    let cap = buf.len();

    // SAFETY: `out` points to `cap` writable bytes, `fmt` is NUL-terminated,
    // and every vector carries exactly the one argument its conversion reads.
    let len = unsafe {
        match arg {
            None => libc::snprintf(out, cap, fmt.as_ptr()),
            Some(None) => return None,
            Some(Some(HostArg::Int(v))) => libc::snprintf(out, cap, fmt.as_ptr(), v),
            Some(Some(HostArg::Uint(v))) => libc::snprintf(out, cap, fmt.as_ptr(), v),
            Some(Some(HostArg::Str(ref s))) => libc::snprintf(out, cap, fmt.as_ptr(), s.as_ptr()),
            Some(Some(HostArg::Ptr(p))) => libc::snprintf(out, cap, fmt.as_ptr(), p),
        }
    };
    let len = usize::try_from(len).ok()?;
    Some(print_output(len, &buf))
}

/// Run one scan vector through the host `sscanf`.
fn host_scan(vector: &ScanVector) -> Option<String> {
    let input = CString::new(vector.input).ok()?;
    let fmt = CString::new(vector.format).ok()?;
    let (inp, f) = (input.as_ptr(), fmt.as_ptr());

    // SAFETY: both strings are NUL-terminated and each vector's single
    // conversion writes into a destination of the matching C type and size.
    let (count, value) = unsafe {
        match vector.dest {
            DestSpec::Int => {
                let mut v: c_int = 0;
                let n = libc::sscanf(inp, f, &mut v as *mut c_int);
                (n, v.to_string())
            }
            DestSpec::Uint => {
                let mut v: c_uint = 0;
                let n = libc::sscanf(inp, f, &mut v as *mut c_uint);
                (n, v.to_string())
            }
            DestSpec::Char => {
                let mut c: c_char = 0;
                let n = libc::sscanf(inp, f, &mut c as *mut c_char);
                (n, quote(&[c as u8]))
            }
            DestSpec::Chars(len) => {
                let mut b = vec![0u8; len];
                let n = libc::sscanf(inp, f, b.as_mut_ptr().cast::<c_char>());
                (n, quote(&b))
            }
            DestSpec::Str(cap) => {
                // Room for the host's own terminator past any width.
                let mut b = vec![0u8; cap + 1];
                let n = libc::sscanf(inp, f, b.as_mut_ptr().cast::<c_char>());
                (n, quote(c_string(&b).as_bytes()))
            }
            DestSpec::Ptr => {
                let mut p: *mut c_void = std::ptr::null_mut();
                let n = libc::sscanf(inp, f, &mut p as *mut *mut c_void);
                (n, format!("{:#x}", p as usize))
            }
        }
    };
    let count = usize::try_from(count).ok()?;
    let values: Vec<String> = (count > 0).then_some(value).into_iter().collect();
    Some(scan_output(count, &values))
}

fn fixture_set(family: &str, cases: Vec<FixtureCase>) -> FixtureSet {
    FixtureSet {
        version: String::from("v1"),
        family: family.to_string(),
        captured_at: structured_log::now_utc(),
        cases,
    }
}

/// Capture host `snprintf` behavior as the `stdio/print` fixture family.
#[must_use]
pub fn capture_print_fixtures() -> FixtureSet {
    let cases = print_vectors()
        .into_iter()
        .filter_map(|vector| {
            let expected_output = host_print(&vector)?;
            let mut inputs = serde_json::json!({
                "format": vector.format,
                "capacity": vector.capacity,
            });
            if let Some(arg) = &vector.arg {
                inputs["args"] = serde_json::json!([arg]);
            }
            Some(FixtureCase {
                name: format!("host_print_{}", vector.name),
                function: String::from("print"),
                spec_section: String::from("host snprintf"),
                inputs,
                expected_output,
                mode: String::from("both"),
            })
        })
        .collect();
    fixture_set("stdio/print", cases)
}

/// Capture host `sscanf` behavior as the `stdio/scan` fixture family.
#[must_use]
pub fn capture_scan_fixtures() -> FixtureSet {
    let cases = scan_vectors()
        .into_iter()
        .filter_map(|vector| {
            let expected_output = host_scan(&vector)?;
            Some(FixtureCase {
                name: format!("host_scan_{}", vector.name),
                function: String::from("scan"),
                spec_section: String::from("host sscanf"),
                inputs: serde_json::json!({
                    "input": vector.input,
                    "format": vector.format,
                    "dests": [vector.dest],
                }),
                expected_output,
                mode: String::from("both"),
            })
        })
        .collect();
    fixture_set("stdio/scan", cases)
}

/// Capture the fixture families named by `family` (`print`, `scan`, or `all`).
pub fn capture_family(family: &str) -> Result<Vec<FixtureSet>, String> {
    match family {
        "print" => Ok(vec![capture_print_fixtures()]),
        "scan" => Ok(vec![capture_scan_fixtures()]),
        "all" => Ok(vec![capture_print_fixtures(), capture_scan_fixtures()]),
        other => Err(format!("unknown family '{other}', expected print|scan|all")),
    }
}
