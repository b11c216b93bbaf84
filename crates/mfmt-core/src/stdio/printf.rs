//! Print engine.
//!
//! Renders typed value slots into a caller-owned byte buffer following the
//! `%[0][width]{d|u|x|X|c|s|p}` grammar.
//!
//! Design invariant: every output byte goes through one bounded copy step.
//! With a buffer of capacity `N >= 1` at most `N - 1` content bytes are
//! written, followed by a NUL. The returned length is the logical length the
//! output would have with unbounded capacity, so `len >= N` signals
//! truncation. Nothing here allocates; integers render into a stack scratch
//! buffer.

use crate::config::FormatMode;
use crate::error::FormatError;
use crate::stdio::convert::{DIGIT_BUF_LEN, render_digits, until_nul};
use crate::stdio::directive::{ConversionKind, ConversionSpec, Directive, directives, validate};

// ---------------------------------------------------------------------------
// Value slots
// ---------------------------------------------------------------------------

/// Typed value for one conversion directive.
///
/// `Int`, `Uint` and `Char` form the integer family and are accepted by every
/// integer conversion as well as `%c`, reinterpreted the way C promotes them
/// (`Int(-1)` under `%x` renders `ffffffff`). `Str` is cut at its first NUL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arg<'a> {
    Int(i32),
    Uint(u32),
    Char(u8),
    Str(&'a [u8]),
    Ptr(usize),
}

impl Arg<'_> {
    fn integer_bits(self) -> Option<u32> {
        match self {
            Self::Int(v) => Some(v as u32),
            Self::Uint(v) => Some(v),
            Self::Char(c) => Some(u32::from(c)),
            Self::Str(_) | Self::Ptr(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Bounded writer
// ---------------------------------------------------------------------------

struct BoundedWriter<'b> {
    buf: &'b mut [u8],
    written: usize,
    logical: usize,
}

impl<'b> BoundedWriter<'b> {
    fn new(buf: &'b mut [u8]) -> Self {
        Self {
            buf,
            written: 0,
            logical: 0,
        }
    }

    /// Content bytes still writable, keeping one byte for the NUL.
    fn room(&self) -> usize {
        self.buf.len().saturating_sub(1) - self.written
    }

    fn push(&mut self, bytes: &[u8]) {
        let n = bytes.len().min(self.room());
        self.buf[self.written..self.written + n].copy_from_slice(&bytes[..n]);
        self.written += n;
        self.logical = self.logical.saturating_add(bytes.len());
    }

    fn fill(&mut self, byte: u8, count: usize) {
        let n = count.min(self.room());
        self.buf[self.written..self.written + n].fill(byte);
        self.written += n;
        self.logical = self.logical.saturating_add(count);
    }

    /// NUL-terminate and return the logical length.
    fn finish(self) -> usize {
        if let Some(terminator) = self.buf.get_mut(self.written) {
            *terminator = 0;
        }
        self.logical
    }
}

// ---------------------------------------------------------------------------
// Renderers
// ---------------------------------------------------------------------------

fn emit_integer(out: &mut BoundedWriter<'_>, negative: bool, digits: &[u8], spec: &ConversionSpec) {
    let content_len = negative as usize + digits.len();
    let pad_total = spec.width.unwrap_or(0).saturating_sub(content_len);

    if spec.zero_pad {
        // Zeros go between the sign and the first digit.
        if negative {
            out.push(b"-");
        }
        out.fill(b'0', pad_total);
    } else {
        out.fill(b' ', pad_total);
        if negative {
            out.push(b"-");
        }
    }
    out.push(digits);
}

fn emit_padded(out: &mut BoundedWriter<'_>, body: &[u8], spec: &ConversionSpec) {
    let pad_total = spec.width.unwrap_or(0).saturating_sub(body.len());
    out.fill(b' ', pad_total);
    out.push(body);
}

fn render(
    out: &mut BoundedWriter<'_>,
    spec: &ConversionSpec,
    arg: Arg<'_>,
    index: usize,
) -> Result<(), FormatError> {
    let mismatch = FormatError::ArgumentMismatch {
        index,
        expected: spec.kind,
    };
    let mut digits = [0u8; DIGIT_BUF_LEN];

    match spec.kind {
        ConversionKind::SignedDecimal => {
            let value = arg.integer_bits().ok_or(mismatch)? as i32;
            let count = render_digits(u64::from(value.unsigned_abs()), 10, false, &mut digits);
            emit_integer(out, value < 0, &digits[DIGIT_BUF_LEN - count..], spec);
        }
        ConversionKind::UnsignedDecimal | ConversionKind::HexLower | ConversionKind::HexUpper => {
            let value = arg.integer_bits().ok_or(mismatch)?;
            let (base, uppercase) = match spec.kind {
                ConversionKind::HexLower => (16, false),
                ConversionKind::HexUpper => (16, true),
                _ => (10, false),
            };
            let count = render_digits(u64::from(value), base, uppercase, &mut digits);
            emit_integer(out, false, &digits[DIGIT_BUF_LEN - count..], spec);
        }
        ConversionKind::Char => {
            // C converts the promoted int back to unsigned char.
            let c = arg.integer_bits().ok_or(mismatch)? as u8;
            emit_padded(out, &[c], spec);
        }
        ConversionKind::Str => {
            let Arg::Str(s) = arg else {
                return Err(mismatch);
            };
            let s = until_nul(s);
            let shown = match spec.width {
                Some(w) if w < s.len() => &s[..w],
                _ => s,
            };
            emit_padded(out, shown, spec);
        }
        ConversionKind::Pointer => {
            let Arg::Ptr(addr) = arg else {
                return Err(mismatch);
            };
            if addr == 0 {
                emit_padded(out, b"(nil)", spec);
            } else {
                let count = render_digits(addr as u64, 16, false, &mut digits);
                let start = DIGIT_BUF_LEN - count - 2;
                digits[start..start + 2].copy_from_slice(b"0x");
                emit_padded(out, &digits[start..], spec);
            }
        }
    }
    Ok(())
}

fn run(out: &mut BoundedWriter<'_>, fmt: &[u8], args: &[Arg<'_>]) -> Result<(), FormatError> {
    let mut next_arg = 0;
    for directive in directives(fmt) {
        match directive {
            Directive::Literal(text) => out.push(text),
            Directive::Percent => out.push(b"%"),
            Directive::Conversion(spec) => {
                let index = next_arg;
                let arg = *args
                    .get(index)
                    .ok_or(FormatError::MissingArgument { index })?;
                next_arg += 1;
                render(out, &spec, arg, index)?;
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Format `args` into `buf` according to `fmt` in the default (tolerant) mode.
///
/// Returns the logical length. See [`print_with`].
pub fn print(buf: &mut [u8], fmt: &[u8], args: &[Arg<'_>]) -> Result<usize, FormatError> {
    print_with(FormatMode::default(), buf, fmt, args)
}

/// Format `args` into `buf` according to `fmt`.
///
/// - `buf.len() == 0`: the buffer is untouched and `Ok(0)` is returned.
/// - otherwise `buf[..min(len, buf.len() - 1)]` holds the output followed by
///   a NUL, where `len` is the returned logical length.
///
/// On a slot error the buffer holds the output produced before the failing
/// directive, still NUL-terminated. In [`FormatMode::Strict`] a malformed
/// format is rejected before the buffer is touched.
pub fn print_with(
    mode: FormatMode,
    buf: &mut [u8],
    fmt: &[u8],
    args: &[Arg<'_>],
) -> Result<usize, FormatError> {
    if mode.rejects_malformed() {
        validate(fmt)?;
    }
    let capacity = buf.len();
    let mut out = BoundedWriter::new(buf);
    let result = run(&mut out, fmt, args);
    let logical = out.finish();
    result.map(|()| if capacity == 0 { 0 } else { logical })
}

/// Logical length `fmt` would produce with `args`, without writing anything.
///
/// Use it to size a buffer before calling [`print`].
pub fn formatted_len(fmt: &[u8], args: &[Arg<'_>]) -> Result<usize, FormatError> {
    let mut out = BoundedWriter::new(&mut []);
    run(&mut out, fmt, args)?;
    Ok(out.finish())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
