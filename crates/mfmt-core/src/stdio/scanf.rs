//! Scan engine.
//!
//! Reads a fixed input string against the same directive grammar the print
//! engine uses, writing parsed values into caller-owned destination slots.
//!
//! The input cursor only moves forward. Scanning stops at the first
//! directive the input cannot satisfy; the number of conversions matched
//! before that point is returned and no later destination is written. Input,
//! like the format, ends at the first NUL byte.

use crate::config::FormatMode;
use crate::error::FormatError;
use crate::stdio::convert::{digit_value, is_scan_space, until_nul};
use crate::stdio::directive::{ConversionKind, ConversionSpec, Directive, directives, validate};

// ---------------------------------------------------------------------------
// Destination slots
// ---------------------------------------------------------------------------

/// Write-only destination for one conversion directive.
///
/// `Int` and `Uint` cells accept every integer conversion and store the
/// parsed value with two's-complement reinterpretation. `Chars` receives the
/// raw bytes of a `%c` (no NUL appended); `Str` receives a `%s` token followed
/// by a NUL, truncated to fit.
#[derive(Debug)]
pub enum Dest<'a> {
    Int(&'a mut i32),
    Uint(&'a mut u32),
    Char(&'a mut u8),
    Chars(&'a mut [u8]),
    Str(&'a mut [u8]),
    Ptr(&'a mut usize),
}

impl Dest<'_> {
    fn accepts(&self, kind: ConversionKind) -> bool {
        match self {
            Self::Int(_) | Self::Uint(_) => kind.is_integer(),
            Self::Char(_) | Self::Chars(_) => kind == ConversionKind::Char,
            Self::Str(_) => kind == ConversionKind::Str,
            Self::Ptr(_) => kind == ConversionKind::Pointer,
        }
    }

    fn store_integer(&mut self, bits: u32) {
        match self {
            Self::Int(cell) => **cell = bits as i32,
            Self::Uint(cell) => **cell = bits,
            _ => {}
        }
    }
}

// ---------------------------------------------------------------------------
// Input cursor
// ---------------------------------------------------------------------------

struct Cursor<'i> {
    input: &'i [u8],
    pos: usize,
}

impl<'i> Cursor<'i> {
    fn new(input: &'i [u8]) -> Self {
        Self {
            input: until_nul(input),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn peek_at(&self, ahead: usize) -> Option<u8> {
        self.input.get(self.pos + ahead).copied()
    }

    fn bump(&mut self) {
        self.pos += 1;
    }

    fn skip_space(&mut self) {
        while self.peek().is_some_and(is_scan_space) {
            self.bump();
        }
    }

    /// Consume the next `n` bytes, or nothing if fewer remain.
    fn take(&mut self, n: usize) -> Option<&'i [u8]> {
        let end = self.pos.checked_add(n)?;
        let bytes = self.input.get(self.pos..end)?;
        self.pos = end;
        Some(bytes)
    }

    /// Consume a run of non-whitespace bytes, at most `limit` long.
    fn take_token(&mut self, limit: usize) -> &'i [u8] {
        let start = self.pos;
        while self.pos - start < limit && self.peek().is_some_and(|c| !is_scan_space(c)) {
            self.bump();
        }
        &self.input[start..self.pos]
    }

    /// Consume up to `budget` digits in `base`. Returns the saturated value,
    /// or `None` if no digit was available.
    fn take_digits(&mut self, base: u64, budget: usize) -> Option<u64> {
        let mut acc = 0_u64;
        let mut used = 0;
        while used < budget {
            let Some(d) = self.peek().and_then(|c| digit_value(c, base)) else {
                break;
            };
            acc = acc.saturating_mul(base).saturating_add(d);
            self.bump();
            used += 1;
        }
        (used > 0).then_some(acc)
    }

    /// Skip a `0x`/`0X` prefix when a hex digit follows it.
    fn skip_hex_prefix(&mut self) {
        if self.peek() == Some(b'0')
            && matches!(self.peek_at(1), Some(b'x' | b'X'))
            && self.peek_at(2).is_some_and(|c| c.is_ascii_hexdigit())
        {
            self.pos += 2;
        }
    }
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

/// Parse `-?[0-9]+` with the sign counted against the width.
fn scan_signed(cur: &mut Cursor<'_>, width: usize) -> Option<i32> {
    let mut budget = width;
    let negative = cur.peek() == Some(b'-');
    if negative {
        cur.bump();
        budget = budget.saturating_sub(1);
    }
    let magnitude = cur.take_digits(10, budget)?;
    Some(if negative {
        i32::try_from(-(magnitude.min(1 << 31) as i64)).unwrap_or(i32::MIN)
    } else {
        i32::try_from(magnitude).unwrap_or(i32::MAX)
    })
}

/// Apply one conversion. Returns `false` when the input cannot satisfy it;
/// `dest` is only written on success.
fn convert(cur: &mut Cursor<'_>, spec: &ConversionSpec, dest: &mut Dest<'_>) -> bool {
    // A zero width is the same as no width.
    let width = spec.width.filter(|&w| w > 0);
    let budget = width.unwrap_or(usize::MAX);

    if spec.kind != ConversionKind::Char {
        cur.skip_space();
    }

    match spec.kind {
        ConversionKind::SignedDecimal => {
            let Some(value) = scan_signed(cur, budget) else {
                return false;
            };
            dest.store_integer(value as u32);
        }
        ConversionKind::UnsignedDecimal => {
            let Some(value) = cur.take_digits(10, budget) else {
                return false;
            };
            dest.store_integer(u32::try_from(value).unwrap_or(u32::MAX));
        }
        ConversionKind::HexLower | ConversionKind::HexUpper => {
            // The prefix does not count against the width.
            cur.skip_hex_prefix();
            let Some(value) = cur.take_digits(16, budget) else {
                return false;
            };
            dest.store_integer(u32::try_from(value).unwrap_or(u32::MAX));
        }
        ConversionKind::Pointer => {
            cur.skip_hex_prefix();
            let Some(value) = cur.take_digits(16, budget) else {
                return false;
            };
            if let Dest::Ptr(cell) = dest {
                **cell = usize::try_from(value).unwrap_or(usize::MAX);
            }
        }
        ConversionKind::Char => {
            let count = width.unwrap_or(1);
            let Some(bytes) = cur.take(count) else {
                return false;
            };
            match dest {
                Dest::Char(cell) => **cell = bytes[0],
                Dest::Chars(buf) => {
                    let n = bytes.len().min(buf.len());
                    buf[..n].copy_from_slice(&bytes[..n]);
                }
                _ => {}
            }
        }
        ConversionKind::Str => {
            let token = cur.take_token(budget);
            if token.is_empty() {
                return false;
            }
            // A zero-capacity buffer still consumes and counts the token.
            if let Dest::Str(buf) = dest {
                if let Some(limit) = buf.len().checked_sub(1) {
                    let n = token.len().min(limit);
                    buf[..n].copy_from_slice(&token[..n]);
                    buf[n] = 0;
                }
            }
        }
    }
    true
}

fn match_literal(cur: &mut Cursor<'_>, text: &[u8]) -> bool {
    for &expected in text {
        if is_scan_space(expected) {
            cur.skip_space();
        } else if cur.peek() == Some(expected) {
            cur.bump();
        } else {
            return false;
        }
    }
    true
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Scan `input` according to `fmt` in the default (tolerant) mode.
///
/// Returns the number of conversions matched. See [`scan_with`].
pub fn scan(input: &[u8], fmt: &[u8], dests: &mut [Dest<'_>]) -> Result<usize, FormatError> {
    scan_with(FormatMode::default(), input, fmt, dests)
}

/// Scan `input` according to `fmt`, filling `dests` in order.
///
/// A partial match is not an error: `Ok(n)` means the first `n` destinations
/// hold parsed values and the rest were not written. Errors are reserved for
/// caller contract violations (missing or ill-typed slots) and, in
/// [`FormatMode::Strict`], malformed formats.
pub fn scan_with(
    mode: FormatMode,
    input: &[u8],
    fmt: &[u8],
    dests: &mut [Dest<'_>],
) -> Result<usize, FormatError> {
    if mode.rejects_malformed() {
        validate(fmt)?;
    }

    let mut cur = Cursor::new(input);
    let mut matched = 0;
    for directive in directives(fmt) {
        let ok = match directive {
            Directive::Literal(text) => match_literal(&mut cur, text),
            Directive::Percent => {
                let ok = cur.peek() == Some(b'%');
                if ok {
                    cur.bump();
                }
                ok
            }
            Directive::Conversion(spec) => {
                let index = matched;
                let dest = dests
                    .get_mut(index)
                    .ok_or(FormatError::MissingArgument { index })?;
                if !dest.accepts(spec.kind) {
                    return Err(FormatError::ArgumentMismatch {
                        index,
                        expected: spec.kind,
                    });
                }
                let ok = convert(&mut cur, &spec, dest);
                if ok {
                    matched += 1;
                }
                ok
            }
        };
        if !ok {
            break;
        }
    }
    Ok(matched)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
