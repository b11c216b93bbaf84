//! Format directive parser.
//!
//! Both engines walk the format string with the same restartable step
//! function, [`next_directive`]. A format string is a byte slice; a NUL byte,
//! if present, ends it early (C string semantics).
//!
//! Grammar: `%[0][width]{d|u|x|X|c|s|p}`, `%%`, and literal bytes. A `%` that
//! does not start a valid conversion is malformed. The step function degrades
//! it to a one-byte literal; [`validate`] reports it.

use crate::error::FormatError;
use crate::stdio::convert::parse_decimal;

// ---------------------------------------------------------------------------
// Directive types
// ---------------------------------------------------------------------------

/// The value type a conversion directive requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConversionKind {
    SignedDecimal,   // 'd'
    UnsignedDecimal, // 'u'
    HexLower,        // 'x'
    HexUpper,        // 'X'
    Char,            // 'c'
    Str,             // 's'
    Pointer,         // 'p'
}

impl ConversionKind {
    /// Classify a conversion character.
    #[must_use]
    pub const fn from_byte(c: u8) -> Option<Self> {
        Some(match c {
            b'd' => Self::SignedDecimal,
            b'u' => Self::UnsignedDecimal,
            b'x' => Self::HexLower,
            b'X' => Self::HexUpper,
            b'c' => Self::Char,
            b's' => Self::Str,
            b'p' => Self::Pointer,
            _ => return None,
        })
    }

    /// The conversion character for this kind.
    #[must_use]
    pub const fn as_byte(self) -> u8 {
        match self {
            Self::SignedDecimal => b'd',
            Self::UnsignedDecimal => b'u',
            Self::HexLower => b'x',
            Self::HexUpper => b'X',
            Self::Char => b'c',
            Self::Str => b's',
            Self::Pointer => b'p',
        }
    }

    #[must_use]
    pub const fn as_char(self) -> char {
        self.as_byte() as char
    }

    /// Integer conversions (`d`, `u`, `x`, `X`): the only kinds that honor
    /// zero padding.
    #[must_use]
    pub const fn is_integer(self) -> bool {
        matches!(
            self,
            Self::SignedDecimal | Self::UnsignedDecimal | Self::HexLower | Self::HexUpper
        )
    }
}

/// A parsed conversion directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionSpec {
    pub kind: ConversionKind,
    /// Minimum field width (print) or maximum consumption (scan).
    pub width: Option<usize>,
    /// Set when the width token starts with `0` and has more digits.
    pub zero_pad: bool,
}

/// One parsed unit of a format string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive<'a> {
    /// Literal bytes, emitted or matched verbatim.
    Literal(&'a [u8]),
    /// A conversion consuming one value slot.
    Conversion(ConversionSpec),
    /// A `%%` escape.
    Percent,
}

/// Counts gathered by [`validate`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatSummary {
    /// Number of conversion directives, i.e. slots the format consumes.
    pub conversions: usize,
    /// Number of literal bytes, counting each `%%` as one.
    pub literal_bytes: usize,
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// Parse a conversion starting after the '%' character.
///
/// Returns `(spec, bytes_consumed)` counted from `fmt[0]`, or `None` if no
/// valid conversion character follows the optional width digits.
#[must_use]
pub fn parse_conversion(fmt: &[u8]) -> Option<(ConversionSpec, usize)> {
    let mut pos = 0;
    while pos < fmt.len() && fmt[pos].is_ascii_digit() {
        pos += 1;
    }
    let width = (pos > 0).then(|| parse_decimal(&fmt[..pos]));
    let zero_pad = pos > 1 && fmt[0] == b'0';

    let kind = ConversionKind::from_byte(*fmt.get(pos)?)?;
    Some((
        ConversionSpec {
            kind,
            width,
            zero_pad,
        },
        pos + 1,
    ))
}

enum Step<'a> {
    Directive(Directive<'a>),
    Malformed(&'a [u8]),
}

fn step(fmt: &[u8], pos: usize) -> Option<(Step<'_>, usize)> {
    let len = fmt.len();
    if pos >= len || fmt[pos] == 0 {
        return None;
    }

    if fmt[pos] != b'%' {
        let mut end = pos;
        while end < len && fmt[end] != b'%' && fmt[end] != 0 {
            end += 1;
        }
        return Some((Step::Directive(Directive::Literal(&fmt[pos..end])), end));
    }

    if fmt.get(pos + 1) == Some(&b'%') {
        return Some((Step::Directive(Directive::Percent), pos + 2));
    }
    match parse_conversion(&fmt[pos + 1..]) {
        Some((spec, consumed)) => Some((
            Step::Directive(Directive::Conversion(spec)),
            pos + 1 + consumed,
        )),
        // The '%' alone becomes literal; whatever follows is parsed afresh.
        None => Some((Step::Malformed(&fmt[pos..pos + 1]), pos + 1)),
    }
}

/// Parse one directive starting at byte `pos`.
///
/// Returns the directive and the cursor position just after it, or `None` at
/// the end of the format (slice end or NUL). Malformed directives come back
/// as a one-byte `Literal("%")`.
#[must_use]
pub fn next_directive(fmt: &[u8], pos: usize) -> Option<(Directive<'_>, usize)> {
    let (step, next) = step(fmt, pos)?;
    let directive = match step {
        Step::Directive(d) => d,
        Step::Malformed(text) => Directive::Literal(text),
    };
    Some((directive, next))
}

/// Iterator over the directives of a format string.
#[derive(Debug, Clone)]
pub struct Directives<'a> {
    fmt: &'a [u8],
    pos: usize,
}

impl<'a> Directives<'a> {
    /// Byte offset of the next directive to be yielded.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }
}

impl<'a> Iterator for Directives<'a> {
    type Item = Directive<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (directive, next) = next_directive(self.fmt, self.pos)?;
        self.pos = next;
        Some(directive)
    }
}

/// Iterate over the directives of `fmt`.
#[must_use]
pub fn directives(fmt: &[u8]) -> Directives<'_> {
    Directives { fmt, pos: 0 }
}

/// Walk `fmt` once and reject the first malformed directive.
pub fn validate(fmt: &[u8]) -> Result<FormatSummary, FormatError> {
    let mut summary = FormatSummary::default();
    let mut pos = 0;
    while let Some((step, next)) = step(fmt, pos) {
        match step {
            Step::Malformed(_) => return Err(FormatError::MalformedDirective { offset: pos }),
            Step::Directive(Directive::Literal(text)) => summary.literal_bytes += text.len(),
            Step::Directive(Directive::Percent) => summary.literal_bytes += 1,
            Step::Directive(Directive::Conversion(_)) => summary.conversions += 1,
        }
        pos = next;
    }
    Ok(summary)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn conv(kind: ConversionKind, width: Option<usize>, zero_pad: bool) -> Directive<'static> {
        Directive::Conversion(ConversionSpec {
            kind,
            width,
            zero_pad,
        })
    }

    #[test]
    fn test_parse_simple_int() {
        let (spec, consumed) = parse_conversion(b"d").unwrap();
        assert_eq!(consumed, 1);
        assert_eq!(spec.kind, ConversionKind::SignedDecimal);
        assert_eq!(spec.width, None);
        assert!(!spec.zero_pad);
    }

    #[test]
    fn test_parse_width() {
        let (spec, consumed) = parse_conversion(b"10s").unwrap();
        assert_eq!(consumed, 3);
        assert_eq!(spec.kind, ConversionKind::Str);
        assert_eq!(spec.width, Some(10));
        assert!(!spec.zero_pad);
    }

    #[test]
    fn test_parse_zero_pad() {
        let (spec, _) = parse_conversion(b"05x").unwrap();
        assert_eq!(spec.width, Some(5));
        assert!(spec.zero_pad);

        // A lone '0' is a width of zero, not a flag.
        let (spec, _) = parse_conversion(b"0d").unwrap();
        assert_eq!(spec.width, Some(0));
        assert!(!spec.zero_pad);
    }

    #[test]
    fn test_parse_rejects_unknown_conversion() {
        assert!(parse_conversion(b"f").is_none());
        assert!(parse_conversion(b"12").is_none());
        assert!(parse_conversion(b"").is_none());
        assert!(parse_conversion(b"-5d").is_none());
    }

    #[test]
    fn test_all_kinds_roundtrip_bytes() {
        for c in *b"duxXcsp" {
            let kind = ConversionKind::from_byte(c).unwrap();
            assert_eq!(kind.as_byte(), c);
        }
    }

    #[test]
    fn test_directive_sequence() {
        let got: Vec<_> = directives(b"hello %d world %5s!").collect();
        assert_eq!(
            got,
            vec![
                Directive::Literal(b"hello "),
                conv(ConversionKind::SignedDecimal, None, false),
                Directive::Literal(b" world "),
                conv(ConversionKind::Str, Some(5), false),
                Directive::Literal(b"!"),
            ]
        );
    }

    #[test]
    fn test_percent_escape() {
        let got: Vec<_> = directives(b"100%%").collect();
        assert_eq!(got, vec![Directive::Literal(b"100"), Directive::Percent]);
    }

    #[test]
    fn test_malformed_becomes_literal() {
        let got: Vec<_> = directives(b"a%5qb").collect();
        assert_eq!(
            got,
            vec![
                Directive::Literal(b"a"),
                Directive::Literal(b"%"),
                Directive::Literal(b"5qb"),
            ]
        );
    }

    #[test]
    fn test_trailing_percent() {
        let got: Vec<_> = directives(b"50%").collect();
        assert_eq!(got, vec![Directive::Literal(b"50"), Directive::Literal(b"%")]);
    }

    #[test]
    fn test_nul_ends_format() {
        let got: Vec<_> = directives(b"ab\0%d").collect();
        assert_eq!(got, vec![Directive::Literal(b"ab")]);
        assert_eq!(directives(b"\0").count(), 0);
        assert_eq!(directives(b"").count(), 0);
    }

    #[test]
    fn test_step_function_is_restartable() {
        let fmt = b"x=%d;y=%u";
        let (_, after_first) = next_directive(fmt, 0).unwrap();
        let (second, next) = next_directive(fmt, after_first).unwrap();
        assert_eq!(second, conv(ConversionKind::SignedDecimal, None, false));
        // Re-stepping from the same cursor gives the same answer.
        assert_eq!(next_directive(fmt, after_first), Some((second, next)));
    }

    #[test]
    fn test_validate_counts() {
        let summary = validate(b"Dec: %d, %%, %05x").unwrap();
        assert_eq!(summary.conversions, 2);
        assert_eq!(summary.literal_bytes, 5 + 2 + 1 + 2);
    }

    #[test]
    fn test_validate_reports_offset() {
        assert_eq!(
            validate(b"ok %d then %y"),
            Err(FormatError::MalformedDirective { offset: 11 })
        );
        assert_eq!(
            validate(b"%"),
            Err(FormatError::MalformedDirective { offset: 0 })
        );
    }

    #[test]
    fn test_huge_width_saturates() {
        let (spec, _) = parse_conversion(b"999999999999999999999999d").unwrap();
        assert_eq!(spec.width, Some(usize::MAX));
    }
}
