//! Numeric conversion helpers shared by the print and scan engines.

/// Size of the scratch buffer used for rendering one integer. Large enough
/// for any `u64` in any supported base, plus a sign.
pub const DIGIT_BUF_LEN: usize = 24;

/// Length of `s` up to (not including) the first NUL byte.
#[must_use]
pub fn c_len(s: &[u8]) -> usize {
    s.iter().position(|&b| b == 0).unwrap_or(s.len())
}

/// `s` cut at its first NUL byte, if any.
#[must_use]
pub fn until_nul(s: &[u8]) -> &[u8] {
    &s[..c_len(s)]
}

/// Whitespace recognised by the scan engine (space, tab, newline).
#[must_use]
pub const fn is_scan_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n')
}

/// Decimal accumulation that saturates instead of overflowing.
#[must_use]
pub fn parse_decimal(digits: &[u8]) -> usize {
    let mut result = 0_usize;
    for &d in digits {
        result = result
            .saturating_mul(10)
            .saturating_add((d - b'0') as usize);
    }
    result
}

/// Value of `c` as a digit in `base` (10 or 16), case-insensitive.
#[must_use]
pub fn digit_value(c: u8, base: u64) -> Option<u64> {
    let v = match c {
        b'0'..=b'9' => c - b'0',
        b'a'..=b'f' => c - b'a' + 10,
        b'A'..=b'F' => c - b'A' + 10,
        _ => return None,
    };
    ((v as u64) < base).then_some(v as u64)
}

/// Render `value` in `base` into the END of `buf`.
/// Returns the number of digits written. Digits are placed right-aligned.
pub fn render_digits(mut value: u64, base: u64, uppercase: bool, buf: &mut [u8; DIGIT_BUF_LEN]) -> usize {
    if value == 0 {
        buf[DIGIT_BUF_LEN - 1] = b'0';
        return 1;
    }
    let alpha = if uppercase { b'A' } else { b'a' };
    let mut pos = DIGIT_BUF_LEN;
    while value > 0 && pos > 0 {
        pos -= 1;
        let digit = (value % base) as u8;
        buf[pos] = if digit < 10 {
            b'0' + digit
        } else {
            alpha + (digit - 10)
        };
        value /= base;
    }
    DIGIT_BUF_LEN - pos
}
