//! Shared inputs for the mfmt benchmarks.

use mfmt_core::Arg;

/// Format used by the mixed-directive benchmarks.
pub const MIXED_FORMAT: &[u8] = b"id=%05d hex=%08x name=%10s ch=%c ptr=%p\n";

/// Arguments matching [`MIXED_FORMAT`].
#[must_use]
pub fn mixed_args() -> [Arg<'static>; 5] {
    [
        Arg::Int(-4217),
        Arg::Uint(0xBEEF),
        Arg::Str(b"widget"),
        Arg::Char(b'Z'),
        Arg::Ptr(0x7fff_0000_1000),
    ]
}

/// A format of `n` literal runs separated by `%d` conversions.
#[must_use]
pub fn repeated_format(n: usize) -> Vec<u8> {
    let mut fmt = Vec::with_capacity(n * 8);
    for _ in 0..n {
        fmt.extend_from_slice(b"key=%d; ");
    }
    fmt
}

/// Whitespace-separated decimal input of `n` numbers.
#[must_use]
pub fn decimal_input(n: usize) -> Vec<u8> {
    let mut input = Vec::with_capacity(n * 7);
    for i in 0..n {
        input.extend_from_slice(format!("{} ", i * 7919).as_bytes());
    }
    input
}
