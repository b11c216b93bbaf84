#![no_main]
use libfuzzer_sys::fuzz_target;
use mfmt_core::{Dest, scan, validate};

fuzz_target!(|data: &[u8]| {
    // Layout: fmt, NUL, input.
    let split = data.iter().position(|&b| b == 0).unwrap_or(data.len());
    let (fmt, input) = (&data[..split], data.get(split + 1..).unwrap_or(&[]));

    let mut i = 0i32;
    let mut s = [0xA5u8; 8];
    let mut chars = [0u8; 4];
    let mut p = 0usize;
    let mut dests = [
        Dest::Int(&mut i),
        Dest::Str(&mut s),
        Dest::Chars(&mut chars),
        Dest::Ptr(&mut p),
    ];
    let slots = dests.len();

    if let Ok(matched) = scan(input, fmt, &mut dests) {
        assert!(matched <= slots);
        if let Ok(summary) = validate(fmt) {
            assert!(matched <= summary.conversions);
        }
    }
    // String destinations stay NUL-terminated within capacity.
    assert!(s.contains(&0) || s.iter().all(|&b| b == 0xA5));
});
