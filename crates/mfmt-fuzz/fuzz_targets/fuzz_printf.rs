#![no_main]
use libfuzzer_sys::fuzz_target;
use mfmt_core::{Arg, FormatMode, formatted_len, print, print_with};

fuzz_target!(|data: &[u8]| {
    // Layout: [capacity, fmt...]. Arguments are fixed so every conversion kind
    // has a slot of its own type somewhere in rotation.
    let Some((&cap, fmt)) = data.split_first() else {
        return;
    };
    let args = [
        Arg::Int(-12345),
        Arg::Uint(0xBEEF),
        Arg::Char(b'q'),
        Arg::Str(b"fuzz"),
        Arg::Ptr(0x1000),
    ];

    let capacity = usize::from(cap);
    let mut backing = vec![0xA5u8; capacity + 16];
    let result = print(&mut backing[..capacity], fmt, &args);

    // Never write past capacity.
    assert!(backing[capacity..].iter().all(|&b| b == 0xA5));

    match result {
        Ok(len) if capacity > 0 => {
            assert_eq!(Ok(len), formatted_len(fmt, &args));
            let written = len.min(capacity - 1);
            assert_eq!(backing[written], 0);
            assert!(!backing[..written].contains(&0));
        }
        Ok(len) => assert_eq!(len, 0),
        Err(_) => {
            if capacity > 0 {
                assert!(backing[..capacity].contains(&0));
            }
        }
    }

    // Strict mode either agrees with tolerant mode or rejects the format.
    let mut strict_buf = vec![0u8; capacity];
    if let Ok(len) = print_with(FormatMode::Strict, &mut strict_buf, fmt, &args) {
        assert_eq!(Ok(len), result);
        if capacity > 0 {
            let shown = len.min(capacity - 1) + 1;
            assert_eq!(strict_buf[..shown], backing[..shown]);
        }
    }
});
