#![no_main]
use libfuzzer_sys::fuzz_target;
use mfmt_core::{Directive, directives, validate};

fuzz_target!(|data: &[u8]| {
    let end = data.iter().position(|&b| b == 0).unwrap_or(data.len());
    let mut conversions = 0;
    let mut literal_bytes = 0;
    let mut iter = directives(data);
    let mut last = 0;
    while let Some(d) = iter.next() {
        // Every directive makes progress.
        assert!(iter.position() > last);
        last = iter.position();
        match d {
            Directive::Literal(text) => literal_bytes += text.len(),
            Directive::Percent => literal_bytes += 1,
            Directive::Conversion(_) => conversions += 1,
        }
    }
    assert!(last <= end);

    if let Ok(summary) = validate(data) {
        assert_eq!(summary.conversions, conversions);
        assert_eq!(summary.literal_bytes, literal_bytes);
    }
});
