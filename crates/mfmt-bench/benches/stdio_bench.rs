//! Print/scan engine benchmarks.
//!
//! Compares the bounded engines with the host `snprintf`/`sscanf` on the
//! same inputs.

use std::ffi::{c_char, c_int};

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use mfmt_bench::{MIXED_FORMAT, decimal_input, mixed_args};
use mfmt_core::{Arg, Dest, print, scan};

fn bench_print_int(c: &mut Criterion) {
    let mut group = c.benchmark_group("print_int");
    let mut buf = [0u8; 64];

    group.bench_function("mfmt", |b| {
        b.iter(|| {
            let len = print(&mut buf, b"%d", &[Arg::Int(black_box(-1_234_567))]);
            black_box(len)
        });
    });

    group.bench_function("host_snprintf", |b| {
        b.iter(|| {
            // SAFETY: 64-byte buffer, NUL-terminated format with one %d.
            let len = unsafe {
                libc::snprintf(
                    buf.as_mut_ptr().cast::<c_char>(),
                    buf.len(),
                    c"%d".as_ptr(),
                    black_box(-1_234_567 as c_int),
                )
            };
            black_box(len)
        });
    });
    group.finish();
}

fn bench_print_mixed(c: &mut Criterion) {
    let args = mixed_args();
    let mut buf = [0u8; 128];
    c.bench_function("print_mixed", |b| {
        b.iter(|| black_box(print(&mut buf, black_box(MIXED_FORMAT), &args)));
    });
}

fn bench_print_truncated(c: &mut Criterion) {
    let widths: &[usize] = &[16, 1024, 1 << 20];
    let mut group = c.benchmark_group("print_truncated_width");
    let mut buf = [0u8; 16];

    for &width in widths {
        let fmt = format!("%{width}d");
        group.bench_with_input(BenchmarkId::new("mfmt", width), &fmt, |b, fmt| {
            b.iter(|| black_box(print(&mut buf, fmt.as_bytes(), &[Arg::Int(7)])));
        });
    }
    group.finish();
}

fn bench_scan_decimals(c: &mut Criterion) {
    let counts: &[usize] = &[1, 8, 64];
    let mut group = c.benchmark_group("scan_decimals");

    for &n in counts {
        let input = decimal_input(n);
        let fmt = b"%d ".repeat(n);
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_with_input(BenchmarkId::new("mfmt", n), &n, |b, &n| {
            let mut cells = vec![0i32; n];
            b.iter(|| {
                let mut dests: Vec<Dest<'_>> = cells.iter_mut().map(Dest::Int).collect();
                black_box(scan(&input, &fmt, &mut dests))
            });
        });
    }
    group.finish();
}

fn bench_scan_mixed(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan_mixed");
    let input = b"4217 0xBEEF widget Z\0";

    group.bench_function("mfmt", |b| {
        b.iter(|| {
            let (mut i, mut x, mut ch) = (0i32, 0u32, 0u8);
            let mut s = [0u8; 16];
            let n = scan(
                black_box(input),
                b"%d %x %s %c",
                &mut [
                    Dest::Int(&mut i),
                    Dest::Uint(&mut x),
                    Dest::Str(&mut s),
                    Dest::Char(&mut ch),
                ],
            );
            black_box((n, i, x, s, ch))
        });
    });

    group.bench_function("host_sscanf", |b| {
        b.iter(|| {
            let (mut i, mut x, mut ch): (c_int, u32, c_char) = (0, 0, 0);
            let mut s = [0u8; 16];
            // SAFETY: NUL-terminated input and format; each destination matches
            // its conversion and the 16-byte buffer holds the 6-byte token.
            let n = unsafe {
                libc::sscanf(
                    black_box(input).as_ptr().cast::<c_char>(),
                    c"%d %x %15s %c".as_ptr(),
                    &mut i as *mut c_int,
                    &mut x as *mut u32,
                    s.as_mut_ptr().cast::<c_char>(),
                    &mut ch as *mut c_char,
                )
            };
            black_box((n, i, x, s, ch))
        });
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_print_int,
    bench_print_mixed,
    bench_print_truncated,
    bench_scan_decimals,
    bench_scan_mixed
);
criterion_main!(benches);
