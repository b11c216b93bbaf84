//! # mfmt-core
//!
//! Bounded formatted output and input for freestanding targets.
//!
//! This crate provides a constrained `printf`/`scanf` pair that works entirely
//! on caller-provided buffers. No allocation, no I/O, no global state. Both
//! engines walk the same `%[0][width]{d|u|x|X|c|s|p}` directive grammar, one
//! writing outward into a fixed byte buffer and one reading inward from a
//! fixed input string.
//!
//! ```
//! use mfmt_core::{Arg, Dest, print, scan};
//!
//! let mut buf = [0u8; 16];
//! let len = print(&mut buf, b"%05d|%s", &[Arg::Int(-42), Arg::Str(b"ok")]).unwrap();
//! assert_eq!(&buf[..len], b"-0042|ok");
//!
//! let mut n = 0i32;
//! let matched = scan(b"-0042", b"%d", &mut [Dest::Int(&mut n)]).unwrap();
//! assert_eq!((matched, n), (1, -42));
//! ```

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod stdio;

pub use config::FormatMode;
pub use error::FormatError;
pub use stdio::directive::{
    ConversionKind, ConversionSpec, Directive, Directives, FormatSummary, directives,
    next_directive, validate,
};
pub use stdio::printf::{Arg, formatted_len, print, print_with};
pub use stdio::scanf::{Dest, scan, scan_with};
