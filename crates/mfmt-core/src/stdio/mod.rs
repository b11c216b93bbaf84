//! Formatted output and input.
//!
//! Implements the bounded `print`/`scan` pair over one shared directive
//! grammar.

pub mod convert;
pub mod directive;
pub mod printf;
pub mod scanf;

pub use printf::{formatted_len, print, print_with};
pub use scanf::{scan, scan_with};
