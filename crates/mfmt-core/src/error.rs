//! Engine error type.
//!
//! Truncation and partial matches are not errors; they are reported through
//! the returned length or count. Errors cover caller contract violations
//! (slot count or slot type) and, in strict mode, malformed directives.

use thiserror::Error;

use crate::stdio::directive::ConversionKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FormatError {
    /// The format requests more conversions than slots were supplied.
    #[error("conversion #{index} has no matching slot")]
    MissingArgument { index: usize },
    /// The slot at `index` cannot satisfy the directive's conversion kind.
    #[error("slot #{index} does not fit a %{} conversion", .expected.as_char())]
    ArgumentMismatch {
        index: usize,
        expected: ConversionKind,
    },
    /// A `%` at byte `offset` does not introduce a valid conversion.
    #[error("malformed directive at byte offset {offset}")]
    MalformedDirective { offset: usize },
}
