//! Engine mode configuration.
//!
//! The mode decides what happens to a `%` that does not introduce a valid
//! conversion:
//! - `tolerant` (default): the `%` is treated as ordinary literal text and
//!   parsing resumes at the next byte. Both engines stay total functions.
//! - `strict`: the whole format string is validated before any buffer or
//!   destination is touched, and the first malformed directive is reported as
//!   [`FormatError::MalformedDirective`](crate::FormatError::MalformedDirective).

/// Malformed-directive policy shared by the print and scan engines.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatMode {
    /// Malformed directives degrade to literal text.
    #[default]
    Tolerant,
    /// Malformed directives are rejected up front.
    Strict,
}

impl FormatMode {
    /// Parse from string (case-insensitive). Unknown names fall back to
    /// [`FormatMode::Tolerant`].
    #[must_use]
    pub fn from_str_loose(s: &str) -> Self {
        if s.eq_ignore_ascii_case("strict") || s.eq_ignore_ascii_case("reject") {
            Self::Strict
        } else {
            Self::Tolerant
        }
    }

    /// Stable lowercase name, as used in fixtures and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tolerant => "tolerant",
            Self::Strict => "strict",
        }
    }

    /// Returns true if malformed directives must be rejected.
    #[must_use]
    pub const fn rejects_malformed(self) -> bool {
        matches!(self, Self::Strict)
    }
}
