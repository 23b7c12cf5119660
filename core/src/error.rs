//! Error types.
//!
//! - [`MatcherError`] — construction time. Fix the pattern and rebuild.
//! - [`EvalError`] — evaluation time. The matcher could not decide, which is
//!   different from deciding "no match".
//! - [`TransformError`] — a transform could not convert its input. The
//!   transform pipeline turns it into an ordinary match failure.

use crate::Value;
use std::fmt;
use thiserror::Error;

/// Errors from matcher construction.
#[derive(Error, Debug)]
pub enum MatcherError {
    /// Two placeholders with no literal text between them (`}}{{`).
    #[error("invalid template \"{template}\": placeholders can't be concatenated without separators")]
    AdjacentPlaceholders {
        /// The offending template.
        template: String,
    },

    /// The regular expression derived from a template does not compile.
    #[error("invalid template: could not compile a regex from \"{pattern}\": {source}")]
    InvalidPattern {
        /// The derived regex source.
        pattern: String,
        /// The underlying regex error.
        #[source]
        source: regex::Error,
    },

    /// A template exceeds [`MAX_TEMPLATE_LENGTH`](crate::MAX_TEMPLATE_LENGTH).
    #[error("template length is {len}, but maximum allowed is {max}")]
    PatternTooLong {
        /// Actual length of the template.
        len: usize,
        /// Maximum allowed length.
        max: usize,
    },
}

/// Errors raised while evaluating a matcher.
///
/// These are never coerced into a plain `false`: combinators stop and
/// surface them immediately.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    /// Both the expected and the actual value are nil.
    #[error(
        "refusing to compare <nil> to <nil>: be explicit and use a nil matcher instead, \
         this is to avoid mistakes where both sides of an assertion are erroneously uninitialized"
    )]
    NilComparison,

    /// A sequence was required.
    #[error("dive expects a list, got <{type_name}>")]
    NotASequence {
        /// Type name of the actual value.
        type_name: &'static str,
    },

    /// A string (or string-like) value was required.
    #[error("expected a string-ish value, got <{type_name}>")]
    NotAString {
        /// Type name of the actual value.
        type_name: &'static str,
    },

    /// A value with a length was required.
    #[error("expected a string/bytes/list/map, got <{type_name}>")]
    NoLength {
        /// Type name of the actual value.
        type_name: &'static str,
    },

    /// A dive policy that selects an element got an empty list.
    #[error("dive[{policy}] expects non-empty list")]
    EmptySequence {
        /// Policy name, e.g. `first`.
        policy: String,
    },

    /// `Nth(n)` dive with `n` past the end of the list.
    #[error("dive[nth {index}] is out of range for a list of length {len}")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// List length.
        len: usize,
    },

    /// The same template placeholder captured two different substrings.
    #[error("var {name} has multiple values: {first} != {second}")]
    InconsistentCapture {
        /// Lower-cased placeholder name.
        name: String,
        /// First captured text.
        first: String,
        /// Conflicting captured text.
        second: String,
    },

    /// A template variable was supplied that no placeholder captures.
    #[error("var {name} given but not met in actual value")]
    UnknownVariable {
        /// Lower-cased variable name.
        name: String,
    },

    /// A template variable's matcher raised an error.
    #[error("var {name} failed: {source}")]
    Variable {
        /// Lower-cased variable name.
        name: String,
        /// The variable matcher's error.
        source: Box<EvalError>,
    },

    /// Error raised by a user-supplied predicate or matcher.
    #[error("{0}")]
    Custom(String),
}

impl EvalError {
    /// Build a [`EvalError::Custom`] from any displayable error.
    pub fn custom(message: impl fmt::Display) -> Self {
        Self::Custom(message.to_string())
    }
}

/// A transform's failure, tagged with the value it failed on.
///
/// The tag is the type itself: a transform that successfully produces a
/// value which happens to describe an error returns `Ok`, a transform that
/// could not convert returns `Err(TransformError)`.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformError {
    cause: String,
    actual: Value,
}

impl TransformError {
    /// Create a transform error from its cause and the pre-transform value.
    pub fn new(cause: impl fmt::Display, actual: Value) -> Self {
        Self {
            cause: cause.to_string(),
            actual,
        }
    }

    /// The failure cause, phrased to follow "to" (e.g. `be a valid integer`).
    #[must_use]
    pub fn cause(&self) -> &str {
        &self.cause
    }

    /// The value the transform was given.
    #[must_use]
    pub fn actual(&self) -> &Value {
        &self.actual
    }
}

impl fmt::Display for TransformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.cause)
    }
}

impl std::error::Error for TransformError {}
