//! psi - composable matchers with transforms, dives and templates
//!
//! A small engine that lets matchers of different shapes be composed,
//! chained and extended with data transforms behind one protocol.
//!
//! # Architecture
//!
//! - [`Value`] — Erased actual value (primitives, lists, maps + extensible Custom variant)
//! - [`Matcher`] — The one canonical protocol: evaluate, then render messages
//! - [`MatcherLike`] — Closed union of foreign matcher shapes, normalized by adapters
//! - [`All`] / [`Any`] / [`Not`] — Boolean composition with decisive-branch messages
//! - [`WithTransform`] — Convert the actual value first, then delegate
//! - [`Dive`] — Apply a matcher to list elements under a [`DivePolicy`]
//! - [`Template`] — Extract `{{Placeholder}}` values and match each one
//! - [`compose`] / [`psi!`] — Fold literals, matchers and transforms into one matcher
//!
//! # Key Design Insights
//!
//! 1. **Two-pass protocol**: `evaluate` records which branch decided, the
//!    message methods read it. `evaluate` takes `&mut self`, so a matcher
//!    cannot be re-evaluated while someone else is rendering its messages.
//!
//! 2. **Failure is not error**: `Ok(false)` is a normal non-match with a
//!    message, `Err(EvalError)` means the matcher could not decide. Combinators
//!    never turn one into the other. The single exception is a transform
//!    failure, which becomes a non-match that still shows the original value.
//!
//! 3. **A transform consumes the remainder**: in [`compose`], every argument
//!    after a transform is matched against the transformed value.
//!
//! # Example
//!
//! ```
//! use psi::prelude::*;
//!
//! let mut m = psi![
//!     cast::parse_int(StringFormat::default()),
//!     not(eq(0)),
//! ];
//!
//! assert_eq!(m.evaluate(&Value::from("42")), Ok(true));
//! assert_eq!(m.evaluate(&Value::from("0")), Ok(false));
//!
//! let actual = Value::from("forty-two");
//! assert_eq!(m.evaluate(&actual), Ok(false));
//! assert!(m.failure_message(&actual).contains("be a valid integer"));
//! ```

// ═══════════════════════════════════════════════════════════════════════════════
// Modules
// ═══════════════════════════════════════════════════════════════════════════════

mod adapter;
mod combinator;
mod compose;
mod dive;
mod equal;
mod error;
mod have_length;
mod matcher;
mod template;
mod transform;
mod value;

pub mod cast;
pub mod format;

// ═══════════════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════════════

// Core types
pub use matcher::{BoxMatcher, Matcher};
pub use value::{CustomValue, Value};

// Errors
pub use error::{EvalError, MatcherError, TransformError};

// Adapters
pub use adapter::{
    from_described, from_fn, from_message_matcher, normalize, with_message, DescribedMatcher,
    FnMatcher, FromDescribed, FromMessageMatcher, MatcherLike, MessageMatcher, WithMessage,
};

// Concrete matchers
pub use combinator::{All, Always, Any, Never, Not};
pub use dive::{Dive, DivePolicy};
pub use equal::Equal;
pub use have_length::HaveLength;
pub use template::{var, Template, TemplateOptions, Var, ANYTHING, ANYTHING_OPTIONAL};
pub use transform::{Transform, WithTransform};

// Composition
pub use cast::StringFormat;
pub use compose::{compose, compose_one, message, predicate_with_message, Arg, Message};

// ═══════════════════════════════════════════════════════════════════════════════
// Builders
// ═══════════════════════════════════════════════════════════════════════════════

/// Structural equality with `expected`.
pub fn eq(expected: impl Into<Value>) -> Equal {
    Equal::new(expected)
}

/// Conjunction of anything composable: literals, matchers and transforms.
pub fn all<A: Into<Arg>>(matching: impl IntoIterator<Item = A>) -> All {
    All::new(matching.into_iter().map(compose_one).collect())
}

/// Disjunction of anything composable. Never matches when empty.
pub fn any<A: Into<Arg>>(matching: impl IntoIterator<Item = A>) -> Any {
    Any::new(matching.into_iter().map(compose_one).collect())
}

/// Negation of anything composable.
pub fn not(matching: impl Into<Arg>) -> Not {
    Not::boxed(compose_one(matching))
}

/// Matches everything.
#[must_use]
pub fn always() -> Always {
    Always
}

/// Never matches, reporting `cause` as its message.
pub fn never(cause: impl std::fmt::Display) -> Never {
    Never::new(cause)
}

/// Every element of a list must match.
pub fn dive(matching: impl Into<Arg>) -> Dive {
    Dive::new(compose_one(matching), DivePolicy::Every)
}

/// At least one element of a list must match. An empty list matches.
pub fn dive_any(matching: impl Into<Arg>) -> Dive {
    Dive::new(compose_one(matching), DivePolicy::Any)
}

/// The first element of a non-empty list must match.
pub fn dive_first(matching: impl Into<Arg>) -> Dive {
    Dive::new(compose_one(matching), DivePolicy::First)
}

/// The element at `index` must match.
pub fn dive_nth(index: usize, matching: impl Into<Arg>) -> Dive {
    Dive::new(compose_one(matching), DivePolicy::Nth(index))
}

/// Exact length of a string, byte sequence, list or map.
#[must_use]
pub fn have_length(n: usize) -> HaveLength {
    HaveLength::count(n)
}

/// Length handed to anything composable.
pub fn have_length_matching(matching: impl Into<Arg>) -> HaveLength {
    HaveLength::matching(compose_one(matching))
}

/// Compile a template matcher with default options.
///
/// # Errors
///
/// See [`Template::new`].
pub fn template(pattern: &str, vars: Vec<Var>) -> Result<Template, MatcherError> {
    Template::new(pattern, vars)
}

// ═══════════════════════════════════════════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════════════════════════════════════════

/// Prelude module for convenient imports.
///
/// ```
/// use psi::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        // Builders
        all,
        always,
        any,
        // Casting transforms
        cast,
        compose,
        dive,
        dive_any,
        dive_first,
        dive_nth,
        eq,
        from_fn,
        have_length,
        have_length_matching,
        message,
        never,
        not,
        psi,
        template,
        var,
        // Core types
        Arg,
        BoxMatcher,
        EvalError,
        Matcher,
        MatcherError,
        MatcherLike,
        StringFormat,
        Transform,
        TransformError,
        Value,
    };
}

// ═══════════════════════════════════════════════════════════════════════════════
// Constants
// ═══════════════════════════════════════════════════════════════════════════════

/// Maximum length for template patterns.
///
/// Templates compile to regexes; the limit bounds compilation cost for
/// templates built from untrusted input.
pub const MAX_TEMPLATE_LENGTH: usize = 4096;
