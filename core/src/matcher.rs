//! `Matcher` — the canonical matcher protocol
//!
//! Every matcher in the engine, and every external matcher that wants to
//! interoperate with it, implements this one trait.

use crate::{format, EvalError, Value};
use std::fmt::Debug;

/// Decides whether a [`Value`] satisfies a condition, and explains why not.
///
/// # Evaluation and messages are two passes
///
/// `evaluate` may record state about the decision (which branch failed, what
/// a transform produced). The message methods read that state, so they must
/// only be called after `evaluate` was called with the same `actual`.
/// Called first, they return an empty or generic message.
///
/// `evaluate` takes `&mut self`: while one caller holds a matcher to
/// evaluate and render, nobody else can evaluate it. Build one matcher tree
/// per assertion, or serialize access to a shared one.
///
/// # Outcomes
///
/// - `Ok(true)` — matched
/// - `Ok(false)` — did not match; `failure_message` explains
/// - `Err(_)` — could not decide (wrong actual type, authoring error)
///
/// # Example
///
/// ```
/// use psi::{Matcher, Value, eq};
///
/// let mut m = eq("hello");
/// assert_eq!(m.evaluate(&Value::from("hello")), Ok(true));
/// assert_eq!(m.evaluate(&Value::from("world")), Ok(false));
/// assert!(m.failure_message(&Value::from("world")).contains("hello"));
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `Matcher`",
    label = "this type cannot be used as a matcher",
    note = "wrap foreign matchers with `from_described`, `from_message_matcher` or `from_fn`, or pass raw values through `eq`/`psi!`"
)]
pub trait Matcher: Send + Debug {
    /// Evaluate the matcher against `actual`.
    fn evaluate(&mut self, actual: &Value) -> Result<bool, EvalError>;

    /// Why `actual` did not match.
    fn failure_message(&self, actual: &Value) -> String;

    /// Why `actual` matched when it was expected not to.
    fn negated_failure_message(&self, actual: &Value) -> String;

    /// Short form of [`failure_message`](Self::failure_message) without the
    /// `Expected\n<actual>\n` lead-in, used when listing several matchers.
    fn summary(&self, actual: &Value) -> String {
        format::strip_expected(&self.failure_message(actual))
    }

    /// Evaluate and collapse errors into `false`.
    fn matches(&mut self, actual: &Value) -> bool {
        self.evaluate(actual).unwrap_or(false)
    }

    /// Box this matcher for storage in a combinator.
    fn boxed(self) -> BoxMatcher
    where
        Self: Sized + 'static,
    {
        Box::new(self)
    }
}

#[diagnostic::do_not_recommend]
impl Matcher for Box<dyn Matcher> {
    fn evaluate(&mut self, actual: &Value) -> Result<bool, EvalError> {
        (**self).evaluate(actual)
    }

    fn failure_message(&self, actual: &Value) -> String {
        (**self).failure_message(actual)
    }

    fn negated_failure_message(&self, actual: &Value) -> String {
        (**self).negated_failure_message(actual)
    }

    fn summary(&self, actual: &Value) -> String {
        (**self).summary(actual)
    }
}

/// A boxed matcher, the unit every combinator stores.
pub type BoxMatcher = Box<dyn Matcher>;
