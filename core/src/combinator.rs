//! Combinators — boolean composition of matchers
//!
//! - [`All`] — conjunction, short-circuits on the first failure
//! - [`Any`] — disjunction, short-circuits on the first success
//! - [`Not`] — negation, swaps the inner matcher's messages
//! - [`Always`] / [`Never`] — constants
//!
//! `All` and `Any` remember their *decisive* child (first failed / first
//! succeeded) so the message pass can delegate to it.

use crate::{format, BoxMatcher, EvalError, Matcher, Value};
use std::fmt;

/// Conjunction: matches when every child matches.
///
/// Evaluation stops at the first child that fails or errors; that child
/// becomes decisive and renders the failure message. An evaluation error is
/// returned as-is, siblings are not tried.
///
/// No children → matches everything (identity element).
///
/// # Example
///
/// ```
/// use psi::{all, eq, not, Matcher, Value};
///
/// let mut m = all([not(eq("")).boxed(), not(eq("admin")).boxed()]);
/// assert_eq!(m.evaluate(&Value::from("alice")), Ok(true));
/// assert_eq!(m.evaluate(&Value::from("admin")), Ok(false));
/// ```
#[derive(Debug, Default)]
pub struct All {
    matchers: Vec<BoxMatcher>,
    decisive: Option<usize>,
}

impl All {
    /// Create a conjunction of the given matchers.
    #[must_use]
    pub fn new(matchers: Vec<BoxMatcher>) -> Self {
        Self {
            matchers,
            decisive: None,
        }
    }

    /// Compose matchers with AND semantics, optimizing for common cases.
    ///
    /// - Empty → [`Always`]
    /// - Single → unwrapped (no wrapping overhead)
    /// - Multiple → `All(matchers)`
    #[must_use]
    pub fn from_vec(mut matchers: Vec<BoxMatcher>) -> BoxMatcher {
        match matchers.len() {
            0 => Box::new(Always),
            1 => matchers.swap_remove(0),
            _ => Box::new(Self::new(matchers)),
        }
    }

    /// The child matchers.
    #[must_use]
    pub fn matchers(&self) -> &[BoxMatcher] {
        &self.matchers
    }

    /// Index of the child that failed during the last evaluation.
    #[must_use]
    pub fn decisive(&self) -> Option<usize> {
        self.decisive
    }
}

impl Matcher for All {
    fn evaluate(&mut self, actual: &Value) -> Result<bool, EvalError> {
        self.decisive = None;
        for (i, matcher) in self.matchers.iter_mut().enumerate() {
            match matcher.evaluate(actual) {
                Ok(true) => {}
                outcome => {
                    tracing::trace!(index = i, "all: decisive child failed");
                    self.decisive = Some(i);
                    return outcome.map(|_| false);
                }
            }
        }
        Ok(true)
    }

    fn failure_message(&self, actual: &Value) -> String {
        match self.decisive.and_then(|i| self.matchers.get(i)) {
            Some(matcher) => matcher.failure_message(actual),
            None => format::message(actual, "to satisfy all matchers"),
        }
    }

    fn negated_failure_message(&self, actual: &Value) -> String {
        format::message(
            actual,
            &format!(
                "not to satisfy all of these matchers:{}",
                listing(&self.matchers, actual)
            ),
        )
    }
}

/// Disjunction: matches when at least one child matches.
///
/// Evaluation stops at the first child that succeeds (decisive) or errors.
/// When every child fails there is no decisive child, so the failure message
/// lists all of them.
///
/// No children → never matches: no branch can succeed.
#[derive(Debug, Default)]
pub struct Any {
    matchers: Vec<BoxMatcher>,
    decisive: Option<usize>,
}

impl Any {
    /// Create a disjunction of the given matchers.
    #[must_use]
    pub fn new(matchers: Vec<BoxMatcher>) -> Self {
        Self {
            matchers,
            decisive: None,
        }
    }

    /// The child matchers.
    #[must_use]
    pub fn matchers(&self) -> &[BoxMatcher] {
        &self.matchers
    }

    /// Index of the child that succeeded during the last evaluation.
    #[must_use]
    pub fn decisive(&self) -> Option<usize> {
        self.decisive
    }
}

impl Matcher for Any {
    fn evaluate(&mut self, actual: &Value) -> Result<bool, EvalError> {
        self.decisive = None;
        for (i, matcher) in self.matchers.iter_mut().enumerate() {
            if matcher.evaluate(actual)? {
                tracing::trace!(index = i, "any: decisive child matched");
                self.decisive = Some(i);
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn failure_message(&self, actual: &Value) -> String {
        if self.matchers.is_empty() {
            return format::message(actual, "to satisfy at least one matcher, but none were given");
        }
        format::message(
            actual,
            &format!(
                "to satisfy at least one of these matchers:{}",
                listing(&self.matchers, actual)
            ),
        )
    }

    fn negated_failure_message(&self, actual: &Value) -> String {
        match self.decisive.and_then(|i| self.matchers.get(i)) {
            Some(matcher) => matcher.negated_failure_message(actual),
            None => format::message(actual, "not to satisfy any matcher"),
        }
    }
}

fn listing(matchers: &[BoxMatcher], actual: &Value) -> String {
    matchers
        .iter()
        .map(|m| format!("\n- {}", m.summary(actual).replace('\n', " ")))
        .collect()
}

/// Negation: matches when the inner matcher does not.
///
/// Messages come from the inner matcher with polarity swapped: the inner
/// negated message is this matcher's failure message and vice versa.
/// Inner evaluation errors propagate unchanged.
#[derive(Debug)]
pub struct Not {
    inner: BoxMatcher,
}

impl Not {
    /// Negate `inner`.
    pub fn new(inner: impl Matcher + 'static) -> Self {
        Self {
            inner: Box::new(inner),
        }
    }

    /// Negate an already boxed matcher.
    #[must_use]
    pub fn boxed(inner: BoxMatcher) -> Self {
        Self { inner }
    }
}

impl Matcher for Not {
    fn evaluate(&mut self, actual: &Value) -> Result<bool, EvalError> {
        Ok(!self.inner.evaluate(actual)?)
    }

    fn failure_message(&self, actual: &Value) -> String {
        self.inner.negated_failure_message(actual)
    }

    fn negated_failure_message(&self, actual: &Value) -> String {
        self.inner.failure_message(actual)
    }
}

/// Matches everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct Always;

impl Matcher for Always {
    fn evaluate(&mut self, _actual: &Value) -> Result<bool, EvalError> {
        Ok(true)
    }

    fn failure_message(&self, _actual: &Value) -> String {
        String::new()
    }

    fn negated_failure_message(&self, actual: &Value) -> String {
        format::message(actual, "not to match, but it always matches")
    }
}

/// Never matches; its cause is the message in both polarities.
///
/// Meant as an authoring-time sentinel (e.g. "not implemented yet").
#[derive(Clone)]
pub struct Never {
    cause: String,
}

impl Never {
    /// Create a matcher that always fails with `cause`.
    pub fn new(cause: impl fmt::Display) -> Self {
        Self {
            cause: cause.to_string(),
        }
    }
}

impl fmt::Debug for Never {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Never").field(&self.cause).finish()
    }
}

impl Matcher for Never {
    fn evaluate(&mut self, _actual: &Value) -> Result<bool, EvalError> {
        Ok(false)
    }

    fn failure_message(&self, _actual: &Value) -> String {
        self.cause.clone()
    }

    fn negated_failure_message(&self, _actual: &Value) -> String {
        self.cause.clone()
    }

    fn summary(&self, _actual: &Value) -> String {
        self.cause.clone()
    }
}
