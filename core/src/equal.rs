//! `Equal` — deep structural equality against a literal
//!
//! Raw values handed to the engine become `Equal` matchers.

use crate::{format, EvalError, Matcher, Value};

/// Matches when `actual` is structurally equal to the expected value.
///
/// Equality is strict about types (`Int(1)` is not `Float(1.0)`). Byte
/// sequences are compared with a slice comparison without walking the
/// value tree.
///
/// Comparing nil to nil is an evaluation error, not a match: both sides
/// being absent is almost always an uninitialized assertion.
///
/// # Example
///
/// ```
/// use psi::{eq, EvalError, Matcher, Value};
///
/// let mut m = eq("hello");
/// assert_eq!(m.evaluate(&"hello".into()), Ok(true));
/// assert_eq!(m.evaluate(&"world".into()), Ok(false));
///
/// let mut nil = eq(Value::None);
/// assert_eq!(nil.evaluate(&Value::None), Err(EvalError::NilComparison));
/// ```
#[derive(Debug, Clone)]
pub struct Equal {
    expected: Value,
}

impl Equal {
    /// Create an equality matcher.
    pub fn new(expected: impl Into<Value>) -> Self {
        Self {
            expected: expected.into(),
        }
    }

    /// Returns the expected value.
    #[must_use]
    pub fn expected(&self) -> &Value {
        &self.expected
    }
}

impl Matcher for Equal {
    fn evaluate(&mut self, actual: &Value) -> Result<bool, EvalError> {
        if actual.is_none() && self.expected.is_none() {
            return Err(EvalError::NilComparison);
        }
        if let (Some(a), Some(e)) = (actual.as_bytes(), self.expected.as_bytes()) {
            return Ok(a == e);
        }
        Ok(*actual == self.expected)
    }

    fn failure_message(&self, actual: &Value) -> String {
        match (actual.as_str(), self.expected.as_str()) {
            (Some(a), Some(e)) => format::message_with_diff(a, "to equal", e),
            _ => format::message_with_expected(actual, "to equal", &self.expected),
        }
    }

    fn negated_failure_message(&self, actual: &Value) -> String {
        format::message_with_expected(actual, "not to equal", &self.expected)
    }
}
