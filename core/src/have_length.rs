//! `HaveLength` — length of a string, byte sequence, list or map

use crate::{format, BoxMatcher, EvalError, Matcher, Value};

#[derive(Debug)]
enum Expected {
    Count(usize),
    Matching(BoxMatcher),
}

/// Matches on the length of the actual value.
///
/// The expected length is either an exact count or a matcher that receives
/// the length as a [`Value::Int`]. Strings are measured in bytes.
///
/// Values without a length are an evaluation error.
#[derive(Debug)]
pub struct HaveLength {
    expected: Expected,
    length: Option<usize>,
}

impl HaveLength {
    /// Require an exact length.
    #[must_use]
    pub fn count(n: usize) -> Self {
        Self {
            expected: Expected::Count(n),
            length: None,
        }
    }

    /// Hand the length to a matcher.
    #[must_use]
    pub fn matching(matcher: BoxMatcher) -> Self {
        Self {
            expected: Expected::Matching(matcher),
            length: None,
        }
    }

    fn length_message(actual: &Value, inner: &str) -> String {
        format::message(actual, &format!("length {inner}"))
    }
}

impl Matcher for HaveLength {
    fn evaluate(&mut self, actual: &Value) -> Result<bool, EvalError> {
        let length = actual.len().ok_or(EvalError::NoLength {
            type_name: actual.type_name(),
        })?;
        self.length = Some(length);
        match &mut self.expected {
            Expected::Count(n) => Ok(length == *n),
            Expected::Matching(m) => m.evaluate(&Value::from(length)),
        }
    }

    fn failure_message(&self, actual: &Value) -> String {
        match &self.expected {
            Expected::Count(n) => format::message(actual, &format!("to have length {n}")),
            Expected::Matching(m) => match self.length {
                Some(length) => Self::length_message(actual, &m.summary(&Value::from(length))),
                None => format::message(actual, "to have a length"),
            },
        }
    }

    fn negated_failure_message(&self, actual: &Value) -> String {
        match &self.expected {
            Expected::Count(n) => format::message(actual, &format!("not to have length {n}")),
            Expected::Matching(m) => match self.length {
                Some(length) => {
                    let negated = m.negated_failure_message(&Value::from(length));
                    Self::length_message(actual, &format::strip_expected(&negated))
                }
                None => format::message(actual, "not to have a length"),
            },
        }
    }
}
