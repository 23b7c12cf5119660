//! Dive — apply a matcher to the elements of a list
//!
//! | Policy | Empty list | Non-empty |
//! |--------|-----------|-----------|
//! | [`Every`](DivePolicy::Every) | fails | every element must match |
//! | [`Any`](DivePolicy::Any) | **matches** | one element must match |
//! | [`First`](DivePolicy::First) | error | element 0 must match |
//! | [`Nth(n)`](DivePolicy::Nth) | error | element `n` must match, error past the end |
//!
//! `Every` and `Any` disagree on the empty list.
//!
//! Byte sequences are dived as lists of integers. Any other non-list value
//! is an evaluation error, not a failed match.

use crate::{format, BoxMatcher, EvalError, Matcher, Value};
use std::borrow::Cow;
use std::fmt;

/// Which elements a [`Dive`] checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DivePolicy {
    /// Every element.
    Every,
    /// At least one element.
    Any,
    /// The first element.
    First,
    /// The element at the given index.
    Nth(usize),
}

impl fmt::Display for DivePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Every => f.write_str("every"),
            Self::Any => f.write_str("any"),
            Self::First => f.write_str("first"),
            Self::Nth(n) => write!(f, "nth {n}"),
        }
    }
}

/// Applies a matcher to list elements according to a [`DivePolicy`].
///
/// The element that decided the outcome is kept for the message pass.
///
/// # Example
///
/// ```
/// use psi::{dive, dive_any, eq, Matcher, Value};
///
/// let list = Value::from(vec![Value::Int(1), Value::Int(2)]);
/// assert_eq!(dive(eq(1)).evaluate(&list), Ok(false));
/// assert_eq!(dive_any(eq(2)).evaluate(&list), Ok(true));
/// assert_eq!(dive(eq(1)).evaluate(&Value::from(Vec::<Value>::new())), Ok(false));
/// ```
#[derive(Debug)]
pub struct Dive {
    matcher: BoxMatcher,
    policy: DivePolicy,
    last: Option<Value>,
}

impl Dive {
    /// Dive `matcher` into a list with the given policy.
    #[must_use]
    pub fn new(matcher: BoxMatcher, policy: DivePolicy) -> Self {
        Self {
            matcher,
            policy,
            last: None,
        }
    }

    /// The dive policy.
    #[must_use]
    pub fn policy(&self) -> DivePolicy {
        self.policy
    }

    fn elements(actual: &Value) -> Result<Cow<'_, [Value]>, EvalError> {
        match actual {
            Value::List(items) => Ok(Cow::Borrowed(items.as_slice())),
            Value::Bytes(bytes) => Ok(Cow::Owned(
                bytes.iter().map(|b| Value::Int(i64::from(*b))).collect(),
            )),
            other => Err(EvalError::NotASequence {
                type_name: other.type_name(),
            }),
        }
    }

    fn evaluate_at(&mut self, items: &[Value], index: usize) -> Result<bool, EvalError> {
        let element = items[index].clone();
        let outcome = self.matcher.evaluate(&element);
        self.last = Some(element);
        outcome
    }

    fn select(&mut self, items: &[Value]) -> Result<bool, EvalError> {
        match self.policy {
            DivePolicy::Every => {
                if items.is_empty() {
                    return Ok(false);
                }
                for i in 0..items.len() {
                    if !self.evaluate_at(items, i)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            DivePolicy::Any => {
                if items.is_empty() {
                    return Ok(true);
                }
                for i in 0..items.len() {
                    if self.evaluate_at(items, i)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            DivePolicy::First => {
                if items.is_empty() {
                    return Err(EvalError::EmptySequence {
                        policy: self.policy.to_string(),
                    });
                }
                self.evaluate_at(items, 0)
            }
            DivePolicy::Nth(index) => {
                if items.is_empty() {
                    return Err(EvalError::EmptySequence {
                        policy: self.policy.to_string(),
                    });
                }
                if index >= items.len() {
                    return Err(EvalError::IndexOutOfRange {
                        index,
                        len: items.len(),
                    });
                }
                self.evaluate_at(items, index)
            }
        }
    }

    fn describe(&self) -> String {
        match &self.last {
            Some(element) => {
                let inner = self.matcher.summary(element).replace('\n', " ");
                let inner = inner.strip_prefix("to ").unwrap_or(&inner);
                format!("to {inner} on {} of given list", self.policy)
            }
            None => format!("to have elements to dive into ({})", self.policy),
        }
    }
}

impl Matcher for Dive {
    fn evaluate(&mut self, actual: &Value) -> Result<bool, EvalError> {
        self.last = None;
        let items = Self::elements(actual)?;
        let outcome = self.select(&items);
        if let Err(err) = &outcome {
            tracing::debug!(policy = %self.policy, error = %err, "dive could not decide");
        }
        outcome
    }

    fn failure_message(&self, actual: &Value) -> String {
        format::message(actual, &self.describe())
    }

    fn negated_failure_message(&self, actual: &Value) -> String {
        format::message(actual, &format!("not {}", self.describe()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{eq, from_fn, FnMatcher};

    fn ints(values: &[i64]) -> Value {
        values.iter().map(|i| Value::Int(*i)).collect()
    }

    fn dive_with(policy: DivePolicy, m: impl Matcher + 'static) -> Dive {
        Dive::new(Box::new(m), policy)
    }

    fn positive() -> FnMatcher {
        from_fn(|v| Ok(v.as_int().is_some_and(|i| i > 0))).with_message("to be positive")
    }

    #[test]
    fn test_every_requires_all_elements() {
        let mut m = dive_with(DivePolicy::Every, positive());
        assert_eq!(m.evaluate(&ints(&[1, 2, 3])), Ok(true));
        assert_eq!(m.evaluate(&ints(&[1, -2, 3])), Ok(false));
        assert_eq!(m.last, Some(Value::Int(-2)));
    }

    #[test]
    fn test_every_on_empty_fails() {
        let mut m = dive_with(DivePolicy::Every, positive());
        assert_eq!(m.evaluate(&ints(&[])), Ok(false));
    }

    #[test]
    fn test_any_on_empty_matches() {
        let mut m = dive_with(DivePolicy::Any, positive());
        assert_eq!(m.evaluate(&ints(&[])), Ok(true));
        assert_eq!(m.evaluate(&ints(&[-1, 5])), Ok(true));
        assert_eq!(m.evaluate(&ints(&[-1, -5])), Ok(false));
    }

    #[test]
    fn test_first_on_empty_is_an_error() {
        let mut m = dive_with(DivePolicy::First, positive());
        assert_eq!(
            m.evaluate(&ints(&[])),
            Err(EvalError::EmptySequence {
                policy: "first".into()
            })
        );
        assert_eq!(m.evaluate(&ints(&[1, -1])), Ok(true));
        assert_eq!(m.evaluate(&ints(&[-1, 1])), Ok(false));
    }

    #[test]
    fn test_nth_out_of_range_is_an_error() {
        let mut m = dive_with(DivePolicy::Nth(5), positive());
        assert_eq!(
            m.evaluate(&ints(&[1, 2, 3])),
            Err(EvalError::IndexOutOfRange { index: 5, len: 3 })
        );
        assert!(m.evaluate(&ints(&[])).is_err());

        let mut m = dive_with(DivePolicy::Nth(1), eq(20));
        assert_eq!(m.evaluate(&ints(&[10, 20, 30])), Ok(true));
    }

    #[test]
    fn test_non_sequence_is_an_error() {
        let mut m = dive_with(DivePolicy::Every, positive());
        assert_eq!(
            m.evaluate(&Value::from("abc")),
            Err(EvalError::NotASequence { type_name: "string" })
        );
    }

    #[test]
    fn test_bytes_dive_as_integers() {
        let mut m = dive_with(DivePolicy::Every, positive());
        assert_eq!(m.evaluate(&Value::Bytes(vec![1, 2, 3])), Ok(true));
        assert_eq!(m.evaluate(&Value::Bytes(vec![1, 0])), Ok(false));
    }

    #[test]
    fn test_inner_errors_propagate() {
        let mut m = dive_with(DivePolicy::Every, from_fn(|_| Err(EvalError::custom("boom"))));
        assert_eq!(m.evaluate(&ints(&[1])), Err(EvalError::custom("boom")));
    }

    #[test]
    fn test_failure_message_names_policy() {
        let mut m = dive_with(DivePolicy::Every, positive());
        let actual = ints(&[1, -2]);
        assert_eq!(m.evaluate(&actual), Ok(false));
        let msg = m.failure_message(&actual);
        assert!(msg.starts_with("Expected\n    <list>: [1, -2]\n"));
        assert!(msg.ends_with("to be positive on every of given list"));
        assert!(m
            .negated_failure_message(&actual)
            .ends_with("not to be positive on every of given list"));
    }
}
