//! Fallible transform pipeline
//!
//! A [`Transform`] converts the actual value before matching. A
//! [`WithTransform`] matcher runs it and only on success hands the converted
//! value to its downstream matcher.
//!
//! # Transform failure is a match failure
//!
//! When the conversion fails the matcher returns `Ok(false)`, never an
//! evaluation error, and its failure message is rendered from the
//! [`TransformError`]'s cause against the *pre-transform* value:
//!
//! ```text
//! Expected
//!     <string>: abc
//! to be a valid integer: invalid digit found in string
//! ```

use crate::{format, BoxMatcher, EvalError, Matcher, TransformError, Value};
use std::fmt;
use std::sync::Arc;

type TransformFn = dyn Fn(&Value) -> Result<Value, TransformError> + Send + Sync;

/// A named conversion from one [`Value`] to another.
///
/// Three constructor shapes:
///
/// - [`Transform::new`] — returns `Result<Value, TransformError>` directly
/// - [`Transform::map`] — cannot fail
/// - [`Transform::try_map`] — returns any displayable error, which is tagged
///   with the original value
///
/// Cloning is cheap (shared function).
#[derive(Clone)]
pub struct Transform {
    name: String,
    func: Arc<TransformFn>,
}

impl Transform {
    /// A transform that reports failures as tagged [`TransformError`]s.
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, TransformError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    /// A transform that always succeeds.
    pub fn map<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        Self::new(name, move |actual| Ok(func(actual)))
    }

    /// A transform returning a value or an error.
    ///
    /// The error becomes a [`TransformError`] carrying the original value.
    pub fn try_map<F, E>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, E> + Send + Sync + 'static,
        E: fmt::Display,
    {
        let name = name.into();
        let label = name.clone();
        Self::new(name, move |actual| {
            func(actual).map_err(|e| {
                TransformError::new(format!("be convertible by {label}: {e}"), actual.clone())
            })
        })
    }

    /// The transform's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the transform.
    ///
    /// # Errors
    ///
    /// Returns the transform's [`TransformError`] when it cannot convert.
    pub fn apply(&self, actual: &Value) -> Result<Value, TransformError> {
        (self.func)(actual)
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Transform").field(&self.name).finish()
    }
}

/// What the last evaluation saw.
#[derive(Debug, Clone, Default)]
enum Last {
    #[default]
    Pending,
    Failed(TransformError),
    Transformed(Value),
}

/// Runs a [`Transform`], then an optional downstream matcher on its output.
///
/// - transform fails → `Ok(false)`, downstream is not evaluated
/// - transform succeeds, no downstream → `Ok(true)` (the transform itself
///   is the assertion, e.g. "parses as JSON")
/// - transform succeeds → downstream result, errors included
///
/// Messages render against the transformed value when the transform
/// succeeded, and against the original value when it failed.
#[derive(Debug)]
pub struct WithTransform {
    transform: Transform,
    matcher: Option<BoxMatcher>,
    last: Last,
}

impl WithTransform {
    /// Gate `matcher` behind `transform`.
    #[must_use]
    pub fn new(transform: Transform, matcher: Option<BoxMatcher>) -> Self {
        Self {
            transform,
            matcher,
            last: Last::Pending,
        }
    }

    /// The value produced by the last successful transform.
    #[must_use]
    pub fn transformed(&self) -> Option<&Value> {
        match &self.last {
            Last::Transformed(v) => Some(v),
            _ => None,
        }
    }
}

impl Matcher for WithTransform {
    fn evaluate(&mut self, actual: &Value) -> Result<bool, EvalError> {
        match self.transform.apply(actual) {
            Err(err) => {
                tracing::trace!(transform = %self.transform.name, cause = %err, "transform failed");
                self.last = Last::Failed(err);
                Ok(false)
            }
            Ok(value) => {
                let outcome = match self.matcher.as_mut() {
                    Some(matcher) => matcher.evaluate(&value),
                    None => Ok(true),
                };
                self.last = Last::Transformed(value);
                outcome
            }
        }
    }

    fn failure_message(&self, actual: &Value) -> String {
        match (&self.last, &self.matcher) {
            (Last::Failed(err), _) => format::message(err.actual(), &format!("to {}", err.cause())),
            (Last::Transformed(value), Some(matcher)) => matcher.failure_message(value),
            (Last::Transformed(value), None) => format::message(
                value,
                &format!("to be rejected by {}", self.transform.name),
            ),
            (Last::Pending, _) => format::message(
                actual,
                &format!("to be evaluated through {}", self.transform.name),
            ),
        }
    }

    fn negated_failure_message(&self, actual: &Value) -> String {
        match (&self.last, &self.matcher) {
            (Last::Failed(err), _) => {
                format::message(err.actual(), &format!("not to {}", err.cause()))
            }
            (Last::Transformed(value), Some(matcher)) => matcher.negated_failure_message(value),
            (Last::Transformed(_), None) => format::message(
                actual,
                &format!("not to be accepted by {}", self.transform.name),
            ),
            (Last::Pending, _) => format::message(
                actual,
                &format!("not to be evaluated through {}", self.transform.name),
            ),
        }
    }
}
