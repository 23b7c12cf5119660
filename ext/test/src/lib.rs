//! psi-test: Test domain for conformance testing
//!
//! Provides a record context and a field-extraction matcher built the way
//! domain matcher families are built on psi: a [`Transform`] that pulls a
//! field out of the actual value, gating a composed downstream matcher.
//!
//! # Example
//!
//! ```
//! use psi_test::prelude::*;
//!
//! let record = Record::new()
//!     .with("name", "alice")
//!     .with("role", "admin");
//!
//! let mut m = field("role", eq("admin"));
//! assert_eq!(m.evaluate(&record.into()), Ok(true));
//! ```

use psi::prelude::*;
use std::collections::BTreeMap;

#[cfg(feature = "fixtures")]
pub mod fixture;

/// Test context: a string-keyed record of values.
///
/// Converts into a [`Value::Map`].
#[derive(Debug, Clone, Default)]
pub struct Record {
    values: BTreeMap<String, Value>,
}

impl Record {
    /// Create an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field (builder pattern).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Get a field by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Map(record.values)
    }
}

/// Extracts a field from a map value.
///
/// Fails (as a transform failure) when the actual value is not a map or the
/// key is absent.
#[must_use]
pub fn field_of(key: impl Into<String>) -> Transform {
    let key = key.into();
    Transform::new(format!("field {key}"), move |actual| match actual {
        Value::Map(m) => m.get(&key).cloned().ok_or_else(|| {
            TransformError::new(format!("have field {key}"), actual.clone())
        }),
        other => Err(TransformError::new(
            format!("be a record with field {key}, got <{}>", other.type_name()),
            actual.clone(),
        )),
    })
}

/// Match a field of a record against anything composable.
pub fn field(key: impl Into<String>, matching: impl Into<Arg>) -> BoxMatcher {
    compose(vec![field_of(key).into(), matching.into()])
}

/// How a single evaluation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Matched.
    Match,
    /// Did not match, with the failure message.
    NoMatch(String),
    /// Could not decide, with the error text.
    Error(String),
}

/// Evaluate `matcher` and render the failure message when it did not match.
pub fn outcome(matcher: &mut dyn Matcher, actual: &Value) -> Outcome {
    match matcher.evaluate(actual) {
        Ok(true) => Outcome::Match,
        Ok(false) => Outcome::NoMatch(matcher.failure_message(actual)),
        Err(err) => Outcome::Error(err.to_string()),
    }
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::{field, field_of, outcome, Outcome, Record};
    pub use psi::prelude::*;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_builder() {
        let record = Record::new().with("foo", "bar").with("n", 3);

        assert_eq!(record.get("foo"), Some(&Value::from("bar")));
        assert_eq!(record.get("n"), Some(&Value::Int(3)));
        assert_eq!(record.get("missing"), None);
    }

    #[test]
    fn test_field_match() {
        let record: Value = Record::new().with("name", "alice").into();
        let mut m = field("name", "alice");

        assert_eq!(outcome(&mut m, &record), Outcome::Match);
    }

    #[test]
    fn test_missing_field_is_a_failure_not_an_error() {
        let record: Value = Record::new().into();
        let mut m = field("missing", "x");

        match outcome(&mut m, &record) {
            Outcome::NoMatch(msg) => assert!(msg.contains("to have field missing")),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_fields_compose() {
        let record: Value = Record::new()
            .with("role", "admin")
            .with("age", "42")
            .into();
        let mut m = all([
            field("role", not("guest")),
            field(
                "age",
                compose(vec![
                    cast::parse_int(StringFormat::default()).into(),
                    from_fn(|v| Ok(v.as_int().is_some_and(|n| n >= 18))).into(),
                ]),
            ),
        ]);

        assert_eq!(outcome(&mut m, &record), Outcome::Match);
    }
}
