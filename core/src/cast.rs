//! Casting transforms
//!
//! Ready-made [`Transform`]s that read the actual value as a string, bytes or
//! number. Reading strings is governed by a [`StringFormat`], passed
//! explicitly to every transform that needs one.

use crate::{EvalError, Transform, TransformError, Value};
use std::borrow::Cow;

/// How string-ish values are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct StringFormat {
    /// Accept byte sequences holding valid UTF-8 as strings.
    pub allow_bytes: bool,
}

impl Default for StringFormat {
    fn default() -> Self {
        Self { allow_bytes: true }
    }
}

impl StringFormat {
    /// Only [`Value::String`] is string-ish.
    #[must_use]
    pub fn strict() -> Self {
        Self { allow_bytes: false }
    }

    /// Read `value` as a string.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::NotAString`] when the value is not string-ish
    /// under this format.
    pub fn read<'a>(&self, value: &'a Value) -> Result<Cow<'a, str>, EvalError> {
        match value {
            Value::String(s) => Ok(Cow::Borrowed(s.as_str())),
            Value::Bytes(b) if self.allow_bytes => std::str::from_utf8(b)
                .map(Cow::Borrowed)
                .map_err(|_| EvalError::NotAString { type_name: "bytes" }),
            other => Err(EvalError::NotAString {
                type_name: other.type_name(),
            }),
        }
    }
}

fn read(format: StringFormat, actual: &Value) -> Result<Cow<'_, str>, TransformError> {
    format.read(actual).map_err(|_| {
        TransformError::new(
            format!("be a string-ish value, got <{}>", actual.type_name()),
            actual.clone(),
        )
    })
}

/// String-ish value → [`Value::String`].
#[must_use]
pub fn as_string(format: StringFormat) -> Transform {
    Transform::new("as_string", move |actual| {
        read(format, actual).map(|s| Value::String(s.into_owned()))
    })
}

/// String or bytes → [`Value::Bytes`].
#[must_use]
pub fn as_bytes() -> Transform {
    Transform::new("as_bytes", |actual| match actual {
        Value::Bytes(b) => Ok(Value::Bytes(b.clone())),
        Value::String(s) => Ok(Value::Bytes(s.as_bytes().to_vec())),
        other => Err(TransformError::new(
            format!("be a bytes-ish value, got <{}>", other.type_name()),
            other.clone(),
        )),
    })
}

/// String-ish value → [`Value::Int`]. Surrounding whitespace is ignored.
#[must_use]
pub fn parse_int(format: StringFormat) -> Transform {
    Transform::new("parse_int", move |actual| {
        if let Value::Int(i) = actual {
            return Ok(Value::Int(*i));
        }
        let text = read(format, actual)?;
        text.trim()
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|e| TransformError::new(format!("be a valid integer: {e}"), actual.clone()))
    })
}

/// String-ish value → [`Value::Float`]. Integers are widened.
#[must_use]
pub fn parse_float(format: StringFormat) -> Transform {
    Transform::new("parse_float", move |actual| {
        match actual {
            Value::Float(x) => return Ok(Value::Float(*x)),
            #[allow(clippy::cast_precision_loss)]
            Value::Int(i) => return Ok(Value::Float(*i as f64)),
            _ => {}
        }
        let text = read(format, actual)?;
        text.trim()
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|e| TransformError::new(format!("be a valid number: {e}"), actual.clone()))
    })
}

/// Value with a length → [`Value::Int`] holding it.
#[must_use]
pub fn length() -> Transform {
    Transform::new("length", |actual| {
        actual.len().map(Value::from).ok_or_else(|| {
            TransformError::new(
                format!("have a length, got <{}>", actual.type_name()),
                actual.clone(),
            )
        })
    })
}

/// JSON text → parsed [`Value`].
#[cfg(feature = "json")]
#[must_use]
pub fn parse_json(format: StringFormat) -> Transform {
    Transform::new("parse_json", move |actual| {
        let text = read(format, actual)?;
        serde_json::from_str::<serde_json::Value>(&text)
            .map(Value::from)
            .map_err(|e| TransformError::new(format!("be a valid JSON: {e}"), actual.clone()))
    })
}
