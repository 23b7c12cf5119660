//! `Value` — Type-erased actual value that flows into every [`Matcher`](crate::Matcher)
//!
//! Matchers are domain-agnostic: they never see the caller's concrete types,
//! only this erased representation. Field-extraction callbacks and transforms
//! produce `Value`s, and matchers consume them.
//!
//! # Extensibility via `Custom`
//!
//! For domain-specific types not covered by the primitives, implement
//! [`CustomValue`] and wrap in `Value::Custom(Arc::new(your_type))`.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt::{self, Debug};
use std::sync::Arc;

/// Extension trait for custom value types.
///
/// Implement this trait for domain-specific types, then wrap with
/// `Value::Custom(Arc::new(your_type))`.
///
/// # Example
///
/// ```
/// use std::any::Any;
/// use std::sync::Arc;
/// use psi::{CustomValue, Value};
///
/// #[derive(Debug)]
/// struct Token {
///     subject: String,
/// }
///
/// impl CustomValue for Token {
///     fn custom_type_name(&self) -> &'static str {
///         "token"
///     }
///
///     fn as_any(&self) -> &dyn Any {
///         self
///     }
/// }
///
/// let value = Value::Custom(Arc::new(Token { subject: "alice".into() }));
/// assert!(value.is_custom());
/// assert_eq!(value.type_name(), "token");
/// ```
pub trait CustomValue: Send + Sync + Debug {
    /// Returns a human-readable type identifier, used in failure messages.
    ///
    /// Convention: use `snake_case` names, e.g., `"jwt_claims"`, `"url"`.
    fn custom_type_name(&self) -> &'static str;

    /// Returns a reference to `self` as `&dyn Any` for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Structural equality against another custom value.
    ///
    /// The default compares allocation identity, so two separately
    /// constructed values are never equal unless this is overridden.
    fn custom_eq(&self, other: &dyn CustomValue) -> bool {
        std::ptr::eq(
            self.as_any() as *const dyn Any as *const u8,
            other.as_any() as *const dyn Any as *const u8,
        )
    }
}

/// The erased value type every matcher evaluates against.
///
/// # Variants
///
/// - `None` — absent value (nil)
/// - `Bool`, `Int`, `Float`, `String`, `Bytes` — primitives
/// - `List` — ordered sequence, the only shape [`Dive`](crate::Dive) accepts
/// - `Map` — string-keyed mapping (ordered for stable messages)
/// - `Custom` — user-defined types implementing [`CustomValue`]
///
/// # Example
///
/// ```
/// use psi::Value;
///
/// let value = Value::from("hello");
/// assert_eq!(value.as_str(), Some("hello"));
/// assert!(!value.is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// No value.
    #[default]
    None,

    /// Boolean.
    Bool(bool),

    /// Signed integer.
    Int(i64),

    /// Floating point number.
    Float(f64),

    /// UTF-8 string.
    String(String),

    /// Raw bytes. Compared byte-wise.
    Bytes(Vec<u8>),

    /// Ordered sequence of values.
    List(Vec<Value>),

    /// String-keyed mapping.
    Map(BTreeMap<String, Value>),

    /// Custom data type for domain-specific extensions.
    Custom(Arc<dyn CustomValue>),
}

// Manual PartialEq because trait objects don't auto-derive it.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::None, Self::None) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Bytes(a), Self::Bytes(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            (Self::Custom(a), Self::Custom(b)) => Arc::ptr_eq(a, b) || a.custom_eq(b.as_ref()),
            _ => false,
        }
    }
}

impl Value {
    /// Returns `true` if this is the `None` variant.
    #[inline]
    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Returns `true` if this is the `String` variant.
    #[inline]
    #[must_use]
    pub fn is_string(&self) -> bool {
        matches!(self, Self::String(_))
    }

    /// Returns `true` if this is the `Bytes` variant.
    #[inline]
    #[must_use]
    pub fn is_bytes(&self) -> bool {
        matches!(self, Self::Bytes(_))
    }

    /// Returns `true` if this is the `List` variant.
    #[inline]
    #[must_use]
    pub fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    /// Returns `true` if this is the `Custom` variant.
    #[inline]
    #[must_use]
    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom(_))
    }

    /// Try to get the value as a string slice.
    ///
    /// ```
    /// use psi::Value;
    ///
    /// assert_eq!(Value::from("hi").as_str(), Some("hi"));
    /// assert_eq!(Value::Int(4).as_str(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s.as_str()),
            _ => Option::None,
        }
    }

    /// Try to get the value as an integer.
    #[inline]
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => Option::None,
        }
    }

    /// Try to get the value as a float. Integers widen.
    #[inline]
    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            #[allow(clippy::cast_precision_loss)]
            Self::Int(i) => Some(*i as f64),
            _ => Option::None,
        }
    }

    /// Try to get the value as a boolean.
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => Option::None,
        }
    }

    /// Try to get the value as a byte slice.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b.as_slice()),
            _ => Option::None,
        }
    }

    /// Try to get the value as a list slice.
    #[inline]
    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items.as_slice()),
            _ => Option::None,
        }
    }

    /// Try to get the value as a map.
    #[inline]
    #[must_use]
    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Self::Map(m) => Some(m),
            _ => Option::None,
        }
    }

    /// Try to get the inner custom value.
    ///
    /// Use [`CustomValue::as_any`] to downcast to the concrete type.
    #[inline]
    #[must_use]
    pub fn as_custom(&self) -> Option<&dyn CustomValue> {
        match self {
            Self::Custom(c) => Some(c.as_ref()),
            _ => Option::None,
        }
    }

    /// Length of a string (bytes), byte sequence, list or map.
    ///
    /// Returns `None` for values that have no length.
    #[must_use]
    pub fn len(&self) -> Option<usize> {
        match self {
            Self::String(s) => Some(s.len()),
            Self::Bytes(b) => Some(b.len()),
            Self::List(items) => Some(items.len()),
            Self::Map(m) => Some(m.len()),
            _ => Option::None,
        }
    }

    /// Returns a string describing the type of this value.
    ///
    /// For `Custom` variants, this delegates to [`CustomValue::custom_type_name`].
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::None => "nil",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Bytes(_) => "bytes",
            Self::List(_) => "list",
            Self::Map(_) => "map",
            Self::Custom(c) => c.custom_type_name(),
        }
    }
}

/// Renders the value the way failure messages show it: `<type>: value`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("<nil>: nil"),
            Self::Custom(c) => write!(f, "<{}>: {c:?}", c.custom_type_name()),
            other => {
                write!(f, "<{}>: ", other.type_name())?;
                other.fmt_inline(f)
            }
        }
    }
}

impl Value {
    fn fmt_inline(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("nil"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::String(s) => f.write_str(s),
            Self::Bytes(b) => write!(f, "{b:?}"),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    item.fmt_inline(f)?;
                }
                f.write_str("]")
            }
            Self::Map(m) => {
                f.write_str("{")?;
                for (i, (k, v)) in m.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}: ")?;
                    v.fmt_inline(f)?;
                }
                f.write_str("}")
            }
            Self::Custom(c) => write!(f, "{c:?}"),
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Self::Int(i64::try_from(n).unwrap_or(i64::MAX))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Self::Bytes(b)
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Self::Bytes(b.to_vec())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::List(items)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(m: BTreeMap<String, Value>) -> Self {
        Self::Map(m)
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            Option::None => Self::None,
        }
    }
}

impl FromIterator<Value> for Value {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self::List(iter.into_iter().collect())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// JSON interop (feature = "json")
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(feature = "json")]
impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::None,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                Option::None => Self::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => {
                Self::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(m) => {
                Self::Map(m.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}
