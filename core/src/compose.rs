//! Psi — the variadic composition operator
//!
//! [`compose`] folds an argument list into one matcher. Each argument is an
//! explicit [`Arg`]: a literal, a matcher, a transform or a message. The
//! [`psi!`](crate::psi) macro builds the list from plain expressions.
//!
//! # Folding rules
//!
//! - no arguments → [`Always`]
//! - a lone transform → [`WithTransform`] with no downstream matcher
//! - a trailing [`Message`] → overlays its text on the composition of the
//!   arguments before it
//! - otherwise, left to right: literals become [`Equal`](crate::Equal),
//!   matchers pass through, and all of them are ANDed together
//!
//! # A transform consumes the remainder
//!
//! The first transform in the list captures *every* argument after it as
//! its downstream matcher. Those arguments are not ANDed at the top level:
//!
//! ```
//! use psi::{psi, cast, Matcher, Value, StringFormat};
//!
//! // parse_int gates both bounds
//! let mut m = psi![
//!     cast::parse_int(StringFormat::default()),
//!     psi::from_fn(|v| Ok(v.as_int().is_some_and(|i| i >= 0))),
//!     psi::from_fn(|v| Ok(v.as_int().is_some_and(|i| i <= 10))),
//! ];
//! assert_eq!(m.evaluate(&Value::from("7")), Ok(true));
//! assert_eq!(m.evaluate(&Value::from("abc")), Ok(false));
//! ```
//!
//! Put a transform first when it should gate everything that follows.

use crate::{
    All, Always, BoxMatcher, FnMatcher, Matcher, MatcherLike, Transform, Value, WithMessage,
    WithTransform,
};
use std::collections::BTreeMap;

/// A custom failure message argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message(pub String);

/// Build a [`Message`] argument.
pub fn message(text: impl Into<String>) -> Message {
    Message(text.into())
}

/// One argument of [`compose`].
#[derive(Debug)]
pub enum Arg {
    /// Raw value, compared by equality.
    Literal(Value),
    /// Canonical matcher.
    Matcher(BoxMatcher),
    /// Transform gating the remaining arguments.
    Transform(Transform),
    /// Custom failure message for the preceding arguments.
    Message(String),
}

impl Arg {
    /// Convert a single non-transform argument into a matcher.
    ///
    /// A message outside the trailing position is compared as a literal
    /// string.
    fn into_matcher(self) -> BoxMatcher {
        match self {
            Self::Literal(v) => MatcherLike::Literal(v).normalize(),
            Self::Matcher(m) => m,
            Self::Transform(t) => Box::new(WithTransform::new(t, None)),
            Self::Message(text) => MatcherLike::Literal(Value::String(text)).normalize(),
        }
    }
}

impl<M: Matcher + 'static> From<M> for Arg {
    fn from(matcher: M) -> Self {
        Self::Matcher(Box::new(matcher))
    }
}

impl From<MatcherLike> for Arg {
    fn from(like: MatcherLike) -> Self {
        match like {
            MatcherLike::Literal(v) => Self::Literal(v),
            other => Self::Matcher(other.normalize()),
        }
    }
}

impl From<Transform> for Arg {
    fn from(t: Transform) -> Self {
        Self::Transform(t)
    }
}

impl From<Message> for Arg {
    fn from(m: Message) -> Self {
        Self::Message(m.0)
    }
}

impl From<Value> for Arg {
    fn from(v: Value) -> Self {
        Self::Literal(v)
    }
}

impl From<&str> for Arg {
    fn from(s: &str) -> Self {
        Self::Literal(Value::from(s))
    }
}

impl From<String> for Arg {
    fn from(s: String) -> Self {
        Self::Literal(Value::String(s))
    }
}

impl From<i64> for Arg {
    fn from(i: i64) -> Self {
        Self::Literal(Value::Int(i))
    }
}

impl From<i32> for Arg {
    fn from(i: i32) -> Self {
        Self::Literal(Value::from(i))
    }
}

impl From<f64> for Arg {
    fn from(x: f64) -> Self {
        Self::Literal(Value::Float(x))
    }
}

impl From<bool> for Arg {
    fn from(b: bool) -> Self {
        Self::Literal(Value::Bool(b))
    }
}

impl From<Vec<u8>> for Arg {
    fn from(b: Vec<u8>) -> Self {
        Self::Literal(Value::Bytes(b))
    }
}

impl From<Vec<Value>> for Arg {
    fn from(items: Vec<Value>) -> Self {
        Self::Literal(Value::List(items))
    }
}

impl From<BTreeMap<String, Value>> for Arg {
    fn from(m: BTreeMap<String, Value>) -> Self {
        Self::Literal(Value::Map(m))
    }
}

/// Fold an argument list into one matcher. See the [module docs](self).
#[must_use]
pub fn compose(mut args: Vec<Arg>) -> BoxMatcher {
    if matches!(args.last(), Some(Arg::Message(_))) && args.len() > 1 {
        if let Some(Arg::Message(text)) = args.pop() {
            return Box::new(WithMessage::new(compose(args), text));
        }
    }

    if args.len() <= 1 {
        return match args.pop() {
            None => Box::new(Always),
            Some(arg) => arg.into_matcher(),
        };
    }

    let mut matchers = Vec::with_capacity(args.len());
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg {
            Arg::Transform(transform) => {
                let rest: Vec<Arg> = args.by_ref().collect();
                let downstream = (!rest.is_empty()).then(|| compose(rest));
                matchers.push(Box::new(WithTransform::new(transform, downstream)) as BoxMatcher);
            }
            other => matchers.push(other.into_matcher()),
        }
    }
    All::from_vec(matchers)
}

/// Compose a single argument.
#[must_use]
pub fn compose_one(arg: impl Into<Arg>) -> BoxMatcher {
    compose(vec![arg.into()])
}

/// Attach a custom message to a predicate.
///
/// Shorthand for `compose([from_fn(f), message(text)])`.
pub fn predicate_with_message<F>(predicate: F, text: impl Into<String>) -> BoxMatcher
where
    F: Fn(&Value) -> Result<bool, crate::EvalError> + Send + Sync + 'static,
{
    compose(vec![
        Arg::from(FnMatcher::new(predicate)),
        Arg::from(message(text)),
    ])
}

/// Compose matchers, literals and transforms into one matcher.
///
/// Each argument goes through `Arg::from`, so raw values, matchers,
/// [`Transform`]s and [`message`]s can be mixed freely.
///
/// ```
/// use psi::{psi, Matcher, Value};
///
/// let mut m = psi!("hello");
/// assert_eq!(m.evaluate(&Value::from("hello")), Ok(true));
/// assert_eq!(m.evaluate(&Value::from("world")), Ok(false));
/// ```
#[macro_export]
macro_rules! psi {
    () => {
        $crate::compose(::std::vec::Vec::new())
    };
    ($($arg:expr),+ $(,)?) => {
        $crate::compose(::std::vec![$($crate::Arg::from($arg)),+])
    };
}
