//! Protocol adapters — bring foreign matcher shapes into [`Matcher`]
//!
//! The engine only evaluates [`Matcher`]s. Everything else is converted by
//! an explicit adapter chosen at construction time:
//!
//! | Shape | Adapter | Constructor |
//! |-------|---------|-------------|
//! | two methods: `matches` + `describe` | [`FromDescribed`] | [`from_described`] |
//! | three methods: `try_match` + two messages | [`FromMessageMatcher`] | [`from_message_matcher`] |
//! | bare predicate `Fn(&Value) -> Result<bool, EvalError>` | [`FnMatcher`] | [`from_fn`] |
//! | raw literal | [`Equal`] | [`eq`](crate::eq) |
//!
//! [`MatcherLike`] is the closed union of all of them; [`normalize`] turns
//! any member into a boxed [`Matcher`].

use crate::{format, BoxMatcher, Equal, EvalError, Matcher, Value};
use std::fmt;

// ═══════════════════════════════════════════════════════════════════════════════
// Foreign shapes
// ═══════════════════════════════════════════════════════════════════════════════

/// Two-method matcher shape: a boolean predicate plus a description.
///
/// Has no error channel and no actual-aware message.
pub trait DescribedMatcher: Send + fmt::Debug {
    /// Whether `actual` satisfies the matcher.
    fn matches(&self, actual: &Value) -> bool;

    /// Description of what is expected, e.g. `is equal to 3`.
    fn describe(&self) -> String;
}

/// Three-method matcher shape: fallible match plus two rendered messages.
///
/// Messages conventionally start with `Expected\n<actual>\n`.
pub trait MessageMatcher: Send + fmt::Debug {
    /// Evaluate against `actual`.
    fn try_match(&mut self, actual: &Value) -> Result<bool, EvalError>;

    /// Failure message.
    fn message(&self, actual: &Value) -> String;

    /// Negated failure message.
    fn negated_message(&self, actual: &Value) -> String;
}

// ═══════════════════════════════════════════════════════════════════════════════
// Adapters
// ═══════════════════════════════════════════════════════════════════════════════

/// Adapts a [`DescribedMatcher`].
///
/// The description is the failure message; the negated message prefixes it
/// with `not`.
#[derive(Debug)]
pub struct FromDescribed<M> {
    inner: M,
}

impl<M: DescribedMatcher> Matcher for FromDescribed<M> {
    fn evaluate(&mut self, actual: &Value) -> Result<bool, EvalError> {
        Ok(self.inner.matches(actual))
    }

    fn failure_message(&self, _actual: &Value) -> String {
        self.inner.describe()
    }

    fn negated_failure_message(&self, _actual: &Value) -> String {
        format!("not {}", self.inner.describe())
    }
}

/// Adapts a [`MessageMatcher`].
///
/// Evaluation and messages are forwarded. The summary strips the
/// `Expected\n<actual>\n` lead-in and prefixes what remains with a label:
/// the one given at construction, or the adapted type's name. Boxed trait
/// objects have no useful name and get no label.
pub struct FromMessageMatcher<M> {
    inner: M,
    prefix: Option<String>,
}

impl<M> FromMessageMatcher<M> {
    /// Set the label used in summaries.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Empty when no prefix was given and `M` is a trait object.
    fn label(&self) -> String {
        self.prefix.clone().unwrap_or_else(|| {
            let full = std::any::type_name::<M>();
            if full.contains("dyn ") {
                return String::new();
            }
            let path = full.split('<').next().unwrap_or(full);
            path.rsplit("::").next().unwrap_or(path).to_string()
        })
    }
}

impl<M: fmt::Debug> fmt::Debug for FromMessageMatcher<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FromMessageMatcher")
            .field("inner", &self.inner)
            .field("prefix", &self.prefix)
            .finish()
    }
}

impl<M: MessageMatcher> Matcher for FromMessageMatcher<M> {
    fn evaluate(&mut self, actual: &Value) -> Result<bool, EvalError> {
        self.inner.try_match(actual)
    }

    fn failure_message(&self, actual: &Value) -> String {
        self.inner.message(actual)
    }

    fn negated_failure_message(&self, actual: &Value) -> String {
        self.inner.negated_message(actual)
    }

    fn summary(&self, actual: &Value) -> String {
        let message = format::strip_expected(&self.inner.message(actual));
        format::with_prefix(&self.label(), &message)
    }
}

type PredicateFn = dyn Fn(&Value) -> Result<bool, EvalError> + Send + Sync;

/// Adapts a bare predicate function.
///
/// The failure message is `Expected\n<actual>\n<message>`, where `message`
/// is caller-supplied (conventionally starting with `to`) or a generic
/// default. The negated form prefixes it with `not`.
pub struct FnMatcher {
    predicate: Box<PredicateFn>,
    message: Option<String>,
}

impl FnMatcher {
    /// Wrap a predicate.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&Value) -> Result<bool, EvalError> + Send + Sync + 'static,
    {
        Self {
            predicate: Box::new(predicate),
            message: None,
        }
    }

    /// Set the failure message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    fn message(&self) -> &str {
        self.message.as_deref().unwrap_or("to satisfy predicate")
    }
}

impl fmt::Debug for FnMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnMatcher")
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

impl Matcher for FnMatcher {
    fn evaluate(&mut self, actual: &Value) -> Result<bool, EvalError> {
        (self.predicate)(actual)
    }

    fn failure_message(&self, actual: &Value) -> String {
        format::message(actual, self.message())
    }

    fn negated_failure_message(&self, actual: &Value) -> String {
        format::message(actual, &format!("not {}", self.message()))
    }
}

/// Overlays a custom failure message on another matcher.
///
/// Evaluation is forwarded unchanged.
#[derive(Debug)]
pub struct WithMessage {
    inner: BoxMatcher,
    message: String,
}

impl WithMessage {
    /// Overlay `message` on `inner`.
    pub fn new(inner: BoxMatcher, message: impl Into<String>) -> Self {
        Self {
            inner,
            message: message.into(),
        }
    }
}

impl Matcher for WithMessage {
    fn evaluate(&mut self, actual: &Value) -> Result<bool, EvalError> {
        self.inner.evaluate(actual)
    }

    fn failure_message(&self, actual: &Value) -> String {
        format::message(actual, &self.message)
    }

    fn negated_failure_message(&self, actual: &Value) -> String {
        format::message(actual, &format!("not {}", self.message))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Normalization
// ═══════════════════════════════════════════════════════════════════════════════

/// Closed union of everything that can act as a matcher.
#[derive(Debug)]
pub enum MatcherLike {
    /// Already a canonical matcher.
    Matcher(BoxMatcher),
    /// Two-method shape.
    Described(Box<dyn DescribedMatcher>),
    /// Three-method shape.
    Messaged(Box<dyn MessageMatcher>),
    /// Bare predicate.
    Predicate(FnMatcher),
    /// Raw value, compared by equality.
    Literal(Value),
}

impl MatcherLike {
    /// Convert into a canonical matcher. Canonical matchers pass through.
    #[must_use]
    pub fn normalize(self) -> BoxMatcher {
        match self {
            Self::Matcher(m) => m,
            Self::Described(m) => Box::new(FromDescribed { inner: m }),
            Self::Messaged(m) => Box::new(FromMessageMatcher {
                inner: m,
                prefix: None,
            }),
            Self::Predicate(f) => Box::new(f),
            Self::Literal(v) => Box::new(Equal::new(v)),
        }
    }
}

impl DescribedMatcher for Box<dyn DescribedMatcher> {
    fn matches(&self, actual: &Value) -> bool {
        (**self).matches(actual)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

impl MessageMatcher for Box<dyn MessageMatcher> {
    fn try_match(&mut self, actual: &Value) -> Result<bool, EvalError> {
        (**self).try_match(actual)
    }

    fn message(&self, actual: &Value) -> String {
        (**self).message(actual)
    }

    fn negated_message(&self, actual: &Value) -> String {
        (**self).negated_message(actual)
    }
}

/// Convert any [`MatcherLike`] into a canonical matcher.
#[must_use]
pub fn normalize(value: MatcherLike) -> BoxMatcher {
    value.normalize()
}

/// Adapt a two-method matcher.
pub fn from_described<M: DescribedMatcher>(inner: M) -> FromDescribed<M> {
    FromDescribed { inner }
}

/// Adapt a three-method matcher.
pub fn from_message_matcher<M: MessageMatcher>(inner: M) -> FromMessageMatcher<M> {
    FromMessageMatcher {
        inner,
        prefix: None,
    }
}

/// Adapt a bare predicate with the default message.
pub fn from_fn<F>(predicate: F) -> FnMatcher
where
    F: Fn(&Value) -> Result<bool, EvalError> + Send + Sync + 'static,
{
    FnMatcher::new(predicate)
}

/// Overlay a custom message on a matcher.
pub fn with_message(inner: impl Matcher + 'static, message: impl Into<String>) -> WithMessage {
    WithMessage::new(Box::new(inner), message)
}
