//! Template matcher — extract placeholders from a string and match each one
//!
//! A template is literal text with `{{Name}}` placeholders. It is compiled
//! once into a regular expression where every placeholder becomes a greedy
//! `.+` capture group. Evaluation finds the template in the actual string,
//! collects the captured text per lower-cased name, and hands each captured
//! substring to the matcher bound to that name with [`var`].
//!
//! ```
//! use psi::{var, Matcher, Template, Value};
//!
//! let mut m = Template::new(
//!     "Hello {{Name}}! Your number is {{Number}}",
//!     vec![var("Name", "John")],
//! )?;
//! assert_eq!(m.evaluate(&Value::from("Hello John! Your number is 42")), Ok(true));
//! assert_eq!(m.evaluate(&Value::from("Hello Jane! Your number is 42")), Ok(false));
//! # Ok::<(), psi::MatcherError>(())
//! ```
//!
//! # Rules
//!
//! - Placeholders must be separated by literal text: `{{A}}{{B}}` is rejected
//!   at construction, the boundary between them would be ambiguous.
//! - A name used twice must capture the same text both times, otherwise
//!   evaluation returns [`EvalError::InconsistentCapture`].
//! - Names are case-insensitive.
//! - `{{Anything}}` and `{{Anything-Optional}}` are reserved: they match any
//!   non-empty and any possibly empty text, are never checked for
//!   consistency and cannot be bound with [`var`].
//! - The match is unanchored: the template may occur anywhere in the actual
//!   string.
//!
//! Captures are greedy. With repeated separators the *last* occurrence wins
//! the boundary: `{{A}}-{{B}}` on `x-y-z` captures `A = x-y`, `B = z`.

use crate::{
    compose_one, format, Arg, BoxMatcher, EvalError, Matcher, MatcherError, StringFormat, Value,
    MAX_TEMPLATE_LENGTH,
};
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Reserved placeholder matching any non-empty text.
pub const ANYTHING: &str = "anything";

/// Reserved placeholder matching any text, including none.
pub const ANYTHING_OPTIONAL: &str = "anything-optional";

const PLACEHOLDER: &str = r"\{\{\s*([^}\s]+)\s*\}\}";

fn placeholder() -> Result<&'static Regex, MatcherError> {
    static COMPILED: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
    COMPILED
        .get_or_init(|| Regex::new(PLACEHOLDER))
        .as_ref()
        .map_err(|source| MatcherError::InvalidPattern {
            pattern: PLACEHOLDER.to_string(),
            source: source.clone(),
        })
}

/// Template compilation options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct TemplateOptions {
    /// Escape the literal text between placeholders.
    ///
    /// When `false`, literal text is regex syntax: `v{{Version}}\.0` works,
    /// and an invalid derived pattern is a construction error.
    pub escape_literals: bool,

    /// How the actual value is read as a string.
    pub format: StringFormat,
}

/// A template variable: a placeholder name bound to a matcher.
#[derive(Debug)]
pub struct Var {
    name: String,
    matcher: BoxMatcher,
}

impl Var {
    /// Bind `name` to an already composed matcher.
    pub fn new(name: impl Into<String>, matcher: BoxMatcher) -> Self {
        Self {
            name: name.into(),
            matcher,
        }
    }

    /// The variable name as given.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Bind a placeholder to anything composable: a literal, a matcher or a
/// transform.
pub fn var(name: impl Into<String>, matching: impl Into<Arg>) -> Var {
    Var::new(name, compose_one(matching))
}

#[derive(Debug)]
struct Group {
    /// Lower-cased placeholder name.
    name: String,
    reserved: bool,
}

#[derive(Debug)]
enum Last {
    Pending,
    Mismatch,
    Matched,
    Variable { index: usize, captured: Value },
}

/// Matches strings against a placeholder template. See the [module
/// docs](self).
#[derive(Debug)]
pub struct Template {
    template: String,
    regex: Regex,
    groups: Vec<Group>,
    vars: Vec<Var>,
    format: StringFormat,
    last: Last,
}

impl Template {
    /// Compile `template` with default options.
    ///
    /// # Errors
    ///
    /// Returns [`MatcherError::AdjacentPlaceholders`] for `}}{{`, and
    /// [`MatcherError::InvalidPattern`] when the derived regex is invalid.
    pub fn new(template: &str, vars: Vec<Var>) -> Result<Self, MatcherError> {
        Self::with_options(template, vars, TemplateOptions::default())
    }

    /// Compile `template` with explicit options.
    ///
    /// # Errors
    ///
    /// Same as [`Template::new`].
    pub fn with_options(
        template: &str,
        vars: Vec<Var>,
        options: TemplateOptions,
    ) -> Result<Self, MatcherError> {
        if template.len() > MAX_TEMPLATE_LENGTH {
            return Err(MatcherError::PatternTooLong {
                len: template.len(),
                max: MAX_TEMPLATE_LENGTH,
            });
        }
        if template.contains("}}{{") {
            return Err(MatcherError::AdjacentPlaceholders {
                template: template.to_string(),
            });
        }

        let mut pattern = String::with_capacity(template.len() * 2);
        let mut groups = Vec::new();
        let mut rest = 0;
        for caps in placeholder()?.captures_iter(template) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            push_literal(&mut pattern, &template[rest..whole.start()], options);
            rest = whole.end();

            let name = name.as_str().to_lowercase();
            let body = if name == ANYTHING_OPTIONAL { ".*" } else { ".+" };
            pattern.push_str(&format!("(?P<p{}>{body})", groups.len()));
            groups.push(Group {
                reserved: name == ANYTHING || name == ANYTHING_OPTIONAL,
                name,
            });
        }
        push_literal(&mut pattern, &template[rest..], options);

        let regex = Regex::new(&pattern).map_err(|source| MatcherError::InvalidPattern {
            pattern: pattern.clone(),
            source,
        })?;
        tracing::debug!(
            template,
            placeholders = groups.len(),
            pattern = %regex,
            "compiled template"
        );

        Ok(Self {
            template: template.to_string(),
            regex,
            groups,
            vars,
            format: options.format,
            last: Last::Pending,
        })
    }

    /// The template source.
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Distinct lower-cased placeholder names in order of first appearance.
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().enumerate().filter_map(move |(i, g)| {
            let seen = self.groups[..i].iter().any(|prev| prev.name == g.name);
            (!seen).then_some(g.name.as_str())
        })
    }

    /// Captured text per lower-cased name, `None` when the template does
    /// not occur in `text`.
    fn capture(&self, text: &str) -> Result<Option<HashMap<String, String>>, EvalError> {
        let Some(caps) = self.regex.captures(text) else {
            return Ok(None);
        };
        let mut captured: HashMap<String, String> = HashMap::new();
        for (i, group) in self.groups.iter().enumerate() {
            if group.reserved {
                continue;
            }
            let Some(m) = caps.name(&format!("p{i}")) else {
                continue;
            };
            match captured.get(&group.name) {
                Some(first) if first != m.as_str() => {
                    return Err(EvalError::InconsistentCapture {
                        name: group.name.clone(),
                        first: first.clone(),
                        second: m.as_str().to_string(),
                    });
                }
                Some(_) => {}
                None => {
                    captured.insert(group.name.clone(), m.as_str().to_string());
                }
            }
        }
        Ok(Some(captured))
    }
}

fn push_literal(pattern: &mut String, literal: &str, options: TemplateOptions) {
    if options.escape_literals {
        pattern.push_str(&regex::escape(literal));
    } else {
        pattern.push_str(literal);
    }
}

impl Matcher for Template {
    fn evaluate(&mut self, actual: &Value) -> Result<bool, EvalError> {
        self.last = Last::Pending;
        let text = self.format.read(actual)?;

        let Some(captured) = self.capture(&text)? else {
            self.last = Last::Mismatch;
            return Ok(false);
        };

        for index in 0..self.vars.len() {
            let var = &mut self.vars[index];
            let name = var.name.to_lowercase();
            let Some(text) = captured.get(&name) else {
                return Err(EvalError::UnknownVariable { name });
            };
            let value = Value::from(text.as_str());
            let matched = var
                .matcher
                .evaluate(&value)
                .map_err(|source| EvalError::Variable {
                    name,
                    source: Box::new(source),
                })?;
            self.last = Last::Variable {
                index,
                captured: value,
            };
            if !matched {
                return Ok(false);
            }
        }

        if self.vars.is_empty() {
            self.last = Last::Matched;
        }
        Ok(true)
    }

    fn failure_message(&self, actual: &Value) -> String {
        match &self.last {
            Last::Variable { index, captured } => {
                let var = &self.vars[*index];
                format::message(
                    actual,
                    &format!(
                        "to match template on value {}:\n {}",
                        var.name,
                        var.matcher.failure_message(captured)
                    ),
                )
            }
            _ => format::message(actual, &format!("to match template:\n {}", self.template)),
        }
    }

    fn negated_failure_message(&self, actual: &Value) -> String {
        match &self.last {
            Last::Variable { index, captured } => {
                let var = &self.vars[*index];
                format::message(
                    actual,
                    &format!(
                        "not to match template on value {}:\n {}",
                        var.name,
                        var.matcher.negated_failure_message(captured)
                    ),
                )
            }
            _ => format::message(
                actual,
                &format!("not to match template:\n {}", self.template),
            ),
        }
    }
}
