//! Conformance test fixture runner
//!
//! Loads YAML fixtures and runs them against the psi engine.
//!
//! ```yaml
//! name: dive_every
//! description: every element must match
//! matcher:
//!   dive: { eq: 1 }
//! cases:
//!   - name: all ones
//!     actual: [1, 1]
//!     expect: match
//!   - name: empty list fails
//!     actual: []
//!     expect: no_match
//! ```

use crate::field;
use psi::prelude::*;
use psi::{DivePolicy, TemplateOptions};
use serde::Deserialize;
use std::collections::BTreeMap;

/// A complete test fixture
#[derive(Debug, Deserialize)]
pub struct Fixture {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub matcher: MatcherConfig,
    #[serde(default)]
    pub cases: Vec<TestCase>,
    /// When set, building the matcher must fail with an error containing
    /// this text.
    #[serde(default)]
    pub build_error: Option<String>,
}

/// Matcher configuration from YAML
/// Uses untagged deserialization - order matters!
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum MatcherConfig {
    Eq(EqConfig),
    All(AllConfig),
    Any(AnyConfig),
    Not(NotConfig),
    Dive(DiveConfig),
    Template(TemplateConfig),
    Transform(TransformConfig),
    HaveLength(HaveLengthConfig),
    Field(FieldConfig),
    Psi(PsiConfig),
    Always(AlwaysConfig),
    Never(NeverConfig),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EqConfig {
    pub eq: serde_json::Value,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AllConfig {
    pub all: Vec<MatcherConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnyConfig {
    pub any: Vec<MatcherConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NotConfig {
    pub not: Box<MatcherConfig>,
}

/// Dive policy name; `nth` reads the index from [`DiveConfig::index`].
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyName {
    #[default]
    Every,
    Any,
    First,
    Nth,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DiveConfig {
    pub dive: Box<MatcherConfig>,
    #[serde(default)]
    pub policy: PolicyName,
    #[serde(default)]
    pub index: usize,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TemplateConfig {
    pub template: String,
    #[serde(default)]
    pub vars: BTreeMap<String, MatcherConfig>,
    #[serde(default)]
    pub options: TemplateOptions,
}

/// Names of the built-in casting transforms.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformName {
    AsString,
    AsBytes,
    ParseInt,
    ParseFloat,
    Length,
    ParseJson,
}

impl TransformName {
    fn build(self) -> Transform {
        let format = StringFormat::default();
        match self {
            Self::AsString => cast::as_string(format),
            Self::AsBytes => cast::as_bytes(),
            Self::ParseInt => cast::parse_int(format),
            Self::ParseFloat => cast::parse_float(format),
            Self::Length => cast::length(),
            Self::ParseJson => cast::parse_json(format),
        }
    }
}

/// A transform with the matchers it gates.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransformConfig {
    pub transform: TransformName,
    #[serde(default)]
    pub then: Vec<MatcherConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum LengthConfig {
    Count(usize),
    Matching(Box<MatcherConfig>),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HaveLengthConfig {
    pub have_length: LengthConfig,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldConfig {
    pub field: String,
    pub matcher: Box<MatcherConfig>,
}

/// Raw composition argument list.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PsiConfig {
    pub psi: Vec<ArgConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MessageArg {
    pub message: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransformArg {
    pub transform: TransformName,
}

/// One argument of a `psi` list. Maps that are not matcher configs are
/// literals.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ArgConfig {
    Message(MessageArg),
    Transform(TransformArg),
    Matcher(MatcherConfig),
    Literal(serde_json::Value),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AlwaysConfig {
    pub always: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NeverConfig {
    pub never: String,
}

/// Expected outcome of a test case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expect {
    Match,
    NoMatch,
    Error,
}

/// Test case
#[derive(Debug, Deserialize)]
pub struct TestCase {
    pub name: String,
    #[serde(default)]
    pub actual: serde_json::Value,
    pub expect: Expect,
    /// Substrings the failure message (or error text) must contain.
    #[serde(default)]
    pub message_contains: Vec<String>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// Builder: Convert config to psi matchers
// ═══════════════════════════════════════════════════════════════════════════════

impl MatcherConfig {
    /// Build a psi matcher from this config
    pub fn build(&self) -> Result<BoxMatcher, MatcherError> {
        Ok(match self {
            Self::Eq(e) => eq(Value::from(e.eq.clone())).boxed(),
            Self::All(a) => all(build_all(&a.all)?).boxed(),
            Self::Any(a) => any(build_all(&a.any)?).boxed(),
            Self::Not(n) => not(n.not.build()?).boxed(),
            Self::Dive(d) => {
                let policy = match d.policy {
                    PolicyName::Every => DivePolicy::Every,
                    PolicyName::Any => DivePolicy::Any,
                    PolicyName::First => DivePolicy::First,
                    PolicyName::Nth => DivePolicy::Nth(d.index),
                };
                psi::Dive::new(d.dive.build()?, policy).boxed()
            }
            Self::Template(t) => {
                let vars = t
                    .vars
                    .iter()
                    .map(|(name, m)| Ok(psi::Var::new(name.clone(), m.build()?)))
                    .collect::<Result<Vec<_>, MatcherError>>()?;
                psi::Template::with_options(&t.template, vars, t.options)?.boxed()
            }
            Self::Transform(t) => {
                let mut args = vec![Arg::from(t.transform.build())];
                for m in &t.then {
                    args.push(m.build()?.into());
                }
                compose(args)
            }
            Self::HaveLength(h) => match &h.have_length {
                LengthConfig::Count(n) => have_length(*n).boxed(),
                LengthConfig::Matching(m) => have_length_matching(m.build()?).boxed(),
            },
            Self::Field(f) => field(f.field.clone(), f.matcher.build()?),
            Self::Psi(p) => {
                let args = p
                    .psi
                    .iter()
                    .map(ArgConfig::build)
                    .collect::<Result<Vec<_>, MatcherError>>()?;
                compose(args)
            }
            Self::Always(a) if a.always => always().boxed(),
            Self::Always(_) => never("always: false").boxed(),
            Self::Never(n) => never(&n.never).boxed(),
        })
    }
}

fn build_all(configs: &[MatcherConfig]) -> Result<Vec<BoxMatcher>, MatcherError> {
    configs.iter().map(MatcherConfig::build).collect()
}

impl ArgConfig {
    fn build(&self) -> Result<Arg, MatcherError> {
        Ok(match self {
            Self::Message(m) => message(m.message.clone()).into(),
            Self::Transform(t) => t.transform.build().into(),
            Self::Matcher(m) => m.build()?.into(),
            Self::Literal(v) => Value::from(v.clone()).into(),
        })
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Runner
// ═══════════════════════════════════════════════════════════════════════════════

/// Result of running a single test case
#[derive(Debug)]
pub struct CaseResult {
    pub case_name: String,
    pub passed: bool,
    pub expected: Expect,
    pub actual: crate::Outcome,
}

impl Fixture {
    /// Parse a fixture from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Parse multiple fixtures from a YAML file with `---` separators
    pub fn from_yaml_multi(yaml: &str) -> Result<Vec<Self>, serde_yaml::Error> {
        let mut fixtures = Vec::new();
        for doc in serde_yaml::Deserializer::from_str(yaml) {
            fixtures.push(Self::deserialize(doc)?);
        }
        Ok(fixtures)
    }

    /// Run all test cases and return results.
    ///
    /// Each case gets a freshly built matcher.
    ///
    /// # Errors
    ///
    /// Returns the build error when the matcher config does not compile.
    pub fn run(&self) -> Result<Vec<CaseResult>, MatcherError> {
        let mut results = Vec::with_capacity(self.cases.len());
        for case in &self.cases {
            let mut matcher = self.matcher.build()?;
            let actual = crate::outcome(&mut matcher, &Value::from(case.actual.clone()));
            results.push(CaseResult {
                case_name: case.name.clone(),
                passed: case.accepts(&actual),
                expected: case.expect,
                actual,
            });
        }
        Ok(results)
    }

    /// Run all test cases and panic on first failure
    pub fn run_and_assert(&self) {
        if let Some(expected) = &self.build_error {
            match self.matcher.build() {
                Ok(_) => panic!("Fixture '{}' built, expected error {expected:?}", self.name),
                Err(err) => assert!(
                    err.to_string().contains(expected.as_str()),
                    "Fixture '{}' build error {:?} does not contain {expected:?}",
                    self.name,
                    err.to_string()
                ),
            }
            return;
        }

        let results = self
            .run()
            .unwrap_or_else(|e| panic!("Fixture '{}' failed to build: {e}", self.name));
        for result in results {
            assert!(
                result.passed,
                "Fixture '{}' case '{}' failed: expected {:?}, got {:?}",
                self.name, result.case_name, result.expected, result.actual
            );
        }
    }
}

impl TestCase {
    fn accepts(&self, actual: &crate::Outcome) -> bool {
        use crate::Outcome;

        let text = match (self.expect, actual) {
            (Expect::Match, Outcome::Match) => return true,
            (Expect::NoMatch, Outcome::NoMatch(msg)) | (Expect::Error, Outcome::Error(msg)) => msg,
            _ => return false,
        };
        self.message_contains.iter().all(|s| text.contains(s.as_str()))
    }
}
