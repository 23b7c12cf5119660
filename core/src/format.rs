//! Failure message rendering.
//!
//! Every message follows one shape so that wrappers can rewrite them:
//!
//! ```text
//! Expected
//!     <string>: world
//! to equal
//!     <string>: hello
//! ```

use crate::Value;

const INDENT: &str = "    ";

/// Indented object dump, as shown under `Expected`.
#[must_use]
pub fn object(value: &Value) -> String {
    format!("{INDENT}{value}")
}

/// `Expected\n<actual>\n<message>`
#[must_use]
pub fn message(actual: &Value, message: &str) -> String {
    format!("Expected\n{}\n{message}", object(actual))
}

/// `Expected\n<actual>\n<message>\n<expected>`
#[must_use]
pub fn message_with_expected(actual: &Value, message: &str, expected: &Value) -> String {
    format!("Expected\n{}\n{message}\n{}", object(actual), object(expected))
}

/// Like [`message_with_expected`] for two strings, pointing at the first
/// differing character.
#[must_use]
pub fn message_with_diff(actual: &str, message: &str, expected: &str) -> String {
    let position = actual
        .chars()
        .zip(expected.chars())
        .take_while(|(a, e)| a == e)
        .count();
    format!(
        "{}\nfirst mismatch at character {position}",
        message_with_expected(&Value::from(actual), message, &Value::from(expected)),
    )
}

/// Strip the conventional two-line `Expected\n<value>\n` prefix.
///
/// Best effort: messages that do not start with it are returned unchanged.
#[must_use]
pub fn strip_expected(message: &str) -> String {
    message
        .strip_prefix("Expected\n")
        .and_then(|rest| rest.split_once('\n'))
        .map_or(message, |(_, tail)| tail)
        .to_string()
}

/// Join `prefix` and `message` with exactly one space.
#[must_use]
pub fn with_prefix(prefix: &str, message: &str) -> String {
    let prefix = prefix.trim_end_matches(' ');
    let message = message.trim_start_matches(' ');
    if prefix.is_empty() {
        message.to_string()
    } else {
        format!("{prefix} {message}")
    }
}
