use std::borrow::Cow;
use std::fmt::{self, Display};
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

static KEY_PARSER: LazyLock<KeyParser> = LazyLock::new(KeyParser::init);

/// Validates field keys. Keys end up inside element identifiers, so they are
/// restricted to an ASCII identifier alphabet.
struct KeyParser(Regex);

impl KeyParser {
    fn init() -> Self {
        Self(Regex::new(r"^[A-Za-z_][A-Za-z0-9_-]*").expect("static key pattern"))
    }

    fn parse(&self, s: &str) -> Result<FieldKey, FieldKeyError> {
        let Some(matches) = self.0.find(s) else {
            return match s.chars().next() {
                Some(c) => Err(FieldKeyError::InvalidChar {
                    at: 0,
                    invalid_char: c,
                }),
                None => Err(FieldKeyError::Empty),
            };
        };
        if matches.len() == s.len() {
            return Ok(FieldKey(Cow::Owned(s.to_string())));
        }
        let at = matches.as_str().chars().count();
        match s[matches.end()..].chars().next() {
            Some(invalid_char) => Err(FieldKeyError::InvalidChar { at, invalid_char }),
            None => Err(FieldKeyError::Empty),
        }
    }
}

/// Key of a field, unique among its siblings.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldKey(Cow<'static, str>);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldKeyError {
    #[error("Empty field key")]
    Empty,
    #[error("Invalid character for field key: {invalid_char} at {at}")]
    InvalidChar { at: usize, invalid_char: char },
}

impl FieldKey {
    /// Creates a key without validation, for keys known at compile time.
    pub const fn new_unchecked(s: &'static str) -> Self {
        FieldKey(Cow::Borrowed(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for FieldKey {
    type Err = FieldKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KEY_PARSER.parse(s)
    }
}

impl TryFrom<&str> for FieldKey {
    type Error = FieldKeyError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for FieldKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
