//! Reverse-hostname-style dotted identifiers.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

static IDENTIFIER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z_][a-zA-Z_0-9]*(\.[a-zA-Z_][a-zA-Z_0-9]*)+$")
        .expect("invalid identifier regex")
});

/// Error returned when a string does not match the identifier grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid identifier: {0:?}")]
pub struct InvalidIdentifier(pub String);

/// A reverse-hostname-style dotted identifier with at least two segments,
/// e.g. `com.example.tool`.
///
/// Each segment matches `[a-zA-Z_][a-zA-Z_0-9]*`. An `Identifier` can only be
/// obtained by parsing, so a held value is always well formed and never needs
/// re-validation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identifier {
    namespace: Vec<String>,
    name: String,
}

impl Identifier {
    /// Checks a string against the dotted-segment grammar without building an
    /// `Identifier`. Pure; performs no I/O.
    pub fn validate(s: &str) -> Result<(), InvalidIdentifier> {
        if IDENTIFIER_REGEX.is_match(s) {
            Ok(())
        } else {
            Err(InvalidIdentifier(s.to_string()))
        }
    }

    /// The leading segments (all but the last).
    pub fn namespace(&self) -> &[String] {
        &self.namespace
    }

    /// The final segment.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl FromStr for Identifier {
    type Err = InvalidIdentifier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::validate(s)?;
        let mut segments: Vec<String> = s.split('.').map(str::to_owned).collect();
        let name = segments.pop().expect("validated identifier has segments");
        Ok(Identifier {
            namespace: segments,
            name,
        })
    }
}

impl TryFrom<String> for Identifier {
    type Error = InvalidIdentifier;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Identifier> for String {
    fn from(id: Identifier) -> String {
        id.to_string()
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.namespace {
            write!(f, "{}.", segment)?;
        }
        write!(f, "{}", self.name)
    }
}
