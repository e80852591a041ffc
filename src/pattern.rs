//! Name matching for include/exclude cache filters.
//!
//! A filter comes in one of three shapes: a comma-separated string of
//! literal names, an explicit list of names, or a regular expression
//! tested against the whole name. Exactly one shape applies per filter.

use regex::Regex;
use serde::{Deserialize, Deserializer};

/// A component-name filter.
#[derive(Debug, Clone)]
pub enum NamePattern {
    /// Comma-separated literal names, e.g. `"Queue,Library"`
    Literal(String),
    /// Explicit list of literal names
    List(Vec<String>),
    /// Regular expression tested against the name
    Pattern(Regex),
}

impl NamePattern {
    /// Build a regex-backed filter from a pattern string.
    pub fn regex(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self::Pattern(Regex::new(pattern)?))
    }

    /// Whether `name` matches this filter.
    ///
    /// Literal shapes compare whole names; the regex shape matches
    /// anywhere in the name unless anchored.
    pub fn matches(&self, name: &str) -> bool {
        match self {
            Self::Literal(csv) => csv.split(',').any(|n| n == name),
            Self::List(names) => names.iter().any(|n| n == name),
            Self::Pattern(re) => re.is_match(name),
        }
    }
}

impl<'de> Deserialize<'de> for NamePattern {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            List(Vec<String>),
            Literal(String),
            Regex { regex: String },
        }

        match Raw::deserialize(deserializer)? {
            Raw::List(names) => Ok(Self::List(names)),
            Raw::Literal(csv) => Ok(Self::Literal(csv)),
            Raw::Regex { regex } => Regex::new(&regex)
                .map(Self::Pattern)
                .map_err(serde::de::Error::custom),
        }
    }
}
