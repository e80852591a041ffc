use crate::pattern::NamePattern;
use serde::Deserialize;

/// Option keys a cache container recognizes.
const KNOWN_OPTIONS: &[&str] = &["include", "exclude", "max"];

/// Declarative cache settings, typically embedded in a host config file.
#[derive(Debug, Default, Deserialize)]
pub struct CacheOptions {
    /// Only components whose name matches are cached
    #[serde(default)]
    pub include: Option<NamePattern>,
    /// Components whose name matches are never cached
    #[serde(default)]
    pub exclude: Option<NamePattern>,
    /// Upper bound on the number of cached entries
    #[serde(default)]
    pub max: Option<MaxEntries>,
}

/// Entry bound as hosts supply it: a number or a numeric string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MaxEntries {
    Count(i64),
    Text(String),
}

impl MaxEntries {
    /// Effective bound. `None` disables eviction entirely: a value that
    /// fails to parse, or parses to zero or below, imposes no bound.
    pub fn bound(&self) -> Option<usize> {
        let n = match self {
            Self::Count(n) => *n,
            Self::Text(s) => s.trim().parse().ok()?,
        };
        usize::try_from(n).ok().filter(|n| *n > 0)
    }
}

impl From<usize> for MaxEntries {
    fn from(n: usize) -> Self {
        Self::Count(n as i64)
    }
}

/// Calculate Levenshtein distance between two strings
fn edit_distance(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();

    // Two rows instead of the full matrix
    let mut prev: Vec<usize> = (0..=b_chars.len()).collect();
    for (i, a_char) in a.chars().enumerate() {
        let mut curr = vec![i + 1];
        for (j, b_char) in b_chars.iter().enumerate() {
            let cost = usize::from(a_char != *b_char);
            curr.push((prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost));
        }
        prev = curr;
    }

    prev[b_chars.len()]
}

/// Find the closest known option name for an unknown key
fn find_similar(unknown: &str) -> Option<&'static str> {
    let unknown_lower = unknown.to_lowercase();

    KNOWN_OPTIONS
        .iter()
        .map(|candidate| (*candidate, edit_distance(&unknown_lower, candidate)))
        .filter(|(candidate, distance)| {
            // Only suggest when the distance is reasonable for the length
            let max_len = unknown.len().max(candidate.len());
            *distance <= (max_len / 2).max(3)
        })
        .min_by_key(|(_, distance)| *distance)
        .map(|(candidate, _)| candidate)
}

/// Format an unknown-option warning with an optional suggestion
fn format_unknown_warning(key: &str, suggestion: Option<&str>) -> String {
    match suggestion {
        Some(s) => format!("Unknown cache option: {} (did you mean: {}?)", key, s),
        None => format!("Unknown cache option: {}", key),
    }
}

impl CacheOptions {
    /// Parse options from a TOML fragment.
    ///
    /// Unknown keys do not fail the parse; they are collected as warnings,
    /// with a "did you mean" suggestion when a known option is close.
    pub fn from_toml_str(contents: &str) -> color_eyre::Result<(Self, Vec<String>)> {
        let table: toml::Table = toml::from_str(contents)?;

        let mut warnings = Vec::new();
        for key in table.keys() {
            if !KNOWN_OPTIONS.contains(&key.as_str()) {
                warnings.push(format_unknown_warning(key, find_similar(key)));
            }
        }

        let options: Self = table.try_into()?;
        Ok((options, warnings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bound_accepts_positive_integers_only() {
        assert_eq!(MaxEntries::Count(3).bound(), Some(3));
        assert_eq!(MaxEntries::Text("12".to_string()).bound(), Some(12));
        assert_eq!(MaxEntries::Text(" 2 ".to_string()).bound(), Some(2));

        // Unparseable or non-positive values disable the bound
        assert_eq!(MaxEntries::Text("many".to_string()).bound(), None);
        assert_eq!(MaxEntries::Text("".to_string()).bound(), None);
        assert_eq!(MaxEntries::Count(0).bound(), None);
        assert_eq!(MaxEntries::Count(-1).bound(), None);
    }

    #[test]
    fn test_from_toml_str_full() {
        let (options, warnings) = CacheOptions::from_toml_str(
            r#"
            include = "Queue,Library"
            exclude = { regex = "Popup$" }
            max = "10"
            "#,
        )
        .unwrap();

        assert!(warnings.is_empty());
        assert!(options.include.unwrap().matches("Queue"));
        assert!(options.exclude.unwrap().matches("HelpPopup"));
        assert_eq!(options.max.unwrap().bound(), Some(10));
    }

    #[test]
    fn test_from_toml_str_defaults() {
        let (options, warnings) = CacheOptions::from_toml_str("").unwrap();
        assert!(warnings.is_empty());
        assert!(options.include.is_none());
        assert!(options.exclude.is_none());
        assert!(options.max.is_none());
    }

    #[test]
    fn test_unknown_key_warns_with_suggestion() {
        let (options, warnings) = CacheOptions::from_toml_str(
            r#"
            inclde = "Queue"
            max = 5
            "#,
        )
        .unwrap();

        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("inclde"));
        assert!(warnings[0].contains("did you mean: include?"));
        // Known keys still parse
        assert_eq!(options.max.unwrap().bound(), Some(5));
        assert!(options.include.is_none());
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(CacheOptions::from_toml_str("max = [not toml").is_err());
    }
}
