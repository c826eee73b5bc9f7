use crate::release_analysis::domain::{ComponentKey, ComponentMetadata};
use crate::shared::Result;
use std::cell::Cell;
use std::fmt;

/// Maximum number of exclude patterns to prevent DoS attacks
const MAX_EXCLUDE_PATTERNS: usize = 64;

/// Maximum length of a single exclude pattern to prevent DoS attacks
const MAX_PATTERN_LENGTH: usize = 255;

/// Why a component was left out of the release graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExclusionReason {
    Pattern(String),
    Unmanaged,
}

impl fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExclusionReason::Pattern(pattern) => write!(f, "excluded by pattern '{}'", pattern),
            ExclusionReason::Unmanaged => write!(f, "not managed by the analysed project set"),
        }
    }
}

/// ComponentFilter - decides which components take part in release grouping
///
/// Patterns match the `group:name` coordinate and support `*` for zero or
/// more characters. Unmanaged components are dropped unless explicitly
/// included.
#[derive(Debug)]
pub struct ComponentFilter {
    patterns: Vec<ExcludePattern>,
    include_unmanaged: bool,
}

impl ComponentFilter {
    /// # Errors
    /// - Too many patterns (> MAX_EXCLUDE_PATTERNS)
    /// - Invalid pattern format (length, characters)
    pub fn new(patterns: Vec<String>, include_unmanaged: bool) -> Result<Self> {
        if patterns.len() > MAX_EXCLUDE_PATTERNS {
            anyhow::bail!(
                "Too many exclusion patterns: {} (maximum: {})",
                patterns.len(),
                MAX_EXCLUDE_PATTERNS
            );
        }

        let patterns = patterns
            .into_iter()
            .map(ExcludePattern::new)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            patterns,
            include_unmanaged,
        })
    }

    /// Returns why `key` is excluded, or `None` if it stays
    pub fn exclusion(&self, key: &ComponentKey, metadata: &ComponentMetadata) -> Option<ExclusionReason> {
        let coordinate = key.coordinate();
        // Every pattern is checked so unmatched-pattern reporting stays accurate.
        let mut matched = None;
        for pattern in &self.patterns {
            if pattern.matches(&coordinate) && matched.is_none() {
                matched = Some(ExclusionReason::Pattern(pattern.original.clone()));
            }
        }
        if matched.is_some() {
            return matched;
        }

        if !self.include_unmanaged && !metadata.is_managed() {
            return Some(ExclusionReason::Unmanaged);
        }
        None
    }

    /// Patterns that have not matched any component so far
    pub fn unmatched_patterns(&self) -> Vec<String> {
        self.patterns
            .iter()
            .filter(|p| !p.matched.get())
            .map(|p| p.original.clone())
            .collect()
    }
}

#[derive(Debug)]
struct ExcludePattern {
    original: String,
    segments: Vec<String>,
    matched: Cell<bool>,
}

impl ExcludePattern {
    fn new(pattern: String) -> Result<Self> {
        validate_pattern(&pattern)?;
        let segments = pattern.split('*').map(str::to_string).collect();
        Ok(Self {
            original: pattern,
            segments,
            matched: Cell::new(false),
        })
    }

    fn matches(&self, coordinate: &str) -> bool {
        let is_match = wildcard_match(&self.segments, coordinate);
        if is_match {
            self.matched.set(true);
        }
        is_match
    }
}

/// Anchored wildcard match over the literal segments between `*`s
fn wildcard_match(segments: &[String], text: &str) -> bool {
    let (first, rest) = match segments.split_first() {
        Some(split) => split,
        None => return text.is_empty(),
    };
    if rest.is_empty() {
        return text == first;
    }
    if !text.starts_with(first.as_str()) {
        return false;
    }

    let mut remaining = &text[first.len()..];
    let (last, middle) = match rest.split_last() {
        Some(split) => split,
        None => return true,
    };
    for segment in middle {
        match remaining.find(segment.as_str()) {
            Some(pos) => remaining = &remaining[pos + segment.len()..],
            None => return false,
        }
    }
    remaining.len() >= last.len() && remaining.ends_with(last.as_str())
}

fn validate_pattern(pattern: &str) -> Result<()> {
    if pattern.is_empty() {
        anyhow::bail!("Exclusion pattern cannot be empty");
    }

    if pattern.len() > MAX_PATTERN_LENGTH {
        anyhow::bail!(
            "Exclusion pattern is too long: '{}' ({} chars). Maximum: {} chars",
            pattern,
            pattern.len(),
            MAX_PATTERN_LENGTH
        );
    }

    for ch in pattern.chars() {
        if !is_valid_pattern_char(ch) {
            anyhow::bail!(
                "Exclusion pattern contains invalid character '{}' in pattern '{}'. \
                 Only alphanumeric, hyphens, underscores, dots, colons and asterisks (*) are allowed.",
                ch,
                pattern
            );
        }
    }

    if pattern.chars().all(|c| c == '*') {
        anyhow::bail!(
            "Exclusion pattern cannot contain only wildcards: '{}'",
            pattern
        );
    }

    Ok(())
}

fn is_valid_pattern_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | ':' | '*')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(group: &str, name: &str) -> ComponentKey {
        ComponentKey::new(group.to_string(), name.to_string(), "1.0".to_string()).unwrap()
    }

    fn managed() -> ComponentMetadata {
        ComponentMetadata::new(None, true)
    }

    fn filter(patterns: &[&str]) -> ComponentFilter {
        ComponentFilter::new(patterns.iter().map(|p| p.to_string()).collect(), false).unwrap()
    }

    #[test]
    fn test_exact_coordinate() {
        let f = filter(&["org.acme:core"]);
        assert!(f.exclusion(&key("org.acme", "core"), &managed()).is_some());
        assert!(f.exclusion(&key("org.acme", "core-api"), &managed()).is_none());
    }

    #[test]
    fn test_group_wildcard() {
        let f = filter(&["org.acme:*"]);
        assert!(f.exclusion(&key("org.acme", "core"), &managed()).is_some());
        assert!(f.exclusion(&key("org.acme.tools", "core"), &managed()).is_none());
    }

    #[test]
    fn test_suffix_and_middle_wildcards() {
        let f = filter(&["*:*-test*"]);
        assert!(f.exclusion(&key("org.acme", "core-testkit"), &managed()).is_some());
        assert!(f.exclusion(&key("com.other", "db-test"), &managed()).is_some());
        assert!(f.exclusion(&key("org.acme", "core"), &managed()).is_none());
    }

    #[test]
    fn test_wildcard_is_anchored() {
        let f = filter(&["org.*:core"]);
        assert!(f.exclusion(&key("org.acme", "core"), &managed()).is_some());
        assert!(f.exclusion(&key("com.org.acme", "core"), &managed()).is_none());
        assert!(f.exclusion(&key("org.acme", "core-extra"), &managed()).is_none());
    }

    #[test]
    fn test_exclusion_reason() {
        let f = filter(&["org.acme:core"]);
        let reason = f.exclusion(&key("org.acme", "core"), &managed()).unwrap();
        assert_eq!(reason, ExclusionReason::Pattern("org.acme:core".to_string()));
        assert_eq!(reason.to_string(), "excluded by pattern 'org.acme:core'");
    }

    #[test]
    fn test_unmanaged_components() {
        let unmanaged = ComponentMetadata::new(None, false);
        let f = filter(&[]);
        assert_eq!(
            f.exclusion(&key("com.other", "lib"), &unmanaged),
            Some(ExclusionReason::Unmanaged)
        );

        let inclusive = ComponentFilter::new(Vec::new(), true).unwrap();
        assert!(inclusive.exclusion(&key("com.other", "lib"), &unmanaged).is_none());
    }

    #[test]
    fn test_unmatched_patterns() {
        let f = filter(&["org.acme:core", "org.acme:missing", "*:util"]);
        f.exclusion(&key("org.acme", "core"), &managed());
        f.exclusion(&key("com.other", "util"), &managed());
        assert_eq!(f.unmatched_patterns(), vec!["org.acme:missing".to_string()]);
    }

    #[test]
    fn test_invalid_patterns() {
        assert!(ComponentFilter::new(vec!["".to_string()], false).is_err());
        assert!(ComponentFilter::new(vec!["**".to_string()], false).is_err());
        assert!(ComponentFilter::new(vec!["org/acme".to_string()], false).is_err());
        assert!(ComponentFilter::new(vec!["a".repeat(256)], false).is_err());
        let many: Vec<String> = (0..65).map(|i| format!("p{}", i)).collect();
        assert!(ComponentFilter::new(many, false).is_err());
    }
}
