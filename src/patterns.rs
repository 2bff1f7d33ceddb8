//! Pattern rule loading
//!
//! Rules are read from an INI-style file of `<group>.<attribute> = value`
//! lines. Each group becomes one [`PatternRule`]:
//!
//! ```ini
//! err.pattern = ERROR
//! err.highlight = yes
//! err.before = 1
//! err.after = 1
//!
//! [timeout]
//! pattern = timed out after \d+ms
//! ```
//!
//! Groups keep the order in which they first appear in the file. When several
//! rules match one line, their events come out in that order.

use std::collections::HashMap;
use std::path::Path;
use regex::Regex;
use serde::Serialize;
use crate::error::ConfigError;

const DEFAULT_SECTION: &str = "General";

/// A compiled pattern plus its highlight/context policy
#[derive(Debug, Clone)]
pub struct PatternRule {
    pub id: String,
    pub regex: Regex,
    pub highlight: bool,
    pub before: usize,
    pub after: usize,
}

impl PatternRule {
    /// Source text of the compiled pattern
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    pub fn summary(&self) -> RuleSummary {
        RuleSummary {
            id: self.id.clone(),
            pattern: self.pattern().to_string(),
            highlight: self.highlight,
            before: self.before,
            after: self.after,
        }
    }
}

/// Plain-data view of a rule for reporting
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleSummary {
    pub id: String,
    pub pattern: String,
    pub highlight: bool,
    pub before: usize,
    pub after: usize,
}

/// Attributes of one group, in first-appearance order of the group
#[derive(Debug, Default)]
struct PatternGroups {
    order: Vec<String>,
    attrs: HashMap<String, HashMap<String, String>>,
}

impl PatternGroups {
    fn insert(&mut self, group: &str, attr: &str, value: String) {
        if !self.attrs.contains_key(group) {
            self.order.push(group.to_string());
        }
        self.attrs
            .entry(group.to_string())
            .or_default()
            .insert(attr.to_string(), value);
    }

    fn iter(&self) -> impl Iterator<Item = (&str, &HashMap<String, String>)> {
        self.order
            .iter()
            .filter_map(|name| self.attrs.get(name).map(|attrs| (name.as_str(), attrs)))
    }
}

/// Load rules from a pattern file
pub fn load_patterns<P: AsRef<Path>>(path: P) -> Result<Vec<PatternRule>, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let rules = parse_patterns(&content);
    tracing::info!("Loaded {} patterns from {}", rules.len(), path.display());
    Ok(rules)
}

/// Parse rules from pattern file content. Bad groups are skipped, never fatal.
pub fn parse_patterns(content: &str) -> Vec<PatternRule> {
    let groups = group_keys(content);

    groups
        .iter()
        .filter_map(|(name, attrs)| build_rule(name, attrs))
        .collect()
}

fn group_keys(content: &str) -> PatternGroups {
    let mut groups = PatternGroups::default();
    let mut section: Option<String> = None;

    for (number, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
            continue;
        }

        if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            let name = name.trim();
            section = if name.is_empty() || name.eq_ignore_ascii_case(DEFAULT_SECTION) {
                None
            } else {
                Some(name.to_string())
            };
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            tracing::debug!("Ignoring pattern file line {}: no '='", number + 1);
            continue;
        };

        let key = match &section {
            Some(section) => format!("{}.{}", section, key.trim()),
            None => key.trim().to_string(),
        };

        // Group must be non-empty; everything after the first dot is the attribute
        match key.split_once('.') {
            Some((group, attr)) if !group.is_empty() => {
                groups.insert(group, attr, unquote(value.trim()).to_string());
            }
            _ => tracing::debug!("Ignoring key without group: {}", key),
        }
    }

    groups
}

fn build_rule(id: &str, attrs: &HashMap<String, String>) -> Option<PatternRule> {
    let source = attrs.get("pattern").map(String::as_str).unwrap_or_default();
    if source.is_empty() {
        tracing::info!("Skipping pattern group '{}': no pattern", id);
        return None;
    }

    let regex = match Regex::new(source) {
        Ok(regex) => regex,
        Err(err) => {
            tracing::info!("Skipping pattern group '{}': invalid regex: {}", id, err);
            return None;
        }
    };

    let highlight = attrs
        .get("highlight")
        .map(|v| v.eq_ignore_ascii_case("yes"))
        .unwrap_or(false);

    Some(PatternRule {
        id: id.to_string(),
        regex,
        highlight,
        before: count_attr(attrs, "before"),
        after: count_attr(attrs, "after"),
    })
}

/// Non-numeric or negative counts fall back to zero
fn count_attr(attrs: &HashMap<String, String>, name: &str) -> usize {
    attrs
        .get(name)
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(0)
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(rules: &[PatternRule]) -> Vec<&str> {
        rules.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_full_group() {
        let rules = parse_patterns(
            "err.pattern = ERROR\nerr.highlight = YES\nerr.before = 1\nerr.after = 2\n",
        );

        assert_eq!(rules.len(), 1);
        let rule = &rules[0];
        assert_eq!(rule.id, "err");
        assert_eq!(rule.pattern(), "ERROR");
        assert!(rule.highlight);
        assert_eq!((rule.before, rule.after), (1, 2));
    }

    #[test]
    fn test_defaults_for_optional_attributes() {
        let rules = parse_patterns("warn.pattern = WARN\nwarn.highlight = true\nwarn.before = lots\nwarn.after = -3\n");

        assert_eq!(rules.len(), 1);
        assert!(!rules[0].highlight);
        assert_eq!(rules[0].before, 0);
        assert_eq!(rules[0].after, 0);
    }

    #[test]
    fn test_group_without_pattern_is_skipped() {
        let rules = parse_patterns("quiet.before = 3\nquiet.highlight = yes\nempty.pattern =\n");
        assert!(rules.is_empty());
    }

    #[test]
    fn test_invalid_regex_is_skipped() {
        let rules = parse_patterns("bad.pattern = (unclosed\ngood.pattern = fine\n");
        assert_eq!(ids(&rules), vec!["good"]);
    }

    #[test]
    fn test_groups_keep_first_appearance_order() {
        let rules = parse_patterns(
            "zeta.pattern = z\nalpha.pattern = a\nzeta.before = 2\nmid.pattern = m\n",
        );

        assert_eq!(ids(&rules), vec!["zeta", "alpha", "mid"]);
        assert_eq!(rules[0].before, 2);
    }

    #[test]
    fn test_sections_prefix_keys() {
        let content = "\
; comment
[General]
top.pattern = TOP

[timeout]
pattern = \"timed out after \\d+ms\"
after = 1
";
        let rules = parse_patterns(content);

        assert_eq!(ids(&rules), vec!["top", "timeout"]);
        assert_eq!(rules[1].pattern(), r"timed out after \d+ms");
        assert_eq!(rules[1].after, 1);
    }

    #[test]
    fn test_keys_without_group_are_ignored() {
        let rules = parse_patterns("a.pattern = x\n.pattern = orphan\nnodot = y\n# a.pattern = hidden\n");
        assert_eq!(ids(&rules), vec!["a"]);
    }

    #[test]
    fn test_repeated_key_overwrites() {
        let rules = parse_patterns("r.pattern = first\nr.pattern = second\n");
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].pattern(), "second");
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = load_patterns("/definitely/not/here/patterns.ini").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
