use std::fmt;
use std::path::PathBuf;
use chrono::{DateTime, Local};
use serde::Serialize;
use crate::context::ContextWindow;
use crate::patterns::{PatternRule, RuleSummary};

/// One rule matching one newly appended line
#[derive(Debug, Clone, Serialize)]
pub struct MatchEvent {
    pub timestamp: DateTime<Local>,
    pub file_path: PathBuf,
    pub rule_id: String,
    pub pattern: String,
    pub matched_line: String,
    pub context_before: Vec<String>,
    pub context_after: Vec<String>,
    /// Presentation hint only; the host decides what it looks like
    pub highlight: bool,
}

impl MatchEvent {
    pub fn new(file_path: PathBuf, rule: &PatternRule, matched_line: String) -> Self {
        Self {
            timestamp: Local::now(),
            file_path,
            rule_id: rule.id.clone(),
            pattern: rule.pattern().to_string(),
            matched_line,
            context_before: Vec::new(),
            context_after: Vec::new(),
            highlight: rule.highlight,
        }
    }

    pub fn with_context(mut self, window: ContextWindow) -> Self {
        self.context_before = window.before;
        self.context_after = window.after;
        self
    }
}

/// The active configuration as plain facts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConfigReport {
    pub files: Vec<PathBuf>,
    pub rules: Vec<RuleSummary>,
}

impl fmt::Display for ConfigReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "---- Current Configuration ----")?;
        writeln!(f, "Files to monitor:")?;
        for file in &self.files {
            writeln!(f, "  {}", file.display())?;
        }
        writeln!(f, "Active patterns:")?;
        for rule in &self.rules {
            writeln!(
                f,
                "  Pattern: \"{}\" | Highlight: {} | Before: {} | After: {}",
                rule.pattern,
                if rule.highlight { "Yes" } else { "No" },
                rule.before,
                rule.after
            )?;
        }
        write!(f, "------------------------------")
    }
}

/// Messages driving the host loop
#[derive(Debug, Clone)]
pub enum AppEvent {
    Tick,
    /// Re-read the patterns file
    Reload,
    Quit,
}
