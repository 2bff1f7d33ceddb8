//! The monitoring session
//!
//! A [`Monitor`] owns the rule set and the open files. The host calls
//! [`Monitor::poll`] on a fixed cadence; each poll reads what was appended
//! since the last one and turns matching lines into [`MatchEvent`]s.
//!
//! ```no_run
//! use std::path::PathBuf;
//! use filemon::Monitor;
//!
//! let mut monitor = Monitor::default();
//! monitor.start(&[PathBuf::from("/var/log/app.log")], "patterns.ini".as_ref())?;
//! for event in monitor.poll() {
//!     println!("{}: {}", event.rule_id, event.matched_line);
//! }
//! monitor.stop();
//! # Ok::<(), filemon::StartError>(())
//! ```

use std::path::{Path, PathBuf};
use crate::config::MonitorSettings;
use crate::context;
use crate::error::{ConfigError, FileOpenError, StartError};
use crate::events::{ConfigReport, MatchEvent};
use crate::extractor::LineExtractor;
use crate::matcher::matching_rules;
use crate::patterns::{load_patterns, PatternRule};
use crate::registry::FileRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    Idle,
    Active,
}

/// Outcome of a successful start
#[derive(Debug, Default)]
pub struct StartReport {
    /// Number of rules loaded
    pub rules: usize,
    /// Files now being polled
    pub opened: usize,
    /// Files left out because they could not be opened
    pub failed: Vec<FileOpenError>,
}

pub struct Monitor {
    settings: MonitorSettings,
    extractor: LineExtractor,
    state: MonitorState,
    rules: Vec<PatternRule>,
    files: Vec<PathBuf>,
    registry: FileRegistry,
}

impl Default for Monitor {
    fn default() -> Self {
        Self::new(MonitorSettings::default())
    }
}

impl Monitor {
    pub fn new(settings: MonitorSettings) -> Self {
        let extractor = LineExtractor::new(settings.partial_lines, settings.max_read_bytes);
        Self {
            settings,
            extractor,
            state: MonitorState::Idle,
            rules: Vec::new(),
            files: Vec::new(),
            registry: FileRegistry::new(),
        }
    }

    pub fn settings(&self) -> &MonitorSettings {
        &self.settings
    }

    pub fn state(&self) -> MonitorState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == MonitorState::Active
    }

    pub fn rules(&self) -> &[PatternRule] {
        &self.rules
    }

    /// Load patterns, open the files and begin tracking appended content
    pub fn start(&mut self, files: &[PathBuf], patterns_path: &Path) -> Result<StartReport, StartError> {
        if self.is_active() {
            return Err(StartError::AlreadyActive);
        }
        if files.is_empty() {
            return Err(StartError::NoFiles);
        }
        if patterns_path.as_os_str().is_empty() {
            return Err(StartError::NoPatternsPath);
        }

        let rules = load_patterns(patterns_path)?;

        let failed = self.registry.register_all(files);
        if self.registry.is_empty() && !self.settings.allow_empty_start {
            return Err(StartError::NoReadableFiles);
        }

        self.rules = rules;
        self.files = files.to_vec();
        self.state = MonitorState::Active;
        tracing::info!(
            "Monitoring started: {} of {} files, {} patterns",
            self.registry.len(),
            files.len(),
            self.rules.len()
        );

        Ok(StartReport {
            rules: self.rules.len(),
            opened: self.registry.len(),
            failed,
        })
    }

    /// Release every file. Safe to call in any state.
    pub fn stop(&mut self) {
        self.registry.clear();
        if self.is_active() {
            tracing::info!("Monitoring stopped");
        }
        self.state = MonitorState::Idle;
    }

    /// Replace the rule set. Files and offsets are left alone.
    pub fn reload(&mut self, patterns_path: &Path) -> Result<usize, ConfigError> {
        self.rules = load_patterns(patterns_path)?;
        Ok(self.rules.len())
    }

    /// Read newly appended lines from every file and match them
    pub fn poll(&mut self) -> Vec<MatchEvent> {
        let mut events = Vec::new();
        if !self.is_active() {
            return events;
        }

        for file in self.registry.iter_mut() {
            let offset = file.offset();
            let extracted = match self.extractor.extract(file.handle_mut(), offset) {
                Ok(extracted) => extracted,
                Err(err) => {
                    tracing::warn!("Skipping {} this cycle: {}", file.path().display(), err);
                    continue;
                }
            };

            let batch = &extracted.lines;
            for (index, line) in batch.iter().enumerate() {
                for rule in matching_rules(line, &self.rules) {
                    let window = context::assemble(batch, index, rule.before, rule.after);
                    events.push(
                        MatchEvent::new(file.path().to_path_buf(), rule, line.clone())
                            .with_context(window),
                    );
                }
            }

            if !batch.is_empty() {
                tracing::debug!(
                    "{}: {} new lines, offset {} -> {}",
                    file.path().display(),
                    batch.len(),
                    offset,
                    extracted.offset
                );
            }
            file.advance_to(extracted.offset);
        }

        events
    }

    /// Byte offset of a registered file
    pub fn offset(&self, path: &Path) -> Option<u64> {
        self.registry.get(path).map(|file| file.offset())
    }

    /// Files currently being polled, in poll order
    pub fn monitored_files(&self) -> Vec<PathBuf> {
        self.registry.paths().map(Path::to_path_buf).collect()
    }

    pub fn current_config(&self) -> ConfigReport {
        let files = if self.is_active() {
            self.monitored_files()
        } else {
            self.files.clone()
        };

        ConfigReport {
            files,
            rules: self.rules.iter().map(PatternRule::summary).collect(),
        }
    }
}

impl Drop for Monitor {
    fn drop(&mut self) {
        self.stop();
    }
}
