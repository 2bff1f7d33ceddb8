//! FileMon: report regex matches in lines appended to text files.
//!
//! The crate is a polling engine. [`Monitor`] remembers how far each file has
//! been read; every [`Monitor::poll`] picks up the complete lines written since
//! the previous one, runs the configured [`PatternRule`]s over them and returns
//! one [`MatchEvent`] per matching rule, with before/after context taken from
//! the same batch. Rendering the events is up to the caller.

pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod events;
pub mod extractor;
pub mod filelist;
pub mod matcher;
pub mod monitor;
pub mod patterns;
pub mod registry;
pub mod ticker;

pub use config::{MonitorSettings, PartialLinePolicy};
pub use context::ContextWindow;
pub use error::{ConfigError, FileOpenError, StartError};
pub use events::{AppEvent, ConfigReport, MatchEvent};
pub use extractor::{Extracted, LineExtractor};
pub use filelist::read_file_list;
pub use monitor::{Monitor, MonitorState, StartReport};
pub use patterns::{load_patterns, parse_patterns, PatternRule, RuleSummary};
pub use registry::{FileRegistry, MonitoredFile};
pub use ticker::{parse_command, start_command_reader, start_ticker};
