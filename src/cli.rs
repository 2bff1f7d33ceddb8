use std::path::PathBuf;
use clap::{Parser, ValueEnum};
use crate::config::{MonitorSettings, PartialLinePolicy};
use crate::error::ConfigError;
use crate::filelist::read_file_list;

#[derive(Parser)]
#[command(name = "filemon")]
#[command(author = "FileMon Contributors")]
#[command(version)]
#[command(about = "Watch text files for appended lines matching regex patterns")]
#[command(long_about = "FileMon polls the given files at a fixed interval, reads only the lines appended since monitoring started, and reports lines that match the rules in a patterns INI file, with optional surrounding context.")]
pub struct Cli {
    /// Files to monitor
    #[arg(value_name = "FILES", help = "Files to monitor")]
    pub files: Vec<PathBuf>,

    /// Text file listing files to monitor, one per line
    #[arg(short = 'l', long, value_name = "PATH", help = "File with one path per line")]
    pub file_list: Option<PathBuf>,

    /// Pattern rules file
    #[arg(short, long, value_name = "PATH", help = "Patterns INI file")]
    pub patterns: PathBuf,

    /// TOML settings file
    #[arg(long, value_name = "PATH", help = "Settings file (TOML)")]
    pub config: Option<PathBuf>,

    /// Polling interval in milliseconds
    #[arg(long, help = "Polling interval in ms")]
    pub poll_interval: Option<u64>,

    /// Output format
    #[arg(long, default_value = "text", help = "Output format")]
    pub output: OutputFormat,

    /// Refuse to start when no file could be opened
    #[arg(long, help = "Fail when none of the files can be opened")]
    pub require_files: bool,

    /// Report a trailing line before its newline is written
    #[arg(long, help = "Report unterminated trailing lines immediately")]
    pub emit_partial_lines: bool,

    /// Enable verbose logging
    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    /// Disable colors in output
    #[arg(long, help = "Disable colored output")]
    pub no_color: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Timestamped lines with context (default)
    Text,
    /// One line per match
    Compact,
    /// JSON object per match, for scripting
    Json,
}

impl Cli {
    /// Files from the command line followed by those from `--file-list`
    pub fn get_files(&self) -> Result<Vec<PathBuf>, ConfigError> {
        let mut files = self.files.clone();
        if let Some(list) = &self.file_list {
            files.extend(read_file_list(list)?);
        }
        Ok(files)
    }

    /// Defaults, then the settings file, then the environment, then flags
    pub fn settings(&self) -> Result<MonitorSettings, ConfigError> {
        let mut settings = match &self.config {
            Some(path) => MonitorSettings::load_from_path(path)?,
            None => MonitorSettings::default(),
        }
        .apply_env();

        if let Some(ms) = self.poll_interval {
            settings.poll_interval_ms = ms;
        }
        if self.require_files {
            settings.allow_empty_start = false;
        }
        if self.emit_partial_lines {
            settings.partial_lines = PartialLinePolicy::Emit;
        }

        settings.validate()?;
        Ok(settings)
    }

    pub fn setup_logging(&self) {
        let level = if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        };

        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .init();
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.files.is_empty() && self.file_list.is_none() {
            return Err("No files to monitor: pass FILES or --file-list".to_string());
        }

        if !self.patterns.is_file() {
            return Err(format!("Patterns file does not exist: {}", self.patterns.display()));
        }

        if self.poll_interval == Some(0) {
            return Err("Poll interval must be greater than 0".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_flags_override_settings() {
        let cli = Cli::parse_from([
            "filemon",
            "--patterns",
            "p.ini",
            "--poll-interval",
            "250",
            "--require-files",
            "--emit-partial-lines",
            "a.log",
        ]);

        let settings = cli.settings().unwrap();

        assert_eq!(settings.poll_interval_ms, 250);
        assert!(!settings.allow_empty_start);
        assert_eq!(settings.partial_lines, PartialLinePolicy::Emit);
        assert_eq!(cli.files, vec![PathBuf::from("a.log")]);
    }

    #[test]
    fn test_file_list_appends_to_files() {
        let dir = TempDir::new().unwrap();
        let list = dir.path().join("files.txt");
        fs::write(&list, "b.log\n\nc.log\n").unwrap();

        let args: Vec<OsString> = vec![
            "filemon".into(),
            "-p".into(),
            "p.ini".into(),
            "-l".into(),
            list.into_os_string(),
            "a.log".into(),
        ];
        let cli = Cli::parse_from(args);

        let files = cli.get_files().unwrap();
        assert_eq!(
            files,
            vec![PathBuf::from("a.log"), PathBuf::from("b.log"), PathBuf::from("c.log")]
        );
    }

    #[test]
    fn test_validate_needs_some_files() {
        let dir = TempDir::new().unwrap();
        let ini = dir.path().join("p.ini");
        fs::write(&ini, "").unwrap();

        let args: Vec<OsString> = vec!["filemon".into(), "-p".into(), ini.into_os_string()];
        let cli = Cli::parse_from(args);

        assert!(cli.validate().is_err());
    }
}
