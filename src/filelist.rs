use std::path::{Path, PathBuf};
use crate::error::ConfigError;

/// Read a text file listing one path per line. Blank lines are skipped.
pub fn read_file_list<P: AsRef<Path>>(path: P) -> Result<Vec<PathBuf>, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(parse_file_list(&content))
}

pub fn parse_file_list(content: &str) -> Vec<PathBuf> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(PathBuf::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trims_and_skips_blanks() {
        let files = parse_file_list("  /var/log/a.log \n\n\t\n/var/log/b.log\r\n");
        assert_eq!(files, vec![PathBuf::from("/var/log/a.log"), PathBuf::from("/var/log/b.log")]);
    }

    #[test]
    fn test_missing_list_is_an_error() {
        assert!(read_file_list("/no/such/list.txt").is_err());
    }
}
