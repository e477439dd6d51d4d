//! Reading latency samples from text files.
//!
//! Sample files hold signed integers separated by whitespace, usually one per
//! line. Blank lines are ignored.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while loading a sample file.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A token is not a signed integer.
    #[error("Invalid sample '{token}' on line {line}")]
    InvalidSample { line: usize, token: String },

    /// A token in a named file is not a signed integer.
    #[error("{path}: invalid sample '{token}' on line {line}")]
    InvalidSampleInFile {
        path: PathBuf,
        line: usize,
        token: String,
    },
}

/// Parse whitespace-delimited signed integers, preserving their order.
///
/// # Errors
///
/// Returns [`LoadError::InvalidSample`] naming the 1-based line of the first
/// token that is not an integer.
pub fn parse_samples(text: &str) -> Result<Vec<i64>, LoadError> {
    let mut samples = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        for token in line.split_whitespace() {
            let value = token.parse::<i64>().map_err(|_| LoadError::InvalidSample {
                line: idx + 1,
                token: token.to_string(),
            })?;
            samples.push(value);
        }
    }

    Ok(samples)
}

/// Load the samples stored in `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or contains a non-integer token.
pub fn load_samples(path: &Path) -> Result<Vec<i64>, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    parse_samples(&text).map_err(|e| match e {
        LoadError::InvalidSample { line, token } => LoadError::InvalidSampleInFile {
            path: path.to_path_buf(),
            line,
            token,
        },
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_one_per_line() {
        assert_eq!(parse_samples("1\n19\n1\n").unwrap(), vec![1, 19, 1]);
    }

    #[test]
    fn test_parse_mixed_whitespace() {
        let samples = parse_samples("  12 1\t1\r\n\n-4   7\n").unwrap();
        assert_eq!(samples, vec![12, 1, 1, -4, 7]);
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse_samples("").unwrap().is_empty());
        assert!(parse_samples("\n  \n").unwrap().is_empty());
    }

    #[test]
    fn test_parse_reports_line_and_token() {
        let err = parse_samples("1\n2\n3.5\n").unwrap_err();
        match err {
            LoadError::InvalidSample { line, token } => {
                assert_eq!(line, 3);
                assert_eq!(token, "3.5");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"1\n1\n19\n").unwrap();

        assert_eq!(load_samples(file.path()).unwrap(), vec![1, 1, 19]);
    }

    #[test]
    fn test_load_invalid_names_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"1\nabc\n").unwrap();

        let err = load_samples(file.path()).unwrap_err();
        assert!(matches!(err, LoadError::InvalidSampleInFile { line: 2, .. }));
        assert!(err.to_string().contains("abc"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_samples(Path::new("/nonexistent/samples.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
