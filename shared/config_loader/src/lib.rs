//! # Config Loader
//!
//! Small helper library for locating and reading configuration files.
//! It finds a file in the usual places, hands back its content, and can
//! split the simple `key = value` format used by the client's `app.conf`.
//! Interpretation of the values stays with the consumer.
//!
//! ```no_run
//! use config_loader::{find_and_load, parse_key_values};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let content = find_and_load("app.conf")?;
//!     for (key, value) in parse_key_values(&content) {
//!         println!("{} = {}", key, value);
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;

pub use error::{ConfigError, Result};

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Reads a configuration file into a `String`.
///
/// No parsing or validation happens here; the consumer decides what the
/// content means.
///
/// # Errors
///
/// Returns [`ConfigError::FileNotFound`] if the path does not exist and
/// [`ConfigError::ReadError`] if it cannot be read.
pub fn load_config_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    fs::read_to_string(path).map_err(|e| ConfigError::ReadError(e.to_string()))
}

/// Locates a configuration file, checking in order:
///
/// 1. the `CONFIG_PATH` environment variable (if set and existing)
/// 2. `./config/{filename}`
/// 3. `./{filename}`
///
/// # Errors
///
/// Returns [`ConfigError::FileNotFound`] when none of the locations hold
/// the file.
pub fn find_config_file(filename: &str) -> Result<PathBuf> {
    if let Ok(path) = env::var("CONFIG_PATH") {
        let path_buf = PathBuf::from(&path);
        if path_buf.exists() {
            return Ok(path_buf);
        }
    }

    let config_dir = PathBuf::from("./config").join(filename);
    if config_dir.exists() {
        return Ok(config_dir);
    }

    let current_dir = PathBuf::from("./").join(filename);
    if current_dir.exists() {
        return Ok(current_dir);
    }

    Err(ConfigError::FileNotFound(format!(
        "'{}' not found. Searched: CONFIG_PATH env var, ./config/{}, ./{}",
        filename, filename, filename
    )))
}

/// Locates and reads a configuration file in one step.
///
/// # Errors
///
/// Propagates the errors of [`find_config_file`] and [`load_config_file`].
pub fn find_and_load(filename: &str) -> Result<String> {
    let path = find_config_file(filename)?;
    load_config_file(path)
}

/// Splits `key = value` content into trimmed pairs.
///
/// Blank lines and lines starting with `#` are skipped, as are lines
/// without a `=`. Keys and values keep their inner spacing but lose
/// surrounding whitespace.
pub fn parse_key_values(content: &str) -> Vec<(String, String)> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            line.split_once('=')
                .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_load_nonexistent_file() {
        let result = load_config_file("/path/that/does/not/exist.conf");
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.conf");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "server_url = local://demo").unwrap();

        let content = load_config_file(&path).unwrap();
        assert!(content.contains("server_url"));
    }

    #[test]
    fn test_find_nonexistent_file() {
        let result = find_config_file("file_that_definitely_does_not_exist_31415.conf");
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_key_values_skips_comments_and_blanks() {
        let content = "\n# comment line\nserver_url = local://demo\n\nlog_level=debug\n";
        let pairs = parse_key_values(content);
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0], ("server_url".to_string(), "local://demo".to_string()));
        assert_eq!(pairs[1], ("log_level".to_string(), "debug".to_string()));
    }

    #[test]
    fn test_parse_key_values_ignores_lines_without_separator() {
        let pairs = parse_key_values("not a pair\nkey = value");
        assert_eq!(pairs, vec![("key".to_string(), "value".to_string())]);
    }

    #[test]
    fn test_parse_key_values_keeps_value_with_equals() {
        let pairs = parse_key_values("token = abc=def");
        assert_eq!(pairs[0].1, "abc=def");
    }
}
