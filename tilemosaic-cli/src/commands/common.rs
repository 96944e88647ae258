//! Common helpers shared across CLI commands.

use std::io::Write;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tilemosaic::config::ViewerConfig;
use tracing::debug;

use crate::error::CliError;

/// Load the viewer config from `path`, or defaults when none is given.
pub fn load_config(path: Option<&Path>) -> Result<ViewerConfig, CliError> {
    match path {
        Some(path) => {
            debug!(path = %path.display(), "loading viewer config");
            Ok(ViewerConfig::load(path)?)
        }
        None => Ok(ViewerConfig::default()),
    }
}

/// Read and deserialize a JSON input file.
pub fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let contents = read_file(path)?;
    serde_json::from_str(&contents).map_err(|source| CliError::InvalidInput {
        path: path.to_path_buf(),
        source,
    })
}

/// Read an input file to a string.
pub fn read_file(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Print `value` as pretty JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    write_json(stdout.lock(), value)
}

/// Write `value` as pretty JSON followed by a newline.
pub fn write_json<W: Write, T: Serialize + ?Sized>(
    mut writer: W,
    value: &T,
) -> Result<(), CliError> {
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer).map_err(serde_json::Error::io)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_config_defaults_without_path() {
        let config = load_config(None).unwrap();
        assert_eq!(config, ViewerConfig::default());
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[pyramid]\nmax_zoom = 4").unwrap();
        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.max_zoom, 4);
    }

    #[test]
    fn test_read_json_reports_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ broken").unwrap();
        let err = read_json_file::<serde_json::Value>(file.path()).unwrap_err();
        assert!(matches!(err, CliError::InvalidInput { .. }));
    }

    #[test]
    fn test_write_json_appends_newline() {
        let mut out = Vec::new();
        write_json(&mut out, &vec![1, 2]).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with("]\n"));
    }
}
