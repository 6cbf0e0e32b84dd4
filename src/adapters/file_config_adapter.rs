//! INI file configuration adapter.
//!
//! Section and key names are case-insensitive; values keep their case.

use crate::domain::error::SignalsimError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SignalsimError> {
        let path = path.as_ref();
        let mut config = Ini::new();
        config.load(path).map_err(|reason| SignalsimError::ConfigParse {
            file: path.display().to_string(),
            reason,
        })?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, SignalsimError> {
        let mut config = Ini::new();
        config
            .read(content.to_string())
            .map_err(|reason| SignalsimError::ConfigParse {
                file: "<string>".to_string(),
                reason,
            })?;
        Ok(Self { config })
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn reads_values_by_section() {
        let adapter = FileConfigAdapter::from_string(
            "[data]\npath = /srv/prices\nsymbols = AAPL, MSFT\n\n[strategy]\nmethods = macd,rsi\n",
        )
        .unwrap();
        assert_eq!(adapter.get_string("data", "path").as_deref(), Some("/srv/prices"));
        assert_eq!(adapter.get_string("data", "symbols").as_deref(), Some("AAPL, MSFT"));
        assert_eq!(adapter.get_string("strategy", "methods").as_deref(), Some("macd,rsi"));
    }

    #[test]
    fn absent_keys_and_sections_are_none() {
        let adapter = FileConfigAdapter::from_string("[backtest]\ninitial_cash = 100\n").unwrap();
        assert_eq!(adapter.get_string("backtest", "cost_rate"), None);
        assert_eq!(adapter.get_string("rsi", "window"), None);
    }

    #[test]
    fn names_are_case_insensitive() {
        let adapter = FileConfigAdapter::from_string("[RSI]\nWindow = 14\n").unwrap();
        assert_eq!(adapter.get_string("rsi", "window").as_deref(), Some("14"));
    }

    #[test]
    fn from_file_reads_config() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "[report]\noutput_dir = /tmp/out\n").unwrap();
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(adapter.get_string("report", "output_dir").as_deref(), Some("/tmp/out"));
    }

    #[test]
    fn from_file_missing_is_parse_error() {
        let err = FileConfigAdapter::from_file("/nonexistent/path/config.ini").err().unwrap();
        assert!(
            matches!(err, SignalsimError::ConfigParse { file, .. } if file == "/nonexistent/path/config.ini")
        );
    }
}
