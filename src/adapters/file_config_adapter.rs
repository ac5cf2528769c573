//! INI configuration adapter.
//!
//! Keys are read through [`ConfigPort`]. A blank value counts as absent, and
//! a value that does not parse as the requested number falls back to the
//! caller's default with a warning.

use std::path::Path;

use configparser::ini::Ini;
use log::warn;

use crate::domain::error::SmatraderError;
use crate::ports::config_port::ConfigPort;

pub struct FileConfigAdapter {
    ini: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SmatraderError> {
        let path = path.as_ref();
        let mut ini = Ini::new();
        ini.load(path).map_err(|reason| SmatraderError::ConfigParse {
            file: path.display().to_string(),
            reason,
        })?;
        Ok(Self { ini })
    }

    pub fn from_string(content: &str) -> Result<Self, SmatraderError> {
        let mut ini = Ini::new();
        ini.read(content.to_string())
            .map_err(|reason| SmatraderError::ConfigParse {
                file: "<inline>".to_string(),
                reason,
            })?;
        Ok(Self { ini })
    }
}

fn or_default<T>(section: &str, key: &str, value: Result<Option<T>, String>, default: T) -> T {
    match value {
        Ok(Some(v)) => v,
        Ok(None) => default,
        Err(reason) => {
            warn!("[{}] {}: {}; using default", section, key, reason);
            default
        }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.ini
            .get(section, key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        or_default(section, key, self.ini.getint(section, key), default)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        or_default(section, key, self.ini.getfloat(section, key), default)
    }
}
