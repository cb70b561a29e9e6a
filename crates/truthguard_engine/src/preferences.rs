use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use guard_logging::guard_info;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use thiserror::Error;

pub const PREFERENCES_FILENAME: &str = "preferences.ron";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ThemePreference {
    Light,
    Dark,
    #[default]
    System,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub theme: ThemePreference,
}

#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("preference directory unusable: {0}")]
    Directory(String),
    #[error("could not parse {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("could not serialize preferences: {0}")]
    Serialize(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Reads and writes `preferences.ron` inside one directory.
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    dir: PathBuf,
}

impl PreferenceStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(PREFERENCES_FILENAME)
    }

    /// Loads preferences; a missing file yields the defaults.
    pub fn load(&self) -> Result<Preferences, PreferenceError> {
        let path = self.path();
        let content = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Ok(Preferences::default());
            }
            Err(err) => return Err(err.into()),
        };
        ron::from_str(&content).map_err(|err| PreferenceError::Parse {
            path,
            message: err.to_string(),
        })
    }

    /// Writes preferences through a temp file in the same directory, then renames it.
    pub fn save(&self, preferences: &Preferences) -> Result<PathBuf, PreferenceError> {
        ensure_dir(&self.dir)?;
        let content = ron::ser::to_string_pretty(preferences, ron::ser::PrettyConfig::new())
            .map_err(|err| PreferenceError::Serialize(err.to_string()))?;

        let target = self.path();
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;
        tmp.persist(&target).map_err(|err| PreferenceError::Io(err.error))?;

        guard_info!("Saved preferences to {:?}", target);
        Ok(target)
    }
}

fn ensure_dir(dir: &Path) -> Result<(), PreferenceError> {
    if dir.exists() {
        if !dir.is_dir() {
            return Err(PreferenceError::Directory(format!(
                "{} is not a directory",
                dir.display()
            )));
        }
        return Ok(());
    }
    fs::create_dir_all(dir).map_err(|err| PreferenceError::Directory(err.to_string()))
}
