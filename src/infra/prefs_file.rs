use std::fs;
use std::path::PathBuf;

use crate::config::config_directory;
use crate::domain::preferences::Preferences;
use crate::error::{AppError, AppResult};
use crate::services::PreferencesStore;

const PREFERENCES_FILE_NAME: &str = "preferences.json";

/// Stores preferences as JSON in the application's config directory.
pub struct JsonPreferencesStore {
    file_path: PathBuf,
}

impl JsonPreferencesStore {
    pub fn new(file_path: PathBuf) -> Self {
        Self { file_path }
    }

    pub fn open_default() -> AppResult<Self> {
        Ok(Self::new(config_directory()?.join(PREFERENCES_FILE_NAME)))
    }
}

impl PreferencesStore for JsonPreferencesStore {
    fn load(&self) -> AppResult<Option<Preferences>> {
        match fs::read_to_string(&self.file_path) {
            Ok(contents) => serde_json::from_str(&contents)
                .map(Some)
                .map_err(|err| AppError::Preferences(format!("invalid preferences file: {err}"))),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(AppError::Io(err)),
        }
    }

    fn save(&self, preferences: &Preferences) -> AppResult<()> {
        if let Some(parent) = self.file_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(preferences).map_err(|err| {
            AppError::Preferences(format!("failed to write preferences: {err}"))
        })?;
        fs::write(&self.file_path, data)?;
        Ok(())
    }
}
