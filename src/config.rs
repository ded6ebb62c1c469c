use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::branch::AssociationMode;
use crate::domain::repo::RepoDescriptor;
use crate::error::{AppError, AppResult};

pub const APP_NAME: &str = "workflow";
const CONFIG_FILE_NAME: &str = "config.json";

pub const DEFAULT_TRACKER_URL: &str = "https://api.assembla.com/v1";
pub const DEFAULT_BASE_BRANCH: &str = "develop";
pub const DEFAULT_REMOTE: &str = "origin";
pub const DEFAULT_BRANCH_NAME_LIMIT: usize = 50;
pub const DEFAULT_TICKET_TITLE_LIMIT: usize = 100;

const ENV_API_KEY: &str = "WORKFLOW_API_KEY";
const ENV_API_SECRET: &str = "WORKFLOW_API_SECRET";
const ENV_SPACE_ID: &str = "WORKFLOW_SPACE_ID";
const ENV_TRACKER_URL: &str = "WORKFLOW_TRACKER_URL";

/// Values as written to the config file. Everything is optional so a partial
/// file still loads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoredConfig {
    pub tracker_url: Option<String>,
    pub space_id: Option<String>,
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub repos_root: Option<String>,
    #[serde(default)]
    pub repos: Vec<RepoDescriptor>,
    pub base_branch: Option<String>,
    pub remote: Option<String>,
    pub branch_association: Option<String>,
    pub write_merge_files: Option<bool>,
    pub merge_files_dir: Option<String>,
    pub branch_name_limit: Option<usize>,
    pub ticket_title_limit: Option<usize>,
}

impl StoredConfig {
    pub fn load() -> AppResult<Self> {
        Self::load_from(&config_file_path()?)
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        match fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents)
                .map_err(|err| AppError::Configuration(format!("invalid config file: {err}"))),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(AppError::Io(err)),
        }
    }

    pub fn save(&self) -> AppResult<()> {
        self.save_to(&config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(self)
            .map_err(|err| AppError::Configuration(format!("failed to write config: {err}")))?;
        fs::write(path, data)?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct TrackerSettings {
    pub base_url: String,
    pub space_id: Option<String>,
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LifecycleOptions {
    pub association: AssociationMode,
    pub branch_name_limit: usize,
    pub ticket_title_limit: usize,
    pub base_branch: String,
    pub remote: String,
    pub write_merge_files: bool,
    pub merge_files_dir: PathBuf,
}

impl Default for LifecycleOptions {
    fn default() -> Self {
        Self {
            association: AssociationMode::default(),
            branch_name_limit: DEFAULT_BRANCH_NAME_LIMIT,
            ticket_title_limit: DEFAULT_TICKET_TITLE_LIMIT,
            base_branch: DEFAULT_BASE_BRANCH.to_string(),
            remote: DEFAULT_REMOTE.to_string(),
            write_merge_files: true,
            merge_files_dir: env::temp_dir().join(APP_NAME),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub tracker: TrackerSettings,
    pub repos_root: PathBuf,
    pub repos: Vec<RepoDescriptor>,
    pub lifecycle: LifecycleOptions,
}

impl AppConfig {
    pub fn load(workspace_hint: &Path) -> AppResult<Self> {
        let stored = StoredConfig::load()?;
        Self::resolve(stored, workspace_hint, |key| env::var(key).ok())
    }

    /// Merges the stored file with environment overrides. `lookup` stands in
    /// for `env::var` so the precedence can be checked without touching the
    /// process environment.
    pub fn resolve(
        stored: StoredConfig,
        workspace_hint: &Path,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> AppResult<Self> {
        let association = match stored.branch_association.as_deref() {
            Some(value) => AssociationMode::from_str(value).ok_or_else(|| {
                AppError::Configuration(format!("unknown branch association mode '{value}'"))
            })?,
            None => AssociationMode::default(),
        };

        let defaults = LifecycleOptions::default();
        let lifecycle = LifecycleOptions {
            association,
            branch_name_limit: stored
                .branch_name_limit
                .unwrap_or(defaults.branch_name_limit),
            ticket_title_limit: stored
                .ticket_title_limit
                .unwrap_or(defaults.ticket_title_limit),
            base_branch: stored.base_branch.unwrap_or(defaults.base_branch),
            remote: stored.remote.unwrap_or(defaults.remote),
            write_merge_files: stored
                .write_merge_files
                .unwrap_or(defaults.write_merge_files),
            merge_files_dir: stored
                .merge_files_dir
                .map(PathBuf::from)
                .unwrap_or(defaults.merge_files_dir),
        };

        let tracker = TrackerSettings {
            base_url: lookup(ENV_TRACKER_URL)
                .or(stored.tracker_url)
                .unwrap_or_else(|| DEFAULT_TRACKER_URL.to_string()),
            space_id: lookup(ENV_SPACE_ID).or(stored.space_id),
            api_key: lookup(ENV_API_KEY).or(stored.api_key),
            api_secret: lookup(ENV_API_SECRET).or(stored.api_secret),
        };

        Ok(Self {
            tracker,
            repos_root: stored
                .repos_root
                .map(PathBuf::from)
                .unwrap_or_else(|| workspace_hint.to_path_buf()),
            repos: stored.repos,
            lifecycle,
        })
    }
}

pub fn config_directory() -> AppResult<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_NAME))
        .ok_or_else(|| {
            AppError::Configuration("could not determine the user config directory".to_string())
        })
}

pub fn config_file_path() -> AppResult<PathBuf> {
    Ok(config_directory()?.join(CONFIG_FILE_NAME))
}
