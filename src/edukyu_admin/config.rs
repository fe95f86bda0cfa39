use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{AdminError, Result};

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_PAGE_SIZE: usize = 50;

/// Admin settings, stored next to the collection files as config.json.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdminConfig {
    /// Page size for the admin user directory.
    #[serde(default = "default_page_size")]
    pub admin_page_size: usize,

    /// Categories offered by the blog editor and listing filter.
    #[serde(default = "default_blog_categories")]
    pub blog_categories: Vec<String>,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_blog_categories() -> Vec<String> {
    [
        "Educational",
        "Business",
        "Technology",
        "Health",
        "Lifestyle",
        "Finance",
        "Career",
        "News",
        "Reviews",
        "Tutorials",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            admin_page_size: DEFAULT_PAGE_SIZE,
            blog_categories: default_blog_categories(),
        }
    }
}

impl AdminConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(AdminError::Io)?;
        let config: AdminConfig =
            serde_json::from_str(&content).map_err(AdminError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(AdminError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(AdminError::Serialization)?;
        fs::write(config_path, content).map_err(AdminError::Io)?;
        Ok(())
    }
}

/// Where the production store and its config live. `EDUKYU_ADMIN_DIR`
/// overrides the platform data directory.
pub fn data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("EDUKYU_ADMIN_DIR") {
        return PathBuf::from(dir);
    }
    ProjectDirs::from("com", "edukyu", "edukyu-admin")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".edukyu-admin"))
}
