use anyhow::{Context, Result};
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

pub const PROJECT_NAME: &str = "7 Days To Die Synchronization Tool";
const VENDOR_DIR: &str = "keifufu";
const ARCHIVE_URL: &str = "https://keifufu.dev/public/7d2d/mods.zip";
const VERSION_URL: &str = "https://keifufu.dev/public/7d2d/version.txt";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_archive_url")]
    pub archive_url: String,
    #[serde(default = "default_version_url")]
    pub version_url: String,
    #[serde(default = "default_game_folder")]
    pub game_folder: String,
    #[serde(default = "default_mods_folder")]
    pub mods_folder: String,
    #[serde(default)]
    pub steam_dir: Option<PathBuf>,
    #[serde(default)]
    pub game_dir: Option<PathBuf>,
    #[serde(default = "default_support_contact")]
    pub support_contact: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            archive_url: default_archive_url(),
            version_url: default_version_url(),
            game_folder: default_game_folder(),
            mods_folder: default_mods_folder(),
            steam_dir: None,
            game_dir: None,
            support_contact: default_support_contact(),
        }
    }
}

impl AppConfig {
    pub fn load_or_create(data_dir: &Path) -> Result<Self> {
        fs::create_dir_all(data_dir).context("create app data dir")?;
        let path = data_dir.join("config.json");
        if path.exists() {
            let raw = fs::read_to_string(&path).context("read app config")?;
            let config: AppConfig = serde_json::from_str(&raw).context("parse app config")?;
            return Ok(config);
        }

        let config = AppConfig::default();
        config.save(data_dir)?;
        Ok(config)
    }

    pub fn save(&self, data_dir: &Path) -> Result<()> {
        fs::create_dir_all(data_dir).context("create app data dir")?;
        let path = data_dir.join("config.json");
        let raw = serde_json::to_string_pretty(self).context("serialize app config")?;
        fs::write(path, raw).context("write app config")?;
        Ok(())
    }
}

/// `<data dir>/keifufu/7 Days To Die Synchronization Tool`, roaming on Windows.
pub fn base_data_dir() -> Result<PathBuf> {
    let base = BaseDirs::new().context("resolve home dir")?;
    Ok(base.data_dir().join(VENDOR_DIR).join(PROJECT_NAME))
}

pub fn archive_path(data_dir: &Path) -> PathBuf {
    data_dir.join("mods.zip")
}

fn default_archive_url() -> String {
    ARCHIVE_URL.to_string()
}

fn default_version_url() -> String {
    VERSION_URL.to_string()
}

fn default_game_folder() -> String {
    crate::steam::GAME_NAME.to_string()
}

fn default_mods_folder() -> String {
    "Mods".to_string()
}

fn default_support_contact() -> String {
    crate::error::SUPPORT_CONTACT.to_string()
}
