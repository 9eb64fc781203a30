use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

fn default_city() -> String {
    "Jakarta".to_string()
}
fn default_country() -> String {
    "Indonesia".to_string()
}
fn default_offset_minutes() -> i32 {
    3
}
fn default_hijri_offset() -> i32 {
    0
}
fn default_target_days() -> u32 {
    30
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    #[serde(default = "default_city")]
    pub city: String,
    #[serde(default = "default_country")]
    pub country: String,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self { city: default_city(), country: default_country() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Minutes added to every imported timing. Providers tend to run a
    /// couple of minutes behind the local mosque clock.
    #[serde(default = "default_offset_minutes")]
    pub offset_minutes: i32,
    /// Days to add/subtract from the Hijri date for local moon sighting.
    #[serde(default = "default_hijri_offset")]
    pub hijri_offset: i32,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            offset_minutes: default_offset_minutes(),
            hijri_offset: default_hijri_offset(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KhatamConfig {
    #[serde(default = "default_target_days")]
    pub default_target_days: u32,
}

impl Default for KhatamConfig {
    fn default() -> Self {
        Self { default_target_days: default_target_days() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub location: LocationConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub khatam: KhatamConfig,
}

impl AppConfig {
    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("", "", "iftar").context("Could not determine project directories")
    }

    pub fn config_path() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn data_dir() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.data_dir().to_path_buf())
    }

    pub fn db_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("iftar.db"))
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content =
            std::fs::read_to_string(path).with_context(|| format!("Reading {:?}", path))?;
        let config: AppConfig = toml::from_str(&content).context("Parsing config.toml")?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).context("Serializing config")?;
        std::fs::write(path, content).with_context(|| format!("Writing {:?}", path))?;
        Ok(())
    }

    pub fn ensure_data_dir() -> Result<PathBuf> {
        let dir = Self::data_dir()?;
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_sections() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.location.city, "Jakarta");
        assert_eq!(config.schedule.offset_minutes, 3);
        assert_eq!(config.khatam.default_target_days, 30);
    }

    #[test]
    fn round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = AppConfig::default();
        config.location.city = "Bandung".to_string();
        config.schedule.offset_minutes = 0;
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.location.city, "Bandung");
        assert_eq!(loaded.schedule.offset_minutes, 0);
        assert_eq!(loaded.khatam.default_target_days, 30);
    }
}
