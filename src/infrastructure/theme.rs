use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::info;

/// The one display preference that survives a restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Dark,
    Light,
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ThemeMode::Dark => write!(f, "dark"),
            ThemeMode::Light => write!(f, "light"),
        }
    }
}

impl FromStr for ThemeMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dark" => Ok(ThemeMode::Dark),
            "light" => Ok(ThemeMode::Light),
            _ => anyhow::bail!("Invalid theme: {}. Must be 'dark' or 'light'", s),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct PersistedTheme {
    theme: ThemeMode,
}

/// Flat key-value persistence for the theme preference: loaded once at
/// startup, written on every change.
pub struct ThemePersistence {
    file_path: PathBuf,
}

impl ThemePersistence {
    pub fn new() -> Result<Self> {
        let home = std::env::var("HOME").context("Could not find HOME directory")?;
        let config_dir = PathBuf::from(home).join(".findash");

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir).context("Failed to create config directory")?;
        }

        Ok(Self {
            file_path: config_dir.join("theme.json"),
        })
    }

    /// Bypasses the home-directory lookup; used by tests.
    pub fn with_path(file_path: PathBuf) -> Self {
        Self { file_path }
    }

    pub fn load(&self) -> Result<Option<ThemeMode>> {
        if !self.file_path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.file_path).context("Failed to read theme file")?;
        let persisted: PersistedTheme =
            serde_json::from_str(&content).context("Failed to parse theme JSON")?;

        info!("Loaded theme {:?} from {:?}", persisted.theme, self.file_path);
        Ok(Some(persisted.theme))
    }

    pub fn save(&self, theme: ThemeMode) -> Result<()> {
        let content = serde_json::to_string_pretty(&PersistedTheme { theme })
            .context("Failed to serialize theme")?;

        // Atomic write: write to temp file then rename
        let temp_path = self.file_path.with_extension("tmp");
        fs::write(&temp_path, content).context("Failed to write temp theme file")?;
        fs::rename(&temp_path, &self.file_path).context("Failed to rename theme file")?;

        info!("Saved theme {:?} to {:?}", theme, self.file_path);
        Ok(())
    }
}
