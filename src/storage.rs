// Storage layer for Taskdeck
// Config lives in Markdown files with YAML frontmatter, collections in the data directory

use parking_lot::RwLock;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::{Result, StorageError};
use crate::models::{Settings, SettingsOverride};
use crate::persistence::{JsonFileBackend, Persistence};
use crate::store::TaskStore;

// ============================================
// PATH HELPERS
// ============================================

/// Global config directory (~/.taskdeck/)
pub fn globalConfigDir() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| StorageError::Config("Failed to get home directory".to_string()))?;
    Ok(home.join(".taskdeck"))
}

/// Global config file path
pub fn globalConfigPath() -> Result<PathBuf> {
    Ok(globalConfigDir()?.join("config.md"))
}

/// Data directory from settings, or ~/.taskdeck/data
pub fn resolveDataDir(settings: &Settings) -> Result<PathBuf> {
    match settings.dataDir.as_deref() {
        Some(dir) if !dir.trim().is_empty() => Ok(PathBuf::from(dir)),
        _ => Ok(globalConfigDir()?.join("data")),
    }
}

/// Data-directory config override file
pub fn dataConfigPath(dataDir: &std::path::Path) -> PathBuf {
    dataDir.join("config.md")
}

// ============================================
// FRONTMATTER PARSING
// ============================================

/// Parse YAML frontmatter from markdown content
pub fn parseFrontmatter<T: serde::de::DeserializeOwned>(content: &str) -> Option<(T, String)> {
    let content = content.trim();
    let rest = content.strip_prefix("---")?;
    let end = rest.find("\n---")?;
    let yaml = rest[..end].trim();
    let body = rest[end + 4..].trim().to_string();

    let frontmatter: T = serde_yaml::from_str(yaml).ok()?;
    Some((frontmatter, body))
}

/// Serialize frontmatter + body to markdown
pub fn toMarkdown<T: serde::Serialize>(frontmatter: &T, body: &str) -> Result<String> {
    let yaml = serde_yaml::to_string(frontmatter)?;
    Ok(format!("---\n{}---\n\n{}", yaml, body))
}

// ============================================
// STORAGE STATE
// ============================================

/// Main storage manager. The store sits behind a lock so each mutation is one
/// uninterrupted find-then-replace when several requests share it.
pub struct Storage {
    pub dataDir: Option<PathBuf>,
    pub configPath: Option<PathBuf>,
    pub globalSettings: RwLock<Settings>,
    pub dataOverride: RwLock<SettingsOverride>,
    pub store: RwLock<TaskStore>,
}

impl Storage {
    /// Open the configured data directory, reading ~/.taskdeck/config.md first
    pub fn open() -> Result<Self> {
        tracing::info!("[Storage::open] Initializing storage...");

        let configPath = globalConfigPath()?;
        let settings = loadGlobalConfig(&configPath);
        let dataDir = resolveDataDir(&settings)?;
        tracing::info!("[Storage::open] Data directory: {:?}", dataDir);

        fs::create_dir_all(&dataDir)?;
        let dataOverride = loadDataOverride(&dataDir);
        let store = TaskStore::load(Box::new(JsonFileBackend::new(&dataDir)));

        tracing::info!("[Storage::open] Storage initialized successfully");
        Ok(Self {
            dataDir: Some(dataDir),
            configPath: Some(configPath),
            globalSettings: RwLock::new(settings),
            dataOverride: RwLock::new(dataOverride),
            store: RwLock::new(store),
        })
    }

    /// Storage over an arbitrary backend with no config files attached
    pub fn withBackend(settings: Settings, backend: Box<dyn Persistence>) -> Self {
        Self {
            dataDir: None,
            configPath: None,
            globalSettings: RwLock::new(settings),
            dataOverride: RwLock::new(SettingsOverride::default()),
            store: RwLock::new(TaskStore::load(backend)),
        }
    }

    /// Get effective settings (global + data-directory override)
    pub fn effectiveSettings(&self) -> Settings {
        let global = self.globalSettings.read();
        let over = self.dataOverride.read();
        global.withOverride(&over)
    }
}

pub type StorageState = Arc<Storage>;

/// Initialize storage
pub fn initStorage() -> std::result::Result<StorageState, String> {
    Storage::open().map(Arc::new).map_err(|e| e.to_string())
}

// ============================================
// CONFIG FILES
// ============================================

pub fn loadGlobalConfig(path: &std::path::Path) -> Settings {
    tracing::debug!("[loadGlobalConfig] Config path: {:?}", path);

    if !path.exists() {
        tracing::info!("[loadGlobalConfig] Config file does not exist, using defaults");
        return Settings::default();
    }

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!("[loadGlobalConfig] Failed to read config, using defaults: {}", e);
            return Settings::default();
        }
    };

    parseFrontmatter::<Settings>(&content)
        .map(|(settings, _)| settings)
        .unwrap_or_else(|| {
            tracing::warn!("[loadGlobalConfig] Failed to parse frontmatter, using defaults");
            Settings::default()
        })
}

fn loadDataOverride(dataDir: &std::path::Path) -> SettingsOverride {
    let path = dataConfigPath(dataDir);
    if !path.exists() {
        return SettingsOverride::default();
    }
    fs::read_to_string(&path)
        .ok()
        .and_then(|content| parseFrontmatter::<SettingsOverride>(&content).map(|(o, _)| o))
        .unwrap_or_default()
}

pub fn saveGlobalConfig(storage: &Storage) -> Result<()> {
    let Some(path) = storage.configPath.as_ref() else {
        tracing::debug!("[saveGlobalConfig] No config file attached, skipping");
        return Ok(());
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let settings = storage.globalSettings.read();
    let content = toMarkdown(&*settings, "# Taskdeck\n\nGlobal settings live in the frontmatter above.\n")?;
    fs::write(path, content)?;
    Ok(())
}

pub fn saveDataOverride(storage: &Storage) -> Result<()> {
    let Some(dir) = storage.dataDir.as_ref() else {
        return Ok(());
    };
    let over = storage.dataOverride.read();
    let content = toMarkdown(&*over, "")?;
    fs::write(dataConfigPath(dir), content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryBackend;
    use tempfile::TempDir;

    #[test]
    fn frontmatter_round_trip() {
        let settings = Settings {
            trendDays: 30,
            dataDir: Some("/tmp/tasks".into()),
            ..Default::default()
        };
        let md = toMarkdown(&settings, "# Body").unwrap();
        let (parsed, body) = parseFrontmatter::<Settings>(&md).unwrap();
        assert_eq!(parsed, settings);
        assert_eq!(body, "# Body");
    }

    #[test]
    fn frontmatter_requires_delimiters() {
        assert!(parseFrontmatter::<Settings>("trendDays: 3").is_none());
        assert!(parseFrontmatter::<Settings>("---\ntrendDays: 3\n").is_none());
    }

    #[test]
    fn missing_or_broken_config_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.md");
        assert_eq!(loadGlobalConfig(&path), Settings::default());

        fs::write(&path, "---\ntrendDays: [oops\n---\n").unwrap();
        assert_eq!(loadGlobalConfig(&path), Settings::default());

        fs::write(&path, "---\nrecentTasksLimit: 9\n---\n").unwrap();
        assert_eq!(loadGlobalConfig(&path).recentTasksLimit, 9);
    }

    #[test]
    fn data_override_is_read_from_data_dir() {
        let dir = TempDir::new().unwrap();
        fs::write(dataConfigPath(dir.path()), "---\ntrendDays: 14\n---\n").unwrap();
        assert_eq!(loadDataOverride(dir.path()).trendDays, Some(14));
    }

    #[test]
    fn resolve_data_dir_prefers_setting() {
        let settings = Settings {
            dataDir: Some("/srv/taskdeck".into()),
            ..Default::default()
        };
        assert_eq!(resolveDataDir(&settings).unwrap(), PathBuf::from("/srv/taskdeck"));
    }

    #[test]
    fn effective_settings_apply_override() {
        let storage = Storage::withBackend(Settings::default(), Box::new(MemoryBackend::new()));
        storage.dataOverride.write().recentTasksLimit = Some(2);
        assert_eq!(storage.effectiveSettings().recentTasksLimit, 2);
        assert!(saveGlobalConfig(&storage).is_ok());
    }
}
