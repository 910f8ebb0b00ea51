// Settings commands

use serde::{Deserialize, Serialize};

use crate::analytics::MAX_TREND_DAYS;
use crate::models::Settings;
use crate::storage::{StorageState, saveDataOverride, saveGlobalConfig};

#[derive(Debug, Clone, Serialize)]
pub struct SettingsInfo {
    pub dataDir: Option<String>,
    pub defaultProjectColor: String,
    pub recentTasksLimit: usize,
    pub trendDays: u32,
    pub mcpBindAddress: String,
}

impl From<Settings> for SettingsInfo {
    fn from(s: Settings) -> Self {
        Self {
            dataDir: s.dataDir,
            defaultProjectColor: s.defaultProjectColor,
            recentTasksLimit: s.recentTasksLimit,
            trendDays: s.trendDays,
            mcpBindAddress: s.mcpBindAddress,
        }
    }
}

pub fn getSettings(storage: &StorageState) -> SettingsInfo {
    let settings = storage.effectiveSettings();
    tracing::debug!("[getSettings] trendDays: {}, recentTasksLimit: {}", settings.trendDays, settings.recentTasksLimit);
    settings.into()
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateSettingsInput {
    pub defaultProjectColor: Option<String>,
    pub recentTasksLimit: Option<usize>,
    pub trendDays: Option<u32>,
}

impl UpdateSettingsInput {
    fn validate(&self) -> Result<(), String> {
        if let Some(days) = self.trendDays {
            if days == 0 || days > MAX_TREND_DAYS {
                return Err(format!("trendDays must be between 1 and {}", MAX_TREND_DAYS));
            }
        }
        if self.defaultProjectColor.as_deref().is_some_and(|c| c.trim().is_empty()) {
            return Err("defaultProjectColor cannot be empty".to_string());
        }
        Ok(())
    }
}

pub fn updateGlobalSettings(storage: &StorageState, input: UpdateSettingsInput) -> Result<(), String> {
    input.validate()?;
    {
        let mut settings = storage.globalSettings.write();
        if let Some(color) = input.defaultProjectColor {
            tracing::info!("[updateGlobalSettings] Setting defaultProjectColor to: {}", color);
            settings.defaultProjectColor = color;
        }
        if let Some(limit) = input.recentTasksLimit {
            tracing::info!("[updateGlobalSettings] Setting recentTasksLimit to: {}", limit);
            settings.recentTasksLimit = limit;
        }
        if let Some(days) = input.trendDays {
            tracing::info!("[updateGlobalSettings] Setting trendDays to: {}", days);
            settings.trendDays = days;
        }
    }
    saveGlobalConfig(storage).map_err(|e| e.to_string())
}

/// Update the override stored next to the data files
pub fn updateDataSettings(storage: &StorageState, input: UpdateSettingsInput) -> Result<(), String> {
    input.validate()?;
    {
        let mut over = storage.dataOverride.write();
        if input.defaultProjectColor.is_some() {
            over.defaultProjectColor = input.defaultProjectColor;
        }
        if input.recentTasksLimit.is_some() {
            over.recentTasksLimit = input.recentTasksLimit;
        }
        if input.trendDays.is_some() {
            over.trendDays = input.trendDays;
        }
    }
    saveDataOverride(storage).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryBackend;
    use crate::storage::Storage;
    use std::sync::Arc;

    fn storage() -> StorageState {
        Arc::new(Storage::withBackend(Settings::default(), Box::new(MemoryBackend::new())))
    }

    #[test]
    fn data_settings_override_global() {
        let storage = storage();
        updateGlobalSettings(&storage, UpdateSettingsInput { trendDays: Some(10), ..Default::default() }).unwrap();
        assert_eq!(getSettings(&storage).trendDays, 10);

        updateDataSettings(&storage, UpdateSettingsInput { trendDays: Some(3), ..Default::default() }).unwrap();
        assert_eq!(getSettings(&storage).trendDays, 3);
        assert_eq!(storage.globalSettings.read().trendDays, 10);
    }

    #[test]
    fn invalid_updates_are_rejected() {
        let storage = storage();
        assert!(updateGlobalSettings(&storage, UpdateSettingsInput { trendDays: Some(0), ..Default::default() }).is_err());
        assert!(
            updateDataSettings(&storage, UpdateSettingsInput { trendDays: Some(MAX_TREND_DAYS + 1), ..Default::default() })
                .is_err()
        );
        assert_eq!(getSettings(&storage).trendDays, 7);
        assert!(
            updateDataSettings(&storage, UpdateSettingsInput { defaultProjectColor: Some(" ".into()), ..Default::default() })
                .is_err()
        );
    }
}
