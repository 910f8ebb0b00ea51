// Configuration models for Taskdeck
// Global config and data-directory config overrides

use serde::{Deserialize, Serialize};

use super::project::DEFAULT_PROJECT_COLOR;

/// All settings (stored in global config.md, can be overridden per data directory)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataDir: Option<String>,
    pub defaultProjectColor: String,
    pub recentTasksLimit: usize,
    pub trendDays: u32,
    pub mcpBindAddress: String,
    pub mcpAutoStart: bool,
    pub logLevel: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dataDir: None,
            defaultProjectColor: DEFAULT_PROJECT_COLOR.to_string(),
            recentTasksLimit: 5,
            trendDays: 7,
            mcpBindAddress: "127.0.0.1:44056".to_string(),
            mcpAutoStart: true,
            logLevel: "info".to_string(),
        }
    }
}

/// Partial settings for data-directory overrides (all fields optional)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SettingsOverride {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defaultProjectColor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recentTasksLimit: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trendDays: Option<u32>,
}

impl Settings {
    /// Merge with data-directory override
    pub fn withOverride(&self, over: &SettingsOverride) -> Self {
        Self {
            dataDir: self.dataDir.clone(),
            defaultProjectColor: over.defaultProjectColor.clone().unwrap_or_else(|| self.defaultProjectColor.clone()),
            recentTasksLimit: over.recentTasksLimit.unwrap_or(self.recentTasksLimit),
            trendDays: over.trendDays.unwrap_or(self.trendDays),
            mcpBindAddress: self.mcpBindAddress.clone(),
            mcpAutoStart: self.mcpAutoStart,
            logLevel: self.logLevel.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_replaces_only_given_fields() {
        let global = Settings::default();
        let over = SettingsOverride {
            trendDays: Some(14),
            ..Default::default()
        };
        let merged = global.withOverride(&over);
        assert_eq!(merged.trendDays, 14);
        assert_eq!(merged.recentTasksLimit, 5);
        assert_eq!(merged.defaultProjectColor, DEFAULT_PROJECT_COLOR);
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let settings: Settings = serde_yaml::from_str("logLevel: debug\n").unwrap();
        assert_eq!(settings.logLevel, "debug");
        assert_eq!(settings.trendDays, 7);
        assert!(settings.mcpAutoStart);
    }
}
