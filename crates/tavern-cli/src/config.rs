use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tavern_quest::{MaterialCatalog, MaterialSpec, RunnerConfig};
use tavern_werewolf::GameConfig;

/// Top-level configuration for tavern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TavernConfig {
    /// Default log filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit logs as JSON lines.
    #[serde(default)]
    pub log_json: bool,

    /// Extra materials on top of the built-in catalog.
    #[serde(default)]
    pub materials: Vec<MaterialSpec>,

    #[serde(default)]
    pub quest: RunnerConfig,

    #[serde(default)]
    pub werewolf: GameConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TavernConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
            materials: Vec::new(),
            quest: RunnerConfig::default(),
            werewolf: GameConfig::default(),
        }
    }
}

impl TavernConfig {
    /// Load config from disk. Returns default if not found.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).context("Failed to read config file")?;
        let config: Self = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// Save config to disk.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content).context("Failed to write config file")?;
        Ok(())
    }

    /// Built-in materials plus any configured ones.
    pub fn catalog(&self) -> MaterialCatalog {
        let mut catalog = MaterialCatalog::builtin();
        catalog.extend(self.materials.iter().cloned());
        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tavern_quest::UnrecognizedMaterialPolicy;
    use tavern_werewolf::Role;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = TavernConfig::default();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.quest.max_rounds, 10);
        assert_eq!(config.werewolf.max_game_rounds, 6);
        assert_eq!(config.werewolf.max_wolf_discussion_rounds, 3);
    }

    #[test]
    fn test_missing_file_gives_default() {
        let dir = tempdir().unwrap();
        let config = TavernConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.werewolf.lineup, Role::default_lineup());
    }

    #[test]
    fn test_config_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("tavern.toml");
        let config = TavernConfig::default();
        config.save(&path).unwrap();
        let loaded = TavernConfig::load(&path).unwrap();
        assert_eq!(loaded.log_level, config.log_level);
        assert_eq!(loaded.quest, config.quest);
        assert_eq!(loaded.werewolf, config.werewolf);
    }

    #[test]
    fn test_partial_toml() {
        let config: TavernConfig = toml::from_str(
            r#"
            log_level = "debug"

            [quest]
            unrecognized_material = "reject"

            [werewolf]
            lineup = ["werewolf", "villager", "villager", "seer"]

            [[materials]]
            id = "iron_ore"
            description = "Unrefined ore."
            "#,
        )
        .unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(
            config.quest.unrecognized_material,
            UnrecognizedMaterialPolicy::Reject
        );
        assert_eq!(config.quest.max_rounds, 10);
        assert_eq!(config.werewolf.lineup.len(), 4);
        assert_eq!(config.werewolf.max_game_rounds, 6);

        let catalog = config.catalog();
        assert!(catalog.contains("iron_ore"));
        assert!(catalog.contains("lumber"));
    }
}
