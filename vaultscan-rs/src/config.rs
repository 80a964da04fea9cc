//! Configuration: the TOML config file and the task field table.

use crate::error::{Result, VaultError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub vault: VaultConfig,

    #[serde(default)]
    pub tasks: TasksConfig,
}

/// Vault-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VaultConfig {
    /// Vault used when no `--vault` flag is given.
    pub default: Option<PathBuf>,
}

/// Built-in task field tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskPreset {
    #[default]
    ObsidianTasks,
    None,
}

/// The `[tasks]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TasksConfig {
    #[serde(default)]
    pub preset: TaskPreset,

    /// Extra fields; one sharing an emoji with a preset field replaces it.
    #[serde(default)]
    pub fields: Vec<EmojiFieldDef>,
}

impl TasksConfig {
    /// The effective field table: preset first, then the configured fields.
    pub fn task_config(&self) -> TaskConfig {
        let mut config = match self.preset {
            TaskPreset::ObsidianTasks => TaskConfig::obsidian_tasks(),
            TaskPreset::None => TaskConfig::empty(),
        };

        for field in &self.fields {
            config.fields.retain(|existing| existing.emoji != field.emoji);
            config.fields.push(field.clone());
        }

        config
    }
}

impl Config {
    /// Load configuration from the default location (~/.config/vaultscan.toml).
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::debug!(path = %config_path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "loading config");
        let content = fs::read_to_string(path)
            .map_err(|e| VaultError::Config(format!("Failed to read config file: {}", e)))?;

        Ok(toml::from_str(&content)?)
    }

    /// Returns the default config file path (~/.config/vaultscan.toml).
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vaultscan.toml")
    }

    /// Resolve the vault path from CLI argument, config, or current directory.
    pub fn resolve_vault_path(&self, cli_vault: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = cli_vault {
            return existing_dir(path);
        }
        if let Some(ref default) = self.vault.default {
            return existing_dir(default);
        }
        Ok(std::env::current_dir()?)
    }
}

fn existing_dir(path: &Path) -> Result<PathBuf> {
    if path.is_dir() {
        Ok(path.to_path_buf())
    } else {
        Err(VaultError::VaultNotFound(path.to_path_buf()))
    }
}

/// Value type for an emoji metadata field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EmojiValueType {
    /// First ISO date (YYYY-MM-DD) after the emoji.
    Date,
    /// Single whitespace-delimited token after the emoji.
    String,
    /// Everything up to the next configured emoji.
    Text,
    /// Leading signed decimal after the emoji.
    Number,
    /// No inline value; presence records `value`.
    Flag { value: std::string::String },
    /// Like `Flag`, for a field name shared by several emojis.
    Enum { value: std::string::String },
}

/// Definition of a single emoji metadata field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmojiFieldDef {
    /// The delimiter token used in task text.
    pub emoji: std::string::String,
    /// The key this field is stored under in task metadata.
    pub field_name: std::string::String,
    pub value_type: EmojiValueType,
    /// Extraction and output order (lower first).
    pub order: u32,
}

impl EmojiFieldDef {
    pub fn new(emoji: &str, field_name: &str, value_type: EmojiValueType, order: u32) -> Self {
        Self {
            emoji: emoji.to_string(),
            field_name: field_name.to_string(),
            value_type,
            order,
        }
    }
}

/// The ordered set of emoji metadata fields used by the task parser.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskConfig {
    pub fields: Vec<EmojiFieldDef>,
}

impl TaskConfig {
    /// A config with no fields: nothing is extracted.
    pub fn empty() -> Self {
        Self { fields: Vec::new() }
    }

    /// The Obsidian Tasks plugin field set.
    pub fn obsidian_tasks() -> Self {
        use EmojiValueType::{Date, Text};

        let priority = |value: &str| EmojiValueType::Enum {
            value: value.to_string(),
        };
        Self {
            fields: vec![
                EmojiFieldDef::new("🆔", "id", EmojiValueType::String, 10),
                EmojiFieldDef::new("⛔", "depends_on", Text, 20),
                EmojiFieldDef::new("🔺", "priority", priority("highest"), 30),
                EmojiFieldDef::new("⏫", "priority", priority("high"), 31),
                EmojiFieldDef::new("🔼", "priority", priority("medium"), 32),
                EmojiFieldDef::new("🔽", "priority", priority("low"), 33),
                EmojiFieldDef::new("⏬", "priority", priority("lowest"), 34),
                EmojiFieldDef::new("🔁", "recurrence", Text, 40),
                EmojiFieldDef::new("🏁", "on_completion", Text, 50),
                EmojiFieldDef::new("➕", "created", Date, 60),
                EmojiFieldDef::new("🛫", "start", Date, 70),
                EmojiFieldDef::new("⏳", "scheduled", Date, 80),
                EmojiFieldDef::new("📅", "due", Date, 90),
                EmojiFieldDef::new("❌", "cancelled", Date, 100),
                EmojiFieldDef::new("✅", "done", Date, 110),
            ],
        }
    }

    /// Fields sorted by `order`; ties keep configuration order.
    pub fn sorted_fields(&self) -> Vec<&EmojiFieldDef> {
        let mut sorted: Vec<&EmojiFieldDef> = self.fields.iter().collect();
        sorted.sort_by_key(|f| f.order);
        sorted
    }

    /// Every configured emoji, for finding where a text value ends.
    pub fn all_emojis(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.emoji.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.vault.default.is_none());
        assert_eq!(config.tasks.preset, TaskPreset::ObsidianTasks);
        assert_eq!(config.tasks.task_config(), TaskConfig::obsidian_tasks());
    }

    #[test]
    fn test_empty_task_config() {
        let config = TaskConfig::empty();
        assert!(config.sorted_fields().is_empty());
        assert!(config.all_emojis().is_empty());
    }

    #[test]
    fn test_sorted_fields() {
        let config = TaskConfig {
            fields: vec![
                EmojiFieldDef::new("📅", "due", EmojiValueType::Date, 20),
                EmojiFieldDef::new("🆔", "id", EmojiValueType::String, 10),
            ],
        };
        let names: Vec<&str> = config.sorted_fields().iter().map(|f| f.field_name.as_str()).collect();
        assert_eq!(names, vec!["id", "due"]);
    }

    #[test]
    fn test_obsidian_preset() {
        let config = TaskConfig::obsidian_tasks();
        assert_eq!(config.fields.len(), 15);
        assert!(config.all_emojis().contains(&"⏳"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[vault]
default = "/tmp/notes"

[tasks]
preset = "none"

[[tasks.fields]]
emoji = "💰"
field_name = "cost"
value_type = {{ kind = "number" }}
order = 5

[[tasks.fields]]
emoji = "⭐"
field_name = "starred"
value_type = {{ kind = "flag", value = "yes" }}
order = 6
"#
        )
        .unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.vault.default, Some(PathBuf::from("/tmp/notes")));
        assert_eq!(config.tasks.preset, TaskPreset::None);

        let tasks = config.tasks.task_config();
        assert_eq!(tasks.fields.len(), 2);
        assert_eq!(tasks.fields[0].value_type, EmojiValueType::Number);
        assert_eq!(
            tasks.fields[1].value_type,
            EmojiValueType::Flag {
                value: "yes".to_string()
            }
        );
    }

    #[test]
    fn test_configured_field_replaces_preset_field() {
        let tasks = TasksConfig {
            preset: TaskPreset::ObsidianTasks,
            fields: vec![EmojiFieldDef::new("📅", "deadline", EmojiValueType::Date, 90)],
        };
        let config = tasks.task_config();
        assert_eq!(config.fields.len(), 15);
        assert!(config.fields.iter().any(|f| f.field_name == "deadline"));
        assert!(!config.fields.iter().any(|f| f.field_name == "due"));
    }

    #[test]
    fn test_load_invalid_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[vault\nbroken").unwrap();
        assert!(matches!(Config::load_from(file.path()), Err(VaultError::TomlParse(_))));
    }

    #[test]
    fn test_resolve_vault_path() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        assert_eq!(config.resolve_vault_path(Some(dir.path())).unwrap(), dir.path());

        let missing = dir.path().join("missing");
        assert!(matches!(
            config.resolve_vault_path(Some(&missing)),
            Err(VaultError::VaultNotFound(_))
        ));

        let config = Config {
            vault: VaultConfig {
                default: Some(dir.path().to_path_buf()),
            },
            ..Config::default()
        };
        assert_eq!(config.resolve_vault_path(None).unwrap(), dir.path());
    }
}
