//! Config command implementation.
//!
//! View and manage configuration settings.
//! Config file is located at ~/.config/anniv/config.toml.

use std::env;
use std::fs;
use std::path::PathBuf;

use anniv_filter_rs::filter::{ExecutionMode, FilterRunner, DEFAULT_OFFLOAD_THRESHOLD};
use anniv_filter_rs::{JsonFileStore, ManagerList, PresetStore};
use directories::BaseDirs;
use serde::{Deserialize, Serialize};

use super::{CommandContext, CommandError, Result};

/// Current config file version. Increment when making breaking changes to schema.
const CONFIG_VERSION: u32 = 1;

/// Environment variable that points at an alternative config file.
const CONFIG_ENV: &str = "ANNIV_CONFIG";

/// Keys accepted by `config set`.
const VALID_KEYS: &str =
    "filter.mode, filter.offload_threshold, storage.path, access.managers, output.color";

/// Configuration file structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// Config schema version for migrations.
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default)]
    pub filter: FilterConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub access: AccessConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

fn default_version() -> u32 {
    CONFIG_VERSION
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            filter: FilterConfig::default(),
            storage: StorageConfig::default(),
            access: AccessConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

/// Filter run settings.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Collection size at which auto mode offloads.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offload_threshold: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<ExecutionMode>,
}

/// Saved filter storage settings.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Preset file (defaults to the data directory).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Who may run `mark`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AccessConfig {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub managers: Vec<String>,
}

/// Output configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<bool>,
}

impl Config {
    /// Builds a runner from the filter settings, letting `mode` override the
    /// configured one.
    pub fn runner(&self, mode: Option<ExecutionMode>) -> FilterRunner {
        FilterRunner::new(
            mode.or(self.filter.mode).unwrap_or_default(),
            self.filter
                .offload_threshold
                .unwrap_or(DEFAULT_OFFLOAD_THRESHOLD),
        )
    }

    /// Opens the preset store at the configured or default path.
    pub fn preset_store(&self) -> Result<PresetStore<JsonFileStore>> {
        let store = match &self.storage.path {
            Some(path) => JsonFileStore::with_path(path.clone()),
            None => JsonFileStore::new()?,
        };
        Ok(PresetStore::new(store))
    }

    pub fn managers(&self) -> ManagerList {
        ManagerList::new(&self.access.managers)
    }
}

/// Gets the config directory path.
/// Uses XDG-style paths: ~/.config/anniv/ on all platforms.
fn get_config_dir() -> Result<PathBuf> {
    if let Ok(xdg_config) = env::var("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(xdg_config).join("anniv"));
    }

    BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".config").join("anniv"))
        .ok_or_else(|| CommandError::Config("Could not determine config directory".to_string()))
}

/// Gets the config file path.
pub fn get_config_path() -> Result<PathBuf> {
    if let Ok(path) = env::var(CONFIG_ENV) {
        return Ok(PathBuf::from(path));
    }

    Ok(get_config_dir()?.join("config.toml"))
}

/// Loads the configuration from disk.
pub fn load_config() -> Result<Config> {
    let path = get_config_path()?;

    if !path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&path)
        .map_err(|e| CommandError::Config(format!("Failed to read config: {}", e)))?;

    let config: Config = toml::from_str(&content)
        .map_err(|e| CommandError::Config(format!("Failed to parse config: {}", e)))?;

    migrate_config(config)
}

/// Brings an older config up to the current version.
fn migrate_config(mut config: Config) -> Result<Config> {
    if config.version > CONFIG_VERSION {
        return Err(CommandError::Config(format!(
            "Config version {} is newer than this anniv supports ({})",
            config.version, CONFIG_VERSION
        )));
    }

    config.version = CONFIG_VERSION;
    Ok(config)
}

fn save_config(config: &Config) -> Result<()> {
    let path = get_config_path()?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            CommandError::Config(format!("Failed to create config directory: {}", e))
        })?;
    }

    let content = toml::to_string_pretty(config)
        .map_err(|e| CommandError::Config(format!("Failed to serialize config: {}", e)))?;

    fs::write(&path, content)
        .map_err(|e| CommandError::Config(format!("Failed to write config: {}", e)))?;

    Ok(())
}

/// Executes the config show command.
pub fn execute_show(ctx: &CommandContext) -> Result<()> {
    let config = load_config()?;
    let path = get_config_path()?;

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
            "config": config,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if ctx.quiet {
        return Ok(());
    }

    use owo_colors::OwoColorize;

    let header = "Configuration";
    if ctx.use_colors {
        println!("{}\n", header.green().bold());
    } else {
        println!("{}\n", header);
    }

    println!("File: {}", path.display());
    println!("Exists: {}", path.exists());

    let runner = config.runner(None);
    println!("\n[filter]");
    println!("  mode: {}", runner.mode());
    println!("  offload_threshold: {}", runner.offload_threshold());

    println!("\n[storage]");
    match &config.storage.path {
        Some(p) => println!("  path: {}", p.display()),
        None => match JsonFileStore::default_path() {
            Ok(p) => println!("  path: {} (default)", p.display()),
            Err(_) => println!("  path: (unavailable)"),
        },
    }

    println!("\n[access]");
    if config.access.managers.is_empty() {
        println!("  managers: (none)");
    } else {
        println!("  managers: {}", config.access.managers.join(", "));
    }

    println!("\n[output]");
    if let Some(color) = config.output.color {
        println!("  color: {}", color);
    }

    Ok(())
}

/// Options for the config set command.
pub struct ConfigSetOptions {
    pub key: String,
    pub value: String,
}

/// Executes the config set command.
pub fn execute_set(ctx: &CommandContext, opts: &ConfigSetOptions) -> Result<()> {
    let mut config = load_config()?;
    apply_setting(&mut config, &opts.key, &opts.value)?;
    save_config(&config)?;

    if ctx.json_output {
        let output = serde_json::json!({
            "status": "success",
            "key": opts.key,
            "value": opts.value,
            "path": get_config_path()?.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        println!("Set {} = {}", opts.key, opts.value);
    }

    Ok(())
}

fn apply_setting(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        "filter.mode" => {
            config.filter.mode = Some(value.parse().map_err(CommandError::Config)?);
        }
        "filter.offload_threshold" => {
            let threshold = value.parse::<usize>().map_err(|_| {
                CommandError::Config(format!("Invalid offload_threshold '{}'", value))
            })?;
            config.filter.offload_threshold = Some(threshold);
        }
        "storage.path" => {
            config.storage.path = Some(PathBuf::from(value));
        }
        "access.managers" => {
            config.access.managers = value
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(String::from)
                .collect();
        }
        "output.color" => {
            config.output.color = Some(parse_bool(value)?);
        }
        _ => {
            return Err(CommandError::Config(format!(
                "Unknown config key '{}'. Valid keys: {}",
                key, VALID_KEYS
            )));
        }
    }
    Ok(())
}

/// Executes the config path command.
pub fn execute_path(ctx: &CommandContext) -> Result<()> {
    let path = get_config_path()?;

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", path.display());
    }

    Ok(())
}

fn parse_bool(s: &str) -> Result<bool> {
    match s.to_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" => Ok(false),
        _ => Err(CommandError::Config(format!(
            "Invalid boolean value '{}'. Use true/false, yes/no, 1/0, or on/off",
            s
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("true").unwrap());
        assert!(parse_bool("YES").unwrap());
        assert!(!parse_bool("off").unwrap());
        assert!(!parse_bool("0").unwrap());
        assert!(parse_bool("maybe").is_err());
        assert!(parse_bool("").is_err());
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.version, CONFIG_VERSION);
        assert!(config.filter.mode.is_none());
        assert!(config.storage.path.is_none());
        assert!(config.access.managers.is_empty());
        assert!(config.output.color.is_none());

        let runner = config.runner(None);
        assert_eq!(runner.mode(), ExecutionMode::Auto);
        assert_eq!(runner.offload_threshold(), DEFAULT_OFFLOAD_THRESHOLD);
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
version = 1

[filter]
offload_threshold = 200
mode = "offloaded"

[storage]
path = "/tmp/presets.json"

[access]
managers = ["alice", "bob"]

[output]
color = false
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.filter.offload_threshold, Some(200));
        assert_eq!(config.filter.mode, Some(ExecutionMode::Offloaded));
        assert_eq!(config.storage.path, Some(PathBuf::from("/tmp/presets.json")));
        assert_eq!(config.access.managers, vec!["alice", "bob"]);
        assert_eq!(config.output.color, Some(false));
    }

    #[test]
    fn test_config_deserialization_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.version, CONFIG_VERSION);
        assert!(config.filter.offload_threshold.is_none());
    }

    #[test]
    fn test_config_serialization_skips_unset() {
        let mut config = Config::default();
        config.filter.mode = Some(ExecutionMode::Inline);

        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("version = 1"));
        assert!(toml_str.contains("[filter]"));
        assert!(toml_str.contains("mode = \"inline\""));
        assert!(!toml_str.contains("offload_threshold"));
        assert!(!toml_str.contains("managers"));
    }

    #[test]
    fn test_runner_flag_overrides_config() {
        let mut config = Config::default();
        config.filter.mode = Some(ExecutionMode::Offloaded);
        config.filter.offload_threshold = Some(10);

        assert_eq!(config.runner(None).mode(), ExecutionMode::Offloaded);
        assert_eq!(
            config.runner(Some(ExecutionMode::Inline)).mode(),
            ExecutionMode::Inline
        );
        assert_eq!(config.runner(None).offload_threshold(), 10);
    }

    #[test]
    fn test_migrate_rejects_newer_version() {
        let config = Config {
            version: CONFIG_VERSION + 1,
            ..Default::default()
        };
        assert!(matches!(migrate_config(config), Err(CommandError::Config(_))));
    }

    #[test]
    fn test_apply_setting() {
        let mut config = Config::default();

        apply_setting(&mut config, "filter.mode", "worker").unwrap();
        assert_eq!(config.filter.mode, Some(ExecutionMode::Offloaded));

        apply_setting(&mut config, "filter.offload_threshold", "42").unwrap();
        assert_eq!(config.filter.offload_threshold, Some(42));

        apply_setting(&mut config, "access.managers", " alice, ,Bob ").unwrap();
        assert_eq!(config.access.managers, vec!["alice", "Bob"]);

        apply_setting(&mut config, "output.color", "no").unwrap();
        assert_eq!(config.output.color, Some(false));
    }

    #[test]
    fn test_apply_setting_invalid() {
        let mut config = Config::default();
        assert!(apply_setting(&mut config, "filter.mode", "fast").is_err());
        assert!(apply_setting(&mut config, "filter.offload_threshold", "-1").is_err());
        assert!(apply_setting(&mut config, "token", "abc").is_err());
    }

    #[test]
    fn test_managers_from_config() {
        use anniv_filter_rs::ManagePermission;

        let mut config = Config::default();
        config.access.managers = vec!["Alice".to_string()];
        assert!(config.managers().can_manage("alice"));
        assert!(!config.managers().can_manage("bob"));
    }

    #[test]
    #[serial]
    fn test_config_path_env_override() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("custom.toml");

        let original = env::var(CONFIG_ENV).ok();
        env::set_var(CONFIG_ENV, &config_path);
        let resolved = get_config_path();
        match original {
            Some(val) => env::set_var(CONFIG_ENV, val),
            None => env::remove_var(CONFIG_ENV),
        }

        assert_eq!(resolved.unwrap(), config_path);
    }

    #[test]
    #[serial]
    fn test_save_and_load_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.toml");

        let original = env::var(CONFIG_ENV).ok();
        env::set_var(CONFIG_ENV, &config_path);

        let mut config = Config::default();
        config.access.managers = vec!["alice".to_string()];
        config.filter.offload_threshold = Some(50);
        let saved = save_config(&config);
        let loaded = load_config();

        match original {
            Some(val) => env::set_var(CONFIG_ENV, val),
            None => env::remove_var(CONFIG_ENV),
        }

        saved.unwrap();
        let loaded = loaded.unwrap();
        assert_eq!(loaded.access.managers, vec!["alice"]);
        assert_eq!(loaded.filter.offload_threshold, Some(50));
    }

    #[test]
    #[serial]
    fn test_load_missing_file_gives_default() {
        let temp_dir = TempDir::new().unwrap();

        let original = env::var(CONFIG_ENV).ok();
        env::set_var(CONFIG_ENV, temp_dir.path().join("absent.toml"));
        let loaded = load_config();
        match original {
            Some(val) => env::set_var(CONFIG_ENV, val),
            None => env::remove_var(CONFIG_ENV),
        }

        assert_eq!(loaded.unwrap().version, CONFIG_VERSION);
    }
}
