use crate::types::ToolName;
use anyhow::{anyhow, Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const APP_NAME: &str = "solkit";
pub const CONFIG_FILE_NAME: &str = "config.json";

pub const SETTING_KEYS: [&str; 2] = ["probe_timeout_secs", "source_rc_files"];

/// Prefix of per-tool command override keys, e.g. `tools.anchor`.
pub const TOOLS_PREFIX: &str = "tools.";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SolkitSettings {
    /// Upper bound for a single probe or re-source; 0 waits forever.
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,
    #[serde(default = "default_source_rc_files")]
    pub source_rc_files: bool,
    /// Per-tool version command overrides. An empty command disables the tool.
    #[serde(default)]
    pub tools: HashMap<ToolName, String>,
}

fn default_probe_timeout_secs() -> u64 {
    30
}
fn default_source_rc_files() -> bool {
    true
}

impl Default for SolkitSettings {
    fn default() -> Self {
        Self {
            probe_timeout_secs: default_probe_timeout_secs(),
            source_rc_files: default_source_rc_files(),
            tools: HashMap::new(),
        }
    }
}

impl SolkitSettings {
    pub fn probe_timeout(&self) -> Option<Duration> {
        match self.probe_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        if let Some(tool) = tool_key(key) {
            return tool.ok().and_then(|tool| self.tools.get(&tool).cloned());
        }

        match normalize_key(key).as_str() {
            "probe_timeout_secs" => Some(self.probe_timeout_secs.to_string()),
            "source_rc_files" => Some(self.source_rc_files.to_string()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if let Some(tool) = tool_key(key) {
            self.tools.insert(tool?, value.trim().to_string());
            return Ok(());
        }

        match normalize_key(key).as_str() {
            "probe_timeout_secs" => {
                self.probe_timeout_secs = value
                    .trim()
                    .parse()
                    .with_context(|| format!("Invalid value for '{}': {}", key, value))?;
            }
            "source_rc_files" => self.source_rc_files = parse_bool(value),
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }

    pub fn unset(&mut self, key: &str) -> Result<()> {
        if let Some(tool) = tool_key(key) {
            self.tools.remove(&tool?);
            return Ok(());
        }

        let defaults = Self::default();
        match normalize_key(key).as_str() {
            "probe_timeout_secs" => self.probe_timeout_secs = defaults.probe_timeout_secs,
            "source_rc_files" => self.source_rc_files = defaults.source_rc_files,
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }

    fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(secs) = lookup("SOLKIT_PROBE_TIMEOUT_SECS") {
            match secs.trim().parse::<u64>() {
                Ok(secs) => self.probe_timeout_secs = secs,
                Err(_) => tracing::warn!("Ignoring invalid SOLKIT_PROBE_TIMEOUT_SECS '{}'", secs),
            }
        }

        if let Some(source) = lookup("SOLKIT_SOURCE_RC_FILES") {
            self.source_rc_files = parse_bool(&source);
        }
    }
}

fn unknown_key(key: &str) -> anyhow::Error {
    anyhow!(
        "'{}' is not a valid configuration setting. Valid settings: {}, {}<tool>",
        key,
        SETTING_KEYS.join(", "),
        TOOLS_PREFIX
    )
}

/// `Some` when `key` names a per-tool override; the inner result fails for
/// tools the CLI does not know.
fn tool_key(key: &str) -> Option<Result<ToolName>> {
    let name = key.trim().strip_prefix(TOOLS_PREFIX)?;
    Some(ToolName::from_str(name, true).map_err(|_| {
        let known: Vec<&str> = ToolName::ALL.iter().map(ToolName::as_str).collect();
        anyhow!("Unknown tool '{}'. Known tools: {}", name, known.join(", "))
    }))
}

fn parse_bool(value: &str) -> bool {
    let value = value.trim();
    value.eq_ignore_ascii_case("true") || value == "1"
}

pub fn get_config_file_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("SOLKIT_CONFIG_PATH") {
        return Ok(PathBuf::from(path));
    }
    let path = dirs::config_dir()
        .ok_or_else(|| anyhow!("Could not determine config directory"))?
        .join(APP_NAME)
        .join(CONFIG_FILE_NAME);
    tracing::debug!("Config file path: {}", path.display());
    Ok(path)
}

pub fn load_settings() -> Result<SolkitSettings> {
    let path = get_config_file_path()?;
    let mut settings = load_settings_from(&path)?;
    settings.apply_env_overrides(|var| std::env::var(var).ok());
    Ok(settings)
}

pub fn load_settings_from(path: &Path) -> Result<SolkitSettings> {
    if !path.exists() {
        return Ok(SolkitSettings::default());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Could not read config file at {}", path.display()))?;

    serde_json::from_str(&content).with_context(|| "Could not parse config file as JSON")
}

/// Persist settings as read from disk, without environment overrides.
pub fn save_settings(settings: &SolkitSettings) -> Result<()> {
    save_settings_to(&get_config_file_path()?, settings)
}

pub fn save_settings_to(path: &Path, settings: &SolkitSettings) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Could not create config directory {}", dir.display()))?;
    }

    let content = serde_json::to_string_pretty(settings)?;
    fs::write(path, content)
        .with_context(|| format!("Could not write config file at {}", path.display()))?;

    Ok(())
}

pub fn normalize_key(key: &str) -> String {
    key.trim()
        .replace('-', "_")
        .chars()
        .map(|c| {
            if c.is_ascii_uppercase() {
                format!("_{}", c.to_ascii_lowercase())
            } else {
                c.to_string()
            }
        })
        .collect::<String>()
}
