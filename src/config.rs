use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Directory the output paths are relative to. Defaults to the directory
    /// holding the executable.
    pub project_dir: Option<PathBuf>,
    pub model: String,
    pub output: OutputPaths,
    pub git: GitConfig,
    pub kernel: KernelConfig,
    pub builder: BuilderConfig,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputPaths {
    pub header_path: PathBuf,
    pub version_file_path: PathBuf,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct GitConfig {
    pub program: String,
    /// Returned for every query when git is not installed.
    pub default_value: String,
    pub on_failure: GitFailurePolicy,
    /// Where the firmware repo is queried. Current directory when unset.
    pub repo_dir: Option<PathBuf>,
}

/// What to do when git is installed but a query exits non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GitFailurePolicy {
    #[default]
    Propagate,
    Fallback,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct KernelConfig {
    /// Variable naming the ESP-IDF checkout that `KERNEL_VERSION` is described from.
    pub env_var: String,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct BuilderConfig {
    pub env_var: String,
    pub on_missing: MissingBuilderPolicy,
    pub placeholder: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingBuilderPolicy {
    #[default]
    Fail,
    Placeholder,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project_dir: None,
            model: "ATOM32".to_string(),
            output: OutputPaths::default(),
            git: GitConfig::default(),
            kernel: KernelConfig::default(),
            builder: BuilderConfig::default(),
        }
    }
}

impl Default for OutputPaths {
    fn default() -> Self {
        Self {
            header_path: ["components", "common", "include", "FirmwareVersion.h"].iter().collect(),
            version_file_path: PathBuf::from("firmware_version"),
        }
    }
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            program: "git".to_string(),
            default_value: "unknown".to_string(),
            on_failure: GitFailurePolicy::default(),
            repo_dir: None,
        }
    }
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            env_var: "IDF_PATH".to_string(),
        }
    }
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            env_var: "USERNAME".to_string(),
            on_missing: MissingBuilderPolicy::default(),
            placeholder: "unknown".to_string(),
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // ~/.config/fwversion/fwversion.yml
        if let Some(config_dir) = dirs::config_dir() {
            let primary_config = config_dir.join("fwversion").join("fwversion.yml");
            if primary_config.exists() {
                match Self::load_from_file(&primary_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from {}: {}", primary_config.display(), e);
                    }
                }
            }
        }

        let fallback_config = PathBuf::from("fwversion.yml");
        if fallback_config.exists() {
            match Self::load_from_file(&fallback_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load config from {}: {}", fallback_config.display(), e);
                }
            }
        }

        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}
