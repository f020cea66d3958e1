use crate::error::{DevkitError, Result};
use crate::paths;
use crate::runtime::Runtime;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// PackagesConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackagesConfig {
    #[serde(default = "default_packages_timeout")]
    pub timeout_secs: u64,
}

fn default_packages_timeout() -> u64 {
    300
}

impl Default for PackagesConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_packages_timeout(),
        }
    }
}

// ---------------------------------------------------------------------------
// LintConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LintConfig {
    /// Linter executable and leading arguments; stdin flags are appended.
    #[serde(default = "default_lint_command")]
    pub command: Vec<String>,
    #[serde(default = "default_lint_timeout")]
    pub timeout_secs: u64,
}

fn default_lint_command() -> Vec<String> {
    vec!["npx".to_string(), "eslint".to_string()]
}

fn default_lint_timeout() -> u64 {
    60
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            command: default_lint_command(),
            timeout_secs: default_lint_timeout(),
        }
    }
}

// ---------------------------------------------------------------------------
// ScriptConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptConfig {
    /// Pin a runtime instead of probing PATH.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<Runtime>,
    #[serde(default = "default_script_timeout")]
    pub timeout_secs: u64,
}

fn default_script_timeout() -> u64 {
    30
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            runtime: None,
            timeout_secs: default_script_timeout(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub packages: PackagesConfig,
    #[serde(default)]
    pub lint: LintConfig,
    #[serde(default)]
    pub script: ScriptConfig,
}

/// Seconds → timeout; `0` disables the timeout.
fn as_timeout(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

impl Config {
    /// Load `.devkit/config.yaml`, falling back to defaults when absent.
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&path)?;
        let config: Config = serde_yaml::from_str(&data)?;
        Ok(config)
    }

    /// Write `.devkit/config.yaml`, creating `.devkit/` when needed.
    pub fn save(&self, root: &Path) -> Result<()> {
        std::fs::create_dir_all(root.join(paths::DEVKIT_DIR))?;
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&paths::config_path(root), data.as_bytes())?;
        Ok(())
    }

    pub fn package_timeout(&self) -> Option<Duration> {
        as_timeout(self.packages.timeout_secs)
    }

    pub fn lint_timeout(&self) -> Option<Duration> {
        as_timeout(self.lint.timeout_secs)
    }

    pub fn script_timeout(&self) -> Option<Duration> {
        as_timeout(self.script.timeout_secs)
    }

    /// Split the lint command into program and leading args.
    pub fn lint_command(&self) -> Result<(&str, &[String])> {
        match self.lint.command.split_first() {
            Some((program, args)) if !program.is_empty() => Ok((program.as_str(), args)),
            _ => Err(DevkitError::InvalidConfig("lint.command is empty".into())),
        }
    }

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.lint_command().is_err() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "lint.command must name an executable".into(),
            });
        }

        for (key, secs) in [
            ("packages.timeout_secs", self.packages.timeout_secs),
            ("lint.timeout_secs", self.lint.timeout_secs),
            ("script.timeout_secs", self.script.timeout_secs),
        ] {
            if secs == 0 {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!("{key} is 0: commands will never time out"),
                });
            }
        }

        warnings
    }
}
