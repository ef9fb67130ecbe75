use eyre::{Context, Result};
use log::{debug, warn};
use std::io;
use std::path::Path;
use std::process::Command;

use crate::config::{GitConfig, GitFailurePolicy};

/// Values captured from git and the environment for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildMetadata {
    pub commit: String,
    pub branch: String,
    pub kernel_version: String,
    pub builder: String,
    /// `%Y-%m-%dT%H:%M:%S%z`, e.g. `2024-05-01T09:30:00+0200`
    pub build_time: String,
}

/// Everything the generator needs from the outside world.
pub trait MetadataProvider {
    /// Run `git <command>` (whitespace separated, no shell) and return its
    /// trimmed stdout.
    fn git_value(&self, command: &str, dir: Option<&Path>) -> Result<String>;

    /// Read an environment variable. Empty counts as unset.
    fn env_var(&self, name: &str) -> Option<String>;
}

/// Talks to the real `git` executable and process environment.
#[derive(Debug)]
pub struct SystemProvider {
    program: String,
    default_value: String,
    on_failure: GitFailurePolicy,
    git_available: bool,
}

impl SystemProvider {
    /// Probe for git once with `git --version`.
    pub fn detect(config: &GitConfig) -> Result<Self> {
        let git_available = match Command::new(&config.program).arg("--version").output() {
            Ok(output) => {
                debug!("{} --version: {}", config.program, String::from_utf8_lossy(&output.stdout).trim());
                true
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => false,
            Err(e) => return Err(e).context(format!("Failed to run {} --version", config.program)),
        };

        Ok(Self::new(config, git_available))
    }

    pub fn new(config: &GitConfig, git_available: bool) -> Self {
        Self {
            program: config.program.clone(),
            default_value: config.default_value.clone(),
            on_failure: config.on_failure,
            git_available,
        }
    }

    pub fn git_available(&self) -> bool {
        self.git_available
    }
}

impl MetadataProvider for SystemProvider {
    fn git_value(&self, command: &str, dir: Option<&Path>) -> Result<String> {
        if !self.git_available {
            return Ok(self.default_value.clone());
        }

        let mut cmd = Command::new(&self.program);
        cmd.args(command.split_whitespace());
        if let Some(dir) = dir {
            cmd.current_dir(dir);
        }

        debug!("Running git {} in {:?}", command, dir);
        let output = cmd
            .output()
            .context(format!("Failed to run git {}", command))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            match self.on_failure {
                GitFailurePolicy::Propagate => {
                    return Err(eyre::eyre!(
                        "git {} failed ({}): {}",
                        command,
                        output.status,
                        stderr.trim()
                    ));
                }
                GitFailurePolicy::Fallback => {
                    warn!(
                        "git {} failed ({}), using '{}': {}",
                        command,
                        output.status,
                        self.default_value,
                        stderr.trim()
                    );
                    return Ok(self.default_value.clone());
                }
            }
        }

        let stdout = String::from_utf8(output.stdout).context(format!("git {} printed invalid UTF-8", command))?;
        Ok(stdout.trim_end_matches(&['\r', '\n'][..]).to_string())
    }

    fn env_var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok().filter(|value| !value.is_empty())
    }
}
