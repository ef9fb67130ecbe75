use chrono::{DateTime, FixedOffset};
use eyre::{Context, Result};
use log::info;
use std::path::Path;

use crate::builder::resolve_builder;
use crate::config::Config;
use crate::metadata::{BuildMetadata, MetadataProvider};
use crate::render::{self, HeaderFields, OutputConfig};
use crate::version::VersionInfo;

pub const BUILD_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

const DESCRIBE: &str = "describe --first-parent --always";

/// One generation run: the resolved values and both rendered artifacts.
#[derive(Debug, Clone)]
pub struct Generated {
    pub version: VersionInfo,
    pub metadata: BuildMetadata,
    pub header: String,
    pub version_file: String,
}

impl Generated {
    pub fn write(&self, output: &OutputConfig) -> Result<()> {
        render::write_outputs(output, &self.header, &self.version_file)
    }
}

pub fn format_build_time(build_time: &DateTime<FixedOffset>) -> String {
    build_time.format(BUILD_TIME_FORMAT).to_string()
}

/// Query git and the environment, resolve the version and render the artifacts.
pub fn generate(
    provider: &dyn MetadataProvider,
    config: &Config,
    explicit: VersionInfo,
    output: &OutputConfig,
    build_time: &DateTime<FixedOffset>,
) -> Result<Generated> {
    let repo_dir = config.git.repo_dir.as_deref();

    let commit = provider
        .git_value("rev-parse HEAD", repo_dir)
        .context("Failed to read commit hash")?;
    let branch = provider
        .git_value("rev-parse --abbrev-ref HEAD", repo_dir)
        .context("Failed to read branch")?;
    let describe = provider.git_value(DESCRIBE, repo_dir).context("Failed to describe firmware")?;

    let version = VersionInfo::resolve(explicit, &describe);
    if explicit.is_unset() {
        info!("Resolved version {} from describe '{}'", version, describe);
    } else {
        info!("Using explicit version {}", version);
    }

    let kernel_dir = provider.env_var(&config.kernel.env_var).ok_or_else(|| {
        eyre::eyre!(
            "{} is not set, cannot determine the kernel version",
            config.kernel.env_var
        )
    })?;
    let kernel_version = provider
        .git_value(DESCRIBE, Some(Path::new(&kernel_dir)))
        .context(format!("Failed to describe kernel at {}", kernel_dir))?;

    let builder = resolve_builder(provider, &config.builder)?;

    let metadata = BuildMetadata {
        commit,
        branch,
        kernel_version,
        builder,
        build_time: format_build_time(build_time),
    };

    let header = render::render_header(&HeaderFields {
        model: &config.model,
        version,
        metadata: &metadata,
        board: output.board,
        wifi: output.wifi.as_ref(),
    });
    let version_file = render::render_version_file(&version);

    Ok(Generated {
        version,
        metadata,
        header,
        version_file,
    })
}
