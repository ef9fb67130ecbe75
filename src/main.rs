use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::{info, warn};

use std::fs;
use std::path::{Path, PathBuf};

use fwversion::cli::Cli;
use fwversion::config::Config;
use fwversion::{OutputConfig, SystemProvider, VersionInfo, WifiCredentials, generate};

fn setup_logging() -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("fwversion")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("fwversion.log");

    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

/// Output paths are relative to the directory holding the executable (symlinks
/// resolved), not the shell's working directory.
fn executable_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("Failed to locate the fwversion executable")?;
    let exe = exe
        .canonicalize()
        .context(format!("Failed to resolve {}", exe.display()))?;

    exe.parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| eyre::eyre!("Executable {} has no parent directory", exe.display()))
}

fn resolve_project_dir(from_cli: Option<&PathBuf>, from_config: Option<&PathBuf>) -> Result<PathBuf> {
    match from_cli.or(from_config) {
        Some(dir) => Ok(dir.clone()),
        None => executable_dir(),
    }
}

fn run(cli: Cli, config: &Config) -> Result<()> {
    let build_time = chrono::Local::now().fixed_offset();

    let provider = SystemProvider::detect(&config.git)?;
    if !provider.git_available() {
        warn!("{} not found, git values fall back to '{}'", config.git.program, config.git.default_value);
        eprintln!(
            "{} Warning: git tool is not available, using \"{}\"",
            "⚠".yellow(),
            config.git.default_value
        );
    }

    let project_dir = resolve_project_dir(cli.project_dir.as_ref(), config.project_dir.as_ref())?;
    info!("Project directory: {}", project_dir.display());

    let output = OutputConfig::new(
        &project_dir,
        &config.output,
        cli.board,
        WifiCredentials::from_args(cli.wifi_ssid, cli.wifi_psw),
    );
    let explicit = VersionInfo::new(cli.major, cli.minor, cli.build);

    let generated = generate(&provider, config, explicit, &output, &build_time)?;

    if cli.dry_run {
        print!("{}", generated.header);
        return Ok(());
    }

    generated.write(&output)?;
    info!("Generated firmware version {}", generated.version);
    Ok(())
}

fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!("Starting fwversion for board {}", cli.board);

    run(cli, &config).context("Failed to generate version information")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_dir_prefers_cli() {
        let cli_dir = PathBuf::from("/from/cli");
        let config_dir = PathBuf::from("/from/config");

        let dir = resolve_project_dir(Some(&cli_dir), Some(&config_dir)).unwrap();
        assert_eq!(dir, cli_dir);
    }

    #[test]
    fn test_project_dir_falls_back_to_config() {
        let config_dir = PathBuf::from("/from/config");

        let dir = resolve_project_dir(None, Some(&config_dir)).unwrap();
        assert_eq!(dir, config_dir);
    }

    #[test]
    fn test_project_dir_defaults_to_executable_dir() {
        let dir = resolve_project_dir(None, None).unwrap();
        let exe = std::env::current_exe().unwrap().canonicalize().unwrap();
        assert_eq!(dir, exe.parent().unwrap());
    }
}
