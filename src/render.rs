use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

use crate::board::BoardType;
use crate::config::OutputPaths;
use crate::metadata::BuildMetadata;
use crate::version::VersionInfo;

/// The firmware only targets one architecture.
pub const HARDWARE_ARCH: &str = "esp32";

/// Debug-only network credentials baked into the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WifiCredentials {
    pub ssid: String,
    pub password: Option<String>,
}

impl WifiCredentials {
    /// Credentials exist only when an SSID was given; a lone password is dropped.
    pub fn from_args(ssid: Option<String>, password: Option<String>) -> Option<Self> {
        match ssid {
            Some(ssid) => Some(Self { ssid, password }),
            None => {
                if password.is_some() {
                    log::warn!("--wifi-psw given without --wifi-ssid, ignoring it");
                }
                None
            }
        }
    }
}

/// Where the artifacts go and the per-run values that only the renderer cares about.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub header_path: PathBuf,
    pub version_file_path: PathBuf,
    pub board: BoardType,
    pub wifi: Option<WifiCredentials>,
}

impl OutputConfig {
    pub fn new(project_dir: &Path, paths: &OutputPaths, board: BoardType, wifi: Option<WifiCredentials>) -> Self {
        Self {
            header_path: project_dir.join(&paths.header_path),
            version_file_path: project_dir.join(&paths.version_file_path),
            board,
            wifi,
        }
    }
}

pub struct HeaderFields<'a> {
    pub model: &'a str,
    pub version: VersionInfo,
    pub metadata: &'a BuildMetadata,
    pub board: BoardType,
    pub wifi: Option<&'a WifiCredentials>,
}

/// Render the C header. Key names are consumed by the firmware sources and must not change.
pub fn render_header(fields: &HeaderFields) -> String {
    let VersionInfo { major, minor, build } = fields.version;
    let metadata = fields.metadata;

    let mut header = format!(
        r#"#pragma once

#define MODEL "{model}"

#define FIRMWARE_VER_MAJOR {major}
#define FIRMWARE_VER_MINOR {minor}
#define FIRMWARE_VER_PATCH {build}
#define FIRMWARE_VERSION "{major}.{minor}.{build}"
#define KERNEL_VERSION "{kernel}"
#define HARDWARE_ARCH "{arch}"
#define HARDWARE_VERSION "{board}"

#define BUILD_TIME "{build_time}"
#define BUILD_BUILDER "{builder}"
#define BUILD_BRANCH "{branch}"
#define BUILD_COMMIT "{commit}"
"#,
        model = fields.model,
        kernel = metadata.kernel_version,
        arch = HARDWARE_ARCH,
        board = fields.board.label(),
        build_time = metadata.build_time,
        builder = metadata.builder,
        branch = metadata.branch,
        commit = metadata.commit,
    );

    if let Some(wifi) = fields.wifi {
        header.push_str(&format!("#define DEFAULT_WIFI_SSID \"{}\"\n", wifi.ssid));
        header.push_str(&format!(
            "#define DEFAULT_WIFI_PASSWORD \"{}\"\n",
            wifi.password.as_deref().unwrap_or("")
        ));
    }

    header
}

/// Plain `major.minor.build`, no trailing newline.
pub fn render_version_file(version: &VersionInfo) -> String {
    version.to_string()
}

/// Truncate and rewrite both artifacts. Not atomic: an interrupted write
/// leaves a partial header until the next run.
pub fn write_outputs(output: &OutputConfig, header: &str, version_file: &str) -> Result<()> {
    fs::write(&output.header_path, header)
        .context(format!("Failed to write version header {}", output.header_path.display()))?;
    info!("Wrote {}", output.header_path.display());

    fs::write(&output.version_file_path, version_file)
        .context(format!("Failed to write version file {}", output.version_file_path.display()))?;
    info!("Wrote {}", output.version_file_path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn metadata() -> BuildMetadata {
        BuildMetadata {
            commit: "0123456789abcdef0123456789abcdef01234567".to_string(),
            branch: "main".to_string(),
            kernel_version: "v5.1.2".to_string(),
            builder: "user:alice".to_string(),
            build_time: "2024-05-01T09:30:00+0200".to_string(),
        }
    }

    fn fields<'a>(metadata: &'a BuildMetadata, wifi: Option<&'a WifiCredentials>) -> HeaderFields<'a> {
        HeaderFields {
            model: "ATOM32",
            version: VersionInfo::new(1, 2, 3),
            metadata,
            board: BoardType::Rev1,
            wifi,
        }
    }

    #[test]
    fn test_render_header_exact() {
        let metadata = metadata();
        let header = render_header(&fields(&metadata, None));

        let expected = "#pragma once\n\
\n\
#define MODEL \"ATOM32\"\n\
\n\
#define FIRMWARE_VER_MAJOR 1\n\
#define FIRMWARE_VER_MINOR 2\n\
#define FIRMWARE_VER_PATCH 3\n\
#define FIRMWARE_VERSION \"1.2.3\"\n\
#define KERNEL_VERSION \"v5.1.2\"\n\
#define HARDWARE_ARCH \"esp32\"\n\
#define HARDWARE_VERSION \"rev1\"\n\
\n\
#define BUILD_TIME \"2024-05-01T09:30:00+0200\"\n\
#define BUILD_BUILDER \"user:alice\"\n\
#define BUILD_BRANCH \"main\"\n\
#define BUILD_COMMIT \"0123456789abcdef0123456789abcdef01234567\"\n";

        assert_eq!(header, expected);
        assert!(!header.contains("WIFI"));
    }

    #[test]
    fn test_render_header_wifi_without_password() {
        let metadata = metadata();
        let wifi = WifiCredentials {
            ssid: "Net".to_string(),
            password: None,
        };
        let header = render_header(&fields(&metadata, Some(&wifi)));

        assert!(header.ends_with(
            "#define BUILD_COMMIT \"0123456789abcdef0123456789abcdef01234567\"\n\
#define DEFAULT_WIFI_SSID \"Net\"\n\
#define DEFAULT_WIFI_PASSWORD \"\"\n"
        ));
    }

    #[test]
    fn test_render_header_wifi_with_password() {
        let metadata = metadata();
        let wifi = WifiCredentials {
            ssid: "Net".to_string(),
            password: Some("secret".to_string()),
        };
        let header = render_header(&fields(&metadata, Some(&wifi)));

        assert!(header.contains("#define DEFAULT_WIFI_SSID \"Net\"\n"));
        assert!(header.contains("#define DEFAULT_WIFI_PASSWORD \"secret\"\n"));
    }

    #[test]
    fn test_wifi_from_args() {
        assert_eq!(WifiCredentials::from_args(None, Some("secret".to_string())), None);
        assert_eq!(
            WifiCredentials::from_args(Some("Net".to_string()), None),
            Some(WifiCredentials {
                ssid: "Net".to_string(),
                password: None
            })
        );
    }

    #[test]
    fn test_render_version_file_has_no_newline() {
        assert_eq!(render_version_file(&VersionInfo::new(1, 2, 3)), "1.2.3");
    }

    #[test]
    fn test_write_outputs_truncates() {
        let temp_dir = TempDir::new().unwrap();
        let paths = OutputPaths {
            header_path: PathBuf::from("Version.h"),
            version_file_path: PathBuf::from("firmware_version"),
        };
        let output = OutputConfig::new(temp_dir.path(), &paths, BoardType::Devboard, None);

        fs::write(&output.header_path, "stale content that is much longer than the new one").unwrap();
        fs::write(&output.version_file_path, "10.20.30-old").unwrap();

        write_outputs(&output, "#pragma once\n", "1.2.3").unwrap();

        assert_eq!(fs::read_to_string(&output.header_path).unwrap(), "#pragma once\n");
        assert_eq!(fs::read(&output.version_file_path).unwrap(), b"1.2.3");
    }

    #[test]
    fn test_write_outputs_missing_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let output = OutputConfig::new(temp_dir.path(), &OutputPaths::default(), BoardType::Devboard, None);

        let result = write_outputs(&output, "#pragma once\n", "1.2.3");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Failed to write version header"));
    }
}
