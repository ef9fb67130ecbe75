use clap::Parser;
use std::path::PathBuf;

use crate::board::BoardType;

#[derive(Parser)]
#[command(
    name = "fwversion",
    about = "Generating version information.",
    version = env!("GIT_DESCRIBE"),
    after_help = "Writes components/common/include/FirmwareVersion.h and firmware_version next to the fwversion executable.\n\
When --major, --minor and --build are all 0 the version is parsed from `git describe`.\n\n\
Environment:\n  USERNAME   recorded as BUILD_BUILDER\n  IDF_PATH   ESP-IDF checkout described as KERNEL_VERSION\n\n\
Logs are written to: ~/.local/share/fwversion/logs/fwversion.log"
)]
pub struct Cli {
    /// Major version
    #[arg(long, default_value_t = 0, help = "Major version")]
    pub major: u32,

    /// Minor version
    #[arg(long, default_value_t = 0, help = "Minor version")]
    pub minor: u32,

    /// Build version
    #[arg(long, default_value_t = 0, help = "Build version")]
    pub build: u32,

    /// Board type
    #[arg(long, value_enum, default_value_t = BoardType::Devboard, help = "Board type")]
    pub board: BoardType,

    /// WiFi network name
    #[arg(long, help = "WiFi network name (only for debugging)")]
    pub wifi_ssid: Option<String>,

    /// WiFi network password
    #[arg(long, help = "WiFi network password (only for debugging)")]
    pub wifi_psw: Option<String>,

    /// Path to config file
    #[arg(short, long, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Directory the output files are written under
    #[arg(short, long, help = "Directory the output files are written under (default: executable's directory)")]
    pub project_dir: Option<PathBuf>,

    /// Print the header instead of writing files
    #[arg(long, help = "Print the generated header instead of writing files")]
    pub dry_run: bool,
}
