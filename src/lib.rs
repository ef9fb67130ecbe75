pub mod board;
pub mod builder;
pub mod cli;
pub mod config;
pub mod generate;
pub mod metadata;
pub mod render;
pub mod version;

pub use board::BoardType;
pub use generate::{Generated, generate};
pub use metadata::{BuildMetadata, MetadataProvider, SystemProvider};
pub use render::{OutputConfig, WifiCredentials};
pub use version::VersionInfo;
