use eyre::Result;
use log::warn;

use crate::config::{BuilderConfig, MissingBuilderPolicy};
use crate::metadata::MetadataProvider;

/// Identify who produced the build, as `user:<name>`.
pub fn resolve_builder(provider: &dyn MetadataProvider, config: &BuilderConfig) -> Result<String> {
    let name = match provider.env_var(&config.env_var) {
        Some(name) => name,
        None => match config.on_missing {
            MissingBuilderPolicy::Fail => {
                return Err(eyre::eyre!(
                    "{} is not set, cannot record who built the firmware (set it, or use builder.on_missing: placeholder)",
                    config.env_var
                ));
            }
            MissingBuilderPolicy::Placeholder => {
                warn!("{} is not set, recording builder as '{}'", config.env_var, config.placeholder);
                config.placeholder.clone()
            }
        },
    };

    Ok(format!("user:{}", name))
}
