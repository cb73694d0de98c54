use std::path::Path;

use anyhow::{Context, Result};
use edugraph_core::BuildConfig;

pub const ENV_SENTINEL: &str = "EDUGRAPH_SENTINEL";
pub const ENV_JOIN_KEY: &str = "EDUGRAPH_JOIN_KEY";
pub const ENV_ON_MALFORMED: &str = "EDUGRAPH_ON_MALFORMED";

/// Loads the build configuration from `path` (defaults when `None`), then
/// applies environment overrides.
pub fn load(path: Option<&Path>) -> Result<BuildConfig> {
    let config = match path {
        Some(path) => BuildConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => BuildConfig::default(),
    };
    apply_overrides(config, |key| std::env::var(key).ok())
}

/// Overrides fields of `config` with whichever variables `lookup` returns.
pub fn apply_overrides<F>(mut config: BuildConfig, lookup: F) -> Result<BuildConfig>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(sentinel) = lookup(ENV_SENTINEL) {
        config.sentinel = sentinel;
    }
    if let Some(join_key) = lookup(ENV_JOIN_KEY) {
        config.join_key = join_key
            .parse()
            .with_context(|| format!("{ENV_JOIN_KEY} must be 'code' or 'name'"))?;
    }
    if let Some(policy) = lookup(ENV_ON_MALFORMED) {
        config.on_malformed = policy
            .parse()
            .with_context(|| format!("{ENV_ON_MALFORMED} must be 'abort' or 'report'"))?;
    }
    Ok(config)
}
