use anyhow::Context;
use ferrous_query_domain::config::CliOverrides;
use ferrous_query_domain::Config;

/// Runs before logging is set up, so failures are only reported through
/// the returned error.
pub fn load_config(path: Option<&str>, cli_overrides: CliOverrides) -> anyhow::Result<Config> {
    let config = Config::load(path, cli_overrides).context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;
    Ok(config)
}
