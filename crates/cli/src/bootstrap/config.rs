use ferrous_probe_domain::config::{CliOverrides, Config};
use tracing::info;

pub fn load_config(config_path: Option<&str>, cli_overrides: CliOverrides) -> anyhow::Result<Config> {
    let config = Config::load(config_path, cli_overrides)?;
    config.validate()?;

    info!(
        config_file = config_path.unwrap_or("default"),
        bind = %config.server.bind_address(),
        servers = config.servers.len(),
        timeout_secs = config.dns.timeout_secs,
        max_retries = config.dns.max_retries,
        "Configuration loaded"
    );

    Ok(config)
}
