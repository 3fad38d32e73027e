mod logging;

pub use logging::init_logging;

use ferrous_lookup_domain::{CliOverrides, Config};
use tracing::info;

pub fn load_config(path: Option<&str>, cli_overrides: CliOverrides) -> anyhow::Result<Config> {
    let config = Config::load(path, cli_overrides)?;
    config.validate()?;
    Ok(config)
}

pub fn log_startup(config: &Config) {
    info!(
        version = env!("CARGO_PKG_VERSION"),
        root_server = %config.resolver.root_server,
        max_hops = config.resolver.max_hops,
        max_attempts = config.transport.max_attempts,
        "Ferrous Lookup starting"
    );
}
