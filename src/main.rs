use anyhow::{Context, Result};
use log::info;
use std::env;

const CONFIG_ENV: &str = "FORWARDNS_CONFIG";
const DEFAULT_CONFIG: &str = "config.json";

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let path = env::args()
        .nth(1)
        .or_else(|| env::var(CONFIG_ENV).ok())
        .unwrap_or_else(|| DEFAULT_CONFIG.to_string());

    let config = forwardns::load_config(&path)
        .with_context(|| format!("Invalid config file: {}", path))?;

    let upstream = &config.upstream_nameservers;
    for (role, ns) in [("primary", &upstream.primary), ("secondary", &upstream.secondary)] {
        info!("Upstream {}: {:?}", role, ns.socket_addrs());
    }

    let rendered = serde_json::to_string_pretty(&config)
        .context("Failed to render normalized config")?;
    println!("{}", rendered);
    Ok(())
}
