//! HTTP service command: `readme-genie serve`.

use std::path::Path;

use anyhow::Result;
use readme_genie::config::GenieConfig;
use readme_genie::pipeline::Pipeline;
use readme_genie::server::{ServerConfig, start_server};

pub async fn cmd_serve(
    config_path: Option<&Path>,
    host: Option<String>,
    port: Option<u16>,
    dev: bool,
) -> Result<()> {
    let mut config = GenieConfig::resolve(config_path)?;
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    for warning in config.validate() {
        tracing::warn!(%warning, "Configuration warning");
    }

    let pipeline = Pipeline::from_config(&config);
    start_server(
        ServerConfig {
            host: config.server.host.clone(),
            port: config.server.port,
            request_timeout: config.request_timeout(),
            dev_mode: dev,
        },
        pipeline,
    )
    .await
}
