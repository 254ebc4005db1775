use anyhow::Context;
use sales_api::{logging, metrics, server};
use sales_config::Config;
use tracing::{error, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("loading configuration")?;
    let _log_guard = logging::init_tracing(&config.log)?;

    let prometheus = match metrics::init_prometheus() {
        Ok(handle) => Some(handle),
        Err(err) => {
            warn!(error = %format!("{err:#}"), "prometheus exporter disabled");
            None
        }
    };

    if let Err(err) = server::run(config, prometheus).await {
        error!(error = %format!("{err:#}"), "service stopped with error");
        return Err(err);
    }

    Ok(())
}
