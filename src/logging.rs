use std::fs;

use anyhow::Context;
use sales_config::{LogConfig, LogFormat};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initializes the global subscriber.
///
/// - **Console**: compact, or JSON when `LOG_FORMAT=json`. Filtered by
///   `RUST_LOG` when set, otherwise `sales_api=<LOG_LEVEL>,tower_http=warn`.
/// - **File**: when `LOG_DIR` is set, structured JSON at `info` and above in
///   a daily rolling `sales-api.json`.
///
/// The returned guard flushes the file writer on drop; keep it alive for the
/// life of the process.
pub fn init_tracing(config: &LogConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let console_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{}={},sales_web={},tower_http=warn",
            env!("CARGO_CRATE_NAME"),
            config.level,
            config.level
        ))
    });

    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();

    let console = match config.format {
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_filter(console_filter)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_filter(console_filter)
            .boxed(),
    };
    layers.push(console);

    let guard = match &config.dir {
        Some(dir) => {
            fs::create_dir_all(dir).with_context(|| format!("creating log directory {dir}"))?;

            let appender = RollingFileAppender::new(Rotation::DAILY, dir, "sales-api.json");
            let (writer, guard) = tracing_appender::non_blocking(appender);

            layers.push(
                fmt::layer()
                    .json()
                    .with_writer(writer)
                    .with_ansi(false)
                    .with_filter(EnvFilter::new("info"))
                    .boxed(),
            );
            Some(guard)
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .context("installing tracing subscriber")?;

    Ok(guard)
}
