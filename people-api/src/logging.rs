//! Tracing subscriber setup
//!
//! Two sinks share one `EnvFilter`: ERROR events go to stderr, everything
//! else (including the access log) goes to stdout.

use people_common::config::LogFormat;
use tracing::{Level, Metadata};
use tracing_subscriber::{
    filter::filter_fn, fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

const DEFAULT_FILTER: &str = "people_api=info,people_common=info,tower_http=info";

/// Install the global subscriber
///
/// `RUST_LOG` overrides the default filter.
pub fn init_logging(format: LogFormat) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let (stdout_layer, stderr_layer) = match format {
        LogFormat::Compact => (
            fmt::layer().with_writer(std::io::stdout).compact().boxed(),
            fmt::layer().with_writer(std::io::stderr).compact().boxed(),
        ),
        LogFormat::Json => (
            fmt::layer()
                .with_writer(std::io::stdout)
                .json()
                .with_current_span(true)
                .boxed(),
            fmt::layer()
                .with_writer(std::io::stderr)
                .json()
                .with_current_span(true)
                .boxed(),
        ),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer.with_filter(filter_fn(|meta| !is_error(meta))))
        .with(stderr_layer.with_filter(filter_fn(is_error)))
        .try_init()?;

    Ok(())
}

fn is_error(meta: &Metadata<'_>) -> bool {
    *meta.level() == Level::ERROR
}
