use tracing_subscriber::{
    fmt::format::Format, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};
use webimg_core::LogFormat;

const DEFAULT_FILTER: &str =
    "webimg_api=debug,webimg_processing=debug,webimg_storage=debug,tower_http=debug";

/// Install the global tracing subscriber.
///
/// `RUST_LOG` overrides the default filter. Installing twice is an error, which
/// callers that may run more than once (tests) can ignore.
pub fn init_telemetry(format: LogFormat) -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());

    match format {
        LogFormat::Compact => {
            let console_fmt = tracing_subscriber::fmt::layer().event_format(
                Format::default()
                    .compact()
                    .with_target(false)
                    .without_time(),
            );
            tracing_subscriber::registry()
                .with(filter)
                .with(console_fmt)
                .try_init()?;
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json().with_current_span(false))
                .try_init()?;
        }
    }

    tracing::info!(format = ?format, "Tracing initialized");
    Ok(())
}
