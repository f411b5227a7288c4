use std::io;
use tracing::Level;
use tracing_appender::rolling;
use tracing_subscriber::filter::FilterFn;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Install the stdout and rolling-file subscribers for the whole process.
pub fn configure_logging() {
    // The HTML parser behind `scraper` emits serializer warnings we never
    // act on; drop them at the subscriber.
    let html5ever_filter = FilterFn::new(|metadata| {
        !(metadata.level() == &Level::WARN && metadata.target() == "html5ever::serialize")
    });

    let stdout_log = fmt::layer()
        .with_writer(io::stdout)
        .with_filter(EnvFilter::new("info,web_request=info,db_query=warn,sqlx=off"))
        .with_filter(html5ever_filter);

    // Full per-request detail goes to the daily file only
    let file_appender = rolling::daily("logs", "pharmakon.log");
    let file_log = fmt::layer()
        .with_writer(file_appender)
        .with_filter(EnvFilter::new("debug,sqlx=info"));

    tracing_subscriber::Registry::default()
        .with(stdout_log)
        .with(file_log)
        .init();
}
