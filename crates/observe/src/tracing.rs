use {
    crate::{Config, panic_hook},
    std::{io::IsTerminal, sync::Once},
    tracing::{Level, Metadata},
    time::macros::format_description,
    tracing_subscriber::{
        EnvFilter,
        Layer,
        Registry,
        fmt::{time::UtcTime, writer::MakeWriterExt as _},
        prelude::*,
        util::SubscriberInitExt,
    },
};

/// Initializes tracing setup that is shared between the binaries.
/// `env_filter` has similar syntax to env_logger. It is documented at
/// https://docs.rs/tracing-subscriber/latest/tracing_subscriber/filter/struct.EnvFilter.html
pub fn initialize(config: &Config) {
    set_tracing_subscriber(config);
    panic_hook::install();
}

/// Like [`initialize`], but can be called multiple times in a row. Later calls
/// are ignored.
///
/// Useful for tests.
pub fn initialize_reentrant(config: &Config) {
    // The tracing subscriber below is global object so initializing it again in the
    // same process by a different thread would fail.
    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        set_tracing_subscriber(config);
        panic_hook::install();
    });
}

fn set_tracing_subscriber(config: &Config) {
    tracing_subscriber::registry()
        .with(fmt_layer(config))
        .init();
    tracing::debug!(filter = config.env_filter(), "initialized tracing");
}

fn fmt_layer(config: &Config) -> Box<dyn Layer<Registry> + Send + Sync> {
    // Events at or above the threshold go to stderr, everything else to stdout.
    let threshold = config.stderr_threshold();
    let writer = std::io::stderr
        .with_filter(move |meta: &Metadata<'_>| writes_to_stderr(threshold, *meta.level()))
        .or_else(std::io::stdout);
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_timer(UtcTime::new(format_description!(
            "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"
        )))
        .with_ansi(std::io::stdout().is_terminal());
    let filter = EnvFilter::new(config.env_filter());

    if config.use_json_format() {
        layer.json().with_filter(filter).boxed()
    } else {
        layer.with_filter(filter).boxed()
    }
}

/// Without a threshold nothing is written to stderr. Otherwise every level at
/// least as severe as the threshold is.
fn writes_to_stderr(threshold: Option<Level>, level: Level) -> bool {
    threshold.is_some_and(|threshold| level <= threshold)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_plain_and_json_layers() {
        let config = Config::default().with_env_filter("debug,chain=trace");
        let _ = fmt_layer(&config);
        let _ = fmt_layer(&config.with_json_format());
    }

    #[test]
    fn reentrant_initialization_ignores_later_calls() {
        let config = Config::default().with_env_filter("debug");
        initialize_reentrant(&config);
        initialize_reentrant(&config.with_json_format());
        tracing::debug!("logging still works");
    }

    #[test]
    fn stderr_receives_events_at_or_above_threshold() {
        let threshold = Some(Level::WARN);
        assert!(writes_to_stderr(threshold, Level::ERROR));
        assert!(writes_to_stderr(threshold, Level::WARN));
        assert!(!writes_to_stderr(threshold, Level::INFO));
        assert!(!writes_to_stderr(threshold, Level::TRACE));
    }

    #[test]
    fn disabled_threshold_keeps_stderr_silent() {
        assert!(!writes_to_stderr(None, Level::ERROR));
        assert!(!writes_to_stderr(None, Level::TRACE));
        let _ = fmt_layer(&Config::new("info", None, false));
    }
}
