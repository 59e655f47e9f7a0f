//! Subscriber setup for the binary.
//!
//! Filter directives come from `DASHGRID_LOG` (default `warn`). Output goes
//! to stderr so `--json` stdout stays machine-readable.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

pub const LOG_ENV: &str = "DASHGRID_LOG";
const DEFAULT_DIRECTIVES: &str = "warn";

/// Build the filter from `raw` directives, falling back to `warn`.
#[must_use]
pub fn filter_from(raw: Option<&str>) -> EnvFilter {
    raw.and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVES))
}

/// Install the global subscriber. Repeated calls are ignored.
pub fn init(json: bool) {
    let raw = std::env::var(LOG_ENV).ok();
    let filter = filter_from(raw.as_deref());
    let registry = tracing_subscriber::registry().with(filter);

    let result = if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };
    // A subscriber installed by an embedding host wins.
    let _ = result;
}
