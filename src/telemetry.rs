use std::env;

use tracing_subscriber::EnvFilter;

/// Used when `RUST_LOG` is unset: our own events at info, dependencies only
/// when something goes wrong.
const DEFAULT_FILTER: &str = "warn,codenotes=info";

/// Install the global subscriber.
///
/// `CODENOTES_LOG=json` switches from compact lines to one JSON object per
/// event.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if json_requested(env::var("CODENOTES_LOG").ok().as_deref()) {
        builder.json().init();
    } else {
        builder.compact().init();
    }
}

fn json_requested(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.trim().eq_ignore_ascii_case("json"))
}
