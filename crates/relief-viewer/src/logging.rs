//! Tracing subscriber setup

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// GPU stack crates are noisy at info; keep them at warn unless RUST_LOG says otherwise.
const QUIET_CRATES: &[&str] = &["wgpu", "wgpu_core", "wgpu_hal", "naga"];

/// Filter used when `RUST_LOG` is unset
pub fn default_filter(verbose: bool) -> EnvFilter {
    let level = if verbose { "debug" } else { "info" };
    QUIET_CRATES
        .iter()
        .filter_map(|krate| format!("{}=warn", krate).parse().ok())
        .fold(EnvFilter::new(level), |filter, directive| {
            filter.add_directive(directive)
        })
}

/// Install the global subscriber. `RUST_LOG` wins over `verbose`.
///
/// Calling this twice is harmless; the second subscriber is dropped.
pub fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(verbose));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_quiets_gpu_crates() {
        let rendered = default_filter(false).to_string();
        assert!(rendered.contains("info"));
        assert!(rendered.contains("wgpu_core=warn"));
        assert!(rendered.contains("naga=warn"));
    }

    #[test]
    fn verbose_raises_level() {
        assert!(default_filter(true).to_string().contains("debug"));
    }
}
