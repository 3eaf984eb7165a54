//! Tracing/logging initialization.

use tracing_subscriber::EnvFilter;

use crate::config::LoggingSettings;

/// Builds the filter: `RUST_LOG` wins, then the configured directive.
fn build_filter(settings: &LoggingSettings) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.filter))
        .unwrap_or_else(|_| EnvFilter::new("info,equidesk=debug"))
}

/// Initialize tracing/logging for the process.
///
/// Safe to call multiple times (subsequent calls are no-ops). Returns false
/// when a global subscriber was already installed.
pub fn init_tracing(settings: &LoggingSettings) -> bool {
    let filter = build_filter(settings);

    let installed = if settings.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .with_target(false)
            .try_init()
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).try_init()
    };

    installed.is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_is_harmless() {
        let settings = LoggingSettings::default();
        init_tracing(&settings);
        assert!(!init_tracing(&settings));
    }

    #[test]
    fn test_bad_filter_falls_back() {
        let settings = LoggingSettings {
            filter: "equidesk=[".to_string(),
            json: true,
        };
        let filter = build_filter(&settings);
        assert!(!filter.to_string().is_empty());
    }
}
