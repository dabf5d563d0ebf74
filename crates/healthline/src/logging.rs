//! Diagnostics for healthline runs
//!
//! Everything goes to stderr; stdout carries only the report, which is
//! usually piped straight into a login banner.
//!
//! `$HEALTHLINE_LOG` is known before the config file is read, so it installs
//! the subscriber up front. Without it the configured `log.level` applies
//! once the config is loaded.

use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Filter override, same syntax as `RUST_LOG`
pub const ENV_LOG: &str = "HEALTHLINE_LOG";

const FALLBACK_LEVEL: &str = "warn";

/// Non-blank `$HEALTHLINE_LOG` value
pub fn env_directive(env_value: Option<String>) -> Option<String> {
    env_value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Pick the filter directive: `$HEALTHLINE_LOG` wins over the configured
/// level. Blank values fall through.
pub fn filter_directive(env_value: Option<String>, configured: &str) -> String {
    env_directive(env_value)
        .or_else(|| {
            let configured = configured.trim();
            (!configured.is_empty()).then(|| configured.to_string())
        })
        .unwrap_or_else(|| FALLBACK_LEVEL.to_string())
}

/// Install the subscriber from `$HEALTHLINE_LOG` alone. Returns true if the
/// variable was set and the subscriber is now in place.
pub fn init_from_env() -> bool {
    match env_directive(std::env::var(ENV_LOG).ok()) {
        Some(directive) => install(&directive),
        None => false,
    }
}

/// Install the global subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init(configured_level: &str) {
    let directive = filter_directive(std::env::var(ENV_LOG).ok(), configured_level);
    install(&directive);
}

fn install(directive: &str) -> bool {
    let filter = EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new(FALLBACK_LEVEL));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .is_ok();

    if installed {
        debug!("Logging initialized with filter {}", directive);
    }
    installed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_overrides_config() {
        assert_eq!(
            filter_directive(Some("debug".to_string()), "warn"),
            "debug"
        );
    }

    #[test]
    fn test_config_level_used_without_env() {
        assert_eq!(filter_directive(None, "info"), "info");
        assert_eq!(filter_directive(Some("  ".to_string()), "info"), "info");
    }

    #[test]
    fn test_fallback_level() {
        assert_eq!(filter_directive(None, ""), "warn");
    }

    #[test]
    fn test_env_directive_needs_a_value() {
        assert_eq!(env_directive(None), None);
        assert_eq!(env_directive(Some(" \t".to_string())), None);
        assert_eq!(
            env_directive(Some(" healthline_common=debug ".to_string())),
            Some("healthline_common=debug".to_string())
        );
    }
}
