//! Logging initialization module
//!
//! Provides a single initialization point for the logging facility.

use std::sync::Once;
use tracing_subscriber::{util::SubscriberInitExt, EnvFilter};

/// Logging profile configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Human-readable output for development
    Development,
    /// JSON structured output for production
    Production,
    /// Test capture mode for deterministic testing
    Test,
}

static INIT_ONCE: Once = Once::new();

/// Default filter directive for a `-v` count.
///
/// `0` keeps warnings only, `1` adds the per-operation info events and `2`
/// or more turns on per-section debug events.
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "scrutiny=warn",
        1 => "scrutiny=info",
        _ => "scrutiny=debug",
    }
}

fn env_filter(verbosity: u8) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)))
}

/// Initialize the logging facility
///
/// This function should be called once at application startup. `RUST_LOG`
/// takes precedence over the verbosity-derived directive. Events go to
/// stderr so command output on stdout stays machine readable.
///
/// # Profiles
///
/// - **Development**: Human-readable logs
/// - **Production**: JSON structured logs
/// - **Test**: Capture mode for test assertions
///
/// # Example
///
/// ```
/// use scrutiny_core::logging_facility::{init, Profile};
///
/// init(Profile::Development, 0);
/// ```
pub fn init(profile: Profile, verbosity: u8) {
    INIT_ONCE.call_once(|| match profile {
        Profile::Development => {
            tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_env_filter(env_filter(verbosity))
                .init();
        }
        Profile::Production => {
            tracing_subscriber::fmt()
                .json()
                .with_writer(std::io::stderr)
                .with_env_filter(env_filter(verbosity))
                .init();
        }
        Profile::Test => {
            // Test capture is initialized separately via init_test_capture()
            tracing_subscriber::registry().init();
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_by_verbosity() {
        assert_eq!(default_directive(0), "scrutiny=warn");
        assert_eq!(default_directive(1), "scrutiny=info");
        assert_eq!(default_directive(2), "scrutiny=debug");
        assert_eq!(default_directive(9), "scrutiny=debug");
    }

    #[test]
    fn test_profile_equality() {
        assert_eq!(Profile::Development, Profile::Development);
        assert_ne!(Profile::Development, Profile::Production);
    }
}
