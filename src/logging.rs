//! Structured logging setup.
//!
//! The library only emits `tracing` events; hosts that want them on stderr
//! (the Python extension, benches, ad-hoc tools) call [`init_logging`].
//! Filter precedence: explicit argument, then `CANIVETE_LOG`, then `warn`.

use tracing_subscriber::EnvFilter;

use crate::error::{CoreError, Result};

pub const LOG_ENV: &str = "CANIVETE_LOG";
pub const DEFAULT_FILTER: &str = "warn";

fn build_filter(filter: Option<&str>) -> Result<EnvFilter> {
    match filter {
        Some(directives) => EnvFilter::try_new(directives)
            .map_err(|e| CoreError::Logging(format!("invalid filter '{}': {}", directives, e))),
        None => Ok(EnvFilter::try_from_env(LOG_ENV)
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))),
    }
}

/// Install a global fmt subscriber. A second call is a no-op.
pub fn init_logging(filter: Option<&str>) -> Result<()> {
    let filter = build_filter(filter)?;
    // try_init fails only when a global subscriber already exists
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        assert!(init_logging(Some("canivete_core=debug")).is_ok());
        assert!(init_logging(None).is_ok());
    }

    #[test]
    fn test_invalid_filter_rejected() {
        assert!(matches!(
            init_logging(Some("canivete_core=notalevel")),
            Err(CoreError::Logging(_))
        ));
    }
}
