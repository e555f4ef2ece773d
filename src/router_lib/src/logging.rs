use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Install the process-wide `tracing` subscriber. `RUST_LOG` overrides
/// `default_directive`.
pub fn init_logging(default_directive: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_directive))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("Failed to initialise logging: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_directive_is_rejected() {
        std::env::remove_var("RUST_LOG");
        assert!(init_logging("router=notalevel").is_err());
    }
}
