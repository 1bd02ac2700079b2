//! Diagnostic logging through `tracing`.
//!
//! Events go to stderr so that reports printed on stdout stay clean for
//! scripts. The filter comes from `AGENT_DEPLOY_LOG` when set, otherwise from
//! the verbosity flag.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

pub const LOG_ENV_VAR: &str = "AGENT_DEPLOY_LOG";

/// Install the global subscriber. Safe to call more than once; later calls are no-ops.
pub fn init_logging(verbose: bool) {
    let filter = build_env_filter(verbose);

    let _ = Registry::default()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(verbose)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .try_init();
}

fn build_env_filter(verbose: bool) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_env(LOG_ENV_VAR) {
        return filter;
    }
    EnvFilter::new(default_directive(verbose))
}

fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "agent_deploy=debug,info"
    } else {
        "agent_deploy=info,warn"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert!(default_directive(true).contains("agent_deploy=debug"));
        assert!(default_directive(false).contains("agent_deploy=info"));
    }

    #[test]
    fn test_init_twice_does_not_panic() {
        init_logging(false);
        init_logging(true);
    }
}
