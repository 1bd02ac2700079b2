// Compile-time constants from Cargo.toml and build.rs
pub const VERSION: &str = env!("AGENT_DEPLOY_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");

pub fn binary_name() -> &'static str {
    PKG_NAME
}

/// `<name> <version>` as printed by the version command
pub fn display() -> String {
    format!("{} {}", PKG_NAME, VERSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_starts_with_package_version() {
        assert!(VERSION.starts_with(env!("CARGO_PKG_VERSION")));
        assert_eq!(display(), format!("agent-deploy {}", VERSION));
        assert_eq!(binary_name(), "agent-deploy");
    }

    #[test]
    fn test_dev_builds_carry_commit() {
        if cfg!(debug_assertions) {
            let suffix = VERSION
                .strip_prefix(concat!(env!("CARGO_PKG_VERSION"), "-dev"))
                .unwrap();
            if let Some(sha) = suffix.strip_prefix('+') {
                assert!(!sha.is_empty() && sha.len() <= 8);
            } else {
                assert!(suffix.is_empty());
            }
        }
    }
}
