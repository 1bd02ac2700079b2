use crate::error::{AgentDeployError, Result};
use std::collections::BTreeMap;

/// Parse `KEY=VALUE` pairs from CLI arguments
pub fn parse_env_args(env_args: &[String]) -> Result<BTreeMap<String, String>> {
    let mut env_vars = BTreeMap::new();

    for arg in env_args {
        if let Some((key, value)) = arg.split_once('=') {
            let key = key.trim();
            if key.is_empty() {
                return Err(AgentDeployError::InvalidConfig(format!(
                    "Invalid env format: {}. Key cannot be empty",
                    arg
                )));
            }
            env_vars.insert(key.to_string(), value.to_string());
        } else {
            return Err(AgentDeployError::InvalidConfig(format!(
                "Invalid env format: {}. Expected KEY=VALUE",
                arg
            )));
        }
    }

    Ok(env_vars)
}

/// Parse a comma-separated `KEY=VALUE,KEY2=VALUE2` list
///
/// Only the first `=` of each pair separates key from value.
pub fn parse_env_list(list: &str) -> Result<BTreeMap<String, String>> {
    let pairs: Vec<String> = list
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect();
    parse_env_args(&pairs)
}
