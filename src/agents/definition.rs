//! Data structures for agent definitions.

use serde::{Deserialize, Serialize};

/// A deployable agent as declared in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentDefinition {
    /// Identifier used on the command line and in deployment metadata
    pub id: String,

    /// Display name of the Agent Engine resource; used to find existing deployments
    pub display_name: String,

    #[serde(default)]
    pub description: String,

    /// Path prefix owning this agent's sources, relative to the project root
    pub directory: String,

    /// Paths bundled into the source archive
    #[serde(default = "default_extra_packages")]
    pub extra_packages: Vec<String>,

    /// Python module holding the agent object (defaults to `<dir>.agent`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entrypoint_module: Option<String>,

    #[serde(default = "default_entrypoint_object")]
    pub entrypoint_object: String,
}

fn default_extra_packages() -> Vec<String> {
    vec!["./app".to_string()]
}

fn default_entrypoint_object() -> String {
    "root_agent".to_string()
}

impl AgentDefinition {
    pub fn new(id: &str, display_name: &str, description: &str) -> Self {
        Self {
            id: id.to_string(),
            display_name: display_name.to_string(),
            description: description.to_string(),
            directory: format!("app/{}/", id),
            extra_packages: default_extra_packages(),
            entrypoint_module: None,
            entrypoint_object: default_entrypoint_object(),
        }
    }

    /// Directory prefix normalized to end with a single `/`
    pub fn directory_prefix(&self) -> String {
        let trimmed = self.directory.trim_start_matches("./").trim_end_matches('/');
        format!("{}/", trimmed)
    }

    /// Python module path of the entrypoint, e.g. `app.chat_agent.agent`
    pub fn entrypoint_module(&self) -> String {
        match &self.entrypoint_module {
            Some(module) => module.clone(),
            None => {
                let dotted = self
                    .directory_prefix()
                    .trim_end_matches('/')
                    .replace('/', ".");
                format!("{}.agent", dotted)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_app_directory() {
        let agent = AgentDefinition::new("chat_agent", "Chat Agent", "chat");
        assert_eq!(agent.directory, "app/chat_agent/");
        assert_eq!(agent.extra_packages, vec!["./app"]);
        assert_eq!(agent.entrypoint_object, "root_agent");
    }

    #[test]
    fn test_directory_prefix_normalization() {
        let mut agent = AgentDefinition::new("a", "A", "");
        agent.directory = "./agents/a".to_string();
        assert_eq!(agent.directory_prefix(), "agents/a/");

        agent.directory = "agents/a//".to_string();
        assert_eq!(agent.directory_prefix(), "agents/a/");
    }

    #[test]
    fn test_entrypoint_module_derived_from_directory() {
        let agent = AgentDefinition::new("alert_agent", "Alert Agent", "");
        assert_eq!(agent.entrypoint_module(), "app.alert_agent.agent");
    }

    #[test]
    fn test_entrypoint_module_override() {
        let mut agent = AgentDefinition::new("alert_agent", "Alert Agent", "");
        agent.entrypoint_module = Some("app.alert_agent.engine".to_string());
        assert_eq!(agent.entrypoint_module(), "app.alert_agent.engine");
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let toml = r#"
            id = "chat_agent"
            display_name = "Chat Agent"
            directory = "app/chat_agent/"
        "#;
        let agent: AgentDefinition = toml::from_str(toml).unwrap();
        assert_eq!(agent.description, "");
        assert_eq!(agent.extra_packages, vec!["./app"]);
        assert_eq!(agent.entrypoint_object, "root_agent");
        assert!(agent.entrypoint_module.is_none());
    }
}
