//! Registry of deployable agents.

use super::definition::AgentDefinition;
use crate::classifier::AgentDirectoryMap;
use crate::error::{AgentDeployError, Result};
use std::collections::{HashMap, HashSet};

/// Registry of configured agents, in declaration order
#[derive(Debug, Clone)]
pub struct AgentRegistry {
    agents: Vec<AgentDefinition>,
}

impl AgentRegistry {
    /// Build a registry from configured agents, falling back to the built-in set
    pub fn from_definitions(definitions: &[AgentDefinition]) -> Result<Self> {
        let agents = if definitions.is_empty() {
            default_agents()
        } else {
            definitions.to_vec()
        };

        let mut seen = HashSet::new();
        let mut directories = HashMap::new();
        for agent in &agents {
            validate_agent(agent)?;
            if !seen.insert(agent.id.as_str()) {
                return Err(AgentDeployError::InvalidConfig(format!(
                    "Agent '{}' is declared more than once",
                    agent.id
                )));
            }
            // Each directory must map to exactly one agent for change classification
            if let Some(owner) = directories.insert(agent.directory_prefix(), agent.id.as_str()) {
                return Err(AgentDeployError::InvalidConfig(format!(
                    "Agents '{}' and '{}' share directory '{}'",
                    owner,
                    agent.id,
                    agent.directory_prefix()
                )));
            }
        }

        Ok(Self { agents })
    }

    /// Registry with the built-in agents only
    pub fn builtin() -> Self {
        Self {
            agents: default_agents(),
        }
    }

    /// Get an agent by ID
    pub fn get(&self, id: &str) -> Option<&AgentDefinition> {
        self.agents.iter().find(|a| a.id == id)
    }

    /// List all agent IDs in declaration order
    pub fn ids(&self) -> Vec<String> {
        self.agents.iter().map(|a| a.id.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AgentDefinition> {
        self.agents.iter()
    }

    /// Resolve a list of IDs, failing on the first unknown one
    pub fn resolve(&self, ids: &[String]) -> Result<Vec<&AgentDefinition>> {
        ids.iter()
            .map(|id| {
                self.get(id)
                    .ok_or_else(|| AgentDeployError::UnknownAgent(id.clone()))
            })
            .collect()
    }

    /// Directory prefix to agent ID mapping used by change classification
    pub fn directory_map(&self) -> AgentDirectoryMap {
        self.agents
            .iter()
            .map(|a| (a.directory_prefix(), a.id.clone()))
            .collect()
    }
}

/// Validate that an agent definition is complete and usable
fn validate_agent(agent: &AgentDefinition) -> Result<()> {
    if agent.id.trim().is_empty() {
        return Err(AgentDeployError::InvalidConfig(
            "Agent id cannot be empty".to_string(),
        ));
    }
    if agent.display_name.trim().is_empty() {
        return Err(AgentDeployError::InvalidConfig(format!(
            "Agent '{}' display_name cannot be empty",
            agent.id
        )));
    }
    if agent.directory.trim_matches(|c| c == '/' || c == '.').is_empty() {
        return Err(AgentDeployError::InvalidConfig(format!(
            "Agent '{}' directory cannot be empty",
            agent.id
        )));
    }
    Ok(())
}

fn default_agents() -> Vec<AgentDefinition> {
    vec![
        AgentDefinition::new(
            "summarize_agent",
            "Summarize Agent",
            "Specialized summarization agent for creating concise summaries, key points extraction, and executive summaries",
        ),
        AgentDefinition::new(
            "chat_agent",
            "Chat Agent",
            "Friendly and knowledgeable conversational agent for general assistance and engaging dialogue",
        ),
        AgentDefinition::new(
            "alert_agent",
            "Alert Agent",
            "Specialized alert management agent for creating, monitoring, and managing system notifications",
        ),
    ]
}
