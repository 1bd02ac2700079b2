//! Agent definitions and the registry of deployable agents.
//!
//! Each agent lives in its own directory of the project, ships a set of
//! source paths with it, and owns one Agent Engine resource identified by its
//! display name.
//!
//! # Example
//!
//! ```toml
//! [[agents]]
//! id = "chat_agent"
//! display_name = "Chat Agent"
//! description = "Conversational agent for general assistance"
//! directory = "app/chat_agent/"
//! extra_packages = ["./app"]
//! ```

pub mod definition;
pub mod registry;

pub use definition::AgentDefinition;
pub use registry::AgentRegistry;
