//! Vertex AI Agent Engine (reasoning engine) resources and client.

pub mod client;
pub mod types;

pub use client::{TokenSource, VertexAgentEngine};
pub use types::{
    DeploymentSpec, EnvVar, InlineSource, Operation, PythonSpec, ReasoningEngine,
    ReasoningEngineSpec, SourceCodeSpec,
};

use crate::error::Result;

/// Operations the deployer needs from the hosting service
pub trait AgentEngine {
    /// Every reasoning engine in the configured project and location
    fn list(&self) -> Result<Vec<ReasoningEngine>>;

    /// Create a new engine and wait until it is ready
    fn create(&self, engine: &ReasoningEngine) -> Result<ReasoningEngine>;

    /// Replace display name, description and spec of engine `name`
    fn update(&self, name: &str, engine: &ReasoningEngine) -> Result<ReasoningEngine>;
}
