//! Source packaging for Agent Engine deployments.
//!
//! An agent is shipped as a gzipped tarball of its `extra_packages` plus the
//! requirements file, base64 encoded for the inline source field of the
//! deployment request.

use crate::agents::AgentDefinition;
use crate::error::{AgentDeployError, Result};
use crate::utils::process;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::path::{Component, Path, PathBuf};

/// Requirements used when the project has no requirements file
pub const DEFAULT_REQUIREMENTS: &str = "google-cloud-aiplatform[adk,agent_engines]";

/// Archive name of the generated requirements file
const GENERATED_REQUIREMENTS: &str = "requirements.txt";

/// A packaged agent, ready to embed in a deployment request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePackage {
    /// Base64 of the gzipped tarball
    pub archive: String,

    /// Requirements file path inside the archive
    pub requirements_file: String,

    /// Paths included in the archive, relative to the project root
    pub paths: Vec<String>,
}

pub trait Packager {
    fn package(&self, agent: &AgentDefinition) -> Result<SourcePackage>;
}

/// Packages agent sources with the system `tar`
pub struct TarPackager {
    root: PathBuf,
    requirements_file: String,
}

impl TarPackager {
    pub fn new(root: &Path, requirements_file: &str) -> Self {
        Self {
            root: root.to_path_buf(),
            requirements_file: normalize(requirements_file),
        }
    }

    pub fn ensure_installed() -> Result<()> {
        if !process::command_exists("tar") {
            return Err(AgentDeployError::Packaging(
                "tar not found in PATH".to_string(),
            ));
        }
        Ok(())
    }

    /// Source paths for `agent`, relative to the root, each checked to exist
    fn source_paths(&self, agent: &AgentDefinition) -> Result<Vec<String>> {
        let mut paths: Vec<String> = Vec::new();
        for package in &agent.extra_packages {
            let path = normalize(package);
            if path.is_empty() {
                continue;
            }
            if !self.root.join(&path).exists() {
                return Err(AgentDeployError::Packaging(format!(
                    "{}: extra package '{}' not found under {}",
                    agent.id,
                    package,
                    self.root.display()
                )));
            }
            if !paths.contains(&path) {
                paths.push(path);
            }
        }

        if paths.is_empty() {
            return Err(AgentDeployError::Packaging(format!(
                "{}: no source paths to package",
                agent.id
            )));
        }
        Ok(paths)
    }

    /// Where the requirements file comes from
    fn requirements_source(&self) -> RequirementsSource {
        let path = Path::new(&self.requirements_file);
        let in_tree = if path.is_absolute() {
            path.strip_prefix(&self.root).ok().map(Path::to_path_buf)
        } else if path.components().any(|c| matches!(c, Component::ParentDir)) {
            None
        } else {
            Some(path.to_path_buf())
        };

        match in_tree {
            Some(rel) if self.root.join(&rel).is_file() => {
                RequirementsSource::InTree(rel.to_string_lossy().to_string())
            }
            Some(_) => RequirementsSource::Missing,
            None => {
                let external = self.root.join(path);
                if external.is_file() {
                    RequirementsSource::External(external)
                } else {
                    RequirementsSource::Missing
                }
            }
        }
    }
}

/// Origin of the requirements shipped with an agent
#[derive(Debug, Clone, PartialEq, Eq)]
enum RequirementsSource {
    /// A file under the project root, archived at this relative path
    InTree(String),
    /// A file outside the project root, archived as `requirements.txt`
    External(PathBuf),
    Missing,
}

impl Packager for TarPackager {
    fn package(&self, agent: &AgentDefinition) -> Result<SourcePackage> {
        let mut paths = self.source_paths(agent)?;

        let mut args: Vec<String> = vec!["-czf".to_string(), "-".to_string()];
        let mut generated_dir = None;

        let requirements_file = match self.requirements_source() {
            RequirementsSource::InTree(file) => {
                if !paths.contains(&file) {
                    paths.push(file.clone());
                }
                args.extend(paths.iter().cloned());
                file
            }
            source => {
                let dir = match &source {
                    RequirementsSource::External(file) => {
                        tracing::debug!(file = %file.display(), "requirements file outside project root");
                        generated_requirements(&agent.id, Some(file))?
                    }
                    _ => {
                        tracing::warn!(
                            file = %self.requirements_file,
                            "requirements file not found, using default requirements"
                        );
                        generated_requirements(&agent.id, None)?
                    }
                };
                args.extend(paths.iter().cloned());
                args.push("-C".to_string());
                args.push(dir.to_string_lossy().to_string());
                args.push(GENERATED_REQUIREMENTS.to_string());
                generated_dir = Some(dir);
                GENERATED_REQUIREMENTS.to_string()
            }
        };

        let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
        let result = process::execute_bytes_in(&self.root, "tar", &arg_refs);

        if let Some(dir) = generated_dir {
            if let Err(e) = std::fs::remove_dir_all(&dir) {
                tracing::debug!(dir = %dir.display(), error = %e, "could not remove temp dir");
            }
        }

        let bytes = result.map_err(|e| AgentDeployError::Packaging(format!("{}: {}", agent.id, e)))?;
        tracing::debug!(agent = %agent.id, bytes = bytes.len(), "packaged sources");

        Ok(SourcePackage {
            archive: STANDARD.encode(bytes),
            requirements_file,
            paths,
        })
    }
}

fn normalize(path: &str) -> String {
    path.trim()
        .trim_start_matches("./")
        .trim_end_matches('/')
        .to_string()
}

/// Temp dir holding `requirements.txt`, copied from `source` or the defaults
fn generated_requirements(agent_id: &str, source: Option<&Path>) -> Result<PathBuf> {
    let dir = std::env::temp_dir().join(format!(
        "agent-deploy-{}-{}",
        std::process::id(),
        agent_id
    ));
    std::fs::create_dir_all(&dir)?;
    let target = dir.join(GENERATED_REQUIREMENTS);
    match source {
        Some(file) => {
            std::fs::copy(file, &target)?;
        }
        None => std::fs::write(&target, format!("{}\n", DEFAULT_REQUIREMENTS))?,
    }
    Ok(dir)
}
