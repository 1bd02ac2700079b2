//! Change classification: which agents does a set of changed files affect?
//!
//! Classification is a pure function over three inputs, all passed in
//! explicitly so it can be tested without a repository or configuration:
//!
//! - the changed paths (a set; order and duplicates are irrelevant),
//! - a map from directory prefix to agent ID,
//! - a set of global prefixes that affect every agent when touched.
//!
//! Paths matching neither a directory prefix nor a global prefix are ignored.
//! That is policy: documentation, CI files and the like never trigger a
//! redeploy.

use std::collections::{BTreeMap, BTreeSet};

/// Path prefix to agent ID
pub type AgentDirectoryMap = BTreeMap<String, String>;

/// Prefixes whose modification affects every agent
pub type GlobalPrefixSet = BTreeSet<String>;

/// Outcome of classifying a change set, with the reasons behind it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    /// Agents requiring redeployment
    pub agents: BTreeSet<String>,

    /// The first changed path (in sorted order) found under a global prefix
    pub global_trigger: Option<String>,

    /// Every (path, agent) pair matched through the directory map
    pub matches: Vec<(String, String)>,

    /// Changed paths that matched nothing
    pub unmatched: Vec<String>,
}

impl Classification {
    pub fn is_global(&self) -> bool {
        self.global_trigger.is_some()
    }
}

/// Agents affected by a change set.
///
/// If any path starts with a global prefix, every agent in `directory_map` is
/// returned. Otherwise each path contributes the agents of every directory
/// prefix it starts with. An empty change set yields an empty result.
pub fn affected_agents<I, S>(
    changed_paths: I,
    directory_map: &AgentDirectoryMap,
    global_prefixes: &GlobalPrefixSet,
) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    classify(changed_paths, directory_map, global_prefixes).agents
}

/// Same as [`affected_agents`], keeping track of which path caused what.
pub fn classify<I, S>(
    changed_paths: I,
    directory_map: &AgentDirectoryMap,
    global_prefixes: &GlobalPrefixSet,
) -> Classification
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let paths: BTreeSet<String> = changed_paths
        .into_iter()
        .map(|p| p.as_ref().trim().to_string())
        .filter(|p| !p.is_empty())
        .collect();

    let global_trigger = paths
        .iter()
        .find(|path| global_prefixes.iter().any(|g| path.starts_with(g.as_str())))
        .cloned();

    if let Some(trigger) = global_trigger {
        return Classification {
            agents: directory_map.values().cloned().collect(),
            global_trigger: Some(trigger),
            matches: Vec::new(),
            unmatched: Vec::new(),
        };
    }

    let mut classification = Classification::default();
    for path in paths {
        let mut matched = false;
        for (prefix, agent) in directory_map {
            if path.starts_with(prefix.as_str()) {
                classification.agents.insert(agent.clone());
                classification.matches.push((path.clone(), agent.clone()));
                matched = true;
            }
        }
        if !matched {
            classification.unmatched.push(path);
        }
    }

    classification
}
