//! REST representations of Agent Engine resources (camelCase JSON).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReasoningEngine {
    /// `projects/{p}/locations/{l}/reasoningEngines/{id}`; empty before creation
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    pub display_name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec: Option<ReasoningEngineSpec>,

    #[serde(default, skip_serializing)]
    pub update_time: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReasoningEngineSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_code_spec: Option<SourceCodeSpec>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_framework: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment_spec: Option<DeploymentSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceCodeSpec {
    pub inline_source: InlineSource,
    pub python_spec: PythonSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineSource {
    /// Base64 of a gzipped tarball
    pub source_archive: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PythonSpec {
    pub version: String,
    pub entrypoint_module: String,
    pub entrypoint_object: String,
    pub requirements_file: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentSpec {
    #[serde(default)]
    pub env: Vec<EnvVar>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvVar {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListReasoningEnginesResponse {
    #[serde(default)]
    pub reasoning_engines: Vec<ReasoningEngine>,

    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// Long-running operation returned by create and update
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub name: String,

    #[serde(default)]
    pub done: bool,

    #[serde(default)]
    pub error: Option<OperationError>,

    #[serde(default)]
    pub response: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OperationError {
    #[serde(default)]
    pub code: i32,

    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_serializes_camel_case() {
        let engine = ReasoningEngine {
            display_name: "Chat Agent".to_string(),
            spec: Some(ReasoningEngineSpec {
                source_code_spec: Some(SourceCodeSpec {
                    inline_source: InlineSource {
                        source_archive: "H4sI".to_string(),
                    },
                    python_spec: PythonSpec {
                        version: "3.12".to_string(),
                        entrypoint_module: "app.chat_agent.agent".to_string(),
                        entrypoint_object: "root_agent".to_string(),
                        requirements_file: ".requirements.txt".to_string(),
                    },
                }),
                agent_framework: Some("google-adk".to_string()),
                deployment_spec: Some(DeploymentSpec {
                    env: vec![EnvVar {
                        name: "NUM_WORKERS".to_string(),
                        value: "1".to_string(),
                    }],
                }),
            }),
            ..ReasoningEngine::default()
        };

        let json = serde_json::to_value(&engine).unwrap();
        assert_eq!(json["displayName"], "Chat Agent");
        assert!(json.get("name").is_none());
        assert!(json.get("updateTime").is_none());
        let spec = &json["spec"];
        assert_eq!(spec["agentFramework"], "google-adk");
        assert_eq!(
            spec["sourceCodeSpec"]["pythonSpec"]["entrypointModule"],
            "app.chat_agent.agent"
        );
        assert_eq!(spec["sourceCodeSpec"]["inlineSource"]["sourceArchive"], "H4sI");
        assert_eq!(spec["deploymentSpec"]["env"][0]["name"], "NUM_WORKERS");
    }

    #[test]
    fn test_list_response_parses() {
        let body = r#"{
            "reasoningEngines": [
                {"name": "projects/p/locations/l/reasoningEngines/1", "displayName": "Chat Agent", "updateTime": "2025-01-01T00:00:00Z"}
            ],
            "nextPageToken": "abc"
        }"#;
        let parsed: ListReasoningEnginesResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.reasoning_engines.len(), 1);
        assert_eq!(parsed.reasoning_engines[0].display_name, "Chat Agent");
        assert_eq!(parsed.next_page_token.as_deref(), Some("abc"));
    }

    #[test]
    fn test_empty_list_response() {
        let parsed: ListReasoningEnginesResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.reasoning_engines.is_empty());
        assert!(parsed.next_page_token.is_none());
    }

    #[test]
    fn test_operation_with_error() {
        let body = r#"{"name": "ops/1", "done": true, "error": {"code": 3, "message": "bad spec"}}"#;
        let op: Operation = serde_json::from_str(body).unwrap();
        assert!(op.done);
        assert_eq!(op.error.unwrap().message, "bad spec");
    }

    #[test]
    fn test_operation_pending_defaults() {
        let op: Operation = serde_json::from_str(r#"{"name": "ops/2"}"#).unwrap();
        assert!(!op.done);
        assert!(op.response.is_none());
    }
}
