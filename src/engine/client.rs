use super::types::{ListReasoningEnginesResponse, Operation, ReasoningEngine};
use super::AgentEngine;
use crate::error::{AgentDeployError, Result};
use crate::gcp::Gcloud;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::blocking::{Client, RequestBuilder};
use std::time::{Duration, Instant};

/// Where bearer tokens come from
#[derive(Debug, Clone)]
pub enum TokenSource {
    /// `gcloud auth print-access-token`, fetched per request
    Gcloud,
    Static(String),
}

impl TokenSource {
    fn token(&self) -> Result<String> {
        match self {
            TokenSource::Gcloud => Gcloud::access_token(),
            TokenSource::Static(token) => Ok(token.clone()),
        }
    }
}

/// Agent Engine client for the regional Vertex AI REST endpoint
pub struct VertexAgentEngine {
    client: Client,
    project: String,
    location: String,
    tokens: TokenSource,
    poll_interval: Duration,
    timeout: Duration,
}

impl VertexAgentEngine {
    pub fn new(project: &str, location: &str, tokens: TokenSource) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("agent-deploy/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(300))
            .build()?;

        Ok(Self {
            client,
            project: project.to_string(),
            location: location.to_string(),
            tokens,
            poll_interval: Duration::from_secs(10),
            timeout: Duration::from_secs(1800),
        })
    }

    pub fn with_polling(mut self, interval: Duration, timeout: Duration) -> Self {
        self.poll_interval = interval;
        self.timeout = timeout;
        self
    }

    fn base_url(&self) -> String {
        format!("https://{}-aiplatform.googleapis.com/v1", self.location)
    }

    fn parent(&self) -> String {
        format!("projects/{}/locations/{}", self.project, self.location)
    }

    fn collection_url(&self) -> String {
        format!("{}/{}/reasoningEngines", self.base_url(), self.parent())
    }

    /// Attach auth, send, and decode a JSON body
    fn send<T: serde::de::DeserializeOwned>(&self, request: RequestBuilder, what: &str) -> Result<T> {
        let token = self.tokens.token()?;
        let response = request.bearer_auth(token).send()?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(AgentDeployError::Engine(format!(
                "{} failed with {}: {}",
                what,
                status,
                body.trim()
            )));
        }

        Ok(response.json()?)
    }

    /// Poll an operation until done, returning its response payload
    fn wait(&self, operation: Operation, what: &str) -> Result<serde_json::Value> {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner} {msg} [{elapsed}]")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(what.to_string());
        spinner.enable_steady_tick(Duration::from_millis(120));

        let started = Instant::now();
        let mut operation = operation;

        let result = loop {
            if operation.done {
                break finish(operation);
            }

            if started.elapsed() >= self.timeout {
                break Err(AgentDeployError::Engine(format!(
                    "{} did not finish within {}s (operation {})",
                    what,
                    self.timeout.as_secs(),
                    operation.name
                )));
            }

            std::thread::sleep(self.poll_interval);
            let url = format!("{}/{}", self.base_url(), operation.name);
            tracing::debug!(operation = %operation.name, "polling");
            operation = match self.send(self.client.get(&url), "Polling operation") {
                Ok(op) => op,
                Err(e) => break Err(e),
            };
        };

        spinner.finish_and_clear();
        result
    }
}

fn finish(operation: Operation) -> Result<serde_json::Value> {
    if let Some(error) = operation.error {
        return Err(AgentDeployError::Engine(format!(
            "operation {} failed (code {}): {}",
            operation.name, error.code, error.message
        )));
    }
    Ok(operation.response.unwrap_or(serde_json::Value::Null))
}

fn engine_from_response(value: serde_json::Value, fallback: &ReasoningEngine) -> ReasoningEngine {
    serde_json::from_value(value).unwrap_or_else(|_| fallback.clone())
}

impl AgentEngine for VertexAgentEngine {
    fn list(&self) -> Result<Vec<ReasoningEngine>> {
        let mut engines = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self.client.get(self.collection_url());
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token)]);
            }

            let page: ListReasoningEnginesResponse =
                self.send(request, "Listing reasoning engines")?;
            engines.extend(page.reasoning_engines);

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(engines)
    }

    fn create(&self, engine: &ReasoningEngine) -> Result<ReasoningEngine> {
        let request = self.client.post(self.collection_url()).json(engine);
        let operation: Operation = self.send(request, "Creating reasoning engine")?;
        tracing::info!(operation = %operation.name, "create operation started");

        let what = format!("Creating {}", engine.display_name);
        let response = self.wait(operation, &what)?;
        let created = engine_from_response(response, engine);

        if created.name.is_empty() {
            return Err(AgentDeployError::Engine(format!(
                "create of {} finished without a resource name",
                engine.display_name
            )));
        }
        Ok(created)
    }

    fn update(&self, name: &str, engine: &ReasoningEngine) -> Result<ReasoningEngine> {
        let url = format!("{}/{}", self.base_url(), name);
        let request = self
            .client
            .patch(url)
            .query(&[("updateMask", "displayName,description,spec")])
            .json(engine);
        let operation: Operation = self.send(request, "Updating reasoning engine")?;
        tracing::info!(operation = %operation.name, "update operation started");

        let what = format!("Updating {}", engine.display_name);
        let response = self.wait(operation, &what)?;

        let mut updated = engine_from_response(response, engine);
        if updated.name.is_empty() {
            updated.name = name.to_string();
        }
        Ok(updated)
    }
}
