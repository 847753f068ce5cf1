use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use super::model::PolicyRule;
use super::{PolicyError, PolicyEvaluator};
use crate::config::OpaConfig;

#[derive(Debug, Deserialize)]
struct RuleResponse {
    #[serde(default)]
    result: Option<Value>,
}

/// Queries the OPA data API: `POST {base}v1/data/{rule}` with `{"input": ...}`.
#[derive(Clone)]
pub struct OpaPolicyEvaluator {
    client: Client,
    base_url: String,
}

impl OpaPolicyEvaluator {
    pub fn new(config: &OpaConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: &OpaConfig) -> Self {
        Self {
            client,
            base_url: config.api_url.clone(),
        }
    }

    fn rule_url(&self, rule: PolicyRule) -> String {
        format!("{}v1/data/{}", self.base_url, rule.path())
    }
}

#[async_trait]
impl PolicyEvaluator for OpaPolicyEvaluator {
    async fn evaluate(&self, rule: PolicyRule, input: Value) -> Result<Option<Value>, PolicyError> {
        let url = self.rule_url(rule);
        debug!(url = %url, "evaluating policy");
        let response = self
            .client
            .post(&url)
            .json(&json!({ "input": input }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PolicyError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        let decision: RuleResponse = serde_json::from_slice(&bytes)
            .map_err(|error| PolicyError::Decode(error.to_string()))?;
        Ok(decision.result)
    }
}
