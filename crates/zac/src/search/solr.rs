use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use super::model::{ZoekObject, ZoekObjectType};
use super::SearchError;
use crate::config::SolrConfig;

const SELECT_ROWS: usize = 1000;
const FIRST_CURSOR: &str = "*";

/// Write side of the search index, plus the id listing a reindex needs to find
/// stale documents.
#[async_trait]
pub trait SearchIndex: Send + Sync {
    async fn list_ids(&self, object_type: ZoekObjectType) -> Result<Vec<String>, SearchError>;
    async fn add(&self, objects: &[ZoekObject]) -> Result<(), SearchError>;
    async fn delete_by_ids(&self, ids: &[String]) -> Result<(), SearchError>;
    async fn commit(&self) -> Result<(), SearchError>;
}

/// Talks to the Solr JSON update handler at `{url}solr/{core}/update` and pages ids
/// through `{url}solr/{core}/select`.
#[derive(Clone)]
pub struct SolrClient {
    client: Client,
    update_url: String,
    select_url: String,
}

#[derive(Debug, Deserialize)]
struct SelectResponse {
    response: SelectDocuments,
    #[serde(rename = "nextCursorMark")]
    next_cursor_mark: String,
}

#[derive(Debug, Deserialize)]
struct SelectDocuments {
    docs: Vec<IdDocument>,
}

#[derive(Debug, Deserialize)]
struct IdDocument {
    id: String,
}

impl SolrClient {
    pub fn new(config: &SolrConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: &SolrConfig) -> Self {
        Self {
            client,
            update_url: format!("{}solr/{}/update", config.url, config.core),
            select_url: format!("{}solr/{}/select", config.url, config.core),
        }
    }

    async fn select_page(
        &self,
        object_type: ZoekObjectType,
        cursor: &str,
    ) -> Result<SelectResponse, SearchError> {
        let response = self
            .client
            .get(&self.select_url)
            .query(&[
                ("q", format!("type:{}", object_type.code())),
                ("fl", "id".to_string()),
                ("sort", "id asc".to_string()),
                ("rows", SELECT_ROWS.to_string()),
                ("cursorMark", cursor.to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::SolrStatus {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json().await?)
    }

    async fn update(&self, body: Value, commit: bool) -> Result<(), SearchError> {
        debug!(url = %self.update_url, commit, "posting search index update");
        let response = self
            .client
            .post(&self.update_url)
            .query(&[("commit", commit.to_string())])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::SolrStatus {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl SearchIndex for SolrClient {
    async fn list_ids(&self, object_type: ZoekObjectType) -> Result<Vec<String>, SearchError> {
        let mut ids = Vec::new();
        let mut cursor = FIRST_CURSOR.to_string();
        loop {
            let page = self.select_page(object_type, &cursor).await?;
            ids.extend(page.response.docs.into_iter().map(|document| document.id));
            if page.next_cursor_mark == cursor {
                return Ok(ids);
            }
            cursor = page.next_cursor_mark;
        }
    }

    async fn add(&self, objects: &[ZoekObject]) -> Result<(), SearchError> {
        if objects.is_empty() {
            return Ok(());
        }
        let documents =
            serde_json::to_value(objects).map_err(|error| SearchError::Encode(error.to_string()))?;
        self.update(documents, false).await
    }

    async fn delete_by_ids(&self, ids: &[String]) -> Result<(), SearchError> {
        if ids.is_empty() {
            return Ok(());
        }
        self.update(json!({ "delete": ids }), false).await
    }

    async fn commit(&self) -> Result<(), SearchError> {
        self.update(json!({}), true).await
    }
}
