use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A named list of values administrators maintain, e.g. communication channels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceTable {
    pub id: i64,
    pub code: String,
    pub naam: String,
    /// System tables are provisioned on startup and cannot be removed.
    pub systeem: bool,
    pub waarden: Vec<ReferenceTableValue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceTableValue {
    pub naam: String,
    pub sort_order: i32,
    #[serde(default)]
    pub is_system_value: bool,
}

impl ReferenceTable {
    /// Value names in display order.
    pub fn sorted_values(&self) -> Vec<&str> {
        let mut waarden: Vec<&ReferenceTableValue> = self.waarden.iter().collect();
        waarden.sort_by_key(|waarde| waarde.sort_order);
        waarden.into_iter().map(|waarde| waarde.naam.as_str()).collect()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReferenceTableError {
    #[error("reference table '{0}' not found")]
    NotFound(String),
    #[error("reference table with code '{0}' already exists")]
    Conflict(String),
    #[error("system reference table '{0}' cannot be deleted")]
    SystemTable(String),
    #[error("reference table store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait ReferenceTableService: Send + Sync {
    async fn list(&self) -> Result<Vec<ReferenceTable>, ReferenceTableError>;
    async fn read_by_code(&self, code: &str) -> Result<ReferenceTable, ReferenceTableError>;
    async fn create(&self, table: ReferenceTable) -> Result<ReferenceTable, ReferenceTableError>;
    async fn update(&self, table: ReferenceTable) -> Result<ReferenceTable, ReferenceTableError>;
    async fn delete(&self, id: i64) -> Result<(), ReferenceTableError>;
}
