//! Documents checked out for editing are locked by ZAC itself; the documenten API
//! only knows the lock token.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentLock {
    pub document_uuid: Uuid,
    pub user_id: String,
    pub locked_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum DocumentLockError {
    #[error("lock store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait DocumentLockService: Send + Sync {
    async fn find_lock(&self, document_uuid: Uuid) -> Result<Option<DocumentLock>, DocumentLockError>;
}
