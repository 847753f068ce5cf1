mod document;
mod taak;
mod zaak;

pub use document::DocumentZoekObjectConverter;
pub use taak::TaakZoekObjectConverter;
pub use zaak::ZaakZoekObjectConverter;

use async_trait::async_trait;
use uuid::Uuid;

use super::model::{ZoekObject, ZoekObjectType};
use super::SearchError;

/// Turns the object behind an id into its search document. `None` means the object
/// should not be indexed.
#[async_trait]
pub trait ZoekObjectConverter: Send + Sync {
    fn supports(&self, object_type: ZoekObjectType) -> bool;
    async fn convert(&self, id: &str) -> Result<Option<ZoekObject>, SearchError>;
}

fn parse_uuid(id: &str) -> Result<Uuid, SearchError> {
    Uuid::parse_str(id).map_err(|_| SearchError::InvalidId(id.to_string()))
}
