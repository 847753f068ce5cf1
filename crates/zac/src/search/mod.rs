//! Search index maintenance: zaken, documents and tasks are flattened into search
//! documents and pushed to Solr.

pub mod converter;
pub mod indexing;
pub mod model;
pub mod solr;

pub use converter::{
    DocumentZoekObjectConverter, TaakZoekObjectConverter, ZaakZoekObjectConverter,
    ZoekObjectConverter,
};
pub use indexing::IndexingService;
pub use model::{
    DocumentIndicatie, DocumentZoekObject, TaakZoekObject, ZaakIndicatie, ZaakZoekObject,
    ZoekObject, ZoekObjectType,
};
pub use solr::{SearchIndex, SolrClient};

use crate::document::DocumentLockError;
use crate::identity::IdentityError;
use crate::workflow::WorkflowError;
use crate::zgw::{ZgwApiError, ZgwError};

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error(transparent)]
    Zgw(#[from] ZgwError),
    #[error(transparent)]
    ZgwApi(#[from] ZgwApiError),
    #[error(transparent)]
    Workflow(#[from] WorkflowError),
    #[error(transparent)]
    Identity(#[from] IdentityError),
    #[error(transparent)]
    Lock(#[from] DocumentLockError),
    #[error("search index request failed: {0}")]
    Solr(#[from] reqwest::Error),
    #[error("search index responded with status {status}: {body}")]
    SolrStatus { status: u16, body: String },
    #[error("unable to encode search document: {0}")]
    Encode(String),
    #[error("'{0}' is not a valid object id")]
    InvalidId(String),
    #[error("[{0}] no converter found")]
    NoConverter(ZoekObjectType),
}
