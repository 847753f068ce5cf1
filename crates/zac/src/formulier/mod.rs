//! Runtime side of task forms: resolving default values before a form is shown and
//! applying the side effects of a submitted form.

pub mod model;
pub mod runtime;

pub use model::{
    FormulierData, FormulierDefinitie, FormulierVeldDefinitie, FormulierVeldtype, TaakView,
};
pub use runtime::{DefaultValueContext, FormulierRuntimeService};

use crate::admin::ReferenceTableError;
use crate::identity::IdentityError;
use crate::workflow::WorkflowError;
use crate::zaak::ZaakServiceError;
use crate::zgw::{ZgwApiError, ZgwError};

#[derive(Debug, thiserror::Error)]
pub enum FormulierError {
    #[error(transparent)]
    Zgw(#[from] ZgwError),
    #[error(transparent)]
    ZgwApi(#[from] ZgwApiError),
    #[error(transparent)]
    Zaak(#[from] ZaakServiceError),
    #[error(transparent)]
    Workflow(#[from] WorkflowError),
    #[error(transparent)]
    Identity(#[from] IdentityError),
    #[error(transparent)]
    ReferenceTable(#[from] ReferenceTableError),
    #[error("'{0}' is not a document reference")]
    InvalidDocumentReference(String),
    #[error("form field '{key}' holds '{value}', which is not a date")]
    InvalidDate { key: &'static str, value: String },
}
