//! Case-level business rules on top of the ZGW APIs: roles, assignment, closure
//! checks, suspension and extension.

pub mod service;
pub mod suspension;

pub use service::{AssignmentReport, ZaakService};
pub use suspension::{SuspensionService, SuspensionState};

use crate::identity::IdentityError;
use crate::policy::PolicyError;
use crate::workflow::WorkflowError;
use crate::zgw::{PeriodError, ZgwApiError, ZgwError};

pub const STATUSTYPE_OMSCHRIJVING_HEROPEND: &str = "Heropend";
pub const STATUSTYPE_OMSCHRIJVING_INTAKE: &str = "Intake";
pub const ROL_TOELICHTING_GROEP: &str = "Behandelend groep van de zaak";
pub const ROL_TOELICHTING_BEHANDELAAR: &str = "Behandelaar van de zaak";

#[derive(Debug, thiserror::Error)]
pub enum ZaakServiceError {
    #[error(transparent)]
    Zgw(#[from] ZgwError),
    #[error(transparent)]
    ZgwApi(#[from] ZgwApiError),
    #[error(transparent)]
    Identity(#[from] IdentityError),
    #[error(transparent)]
    Policy(#[from] PolicyError),
    #[error(transparent)]
    Workflow(#[from] WorkflowError),
    #[error(transparent)]
    Period(#[from] PeriodError),
    #[error("betrokkene '{identificatie}' already has role '{roltype}' on zaak '{zaak}'")]
    BetrokkeneIsAlreadyAddedToZaak {
        zaak: String,
        roltype: String,
        identificatie: String,
    },
    #[error("zaak '{0}' has open deelzaken")]
    CaseHasOpenSubcases(String),
    #[error("zaak '{0}' has locked informatieobjecten")]
    CaseHasLockedInformationObjects(String),
    #[error("zaak '{0}' is not open")]
    ZaakNotOpen(String),
    #[error("zaak '{0}' is still open")]
    ZaakIsOpen(String),
    #[error("zaak '{0}' has already been suspended")]
    AlreadySuspended(String),
    #[error("zaak '{0}' is not suspended")]
    NotSuspended(String),
    #[error("resume date precedes the suspension of zaak '{0}'")]
    InvalidResumeDate(String),
    #[error("zaak '{0}' has a besluit and cannot be terminated")]
    ZaakHasBesluit(String),
    #[error("zaak '{0}' has been reopened and cannot be terminated")]
    ZaakHeropend(String),
}
