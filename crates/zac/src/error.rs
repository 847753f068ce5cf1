use crate::admin::ReferenceTableError;
use crate::config::ConfigError;
use crate::decision::DecisionError;
use crate::formulier::FormulierError;
use crate::identity::IdentityError;
use crate::policy::PolicyError;
use crate::search::SearchError;
use crate::telemetry::TelemetryError;
use crate::workflow::WorkflowError;
use crate::zaak::ZaakServiceError;
use crate::zgw::archiving::ArchivingError;
use crate::zgw::{PeriodError, ZgwApiError, ZgwError, ZgwService};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;
use tracing::{error, warn};

/// Translation keys the frontend resolves into user facing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    ServerGeneric,
    BrcClient,
    DrcClient,
    ZrcClient,
    ZtcClient,
    ZgwNotFound,
    Forbidden,
    Unauthorized,
    BetrokkeneAlreadyAdded,
    ZaakNotOpen,
    ZaakIsOpen,
    ZaakAlreadySuspended,
    ZaakNotSuspended,
    ResumeDateInvalid,
    CaseHasOpenSubcases,
    CaseHasLockedInformationObjects,
    ZaakHasBesluit,
    ZaakHeropend,
    StatustypeNotFound,
    ResultaattypeNotFound,
    BrondatumEigenschapMissing,
    PeriodInvalid,
    BesluitPublicationDisabled,
    BesluitPublicationDateMissing,
    BesluitResponseDateMissing,
    BesluitResponseDateInvalid,
    BesluitWithdrawalReasonInvalid,
    UserNotInGroup,
    TaskNotFound,
    DocumentReferenceInvalid,
    DateInvalid,
    ReferenceTableNotFound,
    ReferenceTableExists,
    ReferenceTableSystem,
    SearchIdInvalid,
    ReindexInProgress,
    Validation,
}

impl ErrorCode {
    pub fn code(self) -> &'static str {
        match self {
            ErrorCode::ServerGeneric => "msg.error.server.generic",
            ErrorCode::BrcClient => "msg.error.brc.client.exception",
            ErrorCode::DrcClient => "msg.error.drc.client.exception",
            ErrorCode::ZrcClient => "msg.error.zrc.client.exception",
            ErrorCode::ZtcClient => "msg.error.ztc.client.exception",
            ErrorCode::ZgwNotFound => "msg.error.zgw.not.found",
            ErrorCode::Forbidden => "msg.error.forbidden",
            ErrorCode::Unauthorized => "msg.error.unauthorized",
            ErrorCode::BetrokkeneAlreadyAdded => "msg.error.zaak.betrokkene.already.added",
            ErrorCode::ZaakNotOpen => "msg.error.zaak.not.open",
            ErrorCode::ZaakIsOpen => "msg.error.zaak.is.open",
            ErrorCode::ZaakAlreadySuspended => "msg.error.zaak.already.suspended",
            ErrorCode::ZaakNotSuspended => "msg.error.zaak.not.suspended",
            ErrorCode::ResumeDateInvalid => "msg.error.zaak.resume.date.invalid",
            ErrorCode::CaseHasOpenSubcases => "msg.error.case.has.open.subcases",
            ErrorCode::CaseHasLockedInformationObjects => {
                "msg.error.case.has.locked.information.objects"
            }
            ErrorCode::ZaakHasBesluit => "msg.error.zaak.has.besluit",
            ErrorCode::ZaakHeropend => "msg.error.zaak.heropend",
            ErrorCode::StatustypeNotFound => "msg.error.zaaktype.statustype.not.found",
            ErrorCode::ResultaattypeNotFound => "msg.error.zaaktype.resultaattype.not.found",
            ErrorCode::BrondatumEigenschapMissing => "msg.error.zaak.brondatum.eigenschap.missing",
            ErrorCode::PeriodInvalid => "msg.error.period.invalid",
            ErrorCode::BesluitPublicationDisabled => "msg.error.besluit.publication.disabled",
            ErrorCode::BesluitPublicationDateMissing => "msg.error.besluit.publication.date.missing",
            ErrorCode::BesluitResponseDateMissing => "msg.error.besluit.response.date.missing",
            ErrorCode::BesluitResponseDateInvalid => "msg.error.besluit.response.date.invalid",
            ErrorCode::BesluitWithdrawalReasonInvalid => {
                "msg.error.besluit.withdrawal.reason.invalid"
            }
            ErrorCode::UserNotInGroup => "msg.error.user.not.in.group",
            ErrorCode::TaskNotFound => "msg.error.task.not.found",
            ErrorCode::DocumentReferenceInvalid => "msg.error.document.reference.invalid",
            ErrorCode::DateInvalid => "msg.error.date.invalid",
            ErrorCode::ReferenceTableNotFound => "msg.error.reference.table.not.found",
            ErrorCode::ReferenceTableExists => "msg.error.reference.table.already.exists",
            ErrorCode::ReferenceTableSystem => {
                "msg.error.system.reference.table.system.values.cannot.be.changed"
            }
            ErrorCode::SearchIdInvalid => "msg.error.search.id.invalid",
            ErrorCode::ReindexInProgress => "msg.error.search.reindex.in.progress",
            ErrorCode::Validation => "msg.error.validation",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

type Classification = (StatusCode, ErrorCode);

const GENERIC: Classification = (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::ServerGeneric);

fn bad_request(code: ErrorCode) -> Classification {
    (StatusCode::BAD_REQUEST, code)
}

fn classify_zgw(err: &ZgwError) -> Classification {
    if let ZgwError::NotFound { .. } = err {
        return (StatusCode::NOT_FOUND, ErrorCode::ZgwNotFound);
    }
    let code = match err.service() {
        Some(ZgwService::Brc) => ErrorCode::BrcClient,
        Some(ZgwService::Drc) => ErrorCode::DrcClient,
        Some(ZgwService::Zrc) => ErrorCode::ZrcClient,
        Some(ZgwService::Ztc) => ErrorCode::ZtcClient,
        None => ErrorCode::ServerGeneric,
    };
    (StatusCode::INTERNAL_SERVER_ERROR, code)
}

fn classify_period(_: &PeriodError) -> Classification {
    bad_request(ErrorCode::PeriodInvalid)
}

fn classify_archiving(err: &ArchivingError) -> Classification {
    match err {
        ArchivingError::MissingBrondatumEigenschap { .. } => {
            bad_request(ErrorCode::BrondatumEigenschapMissing)
        }
        ArchivingError::Period(err) => classify_period(err),
        ArchivingError::MissingDatumkenmerk { .. } => bad_request(ErrorCode::Validation),
    }
}

fn classify_zgw_api(err: &ZgwApiError) -> Classification {
    match err {
        ZgwApiError::Client(err) => classify_zgw(err),
        ZgwApiError::StatusTypeNotFound(_) => bad_request(ErrorCode::StatustypeNotFound),
        ZgwApiError::ResultTypeNotFound(_) => bad_request(ErrorCode::ResultaattypeNotFound),
        ZgwApiError::MultipleRoles { .. } => GENERIC,
        ZgwApiError::Archiving(err) => classify_archiving(err),
        ZgwApiError::Period(err) => classify_period(err),
    }
}

fn classify_policy(err: &PolicyError) -> Classification {
    match err {
        PolicyError::Denied => (StatusCode::FORBIDDEN, ErrorCode::Forbidden),
        PolicyError::Zgw(err) => classify_zgw(err),
        PolicyError::Unavailable(_) | PolicyError::Status { .. } | PolicyError::Decode(_) => GENERIC,
    }
}

fn classify_identity(err: &IdentityError) -> Classification {
    match err {
        IdentityError::UserNotInGroup { .. } => bad_request(ErrorCode::UserNotInGroup),
        IdentityError::Unavailable(_) => GENERIC,
    }
}

fn classify_workflow(err: &WorkflowError) -> Classification {
    match err {
        WorkflowError::TaskNotFound(_) => (StatusCode::NOT_FOUND, ErrorCode::TaskNotFound),
        WorkflowError::Unavailable(_) => GENERIC,
    }
}

fn classify_zaak(err: &ZaakServiceError) -> Classification {
    match err {
        ZaakServiceError::Zgw(err) => classify_zgw(err),
        ZaakServiceError::ZgwApi(err) => classify_zgw_api(err),
        ZaakServiceError::Identity(err) => classify_identity(err),
        ZaakServiceError::Policy(err) => classify_policy(err),
        ZaakServiceError::Workflow(err) => classify_workflow(err),
        ZaakServiceError::Period(err) => classify_period(err),
        ZaakServiceError::BetrokkeneIsAlreadyAddedToZaak { .. } => {
            (StatusCode::CONFLICT, ErrorCode::BetrokkeneAlreadyAdded)
        }
        ZaakServiceError::CaseHasOpenSubcases(_) => bad_request(ErrorCode::CaseHasOpenSubcases),
        ZaakServiceError::CaseHasLockedInformationObjects(_) => {
            bad_request(ErrorCode::CaseHasLockedInformationObjects)
        }
        ZaakServiceError::ZaakNotOpen(_) => bad_request(ErrorCode::ZaakNotOpen),
        ZaakServiceError::ZaakIsOpen(_) => bad_request(ErrorCode::ZaakIsOpen),
        ZaakServiceError::AlreadySuspended(_) => bad_request(ErrorCode::ZaakAlreadySuspended),
        ZaakServiceError::NotSuspended(_) => bad_request(ErrorCode::ZaakNotSuspended),
        ZaakServiceError::InvalidResumeDate(_) => bad_request(ErrorCode::ResumeDateInvalid),
        ZaakServiceError::ZaakHasBesluit(_) => bad_request(ErrorCode::ZaakHasBesluit),
        ZaakServiceError::ZaakHeropend(_) => bad_request(ErrorCode::ZaakHeropend),
    }
}

fn classify_decision(err: &DecisionError) -> Classification {
    match err {
        DecisionError::Zgw(err) => classify_zgw(err),
        DecisionError::ZgwApi(err) => classify_zgw_api(err),
        DecisionError::Period(err) => classify_period(err),
        DecisionError::PublicationDisabled(_) => bad_request(ErrorCode::BesluitPublicationDisabled),
        DecisionError::PublicationDateMissing => {
            bad_request(ErrorCode::BesluitPublicationDateMissing)
        }
        DecisionError::ResponseDateMissing => bad_request(ErrorCode::BesluitResponseDateMissing),
        DecisionError::ResponseDateInvalid { .. } => {
            bad_request(ErrorCode::BesluitResponseDateInvalid)
        }
        DecisionError::WithdrawalReasonInvalid(_) => {
            bad_request(ErrorCode::BesluitWithdrawalReasonInvalid)
        }
    }
}

fn classify_reference_table(err: &ReferenceTableError) -> Classification {
    match err {
        ReferenceTableError::NotFound(_) => (StatusCode::NOT_FOUND, ErrorCode::ReferenceTableNotFound),
        ReferenceTableError::Conflict(_) => (StatusCode::CONFLICT, ErrorCode::ReferenceTableExists),
        ReferenceTableError::SystemTable(_) => bad_request(ErrorCode::ReferenceTableSystem),
        ReferenceTableError::Unavailable(_) => GENERIC,
    }
}

fn classify_formulier(err: &FormulierError) -> Classification {
    match err {
        FormulierError::Zgw(err) => classify_zgw(err),
        FormulierError::ZgwApi(err) => classify_zgw_api(err),
        FormulierError::Zaak(err) => classify_zaak(err),
        FormulierError::Workflow(err) => classify_workflow(err),
        FormulierError::Identity(err) => classify_identity(err),
        FormulierError::ReferenceTable(err) => classify_reference_table(err),
        FormulierError::InvalidDocumentReference(_) => {
            bad_request(ErrorCode::DocumentReferenceInvalid)
        }
        FormulierError::InvalidDate { .. } => bad_request(ErrorCode::DateInvalid),
    }
}

fn classify_search(err: &SearchError) -> Classification {
    match err {
        SearchError::Zgw(err) => classify_zgw(err),
        SearchError::ZgwApi(err) => classify_zgw_api(err),
        SearchError::Workflow(err) => classify_workflow(err),
        SearchError::Identity(err) => classify_identity(err),
        SearchError::InvalidId(_) => bad_request(ErrorCode::SearchIdInvalid),
        SearchError::Lock(_)
        | SearchError::Solr(_)
        | SearchError::SolrStatus { .. }
        | SearchError::Encode(_)
        | SearchError::NoConverter(_) => GENERIC,
    }
}

/// Boundary error for the REST layer and the service bootstrap.
#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Zgw(ZgwError),
    ZgwApi(ZgwApiError),
    Zaak(ZaakServiceError),
    Decision(DecisionError),
    Formulier(FormulierError),
    Policy(PolicyError),
    Search(SearchError),
    Identity(IdentityError),
    Workflow(WorkflowError),
    ReferenceTable(ReferenceTableError),
    Period(PeriodError),
    /// No logged-in user accompanied the request.
    Unauthenticated,
    ReindexInProgress(String),
    Validation(String),
}

impl AppError {
    pub fn classify(&self) -> (StatusCode, ErrorCode) {
        match self {
            AppError::Config(_) | AppError::Telemetry(_) | AppError::Io(_) | AppError::Server(_) => {
                GENERIC
            }
            AppError::Zgw(err) => classify_zgw(err),
            AppError::ZgwApi(err) => classify_zgw_api(err),
            AppError::Zaak(err) => classify_zaak(err),
            AppError::Decision(err) => classify_decision(err),
            AppError::Formulier(err) => classify_formulier(err),
            AppError::Policy(err) => classify_policy(err),
            AppError::Search(err) => classify_search(err),
            AppError::Identity(err) => classify_identity(err),
            AppError::Workflow(err) => classify_workflow(err),
            AppError::ReferenceTable(err) => classify_reference_table(err),
            AppError::Period(err) => classify_period(err),
            AppError::Unauthenticated => (StatusCode::UNAUTHORIZED, ErrorCode::Unauthorized),
            AppError::ReindexInProgress(_) => (StatusCode::CONFLICT, ErrorCode::ReindexInProgress),
            AppError::Validation(_) => bad_request(ErrorCode::Validation),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Zgw(err) => write!(f, "{}", err),
            AppError::ZgwApi(err) => write!(f, "{}", err),
            AppError::Zaak(err) => write!(f, "{}", err),
            AppError::Decision(err) => write!(f, "{}", err),
            AppError::Formulier(err) => write!(f, "{}", err),
            AppError::Policy(err) => write!(f, "{}", err),
            AppError::Search(err) => write!(f, "{}", err),
            AppError::Identity(err) => write!(f, "{}", err),
            AppError::Workflow(err) => write!(f, "{}", err),
            AppError::ReferenceTable(err) => write!(f, "{}", err),
            AppError::Period(err) => write!(f, "{}", err),
            AppError::Unauthenticated => write!(f, "no logged-in user"),
            AppError::ReindexInProgress(object_type) => {
                write!(f, "reindex of {} already in progress", object_type)
            }
            AppError::Validation(message) => write!(f, "validation failed: {}", message),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Zgw(err) => Some(err),
            AppError::ZgwApi(err) => Some(err),
            AppError::Zaak(err) => Some(err),
            AppError::Decision(err) => Some(err),
            AppError::Formulier(err) => Some(err),
            AppError::Policy(err) => Some(err),
            AppError::Search(err) => Some(err),
            AppError::Identity(err) => Some(err),
            AppError::Workflow(err) => Some(err),
            AppError::ReferenceTable(err) => Some(err),
            AppError::Period(err) => Some(err),
            AppError::Unauthenticated | AppError::ReindexInProgress(_) | AppError::Validation(_) => {
                None
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.classify();
        if status.is_server_error() {
            error!(error = %self, code = %code, "request failed");
        } else {
            warn!(error = %self, code = %code, status = status.as_u16(), "request rejected");
        }

        let body = Json(json!({ "message": code.code() }));
        (status, body).into_response()
    }
}

macro_rules! from_error {
    ($($source:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$source> for AppError {
                fn from(value: $source) -> Self {
                    Self::$variant(value)
                }
            }
        )*
    };
}

from_error! {
    ConfigError => Config,
    TelemetryError => Telemetry,
    std::io::Error => Io,
    axum::Error => Server,
    ZgwError => Zgw,
    ZgwApiError => ZgwApi,
    ZaakServiceError => Zaak,
    DecisionError => Decision,
    FormulierError => Formulier,
    PolicyError => Policy,
    SearchError => Search,
    IdentityError => Identity,
    WorkflowError => Workflow,
    ReferenceTableError => ReferenceTable,
    PeriodError => Period,
}
