use std::fmt;

use serde::Deserialize;
use uuid::Uuid;

/// ZGW list endpoints are 1-based.
pub const FIRST_PAGE_NUMBER: u32 = 1;

/// The remote ZGW component a request was aimed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZgwService {
    Zrc,
    Ztc,
    Drc,
    Brc,
}

impl ZgwService {
    pub fn label(self) -> &'static str {
        match self {
            ZgwService::Zrc => "zaken API",
            ZgwService::Ztc => "catalogi API",
            ZgwService::Drc => "documenten API",
            ZgwService::Brc => "besluiten API",
        }
    }
}

impl fmt::Display for ZgwService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Failure talking to one of the ZGW components.
#[derive(Debug, thiserror::Error)]
pub enum ZgwError {
    #[error("{service} request failed: {source}")]
    Http {
        service: ZgwService,
        #[source]
        source: reqwest::Error,
    },
    #[error("{service} responded with status {status}: {body}")]
    Status {
        service: ZgwService,
        status: u16,
        body: String,
    },
    #[error("{service} resource not found: {resource}")]
    NotFound {
        service: ZgwService,
        resource: String,
    },
    #[error("{service} returned an unexpected payload: {message}")]
    Decode { service: ZgwService, message: String },
    #[error("'{0}' does not end in a UUID")]
    InvalidUri(String),
    #[error("unable to sign the ZGW authorization token: {0}")]
    Token(String),
}

impl ZgwError {
    pub fn service(&self) -> Option<ZgwService> {
        match self {
            ZgwError::Http { service, .. }
            | ZgwError::Status { service, .. }
            | ZgwError::NotFound { service, .. }
            | ZgwError::Decode { service, .. } => Some(*service),
            ZgwError::InvalidUri(_) | ZgwError::Token(_) => None,
        }
    }

    pub fn not_found(service: ZgwService, resource: impl Into<String>) -> Self {
        ZgwError::NotFound {
            service,
            resource: resource.into(),
        }
    }
}

/// Paginated list response shared by every ZGW API.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    pub fn single(results: Vec<T>) -> Self {
        Self {
            count: results.len() as u64,
            next: None,
            previous: None,
            results,
        }
    }

    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }
}

/// ZGW resources are addressed by URL; the trailing segment is the resource UUID.
pub fn extract_uuid(uri: &str) -> Result<Uuid, ZgwError> {
    uri.trim_end_matches('/')
        .rsplit('/')
        .next()
        .and_then(|segment| Uuid::parse_str(segment).ok())
        .ok_or_else(|| ZgwError::InvalidUri(uri.to_string()))
}
