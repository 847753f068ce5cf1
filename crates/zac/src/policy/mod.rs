//! Authorisation decisions, delegated to an Open Policy Agent server.

pub mod model;
pub mod opa;
pub mod service;

pub use model::{
    DocumentData, DocumentRechten, LoggedInUser, OverigeRechten, PolicyRule, TaakData,
    TaakRechten, WerklijstRechten, ZaakData, ZaakRechten,
};
pub use opa::OpaPolicyEvaluator;
pub use service::{assert_policy, PolicyService};

use async_trait::async_trait;
use serde_json::Value;

use crate::zgw::ZgwError;

#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    #[error("policy engine request failed: {0}")]
    Unavailable(#[from] reqwest::Error),
    #[error("policy engine responded with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("policy engine returned an unexpected decision: {0}")]
    Decode(String),
    #[error(transparent)]
    Zgw(#[from] ZgwError),
    #[error("access denied by policy")]
    Denied,
}

/// Evaluates one rule package for the given input document.
///
/// `Ok(None)` means the engine had no decision for the input; callers treat that as
/// "no rights".
#[async_trait]
pub trait PolicyEvaluator: Send + Sync {
    async fn evaluate(&self, rule: PolicyRule, input: Value) -> Result<Option<Value>, PolicyError>;
}
