pub mod admin;
pub mod app;
pub mod config;
pub mod decision;
pub mod document;
pub mod error;
pub mod formulier;
pub mod identity;
pub mod policy;
pub mod search;
pub mod telemetry;
pub mod workflow;
pub mod zaak;
pub mod zgw;

#[cfg(test)]
pub(crate) mod testing;
