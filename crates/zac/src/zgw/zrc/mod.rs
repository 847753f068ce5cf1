mod client;
mod model;

pub use client::{HttpZrcClient, ZaakListParameters, ZrcClient};
pub use model::*;
