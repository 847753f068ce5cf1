mod client;
mod model;

pub use client::{DrcClient, HttpDrcClient};
pub use model::*;
