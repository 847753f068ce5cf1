mod client;
mod model;

pub use client::{BrcClient, HttpBrcClient};
pub use model::*;
