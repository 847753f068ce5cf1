mod cache;
mod client;
mod model;

pub use cache::{CacheStatistics, CachingZtcClient, ZtcCacheAdmin};
pub use client::{HttpZtcClient, ZtcClient};
pub use model::*;
