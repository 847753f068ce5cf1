//! Clients and orchestration for the ZGW API family: zaken (ZRC), catalogi (ZTC),
//! documenten (DRC) and besluiten (BRC).

pub mod api_service;
pub mod archiving;
pub mod brc;
pub mod drc;
pub mod http;
pub mod period;
pub mod shared;
pub mod zrc;
pub mod ztc;

pub use api_service::{ZgwApiError, ZgwApiService};
pub use http::ZgwHttpClient;
pub use period::{IsoPeriod, PeriodError};
pub use shared::{extract_uuid, Page, ZgwError, ZgwService, FIRST_PAGE_NUMBER};

use std::sync::Arc;

/// The four ZGW clients, shared by every service that talks to the ZGW APIs.
#[derive(Clone)]
pub struct ZgwClients {
    pub zrc: Arc<dyn zrc::ZrcClient>,
    pub ztc: Arc<dyn ztc::ZtcClient>,
    pub drc: Arc<dyn drc::DrcClient>,
    pub brc: Arc<dyn brc::BrcClient>,
}
