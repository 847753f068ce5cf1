//! The `/rest` API used by the ZAC frontend.

mod admin;
mod besluiten;
mod taken;
mod user;
mod zaken;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use axum::routing::{delete, get, patch, post, put};
use axum::Router;
use tracing::warn;
use uuid::Uuid;

use crate::config::OrganisatieConfig;
use crate::decision::DecisionService;
use crate::formulier::FormulierRuntimeService;
use crate::policy::PolicyService;
use crate::search::IndexingService;
use crate::zaak::{SuspensionService, ZaakService};
use crate::zgw::ztc::ZtcCacheAdmin;
use crate::zgw::ZgwApiService;

pub use admin::CacheStatistiekenView;
pub use user::{FIRST_NAME_HEADER, GROUPS_HEADER, LAST_NAME_HEADER, ROLES_HEADER, USER_HEADER, ZAAKTYPEN_HEADER};
pub use zaken::{BetrokkeneView, ZaakView};

/// Services shared by every request handler.
pub struct AppServices {
    pub zgw: ZgwApiService,
    pub zaken: ZaakService,
    pub suspension: SuspensionService,
    pub decisions: DecisionService,
    pub policy: PolicyService,
    pub indexing: IndexingService,
    pub formulieren: FormulierRuntimeService,
    pub ztc_cache: Arc<dyn ZtcCacheAdmin>,
    pub organisatie: OrganisatieConfig,
}

impl AppServices {
    /// Brings the search document of a changed zaak up to date. Failures are logged
    /// and do not fail the request that changed the zaak.
    async fn reindex_zaak(&self, zaak_uuid: Uuid, include_tasks: bool) {
        if let Err(error) = self
            .indexing
            .add_or_update_zaak(zaak_uuid, include_tasks)
            .await
        {
            warn!(zaak = %zaak_uuid, error = %error, "search index not updated");
        }
    }
}

/// Router builder exposing the zaken, besluiten, task form, indexing and cache endpoints.
pub fn zac_router(services: Arc<AppServices>) -> Router {
    Router::new()
        .route("/rest/zaken/zaak", post(zaken::create_zaak))
        .route("/rest/zaken/zaak/:uuid", get(zaken::read_zaak))
        .route(
            "/rest/zaken/zaak/:uuid/opschorting",
            get(zaken::read_opschorting).patch(zaken::opschorten),
        )
        .route("/rest/zaken/zaak/:uuid/verlenging", patch(zaken::verlengen))
        .route("/rest/zaken/zaak/:uuid/afsluiten", patch(zaken::afsluiten))
        .route("/rest/zaken/zaak/:uuid/afbreken", patch(zaken::afbreken))
        .route("/rest/zaken/zaak/:uuid/heropenen", patch(zaken::heropenen))
        .route("/rest/zaken/toekennen", patch(zaken::toekennen))
        .route("/rest/zaken/lijst/toekennen", put(zaken::lijst_toekennen))
        .route("/rest/zaken/lijst/vrijgeven", put(zaken::lijst_vrijgeven))
        .route("/rest/zaken/betrokkene", post(zaken::add_betrokkene))
        .route(
            "/rest/zaken/besluit",
            post(besluiten::create_besluit).put(besluiten::update_besluit),
        )
        .route("/rest/zaken/besluit/intrekken", put(besluiten::intrekken))
        .route("/rest/zaken/besluit/zaakUuid/:uuid", get(besluiten::list_besluiten))
        .route("/rest/taken/formulier", post(taken::render_formulier))
        .route("/rest/indexeren/herindexeren/:type", post(admin::herindexeren))
        .route("/rest/admin/cache/ztc", delete(admin::clear_ztc_caches))
        .route(
            "/rest/admin/cache/ztc/statistieken",
            get(admin::ztc_cache_statistieken),
        )
        .with_state(services)
}
