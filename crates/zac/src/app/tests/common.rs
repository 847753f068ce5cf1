use std::sync::Arc;

use axum::body::Body;
use axum::http::{header::CONTENT_TYPE, Method, Request};
use axum::response::Response;
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use crate::app::{zac_router, AppServices, GROUPS_HEADER, ROLES_HEADER, USER_HEADER};
use crate::config::{CacheConfig, OrganisatieConfig};
use crate::admin::{ReferenceTable, ReferenceTableValue};
use crate::decision::DecisionService;
use crate::formulier::FormulierRuntimeService;
use crate::identity::IdentityService;
use crate::policy::PolicyService;
use crate::search::{
    DocumentZoekObjectConverter, IndexingService, TaakZoekObjectConverter, ZaakZoekObjectConverter,
    ZoekObjectConverter,
};
use crate::testing::{
    FakePolicyEvaluator, InMemoryIdentity, InMemoryReferenceTables, InMemoryTasks,
    InMemoryZaakVariabelen, InMemoryZgw, RecordingSearchIndex,
};
use crate::zaak::{SuspensionService, ZaakService};
use crate::zgw::ztc::CachingZtcClient;
use crate::zgw::{ZgwApiService, ZgwClients};

pub(super) const BRONORGANISATIE: &str = "123443210";

pub(super) struct Harness {
    pub zgw: InMemoryZgw,
    pub index: Arc<RecordingSearchIndex>,
    pub services: Arc<AppServices>,
}

impl Harness {
    pub fn router(&self) -> Router {
        zac_router(self.services.clone())
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router()
            .oneshot(request)
            .await
            .expect("route executes")
    }
}

/// Wires the REST services over the in-memory ZGW, with catalogue reads going through
/// the cache like in production.
pub(super) fn harness(evaluator: FakePolicyEvaluator) -> Harness {
    let zgw = InMemoryZgw::new();
    let ztc_cache = Arc::new(CachingZtcClient::new(zgw.clone(), &CacheConfig::default()));
    let clients = ZgwClients {
        ztc: ztc_cache.clone(),
        ..zgw.clients()
    };
    let api = ZgwApiService::new(clients.clone());
    let tasks = Arc::new(InMemoryTasks::default());
    let identity: Arc<dyn IdentityService> = Arc::new(InMemoryIdentity::default());
    let index = Arc::new(RecordingSearchIndex::default());
    let converters: Vec<Arc<dyn ZoekObjectConverter>> = vec![
        Arc::new(ZaakZoekObjectConverter::new(api.clone(), tasks.clone())),
        Arc::new(DocumentZoekObjectConverter::new(
            clients.clone(),
            zgw.locks(),
            identity.clone(),
        )),
        Arc::new(TaakZoekObjectConverter::new(tasks.clone(), identity.clone())),
    ];

    let variabelen = Arc::new(InMemoryZaakVariabelen::default());
    let suspension = SuspensionService::new(clients.clone(), variabelen.clone(), tasks.clone());
    let reference_tables = Arc::new(InMemoryReferenceTables::with_tables(vec![communicatiekanalen()]));
    let services = AppServices {
        formulieren: FormulierRuntimeService::new(
            api.clone(),
            identity.clone(),
            reference_tables,
            variabelen,
            tasks.clone(),
            suspension.clone(),
        ),
        zaken: ZaakService::new(api.clone(), identity),
        suspension,
        decisions: DecisionService::new(api.clone(), "316245124"),
        policy: PolicyService::new(Arc::new(evaluator), clients.clone(), zgw.locks()),
        indexing: IndexingService::new(converters, index.clone(), clients, tasks),
        ztc_cache,
        organisatie: OrganisatieConfig {
            bronorganisatie: BRONORGANISATIE.to_string(),
            verantwoordelijke_organisatie: "316245124".to_string(),
        },
        zgw: api,
    };

    Harness {
        zgw,
        index,
        services: Arc::new(services),
    }
}

fn communicatiekanalen() -> ReferenceTable {
    let waarde = |naam: &str, sort_order: i32| ReferenceTableValue {
        naam: naam.to_string(),
        sort_order,
        is_system_value: false,
    };
    ReferenceTable {
        id: 1,
        code: "COMMUNICATIEKANAAL".to_string(),
        naam: "Communicatiekanaal".to_string(),
        systeem: true,
        waarden: vec![waarde("E-mail", 2), waarde("Balie", 1)],
    }
}

/// A request on behalf of `bwillems`, member of `behandelaars`.
pub(super) fn request(method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(USER_HEADER, "bwillems")
        .header(GROUPS_HEADER, "behandelaars")
        .header(ROLES_HEADER, "behandelaar");
    match body {
        Some(body) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).expect("json body"))),
        None => builder.body(Body::empty()),
    }
    .expect("request builds")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) async fn error_message(response: Response) -> String {
    read_json_body(response).await["message"]
        .as_str()
        .expect("error message")
        .to_string()
}
