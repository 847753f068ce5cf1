use crate::cli::ServeArgs;
use crate::infra::{
    AppState, InMemoryDocumentLocks, InMemoryReferenceTables, InMemoryTaskStore,
    InMemoryZaakVariabelen, StaticIdentityService,
};
use crate::routes::with_platform_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;
use zac::app::AppServices;
use zac::config::AppConfig;
use zac::decision::DecisionService;
use zac::document::DocumentLockService;
use zac::error::AppError;
use zac::formulier::FormulierRuntimeService;
use zac::identity::IdentityService;
use zac::policy::{OpaPolicyEvaluator, PolicyService};
use zac::search::{
    DocumentZoekObjectConverter, IndexingService, SolrClient, TaakZoekObjectConverter,
    ZaakZoekObjectConverter, ZoekObjectConverter,
};
use zac::telemetry;
use zac::workflow::{TaskService, ZaakVariabelenService};
use zac::zaak::{SuspensionService, ZaakService};
use zac::zgw::brc::HttpBrcClient;
use zac::zgw::drc::HttpDrcClient;
use zac::zgw::zrc::HttpZrcClient;
use zac::zgw::ztc::{CachingZtcClient, HttpZtcClient};
use zac::zgw::{ZgwApiService, ZgwClients, ZgwHttpClient};

/// Wires the ZGW, policy and search clients into the request handler services.
pub(crate) fn build_services(config: &AppConfig) -> AppServices {
    let http = ZgwHttpClient::new(&config.zgw);
    let ztc_cache = Arc::new(CachingZtcClient::new(
        HttpZtcClient::new(http.clone()),
        &config.ztc_cache,
    ));
    let clients = ZgwClients {
        zrc: Arc::new(HttpZrcClient::new(http.clone())),
        ztc: ztc_cache.clone(),
        drc: Arc::new(HttpDrcClient::new(http.clone())),
        brc: Arc::new(HttpBrcClient::new(http)),
    };
    let api = ZgwApiService::new(clients.clone());

    let tasks: Arc<dyn TaskService> = Arc::new(InMemoryTaskStore::default());
    let identity: Arc<dyn IdentityService> = Arc::new(StaticIdentityService::from_env());
    let locks: Arc<dyn DocumentLockService> = Arc::new(InMemoryDocumentLocks::default());
    let variabelen: Arc<dyn ZaakVariabelenService> = Arc::new(InMemoryZaakVariabelen::default());
    let suspension = SuspensionService::new(clients.clone(), variabelen.clone(), tasks.clone());

    let converters: Vec<Arc<dyn ZoekObjectConverter>> = vec![
        Arc::new(ZaakZoekObjectConverter::new(api.clone(), tasks.clone())),
        Arc::new(DocumentZoekObjectConverter::new(
            clients.clone(),
            locks.clone(),
            identity.clone(),
        )),
        Arc::new(TaakZoekObjectConverter::new(tasks.clone(), identity.clone())),
    ];

    AppServices {
        formulieren: FormulierRuntimeService::new(
            api.clone(),
            identity.clone(),
            Arc::new(InMemoryReferenceTables::default()),
            variabelen,
            tasks.clone(),
            suspension.clone(),
        ),
        zaken: ZaakService::new(api.clone(), identity),
        suspension,
        decisions: DecisionService::new(
            api.clone(),
            config.organisatie.verantwoordelijke_organisatie.clone(),
        ),
        policy: PolicyService::new(
            Arc::new(OpaPolicyEvaluator::new(&config.opa)),
            clients.clone(),
            locks,
        ),
        indexing: IndexingService::new(
            converters,
            Arc::new(SolrClient::new(&config.solr)),
            clients,
            tasks,
        ),
        ztc_cache,
        organisatie: config.organisatie.clone(),
        zgw: api,
    }
}

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let services = Arc::new(build_services(&config));
    let app = with_platform_routes(services)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        zgw = %config.zgw.api_url,
        opa = %config.opa.api_url,
        solr = %config.solr.url,
        "zaakafhandelcomponent ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
