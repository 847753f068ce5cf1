use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::AppServices;
use crate::error::AppError;
use crate::policy::{assert_policy, LoggedInUser, ZaakRechten};
use crate::zaak::{AssignmentReport, SuspensionState, STATUSTYPE_OMSCHRIJVING_INTAKE};
use crate::zgw::zrc::{BetrokkeneType, Rol, Vertrouwelijkheidaanduiding, Zaak, ZaakCreate};
use crate::zgw::ztc::{OmschrijvingGeneriek, RolType};
use crate::zgw::{extract_uuid, ZgwError, ZgwService};

const INITIATOR_TOELICHTING: &str = "Initiator van de zaak";
const BETROKKENE_TOELICHTING: &str = "Betrokkene van de zaak";

/// One person or organisation holding a role on the zaak.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BetrokkeneView {
    pub identificatie: Option<String>,
    pub naam: Option<String>,
    pub betrokkene_type: BetrokkeneType,
}

impl From<&Rol> for BetrokkeneView {
    fn from(rol: &Rol) -> Self {
        Self {
            identificatie: rol.identificatienummer().map(str::to_string),
            naam: rol.naam().map(str::to_string),
            betrokkene_type: rol.betrokkene_type,
        }
    }
}

/// A zaak as shown to the frontend: the ZGW resource plus the names the screens
/// need and the rights of the requesting user.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZaakView {
    #[serde(flatten)]
    pub zaak: Zaak,
    pub zaaktype_omschrijving: String,
    pub status_omschrijving: Option<String>,
    pub groep: Option<BetrokkeneView>,
    pub behandelaar: Option<BetrokkeneView>,
    pub initiator: Option<BetrokkeneView>,
    pub is_open: bool,
    pub is_opgeschort: bool,
    pub is_verlengd: bool,
    pub rechten: ZaakRechten,
}

async fn zaak_view(
    services: &AppServices,
    zaak: Zaak,
    rechten: ZaakRechten,
) -> Result<ZaakView, AppError> {
    let clients = services.zgw.clients();
    let zaaktype = clients.ztc.read_zaaktype(&zaak.zaaktype).await?;
    let status_omschrijving = match &zaak.status {
        Some(status_url) => {
            let status = clients.zrc.read_status(status_url).await?;
            Some(clients.ztc.read_statustype(&status.statustype).await?.omschrijving)
        }
        None => None,
    };
    let groep = services.zgw.find_groep_for_zaak(&zaak).await?;
    let behandelaar = services
        .zgw
        .find_behandelaar_medewerker_role_for_zaak(&zaak)
        .await?;
    let initiator = services.zgw.find_initiator_role_for_zaak(&zaak).await?;

    Ok(ZaakView {
        zaaktype_omschrijving: zaaktype.omschrijving,
        status_omschrijving,
        groep: groep.as_ref().map(BetrokkeneView::from),
        behandelaar: behandelaar.as_ref().map(BetrokkeneView::from),
        initiator: initiator.as_ref().map(BetrokkeneView::from),
        is_open: zaak.is_open(),
        is_opgeschort: zaak.is_opgeschort(),
        is_verlengd: zaak.is_verlengd(),
        rechten,
        zaak,
    })
}

/// Reads the zaak and the user's rights on it.
async fn zaak_with_rechten(
    services: &AppServices,
    user: &LoggedInUser,
    zaak_uuid: Uuid,
) -> Result<(Zaak, ZaakRechten), AppError> {
    let zaak = services.zgw.clients().zrc.read_zaak(zaak_uuid).await?;
    let rechten = services.policy.read_zaak_rechten(user, &zaak).await?;
    Ok((zaak, rechten))
}

/// Re-reads a changed zaak, refreshes its search document and renders it.
async fn changed_zaak_view(
    services: &AppServices,
    user: &LoggedInUser,
    zaak_uuid: Uuid,
) -> Result<Json<ZaakView>, AppError> {
    services.reindex_zaak(zaak_uuid, false).await;
    let (zaak, rechten) = zaak_with_rechten(services, user, zaak_uuid).await?;
    Ok(Json(zaak_view(services, zaak, rechten).await?))
}

pub(super) async fn read_zaak(
    State(services): State<Arc<AppServices>>,
    user: LoggedInUser,
    Path(zaak_uuid): Path<Uuid>,
) -> Result<Json<ZaakView>, AppError> {
    let (zaak, rechten) = zaak_with_rechten(&services, &user, zaak_uuid).await?;
    assert_policy(rechten.lezen)?;
    Ok(Json(zaak_view(&services, zaak, rechten).await?))
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct InitiatorRequest {
    betrokkene_type: BetrokkeneType,
    identificatie: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CreateZaakRequest {
    /// URL of the zaaktype in the catalogi API.
    zaaktype: String,
    #[serde(default)]
    omschrijving: Option<String>,
    #[serde(default)]
    toelichting: Option<String>,
    #[serde(default)]
    startdatum: Option<NaiveDate>,
    #[serde(default)]
    communicatiekanaal: Option<String>,
    #[serde(default)]
    vertrouwelijkheidaanduiding: Option<Vertrouwelijkheidaanduiding>,
    #[serde(default)]
    groep_id: Option<String>,
    #[serde(default)]
    behandelaar_gebruikersnaam: Option<String>,
    #[serde(default)]
    initiator: Option<InitiatorRequest>,
}

pub(super) async fn create_zaak(
    State(services): State<Arc<AppServices>>,
    user: LoggedInUser,
    Json(request): Json<CreateZaakRequest>,
) -> Result<(StatusCode, Json<ZaakView>), AppError> {
    let overige = services.policy.read_overige_rechten(&user).await?;
    assert_policy(overige.starten_zaak)?;
    let zaaktype = services
        .zgw
        .clients()
        .ztc
        .read_zaaktype(&request.zaaktype)
        .await?;
    assert_policy(user.is_authorised_for_zaaktype(&zaaktype.omschrijving))?;

    let today = Utc::now().date_naive();
    let create = ZaakCreate {
        bronorganisatie: services.organisatie.bronorganisatie.clone(),
        verantwoordelijke_organisatie: services.organisatie.verantwoordelijke_organisatie.clone(),
        zaaktype: zaaktype.url.clone(),
        omschrijving: request.omschrijving,
        toelichting: request.toelichting,
        registratiedatum: today,
        startdatum: request.startdatum.unwrap_or(today),
        einddatum_gepland: None,
        uiterlijke_einddatum_afdoening: None,
        communicatiekanaal_naam: request.communicatiekanaal,
        vertrouwelijkheidaanduiding: request
            .vertrouwelijkheidaanduiding
            .unwrap_or(Vertrouwelijkheidaanduiding::Openbaar),
        hoofdzaak: None,
    };
    let zaak = services.zgw.create_zaak(create, None).await?;
    services
        .zgw
        .create_status_for_zaak(&zaak, STATUSTYPE_OMSCHRIJVING_INTAKE, None)
        .await?;
    if let Some(groep_id) = request.groep_id.as_deref() {
        services
            .zaken
            .assign_zaak(
                &zaak,
                groep_id,
                request.behandelaar_gebruikersnaam.as_deref(),
                None,
            )
            .await?;
    }
    if let Some(initiator) = &request.initiator {
        services
            .zaken
            .add_initiator_to_zaak(
                initiator.betrokkene_type,
                &initiator.identificatie,
                &zaak,
                INITIATOR_TOELICHTING,
            )
            .await?;
    }

    let view = changed_zaak_view(&services, &user, zaak.uuid).await?;
    Ok((StatusCode::CREATED, view))
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct OpschortingRequest {
    indicatie_opschorting: bool,
    reden_opschorting: String,
    #[serde(default)]
    duur_dagen: i32,
}

pub(super) async fn opschorten(
    State(services): State<Arc<AppServices>>,
    user: LoggedInUser,
    Path(zaak_uuid): Path<Uuid>,
    Json(request): Json<OpschortingRequest>,
) -> Result<Json<ZaakView>, AppError> {
    let (zaak, rechten) = zaak_with_rechten(&services, &user, zaak_uuid).await?;
    if request.indicatie_opschorting {
        services
            .suspension
            .suspend_zaak(&zaak, &rechten, request.duur_dagen, &request.reden_opschorting)
            .await?;
    } else {
        services
            .suspension
            .resume_zaak(&zaak, &rechten, None, &request.reden_opschorting)
            .await?;
    }
    changed_zaak_view(&services, &user, zaak_uuid).await
}

pub(super) async fn read_opschorting(
    State(services): State<Arc<AppServices>>,
    user: LoggedInUser,
    Path(zaak_uuid): Path<Uuid>,
) -> Result<Json<SuspensionState>, AppError> {
    let (_, rechten) = zaak_with_rechten(&services, &user, zaak_uuid).await?;
    assert_policy(rechten.lezen)?;
    Ok(Json(services.suspension.read_suspension(zaak_uuid).await?))
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct VerlengingRequest {
    duur_dagen: i32,
    reden_verlenging: String,
    /// Explicit new end dates; without them both dates move by `duur_dagen`.
    #[serde(default)]
    einddatum_gepland: Option<NaiveDate>,
    #[serde(default)]
    uiterlijke_einddatum_afdoening: Option<NaiveDate>,
    #[serde(default)]
    taken_verlengen: bool,
}

pub(super) async fn verlengen(
    State(services): State<Arc<AppServices>>,
    user: LoggedInUser,
    Path(zaak_uuid): Path<Uuid>,
    Json(request): Json<VerlengingRequest>,
) -> Result<Json<ZaakView>, AppError> {
    let (zaak, rechten) = zaak_with_rechten(&services, &user, zaak_uuid).await?;
    match request.uiterlijke_einddatum_afdoening {
        Some(uiterlijke_einddatum_afdoening) => {
            assert_policy(rechten.verlengen)?;
            services
                .suspension
                .extend_zaak(
                    &zaak,
                    request.einddatum_gepland,
                    Some(uiterlijke_einddatum_afdoening),
                    &request.reden_verlenging,
                    request.duur_dagen,
                )
                .await?;
        }
        None => {
            services
                .suspension
                .extend_zaak_fatal_date(
                    &zaak,
                    &rechten,
                    request.duur_dagen,
                    &request.reden_verlenging,
                )
                .await?;
        }
    }
    if request.taken_verlengen {
        services
            .suspension
            .extend_tasks(zaak_uuid, request.duur_dagen)
            .await?;
        services.reindex_zaak(zaak_uuid, true).await;
    }
    changed_zaak_view(&services, &user, zaak_uuid).await
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ToekennenRequest {
    zaak_uuid: Uuid,
    groep_id: String,
    #[serde(default)]
    behandelaar_gebruikersnaam: Option<String>,
    #[serde(default)]
    reden: Option<String>,
}

pub(super) async fn toekennen(
    State(services): State<Arc<AppServices>>,
    user: LoggedInUser,
    Json(request): Json<ToekennenRequest>,
) -> Result<Json<ZaakView>, AppError> {
    let (zaak, rechten) = zaak_with_rechten(&services, &user, request.zaak_uuid).await?;
    assert_policy(rechten.toekennen)?;
    services
        .zaken
        .assign_zaak(
            &zaak,
            &request.groep_id,
            request.behandelaar_gebruikersnaam.as_deref(),
            request.reden.as_deref(),
        )
        .await?;
    changed_zaak_view(&services, &user, zaak.uuid).await
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct LijstToekennenRequest {
    uuids: Vec<Uuid>,
    groep_id: String,
    #[serde(default)]
    behandelaar_gebruikersnaam: Option<String>,
    #[serde(default)]
    reden: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct LijstVrijgevenRequest {
    uuids: Vec<Uuid>,
    #[serde(default)]
    reden: Option<String>,
}

async fn assert_verdelen(services: &AppServices, user: &LoggedInUser) -> Result<(), AppError> {
    let werklijst = services.policy.read_werklijst_rechten(user).await?;
    Ok(assert_policy(werklijst.zaken_taken_verdelen)?)
}

pub(super) async fn lijst_toekennen(
    State(services): State<Arc<AppServices>>,
    user: LoggedInUser,
    Json(request): Json<LijstToekennenRequest>,
) -> Result<Json<AssignmentReport>, AppError> {
    assert_verdelen(&services, &user).await?;
    let report = services
        .zaken
        .assign_zaken(
            &request.uuids,
            &request.groep_id,
            request.behandelaar_gebruikersnaam.as_deref(),
            request.reden.as_deref(),
        )
        .await?;
    for &uuid in &report.updated {
        services.reindex_zaak(uuid, false).await;
    }
    Ok(Json(report))
}

pub(super) async fn lijst_vrijgeven(
    State(services): State<Arc<AppServices>>,
    user: LoggedInUser,
    Json(request): Json<LijstVrijgevenRequest>,
) -> Result<Json<AssignmentReport>, AppError> {
    assert_verdelen(&services, &user).await?;
    let report = services
        .zaken
        .release_zaken(&request.uuids, request.reden.as_deref())
        .await?;
    for &uuid in &report.updated {
        services.reindex_zaak(uuid, false).await;
    }
    Ok(Json(report))
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct AfsluitenRequest {
    resultaattype_uuid: Uuid,
    #[serde(default)]
    reden: Option<String>,
    /// Value for a brondatum archiefprocedure derived from a zaak eigenschap.
    #[serde(default)]
    brondatum_eigenschap: Option<NaiveDate>,
}

pub(super) async fn afsluiten(
    State(services): State<Arc<AppServices>>,
    user: LoggedInUser,
    Path(zaak_uuid): Path<Uuid>,
    Json(request): Json<AfsluitenRequest>,
) -> Result<StatusCode, AppError> {
    let (zaak, rechten) = zaak_with_rechten(&services, &user, zaak_uuid).await?;
    services
        .zaken
        .close_zaak(
            &zaak,
            &rechten,
            request.resultaattype_uuid,
            request.reden.as_deref(),
            request.brondatum_eigenschap,
        )
        .await?;
    services.reindex_zaak(zaak_uuid, false).await;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct AfbrekenRequest {
    resultaattype_uuid: Uuid,
    reden: String,
}

pub(super) async fn afbreken(
    State(services): State<Arc<AppServices>>,
    user: LoggedInUser,
    Path(zaak_uuid): Path<Uuid>,
    Json(request): Json<AfbrekenRequest>,
) -> Result<StatusCode, AppError> {
    let (zaak, rechten) = zaak_with_rechten(&services, &user, zaak_uuid).await?;
    services
        .zaken
        .terminate_zaak(&zaak, &rechten, request.resultaattype_uuid, &request.reden)
        .await?;
    services.reindex_zaak(zaak_uuid, false).await;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct HeropenenRequest {
    reden: String,
}

pub(super) async fn heropenen(
    State(services): State<Arc<AppServices>>,
    user: LoggedInUser,
    Path(zaak_uuid): Path<Uuid>,
    Json(request): Json<HeropenenRequest>,
) -> Result<StatusCode, AppError> {
    let (zaak, rechten) = zaak_with_rechten(&services, &user, zaak_uuid).await?;
    services
        .zaken
        .reopen_zaak(&zaak, &rechten, &request.reden)
        .await?;
    services.reindex_zaak(zaak_uuid, false).await;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct BetrokkeneRequest {
    zaak_uuid: Uuid,
    roltype_uuid: Uuid,
    betrokkene_type: BetrokkeneType,
    betrokkene_identificatie: String,
    #[serde(default)]
    roltoelichting: Option<String>,
}

/// Finds a roltype of the zaaktype by its UUID.
async fn read_roltype(
    services: &AppServices,
    zaaktype_url: &str,
    roltype_uuid: Uuid,
) -> Result<RolType, AppError> {
    let ztc = &services.zgw.clients().ztc;
    for generiek in OmschrijvingGeneriek::ALL {
        for roltype in ztc.find_roltypen(zaaktype_url, generiek).await? {
            if extract_uuid(&roltype.url)? == roltype_uuid {
                return Ok(roltype);
            }
        }
    }
    Err(ZgwError::not_found(
        ZgwService::Ztc,
        format!("roltype {roltype_uuid} of zaaktype {zaaktype_url}"),
    )
    .into())
}

pub(super) async fn add_betrokkene(
    State(services): State<Arc<AppServices>>,
    user: LoggedInUser,
    Json(request): Json<BetrokkeneRequest>,
) -> Result<(StatusCode, Json<BetrokkeneView>), AppError> {
    let (zaak, rechten) = zaak_with_rechten(&services, &user, request.zaak_uuid).await?;
    let allowed = match request.betrokkene_type {
        BetrokkeneType::NatuurlijkPersoon => rechten.toevoegen_betrokkene_persoon,
        BetrokkeneType::NietNatuurlijkPersoon | BetrokkeneType::Vestiging => {
            rechten.toevoegen_betrokkene_bedrijf
        }
        other => {
            return Err(AppError::Validation(format!(
                "'{}' cannot be added as betrokkene",
                other.code()
            )))
        }
    };
    assert_policy(allowed)?;

    let roltype = read_roltype(&services, &zaak.zaaktype, request.roltype_uuid).await?;
    let toelichting = request
        .roltoelichting
        .as_deref()
        .filter(|toelichting| !toelichting.trim().is_empty())
        .unwrap_or(BETROKKENE_TOELICHTING);
    let rol = services
        .zaken
        .add_betrokkene_to_zaak(
            &roltype.url,
            &request.betrokkene_identificatie,
            request.betrokkene_type,
            &zaak,
            toelichting,
        )
        .await?;
    services.reindex_zaak(zaak.uuid, false).await;
    Ok((StatusCode::CREATED, Json(BetrokkeneView::from(&rol))))
}
