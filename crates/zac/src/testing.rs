//! In-memory stand-ins for the external systems, shared by the unit tests.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::admin::{ReferenceTable, ReferenceTableError, ReferenceTableService};
use crate::document::{DocumentLock, DocumentLockError, DocumentLockService};
use crate::identity::{Group, IdentityError, IdentityService, User};
use crate::policy::{
    DocumentRechten, LoggedInUser, OverigeRechten, PolicyError, PolicyEvaluator, PolicyRule,
    TaakRechten, WerklijstRechten, ZaakRechten,
};
use crate::search::{SearchError, SearchIndex, ZoekObject, ZoekObjectType};
use crate::workflow::{Task, TaskService, WorkflowError, ZaakVariabelenService};
use crate::zgw::brc::*;
use crate::zgw::drc::*;
use crate::zgw::zrc::*;
use crate::zgw::ztc::*;
use crate::zgw::{IsoPeriod, Page, ZgwClients, ZgwError, ZgwService};

pub const BASE_URL: &str = "http://zgw.test/";
/// Listings of the in-memory APIs are split into pages of this size.
pub const PAGE_SIZE: usize = 2;

pub const ZAAKTYPE_UUID: Uuid = Uuid::from_u128(0x100);
pub const STATUSTYPE_INTAKE: Uuid = Uuid::from_u128(0x201);
pub const STATUSTYPE_IN_BEHANDELING: Uuid = Uuid::from_u128(0x202);
pub const STATUSTYPE_HEROPEND: Uuid = Uuid::from_u128(0x203);
pub const STATUSTYPE_AFGEROND: Uuid = Uuid::from_u128(0x204);
pub const RESULTAATTYPE_VERLEEND: Uuid = Uuid::from_u128(0x300);
pub const RESULTAATTYPE_VASTGESTELD: Uuid = Uuid::from_u128(0x301);
pub const ROLTYPE_BEHANDELAAR: Uuid = Uuid::from_u128(0x400);
pub const ROLTYPE_INITIATOR: Uuid = Uuid::from_u128(0x401);
pub const ROLTYPE_BELANGHEBBENDE: Uuid = Uuid::from_u128(0x402);
pub const EIGENSCHAP_DATUM_BESLUIT: Uuid = Uuid::from_u128(0x500);
pub const BESLUITTYPE_MET_PUBLICATIE: Uuid = Uuid::from_u128(0x600);
pub const BESLUITTYPE_ZONDER_PUBLICATIE: Uuid = Uuid::from_u128(0x601);
pub const INFORMATIEOBJECTTYPE_BIJLAGE: Uuid = Uuid::from_u128(0x700);

pub const DATUMKENMERK_BESLUIT: &str = "datumBesluit";

pub fn url(path: &str, uuid: Uuid) -> String {
    format!("{BASE_URL}{path}/{uuid}")
}

pub fn zaaktype_url() -> String {
    url("catalogi/api/v1/zaaktypen", ZAAKTYPE_UUID)
}

pub fn statustype_url(uuid: Uuid) -> String {
    url("catalogi/api/v1/statustypen", uuid)
}

pub fn resultaattype_url(uuid: Uuid) -> String {
    url("catalogi/api/v1/resultaattypen", uuid)
}

pub fn roltype_url(uuid: Uuid) -> String {
    url("catalogi/api/v1/roltypen", uuid)
}

pub fn besluittype_url(uuid: Uuid) -> String {
    url("catalogi/api/v1/besluittypen", uuid)
}

pub fn informatieobjecttype_url() -> String {
    url("catalogi/api/v1/informatieobjecttypen", INFORMATIEOBJECTTYPE_BIJLAGE)
}

pub fn zaak_url(uuid: Uuid) -> String {
    url("zaken/api/v1/zaken", uuid)
}

pub fn document_url(uuid: Uuid) -> String {
    url("documenten/api/v1/enkelvoudiginformatieobjecten", uuid)
}

fn period(raw: &str) -> IsoPeriod {
    IsoPeriod::parse(raw).expect("valid test period")
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

pub fn timestamp(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 9, 0, 0)
        .single()
        .expect("valid test timestamp")
}

/// An open zaak of the seeded zaaktype, started on 2024-03-01.
pub fn sample_zaak() -> Zaak {
    let uuid = Uuid::new_v4();
    Zaak {
        url: zaak_url(uuid),
        uuid,
        identificatie: format!("ZAAK-2024-{}", &uuid.simple().to_string()[..8]),
        bronorganisatie: "002564440".to_string(),
        verantwoordelijke_organisatie: "002564440".to_string(),
        zaaktype: zaaktype_url(),
        omschrijving: Some("Melding evenement Dam".to_string()),
        toelichting: None,
        registratiedatum: date(2024, 3, 1),
        startdatum: date(2024, 3, 1),
        einddatum: None,
        einddatum_gepland: Some(date(2024, 3, 6)),
        uiterlijke_einddatum_afdoening: Some(date(2024, 3, 11)),
        publicatiedatum: None,
        communicatiekanaal_naam: Some("E-mail".to_string()),
        vertrouwelijkheidaanduiding: Vertrouwelijkheidaanduiding::Openbaar,
        status: None,
        resultaat: None,
        archiefnominatie: None,
        archiefactiedatum: None,
        opschorting: Some(Opschorting {
            indicatie: false,
            reden: String::new(),
        }),
        verlenging: None,
        hoofdzaak: None,
        deelzaken: Vec::new(),
    }
}

pub fn sample_resultaattype(omschrijving: &str) -> ResultaatType {
    ResultaatType {
        url: resultaattype_url(RESULTAATTYPE_VERLEEND),
        zaaktype: zaaktype_url(),
        omschrijving: omschrijving.to_string(),
        toelichting: None,
        archiefnominatie: Some(Archiefnominatie::Vernietigen),
        archiefactietermijn: Some(period("P10Y")),
        brondatum_archiefprocedure: Some(BrondatumArchiefprocedure {
            afleidingswijze: Afleidingswijze::Afgehandeld,
            datumkenmerk: None,
            einddatum_bekend: false,
            objecttype: None,
            registratie: None,
            procestermijn: None,
        }),
    }
}

pub fn sample_document(titel: &str) -> EnkelvoudigInformatieobject {
    let uuid = Uuid::new_v4();
    EnkelvoudigInformatieobject {
        url: document_url(uuid),
        identificatie: format!("DOCUMENT-{}", &uuid.simple().to_string()[..8]),
        bronorganisatie: "002564440".to_string(),
        creatiedatum: date(2024, 3, 2),
        titel: titel.to_string(),
        vertrouwelijkheidaanduiding: Vertrouwelijkheidaanduiding::Openbaar,
        auteur: "Bas Willems".to_string(),
        status: Some(DocumentStatus::InBewerking),
        formaat: Some("application/pdf".to_string()),
        taal: "dut".to_string(),
        versie: 1,
        begin_registratie: timestamp(2024, 3, 2),
        bestandsnaam: Some(format!("{titel}.pdf")),
        bestandsomvang: Some(1024),
        beschrijving: None,
        ontvangstdatum: None,
        verzenddatum: None,
        indicatie_gebruiksrecht: Some(false),
        ondertekening: Some(Ondertekening::default()),
        informatieobjecttype: informatieobjecttype_url(),
        locked: false,
    }
}

pub fn logged_in_user() -> LoggedInUser {
    LoggedInUser {
        id: "bwillems".to_string(),
        first_name: Some("Bas".to_string()),
        last_name: Some("Willems".to_string()),
        groups: BTreeSet::from(["behandelaars".to_string()]),
        roles: BTreeSet::from(["behandelaar".to_string()]),
        zaaktypen: None,
    }
}

pub fn sample_task(zaak: &Zaak, name: &str) -> Task {
    Task {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        description: None,
        zaak_uuid: zaak.uuid,
        zaak_identificatie: zaak.identificatie.clone(),
        zaaktype_omschrijving: "Melding evenement".to_string(),
        assignee: None,
        candidate_group: Some("behandelaars".to_string()),
        created: timestamp(2024, 3, 2),
        due_date: None,
        completed: None,
        form_key: None,
        task_data: Map::new(),
        task_information: Map::new(),
    }
}

fn not_found(service: ZgwService, resource: impl Into<String>) -> ZgwError {
    ZgwError::not_found(service, resource)
}

#[derive(Default)]
struct ZgwState {
    zaaktypen: Vec<ZaakType>,
    statustypen: Vec<StatusType>,
    resultaattypen: Vec<ResultaatType>,
    roltypen: Vec<RolType>,
    besluittypen: Vec<BesluitType>,
    informatieobjecttypen: Vec<InformatieobjectType>,
    eigenschappen: Vec<Eigenschap>,
    zaken: BTreeMap<Uuid, Zaak>,
    statussen: Vec<Status>,
    resultaten: Vec<Resultaat>,
    rollen: Vec<Rol>,
    zaakeigenschappen: Vec<ZaakEigenschap>,
    zaakinformatieobjecten: Vec<ZaakInformatieobject>,
    zaakobjecten: Vec<Zaakobject>,
    documenten: BTreeMap<Uuid, EnkelvoudigInformatieobject>,
    gebruiksrechten: Vec<Gebruiksrechten>,
    besluiten: BTreeMap<Uuid, Besluit>,
    besluitinformatieobjecten: Vec<BesluitInformatieobject>,
    locks: HashMap<Uuid, DocumentLock>,
    patches: Vec<(Uuid, ZaakPatch)>,
    document_patches: Vec<(Uuid, InformatieobjectPatch)>,
    explanations: Vec<String>,
    deleted_documents: Vec<Uuid>,
}

impl ZgwState {
    fn seeded() -> Self {
        let zaaktype = zaaktype_url();
        let statustype = |uuid: Uuid, omschrijving: &str, volgnummer: i32, eind: bool| StatusType {
            url: statustype_url(uuid),
            omschrijving: omschrijving.to_string(),
            zaaktype: zaaktype.clone(),
            volgnummer,
            is_eindstatus: eind,
        };
        let roltype = |uuid: Uuid, omschrijving: &str, generiek: OmschrijvingGeneriek| RolType {
            url: roltype_url(uuid),
            zaaktype: zaaktype.clone(),
            omschrijving: omschrijving.to_string(),
            omschrijving_generiek: generiek,
        };

        let mut vastgesteld = sample_resultaattype("Vastgesteld");
        vastgesteld.url = resultaattype_url(RESULTAATTYPE_VASTGESTELD);
        vastgesteld.archiefnominatie = Some(Archiefnominatie::BlijvendBewaren);
        vastgesteld.archiefactietermijn = Some(period("P20Y"));
        vastgesteld.brondatum_archiefprocedure = Some(BrondatumArchiefprocedure {
            afleidingswijze: Afleidingswijze::Eigenschap,
            datumkenmerk: Some(DATUMKENMERK_BESLUIT.to_string()),
            einddatum_bekend: false,
            objecttype: None,
            registratie: None,
            procestermijn: None,
        });

        Self {
            zaaktypen: vec![ZaakType {
                url: zaaktype.clone(),
                identificatie: "melding-evenement".to_string(),
                omschrijving: "Melding evenement".to_string(),
                catalogus: None,
                doorlooptijd: period("P10D"),
                servicenorm: Some(period("P5D")),
                opschorting_en_aanhouding_mogelijk: true,
                verlenging_mogelijk: true,
                verlengingstermijn: Some(period("P30D")),
                besluittypen: vec![
                    besluittype_url(BESLUITTYPE_MET_PUBLICATIE),
                    besluittype_url(BESLUITTYPE_ZONDER_PUBLICATIE),
                ],
                informatieobjecttypen: vec![informatieobjecttype_url()],
            }],
            statustypen: vec![
                statustype(STATUSTYPE_INTAKE, "Intake", 1, false),
                statustype(STATUSTYPE_IN_BEHANDELING, "In behandeling", 2, false),
                statustype(STATUSTYPE_HEROPEND, "Heropend", 3, false),
                statustype(STATUSTYPE_AFGEROND, "Afgerond", 4, true),
            ],
            resultaattypen: vec![sample_resultaattype("Verleend"), vastgesteld],
            roltypen: vec![
                roltype(ROLTYPE_BEHANDELAAR, "Behandelaar", OmschrijvingGeneriek::Behandelaar),
                roltype(ROLTYPE_INITIATOR, "Initiator", OmschrijvingGeneriek::Initiator),
                roltype(
                    ROLTYPE_BELANGHEBBENDE,
                    "Belanghebbende",
                    OmschrijvingGeneriek::Belanghebbende,
                ),
            ],
            besluittypen: vec![
                BesluitType {
                    url: besluittype_url(BESLUITTYPE_MET_PUBLICATIE),
                    omschrijving: "Vergunning".to_string(),
                    publicatie_indicatie: true,
                    reactietermijn: Some(period("P14D")),
                    zaaktypen: vec![zaaktype.clone()],
                },
                BesluitType {
                    url: besluittype_url(BESLUITTYPE_ZONDER_PUBLICATIE),
                    omschrijving: "Weigering".to_string(),
                    publicatie_indicatie: false,
                    reactietermijn: None,
                    zaaktypen: vec![zaaktype.clone()],
                },
            ],
            informatieobjecttypen: vec![InformatieobjectType {
                url: informatieobjecttype_url(),
                omschrijving: "bijlage".to_string(),
            }],
            eigenschappen: vec![Eigenschap {
                url: url("catalogi/api/v1/eigenschappen", EIGENSCHAP_DATUM_BESLUIT),
                naam: DATUMKENMERK_BESLUIT.to_string(),
                zaaktype,
            }],
            ..Self::default()
        }
    }

    fn zaak_mut(&mut self, uuid: Uuid) -> Result<&mut Zaak, ZgwError> {
        self.zaken
            .get_mut(&uuid)
            .ok_or_else(|| not_found(ZgwService::Zrc, format!("zaak {uuid}")))
    }

    fn zaak_by_url(&self, url: &str) -> Result<Zaak, ZgwError> {
        self.zaken
            .values()
            .find(|zaak| zaak.url == url)
            .cloned()
            .ok_or_else(|| not_found(ZgwService::Zrc, url))
    }

    fn explain(&mut self, toelichting: Option<&str>) {
        if let Some(toelichting) = toelichting {
            self.explanations.push(toelichting.to_string());
        }
    }

    /// Mirrors the zaken API: an end status closes the zaak and a "Heropend" status
    /// reopens it.
    fn apply_status(&mut self, status: &Status) -> Result<(), ZgwError> {
        let statustype = self
            .statustypen
            .iter()
            .find(|statustype| statustype.url == status.statustype)
            .cloned()
            .ok_or_else(|| not_found(ZgwService::Ztc, status.statustype.clone()))?;
        let zaak_uuid = crate::zgw::extract_uuid(&status.zaak)?;
        let archiefnominatie = {
            let zaak = self.zaak_mut(zaak_uuid)?.clone();
            zaak.resultaat
                .as_ref()
                .and_then(|url| self.resultaten.iter().find(|resultaat| &resultaat.url == url))
                .and_then(|resultaat| {
                    self.resultaattypen
                        .iter()
                        .find(|resultaattype| resultaattype.url == resultaat.resultaattype)
                })
                .and_then(|resultaattype| resultaattype.archiefnominatie)
                .unwrap_or(Archiefnominatie::Vernietigen)
        };

        let zaak = self.zaak_mut(zaak_uuid)?;
        zaak.status = Some(status.url.clone());
        if statustype.is_eindstatus {
            zaak.einddatum = Some(status.datum_status_gezet.date_naive());
            zaak.archiefnominatie = Some(archiefnominatie);
        } else if statustype.omschrijving == crate::zaak::STATUSTYPE_OMSCHRIJVING_HEROPEND {
            zaak.einddatum = None;
            zaak.archiefnominatie = None;
            zaak.archiefactiedatum = None;
        }
        self.statussen.push(status.clone());
        Ok(())
    }
}

/// The four ZGW APIs and the document lock store, backed by one shared state.
#[derive(Clone)]
pub struct InMemoryZgw {
    state: Arc<Mutex<ZgwState>>,
}

impl Default for InMemoryZgw {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryZgw {
    /// Seeded with the "Melding evenement" zaaktype and its catalogue.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(ZgwState::seeded())),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ZgwState> {
        self.state.lock().expect("zgw mutex poisoned")
    }

    pub fn clients(&self) -> ZgwClients {
        ZgwClients {
            zrc: Arc::new(self.clone()),
            ztc: Arc::new(self.clone()),
            drc: Arc::new(self.clone()),
            brc: Arc::new(self.clone()),
        }
    }

    pub fn locks(&self) -> Arc<dyn DocumentLockService> {
        Arc::new(self.clone())
    }

    pub fn zaaktype_url(&self) -> String {
        zaaktype_url()
    }

    pub fn insert_zaak(&self, zaak: Zaak) -> Zaak {
        self.lock().zaken.insert(zaak.uuid, zaak.clone());
        zaak
    }

    /// Stores a fresh [`sample_zaak`].
    pub fn open_zaak(&self) -> Zaak {
        self.insert_zaak(sample_zaak())
    }

    pub fn zaak(&self, uuid: Uuid) -> Zaak {
        self.lock()
            .zaken
            .get(&uuid)
            .cloned()
            .expect("zaak stored")
    }

    /// Gives the zaak a status of the given seeded statustype.
    pub fn set_status(&self, zaak_uuid: Uuid, statustype: Uuid) -> Zaak {
        let mut state = self.lock();
        let uuid = Uuid::new_v4();
        let status = Status {
            url: url("zaken/api/v1/statussen", uuid),
            uuid,
            zaak: zaak_url(zaak_uuid),
            statustype: statustype_url(statustype),
            datum_status_gezet: timestamp(2024, 3, 4),
            statustoelichting: None,
        };
        state.apply_status(&status).expect("status applies");
        state.zaken.get(&zaak_uuid).cloned().expect("zaak stored")
    }

    pub fn set_resultaat(&self, zaak_uuid: Uuid, resultaattype: Uuid) -> Zaak {
        let mut state = self.lock();
        let uuid = Uuid::new_v4();
        let resultaat = Resultaat {
            url: url("zaken/api/v1/resultaten", uuid),
            uuid,
            zaak: zaak_url(zaak_uuid),
            resultaattype: resultaattype_url(resultaattype),
            toelichting: None,
        };
        state.resultaten.push(resultaat.clone());
        let zaak = state.zaken.get_mut(&zaak_uuid).expect("zaak stored");
        zaak.resultaat = Some(resultaat.url);
        zaak.clone()
    }

    /// Replaces the brondatum procedure of a seeded resultaattype.
    pub fn set_brondatum_procedure(&self, resultaattype: Uuid, procedure: BrondatumArchiefprocedure) {
        let mut state = self.lock();
        let url = resultaattype_url(resultaattype);
        let resultaattype = state
            .resultaattypen
            .iter_mut()
            .find(|candidate| candidate.url == url)
            .expect("resultaattype seeded");
        resultaattype.brondatum_archiefprocedure = Some(procedure);
    }

    pub fn rollen(&self, zaak_uuid: Uuid) -> Vec<Rol> {
        let zaak_url = zaak_url(zaak_uuid);
        self.lock()
            .rollen
            .iter()
            .filter(|rol| rol.zaak == zaak_url)
            .cloned()
            .collect()
    }

    pub fn insert_rol(
        &self,
        zaak: &Zaak,
        roltype: Uuid,
        betrokkene_type: BetrokkeneType,
        identificatie: BetrokkeneIdentificatie,
    ) -> Rol {
        let mut state = self.lock();
        let roltype = state
            .roltypen
            .iter()
            .find(|candidate| candidate.url == roltype_url(roltype))
            .cloned()
            .expect("seeded roltype");
        let uuid = Uuid::new_v4();
        let rol = Rol {
            url: url("zaken/api/v1/rollen", uuid),
            uuid,
            zaak: zaak.url.clone(),
            roltype: roltype.url,
            omschrijving: Some(roltype.omschrijving),
            omschrijving_generiek: Some(roltype.omschrijving_generiek.code().to_string()),
            roltoelichting: None,
            betrokkene_type,
            betrokkene_identificatie: identificatie,
        };
        state.rollen.push(rol.clone());
        rol
    }

    pub fn insert_document(&self, document: EnkelvoudigInformatieobject) -> EnkelvoudigInformatieobject {
        let uuid = document.uuid().expect("document url ends in uuid");
        self.lock().documenten.insert(uuid, document.clone());
        document
    }

    pub fn document(&self, uuid: Uuid) -> EnkelvoudigInformatieobject {
        self.lock()
            .documenten
            .get(&uuid)
            .cloned()
            .expect("document stored")
    }

    pub fn link_document(&self, zaak: &Zaak, document: &EnkelvoudigInformatieobject) {
        let uuid = Uuid::new_v4();
        self.lock().zaakinformatieobjecten.push(ZaakInformatieobject {
            url: url("zaken/api/v1/zaakinformatieobjecten", uuid),
            uuid,
            zaak: zaak.url.clone(),
            informatieobject: document.url.clone(),
            titel: Some(document.titel.clone()),
            beschrijving: None,
            registratiedatum: Some(timestamp(2024, 3, 2)),
        });
    }

    pub fn lock_document(&self, document_uuid: Uuid, user_id: &str) {
        let mut state = self.lock();
        if let Some(document) = state.documenten.get_mut(&document_uuid) {
            document.locked = true;
        }
        state.locks.insert(
            document_uuid,
            DocumentLock {
                document_uuid,
                user_id: user_id.to_string(),
                locked_at: timestamp(2024, 3, 3),
            },
        );
    }

    pub fn insert_zaakobject(&self, zaak: &Zaak, object_type: &str, object: &str) {
        let uuid = Uuid::new_v4();
        self.lock().zaakobjecten.push(Zaakobject {
            url: url("zaken/api/v1/zaakobjecten", uuid),
            uuid,
            zaak: zaak.url.clone(),
            object: Some(object.to_string()),
            object_type: object_type.to_string(),
            relatieomschrijving: None,
        });
    }

    pub fn insert_besluit(&self, zaak: &Zaak, besluittype: Uuid) -> Besluit {
        let uuid = Uuid::new_v4();
        let besluit = Besluit {
            url: url("besluiten/api/v1/besluiten", uuid),
            identificatie: format!("BESLUIT-{}", &uuid.simple().to_string()[..8]),
            verantwoordelijke_organisatie: "002564440".to_string(),
            besluittype: besluittype_url(besluittype),
            zaak: Some(zaak.url.clone()),
            datum: date(2024, 3, 5),
            toelichting: None,
            ingangsdatum: date(2024, 3, 5),
            vervaldatum: None,
            vervalreden: None,
            publicatiedatum: None,
            verzenddatum: None,
            uiterlijke_reactiedatum: None,
        };
        self.lock().besluiten.insert(uuid, besluit.clone());
        besluit
    }

    pub fn besluit(&self, uuid: Uuid) -> Besluit {
        self.lock()
            .besluiten
            .get(&uuid)
            .cloned()
            .expect("besluit stored")
    }

    pub fn besluit_documenten(&self, besluit: &Besluit) -> Vec<String> {
        self.lock()
            .besluitinformatieobjecten
            .iter()
            .filter(|link| link.besluit == besluit.url)
            .map(|link| link.informatieobject.clone())
            .collect()
    }

    pub fn resultaat(&self, zaak: &Zaak) -> Option<Resultaat> {
        let current = self.zaak(zaak.uuid).resultaat?;
        self.lock()
            .resultaten
            .iter()
            .find(|resultaat| resultaat.url == current)
            .cloned()
    }

    pub fn zaakeigenschappen(&self, zaak_uuid: Uuid) -> Vec<ZaakEigenschap> {
        let zaak_url = zaak_url(zaak_uuid);
        self.lock()
            .zaakeigenschappen
            .iter()
            .filter(|eigenschap| eigenschap.zaak == zaak_url)
            .cloned()
            .collect()
    }

    pub fn zaakinformatieobjecten(&self, zaak_uuid: Uuid) -> Vec<ZaakInformatieobject> {
        let zaak_url = zaak_url(zaak_uuid);
        self.lock()
            .zaakinformatieobjecten
            .iter()
            .filter(|link| link.zaak == zaak_url)
            .cloned()
            .collect()
    }

    pub fn gebruiksrechten(&self) -> Vec<Gebruiksrechten> {
        self.lock().gebruiksrechten.clone()
    }

    pub fn patches(&self) -> Vec<(Uuid, ZaakPatch)> {
        self.lock().patches.clone()
    }

    pub fn document_patches(&self) -> Vec<(Uuid, InformatieobjectPatch)> {
        self.lock().document_patches.clone()
    }

    pub fn explanations(&self) -> Vec<String> {
        self.lock().explanations.clone()
    }

    pub fn deleted_documents(&self) -> Vec<Uuid> {
        self.lock().deleted_documents.clone()
    }
}

fn page<T: Clone>(items: &[T], page: u32) -> Page<T> {
    let start = (page.max(1) as usize - 1) * PAGE_SIZE;
    let results: Vec<T> = items.iter().skip(start).take(PAGE_SIZE).cloned().collect();
    let next = (start + PAGE_SIZE < items.len()).then(|| format!("{BASE_URL}?page={}", page + 1));
    Page {
        count: items.len() as u64,
        next,
        previous: None,
        results,
    }
}

#[async_trait]
impl ZrcClient for InMemoryZgw {
    async fn read_zaak(&self, uuid: Uuid) -> Result<Zaak, ZgwError> {
        self.lock()
            .zaken
            .get(&uuid)
            .cloned()
            .ok_or_else(|| not_found(ZgwService::Zrc, format!("zaak {uuid}")))
    }

    async fn read_zaak_by_url(&self, url: &str) -> Result<Zaak, ZgwError> {
        self.lock().zaak_by_url(url)
    }

    async fn list_zaken(&self, parameters: &ZaakListParameters) -> Result<Page<Zaak>, ZgwError> {
        let mut zaken: Vec<Zaak> = self.lock().zaken.values().cloned().collect();
        if parameters.ordering.as_deref() == Some("-identificatie") {
            zaken.sort_by(|a, b| b.identificatie.cmp(&a.identificatie));
        }
        Ok(page(&zaken, parameters.page.unwrap_or(1)))
    }

    async fn create_zaak(&self, zaak: &ZaakCreate, toelichting: Option<&str>) -> Result<Zaak, ZgwError> {
        let mut state = self.lock();
        state.explain(toelichting);
        let uuid = Uuid::new_v4();
        let created = Zaak {
            url: zaak_url(uuid),
            uuid,
            identificatie: format!("ZAAK-2024-{:07}", state.zaken.len() + 1),
            bronorganisatie: zaak.bronorganisatie.clone(),
            verantwoordelijke_organisatie: zaak.verantwoordelijke_organisatie.clone(),
            zaaktype: zaak.zaaktype.clone(),
            omschrijving: zaak.omschrijving.clone(),
            toelichting: zaak.toelichting.clone(),
            registratiedatum: zaak.registratiedatum,
            startdatum: zaak.startdatum,
            einddatum: None,
            einddatum_gepland: zaak.einddatum_gepland,
            uiterlijke_einddatum_afdoening: zaak.uiterlijke_einddatum_afdoening,
            publicatiedatum: None,
            communicatiekanaal_naam: zaak.communicatiekanaal_naam.clone(),
            vertrouwelijkheidaanduiding: zaak.vertrouwelijkheidaanduiding,
            status: None,
            resultaat: None,
            archiefnominatie: None,
            archiefactiedatum: None,
            opschorting: None,
            verlenging: None,
            hoofdzaak: zaak.hoofdzaak.clone(),
            deelzaken: Vec::new(),
        };
        state.zaken.insert(uuid, created.clone());
        Ok(created)
    }

    async fn patch_zaak(
        &self,
        uuid: Uuid,
        patch: &ZaakPatch,
        toelichting: Option<&str>,
    ) -> Result<Zaak, ZgwError> {
        let mut state = self.lock();
        state.explain(toelichting);
        state.patches.push((uuid, patch.clone()));
        let zaak = state.zaak_mut(uuid)?;
        if let Some(value) = &patch.omschrijving {
            zaak.omschrijving = Some(value.clone());
        }
        if let Some(value) = &patch.toelichting {
            zaak.toelichting = Some(value.clone());
        }
        if let Some(value) = patch.startdatum {
            zaak.startdatum = value;
        }
        if let Some(value) = patch.einddatum_gepland {
            zaak.einddatum_gepland = Some(value);
        }
        if let Some(value) = patch.uiterlijke_einddatum_afdoening {
            zaak.uiterlijke_einddatum_afdoening = Some(value);
        }
        if let Some(value) = patch.vertrouwelijkheidaanduiding {
            zaak.vertrouwelijkheidaanduiding = value;
        }
        if let Some(value) = patch.archiefactiedatum {
            zaak.archiefactiedatum = Some(value);
        }
        if let Some(value) = &patch.opschorting {
            zaak.opschorting = Some(value.clone());
        }
        if let Some(value) = &patch.verlenging {
            zaak.verlenging = Some(value.clone());
        }
        Ok(zaak.clone())
    }

    async fn close_zaak(
        &self,
        uuid: Uuid,
        afsluiten: &ZaakAfsluiten,
        toelichting: Option<&str>,
    ) -> Result<(), ZgwError> {
        let resultaat = self.create_resultaat(&afsluiten.resultaat, None).await?;
        let mut state = self.lock();
        state.explain(toelichting);
        state.zaak_mut(uuid)?.resultaat = Some(resultaat.url);
        let status_uuid = Uuid::new_v4();
        let status = Status {
            url: url("zaken/api/v1/statussen", status_uuid),
            uuid: status_uuid,
            zaak: afsluiten.status.zaak.clone(),
            statustype: afsluiten.status.statustype.clone(),
            datum_status_gezet: afsluiten.status.datum_status_gezet,
            statustoelichting: afsluiten.status.statustoelichting.clone(),
        };
        state.apply_status(&status)
    }

    async fn read_status(&self, url: &str) -> Result<Status, ZgwError> {
        self.lock()
            .statussen
            .iter()
            .find(|status| status.url == url)
            .cloned()
            .ok_or_else(|| not_found(ZgwService::Zrc, url))
    }

    async fn create_status(&self, status: &NewStatus, toelichting: Option<&str>) -> Result<Status, ZgwError> {
        let mut state = self.lock();
        state.explain(toelichting);
        let uuid = Uuid::new_v4();
        let created = Status {
            url: url("zaken/api/v1/statussen", uuid),
            uuid,
            zaak: status.zaak.clone(),
            statustype: status.statustype.clone(),
            datum_status_gezet: status.datum_status_gezet,
            statustoelichting: status.statustoelichting.clone(),
        };
        state.apply_status(&created)?;
        Ok(created)
    }

    async fn read_resultaat(&self, url: &str) -> Result<Resultaat, ZgwError> {
        self.lock()
            .resultaten
            .iter()
            .find(|resultaat| resultaat.url == url)
            .cloned()
            .ok_or_else(|| not_found(ZgwService::Zrc, url))
    }

    async fn create_resultaat(
        &self,
        resultaat: &NewResultaat,
        toelichting: Option<&str>,
    ) -> Result<Resultaat, ZgwError> {
        let mut state = self.lock();
        state.explain(toelichting);
        let uuid = Uuid::new_v4();
        let created = Resultaat {
            url: url("zaken/api/v1/resultaten", uuid),
            uuid,
            zaak: resultaat.zaak.clone(),
            resultaattype: resultaat.resultaattype.clone(),
            toelichting: resultaat.toelichting.clone(),
        };
        let zaak_uuid = crate::zgw::extract_uuid(&resultaat.zaak)?;
        state.zaak_mut(zaak_uuid)?.resultaat = Some(created.url.clone());
        state.resultaten.push(created.clone());
        Ok(created)
    }

    async fn delete_resultaat(&self, uuid: Uuid, toelichting: Option<&str>) -> Result<(), ZgwError> {
        let mut state = self.lock();
        state.explain(toelichting);
        let Some(position) = state.resultaten.iter().position(|resultaat| resultaat.uuid == uuid) else {
            return Err(not_found(ZgwService::Zrc, format!("resultaat {uuid}")));
        };
        let removed = state.resultaten.remove(position);
        for zaak in state.zaken.values_mut() {
            if zaak.resultaat.as_deref() == Some(removed.url.as_str()) {
                zaak.resultaat = None;
            }
        }
        Ok(())
    }

    async fn list_rollen(&self, zaak_url: &str) -> Result<Vec<Rol>, ZgwError> {
        Ok(self
            .lock()
            .rollen
            .iter()
            .filter(|rol| rol.zaak == zaak_url)
            .cloned()
            .collect())
    }

    async fn create_rol(&self, rol: &NewRol, toelichting: Option<&str>) -> Result<Rol, ZgwError> {
        let mut state = self.lock();
        state.explain(toelichting);
        let roltype = state
            .roltypen
            .iter()
            .find(|roltype| roltype.url == rol.roltype)
            .cloned()
            .ok_or_else(|| not_found(ZgwService::Ztc, rol.roltype.clone()))?;
        let uuid = Uuid::new_v4();
        let created = Rol {
            url: url("zaken/api/v1/rollen", uuid),
            uuid,
            zaak: rol.zaak.clone(),
            roltype: rol.roltype.clone(),
            omschrijving: Some(roltype.omschrijving),
            omschrijving_generiek: Some(roltype.omschrijving_generiek.code().to_string()),
            roltoelichting: Some(rol.roltoelichting.clone()),
            betrokkene_type: rol.betrokkene_type,
            betrokkene_identificatie: rol.betrokkene_identificatie.clone(),
        };
        state.rollen.push(created.clone());
        Ok(created)
    }

    async fn delete_rol(&self, uuid: Uuid, toelichting: Option<&str>) -> Result<(), ZgwError> {
        let mut state = self.lock();
        state.explain(toelichting);
        let before = state.rollen.len();
        state.rollen.retain(|rol| rol.uuid != uuid);
        if state.rollen.len() == before {
            return Err(not_found(ZgwService::Zrc, format!("rol {uuid}")));
        }
        Ok(())
    }

    async fn list_zaakeigenschappen(&self, zaak_uuid: Uuid) -> Result<Vec<ZaakEigenschap>, ZgwError> {
        Ok(self.zaakeigenschappen(zaak_uuid))
    }

    async fn create_zaakeigenschap(
        &self,
        zaak_uuid: Uuid,
        eigenschap: &NewZaakEigenschap,
    ) -> Result<ZaakEigenschap, ZgwError> {
        let mut state = self.lock();
        let naam = state
            .eigenschappen
            .iter()
            .find(|candidate| candidate.url == eigenschap.eigenschap)
            .map(|candidate| candidate.naam.clone())
            .unwrap_or_default();
        let uuid = Uuid::new_v4();
        let created = ZaakEigenschap {
            url: format!("{}/zaakeigenschappen/{uuid}", zaak_url(zaak_uuid)),
            uuid,
            zaak: eigenschap.zaak.clone(),
            eigenschap: eigenschap.eigenschap.clone(),
            naam,
            waarde: eigenschap.waarde.clone(),
        };
        state.zaakeigenschappen.push(created.clone());
        Ok(created)
    }

    async fn update_zaakeigenschap(
        &self,
        _zaak_uuid: Uuid,
        eigenschap: &ZaakEigenschap,
    ) -> Result<ZaakEigenschap, ZgwError> {
        let mut state = self.lock();
        let stored = state
            .zaakeigenschappen
            .iter_mut()
            .find(|candidate| candidate.uuid == eigenschap.uuid)
            .ok_or_else(|| not_found(ZgwService::Zrc, eigenschap.url.clone()))?;
        *stored = eigenschap.clone();
        Ok(eigenschap.clone())
    }

    async fn list_zaakinformatieobjecten(
        &self,
        zaak_url: Option<&str>,
        informatieobject_url: Option<&str>,
    ) -> Result<Vec<ZaakInformatieobject>, ZgwError> {
        Ok(self
            .lock()
            .zaakinformatieobjecten
            .iter()
            .filter(|link| zaak_url.map_or(true, |url| link.zaak == url))
            .filter(|link| informatieobject_url.map_or(true, |url| link.informatieobject == url))
            .cloned()
            .collect())
    }

    async fn create_zaakinformatieobject(
        &self,
        link: &NewZaakInformatieobject,
        toelichting: Option<&str>,
    ) -> Result<ZaakInformatieobject, ZgwError> {
        let mut state = self.lock();
        state.explain(toelichting);
        let uuid = Uuid::new_v4();
        let created = ZaakInformatieobject {
            url: url("zaken/api/v1/zaakinformatieobjecten", uuid),
            uuid,
            zaak: link.zaak.clone(),
            informatieobject: link.informatieobject.clone(),
            titel: Some(link.titel.clone()),
            beschrijving: link.beschrijving.clone(),
            registratiedatum: Some(Utc::now()),
        };
        state.zaakinformatieobjecten.push(created.clone());
        Ok(created)
    }

    async fn delete_zaakinformatieobject(
        &self,
        uuid: Uuid,
        toelichting: Option<&str>,
    ) -> Result<(), ZgwError> {
        let mut state = self.lock();
        state.explain(toelichting);
        state.zaakinformatieobjecten.retain(|link| link.uuid != uuid);
        Ok(())
    }

    async fn list_zaakobjecten(&self, zaak_url: &str) -> Result<Vec<Zaakobject>, ZgwError> {
        Ok(self
            .lock()
            .zaakobjecten
            .iter()
            .filter(|zaakobject| zaakobject.zaak == zaak_url)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ZtcClient for InMemoryZgw {
    async fn read_zaaktype(&self, url: &str) -> Result<ZaakType, ZgwError> {
        self.lock()
            .zaaktypen
            .iter()
            .find(|zaaktype| zaaktype.url == url)
            .cloned()
            .ok_or_else(|| not_found(ZgwService::Ztc, url))
    }

    async fn read_statustype(&self, url: &str) -> Result<StatusType, ZgwError> {
        self.lock()
            .statustypen
            .iter()
            .find(|statustype| statustype.url == url)
            .cloned()
            .ok_or_else(|| not_found(ZgwService::Ztc, url))
    }

    async fn read_statustypen(&self, zaaktype_url: &str) -> Result<Vec<StatusType>, ZgwError> {
        Ok(self
            .lock()
            .statustypen
            .iter()
            .filter(|statustype| statustype.zaaktype == zaaktype_url)
            .cloned()
            .collect())
    }

    async fn read_resultaattype(&self, url: &str) -> Result<ResultaatType, ZgwError> {
        self.lock()
            .resultaattypen
            .iter()
            .find(|resultaattype| resultaattype.url == url)
            .cloned()
            .ok_or_else(|| not_found(ZgwService::Ztc, url))
    }

    async fn read_resultaattype_by_uuid(&self, uuid: Uuid) -> Result<ResultaatType, ZgwError> {
        self.read_resultaattype(&resultaattype_url(uuid)).await
    }

    async fn read_resultaattypen(&self, zaaktype_url: &str) -> Result<Vec<ResultaatType>, ZgwError> {
        Ok(self
            .lock()
            .resultaattypen
            .iter()
            .filter(|resultaattype| resultaattype.zaaktype == zaaktype_url)
            .cloned()
            .collect())
    }

    async fn find_roltypen(
        &self,
        zaaktype_url: &str,
        generiek: OmschrijvingGeneriek,
    ) -> Result<Vec<RolType>, ZgwError> {
        Ok(self
            .lock()
            .roltypen
            .iter()
            .filter(|roltype| {
                roltype.zaaktype == zaaktype_url && roltype.omschrijving_generiek == generiek
            })
            .cloned()
            .collect())
    }

    async fn read_roltype(&self, url: &str) -> Result<RolType, ZgwError> {
        self.lock()
            .roltypen
            .iter()
            .find(|roltype| roltype.url == url)
            .cloned()
            .ok_or_else(|| not_found(ZgwService::Ztc, url))
    }

    async fn read_besluittype(&self, url: &str) -> Result<BesluitType, ZgwError> {
        self.lock()
            .besluittypen
            .iter()
            .find(|besluittype| besluittype.url == url)
            .cloned()
            .ok_or_else(|| not_found(ZgwService::Ztc, url))
    }

    async fn read_informatieobjecttype(&self, url: &str) -> Result<InformatieobjectType, ZgwError> {
        self.lock()
            .informatieobjecttypen
            .iter()
            .find(|informatieobjecttype| informatieobjecttype.url == url)
            .cloned()
            .ok_or_else(|| not_found(ZgwService::Ztc, url))
    }

    async fn read_eigenschap(&self, zaaktype_url: &str, naam: &str) -> Result<Eigenschap, ZgwError> {
        self.lock()
            .eigenschappen
            .iter()
            .find(|eigenschap| eigenschap.zaaktype == zaaktype_url && eigenschap.naam == naam)
            .cloned()
            .ok_or_else(|| not_found(ZgwService::Ztc, format!("eigenschap {naam}")))
    }
}

#[async_trait]
impl DrcClient for InMemoryZgw {
    async fn read_enkelvoudig_informatieobject(
        &self,
        uuid: Uuid,
    ) -> Result<EnkelvoudigInformatieobject, ZgwError> {
        self.lock()
            .documenten
            .get(&uuid)
            .cloned()
            .ok_or_else(|| not_found(ZgwService::Drc, format!("document {uuid}")))
    }

    async fn read_enkelvoudig_informatieobject_by_url(
        &self,
        url: &str,
    ) -> Result<EnkelvoudigInformatieobject, ZgwError> {
        self.read_enkelvoudig_informatieobject(crate::zgw::extract_uuid(url)?)
            .await
    }

    async fn list_enkelvoudig_informatieobjecten(
        &self,
        page_number: u32,
    ) -> Result<Page<EnkelvoudigInformatieobject>, ZgwError> {
        let documenten: Vec<EnkelvoudigInformatieobject> =
            self.lock().documenten.values().cloned().collect();
        Ok(page(&documenten, page_number))
    }

    async fn create_enkelvoudig_informatieobject(
        &self,
        document: &NewEnkelvoudigInformatieobject,
    ) -> Result<EnkelvoudigInformatieobject, ZgwError> {
        let mut created = sample_document(&document.titel);
        created.creatiedatum = document.creatiedatum;
        created.auteur = document.auteur.clone();
        created.status = document.status;
        created.formaat = document.formaat.clone();
        created.bestandsnaam = document.bestandsnaam.clone();
        created.beschrijving = document.beschrijving.clone();
        created.informatieobjecttype = document.informatieobjecttype.clone();
        created.vertrouwelijkheidaanduiding = document.vertrouwelijkheidaanduiding;
        Ok(self.insert_document(created))
    }

    async fn patch_enkelvoudig_informatieobject(
        &self,
        uuid: Uuid,
        patch: &InformatieobjectPatch,
        toelichting: Option<&str>,
    ) -> Result<EnkelvoudigInformatieobject, ZgwError> {
        let mut state = self.lock();
        state.explain(toelichting);
        state.document_patches.push((uuid, patch.clone()));
        let document = state
            .documenten
            .get_mut(&uuid)
            .ok_or_else(|| not_found(ZgwService::Drc, format!("document {uuid}")))?;
        if let Some(verzenddatum) = patch.verzenddatum {
            document.verzenddatum = Some(verzenddatum);
        }
        if let Some(ondertekening) = &patch.ondertekening {
            document.ondertekening = Some(ondertekening.clone());
        }
        if let Some(status) = patch.status {
            document.status = Some(status);
        }
        Ok(document.clone())
    }

    async fn delete_enkelvoudig_informatieobject(&self, uuid: Uuid) -> Result<(), ZgwError> {
        let mut state = self.lock();
        state.documenten.remove(&uuid);
        state.deleted_documents.push(uuid);
        Ok(())
    }

    async fn create_gebruiksrechten(
        &self,
        gebruiksrechten: &Gebruiksrechten,
    ) -> Result<Gebruiksrechten, ZgwError> {
        self.lock().gebruiksrechten.push(gebruiksrechten.clone());
        Ok(gebruiksrechten.clone())
    }
}

#[async_trait]
impl BrcClient for InMemoryZgw {
    async fn read_besluit(&self, uuid: Uuid) -> Result<Besluit, ZgwError> {
        self.lock()
            .besluiten
            .get(&uuid)
            .cloned()
            .ok_or_else(|| not_found(ZgwService::Brc, format!("besluit {uuid}")))
    }

    async fn list_besluiten(&self, zaak_url: &str) -> Result<Vec<Besluit>, ZgwError> {
        Ok(self
            .lock()
            .besluiten
            .values()
            .filter(|besluit| besluit.zaak.as_deref() == Some(zaak_url))
            .cloned()
            .collect())
    }

    async fn create_besluit(&self, besluit: &NewBesluit) -> Result<Besluit, ZgwError> {
        let uuid = Uuid::new_v4();
        let created = Besluit {
            url: url("besluiten/api/v1/besluiten", uuid),
            identificatie: format!("BESLUIT-{}", &uuid.simple().to_string()[..8]),
            verantwoordelijke_organisatie: besluit.verantwoordelijke_organisatie.clone(),
            besluittype: besluit.besluittype.clone(),
            zaak: Some(besluit.zaak.clone()),
            datum: besluit.datum,
            toelichting: besluit.toelichting.clone(),
            ingangsdatum: besluit.ingangsdatum,
            vervaldatum: besluit.vervaldatum,
            vervalreden: besluit.vervalreden,
            publicatiedatum: besluit.publicatiedatum,
            verzenddatum: None,
            uiterlijke_reactiedatum: besluit.uiterlijke_reactiedatum,
        };
        self.lock().besluiten.insert(uuid, created.clone());
        Ok(created)
    }

    async fn update_besluit(&self, besluit: &Besluit, toelichting: Option<&str>) -> Result<Besluit, ZgwError> {
        let uuid = besluit.uuid()?;
        let mut state = self.lock();
        state.explain(toelichting);
        let stored = state
            .besluiten
            .get_mut(&uuid)
            .ok_or_else(|| not_found(ZgwService::Brc, besluit.url.clone()))?;
        *stored = besluit.clone();
        Ok(besluit.clone())
    }

    async fn list_besluitinformatieobjecten(
        &self,
        besluit_url: &str,
    ) -> Result<Vec<BesluitInformatieobject>, ZgwError> {
        Ok(self
            .lock()
            .besluitinformatieobjecten
            .iter()
            .filter(|link| link.besluit == besluit_url)
            .cloned()
            .collect())
    }

    async fn create_besluitinformatieobject(
        &self,
        link: &NewBesluitInformatieobject,
        toelichting: Option<&str>,
    ) -> Result<BesluitInformatieobject, ZgwError> {
        let mut state = self.lock();
        state.explain(toelichting);
        let created = BesluitInformatieobject {
            url: url("besluiten/api/v1/besluitinformatieobjecten", Uuid::new_v4()),
            informatieobject: link.informatieobject.clone(),
            besluit: link.besluit.clone(),
        };
        state.besluitinformatieobjecten.push(created.clone());
        Ok(created)
    }

    async fn delete_besluitinformatieobject(
        &self,
        uuid: Uuid,
        toelichting: Option<&str>,
    ) -> Result<(), ZgwError> {
        let mut state = self.lock();
        state.explain(toelichting);
        state
            .besluitinformatieobjecten
            .retain(|link| !link.url.ends_with(&uuid.to_string()));
        Ok(())
    }

    async fn is_informatieobject_gekoppeld_aan_besluit(
        &self,
        informatieobject_url: &str,
    ) -> Result<bool, ZgwError> {
        Ok(self
            .lock()
            .besluitinformatieobjecten
            .iter()
            .any(|link| link.informatieobject == informatieobject_url))
    }
}

#[async_trait]
impl DocumentLockService for InMemoryZgw {
    async fn find_lock(&self, document_uuid: Uuid) -> Result<Option<DocumentLock>, DocumentLockError> {
        Ok(self.lock().locks.get(&document_uuid).cloned())
    }
}

/// Answers every rule with a fixed decision and remembers the last input.
pub struct FakePolicyEvaluator {
    decision: Option<Value>,
    calls: Mutex<Vec<(PolicyRule, Value)>>,
}

impl FakePolicyEvaluator {
    pub fn allow_all() -> Self {
        let mut granted = Map::new();
        for rechten in [
            serde_json::to_value(ZaakRechten::granted()),
            serde_json::to_value(DocumentRechten::granted()),
            serde_json::to_value(TaakRechten::granted()),
            serde_json::to_value(OverigeRechten::granted()),
            serde_json::to_value(WerklijstRechten::granted()),
        ] {
            if let Ok(Value::Object(fields)) = rechten {
                granted.extend(fields);
            }
        }
        Self::deciding(Some(Value::Object(granted)))
    }

    pub fn deny_all() -> Self {
        Self::deciding(Some(Value::Object(Map::new())))
    }

    pub fn undecided() -> Self {
        Self::deciding(None)
    }

    pub fn deciding(decision: Option<Value>) -> Self {
        Self {
            decision,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn last_call(&self) -> Option<(PolicyRule, Value)> {
        self.calls
            .lock()
            .expect("policy mutex poisoned")
            .last()
            .cloned()
    }
}

#[async_trait]
impl PolicyEvaluator for FakePolicyEvaluator {
    async fn evaluate(&self, rule: PolicyRule, input: Value) -> Result<Option<Value>, PolicyError> {
        self.calls
            .lock()
            .expect("policy mutex poisoned")
            .push((rule, input));
        Ok(self.decision.clone())
    }
}

#[derive(Default)]
pub struct InMemoryTasks {
    tasks: Mutex<Vec<Task>>,
}

impl InMemoryTasks {
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks: Mutex::new(tasks),
        }
    }

    pub fn task(&self, id: &str) -> Task {
        self.tasks
            .lock()
            .expect("tasks mutex poisoned")
            .iter()
            .find(|task| task.id == id)
            .cloned()
            .expect("task stored")
    }
}

#[async_trait]
impl TaskService for InMemoryTasks {
    async fn list_open_tasks_for_zaak(&self, zaak_uuid: Uuid) -> Result<Vec<Task>, WorkflowError> {
        Ok(self
            .tasks
            .lock()
            .expect("tasks mutex poisoned")
            .iter()
            .filter(|task| task.zaak_uuid == zaak_uuid && task.completed.is_none())
            .cloned()
            .collect())
    }

    async fn count_open_tasks_for_zaak(&self, zaak_uuid: Uuid) -> Result<usize, WorkflowError> {
        Ok(self.list_open_tasks_for_zaak(zaak_uuid).await?.len())
    }

    async fn read_task(&self, task_id: &str) -> Result<Task, WorkflowError> {
        self.tasks
            .lock()
            .expect("tasks mutex poisoned")
            .iter()
            .find(|task| task.id == task_id)
            .cloned()
            .ok_or_else(|| WorkflowError::TaskNotFound(task_id.to_string()))
    }

    async fn update_task(&self, task: Task) -> Result<Task, WorkflowError> {
        let mut tasks = self.tasks.lock().expect("tasks mutex poisoned");
        let stored = tasks
            .iter_mut()
            .find(|stored| stored.id == task.id)
            .ok_or_else(|| WorkflowError::TaskNotFound(task.id.clone()))?;
        *stored = task.clone();
        Ok(task)
    }

    async fn set_task_data(&self, task_id: &str, data: Map<String, Value>) -> Result<(), WorkflowError> {
        let mut tasks = self.tasks.lock().expect("tasks mutex poisoned");
        let task = tasks
            .iter_mut()
            .find(|task| task.id == task_id)
            .ok_or_else(|| WorkflowError::TaskNotFound(task_id.to_string()))?;
        task.task_data = data;
        Ok(())
    }

    async fn set_task_information(
        &self,
        task_id: &str,
        information: Map<String, Value>,
    ) -> Result<(), WorkflowError> {
        let mut tasks = self.tasks.lock().expect("tasks mutex poisoned");
        let task = tasks
            .iter_mut()
            .find(|task| task.id == task_id)
            .ok_or_else(|| WorkflowError::TaskNotFound(task_id.to_string()))?;
        task.task_information = information;
        Ok(())
    }

    async fn list_open_tasks(&self, first: usize, max: usize) -> Result<Vec<Task>, WorkflowError> {
        let mut open: Vec<Task> = self
            .tasks
            .lock()
            .expect("tasks mutex poisoned")
            .iter()
            .filter(|task| task.completed.is_none())
            .cloned()
            .collect();
        open.sort_by_key(|task| task.created);
        Ok(open.into_iter().skip(first).take(max).collect())
    }

    async fn count_open_tasks(&self) -> Result<usize, WorkflowError> {
        Ok(self.list_open_tasks(0, usize::MAX).await?.len())
    }
}

#[derive(Debug, Clone, Default)]
struct Variabelen {
    datumtijd_opgeschort: Option<DateTime<Utc>>,
    verwachte_dagen_opgeschort: Option<i64>,
    zaakdata: Map<String, Value>,
}

#[derive(Default)]
pub struct InMemoryZaakVariabelen {
    variabelen: Mutex<HashMap<Uuid, Variabelen>>,
}

impl InMemoryZaakVariabelen {
    fn with<R>(&self, zaak_uuid: Uuid, apply: impl FnOnce(&mut Variabelen) -> R) -> R {
        let mut variabelen = self.variabelen.lock().expect("variabelen mutex poisoned");
        apply(variabelen.entry(zaak_uuid).or_default())
    }
}

#[async_trait]
impl ZaakVariabelenService for InMemoryZaakVariabelen {
    async fn read_datumtijd_opgeschort(&self, zaak_uuid: Uuid) -> Result<Option<DateTime<Utc>>, WorkflowError> {
        Ok(self.with(zaak_uuid, |variabelen| variabelen.datumtijd_opgeschort))
    }

    async fn set_datumtijd_opgeschort(
        &self,
        zaak_uuid: Uuid,
        datumtijd: DateTime<Utc>,
    ) -> Result<(), WorkflowError> {
        self.with(zaak_uuid, |variabelen| variabelen.datumtijd_opgeschort = Some(datumtijd));
        Ok(())
    }

    async fn remove_datumtijd_opgeschort(&self, zaak_uuid: Uuid) -> Result<(), WorkflowError> {
        self.with(zaak_uuid, |variabelen| variabelen.datumtijd_opgeschort = None);
        Ok(())
    }

    async fn read_verwachte_dagen_opgeschort(&self, zaak_uuid: Uuid) -> Result<Option<i64>, WorkflowError> {
        Ok(self.with(zaak_uuid, |variabelen| variabelen.verwachte_dagen_opgeschort))
    }

    async fn set_verwachte_dagen_opgeschort(&self, zaak_uuid: Uuid, dagen: i64) -> Result<(), WorkflowError> {
        self.with(zaak_uuid, |variabelen| variabelen.verwachte_dagen_opgeschort = Some(dagen));
        Ok(())
    }

    async fn remove_verwachte_dagen_opgeschort(&self, zaak_uuid: Uuid) -> Result<(), WorkflowError> {
        self.with(zaak_uuid, |variabelen| variabelen.verwachte_dagen_opgeschort = None);
        Ok(())
    }

    async fn read_zaakdata(&self, zaak_uuid: Uuid) -> Result<Map<String, Value>, WorkflowError> {
        Ok(self.with(zaak_uuid, |variabelen| variabelen.zaakdata.clone()))
    }

    async fn set_zaakdata(&self, zaak_uuid: Uuid, zaakdata: Map<String, Value>) -> Result<(), WorkflowError> {
        self.with(zaak_uuid, |variabelen| variabelen.zaakdata = zaakdata);
        Ok(())
    }
}

/// Users `bwillems` and `jdevries` in group `behandelaars`; `kbakker` in `beheerders`.
pub struct InMemoryIdentity {
    users: Vec<User>,
    groups: Vec<Group>,
    memberships: Vec<(String, String)>,
}

impl Default for InMemoryIdentity {
    fn default() -> Self {
        let user = |id: &str, first: &str, last: &str| User {
            id: id.to_string(),
            first_name: Some(first.to_string()),
            last_name: Some(last.to_string()),
            email: Some(format!("{id}@example.org")),
        };
        let group = |id: &str, name: &str| Group {
            id: id.to_string(),
            name: name.to_string(),
            email: None,
        };
        Self {
            users: vec![
                user("bwillems", "Bas", "Willems"),
                user("jdevries", "Jan", "de Vries"),
                user("kbakker", "Kim", "Bakker"),
            ],
            groups: vec![
                group("behandelaars", "Behandelaars"),
                group("beheerders", "Beheerders"),
            ],
            memberships: vec![
                ("bwillems".to_string(), "behandelaars".to_string()),
                ("jdevries".to_string(), "behandelaars".to_string()),
                ("kbakker".to_string(), "beheerders".to_string()),
            ],
        }
    }
}

#[async_trait]
impl IdentityService for InMemoryIdentity {
    async fn read_user(&self, id: &str) -> Result<User, IdentityError> {
        Ok(self
            .users
            .iter()
            .find(|user| user.id == id)
            .cloned()
            .unwrap_or_else(|| User::unknown(id)))
    }

    async fn read_group(&self, id: &str) -> Result<Group, IdentityError> {
        Ok(self
            .groups
            .iter()
            .find(|group| group.id == id)
            .cloned()
            .unwrap_or_else(|| Group::unknown(id)))
    }

    async fn list_users(&self) -> Result<Vec<User>, IdentityError> {
        Ok(self.users.clone())
    }

    async fn list_groups(&self) -> Result<Vec<Group>, IdentityError> {
        Ok(self.groups.clone())
    }

    async fn list_users_in_group(&self, group_id: &str) -> Result<Vec<User>, IdentityError> {
        Ok(self
            .memberships
            .iter()
            .filter(|(_, group)| group == group_id)
            .filter_map(|(user, _)| self.users.iter().find(|candidate| &candidate.id == user))
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct InMemoryReferenceTables {
    tables: Mutex<Vec<ReferenceTable>>,
}

impl InMemoryReferenceTables {
    pub fn with_tables(tables: Vec<ReferenceTable>) -> Self {
        Self {
            tables: Mutex::new(tables),
        }
    }
}

#[async_trait]
impl ReferenceTableService for InMemoryReferenceTables {
    async fn list(&self) -> Result<Vec<ReferenceTable>, ReferenceTableError> {
        Ok(self.tables.lock().expect("tables mutex poisoned").clone())
    }

    async fn read_by_code(&self, code: &str) -> Result<ReferenceTable, ReferenceTableError> {
        self.tables
            .lock()
            .expect("tables mutex poisoned")
            .iter()
            .find(|table| table.code == code)
            .cloned()
            .ok_or_else(|| ReferenceTableError::NotFound(code.to_string()))
    }

    async fn create(&self, table: ReferenceTable) -> Result<ReferenceTable, ReferenceTableError> {
        let mut tables = self.tables.lock().expect("tables mutex poisoned");
        if tables.iter().any(|existing| existing.code == table.code) {
            return Err(ReferenceTableError::Conflict(table.code));
        }
        tables.push(table.clone());
        Ok(table)
    }

    async fn update(&self, table: ReferenceTable) -> Result<ReferenceTable, ReferenceTableError> {
        let mut tables = self.tables.lock().expect("tables mutex poisoned");
        let stored = tables
            .iter_mut()
            .find(|existing| existing.id == table.id)
            .ok_or_else(|| ReferenceTableError::NotFound(table.code.clone()))?;
        *stored = table.clone();
        Ok(table)
    }

    async fn delete(&self, id: i64) -> Result<(), ReferenceTableError> {
        let mut tables = self.tables.lock().expect("tables mutex poisoned");
        let position = tables
            .iter()
            .position(|table| table.id == id)
            .ok_or_else(|| ReferenceTableError::NotFound(id.to_string()))?;
        if tables[position].systeem {
            return Err(ReferenceTableError::SystemTable(tables[position].code.clone()));
        }
        tables.remove(position);
        Ok(())
    }
}

/// Records what would have been sent to the search index.
#[derive(Default)]
pub struct RecordingSearchIndex {
    pub added: Mutex<Vec<ZoekObject>>,
    pub deleted_ids: Mutex<Vec<String>>,
    /// Documents reported as already indexed before a reindex.
    pub indexed: Mutex<Vec<(ZoekObjectType, String)>>,
    pub commits: Mutex<usize>,
}

impl RecordingSearchIndex {
    pub fn added_ids(&self) -> Vec<String> {
        self.added
            .lock()
            .expect("index mutex poisoned")
            .iter()
            .map(|object| object.id().to_string())
            .collect()
    }

    pub fn commit_count(&self) -> usize {
        *self.commits.lock().expect("index mutex poisoned")
    }
}

#[async_trait]
impl SearchIndex for RecordingSearchIndex {
    async fn list_ids(&self, object_type: ZoekObjectType) -> Result<Vec<String>, SearchError> {
        Ok(self
            .indexed
            .lock()
            .expect("index mutex poisoned")
            .iter()
            .filter(|(indexed_type, _)| *indexed_type == object_type)
            .map(|(_, id)| id.clone())
            .collect())
    }

    async fn add(&self, objects: &[ZoekObject]) -> Result<(), SearchError> {
        self.added
            .lock()
            .expect("index mutex poisoned")
            .extend_from_slice(objects);
        Ok(())
    }

    async fn delete_by_ids(&self, ids: &[String]) -> Result<(), SearchError> {
        self.deleted_ids
            .lock()
            .expect("index mutex poisoned")
            .extend_from_slice(ids);
        Ok(())
    }

    async fn commit(&self) -> Result<(), SearchError> {
        *self.commits.lock().expect("index mutex poisoned") += 1;
        Ok(())
    }
}
