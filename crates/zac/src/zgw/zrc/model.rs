use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::zgw::period::IsoPeriod;
use crate::zgw::shared::{extract_uuid, ZgwError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Vertrouwelijkheidaanduiding {
    Openbaar,
    BeperktOpenbaar,
    Intern,
    Zaakvertrouwelijk,
    Vertrouwelijk,
    Confidentieel,
    Geheim,
    ZeerGeheim,
}

impl Vertrouwelijkheidaanduiding {
    pub fn code(self) -> &'static str {
        match self {
            Self::Openbaar => "OPENBAAR",
            Self::BeperktOpenbaar => "BEPERKT_OPENBAAR",
            Self::Intern => "INTERN",
            Self::Zaakvertrouwelijk => "ZAAKVERTROUWELIJK",
            Self::Vertrouwelijk => "VERTROUWELIJK",
            Self::Confidentieel => "CONFIDENTIEEL",
            Self::Geheim => "GEHEIM",
            Self::ZeerGeheim => "ZEER_GEHEIM",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Archiefnominatie {
    BlijvendBewaren,
    Vernietigen,
}

impl Archiefnominatie {
    pub fn code(self) -> &'static str {
        match self {
            Self::BlijvendBewaren => "BLIJVEND_BEWAREN",
            Self::Vernietigen => "VERNIETIGEN",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opschorting {
    pub indicatie: bool,
    #[serde(default)]
    pub reden: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verlenging {
    #[serde(default)]
    pub reden: String,
    #[serde(default)]
    pub duur: Option<IsoPeriod>,
}

/// A case as returned by the zaken API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Zaak {
    pub url: String,
    pub uuid: Uuid,
    pub identificatie: String,
    pub bronorganisatie: String,
    pub verantwoordelijke_organisatie: String,
    pub zaaktype: String,
    #[serde(default)]
    pub omschrijving: Option<String>,
    #[serde(default)]
    pub toelichting: Option<String>,
    pub registratiedatum: NaiveDate,
    pub startdatum: NaiveDate,
    #[serde(default)]
    pub einddatum: Option<NaiveDate>,
    #[serde(default)]
    pub einddatum_gepland: Option<NaiveDate>,
    #[serde(default)]
    pub uiterlijke_einddatum_afdoening: Option<NaiveDate>,
    #[serde(default)]
    pub publicatiedatum: Option<NaiveDate>,
    #[serde(default)]
    pub communicatiekanaal_naam: Option<String>,
    pub vertrouwelijkheidaanduiding: Vertrouwelijkheidaanduiding,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub resultaat: Option<String>,
    #[serde(default)]
    pub archiefnominatie: Option<Archiefnominatie>,
    #[serde(default)]
    pub archiefactiedatum: Option<NaiveDate>,
    #[serde(default)]
    pub opschorting: Option<Opschorting>,
    #[serde(default)]
    pub verlenging: Option<Verlenging>,
    #[serde(default)]
    pub hoofdzaak: Option<String>,
    #[serde(default)]
    pub deelzaken: Vec<String>,
}

impl Zaak {
    /// A zaak stays open until the zaken API assigns an archiefnominatie on closure.
    pub fn is_open(&self) -> bool {
        self.archiefnominatie.is_none()
    }

    pub fn is_opgeschort(&self) -> bool {
        self.opschorting
            .as_ref()
            .map(|opschorting| opschorting.indicatie)
            .unwrap_or(false)
    }

    pub fn is_verlengd(&self) -> bool {
        self.verlenging
            .as_ref()
            .map(|verlenging| verlenging.duur.is_some())
            .unwrap_or(false)
    }

    pub fn is_deelzaak(&self) -> bool {
        self.hoofdzaak.is_some()
    }

    pub fn is_hoofdzaak(&self) -> bool {
        !self.deelzaken.is_empty()
    }

    pub fn opschorting_reden(&self) -> Option<&str> {
        self.opschorting
            .as_ref()
            .map(|opschorting| opschorting.reden.as_str())
            .filter(|reden| !reden.is_empty())
    }
}

/// Payload for creating a zaak; the zaken API assigns url, uuid and identificatie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZaakCreate {
    pub bronorganisatie: String,
    pub verantwoordelijke_organisatie: String,
    pub zaaktype: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub omschrijving: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub toelichting: Option<String>,
    pub registratiedatum: NaiveDate,
    pub startdatum: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub einddatum_gepland: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uiterlijke_einddatum_afdoening: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub communicatiekanaal_naam: Option<String>,
    pub vertrouwelijkheidaanduiding: Vertrouwelijkheidaanduiding,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hoofdzaak: Option<String>,
}

/// Partial update; only populated fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZaakPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub omschrijving: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub toelichting: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub startdatum: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub einddatum_gepland: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uiterlijke_einddatum_afdoening: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertrouwelijkheidaanduiding: Option<Vertrouwelijkheidaanduiding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archiefactiedatum: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opschorting: Option<Opschorting>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verlenging: Option<Verlenging>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    pub url: String,
    pub uuid: Uuid,
    pub zaak: String,
    pub statustype: String,
    pub datum_status_gezet: DateTime<Utc>,
    #[serde(default)]
    pub statustoelichting: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStatus {
    pub zaak: String,
    pub statustype: String,
    pub datum_status_gezet: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statustoelichting: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resultaat {
    pub url: String,
    pub uuid: Uuid,
    pub zaak: String,
    pub resultaattype: String,
    #[serde(default)]
    pub toelichting: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewResultaat {
    pub zaak: String,
    pub resultaattype: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub toelichting: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BetrokkeneType {
    NatuurlijkPersoon,
    NietNatuurlijkPersoon,
    Vestiging,
    OrganisatorischeEenheid,
    Medewerker,
}

impl BetrokkeneType {
    pub fn code(self) -> &'static str {
        match self {
            Self::NatuurlijkPersoon => "natuurlijk_persoon",
            Self::NietNatuurlijkPersoon => "niet_natuurlijk_persoon",
            Self::Vestiging => "vestiging",
            Self::OrganisatorischeEenheid => "organisatorische_eenheid",
            Self::Medewerker => "medewerker",
        }
    }
}

/// Union of the identification fields the zaken API uses per betrokkene type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BetrokkeneIdentificatie {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identificatie: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub naam: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub achternaam: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voorletters: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inp_bsn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inn_nnp_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vestigings_nummer: Option<String>,
}

impl BetrokkeneIdentificatie {
    pub fn medewerker(id: &str, naam: &str) -> Self {
        Self {
            identificatie: Some(id.to_string()),
            achternaam: Some(naam.to_string()),
            ..Self::default()
        }
    }

    pub fn organisatorische_eenheid(id: &str, naam: &str) -> Self {
        Self {
            identificatie: Some(id.to_string()),
            naam: Some(naam.to_string()),
            ..Self::default()
        }
    }

    /// Identification of a betrokkene entered by hand (BSN, KvK/RSIN or vestiging).
    pub fn for_type(betrokkene_type: BetrokkeneType, id: &str) -> Self {
        match betrokkene_type {
            BetrokkeneType::NatuurlijkPersoon => Self {
                inp_bsn: Some(id.to_string()),
                ..Self::default()
            },
            BetrokkeneType::NietNatuurlijkPersoon => Self {
                inn_nnp_id: Some(id.to_string()),
                ..Self::default()
            },
            BetrokkeneType::Vestiging => Self {
                vestigings_nummer: Some(id.to_string()),
                ..Self::default()
            },
            BetrokkeneType::OrganisatorischeEenheid | BetrokkeneType::Medewerker => Self {
                identificatie: Some(id.to_string()),
                ..Self::default()
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rol {
    pub url: String,
    pub uuid: Uuid,
    pub zaak: String,
    pub roltype: String,
    #[serde(default)]
    pub omschrijving: Option<String>,
    #[serde(default)]
    pub omschrijving_generiek: Option<String>,
    #[serde(default)]
    pub roltoelichting: Option<String>,
    pub betrokkene_type: BetrokkeneType,
    #[serde(default)]
    pub betrokkene_identificatie: BetrokkeneIdentificatie,
}

impl Rol {
    /// The number identifying the betrokkene, chosen by betrokkene type.
    pub fn identificatienummer(&self) -> Option<&str> {
        identificatienummer(self.betrokkene_type, &self.betrokkene_identificatie)
    }

    pub fn naam(&self) -> Option<&str> {
        let identificatie = &self.betrokkene_identificatie;
        identificatie
            .naam
            .as_deref()
            .or(identificatie.achternaam.as_deref())
    }
}

fn identificatienummer(
    betrokkene_type: BetrokkeneType,
    identificatie: &BetrokkeneIdentificatie,
) -> Option<&str> {
    match betrokkene_type {
        BetrokkeneType::NatuurlijkPersoon => identificatie.inp_bsn.as_deref(),
        BetrokkeneType::NietNatuurlijkPersoon => identificatie.inn_nnp_id.as_deref(),
        BetrokkeneType::Vestiging => identificatie.vestigings_nummer.as_deref(),
        BetrokkeneType::OrganisatorischeEenheid | BetrokkeneType::Medewerker => {
            identificatie.identificatie.as_deref()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRol {
    pub zaak: String,
    pub roltype: String,
    pub roltoelichting: String,
    pub betrokkene_type: BetrokkeneType,
    pub betrokkene_identificatie: BetrokkeneIdentificatie,
}

impl NewRol {
    pub fn identificatienummer(&self) -> Option<&str> {
        identificatienummer(self.betrokkene_type, &self.betrokkene_identificatie)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZaakEigenschap {
    pub url: String,
    pub uuid: Uuid,
    pub zaak: String,
    pub eigenschap: String,
    #[serde(default)]
    pub naam: String,
    pub waarde: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewZaakEigenschap {
    pub zaak: String,
    pub eigenschap: String,
    pub waarde: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZaakInformatieobject {
    pub url: String,
    pub uuid: Uuid,
    pub zaak: String,
    pub informatieobject: String,
    #[serde(default)]
    pub titel: Option<String>,
    #[serde(default)]
    pub beschrijving: Option<String>,
    #[serde(default)]
    pub registratiedatum: Option<DateTime<Utc>>,
}

impl ZaakInformatieobject {
    pub fn zaak_uuid(&self) -> Result<Uuid, ZgwError> {
        extract_uuid(&self.zaak)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewZaakInformatieobject {
    pub zaak: String,
    pub informatieobject: String,
    pub titel: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beschrijving: Option<String>,
}

const BAG_OBJECT_TYPES: &[&str] = &[
    "adres",
    "buurt",
    "gemeente",
    "kadastrale_onroerende_zaak",
    "ligplaats",
    "openbare_ruimte",
    "pand",
    "standplaats",
    "verblijfsobject",
    "woonplaats",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Zaakobject {
    pub url: String,
    pub uuid: Uuid,
    pub zaak: String,
    #[serde(default)]
    pub object: Option<String>,
    pub object_type: String,
    #[serde(default)]
    pub relatieomschrijving: Option<String>,
}

impl Zaakobject {
    pub fn is_bag_object(&self) -> bool {
        BAG_OBJECT_TYPES.contains(&self.object_type.as_str())
    }

    /// The BAG identification is the last path segment of the object URL.
    pub fn bag_object_id(&self) -> Option<String> {
        if !self.is_bag_object() {
            return None;
        }
        self.object
            .as_deref()
            .and_then(|object| object.trim_end_matches('/').rsplit('/').next())
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
    }
}

/// Body of the zaken API close operation: sets the resultaat and end status atomically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZaakAfsluiten {
    pub zaak: ZaakPatch,
    pub resultaat: NewResultaat,
    pub status: NewStatus,
}
