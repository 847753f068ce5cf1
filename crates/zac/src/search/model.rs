use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ZoekObjectType {
    Zaak,
    Document,
    Taak,
}

impl ZoekObjectType {
    pub fn code(self) -> &'static str {
        match self {
            ZoekObjectType::Zaak => "ZAAK",
            ZoekObjectType::Document => "DOCUMENT",
            ZoekObjectType::Taak => "TAAK",
        }
    }
}

impl fmt::Display for ZoekObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for ZoekObjectType {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.to_ascii_uppercase().as_str() {
            "ZAAK" => Ok(ZoekObjectType::Zaak),
            "DOCUMENT" => Ok(ZoekObjectType::Document),
            "TAAK" => Ok(ZoekObjectType::Taak),
            _ => Err(format!("unknown search object type '{raw}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ZaakIndicatie {
    Verlengd,
    Opschorting,
    Deelzaak,
    Hoofdzaak,
    Heropend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentIndicatie {
    Ondertekend,
    Vergrendeld,
    Gebruiksrecht,
    Besluit,
    Verzonden,
}

fn set_indicatie<T: Ord + Copy>(indicaties: &mut Vec<T>, indicatie: T, value: bool) {
    indicaties.retain(|current| *current != indicatie);
    if value {
        indicaties.push(indicatie);
        indicaties.sort();
    }
}

/// Search document for a zaak. Field names follow the Solr schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ZaakZoekObject {
    pub id: String,
    #[serde(rename = "type")]
    pub object_type: Option<ZoekObjectType>,
    #[serde(rename = "zaak_identificatie")]
    pub identificatie: String,
    #[serde(rename = "zaak_omschrijving")]
    pub omschrijving: Option<String>,
    #[serde(rename = "zaak_toelichting")]
    pub toelichting: Option<String>,
    #[serde(rename = "zaak_registratiedatum")]
    pub registratiedatum: Option<NaiveDate>,
    #[serde(rename = "zaak_startdatum")]
    pub startdatum: Option<NaiveDate>,
    #[serde(rename = "zaak_einddatumGepland")]
    pub einddatum_gepland: Option<NaiveDate>,
    #[serde(rename = "zaak_einddatum")]
    pub einddatum: Option<NaiveDate>,
    #[serde(rename = "zaak_uiterlijkeEinddatumAfdoening")]
    pub uiterlijke_einddatum_afdoening: Option<NaiveDate>,
    #[serde(rename = "zaak_publicatiedatum")]
    pub publicatiedatum: Option<NaiveDate>,
    #[serde(rename = "zaak_communicatiekanaal")]
    pub communicatiekanaal: Option<String>,
    #[serde(rename = "zaak_vertrouwelijkheidaanduiding")]
    pub vertrouwelijkheidaanduiding: Option<String>,
    #[serde(rename = "zaak_afgehandeld")]
    pub afgehandeld: bool,
    #[serde(rename = "zaak_archiefNominatie")]
    pub archief_nominatie: Option<String>,
    #[serde(rename = "zaak_archiefActiedatum")]
    pub archief_actiedatum: Option<NaiveDate>,
    #[serde(rename = "zaak_initiatorIdentificatie")]
    pub initiator_identificatie: Option<String>,
    #[serde(rename = "zaak_initiatorType")]
    pub initiator_type: Option<String>,
    /// Identification numbers per roltype, keyed `zaak_betrokkene_<roltype>`.
    #[serde(flatten)]
    pub betrokkenen: BTreeMap<String, Vec<String>>,
    #[serde(rename = "zaak_groepId")]
    pub groep_id: Option<String>,
    #[serde(rename = "zaak_groepNaam")]
    pub groep_naam: Option<String>,
    #[serde(rename = "zaak_behandelaarNaam")]
    pub behandelaar_naam: Option<String>,
    #[serde(rename = "zaak_behandelaarGebruikersnaam")]
    pub behandelaar_gebruikersnaam: Option<String>,
    #[serde(rename = "zaak_toegekend")]
    pub toegekend: bool,
    #[serde(rename = "zaak_duurVerlenging")]
    pub duur_verlenging: Option<String>,
    #[serde(rename = "zaak_redenVerlenging")]
    pub reden_verlenging: Option<String>,
    #[serde(rename = "zaak_redenOpschorting")]
    pub reden_opschorting: Option<String>,
    #[serde(rename = "zaaktype_uuid")]
    pub zaaktype_uuid: Option<String>,
    #[serde(rename = "zaaktype_identificatie")]
    pub zaaktype_identificatie: Option<String>,
    #[serde(rename = "zaaktype_omschrijving")]
    pub zaaktype_omschrijving: Option<String>,
    #[serde(rename = "zaak_statustypeOmschrijving")]
    pub statustype_omschrijving: Option<String>,
    #[serde(rename = "zaak_statusDatumGezet")]
    pub status_datum_gezet: Option<DateTime<Utc>>,
    #[serde(rename = "zaak_statusToelichting")]
    pub status_toelichting: Option<String>,
    #[serde(rename = "zaak_statusEindstatus")]
    pub status_eindstatus: bool,
    #[serde(rename = "zaak_aantalOpenstaandeTaken")]
    pub aantal_openstaande_taken: usize,
    #[serde(rename = "zaak_resultaattypeOmschrijving")]
    pub resultaattype_omschrijving: Option<String>,
    #[serde(rename = "zaak_resultaatToelichting")]
    pub resultaat_toelichting: Option<String>,
    #[serde(rename = "zaak_bagObjecten")]
    pub bag_object_ids: Vec<String>,
    #[serde(rename = "zaak_indicaties")]
    pub indicaties: Vec<ZaakIndicatie>,
}

pub const BETROKKENE_PREFIX: &str = "zaak_betrokkene_";

impl ZaakZoekObject {
    pub fn set_indicatie(&mut self, indicatie: ZaakIndicatie, value: bool) {
        set_indicatie(&mut self.indicaties, indicatie, value);
    }

    pub fn is_indicatie(&self, indicatie: ZaakIndicatie) -> bool {
        self.indicaties.contains(&indicatie)
    }

    pub fn add_betrokkene(&mut self, roltype: &str, identificatie: &str) {
        self.betrokkenen
            .entry(format!("{BETROKKENE_PREFIX}{roltype}"))
            .or_default()
            .push(identificatie.to_string());
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentZoekObject {
    pub id: String,
    #[serde(rename = "type")]
    pub object_type: Option<ZoekObjectType>,
    #[serde(rename = "informatieobject_identificatie")]
    pub identificatie: String,
    #[serde(rename = "informatieobject_titel")]
    pub titel: String,
    #[serde(rename = "informatieobject_beschrijving")]
    pub beschrijving: Option<String>,
    #[serde(rename = "informatieobject_zaaktypeUuid")]
    pub zaaktype_uuid: Option<String>,
    #[serde(rename = "informatieobject_zaaktypeIdentificatie")]
    pub zaaktype_identificatie: Option<String>,
    #[serde(rename = "informatieobject_zaaktypeOmschrijving")]
    pub zaaktype_omschrijving: Option<String>,
    #[serde(rename = "informatieobject_zaakId")]
    pub zaak_identificatie: Option<String>,
    #[serde(rename = "informatieobject_zaakUuid")]
    pub zaak_uuid: Option<String>,
    #[serde(rename = "informatieobject_zaakAfgehandeld")]
    pub zaak_afgehandeld: bool,
    #[serde(rename = "informatieobject_creatiedatum")]
    pub creatiedatum: Option<NaiveDate>,
    #[serde(rename = "informatieobject_registratiedatum")]
    pub registratiedatum: Option<DateTime<Utc>>,
    #[serde(rename = "informatieobject_ontvangstdatum")]
    pub ontvangstdatum: Option<NaiveDate>,
    #[serde(rename = "informatieobject_verzenddatum")]
    pub verzenddatum: Option<NaiveDate>,
    #[serde(rename = "informatieobject_ondertekeningSoort")]
    pub ondertekening_soort: Option<String>,
    #[serde(rename = "informatieobject_ondertekeningDatum")]
    pub ondertekening_datum: Option<NaiveDate>,
    #[serde(rename = "informatieobject_vertrouwelijkheidaanduiding")]
    pub vertrouwelijkheidaanduiding: Option<String>,
    #[serde(rename = "informatieobject_auteur")]
    pub auteur: Option<String>,
    #[serde(rename = "informatieobject_status")]
    pub status: Option<String>,
    #[serde(rename = "informatieobject_formaat")]
    pub formaat: Option<String>,
    #[serde(rename = "informatieobject_versie")]
    pub versie: i32,
    #[serde(rename = "informatieobject_bestandsnaam")]
    pub bestandsnaam: Option<String>,
    #[serde(rename = "informatieobject_bestandsomvang")]
    pub bestandsomvang: Option<i64>,
    #[serde(rename = "informatieobject_documentType")]
    pub document_type: Option<String>,
    #[serde(rename = "informatieobject_vergrendeldDoorGebruikersnaam")]
    pub vergrendeld_door_gebruikersnaam: Option<String>,
    #[serde(rename = "informatieobject_vergrendeldDoorNaam")]
    pub vergrendeld_door_naam: Option<String>,
    #[serde(rename = "informatieobject_indicaties")]
    pub indicaties: Vec<DocumentIndicatie>,
}

impl DocumentZoekObject {
    pub fn set_indicatie(&mut self, indicatie: DocumentIndicatie, value: bool) {
        set_indicatie(&mut self.indicaties, indicatie, value);
    }

    pub fn is_indicatie(&self, indicatie: DocumentIndicatie) -> bool {
        self.indicaties.contains(&indicatie)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaakZoekObject {
    pub id: String,
    #[serde(rename = "type")]
    pub object_type: Option<ZoekObjectType>,
    #[serde(rename = "taak_naam")]
    pub naam: String,
    #[serde(rename = "taak_toelichting")]
    pub toelichting: Option<String>,
    #[serde(rename = "taak_status")]
    pub status: Option<String>,
    #[serde(rename = "taak_zaaktypeOmschrijving")]
    pub zaaktype_omschrijving: Option<String>,
    #[serde(rename = "taak_zaakUuid")]
    pub zaak_uuid: Option<String>,
    #[serde(rename = "taak_zaakId")]
    pub zaak_identificatie: Option<String>,
    #[serde(rename = "taak_creatiedatum")]
    pub creatiedatum: Option<DateTime<Utc>>,
    #[serde(rename = "taak_fataledatum")]
    pub fataledatum: Option<NaiveDate>,
    #[serde(rename = "taak_groepId")]
    pub groep_id: Option<String>,
    #[serde(rename = "taak_groepNaam")]
    pub groep_naam: Option<String>,
    #[serde(rename = "taak_behandelaarGebruikersnaam")]
    pub behandelaar_gebruikersnaam: Option<String>,
    #[serde(rename = "taak_behandelaarNaam")]
    pub behandelaar_naam: Option<String>,
    /// `<key>|<value>` pairs so the task data is searchable as a single field.
    #[serde(rename = "taak_data")]
    pub taak_data: Vec<String>,
    #[serde(rename = "taak_informatie")]
    pub taak_informatie: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ZoekObject {
    Zaak(ZaakZoekObject),
    Document(DocumentZoekObject),
    Taak(TaakZoekObject),
}

impl ZoekObject {
    pub fn id(&self) -> &str {
        match self {
            ZoekObject::Zaak(zaak) => &zaak.id,
            ZoekObject::Document(document) => &document.id,
            ZoekObject::Taak(taak) => &taak.id,
        }
    }
}
