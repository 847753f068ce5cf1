use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::FormulierError;
use crate::identity::{Group, User};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FormulierVeldtype {
    Checkbox,
    Datum,
    DocumentenLijst,
    GroepMedewerker,
    Keuzeveld,
    MeervoudigeKeuze,
    Nummer,
    Radio,
    TekstVeld,
    TekstVlak,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormulierVeldDefinitie {
    pub systeemnaam: String,
    pub volgorde: i32,
    pub label: String,
    pub veldtype: FormulierVeldtype,
    #[serde(default)]
    pub beschrijving: Option<String>,
    #[serde(default)]
    pub helptekst: Option<String>,
    #[serde(default)]
    pub verplicht: bool,
    #[serde(default)]
    pub default_waarde: Option<String>,
    /// Options separated by ";", or `REF:<code>` to take them from a reference table.
    #[serde(default)]
    pub meerkeuze_opties: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormulierDefinitie {
    pub systeemnaam: String,
    pub naam: String,
    #[serde(default)]
    pub beschrijving: Option<String>,
    pub veld_definities: Vec<FormulierVeldDefinitie>,
}

/// A task as presented to the user, carrying its form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaakView {
    pub id: String,
    pub naam: String,
    pub zaak_uuid: Uuid,
    pub creatiedatum_tijd: DateTime<Utc>,
    #[serde(default)]
    pub fataledatum: Option<NaiveDate>,
    #[serde(default)]
    pub groep: Option<Group>,
    #[serde(default)]
    pub behandelaar: Option<User>,
    #[serde(default)]
    pub formulier_definitie: Option<FormulierDefinitie>,
    #[serde(default)]
    pub formio_formulier: Option<Value>,
    #[serde(default)]
    pub taakdata: Map<String, Value>,
    #[serde(default)]
    pub taakinformatie: Map<String, Value>,
}

const TOELICHTING: &str = "toelichting";
const TAAK_FATALE_DATUM: &str = "taakFataleDatum";
const ZAAK_OPSCHORTEN: &str = "zaakOpschorten";
const ZAAK_HERVATTEN: &str = "zaakHervatten";
const DOCUMENTEN_VERZENDEN: &str = "documentenVerzenden";
const DOCUMENTEN_VERZENDEN_DATUM: &str = "documentenVerzendenDatum";
const DOCUMENTEN_ONDERTEKENEN: &str = "documentenOndertekenen";

const RESERVED_KEYS: &[&str] = &[
    TOELICHTING,
    TAAK_FATALE_DATUM,
    ZAAK_OPSCHORTEN,
    ZAAK_HERVATTEN,
    DOCUMENTEN_VERZENDEN,
    DOCUMENTEN_VERZENDEN_DATUM,
    DOCUMENTEN_ONDERTEKENEN,
];

/// The submitted task data, split into the keys that trigger actions and the
/// remaining zaak variables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormulierData {
    pub toelichting: Option<String>,
    pub taak_fatale_datum: Option<NaiveDate>,
    pub zaak_opschorten: bool,
    pub zaak_hervatten: bool,
    pub documenten_verzenden: Option<String>,
    pub documenten_verzenden_datum: Option<NaiveDate>,
    pub documenten_ondertekenen: Option<String>,
    pub zaak_variabelen: Map<String, Value>,
}

fn text(data: &Map<String, Value>, key: &str) -> Option<String> {
    match data.get(key)? {
        Value::String(value) if !value.trim().is_empty() => Some(value.clone()),
        Value::String(_) | Value::Null => None,
        other => Some(other.to_string()),
    }
}

fn flag(data: &Map<String, Value>, key: &str) -> bool {
    match data.get(key) {
        Some(Value::Bool(value)) => *value,
        Some(Value::String(value)) => value.eq_ignore_ascii_case("true"),
        _ => false,
    }
}

/// Accepts a plain date or a timestamp; the frontend sends either.
fn date(data: &Map<String, Value>, key: &'static str) -> Result<Option<NaiveDate>, FormulierError> {
    let Some(value) = text(data, key) else {
        return Ok(None);
    };
    if let Ok(date) = NaiveDate::parse_from_str(&value, "%Y-%m-%d") {
        return Ok(Some(date));
    }
    DateTime::parse_from_rfc3339(&value)
        .map(|timestamp| Some(timestamp.date_naive()))
        .map_err(|_| FormulierError::InvalidDate { key, value })
}

impl FormulierData {
    pub fn parse(data: &Map<String, Value>) -> Result<Self, FormulierError> {
        let zaak_variabelen = data
            .iter()
            .filter(|(key, _)| !RESERVED_KEYS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        Ok(Self {
            toelichting: text(data, TOELICHTING),
            taak_fatale_datum: date(data, TAAK_FATALE_DATUM)?,
            zaak_opschorten: flag(data, ZAAK_OPSCHORTEN),
            zaak_hervatten: flag(data, ZAAK_HERVATTEN),
            documenten_verzenden: text(data, DOCUMENTEN_VERZENDEN),
            documenten_verzenden_datum: date(data, DOCUMENTEN_VERZENDEN_DATUM)?,
            documenten_ondertekenen: text(data, DOCUMENTEN_ONDERTEKENEN),
            zaak_variabelen,
        })
    }
}
