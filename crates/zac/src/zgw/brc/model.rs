use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::zgw::shared::{extract_uuid, ZgwError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Vervalreden {
    Tijdelijk,
    IngetrokkenOverheid,
    IngetrokkenBelanghebbende,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Besluit {
    pub url: String,
    pub identificatie: String,
    pub verantwoordelijke_organisatie: String,
    pub besluittype: String,
    #[serde(default)]
    pub zaak: Option<String>,
    pub datum: NaiveDate,
    #[serde(default)]
    pub toelichting: Option<String>,
    pub ingangsdatum: NaiveDate,
    #[serde(default)]
    pub vervaldatum: Option<NaiveDate>,
    #[serde(default)]
    pub vervalreden: Option<Vervalreden>,
    #[serde(default)]
    pub publicatiedatum: Option<NaiveDate>,
    #[serde(default)]
    pub verzenddatum: Option<NaiveDate>,
    #[serde(default)]
    pub uiterlijke_reactiedatum: Option<NaiveDate>,
}

impl Besluit {
    pub fn uuid(&self) -> Result<Uuid, ZgwError> {
        extract_uuid(&self.url)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBesluit {
    pub verantwoordelijke_organisatie: String,
    pub besluittype: String,
    pub zaak: String,
    pub datum: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub toelichting: Option<String>,
    pub ingangsdatum: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vervaldatum: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vervalreden: Option<Vervalreden>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publicatiedatum: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uiterlijke_reactiedatum: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BesluitInformatieobject {
    pub url: String,
    pub informatieobject: String,
    pub besluit: String,
}

impl BesluitInformatieobject {
    pub fn uuid(&self) -> Result<Uuid, ZgwError> {
        extract_uuid(&self.url)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBesluitInformatieobject {
    pub informatieobject: String,
    pub besluit: String,
}
