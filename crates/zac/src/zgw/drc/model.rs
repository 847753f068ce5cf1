use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::zgw::shared::{extract_uuid, ZgwError};
use crate::zgw::zrc::Vertrouwelijkheidaanduiding;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    InBewerking,
    TerVaststelling,
    Definitief,
    Gearchiveerd,
}

impl DocumentStatus {
    pub fn code(self) -> &'static str {
        match self {
            Self::InBewerking => "IN_BEWERKING",
            Self::TerVaststelling => "TER_VASTSTELLING",
            Self::Definitief => "DEFINITIEF",
            Self::Gearchiveerd => "GEARCHIVEERD",
        }
    }
}

/// The documenten API reports an unsigned document as `{"soort": "", "datum": null}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ondertekening {
    #[serde(default)]
    pub soort: String,
    #[serde(default)]
    pub datum: Option<NaiveDate>,
}

impl Ondertekening {
    pub fn digitaal(datum: NaiveDate) -> Self {
        Self {
            soort: "digitaal".to_string(),
            datum: Some(datum),
        }
    }

    pub fn is_set(&self) -> bool {
        !self.soort.is_empty() && self.datum.is_some()
    }
}

/// A single document in the documenten API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnkelvoudigInformatieobject {
    pub url: String,
    pub identificatie: String,
    pub bronorganisatie: String,
    pub creatiedatum: NaiveDate,
    pub titel: String,
    pub vertrouwelijkheidaanduiding: Vertrouwelijkheidaanduiding,
    pub auteur: String,
    #[serde(default)]
    pub status: Option<DocumentStatus>,
    #[serde(default)]
    pub formaat: Option<String>,
    pub taal: String,
    pub versie: i32,
    pub begin_registratie: DateTime<Utc>,
    #[serde(default)]
    pub bestandsnaam: Option<String>,
    #[serde(default)]
    pub bestandsomvang: Option<i64>,
    #[serde(default)]
    pub beschrijving: Option<String>,
    #[serde(default)]
    pub ontvangstdatum: Option<NaiveDate>,
    #[serde(default)]
    pub verzenddatum: Option<NaiveDate>,
    #[serde(default)]
    pub indicatie_gebruiksrecht: Option<bool>,
    #[serde(default)]
    pub ondertekening: Option<Ondertekening>,
    pub informatieobjecttype: String,
    #[serde(default)]
    pub locked: bool,
}

impl EnkelvoudigInformatieobject {
    pub fn uuid(&self) -> Result<Uuid, ZgwError> {
        extract_uuid(&self.url)
    }

    pub fn is_ondertekend(&self) -> bool {
        self.ondertekening
            .as_ref()
            .map(Ondertekening::is_set)
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEnkelvoudigInformatieobject {
    pub bronorganisatie: String,
    pub creatiedatum: NaiveDate,
    pub titel: String,
    pub vertrouwelijkheidaanduiding: Vertrouwelijkheidaanduiding,
    pub auteur: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<DocumentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formaat: Option<String>,
    pub taal: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bestandsnaam: Option<String>,
    /// Base64 encoded content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inhoud: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beschrijving: Option<String>,
    pub informatieobjecttype: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InformatieobjectPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verzenddatum: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ondertekening: Option<Ondertekening>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<DocumentStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gebruiksrechten {
    pub informatieobject: String,
    pub startdatum: DateTime<Utc>,
    pub omschrijving_voorwaarden: String,
}
