use serde::{Deserialize, Serialize};

use super::super::period::IsoPeriod;
use crate::zgw::zrc::Archiefnominatie;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZaakType {
    pub url: String,
    pub identificatie: String,
    pub omschrijving: String,
    #[serde(default)]
    pub catalogus: Option<String>,
    pub doorlooptijd: IsoPeriod,
    #[serde(default)]
    pub servicenorm: Option<IsoPeriod>,
    #[serde(default)]
    pub opschorting_en_aanhouding_mogelijk: bool,
    #[serde(default)]
    pub verlenging_mogelijk: bool,
    #[serde(default)]
    pub verlengingstermijn: Option<IsoPeriod>,
    #[serde(default)]
    pub besluittypen: Vec<String>,
    #[serde(default)]
    pub informatieobjecttypen: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusType {
    pub url: String,
    pub omschrijving: String,
    pub zaaktype: String,
    pub volgnummer: i32,
    #[serde(default)]
    pub is_eindstatus: bool,
}

/// How the brondatum of the archiving procedure is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Afleidingswijze {
    Afgehandeld,
    AnderDatumkenmerk,
    Eigenschap,
    GerelateerdeZaak,
    Hoofdzaak,
    IngangsdatumBesluit,
    Termijn,
    VervaldatumBesluit,
    Zaakobject,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrondatumArchiefprocedure {
    pub afleidingswijze: Afleidingswijze,
    #[serde(default)]
    pub datumkenmerk: Option<String>,
    #[serde(default)]
    pub einddatum_bekend: bool,
    #[serde(default)]
    pub objecttype: Option<String>,
    #[serde(default)]
    pub registratie: Option<String>,
    #[serde(default)]
    pub procestermijn: Option<IsoPeriod>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultaatType {
    pub url: String,
    pub zaaktype: String,
    pub omschrijving: String,
    #[serde(default)]
    pub toelichting: Option<String>,
    #[serde(default)]
    pub archiefnominatie: Option<Archiefnominatie>,
    #[serde(default)]
    pub archiefactietermijn: Option<IsoPeriod>,
    #[serde(default)]
    pub brondatum_archiefprocedure: Option<BrondatumArchiefprocedure>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OmschrijvingGeneriek {
    Adviseur,
    Behandelaar,
    Belanghebbende,
    Beslisser,
    Initiator,
    Klantcontacter,
    Zaakcoordinator,
    MedeInitiator,
}

impl OmschrijvingGeneriek {
    pub const ALL: [Self; 8] = [
        Self::Adviseur,
        Self::Behandelaar,
        Self::Belanghebbende,
        Self::Beslisser,
        Self::Initiator,
        Self::Klantcontacter,
        Self::Zaakcoordinator,
        Self::MedeInitiator,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Self::Adviseur => "adviseur",
            Self::Behandelaar => "behandelaar",
            Self::Belanghebbende => "belanghebbende",
            Self::Beslisser => "beslisser",
            Self::Initiator => "initiator",
            Self::Klantcontacter => "klantcontacter",
            Self::Zaakcoordinator => "zaakcoordinator",
            Self::MedeInitiator => "mede_initiator",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RolType {
    pub url: String,
    pub zaaktype: String,
    pub omschrijving: String,
    pub omschrijving_generiek: OmschrijvingGeneriek,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BesluitType {
    pub url: String,
    pub omschrijving: String,
    #[serde(default)]
    pub publicatie_indicatie: bool,
    #[serde(default)]
    pub reactietermijn: Option<IsoPeriod>,
    #[serde(default)]
    pub zaaktypen: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InformatieobjectType {
    pub url: String,
    pub omschrijving: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Eigenschap {
    pub url: String,
    pub naam: String,
    pub zaaktype: String,
}
