//! Recording, changing and withdrawing besluiten on a zaak.

use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::zgw::brc::{Besluit, NewBesluit, NewBesluitInformatieobject, Vervalreden};
use crate::zgw::zrc::Zaak;
use crate::zgw::ztc::BesluitType;
use crate::zgw::{extract_uuid, PeriodError, ZgwApiError, ZgwApiService, ZgwError, ZgwService};

const CREATE_DECISION_EXPLANATION: &str = "Aanmaken besluit";
const CHANGE_DECISION_EXPLANATION: &str = "Wijzigen besluit";

#[derive(Debug, thiserror::Error)]
pub enum DecisionError {
    #[error(transparent)]
    Zgw(#[from] ZgwError),
    #[error(transparent)]
    ZgwApi(#[from] ZgwApiError),
    #[error(transparent)]
    Period(#[from] PeriodError),
    #[error("besluittype '{0}' cannot have publication or response dates")]
    PublicationDisabled(String),
    #[error("a response date requires a publication date")]
    PublicationDateMissing,
    #[error("a publication date requires a response date")]
    ResponseDateMissing,
    #[error("response date {response} is before the calculated response date {calculated}")]
    ResponseDateInvalid {
        response: NaiveDate,
        calculated: NaiveDate,
    },
    #[error("'{0:?}' is not a reason to withdraw a besluit")]
    WithdrawalReasonInvalid(Vervalreden),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionCreateData {
    pub zaak_uuid: Uuid,
    pub resultaattype_uuid: Uuid,
    pub besluittype_uuid: Uuid,
    #[serde(default)]
    pub toelichting: Option<String>,
    pub ingangsdatum: NaiveDate,
    #[serde(default)]
    pub vervaldatum: Option<NaiveDate>,
    #[serde(default)]
    pub publicatiedatum: Option<NaiveDate>,
    #[serde(default)]
    pub uiterlijke_reactiedatum: Option<NaiveDate>,
    #[serde(default)]
    pub informatieobjecten: Vec<Uuid>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionChangeData {
    pub besluit_uuid: Uuid,
    pub resultaattype_uuid: Uuid,
    #[serde(default)]
    pub toelichting: Option<String>,
    pub ingangsdatum: NaiveDate,
    #[serde(default)]
    pub vervaldatum: Option<NaiveDate>,
    #[serde(default)]
    pub publicatiedatum: Option<NaiveDate>,
    #[serde(default)]
    pub uiterlijke_reactiedatum: Option<NaiveDate>,
    /// `None` leaves the linked documents untouched.
    #[serde(default)]
    pub informatieobjecten: Option<Vec<Uuid>>,
    #[serde(default)]
    pub reden: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionWithdrawalData {
    pub besluit_uuid: Uuid,
    pub vervaldatum: NaiveDate,
    pub vervalreden: Vervalreden,
    pub reden: String,
}

/// Publication rules of a besluittype, checked against the requested dates.
pub fn validate_publication_dates(
    besluittype: &BesluitType,
    publicatiedatum: Option<NaiveDate>,
    reactiedatum: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<(), DecisionError> {
    if !besluittype.publicatie_indicatie && (publicatiedatum.is_some() || reactiedatum.is_some()) {
        return Err(DecisionError::PublicationDisabled(besluittype.omschrijving.clone()));
    }
    match (publicatiedatum, reactiedatum) {
        (None, Some(_)) => Err(DecisionError::PublicationDateMissing),
        (Some(_), None) => Err(DecisionError::ResponseDateMissing),
        (Some(publicatiedatum), Some(reactiedatum)) => {
            let termijn_dagen = match &besluittype.reactietermijn {
                Some(termijn) => termijn.days_from(today)?,
                None => 0,
            };
            let calculated = publicatiedatum
                .checked_add_signed(chrono::Duration::days(termijn_dagen))
                .ok_or(PeriodError::DaysOutOfRange(termijn_dagen))?;
            if reactiedatum < calculated {
                return Err(DecisionError::ResponseDateInvalid {
                    response: reactiedatum,
                    calculated,
                });
            }
            Ok(())
        }
        (None, None) => Ok(()),
    }
}

/// The explanation recorded in the audit trail when a besluit is withdrawn.
pub fn withdrawal_explanation(vervalreden: Vervalreden, reden: &str) -> Result<String, DecisionError> {
    match vervalreden {
        Vervalreden::IngetrokkenOverheid => Ok(format!("Overheid: {reden}")),
        Vervalreden::IngetrokkenBelanghebbende => Ok(format!("Belanghebbende: {reden}")),
        Vervalreden::Tijdelijk => Err(DecisionError::WithdrawalReasonInvalid(vervalreden)),
    }
}

#[derive(Clone)]
pub struct DecisionService {
    zgw: ZgwApiService,
    verantwoordelijke_organisatie: String,
}

impl DecisionService {
    pub fn new(zgw: ZgwApiService, verantwoordelijke_organisatie: impl Into<String>) -> Self {
        Self {
            zgw,
            verantwoordelijke_organisatie: verantwoordelijke_organisatie.into(),
        }
    }

    /// Besluittypen are addressed by UUID and must be configured on the zaaktype.
    async fn read_besluittype(&self, zaak: &Zaak, besluittype_uuid: Uuid) -> Result<BesluitType, DecisionError> {
        let clients = self.zgw.clients();
        let zaaktype = clients.ztc.read_zaaktype(&zaak.zaaktype).await?;
        let url = zaaktype
            .besluittypen
            .iter()
            .find(|url| extract_uuid(url).is_ok_and(|uuid| uuid == besluittype_uuid))
            .ok_or_else(|| {
                ZgwError::not_found(
                    ZgwService::Ztc,
                    format!("besluittype '{besluittype_uuid}' for zaaktype '{}'", zaak.zaaktype),
                )
            })?;
        Ok(clients.ztc.read_besluittype(url).await?)
    }

    pub async fn create_decision(
        &self,
        zaak: &Zaak,
        data: &DecisionCreateData,
    ) -> Result<Besluit, DecisionError> {
        let besluittype = self.read_besluittype(zaak, data.besluittype_uuid).await?;
        validate_publication_dates(
            &besluittype,
            data.publicatiedatum,
            data.uiterlijke_reactiedatum,
            Utc::now().date_naive(),
        )?;

        if zaak.resultaat.is_some() {
            self.zgw
                .update_resultaat_for_zaak(zaak, data.resultaattype_uuid, None)
                .await?;
        } else {
            self.zgw
                .create_resultaat_for_zaak_by_uuid(zaak, data.resultaattype_uuid, None)
                .await?;
        }

        let clients = self.zgw.clients();
        let besluit = clients
            .brc
            .create_besluit(&NewBesluit {
                verantwoordelijke_organisatie: self.verantwoordelijke_organisatie.clone(),
                besluittype: besluittype.url.clone(),
                zaak: zaak.url.clone(),
                datum: Utc::now().date_naive(),
                toelichting: data.toelichting.clone(),
                ingangsdatum: data.ingangsdatum,
                vervaldatum: data.vervaldatum,
                vervalreden: None,
                publicatiedatum: data.publicatiedatum,
                uiterlijke_reactiedatum: data.uiterlijke_reactiedatum,
            })
            .await?;

        for &document_uuid in &data.informatieobjecten {
            self.link_document(&besluit, document_uuid, CREATE_DECISION_EXPLANATION)
                .await?;
        }
        info!(zaak = %zaak.identificatie, besluit = %besluit.identificatie, "besluit created");
        Ok(besluit)
    }

    pub async fn update_decision(
        &self,
        zaak: &Zaak,
        besluit: Besluit,
        data: &DecisionChangeData,
    ) -> Result<Besluit, DecisionError> {
        let clients = self.zgw.clients();
        let besluittype = clients.ztc.read_besluittype(&besluit.besluittype).await?;
        validate_publication_dates(
            &besluittype,
            data.publicatiedatum,
            data.uiterlijke_reactiedatum,
            Utc::now().date_naive(),
        )?;

        let changed = Besluit {
            toelichting: data.toelichting.clone(),
            ingangsdatum: data.ingangsdatum,
            vervaldatum: data.vervaldatum,
            publicatiedatum: data.publicatiedatum,
            uiterlijke_reactiedatum: data.uiterlijke_reactiedatum,
            ..besluit
        };
        let updated = clients
            .brc
            .update_besluit(&changed, data.reden.as_deref())
            .await?;

        if let Some(resultaat_url) = &zaak.resultaat {
            let resultaat = clients.zrc.read_resultaat(resultaat_url).await?;
            let resultaattype = clients
                .ztc
                .read_resultaattype_by_uuid(data.resultaattype_uuid)
                .await?;
            if extract_uuid(&resultaat.resultaattype)? != extract_uuid(&resultaattype.url)? {
                clients.zrc.delete_resultaat(resultaat.uuid, None).await?;
                self.zgw
                    .create_resultaat_for_zaak_by_uuid(zaak, data.resultaattype_uuid, None)
                    .await?;
            }
        }

        if let Some(documenten) = &data.informatieobjecten {
            self.update_documents(&updated, documenten).await?;
        }
        Ok(updated)
    }

    /// Links the requested documents and unlinks those no longer requested.
    async fn update_documents(&self, besluit: &Besluit, wanted: &[Uuid]) -> Result<(), DecisionError> {
        let brc = &self.zgw.clients().brc;
        let links = brc.list_besluitinformatieobjecten(&besluit.url).await?;
        let mut current = Vec::with_capacity(links.len());
        for link in &links {
            let document_uuid = extract_uuid(&link.informatieobject)?;
            if !wanted.contains(&document_uuid) {
                brc.delete_besluitinformatieobject(link.uuid()?, None).await?;
            }
            current.push(document_uuid);
        }
        for &document_uuid in wanted.iter().filter(|uuid| !current.contains(uuid)) {
            self.link_document(besluit, document_uuid, CHANGE_DECISION_EXPLANATION)
                .await?;
        }
        Ok(())
    }

    async fn link_document(
        &self,
        besluit: &Besluit,
        document_uuid: Uuid,
        toelichting: &str,
    ) -> Result<(), DecisionError> {
        let clients = self.zgw.clients();
        let document = clients
            .drc
            .read_enkelvoudig_informatieobject(document_uuid)
            .await?;
        clients
            .brc
            .create_besluitinformatieobject(
                &NewBesluitInformatieobject {
                    informatieobject: document.url,
                    besluit: besluit.url.clone(),
                },
                Some(toelichting),
            )
            .await?;
        Ok(())
    }

    pub async fn withdraw_decision(&self, data: &DecisionWithdrawalData) -> Result<Besluit, DecisionError> {
        let explanation = withdrawal_explanation(data.vervalreden, &data.reden)?;
        let brc = &self.zgw.clients().brc;
        let besluit = brc.read_besluit(data.besluit_uuid).await?;
        let withdrawn = Besluit {
            vervaldatum: Some(data.vervaldatum),
            vervalreden: Some(data.vervalreden),
            ..besluit
        };
        let updated = brc.update_besluit(&withdrawn, Some(&explanation)).await?;
        info!(besluit = %updated.identificatie, reden = ?data.vervalreden, "besluit withdrawn");
        Ok(updated)
    }

    pub async fn list_decisions(&self, zaak: &Zaak) -> Result<Vec<Besluit>, DecisionError> {
        Ok(self.zgw.clients().brc.list_besluiten(&zaak.url).await?)
    }
}
