use chrono::{NaiveTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use super::archiving::{self, ArchivingError, CloseRequirement};
use super::drc::{Gebruiksrechten, NewEnkelvoudigInformatieobject};
use super::period::PeriodError;
use super::shared::ZgwError;
use super::zrc::{
    BetrokkeneType, NewResultaat, NewStatus, NewZaakEigenschap, NewZaakInformatieobject,
    Resultaat, Rol, Status, Zaak, ZaakAfsluiten, ZaakCreate, ZaakInformatieobject, ZaakPatch,
};
use super::ztc::{OmschrijvingGeneriek, ResultaatType, StatusType, ZaakType};
use super::ZgwClients;

/// Explanation prefix recorded when a document is unlinked from a zaak.
pub const ZAAK_OBJECT_DELETION_PREFIX: &str = "Verwijderd";

#[derive(Debug, thiserror::Error)]
pub enum ZgwApiError {
    #[error(transparent)]
    Client(#[from] ZgwError),
    #[error("{0}")]
    StatusTypeNotFound(String),
    #[error("{0}")]
    ResultTypeNotFound(String),
    #[error("found {count} roles of type '{roltype}' for zaak '{zaak}' where at most one was expected")]
    MultipleRoles {
        zaak: String,
        roltype: String,
        count: usize,
    },
    #[error(transparent)]
    Archiving(#[from] ArchivingError),
    #[error(transparent)]
    Period(#[from] PeriodError),
}

/// Derives the planned and final end dates from the zaaktype's norms.
pub fn apply_doorlooptijden(zaak: &mut ZaakCreate, zaaktype: &ZaakType) -> Result<(), PeriodError> {
    if let Some(servicenorm) = &zaaktype.servicenorm {
        zaak.einddatum_gepland = Some(servicenorm.add_to(zaak.startdatum)?);
    }
    zaak.uiterlijke_einddatum_afdoening = Some(zaaktype.doorlooptijd.add_to(zaak.startdatum)?);
    Ok(())
}

pub fn status_type_eind<'a>(
    statustypen: &'a [StatusType],
    zaaktype_url: &str,
) -> Result<&'a StatusType, ZgwApiError> {
    statustypen
        .iter()
        .find(|statustype| statustype.is_eindstatus)
        .ok_or_else(|| {
            ZgwApiError::StatusTypeNotFound(format!(
                "No status type with 'end state' found for zaaktype with URI: '{zaaktype_url}'."
            ))
        })
}

pub fn status_type_by_omschrijving<'a>(
    statustypen: &'a [StatusType],
    omschrijving: &str,
    zaaktype_url: &str,
) -> Result<&'a StatusType, ZgwApiError> {
    statustypen
        .iter()
        .find(|statustype| statustype.omschrijving == omschrijving)
        .ok_or_else(|| {
            ZgwApiError::StatusTypeNotFound(format!(
                "Status type with description '{omschrijving}' not found for zaaktype with URI: '{zaaktype_url}'."
            ))
        })
}

pub fn resultaattype_by_omschrijving<'a>(
    resultaattypen: &'a [ResultaatType],
    omschrijving: &str,
    zaaktype_url: &str,
) -> Result<&'a ResultaatType, ZgwApiError> {
    resultaattypen
        .iter()
        .find(|resultaattype| resultaattype.omschrijving == omschrijving)
        .ok_or_else(|| {
            ZgwApiError::ResultTypeNotFound(format!(
                "Resultaattype with description '{omschrijving}' not found for zaaktype with URI: '{zaaktype_url}'."
            ))
        })
}

/// Case lifecycle procedures composed from the individual ZGW clients.
#[derive(Clone)]
pub struct ZgwApiService {
    clients: ZgwClients,
}

impl ZgwApiService {
    pub fn new(clients: ZgwClients) -> Self {
        Self { clients }
    }

    pub fn clients(&self) -> &ZgwClients {
        &self.clients
    }

    pub async fn create_zaak(
        &self,
        mut zaak: ZaakCreate,
        toelichting: Option<&str>,
    ) -> Result<Zaak, ZgwApiError> {
        let zaaktype = self.clients.ztc.read_zaaktype(&zaak.zaaktype).await?;
        apply_doorlooptijden(&mut zaak, &zaaktype)?;
        let created = self.clients.zrc.create_zaak(&zaak, toelichting).await?;
        info!(zaak = %created.identificatie, zaaktype = %zaaktype.identificatie, "zaak created");
        Ok(created)
    }

    pub async fn create_status_for_zaak(
        &self,
        zaak: &Zaak,
        statustype_omschrijving: &str,
        toelichting: Option<&str>,
    ) -> Result<Status, ZgwApiError> {
        let statustypen = self.clients.ztc.read_statustypen(&zaak.zaaktype).await?;
        let statustype =
            status_type_by_omschrijving(&statustypen, statustype_omschrijving, &zaak.zaaktype)?;
        self.create_status(zaak, &statustype.url, toelichting).await
    }

    pub async fn read_status_type_eind(&self, zaaktype_url: &str) -> Result<StatusType, ZgwApiError> {
        let statustypen = self.clients.ztc.read_statustypen(zaaktype_url).await?;
        status_type_eind(&statustypen, zaaktype_url).cloned()
    }

    pub async fn read_resultaattype_by_omschrijving(
        &self,
        zaaktype_url: &str,
        omschrijving: &str,
    ) -> Result<ResultaatType, ZgwApiError> {
        let resultaattypen = self.clients.ztc.read_resultaattypen(zaaktype_url).await?;
        resultaattype_by_omschrijving(&resultaattypen, omschrijving, zaaktype_url).cloned()
    }

    pub async fn create_resultaat_for_zaak(
        &self,
        zaak: &Zaak,
        resultaattype_omschrijving: &str,
        toelichting: Option<&str>,
    ) -> Result<Resultaat, ZgwApiError> {
        let resultaattype = self
            .read_resultaattype_by_omschrijving(&zaak.zaaktype, resultaattype_omschrijving)
            .await?;
        self.create_resultaat(zaak, &resultaattype.url, toelichting)
            .await
    }

    pub async fn create_resultaat_for_zaak_by_uuid(
        &self,
        zaak: &Zaak,
        resultaattype_uuid: Uuid,
        toelichting: Option<&str>,
    ) -> Result<Resultaat, ZgwApiError> {
        let resultaattype = self
            .clients
            .ztc
            .read_resultaattype_by_uuid(resultaattype_uuid)
            .await?;
        self.create_resultaat(zaak, &resultaattype.url, toelichting)
            .await
    }

    /// Replaces the current resultaat of the zaak, if any, with one of the given type.
    pub async fn update_resultaat_for_zaak(
        &self,
        zaak: &Zaak,
        resultaattype_uuid: Uuid,
        reden: Option<&str>,
    ) -> Result<Resultaat, ZgwApiError> {
        self.delete_resultaat_for_zaak(zaak, reden).await?;
        self.create_resultaat_for_zaak_by_uuid(zaak, resultaattype_uuid, reden)
            .await
    }

    pub async fn delete_resultaat_for_zaak(
        &self,
        zaak: &Zaak,
        reden: Option<&str>,
    ) -> Result<(), ZgwApiError> {
        if let Some(resultaat_url) = &zaak.resultaat {
            let resultaat = self.clients.zrc.read_resultaat(resultaat_url).await?;
            self.clients
                .zrc
                .delete_resultaat(resultaat.uuid, reden)
                .await?;
        }
        Ok(())
    }

    /// Sets the end status on a zaak that already has a resultaat, then records the
    /// archival date.
    pub async fn end_zaak(&self, zaak: &Zaak, toelichting: Option<&str>) -> Result<(), ZgwApiError> {
        let eind = self.read_status_type_eind(&zaak.zaaktype).await?;
        self.create_status(zaak, &eind.url, toelichting).await?;
        self.calculate_archiving_parameters(zaak.uuid).await?;
        Ok(())
    }

    /// Closes a zaak in one call to the zaken API with the given resultaattype and the
    /// end status. A brondatum value is needed when the resultaattype derives its
    /// brondatum from a zaak eigenschap.
    pub async fn close_zaak(
        &self,
        zaak: &Zaak,
        resultaattype_uuid: Uuid,
        toelichting: Option<&str>,
        brondatum_eigenschap: Option<chrono::NaiveDate>,
    ) -> Result<(), ZgwApiError> {
        let resultaattype = self
            .clients
            .ztc
            .read_resultaattype_by_uuid(resultaattype_uuid)
            .await?;
        let eind = self.read_status_type_eind(&zaak.zaaktype).await?;

        self.process_brondatum_procedure(zaak, &resultaattype, brondatum_eigenschap)
            .await?;

        let afsluiten = ZaakAfsluiten {
            zaak: ZaakPatch::default(),
            resultaat: NewResultaat {
                zaak: zaak.url.clone(),
                resultaattype: resultaattype.url.clone(),
                toelichting: toelichting.map(str::to_string),
            },
            status: NewStatus {
                zaak: zaak.url.clone(),
                statustype: eind.url.clone(),
                datum_status_gezet: Utc::now(),
                statustoelichting: toelichting.map(str::to_string),
            },
        };
        self.clients
            .zrc
            .close_zaak(zaak.uuid, &afsluiten, toelichting)
            .await?;
        info!(zaak = %zaak.identificatie, resultaattype = %resultaattype.omschrijving, "zaak closed");

        self.calculate_archiving_parameters(zaak.uuid).await?;
        Ok(())
    }

    async fn process_brondatum_procedure(
        &self,
        zaak: &Zaak,
        resultaattype: &ResultaatType,
        brondatum_eigenschap: Option<chrono::NaiveDate>,
    ) -> Result<(), ZgwApiError> {
        match archiving::close_requirement(resultaattype)? {
            CloseRequirement::Nothing => Ok(()),
            CloseRequirement::Eigenschap { datumkenmerk } => {
                let brondatum = brondatum_eigenschap.ok_or_else(|| {
                    ArchivingError::MissingBrondatumEigenschap {
                        datumkenmerk: datumkenmerk.clone(),
                    }
                })?;
                self.upsert_zaakeigenschap(zaak, &datumkenmerk, brondatum.to_string())
                    .await
            }
        }
    }

    async fn upsert_zaakeigenschap(
        &self,
        zaak: &Zaak,
        naam: &str,
        waarde: String,
    ) -> Result<(), ZgwApiError> {
        let existing = self
            .clients
            .zrc
            .list_zaakeigenschappen(zaak.uuid)
            .await?
            .into_iter()
            .find(|eigenschap| eigenschap.naam == naam);

        match existing {
            Some(mut eigenschap) => {
                eigenschap.waarde = waarde;
                self.clients
                    .zrc
                    .update_zaakeigenschap(zaak.uuid, &eigenschap)
                    .await?;
            }
            None => {
                let eigenschap = self
                    .clients
                    .ztc
                    .read_eigenschap(&zaak.zaaktype, naam)
                    .await?;
                self.clients
                    .zrc
                    .create_zaakeigenschap(
                        zaak.uuid,
                        &NewZaakEigenschap {
                            zaak: zaak.url.clone(),
                            eigenschap: eigenschap.url,
                            waarde,
                        },
                    )
                    .await?;
            }
        }
        Ok(())
    }

    /// Re-reads the closed zaak and stores the archiefactiedatum when it can be derived.
    pub async fn calculate_archiving_parameters(
        &self,
        zaak_uuid: Uuid,
    ) -> Result<Option<chrono::NaiveDate>, ZgwApiError> {
        let zaak = self.clients.zrc.read_zaak(zaak_uuid).await?;
        let Some(resultaat_url) = &zaak.resultaat else {
            return Ok(None);
        };
        let resultaat = self.clients.zrc.read_resultaat(resultaat_url).await?;
        let resultaattype = self
            .clients
            .ztc
            .read_resultaattype(&resultaat.resultaattype)
            .await?;

        let datum = archiving::archiefactiedatum(&zaak, &resultaattype)?;
        if let Some(archiefactiedatum) = datum {
            let patch = ZaakPatch {
                archiefactiedatum: Some(archiefactiedatum),
                ..ZaakPatch::default()
            };
            self.clients.zrc.patch_zaak(zaak.uuid, &patch, None).await?;
        }
        Ok(datum)
    }

    /// Stores a new document, grants its usage rights from its creation date and links
    /// it to the zaak.
    pub async fn create_zaak_informatieobject_for_zaak(
        &self,
        zaak: &Zaak,
        document: &NewEnkelvoudigInformatieobject,
        titel: &str,
        beschrijving: Option<&str>,
        omschrijving_voorwaarden: &str,
    ) -> Result<ZaakInformatieobject, ZgwApiError> {
        let created = self
            .clients
            .drc
            .create_enkelvoudig_informatieobject(document)
            .await?;
        self.clients
            .drc
            .create_gebruiksrechten(&Gebruiksrechten {
                informatieobject: created.url.clone(),
                startdatum: created.creatiedatum.and_time(NaiveTime::MIN).and_utc(),
                omschrijving_voorwaarden: omschrijving_voorwaarden.to_string(),
            })
            .await?;
        let link = self
            .clients
            .zrc
            .create_zaakinformatieobject(
                &NewZaakInformatieobject {
                    zaak: zaak.url.clone(),
                    informatieobject: created.url.clone(),
                    titel: titel.to_string(),
                    beschrijving: beschrijving.map(str::to_string),
                },
                None,
            )
            .await?;
        Ok(link)
    }

    /// Unlinks a document from a zaak; the document itself is deleted when no other
    /// zaak refers to it.
    pub async fn remove_enkelvoudig_informatieobject_from_zaak(
        &self,
        document_uuid: Uuid,
        zaak_uuid: Uuid,
        toelichting: Option<&str>,
    ) -> Result<(), ZgwApiError> {
        let document = self
            .clients
            .drc
            .read_enkelvoudig_informatieobject(document_uuid)
            .await?;
        let links = self
            .clients
            .zrc
            .list_zaakinformatieobjecten(None, Some(&document.url))
            .await?;

        let explanation = match toelichting {
            Some(toelichting) => format!("{ZAAK_OBJECT_DELETION_PREFIX}: {toelichting}"),
            None => ZAAK_OBJECT_DELETION_PREFIX.to_string(),
        };

        let mut linked_elsewhere = false;
        for link in &links {
            if link.zaak_uuid()? == zaak_uuid {
                self.clients
                    .zrc
                    .delete_zaakinformatieobject(link.uuid, Some(&explanation))
                    .await?;
            } else {
                linked_elsewhere = true;
            }
        }

        if !linked_elsewhere {
            self.clients
                .drc
                .delete_enkelvoudig_informatieobject(document_uuid)
                .await?;
        }
        Ok(())
    }

    pub async fn find_groep_for_zaak(&self, zaak: &Zaak) -> Result<Option<Rol>, ZgwApiError> {
        self.find_rol(
            zaak,
            OmschrijvingGeneriek::Behandelaar,
            Some(BetrokkeneType::OrganisatorischeEenheid),
        )
        .await
    }

    pub async fn find_behandelaar_medewerker_role_for_zaak(
        &self,
        zaak: &Zaak,
    ) -> Result<Option<Rol>, ZgwApiError> {
        self.find_rol(
            zaak,
            OmschrijvingGeneriek::Behandelaar,
            Some(BetrokkeneType::Medewerker),
        )
        .await
    }

    pub async fn find_initiator_role_for_zaak(&self, zaak: &Zaak) -> Result<Option<Rol>, ZgwApiError> {
        self.find_rol(zaak, OmschrijvingGeneriek::Initiator, None)
            .await
    }

    async fn find_rol(
        &self,
        zaak: &Zaak,
        generiek: OmschrijvingGeneriek,
        betrokkene_type: Option<BetrokkeneType>,
    ) -> Result<Option<Rol>, ZgwApiError> {
        let roltypen = self
            .clients
            .ztc
            .find_roltypen(&zaak.zaaktype, generiek)
            .await?;
        if roltypen.len() > 1 {
            warn!(
                zaaktype = %zaak.zaaktype,
                generiek = generiek.code(),
                "multiple roltypen found, using the first"
            );
        }
        let Some(roltype) = roltypen.into_iter().next() else {
            return Ok(None);
        };

        let mut rollen: Vec<Rol> = self
            .clients
            .zrc
            .list_rollen(&zaak.url)
            .await?
            .into_iter()
            .filter(|rol| rol.roltype == roltype.url)
            .filter(|rol| betrokkene_type.map_or(true, |wanted| rol.betrokkene_type == wanted))
            .collect();

        match rollen.len() {
            0 => Ok(None),
            1 => Ok(rollen.pop()),
            count => Err(ZgwApiError::MultipleRoles {
                zaak: zaak.identificatie.clone(),
                roltype: roltype.omschrijving,
                count,
            }),
        }
    }

    async fn create_status(
        &self,
        zaak: &Zaak,
        statustype_url: &str,
        toelichting: Option<&str>,
    ) -> Result<Status, ZgwApiError> {
        let status = NewStatus {
            zaak: zaak.url.clone(),
            statustype: statustype_url.to_string(),
            datum_status_gezet: Utc::now(),
            statustoelichting: toelichting.map(str::to_string),
        };
        Ok(self.clients.zrc.create_status(&status, toelichting).await?)
    }

    async fn create_resultaat(
        &self,
        zaak: &Zaak,
        resultaattype_url: &str,
        toelichting: Option<&str>,
    ) -> Result<Resultaat, ZgwApiError> {
        let resultaat = NewResultaat {
            zaak: zaak.url.clone(),
            resultaattype: resultaattype_url.to_string(),
            toelichting: toelichting.map(str::to_string),
        };
        Ok(self
            .clients
            .zrc
            .create_resultaat(&resultaat, toelichting)
            .await?)
    }
}
