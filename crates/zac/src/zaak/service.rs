use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use super::{
    ZaakServiceError, ROL_TOELICHTING_BEHANDELAAR, ROL_TOELICHTING_GROEP,
    STATUSTYPE_OMSCHRIJVING_HEROPEND,
};
use crate::identity::{Group, IdentityService, User};
use crate::policy::{assert_policy, ZaakRechten};
use crate::zgw::zrc::{BetrokkeneIdentificatie, BetrokkeneType, NewRol, Rol, Zaak};
use crate::zgw::ztc::OmschrijvingGeneriek;
use crate::zgw::{ZgwApiService, ZgwClients};

/// Outcome of a bulk (re)assignment; closed zaken are skipped, not failed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AssignmentReport {
    pub updated: Vec<Uuid>,
    pub skipped: Vec<Uuid>,
}

#[derive(Clone)]
pub struct ZaakService {
    zgw: ZgwApiService,
    identity: Arc<dyn IdentityService>,
}

impl ZaakService {
    pub fn new(zgw: ZgwApiService, identity: Arc<dyn IdentityService>) -> Self {
        Self { zgw, identity }
    }

    fn clients(&self) -> &ZgwClients {
        self.zgw.clients()
    }

    pub async fn bepaal_rol_groep(&self, group: &Group, zaak: &Zaak) -> Result<NewRol, ZaakServiceError> {
        let roltype = self
            .clients()
            .ztc
            .read_roltype_for_zaaktype(&zaak.zaaktype, OmschrijvingGeneriek::Behandelaar)
            .await?;
        Ok(NewRol {
            zaak: zaak.url.clone(),
            roltype: roltype.url,
            roltoelichting: ROL_TOELICHTING_GROEP.to_string(),
            betrokkene_type: BetrokkeneType::OrganisatorischeEenheid,
            betrokkene_identificatie: BetrokkeneIdentificatie::organisatorische_eenheid(
                &group.id,
                &group.name,
            ),
        })
    }

    pub async fn bepaal_rol_medewerker(&self, user: &User, zaak: &Zaak) -> Result<NewRol, ZaakServiceError> {
        let roltype = self
            .clients()
            .ztc
            .read_roltype_for_zaaktype(&zaak.zaaktype, OmschrijvingGeneriek::Behandelaar)
            .await?;
        Ok(NewRol {
            zaak: zaak.url.clone(),
            roltype: roltype.url,
            roltoelichting: ROL_TOELICHTING_BEHANDELAAR.to_string(),
            betrokkene_type: BetrokkeneType::Medewerker,
            betrokkene_identificatie: BetrokkeneIdentificatie::medewerker(
                &user.id,
                &user.full_name(),
            ),
        })
    }

    /// Replaces the rollen of the same roltype and betrokkene type with `rol`.
    /// Returns `false` when the zaak already had exactly this betrokkene.
    pub async fn update_rol(
        &self,
        zaak: &Zaak,
        rol: NewRol,
        reden: Option<&str>,
    ) -> Result<bool, ZaakServiceError> {
        let existing: Vec<Rol> = self
            .clients()
            .zrc
            .list_rollen(&zaak.url)
            .await?
            .into_iter()
            .filter(|current| {
                current.roltype == rol.roltype && current.betrokkene_type == rol.betrokkene_type
            })
            .collect();

        if existing.len() == 1 && existing[0].identificatienummer() == rol.identificatienummer() {
            return Ok(false);
        }

        for current in existing {
            self.clients().zrc.delete_rol(current.uuid, reden).await?;
        }
        self.clients().zrc.create_rol(&rol, reden).await?;
        Ok(true)
    }

    /// Removes the behandelaar rol of the given betrokkene type.
    pub async fn delete_rol(
        &self,
        zaak: &Zaak,
        betrokkene_type: BetrokkeneType,
        reden: Option<&str>,
    ) -> Result<bool, ZaakServiceError> {
        let roltypen = self
            .clients()
            .ztc
            .find_roltypen(&zaak.zaaktype, OmschrijvingGeneriek::Behandelaar)
            .await?;
        let rollen = self.clients().zrc.list_rollen(&zaak.url).await?;
        let mut deleted = false;
        for rol in rollen.into_iter().filter(|rol| {
            rol.betrokkene_type == betrokkene_type
                && roltypen.iter().any(|roltype| roltype.url == rol.roltype)
        }) {
            self.clients().zrc.delete_rol(rol.uuid, reden).await?;
            deleted = true;
        }
        Ok(deleted)
    }

    /// Assigns the zaak to a group and, optionally, to a behandelaar within that group.
    /// Without a behandelaar the current one is removed.
    pub async fn assign_zaak(
        &self,
        zaak: &Zaak,
        group_id: &str,
        behandelaar_id: Option<&str>,
        reden: Option<&str>,
    ) -> Result<(), ZaakServiceError> {
        let group = self.identity.read_group(group_id).await?;
        let groep_rol = self.bepaal_rol_groep(&group, zaak).await?;
        self.update_rol(zaak, groep_rol, reden).await?;

        match behandelaar_id.filter(|id| !id.trim().is_empty()) {
            Some(behandelaar_id) => {
                self.identity
                    .check_user_in_group(behandelaar_id, group_id)
                    .await?;
                let user = self.identity.read_user(behandelaar_id).await?;
                let medewerker_rol = self.bepaal_rol_medewerker(&user, zaak).await?;
                self.update_rol(zaak, medewerker_rol, reden).await?;
            }
            None => {
                self.delete_rol(zaak, BetrokkeneType::Medewerker, reden)
                    .await?;
            }
        }
        info!(zaak = %zaak.identificatie, group = group_id, behandelaar = ?behandelaar_id, "zaak assigned");
        Ok(())
    }

    pub async fn release_zaak(&self, zaak: &Zaak, reden: Option<&str>) -> Result<(), ZaakServiceError> {
        self.delete_rol(zaak, BetrokkeneType::Medewerker, reden)
            .await?;
        info!(zaak = %zaak.identificatie, "zaak released");
        Ok(())
    }

    pub async fn assign_zaken(
        &self,
        zaak_uuids: &[Uuid],
        group_id: &str,
        behandelaar_id: Option<&str>,
        reden: Option<&str>,
    ) -> Result<AssignmentReport, ZaakServiceError> {
        let mut report = AssignmentReport::default();
        for &uuid in zaak_uuids {
            let zaak = self.clients().zrc.read_zaak(uuid).await?;
            if !zaak.is_open() {
                warn!(zaak = %zaak.identificatie, "skipping assignment of closed zaak");
                report.skipped.push(uuid);
                continue;
            }
            self.assign_zaak(&zaak, group_id, behandelaar_id, reden)
                .await?;
            report.updated.push(uuid);
        }
        Ok(report)
    }

    pub async fn release_zaken(
        &self,
        zaak_uuids: &[Uuid],
        reden: Option<&str>,
    ) -> Result<AssignmentReport, ZaakServiceError> {
        let mut report = AssignmentReport::default();
        for &uuid in zaak_uuids {
            let zaak = self.clients().zrc.read_zaak(uuid).await?;
            if !zaak.is_open() {
                warn!(zaak = %zaak.identificatie, "skipping release of closed zaak");
                report.skipped.push(uuid);
                continue;
            }
            self.release_zaak(&zaak, reden).await?;
            report.updated.push(uuid);
        }
        Ok(report)
    }

    /// Adds a betrokkene with the given roltype. The same betrokkene may hold a
    /// roltype only once.
    pub async fn add_betrokkene_to_zaak(
        &self,
        roltype_url: &str,
        identificatie: &str,
        betrokkene_type: BetrokkeneType,
        zaak: &Zaak,
        toelichting: &str,
    ) -> Result<Rol, ZaakServiceError> {
        let roltype = self.clients().ztc.read_roltype(roltype_url).await?;
        let rollen = self.clients().zrc.list_rollen(&zaak.url).await?;
        if rollen.iter().any(|rol| {
            rol.roltype == roltype.url
                && rol.betrokkene_type == betrokkene_type
                && rol.identificatienummer() == Some(identificatie)
        }) {
            return Err(ZaakServiceError::BetrokkeneIsAlreadyAddedToZaak {
                zaak: zaak.identificatie.clone(),
                roltype: roltype.omschrijving,
                identificatie: identificatie.to_string(),
            });
        }

        let rol = NewRol {
            zaak: zaak.url.clone(),
            roltype: roltype.url,
            roltoelichting: toelichting.to_string(),
            betrokkene_type,
            betrokkene_identificatie: BetrokkeneIdentificatie::for_type(betrokkene_type, identificatie),
        };
        Ok(self.clients().zrc.create_rol(&rol, Some(toelichting)).await?)
    }

    /// Sets the initiator, replacing the current one.
    pub async fn add_initiator_to_zaak(
        &self,
        betrokkene_type: BetrokkeneType,
        identificatie: &str,
        zaak: &Zaak,
        toelichting: &str,
    ) -> Result<Rol, ZaakServiceError> {
        self.remove_initiator_from_zaak(zaak, toelichting).await?;
        let roltype = self
            .clients()
            .ztc
            .read_roltype_for_zaaktype(&zaak.zaaktype, OmschrijvingGeneriek::Initiator)
            .await?;
        let rol = NewRol {
            zaak: zaak.url.clone(),
            roltype: roltype.url,
            roltoelichting: toelichting.to_string(),
            betrokkene_type,
            betrokkene_identificatie: BetrokkeneIdentificatie::for_type(betrokkene_type, identificatie),
        };
        Ok(self.clients().zrc.create_rol(&rol, Some(toelichting)).await?)
    }

    pub async fn remove_initiator_from_zaak(
        &self,
        zaak: &Zaak,
        toelichting: &str,
    ) -> Result<bool, ZaakServiceError> {
        match self.zgw.find_initiator_role_for_zaak(zaak).await? {
            Some(initiator) => {
                self.clients()
                    .zrc
                    .delete_rol(initiator.uuid, Some(toelichting))
                    .await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// A zaak can only be closed without open deelzaken and without documents that
    /// are checked out for editing.
    pub async fn check_zaak_afsluitbaar(&self, zaak: &Zaak) -> Result<(), ZaakServiceError> {
        for deelzaak_url in &zaak.deelzaken {
            let deelzaak = self.clients().zrc.read_zaak_by_url(deelzaak_url).await?;
            if deelzaak.is_open() {
                return Err(ZaakServiceError::CaseHasOpenSubcases(
                    zaak.identificatie.clone(),
                ));
            }
        }

        let links = self
            .clients()
            .zrc
            .list_zaakinformatieobjecten(Some(&zaak.url), None)
            .await?;
        for link in links {
            let document = self
                .clients()
                .drc
                .read_enkelvoudig_informatieobject_by_url(&link.informatieobject)
                .await?;
            if document.locked {
                return Err(ZaakServiceError::CaseHasLockedInformationObjects(
                    zaak.identificatie.clone(),
                ));
            }
        }
        Ok(())
    }

    /// Closes an open zaak with the given resultaattype and the end status.
    pub async fn close_zaak(
        &self,
        zaak: &Zaak,
        rechten: &ZaakRechten,
        resultaattype_uuid: Uuid,
        reden: Option<&str>,
        brondatum_eigenschap: Option<NaiveDate>,
    ) -> Result<(), ZaakServiceError> {
        if !zaak.is_open() {
            return Err(ZaakServiceError::ZaakNotOpen(zaak.identificatie.clone()));
        }
        assert_policy(rechten.behandelen)?;
        self.check_zaak_afsluitbaar(zaak).await?;
        self.zgw
            .close_zaak(zaak, resultaattype_uuid, reden, brondatum_eigenschap)
            .await?;
        Ok(())
    }

    /// Ends a zaak prematurely. A zaak with a besluit, or one that has been reopened,
    /// has to be closed the regular way.
    pub async fn terminate_zaak(
        &self,
        zaak: &Zaak,
        rechten: &ZaakRechten,
        resultaattype_uuid: Uuid,
        reden: &str,
    ) -> Result<(), ZaakServiceError> {
        if !zaak.is_open() {
            return Err(ZaakServiceError::ZaakNotOpen(zaak.identificatie.clone()));
        }
        assert_policy(rechten.afbreken)?;
        if let Some(status_url) = &zaak.status {
            let status = self.clients().zrc.read_status(status_url).await?;
            let statustype = self.clients().ztc.read_statustype(&status.statustype).await?;
            if statustype.omschrijving == STATUSTYPE_OMSCHRIJVING_HEROPEND {
                return Err(ZaakServiceError::ZaakHeropend(zaak.identificatie.clone()));
            }
        }
        if !self.clients().brc.list_besluiten(&zaak.url).await?.is_empty() {
            return Err(ZaakServiceError::ZaakHasBesluit(zaak.identificatie.clone()));
        }

        self.zgw
            .update_resultaat_for_zaak(zaak, resultaattype_uuid, Some(reden))
            .await?;
        self.zgw.end_zaak(zaak, Some(reden)).await?;
        info!(zaak = %zaak.identificatie, "zaak terminated");
        Ok(())
    }

    /// Reopens a closed zaak: the resultaat is removed and the status becomes "Heropend".
    pub async fn reopen_zaak(
        &self,
        zaak: &Zaak,
        rechten: &ZaakRechten,
        reden: &str,
    ) -> Result<(), ZaakServiceError> {
        if zaak.is_open() {
            return Err(ZaakServiceError::ZaakIsOpen(zaak.identificatie.clone()));
        }
        assert_policy(rechten.heropenen)?;
        self.zgw.delete_resultaat_for_zaak(zaak, Some(reden)).await?;
        self.zgw
            .create_status_for_zaak(zaak, STATUSTYPE_OMSCHRIJVING_HEROPEND, Some(reden))
            .await?;
        info!(zaak = %zaak.identificatie, "zaak reopened");
        Ok(())
    }
}
