use async_trait::async_trait;
use std::sync::Arc;

use super::{parse_uuid, ZoekObjectConverter};
use crate::search::model::{ZaakIndicatie, ZaakZoekObject, ZoekObject, ZoekObjectType};
use crate::search::SearchError;
use crate::workflow::TaskService;
use crate::zaak::STATUSTYPE_OMSCHRIJVING_HEROPEND;
use crate::zgw::zrc::Zaak;
use crate::zgw::{extract_uuid, ZgwApiService};

pub struct ZaakZoekObjectConverter {
    zgw: ZgwApiService,
    tasks: Arc<dyn TaskService>,
}

impl ZaakZoekObjectConverter {
    pub fn new(zgw: ZgwApiService, tasks: Arc<dyn TaskService>) -> Self {
        Self { zgw, tasks }
    }

    pub async fn convert_zaak(&self, zaak: &Zaak) -> Result<ZaakZoekObject, SearchError> {
        let clients = self.zgw.clients();
        let mut object = ZaakZoekObject {
            id: zaak.uuid.to_string(),
            object_type: Some(ZoekObjectType::Zaak),
            identificatie: zaak.identificatie.clone(),
            omschrijving: zaak.omschrijving.clone(),
            toelichting: zaak.toelichting.clone(),
            registratiedatum: Some(zaak.registratiedatum),
            startdatum: Some(zaak.startdatum),
            einddatum_gepland: zaak.einddatum_gepland,
            einddatum: zaak.einddatum,
            uiterlijke_einddatum_afdoening: zaak.uiterlijke_einddatum_afdoening,
            publicatiedatum: zaak.publicatiedatum,
            communicatiekanaal: zaak.communicatiekanaal_naam.clone(),
            vertrouwelijkheidaanduiding: Some(zaak.vertrouwelijkheidaanduiding.code().to_string()),
            afgehandeld: !zaak.is_open(),
            archief_nominatie: zaak.archiefnominatie.map(|nominatie| nominatie.code().to_string()),
            archief_actiedatum: zaak.archiefactiedatum,
            ..ZaakZoekObject::default()
        };

        if let Some(initiator) = self.zgw.find_initiator_role_for_zaak(zaak).await? {
            object.initiator_identificatie = initiator.identificatienummer().map(str::to_string);
            object.initiator_type = Some(initiator.betrokkene_type.code().to_string());
        }

        for rol in clients.zrc.list_rollen(&zaak.url).await? {
            if let (Some(omschrijving), Some(identificatie)) =
                (rol.omschrijving.as_deref(), rol.identificatienummer())
            {
                object.add_betrokkene(omschrijving, identificatie);
            }
        }

        if let Some(groep) = self.zgw.find_groep_for_zaak(zaak).await? {
            object.groep_id = groep.identificatienummer().map(str::to_string);
            object.groep_naam = groep.naam().map(str::to_string);
        }
        if let Some(behandelaar) = self.zgw.find_behandelaar_medewerker_role_for_zaak(zaak).await? {
            object.behandelaar_gebruikersnaam = behandelaar.identificatienummer().map(str::to_string);
            object.behandelaar_naam = behandelaar.naam().map(str::to_string);
        }
        object.toegekend = object.behandelaar_gebruikersnaam.is_some();

        if let Some(verlenging) = zaak.verlenging.as_ref().filter(|_| zaak.is_verlengd()) {
            object.duur_verlenging = verlenging.duur.map(|duur| duur.to_string());
            object.reden_verlenging = Some(verlenging.reden.clone());
            object.set_indicatie(ZaakIndicatie::Verlengd, true);
        }
        if zaak.is_opgeschort() {
            object.reden_opschorting = zaak.opschorting_reden().map(str::to_string);
            object.set_indicatie(ZaakIndicatie::Opschorting, true);
        }
        object.set_indicatie(ZaakIndicatie::Deelzaak, zaak.is_deelzaak());
        object.set_indicatie(ZaakIndicatie::Hoofdzaak, zaak.is_hoofdzaak());

        let zaaktype = clients.ztc.read_zaaktype(&zaak.zaaktype).await?;
        object.zaaktype_uuid = Some(extract_uuid(&zaaktype.url)?.to_string());
        object.zaaktype_identificatie = Some(zaaktype.identificatie);
        object.zaaktype_omschrijving = Some(zaaktype.omschrijving);

        if let Some(status_url) = &zaak.status {
            let status = clients.zrc.read_status(status_url).await?;
            let statustype = clients.ztc.read_statustype(&status.statustype).await?;
            object.set_indicatie(
                ZaakIndicatie::Heropend,
                statustype.omschrijving == STATUSTYPE_OMSCHRIJVING_HEROPEND,
            );
            object.status_toelichting = status.statustoelichting;
            object.status_datum_gezet = Some(status.datum_status_gezet);
            object.status_eindstatus = statustype.is_eindstatus;
            object.statustype_omschrijving = Some(statustype.omschrijving);
        }

        object.aantal_openstaande_taken = self.tasks.count_open_tasks_for_zaak(zaak.uuid).await?;

        if let Some(resultaat_url) = &zaak.resultaat {
            let resultaat = clients.zrc.read_resultaat(resultaat_url).await?;
            let resultaattype = clients.ztc.read_resultaattype(&resultaat.resultaattype).await?;
            object.resultaattype_omschrijving = Some(resultaattype.omschrijving);
            object.resultaat_toelichting = resultaat.toelichting;
        }

        object.bag_object_ids = clients
            .zrc
            .list_zaakobjecten(&zaak.url)
            .await?
            .iter()
            .filter_map(|zaakobject| zaakobject.bag_object_id())
            .collect();

        Ok(object)
    }
}

#[async_trait]
impl ZoekObjectConverter for ZaakZoekObjectConverter {
    fn supports(&self, object_type: ZoekObjectType) -> bool {
        object_type == ZoekObjectType::Zaak
    }

    async fn convert(&self, id: &str) -> Result<Option<ZoekObject>, SearchError> {
        let zaak = self.zgw.clients().zrc.read_zaak(parse_uuid(id)?).await?;
        Ok(Some(ZoekObject::Zaak(self.convert_zaak(&zaak).await?)))
    }
}
