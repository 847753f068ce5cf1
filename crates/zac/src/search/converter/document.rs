use async_trait::async_trait;
use std::sync::Arc;

use super::{parse_uuid, ZoekObjectConverter};
use crate::document::DocumentLockService;
use crate::identity::IdentityService;
use crate::search::model::{DocumentIndicatie, DocumentZoekObject, ZoekObject, ZoekObjectType};
use crate::search::SearchError;
use crate::zgw::drc::EnkelvoudigInformatieobject;
use crate::zgw::{extract_uuid, ZgwClients};

pub struct DocumentZoekObjectConverter {
    zgw: ZgwClients,
    locks: Arc<dyn DocumentLockService>,
    identity: Arc<dyn IdentityService>,
}

impl DocumentZoekObjectConverter {
    pub fn new(
        zgw: ZgwClients,
        locks: Arc<dyn DocumentLockService>,
        identity: Arc<dyn IdentityService>,
    ) -> Self {
        Self {
            zgw,
            locks,
            identity,
        }
    }

    /// Documents that are not linked to any zaak are not searchable.
    pub async fn convert_document(
        &self,
        document: &EnkelvoudigInformatieobject,
    ) -> Result<Option<DocumentZoekObject>, SearchError> {
        let links = self
            .zgw
            .zrc
            .list_zaakinformatieobjecten(None, Some(&document.url))
            .await?;
        let Some(link) = links.first() else {
            return Ok(None);
        };
        let document_uuid = document.uuid()?;
        let zaak = self.zgw.zrc.read_zaak_by_url(&link.zaak).await?;
        let zaaktype = self.zgw.ztc.read_zaaktype(&zaak.zaaktype).await?;
        let informatieobjecttype = self
            .zgw
            .ztc
            .read_informatieobjecttype(&document.informatieobjecttype)
            .await?;

        let ondertekening = document.ondertekening.as_ref().filter(|_| document.is_ondertekend());
        let mut object = DocumentZoekObject {
            id: document_uuid.to_string(),
            object_type: Some(ZoekObjectType::Document),
            identificatie: document.identificatie.clone(),
            titel: document.titel.clone(),
            beschrijving: document.beschrijving.clone(),
            zaaktype_uuid: Some(extract_uuid(&zaaktype.url)?.to_string()),
            zaaktype_identificatie: Some(zaaktype.identificatie),
            zaaktype_omschrijving: Some(zaaktype.omschrijving),
            zaak_identificatie: Some(zaak.identificatie.clone()),
            zaak_uuid: Some(zaak.uuid.to_string()),
            zaak_afgehandeld: !zaak.is_open(),
            creatiedatum: Some(document.creatiedatum),
            registratiedatum: Some(document.begin_registratie),
            ontvangstdatum: document.ontvangstdatum,
            verzenddatum: document.verzenddatum,
            ondertekening_soort: ondertekening.map(|ondertekening| ondertekening.soort.clone()),
            ondertekening_datum: ondertekening.and_then(|ondertekening| ondertekening.datum),
            vertrouwelijkheidaanduiding: Some(
                document.vertrouwelijkheidaanduiding.code().to_string(),
            ),
            auteur: Some(document.auteur.clone()),
            status: document.status.map(|status| status.code().to_string()),
            formaat: document.formaat.clone(),
            versie: document.versie,
            bestandsnaam: document.bestandsnaam.clone(),
            bestandsomvang: document.bestandsomvang,
            document_type: Some(informatieobjecttype.omschrijving),
            ..DocumentZoekObject::default()
        };

        object.set_indicatie(DocumentIndicatie::Ondertekend, ondertekening.is_some());
        object.set_indicatie(
            DocumentIndicatie::Gebruiksrecht,
            document.indicatie_gebruiksrecht.unwrap_or(false),
        );
        object.set_indicatie(DocumentIndicatie::Verzonden, document.verzenddatum.is_some());
        let gekoppeld = self
            .zgw
            .brc
            .is_informatieobject_gekoppeld_aan_besluit(&document.url)
            .await?;
        object.set_indicatie(DocumentIndicatie::Besluit, gekoppeld);

        if document.locked {
            object.set_indicatie(DocumentIndicatie::Vergrendeld, true);
            if let Some(lock) = self.locks.find_lock(document_uuid).await? {
                let user = self.identity.read_user(&lock.user_id).await?;
                object.vergrendeld_door_naam = Some(user.full_name());
                object.vergrendeld_door_gebruikersnaam = Some(lock.user_id);
            }
        }

        Ok(Some(object))
    }
}

#[async_trait]
impl ZoekObjectConverter for DocumentZoekObjectConverter {
    fn supports(&self, object_type: ZoekObjectType) -> bool {
        object_type == ZoekObjectType::Document
    }

    async fn convert(&self, id: &str) -> Result<Option<ZoekObject>, SearchError> {
        let document = self
            .zgw
            .drc
            .read_enkelvoudig_informatieobject(parse_uuid(id)?)
            .await?;
        Ok(self
            .convert_document(&document)
            .await?
            .map(ZoekObject::Document))
    }
}
