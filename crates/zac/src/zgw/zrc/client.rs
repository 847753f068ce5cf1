use async_trait::async_trait;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use super::model::*;
use crate::zgw::http::ZgwHttpClient;
use crate::zgw::shared::{Page, ZgwError, ZgwService, FIRST_PAGE_NUMBER};

const ZAKEN: &str = "zaken/api/v1/";

/// Query for the paged zaken listing.
#[derive(Debug, Clone, Default)]
pub struct ZaakListParameters {
    pub page: Option<u32>,
    pub ordering: Option<String>,
    pub identificatie: Option<String>,
    pub zaaktype: Option<String>,
}

impl ZaakListParameters {
    fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![(
            "page",
            self.page.unwrap_or(FIRST_PAGE_NUMBER).to_string(),
        )];
        if let Some(ordering) = &self.ordering {
            query.push(("ordering", ordering.clone()));
        }
        if let Some(identificatie) = &self.identificatie {
            query.push(("identificatie", identificatie.clone()));
        }
        if let Some(zaaktype) = &self.zaaktype {
            query.push(("zaaktype", zaaktype.clone()));
        }
        query
    }
}

/// Operations ZAC needs from the zaken API.
#[async_trait]
pub trait ZrcClient: Send + Sync {
    async fn read_zaak(&self, uuid: Uuid) -> Result<Zaak, ZgwError>;
    async fn read_zaak_by_url(&self, url: &str) -> Result<Zaak, ZgwError>;
    async fn list_zaken(&self, parameters: &ZaakListParameters) -> Result<Page<Zaak>, ZgwError>;
    async fn create_zaak(
        &self,
        zaak: &ZaakCreate,
        toelichting: Option<&str>,
    ) -> Result<Zaak, ZgwError>;
    async fn patch_zaak(
        &self,
        uuid: Uuid,
        patch: &ZaakPatch,
        toelichting: Option<&str>,
    ) -> Result<Zaak, ZgwError>;
    async fn close_zaak(
        &self,
        uuid: Uuid,
        afsluiten: &ZaakAfsluiten,
        toelichting: Option<&str>,
    ) -> Result<(), ZgwError>;

    async fn read_status(&self, url: &str) -> Result<Status, ZgwError>;
    async fn create_status(
        &self,
        status: &NewStatus,
        toelichting: Option<&str>,
    ) -> Result<Status, ZgwError>;

    async fn read_resultaat(&self, url: &str) -> Result<Resultaat, ZgwError>;
    async fn create_resultaat(
        &self,
        resultaat: &NewResultaat,
        toelichting: Option<&str>,
    ) -> Result<Resultaat, ZgwError>;
    async fn delete_resultaat(&self, uuid: Uuid, toelichting: Option<&str>)
        -> Result<(), ZgwError>;

    async fn list_rollen(&self, zaak_url: &str) -> Result<Vec<Rol>, ZgwError>;
    async fn create_rol(&self, rol: &NewRol, toelichting: Option<&str>) -> Result<Rol, ZgwError>;
    async fn delete_rol(&self, uuid: Uuid, toelichting: Option<&str>) -> Result<(), ZgwError>;

    async fn list_zaakeigenschappen(&self, zaak_uuid: Uuid)
        -> Result<Vec<ZaakEigenschap>, ZgwError>;
    async fn create_zaakeigenschap(
        &self,
        zaak_uuid: Uuid,
        eigenschap: &NewZaakEigenschap,
    ) -> Result<ZaakEigenschap, ZgwError>;
    async fn update_zaakeigenschap(
        &self,
        zaak_uuid: Uuid,
        eigenschap: &ZaakEigenschap,
    ) -> Result<ZaakEigenschap, ZgwError>;

    /// Links filtered by zaak URL, informatieobject URL, or both.
    async fn list_zaakinformatieobjecten(
        &self,
        zaak_url: Option<&str>,
        informatieobject_url: Option<&str>,
    ) -> Result<Vec<ZaakInformatieobject>, ZgwError>;
    async fn create_zaakinformatieobject(
        &self,
        link: &NewZaakInformatieobject,
        toelichting: Option<&str>,
    ) -> Result<ZaakInformatieobject, ZgwError>;
    async fn delete_zaakinformatieobject(
        &self,
        uuid: Uuid,
        toelichting: Option<&str>,
    ) -> Result<(), ZgwError>;

    async fn list_zaakobjecten(&self, zaak_url: &str) -> Result<Vec<Zaakobject>, ZgwError>;
}

pub struct HttpZrcClient {
    http: ZgwHttpClient,
}

impl HttpZrcClient {
    pub fn new(http: ZgwHttpClient) -> Self {
        Self { http }
    }

    fn url(&self, path: &str) -> String {
        self.http.url(&format!("{ZAKEN}{path}"))
    }

    /// Follows `next` links until the listing is exhausted.
    async fn collect_pages<T>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, ZgwError>
    where
        T: DeserializeOwned + Send,
    {
        let mut page: Page<T> = self.http.get(ZgwService::Zrc, url, query).await?;
        let mut results = std::mem::take(&mut page.results);
        while let Some(next) = page.next.take() {
            page = self.http.get(ZgwService::Zrc, &next, &[]).await?;
            results.append(&mut page.results);
        }
        Ok(results)
    }
}

#[async_trait]
impl ZrcClient for HttpZrcClient {
    async fn read_zaak(&self, uuid: Uuid) -> Result<Zaak, ZgwError> {
        self.http
            .get(ZgwService::Zrc, &self.url(&format!("zaken/{uuid}")), &[])
            .await
    }

    async fn read_zaak_by_url(&self, url: &str) -> Result<Zaak, ZgwError> {
        self.http.get(ZgwService::Zrc, url, &[]).await
    }

    async fn list_zaken(&self, parameters: &ZaakListParameters) -> Result<Page<Zaak>, ZgwError> {
        self.http
            .get(ZgwService::Zrc, &self.url("zaken"), &parameters.query())
            .await
    }

    async fn create_zaak(
        &self,
        zaak: &ZaakCreate,
        toelichting: Option<&str>,
    ) -> Result<Zaak, ZgwError> {
        self.http
            .post(ZgwService::Zrc, &self.url("zaken"), zaak, toelichting)
            .await
    }

    async fn patch_zaak(
        &self,
        uuid: Uuid,
        patch: &ZaakPatch,
        toelichting: Option<&str>,
    ) -> Result<Zaak, ZgwError> {
        self.http
            .patch(
                ZgwService::Zrc,
                &self.url(&format!("zaken/{uuid}")),
                patch,
                toelichting,
            )
            .await
    }

    async fn close_zaak(
        &self,
        uuid: Uuid,
        afsluiten: &ZaakAfsluiten,
        toelichting: Option<&str>,
    ) -> Result<(), ZgwError> {
        let _: serde_json::Value = self
            .http
            .post(
                ZgwService::Zrc,
                &self.url(&format!("zaken/{uuid}/afsluiten")),
                afsluiten,
                toelichting,
            )
            .await?;
        Ok(())
    }

    async fn read_status(&self, url: &str) -> Result<Status, ZgwError> {
        self.http.get(ZgwService::Zrc, url, &[]).await
    }

    async fn create_status(
        &self,
        status: &NewStatus,
        toelichting: Option<&str>,
    ) -> Result<Status, ZgwError> {
        self.http
            .post(ZgwService::Zrc, &self.url("statussen"), status, toelichting)
            .await
    }

    async fn read_resultaat(&self, url: &str) -> Result<Resultaat, ZgwError> {
        self.http.get(ZgwService::Zrc, url, &[]).await
    }

    async fn create_resultaat(
        &self,
        resultaat: &NewResultaat,
        toelichting: Option<&str>,
    ) -> Result<Resultaat, ZgwError> {
        self.http
            .post(ZgwService::Zrc, &self.url("resultaten"), resultaat, toelichting)
            .await
    }

    async fn delete_resultaat(
        &self,
        uuid: Uuid,
        toelichting: Option<&str>,
    ) -> Result<(), ZgwError> {
        self.http
            .delete(
                ZgwService::Zrc,
                &self.url(&format!("resultaten/{uuid}")),
                toelichting,
            )
            .await
    }

    async fn list_rollen(&self, zaak_url: &str) -> Result<Vec<Rol>, ZgwError> {
        self.collect_pages(
            &self.url("rollen"),
            &[
                ("zaak", zaak_url.to_string()),
                ("page", FIRST_PAGE_NUMBER.to_string()),
            ],
        )
        .await
    }

    async fn create_rol(&self, rol: &NewRol, toelichting: Option<&str>) -> Result<Rol, ZgwError> {
        self.http
            .post(ZgwService::Zrc, &self.url("rollen"), rol, toelichting)
            .await
    }

    async fn delete_rol(&self, uuid: Uuid, toelichting: Option<&str>) -> Result<(), ZgwError> {
        self.http
            .delete(
                ZgwService::Zrc,
                &self.url(&format!("rollen/{uuid}")),
                toelichting,
            )
            .await
    }

    async fn list_zaakeigenschappen(
        &self,
        zaak_uuid: Uuid,
    ) -> Result<Vec<ZaakEigenschap>, ZgwError> {
        self.http
            .get(
                ZgwService::Zrc,
                &self.url(&format!("zaken/{zaak_uuid}/zaakeigenschappen")),
                &[],
            )
            .await
    }

    async fn create_zaakeigenschap(
        &self,
        zaak_uuid: Uuid,
        eigenschap: &NewZaakEigenschap,
    ) -> Result<ZaakEigenschap, ZgwError> {
        self.http
            .post(
                ZgwService::Zrc,
                &self.url(&format!("zaken/{zaak_uuid}/zaakeigenschappen")),
                eigenschap,
                None,
            )
            .await
    }

    async fn update_zaakeigenschap(
        &self,
        zaak_uuid: Uuid,
        eigenschap: &ZaakEigenschap,
    ) -> Result<ZaakEigenschap, ZgwError> {
        self.http
            .put(
                ZgwService::Zrc,
                &self.url(&format!(
                    "zaken/{zaak_uuid}/zaakeigenschappen/{}",
                    eigenschap.uuid
                )),
                eigenschap,
                None,
            )
            .await
    }

    async fn list_zaakinformatieobjecten(
        &self,
        zaak_url: Option<&str>,
        informatieobject_url: Option<&str>,
    ) -> Result<Vec<ZaakInformatieobject>, ZgwError> {
        let mut query = Vec::new();
        if let Some(zaak) = zaak_url {
            query.push(("zaak", zaak.to_string()));
        }
        if let Some(informatieobject) = informatieobject_url {
            query.push(("informatieobject", informatieobject.to_string()));
        }
        self.http
            .get(ZgwService::Zrc, &self.url("zaakinformatieobjecten"), &query)
            .await
    }

    async fn create_zaakinformatieobject(
        &self,
        link: &NewZaakInformatieobject,
        toelichting: Option<&str>,
    ) -> Result<ZaakInformatieobject, ZgwError> {
        self.http
            .post(
                ZgwService::Zrc,
                &self.url("zaakinformatieobjecten"),
                link,
                toelichting,
            )
            .await
    }

    async fn delete_zaakinformatieobject(
        &self,
        uuid: Uuid,
        toelichting: Option<&str>,
    ) -> Result<(), ZgwError> {
        self.http
            .delete(
                ZgwService::Zrc,
                &self.url(&format!("zaakinformatieobjecten/{uuid}")),
                toelichting,
            )
            .await
    }

    async fn list_zaakobjecten(&self, zaak_url: &str) -> Result<Vec<Zaakobject>, ZgwError> {
        self.collect_pages(
            &self.url("zaakobjecten"),
            &[
                ("zaak", zaak_url.to_string()),
                ("page", FIRST_PAGE_NUMBER.to_string()),
            ],
        )
        .await
    }
}
