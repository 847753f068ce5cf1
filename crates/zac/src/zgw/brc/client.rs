use async_trait::async_trait;
use uuid::Uuid;

use super::model::*;
use crate::zgw::http::ZgwHttpClient;
use crate::zgw::shared::{ZgwError, ZgwService};

const BESLUITEN: &str = "besluiten/api/v1/";

#[async_trait]
pub trait BrcClient: Send + Sync {
    async fn read_besluit(&self, uuid: Uuid) -> Result<Besluit, ZgwError>;
    async fn list_besluiten(&self, zaak_url: &str) -> Result<Vec<Besluit>, ZgwError>;
    async fn create_besluit(&self, besluit: &NewBesluit) -> Result<Besluit, ZgwError>;
    async fn update_besluit(
        &self,
        besluit: &Besluit,
        toelichting: Option<&str>,
    ) -> Result<Besluit, ZgwError>;
    async fn list_besluitinformatieobjecten(
        &self,
        besluit_url: &str,
    ) -> Result<Vec<BesluitInformatieobject>, ZgwError>;
    async fn create_besluitinformatieobject(
        &self,
        link: &NewBesluitInformatieobject,
        toelichting: Option<&str>,
    ) -> Result<BesluitInformatieobject, ZgwError>;
    async fn delete_besluitinformatieobject(
        &self,
        uuid: Uuid,
        toelichting: Option<&str>,
    ) -> Result<(), ZgwError>;
    async fn is_informatieobject_gekoppeld_aan_besluit(
        &self,
        informatieobject_url: &str,
    ) -> Result<bool, ZgwError>;
}

pub struct HttpBrcClient {
    http: ZgwHttpClient,
}

impl HttpBrcClient {
    pub fn new(http: ZgwHttpClient) -> Self {
        Self { http }
    }

    fn url(&self, path: &str) -> String {
        self.http.url(&format!("{BESLUITEN}{path}"))
    }
}

#[async_trait]
impl BrcClient for HttpBrcClient {
    async fn read_besluit(&self, uuid: Uuid) -> Result<Besluit, ZgwError> {
        self.http
            .get(ZgwService::Brc, &self.url(&format!("besluiten/{uuid}")), &[])
            .await
    }

    async fn list_besluiten(&self, zaak_url: &str) -> Result<Vec<Besluit>, ZgwError> {
        let page: crate::zgw::shared::Page<Besluit> = self
            .http
            .get(
                ZgwService::Brc,
                &self.url("besluiten"),
                &[("zaak", zaak_url.to_string())],
            )
            .await?;
        Ok(page.results)
    }

    async fn create_besluit(&self, besluit: &NewBesluit) -> Result<Besluit, ZgwError> {
        self.http
            .post(ZgwService::Brc, &self.url("besluiten"), besluit, None)
            .await
    }

    async fn update_besluit(
        &self,
        besluit: &Besluit,
        toelichting: Option<&str>,
    ) -> Result<Besluit, ZgwError> {
        self.http
            .put(ZgwService::Brc, &besluit.url, besluit, toelichting)
            .await
    }

    async fn list_besluitinformatieobjecten(
        &self,
        besluit_url: &str,
    ) -> Result<Vec<BesluitInformatieobject>, ZgwError> {
        self.http
            .get(
                ZgwService::Brc,
                &self.url("besluitinformatieobjecten"),
                &[("besluit", besluit_url.to_string())],
            )
            .await
    }

    async fn create_besluitinformatieobject(
        &self,
        link: &NewBesluitInformatieobject,
        toelichting: Option<&str>,
    ) -> Result<BesluitInformatieobject, ZgwError> {
        self.http
            .post(
                ZgwService::Brc,
                &self.url("besluitinformatieobjecten"),
                link,
                toelichting,
            )
            .await
    }

    async fn delete_besluitinformatieobject(
        &self,
        uuid: Uuid,
        toelichting: Option<&str>,
    ) -> Result<(), ZgwError> {
        self.http
            .delete(
                ZgwService::Brc,
                &self.url(&format!("besluitinformatieobjecten/{uuid}")),
                toelichting,
            )
            .await
    }

    async fn is_informatieobject_gekoppeld_aan_besluit(
        &self,
        informatieobject_url: &str,
    ) -> Result<bool, ZgwError> {
        let links: Vec<BesluitInformatieobject> = self
            .http
            .get(
                ZgwService::Brc,
                &self.url("besluitinformatieobjecten"),
                &[("informatieobject", informatieobject_url.to_string())],
            )
            .await?;
        Ok(!links.is_empty())
    }
}
