use async_trait::async_trait;
use uuid::Uuid;

use super::model::*;
use crate::zgw::http::ZgwHttpClient;
use crate::zgw::shared::{Page, ZgwError, ZgwService};

const DOCUMENTEN: &str = "documenten/api/v1/";

#[async_trait]
pub trait DrcClient: Send + Sync {
    async fn read_enkelvoudig_informatieobject(
        &self,
        uuid: Uuid,
    ) -> Result<EnkelvoudigInformatieobject, ZgwError>;
    async fn read_enkelvoudig_informatieobject_by_url(
        &self,
        url: &str,
    ) -> Result<EnkelvoudigInformatieobject, ZgwError>;
    async fn list_enkelvoudig_informatieobjecten(
        &self,
        page: u32,
    ) -> Result<Page<EnkelvoudigInformatieobject>, ZgwError>;
    async fn create_enkelvoudig_informatieobject(
        &self,
        document: &NewEnkelvoudigInformatieobject,
    ) -> Result<EnkelvoudigInformatieobject, ZgwError>;
    async fn patch_enkelvoudig_informatieobject(
        &self,
        uuid: Uuid,
        patch: &InformatieobjectPatch,
        toelichting: Option<&str>,
    ) -> Result<EnkelvoudigInformatieobject, ZgwError>;
    async fn delete_enkelvoudig_informatieobject(&self, uuid: Uuid) -> Result<(), ZgwError>;
    async fn create_gebruiksrechten(
        &self,
        gebruiksrechten: &Gebruiksrechten,
    ) -> Result<Gebruiksrechten, ZgwError>;
}

pub struct HttpDrcClient {
    http: ZgwHttpClient,
}

impl HttpDrcClient {
    pub fn new(http: ZgwHttpClient) -> Self {
        Self { http }
    }

    fn url(&self, path: &str) -> String {
        self.http.url(&format!("{DOCUMENTEN}{path}"))
    }
}

#[async_trait]
impl DrcClient for HttpDrcClient {
    async fn read_enkelvoudig_informatieobject(
        &self,
        uuid: Uuid,
    ) -> Result<EnkelvoudigInformatieobject, ZgwError> {
        self.http
            .get(
                ZgwService::Drc,
                &self.url(&format!("enkelvoudiginformatieobjecten/{uuid}")),
                &[],
            )
            .await
    }

    async fn read_enkelvoudig_informatieobject_by_url(
        &self,
        url: &str,
    ) -> Result<EnkelvoudigInformatieobject, ZgwError> {
        self.http.get(ZgwService::Drc, url, &[]).await
    }

    async fn list_enkelvoudig_informatieobjecten(
        &self,
        page: u32,
    ) -> Result<Page<EnkelvoudigInformatieobject>, ZgwError> {
        self.http
            .get(
                ZgwService::Drc,
                &self.url("enkelvoudiginformatieobjecten"),
                &[("page", page.to_string())],
            )
            .await
    }

    async fn create_enkelvoudig_informatieobject(
        &self,
        document: &NewEnkelvoudigInformatieobject,
    ) -> Result<EnkelvoudigInformatieobject, ZgwError> {
        self.http
            .post(
                ZgwService::Drc,
                &self.url("enkelvoudiginformatieobjecten"),
                document,
                None,
            )
            .await
    }

    async fn patch_enkelvoudig_informatieobject(
        &self,
        uuid: Uuid,
        patch: &InformatieobjectPatch,
        toelichting: Option<&str>,
    ) -> Result<EnkelvoudigInformatieobject, ZgwError> {
        self.http
            .patch(
                ZgwService::Drc,
                &self.url(&format!("enkelvoudiginformatieobjecten/{uuid}")),
                patch,
                toelichting,
            )
            .await
    }

    async fn delete_enkelvoudig_informatieobject(&self, uuid: Uuid) -> Result<(), ZgwError> {
        self.http
            .delete(
                ZgwService::Drc,
                &self.url(&format!("enkelvoudiginformatieobjecten/{uuid}")),
                None,
            )
            .await
    }

    async fn create_gebruiksrechten(
        &self,
        gebruiksrechten: &Gebruiksrechten,
    ) -> Result<Gebruiksrechten, ZgwError> {
        self.http
            .post(
                ZgwService::Drc,
                &self.url("gebruiksrechten"),
                gebruiksrechten,
                None,
            )
            .await
    }
}
