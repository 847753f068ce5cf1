use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::warn;
use uuid::Uuid;

use super::model::*;
use crate::zgw::http::ZgwHttpClient;
use crate::zgw::shared::{Page, ZgwError, ZgwService};

const CATALOGI: &str = "catalogi/api/v1/";

/// Read-only access to the catalogi API.
#[async_trait]
pub trait ZtcClient: Send + Sync {
    async fn read_zaaktype(&self, url: &str) -> Result<ZaakType, ZgwError>;
    async fn read_statustype(&self, url: &str) -> Result<StatusType, ZgwError>;
    async fn read_statustypen(&self, zaaktype_url: &str) -> Result<Vec<StatusType>, ZgwError>;
    async fn read_resultaattype(&self, url: &str) -> Result<ResultaatType, ZgwError>;
    async fn read_resultaattype_by_uuid(&self, uuid: Uuid) -> Result<ResultaatType, ZgwError>;
    async fn read_resultaattypen(&self, zaaktype_url: &str)
        -> Result<Vec<ResultaatType>, ZgwError>;
    async fn find_roltypen(
        &self,
        zaaktype_url: &str,
        generiek: OmschrijvingGeneriek,
    ) -> Result<Vec<RolType>, ZgwError>;
    async fn read_roltype(&self, url: &str) -> Result<RolType, ZgwError>;
    async fn read_besluittype(&self, url: &str) -> Result<BesluitType, ZgwError>;
    async fn read_informatieobjecttype(&self, url: &str)
        -> Result<InformatieobjectType, ZgwError>;
    async fn read_eigenschap(&self, zaaktype_url: &str, naam: &str)
        -> Result<Eigenschap, ZgwError>;

    /// The first roltype with the generic description; several is tolerated with a warning.
    async fn read_roltype_for_zaaktype(
        &self,
        zaaktype_url: &str,
        generiek: OmschrijvingGeneriek,
    ) -> Result<RolType, ZgwError> {
        let mut roltypen = self.find_roltypen(zaaktype_url, generiek).await?;
        if roltypen.len() > 1 {
            warn!(
                zaaktype = zaaktype_url,
                generiek = generiek.code(),
                count = roltypen.len(),
                "multiple roltypen found, using the first"
            );
        }
        if roltypen.is_empty() {
            return Err(ZgwError::not_found(
                ZgwService::Ztc,
                format!(
                    "roltype with omschrijving generiek '{}' for zaaktype '{}'",
                    generiek.code(),
                    zaaktype_url
                ),
            ));
        }
        Ok(roltypen.swap_remove(0))
    }
}

pub struct HttpZtcClient {
    http: ZgwHttpClient,
}

impl HttpZtcClient {
    pub fn new(http: ZgwHttpClient) -> Self {
        Self { http }
    }

    fn url(&self, path: &str) -> String {
        self.http.url(&format!("{CATALOGI}{path}"))
    }

    async fn read<T>(&self, url: &str) -> Result<T, ZgwError>
    where
        T: DeserializeOwned + Send,
    {
        self.http.get(ZgwService::Ztc, url, &[]).await
    }

    async fn list_all<T>(&self, path: &str, query: Vec<(&str, String)>) -> Result<Vec<T>, ZgwError>
    where
        T: DeserializeOwned + Send,
    {
        let mut page: Page<T> = self.http.get(ZgwService::Ztc, &self.url(path), &query).await?;
        let mut results = std::mem::take(&mut page.results);
        while let Some(next) = page.next.take() {
            page = self.http.get(ZgwService::Ztc, &next, &[]).await?;
            results.append(&mut page.results);
        }
        Ok(results)
    }
}

#[async_trait]
impl ZtcClient for HttpZtcClient {
    async fn read_zaaktype(&self, url: &str) -> Result<ZaakType, ZgwError> {
        self.read(url).await
    }

    async fn read_statustype(&self, url: &str) -> Result<StatusType, ZgwError> {
        self.read(url).await
    }

    async fn read_statustypen(&self, zaaktype_url: &str) -> Result<Vec<StatusType>, ZgwError> {
        self.list_all("statustypen", vec![("zaaktype", zaaktype_url.to_string())])
            .await
    }

    async fn read_resultaattype(&self, url: &str) -> Result<ResultaatType, ZgwError> {
        self.read(url).await
    }

    async fn read_resultaattype_by_uuid(&self, uuid: Uuid) -> Result<ResultaatType, ZgwError> {
        self.read(&self.url(&format!("resultaattypen/{uuid}"))).await
    }

    async fn read_resultaattypen(
        &self,
        zaaktype_url: &str,
    ) -> Result<Vec<ResultaatType>, ZgwError> {
        self.list_all("resultaattypen", vec![("zaaktype", zaaktype_url.to_string())])
            .await
    }

    async fn find_roltypen(
        &self,
        zaaktype_url: &str,
        generiek: OmschrijvingGeneriek,
    ) -> Result<Vec<RolType>, ZgwError> {
        self.list_all(
            "roltypen",
            vec![
                ("zaaktype", zaaktype_url.to_string()),
                ("omschrijvingGeneriek", generiek.code().to_string()),
            ],
        )
        .await
    }

    async fn read_roltype(&self, url: &str) -> Result<RolType, ZgwError> {
        self.read(url).await
    }

    async fn read_besluittype(&self, url: &str) -> Result<BesluitType, ZgwError> {
        self.read(url).await
    }

    async fn read_informatieobjecttype(
        &self,
        url: &str,
    ) -> Result<InformatieobjectType, ZgwError> {
        self.read(url).await
    }

    async fn read_eigenschap(&self, zaaktype_url: &str, naam: &str) -> Result<Eigenschap, ZgwError> {
        let eigenschappen: Vec<Eigenschap> = self
            .list_all("eigenschappen", vec![("zaaktype", zaaktype_url.to_string())])
            .await?;
        eigenschappen
            .into_iter()
            .find(|eigenschap| eigenschap.naam == naam)
            .ok_or_else(|| {
                ZgwError::not_found(
                    ZgwService::Ztc,
                    format!("eigenschap '{naam}' for zaaktype '{zaaktype_url}'"),
                )
            })
    }
}
