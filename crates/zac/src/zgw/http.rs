use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::shared::{ZgwError, ZgwService};
use crate::config::ZgwConfig;

/// Header carrying the explanation that the ZGW audit trail records for a mutation.
pub const AUDIT_TOELICHTING_HEADER: &str = "X-Audit-Toelichting";

const CRS: &str = "EPSG:4326";
const USER_REPRESENTATION: &str = "Zaakafhandelcomponent";

#[derive(Debug, Serialize)]
struct ZgwClaims<'a> {
    iss: &'a str,
    iat: i64,
    client_id: &'a str,
    user_id: &'a str,
    user_representation: &'a str,
}

/// Shared transport for the ZGW APIs: JWT bearer authentication, CRS headers for the
/// zaken API and status-to-error mapping.
#[derive(Clone)]
pub struct ZgwHttpClient {
    client: Client,
    base_url: String,
    client_id: String,
    secret: String,
}

impl ZgwHttpClient {
    pub fn new(config: &ZgwConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: &ZgwConfig) -> Self {
        Self {
            client,
            base_url: config.api_url.clone(),
            client_id: config.client_id.clone(),
            secret: config.secret.clone(),
        }
    }

    /// Absolute URL for a path relative to the configured ZGW base URL.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }

    pub async fn get<T>(
        &self,
        service: ZgwService,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, ZgwError>
    where
        T: DeserializeOwned,
    {
        let request = self.client.get(url).query(query);
        let response = self.send(service, url, request, None).await?;
        decode(service, response).await
    }

    pub async fn post<B, T>(
        &self,
        service: ZgwService,
        url: &str,
        body: &B,
        toelichting: Option<&str>,
    ) -> Result<T, ZgwError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.client.post(url).json(body);
        let response = self.send(service, url, request, toelichting).await?;
        decode(service, response).await
    }

    pub async fn put<B, T>(
        &self,
        service: ZgwService,
        url: &str,
        body: &B,
        toelichting: Option<&str>,
    ) -> Result<T, ZgwError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.client.put(url).json(body);
        let response = self.send(service, url, request, toelichting).await?;
        decode(service, response).await
    }

    pub async fn patch<B, T>(
        &self,
        service: ZgwService,
        url: &str,
        body: &B,
        toelichting: Option<&str>,
    ) -> Result<T, ZgwError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.client.patch(url).json(body);
        let response = self.send(service, url, request, toelichting).await?;
        decode(service, response).await
    }

    pub async fn delete(
        &self,
        service: ZgwService,
        url: &str,
        toelichting: Option<&str>,
    ) -> Result<(), ZgwError> {
        let request = self.client.delete(url);
        self.send(service, url, request, toelichting).await?;
        Ok(())
    }

    fn bearer_token(&self) -> Result<String, ZgwError> {
        let claims = ZgwClaims {
            iss: &self.client_id,
            iat: Utc::now().timestamp(),
            client_id: &self.client_id,
            user_id: &self.client_id,
            user_representation: USER_REPRESENTATION,
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|err| ZgwError::Token(err.to_string()))
    }

    async fn send(
        &self,
        service: ZgwService,
        url: &str,
        request: RequestBuilder,
        toelichting: Option<&str>,
    ) -> Result<Response, ZgwError> {
        let mut request = request.bearer_auth(self.bearer_token()?);
        if service == ZgwService::Zrc {
            request = request.header("Accept-Crs", CRS).header("Content-Crs", CRS);
        }
        if let Some(toelichting) = toelichting {
            request = request.header(AUDIT_TOELICHTING_HEADER, toelichting);
        }

        let response = request
            .send()
            .await
            .map_err(|source| ZgwError::Http { service, source })?;

        let status = response.status();
        debug!(%service, %url, status = status.as_u16(), "zgw response");

        if status == StatusCode::NOT_FOUND {
            return Err(ZgwError::not_found(service, url));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ZgwError::Status {
                service,
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

async fn decode<T>(service: ZgwService, response: Response) -> Result<T, ZgwError>
where
    T: DeserializeOwned,
{
    let bytes = response
        .bytes()
        .await
        .map_err(|source| ZgwError::Http { service, source })?;
    serde_json::from_slice(&bytes).map_err(|err| ZgwError::Decode {
        service,
        message: err.to_string(),
    })
}
