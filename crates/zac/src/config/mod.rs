use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub zgw: ZgwConfig,
    pub opa: OpaConfig,
    pub solr: SolrConfig,
    pub ztc_cache: CacheConfig,
    pub organisatie: OrganisatieConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let api_url = base_url(
            "ZGW_API_URL",
            env::var("ZGW_API_URL").unwrap_or_else(|_| "http://localhost:8000/".to_string()),
        )?;
        let zgw = ZgwConfig {
            api_url,
            client_id: env::var("ZGW_API_CLIENT_ID").unwrap_or_else(|_| "zac_client".to_string()),
            secret: env::var("ZGW_API_SECRET").unwrap_or_default(),
        };

        let opa = OpaConfig {
            api_url: base_url(
                "OPA_API_URL",
                env::var("OPA_API_URL").unwrap_or_else(|_| "http://localhost:8181/".to_string()),
            )?,
        };

        let solr = SolrConfig {
            url: base_url(
                "SOLR_URL",
                env::var("SOLR_URL").unwrap_or_else(|_| "http://localhost:8983/".to_string()),
            )?,
            core: env::var("SOLR_CORE").unwrap_or_else(|_| "zac".to_string()),
        };

        let ztc_cache = CacheConfig {
            max_entries: number("ZTC_CACHE_MAX_ENTRIES", 20)?,
            time_to_idle: Duration::from_secs(number("ZTC_CACHE_TTL_SECONDS", 3600)?),
        };

        let organisatie = OrganisatieConfig {
            bronorganisatie: env::var("ZAC_BRONORGANISATIE")
                .unwrap_or_else(|_| "123443210".to_string()),
            verantwoordelijke_organisatie: env::var("ZAC_VERANTWOORDELIJKE_ORGANISATIE")
                .unwrap_or_else(|_| "316245124".to_string()),
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            zgw,
            opa,
            solr,
            ztc_cache,
            organisatie,
        })
    }
}

fn number(key: &'static str, default: u64) -> Result<u64, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidNumber { key, value: raw }),
        Err(_) => Ok(default),
    }
}

/// Normalises a base URL so relative resource paths can be appended.
fn base_url(key: &'static str, raw: String) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::InvalidUrl {
            key,
            value: raw.clone(),
        });
    }
    if trimmed.ends_with('/') {
        Ok(trimmed.to_string())
    } else {
        Ok(format!("{trimmed}/"))
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Connection settings shared by the zaken, catalogi, documenten and besluiten APIs.
#[derive(Clone)]
pub struct ZgwConfig {
    pub api_url: String,
    pub client_id: String,
    pub secret: String,
}

impl fmt::Debug for ZgwConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZgwConfig")
            .field("api_url", &self.api_url)
            .field("client_id", &self.client_id)
            .field("secret", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct OpaConfig {
    pub api_url: String,
}

#[derive(Debug, Clone)]
pub struct SolrConfig {
    pub url: String,
    pub core: String,
}

/// Bounds for the catalogue read-through caches.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub max_entries: u64,
    pub time_to_idle: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 20,
            time_to_idle: Duration::from_secs(3600),
        }
    }
}

/// RSIN numbers stamped on zaken and besluiten created by this service.
#[derive(Debug, Clone)]
pub struct OrganisatieConfig {
    pub bronorganisatie: String,
    pub verantwoordelijke_organisatie: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { key: &'static str, value: String },
    InvalidUrl { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { key, value } => {
                write!(f, "{key} must be a non-negative integer, got '{value}'")
            }
            ConfigError::InvalidUrl { key, value } => {
                write!(f, "{key} must be an http(s) URL, got '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidNumber { .. }
            | ConfigError::InvalidUrl { .. } => None,
        }
    }
}
