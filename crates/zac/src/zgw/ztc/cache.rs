use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use moka::future::Cache;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use super::client::ZtcClient;
use super::model::*;
use crate::config::CacheConfig;
use crate::zgw::shared::ZgwError;

/// Hit/miss counters for one of the catalogue caches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheStatistics {
    pub name: &'static str,
    pub hits: u64,
    pub misses: u64,
    pub entries: u64,
}

struct CountingCache<V> {
    name: &'static str,
    cache: Cache<String, V>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<V> CountingCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn new(name: &'static str, config: &CacheConfig) -> Self {
        Self {
            name,
            cache: Cache::builder()
                .max_capacity(config.max_entries)
                .time_to_idle(config.time_to_idle)
                .build(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    async fn get_or_load<F>(&self, key: String, load: F) -> Result<V, ZgwError>
    where
        F: Future<Output = Result<V, ZgwError>>,
    {
        if let Some(value) = self.cache.get(&key).await {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(value);
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        let value = load.await?;
        self.cache.insert(key, value.clone()).await;
        Ok(value)
    }

    fn clear(&self) {
        self.cache.invalidate_all();
    }

    async fn statistics(&self) -> CacheStatistics {
        self.cache.run_pending_tasks().await;
        CacheStatistics {
            name: self.name,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.cache.entry_count(),
        }
    }
}

/// Read-through cache in front of the catalogi API; catalogue data changes rarely so
/// entries live until they have been idle for the configured period.
pub struct CachingZtcClient<C> {
    inner: C,
    zaaktypen: CountingCache<ZaakType>,
    statustype: CountingCache<StatusType>,
    statustypen: CountingCache<Vec<StatusType>>,
    resultaattype: CountingCache<ResultaatType>,
    resultaattypen: CountingCache<Vec<ResultaatType>>,
    roltype: CountingCache<RolType>,
    roltypen: CountingCache<Vec<RolType>>,
    besluittype: CountingCache<BesluitType>,
    informatieobjecttype: CountingCache<InformatieobjectType>,
    eigenschap: CountingCache<Eigenschap>,
    cleared_at: Mutex<DateTime<Utc>>,
}

impl<C> CachingZtcClient<C>
where
    C: ZtcClient,
{
    pub fn new(inner: C, config: &CacheConfig) -> Self {
        Self {
            inner,
            zaaktypen: CountingCache::new("ztc-zaaktype", config),
            statustype: CountingCache::new("ztc-statustype", config),
            statustypen: CountingCache::new("ztc-statustypen", config),
            resultaattype: CountingCache::new("ztc-resultaattype", config),
            resultaattypen: CountingCache::new("ztc-resultaattypen", config),
            roltype: CountingCache::new("ztc-roltype", config),
            roltypen: CountingCache::new("ztc-roltypen", config),
            besluittype: CountingCache::new("ztc-besluittype", config),
            informatieobjecttype: CountingCache::new("ztc-informatieobjecttype", config),
            eigenschap: CountingCache::new("ztc-eigenschap", config),
            cleared_at: Mutex::new(Utc::now()),
        }
    }
}

/// Administrative view on the catalogue caches, exposed through the admin endpoints.
#[async_trait]
pub trait ZtcCacheAdmin: Send + Sync {
    /// Empties every cache and returns the new cache time.
    fn clear_caches(&self) -> DateTime<Utc>;

    /// Moment of the last `clear_caches`, or of construction.
    fn cache_time(&self) -> DateTime<Utc>;

    async fn cache_statistics(&self) -> Vec<CacheStatistics>;
}

#[async_trait]
impl<C> ZtcCacheAdmin for CachingZtcClient<C>
where
    C: ZtcClient,
{
    fn clear_caches(&self) -> DateTime<Utc> {
        self.zaaktypen.clear();
        self.statustype.clear();
        self.statustypen.clear();
        self.resultaattype.clear();
        self.resultaattypen.clear();
        self.roltype.clear();
        self.roltypen.clear();
        self.besluittype.clear();
        self.informatieobjecttype.clear();
        self.eigenschap.clear();

        let now = Utc::now();
        *self.cleared_at.lock().expect("cache clock mutex poisoned") = now;
        info!("ztc caches cleared");
        now
    }

    fn cache_time(&self) -> DateTime<Utc> {
        *self.cleared_at.lock().expect("cache clock mutex poisoned")
    }

    async fn cache_statistics(&self) -> Vec<CacheStatistics> {
        vec![
            self.zaaktypen.statistics().await,
            self.statustype.statistics().await,
            self.statustypen.statistics().await,
            self.resultaattype.statistics().await,
            self.resultaattypen.statistics().await,
            self.roltype.statistics().await,
            self.roltypen.statistics().await,
            self.besluittype.statistics().await,
            self.informatieobjecttype.statistics().await,
            self.eigenschap.statistics().await,
        ]
    }
}

#[async_trait]
impl<C> ZtcClient for CachingZtcClient<C>
where
    C: ZtcClient,
{
    async fn read_zaaktype(&self, url: &str) -> Result<ZaakType, ZgwError> {
        self.zaaktypen
            .get_or_load(url.to_string(), self.inner.read_zaaktype(url))
            .await
    }

    async fn read_statustype(&self, url: &str) -> Result<StatusType, ZgwError> {
        self.statustype
            .get_or_load(url.to_string(), self.inner.read_statustype(url))
            .await
    }

    async fn read_statustypen(&self, zaaktype_url: &str) -> Result<Vec<StatusType>, ZgwError> {
        self.statustypen
            .get_or_load(
                zaaktype_url.to_string(),
                self.inner.read_statustypen(zaaktype_url),
            )
            .await
    }

    async fn read_resultaattype(&self, url: &str) -> Result<ResultaatType, ZgwError> {
        self.resultaattype
            .get_or_load(url.to_string(), self.inner.read_resultaattype(url))
            .await
    }

    async fn read_resultaattype_by_uuid(&self, uuid: Uuid) -> Result<ResultaatType, ZgwError> {
        self.resultaattype
            .get_or_load(
                uuid.to_string(),
                self.inner.read_resultaattype_by_uuid(uuid),
            )
            .await
    }

    async fn read_resultaattypen(
        &self,
        zaaktype_url: &str,
    ) -> Result<Vec<ResultaatType>, ZgwError> {
        self.resultaattypen
            .get_or_load(
                zaaktype_url.to_string(),
                self.inner.read_resultaattypen(zaaktype_url),
            )
            .await
    }

    async fn find_roltypen(
        &self,
        zaaktype_url: &str,
        generiek: OmschrijvingGeneriek,
    ) -> Result<Vec<RolType>, ZgwError> {
        self.roltypen
            .get_or_load(
                format!("{zaaktype_url}|{}", generiek.code()),
                self.inner.find_roltypen(zaaktype_url, generiek),
            )
            .await
    }

    async fn read_roltype(&self, url: &str) -> Result<RolType, ZgwError> {
        self.roltype
            .get_or_load(url.to_string(), self.inner.read_roltype(url))
            .await
    }

    async fn read_besluittype(&self, url: &str) -> Result<BesluitType, ZgwError> {
        self.besluittype
            .get_or_load(url.to_string(), self.inner.read_besluittype(url))
            .await
    }

    async fn read_informatieobjecttype(
        &self,
        url: &str,
    ) -> Result<InformatieobjectType, ZgwError> {
        self.informatieobjecttype
            .get_or_load(url.to_string(), self.inner.read_informatieobjecttype(url))
            .await
    }

    async fn read_eigenschap(&self, zaaktype_url: &str, naam: &str) -> Result<Eigenschap, ZgwError> {
        self.eigenschap
            .get_or_load(
                format!("{zaaktype_url}|{naam}"),
                self.inner.read_eigenschap(zaaktype_url, naam),
            )
            .await
    }
}
