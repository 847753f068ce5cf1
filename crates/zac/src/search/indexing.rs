use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use tracing::{info, warn};
use uuid::Uuid;

use super::converter::ZoekObjectConverter;
use super::model::{ZoekObject, ZoekObjectType};
use super::solr::SearchIndex;
use super::SearchError;
use crate::workflow::TaskService;
use crate::zgw::zrc::ZaakListParameters;
use crate::zgw::{ZgwClients, FIRST_PAGE_NUMBER};

pub const TASKS_PER_PAGE: usize = 50;
const ZAKEN_ORDERING: &str = "-identificatie";

/// Marks a reindex of one object type as running until dropped.
pub(crate) struct ReindexGuard {
    in_progress: Arc<Mutex<HashSet<ZoekObjectType>>>,
    object_type: ZoekObjectType,
}

impl Drop for ReindexGuard {
    fn drop(&mut self) {
        self.in_progress
            .lock()
            .expect("reindex mutex poisoned")
            .remove(&self.object_type);
    }
}

#[derive(Clone)]
pub struct IndexingService {
    converters: Vec<Arc<dyn ZoekObjectConverter>>,
    index: Arc<dyn SearchIndex>,
    zgw: ZgwClients,
    tasks: Arc<dyn TaskService>,
    in_progress: Arc<Mutex<HashSet<ZoekObjectType>>>,
}

impl IndexingService {
    pub fn new(
        converters: Vec<Arc<dyn ZoekObjectConverter>>,
        index: Arc<dyn SearchIndex>,
        zgw: ZgwClients,
        tasks: Arc<dyn TaskService>,
    ) -> Self {
        Self {
            converters,
            index,
            zgw,
            tasks,
            in_progress: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    fn converter(
        &self,
        object_type: ZoekObjectType,
    ) -> Result<&Arc<dyn ZoekObjectConverter>, SearchError> {
        self.converters
            .iter()
            .find(|converter| converter.supports(object_type))
            .ok_or(SearchError::NoConverter(object_type))
    }

    /// Converts and stores the given objects; objects that convert to nothing are skipped.
    pub async fn index_direct(
        &self,
        ids: &[String],
        object_type: ZoekObjectType,
        commit: bool,
    ) -> Result<usize, SearchError> {
        let converter = self.converter(object_type)?;
        let mut objects = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(object) = converter.convert(id).await? {
                objects.push(object);
            }
        }
        self.store(objects, commit).await
    }

    /// Stores what converts and returns the ids of the stored documents.
    async fn index_lenient(
        &self,
        ids: &[String],
        object_type: ZoekObjectType,
    ) -> Result<Vec<String>, SearchError> {
        let converter = self.converter(object_type)?;
        let mut objects = Vec::with_capacity(ids.len());
        for id in ids {
            match converter.convert(id).await {
                Ok(Some(object)) => objects.push(object),
                Ok(None) => {}
                Err(error) => {
                    warn!(%object_type, id = %id, error = %error, "skipping object during reindex")
                }
            }
        }
        let stored = objects.iter().map(|object| object.id().to_string()).collect();
        self.store(objects, false).await?;
        Ok(stored)
    }

    async fn store(&self, objects: Vec<ZoekObject>, commit: bool) -> Result<usize, SearchError> {
        let count = objects.len();
        self.index.add(&objects).await?;
        if commit {
            self.index.commit().await?;
        }
        Ok(count)
    }

    /// Rebuilds the index for one object type. Documents stay searchable while the
    /// rebuild runs; the ones that were not rebuilt are removed afterwards. Returns
    /// `None` when a reindex of that type is already running.
    pub async fn reindex(&self, object_type: ZoekObjectType) -> Result<Option<usize>, SearchError> {
        let Some(_guard) = self.start_reindex(object_type) else {
            info!(%object_type, "reindex already in progress");
            return Ok(None);
        };
        info!(%object_type, "reindex started");

        let previously_indexed = self.index.list_ids(object_type).await?;
        let rebuilt = match object_type {
            ZoekObjectType::Zaak => self.reindex_zaken().await?,
            ZoekObjectType::Document => self.reindex_documenten().await?,
            ZoekObjectType::Taak => self.reindex_taken().await?,
        };
        let stale: Vec<String> = previously_indexed
            .into_iter()
            .filter(|id| !rebuilt.contains(id))
            .collect();
        self.index.delete_by_ids(&stale).await?;
        self.index.commit().await?;

        let count = rebuilt.len();
        info!(%object_type, count, stale = stale.len(), "reindex finished");
        Ok(Some(count))
    }

    pub(crate) fn start_reindex(&self, object_type: ZoekObjectType) -> Option<ReindexGuard> {
        let mut running = self.in_progress.lock().expect("reindex mutex poisoned");
        if !running.insert(object_type) {
            return None;
        }
        Some(ReindexGuard {
            in_progress: Arc::clone(&self.in_progress),
            object_type,
        })
    }

    pub fn is_reindexing(&self, object_type: ZoekObjectType) -> bool {
        self.in_progress
            .lock()
            .expect("reindex mutex poisoned")
            .contains(&object_type)
    }

    async fn reindex_zaken(&self) -> Result<HashSet<String>, SearchError> {
        let mut parameters = ZaakListParameters {
            page: Some(FIRST_PAGE_NUMBER),
            ordering: Some(ZAKEN_ORDERING.to_string()),
            ..ZaakListParameters::default()
        };
        let mut rebuilt = HashSet::new();
        loop {
            let page = self.zgw.zrc.list_zaken(&parameters).await?;
            let ids: Vec<String> = page.results.iter().map(|zaak| zaak.uuid.to_string()).collect();
            rebuilt.extend(self.index_lenient(&ids, ZoekObjectType::Zaak).await?);
            if !page.has_next() {
                return Ok(rebuilt);
            }
            parameters.page = parameters.page.map(|number| number + 1);
        }
    }

    async fn reindex_documenten(&self) -> Result<HashSet<String>, SearchError> {
        let mut page_number = FIRST_PAGE_NUMBER;
        let mut rebuilt = HashSet::new();
        loop {
            let page = self
                .zgw
                .drc
                .list_enkelvoudig_informatieobjecten(page_number)
                .await?;
            let ids = page
                .results
                .iter()
                .map(|document| document.uuid().map(|uuid| uuid.to_string()))
                .collect::<Result<Vec<_>, _>>()?;
            rebuilt.extend(self.index_lenient(&ids, ZoekObjectType::Document).await?);
            if !page.has_next() {
                return Ok(rebuilt);
            }
            page_number += 1;
        }
    }

    async fn reindex_taken(&self) -> Result<HashSet<String>, SearchError> {
        let mut first = 0;
        let mut rebuilt = HashSet::new();
        loop {
            let tasks = self.tasks.list_open_tasks(first, TASKS_PER_PAGE).await?;
            let ids: Vec<String> = tasks.iter().map(|task| task.id.clone()).collect();
            rebuilt.extend(self.index_lenient(&ids, ZoekObjectType::Taak).await?);
            if tasks.len() < TASKS_PER_PAGE {
                return Ok(rebuilt);
            }
            first += TASKS_PER_PAGE;
        }
    }

    pub async fn add_or_update_zaak(
        &self,
        zaak_uuid: Uuid,
        include_tasks: bool,
    ) -> Result<(), SearchError> {
        self.index_direct(&[zaak_uuid.to_string()], ZoekObjectType::Zaak, false)
            .await?;
        if include_tasks {
            let ids: Vec<String> = self
                .tasks
                .list_open_tasks_for_zaak(zaak_uuid)
                .await?
                .into_iter()
                .map(|task| task.id)
                .collect();
            self.index_direct(&ids, ZoekObjectType::Taak, false).await?;
        }
        self.commit().await
    }

    pub async fn add_or_update_informatieobject(&self, uuid: Uuid) -> Result<(), SearchError> {
        self.index_direct(&[uuid.to_string()], ZoekObjectType::Document, true)
            .await
            .map(|_| ())
    }

    pub async fn add_or_update_taak(&self, task_id: &str) -> Result<(), SearchError> {
        self.index_direct(&[task_id.to_string()], ZoekObjectType::Taak, true)
            .await
            .map(|_| ())
    }

    pub async fn remove_zaak(&self, zaak_uuid: Uuid) -> Result<(), SearchError> {
        self.remove(zaak_uuid.to_string()).await
    }

    pub async fn remove_informatieobject(&self, uuid: Uuid) -> Result<(), SearchError> {
        self.remove(uuid.to_string()).await
    }

    pub async fn remove_taak(&self, task_id: &str) -> Result<(), SearchError> {
        self.remove(task_id.to_string()).await
    }

    async fn remove(&self, id: String) -> Result<(), SearchError> {
        self.index.delete_by_ids(&[id]).await?;
        self.commit().await
    }

    pub async fn commit(&self) -> Result<(), SearchError> {
        self.index.commit().await
    }
}
