use async_trait::async_trait;
use chrono::{DateTime, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use uuid::Uuid;
use zac::admin::{ReferenceTable, ReferenceTableError, ReferenceTableService};
use zac::document::{DocumentLock, DocumentLockError, DocumentLockService};
use zac::identity::{Group, IdentityError, IdentityService, User};
use zac::workflow::{Task, TaskService, WorkflowError, ZaakVariabelenService};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Task store used while no workflow engine is attached; it starts empty.
#[derive(Default, Clone)]
pub(crate) struct InMemoryTaskStore {
    tasks: Arc<Mutex<Vec<Task>>>,
}

impl InMemoryTaskStore {
    fn update<R>(
        &self,
        task_id: &str,
        apply: impl FnOnce(&mut Task) -> R,
    ) -> Result<R, WorkflowError> {
        let mut guard = self.tasks.lock().expect("task mutex poisoned");
        guard
            .iter_mut()
            .find(|task| task.id == task_id)
            .map(apply)
            .ok_or_else(|| WorkflowError::TaskNotFound(task_id.to_string()))
    }

    fn open_tasks(&self) -> Vec<Task> {
        let guard = self.tasks.lock().expect("task mutex poisoned");
        let mut open: Vec<Task> = guard
            .iter()
            .filter(|task| task.completed.is_none())
            .cloned()
            .collect();
        open.sort_by_key(|task| task.created);
        open
    }
}

#[async_trait]
impl TaskService for InMemoryTaskStore {
    async fn list_open_tasks_for_zaak(&self, zaak_uuid: Uuid) -> Result<Vec<Task>, WorkflowError> {
        Ok(self
            .open_tasks()
            .into_iter()
            .filter(|task| task.zaak_uuid == zaak_uuid)
            .collect())
    }

    async fn count_open_tasks_for_zaak(&self, zaak_uuid: Uuid) -> Result<usize, WorkflowError> {
        Ok(self.list_open_tasks_for_zaak(zaak_uuid).await?.len())
    }

    async fn read_task(&self, task_id: &str) -> Result<Task, WorkflowError> {
        self.update(task_id, |task| task.clone())
    }

    async fn update_task(&self, task: Task) -> Result<Task, WorkflowError> {
        let id = task.id.clone();
        self.update(&id, |stored| {
            *stored = task.clone();
        })?;
        Ok(task)
    }

    async fn set_task_data(
        &self,
        task_id: &str,
        data: Map<String, Value>,
    ) -> Result<(), WorkflowError> {
        self.update(task_id, |task| task.task_data = data)
    }

    async fn set_task_information(
        &self,
        task_id: &str,
        information: Map<String, Value>,
    ) -> Result<(), WorkflowError> {
        self.update(task_id, |task| task.task_information = information)
    }

    async fn list_open_tasks(&self, first: usize, max: usize) -> Result<Vec<Task>, WorkflowError> {
        Ok(self.open_tasks().into_iter().skip(first).take(max).collect())
    }

    async fn count_open_tasks(&self) -> Result<usize, WorkflowError> {
        Ok(self.open_tasks().len())
    }
}

#[derive(Debug, Clone, Default)]
struct ZaakVariabelen {
    datumtijd_opgeschort: Option<DateTime<Utc>>,
    verwachte_dagen_opgeschort: Option<i64>,
    zaakdata: Map<String, Value>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryZaakVariabelen {
    variabelen: Arc<Mutex<HashMap<Uuid, ZaakVariabelen>>>,
}

impl InMemoryZaakVariabelen {
    fn with<R>(&self, zaak_uuid: Uuid, apply: impl FnOnce(&mut ZaakVariabelen) -> R) -> R {
        let mut guard = self.variabelen.lock().expect("variabelen mutex poisoned");
        apply(guard.entry(zaak_uuid).or_default())
    }
}

#[async_trait]
impl ZaakVariabelenService for InMemoryZaakVariabelen {
    async fn read_datumtijd_opgeschort(
        &self,
        zaak_uuid: Uuid,
    ) -> Result<Option<DateTime<Utc>>, WorkflowError> {
        Ok(self.with(zaak_uuid, |variabelen| variabelen.datumtijd_opgeschort))
    }

    async fn set_datumtijd_opgeschort(
        &self,
        zaak_uuid: Uuid,
        datumtijd: DateTime<Utc>,
    ) -> Result<(), WorkflowError> {
        self.with(zaak_uuid, |variabelen| {
            variabelen.datumtijd_opgeschort = Some(datumtijd)
        });
        Ok(())
    }

    async fn remove_datumtijd_opgeschort(&self, zaak_uuid: Uuid) -> Result<(), WorkflowError> {
        self.with(zaak_uuid, |variabelen| variabelen.datumtijd_opgeschort = None);
        Ok(())
    }

    async fn read_verwachte_dagen_opgeschort(
        &self,
        zaak_uuid: Uuid,
    ) -> Result<Option<i64>, WorkflowError> {
        Ok(self.with(zaak_uuid, |variabelen| variabelen.verwachte_dagen_opgeschort))
    }

    async fn set_verwachte_dagen_opgeschort(
        &self,
        zaak_uuid: Uuid,
        dagen: i64,
    ) -> Result<(), WorkflowError> {
        self.with(zaak_uuid, |variabelen| {
            variabelen.verwachte_dagen_opgeschort = Some(dagen)
        });
        Ok(())
    }

    async fn remove_verwachte_dagen_opgeschort(
        &self,
        zaak_uuid: Uuid,
    ) -> Result<(), WorkflowError> {
        self.with(zaak_uuid, |variabelen| {
            variabelen.verwachte_dagen_opgeschort = None
        });
        Ok(())
    }

    async fn read_zaakdata(&self, zaak_uuid: Uuid) -> Result<Map<String, Value>, WorkflowError> {
        Ok(self.with(zaak_uuid, |variabelen| variabelen.zaakdata.clone()))
    }

    async fn set_zaakdata(
        &self,
        zaak_uuid: Uuid,
        zaakdata: Map<String, Value>,
    ) -> Result<(), WorkflowError> {
        self.with(zaak_uuid, |variabelen| variabelen.zaakdata = zaakdata);
        Ok(())
    }
}

/// Group memberships read from `ZAC_GROUPS`, formatted as
/// `behandelaars=bwillems,jdevries;beheerders=kbakker`.
#[derive(Debug, Default, Clone)]
pub(crate) struct StaticIdentityService {
    memberships: Vec<(String, Vec<String>)>,
}

impl StaticIdentityService {
    pub(crate) fn from_env() -> Self {
        std::env::var("ZAC_GROUPS")
            .map(|raw| Self::parse(&raw))
            .unwrap_or_default()
    }

    pub(crate) fn parse(raw: &str) -> Self {
        let memberships = raw
            .split(';')
            .filter_map(|entry| entry.split_once('='))
            .map(|(group, members)| {
                let members = members
                    .split(',')
                    .map(str::trim)
                    .filter(|member| !member.is_empty())
                    .map(str::to_string)
                    .collect();
                (group.trim().to_string(), members)
            })
            .filter(|(group, _)| !group.is_empty())
            .collect();
        Self { memberships }
    }

    fn user_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self
            .memberships
            .iter()
            .flat_map(|(_, members)| members.iter().map(String::as_str))
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}

#[async_trait]
impl IdentityService for StaticIdentityService {
    async fn read_user(&self, id: &str) -> Result<User, IdentityError> {
        Ok(User::unknown(id))
    }

    async fn read_group(&self, id: &str) -> Result<Group, IdentityError> {
        Ok(Group::unknown(id))
    }

    async fn list_users(&self) -> Result<Vec<User>, IdentityError> {
        Ok(self.user_ids().into_iter().map(User::unknown).collect())
    }

    async fn list_groups(&self) -> Result<Vec<Group>, IdentityError> {
        Ok(self
            .memberships
            .iter()
            .map(|(group, _)| Group::unknown(group))
            .collect())
    }

    async fn list_users_in_group(&self, group_id: &str) -> Result<Vec<User>, IdentityError> {
        Ok(self
            .memberships
            .iter()
            .filter(|(group, _)| group == group_id)
            .flat_map(|(_, members)| members.iter().map(|member| User::unknown(member)))
            .collect())
    }
}

/// Reference tables kept for the lifetime of the process. Codes are unique and system
/// tables survive deletes.
#[derive(Default, Clone)]
pub(crate) struct InMemoryReferenceTables {
    tables: Arc<Mutex<Vec<ReferenceTable>>>,
}

#[async_trait]
impl ReferenceTableService for InMemoryReferenceTables {
    async fn list(&self) -> Result<Vec<ReferenceTable>, ReferenceTableError> {
        let guard = self.tables.lock().expect("reference table mutex poisoned");
        let mut tables = guard.clone();
        tables.sort_by(|left, right| left.naam.cmp(&right.naam));
        Ok(tables)
    }

    async fn read_by_code(&self, code: &str) -> Result<ReferenceTable, ReferenceTableError> {
        let guard = self.tables.lock().expect("reference table mutex poisoned");
        guard
            .iter()
            .find(|table| table.code == code)
            .cloned()
            .ok_or_else(|| ReferenceTableError::NotFound(code.to_string()))
    }

    async fn create(&self, mut table: ReferenceTable) -> Result<ReferenceTable, ReferenceTableError> {
        let mut guard = self.tables.lock().expect("reference table mutex poisoned");
        if guard.iter().any(|existing| existing.code == table.code) {
            return Err(ReferenceTableError::Conflict(table.code));
        }
        table.id = guard.iter().map(|existing| existing.id).max().unwrap_or(0) + 1;
        guard.push(table.clone());
        Ok(table)
    }

    async fn update(&self, table: ReferenceTable) -> Result<ReferenceTable, ReferenceTableError> {
        let mut guard = self.tables.lock().expect("reference table mutex poisoned");
        if guard
            .iter()
            .any(|existing| existing.code == table.code && existing.id != table.id)
        {
            return Err(ReferenceTableError::Conflict(table.code));
        }
        let stored = guard
            .iter_mut()
            .find(|existing| existing.id == table.id)
            .ok_or_else(|| ReferenceTableError::NotFound(table.id.to_string()))?;
        // The system flag is fixed at provisioning.
        *stored = ReferenceTable {
            systeem: stored.systeem,
            ..table
        };
        Ok(stored.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), ReferenceTableError> {
        let mut guard = self.tables.lock().expect("reference table mutex poisoned");
        let position = guard
            .iter()
            .position(|table| table.id == id)
            .ok_or_else(|| ReferenceTableError::NotFound(id.to_string()))?;
        if guard[position].systeem {
            return Err(ReferenceTableError::SystemTable(guard[position].code.clone()));
        }
        guard.remove(position);
        Ok(())
    }
}

/// Lock store for document editing sessions; nothing is locked until an editor integration
/// records locks.
#[derive(Default, Clone)]
pub(crate) struct InMemoryDocumentLocks {
    locks: Arc<Mutex<HashMap<Uuid, DocumentLock>>>,
}

#[async_trait]
impl DocumentLockService for InMemoryDocumentLocks {
    async fn find_lock(
        &self,
        document_uuid: Uuid,
    ) -> Result<Option<DocumentLock>, DocumentLockError> {
        let guard = self.locks.lock().expect("lock mutex poisoned");
        Ok(guard.get(&document_uuid).cloned())
    }
}
