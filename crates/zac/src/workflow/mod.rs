//! Boundary to the external workflow engine that owns human tasks and the process
//! variables kept per zaak.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Name of the task that asks the initiator for additional information; its due date
/// is owned by the initiator's response term, not by the zaak.
pub const AANVULLENDE_INFORMATIE_TASK_NAME: &str = "Aanvullende informatie";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    NietToegekend,
    Toegekend,
    Afgerond,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub zaak_uuid: Uuid,
    pub zaak_identificatie: String,
    pub zaaktype_omschrijving: String,
    pub assignee: Option<String>,
    pub candidate_group: Option<String>,
    pub created: DateTime<Utc>,
    pub due_date: Option<NaiveDate>,
    pub completed: Option<DateTime<Utc>>,
    pub form_key: Option<String>,
    #[serde(default)]
    pub task_data: Map<String, Value>,
    #[serde(default)]
    pub task_information: Map<String, Value>,
}

impl Task {
    pub fn status(&self) -> TaskStatus {
        if self.completed.is_some() {
            TaskStatus::Afgerond
        } else if self.assignee.is_some() {
            TaskStatus::Toegekend
        } else {
            TaskStatus::NietToegekend
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("task '{0}' not found")]
    TaskNotFound(String),
    #[error("workflow engine unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait TaskService: Send + Sync {
    async fn list_open_tasks_for_zaak(&self, zaak_uuid: Uuid) -> Result<Vec<Task>, WorkflowError>;
    async fn count_open_tasks_for_zaak(&self, zaak_uuid: Uuid) -> Result<usize, WorkflowError>;
    async fn read_task(&self, task_id: &str) -> Result<Task, WorkflowError>;
    async fn update_task(&self, task: Task) -> Result<Task, WorkflowError>;
    async fn set_task_data(
        &self,
        task_id: &str,
        data: Map<String, Value>,
    ) -> Result<(), WorkflowError>;
    async fn set_task_information(
        &self,
        task_id: &str,
        information: Map<String, Value>,
    ) -> Result<(), WorkflowError>;
    /// Open tasks ordered by creation, `first` being a zero-based offset.
    async fn list_open_tasks(&self, first: usize, max: usize) -> Result<Vec<Task>, WorkflowError>;
    async fn count_open_tasks(&self) -> Result<usize, WorkflowError>;
}

/// Case variables stored alongside the process instance of a zaak.
#[async_trait]
pub trait ZaakVariabelenService: Send + Sync {
    async fn read_datumtijd_opgeschort(
        &self,
        zaak_uuid: Uuid,
    ) -> Result<Option<DateTime<Utc>>, WorkflowError>;
    async fn set_datumtijd_opgeschort(
        &self,
        zaak_uuid: Uuid,
        datumtijd: DateTime<Utc>,
    ) -> Result<(), WorkflowError>;
    async fn remove_datumtijd_opgeschort(&self, zaak_uuid: Uuid) -> Result<(), WorkflowError>;

    async fn read_verwachte_dagen_opgeschort(
        &self,
        zaak_uuid: Uuid,
    ) -> Result<Option<i64>, WorkflowError>;
    async fn set_verwachte_dagen_opgeschort(
        &self,
        zaak_uuid: Uuid,
        dagen: i64,
    ) -> Result<(), WorkflowError>;
    async fn remove_verwachte_dagen_opgeschort(&self, zaak_uuid: Uuid)
        -> Result<(), WorkflowError>;

    async fn read_zaakdata(&self, zaak_uuid: Uuid) -> Result<Map<String, Value>, WorkflowError>;
    async fn set_zaakdata(
        &self,
        zaak_uuid: Uuid,
        zaakdata: Map<String, Value>,
    ) -> Result<(), WorkflowError>;
}
