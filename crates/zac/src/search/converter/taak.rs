use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;

use super::ZoekObjectConverter;
use crate::identity::IdentityService;
use crate::search::model::{TaakZoekObject, ZoekObject, ZoekObjectType};
use crate::search::SearchError;
use crate::workflow::{Task, TaskService, TaskStatus};

pub struct TaakZoekObjectConverter {
    tasks: Arc<dyn TaskService>,
    identity: Arc<dyn IdentityService>,
}

fn status_code(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::NietToegekend => "NIET_TOEGEKEND",
        TaskStatus::Toegekend => "TOEGEKEND",
        TaskStatus::Afgerond => "AFGEROND",
    }
}

/// Flattens task variables into `<key>|<value>` pairs.
fn flatten(data: &Map<String, Value>) -> Vec<String> {
    data.iter()
        .map(|(key, value)| match value {
            Value::String(text) => format!("{key}|{text}"),
            Value::Null => format!("{key}|"),
            other => format!("{key}|{other}"),
        })
        .collect()
}

impl TaakZoekObjectConverter {
    pub fn new(tasks: Arc<dyn TaskService>, identity: Arc<dyn IdentityService>) -> Self {
        Self { tasks, identity }
    }

    pub async fn convert_task(&self, task: &Task) -> Result<TaakZoekObject, SearchError> {
        let mut object = TaakZoekObject {
            id: task.id.clone(),
            object_type: Some(ZoekObjectType::Taak),
            naam: task.name.clone(),
            toelichting: task.description.clone(),
            status: Some(status_code(task.status()).to_string()),
            zaaktype_omschrijving: Some(task.zaaktype_omschrijving.clone()),
            zaak_uuid: Some(task.zaak_uuid.to_string()),
            zaak_identificatie: Some(task.zaak_identificatie.clone()),
            creatiedatum: Some(task.created),
            fataledatum: task.due_date,
            taak_data: flatten(&task.task_data),
            taak_informatie: flatten(&task.task_information),
            ..TaakZoekObject::default()
        };

        if let Some(group_id) = &task.candidate_group {
            let group = self.identity.read_group(group_id).await?;
            object.groep_id = Some(group.id);
            object.groep_naam = Some(group.name);
        }
        if let Some(assignee) = &task.assignee {
            let user = self.identity.read_user(assignee).await?;
            object.behandelaar_naam = Some(user.full_name());
            object.behandelaar_gebruikersnaam = Some(user.id);
        }
        Ok(object)
    }
}

#[async_trait]
impl ZoekObjectConverter for TaakZoekObjectConverter {
    fn supports(&self, object_type: ZoekObjectType) -> bool {
        object_type == ZoekObjectType::Taak
    }

    async fn convert(&self, id: &str) -> Result<Option<ZoekObject>, SearchError> {
        let task = self.tasks.read_task(id).await?;
        Ok(Some(ZoekObject::Taak(self.convert_task(&task).await?)))
    }
}
