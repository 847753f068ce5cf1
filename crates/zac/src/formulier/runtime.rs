use std::sync::{Arc, OnceLock};

use chrono::{Duration, NaiveDate, Utc};
use regex::Regex;
use serde_json::{Map, Value};
use tracing::{debug, warn};
use uuid::Uuid;

use super::model::{FormulierData, FormulierVeldtype, TaakView};
use super::FormulierError;
use crate::admin::ReferenceTableService;
use crate::identity::IdentityService;
use crate::policy::ZaakRechten;
use crate::workflow::{Task, TaskService, ZaakVariabelenService};
use crate::zaak::SuspensionService;
use crate::zgw::drc::{DocumentStatus, InformatieobjectPatch, Ondertekening};
use crate::zgw::zrc::Zaak;
use crate::zgw::ZgwApiService;

const DATUM_FORMAAT: &str = "%d-%m-%Y";
const REDEN_ZAAK_HERVATTEN: &str = "Zaak hervat vanuit proces";
const REFERENCE_TABLE_PREFIX: &str = "REF:";
const SEPARATOR: char = ';';
const FORMIO_DEFAULT_VALUE: &str = "defaultValue";
const FORMIO_TITLE: &str = "title";

const ZAAK_GROEP: &str = "ZAAK:GROEP";
const ZAAK_BEHANDELAAR: &str = "ZAAK:BEHANDELAAR";

fn days_from_today() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[+-]\d{1,4}$").expect("valid relative date pattern"))
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATUM_FORMAAT).to_string()
}

/// Values the default value placeholders resolve to for one task.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DefaultValueContext {
    pub taak_startdatum: Option<NaiveDate>,
    pub taak_fatale_datum: Option<NaiveDate>,
    pub taak_groep: Option<String>,
    pub taak_behandelaar: Option<String>,
    pub zaak_startdatum: Option<NaiveDate>,
    pub zaak_fatale_datum: Option<NaiveDate>,
    pub zaak_streefdatum: Option<NaiveDate>,
    pub zaak_groep: Option<String>,
    pub zaak_behandelaar: Option<String>,
    pub zaakdata: Map<String, Value>,
}

impl DefaultValueContext {
    /// Resolves a placeholder; `:<key>` reads a zaak variable and anything else is
    /// taken literally.
    pub fn resolve(&self, default_value: &str) -> Option<String> {
        match default_value {
            "TAAK:STARTDATUM" => self.taak_startdatum.map(format_date),
            "TAAK:FATALE_DATUM" => self.taak_fatale_datum.map(format_date),
            "TAAK:GROEP" => self.taak_groep.clone(),
            "TAAK:BEHANDELAAR" => self.taak_behandelaar.clone(),
            "ZAAK:STARTDATUM" => self.zaak_startdatum.map(format_date),
            "ZAAK:FATALE_DATUM" => self.zaak_fatale_datum.map(format_date),
            "ZAAK:STREEFDATUM" => self.zaak_streefdatum.map(format_date),
            ZAAK_GROEP => self.zaak_groep.clone(),
            ZAAK_BEHANDELAAR => self.zaak_behandelaar.clone(),
            other => match other.strip_prefix(':') {
                Some(key) => Some(match self.zaakdata.get(key) {
                    Some(Value::String(value)) => value.clone(),
                    Some(value) => value.to_string(),
                    None => String::new(),
                }),
                None => Some(other.to_string()),
            },
        }
    }

    /// Copy of a formio form with every string `defaultValue` resolved.
    pub fn resolve_formio(&self, form: &Value) -> Value {
        match form {
            Value::Object(fields) => Value::Object(
                fields
                    .iter()
                    .map(|(key, value)| {
                        let copied = match value {
                            Value::String(default_value) if key == FORMIO_DEFAULT_VALUE => self
                                .resolve(default_value)
                                .map_or(Value::Null, Value::String),
                            other => self.resolve_formio(other),
                        };
                        (key.clone(), copied)
                    })
                    .collect(),
            ),
            Value::Array(items) => {
                Value::Array(items.iter().map(|item| self.resolve_formio(item)).collect())
            }
            other => other.clone(),
        }
    }
}

/// `ja`, `true` and `1` tick a checkbox; anything else leaves it unticked.
pub fn format_checkbox(value: &str) -> String {
    let ticked = ["ja", "true", "1"]
        .iter()
        .any(|candidate| candidate.eq_ignore_ascii_case(value));
    ticked.to_string()
}

/// `+N` and `-N` are days relative to `today`; other values pass unchanged.
pub fn format_datum(value: &str, today: NaiveDate) -> String {
    if !days_from_today().is_match(value) {
        return value.to_string();
    }
    let days: i64 = value[1..].parse().unwrap_or_default();
    let offset = if value.starts_with('-') { -days } else { days };
    today
        .checked_add_signed(Duration::days(offset))
        .map(format_date)
        .unwrap_or_else(|| value.to_string())
}

fn document_uuids(references: &str) -> Result<Vec<Uuid>, FormulierError> {
    references
        .split(SEPARATOR)
        .map(str::trim)
        .filter(|reference| !reference.is_empty())
        .map(|reference| {
            Uuid::parse_str(reference)
                .map_err(|_| FormulierError::InvalidDocumentReference(reference.to_string()))
        })
        .collect()
}

#[derive(Clone)]
pub struct FormulierRuntimeService {
    zgw: ZgwApiService,
    identity: Arc<dyn IdentityService>,
    reference_tables: Arc<dyn ReferenceTableService>,
    variabelen: Arc<dyn ZaakVariabelenService>,
    tasks: Arc<dyn TaskService>,
    suspension: SuspensionService,
}

impl FormulierRuntimeService {
    pub fn new(
        zgw: ZgwApiService,
        identity: Arc<dyn IdentityService>,
        reference_tables: Arc<dyn ReferenceTableService>,
        variabelen: Arc<dyn ZaakVariabelenService>,
        tasks: Arc<dyn TaskService>,
        suspension: SuspensionService,
    ) -> Self {
        Self {
            zgw,
            identity,
            reference_tables,
            variabelen,
            tasks,
            suspension,
        }
    }

    /// Gathers the placeholder values for a task. The zaak roles are only looked up
    /// when one of `placeholders` asks for them.
    pub async fn default_value_context<'a>(
        &self,
        view: &TaakView,
        zaak: &Zaak,
        placeholders: impl IntoIterator<Item = &'a str>,
    ) -> Result<DefaultValueContext, FormulierError> {
        let placeholders: Vec<&str> = placeholders.into_iter().collect();

        let zaak_groep = if placeholders.contains(&ZAAK_GROEP) {
            match self.zgw.find_groep_for_zaak(zaak).await? {
                Some(rol) => match rol.identificatienummer() {
                    Some(group_id) => Some(self.identity.read_group(group_id).await?.name),
                    None => None,
                },
                None => None,
            }
        } else {
            None
        };
        let zaak_behandelaar = if placeholders.contains(&ZAAK_BEHANDELAAR) {
            match self.zgw.find_behandelaar_medewerker_role_for_zaak(zaak).await? {
                Some(rol) => match rol.identificatienummer() {
                    Some(user_id) => Some(self.identity.read_user(user_id).await?.full_name()),
                    None => None,
                },
                None => None,
            }
        } else {
            None
        };

        Ok(DefaultValueContext {
            taak_startdatum: Some(view.creatiedatum_tijd.date_naive()),
            taak_fatale_datum: view.fataledatum,
            taak_groep: view.groep.as_ref().map(|groep| groep.name.clone()),
            taak_behandelaar: view.behandelaar.as_ref().map(|user| user.full_name()),
            zaak_startdatum: Some(zaak.startdatum),
            zaak_fatale_datum: zaak.uiterlijke_einddatum_afdoening,
            zaak_streefdatum: zaak.einddatum_gepland,
            zaak_groep,
            zaak_behandelaar,
            zaakdata: self.variabelen.read_zaakdata(zaak.uuid).await?,
        })
    }

    /// Resolves the default values and reference table options of a form definition
    /// in place.
    pub async fn render_formulier(&self, view: &mut TaakView, zaak: &Zaak) -> Result<(), FormulierError> {
        let Some(definitie) = &view.formulier_definitie else {
            return Ok(());
        };
        let placeholders: Vec<String> = definitie
            .veld_definities
            .iter()
            .filter_map(|veld| veld.default_waarde.clone())
            .collect();
        let context = self
            .default_value_context(view, zaak, placeholders.iter().map(String::as_str))
            .await?;
        let today = Utc::now().date_naive();

        let mut velden = match view.formulier_definitie.take() {
            Some(definitie) => definitie,
            None => return Ok(()),
        };
        for veld in &mut velden.veld_definities {
            if let Some(default_waarde) = veld.default_waarde.take() {
                veld.default_waarde = if default_waarde.trim().is_empty() {
                    Some(default_waarde)
                } else {
                    context.resolve(&default_waarde).map(|resolved| match veld.veldtype {
                        FormulierVeldtype::Checkbox => format_checkbox(&resolved),
                        FormulierVeldtype::Datum => format_datum(&resolved, today),
                        _ => resolved,
                    })
                };
            }
            if let Some(opties) = veld.meerkeuze_opties.take() {
                veld.meerkeuze_opties = Some(self.resolve_multiple_choice_options(opties).await?);
            }
        }
        view.formulier_definitie = Some(velden);
        Ok(())
    }

    async fn resolve_multiple_choice_options(&self, opties: String) -> Result<String, FormulierError> {
        let code = opties.strip_prefix(REFERENCE_TABLE_PREFIX).unwrap_or_default();
        if code.trim().is_empty() {
            return Ok(opties);
        }
        let table = self.reference_tables.read_by_code(code.trim()).await?;
        Ok(table.sorted_values().join(&SEPARATOR.to_string()))
    }

    /// The formio form of the task with its default values resolved.
    pub async fn render_formio_formulier(
        &self,
        view: &TaakView,
        zaak: &Zaak,
    ) -> Result<Option<Value>, FormulierError> {
        let Some(form) = &view.formio_formulier else {
            return Ok(None);
        };
        let mut placeholders = Vec::new();
        collect_formio_defaults(form, &mut placeholders);
        let context = self
            .default_value_context(view, zaak, placeholders.iter().map(String::as_str))
            .await?;
        Ok(Some(context.resolve_formio(form)))
    }

    /// Stores the submitted form on the task and carries out the actions it asks for.
    pub async fn submit(
        &self,
        view: &TaakView,
        mut task: Task,
        zaak: &Zaak,
        rechten: &ZaakRechten,
    ) -> Result<Task, FormulierError> {
        self.tasks
            .set_task_information(&task.id, view.taakinformatie.clone())
            .await?;
        self.tasks
            .set_task_data(&task.id, view.taakdata.clone())
            .await?;
        task.task_information = view.taakinformatie.clone();
        task.task_data = view.taakdata.clone();

        let data = FormulierData::parse(&view.taakdata)?;

        if data.toelichting.is_some() || data.taak_fatale_datum.is_some() {
            if let Some(toelichting) = &data.toelichting {
                task.description = Some(toelichting.clone());
            }
            if let Some(fatale_datum) = data.taak_fatale_datum {
                task.due_date = Some(fatale_datum);
            }
            task = self.tasks.update_task(task).await?;
        }

        if data.zaak_opschorten && !zaak.is_opgeschort() {
            let today = Utc::now().date_naive();
            let days = task
                .due_date
                .map(|due_date| (due_date - today).num_days())
                .unwrap_or_else(|| {
                    warn!(task = %task.id, "suspending zaak from a task without due date");
                    0
                });
            let reason = match (&view.formulier_definitie, &view.formio_formulier) {
                (Some(definitie), _) => definitie.naam.clone(),
                (None, Some(form)) => form
                    .get(FORMIO_TITLE)
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                (None, None) => view.naam.clone(),
            };
            let days = i32::try_from(days).unwrap_or(i32::MAX);
            self.suspension
                .suspend_zaak(zaak, rechten, days, &reason)
                .await?;
        }
        if data.zaak_hervatten && zaak.is_opgeschort() {
            self.suspension
                .resume_zaak(zaak, rechten, None, REDEN_ZAAK_HERVATTEN)
                .await?;
        }

        if let Some(references) = &data.documenten_verzenden {
            self.mark_documents_sent(
                references,
                data.documenten_verzenden_datum,
                data.toelichting.as_deref(),
            )
            .await?;
        }
        if let Some(references) = &data.documenten_ondertekenen {
            self.mark_documents_signed(references).await?;
        }

        let mut zaakdata = self.variabelen.read_zaakdata(zaak.uuid).await?;
        zaakdata.extend(data.zaak_variabelen);
        self.variabelen.set_zaakdata(zaak.uuid, zaakdata).await?;
        Ok(task)
    }

    async fn mark_documents_sent(
        &self,
        references: &str,
        verzenddatum: Option<NaiveDate>,
        toelichting: Option<&str>,
    ) -> Result<(), FormulierError> {
        let drc = &self.zgw.clients().drc;
        for uuid in document_uuids(references)? {
            let patch = InformatieobjectPatch {
                verzenddatum,
                ..InformatieobjectPatch::default()
            };
            drc.patch_enkelvoudig_informatieobject(uuid, &patch, toelichting)
                .await?;
            debug!(document = %uuid, "document marked as sent");
        }
        Ok(())
    }

    /// Signs the referenced documents that are not signed yet; signing makes them final.
    async fn mark_documents_signed(&self, references: &str) -> Result<(), FormulierError> {
        let drc = &self.zgw.clients().drc;
        let today = Utc::now().date_naive();
        for uuid in document_uuids(references)? {
            let document = drc.read_enkelvoudig_informatieobject(uuid).await?;
            if document.is_ondertekend() {
                continue;
            }
            let patch = InformatieobjectPatch {
                ondertekening: Some(Ondertekening::digitaal(today)),
                status: Some(DocumentStatus::Definitief),
                ..InformatieobjectPatch::default()
            };
            drc.patch_enkelvoudig_informatieobject(uuid, &patch, None)
                .await?;
            debug!(document = %uuid, "document signed");
        }
        Ok(())
    }
}

fn collect_formio_defaults(form: &Value, placeholders: &mut Vec<String>) {
    match form {
        Value::Object(fields) => {
            for (key, value) in fields {
                match value {
                    Value::String(default_value) if key == FORMIO_DEFAULT_VALUE => {
                        placeholders.push(default_value.clone())
                    }
                    other => collect_formio_defaults(other, placeholders),
                }
            }
        }
        Value::Array(items) => items
            .iter()
            .for_each(|item| collect_formio_defaults(item, placeholders)),
        _ => {}
    }
}
