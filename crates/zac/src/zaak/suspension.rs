use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use super::ZaakServiceError;
use crate::policy::{assert_policy, ZaakRechten};
use crate::workflow::{Task, TaskService, ZaakVariabelenService, AANVULLENDE_INFORMATIE_TASK_NAME};
use crate::zgw::zrc::{Opschorting, Verlenging, Zaak, ZaakPatch};
use crate::zgw::{IsoPeriod, PeriodError, ZgwClients};

/// When and for how long a zaak was suspended, as recorded in the case variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuspensionState {
    pub vanaf_datum_tijd: Option<DateTime<Utc>>,
    pub duur_dagen: i64,
}

fn shift(date: Option<NaiveDate>, days: i32) -> Result<Option<NaiveDate>, PeriodError> {
    date.map(|date| IsoPeriod::of_days(days).add_to(date))
        .transpose()
}

/// Suspension, resumption and extension of zaken. The suspended period shifts the
/// planned and final end dates.
#[derive(Clone)]
pub struct SuspensionService {
    zgw: ZgwClients,
    variabelen: Arc<dyn ZaakVariabelenService>,
    tasks: Arc<dyn TaskService>,
}

impl SuspensionService {
    pub fn new(
        zgw: ZgwClients,
        variabelen: Arc<dyn ZaakVariabelenService>,
        tasks: Arc<dyn TaskService>,
    ) -> Self {
        Self {
            zgw,
            variabelen,
            tasks,
        }
    }

    /// Suspends the zaak for the expected number of days. A zaak that carries a
    /// suspension reason has been suspended before and cannot be suspended again.
    pub async fn suspend_zaak(
        &self,
        zaak: &Zaak,
        rechten: &ZaakRechten,
        days: i32,
        reason: &str,
    ) -> Result<Zaak, ZaakServiceError> {
        assert_policy(rechten.opschorten)?;
        if zaak.is_opgeschort() || zaak.opschorting_reden().is_some() {
            return Err(ZaakServiceError::AlreadySuspended(zaak.identificatie.clone()));
        }

        let patch = ZaakPatch {
            einddatum_gepland: shift(zaak.einddatum_gepland, days)?,
            uiterlijke_einddatum_afdoening: shift(zaak.uiterlijke_einddatum_afdoening, days)?,
            opschorting: Some(Opschorting {
                indicatie: true,
                reden: reason.to_string(),
            }),
            ..ZaakPatch::default()
        };
        let explanation = format!("Opschorting: {reason}");
        let updated = self
            .zgw
            .zrc
            .patch_zaak(zaak.uuid, &patch, Some(&explanation))
            .await?;

        self.variabelen
            .set_datumtijd_opgeschort(zaak.uuid, Utc::now())
            .await?;
        self.variabelen
            .set_verwachte_dagen_opgeschort(zaak.uuid, i64::from(days))
            .await?;
        info!(zaak = %zaak.identificatie, days, "zaak suspended");
        Ok(updated)
    }

    /// Resumes a suspended zaak. The end dates move by the difference between the
    /// actual and the expected suspension length, so resuming early pulls them back.
    pub async fn resume_zaak(
        &self,
        zaak: &Zaak,
        rechten: &ZaakRechten,
        resume_date: Option<DateTime<Utc>>,
        reason: &str,
    ) -> Result<Zaak, ZaakServiceError> {
        assert_policy(rechten.hervatten)?;
        if !zaak.is_opgeschort() {
            return Err(ZaakServiceError::NotSuspended(zaak.identificatie.clone()));
        }

        let now = Utc::now();
        let suspended_at = self
            .variabelen
            .read_datumtijd_opgeschort(zaak.uuid)
            .await?
            .unwrap_or(now);
        let resumed_at = resume_date.unwrap_or(now);
        if resumed_at < suspended_at {
            return Err(ZaakServiceError::InvalidResumeDate(zaak.identificatie.clone()));
        }
        let expected_days = self
            .variabelen
            .read_verwachte_dagen_opgeschort(zaak.uuid)
            .await?
            .unwrap_or(0);

        let actual_days = (resumed_at - suspended_at).num_days();
        let offset = i32::try_from(actual_days - expected_days)
            .map_err(|_| PeriodError::DaysOutOfRange(actual_days - expected_days))?;

        let patch = ZaakPatch {
            einddatum_gepland: shift(zaak.einddatum_gepland, offset)?,
            uiterlijke_einddatum_afdoening: shift(zaak.uiterlijke_einddatum_afdoening, offset)?,
            opschorting: Some(Opschorting {
                indicatie: false,
                reden: reason.to_string(),
            }),
            ..ZaakPatch::default()
        };
        let explanation = format!("Hervatting: {reason}");
        let updated = self
            .zgw
            .zrc
            .patch_zaak(zaak.uuid, &patch, Some(&explanation))
            .await?;

        self.variabelen.remove_datumtijd_opgeschort(zaak.uuid).await?;
        self.variabelen
            .remove_verwachte_dagen_opgeschort(zaak.uuid)
            .await?;
        info!(zaak = %zaak.identificatie, actual_days, offset, "zaak resumed");
        Ok(updated)
    }

    pub async fn read_suspension(&self, zaak_uuid: Uuid) -> Result<SuspensionState, ZaakServiceError> {
        Ok(SuspensionState {
            vanaf_datum_tijd: self.variabelen.read_datumtijd_opgeschort(zaak_uuid).await?,
            duur_dagen: self
                .variabelen
                .read_verwachte_dagen_opgeschort(zaak_uuid)
                .await?
                .unwrap_or(0),
        })
    }

    /// Extends the final date (and the planned end date when set) by `days`.
    pub async fn extend_zaak_fatal_date(
        &self,
        zaak: &Zaak,
        rechten: &ZaakRechten,
        days: i32,
        reason: &str,
    ) -> Result<Zaak, ZaakServiceError> {
        assert_policy(rechten.wijzigen && rechten.verlengen_doorlooptijd)?;
        let einddatum_gepland = shift(zaak.einddatum_gepland, days)?;
        let uiterlijke_einddatum_afdoening = shift(zaak.uiterlijke_einddatum_afdoening, days)?;
        self.extend_zaak(
            zaak,
            einddatum_gepland,
            uiterlijke_einddatum_afdoening,
            reason,
            days,
        )
        .await
    }

    /// Records an extension with explicitly chosen new end dates. The extension
    /// duration accumulates over successive extensions.
    pub async fn extend_zaak(
        &self,
        zaak: &Zaak,
        einddatum_gepland: Option<NaiveDate>,
        uiterlijke_einddatum_afdoening: Option<NaiveDate>,
        reason: &str,
        days: i32,
    ) -> Result<Zaak, ZaakServiceError> {
        let duur = match zaak.verlenging.as_ref().and_then(|verlenging| verlenging.duur) {
            Some(existing) => existing.plus_days(days)?,
            None => IsoPeriod::of_days(days),
        };
        let patch = ZaakPatch {
            einddatum_gepland,
            uiterlijke_einddatum_afdoening,
            verlenging: Some(Verlenging {
                reden: reason.to_string(),
                duur: Some(duur),
            }),
            ..ZaakPatch::default()
        };
        let explanation = format!("Verlenging: {reason}");
        let updated = self
            .zgw
            .zrc
            .patch_zaak(zaak.uuid, &patch, Some(&explanation))
            .await?;
        info!(zaak = %zaak.identificatie, days, duur = %duur, "zaak extended");
        Ok(updated)
    }

    /// Moves the due date of every open task of the zaak that has one.
    pub async fn extend_tasks(&self, zaak_uuid: Uuid, days: i32) -> Result<Vec<Task>, ZaakServiceError> {
        let mut updated = Vec::new();
        for mut task in self.tasks.list_open_tasks_for_zaak(zaak_uuid).await? {
            let Some(due_date) = task.due_date else {
                continue;
            };
            task.due_date = Some(IsoPeriod::of_days(days).add_to(due_date)?);
            updated.push(self.tasks.update_task(task).await?);
        }
        Ok(updated)
    }

    /// Caps the due dates of open tasks at the new final date of the zaak. The
    /// request for additional information keeps its own term.
    pub async fn adjust_final_date_for_open_tasks(
        &self,
        zaak_uuid: Uuid,
        final_date: NaiveDate,
    ) -> Result<Vec<Task>, ZaakServiceError> {
        let mut updated = Vec::new();
        for mut task in self.tasks.list_open_tasks_for_zaak(zaak_uuid).await? {
            if task.name == AANVULLENDE_INFORMATIE_TASK_NAME {
                continue;
            }
            if task.due_date.is_some_and(|due_date| due_date > final_date) {
                task.due_date = Some(final_date);
                updated.push(self.tasks.update_task(task).await?);
            }
        }
        Ok(updated)
    }
}
