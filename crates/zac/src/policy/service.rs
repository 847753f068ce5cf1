use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::warn;

use super::model::*;
use super::{PolicyError, PolicyEvaluator};
use crate::document::DocumentLockService;
use crate::workflow::Task;
use crate::zaak::{STATUSTYPE_OMSCHRIJVING_HEROPEND, STATUSTYPE_OMSCHRIJVING_INTAKE};
use crate::zgw::drc::{DocumentStatus, EnkelvoudigInformatieobject};
use crate::zgw::zrc::Zaak;
use crate::zgw::ztc::ZaakType;
use crate::zgw::ZgwClients;

pub fn assert_policy(allowed: bool) -> Result<(), PolicyError> {
    if allowed {
        Ok(())
    } else {
        Err(PolicyError::Denied)
    }
}

/// Builds the policy input for a subject and reads the user's rights on it.
#[derive(Clone)]
pub struct PolicyService {
    evaluator: Arc<dyn PolicyEvaluator>,
    zgw: ZgwClients,
    locks: Arc<dyn DocumentLockService>,
}

impl PolicyService {
    pub fn new(
        evaluator: Arc<dyn PolicyEvaluator>,
        zgw: ZgwClients,
        locks: Arc<dyn DocumentLockService>,
    ) -> Self {
        Self {
            evaluator,
            zgw,
            locks,
        }
    }

    pub async fn read_zaak_rechten(
        &self,
        user: &LoggedInUser,
        zaak: &Zaak,
    ) -> Result<ZaakRechten, PolicyError> {
        let zaaktype = self.zgw.ztc.read_zaaktype(&zaak.zaaktype).await?;
        self.read_zaak_rechten_for_zaaktype(user, zaak, &zaaktype)
            .await
    }

    pub async fn read_zaak_rechten_for_zaaktype(
        &self,
        user: &LoggedInUser,
        zaak: &Zaak,
        zaaktype: &ZaakType,
    ) -> Result<ZaakRechten, PolicyError> {
        let statustype_omschrijving = match &zaak.status {
            Some(status_url) => {
                let status = self.zgw.zrc.read_status(status_url).await?;
                let statustype = self.zgw.ztc.read_statustype(&status.statustype).await?;
                Some(statustype.omschrijving)
            }
            None => None,
        };

        let data = ZaakData {
            open: zaak.is_open(),
            zaaktype: Some(zaaktype.omschrijving.clone()),
            opgeschort: zaak.is_opgeschort(),
            verlengd: zaak.is_verlengd(),
            besloten: !zaaktype.besluittypen.is_empty(),
            intake: statustype_omschrijving.as_deref() == Some(STATUSTYPE_OMSCHRIJVING_INTAKE),
            heropend: statustype_omschrijving.as_deref()
                == Some(STATUSTYPE_OMSCHRIJVING_HEROPEND),
        };
        self.evaluate(PolicyRule::Zaak, user, "zaak", &data).await
    }

    /// Rights on a document, optionally in the context of the zaak it is shown in.
    pub async fn read_document_rechten(
        &self,
        user: &LoggedInUser,
        document: &EnkelvoudigInformatieobject,
        zaak: Option<&Zaak>,
    ) -> Result<DocumentRechten, PolicyError> {
        let lock = self
            .locks
            .find_lock(document.uuid()?)
            .await
            .unwrap_or_else(|error| {
                warn!(document = %document.url, error = %error, "unable to read document lock");
                None
            });

        let mut data = DocumentData {
            definitief: document.status == Some(DocumentStatus::Definitief),
            vergrendeld: document.locked,
            vergrendeld_door: lock.map(|lock| lock.user_id),
            ondertekend: document.is_ondertekend(),
            zaak_open: None,
            zaaktype: None,
        };
        if let Some(zaak) = zaak {
            let zaaktype = self.zgw.ztc.read_zaaktype(&zaak.zaaktype).await?;
            data.zaak_open = Some(zaak.is_open());
            data.zaaktype = Some(zaaktype.omschrijving);
        }
        self.evaluate(PolicyRule::Document, user, "document", &data)
            .await
    }

    pub async fn read_taak_rechten(
        &self,
        user: &LoggedInUser,
        task: &Task,
    ) -> Result<TaakRechten, PolicyError> {
        let data = TaakData {
            open: task.completed.is_none(),
            zaaktype: Some(task.zaaktype_omschrijving.clone()),
        };
        self.evaluate(PolicyRule::Taak, user, "taak", &data).await
    }

    pub async fn read_overige_rechten(
        &self,
        user: &LoggedInUser,
    ) -> Result<OverigeRechten, PolicyError> {
        self.evaluate_user(PolicyRule::Overig, user).await
    }

    pub async fn read_werklijst_rechten(
        &self,
        user: &LoggedInUser,
    ) -> Result<WerklijstRechten, PolicyError> {
        self.evaluate_user(PolicyRule::Werklijst, user).await
    }

    async fn evaluate<D, R>(
        &self,
        rule: PolicyRule,
        user: &LoggedInUser,
        subject: &str,
        data: &D,
    ) -> Result<R, PolicyError>
    where
        D: Serialize,
        R: DeserializeOwned + Default,
    {
        let data =
            serde_json::to_value(data).map_err(|error| PolicyError::Decode(error.to_string()))?;
        let mut input = user_input(user);
        input[subject] = data;
        self.decide(rule, input).await
    }

    async fn evaluate_user<R>(&self, rule: PolicyRule, user: &LoggedInUser) -> Result<R, PolicyError>
    where
        R: DeserializeOwned + Default,
    {
        self.decide(rule, user_input(user)).await
    }

    async fn decide<R>(&self, rule: PolicyRule, input: Value) -> Result<R, PolicyError>
    where
        R: DeserializeOwned + Default,
    {
        match self.evaluator.evaluate(rule, input).await? {
            Some(result) => serde_json::from_value(result)
                .map_err(|error| PolicyError::Decode(error.to_string())),
            None => Ok(R::default()),
        }
    }
}

fn user_input(user: &LoggedInUser) -> Value {
    json!({
        "user": {
            "id": user.id,
            "rollen": user.roles,
            "zaaktypen": user.zaaktypen,
        }
    })
}
