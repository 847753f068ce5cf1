use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use super::AppServices;
use crate::decision::{DecisionChangeData, DecisionCreateData, DecisionWithdrawalData};
use crate::error::AppError;
use crate::policy::{assert_policy, LoggedInUser};
use crate::zgw::brc::Besluit;
use crate::zgw::zrc::Zaak;

/// Reads the besluit with the zaak it was taken on, checking the user may record besluiten there.
async fn besluit_with_zaak(
    services: &AppServices,
    user: &LoggedInUser,
    besluit_uuid: Uuid,
) -> Result<(Besluit, Zaak), AppError> {
    let clients = services.zgw.clients();
    let besluit = clients.brc.read_besluit(besluit_uuid).await?;
    let zaak_url = besluit
        .zaak
        .as_deref()
        .ok_or_else(|| AppError::Validation(format!("besluit {besluit_uuid} has no zaak")))?;
    let zaak = clients.zrc.read_zaak_by_url(zaak_url).await?;
    let rechten = services.policy.read_zaak_rechten(user, &zaak).await?;
    assert_policy(rechten.vastleggen_besluit)?;
    Ok((besluit, zaak))
}

pub(super) async fn create_besluit(
    State(services): State<Arc<AppServices>>,
    user: LoggedInUser,
    Json(data): Json<DecisionCreateData>,
) -> Result<(StatusCode, Json<Besluit>), AppError> {
    let zaak = services.zgw.clients().zrc.read_zaak(data.zaak_uuid).await?;
    let rechten = services.policy.read_zaak_rechten(&user, &zaak).await?;
    assert_policy(zaak.is_open() && rechten.vastleggen_besluit)?;
    let besluit = services.decisions.create_decision(&zaak, &data).await?;
    services.reindex_zaak(zaak.uuid, false).await;
    Ok((StatusCode::CREATED, Json(besluit)))
}

pub(super) async fn update_besluit(
    State(services): State<Arc<AppServices>>,
    user: LoggedInUser,
    Json(data): Json<DecisionChangeData>,
) -> Result<Json<Besluit>, AppError> {
    let (besluit, zaak) = besluit_with_zaak(&services, &user, data.besluit_uuid).await?;
    let besluit = services
        .decisions
        .update_decision(&zaak, besluit, &data)
        .await?;
    services.reindex_zaak(zaak.uuid, false).await;
    Ok(Json(besluit))
}

pub(super) async fn intrekken(
    State(services): State<Arc<AppServices>>,
    user: LoggedInUser,
    Json(data): Json<DecisionWithdrawalData>,
) -> Result<Json<Besluit>, AppError> {
    let (_, zaak) = besluit_with_zaak(&services, &user, data.besluit_uuid).await?;
    let besluit = services.decisions.withdraw_decision(&data).await?;
    services.reindex_zaak(zaak.uuid, false).await;
    Ok(Json(besluit))
}

pub(super) async fn list_besluiten(
    State(services): State<Arc<AppServices>>,
    user: LoggedInUser,
    Path(zaak_uuid): Path<Uuid>,
) -> Result<Json<Vec<Besluit>>, AppError> {
    let zaak = services.zgw.clients().zrc.read_zaak(zaak_uuid).await?;
    let rechten = services.policy.read_zaak_rechten(&user, &zaak).await?;
    assert_policy(rechten.lezen)?;
    Ok(Json(services.decisions.list_decisions(&zaak).await?))
}
