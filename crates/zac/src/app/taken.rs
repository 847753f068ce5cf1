use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use super::AppServices;
use crate::error::AppError;
use crate::formulier::TaakView;
use crate::policy::{assert_policy, LoggedInUser};

/// Resolves the default values and reference table options of the task forms for
/// the zaak the task belongs to.
pub(super) async fn render_formulier(
    State(services): State<Arc<AppServices>>,
    user: LoggedInUser,
    Json(mut view): Json<TaakView>,
) -> Result<Json<TaakView>, AppError> {
    let zaak = services.zgw.clients().zrc.read_zaak(view.zaak_uuid).await?;
    let rechten = services.policy.read_zaak_rechten(&user, &zaak).await?;
    assert_policy(rechten.lezen)?;

    services.formulieren.render_formulier(&mut view, &zaak).await?;
    if let Some(form) = services
        .formulieren
        .render_formio_formulier(&view, &zaak)
        .await?
    {
        view.formio_formulier = Some(form);
    }
    Ok(Json(view))
}
