use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::info;

use super::AppServices;
use crate::error::AppError;
use crate::policy::{assert_policy, LoggedInUser};
use crate::search::ZoekObjectType;
use crate::zgw::ztc::CacheStatistics;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStatistiekenView {
    pub cache_time: DateTime<Utc>,
    pub caches: Vec<CacheStatistics>,
}

async fn assert_beheren(services: &AppServices, user: &LoggedInUser) -> Result<(), AppError> {
    let overige = services.policy.read_overige_rechten(user).await?;
    Ok(assert_policy(overige.beheren)?)
}

pub(super) async fn herindexeren(
    State(services): State<Arc<AppServices>>,
    user: LoggedInUser,
    Path(object_type): Path<String>,
) -> Result<Json<Value>, AppError> {
    assert_beheren(&services, &user).await?;
    let object_type: ZoekObjectType = object_type.parse().map_err(AppError::Validation)?;
    match services.indexing.reindex(object_type).await? {
        Some(count) => {
            info!(user = %user.id, object_type = %object_type, count, "reindex finished");
            Ok(Json(json!({
                "type": object_type,
                "aantal": count,
            })))
        }
        None => Err(AppError::ReindexInProgress(object_type.to_string())),
    }
}

pub(super) async fn ztc_cache_statistieken(
    State(services): State<Arc<AppServices>>,
    user: LoggedInUser,
) -> Result<Json<CacheStatistiekenView>, AppError> {
    assert_beheren(&services, &user).await?;
    Ok(Json(CacheStatistiekenView {
        cache_time: services.ztc_cache.cache_time(),
        caches: services.ztc_cache.cache_statistics().await,
    }))
}

pub(super) async fn clear_ztc_caches(
    State(services): State<Arc<AppServices>>,
    user: LoggedInUser,
) -> Result<Json<Value>, AppError> {
    assert_beheren(&services, &user).await?;
    let cache_time = services.ztc_cache.clear_caches();
    info!(user = %user.id, "ztc caches cleared on request");
    Ok(Json(json!({ "cacheTime": cache_time })))
}
