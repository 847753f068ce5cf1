use std::collections::BTreeSet;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;

use crate::error::AppError;
use crate::policy::LoggedInUser;

/// Headers set by the authenticating reverse proxy in front of the service.
pub const USER_HEADER: &str = "x-zac-user";
pub const FIRST_NAME_HEADER: &str = "x-zac-first-name";
pub const LAST_NAME_HEADER: &str = "x-zac-last-name";
pub const GROUPS_HEADER: &str = "x-zac-groups";
pub const ROLES_HEADER: &str = "x-zac-roles";
/// Comma separated zaaktype omschrijvingen; absent means all zaaktypen.
pub const ZAAKTYPEN_HEADER: &str = "x-zac-zaaktypen";

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn header_list(headers: &HeaderMap, name: &str) -> Option<BTreeSet<String>> {
    header(headers, name).map(|value| {
        value
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect()
    })
}

impl LoggedInUser {
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let id = header(headers, USER_HEADER)?;
        Some(Self {
            id: id.to_string(),
            first_name: header(headers, FIRST_NAME_HEADER).map(str::to_string),
            last_name: header(headers, LAST_NAME_HEADER).map(str::to_string),
            groups: header_list(headers, GROUPS_HEADER).unwrap_or_default(),
            roles: header_list(headers, ROLES_HEADER).unwrap_or_default(),
            zaaktypen: header_list(headers, ZAAKTYPEN_HEADER),
        })
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for LoggedInUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        LoggedInUser::from_headers(&parts.headers).ok_or(AppError::Unauthenticated)
    }
}
