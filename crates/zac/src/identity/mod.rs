use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

impl User {
    /// Placeholder for an account the identity store does not know (anymore).
    pub fn unknown(id: &str) -> Self {
        Self {
            id: id.to_string(),
            first_name: None,
            last_name: None,
            email: None,
        }
    }

    pub fn full_name(&self) -> String {
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.trim().is_empty())
            .collect();
        if parts.is_empty() {
            self.id.clone()
        } else {
            parts.join(" ")
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
}

impl Group {
    pub fn unknown(id: &str) -> Self {
        Self {
            id: id.to_string(),
            name: id.to_string(),
            email: None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("user '{user}' is not a member of group '{group}'")]
    UserNotInGroup { user: String, group: String },
    #[error("identity store unavailable: {0}")]
    Unavailable(String),
}

/// Users and groups from the identity provider.
#[async_trait]
pub trait IdentityService: Send + Sync {
    /// Unknown ids resolve to [`User::unknown`].
    async fn read_user(&self, id: &str) -> Result<User, IdentityError>;
    /// Unknown ids resolve to [`Group::unknown`].
    async fn read_group(&self, id: &str) -> Result<Group, IdentityError>;
    async fn list_users(&self) -> Result<Vec<User>, IdentityError>;
    async fn list_groups(&self) -> Result<Vec<Group>, IdentityError>;
    async fn list_users_in_group(&self, group_id: &str) -> Result<Vec<User>, IdentityError>;

    async fn check_user_in_group(&self, user_id: &str, group_id: &str) -> Result<(), IdentityError> {
        let members = self.list_users_in_group(group_id).await?;
        if members.iter().any(|member| member.id == user_id) {
            Ok(())
        } else {
            Err(IdentityError::UserNotInGroup {
                user: user_id.to_string(),
                group: group_id.to_string(),
            })
        }
    }
}
