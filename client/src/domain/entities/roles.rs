//! Past and current roles on the user's career history.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::user_list;
use crate::domain::projection::{or_default, project_list, required};
use crate::domain::sync::CollectionBinding;
use crate::domain::{Entity, Operation, SyncError, UserIdentity};

const ENTITY: &str = "Roles";

const FETCH_DOCUMENT: &str = "\
query GetUserRoles($userId: ID!, $token: String!) {
  getUserById(id: $userId, token: $token) {
    roles { id title company level }
  }
}";

const ADD_DOCUMENT: &str = "\
mutation AddUserRole($userId: ID!, $token: String!, $title: String!, $company: String, $level: String) {
  addUserRole(userId: $userId, token: $token, title: $title, company: $company, level: $level) { id }
}";

const REMOVE_DOCUMENT: &str = "\
mutation RemoveUserRole($userId: ID!, $token: String!, $roleId: ID!) {
  removeUserRole(userId: $userId, token: $token, roleId: $roleId)
}";

#[derive(Debug, Deserialize)]
struct RawRole {
    id: Option<String>,
    title: Option<String>,
    company: Option<String>,
    level: Option<String>,
}

/// One role row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Role {
    /// Job title.
    pub title: String,
    /// Employer; empty by default.
    pub company: String,
    /// Seniority; `"Entry"` by default.
    pub level: String,
}

/// Binding for the user's roles. Roles can be added or removed but not
/// edited in place.
#[derive(Debug, Clone, Copy, Default)]
pub struct RolesBinding;

impl CollectionBinding for RolesBinding {
    type Fields = Role;

    fn entity_name(&self) -> &'static str {
        ENTITY
    }

    fn fetch_operation(&self, identity: &UserIdentity) -> Operation {
        Operation::scoped("GetUserRoles", FETCH_DOCUMENT, identity)
    }

    fn project(&self, data: &Value) -> Result<Vec<Entity<Role>>, SyncError> {
        project_list(ENTITY, user_list(data, "roles")?, |raw: RawRole| {
            Ok(Entity::confirmed(
                required(ENTITY, "id", raw.id)?,
                Role {
                    title: required(ENTITY, "title", raw.title)?,
                    company: raw.company.unwrap_or_default(),
                    level: or_default(raw.level, "Entry"),
                },
            ))
        })
    }

    fn add_operation(&self, identity: &UserIdentity, fields: &Role) -> Option<Operation> {
        Some(
            Operation::scoped("AddUserRole", ADD_DOCUMENT, identity)
                .with_variable("title", fields.title.as_str())
                .with_variable("company", fields.company.as_str())
                .with_variable("level", fields.level.as_str()),
        )
    }

    fn remove_operation(&self, identity: &UserIdentity, id: &str) -> Option<Operation> {
        Some(
            Operation::scoped("RemoveUserRole", REMOVE_DOCUMENT, identity)
                .with_variable("roleId", id),
        )
    }
}
