//! Skills the user has listed on their profile.
//!
//! Adds, renames, and removals persist then refetch. Proficiency sliders
//! edit rows through `edit_local_at` and are never sent on their own.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{DEFAULT_CATEGORY, user_list};
use crate::domain::projection::{or_default, project_list, required};
use crate::domain::sync::CollectionBinding;
use crate::domain::{Entity, Operation, SyncError, UserIdentity};

const ENTITY: &str = "Skills";

const FETCH_DOCUMENT: &str = "\
query GetUserSkills($userId: ID!, $token: String!) {
  getUserById(id: $userId, token: $token) {
    skills { id name category proficiency yearsOfExperience }
  }
}";

const ADD_DOCUMENT: &str = "\
mutation AddUserSkill($userId: ID!, $token: String!, $name: String!, $category: String, $proficiency: String, $yearsOfExperience: Int) {
  addUserSkill(userId: $userId, token: $token, name: $name, category: $category, proficiency: $proficiency, yearsOfExperience: $yearsOfExperience) { id }
}";

const UPDATE_DOCUMENT: &str = "\
mutation UpdateUserSkill($userId: ID!, $token: String!, $skillId: ID!, $name: String!, $category: String, $proficiency: String, $yearsOfExperience: Int) {
  updateUserSkill(userId: $userId, token: $token, skillId: $skillId, name: $name, category: $category, proficiency: $proficiency, yearsOfExperience: $yearsOfExperience) { id }
}";

const REMOVE_DOCUMENT: &str = "\
mutation RemoveUserSkill($userId: ID!, $token: String!, $skillId: ID!) {
  removeUserSkill(userId: $userId, token: $token, skillId: $skillId)
}";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawUserSkill {
    id: Option<String>,
    name: Option<String>,
    category: Option<String>,
    proficiency: Option<String>,
    years_of_experience: Option<u32>,
}

/// One skill row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSkill {
    /// Skill name.
    pub name: String,
    /// Category; `"General"` by default.
    pub category: String,
    /// Proficiency label; `"Beginner"` by default.
    pub proficiency: String,
    /// Years of experience; zero by default.
    pub years_of_experience: u32,
}

impl UserSkill {
    /// A new skill with default category and proficiency.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: DEFAULT_CATEGORY.to_owned(),
            proficiency: "Beginner".to_owned(),
            years_of_experience: 0,
        }
    }
}

fn with_fields(operation: Operation, skill: &UserSkill) -> Operation {
    operation
        .with_variable("name", skill.name.as_str())
        .with_variable("category", skill.category.as_str())
        .with_variable("proficiency", skill.proficiency.as_str())
        .with_variable("yearsOfExperience", skill.years_of_experience)
}

/// Binding for the user's skills.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserSkillsBinding;

impl CollectionBinding for UserSkillsBinding {
    type Fields = UserSkill;

    fn entity_name(&self) -> &'static str {
        ENTITY
    }

    fn fetch_operation(&self, identity: &UserIdentity) -> Operation {
        Operation::scoped("GetUserSkills", FETCH_DOCUMENT, identity)
    }

    fn project(&self, data: &Value) -> Result<Vec<Entity<UserSkill>>, SyncError> {
        project_list(ENTITY, user_list(data, "skills")?, |raw: RawUserSkill| {
            Ok(Entity::confirmed(
                required(ENTITY, "id", raw.id)?,
                UserSkill {
                    name: required(ENTITY, "name", raw.name)?,
                    category: or_default(raw.category, DEFAULT_CATEGORY),
                    proficiency: or_default(raw.proficiency, "Beginner"),
                    years_of_experience: raw.years_of_experience.unwrap_or(0),
                },
            ))
        })
    }

    fn add_operation(&self, identity: &UserIdentity, fields: &UserSkill) -> Option<Operation> {
        Some(with_fields(
            Operation::scoped("AddUserSkill", ADD_DOCUMENT, identity),
            fields,
        ))
    }

    fn update_operation(
        &self,
        identity: &UserIdentity,
        id: &str,
        fields: &UserSkill,
    ) -> Option<Operation> {
        Some(with_fields(
            Operation::scoped("UpdateUserSkill", UPDATE_DOCUMENT, identity)
                .with_variable("skillId", id),
            fields,
        ))
    }

    fn remove_operation(&self, identity: &UserIdentity, id: &str) -> Option<Operation> {
        Some(
            Operation::scoped("RemoveUserSkill", REMOVE_DOCUMENT, identity)
                .with_variable("skillId", id),
        )
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::{EntityId, ErrorCode};
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn projection_keeps_id_and_name_verbatim() {
        let data = json!({ "getUserById": { "skills": [
            { "id": "s-1", "name": "  Rust ", "category": null },
            null,
            { "id": "s-2", "name": "SQL", "category": "Data", "proficiency": "Expert", "yearsOfExperience": 4 }
        ] } });

        let rows = UserSkillsBinding.project(&data).expect("projection");

        assert_eq!(rows.len(), 2);
        let first = rows.first().expect("first row");
        assert_eq!(first.id(), &EntityId::server("s-1"));
        assert_eq!(first.fields(), &UserSkill::named("  Rust "));
        let second = rows.last().expect("second row");
        assert_eq!(second.fields().years_of_experience, 4);
        assert_eq!(second.fields().category, "Data");
    }

    #[rstest]
    fn user_without_skills_has_no_rows() {
        let data = json!({ "getUserById": { "skills": null } });
        assert!(UserSkillsBinding.project(&data).expect("projection").is_empty());
    }

    #[rstest]
    fn unknown_user_is_not_found() {
        let err = UserSkillsBinding
            .project(&json!({ "getUserById": null }))
            .expect_err("missing user");
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.message(), "User not found");
    }

    #[rstest]
    fn update_targets_the_server_skill_id() {
        let identity = UserIdentity::try_from_parts("u-1", "tok").expect("identity");
        let op = UserSkillsBinding
            .update_operation(&identity, "s-9", &UserSkill::named("Go"))
            .expect("skills are editable");
        assert_eq!(op.variables()["skillId"], "s-9");
        assert_eq!(op.variables()["yearsOfExperience"], 0);
    }
}
