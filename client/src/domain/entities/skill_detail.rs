//! Read-only detail view for one skill from the catalogue.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{DEFAULT_CATEGORY, NO_DESCRIPTION};
use crate::domain::projection::{compact, decode, expect_present, or_default, required};
use crate::domain::sync::RecordBinding;
use crate::domain::{Operation, SyncError, UserIdentity};

const ENTITY: &str = "Skill";

const FETCH_DOCUMENT: &str = "\
query GetSkillById($userId: ID!, $token: String!, $skillId: ID!) {
  getSkillById(id: $skillId, userId: $userId, token: $token) {
    id name category description demand relatedRoles resources { title url }
  }
}";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSkillDetail {
    id: Option<String>,
    name: Option<String>,
    category: Option<String>,
    description: Option<String>,
    demand: Option<String>,
    related_roles: Option<Vec<Option<String>>>,
    resources: Option<Vec<Option<RawResource>>>,
}

#[derive(Debug, Deserialize)]
struct RawResource {
    title: Option<String>,
    url: Option<String>,
}

/// A learning resource linked from a skill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LearningResource {
    /// Resource title.
    pub title: String,
    /// Link, when the server has one.
    pub url: Option<String>,
}

/// Skill detail record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillDetail {
    /// Catalogue id.
    pub id: String,
    /// Skill name.
    pub name: String,
    /// Category; `"General"` by default.
    pub category: String,
    /// Summary; `"No description available."` by default.
    pub description: String,
    /// Market demand label; `"Moderate"` by default.
    pub demand: String,
    /// Roles that use this skill.
    pub related_roles: Vec<String>,
    /// Learning resources. Entries without a title are skipped.
    pub resources: Vec<LearningResource>,
}

/// Binding for one catalogue skill.
#[derive(Debug, Clone)]
pub struct SkillDetailBinding {
    skill_id: String,
}

impl SkillDetailBinding {
    /// Bind to the skill with catalogue id `skill_id`.
    pub fn new(skill_id: impl Into<String>) -> Self {
        Self {
            skill_id: skill_id.into(),
        }
    }

    /// Catalogue id this binding fetches.
    #[must_use]
    pub fn skill_id(&self) -> &str {
        self.skill_id.as_str()
    }
}

impl RecordBinding for SkillDetailBinding {
    type Record = SkillDetail;

    fn entity_name(&self) -> &'static str {
        ENTITY
    }

    fn fetch_operation(&self, identity: &UserIdentity) -> Operation {
        Operation::scoped("GetSkillById", FETCH_DOCUMENT, identity)
            .with_variable("skillId", self.skill_id.as_str())
    }

    fn project(&self, data: &Value) -> Result<SkillDetail, SyncError> {
        let payload = expect_present(data, &["getSkillById"], "Skill not found")?;
        let raw: RawSkillDetail = decode(ENTITY, payload)?;
        let resources = raw
            .resources
            .unwrap_or_default()
            .into_iter()
            .flatten()
            .filter_map(|resource| {
                Some(LearningResource {
                    title: resource.title.filter(|title| !title.trim().is_empty())?,
                    url: resource.url,
                })
            })
            .collect();
        Ok(SkillDetail {
            id: required(ENTITY, "id", raw.id)?,
            name: required(ENTITY, "name", raw.name)?,
            category: or_default(raw.category, DEFAULT_CATEGORY),
            description: or_default(raw.description, NO_DESCRIPTION),
            demand: or_default(raw.demand, "Moderate"),
            related_roles: compact(raw.related_roles),
            resources,
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn fetch_passes_the_skill_id() {
        let identity = UserIdentity::try_from_parts("u-1", "tok").expect("identity");
        let op = SkillDetailBinding::new("sk-7").fetch_operation(&identity);
        assert_eq!(op.variables()["skillId"], "sk-7");
    }

    #[rstest]
    fn detail_defaults_and_resource_filtering() {
        let data = json!({ "getSkillById": {
            "id": "sk-7",
            "name": "Kotlin",
            "resources": [
                { "title": "Koans", "url": "https://example.com/koans" },
                null,
                { "title": "", "url": "https://example.com/blank" }
            ]
        } });

        let detail = SkillDetailBinding::new("sk-7").project(&data).expect("projection");

        assert_eq!(detail.category, DEFAULT_CATEGORY);
        assert_eq!(detail.demand, "Moderate");
        assert_eq!(detail.description, NO_DESCRIPTION);
        assert_eq!(
            detail.resources,
            vec![LearningResource {
                title: "Koans".to_owned(),
                url: Some("https://example.com/koans".to_owned()),
            }]
        );
    }

    #[rstest]
    fn missing_skill_is_not_found() {
        let err = SkillDetailBinding::new("sk-404")
            .project(&json!({ "getSkillById": null }))
            .expect_err("missing");
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.message(), "Skill not found");
    }
}
