//! Read-only list of skills trending across the platform.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::DEFAULT_CATEGORY;
use crate::domain::projection::{expect_present, or_default, project_list, required};
use crate::domain::sync::CollectionBinding;
use crate::domain::{Entity, Operation, SyncError, UserIdentity};

const ENTITY: &str = "Trending skills";

const FETCH_DOCUMENT: &str = "\
query TrendingSkills($userId: ID!, $token: String!) {
  trendingSkills(userId: $userId, token: $token) { id name category growth demand }
}";

#[derive(Debug, Deserialize)]
struct RawTrendingSkill {
    id: Option<String>,
    name: Option<String>,
    category: Option<String>,
    growth: Option<f64>,
    demand: Option<String>,
}

/// One trending skill.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendingSkill {
    /// Skill name.
    pub name: String,
    /// Category; `"General"` by default.
    pub category: String,
    /// Growth rate in percent; zero by default.
    pub growth: f64,
    /// Demand label; `"Moderate"` by default.
    pub demand: String,
}

/// Binding for the trending skills list.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrendingSkillsBinding;

impl CollectionBinding for TrendingSkillsBinding {
    type Fields = TrendingSkill;

    fn entity_name(&self) -> &'static str {
        ENTITY
    }

    fn fetch_operation(&self, identity: &UserIdentity) -> Operation {
        Operation::scoped("TrendingSkills", FETCH_DOCUMENT, identity)
    }

    fn project(&self, data: &Value) -> Result<Vec<Entity<TrendingSkill>>, SyncError> {
        let list = expect_present(data, &["trendingSkills"], "Trending skills not found")?;
        project_list(ENTITY, list, |raw: RawTrendingSkill| {
            Ok(Entity::confirmed(
                required(ENTITY, "id", raw.id)?,
                TrendingSkill {
                    name: required(ENTITY, "name", raw.name)?,
                    category: or_default(raw.category, DEFAULT_CATEGORY),
                    growth: raw.growth.unwrap_or(0.0),
                    demand: or_default(raw.demand, "Moderate"),
                },
            ))
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
    fn trending_rows_keep_server_order() {
        let data = json!({ "trendingSkills": [
            { "id": "t-1", "name": "Rust", "growth": 42.5 },
            null,
            { "id": "t-2", "name": "Terraform", "category": "DevOps", "demand": "High" }
        ] });

        let rows = TrendingSkillsBinding.project(&data).expect("projection");

        let names: Vec<&str> = rows.iter().map(|row| row.fields().name.as_str()).collect();
        assert_eq!(names, vec!["Rust", "Terraform"]);
        let rust = rows.first().map(Entity::fields).expect("first");
        assert_eq!(rust.category, DEFAULT_CATEGORY);
        assert!((rust.growth - 42.5).abs() < f64::EPSILON);
        let terraform = rows.last().map(Entity::fields).expect("last");
        assert!(terraform.growth.abs() < f64::EPSILON);
    }

    #[rstest]
    fn null_list_is_not_found() {
        let err = TrendingSkillsBinding
            .project(&json!({ "trendingSkills": null }))
            .expect_err("missing");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    fn trending_skills_are_read_only() {
        let identity = UserIdentity::try_from_parts("u-1", "tok").expect("identity");
        assert!(TrendingSkillsBinding.remove_operation(&identity, "t-1").is_none());
    }
}
