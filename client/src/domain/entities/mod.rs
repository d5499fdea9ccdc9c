//! Per-entity bindings for the career-guidance backend.
//!
//! Each module owns the raw payload DTOs (every member optional, mirroring
//! the GraphQL schema), the flat UI-facing record, the operation documents,
//! and the binding that plugs them into a controller.

mod career_goals;
mod onboarding;
mod profile;
mod projects;
mod roles;
mod skill_detail;
mod skills;
mod trending;

pub use career_goals::{CareerGoal, CareerGoalsBinding};
pub use onboarding::{Onboarding, OnboardingBinding};
pub use profile::{Profile, ProfileBinding};
pub use projects::{Project, ProjectsBinding};
pub use roles::{Role, RolesBinding};
pub use skill_detail::{LearningResource, SkillDetail, SkillDetailBinding};
pub use skills::{UserSkill, UserSkillsBinding};
pub use trending::{TrendingSkill, TrendingSkillsBinding};

use serde_json::Value;

use crate::domain::SyncError;
use crate::domain::projection::expect_present;

/// Shared fallback for free-text descriptions.
pub(crate) const NO_DESCRIPTION: &str = "No description available.";
/// Shared fallback for skill categories.
pub(crate) const DEFAULT_CATEGORY: &str = "General";

/// Resolve `getUserById`, the root of every user-scoped query.
pub(crate) fn user_payload(data: &Value) -> Result<&Value, SyncError> {
    expect_present(data, &["getUserById"], "User not found")
}

/// A list member of the user payload; absent lists project to no rows.
pub(crate) fn user_list<'a>(data: &'a Value, member: &str) -> Result<&'a Value, SyncError> {
    Ok(user_payload(data)?.get(member).unwrap_or(&Value::Null))
}
