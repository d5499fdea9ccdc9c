//! Onboarding aggregate: the answers collected by the first-run flow.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::user_payload;
use crate::domain::projection::{compact, decode, required};
use crate::domain::sync::RecordBinding;
use crate::domain::{Operation, SyncError, UserIdentity};

const ENTITY: &str = "Onboarding";

const FETCH_DOCUMENT: &str = "\
query GetOnboarding($userId: ID!, $token: String!) {
  getUserById(id: $userId, token: $token) {
    id interests targetRole experienceLevel onboardingCompleted
  }
}";

const SAVE_DOCUMENT: &str = "\
mutation SaveOnboarding($userId: ID!, $token: String!, $interests: [String!]!, $targetRole: String, $experienceLevel: String, $completed: Boolean!) {
  saveOnboarding(id: $userId, token: $token, interests: $interests, targetRole: $targetRole, experienceLevel: $experienceLevel, completed: $completed) { id }
}";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawOnboarding {
    id: Option<String>,
    interests: Option<Vec<Option<String>>>,
    target_role: Option<String>,
    experience_level: Option<String>,
    onboarding_completed: Option<bool>,
}

/// Onboarding answers for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Onboarding {
    /// Server user id.
    pub user_id: String,
    /// Selected interest areas, in the order chosen.
    pub interests: Vec<String>,
    /// Role the user is aiming for, if picked.
    pub target_role: Option<String>,
    /// Self-assessed experience, if picked.
    pub experience_level: Option<String>,
    /// Whether the flow was finished.
    pub completed: bool,
}

/// Binding for the onboarding aggregate.
#[derive(Debug, Clone, Copy, Default)]
pub struct OnboardingBinding;

impl RecordBinding for OnboardingBinding {
    type Record = Onboarding;

    fn entity_name(&self) -> &'static str {
        ENTITY
    }

    fn fetch_operation(&self, identity: &UserIdentity) -> Operation {
        Operation::scoped("GetOnboarding", FETCH_DOCUMENT, identity)
    }

    fn project(&self, data: &Value) -> Result<Onboarding, SyncError> {
        let raw: RawOnboarding = decode(ENTITY, user_payload(data)?)?;
        Ok(Onboarding {
            user_id: required(ENTITY, "id", raw.id)?,
            interests: compact(raw.interests),
            target_role: raw.target_role.filter(|role| !role.trim().is_empty()),
            experience_level: raw.experience_level,
            completed: raw.onboarding_completed.unwrap_or(false),
        })
    }

    fn save_operation(&self, identity: &UserIdentity, record: &Onboarding) -> Option<Operation> {
        Some(
            Operation::scoped("SaveOnboarding", SAVE_DOCUMENT, identity)
                .with_variable("interests", record.interests.clone())
                .with_variable("targetRole", record.target_role.clone())
                .with_variable("experienceLevel", record.experience_level.clone())
                .with_variable("completed", record.completed),
        )
    }
}
