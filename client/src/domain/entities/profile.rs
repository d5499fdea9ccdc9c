//! User profile record.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::user_payload;
use crate::domain::projection::{decode, or_default, required};
use crate::domain::sync::RecordBinding;
use crate::domain::{Operation, SyncError, UserIdentity};

const ENTITY: &str = "Profile";

const FETCH_DOCUMENT: &str = "\
query GetUserProfile($userId: ID!, $token: String!) {
  getUserById(id: $userId, token: $token) {
    id name email bio location experienceLevel
  }
}";

const SAVE_DOCUMENT: &str = "\
mutation UpdateUserProfile($userId: ID!, $token: String!, $name: String!, $bio: String, $location: String, $experienceLevel: String) {
  updateUserProfile(id: $userId, token: $token, name: $name, bio: $bio, location: $location, experienceLevel: $experienceLevel) { id }
}";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProfile {
    id: Option<String>,
    name: Option<String>,
    email: Option<String>,
    bio: Option<String>,
    location: Option<String>,
    experience_level: Option<String>,
}

/// Flat profile shown on the profile screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Server user id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Contact email; empty when the server omits it.
    pub email: String,
    /// Free-text biography; empty by default.
    pub bio: String,
    /// Location; `"Not specified"` by default.
    pub location: String,
    /// Self-assessed experience; `"Beginner"` by default.
    pub experience_level: String,
}

fn project(raw: RawProfile) -> Result<Profile, SyncError> {
    Ok(Profile {
        id: required(ENTITY, "id", raw.id)?,
        name: required(ENTITY, "name", raw.name)?,
        email: raw.email.unwrap_or_default(),
        bio: raw.bio.unwrap_or_default(),
        location: or_default(raw.location, "Not specified"),
        experience_level: or_default(raw.experience_level, "Beginner"),
    })
}

/// Binding for the signed-in user's profile.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProfileBinding;

impl RecordBinding for ProfileBinding {
    type Record = Profile;

    fn entity_name(&self) -> &'static str {
        ENTITY
    }

    fn fetch_operation(&self, identity: &UserIdentity) -> Operation {
        Operation::scoped("GetUserProfile", FETCH_DOCUMENT, identity)
    }

    fn project(&self, data: &Value) -> Result<Profile, SyncError> {
        project(decode(ENTITY, user_payload(data)?)?)
    }

    fn save_operation(&self, identity: &UserIdentity, record: &Profile) -> Option<Operation> {
        Some(
            Operation::scoped("UpdateUserProfile", SAVE_DOCUMENT, identity)
                .with_variable("name", record.name.as_str())
                .with_variable("bio", record.bio.as_str())
                .with_variable("location", record.location.as_str())
                .with_variable("experienceLevel", record.experience_level.as_str()),
        )
    }
}
