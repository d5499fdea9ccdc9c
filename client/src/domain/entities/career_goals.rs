//! Career goals with optional target dates.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::{NO_DESCRIPTION, user_list};
use crate::domain::projection::{or_default, project_list, required};
use crate::domain::sync::CollectionBinding;
use crate::domain::{Entity, Operation, SyncError, UserIdentity};

const ENTITY: &str = "Career goals";
const DATE_FORMAT: &str = "%Y-%m-%d";

const FETCH_DOCUMENT: &str = "\
query GetCareerGoals($userId: ID!, $token: String!) {
  getUserById(id: $userId, token: $token) {
    careerGoals { id title description status targetDate }
  }
}";

const ADD_DOCUMENT: &str = "\
mutation AddCareerGoal($userId: ID!, $token: String!, $title: String!, $description: String, $status: String, $targetDate: String) {
  addCareerGoal(userId: $userId, token: $token, title: $title, description: $description, status: $status, targetDate: $targetDate) { id }
}";

const UPDATE_DOCUMENT: &str = "\
mutation UpdateCareerGoal($userId: ID!, $token: String!, $goalId: ID!, $title: String!, $description: String, $status: String, $targetDate: String) {
  updateCareerGoal(userId: $userId, token: $token, goalId: $goalId, title: $title, description: $description, status: $status, targetDate: $targetDate) { id }
}";

const REMOVE_DOCUMENT: &str = "\
mutation RemoveCareerGoal($userId: ID!, $token: String!, $goalId: ID!) {
  removeCareerGoal(userId: $userId, token: $token, goalId: $goalId)
}";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCareerGoal {
    id: Option<String>,
    title: Option<String>,
    description: Option<String>,
    status: Option<String>,
    target_date: Option<String>,
}

/// One career goal row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerGoal {
    /// Goal title.
    pub title: String,
    /// Details; `"No description available."` by default.
    pub description: String,
    /// Progress label; `"In progress"` by default.
    pub status: String,
    /// Target date, when one parses as `YYYY-MM-DD`.
    pub target_date: Option<NaiveDate>,
}

fn parse_target_date(raw: Option<String>) -> Option<NaiveDate> {
    let raw = raw?;
    match NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(err) => {
            debug!(value = %raw, error = %err, "ignoring unparseable career goal date");
            None
        }
    }
}

fn with_fields(operation: Operation, goal: &CareerGoal) -> Operation {
    operation
        .with_variable("title", goal.title.as_str())
        .with_variable("description", goal.description.as_str())
        .with_variable("status", goal.status.as_str())
        .with_variable(
            "targetDate",
            goal.target_date
                .map(|date| date.format(DATE_FORMAT).to_string()),
        )
}

/// Binding for the user's career goals.
#[derive(Debug, Clone, Copy, Default)]
pub struct CareerGoalsBinding;

impl CollectionBinding for CareerGoalsBinding {
    type Fields = CareerGoal;

    fn entity_name(&self) -> &'static str {
        ENTITY
    }

    fn fetch_operation(&self, identity: &UserIdentity) -> Operation {
        Operation::scoped("GetCareerGoals", FETCH_DOCUMENT, identity)
    }

    fn project(&self, data: &Value) -> Result<Vec<Entity<CareerGoal>>, SyncError> {
        project_list(ENTITY, user_list(data, "careerGoals")?, |raw: RawCareerGoal| {
            Ok(Entity::confirmed(
                required(ENTITY, "id", raw.id)?,
                CareerGoal {
                    title: required(ENTITY, "title", raw.title)?,
                    description: or_default(raw.description, NO_DESCRIPTION),
                    status: or_default(raw.status, "In progress"),
                    target_date: parse_target_date(raw.target_date),
                },
            ))
        })
    }

    fn add_operation(&self, identity: &UserIdentity, fields: &CareerGoal) -> Option<Operation> {
        Some(with_fields(
            Operation::scoped("AddCareerGoal", ADD_DOCUMENT, identity),
            fields,
        ))
    }

    fn update_operation(
        &self,
        identity: &UserIdentity,
        id: &str,
        fields: &CareerGoal,
    ) -> Option<Operation> {
        Some(with_fields(
            Operation::scoped("UpdateCareerGoal", UPDATE_DOCUMENT, identity)
                .with_variable("goalId", id),
            fields,
        ))
    }

    fn remove_operation(&self, identity: &UserIdentity, id: &str) -> Option<Operation> {
        Some(
            Operation::scoped("RemoveCareerGoal", REMOVE_DOCUMENT, identity)
                .with_variable("goalId", id),
        )
    }
}
