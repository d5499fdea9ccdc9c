//! Portfolio projects.
//!
//! Edits stay local until the user presses submit, so the binding defaults
//! to `MutationPolicy::LocalOnly`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{NO_DESCRIPTION, user_list};
use crate::domain::projection::{compact, or_default, project_list, required};
use crate::domain::sync::{CollectionBinding, MutationPolicy, SyncOptions};
use crate::domain::{Entity, Operation, SyncError, UserIdentity};

const ENTITY: &str = "Projects";

const FETCH_DOCUMENT: &str = "\
query GetUserProjects($userId: ID!, $token: String!) {
  getUserById(id: $userId, token: $token) {
    projects { id title description technologies url }
  }
}";

const ADD_DOCUMENT: &str = "\
mutation AddProject($userId: ID!, $token: String!, $title: String!, $description: String, $technologies: [String!], $url: String) {
  addProject(userId: $userId, token: $token, title: $title, description: $description, technologies: $technologies, url: $url) { id }
}";

const UPDATE_DOCUMENT: &str = "\
mutation UpdateProject($userId: ID!, $token: String!, $projectId: ID!, $title: String!, $description: String, $technologies: [String!], $url: String) {
  updateProject(userId: $userId, token: $token, projectId: $projectId, title: $title, description: $description, technologies: $technologies, url: $url) { id }
}";

const REMOVE_DOCUMENT: &str = "\
mutation RemoveProject($userId: ID!, $token: String!, $projectId: ID!) {
  removeProject(userId: $userId, token: $token, projectId: $projectId)
}";

#[derive(Debug, Deserialize)]
struct RawProject {
    id: Option<String>,
    title: Option<String>,
    description: Option<String>,
    technologies: Option<Vec<Option<String>>>,
    url: Option<String>,
}

/// One project row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Project {
    /// Project title.
    pub title: String,
    /// Summary; `"No description available."` by default.
    pub description: String,
    /// Technologies used, in the order listed.
    pub technologies: Vec<String>,
    /// Link to the project, when provided.
    pub url: Option<String>,
}

impl Project {
    /// A blank project row as created by the "add project" button.
    #[must_use]
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: NO_DESCRIPTION.to_owned(),
            technologies: Vec::new(),
            url: None,
        }
    }
}

fn with_fields(operation: Operation, project: &Project) -> Operation {
    operation
        .with_variable("title", project.title.as_str())
        .with_variable("description", project.description.as_str())
        .with_variable("technologies", project.technologies.clone())
        .with_variable("url", project.url.clone())
}

/// Binding for the user's projects.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectsBinding;

impl CollectionBinding for ProjectsBinding {
    type Fields = Project;

    fn entity_name(&self) -> &'static str {
        ENTITY
    }

    fn options(&self) -> SyncOptions {
        SyncOptions::default().with_mutation_policy(MutationPolicy::LocalOnly)
    }

    fn fetch_operation(&self, identity: &UserIdentity) -> Operation {
        Operation::scoped("GetUserProjects", FETCH_DOCUMENT, identity)
    }

    fn project(&self, data: &Value) -> Result<Vec<Entity<Project>>, SyncError> {
        project_list(ENTITY, user_list(data, "projects")?, |raw: RawProject| {
            Ok(Entity::confirmed(
                required(ENTITY, "id", raw.id)?,
                Project {
                    title: required(ENTITY, "title", raw.title)?,
                    description: or_default(raw.description, NO_DESCRIPTION),
                    technologies: compact(raw.technologies),
                    url: raw.url.filter(|url| !url.is_empty()),
                },
            ))
        })
    }

    fn add_operation(&self, identity: &UserIdentity, fields: &Project) -> Option<Operation> {
        Some(with_fields(
            Operation::scoped("AddProject", ADD_DOCUMENT, identity),
            fields,
        ))
    }

    fn update_operation(
        &self,
        identity: &UserIdentity,
        id: &str,
        fields: &Project,
    ) -> Option<Operation> {
        Some(with_fields(
            Operation::scoped("UpdateProject", UPDATE_DOCUMENT, identity)
                .with_variable("projectId", id),
            fields,
        ))
    }

    fn remove_operation(&self, identity: &UserIdentity, id: &str) -> Option<Operation> {
        Some(
            Operation::scoped("RemoveProject", REMOVE_DOCUMENT, identity)
                .with_variable("projectId", id),
        )
    }
}
