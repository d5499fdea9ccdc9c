//! Executes parsed commands against the domain.
//!
//! The runner only depends on domain ports, so tests drive it with fixture
//! adapters and no network or filesystem access.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use super::{Command, EntityKind};
use crate::domain::entities::{
    CareerGoalsBinding, OnboardingBinding, ProfileBinding, ProjectsBinding, RolesBinding,
    SkillDetailBinding, TrendingSkillsBinding, UserSkillsBinding,
};
use crate::domain::ports::{CredentialStore, RemoteGateway};
use crate::domain::sync::{CollectionBinding, CollectionController, RecordBinding, RecordController};
use crate::domain::{
    CredentialsValidationError, LoginCredentials, RemoteResult, SessionContext, SessionService,
    SignupDetails, SyncError,
};

/// Errors that stop a command before it produces a result.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Login or signup input failed validation.
    #[error("invalid credentials: {0}")]
    InvalidCredentials(#[from] CredentialsValidationError),
    /// The result could not be rendered as JSON.
    #[error("failed to render output: {0}")]
    Render(#[from] serde_json::Error),
}

/// Rendered result of one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Pretty-printed `RemoteResult` JSON.
    pub json: String,
    /// `false` when the result is an `Error`.
    pub success: bool,
}

/// Port implementations the CLI depends on.
#[derive(Clone)]
pub struct CliPorts {
    /// Remote gateway.
    pub gateway: Arc<dyn RemoteGateway>,
    /// Session identity store.
    pub credentials: Arc<dyn CredentialStore>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionSummary {
    user_id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LogoutSummary {
    logged_out: bool,
}

/// Runs commands using the configured ports.
pub struct CliRunner {
    ports: CliPorts,
    sessions: SessionService<dyn RemoteGateway, dyn CredentialStore>,
}

impl CliRunner {
    /// Create a runner.
    pub fn new(ports: CliPorts) -> Self {
        let sessions = SessionService::new(
            Arc::clone(&ports.gateway),
            Arc::clone(&ports.credentials),
        );
        Self { ports, sessions }
    }

    /// Run one command.
    ///
    /// # Errors
    ///
    /// Returns [`CliError`] for invalid input or rendering failures. Remote
    /// and session failures are reported inside the rendered `Error` state.
    pub async fn run(&self, command: Command) -> Result<CommandOutput, CliError> {
        match command {
            Command::Login { email, password } => {
                let credentials = LoginCredentials::try_from_parts(&email, &password)?;
                render(&summarise(self.sessions.login(&credentials).await))
            }
            Command::Signup {
                name,
                email,
                password,
            } => {
                let details = SignupDetails::try_from_parts(&name, &email, &password)?;
                render(&summarise(self.sessions.signup(&details).await))
            }
            Command::Logout => render(&RemoteResult::from(
                self.sessions
                    .logout()
                    .map(|()| LogoutSummary { logged_out: true }),
            )),
            Command::Fetch { entity } => self.fetch(entity).await,
            Command::Skill { id } => {
                let session = match self.sessions.current() {
                    Ok(session) => session,
                    Err(error) => return render(&RemoteResult::<()>::from(Err(error))),
                };
                self.fetch_record(session, SkillDetailBinding::new(id)).await
            }
        }
    }

    async fn fetch(&self, entity: EntityKind) -> Result<CommandOutput, CliError> {
        let session = match self.sessions.current() {
            Ok(session) => session,
            Err(error) => return render(&RemoteResult::<()>::from(Err(error))),
        };
        match entity {
            EntityKind::Profile => self.fetch_record(session, ProfileBinding).await,
            EntityKind::Onboarding => self.fetch_record(session, OnboardingBinding).await,
            EntityKind::Skills => self.fetch_collection(session, UserSkillsBinding).await,
            EntityKind::Projects => self.fetch_collection(session, ProjectsBinding).await,
            EntityKind::Roles => self.fetch_collection(session, RolesBinding).await,
            EntityKind::Goals => self.fetch_collection(session, CareerGoalsBinding).await,
            EntityKind::Trending => self.fetch_collection(session, TrendingSkillsBinding).await,
        }
    }

    async fn fetch_collection<B>(
        &self,
        session: SessionContext,
        binding: B,
    ) -> Result<CommandOutput, CliError>
    where
        B: CollectionBinding,
        B::Fields: Serialize,
    {
        let controller = CollectionController::new(Arc::clone(&self.ports.gateway), session, binding);
        if let Err(error) = controller.fetch().await {
            debug!(error = %error, "fetch finished with an error state");
        }
        render(&controller.state())
    }

    async fn fetch_record<B>(&self, session: SessionContext, binding: B) -> Result<CommandOutput, CliError>
    where
        B: RecordBinding,
        B::Record: Serialize,
    {
        let controller = RecordController::new(Arc::clone(&self.ports.gateway), session, binding);
        if let Err(error) = controller.fetch().await {
            debug!(error = %error, "fetch finished with an error state");
        }
        render(&controller.state())
    }
}

fn summarise(outcome: Result<SessionContext, SyncError>) -> RemoteResult<SessionSummary> {
    RemoteResult::from(outcome.and_then(|session| {
        session
            .identity()
            .map(|identity| SessionSummary {
                user_id: identity.id().to_string(),
            })
            .ok_or_else(SyncError::not_logged_in)
    }))
}

fn render<T: Serialize>(result: &RemoteResult<T>) -> Result<CommandOutput, CliError> {
    Ok(CommandOutput {
        json: serde_json::to_string_pretty(result)?,
        success: result.error_message().is_none(),
    })
}
