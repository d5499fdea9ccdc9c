//! Session lifecycle: resolving, creating, and ending the active identity.
//!
//! Controllers receive a [`SessionContext`] at construction instead of
//! reading the credential store themselves, so tests can hand them an
//! anonymous or authenticated context directly.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::domain::ports::{CredentialStore, CredentialStoreError, RemoteGateway};
use crate::domain::projection::{decode, expect_present, required};
use crate::domain::{LoginCredentials, Operation, SignupDetails, SyncError, UserIdentity};

const LOGIN_DOCUMENT: &str = "\
mutation Login($email: String!, $password: String!) {
  login(email: $email, password: $password) { token user { id } }
}";

const SIGNUP_DOCUMENT: &str = "\
mutation Signup($name: String!, $email: String!, $password: String!) {
  signup(input: { name: $name, email: $email, password: $password }) { token user { id } }
}";

/// Identity snapshot handed to controllers.
///
/// Cloning is cheap; the identity itself is shared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    identity: Option<Arc<UserIdentity>>,
}

impl SessionContext {
    /// A context for a logged-in user.
    #[must_use]
    pub fn authenticated(identity: UserIdentity) -> Self {
        Self {
            identity: Some(Arc::new(identity)),
        }
    }

    /// A context with no user; every scoped call fails its precondition.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// The active identity, if any.
    #[must_use]
    pub fn identity(&self) -> Option<&UserIdentity> {
        self.identity.as_deref()
    }

    /// Whether a user is logged in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAuthPayload {
    token: Option<String>,
    user: Option<RawAuthUser>,
}

#[derive(Debug, Deserialize)]
struct RawAuthUser {
    id: Option<String>,
}

fn project_identity(data: &Value, root: &str) -> Result<UserIdentity, SyncError> {
    let payload = expect_present(data, &[root], "Account not found")?;
    let raw: RawAuthPayload = decode("Session", payload)?;
    let token = required("Session", "token", raw.token)?;
    let user_id = required("Session", "user.id", raw.user.and_then(|user| user.id))?;
    UserIdentity::try_from_parts(user_id, token)
        .map_err(|err| SyncError::malformed_payload(format!("Session payload is invalid: {err}")))
}

fn map_store_error(error: CredentialStoreError) -> SyncError {
    warn!(error = %error, "credential store failure");
    SyncError::storage(error.to_string())
}

/// Service owning login, signup, logout, and session resolution.
#[derive(Clone)]
pub struct SessionService<G: ?Sized, S: ?Sized> {
    gateway: Arc<G>,
    store: Arc<S>,
}

impl<G: ?Sized, S: ?Sized> SessionService<G, S> {
    /// Create a service over the given gateway and store.
    pub fn new(gateway: Arc<G>, store: Arc<S>) -> Self {
        Self { gateway, store }
    }
}

impl<G, S> SessionService<G, S>
where
    G: RemoteGateway + ?Sized,
    S: CredentialStore + ?Sized,
{
    /// Resolve the stored identity into a context.
    pub fn current(&self) -> Result<SessionContext, SyncError> {
        let identity = self.store.identity().map_err(map_store_error)?;
        Ok(identity.map_or_else(SessionContext::anonymous, SessionContext::authenticated))
    }

    /// Authenticate and persist the resulting identity.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<SessionContext, SyncError> {
        let operation = Operation::new("Login", LOGIN_DOCUMENT)
            .with_variable("email", credentials.email())
            .with_variable("password", credentials.password());
        self.establish(operation, "login").await
    }

    /// Register a new account and persist the resulting identity.
    pub async fn signup(&self, details: &SignupDetails) -> Result<SessionContext, SyncError> {
        let credentials = details.credentials();
        let operation = Operation::new("Signup", SIGNUP_DOCUMENT)
            .with_variable("name", details.name())
            .with_variable("email", credentials.email())
            .with_variable("password", credentials.password());
        self.establish(operation, "signup").await
    }

    /// Forget the active identity.
    pub fn logout(&self) -> Result<(), SyncError> {
        self.store.clear().map_err(map_store_error)?;
        info!("session cleared");
        Ok(())
    }

    async fn establish(&self, operation: Operation, root: &str) -> Result<SessionContext, SyncError> {
        let data = self
            .gateway
            .execute(&operation)
            .await
            .map_err(SyncError::from)?;
        let identity = project_identity(&data, root)?;
        self.store.save(&identity).map_err(map_store_error)?;
        info!(user_id = %identity.id(), operation = operation.name(), "session established");
        Ok(SessionContext::authenticated(identity))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the session lifecycle.
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{
        FixtureRemoteGateway, GatewayError, InMemoryCredentialStore, MockCredentialStore,
    };
    use rstest::{fixture, rstest};
    use serde_json::json;

    #[fixture]
    fn credentials() -> LoginCredentials {
        LoginCredentials::try_from_parts("ada@example.com", "pw").expect("credentials")
    }

    fn service_with(
        response: Result<Value, GatewayError>,
    ) -> (
        SessionService<FixtureRemoteGateway, InMemoryCredentialStore>,
        Arc<InMemoryCredentialStore>,
    ) {
        let gateway = Arc::new(FixtureRemoteGateway::new().with_response("Login", response));
        let store = Arc::new(InMemoryCredentialStore::default());
        (SessionService::new(gateway, store.clone()), store)
    }

    #[rstest]
    #[tokio::test]
    async fn login_persists_identity(credentials: LoginCredentials) {
        let (service, store) = service_with(Ok(json!({
            "login": { "token": "tok-1", "user": { "id": "u-1" } }
        })));

        let context = service.login(&credentials).await.expect("login succeeds");

        let identity = context.identity().expect("authenticated");
        assert_eq!(identity.id().as_ref(), "u-1");
        assert_eq!(store.identity().expect("read"), Some(identity.clone()));
    }

    #[rstest]
    #[tokio::test]
    async fn login_surfaces_server_message(credentials: LoginCredentials) {
        let (service, store) = service_with(Err(GatewayError::server("Invalid credentials")));

        let err = service.login(&credentials).await.expect_err("login fails");

        assert_eq!(err.message(), "Invalid credentials");
        assert_eq!(store.identity().expect("read"), None);
    }

    #[rstest]
    #[case(json!({ "login": null }), ErrorCode::NotFound)]
    #[case(json!({ "login": { "token": "tok" } }), ErrorCode::MalformedPayload)]
    #[case(json!({ "login": { "user": { "id": "u-1" } } }), ErrorCode::MalformedPayload)]
    #[tokio::test]
    async fn login_rejects_incomplete_payloads(
        credentials: LoginCredentials,
        #[case] payload: Value,
        #[case] expected: ErrorCode,
    ) {
        let (service, _store) = service_with(Ok(payload));
        let err = service.login(&credentials).await.expect_err("login fails");
        assert_eq!(err.code(), expected);
    }

    #[rstest]
    #[tokio::test]
    async fn signup_sends_trimmed_name() {
        let gateway = Arc::new(FixtureRemoteGateway::new().with_response(
            "Signup",
            Ok(json!({ "signup": { "token": "tok", "user": { "id": "u-9" } } })),
        ));
        let service = SessionService::new(gateway.clone(), Arc::new(InMemoryCredentialStore::default()));
        let details =
            SignupDetails::try_from_parts("  Ada ", "ada@example.com", "pw").expect("details");

        service.signup(&details).await.expect("signup succeeds");

        let calls = gateway.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].variables()["name"], "Ada");
    }

    #[rstest]
    fn current_maps_store_failures_to_storage_errors() {
        let mut store = MockCredentialStore::new();
        store
            .expect_identity()
            .times(1)
            .returning(|| Err(CredentialStoreError::corrupt("truncated file")));
        let service = SessionService::new(Arc::new(FixtureRemoteGateway::new()), Arc::new(store));

        let err = service.current().expect_err("store failure");

        assert_eq!(err.code(), ErrorCode::Storage);
        assert!(err.message().contains("truncated file"));
    }

    #[rstest]
    fn logout_clears_the_store() {
        let identity = UserIdentity::try_from_parts("u-1", "tok").expect("identity");
        let store = Arc::new(InMemoryCredentialStore::holding(identity));
        let service = SessionService::new(Arc::new(FixtureRemoteGateway::new()), store.clone());

        assert!(service.current().expect("current").is_authenticated());
        service.logout().expect("logout");
        assert!(!service.current().expect("current").is_authenticated());
    }
}
