//! Session manager: login, logout and restore

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info, warn};

use crate::app::client::ApiClient;
use crate::app::models::Session;
use crate::errors::AuthResult;

use super::hydration::HydrationGate;
use super::storage::SessionStorage;

/// Auth state as rendered by the login form and layout
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    pub session: Session,
    pub loading: bool,
    pub error: Option<String>,
}

/// Owns the authenticated session
///
/// The in-memory session is authoritative. Storage failures are logged and
/// never fail a login or logout.
#[derive(Debug)]
pub struct SessionManager {
    client: Arc<ApiClient>,
    storage: Arc<dyn SessionStorage>,
    gate: Arc<HydrationGate>,
    state: watch::Sender<AuthState>,
}

impl SessionManager {
    pub fn new(
        client: Arc<ApiClient>,
        storage: Arc<dyn SessionStorage>,
        gate: Arc<HydrationGate>,
    ) -> Self {
        let (state, _) = watch::channel(AuthState::default());
        Self {
            client,
            storage,
            gate,
            state,
        }
    }

    /// Restore the persisted session and open the hydration gate
    ///
    /// An unreadable record restores nothing. Calling again after the gate
    /// is open does nothing.
    pub async fn hydrate(&self) {
        if self.gate.is_hydrated() {
            return;
        }

        match self.storage.load().await {
            Ok(session) => {
                if let Some(user) = &session.user {
                    info!("Restored session for {}", user.username);
                }
                self.state.send_modify(|state| state.session = session);
            }
            Err(e) => warn!("Could not restore session: {}", e),
        }

        self.gate.mark_hydrated();
    }

    /// Sign in with username and password
    ///
    /// On success the session is replaced and persisted. On failure the
    /// message lands in `error` and the current session is kept.
    pub async fn login(&self, username: &str, password: &str) -> AuthResult<Session> {
        self.state.send_modify(|state| {
            state.loading = true;
            state.error = None;
        });

        match self.client.login(username, password).await {
            Ok(response) => {
                let session = Session::from(response);
                info!("Signed in as {}", username);
                let signed_in = session.clone();
                self.state.send_modify(|state| {
                    state.session = signed_in;
                    state.loading = false;
                });
                if let Err(e) = self.storage.save(&session).await {
                    warn!("Could not persist session: {}", e);
                }
                Ok(session)
            }
            Err(e) => {
                warn!("Login failed for {}: {}", username, e);
                let message = e.message();
                self.state.send_modify(|state| {
                    state.loading = false;
                    state.error = Some(message);
                });
                Err(e)
            }
        }
    }

    /// Sign out; purely local
    pub async fn logout(&self) {
        self.state.send_modify(|state| state.session = Session::default());
        info!("Signed out");
        if let Err(e) = self.storage.clear().await {
            warn!("Could not clear persisted session: {}", e);
        }
    }

    /// Current session
    pub fn session(&self) -> Session {
        self.state.borrow().session.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().session.is_authenticated()
    }

    /// Snapshot of the auth state
    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    pub fn gate(&self) -> &Arc<HydrationGate> {
        &self.gate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::client::ClientConfig;
    use crate::app::session::storage::MemorySessionStorage;
    use crate::errors::AuthError;
    use httpmock::MockServer;
    use serde_json::json;

    fn manager(server: &MockServer, storage: Arc<MemorySessionStorage>) -> SessionManager {
        let client = ApiClient::new(&server.base_url(), &ClientConfig::default()).unwrap();
        SessionManager::new(Arc::new(client), storage, Arc::new(HydrationGate::new()))
    }

    async fn mock_login(server: &MockServer) {
        server
            .mock_async(|when, then| {
                when.method("POST")
                    .path("/auth/login")
                    .json_body(json!({ "username": "emilys", "password": "emilyspass" }));
                then.status(200).json_body(json!({
                    "id": 1,
                    "username": "emilys",
                    "firstName": "Emily",
                    "accessToken": "token-abc"
                }));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method("POST")
                    .path("/auth/login")
                    .json_body(json!({ "username": "emilys", "password": "wrong" }));
                then.status(400)
                    .json_body(json!({ "message": "Invalid credentials" }));
            })
            .await;
    }

    #[tokio::test]
    async fn test_login_sets_and_persists_session() {
        let server = MockServer::start_async().await;
        mock_login(&server).await;
        let storage = Arc::new(MemorySessionStorage::default());
        let manager = manager(&server, storage.clone());

        let session = manager.login("emilys", "emilyspass").await.unwrap();
        assert_eq!(session.token.as_deref(), Some("token-abc"));

        let state = manager.state();
        assert!(state.session.is_authenticated());
        assert!(!state.loading);
        assert!(state.error.is_none());
        assert_eq!(storage.load().await.unwrap(), session);
    }

    #[tokio::test]
    async fn test_login_failure_keeps_session_and_sets_error() {
        let server = MockServer::start_async().await;
        mock_login(&server).await;
        let storage = Arc::new(MemorySessionStorage::default());
        let manager = manager(&server, storage.clone());

        let err = manager.login("emilys", "wrong").await.unwrap_err();
        assert!(matches!(err, AuthError::Rejected { .. }));

        let state = manager.state();
        assert!(!state.session.is_authenticated());
        assert!(!state.loading);
        assert_eq!(state.error.as_deref(), Some("Invalid credentials"));
        assert!(storage.raw().await.is_none());
    }

    #[tokio::test]
    async fn test_logout_clears_session_and_storage() {
        let server = MockServer::start_async().await;
        mock_login(&server).await;
        let storage = Arc::new(MemorySessionStorage::default());
        let manager = manager(&server, storage.clone());

        manager.login("emilys", "emilyspass").await.unwrap();
        manager.logout().await;

        assert!(!manager.is_authenticated());
        assert_eq!(manager.session(), Session::default());
        assert!(storage.raw().await.is_none());
    }

    #[tokio::test]
    async fn test_hydrate_restores_and_opens_gate() {
        let server = MockServer::start_async().await;
        mock_login(&server).await;
        let storage = Arc::new(MemorySessionStorage::default());
        manager(&server, storage.clone())
            .login("emilys", "emilyspass")
            .await
            .unwrap();

        let restarted = manager(&server, storage);
        assert!(!restarted.gate().is_hydrated());
        restarted.hydrate().await;

        assert!(restarted.gate().is_hydrated());
        assert_eq!(
            restarted.session().user.map(|u| u.username),
            Some("emilys".to_string())
        );
    }

    #[tokio::test]
    async fn test_hydrate_with_corrupted_storage_opens_gate_signed_out() {
        let server = MockServer::start_async().await;
        let storage = Arc::new(MemorySessionStorage::with_raw("console-session", "garbage"));
        let manager = manager(&server, storage);

        manager.hydrate().await;
        assert!(manager.gate().is_hydrated());
        assert!(!manager.is_authenticated());
    }
}
