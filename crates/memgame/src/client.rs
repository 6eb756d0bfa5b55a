//! `MemgameClient` builder and the client handle.
//!
//! This is the entry point for a view layer. It ties the layers together:
//! transport → protocol → session, with one HTTP transport shared by the
//! session manager and the identity gateway.

use std::sync::Arc;
use std::time::Duration;

use memgame_protocol::{GameId, SortCriteria, User};
use memgame_session::{FetchSummary, IdentityGateway, SessionManager};
use memgame_tick::TimerConfig;
use memgame_transport::{HttpTransport, ReqwestTransport};
use serde::Serialize;

use crate::{ClientConfig, MemgameError};

/// Builder for configuring a [`MemgameClient`].
///
/// # Example
///
/// ```rust,no_run
/// use std::time::Duration;
/// use memgame::prelude::*;
///
/// let client = MemgameClient::builder()
///     .base_url("http://localhost:8000/api")
///     .timeout(Duration::from_secs(5))
///     .build()?;
/// # Ok::<(), MemgameError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemgameClientBuilder {
    config: ClientConfig,
}

impl MemgameClientBuilder {
    /// Creates a builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole configuration, e.g. with [`ClientConfig::from_env`].
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the backend API root.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Sets the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Sets the game timer configuration.
    pub fn timer(mut self, timer: TimerConfig) -> Self {
        self.config.timer = timer;
        self
    }

    /// Builds a client speaking HTTPS to the configured backend.
    ///
    /// # Errors
    /// [`MemgameError::Transport`] if the base URL is invalid or the HTTP
    /// client can't be created.
    pub fn build(self) -> Result<MemgameClient<ReqwestTransport>, MemgameError> {
        let transport = ReqwestTransport::new(&self.config.base_url, self.config.timeout)?;
        tracing::info!(base_url = %transport.base_url(), "memgame client ready");
        Ok(self.build_with(Arc::new(transport)))
    }

    /// Builds a client over an existing transport (mocks, custom stacks).
    pub fn build_with<T: HttpTransport>(self, transport: Arc<T>) -> MemgameClient<T> {
        MemgameClient {
            sessions: SessionManager::with_parts(
                Arc::clone(&transport),
                memgame_protocol::JsonCodec,
                self.config.timer,
            ),
            identity: IdentityGateway::new(transport),
        }
    }
}

/// A configured Memgame client: one game session plus the logged-in user.
pub struct MemgameClient<T: HttpTransport = ReqwestTransport> {
    sessions: SessionManager<T>,
    identity: IdentityGateway<T>,
}

impl MemgameClient<ReqwestTransport> {
    /// Creates a new builder.
    pub fn builder() -> MemgameClientBuilder {
        MemgameClientBuilder::new()
    }
}

impl<T: HttpTransport> MemgameClient<T> {
    pub fn sessions(&self) -> &SessionManager<T> {
        &self.sessions
    }

    pub fn sessions_mut(&mut self) -> &mut SessionManager<T> {
        &mut self.sessions
    }

    pub fn identity(&self) -> &IdentityGateway<T> {
        &self.identity
    }

    pub fn identity_mut(&mut self) -> &mut IdentityGateway<T> {
        &mut self.identity
    }

    /// Logs in and keeps the resolved user.
    ///
    /// # Errors
    /// [`MemgameError::LoginRejected`] when the backend refuses, can't be
    /// reached, or answers without a user record.
    pub async fn sign_in<P: Serialize>(&mut self, credentials: &P) -> Result<User, MemgameError> {
        let payload = self
            .identity
            .login(credentials)
            .await
            .ok_or(MemgameError::LoginRejected)?;
        let user = User::from_login_payload(&payload).ok_or(MemgameError::LoginRejected)?;
        self.identity.set_user(user.clone());
        Ok(user)
    }

    /// Forgets the current user.
    pub fn sign_out(&mut self) {
        self.identity.logout();
    }

    /// Saves the current session for the logged-in user.
    ///
    /// # Errors
    /// [`MemgameError::NotLoggedIn`], or the save failure.
    pub async fn save_game(&mut self) -> Result<GameId, MemgameError> {
        let user_id = self.identity.user_id().ok_or(MemgameError::NotLoggedIn)?;
        Ok(self.sessions.persist_session(user_id).await?)
    }

    /// Fetches a page of the logged-in user's history for the selected
    /// board size.
    pub async fn load_history(&mut self, page: u32) -> Result<FetchSummary, MemgameError> {
        let user_id = self.identity.user_id().ok_or(MemgameError::NotLoggedIn)?;
        Ok(self.sessions.fetch_history(user_id, page, None).await?)
    }

    /// Fetches the logged-in user's leaderboard for a board size.
    pub async fn load_personal_leaderboard(
        &mut self,
        board_size: &str,
        sort_criteria: Option<SortCriteria>,
    ) -> Result<FetchSummary, MemgameError> {
        let user_id = self.identity.user_id().ok_or(MemgameError::NotLoggedIn)?;
        Ok(self
            .sessions
            .fetch_personal_leaderboard(user_id, board_size, sort_criteria)
            .await?)
    }

    /// Fetches the global leaderboard for a board size.
    pub async fn load_global_leaderboard(
        &mut self,
        board_size: &str,
        sort_criteria: Option<SortCriteria>,
    ) -> Result<FetchSummary, MemgameError> {
        Ok(self
            .sessions
            .fetch_global_leaderboard(board_size, sort_criteria)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_rejects_invalid_base_url() {
        let result = MemgameClient::builder().base_url("not a url").build();
        assert!(matches!(result, Err(MemgameError::Transport(_))));
    }

    #[test]
    fn test_build_with_default_config() {
        let client = MemgameClient::builder()
            .base_url("http://localhost:8000/api")
            .build()
            .unwrap();
        assert!(client.identity().user().is_none());
        assert_eq!(client.sessions().current_page(), 1);
    }
}
