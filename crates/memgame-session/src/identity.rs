//! Identity gateway: the login handshake and the current user.
//!
//! Memgame doesn't implement authentication itself; the backend does.
//! The gateway forwards whatever credential payload the login form built
//! and hands the backend's answer back to the caller, who decides what to
//! keep via [`IdentityGateway::set_user`].

use std::fmt;
use std::sync::Arc;

use memgame_protocol::{Codec, JsonCodec, User, UserId};
use memgame_transport::HttpTransport;
use serde::Serialize;
use serde_json::Value;

const LOGIN_PATH: &str = "/login";

/// Email/password credentials, the payload the stock login form sends.
///
/// `Debug` never prints the password.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Holds the authenticated user and performs login.
pub struct IdentityGateway<T: HttpTransport, C: Codec = JsonCodec> {
    transport: Arc<T>,
    codec: C,
    user: Option<User>,
}

impl<T: HttpTransport> IdentityGateway<T> {
    /// Creates a gateway with no user, speaking JSON.
    pub fn new(transport: Arc<T>) -> Self {
        Self::with_codec(transport, JsonCodec)
    }
}

impl<T: HttpTransport, C: Codec> IdentityGateway<T, C> {
    pub fn with_codec(transport: Arc<T>, codec: C) -> Self {
        Self {
            transport,
            codec,
            user: None,
        }
    }

    /// Sends `credentials` verbatim to the login endpoint.
    ///
    /// Returns the backend's payload on success and `None` on any
    /// failure. Rejected credentials and an unreachable backend look the
    /// same to the caller.
    pub async fn login<P: Serialize>(&self, credentials: &P) -> Option<Value> {
        let body = match self.codec.encode(credentials) {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(error = %e, "login payload could not be encoded");
                return None;
            }
        };
        let response = match self.transport.post(LOGIN_PATH, body).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "login failed");
                return None;
            }
        };
        match self.codec.decode::<Value>(&response) {
            Ok(payload) => {
                tracing::info!("login succeeded");
                Some(payload)
            }
            Err(e) => {
                tracing::warn!(error = %e, "login response unreadable");
                None
            }
        }
    }

    /// Stores the resolved user.
    pub fn set_user(&mut self, user: User) {
        tracing::debug!(user_id = %user.id, "user set");
        self.user = Some(user);
    }

    /// The current user, if logged in.
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Shorthand for the current user's id.
    pub fn user_id(&self) -> Option<UserId> {
        self.user.as_ref().map(|u| u.id)
    }

    /// Forgets the current user.
    pub fn logout(&mut self) {
        if let Some(user) = self.user.take() {
            tracing::info!(user_id = %user.id, "user logged out");
        }
    }
}
