//! Transport abstraction layer for Memgame.
//!
//! Provides the [`HttpTransport`] trait that the session layer talks to.
//! The trait moves raw bytes; encoding is the protocol layer's job.
//!
//! # Feature Flags
//!
//! - `http` (default): HTTPS transport via `reqwest`

#![allow(async_fn_in_trait)]

mod error;
#[cfg(feature = "http")]
mod http;
mod mock;

pub use error::TransportError;
#[cfg(feature = "http")]
pub use http::ReqwestTransport;
pub use mock::{MockReply, MockTransport, RecordedRequest};

use std::fmt;

/// HTTP method of a request issued through a transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
        }
    }
}

/// Issues requests against the game backend.
///
/// Paths are relative to the backend's API root (`/games/save`,
/// `/users/7/games`, ...). Implementations resolve them against their
/// own base URL.
pub trait HttpTransport: Send + Sync + 'static {
    /// Sends a GET with the given query parameters and returns the body.
    ///
    /// Non-2xx responses are reported as [`TransportError::Status`].
    async fn get(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<u8>, TransportError>;

    /// Sends a POST with a JSON body and returns the response body.
    async fn post(
        &self,
        path: &str,
        body: Vec<u8>,
    ) -> Result<Vec<u8>, TransportError>;
}
