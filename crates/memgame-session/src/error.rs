//! Error types for the session layer.

use memgame_protocol::ProtocolError;
use memgame_tick::TimerError;
use memgame_transport::TransportError;

/// Errors that can occur while managing a game session.
///
/// Backend-calling operations on [`SessionManager`](crate::SessionManager)
/// have already degraded their state (cleared or kept lists, absent `id`)
/// by the time one of these is returned; the error is there so callers can
/// tell "no data" apart from "fetch failed".
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The backend was unreachable or answered with an error status.
    #[error("backend request failed: {0}")]
    Backend(#[from] TransportError),

    /// A request could not be encoded or a response could not be decoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The game timer could not be started.
    #[error(transparent)]
    Timer(#[from] TimerError),
}
