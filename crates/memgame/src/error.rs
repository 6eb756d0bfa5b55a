//! Unified error type for the Memgame client.

use memgame_protocol::ProtocolError;
use memgame_session::SessionError;
use memgame_tick::TimerError;
use memgame_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `memgame` facade you deal with this single error type
/// instead of importing errors from each sub-crate. The `#[from]`
/// attribute on each variant lets `?` convert sub-crate errors.
#[derive(Debug, thiserror::Error)]
pub enum MemgameError {
    /// A transport-level error (unreachable backend, error status, bad URL).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode, invalid message).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A session-level error (failed save or fetch).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The game timer could not be started.
    #[error(transparent)]
    Timer(#[from] TimerError),

    /// The operation needs a logged-in user.
    #[error("no user is logged in")]
    NotLoggedIn,

    /// The login endpoint answered, but not with a usable user record.
    #[error("login rejected")]
    LoginRejected,
}
