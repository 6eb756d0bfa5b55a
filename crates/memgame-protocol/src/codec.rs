//! Body encoding for requests and responses.
//!
//! The session layer never calls `serde_json` directly. It hands values
//! to a [`Codec`] and gets bytes back (and the reverse for responses),
//! which keeps the choice of wire format in one place. The backend only
//! speaks JSON, so [`JsonCodec`] is the one implementation.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// Turns request values into body bytes and response bytes into values.
///
/// Codecs are stateless and shared by every manager built on the same
/// transport, hence `Send + Sync + 'static`. Decoding yields owned values
/// so the response buffer is released as soon as `decode` returns.
pub trait Codec: Send + Sync + 'static {
    /// Request value → body bytes. Fails with [`ProtocolError::Encode`].
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Body bytes → response value. Fails with [`ProtocolError::Decode`]
    /// when the body isn't valid JSON or has the wrong shape.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// JSON bodies via `serde_json`.
///
/// ## Example
///
/// ```rust
/// use memgame_protocol::{BoardId, Codec, JsonCodec, SaveGameResponse, GameId};
///
/// let codec = JsonCodec;
/// let resp: SaveGameResponse = codec.decode(br#"{"id": 12, "extra": true}"#).unwrap();
/// assert_eq!(resp.id, GameId(12));
///
/// let bytes = codec.encode(&BoardId(3)).unwrap();
/// assert_eq!(bytes, b"3");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}
