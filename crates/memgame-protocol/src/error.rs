//! Protocol-layer errors.
//!
//! A `ProtocolError` means bytes did arrive but had the wrong shape (or a
//! value could not be written out). Network failures are `TransportError`s.

#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// A request body could not be produced.
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// A response body is not JSON, or not the JSON we expect.
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// Well-formed JSON that breaks the API contract, such as a record
    /// with no `custom` payload.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
