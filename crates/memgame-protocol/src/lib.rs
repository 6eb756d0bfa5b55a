//! Wire protocol for Memgame.
//!
//! This crate defines what the client and the backend exchange:
//!
//! - **Types** ([`SaveGameRequest`], [`HistoryPage`], [`GameRecord`],
//!   [`User`], ...): the JSON bodies of every endpoint.
//! - **Board sizes** ([`BoardSize`], [`resolve_board_identifier`]): the
//!   selector keys views use and the backend identifiers they map to.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how bodies are
//!   converted to/from bytes.
//! - **Errors** ([`ProtocolError`]): what can go wrong while doing so.
//!
//! # Architecture
//!
//! ```text
//! Transport (bytes) → Protocol (typed bodies) → Session (game state)
//! ```

mod board;
mod codec;
mod error;
mod record;
mod types;

pub use board::{BoardSize, resolve_board_identifier};
pub use codec::{Codec, JsonCodec};
pub use error::ProtocolError;
pub use record::{GameRecord, parse_timestamp_millis};
pub use types::{
    BoardId, GameId, GameType, HistoryPage, LeaderboardPage, SaveGameRequest,
    SaveGameResponse, ScoreDetail, SessionStatus, SortCriteria, User, UserId,
};
