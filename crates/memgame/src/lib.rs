//! # Memgame
//!
//! Client core for a single-player memory-matching game.
//!
//! Memgame keeps the state of one game session (turns, pairs, timer,
//! score), saves finished games to a REST backend, and fetches history and
//! leaderboards for display. Views read snapshots and call operations; all
//! backend plumbing lives below them.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use memgame::prelude::*;
//!
//! # async fn run() -> Result<(), MemgameError> {
//! let mut client = MemgameClient::builder()
//!     .config(ClientConfig::from_env())
//!     .build()?;
//! client.sign_in(&Credentials::new("ana@mail.pt", "secret")).await?;
//!
//! let game = client.sessions_mut();
//! game.select_board_size("4x4");
//! game.start_new_game();
//! game.start_timer()?;
//! // ... record_turn() / record_pair() as the player plays ...
//! game.compute_final_score_for(BoardSize::FourByFour);
//!
//! client.save_game().await?;
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod error;
mod logging;

pub use client::{MemgameClient, MemgameClientBuilder};
pub use config::{
    ClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT, ENV_API_URL, ENV_TIMEOUT_SECS,
};
pub use error::MemgameError;
pub use logging::init_tracing;

pub use memgame_protocol as protocol;
pub use memgame_session as session;
pub use memgame_tick as tick;
pub use memgame_transport as transport;

/// Everything a view layer typically needs.
pub mod prelude {
    pub use crate::{ClientConfig, MemgameClient, MemgameClientBuilder, MemgameError};
    pub use memgame_protocol::{
        BoardId, BoardSize, GameId, GameRecord, SessionStatus, SortCriteria, User, UserId,
        resolve_board_identifier,
    };
    pub use memgame_session::{
        Credentials, FetchSummary, IdentityGateway, Session, SessionManager, SortOrder,
        format_date_simple, format_timer, format_timestamp,
    };
    pub use memgame_tick::{GameTimer, TickPolicy, TimerConfig};
    pub use memgame_transport::{HttpTransport, MockReply, MockTransport};
}
