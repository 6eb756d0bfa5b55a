//! Game session management for Memgame.
//!
//! This crate holds everything the views need between "new game" and
//! "leaderboard":
//!
//! 1. **Session lifecycle**: counters, timer and scoring ([`SessionManager`])
//! 2. **Persistence**: saving a finished game, fetching past games and
//!    leaderboards through an [`HttpTransport`](memgame_transport::HttpTransport)
//! 3. **Identity**: login and the current user ([`IdentityGateway`])
//! 4. **Presentation helpers**: history projection and display formatting
//!
//! # How it fits in the stack
//!
//! ```text
//! Views / CLI (above)  ← read snapshots, call operations
//!     ↕
//! Session Layer (this crate)  ← owns session state and fetched lists
//!     ↕
//! Protocol + Transport + Tick (below)  ← wire types, HTTP, game timer
//! ```

#![allow(async_fn_in_trait)]

mod error;
mod format;
mod history;
mod identity;
mod manager;
mod session;

pub use error::SessionError;
pub use format::{format_date_simple, format_timer, format_timestamp};
pub use history::{FetchSummary, SortOrder, matches_board, project_history};
pub use identity::{Credentials, IdentityGateway};
pub use manager::SessionManager;
pub use session::{POINTS_PER_PAIR, Session, TIME_PENALTY_PER_MS, TURN_PENALTY, compute_score};
