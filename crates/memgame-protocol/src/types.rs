//! Core protocol types for Memgame's REST API.
//!
//! Every type here travels over HTTP as JSON: identifiers, the save
//! request and its acknowledgement, the history envelope, the user record
//! returned by login. Field names follow the backend's snake_case columns.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A backend user identifier.
///
/// `#[serde(transparent)]` serializes this as the bare number, which is
/// what `created_user_id` and the `/users/{id}` paths expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U-{}", self.0)
    }
}

impl From<u64> for UserId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Identifier the backend assigns to a saved game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(pub u64);

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "G-{}", self.0)
    }
}

impl From<u64> for GameId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// The backend's integer key for a board-size configuration.
///
/// Displays as the bare number: history filters compare against this
/// textual form (`"1"`, `"2"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoardId(pub u64);

impl fmt::Display for BoardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for BoardId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Accepts an identifier delivered as a number, a numeric string, or null.
///
/// Backends built on loosely typed ORMs hand back `"3"` as readily as `3`.
pub(crate) fn lenient_id<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: From<u64>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_u64()
            .map(|v| Some(T::from(v)))
            .ok_or_else(|| de::Error::custom(format!("invalid identifier {n}"))),
        Some(Value::String(s)) => s
            .trim()
            .parse::<u64>()
            .map(|v| Some(T::from(v)))
            .map_err(|_| de::Error::custom(format!("invalid identifier {s:?}"))),
        Some(other) => Err(de::Error::custom(format!("invalid identifier {other}"))),
    }
}

// ---------------------------------------------------------------------------
// Session status and game type
// ---------------------------------------------------------------------------

/// Lifecycle state of a game session.
///
/// ```text
///   NotStarted ──(start)──→ InProgress ──(score)──→ Completed
///                               ↑                       │
///                               └───────(start/reset)───┘
/// ```
///
/// On the wire these are the backend's status codes: `"PL"` (playing) and
/// `"E"` (ended). A session that never started is sent as `""`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionStatus {
    #[default]
    #[serde(rename = "")]
    NotStarted,
    #[serde(rename = "PL")]
    InProgress,
    #[serde(rename = "E")]
    Completed,
}

impl SessionStatus {
    /// The backend status code for this state.
    pub fn code(self) -> &'static str {
        match self {
            Self::NotStarted => "",
            Self::InProgress => "PL",
            Self::Completed => "E",
        }
    }

    /// Returns `true` while the player can still act on the board.
    pub fn is_active(self) -> bool {
        matches!(self, Self::InProgress)
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotStarted => write!(f, "NotStarted"),
            Self::InProgress => write!(f, "InProgress"),
            Self::Completed => write!(f, "Completed"),
        }
    }
}

/// Game type discriminator sent with every save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameType {
    /// Solo play. The only mode this client produces.
    #[default]
    #[serde(rename = "S")]
    SinglePlayer,
}

// ---------------------------------------------------------------------------
// Score detail (the `custom` payload)
// ---------------------------------------------------------------------------

/// Per-session score detail carried in a record's `custom` field.
///
/// The backend stores it as JSON text; on reads it must be decoded
/// (see [`GameRecord::decode`](crate::GameRecord::decode)).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreDetail {
    pub pairs_found: u32,
    pub turns: u32,
    pub score: u64,
}

// ---------------------------------------------------------------------------
// Save
// ---------------------------------------------------------------------------

/// Body of `POST /games/save`.
///
/// Timestamps are pre-formatted as `YYYY-MM-DD HH:MM:SS` local time;
/// a timestamp the session never reached is sent as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveGameRequest {
    pub board_id: Option<BoardId>,
    pub status: SessionStatus,
    #[serde(rename = "type")]
    pub game_type: GameType,
    pub began_at: Option<String>,
    pub ended_at: Option<String>,
    pub created_at: Option<String>,
    pub custom: ScoreDetail,
    /// Elapsed play time in milliseconds.
    pub total_time: u64,
    pub created_user_id: UserId,
}

/// Acknowledgement of a save. Only `id` is used; the rest is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveGameResponse {
    pub id: GameId,
}

// ---------------------------------------------------------------------------
// History envelope
// ---------------------------------------------------------------------------

fn first_page() -> u32 {
    1
}

/// One page of `GET /users/{id}/games`.
///
/// Records stay as raw JSON objects here; each one is decoded separately
/// so a single bad `custom` payload doesn't sink the page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryPage {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub data: Vec<Map<String, Value>>,
    #[serde(default = "first_page")]
    pub last_page: u32,
    #[serde(default = "first_page")]
    pub current_page: u32,
}

/// Body of either leaderboard endpoint: a bare array of raw records.
/// `null` is treated as an empty board.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeaderboardPage(
    #[serde(deserialize_with = "null_as_empty")] pub Vec<Map<String, Value>>,
);

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Map<String, Value>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Map<String, Value>>>::deserialize(deserializer)?.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Leaderboard ranking
// ---------------------------------------------------------------------------

/// Ranking criterion for leaderboard queries, passed through verbatim as
/// `sortCriteria`. Defaults to `total_time` (fastest first).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SortCriteria(String);

impl SortCriteria {
    /// Rank by elapsed play time.
    pub const TOTAL_TIME: &'static str = "total_time";
    /// Rank by number of turns.
    pub const TURNS: &'static str = "turns";

    pub fn new(criteria: impl Into<String>) -> Self {
        Self(criteria.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SortCriteria {
    fn default() -> Self {
        Self::new(Self::TOTAL_TIME)
    }
}

impl From<&str> for SortCriteria {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl fmt::Display for SortCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

/// The authenticated user as resolved by the backend.
///
/// Only `id` is interpreted; the rest of the record (nickname, coins,
/// photo, ...) is kept as-is for the views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    #[serde(flatten)]
    pub profile: Map<String, Value>,
}

impl User {
    /// Extracts the user from a login payload.
    ///
    /// Accepts either the bare user record or one wrapped as
    /// `{"user": {...}}` (token-issuing backends add a sibling token).
    pub fn from_login_payload(payload: &Value) -> Option<Self> {
        let record = payload.get("user").unwrap_or(payload);
        serde_json::from_value(record.clone()).ok()
    }

    /// A string field of the profile, e.g. `nickname`.
    pub fn profile_str(&self, key: &str) -> Option<&str> {
        self.profile.get(key).and_then(Value::as_str)
    }
}

// =========================================================================
// Tests
// =========================================================================
