//! The session manager: owns the live game session and the fetched lists.
//!
//! This is the central piece of the session layer. It's responsible for:
//! - Starting, resetting and scoring the game session
//! - Driving the game timer
//! - Saving the finished session to the backend
//! - Fetching history and leaderboards, and projecting history for display
//!
//! # Failure policy
//!
//! Backend calls never panic and never leave the manager inconsistent. A
//! failed history fetch clears the history; a failed leaderboard fetch
//! keeps the previous board; a failed save leaves `id` absent. The error is
//! logged and also returned, so callers that care can tell "nothing to
//! show" from "the fetch failed" while views simply render what's there.
//!
//! Records whose `custom` payload does not decode are skipped (and
//! counted in [`FetchSummary::skipped`]); a malformed envelope fails the
//! whole fetch.
//!
//! # Concurrency note
//!
//! Every mutating method takes `&mut self`, fetches included, so two
//! responses can never race to overwrite each other. Share a manager
//! across tasks behind a mutex at a higher level if you must.

use std::sync::Arc;

use memgame_protocol::{
    BoardSize, Codec, GameId, GameRecord, GameType, HistoryPage, JsonCodec, LeaderboardPage,
    SaveGameRequest, SaveGameResponse, SessionStatus, SortCriteria, UserId,
    resolve_board_identifier,
};
use memgame_tick::{GameTimer, TimerConfig};
use memgame_transport::HttpTransport;
use serde_json::{Map, Value};

use crate::format::format_timestamp;
use crate::history::{FetchSummary, SortOrder, project_history};
use crate::session::compute_score;
use crate::{Session, SessionError};

const SAVE_PATH: &str = "/games/save";
const GLOBAL_LEADERBOARD_PATH: &str = "/games/leaderboard/global";

fn history_path(user_id: UserId) -> String {
    format!("/users/{}/games", user_id.0)
}

fn personal_leaderboard_path(user_id: UserId) -> String {
    format!("/games/leaderboard/personal/{}", user_id.0)
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Owns one game session plus the history and leaderboard lists.
///
/// ## Lifecycle
///
/// ```text
/// start_new_game() ──→ start_timer() ──→ record_turn()/record_pair() ...
///                                              │
///                                              ▼
///                              compute_final_score() ──→ persist_session()
/// ```
pub struct SessionManager<T: HttpTransport, C: Codec = JsonCodec> {
    transport: Arc<T>,
    codec: C,

    session: Session,
    timer: GameTimer,

    /// Board size as the views hold it: a selector key (`"4x4"`) or a
    /// backend id in text form (`"3"`). Empty means "none selected".
    selected_board_size: String,
    sort_order: SortOrder,

    history: Vec<GameRecord>,
    current_page: u32,
    total_pages: u32,

    global_leaderboard: Vec<GameRecord>,
    personal_leaderboard: Vec<GameRecord>,
}

impl<T: HttpTransport> SessionManager<T> {
    /// Creates a manager with no session, a default timer, speaking JSON.
    pub fn new(transport: Arc<T>) -> Self {
        Self::with_parts(transport, JsonCodec, TimerConfig::default())
    }
}

impl<T: HttpTransport, C: Codec> SessionManager<T, C> {
    /// Creates a manager with an explicit codec and timer configuration.
    pub fn with_parts(transport: Arc<T>, codec: C, timer: TimerConfig) -> Self {
        Self {
            transport,
            codec,
            session: Session::default(),
            timer: GameTimer::new(timer),
            selected_board_size: String::new(),
            sort_order: SortOrder::default(),
            history: Vec::new(),
            current_page: 1,
            total_pages: 1,
            global_leaderboard: Vec::new(),
            personal_leaderboard: Vec::new(),
        }
    }

    // =====================================================================
    // Session lifecycle
    // =====================================================================

    /// Discards the current session and begins a fresh one.
    ///
    /// Counters are reset, `id` and `ended_at` cleared, `created_at` and
    /// `began_at` stamped with the current time, and the timer stopped at
    /// zero. Nothing is persisted; save the previous session first if it
    /// should be kept.
    pub fn start_new_game(&mut self) {
        self.timer.reset();
        self.session = Session::begin(now_millis());
        tracing::info!(board = %self.selected_board_size, "new game started");
    }

    /// Restarts the counters of the current session.
    ///
    /// Like [`start_new_game`](Self::start_new_game) but keeps `id`,
    /// `created_at` and `began_at`.
    pub fn reset_game(&mut self) {
        self.timer.reset();
        self.session.reset_counters();
        tracing::debug!("game counters reset");
    }

    /// Starts the game timer, stopping a running one first.
    ///
    /// # Errors
    /// [`SessionError::Timer`] when called outside a tokio runtime.
    pub fn start_timer(&mut self) -> Result<(), SessionError> {
        self.timer.start()?;
        Ok(())
    }

    /// Stops the game timer. Idempotent.
    pub fn stop_timer(&mut self) {
        self.timer.stop();
    }

    /// Whether the timer is ticking.
    pub fn is_timer_running(&self) -> bool {
        self.timer.is_running()
    }

    /// Current timer reading in milliseconds.
    pub fn elapsed_millis(&self) -> u64 {
        self.timer.elapsed_millis()
    }

    /// Overwrites the timer reading (restoring a paused game, tests).
    pub fn set_timer_millis(&mut self, millis: u64) {
        self.timer.set_elapsed_millis(millis);
    }

    // =====================================================================
    // Counters
    // =====================================================================

    /// One more move-pair attempted.
    pub fn record_turn(&mut self) {
        self.session.turns += 1;
    }

    /// One more pair matched.
    pub fn record_pair(&mut self) {
        self.session.pairs_found += 1;
    }

    pub fn add_coins(&mut self, delta: i64) {
        self.session.coins += delta;
    }

    pub fn set_coins(&mut self, coins: i64) {
        self.session.coins = coins;
    }

    pub fn mark_hint_used(&mut self) {
        self.session.hint_used = true;
    }

    /// Snapshot of the session with the current timer reading.
    pub fn session(&self) -> Session {
        Session {
            timer_millis: self.timer.elapsed_millis(),
            ..self.session.clone()
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.session.status
    }

    // =====================================================================
    // Scoring
    // =====================================================================

    /// Scores the session and marks it completed.
    ///
    /// Stops the timer, computes the score from the frozen reading (see
    /// [`compute_score`](crate::compute_score)), stores it, stamps
    /// `ended_at` and returns the score. Absent or zero dimensions count
    /// as 1.
    pub fn compute_final_score(&mut self, rows: Option<u32>, cols: Option<u32>) -> u64 {
        self.timer.stop();
        let timer_millis = self.timer.elapsed_millis();
        let score = compute_score(
            self.session.pairs_found,
            self.session.turns,
            timer_millis,
            rows,
            cols,
        );

        let now = now_millis();
        self.session.timer_millis = timer_millis;
        self.session.final_score = score;
        self.session.status = SessionStatus::Completed;
        self.session.ended_at = Some(self.session.began_at.map_or(now, |began| now.max(began)));

        tracing::info!(
            score,
            pairs = self.session.pairs_found,
            turns = self.session.turns,
            timer_millis,
            "game completed"
        );
        score
    }

    /// Scores the session using the dimensions of `board`.
    pub fn compute_final_score_for(&mut self, board: BoardSize) -> u64 {
        let (rows, cols) = board.dimensions();
        self.compute_final_score(Some(rows), Some(cols))
    }

    // =====================================================================
    // Board selection and history projection
    // =====================================================================

    /// Sets the selected board size (selector key or backend id text).
    pub fn select_board_size(&mut self, board_size: impl Into<String>) {
        self.selected_board_size = board_size.into();
    }

    pub fn selected_board_size(&self) -> &str {
        &self.selected_board_size
    }

    /// The selected board size, if it is a known selector key.
    pub fn selected_board(&self) -> Option<BoardSize> {
        BoardSize::from_key(&self.selected_board_size)
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    /// Flips between ascending and descending history order.
    pub fn toggle_sort_order(&mut self) {
        self.sort_order = self.sort_order.toggled();
    }

    /// The history page as fetched, in backend order.
    pub fn history(&self) -> &[GameRecord] {
        &self.history
    }

    /// History filtered by the selected board and sorted by creation time.
    ///
    /// Computed on every call from the raw list, which is never modified.
    pub fn filtered_history(&self) -> Vec<&GameRecord> {
        project_history(&self.history, &self.selected_board_size, self.sort_order)
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn has_next_page(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn has_previous_page(&self) -> bool {
        self.current_page > 1
    }

    pub fn global_leaderboard(&self) -> &[GameRecord] {
        &self.global_leaderboard
    }

    pub fn personal_leaderboard(&self) -> &[GameRecord] {
        &self.personal_leaderboard
    }

    // =====================================================================
    // Backend calls
    // =====================================================================

    /// Saves the session for `user_id` and records the assigned id.
    ///
    /// Whatever state the session is in gets sent; saving before
    /// completion is allowed. On failure `id` stays absent.
    ///
    /// # Errors
    /// [`SessionError::Backend`] or [`SessionError::Protocol`]; the session
    /// itself is unchanged either way apart from `id` on success.
    pub async fn persist_session(&mut self, user_id: UserId) -> Result<GameId, SessionError> {
        let request = self.save_request(user_id);
        tracing::debug!(%user_id, total_time = request.total_time, "saving game");

        match self.send_save(&request).await {
            Ok(id) => {
                self.session.id = Some(id);
                tracing::info!(%user_id, game_id = %id, "game saved");
                Ok(id)
            }
            Err(e) => {
                tracing::error!(%user_id, error = %e, "error saving game data");
                Err(e)
            }
        }
    }

    /// Fetches one page of the user's past games.
    ///
    /// `board_size_override` wins when non-empty; otherwise the selected
    /// board size is sent. Pagination is updated from the envelope.
    ///
    /// # Errors
    /// On failure the history is cleared and the error returned.
    pub async fn fetch_history(
        &mut self,
        user_id: UserId,
        page: u32,
        board_size_override: Option<&str>,
    ) -> Result<FetchSummary, SessionError> {
        let board_size = board_size_override
            .filter(|b| !b.is_empty())
            .unwrap_or(&self.selected_board_size)
            .to_string();

        let mut query = vec![("page", page.max(1).to_string())];
        if !board_size.is_empty() {
            query.push(("boardSize", board_size));
        }

        let result = self
            .get_json::<HistoryPage>(&history_path(user_id), &query)
            .await;
        match result {
            Ok(envelope) => {
                let (records, summary) = self.decode_records(envelope.data);
                self.history = records;
                self.total_pages = envelope.last_page;
                self.current_page = envelope.current_page;
                tracing::debug!(
                    %user_id,
                    page = self.current_page,
                    of = self.total_pages,
                    loaded = summary.loaded,
                    skipped = summary.skipped,
                    "game history fetched"
                );
                Ok(summary)
            }
            Err(e) => {
                tracing::error!(%user_id, error = %e, "error fetching game history");
                self.history.clear();
                Err(e)
            }
        }
    }

    /// Fetches the global leaderboard for a board size.
    ///
    /// `sort_criteria` defaults to total time.
    ///
    /// # Errors
    /// On failure the previous leaderboard is kept and the error returned.
    pub async fn fetch_global_leaderboard(
        &mut self,
        board_size: &str,
        sort_criteria: Option<SortCriteria>,
    ) -> Result<FetchSummary, SessionError> {
        let query = leaderboard_query(board_size, sort_criteria);
        match self.fetch_leaderboard(GLOBAL_LEADERBOARD_PATH, &query).await {
            Ok((records, summary)) => {
                self.global_leaderboard = records;
                Ok(summary)
            }
            Err(e) => {
                tracing::error!(board_size, error = %e, "error fetching global leaderboard");
                Err(e)
            }
        }
    }

    /// Fetches one user's leaderboard for a board size.
    ///
    /// # Errors
    /// On failure the previous leaderboard is kept and the error returned.
    pub async fn fetch_personal_leaderboard(
        &mut self,
        user_id: UserId,
        board_size: &str,
        sort_criteria: Option<SortCriteria>,
    ) -> Result<FetchSummary, SessionError> {
        let query = leaderboard_query(board_size, sort_criteria);
        let path = personal_leaderboard_path(user_id);
        match self.fetch_leaderboard(&path, &query).await {
            Ok((records, summary)) => {
                self.personal_leaderboard = records;
                Ok(summary)
            }
            Err(e) => {
                tracing::error!(%user_id, board_size, error = %e, "error fetching personal leaderboard");
                Err(e)
            }
        }
    }

    // -- Helpers ----------------------------------------------------------

    fn save_request(&self, user_id: UserId) -> SaveGameRequest {
        let session = self.session();
        SaveGameRequest {
            board_id: resolve_board_identifier(&self.selected_board_size),
            status: session.status,
            game_type: GameType::SinglePlayer,
            began_at: session.began_at.map(format_timestamp),
            ended_at: session.ended_at.map(format_timestamp),
            created_at: session.created_at.map(format_timestamp),
            custom: session.score_detail(),
            total_time: session.timer_millis,
            created_user_id: user_id,
        }
    }

    async fn send_save(&self, request: &SaveGameRequest) -> Result<GameId, SessionError> {
        let body = self.codec.encode(request)?;
        let response = self.transport.post(SAVE_PATH, body).await?;
        let ack: SaveGameResponse = self.codec.decode(&response)?;
        Ok(ack.id)
    }

    async fn get_json<R: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<R, SessionError> {
        let body = self.transport.get(path, query).await?;
        Ok(self.codec.decode(&body)?)
    }

    async fn fetch_leaderboard(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<(Vec<GameRecord>, FetchSummary), SessionError> {
        let page: LeaderboardPage = self.get_json(path, query).await?;
        Ok(self.decode_records(page.0))
    }

    /// Decodes raw records, skipping (and logging) any that fail.
    fn decode_records(&self, raw: Vec<Map<String, Value>>) -> (Vec<GameRecord>, FetchSummary) {
        let mut summary = FetchSummary::default();
        let records = raw
            .into_iter()
            .filter_map(|record| match GameRecord::decode(record) {
                Ok(decoded) => {
                    summary.loaded += 1;
                    Some(decoded)
                }
                Err(e) => {
                    summary.skipped += 1;
                    tracing::warn!(error = %e, "skipping record with undecodable custom payload");
                    None
                }
            })
            .collect();
        (records, summary)
    }
}

fn leaderboard_query(board_size: &str, sort_criteria: Option<SortCriteria>) -> Vec<(&'static str, String)> {
    vec![
        ("boardSize", board_size.to_string()),
        ("sortCriteria", sort_criteria.unwrap_or_default().to_string()),
    ]
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! Unit tests for the synchronous side of `SessionManager`.
    //!
    //! Backend paths are covered in `tests/session_manager.rs` against a
    //! mock transport. Naming: `test_{function}_{scenario}_{expected}`.

    use super::*;
    use memgame_transport::MockTransport;

    fn manager() -> SessionManager<MockTransport> {
        SessionManager::new(Arc::new(MockTransport::new()))
    }

    // =====================================================================
    // start_new_game() / reset_game()
    // =====================================================================

    #[test]
    fn test_start_new_game_resets_counters_and_stamps_times() {
        let mut mgr = manager();
        mgr.record_turn();
        mgr.record_pair();
        mgr.add_coins(4);
        mgr.mark_hint_used();
        mgr.set_timer_millis(900);

        mgr.start_new_game();

        let s = mgr.session();
        assert_eq!(s.status, SessionStatus::InProgress);
        assert_eq!((s.turns, s.pairs_found, s.coins), (0, 0, 1));
        assert!(!s.hint_used);
        assert_eq!(s.timer_millis, 0);
        assert_eq!(s.final_score, 0);
        assert!(s.created_at.is_some());
        assert_eq!(s.created_at, s.began_at);
        assert_eq!(s.ended_at, None);
        assert_eq!(s.id, None);
    }

    #[test]
    fn test_start_new_game_twice_discards_previous() {
        let mut mgr = manager();
        mgr.start_new_game();
        mgr.record_pair();
        mgr.compute_final_score(None, None);

        mgr.start_new_game();

        let s = mgr.session();
        assert_eq!(s.status, SessionStatus::InProgress);
        assert_eq!(s.pairs_found, 0);
        assert_eq!(s.ended_at, None);
    }

    #[test]
    fn test_reset_game_keeps_creation_stamps() {
        let mut mgr = manager();
        mgr.start_new_game();
        let before = mgr.session();
        mgr.record_turn();
        mgr.set_timer_millis(3_000);
        mgr.compute_final_score(None, None);

        mgr.reset_game();

        let s = mgr.session();
        assert_eq!(s.created_at, before.created_at);
        assert_eq!(s.began_at, before.began_at);
        assert_eq!(s.turns, 0);
        assert_eq!(s.timer_millis, 0);
        assert_eq!(s.status, SessionStatus::InProgress);
        assert_eq!(s.ended_at, None);
    }

    // =====================================================================
    // compute_final_score()
    // =====================================================================

    #[test]
    fn test_compute_final_score_reference_case() {
        let mut mgr = manager();
        mgr.start_new_game();
        for _ in 0..4 {
            mgr.record_pair();
        }
        for _ in 0..10 {
            mgr.record_turn();
        }
        mgr.set_timer_millis(5_000);

        let score = mgr.compute_final_score(Some(2), Some(2));

        assert_eq!(score, 1375);
        let s = mgr.session();
        assert_eq!(s.final_score, 1375);
        assert_eq!(s.status, SessionStatus::Completed);
        assert!(s.ended_at.unwrap() >= s.began_at.unwrap());
    }

    #[test]
    fn test_compute_final_score_zero_pairs_is_zero() {
        let mut mgr = manager();
        mgr.start_new_game();
        for _ in 0..7 {
            mgr.record_turn();
        }
        mgr.set_timer_millis(42_000);
        assert_eq!(mgr.compute_final_score(Some(4), Some(4)), 0);
    }

    #[test]
    fn test_compute_final_score_for_board_uses_dimensions() {
        let mut a = manager();
        a.start_new_game();
        a.record_pair();
        let mut b = manager();
        b.start_new_game();
        b.record_pair();

        assert_eq!(
            a.compute_final_score_for(BoardSize::ThreeByFour),
            b.compute_final_score(Some(3), Some(4))
        );
    }

    #[test]
    fn test_compute_final_score_missing_dimensions_match_one_by_one() {
        let mut a = manager();
        a.start_new_game();
        a.record_pair();
        a.record_turn();
        let mut b = manager();
        b.start_new_game();
        b.record_pair();
        b.record_turn();

        assert_eq!(
            a.compute_final_score(None, None),
            b.compute_final_score(Some(1), Some(1))
        );
    }

    // =====================================================================
    // Board selection / sort order
    // =====================================================================

    #[test]
    fn test_select_board_size_resolves_known_keys() {
        let mut mgr = manager();
        assert_eq!(mgr.selected_board(), None);
        mgr.select_board_size("6x6");
        assert_eq!(mgr.selected_board(), Some(BoardSize::SixBySix));
        mgr.select_board_size("huge");
        assert_eq!(mgr.selected_board(), None);
    }

    #[test]
    fn test_toggle_sort_order_flips_only_order() {
        let mut mgr = manager();
        mgr.select_board_size("2x2");
        assert_eq!(mgr.sort_order(), SortOrder::Ascending);
        mgr.toggle_sort_order();
        assert_eq!(mgr.sort_order(), SortOrder::Descending);
        mgr.toggle_sort_order();
        assert_eq!(mgr.sort_order(), SortOrder::Ascending);
        assert_eq!(mgr.selected_board_size(), "2x2");
    }

    #[test]
    fn test_pagination_defaults_to_single_page() {
        let mgr = manager();
        assert_eq!(mgr.current_page(), 1);
        assert_eq!(mgr.total_pages(), 1);
        assert!(!mgr.has_next_page());
        assert!(!mgr.has_previous_page());
    }

    #[test]
    fn test_start_timer_outside_runtime_is_timer_error() {
        let mut mgr = manager();
        assert!(matches!(mgr.start_timer(), Err(SessionError::Timer(_))));
    }
}
