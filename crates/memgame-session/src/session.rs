//! Session types: the data that describes one playthrough.
//!
//! A "session" is one game from start to scoring. It tracks:
//! - HOW the player is doing (turns, pairs, coins, hint)
//! - WHERE it is in its lifecycle ([`SessionStatus`])
//! - WHEN it was created, began and ended (epoch milliseconds)
//! - WHETHER the backend has stored it (`id`)

use memgame_protocol::{GameId, ScoreDetail, SessionStatus};

/// Points per matched pair, before board-area scaling.
pub const POINTS_PER_PAIR: f64 = 100.0;
/// Penalty per turn.
pub const TURN_PENALTY: f64 = 15.0;
/// Penalty per elapsed millisecond.
pub const TIME_PENALTY_PER_MS: f64 = 0.015;

/// A snapshot of the live game session.
///
/// Obtained from [`SessionManager::session`](crate::SessionManager::session);
/// `timer_millis` is the timer reading at the moment of the snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    /// Backend identifier, present once a save has been acknowledged.
    pub id: Option<GameId>,
    pub timer_millis: u64,
    pub turns: u32,
    pub pairs_found: u32,
    /// Caller-owned counter; starts at 1.
    pub coins: i64,
    pub hint_used: bool,
    /// Meaningful only once `status` is `Completed`.
    pub final_score: u64,
    pub status: SessionStatus,
    pub created_at: Option<i64>,
    pub began_at: Option<i64>,
    /// Set on completion, cleared whenever the session is (re)started.
    pub ended_at: Option<i64>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            id: None,
            timer_millis: 0,
            turns: 0,
            pairs_found: 0,
            coins: 1,
            hint_used: false,
            final_score: 0,
            status: SessionStatus::NotStarted,
            created_at: None,
            began_at: None,
            ended_at: None,
        }
    }
}

impl Session {
    /// A fresh in-progress session stamped at `now`.
    pub fn begin(now: i64) -> Self {
        Self {
            status: SessionStatus::InProgress,
            created_at: Some(now),
            began_at: Some(now),
            ..Self::default()
        }
    }

    /// Reset every counter, keeping identity and timestamps, and mark the
    /// session in progress again.
    pub(crate) fn reset_counters(&mut self) {
        self.timer_millis = 0;
        self.turns = 0;
        self.pairs_found = 0;
        self.coins = 1;
        self.hint_used = false;
        self.final_score = 0;
        self.ended_at = None;
        self.status = SessionStatus::InProgress;
    }

    /// The `custom` payload persisted with this session.
    pub fn score_detail(&self) -> ScoreDetail {
        ScoreDetail {
            pairs_found: self.pairs_found,
            turns: self.turns,
            score: self.final_score,
        }
    }
}

/// Scores a finished game.
///
/// Pairs are worth [`POINTS_PER_PAIR`] scaled by board area; turns and
/// elapsed milliseconds are subtracted; the result is floored at zero and
/// truncated to an integer. Absent or zero dimensions count as 1.
pub fn compute_score(
    pairs_found: u32,
    turns: u32,
    timer_millis: u64,
    rows: Option<u32>,
    cols: Option<u32>,
) -> u64 {
    let rows = rows.filter(|&r| r > 0).unwrap_or(1);
    let cols = cols.filter(|&c| c > 0).unwrap_or(1);

    let raw = f64::from(pairs_found) * POINTS_PER_PAIR;
    let penalty = f64::from(turns) * TURN_PENALTY + timer_millis as f64 * TIME_PENALTY_PER_MS;
    let score = (raw * f64::from(rows) * f64::from(cols) - penalty).max(0.0);
    score.floor() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_score_reference_case() {
        // 400 * 4 - (150 + 75)
        assert_eq!(compute_score(4, 10, 5_000, Some(2), Some(2)), 1375);
    }

    #[test]
    fn test_compute_score_zero_pairs_is_zero() {
        assert_eq!(compute_score(0, 0, 0, Some(6), Some(6)), 0);
        assert_eq!(compute_score(0, 50, 90_000, Some(4), Some(4)), 0);
    }

    #[test]
    fn test_compute_score_missing_dimensions_mean_one() {
        let reference = compute_score(3, 4, 1_000, Some(1), Some(1));
        assert_eq!(compute_score(3, 4, 1_000, None, None), reference);
        assert_eq!(compute_score(3, 4, 1_000, Some(0), None), reference);
        assert_eq!(reference, 300 - 60 - 15);
    }

    #[test]
    fn test_compute_score_floors_fractional_penalty() {
        // 100 - 15 - 0.015 = 84.985
        assert_eq!(compute_score(1, 1, 1, None, None), 84);
    }

    #[test]
    fn test_compute_score_never_negative() {
        assert_eq!(compute_score(1, 100, 1_000_000, Some(2), Some(2)), 0);
    }

    #[test]
    fn test_default_session_starts_with_one_coin_and_not_started() {
        let s = Session::default();
        assert_eq!(s.coins, 1);
        assert_eq!(s.status, SessionStatus::NotStarted);
        assert!(s.id.is_none());
    }

    #[test]
    fn test_reset_counters_keeps_identity_and_start_stamps() {
        let mut s = Session::begin(1_000);
        s.id = Some(GameId(5));
        s.turns = 3;
        s.coins = 9;
        s.status = SessionStatus::Completed;
        s.ended_at = Some(2_000);

        s.reset_counters();

        assert_eq!(s.id, Some(GameId(5)));
        assert_eq!(s.created_at, Some(1_000));
        assert_eq!(s.turns, 0);
        assert_eq!(s.coins, 1);
        assert_eq!(s.ended_at, None);
        assert_eq!(s.status, SessionStatus::InProgress);
    }
}
