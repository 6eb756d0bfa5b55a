//! Client-side projection of fetched history lists.

use std::cmp::Ordering;
use std::fmt;

use memgame_protocol::{GameRecord, resolve_board_identifier};

/// Order in which history is shown, by creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    /// The opposite order.
    pub fn toggled(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ascending => write!(f, "asc"),
            Self::Descending => write!(f, "desc"),
        }
    }
}

/// Counts from one fetch: records kept, and records dropped because their
/// `custom` payload would not decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FetchSummary {
    pub loaded: usize,
    pub skipped: usize,
}

impl FetchSummary {
    /// `true` when the backend had nothing usable to show.
    pub fn is_empty(&self) -> bool {
        self.loaded == 0
    }
}

/// Whether a record belongs to the selected board.
///
/// `filter` is either a backend identifier in text form (`"1"`) or a
/// selector key (`"2x2"`). An empty filter matches everything; a record
/// with no board never matches a non-empty filter.
pub fn matches_board(record: &GameRecord, filter: &str) -> bool {
    if filter.is_empty() {
        return true;
    }
    let Some(board_id) = record.board_id else {
        return false;
    };
    board_id.to_string() == filter || resolve_board_identifier(filter) == Some(board_id)
}

/// Filters `records` by board and sorts them by creation time.
///
/// Comparison is by parsed timestamp value; records whose `created_at`
/// is missing or unparseable sort before all others in ascending order.
/// The sort is stable and the input is never touched.
pub fn project_history<'a>(
    records: &'a [GameRecord],
    filter: &str,
    order: SortOrder,
) -> Vec<&'a GameRecord> {
    let mut keyed: Vec<(Option<i64>, &GameRecord)> = records
        .iter()
        .filter(|r| matches_board(r, filter))
        .map(|r| (r.created_at_millis(), r))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| order.apply(a.cmp(b)));
    keyed.into_iter().map(|(_, r)| r).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use memgame_protocol::{BoardId, ScoreDetail};
    use serde_json::Map;

    fn record(board: Option<u64>, created_at: &str) -> GameRecord {
        GameRecord {
            id: None,
            board_id: board.map(BoardId),
            created_at: Some(created_at.to_string()),
            custom: ScoreDetail::default(),
            extra: Map::new(),
        }
    }

    #[test]
    fn test_sort_order_toggles() {
        assert_eq!(SortOrder::default(), SortOrder::Ascending);
        assert_eq!(SortOrder::Ascending.toggled(), SortOrder::Descending);
        assert_eq!(SortOrder::Descending.toggled(), SortOrder::Ascending);
        assert_eq!(SortOrder::Descending.to_string(), "desc");
    }

    #[test]
    fn test_matches_board_by_id_text_or_key() {
        let r = record(Some(1), "2024-01-01 00:00:00");
        assert!(matches_board(&r, ""));
        assert!(matches_board(&r, "1"));
        assert!(matches_board(&r, "2x2"));
        assert!(!matches_board(&r, "2"));
        assert!(!matches_board(&r, "4x4"));
        assert!(!matches_board(&record(None, "x"), "1"));
    }

    #[test]
    fn test_project_history_filters_and_preserves_order_on_ties() {
        let records = vec![
            record(Some(1), "2024-01-01 10:00:00"),
            record(Some(2), "2024-01-01 10:00:00"),
            record(Some(1), "2024-01-01 10:00:00"),
        ];
        let out = project_history(&records, "1", SortOrder::Ascending);
        assert_eq!(out.len(), 2);
        assert!(std::ptr::eq(out[0], &records[0]));
        assert!(std::ptr::eq(out[1], &records[2]));
    }

    #[test]
    fn test_project_history_compares_by_value_not_text() {
        // Text order would be 09:00Z, 11:30+01, 12:00+02.
        let records = vec![
            record(Some(1), "2024-01-01T12:00:00+02:00"), // 10:00Z
            record(Some(1), "2024-01-01T09:00:00Z"),      // 09:00Z
            record(Some(1), "2024-01-01T11:30:00+01:00"), // 10:30Z
        ];
        let asc = project_history(&records, "", SortOrder::Ascending);
        assert!(std::ptr::eq(asc[0], &records[1]));
        assert!(std::ptr::eq(asc[1], &records[0]));
        assert!(std::ptr::eq(asc[2], &records[2]));
    }

    #[test]
    fn test_unparseable_timestamps_sort_first() {
        let records = vec![
            record(Some(1), "2024-01-01 10:00:00"),
            record(Some(1), "not a date"),
        ];
        let asc = project_history(&records, "", SortOrder::Ascending);
        assert_eq!(asc[0].created_at.as_deref(), Some("not a date"));
    }

    #[test]
    fn test_fetch_summary_is_empty() {
        assert!(FetchSummary::default().is_empty());
        assert!(!FetchSummary { loaded: 1, skipped: 0 }.is_empty());
    }
}
