//! Board-size selector.
//!
//! Views offer a fixed set of board sizes keyed by strings like `"4x4"`.
//! The backend knows each size by an integer [`BoardId`].

use std::fmt;

use crate::BoardId;

/// The board sizes the game offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoardSize {
    TwoByTwo,
    ThreeByFour,
    FourByFour,
    SixBySix,
}

impl BoardSize {
    /// Every board size, smallest first.
    pub const ALL: [BoardSize; 4] = [
        Self::TwoByTwo,
        Self::ThreeByFour,
        Self::FourByFour,
        Self::SixBySix,
    ];

    /// Parses a selector key. Unknown keys yield `None`.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "2x2" => Some(Self::TwoByTwo),
            "3x4" => Some(Self::ThreeByFour),
            "4x4" => Some(Self::FourByFour),
            "6x6" => Some(Self::SixBySix),
            _ => None,
        }
    }

    /// Reverse lookup from the backend identifier.
    pub fn from_board_id(id: BoardId) -> Option<Self> {
        Self::ALL.into_iter().find(|size| size.board_id() == id)
    }

    /// The selector key, e.g. `"3x4"`.
    pub fn key(self) -> &'static str {
        match self {
            Self::TwoByTwo => "2x2",
            Self::ThreeByFour => "3x4",
            Self::FourByFour => "4x4",
            Self::SixBySix => "6x6",
        }
    }

    /// The backend identifier for this size.
    pub fn board_id(self) -> BoardId {
        match self {
            Self::TwoByTwo => BoardId(1),
            Self::ThreeByFour => BoardId(2),
            Self::FourByFour => BoardId(3),
            Self::SixBySix => BoardId(4),
        }
    }

    /// `(rows, cols)` of the board.
    pub fn dimensions(self) -> (u32, u32) {
        match self {
            Self::TwoByTwo => (2, 2),
            Self::ThreeByFour => (3, 4),
            Self::FourByFour => (4, 4),
            Self::SixBySix => (6, 6),
        }
    }

    /// Number of pairs on a full board.
    pub fn pair_count(self) -> u32 {
        let (rows, cols) = self.dimensions();
        rows * cols / 2
    }
}

impl fmt::Display for BoardSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Maps a selector key to the backend board identifier.
///
/// Absence is the signal that board selection is incomplete; this never
/// fails.
pub fn resolve_board_identifier(key: &str) -> Option<BoardId> {
    BoardSize::from_key(key).map(BoardSize::board_id)
}
