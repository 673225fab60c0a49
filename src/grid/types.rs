//! Core domain types for the meta tic-tac-toe grid.

use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use strum::{Display as StrumDisplay, EnumIter};

/// Number of sub-boards on a meta board.
pub const SUB_BOARDS: u32 = 9;

/// Number of cells on each sub-board.
pub const CELLS_PER_SUB_BOARD: u32 = 9;

/// Total addressable cells on a meta board.
pub const META_CELLS: u32 = SUB_BOARDS * CELLS_PER_SUB_BOARD;

/// Bit-per-cell occupancy of the grid.
///
/// Bit `sub_board * 9 + cell` is set when that cell is taken. Board snapshots
/// and proposed moves share this representation; a move only means something
/// relative to the snapshot it targets.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    From,
)]
#[serde(transparent)]
pub struct Occupancy(u128);

impl Occupancy {
    /// The empty board.
    pub const EMPTY: Self = Self(0);

    /// Wraps a raw bitmask.
    pub const fn new(bits: u128) -> Self {
        Self(bits)
    }

    /// Occupancy with a single cell set.
    ///
    /// Returns `None` when the index does not fit in the mask.
    pub fn cell(index: u32) -> Option<Self> {
        1u128.checked_shl(index).map(Self)
    }

    /// Occupancy with every cell below `count` set.
    pub fn first_cells(count: u32) -> Self {
        match 1u128.checked_shl(count) {
            Some(bit) => Self(bit - 1),
            None => Self(u128::MAX),
        }
    }

    /// Occupancy covering the meta-board address space.
    pub fn meta_board() -> Self {
        Self::first_cells(META_CELLS)
    }

    /// Returns the raw bitmask.
    pub const fn bits(self) -> u128 {
        self.0
    }

    /// True when no cell is set.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of set cells.
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// True when at least one cell is set in both masks.
    pub const fn overlaps(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// True when every cell of `other` is also set in `self`.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// True when `self` contains `other` and has at least one more cell.
    pub const fn is_strict_superset_of(self, other: Self) -> bool {
        self.contains(other) && self.0 != other.0
    }

    /// Iterates the indices of set cells in ascending order.
    pub fn cells(self) -> impl Iterator<Item = u32> {
        (0..u128::BITS).filter(move |index| (self.0 >> index) & 1 == 1)
    }
}

impl std::ops::BitOr for Occupancy {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitAnd for Occupancy {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl std::ops::BitXor for Occupancy {
    type Output = Self;

    fn bitxor(self, rhs: Self) -> Self {
        Self(self.0 ^ rhs.0)
    }
}

impl std::fmt::Display for Occupancy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#b}", self.0)
    }
}

/// Seat whose turn it is, derived from history parity.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    StrumDisplay,
    EnumIter,
)]
#[strum(serialize_all = "snake_case")]
pub enum Role {
    /// Player 1, moves after an even number of moves (including none).
    First,
    /// Player 2, moves after an odd number of moves.
    Second,
}

impl Role {
    /// Returns the other seat.
    pub fn opponent(self) -> Self {
        match self {
            Role::First => Role::Second,
            Role::Second => Role::First,
        }
    }

    /// Role to move once `moves` moves have been played.
    pub fn for_moves_played(moves: usize) -> Self {
        if moves % 2 == 0 { Role::First } else { Role::Second }
    }
}

/// Display name used to seat a player in a game record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, From)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    /// Creates a player identifier.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PlayerId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Key of a game record in the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, From)]
#[serde(transparent)]
pub struct GameId(String);

impl GameId {
    /// Creates a game identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for GameId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Account key of a user submitting moves.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, From)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Creates a user identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}
