//! Move-shape legality rules.
//!
//! Each seat has a universe of cells it may claim. A legal move claims
//! exactly one cell from that universe. The universes are injected rather
//! than global so that variants can restrict seats to disjoint regions.

use super::{Occupancy, Role};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::{instrument, trace};

/// Per-seat legal-move universes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct MoveRules {
    /// Cells player 1 may claim.
    first: Occupancy,
    /// Cells player 2 may claim.
    second: Occupancy,
}

impl MoveRules {
    /// Creates rules from explicit universes.
    pub fn new(first: Occupancy, second: Occupancy) -> Self {
        Self { first, second }
    }

    /// Both seats may claim any of the 81 meta-board cells.
    pub fn meta_board() -> Self {
        let board = Occupancy::meta_board();
        Self::new(board, board)
    }

    /// Returns the universe for a seat.
    pub fn universe(&self, role: Role) -> Occupancy {
        match role {
            Role::First => self.first,
            Role::Second => self.second,
        }
    }

    /// True when `cells` is a single cell inside the seat's universe.
    #[instrument(level = "trace", skip(self))]
    pub fn is_legal_move_shape(&self, cells: Occupancy, role: Role) -> bool {
        let legal = cells.count() == 1 && self.universe(role).contains(cells);
        trace!(legal, "Checked move shape");
        legal
    }
}

impl Default for MoveRules {
    fn default() -> Self {
        Self::meta_board()
    }
}
