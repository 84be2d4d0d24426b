//! Win history laid out as a bead road.

use serde::{Deserialize, Serialize};

use crate::eval::Winner;

/// Cells per column.
pub const ROWS: usize = 10;

/// Columns before the road wraps and starts over.
pub const COLUMNS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadCell {
    pub winner: Winner,
    pub column: usize,
    pub row: usize,
}

/// Per-winner round counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tally {
    pub master: usize,
    pub shark: usize,
    pub tie: usize,
}

impl Tally {
    pub fn total(&self) -> usize {
        self.master + self.shark + self.tie
    }
}

/// A column grows downwards while the same winner repeats; any change of
/// winner, or a full column, opens the next one.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WinRoad {
    cells: Vec<RoadCell>,
}

impl WinRoad {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place `winner` and return the cell it landed in.
    pub fn record(&mut self, winner: Winner) -> RoadCell {
        let (column, row) = match self.cells.last() {
            None => (0, 0),
            Some(last) if last.winner == winner && last.row + 1 < ROWS => {
                (last.column, last.row + 1)
            }
            Some(last) => (last.column + 1, 0),
        };
        let (column, row) = if column >= COLUMNS {
            self.cells.clear();
            (0, 0)
        } else {
            (column, row)
        };
        let cell = RoadCell {
            winner,
            column,
            row,
        };
        self.cells.push(cell);
        cell
    }

    pub fn cells(&self) -> &[RoadCell] {
        &self.cells
    }

    pub fn tally(&self) -> Tally {
        self.cells
            .iter()
            .fold(Tally::default(), |mut tally, cell| {
                match cell.winner {
                    Winner::Master => tally.master += 1,
                    Winner::Shark => tally.shark += 1,
                    Winner::Tie => tally.tie += 1,
                }
                tally
            })
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }
}
