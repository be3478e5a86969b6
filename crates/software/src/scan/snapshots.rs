//! Change detection: one stored reading per column, diffed against every new reading.

use crate::matrix::{COLUMNS, ChangedRows, RowVector};

/// The last accepted reading of every column.
///
/// Owned by the scan engine alone. A diff replaces the stored reading unconditionally, so every flipped row is
/// reported exactly once no matter how long ago the column was last visited.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ColumnSnapshots {
    stored: [RowVector; COLUMNS as usize],
}

impl Default for ColumnSnapshots {
    fn default() -> Self {
        Self::new()
    }
}

impl ColumnSnapshots {
    /// Snapshots with every contact open, the state assumed at power-on.
    pub const fn new() -> Self {
        Self { stored: [RowVector::open(); COLUMNS as usize] }
    }

    /// Replace the stored reading for `column` with `reading` and report the rows that flipped, ascending.
    pub fn diff(&mut self, column: u8, reading: RowVector) -> ChangedRows {
        let changed = self.stored[column as usize].changed_rows(reading);
        self.stored[column as usize] = reading;
        changed
    }
}
