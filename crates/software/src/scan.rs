//! The scan engine: walks the matrix column by column and turns contact transitions into note events.
//!
//! One [`tick`](MatrixScanner::tick) drives the active column, lets it settle, reads all eight multiplexer
//! addresses (settling before each read), diffs the assembled reading against the column's snapshot, runs every
//! flipped row through the debounce gate, and advances to the next column. Eight ticks sweep the whole console in
//! under a millisecond, fast enough that no playable key press can slip between two visits to a column.

mod debounce;
mod snapshots;

pub use debounce::{DebounceGate, SentFlags};
pub use snapshots::ColumnSnapshots;

use embassy_time::{Duration, Timer};
use tinyvec::{ArrayVec, array_vec};

use crate::io::{ColumnDriver, RowSampler};
use crate::matrix::{COLUMNS, Crosspoint, MUX_ADDRESSES, ROWS, RowVector};
use crate::midi::NoteEvent;

/// Wait after driving a column before the first multiplexer read.
pub const COLUMN_SETTLE: Duration = Duration::from_micros(20);

/// Wait after presenting a multiplexer address before trusting the sense lines.
pub const ADDRESS_SETTLE: Duration = Duration::from_micros(10);

/// Upper bound on the events one tick can produce: one per make row of a column.
pub const TICK_EVENT_CAPACITY: usize = ROWS as usize / 2;

/// The note events one tick emitted, oldest first.
pub type TickEvents = ArrayVec<[NoteEvent; TICK_EVENT_CAPACITY]>;

/// The owned state of the whole engine: column snapshots, debounce flags, and the round-robin column cursor.
///
/// Nothing is global or shared. The firmware owns exactly one `MatrixScanner` inside its scan task; tests own
/// their own and feed them synthetic readings or mock hardware and mock time.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MatrixScanner {
    snapshots: ColumnSnapshots,
    gate: DebounceGate,
    active_column: u8,
}

impl Default for MatrixScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl MatrixScanner {
    /// An engine that believes every contact is open and nothing has been sent, so the first real transition on
    /// every key is observable.
    pub const fn new() -> Self {
        Self {
            snapshots: ColumnSnapshots::new(),
            gate: DebounceGate::new(),
            active_column: 0,
        }
    }

    /// The column the next tick will scan. Ticks visit columns round-robin, 0→1→…→7→0.
    pub fn active_column(&self) -> u8 {
        self.active_column
    }

    /// Scan the active column once and advance to the next.
    ///
    /// Drives the column, settles, assembles the reading address by address, and maps every observed transition
    /// through the debounce gate. The settle waits are the only suspension points; everything else runs to
    /// completion, and the returned events are ready for the wire.
    pub async fn tick<C, R>(&mut self, columns: &mut C, rows: &mut R) -> TickEvents
    where
        C: ColumnDriver,
        R: RowSampler,
    {
        let column = self.active_column;
        columns.select(column);
        Timer::after(COLUMN_SETTLE).await;

        let reading = Self::sample(rows).await;
        let events = self.process(column, reading);

        self.active_column = (column + 1) % COLUMNS;
        events
    }

    /// Diff `reading` against `column`'s snapshot and run every flipped row through the debounce gate.
    ///
    /// The synchronous half of [`tick`](Self::tick); transition sequences can be fed through here directly,
    /// without hardware or time.
    pub fn process(&mut self, column: u8, reading: RowVector) -> TickEvents {
        let mut events: TickEvents = array_vec!();
        for row in self.snapshots.diff(column, reading) {
            let point = Crosspoint::new(row, column);
            if let Some(event) = self.gate.on_transition(point, reading.closed(row)) {
                #[cfg(feature = "defmt")]
                defmt::trace!("{}", event);
                events.push(event);
            }
        }
        events
    }

    /// Assemble one column reading by walking the eight multiplexer addresses in increasing order.
    async fn sample<R: RowSampler>(rows: &mut R) -> RowVector {
        let mut reading = RowVector::open();
        for address in 0..MUX_ADDRESSES {
            rows.select_address(address);
            Timer::after(ADDRESS_SETTLE).await;
            reading.record(address, rows.read());
        }
        reading
    }
}
