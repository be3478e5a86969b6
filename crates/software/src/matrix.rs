//! The switch matrix and key identity.
//!
//! Two 61-key manuals share one matrix of 8 drive columns by 32 logical rows. Each key owns a pair of adjacent
//! rows, its make contact on the even row and its break contact on the odd row above, so a manual occupies
//! 16 rows: the lower manual in rows 0..16 and the upper manual in rows 16..32. One column holds 8 keys of each manual, and
//! the 8 columns together cover 64 key positions per manual, of which a 61-key manual wires the bottom 61.
//!
//! [`RowVector`] documents how the multiplexed sense reads pack into row bits; [`Crosspoint`] folds a (row, column)
//! pair into key number, manual, and pitch. Nothing outside this module computes either mapping.

mod crosspoint;
mod row_vector;

pub use crosspoint::{Contact, Crosspoint, Manual};
pub use row_vector::{ChangedRows, RowVector};

/// Number of time-multiplexed column drive lines.
pub const COLUMNS: u8 = 8;

/// Number of logical rows read back per column, counting both manuals' interleaved break and make rows.
pub const ROWS: u8 = 32;

/// Number of multiplexer addresses walked per column scan; each address exposes one key of each manual.
pub const MUX_ADDRESSES: u8 = 8;

/// Number of addressable switch cells in the matrix.
pub const CELLS: usize = COLUMNS as usize * ROWS as usize;

/// Key positions addressable per manual. A 61-key manual leaves the top three positions unwired.
pub const KEYS_PER_MANUAL: u8 = 64;
