//! The packed per-column reading of all 32 rows.

use super::{MUX_ADDRESSES, Manual};
use crate::io::SenseLines;

/// The state of every logical row of one column, bit *r* = row *r*, 1 = contact closed.
///
/// The lower manual occupies bits 0..16 and the upper manual bits 16..32 with the identical sub-layout. Within a
/// manual's half, multiplexer addresses 0..4 fill the low byte and addresses 4..8 the high byte, make contact on
/// the even bit and break contact one above (`mkN`/`brN` = make/break of the manual's key *N* in this column):
///
/// ```text
/// bit   15  14  13  12  11  10   9   8    7   6   5   4   3   2   1   0
///      br7 mk7 br6 mk6 br5 mk5 br4 mk4  br3 mk3 br2 mk2 br1 mk1 br0 mk0
///      |---- mux addresses 4..8 ----|   |---- mux addresses 0..4 ----|
/// ```
///
/// Row numbers are exactly these bit positions. Everything else in the crate reads them through the named
/// accessors here, so the sampler and the event mapper cannot drift apart.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RowVector(u32);

impl RowVector {
    /// A reading with every contact open.
    pub const fn open() -> Self {
        Self(0)
    }

    /// Record the four sense lines read at multiplexer `address` into their row bits.
    pub fn record(&mut self, address: u8, senses: SenseLines) {
        self.set(Self::bit(Manual::Lower, address, false), senses.lower_make);
        self.set(Self::bit(Manual::Lower, address, true), senses.lower_break);
        self.set(Self::bit(Manual::Upper, address, false), senses.upper_make);
        self.set(Self::bit(Manual::Upper, address, true), senses.upper_break);
    }

    /// Whether the contact on logical `row` read closed.
    pub const fn closed(self, row: u8) -> bool {
        self.0 & (1 << row) != 0
    }

    /// The rows whose contact state differs between `self` and `later`, in ascending row order.
    pub const fn changed_rows(self, later: RowVector) -> ChangedRows {
        ChangedRows(self.0 ^ later.0)
    }

    /// Row bit for one contact at one multiplexer address, per the layout table above.
    const fn bit(manual: Manual, address: u8, break_contact: bool) -> u8 {
        debug_assert!(address < MUX_ADDRESSES);
        let half = match manual {
            Manual::Upper => 16,
            Manual::Lower => 0,
        };
        half + 2 * address + break_contact as u8
    }

    fn set(&mut self, bit: u8, closed: bool) {
        if closed {
            self.0 |= 1 << bit;
        } else {
            self.0 &= !(1 << bit);
        }
    }
}

/// Iterator over the row indices whose bits differ between two readings, ascending.
///
/// Lazy, finite, and consumed once per scan cycle; it cannot be restarted.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChangedRows(u32);

impl Iterator for ChangedRows {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        if self.0 == 0 {
            return None;
        }
        let row = self.0.trailing_zeros() as u8;
        self.0 &= self.0 - 1;
        Some(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_CLOSED: SenseLines = SenseLines {
        lower_break: true,
        lower_make: true,
        upper_break: true,
        upper_make: true,
    };

    fn closed_rows(vector: RowVector) -> impl Iterator<Item = u8> {
        (0..32).filter(move |&row| vector.closed(row))
    }

    #[test]
    fn address_zero_lands_in_the_low_bits_of_each_half() {
        let mut vector = RowVector::open();
        vector.record(0, ALL_CLOSED);
        let expected = [0, 1, 16, 17];
        assert!(closed_rows(vector).eq(expected), "Expected rows {expected:?}");
    }

    #[test]
    fn address_four_starts_the_high_byte_of_each_half() {
        let mut vector = RowVector::open();
        vector.record(4, ALL_CLOSED);
        let expected = [8, 9, 24, 25];
        assert!(closed_rows(vector).eq(expected), "Expected rows {expected:?}");
    }

    #[test]
    fn each_sense_line_owns_one_row() {
        let mut vector = RowVector::open();
        vector.record(7, SenseLines { upper_break: true, ..Default::default() });
        assert!(closed_rows(vector).eq([31]), "Expected the last break row of the upper manual");

        vector = RowVector::open();
        vector.record(3, SenseLines { lower_make: true, ..Default::default() });
        assert!(closed_rows(vector).eq([6]), "Expected the make row of the lower manual's key 3");
    }

    #[test]
    fn recording_an_address_again_overwrites_it() {
        let mut vector = RowVector::open();
        vector.record(2, ALL_CLOSED);
        vector.record(2, SenseLines { lower_break: true, ..Default::default() });
        assert!(closed_rows(vector).eq([5]), "Expected the re-read to clear the other three rows");
    }

    #[test]
    fn changed_rows_are_ascending_and_exact() {
        let mut before = RowVector::open();
        before.record(0, SenseLines { lower_make: true, ..Default::default() });

        let mut after = RowVector::open();
        after.record(0, SenseLines { lower_break: true, ..Default::default() });
        after.record(6, ALL_CLOSED);

        // row 0 closes→opens, row 1 opens→closes, address 6 rows all close
        let expected = [0, 1, 12, 13, 28, 29];
        assert!(before.changed_rows(after).eq(expected), "Expected rows {expected:?}");
    }

    #[test]
    fn identical_readings_have_no_changed_rows() {
        let mut reading = RowVector::open();
        reading.record(5, ALL_CLOSED);
        assert_eq!(None, reading.changed_rows(reading).next());
    }
}
