//! Adapters binding the console's wiring to the capability traits the scanner drives.
//!
//! The column strobes and the multiplexer address bus are plain push-pull outputs. The four sense
//! returns idle low through external pulldowns and read high while the addressed contact is closed.

use embassy_stm32::gpio::{Input, Output};
use manual_transmission_lib::{
    io::{ColumnDriver, RowSampler, SenseLines},
    matrix::COLUMNS,
};

/// The column strobe lines, in matrix order.
pub struct ColumnPins(pub [Output<'static>; COLUMNS as usize]);

impl ColumnDriver for ColumnPins {
    fn select(&mut self, column: u8) {
        for (n, pin) in self.0.iter_mut().enumerate() {
            if n == column as usize {
                pin.set_high();
            } else {
                pin.set_low();
            }
        }
    }
}

/// The multiplexer address bus and the four sense returns it steers.
///
/// One three-bit address is shared by all four multiplexers, so a single address selects the same
/// row pair on both manuals at once.
pub struct SensePins {
    /// Address bus, least significant line first.
    pub address: [Output<'static>; 3],
    /// Break-contact return for the lower manual.
    pub lower_break: Input<'static>,
    /// Make-contact return for the lower manual.
    pub lower_make: Input<'static>,
    /// Break-contact return for the upper manual.
    pub upper_break: Input<'static>,
    /// Make-contact return for the upper manual.
    pub upper_make: Input<'static>,
}

impl RowSampler for SensePins {
    fn select_address(&mut self, address: u8) {
        for (bit, pin) in self.address.iter_mut().enumerate() {
            if address & (1 << bit) == 0 {
                pin.set_low();
            } else {
                pin.set_high();
            }
        }
    }

    fn read(&mut self) -> SenseLines {
        SenseLines {
            lower_break: self.lower_break.is_high(),
            lower_make: self.lower_make.is_high(),
            upper_break: self.upper_break.is_high(),
            upper_make: self.upper_make.is_high(),
        }
    }
}
