//! Capability traits at the hardware boundary.
//!
//! The firmware implements these over real pins; tests implement them with scripted mocks. The scan engine never
//! touches the matrix or the outside world except through these traits.

/// The four sense lines presented by the row multiplexers at one address: break- and make-contact state for the key
/// this address selects on each manual, in the currently driven column. `true` means the contact reads closed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SenseLines {
    /// Break contact of the lower manual's key.
    pub lower_break: bool,
    /// Make contact of the lower manual's key.
    pub lower_make: bool,
    /// Break contact of the upper manual's key.
    pub upper_break: bool,
    /// Make contact of the upper manual's key.
    pub upper_make: bool,
}

/// Drives the eight column lines of the switch matrix.
pub trait ColumnDriver {
    /// Assert drive line `column` (in `0..8`) high and every other line low. No two lines are ever high at once;
    /// selecting the column that is already active has no observable effect.
    fn select(&mut self, column: u8);
}

/// Reads the four row sense lines through the 8-way multiplexers.
pub trait RowSampler {
    /// Present `address` (in `0..8`) on the three multiplexer select lines. The multiplexers need a short settle
    /// interval between this call and a trustworthy [`read`](Self::read); the scan engine provides it.
    fn select_address(&mut self, address: u8);

    /// Sample the four sense lines for the currently selected column and multiplexer address.
    fn read(&mut self) -> SenseLines;
}

/// Accepts outbound MIDI bytes, fire and forget.
///
/// Implementations must not block the caller: delivery problems (a full buffer, a detached host) are theirs to
/// resolve or swallow, never the scanner's.
pub trait MidiTransport {
    /// Append `bytes` to the ordered outbound stream.
    fn send(&mut self, bytes: &[u8]);
}
