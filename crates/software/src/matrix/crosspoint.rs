//! Key identity: folding a matrix crosspoint into a manual, a key number, and a pitch.

use wmidi::{Channel, U7};

use super::KEYS_PER_MANUAL;

/// Lowest pitch either manual sounds, MIDI note 36 (the C two octaves below middle C).
const PITCH_BASE: u8 = 36;

/// Defensive bounds on the derived pitch. The fold can only produce 36..=99, so the floor is unreachable, but the
/// clamp is applied unconditionally either way.
const PITCH_FLOOR: u8 = 0;
const PITCH_CEILING: u8 = 96;

/// One keyboard of the console.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Manual {
    /// The upper (swell) manual. Sends on [`Channel::Ch1`], channel nibble 0 on the wire.
    Upper,
    /// The lower (great) manual. Sends on [`Channel::Ch2`], channel nibble 1 on the wire.
    #[default]
    Lower,
}

impl Manual {
    /// The MIDI channel this manual sends on.
    pub const fn channel(self) -> Channel {
        match self {
            Manual::Upper => Channel::Ch1,
            Manual::Lower => Channel::Ch2,
        }
    }
}

/// The two halves of a key's dual-contact switch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Contact {
    /// Closes first on press, opens last on release. Only rearms the debounce state; never sounds.
    Break,
    /// Closes last on press, opens first on release. Triggers the note events.
    Make,
}

/// A single switch cell of the matrix, addressed by logical row (`0..32`) and column (`0..8`).
///
/// Key identity is derived here and nowhere else: the row pair folds into a key number, `key = 8 * (row / 2) +
/// column`, counting the lower manual's keys as `0..64` and the upper manual's as `64..128`. The fold is total over
/// the whole (row, column) domain and assigns every key number within a manual exactly once.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Crosspoint {
    row: u8,
    column: u8,
}

impl Crosspoint {
    /// Address the cell at `row` and `column`.
    pub const fn new(row: u8, column: u8) -> Self {
        Self { row, column }
    }

    /// The logical key number, `0..128` across both manuals.
    pub const fn key(self) -> u8 {
        8 * (self.row / 2) + self.column
    }

    /// Which half of the key's switch this cell senses, read off the row parity.
    pub const fn contact(self) -> Contact {
        if self.row % 2 == 0 {
            Contact::Make
        } else {
            Contact::Break
        }
    }

    /// The manual this cell belongs to.
    pub const fn manual(self) -> Manual {
        if self.key() >= KEYS_PER_MANUAL {
            Manual::Upper
        } else {
            Manual::Lower
        }
    }

    /// The pitch this cell's key sounds: note 36 plus the key's position within its manual, clamped to `[0, 96]`.
    ///
    /// The clamp never fires on a correctly wired 61-key manual (positions 61..64 are unwired); when it does fire,
    /// the topology constants and the keybed disagree, which is worth a log line but not a fault.
    pub fn pitch(self) -> U7 {
        let raw = PITCH_BASE + self.key() % KEYS_PER_MANUAL;
        let clamped = raw.clamp(PITCH_FLOOR, PITCH_CEILING);
        #[cfg(feature = "defmt")]
        if clamped != raw {
            defmt::warn!(
                "key {} sits above the wired keybed; pitch {} clamped to {}",
                self.key(),
                raw,
                clamped
            );
        }
        U7::from_u8_lossy(clamped)
    }
}
