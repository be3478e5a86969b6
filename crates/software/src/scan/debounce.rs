//! The debounce gate: decides which contact transitions become note events.

use crate::matrix::{CELLS, Contact, Crosspoint};
use crate::midi::NoteEvent;

/// One "already sent" bit per key, sized to the matrix's full 256-cell addressing domain.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SentFlags {
    bits: [u8; CELLS / 8],
}

impl SentFlags {
    /// Flags with every bit clear.
    pub const fn new() -> Self {
        Self { bits: [0; CELLS / 8] }
    }

    /// Set the flag for `key`.
    pub fn mark(&mut self, key: u8) {
        self.bits[key as usize / 8] |= 1 << (key % 8);
    }

    /// Clear the flag for `key`.
    pub fn clear(&mut self, key: u8) {
        self.bits[key as usize / 8] &= !(1 << (key % 8));
    }

    /// Whether the flag for `key` is set.
    pub fn contains(&self, key: u8) -> bool {
        self.bits[key as usize / 8] & (1 << (key % 8)) != 0
    }
}

/// Debounce state for every key of both manuals.
///
/// A key's break contact closes before its make contact on press and opens after it on release. The gate leans on
/// that geometry instead of timers: a closing break rearms its key by clearing both sent flags, after which the
/// make contact can emit exactly one note-on and one note-off before the next rearm. A make contact still bouncing
/// when the scan revisits its column therefore finds its flag already set and stays silent. Break bounce is
/// harmless for the same reason: re-clearing cleared flags changes nothing.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DebounceGate {
    note_on_sent: SentFlags,
    note_off_sent: SentFlags,
}

impl Default for DebounceGate {
    fn default() -> Self {
        Self::new()
    }
}

impl DebounceGate {
    /// A gate that has sent nothing, the state assumed at power-on.
    pub const fn new() -> Self {
        Self { note_on_sent: SentFlags::new(), note_off_sent: SentFlags::new() }
    }

    /// Judge one observed transition, where `closed` is the new state of the contact at `point`, and return the
    /// note event it warrants, if any.
    pub fn on_transition(&mut self, point: Crosspoint, closed: bool) -> Option<NoteEvent> {
        let key = point.key();
        match point.contact() {
            Contact::Break => {
                if closed {
                    // a fresh press has begun; rearm the key's on/off pair
                    self.note_on_sent.clear(key);
                    self.note_off_sent.clear(key);
                }
                None
            }
            Contact::Make if closed => {
                if self.note_on_sent.contains(key) {
                    None
                } else {
                    self.note_on_sent.mark(key);
                    Some(NoteEvent::on(point))
                }
            }
            Contact::Make => {
                if self.note_off_sent.contains(key) {
                    None
                } else {
                    self.note_off_sent.mark(key);
                    Some(NoteEvent::off(point))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // key 0 of the lower manual
    const MAKE: Crosspoint = Crosspoint::new(0, 0);
    const BREAK: Crosspoint = Crosspoint::new(1, 0);

    fn pressed_gate() -> DebounceGate {
        let mut gate = DebounceGate::new();
        assert_eq!(None, gate.on_transition(BREAK, true));
        assert_eq!(Some(NoteEvent::on(MAKE)), gate.on_transition(MAKE, true));
        gate
    }

    #[test]
    fn press_and_release_emit_one_on_and_one_off() {
        let mut gate = pressed_gate();
        // release: make opens first, then break
        assert_eq!(Some(NoteEvent::off(MAKE)), gate.on_transition(MAKE, false));
        assert_eq!(None, gate.on_transition(BREAK, false));
    }

    #[test]
    fn break_transitions_never_emit() {
        let mut gate = DebounceGate::new();
        assert_eq!(None, gate.on_transition(BREAK, true));
        assert_eq!(None, gate.on_transition(BREAK, false));
    }

    #[test]
    fn repeated_make_closures_emit_at_most_one_note_on() {
        let mut gate = pressed_gate();
        assert_eq!(None, gate.on_transition(MAKE, true));
        assert_eq!(None, gate.on_transition(MAKE, true));
    }

    #[test]
    fn a_closing_break_rearms_the_key() {
        let mut gate = pressed_gate();
        let _ = gate.on_transition(MAKE, false);
        // next press
        assert_eq!(None, gate.on_transition(BREAK, true));
        assert_eq!(
            Some(NoteEvent::on(MAKE)),
            gate.on_transition(MAKE, true),
            "Expected the rearmed key to sound again"
        );
    }

    #[test]
    fn make_bounce_yields_exactly_one_note_on() {
        let mut gate = DebounceGate::new();
        let _ = gate.on_transition(BREAK, true);
        // three rapid toggles of the make contact with no intervening rearm
        assert_eq!(Some(NoteEvent::on(MAKE)), gate.on_transition(MAKE, true));
        assert_eq!(Some(NoteEvent::off(MAKE)), gate.on_transition(MAKE, false));
        assert_eq!(None, gate.on_transition(MAKE, true), "Expected the sent flag to starve the bounce");
    }

    #[test]
    fn manuals_do_not_share_flags() {
        // key 0 and key 64 live at the same column and multiplexer address
        let upper_make = Crosspoint::new(16, 0);
        let upper_break = Crosspoint::new(17, 0);

        let mut gate = pressed_gate();
        assert_eq!(None, gate.on_transition(upper_break, true));
        assert_eq!(
            Some(NoteEvent::on(upper_make)),
            gate.on_transition(upper_make, true),
            "Expected the upper manual's key to be armed independently"
        );
    }
}
