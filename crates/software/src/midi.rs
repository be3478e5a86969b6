//! Outbound note events and their 3-byte wire encoding.

use wmidi::{MidiMessage, Note, U7};

use crate::matrix::{Crosspoint, Manual};

/// Velocity sent with every note-on. The keybed's contacts cannot measure velocity, so every note sounds at full
/// strength and dynamics are left to the tonewheel emulator's swell control.
pub const NOTE_ON_VELOCITY: U7 = U7::from_u8_lossy(0x7F);

/// Velocity sent with every note-off.
pub const NOTE_OFF_VELOCITY: U7 = U7::from_u8_lossy(0x00);

/// A note transition bound for the host: which manual, which pitch, on or off.
///
/// Events are constructed and consumed within one scan tick, never stored. The pitch is kept as a [`U7`] because
/// the [`tinyvec`] buffers the scan engine collects events into require [`Default`] items; [`NoteEvent::message`]
/// rehydrates the typed [`wmidi`] view.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NoteEvent {
    manual: Manual,
    pitch: U7,
    on: bool,
}

#[cfg(feature = "defmt")]
impl defmt::Format for NoteEvent {
    fn format(&self, fmt: defmt::Formatter) {
        let Self { manual, pitch, on } = self;
        defmt::write!(
            fmt,
            "NoteEvent {{ manual: {}, note: {} ({}), on: {} }}",
            manual,
            Note::from(*pitch).to_str(),
            u8::from(*pitch),
            on
        );
    }
}

impl NoteEvent {
    /// A note-on for the key under `point`.
    pub fn on(point: Crosspoint) -> Self {
        Self { manual: point.manual(), pitch: point.pitch(), on: true }
    }

    /// A note-off for the key under `point`.
    pub fn off(point: Crosspoint) -> Self {
        Self { manual: point.manual(), pitch: point.pitch(), on: false }
    }

    /// The typed message this event puts on the wire.
    pub fn message(&self) -> MidiMessage<'static> {
        let note = Note::from(self.pitch);
        if self.on {
            MidiMessage::NoteOn(self.manual.channel(), note, NOTE_ON_VELOCITY)
        } else {
            MidiMessage::NoteOff(self.manual.channel(), note, NOTE_OFF_VELOCITY)
        }
    }

    /// The 3-byte wire form: status (`0x90 | channel` for on, `0x80 | channel` for off), pitch, velocity.
    pub fn to_bytes(&self) -> [u8; 3] {
        let mut bytes = [0u8; 3];
        self.message()
            .copy_to_slice(&mut bytes)
            .expect("note on/off messages are always three bytes");
        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wmidi::Channel;

    #[test]
    fn lower_manual_notes_use_channel_nibble_one() {
        let key_0 = Crosspoint::new(0, 0);
        assert_eq!([0x91, 36, 0x7F], NoteEvent::on(key_0).to_bytes());
        assert_eq!([0x81, 36, 0x00], NoteEvent::off(key_0).to_bytes());
    }

    #[test]
    fn upper_manual_notes_use_channel_nibble_zero() {
        let key_64 = Crosspoint::new(16, 0);
        assert_eq!([0x90, 36, 0x7F], NoteEvent::on(key_64).to_bytes());
        assert_eq!([0x80, 36, 0x00], NoteEvent::off(key_64).to_bytes());
    }

    #[test]
    fn clamped_pitch_reaches_the_wire_clamped() {
        // key 63, the top unwired position of the lower manual
        let event = NoteEvent::on(Crosspoint::new(14, 7));
        assert_eq!([0x91, 96, 0x7F], event.to_bytes());
    }

    #[test]
    fn message_carries_typed_channel_and_note() {
        let expected = MidiMessage::NoteOn(Channel::Ch1, Note::C2, NOTE_ON_VELOCITY);
        let actual = NoteEvent::on(Crosspoint::new(16, 0)).message();
        assert_eq!(expected, actual, "Expected left but got right");
    }
}
