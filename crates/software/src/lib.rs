//! This crate contains architecture-agnostic logic for Manual Transmission, a controller board that gives the two
//! 61-key manuals of a gutted [Hammond-style](https://en.wikipedia.org/wiki/Hammond_organ) console a second life as a
//! MIDI keyboard for the [setBfree](https://setbfree.org) tonewheel emulator. The manuals share one switch matrix of
//! dual-contact (break + make) key switches; this crate scans that matrix, debounces every key using its two
//! contacts, and turns transitions into note-on/note-off messages exactly once per physical press or release.
//!
//! Everything here runs against the capability traits in [`io`], so the whole engine can be exercised on a
//! development host with mock pins and mock time.

#![deny(missing_docs)]
#![no_std]

pub mod io;

/// The switch matrix: topology constants, the row-vector bit layout, and key identity.
pub mod matrix;

pub mod midi;

pub mod scan;
