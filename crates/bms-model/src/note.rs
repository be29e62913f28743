use std::fmt;

use serde::{Deserialize, Serialize};

use crate::channel::{BgaLayer, Lane};

/// Anything placed on the absolute timeline.
pub trait Timed {
    fn time_ms(&self) -> f64;
}

/// Two-character base-36 id referencing a `#WAVxx` / `#BMPxx` definition.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SampleId(pub u16);

impl SampleId {
    /// Parse a two-character base-36 cell. Returns `None` for malformed cells.
    pub fn from_cell(cell: &str) -> Option<Self> {
        let bytes = cell.as_bytes();
        if bytes.len() != 2 {
            return None;
        }
        let high = base36_digit(bytes[0])?;
        let low = base36_digit(bytes[1])?;
        Some(Self(high * 36 + low))
    }
}

impl fmt::Display for SampleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const DIGITS: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
        let high = DIGITS[(self.0 / 36 % 36) as usize] as char;
        let low = DIGITS[(self.0 % 36) as usize] as char;
        write!(f, "{high}{low}")
    }
}

pub(crate) fn base36_digit(b: u8) -> Option<u16> {
    match b {
        b'0'..=b'9' => Some((b - b'0') as u16),
        b'A'..=b'Z' => Some((b - b'A' + 10) as u16),
        b'a'..=b'z' => Some((b - b'a' + 10) as u16),
        _ => None,
    }
}

/// A playable note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Absolute time in milliseconds
    pub time_ms: f64,
    /// Chart channel code the note was written on
    pub channel: u16,
    pub lane: Lane,
    /// Keysound played on hit
    pub sample: SampleId,
}

/// A background keysound (channel 01).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BgmEvent {
    pub time_ms: f64,
    pub sample: SampleId,
}

/// A background image change (channels 04/06/07).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BgaEvent {
    pub time_ms: f64,
    pub layer: BgaLayer,
    /// `#BMPxx` id
    pub image: SampleId,
}

/// Tempo change, from either a hex literal or a `#BPMxx` lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BpmEvent {
    pub time_ms: f64,
    pub bpm: f64,
}

/// A timeline freeze.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopEvent {
    /// Time at which the freeze starts
    pub time_ms: f64,
    pub duration_ms: f64,
}

impl Timed for Note {
    fn time_ms(&self) -> f64 {
        self.time_ms
    }
}

impl Timed for BgmEvent {
    fn time_ms(&self) -> f64 {
        self.time_ms
    }
}

impl Timed for BgaEvent {
    fn time_ms(&self) -> f64 {
        self.time_ms
    }
}

impl Timed for BpmEvent {
    fn time_ms(&self) -> f64 {
        self.time_ms
    }
}

impl Timed for StopEvent {
    fn time_ms(&self) -> f64 {
        self.time_ms
    }
}
