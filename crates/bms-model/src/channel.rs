use std::fmt;

use serde::{Deserialize, Serialize};

/// Background audio (keysound without a lane).
pub const CH_BGM: u16 = 0x01;
/// Measure length scaling factor. Data is a decimal number, not cells.
pub const CH_MEASURE_SCALE: u16 = 0x02;
/// Tempo change, cell value is the BPM as a hex literal (01-FF).
pub const CH_BPM_LITERAL: u16 = 0x03;
pub const CH_BGA_BASE: u16 = 0x04;
pub const CH_BGA_POOR: u16 = 0x06;
pub const CH_BGA_LAYER: u16 = 0x07;
/// Tempo change through the `#BPMxx` table.
pub const CH_BPM_TABLE: u16 = 0x08;
/// Stop through the `#STOPxx` table.
pub const CH_STOP: u16 = 0x09;

/// Which player side a playable channel belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    P1,
    P2,
}

/// Role of a playable channel within one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ChannelRole {
    Scratch,
    /// Key number, 1-based (1..=7).
    Key(u8),
}

/// An input lane: the unit `on_input` is addressed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Lane {
    pub side: Side,
    pub role: ChannelRole,
}

impl Lane {
    pub const fn new(side: Side, role: ChannelRole) -> Self {
        Self { side, role }
    }

    pub const fn scratch(side: Side) -> Self {
        Self::new(side, ChannelRole::Scratch)
    }

    pub const fn key(side: Side, key: u8) -> Self {
        Self::new(side, ChannelRole::Key(key))
    }

    pub fn is_scratch(self) -> bool {
        self.role == ChannelRole::Scratch
    }

    /// The chart channel code this lane is written on.
    pub fn channel(self) -> u16 {
        let base = match self.side {
            Side::P1 => 0x10,
            Side::P2 => 0x20,
        };
        let offset = match self.role {
            ChannelRole::Scratch => 6,
            ChannelRole::Key(k @ 1..=5) => k as u16,
            ChannelRole::Key(k) => k as u16 + 2,
        };
        base + offset
    }
}

impl fmt::Display for Lane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = match self.side {
            Side::P1 => "1P",
            Side::P2 => "2P",
        };
        match self.role {
            ChannelRole::Scratch => write!(f, "{side} SC"),
            ChannelRole::Key(k) => write!(f, "{side} K{k}"),
        }
    }
}

/// BGA layer an image event targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BgaLayer {
    /// Channel 04
    Base,
    /// Channel 06, shown on POOR
    Poor,
    /// Channel 07
    Layer,
}

/// What a chart channel code means to the compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    Bgm,
    MeasureScale,
    BpmLiteral,
    BpmTable,
    Stop,
    Bga(BgaLayer),
    Note(Lane),
    /// Valid but not consumed by this compiler (free zone, invisible, LN, mines, ...).
    Ignored,
}

impl ChannelKind {
    /// Look up the kind for a channel code.
    pub fn of(channel: u16) -> Self {
        CHANNEL_TABLE
            .get(channel as usize)
            .copied()
            .unwrap_or(ChannelKind::Ignored)
    }

    /// Ordering class among events sharing a position within a measure:
    /// tempo first, stops last.
    pub(crate) fn tie_class(self) -> u8 {
        match self {
            Self::BpmLiteral | Self::BpmTable => 0,
            Self::Stop => 2,
            _ => 1,
        }
    }
}

const fn side_lane(side: Side, low: u16) -> ChannelKind {
    match low {
        1..=5 => ChannelKind::Note(Lane::key(side, low as u8)),
        6 => ChannelKind::Note(Lane::scratch(side)),
        8 | 9 => ChannelKind::Note(Lane::key(side, (low - 2) as u8)),
        _ => ChannelKind::Ignored,
    }
}

const fn build_channel_table() -> [ChannelKind; 256] {
    let mut table = [ChannelKind::Ignored; 256];
    table[CH_BGM as usize] = ChannelKind::Bgm;
    table[CH_MEASURE_SCALE as usize] = ChannelKind::MeasureScale;
    table[CH_BPM_LITERAL as usize] = ChannelKind::BpmLiteral;
    table[CH_BGA_BASE as usize] = ChannelKind::Bga(BgaLayer::Base);
    table[CH_BGA_POOR as usize] = ChannelKind::Bga(BgaLayer::Poor);
    table[CH_BGA_LAYER as usize] = ChannelKind::Bga(BgaLayer::Layer);
    table[CH_BPM_TABLE as usize] = ChannelKind::BpmTable;
    table[CH_STOP as usize] = ChannelKind::Stop;
    let mut low = 1;
    while low <= 9 {
        table[0x10 + low] = side_lane(Side::P1, low as u16);
        table[0x20 + low] = side_lane(Side::P2, low as u16);
        low += 1;
    }
    table
}

static CHANNEL_TABLE: [ChannelKind; 256] = build_channel_table();

/// Every lane a chart can place notes on, P1 then P2.
pub const ALL_LANES: [Lane; 16] = [
    Lane::scratch(Side::P1),
    Lane::key(Side::P1, 1),
    Lane::key(Side::P1, 2),
    Lane::key(Side::P1, 3),
    Lane::key(Side::P1, 4),
    Lane::key(Side::P1, 5),
    Lane::key(Side::P1, 6),
    Lane::key(Side::P1, 7),
    Lane::scratch(Side::P2),
    Lane::key(Side::P2, 1),
    Lane::key(Side::P2, 2),
    Lane::key(Side::P2, 3),
    Lane::key(Side::P2, 4),
    Lane::key(Side::P2, 5),
    Lane::key(Side::P2, 6),
    Lane::key(Side::P2, 7),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn p1_key_channels() {
        assert_eq!(ChannelKind::of(0x11), ChannelKind::Note(Lane::key(Side::P1, 1)));
        assert_eq!(ChannelKind::of(0x15), ChannelKind::Note(Lane::key(Side::P1, 5)));
        assert_eq!(ChannelKind::of(0x16), ChannelKind::Note(Lane::scratch(Side::P1)));
        assert_eq!(ChannelKind::of(0x18), ChannelKind::Note(Lane::key(Side::P1, 6)));
        assert_eq!(ChannelKind::of(0x19), ChannelKind::Note(Lane::key(Side::P1, 7)));
    }

    #[test]
    fn free_zone_is_ignored() {
        assert_eq!(ChannelKind::of(0x17), ChannelKind::Ignored);
        assert_eq!(ChannelKind::of(0x27), ChannelKind::Ignored);
    }

    #[test]
    fn invisible_and_ln_channels_ignored() {
        assert_eq!(ChannelKind::of(0x31), ChannelKind::Ignored);
        assert_eq!(ChannelKind::of(0x51), ChannelKind::Ignored);
        assert_eq!(ChannelKind::of(0xD1), ChannelKind::Ignored);
    }

    #[test]
    fn lane_channel_inverse_of_table() {
        for lane in ALL_LANES {
            assert_eq!(ChannelKind::of(lane.channel()), ChannelKind::Note(lane), "{lane}");
        }
    }

    #[test]
    fn tempo_sorts_before_stop() {
        assert!(ChannelKind::BpmLiteral.tie_class() < ChannelKind::Bgm.tie_class());
        let note = ChannelKind::Note(Lane::scratch(Side::P1));
        assert!(note.tie_class() < ChannelKind::Stop.tie_class());
    }

    #[test]
    fn lane_display() {
        assert_eq!(Lane::scratch(Side::P1).to_string(), "1P SC");
        assert_eq!(Lane::key(Side::P2, 7).to_string(), "2P K7");
    }
}
