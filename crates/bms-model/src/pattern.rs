//! Lane modifiers applied to a compiled chart before play.
//!
//! Each modifier yields a per-side key mapping `mapping[key - 1] = new key`.
//! Scratch lanes are never moved.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::channel::{ChannelRole, Lane, Side};
use crate::model::CompiledChart;

const KEYS_PER_SIDE: usize = 7;

type KeyMapping = [u8; KEYS_PER_SIDE];

const IDENTITY: KeyMapping = [1, 2, 3, 4, 5, 6, 7];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "seed")]
pub enum LaneModifier {
    #[default]
    Identity,
    /// Key 1 swaps with key 7, 2 with 6, 3 with 5.
    Mirror,
    /// Seeded shuffle of keys 1-7, drawn independently for each side.
    Random(u64),
}

impl LaneModifier {
    fn mappings(self) -> (KeyMapping, KeyMapping) {
        match self {
            Self::Identity => (IDENTITY, IDENTITY),
            Self::Mirror => {
                let mut mirror = IDENTITY;
                mirror.reverse();
                (mirror, mirror)
            }
            Self::Random(seed) => {
                let mut rng = StdRng::seed_from_u64(seed);
                let mut p1 = IDENTITY;
                let mut p2 = IDENTITY;
                p1.shuffle(&mut rng);
                p2.shuffle(&mut rng);
                (p1, p2)
            }
        }
    }
}

impl CompiledChart {
    /// Copy of this chart with every key note moved through `modifier`.
    ///
    /// Note times are untouched, so time order is preserved.
    pub fn with_modifier(&self, modifier: LaneModifier) -> CompiledChart {
        let mut chart = self.clone();
        if modifier == LaneModifier::Identity {
            return chart;
        }
        let (p1, p2) = modifier.mappings();
        for note in &mut chart.notes {
            let ChannelRole::Key(key) = note.lane.role else {
                continue;
            };
            let mapping = match note.lane.side {
                Side::P1 => &p1,
                Side::P2 => &p2,
            };
            let Some(&moved) = mapping.get(usize::from(key).wrapping_sub(1)) else {
                continue;
            };
            note.lane = Lane::key(note.lane.side, moved);
            note.channel = note.lane.channel();
        }
        chart
    }
}
