use serde::{Deserialize, Serialize};

use crate::gauge_property::GaugeType;
use crate::groove_gauge::GrooveGauge;
use crate::score_data::ScoreData;

/// Clear lamp of a finished play, lowest first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[repr(u8)]
pub enum ClearType {
    /// Nothing to judge (empty chart).
    #[default]
    NoPlay = 0,
    Failed = 1,
    AssistEasy = 2,
    Easy = 3,
    Normal = 4,
    Hard = 5,
    ExHard = 6,
    Hazard = 7,
    FullCombo = 8,
    Perfect = 9,
    Max = 10,
}

impl ClearType {
    pub fn id(self) -> u8 {
        self as u8
    }

    /// Lamp earned by clearing on `gauge_type`.
    pub fn from_gauge_type(gauge_type: GaugeType) -> Self {
        match gauge_type {
            GaugeType::Assist => Self::AssistEasy,
            GaugeType::Easy => Self::Easy,
            GaugeType::Groove => Self::Normal,
            GaugeType::Hard => Self::Hard,
            GaugeType::ExHard => Self::ExHard,
            GaugeType::Hazard => Self::Hazard,
        }
    }

    /// Lamp for a play over `note_count` notes.
    ///
    /// `candidates` are the gauges whose clear counts, strictest wins.
    pub fn classify(
        score: &ScoreData,
        note_count: usize,
        gauge: &GrooveGauge,
        candidates: &[GaugeType],
        failed: bool,
    ) -> Self {
        if failed {
            return Self::Failed;
        }
        if note_count == 0 {
            return Self::NoPlay;
        }

        let c = &score.counts;
        let n = note_count as u32;
        if c.pgreat == n {
            return Self::Max;
        }
        if c.pgreat + c.great == n {
            return Self::Perfect;
        }
        if c.pgreat + c.great + c.good == n {
            return Self::FullCombo;
        }

        candidates
            .iter()
            .copied()
            .filter(|&t| gauge.gauge(t).is_qualified())
            .max()
            .map_or(Self::Failed, Self::from_gauge_type)
    }
}
