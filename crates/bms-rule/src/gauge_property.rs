/// Gauge type definitions and the per-type element table.
///
/// Light gauges (ASSIST, EASY, GROOVE) start low, never fall under their
/// floor and clear at 80%. Survival gauges (HARD, EXHARD, HAZARD) start
/// full and fail for good at 0.
use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of gauge types.
pub const GAUGE_TYPE_COUNT: usize = 6;

/// Number of gauge update slots: PG, GR, GD, BD, PR, empty POOR.
pub const GAUGE_SLOT_COUNT: usize = 6;

/// Gauge types, ordered from least to most strict.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[repr(usize)]
pub enum GaugeType {
    Assist = 0,
    Easy = 1,
    #[default]
    Groove = 2,
    Hard = 3,
    ExHard = 4,
    Hazard = 5,
}

impl GaugeType {
    pub const ALL: [GaugeType; GAUGE_TYPE_COUNT] = [
        GaugeType::Assist,
        GaugeType::Easy,
        GaugeType::Groove,
        GaugeType::Hard,
        GaugeType::ExHard,
        GaugeType::Hazard,
    ];

    pub fn is_survival(self) -> bool {
        matches!(self, Self::Hard | Self::ExHard | Self::Hazard)
    }

    /// Next type up the ladder.
    pub fn stricter(self) -> Option<Self> {
        Self::ALL.get(self as usize + 1).copied()
    }

    /// Next type down the ladder.
    pub fn looser(self) -> Option<Self> {
        (self as usize).checked_sub(1).map(|i| Self::ALL[i])
    }
}

impl fmt::Display for GaugeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Assist => "ASSIST",
            Self::Easy => "EASY",
            Self::Groove => "GROOVE",
            Self::Hard => "HARD",
            Self::ExHard => "EXHARD",
            Self::Hazard => "HAZARD",
        })
    }
}

/// Recovery values marked with this are multiplied by the gauge tick
/// (`total / note_count`). Damage values are never scaled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GaugeModifier {
    Total,
}

impl GaugeModifier {
    pub fn modify(self, value: f64, total: f64, note_count: usize) -> f64 {
        match self {
            Self::Total => {
                if value > 0.0 && note_count > 0 {
                    value * total / note_count as f64
                } else if value > 0.0 {
                    0.0
                } else {
                    value
                }
            }
        }
    }
}

/// Damage reduction applied while the gauge is under `threshold`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GutsEntry {
    pub threshold: f64,
    pub multiplier: f64,
}

/// Which judgments drop the gauge straight to 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstantDeath {
    Never,
    /// Any BAD or POOR on a note.
    OnMiss,
    /// Any BAD or POOR, empty POOR included.
    OnMissOrEmptyPoor,
}

/// Rules for one gauge type.
#[derive(Debug, Clone, PartialEq)]
pub struct GaugeElementProperty {
    pub min: f64,
    pub max: f64,
    pub init: f64,
    /// Clear threshold; survival gauges clear by staying alive.
    pub border: f64,
    /// Base change per slot: PG, GR, GD, BD, PR, empty POOR.
    pub values: [f64; GAUGE_SLOT_COUNT],
    pub modifier: Option<GaugeModifier>,
    /// Checked in order; the first entry under its threshold applies.
    pub guts: Vec<GutsEntry>,
    pub instant_death: InstantDeath,
}

/// Element table for all six gauge types, indexed by `GaugeType`.
#[derive(Debug, Clone, PartialEq)]
pub struct GaugeProperty {
    pub elements: [GaugeElementProperty; GAUGE_TYPE_COUNT],
}

fn light(values: [f64; GAUGE_SLOT_COUNT]) -> GaugeElementProperty {
    GaugeElementProperty {
        min: 2.0,
        max: 100.0,
        init: 20.0,
        border: 80.0,
        values,
        modifier: Some(GaugeModifier::Total),
        guts: Vec::new(),
        instant_death: InstantDeath::Never,
    }
}

fn survival(values: [f64; GAUGE_SLOT_COUNT], guts: Vec<GutsEntry>) -> GaugeElementProperty {
    GaugeElementProperty {
        min: 0.0,
        max: 100.0,
        init: 100.0,
        border: 0.0,
        values,
        modifier: None,
        guts,
        instant_death: InstantDeath::Never,
    }
}

impl GaugeProperty {
    /// The standard seven-key gauge set.
    ///
    /// `hazard_empty_poor_kills` extends HAZARD's instant death to empty POOR.
    pub fn standard(hazard_empty_poor_kills: bool) -> Self {
        let guts = vec![GutsEntry {
            threshold: 30.0,
            multiplier: 0.5,
        }];
        let mut hazard = survival([0.16, 0.16, 0.16, -10.0, -18.0, -10.0], Vec::new());
        hazard.instant_death = if hazard_empty_poor_kills {
            InstantDeath::OnMissOrEmptyPoor
        } else {
            InstantDeath::OnMiss
        };

        Self {
            elements: [
                light([1.2, 1.2, 0.6, -1.2, -3.6, -1.2]),
                light([1.0, 1.0, 0.5, -1.6, -4.8, -1.6]),
                light([1.0, 1.0, 0.5, -2.0, -6.0, -2.0]),
                survival([0.16, 0.16, 0.16, -5.0, -9.0, -5.0], guts.clone()),
                survival([0.16, 0.16, 0.16, -10.0, -18.0, -10.0], guts),
                hazard,
            ],
        }
    }

    pub fn element(&self, gauge_type: GaugeType) -> &GaugeElementProperty {
        &self.elements[gauge_type as usize]
    }
}
