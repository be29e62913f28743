use serde::{Deserialize, Serialize};

use crate::channel::Lane;
use crate::note::{BgaEvent, BgmEvent, BpmEvent, Note, StopEvent};

/// Judge difficulty index when `#RANK` is absent (NORMAL).
pub const DEFAULT_RANK: u8 = 2;
/// Highest supported `#RANK` (EASY).
pub const MAX_RANK: u8 = 3;

/// Absolute-time chart produced by [`crate::compile`].
///
/// Immutable once built. Share it behind an `Arc` between sessions and
/// clone it when a working copy must differ (see [`crate::LaneModifier`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompiledChart {
    // Metadata
    pub title: String,
    pub subtitle: String,
    pub artist: String,
    pub genre: String,
    pub play_level: u32,

    // Timeline, each ascending by time
    pub notes: Vec<Note>,
    pub bgm_events: Vec<BgmEvent>,
    pub bga_events: Vec<BgaEvent>,
    pub bpm_events: Vec<BpmEvent>,
    pub stop_events: Vec<StopEvent>,

    // Tempo
    pub initial_bpm: f64,
    pub min_bpm: f64,
    pub max_bpm: f64,
    /// Tempo held for the longest total time
    pub main_bpm: f64,
    /// `(max_bpm + min_bpm) / 2`
    pub avg_fix_bpm: f64,

    // Rules
    /// Judge difficulty index, 0 (VERY HARD) to 3 (EASY)
    pub rank: u8,
    /// Gauge tick scale (`#TOTAL`)
    pub total: f64,

    // Stats
    pub note_count: usize,
    /// End of the last measure
    pub song_duration_ms: f64,
    pub start_nps: f64,
    pub avg_nps: f64,
    pub max_nps: f64,

    // Hashes of the source text (empty when compiled from a RawChart)
    pub md5: String,
    pub sha256: String,
}

impl Default for CompiledChart {
    fn default() -> Self {
        Self {
            title: String::new(),
            subtitle: String::new(),
            artist: String::new(),
            genre: String::new(),
            play_level: 0,
            notes: Vec::new(),
            bgm_events: Vec::new(),
            bga_events: Vec::new(),
            bpm_events: Vec::new(),
            stop_events: Vec::new(),
            initial_bpm: crate::DEFAULT_BPM,
            min_bpm: crate::DEFAULT_BPM,
            max_bpm: crate::DEFAULT_BPM,
            main_bpm: crate::DEFAULT_BPM,
            avg_fix_bpm: crate::DEFAULT_BPM,
            rank: DEFAULT_RANK,
            total: default_total(0),
            note_count: 0,
            song_duration_ms: 0.0,
            start_nps: 0.0,
            avg_nps: 0.0,
            max_nps: 0.0,
            md5: String::new(),
            sha256: String::new(),
        }
    }
}

impl CompiledChart {
    /// Notes on one lane, in time order.
    pub fn lane_notes(&self, lane: Lane) -> impl Iterator<Item = &Note> + '_ {
        self.notes.iter().filter(move |n| n.lane == lane)
    }

    /// Lanes that carry at least one note, sorted.
    pub fn used_lanes(&self) -> Vec<Lane> {
        let mut lanes: Vec<Lane> = self.notes.iter().map(|n| n.lane).collect();
        lanes.sort();
        lanes.dedup();
        lanes
    }

    /// Time of the last playable note, or 0 for an empty chart.
    pub fn last_note_time_ms(&self) -> f64 {
        self.notes.last().map_or(0.0, |n| n.time_ms)
    }

    /// Highest attainable EX score (PGREAT on every note).
    pub fn max_ex_score(&self) -> u32 {
        self.note_count as u32 * 2
    }
}

/// TOTAL used when the chart does not declare a usable one.
///
/// `160 + (n + clamp(n - 400, 0, 200)) * 0.16`
pub fn default_total(note_count: usize) -> f64 {
    let n = note_count as f64;
    160.0 + (n + (n - 400.0).clamp(0.0, 200.0)) * 0.16
}
