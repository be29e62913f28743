use bms_model::{CompiledChart, Lane};
use serde::Serialize;

/// Headline facts about a compiled chart, without the timeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSummary {
    pub title: String,
    pub subtitle: String,
    pub artist: String,
    pub genre: String,
    pub play_level: u32,
    pub note_count: usize,
    pub initial_bpm: f64,
    pub min_bpm: f64,
    pub max_bpm: f64,
    pub main_bpm: f64,
    pub rank: u8,
    pub total: f64,
    pub song_duration_ms: f64,
    pub start_nps: f64,
    pub avg_nps: f64,
    pub max_nps: f64,
    pub max_ex_score: u32,
    pub lanes: Vec<LaneSummary>,
    pub md5: String,
    pub sha256: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaneSummary {
    pub lane: Lane,
    pub notes: usize,
}

impl From<&CompiledChart> for ChartSummary {
    fn from(chart: &CompiledChart) -> Self {
        Self {
            title: chart.title.clone(),
            subtitle: chart.subtitle.clone(),
            artist: chart.artist.clone(),
            genre: chart.genre.clone(),
            play_level: chart.play_level,
            note_count: chart.note_count,
            initial_bpm: chart.initial_bpm,
            min_bpm: chart.min_bpm,
            max_bpm: chart.max_bpm,
            main_bpm: chart.main_bpm,
            rank: chart.rank,
            total: chart.total,
            song_duration_ms: chart.song_duration_ms,
            start_nps: chart.start_nps,
            avg_nps: chart.avg_nps,
            max_nps: chart.max_nps,
            max_ex_score: chart.max_ex_score(),
            lanes: chart
                .used_lanes()
                .into_iter()
                .map(|lane| LaneSummary {
                    lane,
                    notes: chart.lane_notes(lane).count(),
                })
                .collect(),
            md5: chart.md5.clone(),
            sha256: chart.sha256.clone(),
        }
    }
}
