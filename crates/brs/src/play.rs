//! Replaying a recorded input log through a [`Session`].

use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use bms_model::{CompiledChart, Lane};
use bms_rule::{Judgment, PlayConfig, PlayEvent, Session, SessionResult};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

/// One key press, stamped in chart milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InputRecord {
    pub time_ms: f64,
    pub lane: Lane,
}

/// Session result plus derived figures, as printed by `brs play`.
#[derive(Debug, Clone, Serialize)]
pub struct PlayReport {
    #[serde(flatten)]
    pub result: SessionResult,
    /// EX score percentage.
    pub rate: f64,
    pub miss_count: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<PlayEvent>,
}

pub fn load_inputs(path: &Path) -> Result<Vec<InputRecord>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading input log {}", path.display()))?;
    let inputs: Vec<InputRecord> = serde_json::from_str(&text)
        .with_context(|| format!("parsing input log {}", path.display()))?;
    Ok(inputs)
}

/// Drive a fresh session through `inputs` in time order, then run the clock
/// past the end of the chart.
pub fn replay(
    chart: CompiledChart,
    config: &PlayConfig,
    mut inputs: Vec<InputRecord>,
) -> Result<PlayReport> {
    let mut session = Session::new(Arc::new(chart), config).context("starting session")?;

    let before = inputs.len();
    inputs.retain(|input| input.time_ms.is_finite());
    if inputs.len() != before {
        warn!("Dropped {} inputs with non-finite times", before - inputs.len());
    }
    inputs.sort_by(|a, b| a.time_ms.total_cmp(&b.time_ms));

    let mut events = Vec::new();
    for input in &inputs {
        events.extend(session.advance(input.time_ms));
        events.extend(session.on_input(input.lane, input.time_ms));
        if session.is_failed() {
            debug!("Session failed at {:.0} ms", input.time_ms);
            break;
        }
    }
    // Step the clock just past each remaining note's BAD window so trailing
    // misses report the same diff a live session would.
    let late = session.windows().bad + 1.0;
    while !session.is_finished() {
        let cursor = session.note_cursor();
        let Some(note) = session.chart().notes.get(cursor) else {
            break;
        };
        let miss_at = note.time_ms + config.input_offset_ms + late;
        events.extend(session.advance(miss_at));
        if session.note_cursor() == cursor && !session.is_finished() {
            break;
        }
    }
    let end = session.chart().song_duration_ms;
    events.extend(session.advance(end));

    let result = session.result();
    let tally: Vec<String> = Judgment::ALL
        .iter()
        .map(|&j| format!("{j} {}", result.counts.get(j)))
        .collect();
    info!(
        "EX {}/{} ({:.2}%), {}",
        result.ex_score,
        result.max_ex_score,
        result.rate(),
        tally.join(", ")
    );
    if session.gauge().is_type_changed() {
        info!("Gauge shifted {} -> {}", session.gauge().original_type(), result.active_gauge);
    }

    Ok(PlayReport {
        rate: result.rate(),
        miss_count: result.miss_count(),
        result,
        events,
    })
}
