//! Measure walk: raw channel data to absolute milliseconds.

use log::{debug, warn};
use md5::Md5;
use sha2::{Digest, Sha256};

use crate::channel::ChannelKind;
use crate::error::ParseError;
use crate::model::{CompiledChart, DEFAULT_RANK, MAX_RANK, default_total};
use crate::note::{BgaEvent, BgmEvent, BpmEvent, Note, SampleId, StopEvent};
use crate::raw::{ChannelLine, RawChart, parse_finite};
use crate::stats;

/// Tempo used when `#BPM` is missing or unparsable.
pub const DEFAULT_BPM: f64 = 130.0;
/// Tempo floor applied before any division.
pub const BPM_EPSILON: f64 = 1e-3;
/// Stop lengths are counted in 1/192 of a 4/4 measure.
const STOP_TICKS_PER_MEASURE: f64 = 192.0;

/// Compile chart text into an absolute-time chart.
pub fn compile(text: &str) -> Result<CompiledChart, ParseError> {
    let raw = RawChart::parse(text)?;
    let mut chart = compile_raw(&raw);
    chart.md5 = format!("{:x}", Md5::digest(text.as_bytes()));
    chart.sha256 = format!("{:x}", Sha256::digest(text.as_bytes()));
    Ok(chart)
}

/// Milliseconds covered by `fraction` of a measure.
fn measure_span_ms(fraction: f64, scale: f64, bpm: f64) -> f64 {
    fraction * 4.0 * scale * (60_000.0 / bpm.max(BPM_EPSILON))
}

fn stop_span_ms(ticks: f64, bpm: f64) -> f64 {
    (ticks.max(0.0) / STOP_TICKS_PER_MEASURE) * 4.0 * (60_000.0 / bpm.max(BPM_EPSILON))
}

/// A non-empty cell inside one measure.
#[derive(Debug, Clone, Copy)]
struct CellEvent {
    pos: f64,
    kind: ChannelKind,
    channel: u16,
    value: u16,
}

/// Compile an already split chart. Never fails: bad values fall back to defaults.
pub fn compile_raw(raw: &RawChart) -> CompiledChart {
    let mut chart = CompiledChart {
        title: raw.header("TITLE").unwrap_or_default().to_string(),
        subtitle: raw.header("SUBTITLE").unwrap_or_default().to_string(),
        artist: raw.header("ARTIST").unwrap_or_default().to_string(),
        genre: raw.header("GENRE").unwrap_or_default().to_string(),
        play_level: raw
            .header("PLAYLEVEL")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0),
        initial_bpm: initial_bpm(raw),
        rank: rank(raw),
        ..Default::default()
    };

    let mut clock = 0.0_f64;
    let mut bpm = chart.initial_bpm;

    if let Some(max_measure) = raw.max_measure() {
        for measure in 0..=max_measure {
            let lines = raw.measures.get(&measure).map(Vec::as_slice).unwrap_or_default();
            let scale = measure_scale(lines, measure);
            let events = measure_events(lines);

            let mut last_pos = 0.0;
            for ev in &events {
                clock += measure_span_ms(ev.pos - last_pos, scale, bpm);
                last_pos = ev.pos;

                match ev.kind {
                    ChannelKind::Note(lane) => chart.notes.push(Note {
                        time_ms: clock,
                        channel: ev.channel,
                        lane,
                        sample: SampleId(ev.value),
                    }),
                    ChannelKind::Bgm => chart.bgm_events.push(BgmEvent {
                        time_ms: clock,
                        sample: SampleId(ev.value),
                    }),
                    ChannelKind::Bga(layer) => chart.bga_events.push(BgaEvent {
                        time_ms: clock,
                        layer,
                        image: SampleId(ev.value),
                    }),
                    ChannelKind::BpmLiteral => {
                        bpm = f64::from(ev.value);
                        chart.bpm_events.push(BpmEvent { time_ms: clock, bpm });
                    }
                    ChannelKind::BpmTable => match raw.bpm_table.get(&ev.value) {
                        Some(&value) => {
                            bpm = value;
                            chart.bpm_events.push(BpmEvent { time_ms: clock, bpm });
                        }
                        None => {
                            warn!("measure {measure}: #BPM{} is not defined", SampleId(ev.value))
                        }
                    },
                    ChannelKind::Stop => match raw.stop_table.get(&ev.value) {
                        Some(&ticks) => {
                            let duration_ms = stop_span_ms(ticks, bpm);
                            chart.stop_events.push(StopEvent {
                                time_ms: clock,
                                duration_ms,
                            });
                            clock += duration_ms;
                        }
                        None => {
                            warn!("measure {measure}: #STOP{} is not defined", SampleId(ev.value))
                        }
                    },
                    ChannelKind::MeasureScale | ChannelKind::Ignored => {}
                }
            }
            clock += measure_span_ms(1.0 - last_pos, scale, bpm);
        }
    }

    chart.note_count = chart.notes.len();
    chart.song_duration_ms = clock;
    chart.total = total(raw, chart.note_count);
    fill_bpm_stats(&mut chart);

    let times: Vec<f64> = chart.notes.iter().map(|n| n.time_ms).collect();
    let density = stats::density(&times, chart.song_duration_ms);
    chart.start_nps = density.start_nps;
    chart.avg_nps = density.avg_nps;
    chart.max_nps = density.max_nps;

    chart
}

fn initial_bpm(raw: &RawChart) -> f64 {
    match raw.header("BPM") {
        Some(value) => parse_finite(value).unwrap_or_else(|| {
            warn!("unparsable #BPM {value:?}, using {DEFAULT_BPM}");
            DEFAULT_BPM
        }),
        None => DEFAULT_BPM,
    }
}

fn rank(raw: &RawChart) -> u8 {
    raw.header("RANK")
        .and_then(|v| v.trim().parse::<i64>().ok())
        .map_or(DEFAULT_RANK, |r| r.clamp(0, i64::from(MAX_RANK)) as u8)
}

fn total(raw: &RawChart, note_count: usize) -> f64 {
    raw.header("TOTAL")
        .and_then(parse_finite)
        .filter(|t| *t > 0.0)
        .unwrap_or_else(|| default_total(note_count))
}

fn fill_bpm_stats(chart: &mut CompiledChart) {
    let tempos = || {
        std::iter::once(chart.initial_bpm).chain(chart.bpm_events.iter().map(|e| e.bpm))
    };
    let min = tempos().fold(f64::INFINITY, f64::min);
    let max = tempos().fold(f64::NEG_INFINITY, f64::max);
    let main = stats::main_bpm(chart.initial_bpm, &chart.bpm_events, chart.song_duration_ms);
    chart.min_bpm = min;
    chart.max_bpm = max;
    chart.avg_fix_bpm = (max + min) / 2.0;
    chart.main_bpm = main;
}

/// Channel 02 of the measure, last line wins. 1.0 when absent or invalid.
fn measure_scale(lines: &[ChannelLine], measure: u32) -> f64 {
    let Some(line) = lines
        .iter()
        .rev()
        .find(|l| ChannelKind::of(l.channel) == ChannelKind::MeasureScale)
    else {
        return 1.0;
    };
    match parse_finite(&line.data) {
        Some(scale) if scale > 0.0 => scale,
        _ => {
            warn!("measure {measure}: invalid length {:?}, using 1.0", line.data);
            1.0
        }
    }
}

/// All non-empty cells of a measure, ordered by position.
///
/// Equal positions: tempo first, stops last, then ascending channel code,
/// then line and cell order.
fn measure_events(lines: &[ChannelLine]) -> Vec<CellEvent> {
    let mut ordered: Vec<&ChannelLine> = lines.iter().collect();
    ordered.sort_by_key(|l| l.channel);

    let mut events = Vec::new();
    for line in ordered {
        let kind = ChannelKind::of(line.channel);
        if matches!(kind, ChannelKind::MeasureScale | ChannelKind::Ignored) {
            continue;
        }
        let data = line.data.as_bytes();
        let count = data.len() / 2;
        for (i, pair) in data.chunks_exact(2).enumerate() {
            let cell = std::str::from_utf8(pair).unwrap_or_default();
            let value = if kind == ChannelKind::BpmLiteral {
                u16::from_str_radix(cell, 16).ok()
            } else {
                SampleId::from_cell(cell).map(|s| s.0)
            };
            match value {
                Some(0) => {}
                Some(value) => events.push(CellEvent {
                    pos: i as f64 / count as f64,
                    kind,
                    channel: line.channel,
                    value,
                }),
                None => debug!("line {}: skipping malformed cell {cell:?}", line.line),
            }
        }
    }

    events.sort_by(|a, b| {
        a.pos
            .total_cmp(&b.pos)
            .then(a.kind.tie_class().cmp(&b.kind.tie_class()))
    });
    events
}
