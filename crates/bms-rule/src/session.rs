//! One attempt at a chart: clock-driven judging over a shared compiled chart.
//!
//! The session never reads the wall clock. Callers drive it with
//! [`Session::advance`] on every tick and [`Session::on_input`] for each key
//! press, both stamped in chart milliseconds.

use std::sync::Arc;

use bms_model::{BgaEvent, BgmEvent, BpmEvent, CompiledChart, Lane, LaneModifier};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::clear_type::ClearType;
use crate::cursor::TimedCursor;
use crate::error::ConfigError;
use crate::gas::{self, GasDecision};
use crate::gauge_property::{GaugeProperty, GaugeType};
use crate::grade::Grade;
use crate::groove_gauge::GrooveGauge;
use crate::judge::{JudgeWindows, Judgment};
use crate::play_config::PlayConfig;
use crate::result::SessionResult;
use crate::score_data::ScoreData;

/// Notes behind the note cursor still searched on input.
pub const LOOK_BACK: usize = 8;
/// Notes ahead of the note cursor searched per call.
pub const LOOK_AHEAD: usize = 150;
/// `advance` never looks at notes further than this past the clock.
pub const FUTURE_TOLERANCE_MS: f64 = 1000.0;

/// A judgment as reported to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgeEvent {
    /// Index into the chart's notes; `None` for an empty POOR.
    pub note_index: Option<usize>,
    pub lane: Lane,
    pub judgment: Judgment,
    /// Input time minus note time (negative = early).
    pub diff_ms: f64,
    /// Combo after this judgment.
    pub combo: u32,
    pub empty: bool,
}

/// Everything a session reports back, in the order it happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlayEvent {
    Judge(JudgeEvent),
    Bgm(BgmEvent),
    Bga(BgaEvent),
    BpmChange(BpmEvent),
    GaugeShift { from: GaugeType, to: GaugeType },
    Failed,
}

#[derive(Debug, Clone)]
pub struct Session {
    chart: Arc<CompiledChart>,
    config: PlayConfig,
    windows: JudgeWindows,
    clock_ms: f64,
    current_bpm: f64,
    note_cursor: usize,
    judged: Vec<bool>,
    bgm_cursor: TimedCursor<BgmEvent>,
    bpm_cursor: TimedCursor<BpmEvent>,
    bga_cursor: TimedCursor<BgaEvent>,
    score: ScoreData,
    gauge: GrooveGauge,
    failed: bool,
}

impl Session {
    /// Start an attempt. The config's lane modifier is applied to a private
    /// copy of the chart; the shared chart itself is never touched.
    pub fn new(chart: Arc<CompiledChart>, config: &PlayConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let chart = if config.lane_modifier == LaneModifier::Identity {
            chart
        } else {
            Arc::new(chart.with_modifier(config.lane_modifier))
        };
        let windows = config.windows_for_rank(chart.rank);
        Ok(Self::build(chart, config.clone(), windows))
    }

    fn build(chart: Arc<CompiledChart>, config: PlayConfig, windows: JudgeWindows) -> Self {
        let gauge = GrooveGauge::new(
            &GaugeProperty::standard(config.hazard_empty_poor_kills),
            config.gauge,
            chart.total,
            chart.note_count,
        );
        Self {
            judged: vec![false; chart.notes.len()],
            current_bpm: chart.initial_bpm,
            chart,
            config,
            windows,
            clock_ms: f64::NEG_INFINITY,
            note_cursor: 0,
            bgm_cursor: TimedCursor::new(),
            bpm_cursor: TimedCursor::new(),
            bga_cursor: TimedCursor::new(),
            score: ScoreData::default(),
            gauge,
            failed: false,
        }
    }

    /// Fresh attempt on the same chart and settings.
    pub fn restart(&self) -> Session {
        Self::build(Arc::clone(&self.chart), self.config.clone(), self.windows)
    }

    /// Move the clock to `now_ms`: fire due background events, then POOR
    /// every note whose BAD window has closed (or hit it, in autoplay).
    ///
    /// The clock never goes back; an earlier `now_ms` is treated as the
    /// current clock.
    pub fn advance(&mut self, now_ms: f64) -> Vec<PlayEvent> {
        let mut events = Vec::new();
        if self.failed {
            return events;
        }
        let now = self.clock_ms.max(now_ms);
        self.clock_ms = now;

        let chart = Arc::clone(&self.chart);
        for e in self.bgm_cursor.fire(&chart.bgm_events, now) {
            events.push(PlayEvent::Bgm(e.clone()));
        }
        for e in self.bpm_cursor.fire(&chart.bpm_events, now) {
            self.current_bpm = e.bpm;
            events.push(PlayEvent::BpmChange(e.clone()));
        }
        for e in self.bga_cursor.fire(&chart.bga_events, now) {
            events.push(PlayEvent::Bga(e.clone()));
        }

        // Misses are measured on the same offset-corrected clock as inputs.
        let judge_now = now - self.config.input_offset_ms;
        let end = (self.note_cursor + LOOK_AHEAD).min(chart.notes.len());
        for index in self.note_cursor..end {
            let note = &chart.notes[index];
            if note.time_ms > now + FUTURE_TOLERANCE_MS {
                break;
            }
            if self.judged[index] {
                continue;
            }
            if self.config.autoplay {
                if note.time_ms <= now {
                    self.judge_note(index, note.lane, Judgment::PGreat, 0.0, &mut events);
                }
            } else if judge_now - note.time_ms > self.windows.bad {
                let diff = judge_now - note.time_ms;
                self.judge_note(index, note.lane, Judgment::Poor, diff, &mut events);
            }
            if self.failed {
                break;
            }
        }
        self.skip_judged();

        events
    }

    /// Judge a key press on `lane` at `now_ms`.
    ///
    /// Hits the nearest unjudged note on the lane within BAD. Otherwise a
    /// note just outside BAD but inside POOR ahead of the press costs an
    /// empty POOR. Ignored in autoplay.
    pub fn on_input(&mut self, lane: Lane, now_ms: f64) -> Vec<PlayEvent> {
        let mut events = Vec::new();
        if self.failed || self.config.autoplay {
            return events;
        }
        let t = now_ms - self.config.input_offset_ms;

        let chart = Arc::clone(&self.chart);
        let start = self.note_cursor.saturating_sub(LOOK_BACK);
        let end = (self.note_cursor + LOOK_AHEAD).min(chart.notes.len());

        let mut best: Option<(usize, f64)> = None;
        let mut empty_poor: Option<f64> = None;
        for index in start..end {
            let note = &chart.notes[index];
            if self.judged[index] || note.lane != lane {
                continue;
            }
            let diff = t - note.time_ms;
            if diff.abs() <= self.windows.bad {
                if best.is_none_or(|(_, d)| diff.abs() < d.abs()) {
                    best = Some((index, diff));
                }
            } else if -diff > self.windows.bad
                && -diff <= self.windows.poor
                && empty_poor.is_none()
            {
                empty_poor = Some(diff);
            }
        }

        if let Some((index, diff)) = best {
            let judgment = self.windows.classify(diff).unwrap_or(Judgment::Bad);
            self.judge_note(index, lane, judgment, diff, &mut events);
            self.skip_judged();
        } else if let Some(diff) = empty_poor {
            self.apply(None, lane, Judgment::Poor, diff, true, &mut events);
        }

        events
    }

    fn judge_note(
        &mut self,
        index: usize,
        lane: Lane,
        judgment: Judgment,
        diff_ms: f64,
        events: &mut Vec<PlayEvent>,
    ) {
        self.judged[index] = true;
        self.apply(Some(index), lane, judgment, diff_ms, false, events);
    }

    fn apply(
        &mut self,
        note_index: Option<usize>,
        lane: Lane,
        judgment: Judgment,
        diff_ms: f64,
        empty: bool,
        events: &mut Vec<PlayEvent>,
    ) {
        self.score.record(judgment, diff_ms, empty);
        self.gauge.update(judgment, empty);
        events.push(PlayEvent::Judge(JudgeEvent {
            note_index,
            lane,
            judgment,
            diff_ms,
            combo: self.score.combo,
            empty,
        }));
        self.check_gauge(events);
    }

    fn check_gauge(&mut self, events: &mut Vec<PlayEvent>) {
        let active = self.gauge.active_type();
        if !self.config.gas {
            if active.is_survival() && self.gauge.active_gauge().is_dead() {
                self.fail(events);
            }
            return;
        }

        match gas::decide(&self.gauge, self.gauge.original_type(), self.config.gas_floor) {
            GasDecision::Stay => {}
            GasDecision::Shift(to) => {
                debug!("GAS: {active} -> {to} at {:.0} ms", self.clock_ms);
                self.gauge.set_active_type(to);
                events.push(PlayEvent::GaugeShift { from: active, to });
            }
            GasDecision::Fail => self.fail(events),
        }
    }

    fn fail(&mut self, events: &mut Vec<PlayEvent>) {
        info!(
            "{} gauge failed at {:.0} ms ({} of {} notes judged)",
            self.gauge.active_type(),
            self.clock_ms,
            self.score.counts.total(),
            self.chart.note_count
        );
        self.failed = true;
        events.push(PlayEvent::Failed);
    }

    fn skip_judged(&mut self) {
        while self.note_cursor < self.judged.len() && self.judged[self.note_cursor] {
            self.note_cursor += 1;
        }
    }

    /// Lamp, grade and tallies as of now.
    pub fn result(&self) -> SessionResult {
        let candidates: Vec<GaugeType> = if self.config.gas {
            let start = self.gauge.original_type();
            GaugeType::ALL
                .into_iter()
                .filter(|&t| t >= self.config.gas_floor && t <= start)
                .collect()
        } else {
            vec![self.gauge.active_type()]
        };
        let lamp = ClearType::classify(
            &self.score,
            self.chart.note_count,
            &self.gauge,
            &candidates,
            self.failed,
        );
        let ex_score = self.score.exscore();
        let max_ex_score = self.chart.max_ex_score();

        SessionResult {
            lamp,
            grade: Grade::from_score(ex_score, max_ex_score),
            ex_score,
            max_ex_score,
            counts: self.score.counts,
            fast: self.score.fast,
            slow: self.score.slow,
            max_combo: self.score.max_combo,
            combo_break: self.score.combo_break,
            empty_poor: self.score.empty_poor,
            active_gauge: self.gauge.active_type(),
            final_gauges: self.gauge.values().into_iter().collect(),
            failed: self.failed,
        }
    }

    pub fn chart(&self) -> &Arc<CompiledChart> {
        &self.chart
    }

    pub fn config(&self) -> &PlayConfig {
        &self.config
    }

    pub fn windows(&self) -> &JudgeWindows {
        &self.windows
    }

    /// Latest clock passed to `advance`; negative infinity before the first call.
    pub fn clock_ms(&self) -> f64 {
        self.clock_ms
    }

    pub fn current_bpm(&self) -> f64 {
        self.current_bpm
    }

    pub fn score(&self) -> &ScoreData {
        &self.score
    }

    pub fn gauge(&self) -> &GrooveGauge {
        &self.gauge
    }

    pub fn active_gauge(&self) -> GaugeType {
        self.gauge.active_type()
    }

    pub fn note_cursor(&self) -> usize {
        self.note_cursor
    }

    pub fn is_judged(&self, note_index: usize) -> bool {
        self.judged.get(note_index).copied().unwrap_or(false)
    }

    pub fn is_failed(&self) -> bool {
        self.failed
    }

    /// Every note judged, or the play failed.
    pub fn is_finished(&self) -> bool {
        self.failed || self.note_cursor >= self.judged.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bms_model::{Side, compile};

    fn k1() -> Lane {
        Lane::key(Side::P1, 1)
    }

    fn session(text: &str, config: PlayConfig) -> Session {
        let chart = Arc::new(compile(text).unwrap());
        Session::new(chart, &config).unwrap()
    }

    fn judgments(events: &[PlayEvent]) -> Vec<Judgment> {
        events
            .iter()
            .filter_map(|e| match e {
                PlayEvent::Judge(j) => Some(j.judgment),
                _ => None,
            })
            .collect()
    }

    // 120 BPM, K1 notes at 0, 500, 1000, 1500 ms; RANK 1 windows 15/32/60/100/150
    const FOUR: &str = "#BPM 120\n#RANK 1\n#00011:01010101";

    #[test]
    fn hit_marks_note_and_moves_cursor() {
        let mut s = session(FOUR, PlayConfig::default());
        s.advance(0.0);
        let events = s.on_input(k1(), 5.0);
        assert_eq!(judgments(&events), vec![Judgment::PGreat]);
        assert!(s.is_judged(0));
        assert_eq!(s.note_cursor(), 1);
        assert_eq!(s.score().combo, 1);
    }

    #[test]
    fn wrong_lane_does_nothing() {
        let mut s = session(FOUR, PlayConfig::default());
        let events = s.on_input(Lane::key(Side::P1, 2), 0.0);
        assert!(events.is_empty());
        assert_eq!(s.score().counts.total(), 0);
    }

    #[test]
    fn nearest_note_wins() {
        // notes 500 ms apart, press at 480 is 20 early for note 1
        let mut s = session(FOUR, PlayConfig::default());
        s.advance(0.0);
        s.on_input(k1(), 0.0);
        let events = s.on_input(k1(), 480.0);
        match &events[0] {
            PlayEvent::Judge(j) => {
                assert_eq!(j.note_index, Some(1));
                assert_eq!(j.judgment, Judgment::Great);
                assert!((j.diff_ms + 20.0).abs() < 1e-9);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(s.score().fast, 1);
    }

    #[test]
    fn missed_notes_become_poor_after_bad() {
        let mut s = session(FOUR, PlayConfig::default());
        assert!(judgments(&s.advance(100.0)).is_empty());
        assert_eq!(judgments(&s.advance(101.0)), vec![Judgment::Poor]);
        assert_eq!(judgments(&s.advance(2000.0)), vec![Judgment::Poor; 3]);
        assert!(s.is_finished());
    }

    #[test]
    fn early_press_in_poor_zone_is_empty_poor() {
        let mut s = session(FOUR, PlayConfig::default());
        s.advance(0.0);
        s.on_input(k1(), 0.0);
        // note 1 at 500: 130 ms early is past BAD (100) inside POOR (150)
        let events = s.on_input(k1(), 370.0);
        match &events[..] {
            [PlayEvent::Judge(j)] => {
                assert!(j.empty);
                assert_eq!(j.note_index, None);
                assert_eq!(j.judgment, Judgment::Poor);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(s.score().empty_poor, 1);
        assert_eq!(s.score().combo, 1);
        assert!(!s.is_judged(1));
        // further away than POOR: nothing
        assert!(s.on_input(k1(), 300.0).is_empty());
    }

    #[test]
    fn input_offset_is_subtracted() {
        let config = PlayConfig {
            input_offset_ms: 40.0,
            ..Default::default()
        };
        let mut s = session(FOUR, config);
        let events = s.on_input(k1(), 40.0);
        assert_eq!(judgments(&events), vec![Judgment::PGreat]);
    }

    #[test]
    fn input_offset_delays_miss_detection() {
        let mut s = session("#BPM 120\n#RANK 1\n#00011:01", config_with_offset(40.0));
        // Corrected clock is 90 ms past the note, still inside BAD
        assert!(judgments(&s.advance(130.0)).is_empty());
        assert_eq!(judgments(&s.on_input(k1(), 130.0)), vec![Judgment::Bad]);

        let mut s = session("#BPM 120\n#RANK 1\n#00011:01", config_with_offset(40.0));
        assert!(judgments(&s.advance(140.0)).is_empty());
        assert_eq!(judgments(&s.advance(141.0)), vec![Judgment::Poor]);
    }

    fn config_with_offset(input_offset_ms: f64) -> PlayConfig {
        PlayConfig {
            input_offset_ms,
            ..Default::default()
        }
    }

    #[test]
    fn autoplay_hits_everything_on_time() {
        let config = PlayConfig {
            autoplay: true,
            ..Default::default()
        };
        let mut s = session(FOUR, config);
        assert_eq!(judgments(&s.advance(0.0)), vec![Judgment::PGreat]);
        assert!(s.on_input(k1(), 500.0).is_empty());
        assert_eq!(judgments(&s.advance(1500.0)), vec![Judgment::PGreat; 3]);
        let result = s.result();
        assert_eq!(result.lamp, ClearType::Max);
        assert_eq!(result.ex_score, 8);
        assert_eq!(result.grade, Grade::AAA);
    }

    #[test]
    fn background_events_fire_once_in_order() {
        let text = "#BPM 120\n#BPM01 240\n#00001:0101\n#00008:0001\n#00004:01";
        let mut s = session(text, PlayConfig::default());
        let events = s.advance(0.0);
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], PlayEvent::Bgm(_)));
        assert!(matches!(events[1], PlayEvent::Bga(_)));
        let events = s.advance(1000.0);
        assert_eq!(events.len(), 2);
        assert_eq!(s.current_bpm(), 240.0);
        assert!(s.advance(5000.0).is_empty());
    }

    #[test]
    fn clock_never_goes_back() {
        let mut s = session(FOUR, PlayConfig::default());
        s.advance(300.0);
        s.advance(100.0);
        assert_eq!(s.clock_ms(), 300.0);
    }

    #[test]
    fn survival_death_without_gas_fails_and_freezes() {
        let config = PlayConfig {
            gauge: GaugeType::Hazard,
            ..Default::default()
        };
        let mut s = session(FOUR, config);
        let events = s.advance(200.0);
        assert_eq!(events.last(), Some(&PlayEvent::Failed));
        assert!(s.is_failed());
        assert!(s.advance(5000.0).is_empty());
        assert!(s.on_input(k1(), 500.0).is_empty());
        assert_eq!(s.result().lamp, ClearType::Failed);
        assert_eq!(s.score().counts.poor, 1);
    }

    #[test]
    fn gas_shift_is_reported() {
        let config = PlayConfig {
            gauge: GaugeType::Hazard,
            gas: true,
            ..Default::default()
        };
        let mut s = session(FOUR, config);
        let events = s.advance(200.0);
        assert!(events.contains(&PlayEvent::GaugeShift {
            from: GaugeType::Hazard,
            to: GaugeType::ExHard,
        }));
        assert_eq!(s.active_gauge(), GaugeType::ExHard);
        assert!(!s.is_failed());
    }

    #[test]
    fn restart_is_fresh() {
        let mut s = session(FOUR, PlayConfig::default());
        s.advance(3000.0);
        let fresh = s.restart();
        assert_eq!(fresh.score(), &ScoreData::default());
        assert_eq!(fresh.note_cursor(), 0);
        assert!(Arc::ptr_eq(fresh.chart(), s.chart()));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let chart = Arc::new(compile(FOUR).unwrap());
        let config = PlayConfig {
            input_offset_ms: f64::NAN,
            ..Default::default()
        };
        assert!(Session::new(chart, &config).is_err());
    }

    #[test]
    fn rank_selects_windows() {
        let s = session("#RANK 0\n#00011:01", PlayConfig::default());
        assert_eq!(*s.windows(), JudgeWindows::for_rank(0));
    }
}
