//! Post-pass song statistics: note density and dominant tempo.

use crate::note::BpmEvent;

/// Window used for the opening density.
const START_WINDOW_MS: f64 = 10_000.0;
/// Window used for the peak density.
const PEAK_WINDOW_MS: f64 = 1_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub(crate) struct Density {
    pub start_nps: f64,
    pub avg_nps: f64,
    pub max_nps: f64,
}

/// `times` must be sorted ascending.
pub(crate) fn density(times: &[f64], song_duration_ms: f64) -> Density {
    let Some(&first) = times.first() else {
        return Density::default();
    };

    let opening = times.partition_point(|&t| t < first + START_WINDOW_MS);
    let start_nps = opening as f64 / (START_WINDOW_MS / 1000.0);

    let avg_nps = if song_duration_ms > 0.0 {
        times.len() as f64 / (song_duration_ms / 1000.0)
    } else {
        0.0
    };

    let mut peak = 0;
    let mut end = 0;
    for (start, &t) in times.iter().enumerate() {
        while end < times.len() && times[end] < t + PEAK_WINDOW_MS {
            end += 1;
        }
        peak = peak.max(end - start);
    }

    Density {
        start_nps,
        avg_nps,
        max_nps: peak as f64 / (PEAK_WINDOW_MS / 1000.0),
    }
}

/// Tempo with the greatest total on-screen duration; the first one seen wins ties.
pub(crate) fn main_bpm(initial_bpm: f64, bpm_events: &[BpmEvent], song_duration_ms: f64) -> f64 {
    let mut totals: Vec<(f64, f64)> = Vec::new();
    let starts =
        std::iter::once((0.0, initial_bpm)).chain(bpm_events.iter().map(|e| (e.time_ms, e.bpm)));
    let ends = bpm_events
        .iter()
        .map(|e| e.time_ms)
        .chain(std::iter::once(song_duration_ms));

    for ((start, bpm), end) in starts.zip(ends) {
        let length = (end - start).max(0.0);
        match totals.iter_mut().find(|(b, _)| *b == bpm) {
            Some((_, total)) => *total += length,
            None => totals.push((bpm, length)),
        }
    }

    let mut best = (initial_bpm, f64::NEG_INFINITY);
    for &(bpm, total) in &totals {
        if total > best.1 {
            best = (bpm, total);
        }
    }
    best.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bpm(time_ms: f64, bpm: f64) -> BpmEvent {
        BpmEvent { time_ms, bpm }
    }

    #[test]
    fn density_of_empty_chart() {
        assert_eq!(density(&[], 10_000.0), Density::default());
    }

    #[test]
    fn start_nps_counts_first_ten_seconds() {
        // 20 notes in the first 10 s after the first note, one more at 10 s exactly
        let mut times: Vec<f64> = (0..20).map(|i| 500.0 + i as f64 * 400.0).collect();
        times.push(10_500.0);
        let d = density(&times, 20_000.0);
        assert!((d.start_nps - 2.0).abs() < 1e-9);
    }

    #[test]
    fn avg_nps_uses_song_duration() {
        let times = vec![0.0, 1000.0, 2000.0, 3000.0];
        let d = density(&times, 8000.0);
        assert!((d.avg_nps - 0.5).abs() < 1e-9);
    }

    #[test]
    fn max_nps_half_open_window() {
        // 0, 250, 500, 750 are inside [0, 1000); 1000 is not
        let times = vec![0.0, 250.0, 500.0, 750.0, 1000.0, 5000.0];
        let d = density(&times, 6000.0);
        assert!((d.max_nps - 4.0).abs() < 1e-9);
    }

    #[test]
    fn max_nps_counts_chords() {
        let times = vec![100.0, 100.0, 100.0, 2000.0];
        assert!((density(&times, 3000.0).max_nps - 3.0).abs() < 1e-9);
    }

    #[test]
    fn main_bpm_without_changes_is_initial() {
        assert_eq!(main_bpm(150.0, &[], 60_000.0), 150.0);
    }

    #[test]
    fn main_bpm_longest_segment() {
        // 150 for 10 s, 200 for 40 s, 150 again for 10 s
        let events = [bpm(10_000.0, 200.0), bpm(50_000.0, 150.0)];
        assert_eq!(main_bpm(150.0, &events, 60_000.0), 200.0);
    }

    #[test]
    fn main_bpm_accumulates_revisited_tempo() {
        // 150: 20 + 20 = 40 s, 200: 30 s
        let events = [bpm(20_000.0, 200.0), bpm(50_000.0, 150.0)];
        assert_eq!(main_bpm(150.0, &events, 70_000.0), 150.0);
    }

    #[test]
    fn main_bpm_tie_keeps_first() {
        let events = [bpm(10_000.0, 180.0)];
        assert_eq!(main_bpm(120.0, &events, 20_000.0), 120.0);
    }
}
