use serde::{Deserialize, Serialize};

use crate::judge::Judgment;

/// Per-tier judgment counts for notes (empty POOR excluded).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JudgeCounts {
    pub pgreat: u32,
    pub great: u32,
    pub good: u32,
    pub bad: u32,
    pub poor: u32,
}

impl JudgeCounts {
    pub fn get(&self, judgment: Judgment) -> u32 {
        match judgment {
            Judgment::PGreat => self.pgreat,
            Judgment::Great => self.great,
            Judgment::Good => self.good,
            Judgment::Bad => self.bad,
            Judgment::Poor => self.poor,
        }
    }

    fn get_mut(&mut self, judgment: Judgment) -> &mut u32 {
        match judgment {
            Judgment::PGreat => &mut self.pgreat,
            Judgment::Great => &mut self.great,
            Judgment::Good => &mut self.good,
            Judgment::Bad => &mut self.bad,
            Judgment::Poor => &mut self.poor,
        }
    }

    /// Notes judged so far.
    pub fn total(&self) -> u32 {
        self.pgreat + self.great + self.good + self.bad + self.poor
    }
}

/// Running score of one play.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreData {
    pub counts: JudgeCounts,
    /// Early GREAT/GOOD/BAD hits
    pub fast: u32,
    /// Late GREAT/GOOD/BAD hits
    pub slow: u32,
    pub combo: u32,
    pub max_combo: u32,
    /// Times a running combo was broken
    pub combo_break: u32,
    /// Presses that hit no note but landed in a note's POOR window
    pub empty_poor: u32,
}

impl ScoreData {
    /// Record a judgment. `diff_ms` is input time minus note time.
    pub fn record(&mut self, judgment: Judgment, diff_ms: f64, empty: bool) {
        if empty {
            self.empty_poor += 1;
            return;
        }

        *self.counts.get_mut(judgment) += 1;

        if judgment.breaks_combo() {
            if self.combo > 0 {
                self.combo_break += 1;
            }
            self.combo = 0;
        } else {
            self.combo += 1;
            self.max_combo = self.max_combo.max(self.combo);
        }

        if matches!(judgment, Judgment::Great | Judgment::Good | Judgment::Bad) {
            if diff_ms < 0.0 {
                self.fast += 1;
            } else if diff_ms > 0.0 {
                self.slow += 1;
            }
        }
    }

    /// PGREAT * 2 + GREAT
    pub fn exscore(&self) -> u32 {
        self.counts.pgreat * 2 + self.counts.great
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exscore_and_combo() {
        let mut s = ScoreData::default();
        s.record(Judgment::PGreat, 0.0, false);
        s.record(Judgment::Great, -20.0, false);
        s.record(Judgment::Good, 50.0, false);
        assert_eq!(s.exscore(), 3);
        assert_eq!(s.combo, 3);
        assert_eq!(s.max_combo, 3);
        assert_eq!((s.fast, s.slow), (1, 1));
        assert_eq!(s.counts.total(), 3);
    }

    #[test]
    fn combo_break_counts_only_live_combos() {
        let mut s = ScoreData::default();
        s.record(Judgment::Poor, 200.0, false);
        assert_eq!(s.combo_break, 0);
        s.record(Judgment::PGreat, 0.0, false);
        s.record(Judgment::Bad, 90.0, false);
        s.record(Judgment::Poor, 200.0, false);
        assert_eq!(s.combo_break, 1);
        assert_eq!(s.combo, 0);
        assert_eq!(s.max_combo, 1);
        // BAD is slow; POOR is never counted
        assert_eq!(s.slow, 1);
    }

    #[test]
    fn pgreat_has_no_fast_slow() {
        let mut s = ScoreData::default();
        s.record(Judgment::PGreat, -10.0, false);
        s.record(Judgment::PGreat, 10.0, false);
        assert_eq!((s.fast, s.slow), (0, 0));
    }

    #[test]
    fn empty_poor_is_tallied_apart() {
        let mut s = ScoreData::default();
        s.record(Judgment::PGreat, 0.0, false);
        s.record(Judgment::Poor, -180.0, true);
        assert_eq!(s.empty_poor, 1);
        assert_eq!(s.combo, 1);
        assert_eq!(s.counts.poor, 0);
        assert_eq!(s.combo_break, 0);
        assert_eq!(s.fast, 0);
    }
}
