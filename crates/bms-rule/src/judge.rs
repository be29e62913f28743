use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Timing tier of a single judgment, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Judgment {
    PGreat,
    Great,
    Good,
    Bad,
    Poor,
}

impl Judgment {
    pub const ALL: [Judgment; 5] = [
        Judgment::PGreat,
        Judgment::Great,
        Judgment::Good,
        Judgment::Bad,
        Judgment::Poor,
    ];

    /// EX score contribution: PGREAT 2, GREAT 1.
    pub fn ex_score(self) -> u32 {
        match self {
            Self::PGreat => 2,
            Self::Great => 1,
            Self::Good | Self::Bad | Self::Poor => 0,
        }
    }

    pub fn breaks_combo(self) -> bool {
        matches!(self, Self::Bad | Self::Poor)
    }
}

impl fmt::Display for Judgment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::PGreat => "PGREAT",
            Self::Great => "GREAT",
            Self::Good => "GOOD",
            Self::Bad => "BAD",
            Self::Poor => "POOR",
        })
    }
}

/// Judge window half-widths in milliseconds.
///
/// Thresholds are inclusive: `|diff| <= pgreat` is a PGREAT. A note is only
/// hit inside `bad`; `poor` bounds the empty-POOR zone ahead of the input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JudgeWindows {
    pub pgreat: f64,
    pub great: f64,
    pub good: f64,
    pub bad: f64,
    pub poor: f64,
}

impl JudgeWindows {
    pub fn new(
        pgreat: f64,
        great: f64,
        good: f64,
        bad: f64,
        poor: f64,
    ) -> Result<Self, ConfigError> {
        let windows = Self {
            pgreat,
            great,
            good,
            bad,
            poor,
        };
        windows.validate()?;
        Ok(windows)
    }

    /// Profile for a chart `#RANK` (0 = VERY HARD .. 3 = EASY). Higher ranks
    /// use the EASY profile.
    pub fn for_rank(rank: u8) -> Self {
        let [pgreat, great, good, bad, poor] = match rank {
            0 => [8.0, 24.0, 40.0, 100.0, 150.0],
            1 => [15.0, 32.0, 60.0, 100.0, 150.0],
            2 => [18.0, 40.0, 100.0, 200.0, 250.0],
            _ => [21.0, 60.0, 120.0, 200.0, 250.0],
        };
        Self {
            pgreat,
            great,
            good,
            bad,
            poor,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let ordered = [self.pgreat, self.great, self.good, self.bad, self.poor];
        let positive = ordered.iter().all(|w| w.is_finite() && *w > 0.0);
        let non_decreasing = ordered.windows(2).all(|w| w[0] <= w[1]);
        if positive && non_decreasing {
            Ok(())
        } else {
            Err(ConfigError::InvalidJudgeWindows {
                pgreat: self.pgreat,
                great: self.great,
                good: self.good,
                bad: self.bad,
                poor: self.poor,
            })
        }
    }

    /// Tier for a hit `diff_ms` away from its note, or `None` outside BAD.
    pub fn classify(&self, diff_ms: f64) -> Option<Judgment> {
        let d = diff_ms.abs();
        if d <= self.pgreat {
            Some(Judgment::PGreat)
        } else if d <= self.great {
            Some(Judgment::Great)
        } else if d <= self.good {
            Some(Judgment::Good)
        } else if d <= self.bad {
            Some(Judgment::Bad)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_profiles_widen_with_rank() {
        for rank in 0..3 {
            let a = JudgeWindows::for_rank(rank);
            let b = JudgeWindows::for_rank(rank + 1);
            assert!(a.pgreat < b.pgreat);
            assert!(a.great <= b.great);
            assert!(a.validate().is_ok());
        }
        assert_eq!(JudgeWindows::for_rank(9), JudgeWindows::for_rank(3));
    }

    #[test]
    fn classify_is_inclusive_and_symmetric() {
        let w = JudgeWindows::for_rank(1);
        assert_eq!(w.classify(15.0), Some(Judgment::PGreat));
        assert_eq!(w.classify(-15.0), Some(Judgment::PGreat));
        assert_eq!(w.classify(15.5), Some(Judgment::Great));
        assert_eq!(w.classify(32.0), Some(Judgment::Great));
        assert_eq!(w.classify(-60.0), Some(Judgment::Good));
        assert_eq!(w.classify(100.0), Some(Judgment::Bad));
        assert_eq!(w.classify(100.1), None);
    }

    #[test]
    fn invalid_windows_rejected() {
        assert!(JudgeWindows::new(20.0, 40.0, 60.0, 100.0, 150.0).is_ok());
        assert!(JudgeWindows::new(0.0, 40.0, 60.0, 100.0, 150.0).is_err());
        assert!(JudgeWindows::new(50.0, 40.0, 60.0, 100.0, 150.0).is_err());
        assert!(JudgeWindows::new(20.0, 40.0, 60.0, f64::NAN, 150.0).is_err());
    }

    #[test]
    fn ex_score_and_combo() {
        assert_eq!(Judgment::PGreat.ex_score(), 2);
        assert_eq!(Judgment::Great.ex_score(), 1);
        assert_eq!(Judgment::Good.ex_score(), 0);
        assert!(Judgment::Bad.breaks_combo());
        assert!(!Judgment::Good.breaks_combo());
    }
}
