use std::fmt;

use serde::{Deserialize, Serialize};

/// Letter grade from EX score over maximum EX score, in ninths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    F,
    E,
    D,
    C,
    B,
    A,
    AA,
    AAA,
}

impl Grade {
    /// Lowest grade first; grade `i` needs at least `(i + 1) / 9` of max
    /// (F needs nothing).
    const LADDER: [Grade; 8] = [
        Grade::F,
        Grade::E,
        Grade::D,
        Grade::C,
        Grade::B,
        Grade::A,
        Grade::AA,
        Grade::AAA,
    ];

    pub fn from_score(ex_score: u32, max_ex_score: u32) -> Self {
        if max_ex_score == 0 {
            return Self::F;
        }
        // ex / max >= k / 9, in integers
        let scaled = u64::from(ex_score) * 9;
        let max = u64::from(max_ex_score);
        let mut grade = Self::F;
        for (i, &g) in Self::LADDER.iter().enumerate().skip(1) {
            if scaled >= (i as u64 + 1) * max {
                grade = g;
            }
        }
        grade
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
