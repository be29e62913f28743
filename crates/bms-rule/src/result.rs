use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::clear_type::ClearType;
use crate::gauge_property::GaugeType;
use crate::grade::Grade;
use crate::score_data::JudgeCounts;

/// Summary of a play, built by [`crate::Session::result`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionResult {
    pub lamp: ClearType,
    pub grade: Grade,
    pub ex_score: u32,
    pub max_ex_score: u32,
    pub counts: JudgeCounts,
    pub fast: u32,
    pub slow: u32,
    pub max_combo: u32,
    pub combo_break: u32,
    pub empty_poor: u32,
    pub active_gauge: GaugeType,
    pub final_gauges: BTreeMap<GaugeType, f64>,
    pub failed: bool,
}

impl SessionResult {
    /// EX score as a percentage of the maximum.
    pub fn rate(&self) -> f64 {
        if self.max_ex_score == 0 {
            return 0.0;
        }
        f64::from(self.ex_score) / f64::from(self.max_ex_score) * 100.0
    }

    /// BAD + POOR, the usual "miss count".
    pub fn miss_count(&self) -> u32 {
        self.counts.bad + self.counts.poor
    }
}
