use thiserror::Error;

use crate::gauge_property::GaugeType;

/// Rejected play configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error(
        "judge windows must be positive and non-decreasing, \
         got PG {pgreat} GR {great} GD {good} BD {bad} PR {poor}"
    )]
    InvalidJudgeWindows {
        pgreat: f64,
        great: f64,
        good: f64,
        bad: f64,
        poor: f64,
    },
    #[error("GAS floor {floor} is stricter than the starting gauge {start}")]
    GasFloorAboveStart { floor: GaugeType, start: GaugeType },
    #[error("input offset must be finite, got {0}")]
    NonFiniteOffset(f64),
}
