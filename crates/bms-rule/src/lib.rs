// Judge windows, gauge simulation, GAS, score and the play session

mod clear_type;
mod cursor;
mod error;
pub mod gas;
pub mod gauge_property;
mod grade;
mod groove_gauge;
mod judge;
mod play_config;
mod result;
mod score_data;
mod session;

pub use clear_type::ClearType;
pub use cursor::TimedCursor;
pub use error::ConfigError;
pub use gas::GasDecision;
pub use gauge_property::{
    GaugeElementProperty, GaugeModifier, GaugeProperty, GaugeType, GutsEntry, InstantDeath,
};
pub use grade::Grade;
pub use groove_gauge::{Gauge, GrooveGauge};
pub use judge::{JudgeWindows, Judgment};
pub use play_config::PlayConfig;
pub use result::SessionResult;
pub use score_data::{JudgeCounts, ScoreData};
pub use session::{FUTURE_TOLERANCE_MS, JudgeEvent, LOOK_AHEAD, LOOK_BACK, PlayEvent, Session};
