use bms_model::LaneModifier;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::gauge_property::GaugeType;
use crate::judge::JudgeWindows;

/// Per-play settings handed to [`crate::Session::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayConfig {
    /// Gauge the play starts on.
    #[serde(default)]
    pub gauge: GaugeType,
    /// Gauge Auto Shift.
    #[serde(default)]
    pub gas: bool,
    /// Least strict gauge GAS may fall back to.
    #[serde(default = "default_gas_floor")]
    pub gas_floor: GaugeType,
    #[serde(default)]
    pub autoplay: bool,
    /// Subtracted from every input timestamp (positive = player hits late).
    #[serde(default)]
    pub input_offset_ms: f64,
    /// Replaces the chart's `#RANK` windows when set.
    #[serde(default)]
    pub judge_windows: Option<JudgeWindows>,
    /// HAZARD also dies on empty POOR.
    #[serde(default)]
    pub hazard_empty_poor_kills: bool,
    #[serde(default)]
    pub lane_modifier: LaneModifier,
}

fn default_gas_floor() -> GaugeType {
    GaugeType::Assist
}

impl Default for PlayConfig {
    fn default() -> Self {
        Self {
            gauge: GaugeType::default(),
            gas: false,
            gas_floor: default_gas_floor(),
            autoplay: false,
            input_offset_ms: 0.0,
            judge_windows: None,
            hazard_empty_poor_kills: false,
            lane_modifier: LaneModifier::Identity,
        }
    }
}

impl PlayConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(windows) = &self.judge_windows {
            windows.validate()?;
        }
        if self.gas && self.gas_floor > self.gauge {
            return Err(ConfigError::GasFloorAboveStart {
                floor: self.gas_floor,
                start: self.gauge,
            });
        }
        if !self.input_offset_ms.is_finite() {
            return Err(ConfigError::NonFiniteOffset(self.input_offset_ms));
        }
        Ok(())
    }

    /// Windows for a chart of the given `#RANK`, honouring the override.
    pub fn windows_for_rank(&self, rank: u8) -> JudgeWindows {
        self.judge_windows
            .unwrap_or_else(|| JudgeWindows::for_rank(rank))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let config = PlayConfig::default();
        assert_eq!(config.gauge, GaugeType::Groove);
        assert!(!config.gas);
        assert_eq!(config.gas_floor, GaugeType::Assist);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn deserialize_missing_fields_uses_defaults() {
        let config: PlayConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, PlayConfig::default());

        let json = r#"{"gauge":"ExHard","gas":true,"input_offset_ms":-12.5}"#;
        let config: PlayConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.gauge, GaugeType::ExHard);
        assert!(config.gas);
        assert_eq!(config.input_offset_ms, -12.5);
    }

    #[test]
    fn serde_round_trip() {
        let config = PlayConfig {
            gauge: GaugeType::Hazard,
            gas: true,
            gas_floor: GaugeType::Hard,
            judge_windows: Some(JudgeWindows::for_rank(0)),
            lane_modifier: LaneModifier::Random(3),
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: PlayConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn floor_above_start_rejected() {
        let config = PlayConfig {
            gauge: GaugeType::Easy,
            gas: true,
            gas_floor: GaugeType::Hard,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::GasFloorAboveStart {
                floor: GaugeType::Hard,
                start: GaugeType::Easy,
            })
        );
        // Floor is irrelevant without GAS
        assert!(PlayConfig { gas: false, ..config }.validate().is_ok());
    }

    #[test]
    fn bad_windows_and_offset_rejected() {
        let config = PlayConfig {
            judge_windows: Some(JudgeWindows {
                pgreat: 30.0,
                great: 20.0,
                good: 60.0,
                bad: 100.0,
                poor: 150.0,
            }),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidJudgeWindows { .. })));

        let config = PlayConfig {
            input_offset_ms: f64::INFINITY,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::NonFiniteOffset(_))));
    }

    #[test]
    fn windows_override() {
        let custom = JudgeWindows::for_rank(0);
        let config = PlayConfig {
            judge_windows: Some(custom),
            ..Default::default()
        };
        assert_eq!(config.windows_for_rank(3), custom);
        assert_eq!(PlayConfig::default().windows_for_rank(1), JudgeWindows::for_rank(1));
    }
}
