//! Gauge Auto Shift: moves the active gauge along the ladder
//! HAZARD > EXHARD > HARD > GROOVE > EASY > ASSIST after every judgment.

use serde::{Deserialize, Serialize};

use crate::gauge_property::GaugeType;
use crate::groove_gauge::GrooveGauge;

/// Live clear line a light gauge has to hold to stay active.
pub const LIGHT_CLEAR_LINE: f64 = 80.0;

/// Outcome of one GAS consultation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GasDecision {
    Stay,
    Shift(GaugeType),
    /// Active survival gauge is dead with nothing alive between it and the floor.
    Fail,
}

/// Decide the next active gauge. Pure: reads the gauges, changes nothing.
///
/// `start` is the gauge the play began on and caps promotion; `floor` is the
/// least strict gauge GAS may fall back to.
pub fn decide(gauge: &GrooveGauge, start: GaugeType, floor: GaugeType) -> GasDecision {
    let active = gauge.active_type();

    let demote = if active.is_survival() {
        gauge.gauge(active).is_dead()
    } else {
        gauge.value_of(active) < LIGHT_CLEAR_LINE
    };

    if demote {
        let mut candidate = active.looser();
        while let Some(gauge_type) = candidate {
            if gauge_type < floor {
                break;
            }
            if !gauge_type.is_survival() || !gauge.gauge(gauge_type).is_dead() {
                return GasDecision::Shift(gauge_type);
            }
            candidate = gauge_type.looser();
        }
        return if active.is_survival() {
            GasDecision::Fail
        } else {
            GasDecision::Stay
        };
    }

    if matches!(active, GaugeType::Assist | GaugeType::Easy) {
        if let Some(next) = active.stricter() {
            if next <= start && !next.is_survival() && gauge.value_of(next) >= LIGHT_CLEAR_LINE {
                return GasDecision::Shift(next);
            }
        }
    }

    GasDecision::Stay
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gauge_property::GaugeProperty;
    use crate::judge::Judgment;

    fn gauge(active: GaugeType, total: f64, notes: usize) -> GrooveGauge {
        GrooveGauge::new(&GaugeProperty::standard(false), active, total, notes)
    }

    #[test]
    fn healthy_survival_stays() {
        let g = gauge(GaugeType::ExHard, 300.0, 1000);
        assert_eq!(decide(&g, GaugeType::ExHard, GaugeType::Assist), GasDecision::Stay);
    }

    #[test]
    fn dead_exhard_falls_to_hard() {
        let mut g = gauge(GaugeType::ExHard, 300.0, 1000);
        while !g.gauge(GaugeType::ExHard).is_dead() {
            g.update(Judgment::Poor, false);
        }
        assert!(!g.gauge(GaugeType::Hard).is_dead());
        assert_eq!(
            decide(&g, GaugeType::ExHard, GaugeType::Assist),
            GasDecision::Shift(GaugeType::Hard)
        );
    }

    #[test]
    fn dead_survival_skips_dead_candidates() {
        let mut g = gauge(GaugeType::Hazard, 300.0, 1000);
        for _ in 0..30 {
            g.update(Judgment::Poor, false);
        }
        assert!(g.gauge(GaugeType::Hard).is_dead());
        assert_eq!(
            decide(&g, GaugeType::Hazard, GaugeType::Assist),
            GasDecision::Shift(GaugeType::Groove)
        );
    }

    #[test]
    fn survival_floor_with_nothing_alive_fails() {
        let mut g = gauge(GaugeType::ExHard, 300.0, 1000);
        for _ in 0..30 {
            g.update(Judgment::Poor, false);
        }
        g.set_active_type(GaugeType::Hard);
        assert_eq!(decide(&g, GaugeType::ExHard, GaugeType::Hard), GasDecision::Fail);
    }

    #[test]
    fn low_light_gauge_steps_down_until_floor() {
        let g = gauge(GaugeType::Groove, 300.0, 1000);
        assert_eq!(
            decide(&g, GaugeType::Groove, GaugeType::Assist),
            GasDecision::Shift(GaugeType::Easy)
        );
        assert_eq!(decide(&g, GaugeType::Groove, GaugeType::Groove), GasDecision::Stay);

        let mut at_floor = g.clone();
        at_floor.set_active_type(GaugeType::Assist);
        assert_eq!(decide(&at_floor, GaugeType::Groove, GaugeType::Assist), GasDecision::Stay);
    }

    #[test]
    fn promotion_needs_next_gauge_at_line() {
        // tick = 1.0: 60 PGREATs put EASY and GROOVE at 80, ASSIST at 92
        let mut g = gauge(GaugeType::Groove, 100.0, 100);
        for _ in 0..60 {
            g.update(Judgment::PGreat, false);
        }
        g.set_active_type(GaugeType::Assist);
        assert_eq!(
            decide(&g, GaugeType::Groove, GaugeType::Assist),
            GasDecision::Shift(GaugeType::Easy)
        );
        g.set_active_type(GaugeType::Easy);
        assert_eq!(
            decide(&g, GaugeType::Groove, GaugeType::Assist),
            GasDecision::Shift(GaugeType::Groove)
        );
    }

    #[test]
    fn promotion_capped_at_start() {
        let mut g = gauge(GaugeType::Easy, 100.0, 100);
        for _ in 0..70 {
            g.update(Judgment::PGreat, false);
        }
        assert_eq!(decide(&g, GaugeType::Easy, GaugeType::Assist), GasDecision::Stay);
    }
}
