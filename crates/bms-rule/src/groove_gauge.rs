/// Groove gauge: all six gauge types simulated side by side.
///
/// Every judgment updates every gauge, so a GAS shift or the end-of-play
/// lamp can read any type's value at any moment.
use crate::gauge_property::{
    GAUGE_SLOT_COUNT, GAUGE_TYPE_COUNT, GaugeElementProperty, GaugeProperty, GaugeType,
    InstantDeath,
};
use crate::judge::Judgment;

const SLOT_EMPTY_POOR: usize = 5;

fn slot(judgment: Judgment, empty: bool) -> usize {
    if empty {
        return SLOT_EMPTY_POOR;
    }
    match judgment {
        Judgment::PGreat => 0,
        Judgment::Great => 1,
        Judgment::Good => 2,
        Judgment::Bad => 3,
        Judgment::Poor => 4,
    }
}

/// A single gauge with its per-slot changes resolved against the chart.
///
/// A survival gauge that reaches 0 never recovers.
#[derive(Debug, Clone)]
pub struct Gauge {
    value: f64,
    element: GaugeElementProperty,
    gauge_values: [f64; GAUGE_SLOT_COUNT],
}

impl Gauge {
    pub fn new(element: GaugeElementProperty, total: f64, note_count: usize) -> Self {
        let mut gauge_values = element.values;
        if let Some(modifier) = element.modifier {
            for v in &mut gauge_values {
                *v = modifier.modify(*v, total, note_count);
            }
        }
        Self {
            value: element.init,
            element,
            gauge_values,
        }
    }

    pub fn update(&mut self, judgment: Judgment, empty: bool) {
        let killed = match self.element.instant_death {
            InstantDeath::Never => false,
            InstantDeath::OnMiss => !empty && judgment.breaks_combo(),
            InstantDeath::OnMissOrEmptyPoor => empty || judgment.breaks_combo(),
        };
        if killed {
            self.set_value(0.0);
            return;
        }

        let mut inc = self.gauge_values[slot(judgment, empty)];
        if inc < 0.0 {
            if let Some(gut) = self.element.guts.iter().find(|g| self.value < g.threshold) {
                inc *= gut.multiplier;
            }
        }
        self.set_value(self.value + inc);
    }

    /// Clamp into `[min, max]`. No effect once dead.
    pub fn set_value(&mut self, value: f64) {
        if self.value > 0.0 {
            self.value = value.clamp(self.element.min, self.element.max);
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Alive and at or above the border.
    pub fn is_qualified(&self) -> bool {
        self.value > 0.0 && self.value >= self.element.border
    }

    pub fn is_dead(&self) -> bool {
        self.value <= 0.0
    }
}

#[derive(Debug, Clone)]
pub struct GrooveGauge {
    gauges: [Gauge; GAUGE_TYPE_COUNT],
    active_type: GaugeType,
    original_type: GaugeType,
}

impl GrooveGauge {
    pub fn new(
        property: &GaugeProperty,
        active_type: GaugeType,
        total: f64,
        note_count: usize,
    ) -> Self {
        let gauges =
            std::array::from_fn(|i| Gauge::new(property.elements[i].clone(), total, note_count));
        Self {
            gauges,
            active_type,
            original_type: active_type,
        }
    }

    /// Apply one judgment to every gauge. `empty` marks an empty POOR.
    pub fn update(&mut self, judgment: Judgment, empty: bool) {
        for gauge in &mut self.gauges {
            gauge.update(judgment, empty);
        }
    }

    /// Active gauge value.
    pub fn value(&self) -> f64 {
        self.active_gauge().value()
    }

    pub fn value_of(&self, gauge_type: GaugeType) -> f64 {
        self.gauge(gauge_type).value()
    }

    pub fn is_qualified(&self) -> bool {
        self.active_gauge().is_qualified()
    }

    pub fn active_type(&self) -> GaugeType {
        self.active_type
    }

    pub fn set_active_type(&mut self, gauge_type: GaugeType) {
        self.active_type = gauge_type;
    }

    /// Gauge type the play started with.
    pub fn original_type(&self) -> GaugeType {
        self.original_type
    }

    pub fn is_type_changed(&self) -> bool {
        self.active_type != self.original_type
    }

    pub fn active_gauge(&self) -> &Gauge {
        self.gauge(self.active_type)
    }

    pub fn gauge(&self, gauge_type: GaugeType) -> &Gauge {
        &self.gauges[gauge_type as usize]
    }

    /// `(type, value)` for all six gauges, least strict first.
    pub fn values(&self) -> [(GaugeType, f64); GAUGE_TYPE_COUNT] {
        std::array::from_fn(|i| (GaugeType::ALL[i], self.gauges[i].value()))
    }
}
