#![no_main]

use std::sync::Arc;

use arbitrary::Arbitrary;
use bms_model::{ALL_LANES, compile};
use bms_rule::{GaugeType, PlayConfig, Session};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    chart: String,
    gauge: u8,
    gas: bool,
    steps: Vec<(u16, Option<u8>)>,
}

fuzz_target!(|input: Input| {
    let Ok(chart) = compile(&input.chart) else {
        return;
    };
    let config = PlayConfig {
        gauge: GaugeType::ALL[usize::from(input.gauge) % GaugeType::ALL.len()],
        gas: input.gas,
        ..Default::default()
    };
    let Ok(mut session) = Session::new(Arc::new(chart), &config) else {
        return;
    };

    let mut t = 0.0;
    let mut cursor = 0;
    for (dt, lane) in input.steps {
        t += f64::from(dt);
        session.advance(t);
        if let Some(lane) = lane {
            session.on_input(ALL_LANES[usize::from(lane) % ALL_LANES.len()], t);
        }
        assert!(session.note_cursor() >= cursor);
        cursor = session.note_cursor();
    }
    for _ in 0..=session.chart().notes.len() {
        if session.is_finished() {
            break;
        }
        session.advance(f64::MAX);
    }
    assert!(session.is_finished());
    let _ = serde_json::to_string(&session.result());
});
