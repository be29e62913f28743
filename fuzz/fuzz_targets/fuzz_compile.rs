#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let text = bms_model::decode_bytes(data);
    if let Ok(chart) = bms_model::compile(&text) {
        for w in chart.notes.windows(2) {
            assert!(w[0].time_ms <= w[1].time_ms);
        }
        assert!(chart.notes.iter().all(|n| n.time_ms.is_finite()));
        let _ = serde_json::to_string(&chart);
    }
});
