use std::marker::PhantomData;

use bms_model::Timed;

/// Forward-only position in a time-ordered event list.
///
/// Each call to [`TimedCursor::fire`] hands out only the events that became
/// due since the last call, so a whole play costs O(events).
#[derive(Debug, Clone)]
pub struct TimedCursor<T> {
    index: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Default for TimedCursor<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimedCursor<T> {
    pub fn new() -> Self {
        Self {
            index: 0,
            _marker: PhantomData,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

impl<T: Timed> TimedCursor<T> {
    /// Events with `time <= now_ms` not handed out before.
    pub fn fire<'a>(&mut self, events: &'a [T], now_ms: f64) -> &'a [T] {
        let start = self.index.min(events.len());
        let mut end = start;
        while end < events.len() && events[end].time_ms() <= now_ms {
            end += 1;
        }
        self.index = end;
        &events[start..end]
    }

    pub fn is_done(&self, events: &[T]) -> bool {
        self.index >= events.len()
    }
}
