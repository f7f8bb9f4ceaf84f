//! Fixed-interval timers driven by an accumulator.
//!
//! `draw_web()` calls at ~60fps with variable delta. [`FrameClock`] turns
//! host timestamps into clamped frame deltas, and each [`Interval`] turns
//! those deltas into a whole number of ticks, carrying the remainder. No
//! real time source is involved, so every timer can be driven from tests.

/// Converts wall-clock timestamps into frame deltas.
pub struct FrameClock {
    /// Upper bound for a single delta (ms).
    max_delta_ms: f64,
    /// Timestamp of the last update (ms), None if first frame.
    last_timestamp: Option<f64>,
}

impl FrameClock {
    pub fn new(max_delta_ms: f64) -> Self {
        Self {
            max_delta_ms,
            last_timestamp: None,
        }
    }

    /// Feed a timestamp (from `performance.now()` or similar) and get the
    /// elapsed milliseconds since the previous one.
    pub fn update(&mut self, now_ms: f64) -> f64 {
        let delta = match self.last_timestamp {
            // Clamp to avoid spiral-of-death if tab was backgrounded
            Some(prev) => (now_ms - prev).clamp(0.0, self.max_delta_ms),
            None => 0.0,
        };
        self.last_timestamp = Some(now_ms);
        delta
    }

    pub fn last_timestamp(&self) -> Option<f64> {
        self.last_timestamp
    }
}

/// A cancellable repeating task, the pure equivalent of a `setInterval`
/// handle. A stopped interval never yields ticks.
#[derive(Debug, Clone)]
pub struct Interval {
    /// Milliseconds per tick.
    interval_ms: f64,
    /// Accumulated milliseconds not yet consumed as ticks.
    accumulator: f64,
    running: bool,
    /// Ticks fired since creation.
    pub total_ticks: u64,
}

impl Interval {
    /// A new, stopped interval.
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms,
            accumulator: 0.0,
            running: false,
            total_ticks: 0,
        }
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Arm the interval. Returns false if it was already running.
    pub fn start(&mut self) -> bool {
        if self.running {
            return false;
        }
        self.running = true;
        self.accumulator = 0.0;
        true
    }

    /// Cancel the interval and drop any partial period.
    /// Returns true if it was running.
    pub fn stop(&mut self) -> bool {
        let was_running = self.running;
        self.running = false;
        self.accumulator = 0.0;
        was_running
    }

    /// Consume `delta_ms` and return how many ticks fired.
    pub fn advance(&mut self, delta_ms: f64) -> u32 {
        if !self.running || delta_ms <= 0.0 {
            return 0;
        }
        self.accumulator += delta_ms;
        let ticks = (self.accumulator / self.interval_ms) as u32;
        self.accumulator -= ticks as f64 * self.interval_ms;
        self.total_ticks += ticks as u64;
        ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_has_no_delta() {
        let mut clock = FrameClock::new(1000.0);
        assert_eq!(clock.update(5_000.0), 0.0);
        assert_eq!(clock.last_timestamp(), Some(5_000.0));
    }

    #[test]
    fn clock_clamps_large_gap() {
        let mut clock = FrameClock::new(500.0);
        clock.update(0.0);
        // 10 second gap (tab backgrounded) → clamped
        assert_eq!(clock.update(10_000.0), 500.0);
    }

    #[test]
    fn clock_ignores_backwards_time() {
        let mut clock = FrameClock::new(500.0);
        clock.update(100.0);
        assert_eq!(clock.update(50.0), 0.0);
    }

    #[test]
    fn stopped_interval_yields_nothing() {
        let mut iv = Interval::new(200.0);
        assert_eq!(iv.advance(1_000.0), 0);
        assert_eq!(iv.total_ticks, 0);
    }

    #[test]
    fn one_tick_per_interval() {
        let mut iv = Interval::new(200.0);
        iv.start();
        assert_eq!(iv.advance(200.0), 1);
        assert_eq!(iv.total_ticks, 1);
    }

    #[test]
    fn remainder_carried_over() {
        let mut iv = Interval::new(100.0);
        iv.start();
        assert_eq!(iv.advance(150.0), 1); // 50ms left
        assert_eq!(iv.advance(50.0), 1);
        assert_eq!(iv.advance(350.0), 3);
        assert_eq!(iv.total_ticks, 5);
    }

    #[test]
    fn start_twice_is_noop() {
        let mut iv = Interval::new(100.0);
        assert!(iv.start());
        iv.advance(60.0);
        assert!(!iv.start());
        // Remainder survives the redundant start.
        assert_eq!(iv.advance(40.0), 1);
    }

    #[test]
    fn stop_drops_partial_period() {
        let mut iv = Interval::new(100.0);
        iv.start();
        iv.advance(90.0);
        assert!(iv.stop());
        assert!(!iv.stop());
        iv.start();
        assert_eq!(iv.advance(20.0), 0);
    }

    #[test]
    fn sub_tick_frames_accumulate() {
        let mut iv = Interval::new(100.0);
        iv.start();
        let mut total = 0;
        for _ in 0..6 {
            total += iv.advance(16.0); // 96ms
        }
        assert_eq!(total, 0);
        assert_eq!(iv.advance(16.0), 1); // 112ms → 1 tick, 12ms remainder
    }

    #[test]
    fn steady_60fps() {
        let mut clock = FrameClock::new(1000.0);
        let mut iv = Interval::new(200.0);
        iv.start();
        clock.update(0.0);
        let mut total = 0u32;
        // 60 frames at ~16.67ms each = 1 second
        for i in 1..=60 {
            total += iv.advance(clock.update(i as f64 * 16.667));
        }
        assert!((4..=6).contains(&total), "expected ~5 ticks, got {}", total);
    }
}
