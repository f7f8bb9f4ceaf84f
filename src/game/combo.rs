//! Combo streak: a click counter that multiplies click damage and drains
//! over time.
//!
//! All timing comes from host timestamps, so the whole state machine can be
//! stepped deterministically:
//!
//! - [`ComboState::register_click`] bumps the count, restarts the drain, and
//!   returns the multiplier for that click.
//! - [`ComboState::update`] is called from the ~60 Hz combo timer; it drains
//!   points, resolves a pending tier promotion, and interpolates progress.

/// Lower bound (inclusive) of each combo tier.
const TIER_STARTS: [u32; 5] = [0, 10, 25, 50, 85];
/// Nominal top of the last tier, used only for the progress bar.
const DISPLAY_CAP: u32 = 150;

const MULTIPLIERS: [f64; 5] = [1.0, 1.5, 2.0, 2.5, 3.0];
const LABELS: [&str; 5] = ["x1.0", "x1.5", "x2.0", "x2.5", "x3.0 MAX"];
/// Milliseconds per combo point lost, by tier at the start of the drain.
const DRAIN_MS: [f64; 5] = [400.0, 300.0, 220.0, 160.0, 160.0];

pub const TIER_COUNT: usize = TIER_STARTS.len();

/// Tier index for a combo count.
pub fn tier_for(count: u32) -> usize {
    TIER_STARTS.iter().rposition(|&start| count >= start).unwrap_or(0)
}

pub fn tier_multiplier(tier: usize) -> f64 {
    MULTIPLIERS[tier.min(TIER_COUNT - 1)]
}

pub fn tier_label(tier: usize) -> &'static str {
    LABELS[tier.min(TIER_COUNT - 1)]
}

fn tier_range(tier: usize) -> (u32, u32) {
    let start = TIER_STARTS[tier];
    let end = TIER_STARTS.get(tier + 1).copied().unwrap_or(DISPLAY_CAP);
    (start, end)
}

/// Percentage (0..=100) of the way through the count's tier.
pub fn progress_in_tier(count: u32) -> f64 {
    let (start, end) = tier_range(tier_for(count));
    let size = end - start;
    let within = (count - start).min(size);
    within as f64 / size as f64 * 100.0
}

#[derive(Clone, Debug, PartialEq)]
struct Drain {
    started_at: f64,
    start_count: u32,
    ms_per_point: f64,
    deadline: f64,
}

#[derive(Clone, Debug)]
pub struct ComboState {
    count: u32,
    /// Tier shown to the player; lags `tier_for(count)` during a promotion.
    displayed_tier: usize,
    /// Progress through the displayed tier, in percent.
    progress: f64,
    drain: Option<Drain>,
    /// When the displayed tier catches up after a promotion.
    promotion_at: Option<f64>,
    promotion_delay_ms: f64,
    safety_timeout_ms: f64,
}

impl ComboState {
    pub fn new(promotion_delay_ms: f64, safety_timeout_ms: f64) -> Self {
        Self {
            count: 0,
            displayed_tier: 0,
            progress: 0.0,
            drain: None,
            promotion_at: None,
            promotion_delay_ms,
            safety_timeout_ms,
        }
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn displayed_tier(&self) -> usize {
        self.displayed_tier
    }

    pub fn label(&self) -> &'static str {
        tier_label(self.displayed_tier)
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn is_draining(&self) -> bool {
        self.drain.is_some()
    }

    /// Whether [`update`](Self::update) still has work to do.
    pub fn is_active(&self) -> bool {
        self.drain.is_some() || self.promotion_at.is_some()
    }

    /// Count one click at `now_ms` and return the multiplier it gets.
    ///
    /// A click that crosses into a higher tier still uses the old tier's
    /// multiplier; the next click gets the new one.
    pub fn register_click(&mut self, now_ms: f64) -> f64 {
        let previous_tier = tier_for(self.count);
        self.count = self.count.saturating_add(1);
        let tier = tier_for(self.count);

        let effective_tier = if tier > previous_tier {
            self.progress = 100.0;
            self.promotion_at = Some(now_ms + self.promotion_delay_ms);
            previous_tier
        } else {
            self.progress = progress_in_tier(self.count);
            self.displayed_tier = tier;
            self.promotion_at = None;
            tier
        };

        self.drain = Some(Drain {
            started_at: now_ms,
            start_count: self.count,
            ms_per_point: DRAIN_MS[tier],
            deadline: now_ms + self.safety_timeout_ms,
        });

        tier_multiplier(effective_tier)
    }

    /// Step the combo to `now_ms`. Returns true if the count changed.
    pub fn update(&mut self, now_ms: f64) -> bool {
        if self.promotion_at.is_some_and(|at| now_ms >= at) {
            self.promotion_at = None;
            if self.count > 0 {
                self.displayed_tier = tier_for(self.count);
                self.progress = progress_in_tier(self.count);
            }
        }

        let Some(drain) = self.drain.clone() else {
            return false;
        };

        let at = now_ms.min(drain.deadline);
        let elapsed = (at - drain.started_at).max(0.0);
        let lost = (elapsed / drain.ms_per_point).floor() as u32;
        let new_count = drain.start_count.saturating_sub(lost);

        let changed = new_count != self.count;
        if changed {
            self.count = new_count;
            self.displayed_tier = tier_for(new_count);
            self.progress = progress_in_tier(new_count);
            self.promotion_at = None;
            if new_count == 0 {
                self.drain = None;
                self.displayed_tier = 0;
                self.progress = 0.0;
                return true;
            }
        } else if self.count > 0 {
            let next = self.count - 1;
            if tier_for(self.count) == tier_for(next) {
                let partial = (elapsed % drain.ms_per_point) / drain.ms_per_point;
                let current = progress_in_tier(self.count);
                let lower = progress_in_tier(next);
                self.progress = (current - (current - lower) * partial).max(0.0);
            }
        }

        if now_ms >= drain.deadline {
            log::debug!("combo drain hit safety timeout at count {}", self.count);
            self.drain = None;
        }
        changed
    }

    /// Drop the streak entirely (teardown / reset).
    pub fn clear(&mut self) {
        *self = Self::new(self.promotion_delay_ms, self.safety_timeout_ms);
    }
}
