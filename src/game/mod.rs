//! Gem Clicker: break a ladder of gems, buy generators and upgrades, and
//! keep a combo streak going.

pub mod catalog;
pub mod combo;
pub mod cost;
pub mod logic;
pub mod save;
pub mod state;

use catalog::{Catalog, Priced};
use combo::ComboState;
use logic::Purchase;
use state::{GameState, Owned};

use crate::config::EngineConfig;
use crate::storage::KeyValueStore;
use crate::time::{FrameClock, Interval};

/// Read-only view of the gem being mined.
#[derive(Clone, Debug, PartialEq)]
pub struct GemView {
    pub index: usize,
    pub name: &'static str,
    pub color: &'static str,
    pub health: f64,
    pub max_health: f64,
    /// Health regenerated per second.
    pub regen: f64,
    pub is_last: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ComboView {
    pub count: u32,
    pub tier: usize,
    pub label: &'static str,
    pub progress: f64,
}

/// One shop row.
#[derive(Clone, Debug, PartialEq)]
pub struct ShopItem {
    pub id: &'static str,
    pub name: &'static str,
    pub quantity: u32,
    pub next_cost: f64,
    pub affordable: bool,
    pub sold_out: bool,
}

/// The engine: game state, combo, the three timers, and the save store.
///
/// Time only moves when the host calls [`update`](Self::update) with a
/// timestamp, so tests drive it with plain numbers.
pub struct GemGame<S: KeyValueStore> {
    state: GameState,
    combo: ComboState,
    config: EngineConfig,
    store: S,
    clock: FrameClock,
    main_timer: Interval,
    auto_click_timer: Interval,
    combo_timer: Interval,
    /// State changed since the last flush.
    dirty: bool,
    /// Latest host timestamp seen by `update`.
    now_ms: f64,
}

impl<S: KeyValueStore> GemGame<S> {
    /// Build the engine and restore any saved run from `store`.
    pub fn new(config: EngineConfig, catalog: Catalog, mut store: S) -> Self {
        let mut state = GameState::new(catalog, config.click_policy);
        if save::load_game(&mut store, &config.storage_key, &mut state) {
            log::info!(
                "restored save: {} on {}",
                crate::format_number(state.money),
                state.current_gem().name
            );
        }

        Self {
            combo: ComboState::new(
                config.combo_promotion_delay_ms,
                config.combo_safety_timeout_ms,
            ),
            clock: FrameClock::new(config.max_frame_delta_ms),
            main_timer: Interval::new(config.tick_interval_ms),
            auto_click_timer: Interval::new(config.auto_click_interval_ms),
            combo_timer: Interval::new(config.combo_interval_ms),
            state,
            config,
            store,
            dirty: false,
            now_ms: 0.0,
        }
    }

    /// Engine with the standard catalog and default tuning.
    pub fn with_store(store: S) -> Self {
        Self::new(EngineConfig::default(), Catalog::standard(), store)
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Arm the main tick, and the auto-clicker if it is owned. Calling this
    /// while running does nothing.
    pub fn start(&mut self) {
        if self.main_timer.start() {
            log::debug!("scheduler started");
        }
        if self.state.auto_clicker_unlocked {
            self.auto_click_timer.start();
        }
    }

    /// Cancel every timer, drop the combo, and write a final save.
    pub fn stop(&mut self) {
        self.main_timer.stop();
        self.auto_click_timer.stop();
        self.combo_timer.stop();
        self.combo.clear();
        self.dirty = true;
        self.flush();
        log::debug!("scheduler stopped");
    }

    pub fn is_running(&self) -> bool {
        self.main_timer.is_running()
    }

    pub fn is_auto_clicking(&self) -> bool {
        self.auto_click_timer.is_running()
    }

    pub fn is_combo_ticking(&self) -> bool {
        self.combo_timer.is_running()
    }

    /// Advance every running timer to `now_ms` and run the ticks that fell
    /// due: income and regen first, then auto-clicks, then combo decay.
    pub fn update(&mut self, now_ms: f64) {
        let delta = self.clock.update(now_ms);
        self.now_ms = now_ms;

        let interval = self.main_timer.interval_ms();
        for _ in 0..self.main_timer.advance(delta) {
            if logic::tick(&mut self.state, interval, self.config.regen_rate) {
                self.dirty = true;
            }
        }

        for _ in 0..self.auto_click_timer.advance(delta) {
            if logic::click(&mut self.state, 1.0).is_some() {
                self.dirty = true;
            }
        }

        if self.combo_timer.advance(delta) > 0 {
            self.combo.update(now_ms);
        }
        if !self.combo.is_active() {
            self.combo_timer.stop();
        }

        self.flush();
    }

    // ── Player actions ────────────────────────────────────────

    /// A click at an explicit multiplier, outside the combo. Returns the
    /// damage dealt.
    pub fn click(&mut self, multiplier: f64) -> Option<f64> {
        let (damage, _) = logic::click(&mut self.state, multiplier)?;
        self.dirty = true;
        self.flush();
        Some(damage)
    }

    /// A player click at `now_ms`: feeds the combo and hits the gem with the
    /// combo multiplier.
    pub fn tap(&mut self, now_ms: f64) -> Option<f64> {
        let multiplier = self.combo.register_click(now_ms);
        self.combo_timer.start();
        self.click(multiplier)
    }

    /// [`tap`](Self::tap) at the last timestamp seen by `update`.
    pub fn tap_now(&mut self) -> Option<f64> {
        self.tap(self.now_ms)
    }

    pub fn buy_generator(&mut self, id: &str) -> bool {
        let purchase = logic::buy_generator(&mut self.state, id);
        self.after_purchase(purchase)
    }

    pub fn buy_upgrade(&mut self, id: &str) -> bool {
        let purchase = logic::buy_upgrade(&mut self.state, id);
        self.after_purchase(purchase)
    }

    fn after_purchase(&mut self, purchase: Purchase) -> bool {
        if purchase == Purchase::UnlockedAutoClick && self.main_timer.is_running() {
            self.auto_click_timer.start();
        }
        if purchase.succeeded() {
            self.dirty = true;
            self.flush();
        }
        purchase.succeeded()
    }

    /// Wipe the run back to defaults and save the empty state.
    pub fn reset(&mut self) {
        logic::reset(&mut self.state);
        self.auto_click_timer.stop();
        self.combo_timer.stop();
        self.combo.clear();
        self.dirty = true;
        self.flush();
        log::info!("progress reset");
    }

    // ── Persistence ───────────────────────────────────────────

    /// Write the state if anything changed. A failed write is logged and
    /// skipped; the next mutation writes the whole state again anyway.
    fn flush(&mut self) {
        if !self.dirty {
            return;
        }
        self.dirty = false;
        if let Err(e) = save::save_game(&mut self.store, &self.config.storage_key, &self.state) {
            log::warn!("save skipped: {e}");
        }
    }

    // ── Observation ───────────────────────────────────────────

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn money(&self) -> f64 {
        self.state.money
    }

    pub fn per_click(&self) -> f64 {
        self.state.per_click()
    }

    pub fn cps(&self) -> f64 {
        self.state.cps()
    }

    pub fn health_regen(&self) -> f64 {
        self.state.health_regen(self.config.regen_rate)
    }

    pub fn auto_clicker_unlocked(&self) -> bool {
        self.state.auto_clicker_unlocked
    }

    pub fn gem(&self) -> GemView {
        let gem = self.state.current_gem();
        GemView {
            index: self.state.gem_level,
            name: gem.name,
            color: gem.color,
            health: self.state.health,
            max_health: gem.max_health,
            regen: self.health_regen(),
            is_last: self.state.is_last_gem(),
        }
    }

    pub fn combo(&self) -> ComboView {
        ComboView {
            count: self.combo.count(),
            tier: self.combo.displayed_tier(),
            label: self.combo.label(),
            progress: self.combo.progress(),
        }
    }

    pub fn generators(&self) -> Vec<ShopItem> {
        self.state
            .generators
            .iter()
            .map(|g| self.shop_item(g))
            .collect()
    }

    pub fn upgrades(&self) -> Vec<ShopItem> {
        self.state
            .upgrades
            .iter()
            .map(|u| self.shop_item(u))
            .collect()
    }

    fn shop_item<T: Priced>(&self, owned: &Owned<T>) -> ShopItem {
        let sold_out = owned.sold_out();
        ShopItem {
            id: owned.def.id(),
            name: owned.def.name(),
            quantity: owned.quantity,
            next_cost: owned.next_cost(),
            affordable: !sold_out && self.state.money >= owned.next_cost(),
            sold_out,
        }
    }
}
