//! Gem Clicker game state definitions.

use super::catalog::{Catalog, GemDef, GeneratorDef, Priced, UpgradeDef};
use super::cost::cost;
use crate::config::ClickPolicy;

/// A catalog entry with the player's holdings.
#[derive(Clone, Debug, PartialEq)]
pub struct Owned<T> {
    pub def: T,
    pub quantity: u32,
    /// Price of the next unit; always `cost(base, mult, quantity)`.
    next_cost: f64,
}

impl<T: Priced> Owned<T> {
    pub fn new(def: T) -> Self {
        Self::with_quantity(def, 0)
    }

    pub fn with_quantity(def: T, quantity: u32) -> Self {
        let quantity = match def.max_quantity() {
            Some(cap) => quantity.min(cap),
            None => quantity,
        };
        let next_cost = cost(def.base_cost(), def.cost_multiplier(), quantity);
        Self {
            def,
            quantity,
            next_cost,
        }
    }

    pub fn next_cost(&self) -> f64 {
        self.next_cost
    }

    /// Whether the hard cap has been reached.
    pub fn sold_out(&self) -> bool {
        self.def
            .max_quantity()
            .is_some_and(|cap| self.quantity >= cap)
    }

    /// Add one unit and reprice.
    pub fn increment(&mut self) {
        self.quantity += 1;
        self.next_cost = cost(
            self.def.base_cost(),
            self.def.cost_multiplier(),
            self.quantity,
        );
    }
}

/// Persistent state of a run.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    pub catalog: Catalog,
    pub click_policy: ClickPolicy,
    /// Currency balance.
    pub money: f64,
    /// Index into `catalog.gems()`.
    pub gem_level: usize,
    /// Health left on the current gem.
    pub health: f64,
    pub generators: Vec<Owned<GeneratorDef>>,
    pub upgrades: Vec<Owned<UpgradeDef>>,
    pub auto_clicker_unlocked: bool,
}

impl GameState {
    pub fn new(catalog: Catalog, click_policy: ClickPolicy) -> Self {
        let generators = catalog.generators().iter().cloned().map(Owned::new).collect();
        let upgrades = catalog.upgrades().iter().cloned().map(Owned::new).collect();
        let health = catalog.gem(0).max_health;
        Self {
            catalog,
            click_policy,
            money: 0.0,
            gem_level: 0,
            health,
            generators,
            upgrades,
            auto_clicker_unlocked: false,
        }
    }

    pub fn current_gem(&self) -> &GemDef {
        self.catalog.gem(self.gem_level)
    }

    pub fn max_health(&self) -> f64 {
        self.current_gem().max_health
    }

    pub fn is_last_gem(&self) -> bool {
        self.gem_level >= self.catalog.last_gem()
    }

    /// Value of one click before the combo multiplier.
    pub fn per_click(&self) -> f64 {
        let base = match self.click_policy {
            ClickPolicy::Flat => 1.0,
            ClickPolicy::PerGem => self.current_gem().base_click,
        };
        let bonus: f64 = self
            .upgrades
            .iter()
            .map(|u| u.def.click_bonus.unwrap_or(0.0) * u.quantity as f64)
            .sum();
        base + bonus
    }

    /// Product of `(1 + cps_bonus * quantity)` over cps upgrades.
    pub fn cps_multiplier(&self) -> f64 {
        self.upgrades
            .iter()
            .filter_map(|u| u.def.cps_bonus.map(|b| 1.0 + b * u.quantity as f64))
            .product()
    }

    /// Currency per second from generators.
    pub fn cps(&self) -> f64 {
        let base: f64 = self
            .generators
            .iter()
            .map(|g| g.def.cps * g.quantity as f64)
            .sum();
        base * self.cps_multiplier()
    }

    /// Health regenerated per second on the current gem. The first gem never
    /// regenerates.
    pub fn health_regen(&self, regen_rate: f64) -> f64 {
        if self.gem_level == 0 {
            0.0
        } else {
            self.max_health() * regen_rate
        }
    }

    pub fn generator(&self, id: &str) -> Option<&Owned<GeneratorDef>> {
        self.generators.iter().find(|g| g.def.id == id)
    }

    pub fn upgrade(&self, id: &str) -> Option<&Owned<UpgradeDef>> {
        self.upgrades.iter().find(|u| u.def.id == id)
    }
}
