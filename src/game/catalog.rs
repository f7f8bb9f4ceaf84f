//! Immutable catalog: generators, upgrades, and the gem ladder.

use std::collections::HashSet;

use thiserror::Error;

/// A passive income source.
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratorDef {
    pub id: &'static str,
    pub name: &'static str,
    pub base_cost: f64,
    /// Price growth per unit owned (> 1).
    pub cost_multiplier: f64,
    /// Currency per second per unit.
    pub cps: f64,
}

/// A purchasable modifier.
#[derive(Clone, Debug, PartialEq)]
pub struct UpgradeDef {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub base_cost: f64,
    pub cost_multiplier: f64,
    /// Flat value added to each click, per unit owned.
    pub click_bonus: Option<f64>,
    /// Fraction added to the global cps multiplier, per unit owned.
    pub cps_bonus: Option<f64>,
    /// Owning this turns on the auto-clicker. At most one can be bought.
    pub unlocks_auto_click: bool,
}

/// One tier of the progression ladder.
#[derive(Clone, Debug, PartialEq)]
pub struct GemDef {
    pub name: &'static str,
    pub max_health: f64,
    /// Base click value under `ClickPolicy::PerGem`.
    pub base_click: f64,
    /// Display color token (CSS hex).
    pub color: &'static str,
}

/// Shared pricing data of generators and upgrades.
pub trait Priced {
    fn id(&self) -> &'static str;
    fn name(&self) -> &'static str;
    fn base_cost(&self) -> f64;
    fn cost_multiplier(&self) -> f64;

    /// Hard cap on how many can be owned, if any.
    fn max_quantity(&self) -> Option<u32> {
        None
    }
}

impl Priced for GeneratorDef {
    fn id(&self) -> &'static str {
        self.id
    }
    fn name(&self) -> &'static str {
        self.name
    }
    fn base_cost(&self) -> f64 {
        self.base_cost
    }
    fn cost_multiplier(&self) -> f64 {
        self.cost_multiplier
    }
}

impl Priced for UpgradeDef {
    fn id(&self) -> &'static str {
        self.id
    }
    fn name(&self) -> &'static str {
        self.name
    }
    fn base_cost(&self) -> f64 {
        self.base_cost
    }
    fn cost_multiplier(&self) -> f64 {
        self.cost_multiplier
    }
    fn max_quantity(&self) -> Option<u32> {
        self.unlocks_auto_click.then_some(1)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    #[error("gem ladder is empty")]
    NoGems,
    #[error("duplicate id `{0}`")]
    DuplicateId(&'static str),
}

/// Built through [`Catalog::new`] or [`Catalog::standard`], so the gem
/// ladder is never empty and ids are unique within each list.
#[derive(Clone, Debug, PartialEq)]
pub struct Catalog {
    generators: Vec<GeneratorDef>,
    upgrades: Vec<UpgradeDef>,
    gems: Vec<GemDef>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}

fn check_unique(ids: impl Iterator<Item = &'static str>) -> Result<(), CatalogError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(CatalogError::DuplicateId(id));
        }
    }
    Ok(())
}

impl Catalog {
    pub fn new(
        generators: Vec<GeneratorDef>,
        upgrades: Vec<UpgradeDef>,
        gems: Vec<GemDef>,
    ) -> Result<Self, CatalogError> {
        if gems.is_empty() {
            return Err(CatalogError::NoGems);
        }
        check_unique(generators.iter().map(|g| g.id))?;
        check_unique(upgrades.iter().map(|u| u.id))?;
        Ok(Self {
            generators,
            upgrades,
            gems,
        })
    }

    /// The shipped game content.
    pub fn standard() -> Self {
        let generators = vec![
            GeneratorDef {
                id: "miner",
                name: "Miner",
                base_cost: 15.0,
                cost_multiplier: 1.15,
                cps: 0.1,
            },
            GeneratorDef {
                id: "drone",
                name: "Drone",
                base_cost: 100.0,
                cost_multiplier: 1.15,
                cps: 1.0,
            },
            GeneratorDef {
                id: "factory",
                name: "Factory",
                base_cost: 1_100.0,
                cost_multiplier: 1.15,
                cps: 8.0,
            },
        ];

        let upgrades = vec![
            UpgradeDef {
                click_bonus: Some(1.0),
                ..UpgradeDef::plain("finger-1", "Strong Finger", "+1 per click", 50.0, 2.5)
            },
            UpgradeDef {
                click_bonus: Some(5.0),
                ..UpgradeDef::plain("finger-2", "Turbo Glove", "+5 per click", 500.0, 2.5)
            },
            UpgradeDef {
                click_bonus: Some(25.0),
                ..UpgradeDef::plain("finger-3", "Heavy Hammer", "+25 per click", 5_000.0, 2.5)
            },
            UpgradeDef {
                click_bonus: Some(100.0),
                ..UpgradeDef::plain("finger-4", "Titan Fist", "+100 per click", 50_000.0, 2.5)
            },
            UpgradeDef {
                cps_bonus: Some(0.10),
                ..UpgradeDef::plain("efficiency", "Efficiency", "+10% global cps", 750.0, 3.0)
            },
            UpgradeDef {
                unlocks_auto_click: true,
                ..UpgradeDef::plain(
                    "auto-clicker",
                    "Auto Clicker",
                    "Clicks once per second",
                    2_000.0,
                    1e9,
                )
            },
        ];

        let gems = vec![
            GemDef {
                name: "Ruby",
                max_health: 50.0,
                base_click: 1.0,
                color: "#ff4561",
            },
            GemDef {
                name: "Topaz",
                max_health: 10_000.0,
                base_click: 5.0,
                color: "#ffa726",
            },
            GemDef {
                name: "Emerald",
                max_health: 100_000.0,
                base_click: 25.0,
                color: "#66bb6a",
            },
            GemDef {
                name: "Sapphire",
                max_health: 1_000_000.0,
                base_click: 125.0,
                color: "#42a5f5",
            },
            GemDef {
                name: "Diamond",
                max_health: 10_000_000.0,
                base_click: 625.0,
                color: "#e0e0e0",
            },
        ];

        Self {
            generators,
            upgrades,
            gems,
        }
    }

    pub fn generators(&self) -> &[GeneratorDef] {
        &self.generators
    }

    pub fn upgrades(&self) -> &[UpgradeDef] {
        &self.upgrades
    }

    /// Ordered ladder; never empty.
    pub fn gems(&self) -> &[GemDef] {
        &self.gems
    }

    pub fn last_gem(&self) -> usize {
        self.gems.len().saturating_sub(1)
    }

    /// Gem at `level`, clamped into the ladder.
    pub fn gem(&self, level: usize) -> &GemDef {
        &self.gems[level.min(self.last_gem())]
    }
}

impl UpgradeDef {
    /// An upgrade with no effect; fill the effect in with struct update syntax.
    pub fn plain(
        id: &'static str,
        name: &'static str,
        description: &'static str,
        base_cost: f64,
        cost_multiplier: f64,
    ) -> Self {
        Self {
            id,
            name,
            description,
            base_cost,
            cost_multiplier,
            click_bonus: None,
            cps_bonus: None,
            unlocks_auto_click: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        let c = Catalog::standard();
        let gens: HashSet<_> = c.generators.iter().map(|g| g.id).collect();
        assert_eq!(gens.len(), c.generators.len());
        let ups: HashSet<_> = c.upgrades.iter().map(|u| u.id).collect();
        assert_eq!(ups.len(), c.upgrades.len());
    }

    #[test]
    fn ladder_health_grows() {
        let c = Catalog::standard();
        assert_eq!(c.gems.len(), 5);
        for pair in c.gems.windows(2) {
            assert!(pair[1].max_health > pair[0].max_health);
        }
    }

    #[test]
    fn only_auto_clicker_is_capped() {
        let c = Catalog::standard();
        for u in &c.upgrades {
            let expected = if u.id == "auto-clicker" { Some(1) } else { None };
            assert_eq!(u.max_quantity(), expected, "{}", u.id);
        }
        assert!(c.generators.iter().all(|g| g.max_quantity().is_none()));
    }

    #[test]
    fn gem_lookup_clamps() {
        let c = Catalog::standard();
        assert_eq!(c.gem(99).name, "Diamond");
        assert_eq!(c.last_gem(), 4);
    }

    #[test]
    fn empty_ladder_is_rejected() {
        let c = Catalog::standard();
        let err = Catalog::new(c.generators().to_vec(), c.upgrades().to_vec(), Vec::new());
        assert_eq!(err, Err(CatalogError::NoGems));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let c = Catalog::standard();
        let mut generators = c.generators().to_vec();
        generators.push(generators[0].clone());
        let err = Catalog::new(generators, c.upgrades().to_vec(), c.gems().to_vec());
        assert_eq!(err, Err(CatalogError::DuplicateId("miner")));
    }

    #[test]
    fn custom_ladder_is_accepted() {
        let c = Catalog::standard();
        let one = Catalog::new(Vec::new(), Vec::new(), c.gems()[..1].to_vec()).unwrap();
        assert_eq!(one.last_gem(), 0);
        assert_eq!(one.gem(3).name, "Ruby");
    }
}
