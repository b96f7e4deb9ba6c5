//src/combat/src/skill.rs
use serde::{Deserialize, Serialize};

/// Static description of a castable skill as handed to the resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillData {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub mana_cost: u32,
    /// Cooldown in ticks.
    #[serde(default)]
    pub cooldown: u32,
    /// Reach of a charge attack in world units.
    #[serde(default)]
    pub charge_range: f32,
}

impl SkillData {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            mana_cost: 0,
            cooldown: 0,
            charge_range: 0.0,
        }
    }

    pub fn with_cost(mut self, mana_cost: u32) -> Self {
        self.mana_cost = mana_cost;
        self
    }

    pub fn with_cooldown(mut self, cooldown: u32) -> Self {
        self.cooldown = cooldown;
        self
    }

    pub fn with_charge_range(mut self, charge_range: f32) -> Self {
        self.charge_range = charge_range;
        self
    }

    /// Tiles a charge may cover; always at least one.
    pub fn charge_tiles(&self, tile_size: f32) -> u32 {
        if tile_size <= 0.0 {
            return 1;
        }
        ((self.charge_range / tile_size).floor().max(0.0) as u32).max(1)
    }
}
