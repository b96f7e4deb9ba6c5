// src/combat/src/combatant.rs

use crate::status_effect::StatusEffects;
use items::{Attributes, Equipment, StatKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Base attributes and the derived attributes computed from them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub base: Attributes,
    pub derived: Attributes,
}

impl Stats {
    pub fn new(base: Attributes) -> Self {
        Self {
            derived: base.clone(),
            base,
        }
    }

    /// Reset derived attributes to base and fold in equipment and effects.
    pub fn recompute(&mut self, equipment: Option<&Equipment>, effects: Option<&StatusEffects>) {
        let mut derived = self.base.clone();
        if let Some(equipment) = equipment {
            derived.merge(&equipment.total_stats());
        }
        if let Some(effects) = effects {
            derived.merge(&effects.total_stats());
        }
        self.derived = derived;
    }

    pub fn get(&self, kind: StatKind) -> i32 {
        self.derived.get(kind)
    }
}

/// Mana pool. Unsigned so it can never drop below zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mana {
    pub current: u32,
    pub max: u32,
}

impl Mana {
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    pub fn can_afford(&self, cost: u32) -> bool {
        self.current >= cost
    }

    /// Deduct `cost` if affordable. Returns whether the mana was spent.
    pub fn spend(&mut self, cost: u32) -> bool {
        if !self.can_afford(cost) {
            return false;
        }
        self.current -= cost;
        true
    }

    pub fn restore(&mut self, amount: u32) {
        self.current = self.current.saturating_add(amount).min(self.max);
    }
}

/// Attack and skill cooldowns in ticks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cooldowns {
    pub attack: u32,
    /// Attacks per base interval; 1.0 means one attack every base interval.
    pub attack_speed: f32,
    pub skills: HashMap<String, u32>,
}

impl Default for Cooldowns {
    fn default() -> Self {
        Self {
            attack: 0,
            attack_speed: 1.0,
            skills: HashMap::new(),
        }
    }
}

impl Cooldowns {
    pub fn with_attack_speed(attack_speed: f32) -> Self {
        Self {
            attack_speed,
            ..Self::default()
        }
    }

    pub fn attack_ready(&self) -> bool {
        self.attack == 0
    }

    pub fn skill(&self, id: &str) -> u32 {
        self.skills.get(id).copied().unwrap_or(0)
    }

    pub fn skill_ready(&self, id: &str) -> bool {
        self.skill(id) == 0
    }

    pub fn start_skill(&mut self, id: &str, ticks: u32) {
        self.skills.insert(id.to_string(), ticks);
    }

    /// Restart the attack cooldown from the attack-speed formula.
    pub fn refresh_attack(&mut self, base_interval: f32) {
        self.attack = attack_cooldown(base_interval, self.attack_speed);
    }

    /// Count every cooldown down by one tick, clamping at zero.
    pub fn tick(&mut self) {
        self.attack = self.attack.saturating_sub(1);
        self.skills.retain(|_, ticks| {
            *ticks = ticks.saturating_sub(1);
            *ticks > 0
        });
    }
}

/// `max(1, round(base / attack_speed))`. Non-positive speeds count as 1.0.
pub fn attack_cooldown(base_interval: f32, attack_speed: f32) -> u32 {
    let speed = if attack_speed > 0.0 { attack_speed } else { 1.0 };
    let ticks = (base_interval / speed).round();
    (ticks.max(0.0) as u32).max(1)
}
