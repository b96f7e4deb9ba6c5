//src/items/src/weapon.rs
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// What a weapon skill does when it fires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum WeaponSkillKind {
    /// Dash toward the target, at most `max_tiles` tiles.
    Dash { max_tiles: u32 },
    /// Drag the target next to the wielder.
    Pull,
    /// Put the wielder into a timed stance (charging, parry-ready, ...).
    Stance { effect: String, duration_ticks: u64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponSkill {
    pub id: String,
    pub name: String,
    pub kind: WeaponSkillKind,
    /// Cooldown in ticks, applied to the weapon after use.
    pub cooldown: u32,
}

/// Skills bound to a weapon together with their weapon-local cooldowns.
///
/// Cooldowns travel with the weapon, not the wielder: handing the weapon to
/// another unit keeps whatever cooldown is still running.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeaponSkills {
    skills: Vec<WeaponSkill>,
    #[serde(default)]
    cooldowns: HashMap<String, u32>,
}

impl WeaponSkills {
    pub fn new(skills: Vec<WeaponSkill>) -> Self {
        Self {
            skills,
            cooldowns: HashMap::new(),
        }
    }

    pub fn skill(&self, id: &str) -> Option<&WeaponSkill> {
        self.skills.iter().find(|s| s.id == id)
    }

    pub fn skills(&self) -> &[WeaponSkill] {
        &self.skills
    }

    pub fn cooldown(&self, id: &str) -> u32 {
        self.cooldowns.get(id).copied().unwrap_or(0)
    }

    /// A skill is usable when the weapon knows it and its cooldown has run out.
    pub fn is_ready(&self, id: &str) -> bool {
        self.skill(id).is_some() && self.cooldown(id) == 0
    }

    pub fn set_cooldown(&mut self, id: &str, ticks: u32) {
        if ticks == 0 {
            self.cooldowns.remove(id);
        } else {
            self.cooldowns.insert(id.to_string(), ticks);
        }
    }

    /// Advance every running cooldown by one tick.
    pub fn tick(&mut self) {
        self.cooldowns.retain(|_, ticks| {
            *ticks = ticks.saturating_sub(1);
            *ticks > 0
        });
    }
}
