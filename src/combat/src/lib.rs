// src/combat/src/lib.rs
//! Combat state shared by every unit: attributes, timed effects, mana,
//! cooldowns and skill payloads.

pub mod combatant;
pub mod effect;
pub mod skill;
pub mod status_effect;

pub use crate::combatant::{Cooldowns, Mana, Stats, attack_cooldown};
pub use crate::effect::{Effect, EffectDuration};
pub use crate::skill::SkillData;
pub use crate::status_effect::{SILENCE, StatusEffects};
