//! Status effect bookkeeping for combatants
use crate::effect::Effect;
use items::Attributes;
use serde::{Deserialize, Serialize};

/// Id of the effect that blocks skill casting.
pub const SILENCE: &str = "silence";

/// Active effects on a unit, in application order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusEffects {
    pub effects: Vec<Effect>,
}

impl StatusEffects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an effect at tick `now`.
    ///
    /// An effect with the same id is replaced in place and its start time is
    /// reset; otherwise the effect is appended.
    pub fn apply(&mut self, mut effect: Effect, now: u64) {
        effect.started_at = now;
        match self.effects.iter().position(|e| e.id == effect.id) {
            Some(idx) => self.effects[idx] = effect,
            None => self.effects.push(effect),
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<Effect> {
        let idx = self.effects.iter().position(|e| e.id == id)?;
        Some(self.effects.remove(idx))
    }

    pub fn get(&self, id: &str) -> Option<&Effect> {
        self.effects.iter().find(|e| e.id == id)
    }

    pub fn has(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn is_silenced(&self) -> bool {
        self.has(SILENCE)
    }

    /// Drop every effect that has expired at `now`, returning the removed ones.
    pub fn prune_expired(&mut self, now: u64) -> Vec<Effect> {
        let mut expired = Vec::new();
        self.effects.retain(|effect| {
            if effect.is_expired(now) {
                expired.push(effect.clone());
                false
            } else {
                true
            }
        });
        expired
    }

    /// Sum of attribute deltas from all active effects.
    pub fn total_stats(&self) -> Attributes {
        let mut total = Attributes::new();
        for effect in &self.effects {
            total.merge(&effect.stats);
        }
        total
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}
