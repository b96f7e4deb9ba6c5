//src/combat/src/effect.rs
use items::{Attributes, StatKind};
use serde::{Deserialize, Serialize};

/// How long an effect lasts, measured in simulation ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectDuration {
    Ticks(u64),
    Infinite,
}

impl EffectDuration {
    /// Convert a duration in seconds using the simulation tick rate.
    pub fn seconds(seconds: f64, ticks_per_second: u32) -> Self {
        EffectDuration::Ticks((seconds * ticks_per_second as f64).round().max(0.0) as u64)
    }

    pub fn is_infinite(&self) -> bool {
        matches!(self, EffectDuration::Infinite)
    }
}

/// A timed attribute modifier attached to a unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    pub id: String,
    #[serde(default)]
    pub stats: Attributes,
    pub duration: EffectDuration,
    /// Tick at which the effect was (re)applied.
    #[serde(default)]
    pub started_at: u64,
}

impl Effect {
    pub fn new(id: &str, duration: EffectDuration) -> Self {
        Self {
            id: id.to_string(),
            stats: Attributes::new(),
            duration,
            started_at: 0,
        }
    }

    pub fn with_stat(mut self, kind: StatKind, delta: i32) -> Self {
        self.stats.add(kind, delta);
        self
    }

    /// Ticks since the effect was applied.
    pub fn elapsed(&self, now: u64) -> u64 {
        now.saturating_sub(self.started_at)
    }

    /// Finite effects expire once the elapsed time reaches the duration.
    pub fn is_expired(&self, now: u64) -> bool {
        match self.duration {
            EffectDuration::Infinite => false,
            EffectDuration::Ticks(ticks) => self.elapsed(now) >= ticks,
        }
    }

    /// Remaining ticks, `None` for infinite effects.
    pub fn remaining(&self, now: u64) -> Option<u64> {
        match self.duration {
            EffectDuration::Infinite => None,
            EffectDuration::Ticks(ticks) => Some(ticks.saturating_sub(self.elapsed(now))),
        }
    }
}
