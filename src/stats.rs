//! Stat/effect engine: derived attributes, timed effects and cooldown upkeep.

use crate::ecs::{Equipment, Stats, StatusEffects, TickContext};
use crate::event_bus::GameEvent;
use crate::systems::Subsystem;
use combat::{Cooldowns, Effect};
use error::EngineResult;
use hecs::{Entity, World};
use items::StatKind;

/// Stateless helpers over the stat components of a unit.
pub struct StatEngine;

impl StatEngine {
    /// Derived = base + equipment deltas + active effect deltas.
    pub fn recalculate_stats(world: &mut World, entity: Entity) -> EngineResult<()> {
        let (stats, equipment, effects) = world
            .query_one_mut::<(&mut Stats, Option<&Equipment>, Option<&StatusEffects>)>(entity)?;
        stats.recompute(equipment, effects);
        Ok(())
    }

    /// Apply `effect` at tick `now`, replacing an effect with the same id.
    pub fn apply_effect(
        world: &mut World,
        entity: Entity,
        effect: Effect,
        now: u64,
    ) -> EngineResult<()> {
        tracing::debug!(?entity, effect = %effect.id, now, "applying effect");
        world.get::<&mut StatusEffects>(entity)?.apply(effect, now);
        Self::recalculate_stats(world, entity)
    }

    pub fn get_stat(world: &World, entity: Entity, kind: StatKind) -> i32 {
        world
            .get::<&Stats>(entity)
            .map(|stats| stats.get(kind))
            .unwrap_or(0)
    }

    /// Prune expired effects and recalculate if anything was removed.
    pub fn prune_expired(world: &mut World, entity: Entity, now: u64) -> EngineResult<Vec<Effect>> {
        let expired = match world.get::<&mut StatusEffects>(entity) {
            Ok(mut effects) if !effects.is_empty() => effects.prune_expired(now),
            _ => return Ok(Vec::new()),
        };
        if !expired.is_empty() {
            Self::recalculate_stats(world, entity)?;
        }
        Ok(expired)
    }
}

/// Per-tick expiry of timed effects on every tracked unit.
pub struct StatSystem;

impl Subsystem for StatSystem {
    fn compute(&mut self, ctx: &mut TickContext<'_>) -> EngineResult<()> {
        let now = ctx.now();
        for entity in ctx.resources.rosters.tracked() {
            if !ctx.world.contains(entity) {
                continue;
            }
            let expired = match StatEngine::prune_expired(ctx.world, entity, now) {
                Ok(expired) => expired,
                Err(err) => {
                    tracing::error!(?entity, "effect expiry failed: {err}");
                    continue;
                }
            };
            for effect in expired {
                ctx.publish(GameEvent::EffectExpired {
                    entity,
                    effect: effect.id,
                });
            }
        }
        Ok(())
    }
}

/// Counts attack, skill and weapon cooldowns down by one tick.
pub struct CooldownSystem;

impl Subsystem for CooldownSystem {
    fn compute(&mut self, ctx: &mut TickContext<'_>) -> EngineResult<()> {
        for entity in ctx.resources.rosters.tracked() {
            let Ok((cooldowns, equipment)) = ctx
                .world
                .query_one_mut::<(&mut Cooldowns, Option<&mut Equipment>)>(entity)
            else {
                continue;
            };
            cooldowns.tick();
            if let Some(equipment) = equipment {
                for item in equipment.items_mut() {
                    if let Some(skills) = item.weapon_skills.as_mut() {
                        skills.tick();
                    }
                }
            }
        }
        Ok(())
    }
}
