//! Turns a unit's chosen `Action` into changes to the world.

use super::{Action, Brain, DecisionPolicy, MoveTarget, PendingStrike};
use crate::ecs::{
    Body, Cooldowns, Equipment, Facing, Mana, Position, Resources, StatusEffects, TickContext,
};
use crate::event_bus::{GameEvent, LogColor};
use crate::movement::MovementEngine;
use crate::services::{ProjectileRequest, VfxKind, VfxRequest};
use crate::stats::StatEngine;
use crate::systems::Subsystem;
use combat::{Effect, EffectDuration, SkillData};
use error::EngineResult;
use hecs::{Entity, World};
use items::WeaponSkillKind;

pub struct AiResolver;

/// Holds a brain's place while its policy is out deciding.
struct Dormant;

impl DecisionPolicy for Dormant {
    fn decide(&mut self, _me: Entity, _world: &World, _resources: &Resources) -> Action {
        Action::Idle
    }
}

impl AiResolver {
    /// Consult the unit's policy and execute the action it picks.
    ///
    /// Units without a `Brain` are skipped.
    pub fn run_unit(entity: Entity, ctx: &mut TickContext<'_>) -> EngineResult<()> {
        // the policy leaves its brain while deciding so it can read any
        // unit's `Brain`, its own included
        let mut policy = match ctx.world.get::<&mut Brain>(entity) {
            Ok(mut brain) => std::mem::replace(&mut brain.policy, Box::new(Dormant)),
            Err(_) => return Ok(()),
        };
        let action = policy.decide(entity, &*ctx.world, &*ctx.resources);
        if let Ok(mut brain) = ctx.world.get::<&mut Brain>(entity) {
            brain.policy = policy;
        }
        Self::trace_decision(entity, &action, ctx);
        Self::execute_action(entity, action, ctx)
    }

    /// Emit an `ai` debug notification, at most once per throttle window
    /// per unit.
    fn trace_decision(entity: Entity, action: &Action, ctx: &mut TickContext<'_>) {
        let now = ctx.now();
        let window = ctx.resources.config.debug_throttle_ticks;
        let due = match ctx.world.get::<&mut Brain>(entity) {
            Ok(mut brain) => {
                let due = brain
                    .last_debug_tick
                    .is_none_or(|last| now.saturating_sub(last) >= window);
                if due {
                    brain.last_debug_tick = Some(now);
                }
                due
            }
            Err(_) => false,
        };
        if due {
            let message = format!("{} -> {}", ctx.name_of(entity), action.kind());
            ctx.publish(GameEvent::debug("ai", message));
        }
    }

    pub fn execute_action(
        entity: Entity,
        action: Action,
        ctx: &mut TickContext<'_>,
    ) -> EngineResult<()> {
        tracing::trace!(?entity, kind = %action.kind(), "executing action");
        match action {
            Action::Idle => Ok(()),
            Action::Attack { target } => Self::attack(entity, target, ctx),
            Action::Skill { skill, target } => Self::cast_skill(entity, &skill, target, ctx),
            Action::BackstabTeleport { target } => Self::backstab(entity, target, ctx),
            Action::WeaponSkill { skill_id, target } => {
                Self::weapon_skill(entity, &skill_id, target, ctx)
            }
            Action::ChargeAttack { skill, target } => Self::charge(entity, &skill, target, ctx),
            Action::Move { destination } => Self::move_to(entity, destination, ctx),
        }
    }

    fn attack(entity: Entity, target: Entity, ctx: &mut TickContext<'_>) -> EngineResult<()> {
        if !ctx.world.contains(target) {
            return Ok(());
        }
        if !ctx.world.get::<&Cooldowns>(entity)?.attack_ready() {
            return Ok(());
        }

        let ranged_weapon = ctx
            .world
            .get::<&Equipment>(entity)?
            .main_hand()
            .filter(|item| item.is_ranged())
            .map(|item| item.name.clone());
        let from = *ctx.world.get::<&Position>(entity)?;
        let to = *ctx.world.get::<&Position>(target)?;

        let launcher_ready = ctx.services.projectiles.is_some();
        match ranged_weapon {
            Some(weapon) if launcher_ready => {
                tracing::debug!(?entity, ?target, %weapon, "projectile launched");
                if let Some(launcher) = ctx.services.projectiles.as_mut() {
                    launcher.launch(ProjectileRequest {
                        shooter: entity,
                        target,
                        from,
                        to,
                        weapon,
                    });
                }
            }
            _ => ctx.publish(GameEvent::EntityAttack {
                attacker: entity,
                defender: target,
                skill: None,
            }),
        }

        let base = ctx.resources.config.attack_cooldown_base;
        ctx.world.get::<&mut Cooldowns>(entity)?.refresh_attack(base);
        Ok(())
    }

    fn cast_skill(
        entity: Entity,
        skill: &SkillData,
        target: Option<Entity>,
        ctx: &mut TickContext<'_>,
    ) -> EngineResult<()> {
        let silenced = ctx
            .world
            .get::<&StatusEffects>(entity)
            .map(|effects| effects.is_silenced())
            .unwrap_or(false);
        if silenced {
            tracing::debug!(?entity, skill = %skill.id, "silenced, skill not cast");
            return Ok(());
        }

        let base = ctx.resources.config.attack_cooldown_base;
        {
            let (mana, cooldowns) = ctx
                .world
                .query_one_mut::<(&mut Mana, &mut Cooldowns)>(entity)?;
            if !cooldowns.skill_ready(&skill.id) || !mana.spend(skill.mana_cost) {
                return Ok(());
            }
            cooldowns.start_skill(&skill.id, skill.cooldown);
            cooldowns.refresh_attack(base);
        }

        if let Some(speech) = ctx.services.speech.as_mut() {
            speech.say(entity, &skill.name);
        }
        ctx.publish(GameEvent::SkillUsed {
            caster: entity,
            skill: skill.id.clone(),
            target,
        });
        Ok(())
    }

    fn backstab(entity: Entity, target: Entity, ctx: &mut TickContext<'_>) -> EngineResult<()> {
        if !ctx.world.contains(target) {
            return Ok(());
        }
        if ctx.services.map.is_none() || ctx.services.vfx.is_none() {
            tracing::debug!(?entity, "backstab needs map and vfx, skipped");
            return Ok(());
        }

        let target_pos = *ctx.world.get::<&Position>(target)?;
        let facing = ctx
            .world
            .get::<&Facing>(target)
            .map(|facing| *facing)
            .unwrap_or_default();
        let offset = ctx.tile_size() * ctx.resources.config.backstab_offset_tiles;
        let behind = Position::new(target_pos.x - facing.sign() * offset, target_pos.y);
        let in_front = Position::new(target_pos.x + facing.sign() * offset, target_pos.y);
        let open = [behind, in_front]
            .into_iter()
            .find(|&spot| !Self::walled(ctx, entity, spot));
        let destination = match open {
            Some(spot) => spot,
            None => *ctx.world.get::<&Position>(entity)?,
        };
        let life_ticks = ctx.resources.config.teleport_vfx_ticks;

        let Some(vfx) = ctx.services.vfx.as_mut() else {
            return Ok(());
        };
        let handle = vfx.spawn(VfxRequest {
            kind: VfxKind::Teleport,
            entity: Some(entity),
            at: destination,
            life_ticks,
        });

        let strike = PendingStrike {
            target,
            destination,
            vfx: handle,
        };
        let stored = match ctx.world.get::<&mut Brain>(entity) {
            Ok(mut brain) => {
                brain.pending = Some(strike);
                true
            }
            Err(_) => false,
        };
        if stored {
            Ok(())
        } else {
            Self::land_strike(entity, strike, ctx)
        }
    }

    /// Finish a teleport strike: move to the landing spot and attack.
    fn land_strike(entity: Entity, strike: PendingStrike, ctx: &mut TickContext<'_>) -> EngineResult<()> {
        if !ctx.world.contains(strike.target) {
            tracing::debug!(?entity, "backstab target gone, strike dropped");
            return Ok(());
        }
        if Self::walled(ctx, entity, strike.destination) {
            tracing::debug!(?entity, "teleport destination walled, striking from here");
        } else {
            *ctx.world.get::<&mut Position>(entity)? = strike.destination;
        }
        Self::execute_action(entity, Action::Attack { target: strike.target }, ctx)
    }

    fn weapon_skill(
        entity: Entity,
        skill_id: &str,
        target: Option<Entity>,
        ctx: &mut TickContext<'_>,
    ) -> EngineResult<()> {
        let (weapon, skill) = {
            let equipment = ctx.world.get::<&Equipment>(entity)?;
            let Some(weapon) = equipment.main_hand() else {
                return Ok(());
            };
            let Some(skills) = weapon.weapon_skills.as_ref() else {
                return Ok(());
            };
            if !skills.is_ready(skill_id) {
                return Ok(());
            }
            let Some(skill) = skills.skill(skill_id) else {
                return Ok(());
            };
            (weapon.name.clone(), skill.clone())
        };
        let target = target.filter(|&t| ctx.world.contains(t));

        match &skill.kind {
            WeaponSkillKind::Dash { max_tiles } => {
                let Some(target) = target else {
                    return Ok(());
                };
                let from = *ctx.world.get::<&Position>(entity)?;
                let toward = *ctx.world.get::<&Position>(target)?;
                if let Some(motion) = ctx.services.motion.as_mut() {
                    motion.dash(entity, from, toward, *max_tiles);
                }
            }
            WeaponSkillKind::Pull => {
                let Some(target) = target else {
                    return Ok(());
                };
                let me = *ctx.world.get::<&Position>(entity)?;
                let width = ctx.world.get::<&Body>(entity)?.width;
                let from = *ctx.world.get::<&Position>(target)?;
                let side = if from.x < me.x { -1.0 } else { 1.0 };
                let landing = [side, -side]
                    .into_iter()
                    .map(|side| Position::new(me.x + side * width, me.y))
                    .find(|&spot| !Self::walled(ctx, target, spot));
                if let Some(landing) = landing {
                    *ctx.world.get::<&mut Position>(target)? = landing;
                }
            }
            WeaponSkillKind::Stance {
                effect,
                duration_ticks,
            } => {
                let now = ctx.now();
                StatEngine::apply_effect(
                    ctx.world,
                    entity,
                    Effect::new(effect, EffectDuration::Ticks(*duration_ticks)),
                    now,
                )?;
            }
        }

        if let Some(skills) = ctx
            .world
            .get::<&mut Equipment>(entity)?
            .main_hand_mut()
            .and_then(|item| item.weapon_skills.as_mut())
        {
            skills.set_cooldown(&skill.id, skill.cooldown);
        }

        let message = format!("{} uses {} with {}!", ctx.name_of(entity), skill.name, weapon);
        ctx.publish(GameEvent::log(message, LogColor::Cyan));
        Ok(())
    }

    fn charge(
        entity: Entity,
        skill: &SkillData,
        target: Entity,
        ctx: &mut TickContext<'_>,
    ) -> EngineResult<()> {
        if !ctx.world.contains(target) {
            return Ok(());
        }
        if !ctx.world.get::<&Mana>(entity)?.can_afford(skill.mana_cost) {
            return Ok(());
        }

        let from = *ctx.world.get::<&Position>(entity)?;
        let toward = *ctx.world.get::<&Position>(target)?;
        let tiles = skill.charge_tiles(ctx.tile_size());

        if let Some(motion) = ctx.services.motion.as_mut() {
            motion.dash(entity, from, toward, tiles);
        } else {
            let body = *ctx.world.get::<&Body>(entity)?;
            let distance = from.distance_to(&toward);
            if distance > body.width {
                let landing = Position::new(
                    toward.x - (toward.x - from.x) / distance * body.width,
                    toward.y - (toward.y - from.y) / distance * body.width,
                );
                if !Self::walled(ctx, entity, landing) {
                    *ctx.world.get::<&mut Position>(entity)? = landing;
                }
            }
        }

        ctx.publish(GameEvent::EntityAttack {
            attacker: entity,
            defender: target,
            skill: Some(skill.id.clone()),
        });

        let base = ctx.resources.config.attack_cooldown_base;
        let (mana, cooldowns) = ctx
            .world
            .query_one_mut::<(&mut Mana, &mut Cooldowns)>(entity)?;
        mana.spend(skill.mana_cost);
        cooldowns.start_skill(&skill.id, skill.cooldown);
        cooldowns.refresh_attack(base);
        Ok(())
    }

    /// Whether `entity`'s footprint at `at` would overlap a wall. Without a
    /// map nothing is walled.
    fn walled(ctx: &TickContext<'_>, entity: Entity, at: Position) -> bool {
        let Some(map) = ctx.services.map.as_deref() else {
            return false;
        };
        let (width, height) = ctx
            .world
            .get::<&Body>(entity)
            .map(|body| (body.width, body.height))
            .unwrap_or((0.0, 0.0));
        map.is_wall_at(at.x, at.y, width, height)
    }

    fn move_to(entity: Entity, destination: MoveTarget, ctx: &mut TickContext<'_>) -> EngineResult<()> {
        if ctx.services.map.is_none() {
            return Ok(());
        }
        let to = match destination {
            MoveTarget::Point(point) => point,
            MoveTarget::Entity(other) => match ctx.position_of(other) {
                Some(point) => point,
                None => return Ok(()),
            },
        };
        let outcome = MovementEngine::move_entity_towards(entity, to, ctx)?;
        tracing::trace!(?entity, ?outcome, "moved");
        Ok(())
    }
}

/// Lands teleport strikes once their animation has finished.
#[derive(Default)]
pub struct AiSystem;

impl AiSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Subsystem for AiSystem {
    fn compute(&mut self, ctx: &mut TickContext<'_>) -> EngineResult<()> {
        let waiting: Vec<(Entity, PendingStrike)> = ctx
            .world
            .query::<&Brain>()
            .iter()
            .filter_map(|(entity, brain)| brain.pending.map(|strike| (entity, strike)))
            .collect();

        for (entity, strike) in waiting {
            let finished = ctx
                .services
                .vfx
                .as_ref()
                .is_none_or(|vfx| vfx.is_finished(strike.vfx));
            if !finished {
                continue;
            }
            if let Ok(mut brain) = ctx.world.get::<&mut Brain>(entity) {
                brain.pending = None;
            }
            if let Err(err) = AiResolver::land_strike(entity, strike, ctx) {
                tracing::warn!(?entity, "teleport strike failed: {err}");
            }
        }
        Ok(())
    }
}
