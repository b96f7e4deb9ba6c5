//! Direct-vector movement with wall sliding and a stuck-unit escape hatch.
//!
//! There is no path search: a unit heads straight for its target, slides
//! along an axis when the diagonal is blocked, and after too many blocked
//! ticks in a row is dropped onto a random free floor spot instead.

use crate::ecs::{Body, Equipment, Motion, Position, Resources, TickContext};
use crate::services::{Footprint, MapQuery};
use error::{EngineError, EngineResult};
use hecs::{Entity, World};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// What one call to the movement engine did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MoveOutcome {
    /// Already within one body width of the target.
    Arrived,
    /// Target was within one tick of travel and free; snapped onto it.
    Snapped,
    /// Target was within one tick of travel but occupied.
    Held,
    Moved(Position),
    Slid(Axis, Position),
    Blocked { stuck_ticks: u32 },
    /// Stuck for too long; teleported to a free floor position.
    Relocated(Position),
}

pub struct MovementEngine;

impl MovementEngine {
    /// Advance `entity` one tick toward `target`.
    pub fn move_entity_towards(
        entity: Entity,
        target: Position,
        ctx: &mut TickContext<'_>,
    ) -> EngineResult<MoveOutcome> {
        let TickContext {
            world,
            resources,
            services,
        } = ctx;
        let map = services
            .map
            .as_deref()
            .ok_or(EngineError::MissingCollaborator("map"))?;
        Self::step(world, resources, map, entity, target)
    }

    fn step(
        world: &mut World,
        resources: &mut Resources,
        map: &dyn MapQuery,
        entity: Entity,
        target: Position,
    ) -> EngineResult<MoveOutcome> {
        let pos = *world.get::<&Position>(entity)?;
        let body = *world.get::<&Body>(entity)?;
        let distance = pos.distance_to(&target);

        if distance < body.width {
            set_stuck(world, entity, 0);
            return Ok(MoveOutcome::Arrived);
        }

        if distance <= body.speed {
            let outcome = if is_occupied(world, resources, map, entity, target) {
                MoveOutcome::Held
            } else {
                set_position(world, entity, target)?;
                MoveOutcome::Snapped
            };
            set_stuck(world, entity, 0);
            return Ok(outcome);
        }

        let config = &resources.config;
        let bonus = (distance / map.tile_size() / 2.0)
            .floor()
            .min(config.max_speed_bonus);
        let speed = body.speed + bonus;
        let vx = (target.x - pos.x) / distance * speed;
        let vy = (target.y - pos.y) / distance * speed;
        let candidate = Position::new(pos.x + vx, pos.y + vy);

        if !is_occupied(world, resources, map, entity, candidate) {
            set_position(world, entity, candidate)?;
            set_stuck(world, entity, 0);
            return Ok(MoveOutcome::Moved(candidate));
        }

        let along_x = Position::new(candidate.x, pos.y);
        if !is_occupied(world, resources, map, entity, along_x) {
            set_position(world, entity, along_x)?;
            set_stuck(world, entity, 0);
            return Ok(MoveOutcome::Slid(Axis::X, along_x));
        }

        let along_y = Position::new(pos.x, candidate.y);
        if !is_occupied(world, resources, map, entity, along_y) {
            set_position(world, entity, along_y)?;
            set_stuck(world, entity, 0);
            return Ok(MoveOutcome::Slid(Axis::Y, along_y));
        }

        let stuck_ticks = stuck_ticks(world, entity) + 1;
        if stuck_ticks <= resources.config.stuck_threshold {
            set_stuck(world, entity, stuck_ticks);
            return Ok(MoveOutcome::Blocked { stuck_ticks });
        }

        set_stuck(world, entity, 0);
        let footprint = Footprint::covering(body.width, body.height, map.tile_size());
        match map.random_floor_position(footprint, &mut resources.rng) {
            Some(safe) => {
                tracing::debug!(?entity, x = safe.x, y = safe.y, "relocating stuck unit");
                set_position(world, entity, safe)?;
                Ok(MoveOutcome::Relocated(safe))
            }
            None => {
                tracing::warn!(?entity, "stuck unit has no free floor to escape to");
                Ok(MoveOutcome::Blocked { stuck_ticks })
            }
        }
    }

    /// Whether `entity` may not stand at `at`.
    pub fn is_occupied(ctx: &TickContext<'_>, entity: Entity, at: Position) -> bool {
        match ctx.services.map.as_deref() {
            Some(map) => is_occupied(&*ctx.world, &*ctx.resources, map, entity, at),
            None => false,
        }
    }
}

/// Walls always block. Units only block each other when both carry a
/// shield in the off-hand.
fn is_occupied(
    world: &World,
    resources: &Resources,
    map: &dyn MapQuery,
    entity: Entity,
    at: Position,
) -> bool {
    let Ok(body) = world.get::<&Body>(entity).map(|body| *body) else {
        return true;
    };
    if map.is_wall_at(at.x, at.y, body.width, body.height) {
        return true;
    }
    if !has_shield(world, entity) {
        return false;
    }

    let rosters = &resources.rosters;
    let others = rosters
        .player
        .into_iter()
        .chain(rosters.mercenaries.iter().copied())
        .chain(rosters.monsters.iter().copied());

    for other in others {
        if other == entity || !has_shield(world, other) {
            continue;
        }
        let (Ok(other_pos), Ok(other_body)) =
            (world.get::<&Position>(other), world.get::<&Body>(other))
        else {
            continue;
        };
        if at.x < other_pos.x + other_body.width
            && at.x + body.width > other_pos.x
            && at.y < other_pos.y + other_body.height
            && at.y + body.height > other_pos.y
        {
            return true;
        }
    }
    false
}

fn has_shield(world: &World, entity: Entity) -> bool {
    world
        .get::<&Equipment>(entity)
        .map(|equipment| equipment.has_shield())
        .unwrap_or(false)
}

fn set_position(world: &mut World, entity: Entity, to: Position) -> EngineResult<()> {
    *world.get::<&mut Position>(entity)? = to;
    Ok(())
}

fn stuck_ticks(world: &World, entity: Entity) -> u32 {
    world
        .get::<&Motion>(entity)
        .map(|motion| motion.stuck_ticks)
        .unwrap_or(0)
}

fn set_stuck(world: &mut World, entity: Entity, ticks: u32) {
    match world.query_one_mut::<&mut Motion>(entity) {
        Ok(motion) => motion.stuck_ticks = ticks,
        Err(_) => {
            let _ = world.insert_one(entity, Motion { stuck_ticks: ticks });
        }
    }
}
