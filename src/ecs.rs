//! ECS components, shared resources and the per-tick context.

use hecs::{Entity, EntityBuilder, World};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::ai::Brain;
use crate::ai::squad::SquadRegistry;
use crate::config::EngineConfig;
use crate::event_bus::GameEvent;
use crate::services::Services;
use crate::turn_system::TurnTracker;

pub use combat::{Cooldowns, Mana, Stats, StatusEffects};
pub use items::Equipment;

// Basic Components
/// Top-left corner of a unit's footprint, in world units.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Position) -> f32 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Footprint and base movement speed (world units per tick).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
    pub width: f32,
    pub height: f32,
    pub speed: f32,
}

impl Body {
    pub fn new(width: f32, height: f32, speed: f32) -> Self {
        Self {
            width,
            height,
            speed,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// +1 when facing right, -1 when facing left.
    pub fn sign(&self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Faction {
    Player,
    Mercenary,
    Monster,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Actor {
    pub name: String,
    pub faction: Faction,
    /// Mercenaries can turn hostile; monsters always are.
    pub hostile: bool,
}

impl Actor {
    pub fn new(name: &str, faction: Faction) -> Self {
        Self {
            name: name.to_string(),
            faction,
            hostile: faction == Faction::Monster,
        }
    }
}

/// Movement bookkeeping owned by the unit itself.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Motion {
    /// Consecutive ticks the movement engine failed to advance the unit.
    pub stuck_ticks: u32,
}

/// Tick counter driving effect expiry and cooldowns.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GameClock {
    pub tick: u64,
}

impl GameClock {
    pub fn advance(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }
}

/// Which manager collection owns each unit, in insertion order.
#[derive(Clone, Debug, Default)]
pub struct Rosters {
    pub player: Option<Entity>,
    pub monsters: Vec<Entity>,
    pub mercenaries: Vec<Entity>,
}

impl Rosters {
    /// Every unit the stat engine tracks: player, monsters, mercenaries.
    pub fn tracked(&self) -> Vec<Entity> {
        self.player
            .into_iter()
            .chain(self.monsters.iter().copied())
            .chain(self.mercenaries.iter().copied())
            .collect()
    }

    /// Monsters first, then mercenaries currently flagged hostile.
    pub fn hostile_units(&self, world: &World) -> Vec<Entity> {
        let hostile_mercs = self.mercenaries.iter().copied().filter(|&merc| {
            world
                .get::<&Actor>(merc)
                .map(|actor| actor.hostile)
                .unwrap_or(false)
        });
        self.monsters.iter().copied().chain(hostile_mercs).collect()
    }

    /// Forget a unit, wherever it is listed.
    pub fn remove(&mut self, entity: Entity) {
        if self.player == Some(entity) {
            self.player = None;
        }
        self.monsters.retain(|&e| e != entity);
        self.mercenaries.retain(|&e| e != entity);
    }
}

/// Global resources that are shared across systems
pub struct Resources {
    pub clock: GameClock,
    pub rosters: Rosters,
    pub turn: TurnTracker,
    pub config: EngineConfig,
    pub rng: StdRng,
    pub squads: SquadRegistry,
    /// Tile size in effect: the map's when one is wired in, else the
    /// configured one. Refreshed whenever a `TickContext` is built.
    pub tile_size: f32,
}

impl Resources {
    pub fn new(config: EngineConfig, seed: u64) -> Self {
        Self {
            clock: GameClock::default(),
            rosters: Rosters::default(),
            turn: TurnTracker::default(),
            tile_size: config.tile_size,
            config,
            rng: StdRng::seed_from_u64(seed),
            squads: SquadRegistry::default(),
        }
    }
}

impl Default for Resources {
    fn default() -> Self {
        Self::new(EngineConfig::default(), 12345)
    }
}

/// Everything a subsystem may touch during one tick.
///
/// Built fresh from the encounter each tick and dropped at its end.
pub struct TickContext<'a> {
    pub world: &'a mut World,
    pub resources: &'a mut Resources,
    pub services: &'a mut Services,
}

impl<'a> TickContext<'a> {
    pub fn new(
        world: &'a mut World,
        resources: &'a mut Resources,
        services: &'a mut Services,
    ) -> Self {
        resources.tile_size = services
            .map
            .as_ref()
            .map(|map| map.tile_size())
            .unwrap_or(resources.config.tile_size);
        Self {
            world,
            resources,
            services,
        }
    }

    pub fn now(&self) -> u64 {
        self.resources.clock.tick
    }

    pub fn is_player_turn(&self) -> bool {
        self.resources.turn.is_player_turn()
    }

    /// Tile size from the map when one is wired in, else from config.
    pub fn tile_size(&self) -> f32 {
        self.resources.tile_size
    }

    pub fn publish(&mut self, event: GameEvent) {
        self.services.events.publish(event);
    }

    pub fn name_of(&self, entity: Entity) -> String {
        self.world
            .get::<&Actor>(entity)
            .map(|actor| actor.name.clone())
            .unwrap_or_else(|_| format!("{entity:?}"))
    }

    pub fn position_of(&self, entity: Entity) -> Option<Position> {
        self.world.get::<&Position>(entity).ok().map(|pos| *pos)
    }
}

/// Assembles a unit with every component the engines expect.
pub struct UnitBuilder {
    builder: EntityBuilder,
    actor: Actor,
}

impl UnitBuilder {
    pub fn new(name: &str, faction: Faction) -> Self {
        let mut builder = EntityBuilder::new();
        builder
            .add(Position::default())
            .add(Body::new(24.0, 24.0, 2.0))
            .add(Facing::default())
            .add(Stats::default())
            .add(Equipment::new())
            .add(StatusEffects::new())
            .add(Mana::new(0))
            .add(Cooldowns::default())
            .add(Motion::default());
        Self {
            builder,
            actor: Actor::new(name, faction),
        }
    }

    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.builder.add(Position::new(x, y));
        self
    }

    pub fn body(mut self, width: f32, height: f32, speed: f32) -> Self {
        self.builder.add(Body::new(width, height, speed));
        self
    }

    pub fn facing(mut self, facing: Facing) -> Self {
        self.builder.add(facing);
        self
    }

    pub fn stats(mut self, base: items::Attributes) -> Self {
        self.builder.add(Stats::new(base));
        self
    }

    pub fn equipment(mut self, equipment: Equipment) -> Self {
        self.builder.add(equipment);
        self
    }

    pub fn mana(mut self, max: u32) -> Self {
        self.builder.add(Mana::new(max));
        self
    }

    pub fn attack_speed(mut self, attack_speed: f32) -> Self {
        self.builder.add(Cooldowns::with_attack_speed(attack_speed));
        self
    }

    pub fn hostile(mut self, hostile: bool) -> Self {
        self.actor.hostile = hostile;
        self
    }

    pub fn brain(mut self, brain: Brain) -> Self {
        self.builder.add(brain);
        self
    }

    /// Spawn the unit, derive its stats and list it in the matching roster.
    pub fn spawn(mut self, world: &mut World, rosters: &mut Rosters) -> Entity {
        let faction = self.actor.faction;
        self.builder.add(self.actor);
        let entity = world.spawn(self.builder.build());
        if let Ok((stats, equipment, effects)) =
            world.query_one_mut::<(&mut Stats, &Equipment, &StatusEffects)>(entity)
        {
            stats.recompute(Some(equipment), Some(effects));
        }
        match faction {
            Faction::Player => rosters.player = Some(entity),
            Faction::Monster => rosters.monsters.push(entity),
            Faction::Mercenary => rosters.mercenaries.push(entity),
        }
        entity
    }
}
