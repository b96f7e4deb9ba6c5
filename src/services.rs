//! Collaborators the engines talk to but do not own.
//!
//! The map, visual effects, projectiles, motion tweens and speech bubbles
//! all live in the host game. Each is optional: a missing collaborator makes
//! the engines skip the side effect that depends on it.

use crate::ecs::Position;
use crate::event_bus::EventBus;
use hecs::Entity;
use rand::rngs::StdRng;

/// Size of a unit's footprint in whole tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Footprint {
    pub width: u32,
    pub height: u32,
}

impl Footprint {
    /// Tiles needed to cover a `width` × `height` box.
    pub fn covering(width: f32, height: f32, tile_size: f32) -> Self {
        let tiles = |len: f32| ((len / tile_size).ceil().max(1.0)) as u32;
        Self {
            width: tiles(width),
            height: tiles(height),
        }
    }
}

pub trait MapQuery {
    fn tile_size(&self) -> f32;

    /// Whether the box with top-left corner (x, y) touches a wall tile.
    fn is_wall_at(&self, x: f32, y: f32, width: f32, height: f32) -> bool;

    /// A random world position whose `footprint` lies entirely on floor.
    fn random_floor_position(&self, footprint: Footprint, rng: &mut StdRng) -> Option<Position>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VfxHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VfxKind {
    Teleport,
    Impact,
    Cast,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VfxRequest {
    pub kind: VfxKind,
    pub entity: Option<Entity>,
    pub at: Position,
    pub life_ticks: u32,
}

pub trait VisualEffects {
    fn spawn(&mut self, request: VfxRequest) -> VfxHandle;

    /// True once the effect behind `handle` has finished playing.
    fn is_finished(&self, handle: VfxHandle) -> bool;

    /// Advance every running effect by one tick.
    fn step(&mut self);

    /// Effects still playing.
    fn active_count(&self) -> usize;
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectileRequest {
    pub shooter: Entity,
    pub target: Entity,
    pub from: Position,
    pub to: Position,
    pub weapon: String,
}

/// Spawns projectiles; the launcher owns flight and eventual hit resolution.
pub trait ProjectileLauncher {
    fn launch(&mut self, request: ProjectileRequest);
}

/// Animated displacement such as dashes and knockbacks.
pub trait MotionDriver {
    fn dash(&mut self, entity: Entity, from: Position, toward: Position, max_tiles: u32);
}

pub trait SpeechBubbles {
    fn say(&mut self, entity: Entity, text: &str);
}

/// Event bus plus every optional collaborator.
#[derive(Default)]
pub struct Services {
    pub events: EventBus,
    pub map: Option<Box<dyn MapQuery>>,
    pub vfx: Option<Box<dyn VisualEffects>>,
    pub projectiles: Option<Box<dyn ProjectileLauncher>>,
    pub motion: Option<Box<dyn MotionDriver>>,
    pub speech: Option<Box<dyn SpeechBubbles>>,
}

impl Services {
    pub fn new(events: EventBus) -> Self {
        Self {
            events,
            ..Self::default()
        }
    }

    pub fn with_map(mut self, map: impl MapQuery + 'static) -> Self {
        self.map = Some(Box::new(map));
        self
    }

    pub fn with_vfx(mut self, vfx: impl VisualEffects + 'static) -> Self {
        self.vfx = Some(Box::new(vfx));
        self
    }

    pub fn with_projectiles(mut self, projectiles: impl ProjectileLauncher + 'static) -> Self {
        self.projectiles = Some(Box::new(projectiles));
        self
    }

    pub fn with_motion(mut self, motion: impl MotionDriver + 'static) -> Self {
        self.motion = Some(Box::new(motion));
        self
    }

    pub fn with_speech(mut self, speech: impl SpeechBubbles + 'static) -> Self {
        self.speech = Some(Box::new(speech));
        self
    }
}
