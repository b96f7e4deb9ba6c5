//! Builders and collaborator doubles for encounter-level tests.

#![allow(dead_code)]

use hecs::Entity;
use skirmish::ai::{Action, Brain, DecisionPolicy, ScriptedPolicy};
use skirmish::config::EngineConfig;
use skirmish::ecs::{Faction, UnitBuilder};
use skirmish::map::GridMap;
use skirmish::services::{MotionDriver, ProjectileLauncher, ProjectileRequest, SpeechBubbles};
use skirmish::vfx::VfxEngine;
use skirmish::{Encounter, ecs::Position};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Shared log of what a collaborator double was asked to do.
pub type Calls<T> = Rc<RefCell<Vec<T>>>;

#[derive(Default, Clone)]
pub struct RecordingLauncher {
    pub launched: Calls<ProjectileRequest>,
}

impl ProjectileLauncher for RecordingLauncher {
    fn launch(&mut self, request: ProjectileRequest) {
        self.launched.borrow_mut().push(request);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dash {
    pub entity: Entity,
    pub from: Position,
    pub toward: Position,
    pub max_tiles: u32,
}

#[derive(Default, Clone)]
pub struct RecordingMotion {
    pub dashes: Calls<Dash>,
}

impl MotionDriver for RecordingMotion {
    fn dash(&mut self, entity: Entity, from: Position, toward: Position, max_tiles: u32) {
        self.dashes.borrow_mut().push(Dash {
            entity,
            from,
            toward,
            max_tiles,
        });
    }
}

#[derive(Default, Clone)]
pub struct RecordingSpeech {
    pub lines: Calls<(Entity, String)>,
}

impl SpeechBubbles for RecordingSpeech {
    fn say(&mut self, entity: Entity, text: &str) {
        self.lines.borrow_mut().push((entity, text.to_string()));
    }
}

/// 10 × 6 open room with a one-tile wall border, 32-unit tiles.
pub const ROOM: [&str; 6] = [
    "##########",
    "#........#",
    "#........#",
    "#........#",
    "#........#",
    "##########",
];

/// Builds an encounter with the standard subsystems and a chosen set of
/// collaborators.
pub struct TestEncounterBuilder {
    encounter: Encounter,
}

impl TestEncounterBuilder {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            encounter: Encounter::standard(config, 42),
        }
    }

    pub fn map(mut self, rows: &[&str]) -> Self {
        let tile = self.encounter.resources.config.tile_size;
        self.encounter.services.map = Some(Box::new(GridMap::from_rows(rows, tile)));
        self
    }

    pub fn room(self) -> Self {
        self.map(&ROOM)
    }

    pub fn vfx(mut self) -> Self {
        self.encounter.services.vfx = Some(Box::new(VfxEngine::new()));
        self
    }

    pub fn projectiles(mut self, launcher: RecordingLauncher) -> Self {
        self.encounter.services.projectiles = Some(Box::new(launcher));
        self
    }

    pub fn motion(mut self, motion: RecordingMotion) -> Self {
        self.encounter.services.motion = Some(Box::new(motion));
        self
    }

    pub fn speech(mut self, speech: RecordingSpeech) -> Self {
        self.encounter.services.speech = Some(Box::new(speech));
        self
    }

    pub fn build(self) -> Encounter {
        self.encounter
    }
}

pub fn spawn_player(encounter: &mut Encounter, x: f32, y: f32) -> Entity {
    UnitBuilder::new("Hero", Faction::Player)
        .at(x, y)
        .spawn(&mut encounter.world, &mut encounter.resources.rosters)
}

/// Spawn a unit driven by `policy`.
pub fn spawn_ai(
    encounter: &mut Encounter,
    name: &str,
    faction: Faction,
    at: (f32, f32),
    policy: impl DecisionPolicy + Send + Sync + 'static,
) -> Entity {
    UnitBuilder::new(name, faction)
        .at(at.0, at.1)
        .hostile(faction != Faction::Player)
        .brain(Brain::new(policy))
        .spawn(&mut encounter.world, &mut encounter.resources.rosters)
}

/// Spawn a unit with a scripted policy and hand back its call counter.
pub fn spawn_scripted(
    encounter: &mut Encounter,
    name: &str,
    faction: Faction,
    script: Vec<Action>,
) -> (Entity, Arc<AtomicUsize>) {
    let policy = ScriptedPolicy::new(script);
    let calls = policy.counter();
    let entity = spawn_ai(encounter, name, faction, (64.0, 64.0), policy);
    (entity, calls)
}

pub fn calls(counter: &Arc<AtomicUsize>) -> usize {
    counter.load(Ordering::Relaxed)
}

/// Event type names of everything published since the last drain.
pub fn drain_types(encounter: &mut Encounter) -> Vec<&'static str> {
    encounter
        .drain_events()
        .iter()
        .map(|event| event.event_type())
        .collect()
}
