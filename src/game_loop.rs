//! Encounter state and the per-tick driver.
//!
//! One tick:
//! - advance the clock
//! - run every subsystem's compute step in registration order
//! - run every draw step

use crate::ai::AiSystem;
use crate::config::EngineConfig;
use crate::ecs::{Resources, TickContext};
use crate::event_bus::{EventBus, GameEvent};
use crate::services::Services;
use crate::stats::{CooldownSystem, StatSystem};
use crate::systems::{Orchestrator, TickReport};
use crate::turn_system::TurnSystem;
use crate::vfx::VfxSystem;
use hecs::World;

/// Names of the standard subsystems, in execution order.
pub mod names {
    pub const TURN: &str = "turn";
    pub const AI: &str = "ai";
    pub const STATS: &str = "stats";
    pub const COOLDOWNS: &str = "cooldowns";
    pub const VFX: &str = "vfx";
}

/// Everything that makes up one running encounter.
pub struct Encounter {
    pub world: World,
    pub resources: Resources,
    pub services: Services,
    pub orchestrator: Orchestrator,
}

impl Encounter {
    /// Empty encounter with no subsystems registered.
    pub fn new(config: EngineConfig, seed: u64) -> Self {
        let events = EventBus::with_history_size(config.event_history);
        Self {
            world: World::new(),
            resources: Resources::new(config, seed),
            services: Services::new(events),
            orchestrator: Orchestrator::new(),
        }
    }

    /// Encounter with the standard subsystems registered.
    pub fn standard(config: EngineConfig, seed: u64) -> Self {
        let mut encounter = Self::new(config, seed);
        encounter.register_standard_subsystems();
        encounter
    }

    pub fn register_standard_subsystems(&mut self) {
        self.orchestrator.register(names::TURN, TurnSystem::new());
        self.orchestrator.register(names::AI, AiSystem::new());
        self.orchestrator.register(names::STATS, StatSystem);
        self.orchestrator.register(names::COOLDOWNS, CooldownSystem);
        self.orchestrator.register(names::VFX, VfxSystem);
    }

    pub fn context(&mut self) -> TickContext<'_> {
        TickContext::new(&mut self.world, &mut self.resources, &mut self.services)
    }

    /// The player commits their turn; hostiles act on the next tick.
    pub fn take_turn(&mut self) {
        self.resources.turn.take_turn();
    }

    pub fn tick(&mut self) -> TickReport {
        let now = self.resources.clock.advance();
        let Self {
            world,
            resources,
            services,
            orchestrator,
        } = self;
        let mut ctx = TickContext::new(world, resources, services);
        let report = orchestrator.tick(&mut ctx);
        if !report.is_clean() {
            tracing::warn!(tick = now, ?report, "tick finished with failures");
        }
        report
    }

    pub fn run(&mut self, ticks: u64) -> Vec<TickReport> {
        (0..ticks).map(|_| self.tick()).collect()
    }

    /// Take every event published since the last drain.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.services.events.drain().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{Action, Brain, ScriptedPolicy};
    use crate::ecs::{Faction, UnitBuilder};
    use pretty_assertions::assert_eq;

    #[test]
    fn standard_order() {
        let encounter = Encounter::standard(EngineConfig::default(), 1);
        assert_eq!(
            encounter.orchestrator.names(),
            vec!["turn", "ai", "stats", "cooldowns", "vfx"]
        );
    }

    #[test]
    fn attack_cooldown_counts_down_after_the_enemy_turn() {
        let mut encounter = Encounter::standard(EngineConfig::default(), 1);
        let hero = UnitBuilder::new("Hero", Faction::Player)
            .spawn(&mut encounter.world, &mut encounter.resources.rosters);
        let rat = UnitBuilder::new("Rat", Faction::Monster)
            .attack_speed(1.5)
            .brain(Brain::new(ScriptedPolicy::new([Action::Attack { target: hero }])))
            .spawn(&mut encounter.world, &mut encounter.resources.rosters);

        encounter.take_turn();
        let report = encounter.tick();

        assert!(report.is_clean());
        assert_eq!(encounter.resources.clock.tick, 1);
        // refreshed to 40 by the attack, then one cooldown tick in the same pass
        assert_eq!(encounter.world.get::<&crate::ecs::Cooldowns>(rat).unwrap().attack, 39);
        let types: Vec<_> = encounter.drain_events().iter().map(GameEvent::event_type).collect();
        assert_eq!(types, vec!["debug", "entity_attack", "turnEnd", "playerTurnStart", "log"]);
    }
}
