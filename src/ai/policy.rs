//! Reference decision policies.

use super::squad::Strategy;
use super::{Action, DecisionPolicy};
use crate::ecs::{Body, Cooldowns, Position, Resources};
use hecs::{Entity, World};
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Walks up to the player and attacks when in reach.
#[derive(Debug, Clone)]
pub struct ChaserPolicy {
    /// Attack reach in tiles, measured between top-left anchors.
    pub reach_tiles: f32,
    /// Defensive squads ignore the player beyond this many tiles.
    pub leash_tiles: f32,
}

impl Default for ChaserPolicy {
    fn default() -> Self {
        Self {
            reach_tiles: 1.5,
            leash_tiles: 6.0,
        }
    }
}

impl DecisionPolicy for ChaserPolicy {
    fn decide(&mut self, me: Entity, world: &World, resources: &Resources) -> Action {
        let Some(player) = resources.rosters.player else {
            return Action::Idle;
        };
        let (Ok(my_pos), Ok(player_pos)) = (
            world.get::<&Position>(me).map(|p| *p),
            world.get::<&Position>(player).map(|p| *p),
        ) else {
            return Action::Idle;
        };

        let tile = resources.tile_size;
        let distance = my_pos.distance_to(&player_pos);
        let strategy = resources.squads.strategy_of(me);

        if strategy == Strategy::Defensive && distance > self.leash_tiles * tile {
            return Action::Idle;
        }

        if distance <= self.reach_tiles * tile {
            let ready = world
                .get::<&Cooldowns>(me)
                .map(|cds| cds.attack_ready())
                .unwrap_or(false);
            if ready {
                return Action::Attack { target: player };
            }
            if strategy == Strategy::Skirmish && distance > 0.0 {
                let step = world.get::<&Body>(me).map(|b| b.width).unwrap_or(tile);
                let away_x = my_pos.x + (my_pos.x - player_pos.x) / distance * step;
                let away_y = my_pos.y + (my_pos.y - player_pos.y) / distance * step;
                return Action::move_to(away_x, away_y);
            }
            return Action::Idle;
        }

        Action::follow(player)
    }

    fn name(&self) -> &str {
        "chaser"
    }
}

/// Plays back a fixed list of actions, then idles. Counts consultations.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPolicy {
    script: VecDeque<Action>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedPolicy {
    pub fn new(script: impl IntoIterator<Item = Action>) -> Self {
        Self {
            script: script.into_iter().collect(),
            calls: Arc::default(),
        }
    }

    /// Shared counter of `decide` calls, readable after the policy moved
    /// into a `Brain`.
    pub fn counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

impl DecisionPolicy for ScriptedPolicy {
    fn decide(&mut self, _me: Entity, _world: &World, _resources: &Resources) -> Action {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.script.pop_front().unwrap_or_default()
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::MoveTarget;
    use crate::ecs::{Faction, UnitBuilder};

    fn arena() -> (World, Resources, Entity) {
        let mut world = World::new();
        let mut resources = Resources::default();
        let hero = UnitBuilder::new("Hero", Faction::Player)
            .at(0.0, 0.0)
            .spawn(&mut world, &mut resources.rosters);
        (world, resources, hero)
    }

    #[test]
    fn chaser_follows_then_attacks() {
        let (mut world, mut resources, hero) = arena();
        let far = UnitBuilder::new("Orc", Faction::Monster)
            .at(300.0, 0.0)
            .spawn(&mut world, &mut resources.rosters);
        let near = UnitBuilder::new("Orc", Faction::Monster)
            .at(30.0, 0.0)
            .spawn(&mut world, &mut resources.rosters);

        let mut policy = ChaserPolicy::default();
        assert_eq!(
            policy.decide(far, &world, &resources),
            Action::Move {
                destination: MoveTarget::Entity(hero)
            }
        );
        assert_eq!(policy.decide(near, &world, &resources), Action::Attack { target: hero });

        world.get::<&mut Cooldowns>(near).unwrap().attack = 5;
        assert_eq!(policy.decide(near, &world, &resources), Action::Idle);
    }

    #[test]
    fn defensive_squads_hold_beyond_the_leash() {
        let (mut world, mut resources, _hero) = arena();
        let sentry = UnitBuilder::new("Sentry", Faction::Monster)
            .at(400.0, 0.0)
            .spawn(&mut world, &mut resources.rosters);
        resources.squads.create_group("gate", Strategy::Defensive);
        resources.squads.add_member("gate", sentry);

        assert_eq!(ChaserPolicy::default().decide(sentry, &world, &resources), Action::Idle);
    }

    #[test]
    fn skirmishers_back_off_while_recovering() {
        let (mut world, mut resources, _hero) = arena();
        let archer = UnitBuilder::new("Archer", Faction::Monster)
            .at(32.0, 0.0)
            .spawn(&mut world, &mut resources.rosters);
        world.get::<&mut Cooldowns>(archer).unwrap().attack = 10;
        resources.squads.create_group("raiders", Strategy::Skirmish);
        resources.squads.add_member("raiders", archer);

        match ChaserPolicy::default().decide(archer, &world, &resources) {
            Action::Move {
                destination: MoveTarget::Point(to),
            } => assert!(to.x > 32.0),
            other => panic!("expected a retreat, got {other:?}"),
        }
    }

    #[test]
    fn reach_is_measured_in_the_map_tiles() {
        use crate::ecs::TickContext;
        use crate::map::GridMap;
        use crate::services::Services;

        let (mut world, mut resources, hero) = arena();
        let orc = UnitBuilder::new("Orc", Faction::Monster)
            .at(40.0, 0.0)
            .spawn(&mut world, &mut resources.rosters);
        let mut services = Services::default().with_map(GridMap::walled_room(8, 8, 16.0));
        let ctx = TickContext::new(&mut world, &mut resources, &mut services);

        // 40 units is 1.25 configured tiles but 2.5 map tiles
        assert_eq!(ctx.tile_size(), 16.0);
        assert_eq!(
            ChaserPolicy::default().decide(orc, &*ctx.world, &*ctx.resources),
            Action::follow(hero)
        );
    }

    #[test]
    fn scripted_policy_counts_calls() {
        let (world, resources, hero) = arena();
        let mut policy = ScriptedPolicy::new([Action::Attack { target: hero }]);
        let calls = policy.counter();

        assert_eq!(policy.decide(hero, &world, &resources), Action::Attack { target: hero });
        assert_eq!(policy.decide(hero, &world, &resources), Action::Idle);
        assert_eq!(calls.load(Ordering::Relaxed), 2);
    }
}
