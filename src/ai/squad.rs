//! Named groups of AI units sharing a strategy.

use hecs::Entity;
use std::collections::BTreeMap;
use strum::{Display, EnumIter, EnumString};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum Strategy {
    /// Close in and attack whenever possible.
    #[default]
    Aggressive,
    /// Hold position until the target comes within the leash.
    Defensive,
    /// Strike, then back off while the attack recovers.
    Skirmish,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Squad {
    pub id: String,
    pub strategy: Strategy,
    members: Vec<Entity>,
}

impl Squad {
    fn new(id: &str, strategy: Strategy) -> Self {
        Self {
            id: id.to_string(),
            strategy,
            members: Vec::new(),
        }
    }

    pub fn members(&self) -> &[Entity] {
        &self.members
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.members.contains(&entity)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SquadRegistry {
    squads: BTreeMap<String, Squad>,
}

impl SquadRegistry {
    /// Create the squad `id`, or return the existing one untouched.
    pub fn create_group(&mut self, id: &str, strategy: Strategy) -> &mut Squad {
        self.squads.entry(id.to_string()).or_insert_with(|| {
            tracing::debug!(squad = id, %strategy, "squad created");
            Squad::new(id, strategy)
        })
    }

    /// Returns false when the squad does not exist.
    pub fn add_member(&mut self, id: &str, entity: Entity) -> bool {
        let Some(squad) = self.squads.get_mut(id) else {
            return false;
        };
        if !squad.contains(entity) {
            squad.members.push(entity);
        }
        true
    }

    pub fn remove_member(&mut self, id: &str, entity: Entity) -> bool {
        let Some(squad) = self.squads.get_mut(id) else {
            return false;
        };
        let before = squad.members.len();
        squad.members.retain(|&member| member != entity);
        squad.members.len() != before
    }

    pub fn get(&self, id: &str) -> Option<&Squad> {
        self.squads.get(id)
    }

    /// First squad listing `entity`.
    pub fn squad_of(&self, entity: Entity) -> Option<&Squad> {
        self.squads.values().find(|squad| squad.contains(entity))
    }

    pub fn strategy_of(&self, entity: Entity) -> Strategy {
        self.squad_of(entity)
            .map(|squad| squad.strategy)
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.squads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.squads.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hecs::World;
    use std::str::FromStr;

    #[test]
    fn create_group_is_idempotent() {
        let mut squads = SquadRegistry::default();
        squads.create_group("pack", Strategy::Skirmish);
        let again = squads.create_group("pack", Strategy::Defensive);
        assert_eq!(again.strategy, Strategy::Skirmish);
        assert_eq!(squads.len(), 1);
    }

    #[test]
    fn membership_round_trip() {
        let mut world = World::new();
        let wolf = world.spawn(());
        let cub = world.spawn(());
        let mut squads = SquadRegistry::default();
        squads.create_group("pack", Strategy::Skirmish);

        assert!(squads.add_member("pack", wolf));
        assert!(squads.add_member("pack", wolf));
        assert!(squads.add_member("pack", cub));
        assert!(!squads.add_member("nowhere", cub));
        assert_eq!(squads.get("pack").unwrap().members(), &[wolf, cub]);
        assert_eq!(squads.strategy_of(cub), Strategy::Skirmish);

        assert!(squads.remove_member("pack", wolf));
        assert!(!squads.remove_member("pack", wolf));
        assert_eq!(squads.strategy_of(wolf), Strategy::Aggressive);
    }

    #[test]
    fn strategy_parses_from_snake_case() {
        assert_eq!(Strategy::from_str("defensive").unwrap(), Strategy::Defensive);
        assert!(Strategy::from_str("berserk").is_err());
    }
}
