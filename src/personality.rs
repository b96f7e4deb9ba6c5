//! Personality traits: permanent stat bonuses and granted skills.

use crate::ecs::Stats;
use crate::stats::StatEngine;
use error::EngineResult;
use hecs::{Entity, World};
use items::Attributes;
use serde::Deserialize;
use std::collections::BTreeMap;

/// One trait as listed under `[traits.<id>]`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TraitDef {
    pub stats: Attributes,
    pub skills: Vec<String>,
}

/// Every known trait by id (MBTI archetypes and plain traits alike).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct TraitBook {
    traits: BTreeMap<String, TraitDef>,
}

impl TraitBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_trait(mut self, id: &str, def: TraitDef) -> Self {
        self.traits.insert(id.to_string(), def);
        self
    }

    pub fn get(&self, id: &str) -> Option<&TraitDef> {
        self.traits.get(id)
    }

    pub fn len(&self) -> usize {
        self.traits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.traits.is_empty()
    }
}

/// Traits applied to a unit and the skills they granted, in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Personality {
    pub traits: Vec<String>,
    pub skills: Vec<String>,
}

/// Apply `ids` to `entity`: stat deltas go into the base attributes, skills
/// are granted through its `Personality`. Returns the ids the book does not
/// know; those are skipped.
pub fn apply_traits(
    world: &mut World,
    entity: Entity,
    ids: &[&str],
    book: &TraitBook,
) -> EngineResult<Vec<String>> {
    let mut unknown = Vec::new();
    let mut personality = world
        .get::<&Personality>(entity)
        .map(|p| (*p).clone())
        .unwrap_or_default();

    {
        let mut stats = world.get::<&mut Stats>(entity)?;
        for &id in ids {
            let Some(def) = book.get(id) else {
                tracing::warn!(?entity, trait_id = id, "unknown trait");
                unknown.push(id.to_string());
                continue;
            };
            stats.base.merge(&def.stats);
            personality.traits.push(id.to_string());
            personality.skills.extend(def.skills.iter().cloned());
            tracing::debug!(?entity, trait_id = id, "trait applied");
        }
    }

    world.insert_one(entity, personality)?;
    StatEngine::recalculate_stats(world, entity)?;
    Ok(unknown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::{Faction, Rosters, UnitBuilder};
    use items::StatKind;
    use pretty_assertions::assert_eq;

    fn book() -> TraitBook {
        TraitBook::new()
            .with_trait(
                "ISTJ",
                TraitDef {
                    stats: Attributes::new().with(StatKind::Endurance, 2),
                    skills: vec!["shield_wall".into()],
                },
            )
            .with_trait(
                "strong",
                TraitDef {
                    stats: Attributes::new().with(StatKind::Strength, 3),
                    skills: vec![],
                },
            )
    }

    #[test]
    fn traits_raise_base_and_grant_skills() {
        let mut world = World::new();
        let mut rosters = Rosters::default();
        let squire = UnitBuilder::new("Squire", Faction::Mercenary)
            .stats(Attributes::new().with(StatKind::Strength, 10))
            .spawn(&mut world, &mut rosters);

        let unknown = apply_traits(&mut world, squire, &["ISTJ", "ENTP?", "strong"], &book()).unwrap();

        assert_eq!(unknown, vec!["ENTP?".to_string()]);
        assert_eq!(StatEngine::get_stat(&world, squire, StatKind::Strength), 13);
        assert_eq!(StatEngine::get_stat(&world, squire, StatKind::Endurance), 2);
        assert_eq!(
            *world.get::<&Personality>(squire).unwrap(),
            Personality {
                traits: vec!["ISTJ".into(), "strong".into()],
                skills: vec!["shield_wall".into()],
            }
        );
    }

    #[test]
    fn applying_twice_stacks() {
        let mut world = World::new();
        let mut rosters = Rosters::default();
        let brute = UnitBuilder::new("Brute", Faction::Monster).spawn(&mut world, &mut rosters);

        apply_traits(&mut world, brute, &["strong"], &book()).unwrap();
        apply_traits(&mut world, brute, &["strong"], &book()).unwrap();

        assert_eq!(world.get::<&Stats>(brute).unwrap().base.get(StatKind::Strength), 6);
        assert_eq!(world.get::<&Personality>(brute).unwrap().traits.len(), 2);
    }
}
