//src/items/src/stats.rs
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::{Display, EnumIter, EnumString};

/// Attribute keys shared by units, items and timed effects.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumIter,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum StatKind {
    Strength,
    Agility,
    Endurance,
    Intelligence,
    Wisdom,
    Focus,
    MaxHp,
    MaxMp,
    AttackPower,
    Defense,
    MovementSpeed,
}

/// Sparse attribute table. Missing keys read as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(BTreeMap<StatKind, i32>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy for item and effect tables.
    pub fn with(mut self, kind: StatKind, value: i32) -> Self {
        self.0.insert(kind, value);
        self
    }

    pub fn get(&self, kind: StatKind) -> i32 {
        self.0.get(&kind).copied().unwrap_or(0)
    }

    pub fn set(&mut self, kind: StatKind, value: i32) {
        self.0.insert(kind, value);
    }

    /// Add a delta to one attribute, creating it if absent.
    pub fn add(&mut self, kind: StatKind, delta: i32) {
        *self.0.entry(kind).or_insert(0) += delta;
    }

    /// Fold every delta of `other` into `self`.
    pub fn merge(&mut self, other: &Attributes) {
        for (kind, delta) in other.iter() {
            self.add(kind, delta);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (StatKind, i32)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(StatKind, i32)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (StatKind, i32)>>(iter: I) -> Self {
        let mut attrs = Attributes::new();
        for (kind, delta) in iter {
            attrs.add(kind, delta);
        }
        attrs
    }
}
