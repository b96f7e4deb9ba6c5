//src/items/src/lib.rs
//! Equipment model: items with tags and attribute deltas, the slots a unit
//! can fill, and weapon-bound skills.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::{Display, EnumIter, EnumString};

pub mod stats;
pub mod weapon;

pub use crate::stats::{Attributes, StatKind};
pub use crate::weapon::{WeaponSkill, WeaponSkillKind, WeaponSkills};

/// Tags drive behaviour elsewhere: `Bow`/`Ranged` switch attacks to
/// projectiles, `Shield` in the off-hand enables shield-wall collision.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ItemTag {
    Weapon,
    Melee,
    Ranged,
    Bow,
    Shield,
    Armor,
    Accessory,
}

/// Equipment slots, iterated in declaration order.
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
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EquipSlot {
    MainHand,
    OffHand,
    Armor,
    Helmet,
    Gloves,
    Boots,
    Accessory1,
    Accessory2,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    #[serde(default)]
    pub tags: Vec<ItemTag>,
    /// Attribute deltas granted while equipped.
    #[serde(default)]
    pub stats: Attributes,
    /// Present only on weapons that carry their own skills.
    #[serde(default)]
    pub weapon_skills: Option<WeaponSkills>,
}

impl Item {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            tags: Vec::new(),
            stats: Attributes::new(),
            weapon_skills: None,
        }
    }

    pub fn with_tag(mut self, tag: ItemTag) -> Self {
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
        self
    }

    pub fn with_stat(mut self, kind: StatKind, delta: i32) -> Self {
        self.stats.add(kind, delta);
        self
    }

    pub fn with_skills(mut self, skills: WeaponSkills) -> Self {
        self.weapon_skills = Some(skills);
        self
    }

    pub fn has_tag(&self, tag: ItemTag) -> bool {
        self.tags.contains(&tag)
    }

    /// Bow or generic ranged weapons fire projectiles instead of striking.
    pub fn is_ranged(&self) -> bool {
        self.has_tag(ItemTag::Bow) || self.has_tag(ItemTag::Ranged)
    }
}

/// Items currently worn by a unit, one per slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    slots: BTreeMap<EquipSlot, Item>,
}

impl Equipment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put `item` into `slot`, handing back whatever was there.
    pub fn equip(&mut self, slot: EquipSlot, item: Item) -> Option<Item> {
        self.slots.insert(slot, item)
    }

    pub fn unequip(&mut self, slot: EquipSlot) -> Option<Item> {
        self.slots.remove(&slot)
    }

    pub fn get(&self, slot: EquipSlot) -> Option<&Item> {
        self.slots.get(&slot)
    }

    pub fn get_mut(&mut self, slot: EquipSlot) -> Option<&mut Item> {
        self.slots.get_mut(&slot)
    }

    pub fn main_hand(&self) -> Option<&Item> {
        self.get(EquipSlot::MainHand)
    }

    pub fn main_hand_mut(&mut self) -> Option<&mut Item> {
        self.get_mut(EquipSlot::MainHand)
    }

    pub fn off_hand(&self) -> Option<&Item> {
        self.get(EquipSlot::OffHand)
    }

    pub fn has_shield(&self) -> bool {
        self.off_hand().is_some_and(|item| item.has_tag(ItemTag::Shield))
    }

    /// Equipped items in slot order.
    pub fn items(&self) -> impl Iterator<Item = (EquipSlot, &Item)> + '_ {
        self.slots.iter().map(|(slot, item)| (*slot, item))
    }

    pub fn items_mut(&mut self) -> impl Iterator<Item = &mut Item> + '_ {
        self.slots.values_mut()
    }

    /// Sum of attribute deltas across every equipped item.
    pub fn total_stats(&self) -> Attributes {
        let mut total = Attributes::new();
        for item in self.slots.values() {
            total.merge(&item.stats);
        }
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shield_only_counts_in_off_hand() {
        let shield = Item::new("Buckler").with_tag(ItemTag::Shield);
        let mut gear = Equipment::new();
        gear.equip(EquipSlot::MainHand, shield.clone());
        assert!(!gear.has_shield());

        gear.equip(EquipSlot::OffHand, shield);
        assert!(gear.has_shield());
    }

    #[test]
    fn total_stats_sums_all_slots() {
        let mut gear = Equipment::new();
        gear.equip(
            EquipSlot::MainHand,
            Item::new("Sword").with_stat(StatKind::Strength, 3),
        );
        gear.equip(
            EquipSlot::Armor,
            Item::new("Mail")
                .with_stat(StatKind::Strength, 1)
                .with_stat(StatKind::Defense, 4),
        );

        let total = gear.total_stats();
        assert_eq!(total.get(StatKind::Strength), 4);
        assert_eq!(total.get(StatKind::Defense), 4);
    }

    #[test]
    fn equip_returns_replaced_item() {
        let mut gear = Equipment::new();
        assert!(gear.equip(EquipSlot::MainHand, Item::new("Dagger")).is_none());
        let old = gear.equip(EquipSlot::MainHand, Item::new("Bow").with_tag(ItemTag::Bow));
        assert_eq!(old.map(|i| i.name), Some("Dagger".to_string()));
        assert!(gear.main_hand().is_some_and(Item::is_ranged));
    }
}
