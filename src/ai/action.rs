use crate::ecs::Position;
use combat::SkillData;
use hecs::Entity;
use strum::{Display, EnumIter};

/// Where a move action is headed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveTarget {
    Point(Position),
    /// Follow another unit; resolved to its position on execution.
    Entity(Entity),
}

/// One decision produced by a policy, consumed once by the resolver.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Action {
    #[default]
    Idle,
    Attack {
        target: Entity,
    },
    Skill {
        skill: SkillData,
        target: Option<Entity>,
    },
    BackstabTeleport {
        target: Entity,
    },
    WeaponSkill {
        skill_id: String,
        target: Option<Entity>,
    },
    ChargeAttack {
        skill: SkillData,
        target: Entity,
    },
    Move {
        destination: MoveTarget,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum ActionKind {
    Idle,
    Attack,
    Skill,
    BackstabTeleport,
    WeaponSkill,
    ChargeAttack,
    Move,
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::Idle => ActionKind::Idle,
            Action::Attack { .. } => ActionKind::Attack,
            Action::Skill { .. } => ActionKind::Skill,
            Action::BackstabTeleport { .. } => ActionKind::BackstabTeleport,
            Action::WeaponSkill { .. } => ActionKind::WeaponSkill,
            Action::ChargeAttack { .. } => ActionKind::ChargeAttack,
            Action::Move { .. } => ActionKind::Move,
        }
    }

    pub fn move_to(x: f32, y: f32) -> Self {
        Action::Move {
            destination: MoveTarget::Point(Position::new(x, y)),
        }
    }

    pub fn follow(target: Entity) -> Self {
        Action::Move {
            destination: MoveTarget::Entity(target),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn kinds_use_snake_case_names() {
        let names: Vec<String> = ActionKind::iter().map(|kind| kind.to_string()).collect();
        assert_eq!(
            names,
            vec![
                "idle",
                "attack",
                "skill",
                "backstab_teleport",
                "weapon_skill",
                "charge_attack",
                "move"
            ]
        );
        assert_eq!(Action::move_to(1.0, 2.0).kind(), ActionKind::Move);
    }
}
