//! Hostile unit decision making and resolution.

pub mod action;
pub mod policy;
pub mod resolver;
pub mod squad;

pub use action::{Action, ActionKind, MoveTarget};
pub use policy::{ChaserPolicy, ScriptedPolicy};
pub use resolver::{AiResolver, AiSystem};
pub use squad::{Squad, SquadRegistry, Strategy};

use crate::ecs::{Position, Resources};
use crate::services::VfxHandle;
use hecs::{Entity, World};

/// Chooses what a unit does on its turn.
///
/// Policies only read the world; the resolver applies the returned action.
/// While `decide` runs the unit's own `Brain` holds a placeholder policy, so
/// reading any `Brain` from the world is safe.
pub trait DecisionPolicy {
    fn decide(&mut self, me: Entity, world: &World, resources: &Resources) -> Action;

    fn name(&self) -> &str {
        "policy"
    }
}

/// A teleport strike waiting for its animation to finish.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingStrike {
    pub target: Entity,
    pub destination: Position,
    pub vfx: VfxHandle,
}

/// AI component: the decision policy plus per-unit resolver bookkeeping.
pub struct Brain {
    pub policy: Box<dyn DecisionPolicy + Send + Sync>,
    /// Tick of the last debug notification emitted for this unit.
    pub last_debug_tick: Option<u64>,
    pub pending: Option<PendingStrike>,
}

impl Brain {
    pub fn new(policy: impl DecisionPolicy + Send + Sync + 'static) -> Self {
        Self {
            policy: Box::new(policy),
            last_debug_tick: None,
            pending: None,
        }
    }
}

impl std::fmt::Debug for Brain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Brain")
            .field("policy", &self.policy.name())
            .field("last_debug_tick", &self.last_debug_tick)
            .field("pending", &self.pending)
            .finish()
    }
}
