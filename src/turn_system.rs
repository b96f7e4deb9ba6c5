//! Player/enemy turn alternation.
//!
//! The player commits a turn with `TurnTracker::take_turn`; the next compute
//! pass of `TurnSystem` lets every hostile unit act once and hands control
//! back to the player.

use crate::ai::AiResolver;
use crate::ecs::TickContext;
use crate::event_bus::{GameEvent, LogColor};
use crate::systems::Subsystem;
use error::EngineResult;

/// Which side currently holds control.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TurnState {
    /// Player-facing systems may act.
    #[default]
    PlayerTurn,
    /// Hostile units resolve their actions on the next compute pass.
    EnemyTurn,
}

/// Turn ownership and the number of completed enemy turns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TurnTracker {
    pub state: TurnState,
    pub turn_number: u64,
}

impl TurnTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand control to the hostile units. Does nothing during their turn.
    pub fn take_turn(&mut self) {
        if self.state == TurnState::PlayerTurn {
            self.state = TurnState::EnemyTurn;
        }
    }

    pub fn is_player_turn(&self) -> bool {
        self.state == TurnState::PlayerTurn
    }
}

/// Runs the enemy turn and ends it.
#[derive(Default)]
pub struct TurnSystem;

impl TurnSystem {
    pub fn new() -> Self {
        Self
    }

    fn run_enemy_turn(ctx: &mut TickContext<'_>) {
        let hostiles = ctx.resources.rosters.hostile_units(ctx.world);
        tracing::debug!(units = hostiles.len(), "enemy turn");

        for entity in hostiles {
            if !ctx.world.contains(entity) {
                continue;
            }
            if let Err(err) = AiResolver::run_unit(entity, ctx) {
                if err.is_benign() {
                    tracing::debug!(?entity, "unit skipped: {err}");
                } else {
                    tracing::error!(?entity, "failed to resolve unit: {err}");
                }
            }
        }
    }

    fn end_enemy_turn(ctx: &mut TickContext<'_>) {
        let turn = &mut ctx.resources.turn;
        turn.state = TurnState::PlayerTurn;
        turn.turn_number += 1;
        let turn_number = turn.turn_number;

        ctx.publish(GameEvent::TurnEnded { turn_number });
        ctx.publish(GameEvent::PlayerTurnStarted);
        ctx.publish(GameEvent::log("Your turn.", LogColor::White));
    }
}

impl Subsystem for TurnSystem {
    fn compute(&mut self, ctx: &mut TickContext<'_>) -> EngineResult<()> {
        if ctx.resources.turn.state == TurnState::PlayerTurn {
            return Ok(());
        }
        Self::run_enemy_turn(ctx);
        Self::end_enemy_turn(ctx);
        Ok(())
    }
}
