//! Event bus carrying encounter notifications to the host game.
//!
//! Engines publish `GameEvent`s; the bus keeps them queued for the host to
//! drain, keeps a bounded history, and dispatches each event immediately to
//! subscribers registered for its type (or for every type).

use hecs::Entity;
use std::collections::{HashMap, VecDeque};
use strum::Display;

/// Colour hint for log lines shown to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum LogColor {
    White,
    Yellow,
    Orange,
    Red,
    Cyan,
    Gray,
}

/// Notifications emitted by the engines.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// An attack resolved immediately (melee, charge or deferred backstab).
    EntityAttack {
        attacker: Entity,
        defender: Entity,
        skill: Option<String>,
    },
    SkillUsed {
        caster: Entity,
        skill: String,
        target: Option<Entity>,
    },
    Log {
        message: String,
        color: LogColor,
    },
    Debug {
        tag: String,
        message: String,
    },
    TurnEnded {
        turn_number: u64,
    },
    PlayerTurnStarted,
    /// A timed effect ran out and was pruned.
    EffectExpired {
        entity: Entity,
        effect: String,
    },
}

impl GameEvent {
    /// Wire name of the event, used for subscriptions.
    pub fn event_type(&self) -> &'static str {
        match self {
            GameEvent::EntityAttack { .. } => "entity_attack",
            GameEvent::SkillUsed { .. } => "skill_used",
            GameEvent::Log { .. } => "log",
            GameEvent::Debug { .. } => "debug",
            GameEvent::TurnEnded { .. } => "turnEnd",
            GameEvent::PlayerTurnStarted => "playerTurnStart",
            GameEvent::EffectExpired { .. } => "effect_expired",
        }
    }

    pub fn log(message: impl Into<String>, color: LogColor) -> Self {
        GameEvent::Log {
            message: message.into(),
            color,
        }
    }

    pub fn debug(tag: &str, message: impl Into<String>) -> Self {
        GameEvent::Debug {
            tag: tag.to_string(),
            message: message.into(),
        }
    }
}

/// Subscriber invoked synchronously on publish.
pub trait EventHandler {
    fn handle(&mut self, event: &GameEvent);

    fn name(&self) -> &str;
}

pub struct EventBus {
    /// Events waiting for the host to drain them.
    queue: Vec<GameEvent>,
    handlers: HashMap<&'static str, Vec<Box<dyn EventHandler>>>,
    global_handlers: Vec<Box<dyn EventHandler>>,
    history: VecDeque<GameEvent>,
    max_history: usize,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_history_size(256)
    }

    pub fn with_history_size(max_history: usize) -> Self {
        Self {
            queue: Vec::new(),
            handlers: HashMap::new(),
            global_handlers: Vec::new(),
            history: VecDeque::with_capacity(max_history.min(1024)),
            max_history,
        }
    }

    pub fn publish(&mut self, event: GameEvent) {
        if let Some(handlers) = self.handlers.get_mut(event.event_type()) {
            for handler in handlers.iter_mut() {
                handler.handle(&event);
            }
        }
        for handler in self.global_handlers.iter_mut() {
            handler.handle(&event);
        }

        if self.max_history > 0 {
            if self.history.len() == self.max_history {
                self.history.pop_front();
            }
            self.history.push_back(event.clone());
        }
        self.queue.push(event);
    }

    /// Take every queued event in publish order.
    pub fn drain(&mut self) -> impl Iterator<Item = GameEvent> + '_ {
        self.queue.drain(..)
    }

    pub fn pending(&self) -> &[GameEvent] {
        &self.queue
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }

    pub fn subscribe(&mut self, event_type: &'static str, handler: Box<dyn EventHandler>) {
        self.handlers.entry(event_type).or_default().push(handler);
    }

    pub fn subscribe_all(&mut self, handler: Box<dyn EventHandler>) {
        self.global_handlers.push(handler);
    }

    pub fn subscriber_count(&self) -> usize {
        self.handlers.values().map(Vec::len).sum::<usize>() + self.global_handlers.len()
    }

    /// Most recent events, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &GameEvent> + '_ {
        self.history.iter()
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Mirrors `log` and `debug` notifications into `tracing`.
pub struct TracingHandler;

impl EventHandler for TracingHandler {
    fn handle(&mut self, event: &GameEvent) {
        match event {
            GameEvent::Log { message, color } => tracing::info!(%color, "{message}"),
            GameEvent::Debug { tag, message } => tracing::debug!(tag = %tag, "{message}"),
            _ => {}
        }
    }

    fn name(&self) -> &str {
        "TracingHandler"
    }
}
