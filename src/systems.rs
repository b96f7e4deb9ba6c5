//! Subsystem registry driving the compute and draw passes of every tick.

use crate::ecs::TickContext;
use error::{EngineError, EngineResult};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

/// A named engine run once per tick.
pub trait Subsystem {
    fn compute(&mut self, ctx: &mut TickContext<'_>) -> EngineResult<()>;

    /// Subsystems that also draw expose their draw step here.
    fn as_draw(&mut self) -> Option<&mut dyn Draw> {
        None
    }
}

/// Optional draw step, run after every compute step of the tick.
pub trait Draw {
    fn draw(&mut self, ctx: &TickContext<'_>) -> EngineResult<()>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pass {
    Compute,
    Draw,
}

/// Subsystems that failed during one tick, by pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    pub compute_failures: Vec<String>,
    pub draw_failures: Vec<String>,
}

impl TickReport {
    pub fn is_clean(&self) -> bool {
        self.compute_failures.is_empty() && self.draw_failures.is_empty()
    }
}

struct Entry {
    name: String,
    subsystem: Box<dyn Subsystem>,
}

/// Ordered registry of subsystems. Registration order is execution order.
#[derive(Default)]
pub struct Orchestrator {
    entries: Vec<Entry>,
}

impl Orchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a subsystem under `name`.
    ///
    /// Registering a name twice swaps the instance but keeps its slot in
    /// the execution order.
    pub fn register(&mut self, name: &str, subsystem: impl Subsystem + 'static) {
        self.insert(name, Box::new(subsystem));
    }

    /// Register an instance that may be absent; absent instances are
    /// logged and ignored.
    pub fn register_boxed(
        &mut self,
        name: &str,
        subsystem: Option<Box<dyn Subsystem>>,
    ) -> EngineResult<()> {
        match subsystem {
            Some(subsystem) => {
                self.insert(name, subsystem);
                Ok(())
            }
            None => {
                tracing::warn!(subsystem = name, "rejected registration without an instance");
                Err(EngineError::MissingSubsystem(name.to_string()))
            }
        }
    }

    fn insert(&mut self, name: &str, subsystem: Box<dyn Subsystem>) {
        match self.entries.iter_mut().find(|entry| entry.name == name) {
            Some(entry) => {
                entry.subsystem = subsystem;
                tracing::info!(subsystem = name, "subsystem replaced");
            }
            None => {
                self.entries.push(Entry {
                    name: name.to_string(),
                    subsystem,
                });
                tracing::info!(subsystem = name, "subsystem registered");
            }
        }
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|entry| entry.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Run every compute step in order. Returns the names that failed.
    pub fn compute_pass(&mut self, ctx: &mut TickContext<'_>) -> Vec<String> {
        let mut failed = Vec::new();
        for entry in self.entries.iter_mut() {
            let subsystem = &mut entry.subsystem;
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| subsystem.compute(ctx)));
            if let Err(err) = flatten(&entry.name, outcome) {
                report(&entry.name, Pass::Compute, &err);
                failed.push(entry.name.clone());
            }
        }
        failed
    }

    /// Run the draw step of every subsystem that has one, in order.
    pub fn draw_pass(&mut self, ctx: &TickContext<'_>) -> Vec<String> {
        let mut failed = Vec::new();
        for entry in self.entries.iter_mut() {
            let Some(drawable) = entry.subsystem.as_draw() else {
                continue;
            };
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| drawable.draw(ctx)));
            if let Err(err) = flatten(&entry.name, outcome) {
                report(&entry.name, Pass::Draw, &err);
                failed.push(entry.name.clone());
            }
        }
        failed
    }

    /// One tick: the compute pass followed by the draw pass.
    pub fn tick(&mut self, ctx: &mut TickContext<'_>) -> TickReport {
        let compute_failures = self.compute_pass(ctx);
        let draw_failures = self.draw_pass(ctx);
        TickReport {
            compute_failures,
            draw_failures,
        }
    }
}

fn flatten(
    name: &str,
    outcome: Result<EngineResult<()>, Box<dyn Any + Send>>,
) -> EngineResult<()> {
    match outcome {
        Ok(result) => result,
        Err(payload) => Err(EngineError::SubsystemPanicked {
            name: name.to_string(),
            message: panic_message(payload.as_ref()),
        }),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

fn report(name: &str, pass: Pass, err: &EngineError) {
    if err.is_benign() {
        tracing::debug!(subsystem = name, ?pass, "skipped: {err}");
    } else {
        tracing::error!(subsystem = name, ?pass, "subsystem failed: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::Resources;
    use crate::services::Services;
    use hecs::World;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Journal = Rc<RefCell<Vec<String>>>;

    struct Probe {
        label: &'static str,
        journal: Journal,
        fail: bool,
        draws: bool,
    }

    impl Probe {
        fn new(label: &'static str, journal: &Journal) -> Self {
            Self {
                label,
                journal: journal.clone(),
                fail: false,
                draws: false,
            }
        }
    }

    impl Subsystem for Probe {
        fn compute(&mut self, _ctx: &mut TickContext<'_>) -> EngineResult<()> {
            self.journal.borrow_mut().push(format!("compute:{}", self.label));
            if self.fail {
                return Err(EngineError::Config("probe failure".into()));
            }
            Ok(())
        }

        fn as_draw(&mut self) -> Option<&mut dyn Draw> {
            if self.draws { Some(self as &mut dyn Draw) } else { None }
        }
    }

    impl Draw for Probe {
        fn draw(&mut self, _ctx: &TickContext<'_>) -> EngineResult<()> {
            self.journal.borrow_mut().push(format!("draw:{}", self.label));
            Ok(())
        }
    }

    struct Panicker;

    impl Subsystem for Panicker {
        fn compute(&mut self, _ctx: &mut TickContext<'_>) -> EngineResult<()> {
            panic!("boom");
        }
    }

    fn run(orchestrator: &mut Orchestrator) -> TickReport {
        let mut world = World::new();
        let mut resources = Resources::default();
        let mut services = Services::default();
        let mut ctx = TickContext::new(&mut world, &mut resources, &mut services);
        orchestrator.tick(&mut ctx)
    }

    #[test]
    fn runs_in_registration_order_and_skips_missing_draw() {
        let journal: Journal = Rc::default();
        let mut orchestrator = Orchestrator::new();
        orchestrator.register("b", Probe { draws: true, ..Probe::new("b", &journal) });
        orchestrator.register("a", Probe::new("a", &journal));
        orchestrator.register("c", Probe { draws: true, ..Probe::new("c", &journal) });

        let report = run(&mut orchestrator);

        assert!(report.is_clean());
        assert_eq!(
            *journal.borrow(),
            vec!["compute:b", "compute:a", "compute:c", "draw:b", "draw:c"]
        );
    }

    #[test]
    fn failures_and_panics_do_not_stop_later_subsystems() {
        let journal: Journal = Rc::default();
        let mut orchestrator = Orchestrator::new();
        orchestrator.register("broken", Probe { fail: true, ..Probe::new("broken", &journal) });
        orchestrator.register("panics", Panicker);
        orchestrator.register("healthy", Probe::new("healthy", &journal));

        let report = run(&mut orchestrator);

        assert_eq!(report.compute_failures, vec!["broken", "panics"]);
        assert!(journal.borrow().contains(&"compute:healthy".to_string()));
    }

    #[test]
    fn absent_instance_is_rejected() {
        let mut orchestrator = Orchestrator::new();
        let err = orchestrator.register_boxed("ghost", None).unwrap_err();
        assert!(matches!(err, EngineError::MissingSubsystem(name) if name == "ghost"));
        assert!(orchestrator.is_empty());
    }

    #[test]
    fn re_registering_keeps_the_slot() {
        let journal: Journal = Rc::default();
        let mut orchestrator = Orchestrator::new();
        orchestrator.register("first", Probe::new("old", &journal));
        orchestrator.register("second", Probe::new("second", &journal));
        orchestrator
            .register_boxed("first", Some(Box::new(Probe::new("new", &journal))))
            .unwrap();

        run(&mut orchestrator);

        assert_eq!(orchestrator.names(), vec!["first", "second"]);
        assert_eq!(*journal.borrow(), vec!["compute:new", "compute:second"]);
    }
}
