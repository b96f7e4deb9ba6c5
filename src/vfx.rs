//! Lifetime tracking for visual effects.
//!
//! Nothing is rendered here; the queue only knows how long each effect has
//! left so the resolver can wait on teleport animations.

use crate::ecs::TickContext;
use crate::services::{VfxHandle, VfxRequest, VisualEffects};
use crate::systems::{Draw, Subsystem};
use error::EngineResult;

#[derive(Debug, Clone, PartialEq)]
pub struct ActiveVfx {
    pub handle: VfxHandle,
    pub request: VfxRequest,
    pub remaining: u32,
}

#[derive(Debug, Default)]
pub struct VfxEngine {
    next_handle: u64,
    active: Vec<ActiveVfx>,
}

impl VfxEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> &[ActiveVfx] {
        &self.active
    }

    pub fn clear(&mut self) {
        self.active.clear();
    }
}

impl VisualEffects for VfxEngine {
    /// Effects live at least one tick.
    fn spawn(&mut self, request: VfxRequest) -> VfxHandle {
        self.next_handle += 1;
        let handle = VfxHandle(self.next_handle);
        let remaining = request.life_ticks.max(1);
        tracing::trace!(?handle, kind = ?request.kind, remaining, "vfx spawned");
        self.active.push(ActiveVfx {
            handle,
            request,
            remaining,
        });
        handle
    }

    fn is_finished(&self, handle: VfxHandle) -> bool {
        !self.active.iter().any(|vfx| vfx.handle == handle)
    }

    fn step(&mut self) {
        self.active.retain_mut(|vfx| {
            vfx.remaining -= 1;
            vfx.remaining > 0
        });
    }

    fn active_count(&self) -> usize {
        self.active.len()
    }
}

/// Ages the effects once per tick and reports what is on screen.
#[derive(Default)]
pub struct VfxSystem;

impl Subsystem for VfxSystem {
    fn compute(&mut self, ctx: &mut TickContext<'_>) -> EngineResult<()> {
        if let Some(vfx) = ctx.services.vfx.as_mut() {
            vfx.step();
        }
        Ok(())
    }

    fn as_draw(&mut self) -> Option<&mut dyn Draw> {
        Some(self as &mut dyn Draw)
    }
}

impl Draw for VfxSystem {
    fn draw(&mut self, ctx: &TickContext<'_>) -> EngineResult<()> {
        if let Some(vfx) = ctx.services.vfx.as_ref() {
            let active = vfx.active_count();
            if active > 0 {
                tracing::trace!(active, tick = ctx.now(), "vfx frame");
            }
        }
        Ok(())
    }
}
