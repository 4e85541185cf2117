//! Host callback registries
//!
//! The host's frame loop owns a [`Hooks`] value and registers the per-tick
//! and respawn callbacks that drive an encounter, e.g.
//!
//! ```ignore
//! let tick_key = hooks.register_tick(|world, now, dt| world.director.tick(now, dt));
//! let respawn_key = hooks.register_respawn(|world| world.director.notify_respawn());
//! ```
//!
//! Keys are generational slot-map keys: removal is O(1), a removed key can
//! never alias a later registration, and removing a key that is not live is
//! treated as an integration bug and panics rather than being silently
//! ignored.

use slotmap::{SlotMap, new_key_type};

new_key_type! {
    /// Key for a registered per-tick hook.
    pub struct TickKey;
    /// Key for a registered respawn hook.
    pub struct RespawnKey;
}

/// Per-tick hook: `(ctx, now, dt)`.
pub type TickFn<Ctx> = Box<dyn FnMut(&mut Ctx, f64, f64)>;
/// Respawn hook: invoked when the player respawns.
pub type RespawnFn<Ctx> = Box<dyn FnMut(&mut Ctx)>;

/// Stable-handle registry of host callbacks.
pub struct Hooks<Ctx> {
    tick: SlotMap<TickKey, TickFn<Ctx>>,
    respawn: SlotMap<RespawnKey, RespawnFn<Ctx>>,
}

impl<Ctx> Default for Hooks<Ctx> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Ctx> Hooks<Ctx> {
    pub fn new() -> Self {
        Self {
            tick: SlotMap::with_key(),
            respawn: SlotMap::with_key(),
        }
    }

    pub fn register_tick(&mut self, hook: impl FnMut(&mut Ctx, f64, f64) + 'static) -> TickKey {
        self.tick.insert(Box::new(hook))
    }

    /// Remove a tick hook.
    ///
    /// # Panics
    /// If `key` is not currently registered.
    pub fn remove_tick(&mut self, key: TickKey) {
        if self.tick.remove(key).is_none() {
            panic!("removed a tick hook that was not registered");
        }
    }

    pub fn register_respawn(&mut self, hook: impl FnMut(&mut Ctx) + 'static) -> RespawnKey {
        self.respawn.insert(Box::new(hook))
    }

    /// Remove a respawn hook.
    ///
    /// # Panics
    /// If `key` is not currently registered.
    pub fn remove_respawn(&mut self, key: RespawnKey) {
        if self.respawn.remove(key).is_none() {
            panic!("removed a respawn hook that was not registered");
        }
    }

    /// Invoke every tick hook with the host clock reading.
    pub fn emit_tick(&mut self, ctx: &mut Ctx, now: f64, dt: f64) {
        for hook in self.tick.values_mut() {
            hook(ctx, now, dt);
        }
    }

    /// Invoke every respawn hook.
    pub fn emit_respawn(&mut self, ctx: &mut Ctx) {
        for hook in self.respawn.values_mut() {
            hook(ctx);
        }
    }

    pub fn tick_count(&self) -> usize {
        self.tick.len()
    }

    pub fn respawn_count(&self) -> usize {
        self.respawn.len()
    }
}
