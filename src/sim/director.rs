//! Timeline orchestration
//!
//! [`BulletHellManager`] drives one scripted encounter: it advances the
//! encounter clock, fires due timeline events, expands patterns into spawns
//! (optionally staggered through the [`Scheduler`]), ticks the
//! [`BulletManager`] and watches for the all-clear condition. The host wires
//! [`tick`](BulletHellManager::tick) and
//! [`notify_respawn`](BulletHellManager::notify_respawn) into its frame loop,
//! typically through [`crate::hooks::Hooks`].

use crate::consts::WIN_GRACE_PERIOD;
use crate::scheduler::Scheduler;

use super::bullet::BulletManager;
use super::timeline::{Timeline, TimelineAction, TimelineError, TimelineEvent};

/// Invoked once when the encounter is cleared.
pub type WinFn = Box<dyn FnMut()>;

#[derive(Debug, Clone, Copy)]
enum Phase {
    Idle,
    Running { start_time: f64 },
}

/// Scripted-encounter driver. `Idle → Running → Idle` via `start`/`reset`.
pub struct BulletHellManager {
    timeline: Timeline,
    bullets: BulletManager,
    scheduler: Scheduler<BulletManager>,
    /// Index of the first timeline event not yet fired. Events behind the
    /// cursor are never re-examined.
    cursor: usize,
    phase: Phase,
    on_win: Option<WinFn>,
}

impl BulletHellManager {
    /// Validates the timeline ordering; an unordered timeline is a
    /// configuration error. The bullet manager carries the bounds and the
    /// external services.
    pub fn new(
        events: Vec<TimelineEvent>,
        bullets: BulletManager,
        on_win: Option<WinFn>,
    ) -> Result<Self, TimelineError> {
        Ok(Self {
            timeline: Timeline::new(events)?,
            bullets,
            scheduler: Scheduler::new(),
            cursor: 0,
            phase: Phase::Idle,
            on_win,
        })
    }

    /// Begin the encounter at the host's current simulation time.
    ///
    /// # Panics
    /// If the encounter is already running. Starting twice is an integration
    /// bug, handled fail-fast like the rest of the configuration surface.
    pub fn start(&mut self, now: f64) {
        if matches!(self.phase, Phase::Running { .. }) {
            panic!("BulletHellManager::start called while already running");
        }
        log::debug!("encounter started at t={now}");
        self.phase = Phase::Running { start_time: now };
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Running { .. })
    }

    /// Count of live bullets.
    pub fn bullet_count(&self) -> usize {
        self.bullets.size()
    }

    /// Count of staggered spawns not yet materialized.
    pub fn pending_spawns(&self) -> usize {
        self.scheduler.len()
    }

    /// Host respawn notification: abort the run and clear everything. No-op
    /// while idle.
    pub fn notify_respawn(&mut self) {
        if self.is_running() {
            log::debug!("respawn while running, resetting encounter");
            self.reset();
        }
    }

    /// Advance one frame. No-op while idle.
    ///
    /// Order per frame: staggered spawns, then due timeline events, then
    /// bullet movement, then the all-clear check. `now` is the host's
    /// monotonically non-decreasing simulation clock.
    pub fn tick(&mut self, now: f64, dt: f64) {
        let Phase::Running { start_time } = self.phase else {
            return;
        };
        let elapsed = now - start_time;

        self.scheduler.tick(elapsed, &mut self.bullets);

        while self.cursor < self.timeline.len() {
            let event = &self.timeline.events()[self.cursor];
            if event.time > elapsed {
                break;
            }
            let event = event.clone();
            self.cursor += 1;
            self.fire_event(event, elapsed);
        }

        self.bullets.tick(elapsed, dt);

        // All clear: every event fired, nothing alive, and the grace period
        // after the final event has passed (letting trailing effects settle).
        let timeline_done = self.cursor == self.timeline.len();
        let grace_over = match self.timeline.last_event_time() {
            Some(last) => elapsed >= last + WIN_GRACE_PERIOD,
            None => true,
        };
        if timeline_done && self.bullets.size() == 0 && grace_over {
            log::debug!("encounter cleared at t={now}");
            if let Some(on_win) = self.on_win.as_mut() {
                on_win();
            }
            self.reset();
        }
    }

    /// Return to idle: pending spawns, live bullets and the event cursor are
    /// all cleared. Safe to call repeatedly.
    pub fn reset(&mut self) {
        self.scheduler.clear();
        self.bullets.reset();
        self.cursor = 0;
        self.phase = Phase::Idle;
        log::debug!("encounter reset to idle");
    }

    fn fire_event(&mut self, event: TimelineEvent, elapsed: f64) {
        log::debug!("firing timeline event at t={}", event.time);
        match event.action {
            TimelineAction::SpawnBullets(defs) => {
                for def in defs {
                    let _ = self.bullets.spawn(def, elapsed);
                }
            }
            TimelineAction::SpawnPattern {
                pattern,
                origin,
                spawn_interval,
                velocity,
                shape,
            } => {
                let defs = pattern.expand(origin, velocity, &shape);
                match spawn_interval {
                    None => {
                        for def in defs {
                            let _ = self.bullets.spawn(def, elapsed);
                        }
                    }
                    Some(step) => {
                        // Stagger relative to the event's nominal time, not
                        // the tick that happened to fire it.
                        for (i, def) in defs.into_iter().enumerate() {
                            let fire_time = event.time + i as f64 * step;
                            log::trace!("staggered spawn {i} scheduled for t={fire_time}");
                            let _ = self.scheduler.schedule(
                                move |bullets: &mut BulletManager, now| {
                                    let _ = bullets.spawn(def.clone(), now);
                                },
                                fire_time,
                                None,
                            );
                        }
                    }
                }
            }
        }
    }
}
