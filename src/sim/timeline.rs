//! Scripted encounter timelines
//!
//! A timeline is an immutable, time-ordered list of events describing an
//! entire encounter, authored once and replayed deterministically per run.
//! Ordering is validated at construction; a violation is an authoring
//! mistake and the encounter must not start.

use glam::Vec3;
use thiserror::Error;

use super::bullet::{BulletDef, BulletShape};
use super::pattern::BulletPattern;

/// What an event does when its time arrives.
#[derive(Debug, Clone)]
pub enum TimelineAction {
    /// Spawn these defs immediately.
    SpawnBullets(Vec<BulletDef>),
    /// Expand a pattern at `origin`, optionally staggering the spawns.
    SpawnPattern {
        pattern: BulletPattern,
        origin: Vec3,
        /// Seconds between consecutive bullet spawns; `None` spawns the
        /// whole expansion at once.
        spawn_interval: Option<f64>,
        /// Speed applied to circle-pattern bullets.
        velocity: f32,
        /// Shape applied to circle-pattern bullets.
        shape: BulletShape,
    },
}

/// One scripted event, `time` seconds after `start()`.
#[derive(Debug, Clone)]
pub struct TimelineEvent {
    pub time: f64,
    pub action: TimelineAction,
}

/// Rejected timeline configurations.
#[derive(Debug, Error)]
pub enum TimelineError {
    /// Event times must be non-decreasing.
    #[error("timeline event {index} at t={time} precedes its predecessor at t={previous}")]
    OutOfOrder {
        index: usize,
        time: f64,
        previous: f64,
    },
}

/// Validated, ascending-time event list.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    events: Vec<TimelineEvent>,
}

impl Timeline {
    /// Validate event ordering. Times must be non-decreasing; an unordered
    /// timeline is rejected, never silently re-sorted.
    pub fn new(events: Vec<TimelineEvent>) -> Result<Self, TimelineError> {
        for (index, pair) in events.windows(2).enumerate() {
            if pair[1].time < pair[0].time {
                return Err(TimelineError::OutOfOrder {
                    index: index + 1,
                    time: pair[1].time,
                    previous: pair[0].time,
                });
            }
        }
        Ok(Self { events })
    }

    pub fn events(&self) -> &[TimelineEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Time of the final event, if any.
    pub fn last_event_time(&self) -> Option<f64> {
        self.events.last().map(|event| event.time)
    }
}
