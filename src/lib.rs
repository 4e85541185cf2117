//! Barrage - timed-event scheduling and bullet-pattern simulation
//!
//! Core modules:
//! - `scheduler`: min-heap timer queue with cancellation and drift-free
//!   periodic refire
//! - `hooks`: stable-handle registry for the host's tick/respawn callbacks
//! - `services`: collision/scene capabilities the host provides
//! - `sim`: bullet lifecycle and timeline orchestration
//!
//! The crate is a library driven entirely by its host: the host owns the
//! simulation clock and calls [`BulletHellManager::tick`] every frame.

pub mod hooks;
pub mod scheduler;
pub mod services;
pub mod sim;

pub use scheduler::{ScheduleHandle, Scheduler};
pub use sim::{
    BoundingBox, BulletDef, BulletHellManager, BulletManager, BulletMaterial, BulletPattern,
    BulletShape, SpinDirection, TimelineAction, TimelineError, TimelineEvent, TrajectoryShape,
};

/// Tuning constants
pub mod consts {
    /// Seconds past the final timeline event before the all-clear check may
    /// pass, letting trailing visual/collision effects settle.
    pub const WIN_GRACE_PERIOD: f64 = 1.0;

    /// Default minimum penetration depth for hazard contact regions.
    pub const DEFAULT_MIN_PENETRATION_DEPTH: f32 = 0.04;
}
