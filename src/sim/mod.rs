//! Encounter simulation module
//!
//! Bullet lifecycle and timeline orchestration. Everything here is
//! single-threaded and tick-driven: the host supplies the clock, every call
//! runs synchronously to completion, and cancellation/despawn take effect on
//! the next tick that observes them.

pub mod bullet;
pub mod director;
pub mod pattern;
pub mod timeline;

pub use bullet::{
    BoundingBox, BulletDef, BulletId, BulletManager, BulletMaterial, BulletShape, TrajectoryShape,
};
pub use director::{BulletHellManager, WinFn};
pub use pattern::{BulletPattern, SpinDirection};
pub use timeline::{Timeline, TimelineAction, TimelineError, TimelineEvent};
