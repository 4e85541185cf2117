//! External capability interfaces
//!
//! The core never renders or resolves physics itself. Hazards are
//! materialized through two host-provided services: a scene service that
//! owns visual representations and a collision service that owns contact
//! regions. Both are infallible from this core's perspective; failures on
//! the other side are the host's problem.

use std::rc::Rc;

use glam::Vec3;

use crate::sim::bullet::{BulletMaterial, BulletShape};

/// Opaque handle to an inserted scene node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SceneHandle(pub u64);

/// Opaque handle to a registered contact region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CollisionHandle(pub u64);

/// Everything the scene service needs to materialize one hazard visual.
#[derive(Debug, Clone)]
pub struct VisualDescriptor {
    pub shape: BulletShape,
    pub material: BulletMaterial,
    pub position: Vec3,
}

/// Contact volume registered with the collision service.
#[derive(Debug, Clone)]
pub struct RegionDescriptor {
    pub shape: BulletShape,
    pub position: Vec3,
}

/// Shared contact callback, invoked by the collision service on region
/// enter/leave. Hazard contact is instakill-style: the callback carries no
/// payload.
pub type ContactFn = Rc<dyn Fn()>;

/// Scene-graph insertion/removal, plus per-tick transform updates.
pub trait SceneService {
    fn insert(&mut self, visual: &VisualDescriptor) -> SceneHandle;
    fn update_transform(&mut self, handle: SceneHandle, position: Vec3);
    fn remove(&mut self, handle: SceneHandle);
}

/// Contact-region registration. Regions trigger callbacks on intersection;
/// they never participate in physical collision response.
pub trait CollisionService {
    fn register_region_contact(
        &mut self,
        region: &RegionDescriptor,
        on_enter: ContactFn,
        on_leave: ContactFn,
        min_penetration_depth: f32,
    ) -> CollisionHandle;
    fn update_transform(&mut self, handle: CollisionHandle, position: Vec3);
    fn unregister(&mut self, handle: CollisionHandle);
}
