//! Hazard entity lifecycle
//!
//! A "bullet" is a transient moving contact region with a visual attached:
//! it exists to trigger the hazard-contact callback on intersection, not to
//! push anything around. The [`BulletManager`] owns every live bullet,
//! advances them along their trajectories each tick, mirrors the motion into
//! the scene and collision services, and despawns anything that leaves the
//! configured bounds.

use std::fmt;
use std::rc::Rc;

use glam::Vec3;

use crate::consts::DEFAULT_MIN_PENETRATION_DEPTH;
use crate::services::{
    CollisionHandle, CollisionService, ContactFn, RegionDescriptor, SceneHandle, SceneService,
    VisualDescriptor,
};

/// How a hazard moves after spawning.
#[derive(Clone)]
pub enum TrajectoryShape {
    /// Constant-velocity travel: `spawn_position + direction * elapsed`.
    /// `direction` carries the speed in its magnitude.
    Linear { direction: Vec3 },
    /// Caller-supplied offset from the spawn position, as a function of
    /// elapsed seconds and the tick's dt.
    Custom(Rc<dyn Fn(f32, f32) -> Vec3>),
}

impl fmt::Debug for TrajectoryShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear { direction } => {
                f.debug_struct("Linear").field("direction", direction).finish()
            }
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Visual form and contact volume of a hazard.
#[derive(Debug, Clone)]
pub enum BulletShape {
    Sphere { radius: f32 },
    /// Host-resolved geometry key (authored mesh, DSL output, ...).
    Custom { geometry: Rc<str> },
}

/// Surface appearance of a hazard.
#[derive(Debug, Clone)]
pub enum BulletMaterial {
    Standard,
    /// Host-resolved material key.
    Custom { material: Rc<str> },
}

/// Everything needed to materialize one hazard. Value type, freely cloned.
#[derive(Debug, Clone)]
pub struct BulletDef {
    pub shape: BulletShape,
    pub material: BulletMaterial,
    pub spawn_position: Vec3,
    pub trajectory: TrajectoryShape,
}

impl BulletDef {
    /// Sphere with the standard material, the common case.
    pub fn sphere(radius: f32, spawn_position: Vec3, direction: Vec3) -> Self {
        Self {
            shape: BulletShape::Sphere { radius },
            material: BulletMaterial::Standard,
            spawn_position,
            trajectory: TrajectoryShape::Linear { direction },
        }
    }
}

/// Identifier of a live bullet, unique within one manager and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BulletId(u64);

/// Axis-aligned volume outside which bullets despawn.
#[derive(Debug, Clone, Copy)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Cube spanning `±half_extent` on every axis.
    pub fn symmetric(half_extent: f32) -> Self {
        Self {
            min: Vec3::splat(-half_extent),
            max: Vec3::splat(half_extent),
        }
    }

    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }
}

struct Bullet {
    id: BulletId,
    spawn_time: f64,
    def: BulletDef,
    scene: SceneHandle,
    collision: CollisionHandle,
}

/// Owns the set of live hazards: spawning, per-tick movement, bounds despawn.
///
/// The clock passed to [`spawn`](Self::spawn) and [`tick`](Self::tick) only
/// has to be self-consistent; the orchestrator feeds it encounter-relative
/// time.
pub struct BulletManager {
    scene: Box<dyn SceneService>,
    collision: Box<dyn CollisionService>,
    bounds: BoundingBox,
    on_contact: ContactFn,
    on_leave: ContactFn,
    min_penetration_depth: f32,
    bullets: Vec<Bullet>,
    next_id: u64,
}

impl BulletManager {
    /// `on_contact` fires when anything enters a bullet's contact region;
    /// region leave is ignored.
    pub fn new(
        scene: Box<dyn SceneService>,
        collision: Box<dyn CollisionService>,
        bounds: BoundingBox,
        on_contact: ContactFn,
    ) -> Self {
        Self {
            scene,
            collision,
            bounds,
            on_contact,
            on_leave: Rc::new(|| {}),
            min_penetration_depth: DEFAULT_MIN_PENETRATION_DEPTH,
            bullets: Vec::new(),
            next_id: 0,
        }
    }

    pub fn with_min_penetration_depth(mut self, depth: f32) -> Self {
        self.min_penetration_depth = depth;
        self
    }

    /// Materialize a bullet: one scene insertion plus one contact-region
    /// registration, always as a pair.
    pub fn spawn(&mut self, def: BulletDef, now: f64) -> BulletId {
        let scene = self.scene.insert(&VisualDescriptor {
            shape: def.shape.clone(),
            material: def.material.clone(),
            position: def.spawn_position,
        });
        let collision = self.collision.register_region_contact(
            &RegionDescriptor {
                shape: def.shape.clone(),
                position: def.spawn_position,
            },
            Rc::clone(&self.on_contact),
            Rc::clone(&self.on_leave),
            self.min_penetration_depth,
        );

        let id = BulletId(self.next_id);
        self.next_id += 1;
        log::debug!("spawned bullet {id:?} at {}", def.spawn_position);
        self.bullets.push(Bullet {
            id,
            spawn_time: now,
            def,
            scene,
            collision,
        });
        id
    }

    /// Advance every bullet along its trajectory, mirror the new position
    /// into both services, and despawn bullets that left the bounds.
    pub fn tick(&mut self, now: f64, dt: f64) {
        let mut i = 0;
        while i < self.bullets.len() {
            let bullet = &self.bullets[i];
            let elapsed = (now - bullet.spawn_time) as f32;
            let position = match &bullet.def.trajectory {
                TrajectoryShape::Linear { direction } => {
                    bullet.def.spawn_position + *direction * elapsed
                }
                TrajectoryShape::Custom(offset) => {
                    bullet.def.spawn_position + (**offset)(elapsed, dt as f32)
                }
            };

            if self.bounds.contains(position) {
                self.scene.update_transform(bullet.scene, position);
                self.collision.update_transform(bullet.collision, position);
                i += 1;
            } else {
                // Removal order is irrelevant, so a swap-remove keeps the
                // erase O(1).
                let bullet = self.bullets.swap_remove(i);
                self.despawn(bullet);
            }
        }
    }

    /// Despawn everything.
    pub fn reset(&mut self) {
        while let Some(bullet) = self.bullets.pop() {
            self.despawn(bullet);
        }
    }

    /// Count of live bullets.
    pub fn size(&self) -> usize {
        self.bullets.len()
    }

    // Visual and contact region are released together, never separately; a
    // dangling contact registration would keep killing an invisible player.
    fn despawn(&mut self, bullet: Bullet) {
        self.scene.remove(bullet.scene);
        self.collision.unregister(bullet.collision);
        log::debug!("despawned bullet {:?}", bullet.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::recording::services;
    use std::cell::Cell;

    fn manager_with_bounds(half_extent: f32) -> (BulletManager, std::rc::Rc<std::cell::RefCell<crate::services::recording::ServiceLog>>) {
        let (log, scene, collision) = services();
        let manager = BulletManager::new(
            scene,
            collision,
            BoundingBox::symmetric(half_extent),
            Rc::new(|| {}),
        );
        (manager, log)
    }

    #[test]
    fn test_spawn_creates_scene_and_collision_pair() {
        let (mut manager, log) = manager_with_bounds(10.0);
        let def = BulletDef::sphere(0.5, Vec3::new(1.0, 2.0, 3.0), Vec3::Z);
        let _ = manager.spawn(def, 0.0);

        let log = log.borrow();
        assert_eq!(log.scene_inserts, 1);
        assert_eq!(log.collision_registrations, 1);
        assert_eq!(log.scene_live.len(), 1);
        assert_eq!(log.collision_live.len(), 1);
        assert_eq!(*log.scene_live.values().next().unwrap(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(manager.size(), 1);
    }

    #[test]
    fn test_linear_trajectory_moves_both_transforms() {
        let (mut manager, log) = manager_with_bounds(100.0);
        let def = BulletDef::sphere(0.5, Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0));
        let _ = manager.spawn(def, 1.0);

        manager.tick(3.0, 0.016);
        let expected = Vec3::new(4.0, 0.0, 0.0); // 2 units/s for 2 s
        let log = log.borrow();
        assert_eq!(*log.scene_live.values().next().unwrap(), expected);
        assert_eq!(*log.collision_live.values().next().unwrap(), expected);
    }

    #[test]
    fn test_custom_trajectory_offsets_from_spawn_position() {
        let (mut manager, log) = manager_with_bounds(100.0);
        let def = BulletDef {
            shape: BulletShape::Sphere { radius: 0.5 },
            material: BulletMaterial::Standard,
            spawn_position: Vec3::new(0.0, 5.0, 0.0),
            trajectory: TrajectoryShape::Custom(Rc::new(|elapsed, _dt| {
                Vec3::new(elapsed * 3.0, 0.0, 0.0)
            })),
        };
        let _ = manager.spawn(def, 0.0);

        manager.tick(2.0, 0.016);
        assert_eq!(
            *log.borrow().scene_live.values().next().unwrap(),
            Vec3::new(6.0, 5.0, 0.0)
        );
    }

    #[test]
    fn test_bounds_exit_despawns_and_releases_both_resources() {
        let (mut manager, log) = manager_with_bounds(10.0);
        let fast = BulletDef::sphere(0.5, Vec3::ZERO, Vec3::new(0.0, 0.0, 100.0));
        let slow = BulletDef::sphere(0.5, Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));
        let _ = manager.spawn(fast, 0.0);
        let _ = manager.spawn(slow, 0.0);

        // Fast bullet is at z=20 on the first tick past 0.2 s; the slow one
        // is still inside.
        manager.tick(0.2, 0.016);
        assert_eq!(manager.size(), 1);
        {
            let log = log.borrow();
            assert_eq!(log.scene_live.len(), 1);
            assert_eq!(log.collision_live.len(), 1);
        }

        manager.tick(20.0, 0.016);
        assert_eq!(manager.size(), 0);
        assert!(log.borrow().scene_live.is_empty());
        assert!(log.borrow().collision_live.is_empty());
    }

    #[test]
    fn test_reset_clears_everything() {
        let (mut manager, log) = manager_with_bounds(10.0);
        for i in 0..4 {
            let def = BulletDef::sphere(0.5, Vec3::ZERO, Vec3::new(i as f32, 0.0, 0.0));
            let _ = manager.spawn(def, 0.0);
        }
        assert_eq!(manager.size(), 4);

        manager.reset();
        assert_eq!(manager.size(), 0);
        assert!(log.borrow().scene_live.is_empty());
        assert!(log.borrow().collision_live.is_empty());

        manager.reset(); // idempotent
        assert_eq!(manager.size(), 0);
    }

    #[test]
    fn test_bullet_ids_are_never_reused() {
        let (mut manager, _log) = manager_with_bounds(10.0);
        let a = manager.spawn(BulletDef::sphere(0.5, Vec3::ZERO, Vec3::X), 0.0);
        manager.reset();
        let b = manager.spawn(BulletDef::sphere(0.5, Vec3::ZERO, Vec3::X), 0.0);
        assert_ne!(a, b);
    }

    #[test]
    fn test_min_penetration_depth_reaches_registration() {
        let (log, scene, collision) = services();
        let mut manager = BulletManager::new(
            scene,
            collision,
            BoundingBox::symmetric(10.0),
            Rc::new(|| {}),
        )
        .with_min_penetration_depth(0.2);
        let _ = manager.spawn(BulletDef::sphere(0.5, Vec3::ZERO, Vec3::X), 0.0);
        assert_eq!(log.borrow().min_penetration_depths, vec![0.2]);
    }

    #[test]
    fn test_contact_callback_reaches_host_hook() {
        let (log, scene, collision) = services();
        let hit = Rc::new(Cell::new(false));
        let hit_flag = Rc::clone(&hit);
        let mut manager = BulletManager::new(
            scene,
            collision,
            BoundingBox::symmetric(10.0),
            Rc::new(move || hit_flag.set(true)),
        );
        let _ = manager.spawn(BulletDef::sphere(0.5, Vec3::ZERO, Vec3::X), 0.0);

        // Simulate the collision service reporting a region enter.
        let on_enter = Rc::clone(log.borrow().on_enter.values().next().unwrap());
        (*on_enter)();
        assert!(hit.get());
    }

    #[test]
    fn test_scene_and_collision_sets_stay_paired() {
        let (mut manager, log) = manager_with_bounds(10.0);
        for i in 0..8 {
            let speed = if i % 2 == 0 { 100.0 } else { 0.5 };
            let def = BulletDef::sphere(0.5, Vec3::ZERO, Vec3::new(0.0, 0.0, speed));
            let _ = manager.spawn(def, 0.0);
        }
        for step in 1..=10 {
            manager.tick(f64::from(step) * 0.5, 0.016);
            let log = log.borrow();
            assert_eq!(log.scene_live.len(), log.collision_live.len());
            assert_eq!(log.scene_live.len(), manager.size());
        }
    }
}
