//! Declarative bullet patterns
//!
//! A pattern is a parameterized generator that expands into concrete
//! [`BulletDef`]s at a single timeline instant. Expansion is pure; nothing
//! is spawned here.

use std::f32::consts::TAU;
use std::fmt;
use std::rc::Rc;

use glam::Vec3;

use super::bullet::{BulletDef, BulletMaterial, BulletShape, TrajectoryShape};

/// Winding direction for circle patterns, viewed from above (+Y).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinDirection {
    Clockwise,
    CounterClockwise,
}

impl SpinDirection {
    fn angular_sign(self) -> f32 {
        match self {
            Self::Clockwise => -1.0,
            Self::CounterClockwise => 1.0,
        }
    }
}

/// A generator expanding into one or more spawn instructions.
#[derive(Clone)]
pub enum BulletPattern {
    /// `count` bullets fanned around the origin in the XZ plane, sweeping
    /// `revolutions` full turns from `start_angle`.
    Circle {
        count: u32,
        direction: SpinDirection,
        start_angle: f32,
        revolutions: f32,
    },
    /// Caller-supplied defs whose spawn positions are relative to the event
    /// origin; the orchestrator translates them before spawning.
    Custom {
        generator: Rc<dyn Fn() -> Vec<BulletDef>>,
    },
}

impl fmt::Debug for BulletPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Circle {
                count,
                direction,
                start_angle,
                revolutions,
            } => f
                .debug_struct("Circle")
                .field("count", count)
                .field("direction", direction)
                .field("start_angle", start_angle)
                .field("revolutions", revolutions)
                .finish(),
            Self::Custom { .. } => f.write_str("Custom(..)"),
        }
    }
}

impl BulletPattern {
    /// Expand into spawnable defs.
    ///
    /// Circle bullets all spawn at `origin` and differ only in direction;
    /// custom defs come back translated by `origin`. `velocity` and `shape`
    /// only apply to circle patterns; custom generators supply their own.
    pub fn expand(&self, origin: Vec3, velocity: f32, shape: &BulletShape) -> Vec<BulletDef> {
        match self {
            Self::Circle {
                count,
                direction,
                start_angle,
                revolutions,
            } => {
                let delta_angle = TAU * revolutions / *count as f32;
                (0..*count)
                    .map(|i| {
                        let angle =
                            start_angle + direction.angular_sign() * i as f32 * delta_angle;
                        let dir = Vec3::new(angle.sin(), 0.0, angle.cos()) * velocity;
                        BulletDef {
                            shape: shape.clone(),
                            material: BulletMaterial::Standard,
                            spawn_position: origin,
                            trajectory: TrajectoryShape::Linear { direction: dir },
                        }
                    })
                    .collect()
            }
            Self::Custom { generator } => {
                let mut defs = (**generator)();
                for def in &mut defs {
                    def.spawn_position += origin;
                }
                defs
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHAPE: BulletShape = BulletShape::Sphere { radius: 0.5 };

    fn linear_direction(def: &BulletDef) -> Vec3 {
        match &def.trajectory {
            TrajectoryShape::Linear { direction } => *direction,
            TrajectoryShape::Custom(_) => panic!("expected linear trajectory"),
        }
    }

    #[test]
    fn test_circle_clockwise_quarter_steps() {
        let pattern = BulletPattern::Circle {
            count: 4,
            direction: SpinDirection::Clockwise,
            start_angle: 0.0,
            revolutions: 1.0,
        };
        let defs = pattern.expand(Vec3::ZERO, 2.0, &SHAPE);
        assert_eq!(defs.len(), 4);

        // Angles 0, -π/2, -π, -3π/2 → directions +Z, -X, -Z, +X.
        let expected = [
            Vec3::new(0.0, 0.0, 2.0),
            Vec3::new(-2.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, -2.0),
            Vec3::new(2.0, 0.0, 0.0),
        ];
        for (def, want) in defs.iter().zip(expected) {
            let dir = linear_direction(def);
            assert!((dir - want).length() < 1e-5, "got {dir}, want {want}");
            assert!((dir.length() - 2.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_circle_counter_clockwise_mirrors_sign() {
        let pattern = BulletPattern::Circle {
            count: 4,
            direction: SpinDirection::CounterClockwise,
            start_angle: 0.0,
            revolutions: 1.0,
        };
        let defs = pattern.expand(Vec3::ZERO, 1.0, &SHAPE);
        // Second bullet at +π/2 → +X.
        let dir = linear_direction(&defs[1]);
        assert!((dir - Vec3::new(1.0, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_circle_bullets_share_the_origin() {
        let origin = Vec3::new(3.0, 1.0, -2.0);
        let pattern = BulletPattern::Circle {
            count: 7,
            direction: SpinDirection::CounterClockwise,
            start_angle: 0.4,
            revolutions: 2.0,
        };
        for def in pattern.expand(origin, 1.0, &SHAPE) {
            assert_eq!(def.spawn_position, origin);
        }
    }

    #[test]
    fn test_circle_start_angle_offsets_first_bullet() {
        let pattern = BulletPattern::Circle {
            count: 3,
            direction: SpinDirection::Clockwise,
            start_angle: std::f32::consts::FRAC_PI_2,
            revolutions: 1.0,
        };
        let defs = pattern.expand(Vec3::ZERO, 1.0, &SHAPE);
        // First bullet at π/2 → +X.
        let dir = linear_direction(&defs[0]);
        assert!((dir - Vec3::new(1.0, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_custom_defs_are_translated_by_origin() {
        let pattern = BulletPattern::Custom {
            generator: Rc::new(|| {
                vec![
                    BulletDef::sphere(0.5, Vec3::new(1.0, 0.0, 0.0), Vec3::Z),
                    BulletDef::sphere(0.5, Vec3::new(-1.0, 0.0, 0.0), Vec3::Z),
                ]
            }),
        };
        let defs = pattern.expand(Vec3::new(10.0, 5.0, 0.0), 1.0, &SHAPE);
        assert_eq!(defs[0].spawn_position, Vec3::new(11.0, 5.0, 0.0));
        assert_eq!(defs[1].spawn_position, Vec3::new(9.0, 5.0, 0.0));
    }
}
