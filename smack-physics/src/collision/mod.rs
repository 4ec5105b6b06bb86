
use bevy_ecs::{prelude::*, system::SystemParam};
use bevy_math::prelude::*;
use bevy_transform::prelude::*;

use crate::{
    channel::{CollisionChannels, CollisionResponse},
    kinematics::GroundContact,
};

/// Vertical capsule in the movement plane. A circle when `half_height == radius`.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
#[require(Transform, CollisionResponse, GroundContact)]
pub struct Collider {
    radius: f32,
    half_height: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TraceParams {
    pub channel: CollisionChannels,
    pub ignore: Option<Entity>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TraceHit {
    pub entity: Entity,
    pub point: Vec2,
    pub normal: Dir2,
    pub fraction: f32,
}

pub trait LineTrace {
    /// Returns the nearest collider blocking `params.channel` along the segment.
    fn line_trace(&self, start: Vec2, end: Vec2, params: &TraceParams) -> Option<TraceHit>;
}

#[derive(SystemParam)]
pub struct PhysicsQuery<'w, 's> {
    colliders: Query<
        'w,
        's,
        (
            Entity,
            &'static Collider,
            &'static Transform,
            &'static CollisionResponse,
        ),
    >,
}

impl LineTrace for PhysicsQuery<'_, '_> {
    fn line_trace(&self, start: Vec2, end: Vec2, params: &TraceParams) -> Option<TraceHit> {
        let mut nearest: Option<TraceHit> = None;

        for (entity, collider, transform, response) in &self.colliders {
            if Some(entity) == params.ignore || !response.blocks(params.channel) {
                continue;
            }

            let Some((fraction, normal)) =
                collider.intersect_segment(transform.translation.xy(), start, end)
            else {
                continue;
            };

            match nearest {
                Some(hit) if hit.fraction <= fraction => {}
                _ => {
                    nearest = Some(TraceHit {
                        entity,
                        point: start.lerp(end, fraction),
                        normal,
                        fraction,
                    });
                }
            }
        }

        nearest
    }
}

impl Collider {
    pub fn circle(radius: f32) -> Self {
        Collider {
            radius,
            half_height: radius,
        }
    }

    pub fn capsule(radius: f32, half_height: f32) -> Self {
        Collider {
            radius,
            half_height: half_height.max(radius),
        }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn half_height(&self) -> f32 {
        self.half_height
    }

    pub fn is_circle(&self) -> bool {
        self.half_height <= self.radius
    }

    fn segment_half_length(&self) -> f32 {
        self.half_height - self.radius
    }

    /// Entry fraction and surface normal of the segment `start..end` against this collider
    /// centered at `center`.
    pub fn intersect_segment(&self, center: Vec2, start: Vec2, end: Vec2) -> Option<(f32, Dir2)> {
        let delta = end - start;
        let inner = self.segment_half_length();

        if self.contains(center, start) {
            let normal = Dir2::new(-delta).unwrap_or(Dir2::X);
            return Some((0.0, normal));
        }

        let top = center + Vec2::new(0.0, inner);
        let bottom = center - Vec2::new(0.0, inner);

        let mut nearest = circle_entry(start - top, delta, self.radius);
        if inner > 0.0 {
            nearest = earliest(nearest, circle_entry(start - bottom, delta, self.radius));
            nearest = earliest(
                nearest,
                box_entry(
                    start,
                    delta,
                    center - Vec2::new(self.radius, inner),
                    center + Vec2::new(self.radius, inner),
                ),
            );
        }

        nearest.filter(|&(t, _)| t <= 1.0)
    }

    pub fn contains(&self, center: Vec2, point: Vec2) -> bool {
        let inner = self.segment_half_length();
        let offset = point - center;
        let clamped = Vec2::new(0.0, offset.y.clamp(-inner, inner));
        offset.distance_squared(clamped) <= self.radius * self.radius
    }
}

fn earliest(a: Option<(f32, Dir2)>, b: Option<(f32, Dir2)>) -> Option<(f32, Dir2)> {
    match (a, b) {
        (Some(a), Some(b)) => Some(if b.0 < a.0 { b } else { a }),
        (a, None) => a,
        (None, b) => b,
    }
}

fn circle_entry(delta_position: Vec2, delta: Vec2, radius: f32) -> Option<(f32, Dir2)> {
    let a = delta.length_squared();
    if a == 0.0 {
        return None;
    }

    let b = 2.0 * delta_position.dot(delta);
    let c = delta_position.length_squared() - radius * radius;
    let discr = b * b - 4.0 * a * c;
    if discr < 0.0 {
        return None;
    }

    let t = (-b - discr.sqrt()) / (2.0 * a);
    if t < 0.0 {
        return None;
    }

    let normal = Dir2::new(delta_position + delta * t).unwrap_or(Dir2::X);
    Some((t, normal))
}

fn box_entry(start: Vec2, delta: Vec2, min: Vec2, max: Vec2) -> Option<(f32, Dir2)> {
    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;
    let mut normal = Dir2::X;

    for (s, d, lo, hi, axis) in [
        (start.x, delta.x, min.x, max.x, Dir2::X),
        (start.y, delta.y, min.y, max.y, Dir2::Y),
    ] {
        if d == 0.0 {
            if s < lo || s > hi {
                return None;
            }
            continue;
        }

        let (near, far) = ((lo - s) / d, (hi - s) / d);
        let (near, far) = if near <= far { (near, far) } else { (far, near) };

        if near > t_enter {
            t_enter = near;
            normal = if d > 0.0 { -axis } else { axis };
        }
        t_exit = t_exit.min(far);
    }

    if t_enter > t_exit || t_enter < 0.0 {
        return None;
    }

    Some((t_enter, normal))
}
