
use bevy_app::prelude::*;
use bevy_ecs::{prelude::*, query::QueryData};
use bevy_math::prelude::*;
use bevy_time::prelude::*;
use bevy_transform::prelude::*;

use crate::{PhysicsSystems, collision::Collider};

pub struct KinematicsPlugin;

#[derive(Clone, Copy, Component, Default, Debug, PartialEq)]
#[require(Transform)]
pub struct Velocity {
    linear: Vec2,
    angular: f32,
}

/// Body driven by the physics simulation: receives impulses, friction and restitution.
#[derive(Copy, Clone, Component, Debug, Default)]
#[require(Velocity, Mass, ExternalImpulse, GravityScale, PhysicsMaterial)]
pub struct RigidBody;

#[derive(Copy, Clone, Component, Debug, PartialEq)]
pub struct Mass(pub f32);

#[derive(Copy, Clone, Component, Debug, PartialEq)]
pub struct GravityScale(pub f32);

/// Impulses accumulated since the last integration step.
#[derive(Copy, Clone, Component, Debug, Default, PartialEq)]
pub struct ExternalImpulse {
    impulse: Vec2,
}

#[derive(Copy, Clone, Component, Debug, PartialEq)]
pub struct PhysicsMaterial {
    pub restitution: f32,
    pub friction: f32,
}

#[derive(Copy, Clone, Component, Debug, Default, PartialEq, Eq)]
pub struct GroundContact {
    grounded: bool,
}

#[derive(Copy, Clone, Resource, Debug, PartialEq)]
pub struct Gravity(pub Vec2);

/// Horizontal floor every collider rests on.
#[derive(Copy, Clone, Resource, Debug, Default, PartialEq)]
pub struct Ground {
    pub height: f32,
}

#[derive(QueryData)]
#[query_data(mutable)]
pub struct BodyQuery {
    transform: &'static mut Transform,
    velocity: &'static mut Velocity,
    collider: Option<&'static Collider>,
    contact: Option<&'static mut GroundContact>,
    gravity_scale: Option<&'static GravityScale>,
    impulse: Option<&'static mut ExternalImpulse>,
    mass: Option<&'static Mass>,
    material: Option<&'static PhysicsMaterial>,
}

pub fn update_kinematics(
    mut query: Query<BodyQuery>,
    gravity: Res<Gravity>,
    ground: Res<Ground>,
    time: Res<Time>,
) {
    let delta_secs = time.delta_secs();

    query.par_iter_mut().for_each(|mut body| {
        if let Some(mut impulse) = body.impulse {
            let mass = body.mass.map_or(1.0, |m| m.0);
            let impulse = impulse.take();
            if impulse != Vec2::ZERO && mass > 0.0 {
                body.velocity.linear += impulse / mass;
            }
        }

        if let Some(scale) = body.gravity_scale {
            body.velocity.linear += gravity.0 * scale.0 * delta_secs;
        }

        if body.velocity.is_zero() {
            return;
        }

        let linear = body.velocity.linear;
        if linear != Vec2::ZERO {
            body.transform.translation.x += linear.x * delta_secs;
            body.transform.translation.y += linear.y * delta_secs;
        }

        let Some(collider) = body.collider else {
            if body.velocity.angular != 0.0 {
                body.transform.rotate_z(body.velocity.angular * delta_secs);
            }
            return;
        };

        let restitution = body.material.map_or(0.0, |m| m.restitution);
        let grounded = resolve_ground(
            &mut body.transform,
            &mut body.velocity,
            collider,
            ground.height,
            restitution,
        );

        if grounded {
            if let Some(material) = body.material {
                let gravity_scale = body.gravity_scale.map_or(1.0, |s| s.0);
                let normal_accel = gravity.0.length() * gravity_scale;
                body.velocity
                    .brake_horizontal(material.friction * normal_accel * delta_secs);
                if collider.is_circle() && collider.radius() > 0.0 {
                    body.velocity.angular = -body.velocity.linear.x / collider.radius();
                }
            }
        }

        if body.velocity.angular != 0.0 {
            body.transform.rotate_z(body.velocity.angular * delta_secs);
        }

        if let Some(mut contact) = body.contact {
            contact.set_if_neq(GroundContact { grounded });
        }
    });
}

fn resolve_ground(
    transform: &mut Transform,
    velocity: &mut Velocity,
    collider: &Collider,
    height: f32,
    restitution: f32,
) -> bool {
    let rest_height = height + collider.half_height();
    if transform.translation.y > rest_height || velocity.linear.y > 0.0 {
        return false;
    }

    transform.translation.y = rest_height;

    let bounce = -velocity.linear.y * restitution;
    if bounce > Ground::REST_SPEED {
        velocity.linear.y = bounce;
        false
    } else {
        velocity.linear.y = 0.0;
        true
    }
}

impl Plugin for KinematicsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Gravity>();
        app.init_resource::<Ground>();

        app.add_systems(
            FixedUpdate,
            update_kinematics.in_set(PhysicsSystems::Integrate),
        );
    }
}

impl Velocity {
    pub fn new(linear: Vec2) -> Self {
        Velocity {
            linear,
            angular: 0.0,
        }
    }

    pub fn linear(&self) -> Vec2 {
        self.linear
    }

    pub fn angular(&self) -> f32 {
        self.angular
    }

    pub fn set_linear(&mut self, linear: Vec2) {
        self.linear = linear;
    }

    pub fn is_zero(&self) -> bool {
        self.linear == Vec2::ZERO && self.angular == 0.0
    }

    /// Moves the linear velocity toward `target` by at most `accel`.
    pub fn accelerate(&mut self, target: Vec2, accel: f32) {
        self.linear += (target - self.linear).clamp_length_max(accel);
    }

    /// Slows the horizontal component toward zero without reversing it.
    pub fn brake_horizontal(&mut self, decel: f32) {
        let speed = self.linear.x.abs();
        if speed <= decel {
            self.linear.x = 0.0;
        } else {
            self.linear.x -= decel.copysign(self.linear.x);
        }
    }
}

impl ExternalImpulse {
    pub fn new(impulse: Vec2) -> Self {
        ExternalImpulse { impulse }
    }

    pub fn apply(&mut self, impulse: Vec2) {
        self.impulse += impulse;
    }

    pub fn get(&self) -> Vec2 {
        self.impulse
    }

    pub fn take(&mut self) -> Vec2 {
        std::mem::take(&mut self.impulse)
    }
}

impl GroundContact {
    pub fn new(grounded: bool) -> Self {
        GroundContact { grounded }
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded
    }
}

impl Ground {
    /// Bounces slower than this settle onto the floor.
    pub const REST_SPEED: f32 = 20.0;
}

impl Default for Mass {
    fn default() -> Self {
        Mass(1.0)
    }
}

impl Default for GravityScale {
    fn default() -> Self {
        GravityScale(1.0)
    }
}

impl Default for PhysicsMaterial {
    fn default() -> Self {
        PhysicsMaterial {
            restitution: 0.3,
            friction: 0.7,
        }
    }
}

impl Default for Gravity {
    fn default() -> Self {
        Gravity(Vec2::new(0.0, -980.0))
    }
}
