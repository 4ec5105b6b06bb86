use bevy_ecs::{prelude::*, query::QueryData};
use bevy_math::prelude::*;
use bevy_transform::prelude::*;
use smack_physics::{
    channel::CollisionResponse,
    collision::Collider,
    kinematics::{ExternalImpulse, RigidBody},
};

/// Physics body that reacts to being smacked. Everything after the impulse is up to the simulation.
#[derive(Copy, Clone, Component, Debug, Default)]
#[require(
    RigidBody,
    Collider::circle(SmackableObject::RADIUS),
    CollisionResponse::SMACKABLE_BODY,
    Transform::from_scale(Vec3::splat(SmackableObject::SCALE))
)]
pub struct SmackableObject;

#[derive(QueryData)]
#[query_data(mutable)]
pub struct SmackableQuery {
    pub object: &'static SmackableObject,
    pub impulse: &'static mut ExternalImpulse,
}

impl SmackableQueryItem<'_, '_> {
    pub fn apply_impulse(&mut self, direction: Dir2, magnitude: f32) {
        self.impulse.apply(direction * magnitude);
    }
}

impl SmackableObject {
    pub const RADIUS: f32 = 25.0;
    pub const SCALE: f32 = 0.5;
    pub const SPAWN_TRANSFORM: Transform = Transform {
        translation: Vec3::new(0.0, 500.0, -25.0),
        rotation: Quat::IDENTITY,
        scale: Vec3::splat(SmackableObject::SCALE),
    };
}
