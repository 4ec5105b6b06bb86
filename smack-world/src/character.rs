use std::f32::consts::PI;

use bevy_app::prelude::*;
use bevy_ecs::prelude::*;
use bevy_math::prelude::*;
use bevy_time::prelude::*;
use bevy_transform::prelude::*;
use smack_physics::{
    PhysicsSystems,
    channel::CollisionResponse,
    collision::Collider,
    kinematics::{GravityScale, GroundContact, Velocity},
};

use crate::{WorldSystems, melee::Smack};

pub struct CharacterPlugin;

#[derive(Copy, Clone, Component, Debug, Default)]
#[require(
    Collider::capsule(SmackCharacter::RADIUS, SmackCharacter::HALF_HEIGHT),
    CollisionResponse::PAWN,
    Velocity,
    GravityScale(SmackCharacter::GRAVITY_SCALE),
    CharacterMovement,
    CharacterInput,
    CharacterAnimation,
    JumpState,
    Smack
)]
pub struct SmackCharacter;

/// Movement solver settings.
#[derive(Copy, Clone, Component, Debug, PartialEq)]
pub struct CharacterMovement {
    pub max_walk_speed: f32,
    pub max_acceleration: f32,
    pub braking_deceleration: f32,
    pub ground_friction: f32,
    pub air_control: f32,
    pub jump_velocity: f32,
    pub use_controller_yaw: bool,
}

/// Latest values of the bound input actions.
#[derive(Copy, Clone, Component, Debug, Default, PartialEq)]
pub struct CharacterInput {
    move_axis: f32,
    pub jump: bool,
    pub smack: bool,
}

#[derive(Copy, Clone, Component, Debug, Default, PartialEq, Eq)]
pub enum CharacterAnimation {
    #[default]
    Idle,
    Running,
}

/// Whether the current jump press has been spent. One press gives one jump.
#[derive(Copy, Clone, Component, Debug, Default, PartialEq, Eq)]
pub enum JumpState {
    #[default]
    Ready,
    Spent,
}

/// Possessing controller. Its yaw decides which way the character faces.
#[derive(Copy, Clone, Component, Debug, Default, PartialEq)]
pub struct Controller {
    pub control_rotation: Quat,
}

pub fn apply_character_movement(
    mut query: Query<
        (
            &CharacterInput,
            &CharacterMovement,
            &GroundContact,
            &mut Velocity,
            &mut JumpState,
        ),
        With<SmackCharacter>,
    >,
    time: Res<Time>,
) {
    let delta_secs = time.delta_secs();

    query
        .par_iter_mut()
        .for_each(|(input, movement, contact, mut velocity, mut jump)| {
            let grounded = contact.is_grounded();
            let axis = input.move_axis();
            let linear = velocity.linear();

            if axis != 0.0 {
                let control = if grounded { 1.0 } else { movement.air_control };
                let target = Vec2::new(axis * movement.max_walk_speed, linear.y);
                velocity.accelerate(target, movement.max_acceleration * control * delta_secs);
            } else if grounded && linear.x != 0.0 {
                let decel = movement.braking_deceleration
                    + movement.ground_friction * linear.x.abs();
                velocity.brake_horizontal(decel * delta_secs);
            }

            if !input.jump {
                jump.set_if_neq(JumpState::Ready);
            } else if *jump == JumpState::Ready {
                if grounded {
                    let x = velocity.linear().x;
                    velocity.set_linear(Vec2::new(x, movement.jump_velocity));
                }
                *jump = JumpState::Spent;
            }
        });
}

pub fn update_animation(
    mut query: Query<(&Velocity, &mut CharacterAnimation), With<SmackCharacter>>,
) {
    query.iter_mut().for_each(|(velocity, mut animation)| {
        let desired = if velocity.linear().length_squared() > 0.0 {
            CharacterAnimation::Running
        } else {
            CharacterAnimation::Idle
        };
        animation.set_if_neq(desired);
    });
}

pub fn update_facing(
    mut query: Query<
        (
            &Velocity,
            &CharacterMovement,
            Option<&mut Controller>,
            &mut Transform,
        ),
        With<SmackCharacter>,
    >,
) {
    query
        .iter_mut()
        .for_each(|(velocity, movement, controller, mut transform)| {
            let Some(mut controller) = controller else {
                return;
            };

            let travel = velocity.linear().x;
            if travel < 0.0 {
                controller.set_if_neq(Controller {
                    control_rotation: Quat::from_rotation_y(PI),
                });
            } else if travel > 0.0 {
                controller.set_if_neq(Controller {
                    control_rotation: Quat::IDENTITY,
                });
            }

            if movement.use_controller_yaw && transform.rotation != controller.control_rotation {
                transform.rotation = controller.control_rotation;
            }
        });
}

impl Plugin for CharacterPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            FixedUpdate,
            (
                WorldSystems::Move.before(PhysicsSystems::Integrate),
                WorldSystems::UpdateCharacter
                    .after(PhysicsSystems::Integrate)
                    .after(WorldSystems::Smack),
            ),
        );

        app.add_systems(
            FixedUpdate,
            (
                apply_character_movement.in_set(WorldSystems::Move),
                (update_animation, update_facing)
                    .chain()
                    .in_set(WorldSystems::UpdateCharacter),
            ),
        );
    }
}

impl SmackCharacter {
    pub const RADIUS: f32 = 40.0;
    pub const HALF_HEIGHT: f32 = 96.0;
    pub const GRAVITY_SCALE: f32 = 2.0;

    /// Facing direction in the movement plane.
    pub fn forward(transform: &Transform) -> Dir2 {
        Dir2::new((transform.rotation * Vec3::X).xy()).unwrap_or(Dir2::X)
    }
}

impl CharacterInput {
    pub fn move_axis(&self) -> f32 {
        self.move_axis
    }

    pub fn set_move_axis(&mut self, value: f32) {
        self.move_axis = if value.is_nan() {
            0.0
        } else {
            value.clamp(-1.0, 1.0)
        };
    }
}

impl Default for CharacterMovement {
    fn default() -> Self {
        CharacterMovement {
            max_walk_speed: 600.0,
            max_acceleration: 2048.0,
            braking_deceleration: 2048.0,
            ground_friction: 3.0,
            air_control: 0.8,
            jump_velocity: 1000.0,
            use_controller_yaw: true,
        }
    }
}
