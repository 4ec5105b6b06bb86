
use bevy_app::prelude::*;
use bevy_ecs::prelude::*;
use bevy_log::prelude::*;
use bevy_math::prelude::*;
use bevy_transform::prelude::*;
use smack_physics::{
    PhysicsSystems,
    channel::CollisionChannels,
    collision::{LineTrace, PhysicsQuery, TraceHit, TraceParams},
};

use crate::{
    WorldSystems,
    character::{CharacterInput, SmackCharacter},
    smackable::SmackableQuery,
};

pub struct MeleePlugin;

/// Semicircle of trace offsets in front of the character, computed once.
///
/// Offsets are in fan space: `x` is forward and `z` is up. Entry `i` sits at
/// `i * STEP_DEGREES`, measured from straight up towards the facing direction.
#[derive(Clone, Debug, Resource)]
pub struct TraceFan {
    offsets: [Vec3; TraceFan::COUNT],
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum SmackState {
    #[default]
    Armed,
    Consumed,
}

/// Melee hit-streak tracking for a character.
#[derive(Copy, Clone, Component, Debug, Default)]
pub struct Smack {
    state: SmackState,
    hits: u32,
}

#[derive(Copy, Clone, Debug)]
pub struct SweepRequest {
    pub origin: Vec2,
    pub forward: Dir2,
    pub held: bool,
    pub ignore: Option<Entity>,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SweepOutcome {
    pub hits: u32,
    pub impulsed: Option<Entity>,
}

#[derive(Copy, Clone, Debug, Message)]
pub struct Smacked {
    pub attacker: Entity,
    pub target: Entity,
    pub impulse: Vec2,
}

pub fn smack_sweep(
    fan: Res<TraceFan>,
    physics: PhysicsQuery,
    mut characters: Query<(Entity, &Transform, &CharacterInput, &mut Smack), With<SmackCharacter>>,
    mut smackables: Query<SmackableQuery>,
    mut smacked: MessageWriter<Smacked>,
) {
    for (id, transform, input, mut smack) in &mut characters {
        let forward = SmackCharacter::forward(transform);
        let direction = Smack::impulse_direction(forward);
        let request = SweepRequest {
            origin: transform.translation.xy(),
            forward,
            held: input.smack,
            ignore: Some(id),
        };

        let outcome = smack.sweep(&fan, &request, &physics, |hit| {
            let Ok(mut smackable) = smackables.get_mut(hit.entity) else {
                debug!("{id} hit {}, which is not smackable", hit.entity);
                return false;
            };

            smackable.apply_impulse(direction, Smack::IMPULSE);
            true
        });

        if let Some(target) = outcome.impulsed {
            debug!("{id} smacked {target}");
            smacked.write(Smacked {
                attacker: id,
                target,
                impulse: direction * Smack::IMPULSE,
            });
        }
    }
}

impl Plugin for MeleePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(TraceFan::default());
        app.add_message::<Smacked>();

        app.configure_sets(
            FixedUpdate,
            WorldSystems::Smack.after(PhysicsSystems::Integrate),
        );

        app.add_systems(FixedUpdate, smack_sweep.in_set(WorldSystems::Smack));
    }
}

impl TraceFan {
    pub const COUNT: usize = 19;
    pub const STEP_DEGREES: f32 = 10.0;
    pub const RADIUS: f32 = 150.0;

    pub fn new(radius: f32) -> Self {
        TraceFan {
            offsets: std::array::from_fn(|index| {
                let (sin, cos) = TraceFan::angle_degrees(index).to_radians().sin_cos();
                Vec3::new(radius * sin, 0.0, radius * cos)
            }),
        }
    }

    pub fn offsets(&self) -> &[Vec3] {
        &self.offsets
    }

    pub fn angle_degrees(index: usize) -> f32 {
        index as f32 * TraceFan::STEP_DEGREES
    }

    pub fn endpoint(origin: Vec2, forward: Dir2, offset: Vec3) -> Vec2 {
        origin + forward * offset.x + Vec2::Y * offset.z
    }
}

impl Default for TraceFan {
    fn default() -> Self {
        TraceFan::new(TraceFan::RADIUS)
    }
}

impl Smack {
    pub const IMPULSE: f32 = 900.0;
    /// Upward tilt added to the facing direction of the impulse.
    pub const LIFT: f32 = 0.5;

    pub fn state(&self) -> SmackState {
        self.state
    }

    pub fn hits(&self) -> u32 {
        self.hits
    }

    pub fn impulse_direction(forward: Dir2) -> Dir2 {
        Dir2::new(forward.as_vec2() + Vec2::Y * Smack::LIFT).unwrap_or(forward)
    }

    /// Traces every fan entry from `request.origin` and resolves at most one impulse per streak.
    ///
    /// `try_impulse` is offered the first hits while the streak is armed and the input held,
    /// and returns whether the hit actor accepted the impulse.
    pub fn sweep<T>(
        &mut self,
        fan: &TraceFan,
        request: &SweepRequest,
        tracer: &T,
        mut try_impulse: impl FnMut(&TraceHit) -> bool,
    ) -> SweepOutcome
    where
        T: LineTrace + ?Sized,
    {
        let params = TraceParams {
            channel: CollisionChannels::SMACKABLE,
            ignore: request.ignore,
        };

        self.hits = 0;
        let mut impulsed = None;

        for (index, &offset) in fan.offsets().iter().enumerate() {
            let end = TraceFan::endpoint(request.origin, request.forward, offset);
            let Some(hit) = tracer.line_trace(request.origin, end, &params) else {
                continue;
            };

            trace!(
                "trace {index} at {}° hit {} at {}",
                TraceFan::angle_degrees(index),
                hit.entity,
                hit.point
            );
            self.hits += 1;

            if request.held && self.state == SmackState::Armed && try_impulse(&hit) {
                self.consume();
                impulsed = Some(hit.entity);
                break;
            }
        }

        self.finish_tick();

        SweepOutcome {
            hits: self.hits,
            impulsed,
        }
    }

    fn consume(&mut self) {
        self.state = SmackState::Consumed;
    }

    fn finish_tick(&mut self) {
        if self.hits == 0 {
            self.state = SmackState::Armed;
        }
    }
}
