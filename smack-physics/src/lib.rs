pub mod channel;
pub mod collision;
pub mod kinematics;

use bevy_app::prelude::*;
use bevy_ecs::prelude::*;

use crate::kinematics::KinematicsPlugin;

pub struct PhysicsPlugin;

#[derive(Debug, PartialEq, Eq, Clone, Hash, SystemSet)]
pub enum PhysicsSystems {
    Integrate,
}

impl Plugin for PhysicsPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(KinematicsPlugin);
    }
}
