use bevy::prelude::*;

use smack_input::InputPlugin as SmackInputPlugin;
use smack_physics::PhysicsPlugin as SmackPhysicsPlugin;
use smack_render::RenderPlugin as SmackRenderPlugin;
use smack_world::WorldPlugin as SmackWorldPlugin;

fn main() {
    App::new()
        .insert_resource(Time::<Fixed>::from_hz(60.0))
        .add_plugins((
            DefaultPlugins,
            SmackPhysicsPlugin,
            SmackWorldPlugin,
            SmackInputPlugin,
            SmackRenderPlugin,
        ))
        .run();
}
