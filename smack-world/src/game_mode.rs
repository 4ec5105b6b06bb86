use bevy_app::prelude::*;
use bevy_ecs::prelude::*;
use bevy_log::prelude::*;
use bevy_math::prelude::*;
use bevy_transform::prelude::*;

use crate::{
    character::{Controller, SmackCharacter},
    smackable::SmackableObject,
};

pub struct GameModePlugin;

pub struct GameMode;

pub fn spawn_actors(mut commands: Commands) {
    info!("spawning smackable object");
    commands.spawn((SmackableObject, SmackableObject::SPAWN_TRANSFORM));

    commands.spawn((
        SmackCharacter,
        Controller::default(),
        Transform::from_translation(GameMode::PLAYER_START),
    ));
}

impl Plugin for GameModePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_actors);
    }
}

impl GameMode {
    pub const PLAYER_START: Vec3 = Vec3::new(-300.0, SmackCharacter::HALF_HEIGHT, 0.0);
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use bevy_app::prelude::*;
    use bevy_ecs::prelude::*;
    use bevy_math::prelude::*;
    use bevy_transform::prelude::*;

    use crate::{
        character::{Controller, SmackCharacter},
        game_mode::{GameMode, GameModePlugin},
        smackable::SmackableObject,
    };

    #[test]
    fn spawns_one_smackable_and_default_pawn() {
        let mut app = App::new();
        app.add_plugins((TaskPoolPlugin::default(), GameModePlugin));

        app.world_mut().run_schedule(Startup);

        let world = app.world_mut();
        let smackables: Vec<Transform> = world
            .query_filtered::<&Transform, With<SmackableObject>>()
            .iter(world)
            .copied()
            .collect();
        assert_eq!(smackables.len(), 1);
        assert_relative_eq!(smackables[0].translation, Vec3::new(0.0, 500.0, -25.0));
        assert_relative_eq!(smackables[0].scale, Vec3::splat(0.5));

        let characters: Vec<Transform> = world
            .query_filtered::<&Transform, (With<SmackCharacter>, With<Controller>)>()
            .iter(world)
            .copied()
            .collect();
        assert_eq!(characters.len(), 1);
        assert_relative_eq!(characters[0].translation, GameMode::PLAYER_START);
    }
}
