pub mod character;
pub mod game_mode;
pub mod melee;
pub mod smackable;

use bevy_app::prelude::*;
use bevy_ecs::prelude::*;

use crate::{character::CharacterPlugin, game_mode::GameModePlugin, melee::MeleePlugin};

pub struct WorldPlugin;

#[derive(Debug, PartialEq, Eq, Clone, Hash, SystemSet)]
pub enum WorldSystems {
    Move,
    Smack,
    UpdateCharacter,
}

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((CharacterPlugin, MeleePlugin, GameModePlugin));
    }
}
