pub mod flash;
pub mod sprite;

use bevy_app::prelude::*;
use bevy_camera::prelude::*;
use bevy_color::Color;
use bevy_ecs::prelude::*;
use bevy_log::prelude::*;
use bevy_math::prelude::*;
use bevy_sprite::prelude::*;
use bevy_transform::prelude::*;
use smack_physics::kinematics::Ground;

use crate::{flash::FlashPlugin, sprite::SpritePlugin};

pub struct RenderPlugin;

/// Visible strip under the ground plane.
#[derive(Copy, Clone, Component, Debug, Default)]
pub struct GroundStrip;

impl Plugin for RenderPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((SpritePlugin, FlashPlugin));
        app.add_systems(Startup, spawn_scene);
    }
}

pub fn spawn_scene(mut commands: Commands, ground: Option<Res<Ground>>) {
    let height = ground.map_or(0.0, |ground| ground.height);
    debug!("spawning side view camera over ground at {height}");

    commands.spawn((Camera2d, Transform::from_xyz(0.0, GroundStrip::CAMERA_HEIGHT, 0.0)));
    commands.spawn((
        GroundStrip,
        Sprite::from_color(GroundStrip::COLOR, GroundStrip::SIZE),
        Transform::from_xyz(0.0, height - GroundStrip::SIZE.y / 2.0, -100.0),
    ));
}

impl GroundStrip {
    pub const SIZE: Vec2 = Vec2::new(4000.0, 40.0);
    pub const COLOR: Color = Color::srgb(0.3, 0.25, 0.2);
    pub const CAMERA_HEIGHT: f32 = 250.0;
}
