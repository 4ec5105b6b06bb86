use bevy_app::prelude::*;
use bevy_color::Color;
use bevy_ecs::{lifecycle::HookContext, prelude::*, world::DeferredWorld};
use bevy_math::prelude::*;
use bevy_sprite::prelude::*;
use smack_world::{
    character::{CharacterAnimation, SmackCharacter},
    smackable::SmackableObject,
};

pub struct SpritePlugin;

#[derive(Copy, Clone, Component, Debug, Default)]
#[require(Sprite)]
#[component(on_add = CharacterSprite::on_add)]
pub struct CharacterSprite;

#[derive(Copy, Clone, Component, Debug, Default)]
#[require(Sprite)]
#[component(on_add = SmackableSprite::on_add)]
pub struct SmackableSprite;

impl Plugin for SpritePlugin {
    fn build(&self, app: &mut App) {
        app.register_required_components::<SmackCharacter, CharacterSprite>();
        app.register_required_components::<SmackableObject, SmackableSprite>();

        app.add_systems(PostUpdate, update_character_sprites);
    }
}

pub fn update_character_sprites(
    mut query: Query<
        (&CharacterAnimation, &mut Sprite),
        (With<CharacterSprite>, Changed<CharacterAnimation>),
    >,
) {
    query.iter_mut().for_each(|(animation, mut sprite)| {
        sprite.color = CharacterSprite::color(*animation);
    });
}

impl CharacterSprite {
    pub const SIZE: Vec2 = Vec2::new(
        2.0 * SmackCharacter::RADIUS,
        2.0 * SmackCharacter::HALF_HEIGHT,
    );
    pub const IDLE_COLOR: Color = Color::srgb(0.2, 0.4, 0.8);
    pub const RUNNING_COLOR: Color = Color::srgb(0.2, 0.7, 0.4);

    pub fn color(animation: CharacterAnimation) -> Color {
        match animation {
            CharacterAnimation::Idle => CharacterSprite::IDLE_COLOR,
            CharacterAnimation::Running => CharacterSprite::RUNNING_COLOR,
        }
    }

    fn on_add(mut world: DeferredWorld, context: HookContext) {
        if let Some(mut sprite) = world.get_mut::<Sprite>(context.entity) {
            *sprite = Sprite::from_color(CharacterSprite::IDLE_COLOR, CharacterSprite::SIZE);
        }
    }
}

impl SmackableSprite {
    /// Local size; the object's transform scale brings it back to the collider diameter.
    pub const SIZE: Vec2 = Vec2::splat(2.0 * SmackableObject::RADIUS / SmackableObject::SCALE);
    pub const COLOR: Color = Color::srgb(0.9, 0.5, 0.1);

    fn on_add(mut world: DeferredWorld, context: HookContext) {
        if let Some(mut sprite) = world.get_mut::<Sprite>(context.entity) {
            *sprite = Sprite::from_color(SmackableSprite::COLOR, SmackableSprite::SIZE);
        }
    }
}
