use std::time::Duration;

use bevy_app::prelude::*;
use bevy_color::{Color, Mix};
use bevy_ecs::prelude::*;
use bevy_math::{Curve, curve::ExponentialInCurve};
use bevy_sprite::prelude::*;
use bevy_time::{common_conditions::paused, prelude::*};
use smack_world::melee::{Smack, Smacked};

use crate::sprite::SmackableSprite;

pub struct FlashPlugin;

/// Tint on an object that was just smacked. A new smack restarts it.
#[derive(Copy, Clone, Component, Debug, PartialEq)]
pub struct SmackFlash {
    pub elapsed: f32,
    /// Impulse relative to a full smack, in `0..=1`.
    pub strength: f32,
}

impl Plugin for FlashPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (flash_smacked, update_flashes.run_if(not(paused))).chain(),
        );
    }
}

pub fn flash_smacked(mut commands: Commands, mut smacked: MessageReader<Smacked>) {
    for smacked in smacked.read() {
        let Ok(mut target) = commands.get_entity(smacked.target) else {
            continue;
        };

        target.try_insert(SmackFlash::new(smacked.impulse.length()));
    }
}

pub fn update_flashes(
    mut commands: Commands,
    mut flashes: Query<(Entity, &mut SmackFlash, &mut Sprite), With<SmackableSprite>>,
    time: Res<Time>,
) {
    for (id, mut flash, mut sprite) in &mut flashes {
        match ExponentialInCurve.sample(flash.elapsed / SmackFlash::DURATION.as_secs_f32()) {
            Some(t) => {
                sprite.color = flash.color(t);
                flash.elapsed += time.delta_secs();
            }
            None => {
                sprite.color = SmackableSprite::COLOR;
                commands.entity(id).remove::<SmackFlash>();
            }
        }
    }
}

impl SmackFlash {
    pub const DURATION: Duration = Duration::from_millis(300);
    pub const COLOR: Color = Color::srgb(1.0, 1.0, 0.6);

    pub fn new(impulse: f32) -> Self {
        SmackFlash {
            elapsed: 0.0,
            strength: (impulse / Smack::IMPULSE).clamp(0.0, 1.0),
        }
    }

    /// Sprite color at fade progress `t`. Weaker smacks start closer to the base color.
    pub fn color(&self, t: f32) -> Color {
        SmackFlash::COLOR.mix(&SmackableSprite::COLOR, 1.0 - self.strength * (1.0 - t))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use approx::assert_relative_eq;
    use bevy_app::prelude::*;
    use bevy_ecs::prelude::*;
    use bevy_math::prelude::*;
    use bevy_sprite::prelude::*;
    use bevy_time::prelude::*;
    use smack_world::{
        character::SmackCharacter,
        melee::{Smack, Smacked},
        smackable::SmackableObject,
    };

    use crate::{
        flash::{FlashPlugin, SmackFlash},
        sprite::{SmackableSprite, SpritePlugin},
    };

    fn make_app() -> App {
        let mut app = App::new();
        app.add_plugins((TaskPoolPlugin::default(), SpritePlugin, FlashPlugin));
        app.add_message::<Smacked>();
        app.init_resource::<Time>();
        app.init_resource::<Time<Virtual>>();
        app
    }

    fn smack(app: &mut App, target: Entity, impulse: Vec2) {
        let attacker = app.world_mut().spawn(SmackCharacter).id();
        app.world_mut().write_message(Smacked {
            attacker,
            target,
            impulse,
        });
    }

    fn advance(app: &mut App, millis: u64) {
        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::from_millis(millis));
    }

    fn color(app: &App, entity: Entity) -> bevy_color::Color {
        app.world().get::<Sprite>(entity).unwrap().color
    }

    #[test]
    fn flash_fades() {
        let mut app = make_app();
        let target = app.world_mut().spawn(SmackableObject).id();

        smack(&mut app, target, Vec2::new(800.0, 400.0));
        app.world_mut().run_schedule(Update);

        assert_ne!(color(&app, target), SmackableSprite::COLOR);

        advance(&mut app, 400);
        app.world_mut().run_schedule(Update);
        app.world_mut().run_schedule(Update);

        assert_eq!(color(&app, target), SmackableSprite::COLOR);
        assert!(app.world().get::<SmackFlash>(target).is_none());
    }

    #[test]
    fn flash_restarts_on_new_smack() {
        let mut app = make_app();
        let target = app.world_mut().spawn(SmackableObject).id();

        smack(&mut app, target, Vec2::new(Smack::IMPULSE, 0.0));
        app.world_mut().run_schedule(Update);
        advance(&mut app, 100);
        app.world_mut().run_schedule(Update);
        assert!(app.world().get::<SmackFlash>(target).unwrap().elapsed > 0.0);

        smack(&mut app, target, Vec2::new(Smack::IMPULSE, 0.0));
        advance(&mut app, 0);
        app.world_mut().run_schedule(Update);

        assert_eq!(
            *app.world().get::<SmackFlash>(target).unwrap(),
            SmackFlash::new(Smack::IMPULSE)
        );
    }

    #[test]
    fn flash_holds_while_paused() {
        let mut app = make_app();
        let target = app.world_mut().spawn(SmackableObject).id();

        smack(&mut app, target, Vec2::new(800.0, 400.0));
        app.world_mut().resource_mut::<Time<Virtual>>().pause();
        advance(&mut app, 400);
        app.world_mut().run_schedule(Update);
        app.world_mut().run_schedule(Update);

        let flash = app.world().get::<SmackFlash>(target).unwrap();
        assert_eq!(flash.elapsed, 0.0);
        assert_eq!(color(&app, target), SmackableSprite::COLOR);

        app.world_mut().resource_mut::<Time<Virtual>>().unpause();
        app.world_mut().run_schedule(Update);

        assert_ne!(color(&app, target), SmackableSprite::COLOR);
    }

    #[test]
    fn flash_strength_follows_impulse() {
        assert_relative_eq!(SmackFlash::new(Smack::IMPULSE).strength, 1.0);
        assert_relative_eq!(SmackFlash::new(Smack::IMPULSE * 4.0).strength, 1.0);
        assert_relative_eq!(SmackFlash::new(Smack::IMPULSE / 4.0).strength, 0.25);

        let strong = SmackFlash::new(Smack::IMPULSE);
        let weak = SmackFlash::new(Smack::IMPULSE / 4.0);
        assert_ne!(strong.color(0.0), weak.color(0.0));
        assert_eq!(SmackFlash::new(0.0).color(0.0), SmackFlash::new(0.0).color(0.5));
    }

    #[test]
    fn flash_ignores_missing_target() {
        let mut app = make_app();
        let target = app.world_mut().spawn_empty().id();
        app.world_mut().despawn(target);

        smack(&mut app, target, Vec2::X);
        app.world_mut().run_schedule(Update);

        let flashes = app
            .world_mut()
            .query::<&SmackFlash>()
            .iter(app.world())
            .count();
        assert_eq!(flashes, 0);
    }
}
