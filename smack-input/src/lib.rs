use bevy_app::prelude::*;
use bevy_ecs::prelude::*;
use bevy_input::{ButtonInput, InputSystems, keyboard::KeyCode, touch::Touches};
use smack_world::character::{CharacterInput, Controller, SmackCharacter};

pub struct InputPlugin;

/// Keys bound to each character action.
#[derive(Clone, Debug, Resource, PartialEq, Eq)]
pub struct InputBindings {
    pub move_left: Vec<KeyCode>,
    pub move_right: Vec<KeyCode>,
    pub jump: Vec<KeyCode>,
    pub smack: Vec<KeyCode>,
}

/// Characters driven by the local keyboard and touch screen.
#[derive(Copy, Clone, Component, Debug, Default)]
pub struct PlayerControlled;

pub fn read_character_input(
    bindings: Res<InputBindings>,
    keys: Res<ButtonInput<KeyCode>>,
    touches: Option<Res<Touches>>,
    mut characters: Query<&mut CharacterInput, (With<SmackCharacter>, With<PlayerControlled>)>,
) {
    let touching = touches.is_some_and(|touches| touches.iter().next().is_some());

    let mut axis = 0.0;
    if keys.any_pressed(bindings.move_right.iter().copied()) {
        axis += 1.0;
    }
    if keys.any_pressed(bindings.move_left.iter().copied()) {
        axis -= 1.0;
    }

    let jump = touching || keys.any_pressed(bindings.jump.iter().copied());
    let smack = keys.any_pressed(bindings.smack.iter().copied());

    for mut input in &mut characters {
        let mut next = *input;
        next.set_move_axis(axis);
        next.jump = jump;
        next.smack = smack;
        input.set_if_neq(next);
    }
}

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<InputBindings>();
        app.register_required_components::<Controller, PlayerControlled>();

        app.add_systems(PreUpdate, read_character_input.after(InputSystems));
    }
}

impl Default for InputBindings {
    fn default() -> Self {
        InputBindings {
            move_left: vec![KeyCode::KeyA, KeyCode::ArrowLeft],
            move_right: vec![KeyCode::KeyD, KeyCode::ArrowRight],
            jump: vec![KeyCode::Space, KeyCode::KeyW, KeyCode::ArrowUp],
            smack: vec![KeyCode::KeyF, KeyCode::KeyJ],
        }
    }
}

#[cfg(test)]
mod tests {
    use bevy_app::prelude::*;
    use bevy_ecs::prelude::*;
    use bevy_input::{ButtonInput, keyboard::KeyCode};
    use smack_world::character::{CharacterInput, Controller, SmackCharacter};

    use crate::{InputBindings, InputPlugin, PlayerControlled};

    fn make_app() -> App {
        let mut app = App::new();
        app.add_plugins((TaskPoolPlugin::default(), InputPlugin));
        app.init_resource::<ButtonInput<KeyCode>>();
        app
    }

    fn press(app: &mut App, key: KeyCode) {
        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(key);
    }

    fn release(app: &mut App, key: KeyCode) {
        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .release(key);
    }

    fn input(app: &App, entity: Entity) -> CharacterInput {
        *app.world().get::<CharacterInput>(entity).unwrap()
    }

    #[test]
    fn controller_is_player_controlled() {
        let mut app = make_app();

        let player = app.world_mut().spawn((SmackCharacter, Controller::default())).id();
        let npc = app.world_mut().spawn(SmackCharacter).id();

        assert!(app.world().get::<PlayerControlled>(player).is_some());
        assert!(app.world().get::<PlayerControlled>(npc).is_none());
    }

    #[test]
    fn default_bindings() {
        let bindings = InputBindings::default();

        assert!(bindings.move_left.contains(&KeyCode::KeyA));
        assert!(bindings.move_right.contains(&KeyCode::ArrowRight));
        assert!(bindings.jump.contains(&KeyCode::Space));
        assert!(bindings.smack.contains(&KeyCode::KeyF));
    }

    #[test]
    fn move_axis() {
        let mut app = make_app();
        let player = app.world_mut().spawn((SmackCharacter, Controller::default())).id();

        press(&mut app, KeyCode::KeyD);
        app.world_mut().run_schedule(PreUpdate);
        assert_eq!(input(&app, player).move_axis(), 1.0);

        press(&mut app, KeyCode::ArrowLeft);
        app.world_mut().run_schedule(PreUpdate);
        assert_eq!(input(&app, player).move_axis(), 0.0);

        release(&mut app, KeyCode::KeyD);
        app.world_mut().run_schedule(PreUpdate);
        assert_eq!(input(&app, player).move_axis(), -1.0);

        release(&mut app, KeyCode::ArrowLeft);
        app.world_mut().run_schedule(PreUpdate);
        assert_eq!(input(&app, player).move_axis(), 0.0);
    }

    #[test]
    fn jump_and_smack() {
        let mut app = make_app();
        let player = app.world_mut().spawn((SmackCharacter, Controller::default())).id();

        press(&mut app, KeyCode::Space);
        press(&mut app, KeyCode::KeyJ);
        app.world_mut().run_schedule(PreUpdate);
        assert!(input(&app, player).jump);
        assert!(input(&app, player).smack);

        release(&mut app, KeyCode::Space);
        app.world_mut().run_schedule(PreUpdate);
        assert!(!input(&app, player).jump);
        assert!(input(&app, player).smack);

        release(&mut app, KeyCode::KeyJ);
        app.world_mut().run_schedule(PreUpdate);
        assert_eq!(input(&app, player), CharacterInput::default());
    }

    #[test]
    fn custom_bindings() {
        let mut app = make_app();
        app.insert_resource(InputBindings {
            smack: vec![KeyCode::KeyK],
            ..InputBindings::default()
        });
        let player = app.world_mut().spawn((SmackCharacter, Controller::default())).id();

        press(&mut app, KeyCode::KeyF);
        app.world_mut().run_schedule(PreUpdate);
        assert!(!input(&app, player).smack);

        press(&mut app, KeyCode::KeyK);
        app.world_mut().run_schedule(PreUpdate);
        assert!(input(&app, player).smack);
    }

    #[test]
    fn uncontrolled_characters_ignored() {
        let mut app = make_app();
        let npc = app.world_mut().spawn(SmackCharacter).id();

        press(&mut app, KeyCode::KeyD);
        press(&mut app, KeyCode::KeyF);
        app.world_mut().run_schedule(PreUpdate);

        assert_eq!(input(&app, npc), CharacterInput::default());
    }
}
