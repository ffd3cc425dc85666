//! The main menu (seen on the title screen).

use bevy::prelude::*;

use crate::{
    game::{profile::Profile, session::Squad},
    menus::Menu,
    screens::Screen,
    theme::widget,
};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(OnEnter(Menu::Main), spawn_main_menu);
}

fn spawn_main_menu(mut commands: Commands, profile: Res<Profile>) {
    let high_score = format!("HIGH SCORE  {}", profile.high_score);

    commands.spawn((
        widget::ui_root("Main Menu"),
        GlobalZIndex(2),
        DespawnOnExit(Menu::Main),
        #[cfg(not(target_family = "wasm"))]
        children![
            widget::header("NOVASTRIKE"),
            widget::label(high_score.clone()),
            widget::button("LAUNCH", launch_solo),
            widget::button("LAUNCH CO-OP", launch_duo),
            widget::button("EXIT", exit_app),
        ],
        #[cfg(target_family = "wasm")]
        children![
            widget::header("NOVASTRIKE"),
            widget::label(high_score),
            widget::button("LAUNCH", launch_solo),
            widget::button("LAUNCH CO-OP", launch_duo),
        ],
    ));
}

fn launch_solo(
    _: On<Pointer<Click>>,
    mut squad: ResMut<Squad>,
    mut next_screen: ResMut<NextState<Screen>>,
) {
    squad.players = 1;
    next_screen.set(Screen::Gameplay);
}

fn launch_duo(
    _: On<Pointer<Click>>,
    mut squad: ResMut<Squad>,
    mut next_screen: ResMut<NextState<Screen>>,
) {
    squad.players = 2;
    next_screen.set(Screen::Gameplay);
}

#[cfg(not(target_family = "wasm"))]
fn exit_app(_: On<Pointer<Click>>, mut app_exit: MessageWriter<AppExit>) {
    app_exit.write(AppExit::Success);
}
