//! The screen state for the main gameplay.
//!
//! Any open menu pauses the simulation; closing the last menu resumes it.
//! The frame loop itself is never torn down mid-frame; pausing just stops
//! the pausable system sets from running, freezing the scene in place.

use bevy::{input::common_conditions::input_just_pressed, prelude::*};

use crate::{Pause, menus::Menu, screens::Screen};

pub(super) fn plugin(app: &mut App) {
    // Toggle the pause menu on Escape.
    app.add_systems(
        Update,
        (
            open_pause_menu.run_if(
                in_state(Screen::Gameplay)
                    .and(in_state(Menu::None))
                    .and(input_just_pressed(KeyCode::Escape)),
            ),
            close_menu.run_if(
                in_state(Screen::Gameplay)
                    .and(in_state(Menu::Pause).or(in_state(Menu::Armory)))
                    .and(input_just_pressed(KeyCode::Escape)),
            ),
        ),
    );

    // Menus own the pause flag while playing.
    app.add_systems(OnExit(Menu::None), pause.run_if(in_state(Screen::Gameplay)));
    app.add_systems(
        OnEnter(Menu::None),
        unpause.run_if(in_state(Screen::Gameplay)),
    );
    app.add_systems(OnExit(Screen::Gameplay), (close_menu, unpause));
}

fn open_pause_menu(mut next_menu: ResMut<NextState<Menu>>) {
    next_menu.set(Menu::Pause);
}

fn close_menu(mut next_menu: ResMut<NextState<Menu>>) {
    next_menu.set(Menu::None);
}

fn pause(mut next_pause: ResMut<NextState<Pause>>) {
    next_pause.set(Pause(true));
}

fn unpause(mut next_pause: ResMut<NextState<Pause>>) {
    next_pause.set(Pause(false));
}
