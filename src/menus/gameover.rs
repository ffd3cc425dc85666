//! The game over menu, showing the final run report.

use bevy::prelude::*;

use crate::{
    game::{profile::Profile, session::LastRun},
    menus::Menu,
    screens::Screen,
    theme::widget,
};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(OnEnter(Menu::GameOver), spawn_gameover_menu);
}

fn spawn_gameover_menu(mut commands: Commands, last_run: Res<LastRun>, profile: Res<Profile>) {
    let (summary, breakdown) = match &last_run.0 {
        Some(stats) => (
            format!(
                "SCORE {}  /  KILLS {}  /  THREAT LVL {}  /  WEAPON TIER {}",
                stats.score, stats.kills, stats.level, stats.weapon_level
            ),
            format!(
                "DRONES {}  HUNTERS {}  DASHERS {}  ELITES {}  BOSS {}",
                stats.enemy_stats.drone,
                stats.enemy_stats.hunter,
                stats.enemy_stats.dasher,
                stats.enemy_stats.elite,
                stats.enemy_stats.boss
            ),
        ),
        None => ("NO FLIGHT DATA".to_string(), String::new()),
    };

    commands.spawn((
        widget::ui_root("Game Over Menu"),
        BackgroundColor(Color::srgba(0.01, 0.02, 0.06, 0.92)),
        GlobalZIndex(2),
        DespawnOnExit(Menu::GameOver),
        children![
            widget::header("MISSION FAILED"),
            widget::label(summary),
            widget::label(breakdown),
            widget::label(format!("HIGH SCORE {}", profile.high_score)),
            widget::button("RETURN TO BASE", quit_to_title),
        ],
    ));
}

fn quit_to_title(_: On<Pointer<Click>>, mut next_screen: ResMut<NextState<Screen>>) {
    next_screen.set(Screen::Title);
}
