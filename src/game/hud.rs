//! The in-game HUD: score, credits, ticker, lives, boss bar, action buttons.
//!
//! Strictly a one-way projection. Once per frame the publish step copies
//! score/credits/lives/boss health out of the simulation into these nodes;
//! the only path back in is the message a button writes.

use std::borrow::Cow;

use bevy::{
    ecs::{spawn::SpawnWith, system::IntoObserverSystem},
    prelude::*,
    ui::Val::*,
};

use super::{
    SimStep,
    boss::Boss,
    combat::NukeRequested,
    enemy::Enemy,
    player::Player,
    profile::Profile,
    session::{Session, Squad, StatusLine},
};
use crate::{
    menus::Menu,
    screens::Screen,
    theme::{interaction::InteractionPalette, palette},
};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(OnEnter(Screen::Gameplay), spawn_hud);
    app.add_systems(
        Update,
        (
            update_readouts,
            update_hearts,
            update_boss_bar,
            update_nuke_button,
        )
            .in_set(SimStep::Publish),
    );
}

const PIP_SIZE: f32 = 16.0;
const PIP_OFF: Color = Color::srgb(0.12, 0.16, 0.22);

#[derive(Component)]
struct ScoreReadout;

#[derive(Component)]
struct CreditsReadout;

#[derive(Component)]
struct TickerReadout;

/// One hull pip in a player's lives row.
#[derive(Component)]
struct HeartPip {
    player: u8,
    index: i32,
}

#[derive(Component)]
struct BossBarRoot;

#[derive(Component)]
struct BossBarFill;

#[derive(Component)]
struct BossBarPct;

#[derive(Component)]
struct NukeButton;

fn spawn_hud(mut commands: Commands, squad: Res<Squad>) {
    commands.spawn((
        Name::new("HUD"),
        Node {
            position_type: PositionType::Absolute,
            width: Percent(100.0),
            height: Percent(100.0),
            padding: UiRect::all(Px(12.0)),
            justify_content: JustifyContent::SpaceBetween,
            align_items: AlignItems::FlexStart,
            ..default()
        },
        Pickable::IGNORE,
        GlobalZIndex(1),
        DespawnOnExit(Screen::Gameplay),
        children![left_column(), right_column(squad.players), boss_bar()],
    ));
}

fn left_column() -> impl Bundle {
    (
        Name::new("HUD Left"),
        Node {
            flex_direction: FlexDirection::Column,
            row_gap: Px(8.0),
            ..default()
        },
        Pickable::IGNORE,
        children![
            (
                Name::new("Score Panel"),
                Node {
                    flex_direction: FlexDirection::Column,
                    padding: UiRect::axes(Px(16.0), Px(8.0)),
                    row_gap: Px(2.0),
                    ..default()
                },
                BackgroundColor(Color::srgba(0.06, 0.09, 0.16, 0.6)),
                BorderRadius::all(Px(12.0)),
                Pickable::IGNORE,
                children![
                    (
                        CreditsReadout,
                        Text("$ 0".to_string()),
                        TextFont::from_font_size(24.0),
                        TextColor(palette::GOLD),
                        Pickable::IGNORE,
                    ),
                    (
                        ScoreReadout,
                        Text("SCORE 0".to_string()),
                        TextFont::from_font_size(18.0),
                        TextColor(palette::HEADER_TEXT),
                        Pickable::IGNORE,
                    ),
                ],
            ),
            (
                TickerReadout,
                Text("SYSTEMS ONLINE...".to_string()),
                TextFont::from_font_size(12.0),
                TextColor(palette::TICKER),
                Pickable::IGNORE,
            ),
        ],
    )
}

fn right_column(players: u32) -> impl Bundle {
    (
        Name::new("HUD Right"),
        Node {
            flex_direction: FlexDirection::Column,
            align_items: AlignItems::FlexEnd,
            row_gap: Px(10.0),
            ..default()
        },
        Pickable::IGNORE,
        Children::spawn(SpawnWith(move |parent: &mut ChildSpawner| {
            for player in 0..players as u8 {
                parent.spawn(lives_row(player));
            }
            parent.spawn((
                Name::new("HUD Buttons"),
                Node {
                    column_gap: Px(8.0),
                    ..default()
                },
                Pickable::IGNORE,
                children![
                    hud_button("ARMORY", open_armory),
                    (hud_button("NUKE", fire_nuke), NukeButton),
                    hud_button("| |", open_pause),
                ],
            ));
        })),
    )
}

fn lives_row(player: u8) -> impl Bundle {
    (
        Name::new("Lives"),
        Node {
            column_gap: Px(4.0),
            ..default()
        },
        Pickable::IGNORE,
        Children::spawn(SpawnWith(move |parent: &mut ChildSpawner| {
            for index in 0..6 {
                parent.spawn((
                    HeartPip { player, index },
                    Node {
                        width: Px(PIP_SIZE),
                        height: Px(PIP_SIZE),
                        ..default()
                    },
                    BackgroundColor(palette::DANGER),
                    BorderRadius::all(Px(4.0)),
                    Pickable::IGNORE,
                ));
            }
        })),
    )
}

fn boss_bar() -> impl Bundle {
    (
        Name::new("Boss Bar"),
        BossBarRoot,
        Node {
            position_type: PositionType::Absolute,
            top: Px(70.0),
            left: Percent(50.0),
            margin: UiRect::left(Px(-210.0)),
            width: Px(420.0),
            flex_direction: FlexDirection::Column,
            row_gap: Px(4.0),
            ..default()
        },
        Visibility::Hidden,
        Pickable::IGNORE,
        children![
            (
                Name::new("Boss Bar Labels"),
                Node {
                    justify_content: JustifyContent::SpaceBetween,
                    ..default()
                },
                Pickable::IGNORE,
                children![
                    (
                        Text("WARNING: CLASS 5 TITAN".to_string()),
                        TextFont::from_font_size(12.0),
                        TextColor(palette::DANGER),
                        Pickable::IGNORE,
                    ),
                    (
                        BossBarPct,
                        Text("100%".to_string()),
                        TextFont::from_font_size(12.0),
                        TextColor(palette::DANGER),
                        Pickable::IGNORE,
                    ),
                ],
            ),
            (
                Name::new("Boss Bar Track"),
                Node {
                    width: Percent(100.0),
                    height: Px(10.0),
                    ..default()
                },
                BackgroundColor(Color::srgba(0.1, 0.02, 0.04, 0.8)),
                BorderRadius::MAX,
                Pickable::IGNORE,
                children![(
                    BossBarFill,
                    Node {
                        width: Percent(100.0),
                        height: Percent(100.0),
                        ..default()
                    },
                    BackgroundColor(palette::DANGER),
                    BorderRadius::MAX,
                    Pickable::IGNORE,
                )],
            ),
        ],
    )
}

/// A compact HUD button in the style of the menu widgets.
fn hud_button<E, B, M, I>(text: impl Into<Cow<'static, str>>, action: I) -> impl Bundle
where
    E: EntityEvent,
    B: Bundle,
    I: IntoObserverSystem<E, B, M>,
{
    let text = text.into();
    let action = IntoObserverSystem::into_system(action);
    (
        Name::new("HUD Button"),
        Node::default(),
        Children::spawn(SpawnWith(move |parent: &mut ChildSpawner| {
            parent
                .spawn((
                    Button,
                    Node {
                        padding: UiRect::axes(Px(14.0), Px(8.0)),
                        align_items: AlignItems::Center,
                        justify_content: JustifyContent::Center,
                        ..default()
                    },
                    BorderRadius::all(Px(10.0)),
                    BackgroundColor(palette::BUTTON_BACKGROUND),
                    InteractionPalette {
                        none: palette::BUTTON_BACKGROUND,
                        hovered: palette::BUTTON_HOVERED_BACKGROUND,
                        pressed: palette::BUTTON_PRESSED_BACKGROUND,
                    },
                    children![(
                        Text(text.into_owned()),
                        TextFont::from_font_size(16.0),
                        TextColor(palette::BUTTON_TEXT),
                        Pickable::IGNORE,
                    )],
                ))
                .observe(action);
        })),
    )
}

fn open_armory(_: On<Pointer<Click>>, mut next_menu: ResMut<NextState<Menu>>) {
    next_menu.set(Menu::Armory);
}

fn open_pause(_: On<Pointer<Click>>, mut next_menu: ResMut<NextState<Menu>>) {
    next_menu.set(Menu::Pause);
}

fn fire_nuke(_: On<Pointer<Click>>, mut nukes: MessageWriter<NukeRequested>) {
    nukes.write(NukeRequested);
}

fn update_readouts(
    session: Res<Session>,
    profile: Res<Profile>,
    status: Res<StatusLine>,
    mut score: Query<&mut Text, (With<ScoreReadout>, Without<CreditsReadout>)>,
    mut credits: Query<&mut Text, (With<CreditsReadout>, Without<TickerReadout>)>,
    mut ticker: Query<&mut Text, (With<TickerReadout>, Without<ScoreReadout>)>,
) {
    if let Ok(mut text) = score.single_mut() {
        text.0 = format!("SCORE {}", session.score);
    }
    if let Ok(mut text) = credits.single_mut() {
        text.0 = format!("$ {}", profile.credits);
    }
    if let Ok(mut text) = ticker.single_mut() {
        text.0.clone_from(&status.text);
    }
}

fn update_hearts(
    players: Query<&Player>,
    mut pips: Query<(&HeartPip, &mut BackgroundColor)>,
) {
    for (pip, mut background) in &mut pips {
        let Some(player) = players.iter().find(|p| p.id == pip.player) else {
            continue;
        };
        *background = if pip.index < player.hp {
            palette::DANGER.into()
        } else {
            PIP_OFF.into()
        };
    }
}

fn update_boss_bar(
    bosses: Query<&Enemy, With<Boss>>,
    mut root: Query<&mut Visibility, With<BossBarRoot>>,
    mut fill: Query<&mut Node, With<BossBarFill>>,
    mut pct: Query<&mut Text, With<BossBarPct>>,
) {
    let Ok(mut visibility) = root.single_mut() else {
        return;
    };

    if let Ok(enemy) = bosses.single() {
        *visibility = Visibility::Visible;
        let fraction = (enemy.hp / enemy.max_hp).clamp(0.0, 1.0);
        if let Ok(mut node) = fill.single_mut() {
            node.width = Percent(fraction * 100.0);
        }
        if let Ok(mut text) = pct.single_mut() {
            text.0 = format!("{}%", (fraction * 100.0).floor());
        }
    } else {
        *visibility = Visibility::Hidden;
    }
}

fn update_nuke_button(profile: Res<Profile>, mut buttons: Query<&mut Node, With<NukeButton>>) {
    for mut node in &mut buttons {
        node.display = if profile.nukes > 0 {
            Display::Flex
        } else {
            Display::None
        };
    }
}
