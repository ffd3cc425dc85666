//! The armory: the in-run shop for upgrades, consumables, and skins.
//!
//! Opening it pauses the run. Buttons only emit [`PurchaseRequest`]s; the
//! economy validates and answers through the feedback line.

use bevy::prelude::*;

use crate::{
    game::{
        economy::{NUKE_PRICE, PurchaseRequest, SHIELD_PRICE, ShopFeedback, weapon_upgrade_cost},
        profile::Profile,
        session::Session,
        skins::SKINS,
    },
    menus::Menu,
    theme::{palette, widget},
};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(OnEnter(Menu::Armory), spawn_armory_menu);
    app.add_systems(Update, update_readouts.run_if(in_state(Menu::Armory)));
}

#[derive(Component)]
struct WalletReadout;

#[derive(Component)]
struct FeedbackReadout;

fn spawn_armory_menu(mut commands: Commands) {
    commands.spawn((
        widget::ui_root("Armory Menu"),
        BackgroundColor(Color::srgba(0.01, 0.02, 0.06, 0.92)),
        GlobalZIndex(2),
        DespawnOnExit(Menu::Armory),
        children![
            widget::header("ARMORY"),
            (
                WalletReadout,
                Text(String::new()),
                TextFont::from_font_size(22.0),
                TextColor(palette::GOLD),
            ),
            (
                FeedbackReadout,
                Text(String::new()),
                TextFont::from_font_size(18.0),
                TextColor(palette::TICKER),
            ),
            widget::button("FIRE POWER", buy_weapon),
            widget::button(format!("SHIELD  ${SHIELD_PRICE}"), buy_shield),
            widget::button(format!("SMART BOMB  ${NUKE_PRICE}"), buy_nuke),
            widget::label("HULL SKINS"),
            skin_row(0),
            skin_row(3),
            widget::button("RESUME MISSION", close_menu),
        ],
    ));
}

/// Three skin buttons starting at `base` in catalog order.
fn skin_row(base: usize) -> impl Bundle {
    (
        Name::new("Skin Row"),
        Node {
            column_gap: Val::Px(10.0),
            ..default()
        },
        Pickable::IGNORE,
        children![
            skin_button(base),
            skin_button(base + 1),
            skin_button(base + 2),
        ],
    )
}

fn skin_button(index: usize) -> impl Bundle {
    let entry = &SKINS[index];
    let text = if entry.price == 0 {
        entry.name.to_string()
    } else {
        format!("{} ${}", entry.name, entry.price)
    };
    widget::button_mid(
        text,
        move |_: On<Pointer<Click>>, mut requests: MessageWriter<PurchaseRequest>| {
            requests.write(PurchaseRequest::Skin(index));
        },
    )
}

fn buy_weapon(_: On<Pointer<Click>>, mut requests: MessageWriter<PurchaseRequest>) {
    requests.write(PurchaseRequest::Weapon);
}

fn buy_shield(_: On<Pointer<Click>>, mut requests: MessageWriter<PurchaseRequest>) {
    requests.write(PurchaseRequest::Shield);
}

fn buy_nuke(_: On<Pointer<Click>>, mut requests: MessageWriter<PurchaseRequest>) {
    requests.write(PurchaseRequest::Nuke);
}

fn close_menu(_: On<Pointer<Click>>, mut next_menu: ResMut<NextState<Menu>>) {
    next_menu.set(Menu::None);
}

fn update_readouts(
    profile: Res<Profile>,
    session: Res<Session>,
    feedback: Res<ShopFeedback>,
    mut wallet: Query<&mut Text, (With<WalletReadout>, Without<FeedbackReadout>)>,
    mut line: Query<&mut Text, With<FeedbackReadout>>,
) {
    if let Ok(mut text) = wallet.single_mut() {
        text.0 = format!(
            "$ {}   /   NEXT FIRE POWER ${}",
            profile.credits,
            weapon_upgrade_cost(session.weapon_level)
        );
    }
    if let Ok(mut text) = line.single_mut() {
        text.0 = feedback.current().unwrap_or_default().to_string();
    }
}
