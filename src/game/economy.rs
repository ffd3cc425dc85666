//! The armory: converting credits into upgrades, consumables, and skins.
//!
//! The shop UI never mutates simulation state directly. It writes a
//! [`PurchaseRequest`]; this module validates funds, applies the purchase,
//! and answers through the transient [`ShopFeedback`] line. An insufficient
//! balance changes nothing.

use bevy::prelude::*;

use super::{
    player::Player,
    profile::{Profile, SaveRequested},
    session::Session,
    skins::{SKINS, skin},
};
use crate::audio::AudioCue;

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<ShopFeedback>();
    app.add_message::<PurchaseRequest>();

    // Purchases happen while the armory has the game paused, so none of this
    // lives in the pausable pipeline.
    app.add_systems(Update, (process_purchases, tick_feedback));
}

pub const SHIELD_PRICE: u32 = 100;
pub const NUKE_PRICE: u32 = 200;
pub const MAX_WEAPON_LEVEL: u32 = 3;

/// How long a shop message stays up.
const FEEDBACK_SECS: f32 = 1.5;

/// Next weapon tier price: 150, 300, 450, 600.
pub fn weapon_upgrade_cost(weapon_level: u32) -> u32 {
    (weapon_level + 1) * 150
}

/// Deduct `price` if the balance covers it. Returns whether it did; on
/// `false` the balance is untouched.
pub fn try_spend(credits: &mut u32, price: u32) -> bool {
    if *credits >= price {
        *credits -= price;
        true
    } else {
        false
    }
}

/// A purchase attempt from the armory UI.
#[derive(Message, Debug, Clone, Copy)]
pub enum PurchaseRequest {
    Weapon,
    Shield,
    Nuke,
    Skin(usize),
}

/// The transient shop message line.
#[derive(Resource, Debug, Default)]
pub struct ShopFeedback {
    text: String,
    timer: Timer,
}

impl ShopFeedback {
    pub fn flash(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.timer = Timer::from_seconds(FEEDBACK_SECS, TimerMode::Once);
    }

    pub fn current(&self) -> Option<&str> {
        (!self.timer.finished()).then_some(self.text.as_str())
    }
}

fn tick_feedback(time: Res<Time>, mut feedback: ResMut<ShopFeedback>) {
    feedback.timer.tick(time.delta());
}

fn process_purchases(
    mut requests: MessageReader<PurchaseRequest>,
    mut profile: ResMut<Profile>,
    mut session: ResMut<Session>,
    mut players: Query<&mut Player>,
    mut feedback: ResMut<ShopFeedback>,
    mut cues: MessageWriter<AudioCue>,
    mut saves: MessageWriter<SaveRequested>,
) {
    for request in requests.read() {
        match *request {
            PurchaseRequest::Weapon => {
                if session.weapon_level >= MAX_WEAPON_LEVEL {
                    feedback.flash("MAX POWER REACHED");
                } else if try_spend(&mut profile.credits, weapon_upgrade_cost(session.weapon_level))
                {
                    session.weapon_level += 1;
                    feedback.flash("FIRE POWER UP!");
                    cues.write(AudioCue::PowerUp);
                    saves.write(SaveRequested);
                } else {
                    feedback.flash("NEED MORE CREDITS");
                }
            }
            PurchaseRequest::Shield => {
                if profile.credits < SHIELD_PRICE {
                    feedback.flash("NEED 100 CREDITS");
                } else if players.iter().all(|p| p.has_shield) {
                    feedback.flash("SHIELD FULL");
                } else {
                    profile.credits -= SHIELD_PRICE;
                    for mut player in &mut players {
                        player.has_shield = true;
                    }
                    feedback.flash("PROTECTION ACTIVE");
                    cues.write(AudioCue::PowerUp);
                    saves.write(SaveRequested);
                }
            }
            PurchaseRequest::Nuke => {
                if try_spend(&mut profile.credits, NUKE_PRICE) {
                    profile.nukes += 1;
                    feedback.flash("NUKE ACQUIRED");
                    cues.write(AudioCue::PowerUp);
                    saves.write(SaveRequested);
                } else {
                    feedback.flash("NEED 200 CREDITS");
                }
            }
            PurchaseRequest::Skin(index) if index < SKINS.len() => {
                let entry = skin(index);
                if profile.owns_skin(index) {
                    profile.skin_index = index;
                    feedback.flash(format!("EQUIPPED: {}", entry.name));
                    cues.write(AudioCue::PowerUp);
                    saves.write(SaveRequested);
                } else if try_spend(&mut profile.credits, entry.price) {
                    profile.owned_skins.push(index);
                    profile.skin_index = index;
                    feedback.flash(format!("PURCHASED: {}", entry.name));
                    cues.write(AudioCue::LevelUp);
                    saves.write(SaveRequested);
                } else {
                    feedback.flash(format!("NEED {} CREDITS", entry.price));
                }
            }
            PurchaseRequest::Skin(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weapon_cost_rises_with_tier() {
        assert_eq!(weapon_upgrade_cost(0), 150);
        assert_eq!(weapon_upgrade_cost(1), 300);
        assert_eq!(weapon_upgrade_cost(2), 450);
    }

    #[test]
    fn underfunded_purchase_changes_nothing() {
        // 90 credits against a 100-credit shield: rejected, balance intact.
        let mut credits = 90;
        assert!(!try_spend(&mut credits, SHIELD_PRICE));
        assert_eq!(credits, 90);
    }

    #[test]
    fn funded_purchase_deducts_exactly_the_price() {
        let mut credits = 250;
        assert!(try_spend(&mut credits, NUKE_PRICE));
        assert_eq!(credits, 50);
    }
}
