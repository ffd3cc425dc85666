//! The main game module for the arcade shooter.
//!
//! This module contains all the gameplay logic including:
//! - Player steering, shooting, and shield/hull rules
//! - Enemy spawning with score-driven difficulty
//! - The three-phase mothership encounter
//! - Collision resolution, scoring, and the credit economy
//! - Particles, debris, floating text, and camera shake
//! - The persisted pilot profile (credits, smart bombs, skins, high score)

pub mod background;
pub mod boss;
pub mod combat;
pub mod economy;
pub mod effects;
pub mod enemy;
pub mod hud;
pub mod math;
pub mod player;
pub mod profile;
pub mod session;
pub mod skins;
pub mod weapons;

use bevy::prelude::*;

use crate::{PausableSystems, screens::Screen, theme::palette};

pub(super) fn plugin(app: &mut App) {
    app.insert_resource(ClearColor(palette::BACKDROP));

    // One frame of simulation runs these steps in a fixed order. Rendering
    // happens afterwards from whatever state the steps left behind.
    app.configure_sets(
        Update,
        (
            SimStep::Trim,
            SimStep::Progression,
            SimStep::Spawn,
            SimStep::Steer,
            SimStep::Fire,
            SimStep::Move,
            SimStep::Ai,
            SimStep::Resolve,
            SimStep::Decay,
            SimStep::Publish,
        )
            .chain()
            .in_set(PausableSystems)
            .run_if(in_state(Screen::Gameplay)),
    );

    app.add_plugins((
        background::plugin,
        boss::plugin,
        combat::plugin,
        economy::plugin,
        effects::plugin,
        enemy::plugin,
        hud::plugin,
        player::plugin,
        profile::plugin,
        session::plugin,
        weapons::plugin,
    ));
}

/// The fixed per-frame simulation order.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimStep {
    /// Opportunistic effect-pool trimming, oldest entries first.
    Trim,
    /// Score-gated weapon/difficulty progression.
    Progression,
    /// Boss trigger and regular enemy spawning.
    Spawn,
    /// Input mapping and player movement.
    Steer,
    /// Player bullet emission.
    Fire,
    /// Bullet, enemy, and background motion.
    Move,
    /// Boss state machine and enemy fire decisions.
    Ai,
    /// Collision resolution, damage, scoring.
    Resolve,
    /// Effect decay, cleanup of spent entities, camera shake.
    Decay,
    /// One-way projection of simulation state into the HUD.
    Publish,
}

pub const ARENA_WIDTH: f32 = 960.0;
pub const ARENA_HEIGHT: f32 = 720.0;

pub const ARENA_LEFT: f32 = -ARENA_WIDTH / 2.0;
pub const ARENA_RIGHT: f32 = ARENA_WIDTH / 2.0;
pub const ARENA_TOP: f32 = ARENA_HEIGHT / 2.0;
pub const ARENA_BOTTOM: f32 = -ARENA_HEIGHT / 2.0;

// Draw layers, back to front.
pub const Z_NEBULA: f32 = -11.0;
pub const Z_STARS: f32 = -10.0;
pub const Z_DUST: f32 = -9.0;
pub const Z_DEBRIS: f32 = 1.0;
pub const Z_PARTICLES: f32 = 2.0;
pub const Z_PLAYERS: f32 = 3.0;
pub const Z_BULLETS: f32 = 4.0;
pub const Z_ENEMIES: f32 = 5.0;
pub const Z_ENEMY_BULLETS: f32 = 6.0;
pub const Z_TEXT: f32 = 8.0;
