//! The mothership encounter.
//!
//! Spawns once per run, gated on score and an empty field. The phase is a
//! pure function of the remaining-health fraction; transitions are
//! edge-triggered so cues fire exactly once per phase change.

use bevy::prelude::*;

use super::{
    ARENA_LEFT, ARENA_RIGHT, ARENA_TOP, SimStep, Z_ENEMIES, Z_ENEMY_BULLETS,
    effects::CameraShake,
    enemy::{Enemy, EnemyKind, body_color, scaled_stats},
    math::ease_toward,
    player::Player,
    session::{Session, Squad, StatusLine},
    weapons::EnemyBullet,
};
use crate::{audio::AudioCue, screens::Screen};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(Update, spawn_boss.in_set(SimStep::Spawn));
    app.add_systems(Update, boss_ai.in_set(SimStep::Ai));
}

pub const BOSS_SIZE: f32 = 128.0;

/// Score required before the mothership will consider showing up.
pub const BOSS_SCORE_GATE: u32 = 1500;

/// Altitude the boss descends to before starting its sweep.
const HOVER_Y: f32 = ARENA_TOP - 144.0;
const DESCENT_SPEED: f32 = 30.0;

/// Aimed-lane volley period in phase 1 (60 frames at the reference rate).
const VOLLEY_PERIOD: f32 = 1.0;

/// Boss projectile drop speed (6 px/frame at the reference rate).
const BOSS_BULLET_SPEED: f32 = 360.0;
const BOSS_BULLET_SIZE: Vec2 = Vec2::new(12.0, 24.0);

/// Boss projectile tint, #facc15
const BOSS_BULLET_COLOR: Color = Color::srgb(0.980, 0.800, 0.082);

/// Spawn-in grace for the boss (120 frames at the reference rate).
const BOSS_GRACE: f32 = 2.0;

/// Per-frame easing of the spawn-in scale and the phase-2 centering.
const MATERIALIZE_RATE: f32 = 0.05;
const CENTERING_RATE: f32 = 0.05;

/// Boss-only state layered on top of [`Enemy`].
#[derive(Component, Debug)]
pub struct Boss {
    pub phase: u8,
    /// While up, bullets chip for 0.2 hp instead of 1.
    pub shielded: bool,
    attack_clock: f32,
}

/// Phase for a remaining-health fraction. Assumes health only decreases;
/// a healed boss would legally re-enter a lower phase (no direction guard).
pub fn phase_for(health_fraction: f32) -> u8 {
    if health_fraction <= 0.3 {
        3
    } else if health_fraction <= 0.65 {
        2
    } else {
        1
    }
}

/// Mothership hit points scale with the squad size.
pub fn boss_hp(player_count: u32) -> f32 {
    400.0 + player_count as f32 * 200.0
}

/// One boss per run: score past the gate, never spawned before, and the
/// field must be clear of regulars.
pub(super) fn spawn_boss(
    mut commands: Commands,
    mut session: ResMut<Session>,
    squad: Res<Squad>,
    mut status: ResMut<StatusLine>,
    mut shake: ResMut<CameraShake>,
    enemies: Query<(), With<Enemy>>,
) {
    if session.score < BOSS_SCORE_GATE || session.boss_spawned || !enemies.is_empty() {
        return;
    }
    session.boss_spawned = true;

    let hp = boss_hp(squad.players);
    let stats = scaled_stats(EnemyKind::Boss, session.level);

    commands.spawn((
        Name::new("Mothership"),
        Enemy {
            kind: EnemyKind::Boss,
            hp,
            max_hp: hp,
            speed: stats.speed,
            size: BOSS_SIZE,
            blood: stats.blood,
            grace: BOSS_GRACE,
            hit_flash: 0.0,
        },
        Boss {
            phase: 1,
            shielded: false,
            attack_clock: 0.0,
        },
        Sprite::from_color(body_color(EnemyKind::Boss), Vec2::splat(BOSS_SIZE)),
        Transform::from_xyz(0.0, ARENA_TOP + 86.0, Z_ENEMIES).with_scale(Vec3::ZERO),
        DespawnOnExit(Screen::Gameplay),
    ));

    status.set("WARNING: MOTHERSHIP DETECTED");
    shake.impulse(20.0);
}

/// Drive the phase machine, movement pattern, and attack cadence.
fn boss_ai(
    mut commands: Commands,
    time: Res<Time>,
    mut bosses: Query<(&mut Transform, &mut Enemy, &mut Boss)>,
    players: Query<&Player>,
    mut status: ResMut<StatusLine>,
    mut shake: ResMut<CameraShake>,
    mut cues: MessageWriter<AudioCue>,
) {
    let dt = time.delta_secs();
    let t = time.elapsed_secs();

    let Ok((mut transform, mut enemy, mut boss)) = bosses.single_mut() else {
        return;
    };
    if enemy.hp <= 0.0 {
        return;
    }

    // Edge-triggered phase transitions.
    let next = phase_for(enemy.hp / enemy.max_hp);
    if next != boss.phase {
        boss.phase = next;
        match next {
            2 => {
                boss.shielded = true;
                status.set("BOSS: DEFENSE");
                cues.write(AudioCue::PowerUp);
            }
            3 => {
                boss.shielded = false;
                status.set("BOSS: BERSERK");
                shake.impulse(15.0);
            }
            _ => {}
        }
    }

    // Entry descent, then the per-phase sweep.
    if transform.translation.y > HOVER_Y {
        transform.translation.y -= DESCENT_SPEED * dt;
    } else {
        match boss.phase {
            1 => transform.translation.x += (t * 1.25).sin() * 90.0 * dt,
            2 => {
                transform.translation.x =
                    ease_toward(transform.translation.x, 0.0, CENTERING_RATE, dt);
            }
            _ => transform.translation.x += (t * 6.667).sin() * 300.0 * dt,
        }
    }
    let half = BOSS_SIZE / 2.0;
    transform.translation.x = transform
        .translation
        .x
        .clamp(ARENA_LEFT + half, ARENA_RIGHT - half);

    enemy.grace = (enemy.grace - dt).max(0.0);
    let scale = transform.scale.x;
    if scale < 1.0 {
        transform.scale = Vec3::splat(ease_toward(scale, 1.0, MATERIALIZE_RATE, dt));
    }

    // Phase 1: slow aimed-lane projectile on a fixed cadence.
    boss.attack_clock += dt;
    if boss.phase == 1 && boss.attack_clock >= VOLLEY_PERIOD {
        boss.attack_clock = 0.0;
        if players.iter().any(|p| p.alive) {
            let muzzle = transform.translation.truncate() - Vec2::new(0.0, half);
            commands.spawn((
                Name::new("Boss Bullet"),
                EnemyBullet {
                    velocity: Vec2::new(0.0, -BOSS_BULLET_SPEED),
                    spent: false,
                },
                Sprite::from_color(BOSS_BULLET_COLOR, BOSS_BULLET_SIZE),
                Transform::from_translation(muzzle.extend(Z_ENEMY_BULLETS)),
                DespawnOnExit(Screen::Gameplay),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_boundaries() {
        assert_eq!(phase_for(1.0), 1);
        assert_eq!(phase_for(0.66), 1);
        assert_eq!(phase_for(0.65), 2);
        assert_eq!(phase_for(0.31), 2);
        assert_eq!(phase_for(0.3), 3);
        assert_eq!(phase_for(0.299), 3);
        assert_eq!(phase_for(0.0), 3);
    }

    #[test]
    fn boss_hp_scales_with_squad() {
        assert_eq!(boss_hp(1), 600.0);
        assert_eq!(boss_hp(2), 800.0);
    }
}
