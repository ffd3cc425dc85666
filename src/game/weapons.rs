//! Bullet emission and motion for both sides.
//!
//! A single shared clock gates volleys; the weapon tier sets the volley
//! interval and the fan of muzzle offsets/angles. Angled streams drift
//! sideways by `sin(angle) * speed` on top of their constant climb.

use bevy::prelude::*;

use super::{
    ARENA_BOTTOM, ARENA_LEFT, ARENA_RIGHT, ARENA_TOP, SimStep, Z_BULLETS,
    player::{PLAYER_SIZE, Player},
    session::Session,
};
use crate::{audio::AudioCue, screens::Screen};

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<VolleyClock>();

    app.add_systems(OnEnter(Screen::Gameplay), reset_volley_clock);

    app.add_systems(Update, fire_volleys.in_set(SimStep::Fire));
    app.add_systems(
        Update,
        (move_bullets, move_enemy_bullets).in_set(SimStep::Move),
    );
    app.add_systems(Update, despawn_spent_bullets.in_set(SimStep::Decay));
}

/// Bullet climb speed (18 px/frame at the reference rate).
pub const BULLET_SPEED: f32 = 1080.0;
pub const BULLET_SIZE: Vec2 = Vec2::new(8.0, 24.0);
pub const ENEMY_BULLET_SIZE: Vec2 = Vec2::new(8.0, 16.0);

/// Bullets are culled this far past the arena edge.
const CULL_MARGIN: f32 = 50.0;

/// Player bullet tracer tint, #fbbf24
const TRACER_COLOR: Color = Color::srgb(0.984, 0.749, 0.141);

/// Seconds between volleys for a weapon tier. Shortens monotonically with
/// the tier and never drops below 120ms.
pub fn volley_interval_secs(weapon_level: u32) -> f32 {
    (300 - 50 * weapon_level.min(3)).max(120) as f32 / 1000.0
}

/// Muzzle layout per weapon tier: (horizontal offset, stream angle).
pub fn stream_layout(weapon_level: u32) -> &'static [(f32, f32)] {
    match weapon_level {
        0 => &[(0.0, 0.0)],
        1 => &[(-12.0, 0.0), (12.0, 0.0)],
        2 => &[(-18.0, -0.05), (0.0, 0.0), (18.0, 0.05)],
        _ => &[(-28.0, -0.1), (-10.0, -0.03), (10.0, 0.03), (28.0, 0.1)],
    }
}

/// A player bullet. `spent` marks it for the end-of-frame cull.
#[derive(Component, Debug)]
pub struct Bullet {
    pub angle: f32,
    pub spent: bool,
}

/// A hostile projectile.
#[derive(Component, Debug)]
pub struct EnemyBullet {
    pub velocity: Vec2,
    pub spent: bool,
}

/// Short-lived glow at a muzzle when a stream fires.
#[derive(Component, Debug)]
pub struct MuzzleFlash {
    pub life: f32,
}

/// Shared fire-rate clock for all ships.
#[derive(Resource, Default)]
struct VolleyClock {
    last_shot: f32,
}

fn reset_volley_clock(mut clock: ResMut<VolleyClock>) {
    clock.last_shot = 0.0;
}

fn fire_volleys(
    mut commands: Commands,
    time: Res<Time>,
    mut clock: ResMut<VolleyClock>,
    session: Res<Session>,
    players: Query<(&Transform, &Player)>,
    mut cues: MessageWriter<AudioCue>,
) {
    let now = time.elapsed_secs();
    if now - clock.last_shot <= volley_interval_secs(session.weapon_level) {
        return;
    }
    clock.last_shot = now;

    let mut fired = false;
    for (transform, player) in &players {
        if !player.alive {
            continue;
        }
        let nose = transform.translation.truncate() + Vec2::new(0.0, PLAYER_SIZE / 2.0);
        for &(offset, angle) in stream_layout(session.weapon_level) {
            let muzzle = nose + Vec2::new(offset, 0.0);
            commands.spawn((
                Name::new("Bullet"),
                Bullet {
                    angle,
                    spent: false,
                },
                Sprite::from_color(TRACER_COLOR, BULLET_SIZE),
                Transform::from_translation(muzzle.extend(Z_BULLETS)),
                DespawnOnExit(Screen::Gameplay),
            ));
            commands.spawn((
                Name::new("Muzzle Flash"),
                MuzzleFlash { life: 0.08 },
                Sprite::from_color(Color::srgba(1.0, 1.0, 0.9, 0.9), Vec2::splat(10.0)),
                Transform::from_translation(muzzle.extend(Z_BULLETS)),
                DespawnOnExit(Screen::Gameplay),
            ));
        }
        fired = true;
    }

    if fired {
        cues.write(AudioCue::Laser);
    }
}

fn move_bullets(time: Res<Time>, mut bullets: Query<(&mut Transform, &mut Bullet)>) {
    let dt = time.delta_secs();
    for (mut transform, mut bullet) in &mut bullets {
        transform.translation.y += BULLET_SPEED * dt;
        transform.translation.x += bullet.angle.sin() * BULLET_SPEED * dt;

        let pos = transform.translation;
        if pos.y > ARENA_TOP + CULL_MARGIN
            || pos.x < ARENA_LEFT - CULL_MARGIN
            || pos.x > ARENA_RIGHT + CULL_MARGIN
        {
            bullet.spent = true;
        }
    }
}

fn move_enemy_bullets(time: Res<Time>, mut bullets: Query<(&mut Transform, &mut EnemyBullet)>) {
    let dt = time.delta_secs();
    for (mut transform, mut bullet) in &mut bullets {
        transform.translation += (bullet.velocity * dt).extend(0.0);

        let pos = transform.translation;
        if pos.y < ARENA_BOTTOM - 20.0 || pos.x < ARENA_LEFT - 20.0 || pos.x > ARENA_RIGHT + 20.0 {
            bullet.spent = true;
        }
    }
}

/// Purge everything marked spent during this frame's motion and collision
/// passes. Runs after all resolution so nothing is removed mid-pass.
fn despawn_spent_bullets(
    mut commands: Commands,
    bullets: Query<(Entity, &Bullet)>,
    enemy_bullets: Query<(Entity, &EnemyBullet)>,
) {
    for (entity, bullet) in &bullets {
        if bullet.spent {
            commands.entity(entity).despawn();
        }
    }
    for (entity, bullet) in &enemy_bullets {
        if bullet.spent {
            commands.entity(entity).despawn();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volley_interval_shrinks_with_tier_and_floors() {
        assert_eq!(volley_interval_secs(0), 0.300);
        assert_eq!(volley_interval_secs(1), 0.250);
        assert_eq!(volley_interval_secs(2), 0.200);
        assert_eq!(volley_interval_secs(3), 0.150);
        // Tier is capped, so the interval never reaches the 120ms floor today,
        // but out-of-range input must still respect it.
        assert!(volley_interval_secs(99) >= 0.120);
    }

    #[test]
    fn stream_count_grows_with_tier() {
        assert_eq!(stream_layout(0).len(), 1);
        assert_eq!(stream_layout(1).len(), 2);
        assert_eq!(stream_layout(2).len(), 3);
        assert_eq!(stream_layout(3).len(), 4);
    }

    #[test]
    fn spread_fans_are_symmetric() {
        for tier in 0..=3 {
            let layout = stream_layout(tier);
            let offset_sum: f32 = layout.iter().map(|(o, _)| o).sum();
            let angle_sum: f32 = layout.iter().map(|(_, a)| a).sum();
            assert!(offset_sum.abs() < 1e-6);
            assert!(angle_sum.abs() < 1e-6);
        }
    }
}
