//! Enemy ships: type roster, difficulty scaling, spawning, motion, fire.
//!
//! The spawn director keeps a small number of regulars alive (2 below score
//! 600, then 3) and stands down entirely while the mothership is on the
//! field. Which type spawns is a weighted roll keyed on the difficulty level.

use bevy::prelude::*;
use rand::Rng;

use super::{
    ARENA_BOTTOM, ARENA_LEFT, ARENA_RIGHT, ARENA_TOP, SimStep, Z_ENEMIES, Z_ENEMY_BULLETS,
    boss::Boss,
    math::ease_toward,
    session::Session,
    weapons::{ENEMY_BULLET_SIZE, EnemyBullet},
};
use crate::screens::Screen;

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<SpawnDirector>();

    app.add_systems(OnEnter(Screen::Gameplay), reset_director);

    app.add_systems(
        Update,
        spawn_enemies
            .in_set(SimStep::Spawn)
            .after(super::boss::spawn_boss),
    );
    app.add_systems(Update, move_enemies.in_set(SimStep::Move));
    app.add_systems(Update, enemy_fire.in_set(SimStep::Ai));
    app.add_systems(
        Update,
        (despawn_destroyed_enemies, apply_hit_flash).in_set(SimStep::Decay),
    );
}

/// Minimum gap between regular spawns.
const SPAWN_COOLDOWN: f32 = 0.8;

/// Spawn-in grace window for regulars (45 frames at the reference rate).
const SPAWN_GRACE: f32 = 0.75;

/// How long the damage flash holds (3 frames at the reference rate).
pub const HIT_FLASH_SECS: f32 = 0.05;

/// Per-frame easing of the spawn-in scale toward 1.
const MATERIALIZE_RATE: f32 = 0.05;

/// Hostile tracer tint, #d946ef
const ENEMY_TRACER_COLOR: Color = Color::srgb(0.851, 0.275, 0.937);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnemyKind {
    Drone,
    Hunter,
    Dasher,
    Elite,
    Boss,
}

/// An enemy ship. Bosses carry an additional [`Boss`] component.
#[derive(Component, Debug)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub hp: f32,
    pub max_hp: f32,
    pub speed: f32,
    pub size: f32,
    /// Tint used for hit/death gore bursts.
    pub blood: Color,
    /// Remaining spawn grace. Decremented only; see DESIGN.md.
    pub grace: f32,
    /// Remaining damage-flash time; the sprite renders solid white while >0.
    pub hit_flash: f32,
}

/// Resolved stats for a spawn at a given difficulty level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyStats {
    pub hp: f32,
    pub speed: f32,
    pub size: f32,
    pub blood: Color,
}

/// Base stats per type, before difficulty scaling. Speeds are px/s
/// (the originals were authored per-frame at 60fps).
fn base_stats(kind: EnemyKind) -> EnemyStats {
    match kind {
        EnemyKind::Drone => EnemyStats {
            hp: 1.0,
            speed: 120.0,
            size: 48.0,
            // #22d3ee
            blood: Color::srgb(0.133, 0.827, 0.933),
        },
        EnemyKind::Hunter => EnemyStats {
            hp: 2.0,
            speed: 180.0,
            size: 48.0,
            // #a855f7
            blood: Color::srgb(0.659, 0.333, 0.969),
        },
        EnemyKind::Dasher => EnemyStats {
            hp: 1.0,
            speed: 300.0,
            size: 40.0,
            // #84cc16
            blood: Color::srgb(0.518, 0.800, 0.086),
        },
        EnemyKind::Elite => EnemyStats {
            hp: 10.0,
            speed: 90.0,
            size: 80.0,
            // #ef4444
            blood: Color::srgb(0.937, 0.267, 0.267),
        },
        EnemyKind::Boss => EnemyStats {
            hp: 400.0,
            speed: 60.0,
            size: 128.0,
            // #f97316
            blood: Color::srgb(0.976, 0.451, 0.086),
        },
    }
}

/// Additive difficulty scaling on top of the base stats.
pub fn scaled_stats(kind: EnemyKind, level: u32) -> EnemyStats {
    let mut stats = base_stats(kind);
    stats.hp += (level as f32 / 1.5).floor();
    if level >= 2 {
        stats.hp += 3.0;
    }
    if level >= 3 {
        stats.hp += 5.0;
    }
    stats.speed += 12.0 * level as f32;
    stats
}

/// Weighted type selection for a difficulty level. `roll` is uniform in
/// [0, 1). Higher levels bias toward the tougher types.
pub fn pick_kind(level: u32, roll: f32) -> EnemyKind {
    if level >= 5 {
        if roll > 0.8 {
            EnemyKind::Elite
        } else if roll > 0.5 {
            EnemyKind::Dasher
        } else if roll > 0.3 {
            EnemyKind::Hunter
        } else {
            EnemyKind::Drone
        }
    } else if level >= 4 {
        if roll > 0.85 {
            EnemyKind::Elite
        } else if roll > 0.6 {
            EnemyKind::Dasher
        } else if roll > 0.3 {
            EnemyKind::Hunter
        } else {
            EnemyKind::Drone
        }
    } else if level >= 3 {
        // Hunter is checked first, so the dasher arm below it can never win.
        // Kept as-is; see DESIGN.md.
        if roll > 0.7 {
            EnemyKind::Hunter
        } else if roll > 0.9 {
            EnemyKind::Dasher
        } else {
            EnemyKind::Drone
        }
    } else if level >= 2 {
        if roll > 0.8 {
            EnemyKind::Hunter
        } else {
            EnemyKind::Drone
        }
    } else {
        EnemyKind::Drone
    }
}

/// Hull tint per type for the flat-sprite rendering path.
pub fn body_color(kind: EnemyKind) -> Color {
    match kind {
        // #d946ef
        EnemyKind::Drone => Color::srgb(0.851, 0.275, 0.937),
        // #0891b2
        EnemyKind::Hunter => Color::srgb(0.031, 0.569, 0.698),
        // #a3e635
        EnemyKind::Dasher => Color::srgb(0.639, 0.902, 0.208),
        // #dc2626
        EnemyKind::Elite => Color::srgb(0.863, 0.149, 0.149),
        // #e2e8f0
        EnemyKind::Boss => Color::srgb(0.886, 0.914, 0.941),
    }
}

/// Spawn pacing state.
#[derive(Resource, Default)]
struct SpawnDirector {
    last_spawn: f32,
}

fn reset_director(mut director: ResMut<SpawnDirector>) {
    director.last_spawn = 0.0;
}

/// Keep the regular population at the cap while no boss is on the field.
fn spawn_enemies(
    mut commands: Commands,
    time: Res<Time>,
    session: Res<Session>,
    mut director: ResMut<SpawnDirector>,
    bosses: Query<(), With<Boss>>,
    regulars: Query<(), (With<Enemy>, Without<Boss>)>,
) {
    if !bosses.is_empty() {
        return;
    }

    let cap = if session.score >= 600 { 3 } else { 2 };
    if regulars.iter().count() >= cap {
        return;
    }

    let now = time.elapsed_secs();
    if now - director.last_spawn <= SPAWN_COOLDOWN {
        return;
    }
    director.last_spawn = now;

    let mut rng = rand::rng();
    let kind = pick_kind(session.level, rng.random::<f32>());
    let stats = scaled_stats(kind, session.level);

    let half = stats.size / 2.0;
    let x = rng.random_range((ARENA_LEFT + half)..(ARENA_RIGHT - half));
    let y = ARENA_TOP + half + 32.0;

    commands.spawn((
        Name::new("Enemy"),
        Enemy {
            kind,
            hp: stats.hp,
            max_hp: stats.hp,
            speed: stats.speed,
            size: stats.size,
            blood: stats.blood,
            grace: SPAWN_GRACE,
            hit_flash: 0.0,
        },
        Sprite::from_color(body_color(kind), Vec2::splat(stats.size)),
        Transform::from_xyz(x, y, Z_ENEMIES).with_scale(Vec3::ZERO),
        DespawnOnExit(Screen::Gameplay),
    ));
}

/// Advance regulars down the arena. The boss moves in its own system.
fn move_enemies(
    mut commands: Commands,
    time: Res<Time>,
    mut enemies: Query<(Entity, &mut Transform, &mut Enemy), Without<Boss>>,
) {
    let dt = time.delta_secs();
    for (entity, mut transform, mut enemy) in &mut enemies {
        transform.translation.y -= enemy.speed * dt;

        let half = enemy.size / 2.0;
        transform.translation.x = transform
            .translation
            .x
            .clamp(ARENA_LEFT + half, ARENA_RIGHT - half);

        enemy.grace = (enemy.grace - dt).max(0.0);

        let scale = transform.scale.x;
        if scale < 1.0 {
            transform.scale = Vec3::splat(ease_toward(scale, 1.0, MATERIALIZE_RATE, dt));
        }

        // Fully past the bottom edge: gone, no kill credit.
        if transform.translation.y < ARENA_BOTTOM - enemy.size {
            commands.entity(entity).despawn();
        }
    }
}

/// Random pot-shots from regulars, more often once the score passes 600.
fn enemy_fire(
    mut commands: Commands,
    time: Res<Time>,
    session: Res<Session>,
    enemies: Query<(&Transform, &Enemy), Without<Boss>>,
) {
    let dt = time.delta_secs();
    // 0.005/frame at the reference rate, doubled past score 600.
    let rate_per_sec = if session.score > 600 { 0.6 } else { 0.3 };
    let mut rng = rand::rng();

    for (transform, enemy) in &enemies {
        if enemy.hp <= 0.0 {
            continue;
        }
        if rng.random::<f32>() >= rate_per_sec * dt {
            continue;
        }
        let muzzle = transform.translation.truncate() - Vec2::new(0.0, enemy.size / 2.0);
        commands.spawn((
            Name::new("Enemy Bullet"),
            EnemyBullet {
                velocity: Vec2::new(0.0, -(enemy.speed + 240.0)),
                spent: false,
            },
            Sprite::from_color(ENEMY_TRACER_COLOR, ENEMY_BULLET_SIZE),
            Transform::from_translation(muzzle.extend(Z_ENEMY_BULLETS)),
            DespawnOnExit(Screen::Gameplay),
        ));
    }
}

/// Purge enemies whose hp reached zero during resolution. Runs after all
/// collision passes so nothing disappears mid-pass.
fn despawn_destroyed_enemies(mut commands: Commands, enemies: Query<(Entity, &Enemy)>) {
    for (entity, enemy) in &enemies {
        if enemy.hp <= 0.0 {
            commands.entity(entity).despawn();
        }
    }
}

/// While the damage flash holds, the sprite renders solid white.
fn apply_hit_flash(time: Res<Time>, mut enemies: Query<(&mut Sprite, &mut Enemy)>) {
    let dt = time.delta_secs();
    for (mut sprite, mut enemy) in &mut enemies {
        if enemy.hit_flash > 0.0 {
            enemy.hit_flash = (enemy.hit_flash - dt).max(0.0);
            sprite.color = Color::WHITE;
        } else {
            sprite.color = body_color(enemy.kind);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_roster_matches_tuning() {
        let drone = scaled_stats(EnemyKind::Drone, 1);
        assert_eq!(drone.hp, 1.0); // floor(1/1.5) adds nothing
        assert_eq!(drone.speed, 132.0);

        let elite = scaled_stats(EnemyKind::Elite, 1);
        assert_eq!(elite.hp, 10.0);
        assert_eq!(elite.size, 80.0);
    }

    #[test]
    fn difficulty_scaling_is_additive() {
        // Level 3: floor(3/1.5)=2, plus the +3 and +5 step bonuses.
        let hunter = scaled_stats(EnemyKind::Hunter, 3);
        assert_eq!(hunter.hp, 2.0 + 2.0 + 3.0 + 5.0);
        assert_eq!(hunter.speed, 180.0 + 36.0);
    }

    #[test]
    fn level_one_spawns_only_drones() {
        for roll in [0.0, 0.5, 0.99] {
            assert_eq!(pick_kind(1, roll), EnemyKind::Drone);
        }
    }

    #[test]
    fn level_five_table_spans_the_roster() {
        assert_eq!(pick_kind(5, 0.1), EnemyKind::Drone);
        assert_eq!(pick_kind(5, 0.4), EnemyKind::Hunter);
        assert_eq!(pick_kind(5, 0.6), EnemyKind::Dasher);
        assert_eq!(pick_kind(5, 0.9), EnemyKind::Elite);
    }

    #[test]
    fn level_four_exists_only_in_the_table() {
        // Unreachable through the score gate, but the table still answers.
        assert_eq!(pick_kind(4, 0.9), EnemyKind::Elite);
        assert_eq!(pick_kind(4, 0.7), EnemyKind::Dasher);
        assert_eq!(pick_kind(4, 0.4), EnemyKind::Hunter);
        assert_eq!(pick_kind(4, 0.1), EnemyKind::Drone);
    }

    #[test]
    fn level_three_dasher_arm_is_dead() {
        // The hunter check shadows the dasher check at level 3.
        assert_eq!(pick_kind(3, 0.95), EnemyKind::Hunter);
        assert_eq!(pick_kind(3, 0.5), EnemyKind::Drone);
    }
}
