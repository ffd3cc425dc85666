//! Player ships: pointer/touch steering, easing movement, hull state.
//!
//! Input never moves a ship directly. It only writes the ship's *target*;
//! the ship eases toward it every frame, which gives smooth steering with no
//! teleporting. Ships are spawned once per run and deactivated on death,
//! never despawned mid-run.

use bevy::{color::Alpha, prelude::*, window::PrimaryWindow};

use super::{
    ARENA_BOTTOM, ARENA_LEFT, ARENA_RIGHT, ARENA_TOP, SimStep, Z_PLAYERS,
    effects::{Burst, BurstKind},
    math::ease_toward,
    profile::Profile,
    session::Squad,
    skins::ship_color,
};
use crate::screens::Screen;

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<ThrusterClock>();

    app.add_systems(OnEnter(Screen::Gameplay), spawn_players);

    app.add_systems(
        Update,
        (steer_players, move_players).chain().in_set(SimStep::Steer),
    );
    app.add_systems(Update, emit_thruster_exhaust.in_set(SimStep::Move));
    // Equipping a skin in the armory retints ships immediately, paused or not.
    app.add_systems(
        Update,
        apply_skin_tint.run_if(resource_changed::<Profile>.and(in_state(Screen::Gameplay))),
    );
    app.add_systems(
        Update,
        (flicker_invulnerable, draw_shield_rings).in_set(SimStep::Decay),
    );
}

pub const PLAYER_SIZE: f32 = 64.0;
pub const PLAYER_MAX_HP: i32 = 6;

/// Invulnerability window after losing hull integrity.
pub const HIT_INVULN_SECS: f32 = 2.5;
/// Shorter window after a shield absorbs a hit.
pub const SHIELD_INVULN_SECS: f32 = 1.5;

/// Per-frame easing factor toward the steering target.
const STEER_RATE: f32 = 0.2;
/// Per-frame easing of the spawn-in scale toward 1.
const MATERIALIZE_RATE: f32 = 0.05;

/// Ships tilt into their horizontal motion, capped at this angle.
const MAX_TILT: f32 = 0.35;

/// Launch altitude above the bottom edge.
const LAUNCH_Y: f32 = ARENA_BOTTOM + 118.0;

/// Thruster exhaust cadence (every 5 frames at the reference rate).
const THRUSTER_PERIOD: f32 = 5.0 / 60.0;

/// Thruster exhaust tint, #06b6d4
const THRUSTER_COLOR: Color = Color::srgb(0.024, 0.714, 0.831);

/// A player ship.
#[derive(Component, Debug)]
pub struct Player {
    pub id: u8,
    pub hp: i32,
    pub max_hp: i32,
    pub alive: bool,
    pub has_shield: bool,
    /// Collision damage is suppressed while the clock is before this.
    pub invulnerable_until: f32,
    /// Where the ship is easing to, in world coordinates.
    pub target: Vec2,
}

impl Player {
    pub fn invulnerable(&self, now: f32) -> bool {
        now < self.invulnerable_until
    }
}

#[derive(Resource)]
struct ThrusterClock(Timer);

impl Default for ThrusterClock {
    fn default() -> Self {
        Self(Timer::from_seconds(THRUSTER_PERIOD, TimerMode::Repeating))
    }
}

fn spawn_players(mut commands: Commands, squad: Res<Squad>, profile: Res<Profile>) {
    for id in 0..squad.players as u8 {
        // In co-op the ships launch on their own halves of the screen.
        let launch_x = if squad.players == 1 {
            0.0
        } else if id == 0 {
            -80.0
        } else {
            80.0
        };
        let launch = Vec2::new(launch_x, LAUNCH_Y);

        commands.spawn((
            Name::new(format!("Player {}", id + 1)),
            Player {
                id,
                hp: PLAYER_MAX_HP,
                max_hp: PLAYER_MAX_HP,
                alive: true,
                has_shield: false,
                invulnerable_until: 0.0,
                target: launch,
            },
            Sprite::from_color(
                ship_color(profile.skin_index, id),
                Vec2::splat(PLAYER_SIZE),
            ),
            Transform::from_translation(launch.extend(Z_PLAYERS)).with_scale(Vec3::ZERO),
            DespawnOnExit(Screen::Gameplay),
        ));
    }
    info!("Launched {} ship(s)", squad.players);
}

/// Map pointer/touch input to per-player steering targets. A left-button
/// drag steers the first ship; in co-op, touches route by screen half.
fn steer_players(
    window_query: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&Camera, &GlobalTransform)>,
    mouse: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    squad: Res<Squad>,
    mut players: Query<&mut Player>,
) {
    let Ok(window) = window_query.single() else {
        return;
    };
    let Ok((camera, camera_transform)) = camera_query.single() else {
        return;
    };

    if mouse.pressed(MouseButton::Left)
        && let Some(cursor) = window
            .cursor_position()
            .and_then(|p| camera.viewport_to_world_2d(camera_transform, p).ok())
    {
        for mut player in &mut players {
            if player.id == 0 {
                player.target = cursor;
            }
        }
    }

    for touch in touches.iter() {
        let Ok(world) = camera.viewport_to_world_2d(camera_transform, touch.position()) else {
            continue;
        };
        let target_id = if squad.players == 1 {
            0
        } else if world.x < 0.0 {
            0
        } else {
            1
        };
        for mut player in &mut players {
            if player.id == target_id {
                player.target = world;
            }
        }
    }
}

/// Ease each ship toward its target, clamp to the arena, advance the spawn-in
/// scale, and tilt into horizontal motion. The scale never affects collision.
fn move_players(time: Res<Time>, mut players: Query<(&mut Transform, &Player)>) {
    let dt = time.delta_secs();
    let half = PLAYER_SIZE / 2.0;

    for (mut transform, player) in &mut players {
        if !player.alive {
            continue;
        }

        let pos = transform.translation;
        let x = ease_toward(pos.x, player.target.x, STEER_RATE, dt)
            .clamp(ARENA_LEFT + half, ARENA_RIGHT - half);
        let y = ease_toward(pos.y, player.target.y, STEER_RATE, dt)
            .clamp(ARENA_BOTTOM + half, ARENA_TOP - half);
        transform.translation = Vec3::new(x, y, Z_PLAYERS);

        let scale = transform.scale.x;
        if scale < 1.0 {
            let eased = ease_toward(scale, 1.0, MATERIALIZE_RATE, dt);
            transform.scale = Vec3::splat(eased);
        }

        let tilt = ((player.target.x - x) * 0.01).clamp(-MAX_TILT, MAX_TILT);
        transform.rotation = Quat::from_rotation_z(-tilt);
    }
}

/// Twin exhaust trails behind each live ship.
fn emit_thruster_exhaust(
    time: Res<Time>,
    mut clock: ResMut<ThrusterClock>,
    players: Query<(&Transform, &Player)>,
    mut bursts: MessageWriter<Burst>,
) {
    clock.0.tick(time.delta());
    if !clock.0.just_finished() {
        return;
    }

    for (transform, player) in &players {
        if !player.alive {
            continue;
        }
        let tail = transform.translation.truncate() - Vec2::new(0.0, PLAYER_SIZE / 2.0 - 5.0);
        for offset in [-10.0, 10.0] {
            bursts.write(Burst {
                position: tail + Vec2::new(offset, 0.0),
                color: THRUSTER_COLOR,
                count: 1,
                kind: BurstKind::Thruster,
            });
        }
    }
}

fn apply_skin_tint(profile: Res<Profile>, mut players: Query<(&mut Sprite, &Player)>) {
    for (mut sprite, player) in &mut players {
        let alpha = sprite.color.alpha();
        sprite.color = ship_color(profile.skin_index, player.id).with_alpha(alpha);
    }
}

/// Blink the hull while the invulnerability window is open; hide dead ships.
fn flicker_invulnerable(time: Res<Time>, mut players: Query<(&mut Sprite, &Player)>) {
    let now = time.elapsed_secs();
    for (mut sprite, player) in &mut players {
        let alpha = if !player.alive {
            0.0
        } else if player.invulnerable(now) && (now * 10.0) as i64 % 2 == 0 {
            0.5
        } else {
            1.0
        };
        sprite.color.set_alpha(alpha);
    }
}

/// Pulsing ring around shielded ships.
fn draw_shield_rings(time: Res<Time>, mut gizmos: Gizmos, players: Query<(&Transform, &Player)>) {
    let pulse = 0.4 + (time.elapsed_secs() * 5.0).sin() * 0.2;
    for (transform, player) in &players {
        if !player.alive || !player.has_shield {
            continue;
        }
        gizmos.circle_2d(
            Isometry2d::from_translation(transform.translation.truncate()),
            PLAYER_SIZE / 1.4,
            Color::srgba(0.4, 0.8, 1.0, pulse),
        );
    }
}
