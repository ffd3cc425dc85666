//! Transient visual effects: particles, debris, floating text, camera shake.
//!
//! Pools are hard-capped. Spawn requests past a cap are dropped; existing
//! effects always live out their decay. An opportunistic trim at the start of
//! the frame evicts the oldest entries if a pool somehow overfills.

use bevy::{color::Alpha, prelude::*};
use rand::Rng;

use super::{
    SimStep, Z_DEBRIS, Z_PARTICLES, Z_TEXT, math::frame_decay, weapons::MuzzleFlash,
};
use crate::screens::Screen;

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<CameraShake>();
    app.init_resource::<EffectSeq>();
    app.add_message::<Burst>();
    app.add_message::<DebrisChunk>();
    app.add_message::<TextPopup>();

    app.add_systems(OnEnter(Screen::Gameplay), reset_camera_shake);

    app.add_systems(Update, trim_pools.in_set(SimStep::Trim));
    app.add_systems(
        Update,
        (
            spawn_bursts,
            spawn_debris,
            spawn_popups,
            advance_particles,
            advance_debris,
            advance_popups,
            advance_muzzle_flashes,
            apply_camera_shake,
        )
            .chain()
            .in_set(SimStep::Decay),
    );
}

/// Hard ceiling on live particles.
pub const PARTICLE_CAP: usize = 150;
/// Hard ceiling on live debris chunks.
pub const DEBRIS_CAP: usize = 5;

/// Velocity and lifetime families for particle spawns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BurstKind {
    Spark,
    Blood,
    Explosion,
    Thruster,
    Glow,
}

impl BurstKind {
    /// Per-request clamp on how many particles a single burst may add.
    fn per_burst_limit(self) -> u32 {
        match self {
            BurstKind::Explosion => 8,
            BurstKind::Blood => 12,
            BurstKind::Thruster => 1,
            _ => 2,
        }
    }
}

/// Request a particle burst at a position.
#[derive(Message, Debug, Clone)]
pub struct Burst {
    pub position: Vec2,
    pub color: Color,
    pub count: u32,
    pub kind: BurstKind,
}

/// Request a spinning hull fragment.
#[derive(Message, Debug, Clone)]
pub struct DebrisChunk {
    pub position: Vec2,
    pub size: f32,
    pub color: Color,
}

/// Request floating combat text.
#[derive(Message, Debug, Clone)]
pub struct TextPopup {
    pub position: Vec2,
    pub text: String,
    pub color: Color,
}

/// A single pooled particle.
#[derive(Component, Debug)]
pub struct Particle {
    velocity: Vec2,
    life: f32,
    /// Life lost per second.
    decay: f32,
    gravity: f32,
    /// Per-frame velocity multiplier at the reference rate.
    friction: f32,
    tint: Color,
    seq: u64,
}

/// A spinning hull fragment.
#[derive(Component, Debug)]
pub struct Debris {
    velocity: Vec2,
    life: f32,
    spin: f32,
    tint: Color,
    seq: u64,
}

/// Floating combat text, rising while it fades.
#[derive(Component, Debug)]
pub struct Popup {
    life: f32,
    tint: Color,
}

/// Decaying screen-shake impulse. Applied as a random camera offset scaled
/// by the magnitude, decaying geometrically each frame.
#[derive(Resource, Debug, Default)]
pub struct CameraShake {
    pub magnitude: f32,
}

impl CameraShake {
    /// Kick the shake up to at least `strength`.
    pub fn impulse(&mut self, strength: f32) {
        self.magnitude = self.magnitude.max(strength);
    }

    /// Add a small amount on top of whatever is running.
    pub fn bump(&mut self, strength: f32) {
        self.magnitude += strength;
    }
}

/// Monotonic spawn counter, used for oldest-first eviction.
#[derive(Resource, Debug, Default)]
struct EffectSeq(u64);

impl EffectSeq {
    fn next(&mut self) -> u64 {
        self.0 += 1;
        self.0
    }
}

fn reset_camera_shake(mut shake: ResMut<CameraShake>) {
    shake.magnitude = 0.0;
}

/// Brighten or darken a color by a fraction in [-1, 1].
fn adjust_brightness(color: Color, amount: f32) -> Color {
    let mut srgba = Srgba::from(color);
    for channel in [&mut srgba.red, &mut srgba.green, &mut srgba.blue] {
        if amount > 0.0 {
            *channel += (1.0 - *channel) * amount;
        } else {
            *channel += *channel * amount;
        }
        *channel = channel.clamp(0.0, 1.0);
    }
    srgba.into()
}

/// Turn burst requests into pooled particles, dropping whatever would exceed
/// the cap.
fn spawn_bursts(
    mut commands: Commands,
    mut bursts: MessageReader<Burst>,
    mut seq: ResMut<EffectSeq>,
    live: Query<(), With<Particle>>,
) {
    let mut total = live.iter().count();
    let mut rng = rand::rng();

    for burst in bursts.read() {
        let count = burst.count.min(burst.kind.per_burst_limit());
        for _ in 0..count {
            if total >= PARTICLE_CAP {
                return;
            }
            total += 1;

            // Spark/glow defaults; speeds are px/s (authored per-frame at 60fps).
            let mut velocity = Vec2::new(
                rng.random_range(-240.0..240.0),
                rng.random_range(-240.0..240.0),
            );
            let mut life = 0.5 + rng.random::<f32>() * 0.3;
            let mut size = 2.0;
            let mut gravity = 0.0;
            let mut friction = 0.92;
            let mut decay = 4.8;
            let mut tint = burst.color;

            match burst.kind {
                BurstKind::Blood => {
                    let size_var = rng.random::<f32>();
                    size = size_var * 5.0 + 2.0;
                    let angle = rng.random::<f32>() * std::f32::consts::TAU;
                    let speed = (rng.random::<f32>() * 6.0 + 2.0) * (1.2 - size_var * 0.5) * 60.0;
                    velocity = Vec2::new(angle.cos(), angle.sin()) * speed;
                    gravity = -540.0;
                    friction = 0.94;
                    life = 0.6 + rng.random::<f32>() * 0.4;
                    decay = 1.8;
                    tint = adjust_brightness(burst.color, rng.random::<f32>() * 0.6 - 0.3);
                }
                BurstKind::Explosion => {
                    size = rng.random::<f32>() * 4.0 + 2.0;
                    life = 0.6;
                }
                BurstKind::Thruster => {
                    velocity = Vec2::new(
                        rng.random_range(-60.0..60.0),
                        -(rng.random::<f32>() * 300.0 + 120.0),
                    );
                    life = 0.2;
                    decay = 9.0;
                }
                BurstKind::Spark | BurstKind::Glow => {}
            }

            commands.spawn((
                Name::new("Particle"),
                Particle {
                    velocity,
                    life,
                    decay,
                    gravity,
                    friction,
                    tint,
                    seq: seq.next(),
                },
                Sprite::from_color(tint, Vec2::splat(size)),
                Transform::from_translation(burst.position.extend(Z_PARTICLES)),
                DespawnOnExit(Screen::Gameplay),
            ));
        }
    }
}

fn spawn_debris(
    mut commands: Commands,
    mut chunks: MessageReader<DebrisChunk>,
    mut seq: ResMut<EffectSeq>,
    live: Query<(), With<Debris>>,
) {
    let mut total = live.iter().count();
    let mut rng = rand::rng();

    for chunk in chunks.read() {
        if total >= DEBRIS_CAP {
            return;
        }
        total += 1;

        commands.spawn((
            Name::new("Debris"),
            Debris {
                velocity: Vec2::new(
                    rng.random_range(-300.0..300.0),
                    rng.random_range(-300.0..300.0),
                ),
                life: 1.0,
                spin: 6.0,
                tint: chunk.color,
                seq: seq.next(),
            },
            Sprite::from_color(chunk.color, Vec2::splat(chunk.size)),
            Transform::from_translation(chunk.position.extend(Z_DEBRIS)),
            DespawnOnExit(Screen::Gameplay),
        ));
    }
}

fn spawn_popups(mut commands: Commands, mut popups: MessageReader<TextPopup>) {
    for popup in popups.read() {
        commands.spawn((
            Name::new("Popup"),
            Popup {
                life: 1.0,
                tint: popup.color,
            },
            Text2d::new(popup.text.clone()),
            TextFont::from_font_size(16.0),
            TextColor(popup.color),
            Transform::from_translation(popup.position.extend(Z_TEXT)),
            DespawnOnExit(Screen::Gameplay),
        ));
    }
}

fn advance_particles(
    mut commands: Commands,
    time: Res<Time>,
    mut particles: Query<(Entity, &mut Transform, &mut Sprite, &mut Particle)>,
) {
    let dt = time.delta_secs();
    for (entity, mut transform, mut sprite, mut particle) in &mut particles {
        let step = particle.velocity * dt;
        transform.translation += step.extend(0.0);
        let gravity_step = particle.gravity * dt;
        particle.velocity.y += gravity_step;
        let drag = frame_decay(particle.friction, dt);
        particle.velocity *= drag;
        particle.life -= particle.decay * dt;

        if particle.life <= 0.0 {
            commands.entity(entity).despawn();
        } else {
            sprite.color = particle.tint.with_alpha(particle.life.clamp(0.0, 1.0));
        }
    }
}

fn advance_debris(
    mut commands: Commands,
    time: Res<Time>,
    mut debris: Query<(Entity, &mut Transform, &mut Sprite, &mut Debris)>,
) {
    let dt = time.delta_secs();
    for (entity, mut transform, mut sprite, mut chunk) in &mut debris {
        let step = chunk.velocity * dt;
        transform.translation += step.extend(0.0);
        let drag = frame_decay(0.95, dt);
        chunk.velocity *= drag;
        transform.rotate_z(chunk.spin * dt);
        chunk.life -= 1.2 * dt;

        if chunk.life <= 0.0 {
            commands.entity(entity).despawn();
        } else {
            sprite.color = chunk.tint.with_alpha(chunk.life.clamp(0.0, 1.0));
        }
    }
}

fn advance_popups(
    mut commands: Commands,
    time: Res<Time>,
    mut popups: Query<(Entity, &mut Transform, &mut TextColor, &mut Popup)>,
) {
    let dt = time.delta_secs();
    for (entity, mut transform, mut color, mut popup) in &mut popups {
        // 1.5 px/frame climb at the reference rate.
        transform.translation.y += 90.0 * dt;
        popup.life -= 1.2 * dt;

        if popup.life <= 0.0 {
            commands.entity(entity).despawn();
        } else {
            color.0 = popup.tint.with_alpha(popup.life.clamp(0.0, 1.0));
        }
    }
}

fn advance_muzzle_flashes(
    mut commands: Commands,
    time: Res<Time>,
    mut flashes: Query<(Entity, &mut Sprite, &mut MuzzleFlash)>,
) {
    let dt = time.delta_secs();
    for (entity, mut sprite, mut flash) in &mut flashes {
        flash.life -= dt;
        if flash.life <= 0.0 {
            commands.entity(entity).despawn();
        } else {
            sprite.color = sprite.color.with_alpha((flash.life / 0.08).clamp(0.0, 1.0));
        }
    }
}

/// Random camera offset scaled by the shake magnitude, decaying ~×0.9 per
/// frame and pinned to zero once negligible.
fn apply_camera_shake(
    time: Res<Time>,
    mut shake: ResMut<CameraShake>,
    mut camera: Query<&mut Transform, With<Camera2d>>,
) {
    let Ok(mut transform) = camera.single_mut() else {
        return;
    };

    if shake.magnitude > 0.0 {
        let mut rng = rand::rng();
        let offset = Vec2::new(
            (rng.random::<f32>() - 0.5) * shake.magnitude,
            (rng.random::<f32>() - 0.5) * shake.magnitude,
        );
        transform.translation.x = offset.x;
        transform.translation.y = offset.y;

        shake.magnitude *= frame_decay(0.9, time.delta_secs());
        if shake.magnitude < 0.5 {
            shake.magnitude = 0.0;
        }
    } else {
        transform.translation.x = 0.0;
        transform.translation.y = 0.0;
    }
}

/// Evict the oldest pool entries if a cap is somehow exceeded. Runs before
/// anything else in the frame, mirroring the original cleanup pass.
fn trim_pools(
    mut commands: Commands,
    particles: Query<(Entity, &Particle)>,
    debris: Query<(Entity, &Debris)>,
) {
    let excess = particles.iter().count().saturating_sub(PARTICLE_CAP);
    if excess > 0 {
        let mut all: Vec<_> = particles.iter().map(|(e, p)| (p.seq, e)).collect();
        all.sort_unstable_by_key(|(seq, _)| *seq);
        for &(_, entity) in all.iter().take(excess) {
            commands.entity(entity).despawn();
        }
    }

    let excess = debris.iter().count().saturating_sub(DEBRIS_CAP);
    if excess > 0 {
        let mut all: Vec<_> = debris.iter().map(|(e, d)| (d.seq, e)).collect();
        all.sort_unstable_by_key(|(seq, _)| *seq);
        for &(_, entity) in all.iter().take(excess) {
            commands.entity(entity).despawn();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burst_limits_keep_bursts_small() {
        assert_eq!(BurstKind::Explosion.per_burst_limit(), 8);
        assert_eq!(BurstKind::Blood.per_burst_limit(), 12);
        assert_eq!(BurstKind::Thruster.per_burst_limit(), 1);
        assert_eq!(BurstKind::Spark.per_burst_limit(), 2);
        assert_eq!(BurstKind::Glow.per_burst_limit(), 2);
    }

    #[test]
    fn shake_impulse_never_lowers_magnitude() {
        let mut shake = CameraShake { magnitude: 40.0 };
        shake.impulse(15.0);
        assert_eq!(shake.magnitude, 40.0);
        shake.impulse(50.0);
        assert_eq!(shake.magnitude, 50.0);
        shake.bump(2.0);
        assert_eq!(shake.magnitude, 52.0);
    }

    #[test]
    fn brightness_adjustment_stays_in_gamut() {
        let base = Color::srgb(0.5, 0.2, 0.9);
        let brighter = Srgba::from(adjust_brightness(base, 0.3));
        assert!(brighter.red > 0.5 && brighter.red <= 1.0);
        let darker = Srgba::from(adjust_brightness(base, -0.3));
        assert!(darker.red < 0.5 && darker.red >= 0.0);
    }
}
