//! The scrolling space backdrop: stars, falling dust, and nebula haze.

use bevy::prelude::*;
use rand::Rng;

use super::{
    ARENA_BOTTOM, ARENA_LEFT, ARENA_RIGHT, ARENA_TOP, SimStep, Z_DUST, Z_NEBULA, Z_STARS,
};
use crate::screens::Screen;

pub(super) fn plugin(app: &mut App) {
    app.add_systems(OnEnter(Screen::Gameplay), spawn_backdrop);
    app.add_systems(Update, (advance_dust, drift_nebulas).in_set(SimStep::Move));
}

const STAR_COUNT: usize = 40;
const DUST_COUNT: usize = 25;

/// A slowly falling dust mote that wraps back to the top.
#[derive(Component, Debug)]
struct Dust {
    speed: f32,
}

/// A huge translucent haze disc drifting through the field.
#[derive(Component, Debug)]
struct Nebula {
    velocity: Vec2,
}

fn spawn_backdrop(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    let mut rng = rand::rng();

    for _ in 0..STAR_COUNT {
        let size = rng.random::<f32>() * 2.0 + 0.5;
        commands.spawn((
            Name::new("Star"),
            Sprite::from_color(Color::srgba(1.0, 1.0, 1.0, 0.8), Vec2::splat(size)),
            Transform::from_xyz(
                rng.random_range(ARENA_LEFT..ARENA_RIGHT),
                rng.random_range(ARENA_BOTTOM..ARENA_TOP),
                Z_STARS,
            ),
            DespawnOnExit(Screen::Gameplay),
        ));
    }

    for _ in 0..DUST_COUNT {
        let size = rng.random::<f32>() * 2.0 + 1.0;
        let alpha = rng.random::<f32>() * 0.4;
        commands.spawn((
            Name::new("Dust"),
            Dust {
                speed: rng.random::<f32>() * 30.0 + 12.0,
            },
            // #a5f3fc at a faint alpha
            Sprite::from_color(Color::srgba(0.647, 0.953, 0.988, alpha), Vec2::splat(size)),
            Transform::from_xyz(
                rng.random_range(ARENA_LEFT..ARENA_RIGHT),
                rng.random_range(ARENA_BOTTOM..ARENA_TOP),
                Z_DUST,
            ),
            DespawnOnExit(Screen::Gameplay),
        ));
    }

    let hazes = [
        // (position, radius, color, drift)
        (
            Vec2::new(-280.0, 140.0),
            400.0,
            Color::srgba(0.024, 0.714, 0.831, 0.05),
            Vec2::new(6.0, 3.0),
        ),
        (
            Vec2::new(280.0, -140.0),
            600.0,
            Color::srgba(0.659, 0.333, 0.969, 0.04),
            Vec2::new(-3.0, -6.0),
        ),
    ];
    for (position, radius, color, velocity) in hazes {
        commands.spawn((
            Name::new("Nebula"),
            Nebula { velocity },
            Mesh2d(meshes.add(Circle::new(radius))),
            MeshMaterial2d(materials.add(ColorMaterial::from_color(color))),
            Transform::from_translation(position.extend(Z_NEBULA)),
            DespawnOnExit(Screen::Gameplay),
        ));
    }
}

fn advance_dust(time: Res<Time>, mut dust: Query<(&mut Transform, &Dust)>) {
    let dt = time.delta_secs();
    let mut rng = rand::rng();
    for (mut transform, mote) in &mut dust {
        transform.translation.y -= mote.speed * dt;
        if transform.translation.y < ARENA_BOTTOM - 10.0 {
            transform.translation.y = ARENA_TOP + 10.0;
            transform.translation.x = rng.random_range(ARENA_LEFT..ARENA_RIGHT);
        }
    }
}

fn drift_nebulas(time: Res<Time>, mut nebulas: Query<(&mut Transform, &Nebula)>) {
    let dt = time.delta_secs();
    for (mut transform, nebula) in &mut nebulas {
        transform.translation += (nebula.velocity * dt).extend(0.0);
    }
}
