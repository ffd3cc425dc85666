//! Sound effects and music.
//!
//! Gameplay code never touches audio assets directly: it writes an
//! [`AudioCue`] message and moves on. Cues are fire-and-forget; a missing or
//! still-loading sound logs a warning inside Bevy and the frame is unaffected.

use bevy::{audio::AudioSinkPlayback, prelude::*};

use crate::{Pause, game::session::SessionEnded, screens::Screen};

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Music>();
    app.register_type::<SoundEffect>();
    app.add_message::<AudioCue>();

    app.add_systems(Startup, load_sound_bank);
    app.add_systems(Update, (play_cues, halt_music_on_session_end));

    app.add_systems(OnEnter(Screen::Gameplay), start_music);
    app.add_systems(OnExit(Screen::Gameplay), stop_music);
    app.add_systems(OnEnter(Pause(true)), pause_music);
    app.add_systems(OnEnter(Pause(false)), resume_music);
}

/// An organizational marker component that should be added to a spawned
/// [`AudioPlayer`] if it's in the general "music" category (e.g. global
/// background music, soundtrack).
#[derive(Component, Reflect, Default)]
#[reflect(Component)]
pub struct Music;

/// A music audio instance.
pub fn music(handle: Handle<AudioSource>) -> impl Bundle {
    (AudioPlayer(handle), PlaybackSettings::LOOP, Music)
}

/// An organizational marker component that should be added to a spawned
/// [`AudioPlayer`] if it's in the general "sound effect" category (e.g.
/// footsteps, the sound of a magic spell, a door opening).
#[derive(Component, Reflect, Default)]
#[reflect(Component)]
pub struct SoundEffect;

/// A sound effect audio instance.
pub fn sound_effect(handle: Handle<AudioSource>) -> impl Bundle {
    (AudioPlayer(handle), PlaybackSettings::DESPAWN, SoundEffect)
}

/// The combat and progression sound cues.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCue {
    Laser,
    Explosion,
    LevelUp,
    PowerUp,
}

/// Preloaded handles for every cue, so firing one is just an entity spawn.
#[derive(Resource)]
struct SoundBank {
    laser: Handle<AudioSource>,
    explosion: Handle<AudioSource>,
    level_up: Handle<AudioSource>,
    power_up: Handle<AudioSource>,
    music: Handle<AudioSource>,
}

fn load_sound_bank(mut commands: Commands, asset_server: Res<AssetServer>) {
    commands.insert_resource(SoundBank {
        laser: asset_server.load("audio/sound_effects/laser.ogg"),
        explosion: asset_server.load("audio/sound_effects/explosion.ogg"),
        level_up: asset_server.load("audio/sound_effects/level_up.ogg"),
        power_up: asset_server.load("audio/sound_effects/power_up.ogg"),
        music: asset_server.load("audio/music/patrol.ogg"),
    });
}

fn play_cues(mut commands: Commands, mut cues: MessageReader<AudioCue>, bank: Res<SoundBank>) {
    for cue in cues.read() {
        let handle = match cue {
            AudioCue::Laser => bank.laser.clone(),
            AudioCue::Explosion => bank.explosion.clone(),
            AudioCue::LevelUp => bank.level_up.clone(),
            AudioCue::PowerUp => bank.power_up.clone(),
        };
        commands.spawn(sound_effect(handle));
    }
}

fn start_music(mut commands: Commands, bank: Res<SoundBank>) {
    commands.spawn((
        Name::new("Patrol Music"),
        music(bank.music.clone()),
        DespawnOnExit(Screen::Gameplay),
    ));
}

fn stop_music(mut commands: Commands, music_query: Query<Entity, With<Music>>) {
    for entity in &music_query {
        commands.entity(entity).despawn();
    }
}

/// The run is over; cut the music rather than merely pausing it.
fn halt_music_on_session_end(
    mut commands: Commands,
    mut ended: MessageReader<SessionEnded>,
    music_query: Query<Entity, With<Music>>,
) {
    if ended.is_empty() {
        return;
    }
    ended.clear();
    for entity in &music_query {
        commands.entity(entity).despawn();
    }
}

fn pause_music(music_query: Query<&AudioSink, With<Music>>) {
    for sink in &music_query {
        sink.pause();
    }
}

fn resume_music(music_query: Query<&AudioSink, With<Music>>) {
    for sink in &music_query {
        sink.play();
    }
}
