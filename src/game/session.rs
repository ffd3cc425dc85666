//! Per-session state: score, kills, score-gated progression, session end.

use bevy::prelude::*;

use super::{SimStep, effects::CameraShake, enemy::EnemyKind, profile::SaveRequested};
use crate::{audio::AudioCue, menus::Menu, screens::Screen};

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<Session>();
    app.init_resource::<Squad>();
    app.init_resource::<StatusLine>();
    app.init_resource::<LastRun>();
    app.register_type::<Session>();
    app.add_message::<SessionEnded>();

    app.add_systems(OnEnter(Screen::Gameplay), reset_session);

    app.add_systems(
        Update,
        advance_progression.in_set(SimStep::Progression),
    );
    app.add_systems(Update, finish_session.in_set(SimStep::Decay));
}

/// Weapon tier for a score: 0 → 3, each step shrinking the volley interval
/// and widening the bullet fan.
pub fn weapon_level_for(score: u32) -> u32 {
    match score {
        s if s >= 600 => 3,
        s if s >= 300 => 2,
        s if s >= 150 => 1,
        _ => 0,
    }
}

/// Difficulty level for a score. Level 4 is intentionally skipped here: it
/// exists only as a key in the spawn weight table.
pub fn difficulty_level_for(score: u32) -> u32 {
    match score {
        s if s >= 1500 => 5,
        s if s >= 600 => 3,
        s if s >= 300 => 2,
        _ => 1,
    }
}

/// Kills per enemy type, reported outward at session end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
pub struct KillCounts {
    pub drone: u32,
    pub hunter: u32,
    pub dasher: u32,
    pub elite: u32,
    pub boss: u32,
}

impl KillCounts {
    pub fn bump(&mut self, kind: EnemyKind) {
        match kind {
            EnemyKind::Drone => self.drone += 1,
            EnemyKind::Hunter => self.hunter += 1,
            EnemyKind::Dasher => self.dasher += 1,
            EnemyKind::Elite => self.elite += 1,
            EnemyKind::Boss => self.boss += 1,
        }
    }
}

/// The final result record handed to the hosting UI when a run ends.
#[derive(Debug, Clone, Copy)]
pub struct GameStats {
    pub score: u32,
    pub kills: u32,
    pub level: u32,
    pub weapon_level: u32,
    pub enemy_stats: KillCounts,
}

/// Sent exactly once when the last ship is destroyed.
#[derive(Message, Debug, Clone, Copy)]
pub struct SessionEnded {
    pub stats: GameStats,
}

/// The authoritative per-run simulation state. Owned by the simulation;
/// the HUD only ever reads projections of it.
#[derive(Resource, Debug, Reflect)]
#[reflect(Resource)]
pub struct Session {
    pub score: u32,
    pub kills: u32,
    pub kill_counts: KillCounts,
    pub level: u32,
    pub weapon_level: u32,
    pub boss_spawned: bool,
    pub over: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            score: 0,
            kills: 0,
            kill_counts: KillCounts::default(),
            level: 1,
            weapon_level: 0,
            boss_spawned: false,
            over: false,
        }
    }
}

impl Session {
    pub fn stats(&self) -> GameStats {
        GameStats {
            score: self.score,
            kills: self.kills,
            level: self.level,
            weapon_level: self.weapon_level,
            enemy_stats: self.kill_counts,
        }
    }
}

/// How many ships launch this run. Chosen on the title screen.
#[derive(Resource, Debug, Clone, Copy)]
pub struct Squad {
    pub players: u32,
}

impl Default for Squad {
    fn default() -> Self {
        Self { players: 1 }
    }
}

/// The one-line tactical ticker shown in the HUD.
#[derive(Resource, Debug)]
pub struct StatusLine {
    pub text: String,
}

impl Default for StatusLine {
    fn default() -> Self {
        Self {
            text: "SYSTEMS ONLINE...".to_string(),
        }
    }
}

impl StatusLine {
    pub fn set(&mut self, text: impl Into<String>) {
        self.text = text.into();
        info!("{}", self.text);
    }
}

/// Result record of the most recently finished run, for the game-over screen.
#[derive(Resource, Debug, Default)]
pub struct LastRun(pub Option<GameStats>);

fn reset_session(mut session: ResMut<Session>, mut status: ResMut<StatusLine>) {
    *session = Session::default();
    *status = StatusLine::default();
    info!("Session reset");
}

/// Raise weapon tier and difficulty level as score thresholds are crossed.
/// Both are monotonic within a session; crossing a threshold persists the
/// profile and fires a one-time cue.
fn advance_progression(
    mut session: ResMut<Session>,
    mut status: ResMut<StatusLine>,
    mut cues: MessageWriter<AudioCue>,
    mut saves: MessageWriter<SaveRequested>,
) {
    let target_weapon = weapon_level_for(session.score);
    if target_weapon > session.weapon_level {
        session.weapon_level = target_weapon;
        status.set(match target_weapon {
            1 => "UPGRADE: TWIN FIRE",
            2 => "UPGRADE: TRIPLE THREAT",
            _ => "MAX POWER: SPREAD FIRE",
        });
        cues.write(AudioCue::PowerUp);
        saves.write(SaveRequested);
    }

    let target_level = difficulty_level_for(session.score);
    if target_level > session.level {
        session.level = target_level;
        status.set(format!("THREAT LEVEL INCREASED: {}", session.level));
        cues.write(AudioCue::LevelUp);
        saves.write(SaveRequested);
    }
}

/// Handle the terminal transition: freeze the run behind the game-over menu,
/// report the result record, persist, and cut the music via the menu flow.
fn finish_session(
    mut ended: MessageReader<SessionEnded>,
    mut last_run: ResMut<LastRun>,
    mut shake: ResMut<CameraShake>,
    mut cues: MessageWriter<AudioCue>,
    mut saves: MessageWriter<SaveRequested>,
    mut next_menu: ResMut<NextState<Menu>>,
) {
    for event in ended.read() {
        info!(
            "Session over: score {} kills {} level {}",
            event.stats.score, event.stats.kills, event.stats.level
        );
        last_run.0 = Some(event.stats);
        shake.impulse(20.0);
        cues.write(AudioCue::Explosion);
        saves.write(SaveRequested);
        next_menu.set(Menu::GameOver);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weapon_tier_thresholds_are_inclusive() {
        assert_eq!(weapon_level_for(0), 0);
        assert_eq!(weapon_level_for(149), 0);
        assert_eq!(weapon_level_for(150), 1);
        assert_eq!(weapon_level_for(299), 1);
        assert_eq!(weapon_level_for(300), 2);
        assert_eq!(weapon_level_for(600), 3);
        assert_eq!(weapon_level_for(10_000), 3);
    }

    #[test]
    fn difficulty_skips_level_four() {
        assert_eq!(difficulty_level_for(0), 1);
        assert_eq!(difficulty_level_for(300), 2);
        assert_eq!(difficulty_level_for(600), 3);
        assert_eq!(difficulty_level_for(1499), 3);
        // The score gate jumps straight from 3 to 5; 4 is only a spawn-table key.
        assert_eq!(difficulty_level_for(1500), 5);
    }

    #[test]
    fn stats_snapshot_mirrors_session() {
        let mut session = Session::default();
        session.score = 1200;
        session.kills = 34;
        session.level = 3;
        session.weapon_level = 3;
        session.kill_counts.hunter = 10;

        let stats = session.stats();
        assert_eq!(stats.score, 1200);
        assert_eq!(stats.kills, 34);
        assert_eq!(stats.enemy_stats.hunter, 10);
    }
}
