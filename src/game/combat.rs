//! Collision resolution, damage rules, scoring, and the smart bomb.
//!
//! Resolution order within a frame: enemy↔player, bullet↔enemy, then
//! enemy-bullet↔player. Everything that dies here is only marked (hp zeroed,
//! bullet spent); the actual despawns happen in the decay step after all
//! passes, so no pass ever observes a half-removed entity.

use bevy::prelude::*;

use super::{
    SimStep,
    boss::Boss,
    effects::{Burst, BurstKind, CameraShake, DebrisChunk, TextPopup},
    enemy::{Enemy, EnemyKind, HIT_FLASH_SECS},
    math::aabb_overlap,
    player::{HIT_INVULN_SECS, PLAYER_SIZE, Player, SHIELD_INVULN_SECS},
    profile::{Profile, SaveRequested},
    session::{Session, SessionEnded, StatusLine},
    weapons::{BULLET_SIZE, Bullet, ENEMY_BULLET_SIZE, EnemyBullet},
};
use crate::audio::AudioCue;

pub(super) fn plugin(app: &mut App) {
    app.add_message::<NukeRequested>();

    app.add_systems(
        Update,
        (
            detonate_nuke,
            enemies_vs_players,
            bullets_vs_enemies,
            enemy_bullets_vs_players,
            check_session_end,
        )
            .chain()
            .in_set(SimStep::Resolve),
    );
}

/// Chip damage per bullet against a shielded boss.
const BOSS_CHIP_DAMAGE: f32 = 0.2;

/// Flat damage a smart bomb deals to a boss.
const NUKE_BOSS_DAMAGE: f32 = 200.0;
/// Score bonus for detonating a smart bomb.
const NUKE_SCORE_BONUS: u32 = 500;

/// Hull damage burst tint, #ef4444
const HULL_BLOOD: Color = Color::srgb(0.937, 0.267, 0.267);
/// Non-lethal warning text tint, #f97316
const WARNING_ORANGE: Color = Color::srgb(0.976, 0.451, 0.086);

/// Player-initiated smart bomb. Written by the HUD, consumed here.
#[derive(Message, Debug, Clone, Copy, Default)]
pub struct NukeRequested;

/// What happened when something touched a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Invulnerability window open; nothing changed.
    Ignored,
    /// The shield absorbed the hit and is gone.
    ShieldBroken,
    /// Hull damage was taken; `lethal` if it was the last point.
    Damaged { lethal: bool },
}

/// Apply one qualifying hit to a player. A shield absorbs exactly one hit
/// with no hull loss; otherwise the hull loses one point. Every applied hit
/// opens a fresh invulnerability window, so the deadline only moves forward.
pub fn resolve_player_hit(player: &mut Player, now: f32) -> HitOutcome {
    if player.invulnerable(now) {
        return HitOutcome::Ignored;
    }

    if player.has_shield {
        player.has_shield = false;
        player.invulnerable_until = now + SHIELD_INVULN_SECS;
        return HitOutcome::ShieldBroken;
    }

    player.hp -= 1;
    player.invulnerable_until = now + HIT_INVULN_SECS;
    if player.hp <= 0 {
        player.hp = 0;
        player.alive = false;
        HitOutcome::Damaged { lethal: true }
    } else {
        HitOutcome::Damaged { lethal: false }
    }
}

/// Debris tint per destroyed type.
fn debris_color(kind: EnemyKind) -> Color {
    match kind {
        // #0891b2
        EnemyKind::Hunter => Color::srgb(0.031, 0.569, 0.698),
        EnemyKind::Boss => Color::WHITE,
        // #701a75
        _ => Color::srgb(0.439, 0.102, 0.459),
    }
}

/// Ramming damage: enemies hitting ships.
fn enemies_vs_players(
    time: Res<Time>,
    mut players: Query<(&Transform, &mut Player)>,
    mut enemies: Query<(&Transform, &mut Enemy, Has<Boss>)>,
    mut shake: ResMut<CameraShake>,
    mut cues: MessageWriter<AudioCue>,
    mut bursts: MessageWriter<Burst>,
    mut popups: MessageWriter<TextPopup>,
    mut saves: MessageWriter<SaveRequested>,
) {
    let now = time.elapsed_secs();

    for (enemy_transform, mut enemy, is_boss) in &mut enemies {
        if enemy.hp <= 0.0 {
            continue;
        }
        let enemy_pos = enemy_transform.translation.truncate();

        for (player_transform, mut player) in &mut players {
            if !player.alive {
                continue;
            }
            let player_pos = player_transform.translation.truncate();
            if !aabb_overlap(
                player_pos,
                Vec2::splat(PLAYER_SIZE),
                enemy_pos,
                Vec2::splat(enemy.size),
            ) {
                continue;
            }

            match resolve_player_hit(&mut player, now) {
                HitOutcome::Ignored => {}
                HitOutcome::ShieldBroken => {
                    // The shield takes the attacker with it, unless it's the boss.
                    if !is_boss {
                        enemy.hp = 0.0;
                    }
                    cues.write(AudioCue::Explosion);
                    shake.impulse(15.0);
                    popups.write(TextPopup {
                        position: player_pos,
                        text: "SHIELD BREACH".to_string(),
                        color: HULL_BLOOD,
                    });
                    saves.write(SaveRequested);
                }
                HitOutcome::Damaged { lethal } => {
                    shake.impulse(20.0);
                    cues.write(AudioCue::Explosion);
                    bursts.write(Burst {
                        position: player_pos,
                        color: HULL_BLOOD,
                        count: 8,
                        kind: BurstKind::Blood,
                    });
                    if !lethal {
                        popups.write(TextPopup {
                            position: player_pos,
                            text: "HULL CRITICAL".to_string(),
                            color: WARNING_ORANGE,
                        });
                    }
                }
            }
        }
    }
}

/// Player bullets hitting enemies: damage, kills, score, credits, effects.
fn bullets_vs_enemies(
    mut session: ResMut<Session>,
    mut profile: ResMut<Profile>,
    mut status: ResMut<StatusLine>,
    mut bullets: Query<(&Transform, &mut Bullet)>,
    mut enemies: Query<(&Transform, &mut Enemy, Option<&Boss>)>,
    mut shake: ResMut<CameraShake>,
    mut cues: MessageWriter<AudioCue>,
    mut bursts: MessageWriter<Burst>,
    mut chunks: MessageWriter<DebrisChunk>,
) {
    for (bullet_transform, mut bullet) in &mut bullets {
        if bullet.spent {
            continue;
        }
        let bullet_pos = bullet_transform.translation.truncate();

        for (enemy_transform, mut enemy, boss) in &mut enemies {
            if enemy.hp <= 0.0 {
                continue;
            }
            let enemy_pos = enemy_transform.translation.truncate();
            if !aabb_overlap(bullet_pos, BULLET_SIZE, enemy_pos, Vec2::splat(enemy.size)) {
                continue;
            }

            bullet.spent = true;
            enemy.hit_flash = HIT_FLASH_SECS;

            // A shielded boss only takes slow chip damage; the bullet is
            // still consumed.
            if boss.is_some_and(|b| b.shielded) {
                if enemy.hp > 1.0 {
                    enemy.hp -= BOSS_CHIP_DAMAGE;
                }
                break;
            }

            bursts.write(Burst {
                position: bullet_pos,
                color: enemy.blood,
                count: 6,
                kind: BurstKind::Blood,
            });

            if enemy.hp > 1.0 {
                enemy.hp -= 1.0;
            } else {
                enemy.hp = 0.0;
                session.kills += 1;
                session.kill_counts.bump(enemy.kind);

                let award = if enemy.kind == EnemyKind::Boss {
                    status.set("TARGET NEUTRALIZED");
                    cues.write(AudioCue::LevelUp);
                    shake.impulse(50.0);
                    2000
                } else {
                    10 * session.level
                };
                session.score += award;
                profile.credits += award / 5;

                shake.bump(2.0);
                cues.write(AudioCue::Explosion);
                bursts.write(Burst {
                    position: enemy_pos,
                    color: enemy.blood,
                    count: 6,
                    kind: BurstKind::Explosion,
                });
                bursts.write(Burst {
                    position: enemy_pos,
                    color: enemy.blood,
                    count: 12,
                    kind: BurstKind::Blood,
                });
                chunks.write(DebrisChunk {
                    position: enemy_pos,
                    size: enemy.size / 2.0,
                    color: debris_color(enemy.kind),
                });
            }
            break;
        }
    }
}

/// Hostile projectiles hitting ships.
fn enemy_bullets_vs_players(
    time: Res<Time>,
    mut players: Query<(&Transform, &mut Player)>,
    mut bullets: Query<(&Transform, &Sprite, &mut EnemyBullet)>,
    mut shake: ResMut<CameraShake>,
    mut cues: MessageWriter<AudioCue>,
    mut bursts: MessageWriter<Burst>,
    mut popups: MessageWriter<TextPopup>,
    mut saves: MessageWriter<SaveRequested>,
) {
    let now = time.elapsed_secs();

    for (bullet_transform, sprite, mut bullet) in &mut bullets {
        if bullet.spent {
            continue;
        }
        let bullet_pos = bullet_transform.translation.truncate();
        let bullet_size = sprite.custom_size.unwrap_or(ENEMY_BULLET_SIZE);

        for (player_transform, mut player) in &mut players {
            if !player.alive {
                continue;
            }
            let player_pos = player_transform.translation.truncate();
            if !aabb_overlap(player_pos, Vec2::splat(PLAYER_SIZE), bullet_pos, bullet_size) {
                continue;
            }

            match resolve_player_hit(&mut player, now) {
                HitOutcome::Ignored => {
                    // Soaked harmlessly by the open invulnerability window.
                    bullet.spent = true;
                }
                HitOutcome::ShieldBroken => {
                    bullet.spent = true;
                    cues.write(AudioCue::Explosion);
                    shake.impulse(5.0);
                    saves.write(SaveRequested);
                }
                HitOutcome::Damaged { lethal } => {
                    bullet.spent = true;
                    shake.impulse(15.0);
                    cues.write(AudioCue::Explosion);
                    bursts.write(Burst {
                        position: player_pos,
                        color: HULL_BLOOD,
                        count: 5,
                        kind: BurstKind::Blood,
                    });
                    if !lethal {
                        popups.write(TextPopup {
                            position: player_pos,
                            text: "WARNING".to_string(),
                            color: WARNING_ORANGE,
                        });
                    }
                }
            }
        }
    }
}

/// The smart bomb: field wipe for regulars, a flat chunk off a boss.
fn detonate_nuke(
    mut requests: MessageReader<NukeRequested>,
    mut session: ResMut<Session>,
    mut profile: ResMut<Profile>,
    mut status: ResMut<StatusLine>,
    mut enemies: Query<(&Transform, &mut Enemy, Has<Boss>)>,
    mut shake: ResMut<CameraShake>,
    mut cues: MessageWriter<AudioCue>,
    mut bursts: MessageWriter<Burst>,
    mut popups: MessageWriter<TextPopup>,
    mut saves: MessageWriter<SaveRequested>,
) {
    for _ in requests.read() {
        if profile.nukes == 0 {
            continue;
        }
        profile.nukes -= 1;

        for (transform, mut enemy, is_boss) in &mut enemies {
            if enemy.hp <= 0.0 {
                continue;
            }
            let pos = transform.translation.truncate();

            if is_boss {
                enemy.hp = (enemy.hp - NUKE_BOSS_DAMAGE).max(0.0);
                popups.write(TextPopup {
                    position: pos + Vec2::new(0.0, enemy.size / 2.0),
                    text: "-200 NUKE".to_string(),
                    color: HULL_BLOOD,
                });
                bursts.write(Burst {
                    position: pos,
                    color: HULL_BLOOD,
                    count: 30,
                    kind: BurstKind::Explosion,
                });
            } else {
                enemy.hp = 0.0;
                session.kills += 1;
                session.kill_counts.bump(enemy.kind);
                bursts.write(Burst {
                    position: pos,
                    color: Color::WHITE,
                    count: 10,
                    kind: BurstKind::Explosion,
                });
            }
        }

        session.score += NUKE_SCORE_BONUS;
        shake.impulse(40.0);
        status.set("SMART BOMB DETONATED");
        cues.write(AudioCue::Explosion);
        saves.write(SaveRequested);
    }
}

/// The terminal transition: when the last ship goes down, report the final
/// stats exactly once.
fn check_session_end(
    mut session: ResMut<Session>,
    players: Query<&Player>,
    mut ended: MessageWriter<SessionEnded>,
) {
    if session.over || players.is_empty() {
        return;
    }
    if players.iter().all(|p| !p.alive) {
        session.over = true;
        ended.write(SessionEnded {
            stats: session.stats(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_player() -> Player {
        Player {
            id: 0,
            hp: 6,
            max_hp: 6,
            alive: true,
            has_shield: false,
            invulnerable_until: 0.0,
            target: Vec2::ZERO,
        }
    }

    #[test]
    fn shield_absorbs_exactly_one_hit() {
        let mut player = test_player();
        player.has_shield = true;

        assert_eq!(resolve_player_hit(&mut player, 10.0), HitOutcome::ShieldBroken);
        assert!(!player.has_shield);
        assert_eq!(player.hp, 6);
        assert_eq!(player.invulnerable_until, 10.0 + SHIELD_INVULN_SECS);

        // A simultaneous second hit lands inside the fresh window: no effect.
        assert_eq!(resolve_player_hit(&mut player, 10.0), HitOutcome::Ignored);
        assert_eq!(player.hp, 6);
    }

    #[test]
    fn unshielded_hit_costs_one_hull_point() {
        let mut player = test_player();
        assert_eq!(
            resolve_player_hit(&mut player, 5.0),
            HitOutcome::Damaged { lethal: false }
        );
        assert_eq!(player.hp, 5);
        assert!(player.alive);
        assert_eq!(player.invulnerable_until, 5.0 + HIT_INVULN_SECS);
    }

    #[test]
    fn last_hull_point_is_lethal() {
        let mut player = test_player();
        player.hp = 1;
        assert_eq!(
            resolve_player_hit(&mut player, 5.0),
            HitOutcome::Damaged { lethal: true }
        );
        assert_eq!(player.hp, 0);
        assert!(!player.alive);
    }

    #[test]
    fn invulnerability_deadline_only_moves_forward() {
        let mut player = test_player();
        resolve_player_hit(&mut player, 5.0);
        let first = player.invulnerable_until;

        // Next qualifying hit happens after the window closes.
        let later = first + 0.1;
        resolve_player_hit(&mut player, later);
        assert!(player.invulnerable_until > first);
    }

    #[test]
    fn hits_inside_the_window_are_ignored() {
        let mut player = test_player();
        resolve_player_hit(&mut player, 5.0);
        assert_eq!(resolve_player_hit(&mut player, 6.0), HitOutcome::Ignored);
        assert_eq!(player.hp, 5);
    }

    #[test]
    fn kill_rewards_follow_level() {
        // 10 × level for regulars, a fifth of that in credits.
        for level in 1..=5u32 {
            let award = 10 * level;
            assert_eq!(award / 5, 2 * level);
        }
    }

    #[test]
    fn nuke_chunks_a_boss_without_killing_it() {
        let hp: f32 = 250.0;
        let after = (hp - NUKE_BOSS_DAMAGE).max(0.0);
        assert_eq!(after, 50.0);
        assert!(after > 0.0);
    }

    #[test]
    fn nuke_floors_boss_hp_at_zero() {
        let hp: f32 = 120.0;
        assert_eq!((hp - NUKE_BOSS_DAMAGE).max(0.0), 0.0);
    }
}
