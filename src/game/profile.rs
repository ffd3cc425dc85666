//! The persisted pilot profile: credits, smart bombs, skins, high score.
//!
//! Stored as a single JSON file in the user's data directory. Reads fall back
//! to defaults on any failure; writes are best-effort and never interrupt
//! gameplay.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::session::Session;
use crate::Pause;

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<Profile>();
    app.add_message::<SaveRequested>();

    // Load the profile on startup.
    app.add_systems(Startup, load_profile);

    app.add_systems(Update, handle_save_requests);

    // Autosave whenever the game pauses (menu, armory, focus loss via Esc).
    app.add_systems(OnEnter(Pause(true)), request_save_on_pause);
}

/// Bumped when the on-disk layout changes; old files are simply abandoned.
const PROFILE_FILE: &str = "profile_v2.json";

/// Ask for the profile to be flushed to disk at the end of the current
/// update. Coalesced: many requests in one frame produce one write.
#[derive(Message, Debug, Clone, Copy, Default)]
pub struct SaveRequested;

/// Everything that survives between play sessions.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub credits: u32,
    pub nukes: u32,
    pub skin_index: usize,
    pub owned_skins: Vec<usize>,
    pub high_score: u32,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            credits: 0,
            // New pilots get one smart bomb to discover the mechanic.
            nukes: 1,
            skin_index: 0,
            owned_skins: vec![0],
            high_score: 0,
        }
    }
}

impl Profile {
    pub fn owns_skin(&self, index: usize) -> bool {
        self.owned_skins.contains(&index)
    }

    /// Get the file path for the profile.
    fn file_path() -> Option<PathBuf> {
        dirs::data_local_dir().map(|dir| dir.join("novastrike").join(PROFILE_FILE))
    }

    /// Load the profile from disk, substituting defaults on any failure.
    pub fn load() -> Self {
        let Some(path) = Self::file_path() else {
            warn!("Could not determine data directory for the profile");
            return Self::default();
        };
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            info!("No profile found at {:?}, starting fresh", path);
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(profile) => {
                    info!("Loaded profile from {:?}", path);
                    profile
                }
                Err(e) => {
                    warn!("Failed to parse profile: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read profile file: {}", e);
                Self::default()
            }
        }
    }

    /// Save the profile to disk. Best-effort: failures are logged and ignored.
    pub fn save(&self) {
        let Some(path) = Self::file_path() else {
            warn!("Could not determine data directory for saving the profile");
            return;
        };
        self.save_to(&path);
    }

    pub fn save_to(&self, path: &Path) {
        if let Some(parent) = path.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            warn!("Failed to create profile directory: {}", e);
            return;
        }

        match serde_json::to_string_pretty(self) {
            Ok(json) => match fs::write(path, json) {
                Ok(()) => info!("Saved profile to {:?}", path),
                Err(e) => warn!("Failed to write profile: {}", e),
            },
            Err(e) => warn!("Failed to serialize profile: {}", e),
        }
    }
}

fn load_profile(mut profile: ResMut<Profile>) {
    *profile = Profile::load();
}

fn handle_save_requests(
    mut requests: MessageReader<SaveRequested>,
    mut profile: ResMut<Profile>,
    session: Res<Session>,
) {
    if requests.is_empty() {
        return;
    }
    requests.clear();

    profile.high_score = profile.high_score.max(session.score);
    profile.save();
}

fn request_save_on_pause(mut saves: MessageWriter<SaveRequested>) {
    saves.write(SaveRequested);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn scratch_path(name: &str) -> PathBuf {
        env::temp_dir()
            .join("novastrike-tests")
            .join(format!("{name}-{}.json", std::process::id()))
    }

    #[test]
    fn round_trips_through_disk() {
        let path = scratch_path("roundtrip");
        let profile = Profile {
            credits: 340,
            nukes: 2,
            skin_index: 3,
            owned_skins: vec![0, 1, 3],
            high_score: 2210,
        };
        profile.save_to(&path);

        let loaded = Profile::load_from(&path);
        assert_eq!(loaded.credits, 340);
        assert_eq!(loaded.skin_index, 3);
        assert_eq!(loaded.owned_skins, vec![0, 1, 3]);
        assert_eq!(loaded.high_score, 2210);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let loaded = Profile::load_from(Path::new("/nonexistent/novastrike/profile_v2.json"));
        assert_eq!(loaded.credits, 0);
        assert_eq!(loaded.nukes, 1);
        assert_eq!(loaded.owned_skins, vec![0]);
    }

    #[test]
    fn malformed_json_yields_defaults() {
        let path = scratch_path("malformed");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{not json").unwrap();

        let loaded = Profile::load_from(&path);
        assert_eq!(loaded.credits, 0);
        assert_eq!(loaded.nukes, 1);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn missing_fields_fill_with_defaults() {
        let path = scratch_path("partial");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, r#"{"credits": 75}"#).unwrap();

        let loaded = Profile::load_from(&path);
        assert_eq!(loaded.credits, 75);
        assert_eq!(loaded.nukes, 1);
        assert_eq!(loaded.owned_skins, vec![0]);
        assert_eq!(loaded.high_score, 0);

        let _ = fs::remove_file(&path);
    }
}
