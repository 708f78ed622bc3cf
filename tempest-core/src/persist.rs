//! Roster persistence for save/load functionality.
//!
//! Rosters are saved as versioned, human-readable JSON files in a save
//! directory, one file per roster name. In-battle transient state (live
//! boosts, remaining HP, energy, listener registrations) never hits disk.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

use crate::team::Team;

/// Errors from persistence operations.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid save format")]
    InvalidFormat,

    #[error("Version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },

    #[error("No saved roster named '{0}'")]
    UnknownSave(String),
}

/// Current save file version.
const SAVE_VERSION: u32 = 1;

/// A named player team plus its inventory: the unit a save file holds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Roster {
    /// Roster name, also used to derive the save file name.
    pub name: String,

    /// The player team, carrying its members and shared inventory.
    pub team: Team,
}

impl Roster {
    pub fn new(name: impl Into<String>, team: Team) -> Self {
        Self {
            name: name.into(),
            team,
        }
    }
}

/// A saved roster with everything needed to resume play.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedRoster {
    /// Save format version for compatibility checking.
    pub version: u32,

    /// When the save was created.
    pub saved_at: String,

    /// The complete roster.
    pub roster: Roster,

    /// Metadata about the save.
    pub metadata: RosterMetadata,
}

/// Metadata about a save file, cheap to read without the full roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterMetadata {
    /// Roster name.
    pub roster_name: String,

    /// Number of team members.
    pub team_size: usize,

    /// Highest member level, 0 for an empty team.
    pub highest_level: u8,

    /// When the save was created (duplicated from parent for peek access).
    #[serde(default)]
    pub saved_at: String,
}

impl SavedRoster {
    /// Create a new saved roster from live state.
    pub fn new(roster: Roster) -> Self {
        let saved_at = epoch_now();
        let metadata = RosterMetadata {
            roster_name: roster.name.clone(),
            team_size: roster.team.members.len(),
            highest_level: roster
                .team
                .members
                .iter()
                .map(|member| member.level)
                .max()
                .unwrap_or(0),
            saved_at: saved_at.clone(),
        };

        Self {
            version: SAVE_VERSION,
            saved_at,
            roster,
            metadata,
        }
    }

    /// Save to a JSON file.
    pub async fn save_json(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).await?;
        Ok(())
    }

    /// Load from a JSON file.
    pub async fn load_json(path: impl AsRef<Path>) -> Result<Self, PersistError> {
        let content = fs::read_to_string(path).await?;
        let saved: Self = serde_json::from_str(&content)?;

        if saved.version != SAVE_VERSION {
            return Err(PersistError::VersionMismatch {
                expected: SAVE_VERSION,
                found: saved.version,
            });
        }

        Ok(saved)
    }

    /// Get a save's metadata without deserializing the full roster.
    pub async fn peek_metadata(path: impl AsRef<Path>) -> Result<RosterMetadata, PersistError> {
        let content = fs::read_to_string(path).await?;

        // Parse just enough to get metadata
        #[derive(Deserialize)]
        struct Partial {
            version: u32,
            metadata: RosterMetadata,
        }

        let partial: Partial = serde_json::from_str(&content)?;

        if partial.version != SAVE_VERSION {
            return Err(PersistError::VersionMismatch {
                expected: SAVE_VERSION,
                found: partial.version,
            });
        }

        Ok(partial.metadata)
    }
}

/// Information about a save file.
#[derive(Debug, Clone)]
pub struct RosterSaveInfo {
    /// Path to the save file.
    pub path: String,

    /// Save metadata.
    pub metadata: RosterMetadata,
}

/// Generate the save path for a roster name.
pub fn roster_save_path(dir: impl AsRef<Path>, name: &str) -> PathBuf {
    let sanitized = name
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect::<String>();
    dir.as_ref().join(format!("{sanitized}.json"))
}

/// A save directory holding one JSON file per roster.
#[derive(Debug, Clone)]
pub struct SaveRepository {
    root: PathBuf,
}

impl SaveRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The file a roster name saves to.
    pub fn path_for(&self, name: &str) -> PathBuf {
        roster_save_path(&self.root, name)
    }

    /// Save a roster under its own name, creating the directory if needed.
    pub async fn save(&self, roster: &Roster) -> Result<SavedRoster, PersistError> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).await?;
        }
        let saved = SavedRoster::new(roster.clone());
        saved.save_json(self.path_for(&roster.name)).await?;
        Ok(saved)
    }

    /// Load a roster by name.
    pub async fn load(&self, name: &str) -> Result<SavedRoster, PersistError> {
        match SavedRoster::load_json(self.path_for(name)).await {
            Err(PersistError::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(PersistError::UnknownSave(name.to_string()))
            }
            other => other,
        }
    }

    /// Peek a save's metadata by name without loading the full roster.
    pub async fn peek(&self, name: &str) -> Result<RosterMetadata, PersistError> {
        match SavedRoster::peek_metadata(self.path_for(name)).await {
            Err(PersistError::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(PersistError::UnknownSave(name.to_string()))
            }
            other => other,
        }
    }

    /// List all saves in the directory, sorted by roster name.
    pub async fn list(&self) -> Result<Vec<RosterSaveInfo>, PersistError> {
        let mut saves = Vec::new();

        // Create the directory if it doesn't exist
        if !self.root.exists() {
            fs::create_dir_all(&self.root).await?;
            return Ok(saves);
        }

        let mut entries = fs::read_dir(&self.root).await?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().map(|e| e == "json").unwrap_or(false) {
                if let Ok(metadata) = SavedRoster::peek_metadata(&path).await {
                    saves.push(RosterSaveInfo {
                        path: path.to_string_lossy().to_string(),
                        metadata,
                    });
                }
            }
        }

        saves.sort_by(|a, b| a.metadata.roster_name.cmp(&b.metadata.roster_name));
        Ok(saves)
    }
}

/// Current timestamp as epoch seconds.
fn epoch_now() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();

    format!("{}", now.as_secs())
}
