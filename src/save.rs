//! Single-slot save file.
//!
//! The whole run is written as one JSON snapshot and read back as a full
//! replacement. Only the chapter number decides where play resumes.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SaveError;
use crate::game::progress::ProgressState;
use crate::game::tracker::{MistakeLog, PerformanceTracker};

pub const SAVE_KEY: &str = "firewall_save";
pub const SAVE_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Snapshot {
    pub key: String,
    pub version: u32,
    pub progress: ProgressState,
    pub performance: PerformanceTracker,
    pub mistakes: MistakeLog,
}

impl Snapshot {
    pub fn new(
        progress: ProgressState,
        performance: PerformanceTracker,
        mistakes: MistakeLog,
    ) -> Self {
        Snapshot {
            key: SAVE_KEY.to_string(),
            version: SAVE_VERSION,
            progress,
            performance,
            mistakes,
        }
    }

    /// Rejects snapshots that parse but describe an impossible run.
    pub fn validate(&self) -> Result<(), SaveError> {
        if self.key != SAVE_KEY {
            return Err(SaveError::WrongKey(self.key.clone()));
        }
        if self.version != SAVE_VERSION {
            return Err(SaveError::Version {
                found: self.version,
                expected: SAVE_VERSION,
            });
        }

        let p = &self.progress;
        if p.max_security <= 0 {
            return Err(SaveError::Invalid("max security must be positive".into()));
        }
        if p.security > p.max_security {
            return Err(SaveError::Invalid(format!(
                "security {} exceeds maximum {}",
                p.security, p.max_security
            )));
        }
        if p.security <= 0 {
            return Err(SaveError::Invalid(format!(
                "security {} means the run was already lost",
                p.security
            )));
        }
        if p.current_chapter == 0 {
            return Err(SaveError::Invalid("chapter numbers start at 1".into()));
        }
        if p.level != ProgressState::expected_level(p.xp) {
            return Err(SaveError::Invalid(format!(
                "level {} does not match {} xp",
                p.level, p.xp
            )));
        }
        if p.reputation < 0 {
            return Err(SaveError::Invalid("reputation cannot be negative".into()));
        }

        self.performance.validate().map_err(SaveError::Invalid)?;

        if let Some(m) = self
            .mistakes
            .all()
            .iter()
            .find(|m| m.chapter == 0 || m.chapter > p.current_chapter)
        {
            return Err(SaveError::Invalid(format!(
                "mistake recorded in chapter {} of a run at chapter {}",
                m.chapter, p.current_chapter
            )));
        }
        Ok(())
    }
}

pub fn save_snapshot(path: &Path, snapshot: &Snapshot) -> Result<(), SaveError> {
    let io_err = |source: std::io::Error| SaveError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(io_err)?;
    }

    let json = serde_json::to_string_pretty(snapshot)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).map_err(io_err)?;
    fs::rename(&tmp, path).map_err(io_err)?;

    log::info!(
        "saved {} at chapter {} to {}",
        snapshot.progress.player_name,
        snapshot.progress.current_chapter,
        path.display()
    );
    Ok(())
}

/// `Ok(None)` when there is nothing to load.
pub fn load_snapshot(path: &Path) -> Result<Option<Snapshot>, SaveError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::debug!("no save file at {}", path.display());
            return Ok(None);
        }
        Err(source) => {
            return Err(SaveError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let snapshot: Snapshot = serde_json::from_str(&text)?;
    snapshot.validate()?;
    Ok(Some(snapshot))
}
