//! Per-publication usage counters: views, downloads and shares.
//!
//! Counters live in a small TOML file under the state directory. When it
//! cannot be read or written the store keeps counting in memory and logs a
//! warning.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::catalog::TrackId;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublicationStats {
    pub views: u64,
    pub downloads: u64,
    pub shares: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stat {
    View,
    Download,
    Share,
}

impl PublicationStats {
    fn bump(&mut self, stat: Stat) {
        let counter = match stat {
            Stat::View => &mut self.views,
            Stat::Download => &mut self.downloads,
            Stat::Share => &mut self.shares,
        };
        *counter = counter.saturating_add(1);
    }
}

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode stats: {0}")]
    Encode(#[from] toml::ser::Error),
}

/// On-disk layout: `[publications.<id>]` tables.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StatsFile {
    #[serde(default)]
    publications: BTreeMap<String, PublicationStats>,
}

pub struct StatsStore {
    path: Option<PathBuf>,
    counts: BTreeMap<TrackId, PublicationStats>,
}

impl StatsStore {
    /// A store that never touches the filesystem.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            counts: BTreeMap::new(),
        }
    }

    /// Load counters from `path`. A missing file starts from zero; an
    /// unreadable one does too, with a warning.
    pub fn open(path: PathBuf) -> Self {
        let counts = load(&path).unwrap_or_else(|e| {
            warn!(error = %e, "stats unavailable, starting from zero");
            BTreeMap::new()
        });
        Self {
            path: Some(path),
            counts,
        }
    }

    pub fn get(&self, id: TrackId) -> PublicationStats {
        self.counts.get(&id).copied().unwrap_or_default()
    }

    /// Bump one counter and persist. Returns the updated counts.
    pub fn increment(&mut self, id: TrackId, stat: Stat) -> PublicationStats {
        let entry = self.counts.entry(id).or_default();
        entry.bump(stat);
        let updated = *entry;
        debug!(publication = %id, ?stat, "stat incremented");

        if let Err(e) = self.save() {
            warn!(error = %e, "failed to persist stats");
        }
        updated
    }

    fn save(&self) -> Result<(), StatsError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let file = StatsFile {
            publications: self
                .counts
                .iter()
                .map(|(id, stats)| (id.to_string(), *stats))
                .collect(),
        };
        let text = toml::to_string(&file)?;

        let write = |path: &Path| -> io::Result<()> {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, text.as_bytes())
        };
        write(path).map_err(|source| StatsError::Write {
            path: path.clone(),
            source,
        })
    }
}

fn load(path: &Path) -> Result<BTreeMap<TrackId, PublicationStats>, StatsError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
        Err(source) => {
            return Err(StatsError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    let file: StatsFile = toml::from_str(&text).map_err(|source| StatsError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let mut counts = BTreeMap::new();
    for (key, stats) in file.publications {
        match key.parse::<u64>() {
            Ok(id) => {
                counts.insert(TrackId(id), stats);
            }
            Err(_) => warn!(key = %key, "ignoring stats entry with a non-numeric id"),
        }
    }
    Ok(counts)
}

#[cfg(test)]
mod tests;
