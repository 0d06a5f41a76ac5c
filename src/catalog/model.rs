use std::fmt;

use serde::Deserialize;

/// Stable identity shared by a publication and the track derived from it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct TrackId(pub u64);

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PublicationKind {
    #[serde(alias = "PRINTED")]
    Printed,
    #[serde(alias = "DIGITAL")]
    Digital,
    #[serde(alias = "AUDIO")]
    Audio,
    #[serde(alias = "BRAILLE")]
    Braille,
    #[serde(alias = "APP")]
    App,
    #[serde(alias = "RESEARCH")]
    Research,
    #[serde(alias = "BOOKLET")]
    Booklet,
    #[serde(alias = "RECITATION")]
    Recitation,
    #[serde(alias = "RIWAYA")]
    Riwaya,
}

impl PublicationKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Printed => "printed",
            Self::Digital => "digital",
            Self::Audio => "audio",
            Self::Braille => "braille",
            Self::App => "app",
            Self::Research => "research",
            Self::Booklet => "booklet",
            Self::Recitation => "recitation",
            Self::Riwaya => "riwaya",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
}

/// A catalog record as served by the catalog store.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Publication {
    pub id: TrackId,
    pub title: String,
    #[serde(default)]
    pub cover_url: String,
    pub category_id: String,
    #[serde(default)]
    pub language: String,
    pub kind: PublicationKind,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub browse_url: Option<String>,
    #[serde(default)]
    pub download_url: Option<String>,
}

impl Publication {
    /// Only audio publications with a download location can be played.
    pub fn is_playable(&self) -> bool {
        self.kind == PublicationKind::Audio
            && self
                .download_url
                .as_deref()
                .is_some_and(|u| !u.trim().is_empty())
    }
}

/// A playable item. Owned by the catalog, shared with the playback coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub id: TrackId,
    pub title: String,
    pub language: String,
    pub cover_art: String,
    pub source_uri: String,
}

impl Track {
    pub fn from_publication(publication: &Publication) -> Option<Self> {
        if !publication.is_playable() {
            return None;
        }
        Some(Self {
            id: publication.id,
            title: publication.title.clone(),
            language: publication.language.clone(),
            cover_art: publication.cover_url.clone(),
            source_uri: publication.download_url.clone()?,
        })
    }
}
