use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

use lofty::prelude::*;
use tracing::debug;
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::load::{Catalog, CatalogError, CatalogStore};
use super::model::{Category, Publication, PublicationKind, TrackId};

pub const UNCATEGORIZED: &str = "uncategorized";

/// Catalog store backed by a directory of audio files.
///
/// Each file becomes an audio publication. The first directory below the root
/// names its category; files directly under the root are `uncategorized`.
pub struct DirectoryCatalog {
    root: PathBuf,
    settings: LibrarySettings,
}

impl DirectoryCatalog {
    pub fn new(root: impl Into<PathBuf>, settings: LibrarySettings) -> Self {
        Self {
            root: root.into(),
            settings,
        }
    }

    pub fn scan(&self) -> Result<Catalog, CatalogError> {
        if !self.root.is_dir() {
            return Err(CatalogError::NotADirectory(self.root.clone()));
        }
        Ok(scan(&self.root, &self.settings))
    }
}

impl CatalogStore for DirectoryCatalog {
    fn list_publications(&self) -> Result<Vec<Publication>, CatalogError> {
        Ok(self.scan()?.publications)
    }

    fn list_categories(&self) -> Result<Vec<Category>, CatalogError> {
        Ok(self.scan()?.categories)
    }
}

fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

fn category_of(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    let mut components = rel.components().filter_map(|c| match c {
        Component::Normal(s) => s.to_str(),
        _ => None,
    });
    let first = components.next();
    // A single component is the file itself.
    match (first, components.next()) {
        (Some(dir), Some(_)) => dir.to_string(),
        _ => UNCATEGORIZED.to_string(),
    }
}

fn title_of(path: &Path) -> String {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("UNKNOWN")
        .to_string();

    let Ok(tagged) = lofty::read_from_path(path) else {
        return stem;
    };
    tagged
        .primary_tag()
        .or_else(|| tagged.first_tag())
        .and_then(|tag| tag.title().map(|t| t.trim().to_string()))
        .filter(|t| !t.is_empty())
        .unwrap_or(stem)
}

pub fn scan(dir: &Path, settings: &LibrarySettings) -> Catalog {
    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    let mut found: Vec<(String, String, PathBuf)> = Vec::new();
    for entry in walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(Result::ok)
    {
        let path = entry.path();
        if path.is_file()
            && (settings.include_hidden || !is_hidden(path))
            && is_audio_file(path, settings)
        {
            found.push((category_of(dir, path), title_of(path), path.to_path_buf()));
        }
    }

    found.sort_by(|a, b| {
        (a.0.to_lowercase(), a.1.to_lowercase()).cmp(&(b.0.to_lowercase(), b.1.to_lowercase()))
    });

    let category_ids: BTreeSet<String> = found.iter().map(|(c, _, _)| c.clone()).collect();
    let categories = category_ids
        .into_iter()
        .map(|id| Category {
            name: id.clone(),
            id,
        })
        .collect();

    let publications: Vec<Publication> = found
        .into_iter()
        .enumerate()
        .map(|(i, (category_id, title, path))| Publication {
            id: TrackId(i as u64 + 1),
            title,
            cover_url: String::new(),
            category_id,
            language: String::new(),
            kind: PublicationKind::Audio,
            description: path.display().to_string(),
            browse_url: None,
            download_url: Some(path.display().to_string()),
        })
        .collect();

    debug!(root = %dir.display(), count = publications.len(), "scanned directory catalog");
    Catalog {
        categories,
        publications,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn is_audio_file_matches_configured_extensions_case_insensitive() {
        let settings = LibrarySettings::default();
        assert!(is_audio_file(Path::new("/tmp/a.mp3"), &settings));
        assert!(is_audio_file(Path::new("/tmp/a.MP3"), &settings));
        assert!(is_audio_file(Path::new("/tmp/a.flac"), &settings));
        assert!(is_audio_file(Path::new("/tmp/a.wav"), &settings));
        assert!(is_audio_file(Path::new("/tmp/a.ogg"), &settings));
        assert!(!is_audio_file(Path::new("/tmp/a.txt"), &settings));
        assert!(!is_audio_file(Path::new("/tmp/a"), &settings));
    }

    #[test]
    fn category_is_first_directory_under_root() {
        let root = Path::new("/lib");
        assert_eq!(category_of(root, Path::new("/lib/hafs/001.mp3")), "hafs");
        assert_eq!(category_of(root, Path::new("/lib/hafs/deep/001.mp3")), "hafs");
        assert_eq!(category_of(root, Path::new("/lib/001.mp3")), UNCATEGORIZED);
    }

    #[test]
    fn scan_builds_playable_publications_sorted_by_category_then_title() {
        let dir = tempdir().unwrap();
        let warsh = dir.path().join("warsh");
        fs::create_dir_all(&warsh).unwrap();

        fs::write(dir.path().join("b.MP3"), b"not a real mp3").unwrap();
        fs::write(warsh.join("A.ogg"), b"not a real ogg").unwrap();
        fs::write(dir.path().join("c.txt"), b"ignore me").unwrap();

        let catalog = scan(dir.path(), &LibrarySettings::default());
        assert_eq!(catalog.publications.len(), 2);
        assert_eq!(catalog.publications[0].category_id, UNCATEGORIZED);
        assert_eq!(catalog.publications[0].title, "b");
        assert_eq!(catalog.publications[0].id, TrackId(1));
        assert_eq!(catalog.publications[1].category_id, "warsh");
        assert_eq!(catalog.publications[1].title, "A");
        assert!(catalog.publications.iter().all(Publication::is_playable));

        let ids: Vec<&str> = catalog.categories.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec![UNCATEGORIZED, "warsh"]);
    }

    #[test]
    fn scan_respects_include_hidden_false() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".hidden.mp3"), b"not real").unwrap();
        fs::write(dir.path().join("visible.mp3"), b"not real").unwrap();

        let settings = LibrarySettings {
            include_hidden: false,
            ..LibrarySettings::default()
        };
        let catalog = scan(dir.path(), &settings);

        assert_eq!(catalog.publications.len(), 1);
        assert_eq!(catalog.publications[0].title, "visible");
    }

    #[test]
    fn scan_respects_recursive_false() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("root.mp3"), b"not real").unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir_all(&sub).unwrap();
        fs::write(sub.join("child.mp3"), b"not real").unwrap();

        let settings = LibrarySettings {
            recursive: false,
            ..LibrarySettings::default()
        };
        let catalog = scan(dir.path(), &settings);
        assert_eq!(catalog.publications.len(), 1);
        assert_eq!(catalog.publications[0].title, "root");
    }

    #[test]
    fn scan_respects_max_depth() {
        let dir = tempdir().unwrap();
        let d1 = dir.path().join("d1");
        let d2 = d1.join("d2");
        fs::create_dir_all(&d2).unwrap();
        fs::write(dir.path().join("root.mp3"), b"not real").unwrap();
        fs::write(d1.join("one.mp3"), b"not real").unwrap();
        fs::write(d2.join("two.mp3"), b"not real").unwrap();

        // WalkDir depth counts root as 0, children as 1, grandchildren as 2...
        let settings = LibrarySettings {
            max_depth: Some(2),
            ..LibrarySettings::default()
        };
        let catalog = scan(dir.path(), &settings);

        let names: Vec<&str> = catalog
            .publications
            .iter()
            .map(|p| p.title.as_str())
            .collect();
        assert!(names.contains(&"root"));
        assert!(names.contains(&"one"));
        assert!(!names.contains(&"two"));
    }

    #[test]
    fn directory_catalog_rejects_missing_root() {
        let dir = tempdir().unwrap();
        let store = DirectoryCatalog::new(dir.path().join("nope"), LibrarySettings::default());
        assert!(matches!(
            store.list_publications(),
            Err(CatalogError::NotADirectory(_))
        ));
    }
}
