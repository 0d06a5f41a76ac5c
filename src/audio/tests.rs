use std::path::PathBuf;
use std::time::Duration;

use super::player::RodioMedia;
use super::source::resolve_source_path;
use crate::config::AudioSettings;
use crate::playback::{MediaError, MediaHandle, SourceId};

#[test]
fn plain_paths_and_file_uris_resolve_to_files() {
    assert_eq!(
        resolve_source_path("/srv/audio/001.mp3").unwrap(),
        PathBuf::from("/srv/audio/001.mp3")
    );
    assert_eq!(
        resolve_source_path(" file:///srv/audio/001.mp3 ").unwrap(),
        PathBuf::from("/srv/audio/001.mp3")
    );
    assert_eq!(
        resolve_source_path("file://localhost/srv/a.ogg").unwrap(),
        PathBuf::from("/srv/a.ogg")
    );
}

#[test]
fn remote_and_empty_sources_are_unsupported() {
    assert!(matches!(
        resolve_source_path("https://example.org/001.mp3"),
        Err(MediaError::UnsupportedSource(_))
    ));
    assert!(matches!(
        resolve_source_path("   "),
        Err(MediaError::UnsupportedSource(_))
    ));
}

#[test]
fn missing_files_fail_before_reaching_the_audio_thread() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.mp3");

    let (mut media, _events) = RodioMedia::spawn(AudioSettings::default());
    let err = media
        .set_source(SourceId::first(), missing.to_str().unwrap())
        .unwrap_err();
    assert!(matches!(err, MediaError::Unavailable { .. }));
    media.quit_softly(Duration::ZERO);
}
