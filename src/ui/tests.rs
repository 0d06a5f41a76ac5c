use std::sync::Arc;
use std::time::Duration;

use super::*;
use crate::catalog::{Publication, PublicationKind, Track, TrackId};
use crate::config::{TimeField, UiSettings};
use crate::playback::{PlaybackSnapshot, Status};
use crate::stats::PublicationStats;

#[test]
fn controls_text_includes_seek_seconds() {
    let text = controls_text(7);
    assert!(text.contains("[H/L] seek -/+7s"));
    assert!(text.starts_with("[j/k] up/down"));
    assert!(text.ends_with("[q] quit"));
}

#[test]
fn mmss_has_unpadded_minutes() {
    assert_eq!(format_mmss(Duration::from_secs(0)), "0:00");
    assert_eq!(format_mmss(Duration::from_secs(65)), "1:05");
    assert_eq!(format_mmss(Duration::from_secs(3600)), "60:00");
}

#[test]
fn highlight_uppercases_matched_chars() {
    assert_eq!(highlight_matches("surat al-fatiha", "sf"), "Surat al-Fatiha");
    assert_eq!(highlight_matches("abc", "xyz"), "abc");
}

#[test]
fn time_text_respects_fields_and_separator() {
    let ui = UiSettings {
        time_fields: vec![TimeField::Elapsed, TimeField::Total, TimeField::Remaining],
        time_separator: " | ".into(),
        ..UiSettings::default()
    };
    let text = transport::time_text(Duration::from_secs(10), Some(Duration::from_secs(70)), &ui);
    assert_eq!(text.as_deref(), Some("0:10 | 1:10 | -1:00"));

    // total/remaining drop out until the duration is known
    let text = transport::time_text(Duration::from_secs(10), None, &ui);
    assert_eq!(text.as_deref(), Some("0:10"));

    let empty = UiSettings {
        time_fields: Vec::new(),
        ..UiSettings::default()
    };
    assert_eq!(transport::time_text(Duration::ZERO, None, &empty), None);
}

#[test]
fn progress_is_zero_without_duration_and_clamped() {
    assert_eq!(transport::progress_ratio(Duration::from_secs(5), None), 0.0);
    assert_eq!(
        transport::progress_ratio(Duration::from_secs(5), Some(Duration::ZERO)),
        0.0
    );
    assert_eq!(
        transport::progress_ratio(Duration::from_secs(30), Some(Duration::from_secs(60))),
        0.5
    );
    assert_eq!(
        transport::progress_ratio(Duration::from_secs(90), Some(Duration::from_secs(60))),
        1.0
    );
}

#[test]
fn volume_slider_fills_proportionally() {
    assert_eq!(transport::volume_slider(0), format!("[{}]   0%", "░".repeat(20)));
    assert_eq!(
        transport::volume_slider(50),
        format!("[{}{}]  50%", "█".repeat(10), "░".repeat(10))
    );
    assert_eq!(transport::volume_slider(100), format!("[{}] 100%", "█".repeat(20)));
}

#[test]
fn headline_reports_idle_and_current_track() {
    let ui = UiSettings::default();
    let mut snapshot = PlaybackSnapshot::empty(50);
    assert_eq!(transport::headline(&snapshot, &ui), "Nothing playing");

    let track = Arc::new(Track {
        id: TrackId(1),
        title: "Surat Al-Fatiha".into(),
        language: "Arabic".into(),
        cover_art: String::new(),
        source_uri: "/srv/audio/001.mp3".into(),
    });
    snapshot.state.current = Some(track.id);
    snapshot.state.status = Status::Paused;
    snapshot.state.position = Duration::from_secs(3);
    snapshot.state.duration = Some(Duration::from_secs(42));
    snapshot.current = Some(track);

    assert_eq!(
        transport::headline(&snapshot, &ui),
        "Paused • Surat Al-Fatiha (Arabic) [0:03 / 0:42]"
    );
}

#[test]
fn playlist_footer_estimates_three_and_a_half_minutes_per_track() {
    assert_eq!(playlist::estimated_minutes(0), 0);
    assert_eq!(playlist::estimated_minutes(1), 3);
    assert_eq!(playlist::estimated_minutes(3), 10);
    assert_eq!(playlist::footer_text(1), "1 track • ~3 min");
    assert_eq!(playlist::footer_text(4), "4 tracks • ~14 min");
}

#[test]
fn centered_rect_stays_inside_area() {
    let area = Rect {
        x: 0,
        y: 3,
        width: 40,
        height: 10,
    };
    let r = centered_rect_sized(72, 11, area);
    assert!(r.width <= 38 && r.height <= 8);
    assert!(r.x >= area.x && r.y >= area.y);
}

#[test]
fn detail_text_ends_with_usage_counts() {
    let publication = Publication {
        id: TrackId(7),
        title: "Surat Yasin".into(),
        cover_url: String::new(),
        category_id: "recitations".into(),
        language: "Arabic".into(),
        kind: PublicationKind::Audio,
        description: String::new(),
        browse_url: None,
        download_url: Some("/srv/audio/036.mp3".into()),
    };
    let stats = PublicationStats {
        views: 4,
        downloads: 2,
        shares: 1,
    };

    let text = detail_text(Some(&publication), stats);
    assert!(text.contains("Audio: /srv/audio/036.mp3"));
    assert_eq!(
        text.lines().last(),
        Some("Views: 4 • Downloads: 2 • Shares: 1")
    );
    assert_eq!(detail_text(None, stats), "Nothing selected");
}
