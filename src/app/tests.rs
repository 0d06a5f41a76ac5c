use super::*;
use crate::catalog::{Catalog, TrackId};
use crate::classify::{Classification, ClassifyError};
use crate::playback::{PlaybackSnapshot, Status};

const CATALOG: &str = r#"
[[categories]]
id = "all"
name = "All"

[[categories]]
id = "recitations"
name = "Audio recitations"

[[categories]]
id = "translations"
name = "Translations"

[[publications]]
id = 1
title = "Alpha Recitation"
category_id = "recitations"
language = "Arabic"
kind = "audio"
download_url = "/srv/audio/alpha.mp3"

[[publications]]
id = 2
title = "Beta Translation"
category_id = "translations"
language = "English"
kind = "digital"

[[publications]]
id = 3
title = "Gamma Recitation"
category_id = "recitations"
language = "Arabic"
kind = "audio"
download_url = "/srv/audio/gamma.mp3"

[[publications]]
id = 4
title = "Delta Translation"
category_id = "translations"
language = "French"
kind = "printed"
"#;

fn app() -> App {
    App::new(Catalog::from_toml_str(CATALOG).unwrap(), 50)
}

#[test]
fn display_indices_respects_filter_query() {
    let mut app = app();
    for c in "trans".chars() {
        app.push_filter_char(c);
    }
    assert_eq!(app.display_indices(), vec![1, 3]);
    assert_eq!(app.selected, 1);

    for _ in 0..5 {
        app.pop_filter_char();
    }
    assert_eq!(app.display_indices(), vec![0, 1, 2, 3]);
}

#[test]
fn display_indices_combines_query_and_category() {
    let mut app = app();
    app.category_id = Some("recitations".into());
    app.filter_query = "gam".into();
    assert_eq!(app.display_indices(), vec![2]);

    app.clear_filter();
    assert_eq!(app.display_indices().len(), 4);
}

#[test]
fn next_and_prev_wrap_within_the_view() {
    let mut app = app();
    app.category_id = Some("translations".into());
    app.selected = 1;

    app.next();
    assert_eq!(app.selected, 3);
    app.next();
    assert_eq!(app.selected, 1);
    app.prev();
    assert_eq!(app.selected, 3);
}

#[test]
fn cycle_category_skips_all_and_wraps_to_no_filter() {
    let mut app = app();
    app.cycle_category();
    assert_eq!(app.category_id.as_deref(), Some("recitations"));
    assert_eq!(app.category_name(), Some("Audio recitations"));
    app.cycle_category();
    assert_eq!(app.category_id.as_deref(), Some("translations"));
    app.cycle_category();
    assert_eq!(app.category_id, None);
}

#[test]
fn selected_track_only_for_playable_publications() {
    let mut app = app();
    app.selected = 0;
    assert_eq!(app.selected_track().map(|t| t.id), Some(TrackId(1)));
    app.selected = 1;
    assert!(app.selected_track().is_none());
    assert!(app.is_playable(2));
    assert!(!app.is_playable(3));
}

#[test]
fn selected_track_is_shared_between_calls() {
    let app = app();
    let a = app.selected_track().unwrap();
    let b = app.selected_track().unwrap();
    assert!(std::sync::Arc::ptr_eq(&a, &b));
}

#[test]
fn classification_applies_known_category() {
    let mut app = app();
    app.apply_classification(Ok(Classification {
        category_id: Some("translations".into()),
        explanation: "Showing Translations".into(),
    }));
    assert_eq!(app.category_id.as_deref(), Some("translations"));
    assert_eq!(app.selected, 1);
    assert_eq!(app.notice.as_deref(), Some("Showing Translations"));
}

#[test]
fn classification_failure_degrades_to_no_filter() {
    let mut app = app();
    app.category_id = Some("recitations".into());
    app.apply_classification(Err(ClassifyError::NoCategories));
    assert_eq!(app.category_id, None);
    assert!(
        app.notice
            .as_deref()
            .unwrap()
            .contains("no categories to choose from")
    );

    app.category_id = Some("recitations".into());
    app.apply_classification(Ok(Classification {
        category_id: Some("unknown".into()),
        explanation: "?".into(),
    }));
    assert_eq!(app.category_id, None);
}

fn snapshot_with(app: &App, ids: &[usize], current: Option<usize>) -> PlaybackSnapshot {
    let mut snapshot = PlaybackSnapshot::empty(50);
    for &i in ids {
        let track = app.track_at(i).unwrap();
        snapshot.playlist.push(track);
    }
    if let Some(i) = current {
        let track = app.track_at(i).unwrap();
        snapshot.state.current = Some(track.id);
        snapshot.state.status = Status::Playing;
        snapshot.current = Some(track);
    }
    snapshot
}

#[test]
fn open_playlist_puts_cursor_on_current_track() {
    let mut app = app();
    let snapshot = snapshot_with(&app, &[0, 2], Some(2));
    app.apply_snapshot(snapshot);

    app.open_playlist();
    assert!(app.playlist_open);
    assert_eq!(app.playlist_selected, 1);
    assert!(app.is_current(TrackId(3)));

    app.playlist_next();
    assert_eq!(app.playlist_selected, 0);
    app.playlist_prev();
    assert_eq!(app.playlist_selected, 1);
    assert_eq!(app.playlist_selection().map(|t| t.id), Some(TrackId(3)));
}

#[test]
fn shrinking_playlist_clamps_cursor() {
    let mut app = app();
    app.apply_snapshot(snapshot_with(&app, &[0, 2], None));
    app.playlist_selected = 1;

    app.apply_snapshot(snapshot_with(&app, &[0], None));
    assert_eq!(app.playlist_selected, 0);

    app.apply_snapshot(PlaybackSnapshot::empty(50));
    assert_eq!(app.playlist_selected, 0);
    assert!(app.playlist_selection().is_none());
}

#[test]
fn ask_mode_collects_a_question() {
    let mut app = app();
    app.push_ask_char('x');
    assert_eq!(app.ask_query, None);

    app.start_ask();
    for c in "brailw".chars() {
        app.push_ask_char(c);
    }
    app.pop_ask_char();
    app.push_ask_char('e');
    assert_eq!(app.take_ask().as_deref(), Some("braile"));
    assert_eq!(app.ask_query, None);
}

#[test]
fn opening_details_counts_a_view() {
    let mut app = app();
    app.selected = 0;

    app.toggle_detail();
    assert!(app.detail_open);
    assert_eq!(app.selected_stats().views, 1);

    // Closing is not a view.
    app.toggle_detail();
    assert_eq!(app.selected_stats().views, 1);

    app.toggle_detail();
    assert_eq!(app.selected_stats().views, 2);
    assert_eq!(app.selected_stats().downloads, 0);
}

#[test]
fn sharing_needs_a_link() {
    let mut app = app();
    app.selected = 0;
    app.share_selected();
    assert_eq!(app.selected_stats().shares, 1);
    assert!(app.notice.as_deref().unwrap().contains("/srv/audio/alpha.mp3"));

    app.selected = 1;
    app.share_selected();
    assert_eq!(app.selected_stats().shares, 0);
    assert!(app.notice.as_deref().unwrap().contains("Nothing to share"));
}

#[test]
fn recorded_downloads_show_on_the_selected_publication() {
    let mut app = app();
    app.record(TrackId(3), crate::stats::Stat::Download);
    app.selected = 2;
    assert_eq!(app.selected_stats().downloads, 1);
    app.selected = 0;
    assert_eq!(app.selected_stats(), crate::stats::PublicationStats::default());
}
