use std::fs;

use super::*;

#[test]
fn counts_start_at_zero() {
    let store = StatsStore::in_memory();
    assert_eq!(store.get(TrackId(1)), PublicationStats::default());
}

#[test]
fn increment_bumps_only_the_named_counter() {
    let mut store = StatsStore::in_memory();
    store.increment(TrackId(1), Stat::View);
    store.increment(TrackId(1), Stat::View);
    let after = store.increment(TrackId(1), Stat::Download);

    assert_eq!(
        after,
        PublicationStats {
            views: 2,
            downloads: 1,
            shares: 0
        }
    );
    assert_eq!(store.get(TrackId(2)), PublicationStats::default());
}

#[test]
fn counters_survive_reopening() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state").join("tilawa").join("stats.toml");

    let mut store = StatsStore::open(path.clone());
    store.increment(TrackId(7), Stat::View);
    store.increment(TrackId(7), Stat::Share);
    store.increment(TrackId(9), Stat::Download);
    assert!(path.is_file());

    let reopened = StatsStore::open(path);
    assert_eq!(
        reopened.get(TrackId(7)),
        PublicationStats {
            views: 1,
            downloads: 0,
            shares: 1
        }
    );
    assert_eq!(reopened.get(TrackId(9)).downloads, 1);
}

#[test]
fn reads_hand_written_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stats.toml");
    fs::write(
        &path,
        "[publications.3]\nviews = 4\n\n[publications.oops]\nviews = 1\n",
    )
    .unwrap();

    let store = StatsStore::open(path);
    assert_eq!(store.get(TrackId(3)).views, 4);
    assert_eq!(store.get(TrackId(3)).shares, 0);
}

#[test]
fn corrupt_file_falls_back_to_zero() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stats.toml");
    fs::write(&path, "this is = = not toml").unwrap();

    assert!(matches!(load(&path), Err(StatsError::Parse { .. })));

    let mut store = StatsStore::open(path);
    assert_eq!(store.get(TrackId(1)), PublicationStats::default());
    assert_eq!(store.increment(TrackId(1), Stat::View).views, 1);
}

#[test]
fn unwritable_path_keeps_counting_in_memory() {
    let dir = tempfile::tempdir().unwrap();
    // A directory where the file should be: reads and writes both fail.
    let path = dir.path().join("stats.toml");
    fs::create_dir(&path).unwrap();

    let mut store = StatsStore::open(path.clone());
    store.increment(TrackId(1), Stat::Download);
    assert_eq!(store.increment(TrackId(1), Stat::Download).downloads, 2);
    assert!(matches!(store.save(), Err(StatsError::Write { .. })));
    assert!(path.is_dir());
}
