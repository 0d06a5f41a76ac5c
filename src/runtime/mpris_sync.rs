use std::sync::mpsc::Receiver;

use crate::app::App;
use crate::mpris::MprisHandle;
use crate::playback::PlaybackSnapshot;

/// Forward the newest pushed snapshot to both surfaces. Intermediate
/// snapshots are superseded and skipped.
pub fn drain_snapshots(
    snapshots: &Receiver<PlaybackSnapshot>,
    app: &mut App,
    mpris: Option<&MprisHandle>,
) {
    let Some(latest) = snapshots.try_iter().last() else {
        return;
    };
    if let Some(mpris) = mpris {
        mpris.publish(&latest);
    }
    app.apply_snapshot(latest);
}
