use std::path::PathBuf;

use crate::playback::MediaError;

/// Map a track's source URI onto a local file path.
///
/// Plain paths and `file://` URIs are accepted; any other scheme is not
/// something this backend can open.
pub fn resolve_source_path(uri: &str) -> Result<PathBuf, MediaError> {
    let uri = uri.trim();
    if uri.is_empty() {
        return Err(MediaError::UnsupportedSource(uri.to_string()));
    }
    if let Some(rest) = uri.strip_prefix("file://") {
        let rest = rest.strip_prefix("localhost").unwrap_or(rest);
        return Ok(PathBuf::from(rest));
    }
    if uri.contains("://") {
        return Err(MediaError::UnsupportedSource(uri.to_string()));
    }
    Ok(PathBuf::from(uri))
}
