//! Atomic JSON output.

use std::io::Write;
use std::path::Path;
#[cfg(unix)]
use std::{fs::Permissions, os::unix::fs::PermissionsExt};

use tempfile::NamedTempFile;

use crate::error::FeedError;
use crate::model::FeedDocument;

/// Renders a feed as pretty JSON with a trailing newline.
///
/// # Errors
///
/// Returns `FeedError::Serialize` if serialization fails.
pub fn render_feed(doc: &FeedDocument) -> Result<String, FeedError> {
    let mut content = serde_json::to_string_pretty(doc)?;
    content.push('\n');
    Ok(content)
}

/// Mode given to a feed file that does not exist yet.
#[cfg(unix)]
const NEW_FEED_MODE: u32 = 0o644;

/// Permissions for the replacement file: those of the current target, or
/// `0644` for a new feed.
#[cfg(unix)]
fn target_permissions(path: &Path) -> Permissions {
    std::fs::metadata(path).map_or_else(
        |_| Permissions::from_mode(NEW_FEED_MODE),
        |meta| meta.permissions(),
    )
}

/// Writes a feed to `path`, replacing any existing file atomically.
///
/// The document is written to a temporary file in the target directory
/// and renamed over `path`, so readers never observe a partial file.
/// Parent directories are created as needed. On Unix the file keeps the
/// mode of the feed it replaces.
///
/// # Errors
///
/// Returns `FeedError::Io` if directory creation, writing or the final
/// rename fails.
pub fn write_feed(path: &Path, doc: &FeedDocument) -> Result<(), FeedError> {
    let content = render_feed(doc)?;
    let io_err = |source| FeedError::Io {
        path: path.to_path_buf(),
        source,
    };

    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(parent).map_err(io_err)?;

    let mut tmp = NamedTempFile::new_in(parent).map_err(io_err)?;
    tmp.write_all(content.as_bytes()).map_err(io_err)?;
    #[cfg(unix)]
    tmp.as_file()
        .set_permissions(target_permissions(path))
        .map_err(io_err)?;
    tmp.as_file().sync_all().map_err(io_err)?;
    tmp.persist(path).map_err(|e| io_err(e.error))?;

    tracing::debug!(path = %path.display(), bytes = content.len(), "feed written");
    Ok(())
}
