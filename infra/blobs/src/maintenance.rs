//! Startup cleanup of crash leftovers in the blob root.

use std::path::Path;
use std::time::{Duration, SystemTime};
use tracing::{error, info, warn};
use walkdir::WalkDir;

/// Marker every temp file name carries between the target name and counter.
pub(crate) const TMP_MARKER: &str = ".rhubtmp.";

/// Temp files younger than this may belong to an in-flight write elsewhere.
const STALE_AFTER: Duration = Duration::from_secs(300);

/// Sweeps the root for stale temp files and drops empty shard directories.
pub(crate) async fn purge_tmp(root: &Path) {
    let root = root.to_path_buf();

    let outcome = tokio::task::spawn_blocking(move || sweep(&root, SystemTime::now())).await;
    match outcome {
        Ok(Sweep { removed, failed }) if removed > 0 || failed > 0 => {
            info!(removed, failed, "Cleaned up temporary blob files");
        },
        Ok(_) => {},
        Err(e) => error!(error = %e, "Temp file cleanup task panicked"),
    }
}

#[derive(Default)]
struct Sweep {
    removed: usize,
    failed: usize,
}

fn sweep(root: &Path, now: SystemTime) -> Sweep {
    let mut out = Sweep::default();

    for entry in WalkDir::new(root).contents_first(true).into_iter().flatten() {
        let path = entry.path();
        if path == root {
            continue;
        }

        if entry.file_type().is_dir() {
            // Shard directories emptied by the sweep get reclaimed too.
            let _ = std::fs::remove_dir(path);
            continue;
        }

        if !entry.file_type().is_file() || !is_marked_tmp(path) || !is_stale(path, now) {
            continue;
        }

        match std::fs::remove_file(path) {
            Ok(()) => out.removed += 1,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to remove temp file");
                out.failed += 1;
            },
        }
    }

    out
}

fn is_marked_tmp(path: &Path) -> bool {
    path.file_name().and_then(|n| n.to_str()).is_some_and(|n| n.contains(TMP_MARKER))
}

/// Unreadable metadata counts as stale; the file is orphaned either way.
fn is_stale(path: &Path, now: SystemTime) -> bool {
    std::fs::metadata(path)
        .ok()
        .and_then(|m| m.modified().ok())
        .and_then(|modified| now.duration_since(modified).ok())
        .is_none_or(|age| age > STALE_AFTER)
}
