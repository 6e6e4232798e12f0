//! Atomic publication of the metrics file.

use crate::error::ExportError;
use std::path::{Path, PathBuf};

pub const METRICS_FILENAME: &str = "runpod.prom";

/// Writes `contents` under `dir` and renames it onto the final filename.
///
/// The temp file carries the process id so concurrent invocations cannot
/// collide, and it lives in the target directory so the rename stays on one
/// filesystem. Readers polling the final path never observe a partial file;
/// when multiple runs race, the last completed rename wins.
pub fn publish(dir: &Path, contents: &str) -> Result<PathBuf, ExportError> {
    let final_path = dir.join(METRICS_FILENAME);
    let temp_path = dir.join(format!("{METRICS_FILENAME}.{}.tmp", std::process::id()));

    std::fs::write(&temp_path, contents).map_err(|source| ExportError::Filesystem {
        path: temp_path.clone(),
        source,
    })?;

    if let Err(source) = std::fs::rename(&temp_path, &final_path) {
        let _ = std::fs::remove_file(&temp_path);
        return Err(ExportError::Filesystem {
            path: final_path,
            source,
        });
    }

    Ok(final_path)
}
