// Data loader: download each AJAX export of a program into a directory,
// one file per endpoint, body written verbatim.

use anyhow::{Context, Result};
use indicatif::ProgressBar;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::session::Session;
use crate::transport::Transport;

pub const DATA_ENDPOINTS: [&str; 5] = [
    "ajax_sections",
    "ajax_rooms",
    "ajax_resourcetypes",
    "ajax_times",
    "ajax_teachers",
];

/// Fetch every endpoint in `DATA_ENDPOINTS` into `target_dir/<endpoint>`.
///
/// Stops at the first failure; files already written stay as they are.
/// Returns the paths written, in endpoint order.
pub fn load_data<T: Transport>(
    session: &Session<T>,
    program: &str,
    target_dir: &Path,
    progress: &ProgressBar,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(DATA_ENDPOINTS.len());

    for endpoint in DATA_ENDPOINTS {
        progress.set_message(endpoint);
        let url = session.site().program_url(program, endpoint);
        let page = session
            .get(&url)
            .with_context(|| format!("Failed to download {}", url))?;

        if serde_json::from_slice::<serde_json::Value>(&page.body).is_err() {
            // Usually the login page served to an unauthenticated session.
            progress.suspend(|| warn!(%url, "response is not JSON; saving it anyway"));
        }

        let path = target_dir.join(endpoint);
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                ensure_directory(parent)?;
            }
        }
        fs::write(&path, &page.body).with_context(|| format!("Failed to write {}", path.display()))?;
        progress.suspend(|| info!(path = %path.display(), bytes = page.body.len(), "saved"));

        written.push(path);
        progress.inc(1);
    }

    progress.finish_and_clear();
    Ok(written)
}

/// Create `dir` and its parents. A directory that is already there
/// (including one created under us) is fine.
pub fn ensure_directory(dir: &Path) -> Result<()> {
    match fs::create_dir_all(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists && dir.is_dir() => Ok(()),
        Err(e) => Err(e).with_context(|| format!("Failed to create directory {}", dir.display())),
    }
}
