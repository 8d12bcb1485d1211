//! SOA serial derived from the database file's modification time.
//!
//! Any edit to the database bumps the mtime, so secondaries see a larger
//! serial without anyone maintaining it by hand.

use chrono::{DateTime, Utc};
use std::path::Path;
use tracing::{debug, warn};

/// Serial for zones served from the database at `path`.
///
/// UTC Unix seconds of the file's mtime, or of the current time when the
/// mtime cannot be read.
pub async fn soa_serial(path: &Path) -> u32 {
    let metadata = tokio::fs::metadata(path).await;
    let modified: DateTime<Utc> = match metadata.and_then(|meta| meta.modified()) {
        Ok(mtime) => mtime.into(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "cannot stat database, using current time for SOA serial");
            Utc::now()
        }
    };

    let serial = u32::try_from(modified.timestamp().max(0)).unwrap_or(u32::MAX);
    debug!(serial, "derived SOA serial");
    serial
}
