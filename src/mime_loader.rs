//! MIME-file loader (component 4.M, entrypoint collaborator).
//!
//! Thin wrapper around [`MimeTable::load_from_str`] (4.B) that owns the
//! one I/O boundary — reading `MIME_FILE` off disk.

use crate::mime::MimeTable;
use std::io;
use std::path::Path;

pub async fn load_from_path(path: &Path) -> io::Result<MimeTable> {
    let contents = tokio::fs::read_to_string(path).await?;
    let mut table = MimeTable::new();
    table
        .load_from_str(&contents)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;
    Ok(table)
}
