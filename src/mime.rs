//! Extension → MIME-type table (component 4.B).
//!
//! Process-wide, read-only after init. Grounded in the original
//! `uthash`-backed table: duplicate extensions are rejected per-line but
//! don't abort the whole load; the load only fails if nothing was parsed.

use crate::errors::MimeError;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct MimeTable {
    by_extension: HashMap<String, String>,
}

impl MimeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a single `(extension, type)` association. Returns `false`
    /// (not an error) if the extension was already present — callers
    /// loading from a file treat that as "skip this line, keep going".
    pub fn insert(&mut self, extension: &str, mime_type: &str) -> bool {
        if self.by_extension.contains_key(extension) {
            return false;
        }
        self.by_extension.insert(extension.to_string(), mime_type.to_string());
        true
    }

    /// Looks up the MIME type for a bare extension (no leading dot).
    /// Safe to call on an empty, not-yet-loaded table — just returns `None`.
    pub fn get(&self, extension: &str) -> Option<&str> {
        self.by_extension.get(extension).map(String::as_str)
    }

    /// Looks up by filename, extracting the extension after the last `.`.
    /// Files with no extension have no MIME type.
    pub fn get_for_filename(&self, filename: &str) -> Option<&str> {
        let ext = filename.rsplit_once('.')?.1;
        self.get(ext)
    }

    /// Parses a tab-separated `extension<TAB>type` body (one pair per
    /// line, trailing newline trimmed, blank lines skipped) and inserts
    /// every line that parses. Errs only if zero lines produced an entry.
    pub fn load_from_str(&mut self, contents: &str) -> Result<usize, MimeError> {
        let mut loaded = 0;
        for line in contents.lines() {
            let line = line.trim_end_matches(['\r', '\n']);
            if line.is_empty() {
                continue;
            }
            let Some((ext, ty)) = line.split_once('\t') else {
                continue;
            };
            if self.insert(ext, ty) {
                loaded += 1;
            }
        }
        if loaded == 0 {
            return Err(MimeError::EmptyTable);
        }
        Ok(loaded)
    }
}
