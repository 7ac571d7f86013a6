//! Static file serving (component 4.F).
//!
//! Grounded in `httputils.c`'s `send_file`/`is_regular_file`/
//! `is_directory`/`get_file_size`: files are served by memory-mapping them
//! so the body never gets copied into a Rust-owned buffer, matching the
//! original's `mmap`-based approach.

use crate::errors::ErrorKind;
use crate::http::response::Response;
use crate::mime::MimeTable;
use memmap2::Mmap;
use std::fs::File;
use std::io;
use std::path::Path;
use std::time::SystemTime;

/// The response body. A zero-length file is never `mmap`'d (the syscall
/// rejects empty mappings), so it gets its own empty variant instead.
pub(crate) enum Body {
    Mapped(Mmap),
    Empty,
}

impl Body {
    pub(crate) fn as_bytes(&self) -> &[u8] {
        match self {
            Body::Mapped(m) => &m[..],
            Body::Empty => &[],
        }
    }
}

pub(crate) struct StaticResponse {
    pub(crate) headers: Vec<u8>,
    pub(crate) body: Body,
}

/// `stat`s `path`, rejecting anything that isn't a regular file, then maps
/// it and builds the header block (`Last-Modified`, `Content-Type` from
/// `mime_table`, `Content-Length`). Missing files and permission failures
/// both surface as [`ErrorKind::NotFound`] — the original collapses both
/// into "not found" rather than leaking `stat` failure detail to the client.
pub(crate) fn serve(path: &Path, mime_table: &MimeTable) -> Result<StaticResponse, ErrorKind> {
    let metadata = std::fs::metadata(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => ErrorKind::NotFound,
        _ => ErrorKind::from(e),
    })?;
    if !metadata.is_file() {
        return Err(ErrorKind::NotFound);
    }

    let file = File::open(path)?;
    let len = metadata.len() as usize;
    let body = if len == 0 {
        Body::Empty
    } else {
        // Safety: the file was just opened read-only by this process and is
        // served once; concurrent external mutation is out of scope.
        Body::Mapped(unsafe { Mmap::map(&file)? })
    };

    let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
    let content_type = path
        .file_name()
        .and_then(|n| n.to_str())
        .and_then(|name| mime_table.get_for_filename(name));

    let mut builder = Response::new().status(200, "OK").default_headers().last_modified(modified);
    if let Some(ct) = content_type {
        builder = builder.content_type(ct);
    }
    let headers = builder.content_length(len).finish();

    Ok(StaticResponse { headers, body })
}

/// `is_regular_file` from the original — used by the dispatcher to decide
/// whether a `POST` target is routed to the script executor.
pub(crate) fn is_regular_file(path: &Path) -> bool {
    std::fs::metadata(path).map(|m| m.is_file()).unwrap_or(false)
}

/// `is_directory` from the original — a `POST` to a directory is `403`.
pub(crate) fn is_directory(path: &Path) -> bool {
    std::fs::metadata(path).map(|m| m.is_dir()).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::str_op;

    fn mime_table() -> MimeTable {
        let mut table = MimeTable::new();
        table.insert("html", "text/html");
        table
    }

    #[test]
    fn serves_existing_file_with_headers() {
        let mut file = tempfile_with(b"<h1>hi</h1>", "html");
        file.flush().unwrap();
        let resp = serve(file.path(), &mime_table()).unwrap();
        let text = str_op(&resp.headers);
        assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(text.contains("Content-Type: text/html\r\n"));
        assert!(text.contains("Content-Length: 11\r\n"));
        assert!(text.contains("Last-Modified: "));
        assert_eq!(resp.body.as_bytes(), b"<h1>hi</h1>");
    }

    #[test]
    fn empty_file_has_empty_body_no_mmap() {
        let file = tempfile_with(b"", "html");
        let resp = serve(file.path(), &mime_table()).unwrap();
        assert!(matches!(resp.body, Body::Empty));
        assert_eq!(resp.body.as_bytes(), b"");
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = serve(Path::new("/nonexistent/path/surely"), &mime_table()).unwrap_err();
        assert!(matches!(err, ErrorKind::NotFound));
    }

    #[test]
    fn directory_is_not_found_not_served() {
        let dir = std::env::temp_dir();
        let err = serve(&dir, &mime_table()).unwrap_err();
        assert!(matches!(err, ErrorKind::NotFound));
    }

    #[test]
    fn unrecognized_extension_omits_content_type() {
        let file = tempfile_with(b"data", "xyz123");
        let resp = serve(file.path(), &mime_table()).unwrap();
        assert!(!str_op(&resp.headers).contains("Content-Type"));
    }

    #[test]
    fn is_regular_file_and_is_directory_agree_with_stat() {
        let file = tempfile_with(b"x", "txt");
        assert!(is_regular_file(file.path()));
        assert!(!is_directory(file.path()));

        let dir = std::env::temp_dir();
        assert!(is_directory(&dir));
        assert!(!is_regular_file(&dir));
    }

    fn tempfile_with(contents: &[u8], extension: &str) -> NamedTempFile {
        NamedTempFile::new(contents, extension)
    }

    /// Minimal scratch-file helper so these tests don't pull in a dev-dep
    /// just to get an auto-deleted temp path.
    struct NamedTempFile {
        path: std::path::PathBuf,
    }

    impl NamedTempFile {
        fn new(contents: &[u8], extension: &str) -> Self {
            let mut path = std::env::temp_dir();
            path.push(format!(
                "originserver-test-{}-{}.{extension}",
                std::process::id(),
                contents.len()
            ));
            std::fs::write(&path, contents).unwrap();
            Self { path }
        }

        fn path(&self) -> &Path {
            &self.path
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Drop for NamedTempFile {
        fn drop(&mut self) {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}
