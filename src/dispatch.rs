//! HTTP dispatcher (component 4.H).
//!
//! Grounded in `httpserver.c`'s `processHTTPRequest`/`route`: resolve the
//! request path under the webroot, fall back to `index.html` for a
//! directory target, and decide between the static file server (4.F) and
//! the script executor (4.G) by extension. Every branch here always
//! produces a response — failures from the collaborators are folded into
//! an error response rather than propagated, since the worker loop (4.I)
//! must never see anything but "response was written, continue."

use crate::errors::ErrorKind;
use crate::exec;
use crate::http::request::Request;
use crate::http::response::{headers_for, Response};
use crate::http::types::Method;
use crate::mime::MimeTable;
use crate::static_file;
use std::path::{Path, PathBuf};

pub(crate) enum Body {
    Mapped(static_file::Body),
    Owned(Vec<u8>),
}

impl Body {
    pub(crate) fn as_bytes(&self) -> &[u8] {
        match self {
            Body::Mapped(b) => b.as_bytes(),
            Body::Owned(v) => v,
        }
    }
}

pub(crate) struct Dispatched {
    pub(crate) headers: Vec<u8>,
    pub(crate) body: Body,
    pub(crate) status: u16,
}

/// `full = webroot + request.path`; a directory target falls back to
/// `index.html` underneath it.
fn resolve_path(webroot: &Path, req_path: &[u8]) -> PathBuf {
    let relative = std::str::from_utf8(req_path).unwrap_or("").trim_start_matches('/');
    let mut full = webroot.join(relative);
    if full.is_dir() {
        full.push("index.html");
    }
    full
}

pub(crate) async fn dispatch(req: &Request, webroot: &Path, mime_table: &MimeTable) -> Dispatched {
    let result = match req.method {
        Method::Get => handle_get(req, webroot, mime_table).await,
        Method::Post => handle_post(req, webroot).await,
        Method::Options => options_response(),
        Method::Other => error_response(ErrorKind::MethodNotAllowed),
    };

    tracing::info!(
        method = ?req.method,
        path = %String::from_utf8_lossy(&req.path),
        querystring = ?req.querystring.as_deref().map(String::from_utf8_lossy),
        status = result.status,
        "request handled",
    );

    result
}

async fn handle_get(req: &Request, webroot: &Path, mime_table: &MimeTable) -> Dispatched {
    let full = resolve_path(webroot, &req.path);
    if let Some(interpreter) = exec::interpreter_for(&full) {
        if static_file::is_regular_file(&full) {
            return run_script(interpreter, &full, req).await;
        }
    }
    match static_file::serve(&full, mime_table) {
        Ok(resp) => Dispatched { headers: resp.headers, body: Body::Mapped(resp.body), status: 200 },
        Err(e) => error_response(e),
    }
}

async fn handle_post(req: &Request, webroot: &Path) -> Dispatched {
    let full = resolve_path(webroot, &req.path);
    if static_file::is_directory(&full) {
        return error_response(ErrorKind::Forbidden);
    }
    if let Some(interpreter) = exec::interpreter_for(&full) {
        if static_file::is_regular_file(&full) {
            return run_script(interpreter, &full, req).await;
        }
    }
    error_response(ErrorKind::Forbidden)
}

async fn run_script(interpreter: &str, path: &Path, req: &Request) -> Dispatched {
    match exec::run(interpreter, path, req.querystring.as_deref(), req.body.as_deref()).await {
        Ok(body) => {
            let headers = headers_for(200, "OK", None, body.len());
            Dispatched { headers, body: Body::Owned(body), status: 200 }
        }
        Err(_) => error_response(ErrorKind::ExecError),
    }
}

fn options_response() -> Dispatched {
    let headers = Response::new()
        .status(204, "No Content")
        .default_headers()
        .header("Allow", "GET, POST, OPTIONS")
        .content_length(0)
        .finish();
    Dispatched { headers, body: Body::Owned(Vec::new()), status: 204 }
}

fn error_response(err: ErrorKind) -> Dispatched {
    let (code, reason) = err.status();
    let headers = headers_for(code, reason, None, 0);
    Dispatched { headers, body: Body::Owned(Vec::new()), status: code }
}
