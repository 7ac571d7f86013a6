//! Response builder (component 4.E).
//!
//! Grounded in `httputils.c`'s `respond`/`send_response_header`/
//! `send_response_body`/`setDefaultHeaders`: a status line, headers emitted
//! in insertion order, a blank-line terminator, and — unlike the header
//! block — a body that's handed to the caller as raw bytes rather than
//! folded into this buffer, so a memory-mapped file slice (4.F) can be
//! written straight to the socket without a copy. [`Response::finish`]
//! therefore returns only the header block; body and header are always two
//! separate writes, exactly as the original's `respond()` does it.

use std::time::SystemTime;

/// Fluent header-block builder. Build by chaining `status()` -> headers ->
/// `finish()`, matching the teacher's original `status()` -> headers ->
/// body call order.
#[derive(Debug)]
pub(crate) struct Response {
    buf: Vec<u8>,
}

impl Response {
    pub(crate) fn new() -> Self {
        Self { buf: Vec::with_capacity(256) }
    }

    pub(crate) fn status(mut self, code: u16, reason: &str) -> Self {
        self.buf.extend_from_slice(b"HTTP/1.1 ");
        self.buf.extend_from_slice(code.to_string().as_bytes());
        self.buf.push(b' ');
        self.buf.extend_from_slice(reason.as_bytes());
        self.buf.extend_from_slice(b"\r\n");
        self
    }

    pub(crate) fn header(mut self, name: &str, value: &str) -> Self {
        self.buf.extend_from_slice(name.as_bytes());
        self.buf.extend_from_slice(b": ");
        self.buf.extend_from_slice(value.as_bytes());
        self.buf.extend_from_slice(b"\r\n");
        self
    }

    /// `Date` and `Server`, mirroring `setDefaultHeaders`'s gmtime-formatted
    /// `Date` and its literal `Server: httpServer`.
    pub(crate) fn default_headers(self) -> Self {
        self.header("Date", &httpdate::fmt_http_date(SystemTime::now()))
            .header("Server", "httpServer")
    }

    pub(crate) fn content_type(self, mime: &str) -> Self {
        self.header("Content-Type", mime)
    }

    pub(crate) fn content_length(self, len: usize) -> Self {
        self.header("Content-Length", &len.to_string())
    }

    pub(crate) fn last_modified(self, when: SystemTime) -> Self {
        self.header("Last-Modified", &httpdate::fmt_http_date(when))
    }

    /// Terminates the header block with the blank line and returns the
    /// finished bytes, ready to write directly to the socket.
    pub(crate) fn finish(mut self) -> Vec<u8> {
        self.buf.extend_from_slice(b"\r\n");
        self.buf
    }
}

/// Builds the header block for a response whose body is `body.len()` bytes
/// of `content_type` (or no body at all, if `content_type` is `None`). The
/// body itself is never copied in here — write `headers` then `body` to
/// the socket as two separate writes.
pub(crate) fn headers_for(code: u16, reason: &str, content_type: Option<&str>, body_len: usize) -> Vec<u8> {
    let mut resp = Response::new().status(code, reason).default_headers();
    if let Some(ct) = content_type {
        resp = resp.content_type(ct);
    }
    resp.content_length(body_len).finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::str_op;

    #[test]
    fn status_line_is_http11_regardless_of_request_version() {
        let resp = Response::new().status(200, "OK").finish();
        assert!(str_op(&resp).starts_with("HTTP/1.1 200 OK\r\n"));
    }

    #[test]
    fn headers_preserve_insertion_order() {
        let resp = Response::new()
            .status(200, "OK")
            .header("X-First", "1")
            .header("X-Second", "2")
            .finish();
        let text = str_op(&resp);
        assert!(text.find("X-First").unwrap() < text.find("X-Second").unwrap());
    }

    #[test]
    fn finish_terminates_with_blank_line() {
        let resp = Response::new().status(204, "No Content").finish();
        assert!(str_op(&resp).ends_with("\r\n\r\n"));
    }

    #[test]
    fn default_headers_carries_date_and_server() {
        let resp = Response::new().status(200, "OK").default_headers().finish();
        let text = str_op(&resp);
        assert!(text.contains("Date: "));
        assert!(text.contains("Server: httpServer"));
    }

    #[test]
    fn headers_for_builds_content_type_and_length() {
        let bytes = headers_for(200, "OK", Some("text/html"), 42);
        let text = str_op(&bytes);
        assert!(text.contains("Content-Type: text/html\r\n"));
        assert!(text.contains("Content-Length: 42\r\n"));
    }

    #[test]
    fn headers_for_without_content_type_omits_it() {
        let bytes = headers_for(204, "No Content", None, 0);
        let text = str_op(&bytes);
        assert!(!text.contains("Content-Type"));
        assert!(text.contains("Content-Length: 0\r\n"));
    }

    #[test]
    fn last_modified_is_http_date_formatted() {
        let resp = Response::new()
            .status(200, "OK")
            .last_modified(SystemTime::UNIX_EPOCH)
            .finish();
        assert!(str_op(&resp).contains("Last-Modified: Thu, 01 Jan 1970 00:00:00 GMT\r\n"));
    }
}
