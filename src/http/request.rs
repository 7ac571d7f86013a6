//! Request reader/parser state machine (component 4.D).
//!
//! Parsing is split in two: [`try_parse`] is the pure, synchronous
//! "header-parsing primitive" from §4.D — given whatever bytes have been
//! read so far, it returns `None` (keep reading), `Some(Ok(_))` (complete),
//! or `Some(Err(_))` (malformed). [`read_request`] is the thin async loop
//! around it that actually touches the socket. Splitting them this way
//! means the parsing logic itself needs no I/O to exercise in tests.

use crate::errors::ErrorKind;
use crate::http::types::Method;
use std::io;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Hard cap on the read buffer. A request that doesn't complete within
/// this many bytes is `400 Request too long`.
pub(crate) const MAX_REQUEST_SIZE: usize = 8 * 1024;

/// Headers beyond this count make a request malformed rather than being
/// silently dropped — matches the original's fixed `phr_header[100]` array.
pub(crate) const MAX_HEADERS: usize = 100;

/// A fully parsed request, owning all of its backing bytes. Dropped (and
/// its storage freed) once the handler that consumes it returns.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Request {
    pub(crate) method: Method,
    pub(crate) path: Vec<u8>,
    pub(crate) querystring: Option<Vec<u8>>,
    pub(crate) minor_version: u32,
    pub(crate) headers: Vec<(Vec<u8>, Vec<u8>)>,
    pub(crate) body: Option<Vec<u8>>,
}

impl Request {
    /// Case-sensitive header lookup — `Content-Length` during parsing is
    /// matched the same way, per the literal-match policy recorded in §9.
    pub(crate) fn header(&self, name: &[u8]) -> Option<&[u8]> {
        self.headers
            .iter()
            .find(|(n, _)| n.as_slice() == name)
            .map(|(_, v)| v.as_slice())
    }

    pub(crate) fn body_len(&self) -> usize {
        self.body.as_ref().map_or(0, Vec::len)
    }
}

/// Reads from `stream` into a fixed 8 KiB buffer until a complete request
/// is assembled, handing each chunk to [`try_parse`]. `EINTR` is retried
/// transparently; any other read error, or a `0`-byte read before the
/// request is complete, surfaces as [`ErrorKind::Io`].
pub(crate) async fn read_request<S: AsyncRead + Unpin>(stream: &mut S) -> Result<Request, ErrorKind> {
    let mut buf = vec![0u8; MAX_REQUEST_SIZE];
    let mut filled = 0usize;

    loop {
        if filled == buf.len() {
            return Err(ErrorKind::ReqTooLong);
        }

        let n = loop {
            match stream.read(&mut buf[filled..]).await {
                Ok(n) => break n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(ErrorKind::from(e)),
            }
        };

        if n == 0 {
            return Err(ErrorKind::from(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "connection closed before request was complete",
            )));
        }
        filled += n;

        if let Some(result) = try_parse(&buf[..filled]) {
            return result;
        }
    }
}

/// The header-parsing primitive. `None` means "incomplete, read more".
pub(crate) fn try_parse(data: &[u8]) -> Option<Result<Request, ErrorKind>> {
    let term_idx = memchr::memmem::find(data, b"\r\n\r\n")?;
    Some(parse_complete(data, term_idx))
}

fn parse_complete(data: &[u8], term_idx: usize) -> Result<Request, ErrorKind> {
    // `head` includes the CRLF terminating the last header line, but not
    // the blank line that terminates the header block.
    let head = &data[..term_idx + 2];
    let body_start = term_idx + 4;

    let mut lines = split_crlf_lines(head).into_iter();
    let request_line = lines.next().ok_or(ErrorKind::ParseError)?;
    let (method_raw, target, minor_version) = parse_request_line(request_line)?;
    let method = Method::from_bytes(method_raw);
    let (path, querystring) = split_target(target)?;

    let mut headers = Vec::new();
    for line in lines {
        if headers.len() >= MAX_HEADERS {
            return Err(ErrorKind::ParseError);
        }
        headers.push(parse_header_line(line)?);
    }

    let body = (method == Method::Post)
        .then(|| content_length(&headers))
        .flatten()
        .filter(|&len| len > 0)
        .map(|len| {
            let available = data.len().saturating_sub(body_start);
            let take = len.min(available);
            data[body_start..body_start + take].to_vec()
        });

    Ok(Request {
        method,
        path: path.to_vec(),
        querystring: querystring.map(<[u8]>::to_vec),
        minor_version,
        headers,
        body,
    })
}

/// `Content-Length` is matched by exact, case-sensitive name — a deliberate
/// policy decision recorded in §9, not an oversight.
fn content_length(headers: &[(Vec<u8>, Vec<u8>)]) -> Option<usize> {
    headers
        .iter()
        .find(|(name, _)| name.as_slice() == b"Content-Length")
        .and_then(|(_, value)| std::str::from_utf8(value).ok())
        .and_then(|s| s.parse().ok())
}

fn split_crlf_lines(data: &[u8]) -> Vec<&[u8]> {
    let mut lines = Vec::new();
    let mut start = 0;
    while let Some(pos) = memchr::memmem::find(&data[start..], b"\r\n") {
        lines.push(&data[start..start + pos]);
        start += pos + 2;
    }
    lines
}

fn parse_request_line(line: &[u8]) -> Result<(&[u8], &[u8], u32), ErrorKind> {
    let sp1 = memchr::memchr(b' ', line).ok_or(ErrorKind::ParseError)?;
    let method = &line[..sp1];
    let rest = &line[sp1 + 1..];
    let sp2 = memchr::memchr(b' ', rest).ok_or(ErrorKind::ParseError)?;
    let target = &rest[..sp2];
    let version = parse_version(&rest[sp2 + 1..])?;

    if method.is_empty() || target.is_empty() {
        return Err(ErrorKind::ParseError);
    }
    Ok((method, target, version))
}

fn parse_version(token: &[u8]) -> Result<u32, ErrorKind> {
    let suffix = token.strip_prefix(b"HTTP/1.").ok_or(ErrorKind::ParseError)?;
    if suffix.is_empty() || !suffix.iter().all(u8::is_ascii_digit) {
        return Err(ErrorKind::ParseError);
    }
    std::str::from_utf8(suffix)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or(ErrorKind::ParseError)
}

fn split_target(target: &[u8]) -> Result<(&[u8], Option<&[u8]>), ErrorKind> {
    if !target.starts_with(b"/") {
        return Err(ErrorKind::ParseError);
    }
    Ok(match memchr::memchr(b'?', target) {
        Some(pos) => (&target[..pos], Some(&target[pos + 1..])),
        None => (target, None),
    })
}

fn parse_header_line(line: &[u8]) -> Result<(Vec<u8>, Vec<u8>), ErrorKind> {
    let colon = memchr::memchr(b':', line).ok_or(ErrorKind::ParseError)?;
    let name = &line[..colon];
    if name.is_empty() {
        return Err(ErrorKind::ParseError);
    }
    let mut value = &line[colon + 1..];
    while value.first() == Some(&b' ') {
        value = &value[1..];
    }
    Ok((name.to_vec(), value.to_vec()))
}
