//! origin-server — a concurrent HTTP/1.1 origin server.
//!
//! Serves static files from a configured webroot and dispatches requests
//! for configured executable extensions to an external interpreter via
//! stdin/stdout pipes. One request per connection; no keep-alive, no TLS,
//! no chunked transfer — see the crate's design notes for the full list of
//! non-goals.
//!
//! The public surface is intentionally small: load a [`config::Config`]
//! and a [`mime::MimeTable`] (via [`config_loader`] / [`mime_loader`]),
//! hand them to [`server::Server::init`], then call
//! [`server::Server::start`]. Everything else — the request parser, the
//! response builder, the static file and script-execution paths, the
//! dispatcher — is an internal implementation detail of the core pipeline.

pub mod config;
pub mod config_loader;
pub mod errors;
pub mod logging;
pub mod mime;
pub mod mime_loader;
pub mod queue;
pub mod server;

pub(crate) mod dispatch;
pub(crate) mod exec;
pub(crate) mod http;
pub(crate) mod static_file;

#[doc(hidden)]
#[cfg(test)]
pub(crate) mod tools {
    use std::str::from_utf8;

    #[inline]
    pub(crate) fn str_op(value: &[u8]) -> &str {
        from_utf8(value).unwrap()
    }
}
