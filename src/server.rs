//! Server core (component 4.I).
//!
//! Grounded in `server/server.h`'s `server_init`/`server_start`/`server_free`
//! lifecycle and the teacher's `Server`/`ServerBuilder` shape in
//! `server/server_impl.rs`: a listening socket, a fixed worker pool, and a
//! single acceptor loop feeding the bounded connection queue (4.C).

use crate::config::{Config, Key};
use crate::dispatch;
use crate::http::request;
use crate::http::response::headers_for;
use crate::mime::MimeTable;
use crate::queue::{self, QueueReceiver};
use socket2::{Domain, Protocol, Socket, Type};
use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

const DEFAULT_NTHREADS: i32 = 2;
const DEFAULT_QUEUE_SIZE: i32 = 100;

/// Everything a worker needs once a connection is dequeued. Shared,
/// read-only after init — §5's "MIME table and configuration dictionary
/// are read-only once initialization completes".
struct Shared {
    webroot: PathBuf,
    mime_table: MimeTable,
}

pub struct Server {
    listener: TcpListener,
    nthreads: i32,
    queue_size: i32,
    shared: Arc<Shared>,
}

impl Server {
    /// Init (§4.I): binds the listening socket with `SO_REUSEADDR` and
    /// `SO_REUSEPORT`, computes the absolute webroot, and takes ownership
    /// of the already-loaded config and MIME table.
    pub async fn init(config: &Config, mime_table: MimeTable) -> io::Result<Self> {
        let address = config.get_str_key(Key::Address).unwrap_or("0.0.0.0");
        let port = config.get_int_key(Key::Port).map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?;
        let webroot_suffix = config.get_str_key(Key::Webroot).unwrap_or("");
        let nthreads = config.get_int_or(Key::Nthreads, DEFAULT_NTHREADS);
        let queue_size = config.get_int_or(Key::QueueSize, DEFAULT_QUEUE_SIZE);

        let addr: SocketAddr = format!("{address}:{port}").parse().map_err(|_| {
            io::Error::new(io::ErrorKind::InvalidInput, "ADDRESS/PORT did not form a valid socket address")
        })?;

        let socket = Socket::new(Domain::IPV4, Type::STREAM, Some(Protocol::TCP))?;
        socket.set_reuse_address(true)?;
        #[cfg(unix)]
        socket.set_reuse_port(true)?;
        socket.set_nonblocking(true)?;
        socket.bind(&addr.into())?;
        socket.listen(queue_size.max(1))?;

        let listener = TcpListener::from_std(socket.into())?;

        let mut webroot = std::env::current_dir()?;
        webroot.push(webroot_suffix.trim_start_matches('/'));

        tracing::info!(%addr, nthreads, queue_size, webroot = %webroot.display(), "server initialized");

        Ok(Self {
            listener,
            nthreads,
            queue_size,
            shared: Arc::new(Shared { webroot, mime_table }),
        })
    }

    /// Start (§4.I): spawns `nthreads` workers draining the connection
    /// queue, then runs the acceptor loop — `accept` → enqueue (blocking on
    /// full) → repeat. Never returns in normal operation.
    pub async fn start(self) -> io::Result<()> {
        let (sender, receiver) = queue::create::<TcpStream>(self.queue_size.max(1) as usize);

        for worker_id in 0..self.nthreads.max(1) {
            let receiver = receiver.clone();
            let shared = Arc::clone(&self.shared);
            tokio::spawn(worker_loop(worker_id, receiver, shared));
        }

        loop {
            let (stream, peer) = self.listener.accept().await?;
            tracing::debug!(%peer, "accepted connection");
            if sender.add(stream).await.is_err() {
                tracing::error!("connection queue closed, acceptor exiting");
                return Ok(());
            }
        }
    }
}

async fn worker_loop(worker_id: i32, receiver: QueueReceiver<TcpStream>, shared: Arc<Shared>) {
    while let Some(mut stream) = receiver.pop().await {
        if let Err(e) = serve_one(&mut stream, &shared).await {
            tracing::warn!(worker_id, error = %e, "connection ended with an error");
        }
    }
    tracing::info!(worker_id, "worker exiting, queue closed");
}

/// One full request lifecycle: read/parse, dispatch, respond, close.
/// Mirrors `respond()`'s final `shutdown`+`close` — here, simply dropping
/// the stream at the end of the function. Generic over the stream type so
/// tests can drive it through `tokio::io::duplex` instead of a real socket.
async fn serve_one<S: AsyncRead + AsyncWrite + Unpin>(stream: &mut S, shared: &Shared) -> io::Result<()> {
    let req = match request::read_request(stream).await {
        Ok(req) => req,
        Err(e) => {
            let (code, reason) = e.status();
            let headers = headers_for(code, reason, None, 0);
            let _ = stream.write_all(&headers).await;
            let _ = stream.shutdown().await;
            return Ok(());
        }
    };

    let dispatched = dispatch::dispatch(&req, &shared.webroot, &shared.mime_table).await;
    stream.write_all(&dispatched.headers).await?;
    stream.write_all(dispatched.body.as_bytes()).await?;
    stream.shutdown().await?;
    Ok(())
}
