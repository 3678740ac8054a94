//! Roadway &ndash; an ordered HTTP router with route groups, path variables and explicit
//! 404/405 fallbacks, served on top of Hyper.
//!
//! Routes and groups are tried in registration order. The first full match wins, and when
//! nothing matches the router answers with the most informative failure it saw: a
//! `405 Method Not Allowed` (with an `Allow` header) beats a `404 Not Found`.
#![warn(missing_docs, deprecated)]
// Stricter requirements once we get to pull request stage, all warnings must be resolved.
#![cfg_attr(feature = "ci", deny(warnings))]
#![doc(test(no_crate_inject, attr(deny(warnings))))]

pub mod handler;
pub mod helpers;
pub mod middleware;
pub mod prelude;
pub mod router;
mod service;
pub mod state;

/// Test utilities for roadway applications.
#[cfg(feature = "testing")]
pub mod test;

use std::future::Future;
use std::io;
use std::net::ToSocketAddrs;

use hyper::server::conn::Http;
use log::{error, info};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::runtime::{self, Runtime};

use crate::handler::NewHandler;
use crate::service::RoadwayService;

pub use hyper;
pub use mime;

/// The error that can occur when starting the roadway server.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StartError {
    /// I/O error.
    #[error("I/O Error: {0}")]
    IoError(#[from] io::Error),
}

/// Starts a roadway application on plain, unsecured HTTP, using one worker thread per CPU.
pub fn start<NH, A>(addr: A, new_handler: NH) -> Result<(), StartError>
where
    NH: NewHandler + 'static,
    A: ToSocketAddrs + 'static + Send,
{
    start_with_num_threads(addr, new_handler, num_cpus::get())
}

/// Starts a roadway application with a designated number of threads.
pub fn start_with_num_threads<NH, A>(
    addr: A,
    new_handler: NH,
    threads: usize,
) -> Result<(), StartError>
where
    NH: NewHandler + 'static,
    A: ToSocketAddrs + 'static + Send,
{
    let runtime = new_runtime(threads)?;
    runtime.block_on(init_server(addr, new_handler))
}

/// Returns a `Future` used to spawn a roadway application.
///
/// This is used internally, but exposed in case the developer intends on doing any manual
/// wiring that isn't supported by the roadway API, such as serving on an existing runtime.
pub async fn init_server<NH, A>(addr: A, new_handler: NH) -> Result<(), StartError>
where
    NH: NewHandler + 'static,
    A: ToSocketAddrs + 'static + Send,
{
    let listener = tcp_listener(addr).await?;
    let addr = listener.local_addr()?;

    info! {
        target: "roadway::start",
        " Roadway listening on http://{}", addr
    }

    bind_server(listener, new_handler).await
}

/// Accepts connections from `listener` forever, serving each one with a fresh connection to
/// the roadway service built from `new_handler`.
pub async fn bind_server<NH>(listener: TcpListener, new_handler: NH) -> !
where
    NH: NewHandler + 'static,
{
    let protocol = Http::new();
    let roadway_service = RoadwayService::new(new_handler);

    loop {
        let (socket, addr) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                error!(target: "roadway::start", "Socket Error: {}", e);
                continue;
            }
        };

        let service = roadway_service.connect(addr);
        let connection = protocol.serve_connection(socket, service);

        tokio::spawn(spawn_connection(connection));
    }
}

async fn spawn_connection<F>(connection: F)
where
    F: Future<Output = Result<(), hyper::Error>>,
{
    if let Err(e) = connection.await {
        error!(target: "roadway::start", "Connection Error: {}", e);
    }
}

async fn tcp_listener<A>(addr: A) -> io::Result<TcpListener>
where
    A: ToSocketAddrs + 'static,
{
    let addr = addr.to_socket_addrs()?.next().ok_or_else(|| {
        io::Error::new(io::ErrorKind::Other, "unable to resolve listener address")
    })?;
    TcpListener::bind(addr).await
}

fn new_runtime(threads: usize) -> io::Result<Runtime> {
    runtime::Builder::new_multi_thread()
        .worker_threads(threads)
        .thread_name("roadway-worker")
        .enable_all()
        .build()
}
