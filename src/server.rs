//! HTTP server for the gallery and its media.
//!
//! Serves the rendered gallery at `/` and every media file at `/<public path>`.
//! Nothing else is reachable: there is no directory listing and no path
//! traversal, because only routes in the table built at startup exist.
//!
//! ```text
//! GET /                     → 200 text/html, the gallery
//! GET /media/<sha256>       → 200 file bytes, or 404 if the file is gone
//! GET /anything/else        → 404
//! POST /                    → 405
//! ```
//!
//! ## Route table
//!
//! Built once in [`MediaServer::new`] and never modified afterwards, so worker
//! threads share it through an `Arc` without locking. Two different files
//! claiming the same public path abort startup with
//! [`ServeError::PublicPathCollision`] rather than leaving one of them
//! unreachable. The same file listed twice is a single route.
//!
//! ## Request-time checks
//!
//! Whether a file exists is decided per request, so a file deleted while the
//! server runs turns into a 404 for that one URL and nothing else.
//!
//! Query strings are ignored for routing (the gallery keeps its position in
//! `?i=`). `HEAD` is answered like `GET`, minus the body.

use crate::media::MediaReference;
use log::{debug, info};
use std::collections::BTreeMap;
use std::fs::File;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use thiserror::Error;
use tiny_http::{Header, Method, Request, Response, StatusCode};

const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";
const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";
const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Error, Debug)]
pub enum ServeError {
    #[error("Public path {route} is claimed by both {first} and {second}")]
    PublicPathCollision {
        route: String,
        first: PathBuf,
        second: PathBuf,
    },
    #[error("Public path of {0} maps onto the gallery root")]
    ReservedRoute(PathBuf),
    #[error("Cannot listen on {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("Cannot start request worker: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("A request worker panicked")]
    WorkerPanicked,
}

/// What a request resolves to, before any bytes are written.
#[derive(Debug, PartialEq)]
pub enum Reply<'a> {
    Gallery(&'a str),
    File {
        path: &'a Path,
        content_type: &'static str,
    },
    NotFound,
    MethodNotAllowed,
}

impl Reply<'_> {
    pub fn status(&self) -> u16 {
        match self {
            Reply::Gallery(_) | Reply::File { .. } => 200,
            Reply::NotFound => 404,
            Reply::MethodNotAllowed => 405,
        }
    }
}

/// Route key for a media reference: `/` followed by its public path.
pub fn route_for(media: &MediaReference) -> String {
    format!("/{}", media.public_path().trim_start_matches('/'))
}

/// Read-only state shared by all workers.
#[derive(Debug)]
struct RouteTable {
    gallery_html: String,
    routes: BTreeMap<String, MediaReference>,
}

impl RouteTable {
    fn build(
        gallery_html: String,
        medias: impl IntoIterator<Item = MediaReference>,
    ) -> Result<Self, ServeError> {
        let mut routes: BTreeMap<String, MediaReference> = BTreeMap::new();
        for media in medias {
            let route = route_for(&media);
            if route == "/" {
                return Err(ServeError::ReservedRoute(media.host_path().to_path_buf()));
            }
            match routes.get(&route) {
                Some(existing) if existing.host_path() == media.host_path() => {
                    debug!("Duplicate input {}, serving once", media.host_path().display());
                }
                Some(existing) => {
                    return Err(ServeError::PublicPathCollision {
                        route,
                        first: existing.host_path().to_path_buf(),
                        second: media.host_path().to_path_buf(),
                    });
                }
                None => {
                    debug!("Route {} → {}", route, media.host_path().display());
                    routes.insert(route, media);
                }
            }
        }
        Ok(Self {
            gallery_html,
            routes,
        })
    }

    fn route(&self, method: &Method, url: &str) -> Reply<'_> {
        if !matches!(method, Method::Get | Method::Head) {
            return Reply::MethodNotAllowed;
        }
        let path = url.split(['?', '#']).next().unwrap_or(url);
        if path == "/" {
            return Reply::Gallery(&self.gallery_html);
        }
        match self.routes.get(path) {
            Some(media) if media.host_path().is_file() => Reply::File {
                path: media.host_path(),
                content_type: media.mimetype().unwrap_or(FALLBACK_CONTENT_TYPE),
            },
            Some(media) => {
                debug!("Media gone: {}", media.host_path().display());
                Reply::NotFound
            }
            None => Reply::NotFound,
        }
    }
}

/// Gallery server, configured but not yet listening.
#[derive(Debug)]
pub struct MediaServer {
    host: String,
    port: u16,
    workers: usize,
    table: Arc<RouteTable>,
}

impl MediaServer {
    /// Build the route table. Fails on public path collisions.
    pub fn new(
        host: impl Into<String>,
        port: u16,
        gallery_html: String,
        medias: impl IntoIterator<Item = MediaReference>,
    ) -> Result<Self, ServeError> {
        Ok(Self {
            host: host.into(),
            port,
            workers: 1,
            table: Arc::new(RouteTable::build(gallery_html, medias)?),
        })
    }

    /// Number of threads answering requests (at least one).
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Number of media routes, not counting `/`.
    pub fn route_count(&self) -> usize {
        self.table.routes.len()
    }

    /// Resolve a request without touching the network.
    pub fn route(&self, method: &Method, url: &str) -> Reply<'_> {
        self.table.route(method, url)
    }

    /// Start listening. Port 0 picks a free port; see [`BoundServer::local_addr`].
    pub fn bind(self) -> Result<BoundServer, ServeError> {
        let listener = tiny_http::Server::http((self.host.as_str(), self.port)).map_err(
            |source| ServeError::Bind {
                addr: format!("{}:{}", self.host, self.port),
                source,
            },
        )?;
        Ok(BoundServer {
            listener: Arc::new(listener),
            table: self.table,
            workers: self.workers,
        })
    }
}

/// A listening server. [`BoundServer::run`] blocks answering requests.
pub struct BoundServer {
    listener: Arc<tiny_http::Server>,
    table: Arc<RouteTable>,
    workers: usize,
}

impl BoundServer {
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.listener.server_addr().to_ip()
    }

    pub fn route_count(&self) -> usize {
        self.table.routes.len()
    }

    /// Answer requests until the listener shuts down.
    pub fn run(self) -> Result<(), ServeError> {
        let handles: Vec<_> = (1..self.workers)
            .map(|n| {
                let listener = Arc::clone(&self.listener);
                let table = Arc::clone(&self.table);
                thread::Builder::new()
                    .name(format!("quick-gallery-worker-{n}"))
                    .spawn(move || serve_requests(&listener, &table))
            })
            .collect::<Result<_, _>>()
            .map_err(ServeError::Spawn)?;

        serve_requests(&self.listener, &self.table);

        for handle in handles {
            handle.join().map_err(|_| ServeError::WorkerPanicked)?;
        }
        Ok(())
    }
}

fn serve_requests(listener: &tiny_http::Server, table: &RouteTable) {
    for request in listener.incoming_requests() {
        let method = request.method().clone();
        let url = request.url().to_string();
        let reply = table.route(&method, &url);
        let status = respond(request, &reply);
        info!("{} {} -> {}", method, url, status);
    }
}

fn header(name: &str, value: &str) -> Header {
    Header::from_bytes(name.as_bytes(), value.as_bytes()).expect("static header is valid")
}

fn text_response(status: u16, body: &str) -> Response<std::io::Cursor<Vec<u8>>> {
    Response::from_string(body)
        .with_status_code(StatusCode(status))
        .with_header(header("Content-Type", TEXT_CONTENT_TYPE))
}

/// Write a reply to the client, returning the status actually sent.
fn respond(request: Request, reply: &Reply<'_>) -> u16 {
    let (status, result) = match reply {
        Reply::Gallery(html) => {
            let response =
                Response::from_string(*html).with_header(header("Content-Type", HTML_CONTENT_TYPE));
            (200, request.respond(response))
        }
        Reply::File { path, content_type } => match File::open(path) {
            Ok(file) => {
                let response =
                    Response::from_file(file).with_header(header("Content-Type", content_type));
                (200, request.respond(response))
            }
            Err(e) => {
                debug!("Cannot open {}: {}", path.display(), e);
                (404, request.respond(text_response(404, "404: Not Found")))
            }
        },
        Reply::NotFound => (404, request.respond(text_response(404, "404: Not Found"))),
        Reply::MethodNotAllowed => {
            let response = text_response(405, "405: Method Not Allowed")
                .with_header(header("Allow", "GET, HEAD"));
            (405, request.respond(response))
        }
    };
    if let Err(e) = result {
        debug!("Client went away: {}", e);
    }
    status
}
