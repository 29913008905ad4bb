//! Static file server for the presale page
//!
//! Serves the built WASM app (`trunk build`) from `dist/`. Unknown paths
//! fall back to `index.html` so client-side routes survive a reload.
//!
//! - `PRESALE_SERVER_ADDR` - bind address (default `127.0.0.1:8080`)
//! - `PRESALE_DIST_DIR` - directory to serve (default `dist`)
//! - `RUST_LOG` - log filter (default `info`)

use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::path::{Component, Path, PathBuf};

use lib_utils::envs::{get_env, get_env_parse, Error as EnvError};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_DIST_DIR: &str = "dist";

fn main() {
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let addr: SocketAddr = match get_env_parse("PRESALE_SERVER_ADDR") {
        Ok(addr) => addr,
        Err(EnvError::MissingEnv(_)) => match DEFAULT_ADDR.parse() {
            Ok(addr) => addr,
            Err(e) => {
                error!("Invalid default address: {}", e);
                return;
            }
        },
        Err(e) => {
            error!("PRESALE_SERVER_ADDR: {}", e);
            return;
        }
    };
    let dist = PathBuf::from(get_env("PRESALE_DIST_DIR").unwrap_or_else(|_| DEFAULT_DIST_DIR.to_string()));

    if !dist.join("index.html").exists() {
        warn!("{} has no index.html; run `trunk build` first", dist.display());
    }

    let listener = match TcpListener::bind(addr) {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {}: {}", addr, e);
            return;
        }
    };

    info!("Presale server running at http://{}", addr);
    info!("Serving from {}", dist.display());

    for stream in listener.incoming() {
        match stream {
            Ok(stream) => handle_client(stream, &dist),
            Err(e) => warn!("Connection error: {}", e),
        }
    }
}

fn handle_client(mut stream: TcpStream, dist: &Path) {
    let request_line = match BufReader::new(&mut stream).lines().next() {
        Some(Ok(line)) => line,
        _ => {
            warn!("Failed to read request line");
            return;
        }
    };

    let target = request_line.split_whitespace().nth(1).unwrap_or("/");
    let file_path = resolve_path(dist, target);
    debug!("{} -> {}", target, file_path.display());

    let response = match fs::read(&file_path) {
        Ok(body) => Response::ok(content_type(&file_path), body),
        Err(e) => {
            warn!("Cannot read {}: {}", file_path.display(), e);
            Response::not_found()
        }
    };

    if let Err(e) = response.write_to(&mut stream) {
        warn!("Failed to write response: {}", e);
    }
}

/// Map a request target to a file under `dist`.
///
/// Query strings are ignored, `..` segments never escape `dist`, and
/// anything that is not an existing file resolves to `index.html`.
fn resolve_path(dist: &Path, target: &str) -> PathBuf {
    let path = target.split(['?', '#']).next().unwrap_or("/");
    let index = dist.join("index.html");

    let relative = Path::new(path.trim_start_matches('/'));
    if relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_)))
    {
        return index;
    }

    let candidate = dist.join(relative);
    if candidate.is_file() {
        candidate
    } else {
        index
    }
}

fn content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("html") => "text/html; charset=utf-8",
        Some("css") => "text/css",
        Some("js") => "application/javascript",
        Some("wasm") => "application/wasm",
        Some("json") => "application/json",
        Some("png") => "image/png",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        _ => "application/octet-stream",
    }
}

struct Response {
    status: &'static str,
    content_type: &'static str,
    body: Vec<u8>,
}

impl Response {
    fn ok(content_type: &'static str, body: Vec<u8>) -> Self {
        Self {
            status: "200 OK",
            content_type,
            body,
        }
    }

    fn not_found() -> Self {
        Self {
            status: "404 NOT FOUND",
            content_type: "text/html; charset=utf-8",
            body: b"<!DOCTYPE html><html><body><h1>Not found</h1></body></html>".to_vec(),
        }
    }

    fn write_to(&self, stream: &mut impl Write) -> std::io::Result<()> {
        write!(
            stream,
            "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            self.status,
            self.content_type,
            self.body.len()
        )?;
        stream.write_all(&self.body)?;
        stream.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Built-app layout in a directory removed when the guard drops.
    fn dist_fixture() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("assets")).unwrap();
        fs::write(dir.path().join("index.html"), "<html></html>").unwrap();
        fs::write(dir.path().join("presale_web_bg.wasm"), [0u8, 97, 115, 109]).unwrap();
        fs::write(dir.path().join("assets/style.css"), "body{}").unwrap();
        dir
    }

    #[test]
    fn test_resolve_existing_files() {
        let fixture = dist_fixture();
        let dist = fixture.path();
        assert_eq!(resolve_path(dist, "/"), dist.join("index.html"));
        assert_eq!(
            resolve_path(dist, "/presale_web_bg.wasm"),
            dist.join("presale_web_bg.wasm")
        );
        assert_eq!(
            resolve_path(dist, "/assets/style.css?v=3"),
            dist.join("assets/style.css")
        );
    }

    #[test]
    fn test_spa_fallback_and_traversal() {
        let fixture = dist_fixture();
        let dist = fixture.path();
        assert_eq!(resolve_path(dist, "/some/route"), dist.join("index.html"));
        assert_eq!(resolve_path(dist, "/assets"), dist.join("index.html"));
        assert_eq!(resolve_path(dist, "/../Cargo.toml"), dist.join("index.html"));
    }

    #[test]
    fn test_fixture_removed_on_drop() {
        let fixture = dist_fixture();
        let root = fixture.path().to_path_buf();
        assert!(root.join("index.html").is_file());
        drop(fixture);
        assert!(!root.exists());
    }

    #[test]
    fn test_content_types() {
        assert_eq!(content_type(Path::new("a/index.html")), "text/html; charset=utf-8");
        assert_eq!(content_type(Path::new("app_bg.wasm")), "application/wasm");
        assert_eq!(content_type(Path::new("app.js")), "application/javascript");
        assert_eq!(content_type(Path::new("LICENSE")), "application/octet-stream");
    }

    #[test]
    fn test_response_format() {
        let mut out = Vec::new();
        Response::ok("text/css", b"body{}".to_vec())
            .write_to(&mut out)
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(text.contains("Content-Length: 6\r\n"));
        assert!(text.ends_with("\r\n\r\nbody{}"));
    }
}
