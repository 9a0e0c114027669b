#![allow(dead_code)]

use portal_fetch::events::Event;
use portal_fetch::{DownloaderBuilder, PortalConfig, SessionHandle};

use sha2::{Digest, Sha256};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

// Common test constants
pub const LOGIN_PATH: &str = "/signon/create";
pub const SESSION_VALUE: &str = "abc123";
pub const BODY_A: &str = "alpha contents\n";
pub const BODY_B: &str = "bravo contents\n";

/// Manifest with two files in a `reads` folder. `b.txt` carries the MD5 of
/// [`BODY_B`].
pub fn reads_manifest() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<organismDownloads name="Project">
  <folder name="reads">
    <file filename="a.txt" url="/a"/>
    <file filename="b.txt" url="/b" md5="{}"/>
  </folder>
</organismDownloads>
"#,
        md5_hex(BODY_B.as_bytes())
    )
}

/// Creates a temporary directory for testing purposes
pub fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// Creates a temporary file with the given content
pub fn create_temp_file(dir: &Path, relative: &str, content: &[u8]) -> PathBuf {
    let file_path = dir.join(relative);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent directory");
    }
    fs::write(&file_path, content).expect("Failed to write temporary file");
    file_path
}

/// Hex MD5 of `bytes`, as the portal lists it.
pub fn md5_hex(bytes: &[u8]) -> String {
    format!("{:x}", md5::compute(bytes))
}

/// Hex SHA-256 of `bytes`.
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Asserts that a file exists with exactly the given content
pub fn assert_file_content(path: &Path, expected: &str) {
    let content = fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Failed to read {:?}: {}", path, e));
    assert_eq!(content, expected, "Content mismatch at path: {:?}", path);
}

// === Portal Helpers ===

/// Portal whose sign-on endpoint and files are served by `server`.
pub fn portal(server: &MockServer) -> PortalConfig {
    PortalConfig::with_base_url(&server.uri(), LOGIN_PATH)
}

/// Session without a login round trip against `server`.
pub fn anonymous_session(server: &MockServer) -> SessionHandle {
    SessionHandle::anonymous(&portal(server)).expect("Failed to build session")
}

/// Mount a sign-on endpoint that accepts any credentials.
pub async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(LOGIN_PATH))
        .respond_with(ResponseTemplate::new(200).insert_header(
            "set-cookie",
            format!("jgi_session={}; Path=/", SESSION_VALUE).as_str(),
        ))
        .mount(server)
        .await;
}

/// Serve `body` at `route`.
pub async fn mount_file(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// Answer every GET of `route` with `status`.
pub async fn mount_status(server: &MockServer, route: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Number of requests the server received for `route`.
pub async fn request_count(server: &MockServer, route: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|request| request.url.path() == route)
        .count()
}

/// Answers every request with a one-byte body held back for `delay`, and
/// remembers when each request arrived.
///
/// A request counts as in flight from its arrival until its response is
/// released, so [`InFlightTracker::peak`] is the largest number of requests
/// the server was holding at the same moment.
#[derive(Clone)]
pub struct InFlightTracker {
    delay: Duration,
    arrivals: Arc<Mutex<Vec<Instant>>>,
}

impl InFlightTracker {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            arrivals: Arc::default(),
        }
    }

    pub fn peak(&self) -> usize {
        let arrivals = self.arrivals.lock().unwrap();
        let mut edges: Vec<(Instant, i32)> = arrivals
            .iter()
            .flat_map(|start| [(*start, 1), (*start + self.delay, -1)])
            .collect();
        // Releases sort before arrivals at the same instant.
        edges.sort();

        let mut active: i32 = 0;
        let mut peak: i32 = 0;
        for (_, change) in edges {
            active += change;
            peak = peak.max(active);
        }
        peak as usize
    }
}

impl Respond for InFlightTracker {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        self.arrivals.lock().unwrap().push(Instant::now());
        ResponseTemplate::new(200)
            .set_body_string("x")
            .set_delay(self.delay)
    }
}

/// Serve `body` on a raw socket, one byte at a time with `pause` between
/// bytes and an extra `stall` after the first byte. Returns the address.
pub async fn serve_slowly(body: &'static [u8], pause: Duration, stall: Duration) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }

                let head = format!(
                    "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nContent-Type: application/octet-stream\r\nConnection: close\r\n\r\n",
                    body.len()
                );
                if socket.write_all(head.as_bytes()).await.is_err() {
                    return;
                }
                for (i, byte) in body.iter().enumerate() {
                    if socket.write_all(&[*byte]).await.is_err() || socket.flush().await.is_err() {
                        return;
                    }
                    if i == 0 {
                        tokio::time::sleep(stall).await;
                    }
                    tokio::time::sleep(pause).await;
                }
            });
        }
    });

    address
}

// === Downloader Builder Helpers ===

/// A silent downloader writing into `dir` with a short retry delay.
pub fn test_downloader_builder(dir: &Path) -> DownloaderBuilder {
    DownloaderBuilder::hidden()
        .directory(dir.to_path_buf())
        .retry_delay(Duration::from_millis(5))
}

/// Writes the manifest text into `dir` and returns its path.
pub fn write_manifest(dir: &Path, xml: &str) -> PathBuf {
    create_temp_file(dir, "manifest.xml", xml.as_bytes())
}

/// Records a short label for every event it receives.
#[derive(Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<String>>>);

impl EventLog {
    pub fn record(&self, event: &Event<'_>) {
        let label = match event {
            Event::LoginSucceeded { .. } => "login-succeeded".to_string(),
            Event::LoginFailed { .. } => "login-failed".to_string(),
            Event::ManifestParsed { tasks, .. } => format!("manifest:{}", tasks),
            Event::TaskFinished(outcome) => format!("task:{}", outcome.task().filename),
            Event::RunFinished(summary) => format!("run:{}", summary.total_tasks),
        };
        self.0.lock().unwrap().push(label);
    }

    pub fn labels(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    /// Downloader builder reporting into this log.
    pub fn attach(&self, builder: DownloaderBuilder) -> DownloaderBuilder {
        let log = self.clone();
        builder.on_event(move |event| log.record(event))
    }
}
