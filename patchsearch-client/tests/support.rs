//! Canned HTTP backend for client tests.
//!
//! Serves one scripted response per connection on a loopback port and
//! records each request it receives.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// A request as seen by the canned backend.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method, e.g. `POST`.
    pub method: String,
    /// Request target, e.g. `/query-analogue`.
    pub path: String,
    /// Raw body.
    pub body: String,
}

impl RecordedRequest {
    /// Parse the body as JSON.
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body)
            .unwrap_or_else(|err| panic!("request body is not JSON ({err}): {}", self.body))
    }
}

/// Scripted reply for one connection.
#[derive(Debug, Clone)]
pub enum Reply {
    /// Answer with `status` and a JSON `body`.
    Json {
        /// HTTP status code.
        status: u16,
        /// JSON response body.
        body: String,
    },
    /// Read the request and then stay silent for the given time.
    Stall(Duration),
}

impl Reply {
    /// A `200 OK` JSON reply.
    pub fn ok(body: &str) -> Self {
        Self::Json {
            status: 200,
            body: body.to_owned(),
        }
    }

    /// A reply with an arbitrary status.
    pub fn status(status: u16, body: &str) -> Self {
        Self::Json {
            status,
            body: body.to_owned(),
        }
    }
}

/// Loopback server answering connections from a script.
#[derive(Debug)]
pub struct CannedBackend {
    base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl CannedBackend {
    /// Start serving `replies` in order, one per connection.
    pub fn start(replies: Vec<Reply>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .unwrap_or_else(|err| panic!("failed to bind loopback listener: {err}"));
        let address = listener
            .local_addr()
            .unwrap_or_else(|err| panic!("listener has no address: {err}"));
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&requests);
        thread::spawn(move || {
            for reply in replies {
                let Ok((stream, _)) = listener.accept() else {
                    return;
                };
                serve(stream, &reply, &recorded);
            }
        });
        Self {
            base_url: format!("http://{address}"),
            requests,
        }
    }

    /// Base URL to point a client at.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Requests served so far.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|err| panic!("request log poisoned: {err}"))
            .clone()
    }
}

/// Base URL of a loopback port with nothing listening.
pub fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .unwrap_or_else(|err| panic!("failed to bind loopback listener: {err}"));
    let address = listener
        .local_addr()
        .unwrap_or_else(|err| panic!("listener has no address: {err}"));
    drop(listener);
    format!("http://{address}")
}

fn serve(stream: TcpStream, reply: &Reply, recorded: &Mutex<Vec<RecordedRequest>>) {
    let Some(request) = read_request(&stream) else {
        return;
    };
    if let Ok(mut log) = recorded.lock() {
        log.push(request);
    }
    match reply {
        Reply::Json { status, body } => write_response(stream, *status, body),
        Reply::Stall(duration) => {
            thread::sleep(*duration);
            drop(stream);
        }
    }
}

fn read_request(stream: &TcpStream) -> Option<RecordedRequest> {
    let mut reader = BufReader::new(stream.try_clone().ok()?);
    let mut request_line = String::new();
    reader.read_line(&mut request_line).ok()?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next()?.to_owned();
    let path = parts.next()?.to_owned();

    let mut content_length = 0_usize;
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).ok()? == 0 {
            break;
        }
        let header = line.trim_end();
        if header.is_empty() {
            break;
        }
        if let Some((name, value)) = header.split_once(':') {
            if name.trim().eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse().ok()?;
            }
        }
    }

    let mut body = vec![0_u8; content_length];
    reader.read_exact(&mut body).ok()?;
    Some(RecordedRequest {
        method,
        path,
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}

fn write_response(mut stream: TcpStream, status: u16, body: &str) {
    let reason = match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Status",
    };
    let response = format!(
        "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}
