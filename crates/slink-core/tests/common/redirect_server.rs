//! Minimal HTTP/1.1 server with a fixed redirect table for integration tests.
//!
//! Each route answers with a status and an optional `Location`. A route can
//! refuse HEAD with 501 to exercise the GET fallback. Every request is
//! recorded as `"METHOD /path"`.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Route {
    pub path: &'static str,
    pub status: u16,
    pub location: Option<&'static str>,
    /// Answer HEAD with 501 Not Implemented.
    pub head_not_implemented: bool,
}

impl Route {
    pub fn ok(path: &'static str) -> Self {
        Self {
            path,
            status: 200,
            location: None,
            head_not_implemented: false,
        }
    }

    pub fn redirect(path: &'static str, location: &'static str) -> Self {
        Self {
            path,
            status: 302,
            location: Some(location),
            head_not_implemented: false,
        }
    }

    pub fn no_head(mut self) -> Self {
        self.head_not_implemented = true;
        self
    }
}

pub struct RedirectServer {
    pub base: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl RedirectServer {
    /// Absolute URL for `path` (which starts with `/`).
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

/// Starts a server in a background thread. Unknown paths get 404. The
/// server runs until the process exits.
pub fn start(routes: Vec<Route>) -> RedirectServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let routes = Arc::new(routes);
    let requests = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&requests);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let routes = Arc::clone(&routes);
            let log = Arc::clone(&log);
            thread::spawn(move || handle(stream, &routes, &log));
        }
    });
    RedirectServer {
        base: format!("http://127.0.0.1:{}", port),
        requests,
    }
}

fn handle(mut stream: TcpStream, routes: &[Route], log: &Mutex<Vec<String>>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let Ok(request) = std::str::from_utf8(&buf[..n]) else {
        return;
    };
    let mut first = request.lines().next().unwrap_or("").split_whitespace();
    let method = first.next().unwrap_or("").to_string();
    let path = first.next().unwrap_or("/").to_string();
    log.lock().unwrap().push(format!("{} {}", method, path));

    let route = routes.iter().find(|r| r.path == path);
    let (status, reason, location) = match route {
        Some(r) if r.head_not_implemented && method.eq_ignore_ascii_case("HEAD") => {
            (501, "Not Implemented", None)
        }
        Some(r) => (r.status, reason(r.status), r.location),
        None => (404, "Not Found", None),
    };
    let location = location
        .map(|l| format!("Location: {}\r\n", l))
        .unwrap_or_default();
    let body = if method.eq_ignore_ascii_case("HEAD") { "" } else { "ok\n" };
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Length: {}\r\n{}Connection: close\r\n\r\n{}",
        status,
        reason,
        body.len(),
        location,
        body
    );
    let _ = stream.write_all(response.as_bytes());
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        301 => "Moved Permanently",
        302 => "Found",
        404 => "Not Found",
        _ => "Unknown",
    }
}
