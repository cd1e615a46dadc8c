//! Tiny blocking HTTP server for driving the binary end to end.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;

/// Serves forever on a background thread: `id=a` gets a 404 with body
/// `missing`, everything else a 200 with body `ok`. Returns the base URI.
pub fn spawn_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { continue };

            let mut head = Vec::new();
            let mut buf = [0u8; 1024];
            while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                match stream.read(&mut buf) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => head.extend_from_slice(&buf[..n]),
                }
            }

            let head = String::from_utf8_lossy(&head);
            let target = head.split_whitespace().nth(1).unwrap_or("/");
            let (status, body) = if target.ends_with("id=a") {
                ("404 Not Found", "missing")
            } else {
                ("200 OK", "ok")
            };

            let _ = write!(
                stream,
                "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
        }
    });

    format!("http://{addr}")
}
