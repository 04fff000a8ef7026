//! Static file server for the wallet page
//!
//! Serves the built Leptos WASM app from the dist/ directory with an
//! index.html fallback for client-side routes.

use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::path::{Path, PathBuf};

const ADDR: &str = "127.0.0.1:8080";
const INDEX: &str = "dist/index.html";

fn main() {
    let listener = TcpListener::bind(ADDR).expect("Failed to bind to port 8080");

    println!("dSalary wallet page running at http://{}", ADDR);
    println!("Serving from dist/ directory");
    println!("Press Ctrl+C to stop\n");

    for stream in listener.incoming() {
        match stream {
            Ok(stream) => handle_client(stream),
            Err(e) => eprintln!("Connection error: {}", e),
        }
    }
}

fn handle_client(mut stream: TcpStream) {
    let buf_reader = BufReader::new(&mut stream);
    let request_line = match buf_reader.lines().next() {
        Some(Ok(line)) => line,
        _ => {
            eprintln!("Failed to read request line");
            return;
        }
    };

    let full_path = request_line.split_whitespace().nth(1).unwrap_or("/");
    let path = full_path.split_once('?').map_or(full_path, |(p, _)| p);

    let file_path = resolve(path);
    let content_type = content_type_for(&file_path);

    let (body, content_type, status) = match fs::read(&file_path) {
        Ok(contents) => (contents, content_type, "200 OK"),
        // Unknown path: hand the route to the client-side router.
        Err(_) => match fs::read(Path::new(INDEX)) {
            Ok(contents) => (contents, "text/html; charset=utf-8", "200 OK"),
            Err(_) => {
                eprintln!("{} not found; build the app with trunk first", INDEX);
                (
                    b"<!DOCTYPE html><html><body><h1>Not Found</h1></body></html>".to_vec(),
                    "text/html; charset=utf-8",
                    "404 NOT FOUND",
                )
            }
        },
    };

    let headers = format!(
        "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\n\r\n",
        status,
        content_type,
        body.len()
    );

    if let Err(e) = stream.write_all(headers.as_bytes()) {
        eprintln!("Failed to write headers: {}", e);
        return;
    }
    if let Err(e) = stream.write_all(&body) {
        eprintln!("Failed to write body: {}", e);
    }
    let _ = stream.flush();
}

/// Map a request path to a file under dist/, falling back to the index
/// for directories and unknown routes.
fn resolve(path: &str) -> PathBuf {
    if path == "/" || path.is_empty() {
        return PathBuf::from(INDEX);
    }
    let mut dist_path = PathBuf::from("dist");
    dist_path.push(path.strip_prefix('/').unwrap_or(path));
    if dist_path.is_dir() || !dist_path.exists() {
        PathBuf::from(INDEX)
    } else {
        dist_path
    }
}

fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|s| s.to_str()) {
        Some("html") => "text/html; charset=utf-8",
        Some("css") => "text/css",
        Some("js") => "application/javascript",
        Some("wasm") => "application/wasm",
        Some("json") => "application/json",
        _ => "application/octet-stream",
    }
}
