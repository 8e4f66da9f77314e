#![cfg(test)]
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};

use lanserve_core::server;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

static DIR_SEQ: AtomicUsize = AtomicUsize::new(0);

/// Materializes `files` under a fresh temp root and starts the responder
/// on an ephemeral loopback port. Returns the bound address.
async fn start_site(files: &[(&str, &str)]) -> anyhow::Result<SocketAddr> {
    let seq: usize = DIR_SEQ.fetch_add(1, Ordering::Relaxed);
    let root = std::env::temp_dir().join(format!("lanserve-it-{}-{}", std::process::id(), seq));
    tokio::fs::create_dir_all(&root).await?;

    for (name, contents) in files {
        let path = root.join(name);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, contents).await?;
    }

    let listener: TcpListener = TcpListener::bind("127.0.0.1:0").await?;
    let addr: SocketAddr = listener.local_addr()?;
    tokio::spawn(server::serve_with(listener, root));
    Ok(addr)
}

async fn request(addr: SocketAddr, line: &str) -> anyhow::Result<String> {
    let mut stream = TcpStream::connect(addr).await?;
    stream
        .write_all(format!("{line}\r\nHost: localhost\r\nConnection: close\r\n\r\n").as_bytes())
        .await?;

    let mut response = String::new();
    stream.read_to_string(&mut response).await?;
    Ok(response)
}

#[tokio::test]
async fn serves_index_for_directory_request() {
    let addr = start_site(&[("index.html", "<h1>hello lan</h1>")])
        .await
        .unwrap();

    let response = request(addr, "GET / HTTP/1.1").await.unwrap();

    assert!(response.starts_with("HTTP/1.1 200 OK"), "got: {response}");
    assert!(response.contains("Content-Type: text/html"));
    assert!(response.ends_with("<h1>hello lan</h1>"));
}

#[tokio::test]
async fn serves_nested_assets_with_media_type() {
    let addr = start_site(&[
        ("index.html", "<html></html>"),
        ("assets/site.css", "body { margin: 0 }"),
    ])
    .await
    .unwrap();

    let response = request(addr, "GET /assets/site.css HTTP/1.1").await.unwrap();

    assert!(response.starts_with("HTTP/1.1 200 OK"), "got: {response}");
    assert!(response.contains("Content-Type: text/css"));
    assert!(response.ends_with("body { margin: 0 }"));
}

#[tokio::test]
async fn missing_file_is_not_found() {
    let addr = start_site(&[("index.html", "<html></html>")]).await.unwrap();

    let response = request(addr, "GET /nope.txt HTTP/1.1").await.unwrap();

    assert!(
        response.starts_with("HTTP/1.1 404 NOT FOUND"),
        "got: {response}"
    );
}

#[tokio::test]
async fn extensionless_request_falls_back_to_html() {
    let addr = start_site(&[("about.html", "<p>about</p>")]).await.unwrap();

    let response = request(addr, "GET /about HTTP/1.1").await.unwrap();

    assert!(response.starts_with("HTTP/1.1 200 OK"), "got: {response}");
    assert!(response.ends_with("<p>about</p>"));
}

#[tokio::test]
async fn traversal_requests_stay_inside_the_root() {
    let addr = start_site(&[("index.html", "<html></html>")]).await.unwrap();

    let response = request(addr, "GET /../../../etc/passwd HTTP/1.1").await.unwrap();
    assert!(
        response.starts_with("HTTP/1.1 404 NOT FOUND"),
        "got: {response}"
    );

    // `....//` collapses into `../` under naive single-pass stripping.
    let response = request(addr, "GET /....//....//....//etc/passwd HTTP/1.1")
        .await
        .unwrap();
    assert!(
        response.starts_with("HTTP/1.1 404 NOT FOUND"),
        "got: {response}"
    );
}

#[tokio::test]
async fn head_request_omits_body() {
    let addr = start_site(&[("index.html", "<h1>hello</h1>")]).await.unwrap();

    let response = request(addr, "HEAD / HTTP/1.1").await.unwrap();

    assert!(response.starts_with("HTTP/1.1 200 OK"), "got: {response}");
    assert!(response.ends_with("\r\n\r\n"), "got: {response}");
}
