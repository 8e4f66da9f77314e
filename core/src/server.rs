//! Static file responder.
//!
//! Serves a directory over plain HTTP on all interfaces. One task per
//! connection; each connection answers a single request and closes.

use std::ffi::OsStr;
use std::io;
use std::path::{Component, Path, PathBuf};

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tracing::{debug, warn};

pub mod mime;

/// Upper bound on the request head; a peer streaming bytes without a
/// newline gets cut off here instead of growing the line buffer forever.
const MAX_REQUEST_HEAD: u64 = 16 * 1024;

/// Binds `0.0.0.0:<port>` and serves `root` until the task is dropped.
/// Blocks its caller for the listener's entire lifetime.
pub async fn serve(root: PathBuf, port: u16) -> anyhow::Result<()> {
    let listener: TcpListener = TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("failed to bind port {port}"))?;
    serve_with(listener, root).await
}

/// Accept loop over an already-bound listener. Split out so tests can bind
/// an ephemeral port themselves.
pub async fn serve_with(listener: TcpListener, root: PathBuf) -> anyhow::Result<()> {
    loop {
        let (stream, peer) = listener.accept().await?;
        let root: PathBuf = root.clone();
        tokio::spawn(async move {
            if let Err(err) = handle_connection(stream, &root).await {
                debug!("request from {peer} failed: {err}");
            }
        });
    }
}

async fn handle_connection<T>(stream: T, root: &Path) -> anyhow::Result<()>
where
    T: AsyncRead + AsyncWrite + Unpin,
{
    let (read_half, mut writer) = tokio::io::split(stream);
    let mut reader = BufReader::new(read_half.take(MAX_REQUEST_HEAD));

    let mut request_line = String::new();
    reader.read_line(&mut request_line).await?;
    if request_line.trim().is_empty() {
        return Ok(());
    }

    let mut parts = request_line.split_whitespace();
    let method: &str = parts.next().unwrap_or("");
    let raw_path: &str = parts.next().unwrap_or("/");

    let head_only: bool = method == "HEAD";
    let target: PathBuf = resolve(root, raw_path);
    debug!("{method} {raw_path}");

    // Drain the remaining headers; none of them change the response.
    loop {
        let mut line = String::new();
        let read: usize = reader.read_line(&mut line).await?;
        if read == 0 || line == "\r\n" || line == "\n" {
            break;
        }
    }

    respond(&mut writer, target, head_only).await
}

/// Maps a request path onto the served root.
///
/// Query strings are dropped and `%20` is decoded. The target is rebuilt
/// from the decoded path's components keeping only normal segments, so no
/// spelling of a parent reference (`..`, `....//`, a leading absolute
/// path) survives and the result stays under the root. Directory paths
/// get `index.html` appended.
fn resolve(root: &Path, raw_path: &str) -> PathBuf {
    let path: &str = raw_path.split('?').next().unwrap_or(raw_path);
    let path: String = path.replace("%20", " ");

    let mut target: PathBuf = root.to_path_buf();
    for component in Path::new(&path).components() {
        if let Component::Normal(segment) = component {
            target.push(segment);
        }
    }

    if path.ends_with('/') {
        target.push("index.html");
    }
    target
}

/// Reads the target file, falling back to `<path>.html` for extensionless
/// requests so bare URLs like `/notes` reach `notes.html`.
async fn load(target: PathBuf) -> (io::Result<Vec<u8>>, Option<String>) {
    let extension: Option<String> = target
        .extension()
        .and_then(OsStr::to_str)
        .map(str::to_string);

    if extension.is_some() {
        return (tokio::fs::read(&target).await, extension);
    }

    match tokio::fs::read(&target).await {
        Ok(bytes) => {
            warn!(
                "serving {} without an extension as application/octet-stream",
                target.display()
            );
            (Ok(bytes), None)
        }
        Err(_) => (
            tokio::fs::read(target.with_extension("html")).await,
            Some("html".to_string()),
        ),
    }
}

async fn respond<W>(writer: &mut W, target: PathBuf, head_only: bool) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let (contents, extension) = load(target).await;

    match contents {
        Ok(body) => {
            let content_type: &str = mime::from_extension(extension.as_deref());
            let header: String = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                content_type,
                body.len()
            );
            writer.write_all(header.as_bytes()).await?;
            if !head_only {
                writer.write_all(&body).await?;
            }
        }
        Err(err) => {
            debug!("not found: {err}");
            writer
                .write_all(b"HTTP/1.1 404 NOT FOUND\r\nContent-Length: 0\r\nConnection: close\r\n\r\n")
                .await?;
        }
    }

    writer.flush().await?;
    Ok(())
}
