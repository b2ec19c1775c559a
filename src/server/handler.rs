use crate::content::Content;
use axum::{
    Router,
    body::Body,
    extract::{ConnectInfo, State},
    http::{HeaderMap, HeaderValue, Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use futures_util::StreamExt;
use parking_lot::Mutex;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::oneshot;
use tokio_util::io::ReaderStream;

/// Shared state of the single download.
pub struct Download {
    content: Content,
    claimed: AtomicBool,
    done_tx: Mutex<Option<oneshot::Sender<()>>>,
}

impl Download {
    /// Returns the download and a receiver that fires once the body has
    /// been streamed completely.
    pub fn new(content: Content) -> (Arc<Self>, oneshot::Receiver<()>) {
        let (done_tx, done_rx) = oneshot::channel();
        let download = Arc::new(Self {
            content,
            claimed: AtomicBool::new(false),
            done_tx: Mutex::new(Some(done_tx)),
        });
        (download, done_rx)
    }

    fn try_claim(self: &Arc<Self>) -> Option<Claim> {
        self.claimed
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| Claim {
                download: self.clone(),
                expected: None,
                sent: 0,
                completed: false,
            })
    }
}

/// Exclusive right to serve the content.
///
/// The download counts as done once `expected` bytes went out or the body
/// reached its end. Dropped before that (client went away, HEAD request,
/// read error) it hands the right back so a later request can retry.
struct Claim {
    download: Arc<Download>,
    expected: Option<u64>,
    sent: u64,
    completed: bool,
}

impl Claim {
    fn record(&mut self, len: usize) {
        self.sent += len as u64;
    }

    fn fully_sent(&self) -> bool {
        self.completed || self.expected == Some(self.sent)
    }

    /// Body reached its end; the drop signals completion.
    fn complete(mut self) {
        self.completed = true;
    }
}

impl Drop for Claim {
    fn drop(&mut self) {
        let name = &self.download.content.name;
        if self.fully_sent() {
            tracing::debug!("Sent {} bytes of {}", self.sent, name);
            if let Some(tx) = self.download.done_tx.lock().take() {
                let _ = tx.send(());
            }
            return;
        }

        if self.sent > 0 {
            tracing::warn!("Download of {} interrupted after {} bytes", name, self.sent);
        } else {
            tracing::debug!("Request ended before any of {} was sent", name);
        }
        self.download.claimed.store(false, Ordering::SeqCst);
    }
}

pub fn router(download: Arc<Download>) -> Router {
    Router::new().fallback(handle_download).with_state(download)
}

async fn handle_download(
    State(download): State<Arc<Download>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    method: Method,
    uri: Uri,
) -> Response {
    tracing::debug!("{} {} from {}", method, uri, peer);

    let Some(mut claim) = download.try_claim() else {
        tracing::debug!("Rejecting {} from {}, content already served", uri, peer);
        return (StatusCode::GONE, "This file has already been downloaded\n").into_response();
    };

    let content = &download.content;
    let file = match tokio::fs::File::open(&content.path).await {
        Ok(file) => file,
        Err(e) => {
            tracing::error!("Failed to open {}: {}", content.path.display(), e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };
    let size = file.metadata().await.ok().map(|m| m.len());
    claim.expected = size;

    tracing::info!("Sending {} to {}", content.name, peer);

    // hyper stops polling once Content-Length bytes are out, so the claim
    // is settled by its byte count when the stream is dropped.
    let stream = async_stream::stream! {
        let mut claim = claim;
        let mut reader = ReaderStream::new(file);
        while let Some(chunk) = reader.next().await {
            match chunk {
                Ok(bytes) => {
                    claim.record(bytes.len());
                    yield Ok(bytes);
                }
                Err(e) => {
                    tracing::error!("Failed to read {}: {}", claim.download.content.path.display(), e);
                    yield Err(e);
                    return;
                }
            }
        }
        claim.complete();
    };

    (download_headers(content, size), Body::from_stream(stream)).into_response()
}

fn download_headers(content: &Content, size: Option<u64>) -> HeaderMap {
    let mut headers = HeaderMap::new();

    let disposition = HeaderValue::from_str(&format!("attachment; filename={}", content.name))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"));
    headers.insert(header::CONTENT_DISPOSITION, disposition);

    let mime = mime_guess::from_path(&content.name).first_or_octet_stream();
    if let Ok(value) = HeaderValue::from_str(mime.as_ref()) {
        headers.insert(header::CONTENT_TYPE, value);
    }

    if let Some(size) = size {
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(size));
    }

    headers
}
