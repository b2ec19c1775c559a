#![allow(dead_code)]

use qr_filetransfer::{ConfigStore, Content, NetworkAddress, TransferSession};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

pub fn setup_temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp directory")
}

pub fn write_file(dir: &Path, name: &str, body: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, body).expect("write fixture");
    path
}

pub fn loopback() -> NetworkAddress {
    NetworkAddress::new("lo", "127.0.0.1".parse().unwrap())
}

pub fn temp_store(dir: &Path) -> ConfigStore {
    ConfigStore::at(dir.join("config").join("config.json"))
}

pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(30))
        .build()
        .expect("client")
}

/// Upper bound on how long a session may keep serving after the client
/// has received the whole body.
pub const SERVE_TIMEOUT: Duration = Duration::from_secs(30);

/// Bind on loopback and serve `content` in the background.
///
/// Returns the URL handed to the presenter and a handle yielding the
/// finished session.
pub async fn spawn_session(
    content: Content,
) -> (String, JoinHandle<(TransferSession, Content)>) {
    let mut session = TransferSession::new(loopback());
    session.bind().await.expect("bind loopback");
    let bound_url = session.url().expect("bound session has a url");

    let (url_tx, url_rx) = oneshot::channel();
    let handle = tokio::spawn(async move {
        session
            .serve(&content, move |url| {
                let _ = url_tx.send(url.to_string());
            })
            .await
            .expect("serve should complete");
        (session, content)
    });

    let presented = tokio::time::timeout(Duration::from_secs(5), url_rx)
        .await
        .expect("url was not presented")
        .expect("serve dropped the presenter");
    assert_eq!(presented, bound_url);

    (presented, handle)
}

/// Wait for a session spawned by [`spawn_session`], failing instead of
/// hanging when it never completes.
pub async fn finished(
    handle: JoinHandle<(TransferSession, Content)>,
) -> (TransferSession, Content) {
    tokio::time::timeout(SERVE_TIMEOUT, handle)
        .await
        .expect("session kept serving after the download")
        .expect("serve task panicked")
}
