use crate::config::{ConfigStore, Configuration};
use crate::content::Content;
use crate::error::SessionError;
use crate::net::NetworkAddress;
use crate::server::handler::{Download, router};
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Lifecycle of a [`TransferSession`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// Address resolved, nothing bound yet
    Idle,
    /// Listener bound to an ephemeral port
    Bound,
    /// Waiting for the download to complete
    Serving,
    /// The content was downloaded once
    Completed,
    /// The server stopped with an error
    Failed,
}

/// Serves one piece of content, once, on an ephemeral port.
pub struct TransferSession {
    address: NetworkAddress,
    listener: Option<TcpListener>,
    local_addr: Option<SocketAddr>,
    state: SessionState,
}

impl TransferSession {
    pub fn new(address: NetworkAddress) -> Self {
        Self {
            address,
            listener: None,
            local_addr: None,
            state: SessionState::Idle,
        }
    }

    /// Bind a listener on the resolved address with an OS-assigned port.
    pub async fn bind(&mut self) -> Result<SocketAddr, SessionError> {
        if self.state != SessionState::Idle {
            return Err(SessionError::invalid_state("Session is already bound"));
        }

        let requested = self.address.ephemeral();
        let bind_error = |source: std::io::Error| SessionError::BindFailed {
            address: requested,
            source,
        };
        let listener = TcpListener::bind(requested).await.map_err(bind_error)?;
        let local_addr = listener.local_addr().map_err(bind_error)?;

        tracing::debug!("Listening on {} via {}", local_addr, self.address.interface);
        self.listener = Some(listener);
        self.local_addr = Some(local_addr);
        self.state = SessionState::Bound;
        Ok(local_addr)
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn address(&self) -> &NetworkAddress {
        &self.address
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }

    /// Download URL, available once bound.
    pub fn url(&self) -> Option<String> {
        self.local_addr.map(|addr| format!("http://{}/", addr))
    }

    /// Show the URL through `present`, then serve `content` until one
    /// client has received it completely.
    ///
    /// Every path is answered with the content. Requests arriving while a
    /// download is in flight, or after it finished, get `410 Gone`.
    pub async fn serve<F>(&mut self, content: &Content, present: F) -> Result<(), SessionError>
    where
        F: FnOnce(&str),
    {
        let (Some(listener), Some(url)) = (self.listener.take(), self.url()) else {
            return Err(SessionError::invalid_state("Session must be bound before serving"));
        };

        present(&url);

        let (download, done_rx) = Download::new(content.clone());
        let app = router(download).into_make_service_with_connect_info::<SocketAddr>();

        self.state = SessionState::Serving;
        tracing::info!("Waiting for a download on {}", url);

        let result = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = done_rx.await;
                tracing::debug!("Download complete, shutting down");
            })
            .await;

        match result {
            Ok(()) => {
                self.state = SessionState::Completed;
                Ok(())
            }
            Err(source) => {
                self.state = SessionState::Failed;
                tracing::error!("Server error: {}", source);
                Err(SessionError::Serve { source })
            }
        }
    }

    /// Clean up after a completed download.
    ///
    /// Removes temporary content and saves the configuration. Both failures
    /// are reported as warnings since the transfer itself succeeded.
    pub fn finish(
        &self,
        content: &Content,
        config: &Configuration,
        store: &ConfigStore,
    ) -> Result<(), SessionError> {
        if self.state != SessionState::Completed {
            return Err(SessionError::invalid_state(format!(
                "Cannot finish a session in state {:?}",
                self.state
            )));
        }

        if content.should_be_deleted {
            match content.delete() {
                Ok(()) => tracing::debug!("Removed {}", content.path.display()),
                Err(e) => tracing::warn!(
                    "Unable to delete the content from disk {}: {}",
                    content.path.display(),
                    e
                ),
            }
        }

        if let Err(e) = store.update(config) {
            tracing::warn!("Unable to update configuration: {}", e);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loopback() -> NetworkAddress {
        NetworkAddress::new("lo", "127.0.0.1".parse().unwrap())
    }

    #[tokio::test]
    async fn test_bind_assigns_ephemeral_port() {
        let mut session = TransferSession::new(loopback());
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.url(), None);

        let addr = session.bind().await.unwrap();

        assert_ne!(addr.port(), 0);
        assert_eq!(session.state(), SessionState::Bound);
        assert_eq!(session.url(), Some(format!("http://127.0.0.1:{}/", addr.port())));
    }

    #[tokio::test]
    async fn test_bind_twice_is_rejected() {
        let mut session = TransferSession::new(loopback());
        session.bind().await.unwrap();
        assert!(matches!(
            session.bind().await,
            Err(SessionError::InvalidState { .. })
        ));
    }

    #[tokio::test]
    async fn test_bind_unavailable_address() {
        // TEST-NET-1 is never assigned to a local interface
        let mut session =
            TransferSession::new(NetworkAddress::new("gone0", "192.0.2.1".parse().unwrap()));
        let result = session.bind().await;

        assert!(matches!(result, Err(SessionError::BindFailed { .. })));
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[tokio::test]
    async fn test_serve_requires_bind() {
        let mut session = TransferSession::new(loopback());
        let content = Content::existing("/tmp/unused.txt");

        let result = session.serve(&content, |_| {}).await;
        assert!(matches!(result, Err(SessionError::InvalidState { .. })));
    }

    #[test]
    fn test_finish_requires_completion() {
        let session = TransferSession::new(loopback());
        let dir = tempfile::tempdir().expect("tempdir");
        let store = ConfigStore::at(dir.path().join("config.json"));

        let result = session.finish(
            &Content::existing("/tmp/unused.txt"),
            &Configuration::default(),
            &store,
        );
        assert!(result.is_err());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_ipv6_url_is_bracketed() {
        let mut session = TransferSession::new(loopback());
        session.local_addr = Some("[2001:db8::1]:4000".parse().unwrap());
        assert_eq!(session.url().as_deref(), Some("http://[2001:db8::1]:4000/"));
    }
}
