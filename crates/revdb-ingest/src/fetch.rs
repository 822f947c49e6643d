//! Page-fetching sessions.
//!
//! A [`PageFetcher`] hands out sessions; a session is the expensive resource
//! (browser driver, HTTP client with its own connection pool). Extractors hold
//! a session only through [`SessionGuard`], which releases it when dropped, so
//! normal return, `?` early exit, timeout and cancellation all release.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rand::seq::IndexedRandom;
use reqwest::Client;
use tokio_util::sync::CancellationToken;

use crate::error::FetchError;

const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:109.0) Gecko/20100101 Firefox/121.0",
];

#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Acquire a fresh session. Sessions are never shared between calls.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] if the session cannot be started.
    async fn open_session(&self) -> Result<Box<dyn PageSession>, FetchError>;
}

#[async_trait]
pub trait PageSession: Send {
    /// Load `url` and return the page body.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] on transport failure or a non-success status.
    async fn fetch(&mut self, url: &str) -> Result<String, FetchError>;

    /// Tear the session down. Must be idempotent and must not block.
    fn release(&mut self);
}

/// Scoped ownership of one [`PageSession`]; releases it on drop.
pub struct SessionGuard {
    session: Box<dyn PageSession>,
}

impl SessionGuard {
    /// Open a session from `fetcher`.
    ///
    /// # Errors
    ///
    /// Propagates the fetcher's error; nothing is held on failure.
    pub async fn acquire(fetcher: &dyn PageFetcher) -> Result<Self, FetchError> {
        let session = fetcher.open_session().await?;
        Ok(Self { session })
    }

    /// Fetch `url`, giving up as soon as `cancel` fires.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Cancelled`] on cancellation, otherwise the
    /// session's own error.
    pub async fn fetch(
        &mut self,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<String, FetchError> {
        tokio::select! {
            () = cancel.cancelled() => Err(FetchError::Cancelled),
            result = self.session.fetch(url) => result,
        }
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.session.release();
    }
}

/// HTTP-backed fetcher. Every session is its own `reqwest::Client` with a
/// user agent drawn from a small browser pool.
#[derive(Debug, Clone)]
pub struct HttpPageFetcher {
    timeout: Duration,
    live_sessions: Arc<AtomicUsize>,
}

impl HttpPageFetcher {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            live_sessions: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Sessions opened and not yet released.
    #[must_use]
    pub fn live_sessions(&self) -> usize {
        self.live_sessions.load(Ordering::SeqCst)
    }
}

fn pick_user_agent() -> &'static str {
    USER_AGENTS
        .choose(&mut rand::rng())
        .copied()
        .unwrap_or(USER_AGENTS[0])
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn open_session(&self) -> Result<Box<dyn PageSession>, FetchError> {
        let client = Client::builder()
            .timeout(self.timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(pick_user_agent())
            .build()?;
        self.live_sessions.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(HttpSession {
            client: Some(client),
            live_sessions: Arc::clone(&self.live_sessions),
        }))
    }
}

struct HttpSession {
    client: Option<Client>,
    live_sessions: Arc<AtomicUsize>,
}

#[async_trait]
impl PageSession for HttpSession {
    async fn fetch(&mut self, url: &str) -> Result<String, FetchError> {
        let client = self.client.as_ref().ok_or(FetchError::SessionReleased)?;
        let response = client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.text().await?)
    }

    fn release(&mut self) {
        if self.client.take().is_some() {
            self.live_sessions.fetch_sub(1, Ordering::SeqCst);
            tracing::debug!("page session released");
        }
    }
}

impl Drop for HttpSession {
    fn drop(&mut self) {
        self.release();
    }
}
