//! The fetch collaborator: one synchronous GET per run.
//!
//! The pipeline core needs only a textual body and a status signal, so the
//! collaborator is a trait; orchestrators take `&dyn Fetch` and tests
//! substitute a fixture body for the network (see
//! [`testing::StaticFetch`](crate::testing::StaticFetch)).

use std::time::Duration;

use crate::error::{EtlError, Result};

/// Default wall-clock timeout for the single fetch of a run.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("rowforge/", env!("CARGO_PKG_VERSION"));

/// Source of one textual body per run.
pub trait Fetch {
    /// Fetch the body at `url`.
    ///
    /// # Errors
    /// [`EtlError::Fetch`] on network failure, timeout, or a non-2xx status.
    fn get(&self, url: &str) -> Result<String>;
}

/// Blocking HTTP implementation with a fixed timeout. There is no retry:
/// a failed fetch fails the run.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    /// Build a client with the given wall-clock timeout.
    ///
    /// # Errors
    /// [`EtlError::Fetch`] when the underlying client cannot be constructed.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }

    /// Client with [`DEFAULT_TIMEOUT`].
    ///
    /// # Errors
    /// See [`HttpFetcher::new`].
    pub fn default_client() -> Result<Self> {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl Fetch for HttpFetcher {
    fn get(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(EtlError::Fetch(format!("{url}: status {status}")));
        }
        Ok(response.text()?)
    }
}
