//! Client construction and shutdown.
//!
//! A [`Client`] is the caller-facing lifecycle around the cookie
//! machinery: construction attaches to the configured jar through the
//! global [`EvictionRegistry`], and closing (or dropping) the client
//! detaches again. The attachment handle lives inside the client, so
//! release happens on every exit path - explicit close, drop, or a
//! constructor that fails partway.

use crate::client::ClientConfig;
use crate::eviction::{Attachment, EvictionError, EvictionRegistry};
use crate::jar::CookieJar;
use std::sync::Arc;
use tracing::info;

/// A client instance participating in shared cookie eviction.
///
/// # Example
///
/// ```
/// use cookievault::{Client, ClientConfig, CookieJar};
/// use std::sync::Arc;
///
/// # tokio_test::block_on(async {
/// let jar = Arc::new(CookieJar::new());
///
/// // Both clients share the jar; only the first attach starts a sweep.
/// let first = Client::new(ClientConfig::new().cookie_jar(Arc::clone(&jar))).unwrap();
/// let second = Client::new(ClientConfig::new().cookie_jar(Arc::clone(&jar))).unwrap();
///
/// second.close().unwrap();
/// first.close().unwrap(); // last one out stops the sweep
/// # });
/// ```
#[derive(Debug)]
pub struct Client {
    jar: Option<Arc<CookieJar>>,
    attachment: Option<Attachment>,
}

impl Client {
    /// Creates a client from `config`.
    ///
    /// When a jar is configured this attaches to it, starting the jar's
    /// eviction task if this client is its first. Fails if the timer
    /// refuses the eviction task (for the default timer: when called
    /// outside a Tokio runtime); nothing stays attached on failure.
    pub fn new(config: ClientConfig) -> Result<Self, EvictionError> {
        let jar = config.resolve_jar();

        let attachment = match &jar {
            Some(jar) => {
                let timer = config.resolve_timer()?;
                let attachment =
                    EvictionRegistry::global().attach(jar, &timer, config.interval())?;
                info!("client attached to cookie jar");
                Some(attachment)
            }
            None => None,
        };

        Ok(Self { jar, attachment })
    }

    /// The jar this client stores cookies in, if cookies are enabled.
    pub fn cookie_jar(&self) -> Option<&Arc<CookieJar>> {
        self.jar.as_ref()
    }

    /// Closes the client, detaching from its jar.
    ///
    /// The last client of a jar stops the jar's eviction task. Dropping
    /// the client without calling `close` detaches as well; `close` only
    /// exists to surface bookkeeping errors instead of logging them.
    pub fn close(mut self) -> Result<(), EvictionError> {
        match self.attachment.take() {
            Some(attachment) => attachment.detach(),
            None => Ok(()),
        }
    }
}
