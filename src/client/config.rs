//! Client configuration.
//!
//! A [`ClientConfig`] decides three things about cookies: which jar the
//! client uses (a private one, a shared one, or none), which timer drives
//! eviction if this client ends up starting it, and how often sweeps run.

use crate::jar::CookieJar;
use crate::timer::{Timer, TimerError, TokioTimer};
use std::sync::Arc;
use std::time::Duration;

/// Default interval between eviction sweeps.
pub const DEFAULT_EVICTION_INTERVAL: Duration = Duration::from_secs(30);

/// How a client obtains its cookie jar.
#[derive(Clone, Default)]
enum JarSetting {
    /// A private jar created for this client
    #[default]
    PerClient,
    /// A jar shared by reference with other clients
    Shared(Arc<CookieJar>),
    /// No cookie storage at all
    Disabled,
}

/// Configuration for a [`Client`](crate::client::Client).
///
/// By default every client gets its own private jar swept every
/// [`DEFAULT_EVICTION_INTERVAL`] on a timer bound to the current Tokio
/// runtime. Pass the same jar `Arc` to several configs to share one
/// store - and with it, one eviction task.
///
/// # Example
///
/// ```
/// use cookievault::{ClientConfig, CookieJar};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// let jar = Arc::new(CookieJar::new());
/// let config = ClientConfig::new()
///     .cookie_jar(Arc::clone(&jar))
///     .eviction_interval(Duration::from_secs(10));
/// # let _ = config;
/// ```
#[derive(Clone)]
pub struct ClientConfig {
    jar: JarSetting,
    timer: Option<Arc<dyn Timer>>,
    eviction_interval: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            jar: JarSetting::default(),
            timer: None,
            eviction_interval: DEFAULT_EVICTION_INTERVAL,
        }
    }
}

impl ClientConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `jar` for this client.
    ///
    /// Clients configured with the same `Arc` share the store and its
    /// single eviction task.
    pub fn cookie_jar(mut self, jar: Arc<CookieJar>) -> Self {
        self.jar = JarSetting::Shared(jar);
        self
    }

    /// Disables cookie storage entirely.
    ///
    /// The client then neither stores cookies nor participates in
    /// eviction scheduling.
    pub fn without_cookie_jar(mut self) -> Self {
        self.jar = JarSetting::Disabled;
        self
    }

    /// Uses `timer` for eviction scheduling.
    ///
    /// Only consulted when this client's attach is the one that starts
    /// the jar's eviction task; a jar that is already being swept keeps
    /// its incumbent timer.
    pub fn timer(mut self, timer: Arc<dyn Timer>) -> Self {
        self.timer = Some(timer);
        self
    }

    /// Sets the interval between eviction sweeps.
    pub fn eviction_interval(mut self, interval: Duration) -> Self {
        self.eviction_interval = interval;
        self
    }

    pub(crate) fn resolve_jar(&self) -> Option<Arc<CookieJar>> {
        match &self.jar {
            JarSetting::PerClient => Some(Arc::new(CookieJar::new())),
            JarSetting::Shared(jar) => Some(Arc::clone(jar)),
            JarSetting::Disabled => None,
        }
    }

    pub(crate) fn resolve_timer(&self) -> Result<Arc<dyn Timer>, TimerError> {
        match &self.timer {
            Some(timer) => Ok(Arc::clone(timer)),
            None => Ok(Arc::new(TokioTimer::new()?)),
        }
    }

    pub(crate) fn interval(&self) -> Duration {
        self.eviction_interval
    }
}
