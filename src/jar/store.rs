//! Thread-Safe Cookie Storage with Expiry Support
//!
//! This module implements the shared cookie store for CookieVault.
//! It provides a thread-safe, concurrent map of cookie name to cookie
//! with TTL (Time-To-Live) support.
//!
//! ## Design Decisions
//!
//! 1. **Sharded Locks**: Instead of one big lock, we use multiple shards to reduce contention.
//! 2. **Lazy Expiry**: Cookies are checked for expiry on access (lazy) plus background sweeps.
//! 3. **Arc<RwLock>**: Allows multiple concurrent readers with exclusive writers.
//!
//! ## Concurrency Model
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       CookieJar                             │
//! │  ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐           │
//! │  │ Shard 0 │ │ Shard 1 │ │ Shard 2 │ │ Shard N │           │
//! │  │ RwLock  │ │ RwLock  │ │ RwLock  │ │ RwLock  │           │
//! │  │ HashMap │ │ HashMap │ │ HashMap │ │ HashMap │           │
//! │  └─────────┘ └─────────┘ └─────────┘ └─────────┘           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Cookie names are distributed across shards using a hash function,
//! so a background sweep only ever holds one shard's write lock at a
//! time and never blocks unrelated inserts for the whole pass.

use crate::jar::Cookie;
use bytes::Bytes;
use std::collections::HashMap;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::{Duration, Instant};

/// Number of shards for the cookie store.
/// Cookie jars stay small compared to a general-purpose cache,
/// so 16 shards keep contention low without wasting memory.
const NUM_SHARDS: usize = 16;

/// A single shard containing a portion of the stored cookies.
#[derive(Debug)]
struct Shard {
    cookies: RwLock<HashMap<Bytes, Cookie>>,
}

impl Shard {
    fn new() -> Self {
        Self {
            cookies: RwLock::new(HashMap::new()),
        }
    }
}

/// The shared cookie store.
///
/// A jar holds expirable key-value entries and is designed to be wrapped
/// in an `Arc` and shared by any number of client instances. All
/// operations are thread-safe. The jar itself never schedules its own
/// eviction; that is the job of the
/// [`EvictionRegistry`](crate::eviction::EvictionRegistry), which arbitrates
/// a single periodic sweep per jar instance no matter how many clients
/// share it.
///
/// # Example
///
/// ```
/// use cookievault::CookieJar;
/// use bytes::Bytes;
/// use std::time::Duration;
///
/// let jar = CookieJar::new();
///
/// jar.insert(Bytes::from("sid"), Bytes::from("abc123"), Duration::from_secs(3600));
/// assert_eq!(jar.get(&Bytes::from("sid")), Some(Bytes::from("abc123")));
/// ```
pub struct CookieJar {
    /// Sharded storage for reduced lock contention
    shards: Vec<Shard>,

    /// Statistics: number of live cookies (approximate)
    cookie_count: AtomicU64,

    /// Statistics: total insert operations
    insert_count: AtomicU64,

    /// Statistics: total remove operations
    remove_count: AtomicU64,

    /// Statistics: number of expired cookies evicted
    expired_count: AtomicU64,

    /// Statistics: number of sweep passes run
    sweep_count: AtomicU64,
}

impl std::fmt::Debug for CookieJar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CookieJar")
            .field("shards", &self.shards.len())
            .field("cookie_count", &self.cookie_count.load(Ordering::Relaxed))
            .field("expired_count", &self.expired_count.load(Ordering::Relaxed))
            .finish()
    }
}

impl Default for CookieJar {
    fn default() -> Self {
        Self::new()
    }
}

impl CookieJar {
    /// Creates a new, empty cookie jar.
    pub fn new() -> Self {
        let shards = (0..NUM_SHARDS).map(|_| Shard::new()).collect();

        Self {
            shards,
            cookie_count: AtomicU64::new(0),
            insert_count: AtomicU64::new(0),
            remove_count: AtomicU64::new(0),
            expired_count: AtomicU64::new(0),
            sweep_count: AtomicU64::new(0),
        }
    }

    /// Determines which shard a cookie name belongs to.
    #[inline]
    fn shard_index(&self, name: &[u8]) -> usize {
        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        (hasher.finish() as usize) % NUM_SHARDS
    }

    /// Gets the shard for a given cookie name.
    #[inline]
    fn get_shard(&self, name: &[u8]) -> &Shard {
        &self.shards[self.shard_index(name)]
    }

    fn store(&self, name: Bytes, cookie: Cookie) {
        self.insert_count.fetch_add(1, Ordering::Relaxed);

        let shard = self.get_shard(&name);
        let mut cookies = shard.cookies.write().unwrap();

        if cookies.insert(name, cookie).is_none() {
            self.cookie_count.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Inserts a cookie that expires after `ttl`.
    ///
    /// An existing cookie under the same name is overwritten.
    pub fn insert(&self, name: Bytes, value: Bytes, ttl: Duration) {
        self.store(name, Cookie::with_ttl(value, ttl));
    }

    /// Inserts a session cookie without expiry.
    ///
    /// Session cookies are never removed by a sweep; they live until
    /// explicitly removed or overwritten.
    pub fn insert_persistent(&self, name: Bytes, value: Bytes) {
        self.store(name, Cookie::session(value));
    }

    /// Gets the value of a cookie.
    ///
    /// Returns `None` if the cookie doesn't exist or has expired.
    /// This implements "lazy expiry" - an expired cookie is detected and
    /// removed on access, even between background sweeps.
    pub fn get(&self, name: &Bytes) -> Option<Bytes> {
        let shard = self.get_shard(name);

        // First, try a read lock (fast path for live cookies)
        {
            let cookies = shard.cookies.read().unwrap();
            if let Some(cookie) = cookies.get(name) {
                if !cookie.is_expired_at(Instant::now()) {
                    return Some(cookie.value.clone());
                }
            } else {
                return None;
            }
        }

        // Cookie exists but is expired - need a write lock to remove it
        let mut cookies = shard.cookies.write().unwrap();
        if let Some(cookie) = cookies.get(name) {
            if cookie.is_expired_at(Instant::now()) {
                cookies.remove(name);
                self.cookie_count.fetch_sub(1, Ordering::Relaxed);
                self.expired_count.fetch_add(1, Ordering::Relaxed);
                return None;
            }
            // Race: another thread may have replaced the cookie
            return Some(cookie.value.clone());
        }

        None
    }

    /// Removes a cookie by name.
    ///
    /// # Returns
    ///
    /// Returns `true` if the cookie was removed, `false` if it didn't exist.
    pub fn remove(&self, name: &Bytes) -> bool {
        self.remove_count.fetch_add(1, Ordering::Relaxed);

        let shard = self.get_shard(name);
        let mut cookies = shard.cookies.write().unwrap();

        if cookies.remove(name).is_some() {
            self.cookie_count.fetch_sub(1, Ordering::Relaxed);
            true
        } else {
            false
        }
    }

    /// Removes every cookie whose expiry has passed as of `now`.
    ///
    /// This is the operation driven periodically by the background
    /// eviction task. A second sweep at the same instant removes nothing.
    /// Cookies inserted concurrently with a fresh expiry are never lost:
    /// each shard is drained under its own write lock, so an insert either
    /// lands before the shard's pass (and survives, being unexpired) or
    /// after it (and is untouched).
    ///
    /// # Returns
    ///
    /// Returns the number of cookies that were removed.
    pub fn sweep(&self, now: Instant) -> u64 {
        self.sweep_count.fetch_add(1, Ordering::Relaxed);

        let mut swept = 0u64;

        for shard in &self.shards {
            let mut cookies = shard.cookies.write().unwrap();
            let before = cookies.len();

            cookies.retain(|_, cookie| !cookie.is_expired_at(now));

            swept += (before - cookies.len()) as u64;
        }

        if swept > 0 {
            self.cookie_count.fetch_sub(swept, Ordering::Relaxed);
            self.expired_count.fetch_add(swept, Ordering::Relaxed);
        }

        swept
    }

    /// Returns the approximate number of live cookies.
    ///
    /// This is an approximation because it uses relaxed atomic ordering.
    /// It counts stored entries, not attached clients; client attachment
    /// is tracked separately by the eviction registry.
    pub fn len(&self) -> u64 {
        self.cookie_count.load(Ordering::Relaxed)
    }

    /// Returns true if the jar holds no cookies.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes all cookies.
    pub fn clear(&self) {
        for shard in &self.shards {
            let mut cookies = shard.cookies.write().unwrap();
            cookies.clear();
        }
        self.cookie_count.store(0, Ordering::Relaxed);
    }

    /// Returns jar statistics.
    pub fn stats(&self) -> JarStats {
        JarStats {
            cookies: self.cookie_count.load(Ordering::Relaxed),
            inserts: self.insert_count.load(Ordering::Relaxed),
            removes: self.remove_count.load(Ordering::Relaxed),
            expired: self.expired_count.load(Ordering::Relaxed),
            sweeps: self.sweep_count.load(Ordering::Relaxed),
        }
    }
}

/// Cookie jar statistics.
#[derive(Debug, Clone, Copy)]
pub struct JarStats {
    /// Number of cookies currently stored
    pub cookies: u64,
    /// Total insert operations
    pub inserts: u64,
    /// Total remove operations
    pub removes: u64,
    /// Total expired cookies evicted (lazy or swept)
    pub expired: u64,
    /// Total sweep passes run
    pub sweeps: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let jar = CookieJar::new();

        jar.insert(
            Bytes::from("sid"),
            Bytes::from("abc"),
            Duration::from_secs(60),
        );
        assert_eq!(jar.get(&Bytes::from("sid")), Some(Bytes::from("abc")));
    }

    #[test]
    fn test_get_nonexistent() {
        let jar = CookieJar::new();
        assert_eq!(jar.get(&Bytes::from("nope")), None);
    }

    #[test]
    fn test_overwrite_keeps_count() {
        let jar = CookieJar::new();

        jar.insert(Bytes::from("k"), Bytes::from("v1"), Duration::from_secs(60));
        jar.insert(Bytes::from("k"), Bytes::from("v2"), Duration::from_secs(60));

        assert_eq!(jar.len(), 1);
        assert_eq!(jar.get(&Bytes::from("k")), Some(Bytes::from("v2")));
    }

    #[test]
    fn test_remove() {
        let jar = CookieJar::new();

        jar.insert(Bytes::from("k"), Bytes::from("v"), Duration::from_secs(60));
        assert!(jar.remove(&Bytes::from("k")));
        assert_eq!(jar.get(&Bytes::from("k")), None);
        assert!(!jar.remove(&Bytes::from("k"))); // Already removed
    }

    #[test]
    fn test_lazy_expiry_on_get() {
        let jar = CookieJar::new();

        jar.insert(
            Bytes::from("short"),
            Bytes::from("v"),
            Duration::from_millis(20),
        );
        assert!(jar.get(&Bytes::from("short")).is_some());

        std::thread::sleep(Duration::from_millis(50));

        assert_eq!(jar.get(&Bytes::from("short")), None);
        assert_eq!(jar.len(), 0);
    }

    #[test]
    fn test_sweep_removes_only_expired() {
        let jar = CookieJar::new();

        jar.insert(
            Bytes::from("old"),
            Bytes::from("v"),
            Duration::from_millis(10),
        );
        jar.insert(
            Bytes::from("fresh"),
            Bytes::from("v"),
            Duration::from_secs(300),
        );
        jar.insert_persistent(Bytes::from("session"), Bytes::from("v"));

        let swept = jar.sweep(Instant::now() + Duration::from_secs(1));
        assert_eq!(swept, 1);
        assert_eq!(jar.len(), 2);
        assert!(jar.get(&Bytes::from("fresh")).is_some());
        assert!(jar.get(&Bytes::from("session")).is_some());
    }

    #[test]
    fn test_sweep_is_idempotent() {
        let jar = CookieJar::new();

        jar.insert(Bytes::from("a"), Bytes::from("v"), Duration::from_millis(10));
        jar.insert(Bytes::from("b"), Bytes::from("v"), Duration::from_millis(10));

        let now = Instant::now() + Duration::from_secs(1);
        assert_eq!(jar.sweep(now), 2);
        assert_eq!(jar.sweep(now), 0);
        assert!(jar.is_empty());
    }

    #[test]
    fn test_sweep_spares_everything_before_expiry() {
        let jar = CookieJar::new();

        jar.insert(Bytes::from("k"), Bytes::from("v"), Duration::from_secs(600));
        assert_eq!(jar.sweep(Instant::now()), 0);
        assert_eq!(jar.len(), 1);
    }

    #[test]
    fn test_session_cookie_survives_sweep() {
        let jar = CookieJar::new();

        jar.insert_persistent(Bytes::from("sid"), Bytes::from("v"));

        let far_future = Instant::now() + Duration::from_secs(86_400);
        assert_eq!(jar.sweep(far_future), 0);
        assert_eq!(jar.get(&Bytes::from("sid")), Some(Bytes::from("v")));
    }

    #[test]
    fn test_clear() {
        let jar = CookieJar::new();

        jar.insert(Bytes::from("a"), Bytes::from("1"), Duration::from_secs(60));
        jar.insert(Bytes::from("b"), Bytes::from("2"), Duration::from_secs(60));
        assert_eq!(jar.len(), 2);

        jar.clear();
        assert!(jar.is_empty());
    }

    #[test]
    fn test_stats() {
        let jar = CookieJar::new();

        jar.insert(Bytes::from("a"), Bytes::from("1"), Duration::from_millis(5));
        jar.insert(Bytes::from("b"), Bytes::from("2"), Duration::from_secs(60));
        jar.remove(&Bytes::from("b"));
        jar.sweep(Instant::now() + Duration::from_secs(1));

        let stats = jar.stats();
        assert_eq!(stats.inserts, 2);
        assert_eq!(stats.removes, 1);
        assert_eq!(stats.expired, 1);
        assert_eq!(stats.sweeps, 1);
        assert_eq!(stats.cookies, 0);
    }

    #[test]
    fn test_concurrent_insert_and_sweep() {
        use std::sync::Arc;
        use std::thread;

        let jar = Arc::new(CookieJar::new());
        let mut handles = vec![];

        // Writers inserting fresh cookies while a sweeper runs
        for i in 0..8 {
            let jar = Arc::clone(&jar);
            handles.push(thread::spawn(move || {
                for j in 0..200 {
                    let name = format!("cookie-{}-{}", i, j);
                    jar.insert(
                        Bytes::from(name),
                        Bytes::from("value"),
                        Duration::from_secs(3600),
                    );
                }
            }));
        }

        let sweeper_jar = Arc::clone(&jar);
        let sweeper = thread::spawn(move || {
            for _ in 0..50 {
                sweeper_jar.sweep(Instant::now());
            }
        });

        for handle in handles {
            handle.join().unwrap();
        }
        sweeper.join().unwrap();

        // Nothing was expired, so no fresh insert may have been lost
        assert_eq!(jar.len(), 1600);
    }
}
