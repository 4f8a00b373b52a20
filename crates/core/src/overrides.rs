//! Local override cache.
//!
//! An [`OverrideCache`] maps an entity id to the last value an admin applied
//! locally, so the customer-facing view reflects the change immediately
//! without waiting on the authoritative row. Entries never expire and are
//! never evicted.
//!
//! A file-backed cache hands a snapshot of the map to a background writer
//! task after every `set`/`clear`; the lock is never held across file I/O.
//! The writer runs snapshots in order, skips ones already superseded, and
//! writes each through a temp file + rename on the blocking pool.
//!
//! Reads never fail. Write failures are logged and otherwise ignored; the
//! in-memory value still takes effect.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::RwLock;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// How an override is reconciled with a freshly fetched authoritative value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergePolicy {
    /// Any stored override replaces the authoritative value.
    #[default]
    OverrideWins,
    /// The override applies only if it was set at or after the record's
    /// last update; otherwise the authoritative value is kept.
    NewerWins,
}

impl MergePolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OverrideWins => "override_wins",
            Self::NewerWins => "newer_wins",
        }
    }
}

impl fmt::Display for MergePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MergePolicy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "override_wins" => Ok(Self::OverrideWins),
            "newer_wins" => Ok(Self::NewerWins),
            other => Err(CoreError::Validation(format!(
                "Invalid merge policy '{other}'. Must be one of: override_wins, newer_wins"
            ))),
        }
    }
}

/// A stored override value and when it was set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverrideEntry<V> {
    pub value: V,
    pub set_at: Timestamp,
}

type Entries<V> = BTreeMap<DbId, OverrideEntry<V>>;

enum Persist<V> {
    Store(Entries<V>),
    Flush(oneshot::Sender<()>),
}

/// Id-keyed, last-write-wins override store.
#[derive(Debug)]
pub struct OverrideCache<V> {
    entries: RwLock<Entries<V>>,
    path: Option<PathBuf>,
    writer: Option<mpsc::UnboundedSender<Persist<V>>>,
}

impl<V> OverrideCache<V>
where
    V: Clone + Serialize + DeserializeOwned + Send + 'static,
{
    /// A cache that lives only as long as the process.
    pub fn in_memory() -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
            path: None,
            writer: None,
        }
    }

    /// Open a file-backed cache, loading any previously stored overrides.
    ///
    /// A missing file yields an empty cache; an unreadable or malformed file
    /// is an error. Must be called inside a Tokio runtime, which hosts the
    /// writer task.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CoreError> {
        let path = path.into();
        let entries = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                CoreError::Internal(format!(
                    "Corrupt override store {}: {e}",
                    path.display()
                ))
            })?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(CoreError::Internal(format!(
                    "Cannot read override store {}: {e}",
                    path.display()
                )))
            }
        };

        let runtime = tokio::runtime::Handle::try_current().map_err(|_| {
            CoreError::Internal("Override store must be opened inside a Tokio runtime".into())
        })?;
        let (tx, rx) = mpsc::unbounded_channel();
        runtime.spawn(run_writer(path.clone(), rx));

        Ok(Self {
            entries: RwLock::new(entries),
            path: Some(path),
            writer: Some(tx),
        })
    }

    /// Backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Store `value` for `id`, replacing any previous value.
    pub fn set(&self, id: DbId, value: V) {
        self.set_at(id, value, Utc::now());
    }

    /// Store `value` for `id` with an explicit timestamp.
    pub fn set_at(&self, id: DbId, value: V, set_at: Timestamp) {
        let mut entries = self.write_lock();
        entries.insert(id, OverrideEntry { value, set_at });
        self.enqueue(&entries);
    }

    /// Last stored value for `id`.
    pub fn get(&self, id: DbId) -> Option<V> {
        self.read_lock().get(&id).map(|e| e.value.clone())
    }

    /// Last stored value for `id` together with its timestamp.
    pub fn get_entry(&self, id: DbId) -> Option<OverrideEntry<V>> {
        self.read_lock().get(&id).cloned()
    }

    /// Remove the override for `id`. Returns `true` if one existed.
    pub fn clear(&self, id: DbId) -> bool {
        let mut entries = self.write_lock();
        let removed = entries.remove(&id).is_some();
        if removed {
            self.enqueue(&entries);
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.read_lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read_lock().is_empty()
    }

    /// Overlay the stored override for `id` on top of `authoritative`.
    ///
    /// `record_updated_at` is the authoritative row's last-modified time and
    /// is only consulted under [`MergePolicy::NewerWins`].
    pub fn merge(
        &self,
        id: DbId,
        authoritative: V,
        record_updated_at: Timestamp,
        policy: MergePolicy,
    ) -> V {
        match self.get_entry(id) {
            None => authoritative,
            Some(entry) => match policy {
                MergePolicy::OverrideWins => entry.value,
                MergePolicy::NewerWins if entry.set_at >= record_updated_at => entry.value,
                MergePolicy::NewerWins => authoritative,
            },
        }
    }

    /// Wait until every change made before this call has reached disk (or
    /// failed and been logged). Returns at once for an in-memory cache.
    pub async fn flush(&self) {
        let Some(writer) = &self.writer else {
            return;
        };
        let (done, wait) = oneshot::channel();
        if writer.send(Persist::Flush(done)).is_ok() {
            let _ = wait.await;
        }
    }

    fn read_lock(&self) -> std::sync::RwLockReadGuard<'_, Entries<V>> {
        self.entries.read().unwrap_or_else(|p| p.into_inner())
    }

    fn write_lock(&self) -> std::sync::RwLockWriteGuard<'_, Entries<V>> {
        self.entries.write().unwrap_or_else(|p| p.into_inner())
    }

    /// Queue a snapshot for the writer. Called with the write lock held so
    /// snapshots are queued in mutation order.
    fn enqueue(&self, entries: &Entries<V>) {
        let Some(writer) = &self.writer else {
            return;
        };
        if writer.send(Persist::Store(entries.clone())).is_err() {
            tracing::warn!("Override store writer has stopped; change kept in memory only");
        }
    }
}

/// Drain queued snapshots, writing only the newest of each batch.
async fn run_writer<V>(path: PathBuf, mut rx: mpsc::UnboundedReceiver<Persist<V>>)
where
    V: Serialize + Send + 'static,
{
    while let Some(first) = rx.recv().await {
        let mut latest = None;
        let mut waiters = Vec::new();
        let mut next = Some(first);
        while let Some(message) = next {
            match message {
                Persist::Store(entries) => latest = Some(entries),
                Persist::Flush(done) => waiters.push(done),
            }
            next = rx.try_recv().ok();
        }

        if let Some(entries) = latest {
            let target = path.clone();
            match tokio::task::spawn_blocking(move || write_atomic(&target, &entries)).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to persist override store");
                }
                Err(e) => {
                    tracing::error!(path = %path.display(), error = %e, "Override store write aborted");
                }
            }
        }

        for done in waiters {
            let _ = done.send(());
        }
    }
}

fn write_atomic<T: Serialize>(path: &Path, value: &T) -> io::Result<()> {
    let bytes = serde_json::to_vec_pretty(value).map_err(io::Error::other)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::Duration;

    use super::*;
    use crate::status::OrderStatus;

    #[test]
    fn missing_override_returns_none_and_keeps_authoritative() {
        let cache: OverrideCache<OrderStatus> = OverrideCache::in_memory();
        assert_eq!(cache.get(7), None);
        for policy in [MergePolicy::OverrideWins, MergePolicy::NewerWins] {
            let merged = cache.merge(7, OrderStatus::Editing, Utc::now(), policy);
            assert_eq!(merged, OrderStatus::Editing);
        }
    }

    #[test]
    fn override_always_wins_by_default() {
        let cache = OverrideCache::in_memory();
        let past = Utc::now() - Duration::hours(1);
        cache.set_at(7, OrderStatus::Delivered, past);

        for authoritative in OrderStatus::ALL {
            let merged = cache.merge(7, *authoritative, Utc::now(), MergePolicy::default());
            assert_eq!(merged, OrderStatus::Delivered);
        }
    }

    #[test]
    fn newer_wins_prefers_fresher_side() {
        let cache = OverrideCache::in_memory();
        let t0 = Utc::now();
        cache.set_at(1, OrderStatus::Shooting, t0);

        let older_row = t0 - Duration::minutes(5);
        let newer_row = t0 + Duration::minutes(5);

        assert_eq!(
            cache.merge(1, OrderStatus::Scheduled, older_row, MergePolicy::NewerWins),
            OrderStatus::Shooting
        );
        assert_eq!(
            cache.merge(1, OrderStatus::Editing, newer_row, MergePolicy::NewerWins),
            OrderStatus::Editing
        );
    }

    #[test]
    fn set_is_idempotent_and_last_write_wins() {
        let cache = OverrideCache::in_memory();
        cache.set(3, OrderStatus::Editing);
        cache.set(3, OrderStatus::Editing);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(3), Some(OrderStatus::Editing));

        cache.set(3, OrderStatus::Delivered);
        assert_eq!(cache.get(3), Some(OrderStatus::Delivered));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn clear_removes_entry() {
        let cache = OverrideCache::in_memory();
        cache.set(3, OrderStatus::Editing);
        assert!(cache.clear(3));
        assert!(!cache.clear(3));
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn reopen_restores_previous_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("status.json");

        {
            let cache = OverrideCache::open(&path).unwrap();
            cache.set(10, OrderStatus::Scheduled);
            cache.set(11, OrderStatus::Cancelled);
            cache.set(10, OrderStatus::Shooting);
            cache.flush().await;
        }

        let reopened: OverrideCache<OrderStatus> = OverrideCache::open(&path).unwrap();
        assert_eq!(reopened.get(10), Some(OrderStatus::Shooting));
        assert_eq!(reopened.get(11), Some(OrderStatus::Cancelled));
        assert_eq!(reopened.get(12), None);
    }

    #[tokio::test]
    async fn reopen_preserves_timestamps() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("payment.json");
        let at = Utc::now() - Duration::days(3);

        let cache = OverrideCache::open(&path).unwrap();
        cache.set_at(5, "paid".to_string(), at);
        cache.flush().await;

        let reopened: OverrideCache<String> = OverrideCache::open(&path).unwrap();
        assert_eq!(reopened.get_entry(5).map(|e| e.set_at), Some(at));
    }

    #[tokio::test]
    async fn missing_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let cache: OverrideCache<OrderStatus> =
            OverrideCache::open(dir.path().join("absent.json")).unwrap();
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, b"{not json").unwrap();
        let result: Result<OverrideCache<OrderStatus>, _> = OverrideCache::open(&path);
        assert_matches!(result, Err(CoreError::Internal(_)));
    }

    #[tokio::test]
    async fn clear_is_persisted_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("status.json");

        let cache = OverrideCache::open(&path).unwrap();
        for round in 0..50 {
            cache.set(1, OrderStatus::Editing);
            cache.set(2, OrderStatus::Delivered);
            if round % 2 == 1 {
                cache.clear(1);
            }
        }
        cache.flush().await;

        let reopened: OverrideCache<OrderStatus> = OverrideCache::open(&path).unwrap();
        assert_eq!(reopened.get(1), None);
        assert_eq!(reopened.get(2), Some(OrderStatus::Delivered));
    }

    #[tokio::test]
    async fn reads_do_not_wait_for_disk() {
        let dir = tempfile::tempdir().unwrap();
        let cache = OverrideCache::open(dir.path().join("status.json")).unwrap();

        cache.set(3, OrderStatus::Shooting);
        // Visible before the writer has run.
        assert_eq!(cache.get(3), Some(OrderStatus::Shooting));
        cache.flush().await;
        assert!(dir.path().join("status.json").exists());
    }

    #[test]
    fn open_outside_a_runtime_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result: Result<OverrideCache<OrderStatus>, _> =
            OverrideCache::open(dir.path().join("status.json"));
        assert_matches!(result, Err(CoreError::Internal(_)));
    }

    #[tokio::test]
    async fn flush_on_in_memory_cache_returns() {
        let cache = OverrideCache::in_memory();
        cache.set(1, OrderStatus::Pending);
        cache.flush().await;
        assert_eq!(cache.get(1), Some(OrderStatus::Pending));
    }

    #[test]
    fn merge_policy_parses() {
        assert_eq!("newer_wins".parse::<MergePolicy>().unwrap(), MergePolicy::NewerWins);
        assert!("latest".parse::<MergePolicy>().is_err());
        assert_eq!(MergePolicy::default().to_string(), "override_wins");
    }
}
