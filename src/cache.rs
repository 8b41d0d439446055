//! Least-frequently-used caches.
//!
//! [`LfuCache`] is a bounded map with at most one in-flight computation per
//! key: a caller asking for a key that another thread is computing blocks
//! until that computation finishes, then reads its result. If it failed, the
//! waiting caller computes the value itself.
//!
//! [`AudioCache`] puts synthesized audio files behind an `LfuCache` and
//! deletes evicted files on a background worker thread.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::hash::Hash;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::error::Result;
use crate::normalize::TranscriptionOptions;
use crate::voices::{TtsOptions, TtsOutput};

// ─────────────────────────────────────────────────────────────────────────────
// LfuCache
// ─────────────────────────────────────────────────────────────────────────────

type EvictionListener<K, V> = Box<dyn Fn(K, V) + Send + Sync>;

struct Entry<V> {
    value: V,
    hits: u64,
    /// Insertion order, breaks ties between equally used entries.
    seq: u64,
}

struct State<K, V> {
    entries: HashMap<K, Entry<V>>,
    /// Keys currently being computed.
    pending: HashSet<K>,
    next_seq: u64,
}

/// Bounded cache evicting the least frequently used entry.
///
/// A `max_size` of 0 means unbounded.
pub struct LfuCache<K, V> {
    max_size: usize,
    state: Mutex<State<K, V>>,
    ready: Condvar,
    on_evict: Option<EvictionListener<K, V>>,
}

impl<K, V> LfuCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(max_size: usize) -> Self {
        Self {
            max_size,
            state: Mutex::new(State {
                entries: HashMap::new(),
                pending: HashSet::new(),
                next_seq: 0,
            }),
            ready: Condvar::new(),
            on_evict: None,
        }
    }

    /// Call `listener` with every entry evicted to make room.
    pub fn with_eviction_listener(max_size: usize, listener: impl Fn(K, V) + Send + Sync + 'static) -> Self {
        Self {
            on_evict: Some(Box::new(listener)),
            ..Self::new(max_size)
        }
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    fn lock(&self) -> MutexGuard<'_, State<K, V>> {
        // A panic inside a computation never leaves the map half-updated
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.lock().entries.contains_key(key)
    }

    /// Look up `key`, counting the access.
    pub fn get(&self, key: &K) -> Option<V> {
        let mut state = self.lock();
        let entry = state.entries.get_mut(key)?;
        entry.hits += 1;
        Some(entry.value.clone())
    }

    /// Return the cached value for `key`, computing it with `f` if absent.
    ///
    /// Errors from `f` are returned as is and nothing is cached.
    pub fn get_or_try_insert_with<E>(&self, key: K, f: impl FnOnce() -> Result<V, E>) -> Result<V, E> {
        let mut state = self.lock();
        loop {
            if let Some(entry) = state.entries.get_mut(&key) {
                entry.hits += 1;
                return Ok(entry.value.clone());
            }
            if !state.pending.contains(&key) {
                break;
            }
            state = self.ready.wait(state).unwrap_or_else(PoisonError::into_inner);
        }
        state.pending.insert(key.clone());
        drop(state);

        let mut guard = PendingGuard { cache: self, key: &key, armed: true };
        let value = f()?;
        guard.armed = false;
        drop(guard);

        let evicted = {
            let mut state = self.lock();
            state.pending.remove(&key);
            let evicted = self.make_room(&mut state);
            Self::push(&mut state, key, value.clone());
            evicted
        };
        self.ready.notify_all();
        self.notify_evicted(evicted);
        Ok(value)
    }

    /// Insert a value, or replace it keeping its use count. A replaced value
    /// goes to the eviction listener.
    pub fn insert(&self, key: K, value: V) {
        let evicted = {
            let mut state = self.lock();
            if let Some(entry) = state.entries.get_mut(&key) {
                let old = std::mem::replace(&mut entry.value, value);
                vec![(key, old)]
            } else {
                let evicted = self.make_room(&mut state);
                Self::push(&mut state, key, value);
                evicted
            }
        };
        self.notify_evicted(evicted);
    }

    fn push(state: &mut State<K, V>, key: K, value: V) {
        let seq = state.next_seq;
        state.next_seq += 1;
        state.entries.insert(key, Entry { value, hits: 0, seq });
    }

    /// Remove and return every entry, without calling the eviction listener.
    pub fn drain(&self) -> Vec<(K, V)> {
        let mut state = self.lock();
        let mut entries: Vec<(K, Entry<V>)> = state.entries.drain().collect();
        entries.sort_by_key(|(_, e)| e.seq);
        entries.into_iter().map(|(k, e)| (k, e.value)).collect()
    }

    fn make_room(&self, state: &mut State<K, V>) -> Vec<(K, V)> {
        let mut evicted = Vec::new();
        if self.max_size == 0 {
            return evicted;
        }
        while state.entries.len() >= self.max_size {
            let victim = state
                .entries
                .iter()
                .min_by_key(|(_, e)| (e.hits, e.seq))
                .map(|(k, _)| k.clone());
            let Some(victim) = victim else {
                break;
            };
            if let Some((k, e)) = state.entries.remove_entry(&victim) {
                evicted.push((k, e.value));
            }
        }
        evicted
    }

    fn notify_evicted(&self, evicted: Vec<(K, V)>) {
        if let Some(listener) = &self.on_evict {
            for (k, v) in evicted {
                listener(k, v);
            }
        }
    }
}

/// Clears the pending mark of a key if its computation fails or panics.
struct PendingGuard<'a, K: Eq + Hash + Clone, V: Clone> {
    cache: &'a LfuCache<K, V>,
    key: &'a K,
    armed: bool,
}

impl<K: Eq + Hash + Clone, V: Clone> Drop for PendingGuard<'_, K, V> {
    fn drop(&mut self) {
        if self.armed {
            self.cache.lock().pending.remove(self.key);
            self.cache.ready.notify_all();
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// AudioCache
// ─────────────────────────────────────────────────────────────────────────────

/// How long teardown waits for the cleanup worker before deleting inline.
const SHUTDOWN_GRACE: Duration = Duration::from_millis(300);

/// Text, synthesis options, and the transcription options if the text was
/// transcribed first.
type CacheKey = (String, TtsOptions, Option<TranscriptionOptions>);

fn remove_audio_file(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => log::debug!("Deleted audio file {}", path.display()),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::debug!("Audio file {} already gone", path.display())
        }
        Err(e) => log::warn!("Failed to delete audio file {}: {}", path.display(), e),
    }
}

fn cleanup_worker(queue: Receiver<Option<PathBuf>>) {
    // `None` is the shutdown sentinel
    while let Ok(Some(path)) = queue.recv() {
        remove_audio_file(&path);
    }
    log::debug!("Audio cleanup worker stopped");
}

/// Synthesized audio keyed by the request that produced it.
///
/// Evicted files are handed to a single background thread for deletion.
/// [`AudioCache::shutdown`] stops the worker and deletes every remaining file.
pub struct AudioCache {
    entries: LfuCache<CacheKey, TtsOutput>,
    clean: bool,
    queue: Mutex<Sender<Option<PathBuf>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl AudioCache {
    /// `max_size` 0 disables eviction. With `clean` unset, evicted files are
    /// left on disk.
    pub fn new(max_size: usize, clean: bool) -> Result<Self> {
        let (tx, rx) = mpsc::channel::<Option<PathBuf>>();
        let worker = thread::Builder::new()
            .name("tala-audio-cleanup".to_string())
            .spawn(move || cleanup_worker(rx))?;

        let evict_tx = Mutex::new(tx.clone());
        let entries = LfuCache::with_eviction_listener(max_size, move |(text, _, _): CacheKey, out: TtsOutput| {
            log::debug!("Evicted audio for {:?}: {}", text, out.file.display());
            if !clean {
                return;
            }
            let sent = evict_tx
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .send(Some(out.file.clone()));
            if sent.is_err() {
                // Worker is gone
                remove_audio_file(&out.file);
            }
        });

        Ok(Self {
            entries,
            clean,
            queue: Mutex::new(tx),
            worker: Mutex::new(Some(worker)),
        })
    }

    /// Cached output for `text` under `options`, synthesizing it with
    /// `compute` on a miss. `transcription` is `None` when the text is sent
    /// to the backend untranscribed.
    pub fn get_or_compute(
        &self,
        text: &str,
        options: &TtsOptions,
        transcription: Option<&TranscriptionOptions>,
        compute: impl FnOnce() -> Result<TtsOutput>,
    ) -> Result<TtsOutput> {
        let key = (text.to_string(), options.clone(), transcription.copied());
        self.entries.get_or_try_insert_with(key, compute)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stop the cleanup worker and delete every cached file.
    ///
    /// The worker gets a short grace period to finish its queue. The cache
    /// stays usable afterwards, with evicted files deleted inline.
    pub fn shutdown(&self) {
        let worker = self.worker.lock().unwrap_or_else(PoisonError::into_inner).take();
        if let Some(worker) = worker {
            log::debug!("Shutting down audio cache");
            let _ = self.queue.lock().unwrap_or_else(PoisonError::into_inner).send(None);

            let deadline = Instant::now() + SHUTDOWN_GRACE;
            while !worker.is_finished() && Instant::now() < deadline {
                thread::sleep(Duration::from_millis(10));
            }
            if worker.is_finished() {
                let _ = worker.join();
            } else {
                log::warn!("Audio cleanup worker did not stop within {:?}", SHUTDOWN_GRACE);
            }
        }

        let remaining = self.entries.drain();
        if self.clean {
            for (_, out) in &remaining {
                remove_audio_file(&out.file);
            }
        }
        if !remaining.is_empty() {
            log::debug!("Audio cache torn down, {} entries dropped", remaining.len());
        }
    }
}

impl Drop for AudioCache {
    fn drop(&mut self) {
        self.shutdown();
    }
}
