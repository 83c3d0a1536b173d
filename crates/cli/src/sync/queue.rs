// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Durable queue of pending operations.
//!
//! The queue lives in a single named slot of host-provided durable storage.
//! The slot value is the JSONL encoding of the ordered operation list.
//! Every call reads the slot fresh and every mutation is persisted before it
//! returns (write-through), so a new queue opened on the same slot after a
//! restart sees exactly what the old one left behind.

use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use ts_core::{jsonl, OpId, PendingOperation};

/// Error type for queue operations.
#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    /// I/O error reading or writing the slot.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The slot content could not be encoded or decoded.
    #[error("storage error: {0}")]
    Storage(#[from] ts_core::Error),

    /// An operation with this ID is already queued.
    #[error("duplicate operation id: {0}")]
    DuplicateId(OpId),

    /// The queue already holds `limit` operations.
    #[error("offline queue is full ({limit} pending operations)")]
    Full { limit: usize },
}

/// Result type for queue operations.
pub type QueueResult<T> = Result<T, QueueError>;

/// Exclusive access to a slot, released on drop.
#[derive(Debug, Default)]
pub struct SlotLock {
    _file: Option<fs::File>,
}

/// A single named entry in host-provided durable key-value storage.
pub trait KeyValueSlot: Send + Sync {
    /// Returns the stored value, or `None` if the slot was never written.
    fn load(&self) -> QueueResult<Option<String>>;

    /// Replaces the stored value. Must be durable before returning.
    fn store(&self, value: &str) -> QueueResult<()>;

    /// Takes exclusive access for a read-modify-write cycle.
    ///
    /// Slots that are only reachable from one process need no extra locking.
    fn lock(&self) -> QueueResult<SlotLock> {
        Ok(SlotLock::default())
    }
}

/// Slot backed by a file in a directory.
///
/// Writes go through a temp file and rename, so the file always holds either
/// the previous or the new value. An advisory lock on a sibling `.lock` file
/// serializes writers from different processes.
#[derive(Debug, Clone)]
pub struct FileSlot {
    path: PathBuf,
    lock_path: PathBuf,
}

impl FileSlot {
    /// Opens the slot `name` inside `dir`.
    pub fn open(dir: &Path, name: &str) -> QueueResult<Self> {
        fs::create_dir_all(dir)?;
        Ok(FileSlot {
            path: dir.join(format!("{name}.jsonl")),
            lock_path: dir.join(format!("{name}.lock")),
        })
    }

    /// Path of the file holding the slot value.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyValueSlot for FileSlot {
    fn load(&self) -> QueueResult<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn store(&self, value: &str) -> QueueResult<()> {
        jsonl::write_atomic(&self.path, value)?;
        Ok(())
    }

    fn lock(&self) -> QueueResult<SlotLock> {
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&self.lock_path)?;
        fs2::FileExt::lock_exclusive(&file)?;
        Ok(SlotLock { _file: Some(file) })
    }
}

/// In-memory slot. Clones share the same storage, which makes it easy to
/// simulate a restart by opening a second queue on a clone.
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    value: Arc<Mutex<Option<String>>>,
    fail_writes: Arc<AtomicBool>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent `store` fail (quota exceeded, disk gone, ...).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::Release);
    }

    /// Returns the raw stored value.
    pub fn raw(&self) -> Option<String> {
        self.value
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl KeyValueSlot for MemorySlot {
    fn load(&self) -> QueueResult<Option<String>> {
        Ok(self.raw())
    }

    fn store(&self, value: &str) -> QueueResult<()> {
        if self.fail_writes.load(Ordering::Acquire) {
            return Err(std::io::Error::other("storage quota exceeded").into());
        }
        *self.value.lock().unwrap_or_else(PoisonError::into_inner) = Some(value.to_string());
        Ok(())
    }
}

/// Offline queue for persisting pending operations.
///
/// Ordered by enqueue order. Removal is by ID, never by position, so an
/// operation appended while a sync cycle is running cannot be dropped by
/// that cycle's cleanup.
pub struct OfflineQueue {
    slot: Box<dyn KeyValueSlot>,
    /// Serializes read-modify-write cycles within this process.
    guard: Mutex<()>,
}

impl OfflineQueue {
    /// Creates a queue over an arbitrary slot.
    pub fn new(slot: impl KeyValueSlot + 'static) -> Self {
        OfflineQueue {
            slot: Box::new(slot),
            guard: Mutex::new(()),
        }
    }

    /// Opens the file-backed queue `name` inside `dir`.
    pub fn open(dir: &Path, name: &str) -> QueueResult<Self> {
        Ok(Self::new(FileSlot::open(dir, name)?))
    }

    fn exclusive(&self) -> QueueResult<(MutexGuard<'_, ()>, SlotLock)> {
        let local = self.guard.lock().unwrap_or_else(PoisonError::into_inner);
        let slot = self.slot.lock()?;
        Ok((local, slot))
    }

    fn read(&self) -> QueueResult<Vec<PendingOperation>> {
        match self.slot.load()? {
            Some(text) => Ok(jsonl::decode(&text)?),
            None => Ok(Vec::new()),
        }
    }

    fn write(&self, ops: &[PendingOperation]) -> QueueResult<()> {
        self.slot.store(&jsonl::encode(ops)?)
    }

    /// Adds an operation to the end of the queue.
    ///
    /// The operation is persisted before this returns.
    pub fn append(&self, op: &PendingOperation) -> QueueResult<()> {
        self.append_bounded(op, None)
    }

    /// Adds an operation unless `limit` operations are already queued.
    ///
    /// The size check and the write happen under the same exclusive lock,
    /// so concurrent writers on one slot never push the queue past `limit`.
    pub fn append_bounded(&self, op: &PendingOperation, limit: Option<usize>) -> QueueResult<()> {
        let _lock = self.exclusive()?;
        let mut ops = self.read()?;
        if let Some(limit) = limit {
            if ops.len() >= limit {
                return Err(QueueError::Full { limit });
            }
        }
        if ops.iter().any(|queued| queued.id() == op.id()) {
            return Err(QueueError::DuplicateId(op.id().clone()));
        }
        ops.push(op.clone());
        self.write(&ops)
    }

    /// Returns the current ordered snapshot without removing anything.
    pub fn list_all(&self) -> QueueResult<Vec<PendingOperation>> {
        let _lock = self.exclusive()?;
        self.read()
    }

    /// Removes the given IDs, keeping the order of what remains.
    ///
    /// IDs that are not queued are ignored.
    pub fn remove_by_ids(&self, ids: &HashSet<OpId>) -> QueueResult<()> {
        if ids.is_empty() {
            return Ok(());
        }
        let _lock = self.exclusive()?;
        let ops = self.read()?;
        let before = ops.len();
        let remaining: Vec<PendingOperation> = ops
            .into_iter()
            .filter(|op| !ids.contains(op.id()))
            .collect();
        if remaining.len() == before {
            return Ok(());
        }
        self.write(&remaining)
    }

    /// Number of pending operations.
    pub fn count(&self) -> QueueResult<usize> {
        Ok(self.list_all()?.len())
    }

    /// Check if the queue is empty.
    pub fn is_empty(&self) -> QueueResult<bool> {
        Ok(self.count()? == 0)
    }
}

impl std::fmt::Debug for OfflineQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OfflineQueue").finish_non_exhaustive()
    }
}
