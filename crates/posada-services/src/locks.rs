//! Per-resource lock registry
//!
//! The source portal performed "check conflicts, then write" with no
//! concurrency control. Here every location and every ledger entity gets
//! its own async mutex, so the check-then-write window is serialized per
//! resource without any cross-location lock.

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

/// Registry of per-id async mutexes
///
/// Locks are created lazily on first use and kept for the lifetime of the
/// registry.
#[derive(Default)]
pub struct LockRegistry {
    locks: DashMap<Uuid, Arc<Mutex<()>>>,
}

impl LockRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for an id, waiting if it is held
    pub async fn acquire(&self, id: Uuid) -> OwnedMutexGuard<()> {
        let lock = {
            let entry = self
                .locks
                .entry(id)
                .or_insert_with(|| Arc::new(Mutex::new(())));
            Arc::clone(&entry)
        };
        lock.lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicI32, Ordering};

    #[tokio::test]
    async fn test_same_id_serializes() {
        let registry = Arc::new(LockRegistry::new());
        let id = Uuid::new_v4();
        let in_section = Arc::new(AtomicI32::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let registry = Arc::clone(&registry);
            let in_section = Arc::clone(&in_section);
            handles.push(tokio::spawn(async move {
                let _guard = registry.acquire(id).await;
                let now = in_section.fetch_add(1, Ordering::SeqCst);
                assert_eq!(now, 0, "two tasks inside the same critical section");
                tokio::task::yield_now().await;
                in_section.fetch_sub(1, Ordering::SeqCst);
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_different_ids_do_not_block() {
        let registry = LockRegistry::new();
        let _a = registry.acquire(Uuid::new_v4()).await;
        // Would deadlock if locks were shared across ids
        let _b = registry.acquire(Uuid::new_v4()).await;
    }
}
