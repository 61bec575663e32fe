use dashmap::DashMap;
use std::collections::BTreeSet;
use std::fmt::Display;
use std::hash::Hash;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::trace;

type Sections<K> = DashMap<K, Arc<Mutex<()>>>;

/// One async mutex per key, created on first use and evicted once nobody
/// holds or waits for it.
///
/// [`KeyedLocks::acquire_all`] always locks in ascending key order, so two
/// callers asking for overlapping key sets cannot deadlock each other.
pub struct KeyedLocks<K: Eq + Hash> {
    sections: Arc<Sections<K>>,
}

impl<K> Default for KeyedLocks<K>
where
    K: Eq + Hash + Ord + Clone + Display,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K> KeyedLocks<K>
where
    K: Eq + Hash + Ord + Clone + Display,
{
    pub fn new() -> Self {
        Self { sections: Arc::new(DashMap::new()) }
    }

    pub async fn acquire(&self, key: K) -> SectionGuard<K> {
        // Cloned under the shard lock, so eviction sees this caller as a holder
        let section = {
            let entry = self.sections.entry(key.clone()).or_insert_with(|| Arc::new(Mutex::new(())));
            Arc::clone(entry.value())
        };
        let guard = section.lock_owned().await;
        trace!(key = %key, "Section acquired");
        SectionGuard {
            key,
            guard: Some(guard),
            sections: Arc::clone(&self.sections),
        }
    }

    /// Locks every distinct key, lowest first.
    pub async fn acquire_all(&self, keys: impl IntoIterator<Item = K>) -> Vec<SectionGuard<K>> {
        let ordered: BTreeSet<K> = keys.into_iter().collect();
        let mut guards = Vec::with_capacity(ordered.len());
        for key in ordered {
            guards.push(self.acquire(key).await);
        }
        guards
    }

    /// Number of sections currently held or waited for.
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// Exclusive hold on one key. Dropping it unlocks the key and removes the
/// section when no other caller references it.
pub struct SectionGuard<K: Eq + Hash> {
    key: K,
    guard: Option<OwnedMutexGuard<()>>,
    sections: Arc<Sections<K>>,
}

impl<K: Eq + Hash> SectionGuard<K> {
    pub fn key(&self) -> &K {
        &self.key
    }
}

impl<K: Eq + Hash> Drop for SectionGuard<K> {
    fn drop(&mut self) {
        // Release our Arc first so the map's own reference is the last one
        drop(self.guard.take());
        self.sections.remove_if(&self.key, |_, section| Arc::strong_count(section) == 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn same_key_is_exclusive() {
        let locks = Arc::new(KeyedLocks::<u32>::new());
        let held = locks.acquire(1).await;

        let waiting = {
            let locks = Arc::clone(&locks);
            tokio::spawn(async move {
                let _guard = locks.acquire(1).await;
            })
        };

        // Other keys stay available
        let other = tokio::time::timeout(Duration::from_millis(50), locks.acquire(2)).await;
        assert!(other.is_ok());

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiting.is_finished());

        drop(held);
        tokio::time::timeout(Duration::from_secs(1), waiting)
            .await
            .expect("waiter should get the section once released")
            .unwrap();
    }

    #[tokio::test]
    async fn acquire_all_dedupes_and_sorts() {
        let locks = KeyedLocks::<u32>::new();
        let guards = locks.acquire_all([5, 1, 5, 3]).await;
        let keys: Vec<u32> = guards.iter().map(|guard| *guard.key()).collect();
        assert_eq!(keys, vec![1, 3, 5]);
    }

    #[tokio::test]
    async fn released_sections_are_evicted() {
        let locks = KeyedLocks::<u32>::new();
        for key in 0..1_000 {
            let guard = locks.acquire(key).await;
            assert_eq!(locks.len(), 1);
            drop(guard);
        }
        assert!(locks.is_empty());

        let guards = locks.acquire_all([7, 8, 9]).await;
        assert_eq!(locks.len(), 3);
        drop(guards);
        assert!(locks.is_empty());
    }

    #[tokio::test]
    async fn section_survives_while_someone_waits() {
        let locks = Arc::new(KeyedLocks::<u32>::new());
        let held = locks.acquire(4).await;

        let waiting = {
            let locks = Arc::clone(&locks);
            tokio::spawn(async move {
                let guard = locks.acquire(4).await;
                tokio::time::sleep(Duration::from_millis(20)).await;
                drop(guard);
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        // The waiter still references the section, so it must stay mapped
        drop(held);
        assert_eq!(locks.len(), 1);

        waiting.await.unwrap();
        assert!(locks.is_empty());
    }
}
