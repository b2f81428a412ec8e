use std::collections::BTreeMap;

use parking_lot::Mutex;

use crate::DocumentId;

/// An associative container striped over a fixed number of buckets, each
/// behind its own mutex. Keys are document ids; `key mod bucket_count`
/// selects the bucket, so distinct buckets never contend and no operation
/// holds more than one bucket lock at a time.
///
/// Used as the relevance accumulator on the parallel scoring path, where
/// contributions to the same document from different query terms must
/// serialize without a global lock.
pub struct StripedMap<V> {
    buckets: Vec<Mutex<BTreeMap<DocumentId, V>>>,
}

impl<V: Default> StripedMap<V> {
    /// `bucket_count` must be non-zero.
    pub fn new(bucket_count: usize) -> Self {
        assert!(bucket_count > 0, "StripedMap needs at least one bucket");
        Self {
            buckets: (0..bucket_count).map(|_| Mutex::new(BTreeMap::new())).collect(),
        }
    }

    fn bucket(&self, key: DocumentId) -> &Mutex<BTreeMap<DocumentId, V>> {
        let index = (key as i64).rem_euclid(self.buckets.len() as i64) as usize;
        &self.buckets[index]
    }

    /// Locks the owning bucket and runs `op` on the entry for `key`,
    /// default-initializing it if absent. The lock is held only for the
    /// duration of `op`.
    pub fn access<R>(&self, key: DocumentId, op: impl FnOnce(&mut V) -> R) -> R {
        let mut bucket = self.bucket(key).lock();
        op(bucket.entry(key).or_default())
    }

    /// Removes the entry for `key`, if any.
    pub fn erase(&self, key: DocumentId) {
        self.bucket(key).lock().remove(&key);
    }

    /// Merges every bucket into one ordered map, locking each bucket in turn.
    /// With writers active across buckets during the merge this is a rolling
    /// view, not an atomic point-in-time one.
    pub fn snapshot(&self) -> BTreeMap<DocumentId, V>
    where
        V: Clone,
    {
        let mut merged = BTreeMap::new();
        for bucket in &self.buckets {
            let bucket = bucket.lock();
            for (&key, value) in bucket.iter() {
                merged.insert(key, value.clone());
            }
        }
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_default_initializes() {
        let map: StripedMap<f64> = StripedMap::new(3);
        map.access(7, |value| *value += 0.5);
        map.access(7, |value| *value += 0.25);
        assert_eq!(map.snapshot().get(&7), Some(&0.75));
    }

    #[test]
    fn erase_removes_entry() {
        let map: StripedMap<i32> = StripedMap::new(3);
        map.access(1, |value| *value = 10);
        map.access(2, |value| *value = 20);
        map.erase(1);
        let merged = map.snapshot();
        assert!(!merged.contains_key(&1));
        assert_eq!(merged.get(&2), Some(&20));
    }

    #[test]
    fn snapshot_is_ordered_across_buckets() {
        let map: StripedMap<i32> = StripedMap::new(3);
        for key in [5, 0, 4, 2, 1, 3] {
            map.access(key, |value| *value = key);
        }
        let keys: Vec<DocumentId> = map.snapshot().into_keys().collect();
        assert_eq!(keys, vec![0, 1, 2, 3, 4, 5]);
    }
}
