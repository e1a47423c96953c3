//! Explicit class-hash cache.
//!
//! Constructed once at application start and passed by reference to the
//! contract client. Entries are keyed by address; a deployed class hash
//! never changes for the blocks this client queries, so there is no
//! expiry.

use parking_lot::RwLock;
use std::collections::HashMap;

use bidnox_types::Felt;

/// Cache of contract class hashes by address.
#[derive(Default)]
pub struct ClassHashCache {
    entries: RwLock<HashMap<String, Felt>>,
}

impl ClassHashCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<Felt> {
        self.entries.read().get(key).cloned()
    }

    pub fn insert(&self, key: String, hash: Felt) {
        self.entries.write().insert(key, hash);
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_get_clear() {
        let cache = ClassHashCache::new();
        assert!(cache.get("0xabc").is_none());
        assert!(cache.is_empty());

        let hash = Felt::from_hex("0x1234").unwrap();
        cache.insert("0xabc".to_string(), hash.clone());
        assert_eq!(cache.get("0xabc"), Some(hash));
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.get("0xabc").is_none());
    }

    #[test]
    fn insert_overwrites() {
        let cache = ClassHashCache::new();
        cache.insert("k".to_string(), Felt::from_hex("0x1").unwrap());
        cache.insert("k".to_string(), Felt::from_hex("0x2").unwrap());
        assert_eq!(cache.get("k"), Some(Felt::from_hex("0x2").unwrap()));
    }
}
