//! Completion caching.
//!
//! Repeated reasoning calls with identical inputs (the sequential display
//! pass re-runs every producer call the parallel pass already made) are
//! served from an in-memory moka cache instead of the provider. Keys hash
//! the task name plus the rendered input map; `FieldMap` iteration order is
//! deterministic, so the hash is stable.

use moka::future::Cache;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::Duration;

use fraudintel_core::FieldMap;

/// Cache key for one reasoning call.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallKey {
    task: &'static str,
    inputs_hash: u64,
}

impl CallKey {
    pub fn new(task: &'static str, inputs: &FieldMap) -> Self {
        Self {
            task,
            inputs_hash: hash_inputs(inputs),
        }
    }
}

fn hash_inputs(inputs: &FieldMap) -> u64 {
    let mut hasher = DefaultHasher::new();
    for (name, value) in inputs {
        name.hash(&mut hasher);
        // FieldValue holds floats, so hash its canonical JSON form.
        serde_json::to_string(value)
            .unwrap_or_default()
            .hash(&mut hasher);
    }
    hasher.finish()
}

/// In-memory cache of validated reasoning outputs.
pub struct CompletionCache {
    cache: Cache<CallKey, FieldMap>,
}

impl CompletionCache {
    pub fn new(max_entries: u64, ttl: Duration) -> Self {
        Self {
            cache: Cache::builder()
                .max_capacity(max_entries)
                .time_to_live(ttl)
                .build(),
        }
    }

    pub async fn get(&self, key: &CallKey) -> Option<FieldMap> {
        self.cache.get(key).await
    }

    pub async fn insert(&self, key: CallKey, outputs: FieldMap) {
        self.cache.insert(key, outputs).await;
    }
}

impl Default for CompletionCache {
    fn default() -> Self {
        Self::new(10_000, Duration::from_secs(3600))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fraudintel_core::FieldValue;

    fn inputs(text: &str) -> FieldMap {
        let mut map = FieldMap::new();
        map.insert("identity_data".to_string(), FieldValue::from(text));
        map
    }

    #[test]
    fn test_key_stable_for_identical_inputs() {
        assert_eq!(
            CallKey::new("hypothesis_generator", &inputs("{}")),
            CallKey::new("hypothesis_generator", &inputs("{}")),
        );
    }

    #[test]
    fn test_key_differs_across_tasks_and_inputs() {
        let a = CallKey::new("hypothesis_generator", &inputs("{}"));
        assert_ne!(a, CallKey::new("contradiction_checker", &inputs("{}")));
        assert_ne!(a, CallKey::new("hypothesis_generator", &inputs("{\"x\":1}")));
    }

    #[tokio::test]
    async fn test_cache_round_trip() {
        let cache = CompletionCache::default();
        let key = CallKey::new("narrative_drafter", &inputs("{}"));

        assert!(cache.get(&key).await.is_none());

        let mut outputs = FieldMap::new();
        outputs.insert("headline".to_string(), FieldValue::from("Probable ATO"));
        cache.insert(key.clone(), outputs).await;

        let hit = cache.get(&key).await.unwrap();
        assert_eq!(hit["headline"].as_text(), Some("Probable ATO"));
    }
}
