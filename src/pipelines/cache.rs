use crate::error::Result;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

pub trait ModelOptions {
    fn cache_key(&self) -> String;
}

// Cache stores WEAK references - models are freed when all pipelines using them drop.
type CacheStorage = HashMap<(TypeId, String), Box<dyn Any + Send + Sync>>;

pub struct ModelCache {
    cache: Mutex<CacheStorage>,
}

impl ModelCache {
    pub fn new() -> Self {
        Self {
            cache: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, CacheStorage> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lookup<M>(&self, cache_key: &(TypeId, String)) -> Option<Arc<M>>
    where
        M: Send + Sync + 'static,
    {
        let mut cache = self.lock();
        if let Some(boxed) = cache.get(cache_key) {
            if let Some(strong) = boxed.downcast_ref::<Weak<M>>().and_then(Weak::upgrade) {
                return Some(strong);
            }
            // Weak ref dead, remove stale entry
            cache.remove(cache_key);
        }
        None
    }

    /// Returns the live model for `key`, or runs `loader` and remembers the result.
    ///
    /// The lock is not held while `loader` runs.
    pub fn get_or_create<M, F>(&self, key: &str, loader: F) -> Result<Arc<M>>
    where
        M: Send + Sync + 'static,
        F: FnOnce() -> Result<M>,
    {
        let cache_key = (TypeId::of::<M>(), key.to_string());

        if let Some(model) = self.lookup::<M>(&cache_key) {
            tracing::debug!(key, "reusing cached model");
            return Ok(model);
        }

        let model = Arc::new(loader()?);

        let weak: Weak<M> = Arc::downgrade(&model);
        self.lock().insert(cache_key, Box::new(weak));

        Ok(model)
    }

    #[cfg(test)]
    pub fn clear(&self) {
        self.lock().clear();
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl Default for ModelCache {
    fn default() -> Self {
        Self::new()
    }
}

static GLOBAL_MODEL_CACHE: once_cell::sync::Lazy<ModelCache> =
    once_cell::sync::Lazy::new(ModelCache::new);

pub fn global_cache() -> &'static ModelCache {
    &GLOBAL_MODEL_CACHE
}
