// src/cache.rs

use std::{
    any::Any,
    collections::HashMap,
    future::Future,
    sync::Arc,
};

use tokio::sync::RwLock;

use crate::error::AppError;

/// Resource whose list responses are cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Category,
    Avatar,
    Question,
}

impl Resource {
    /// Resources whose cached lists embed rows of `self`.
    fn affected(self) -> &'static [Resource] {
        match self {
            // question lists carry their category
            Resource::Category => &[Resource::Category, Resource::Question],
            Resource::Avatar => &[Resource::Avatar],
            Resource::Question => &[Resource::Question],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    resource: Resource,
    filter: String,
}

type Entry = Arc<dyn Any + Send + Sync>;

/// Filtered lists kept per resource, on top of the unfiltered one.
pub const MAX_FILTERED_ENTRIES: usize = 32;

#[derive(Default)]
struct Inner {
    entries: HashMap<CacheKey, Entry>,
    generations: HashMap<Resource, u64>,
}

impl Inner {
    fn generation(&self, resource: Resource) -> u64 {
        self.generations.get(&resource).copied().unwrap_or(0)
    }

    fn filtered_count(&self, resource: Resource) -> usize {
        self.entries
            .keys()
            .filter(|key| key.resource == resource && !key.filter.is_empty())
            .count()
    }
}

/// Read-through cache of list responses keyed by resource and normalized filter.
///
/// Entries live until the owning resource is invalidated. Each invalidation bumps a
/// generation counter, and a load that started under an older generation is returned
/// to its caller but never stored. At most `MAX_FILTERED_ENTRIES` filtered lists are
/// held per resource; storing one more first drops that resource's filtered lists.
#[derive(Default)]
pub struct ListCache {
    inner: RwLock<Inner>,
}

impl ListCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get_or_load<T, F, Fut>(
        &self,
        resource: Resource,
        filter: &str,
        load: F,
    ) -> Result<Arc<Vec<T>>, AppError>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<T>, AppError>>,
    {
        let key = CacheKey {
            resource,
            filter: filter.to_string(),
        };

        let generation = {
            let inner = self.inner.read().await;
            if let Some(hit) = inner.entries.get(&key) {
                if let Ok(rows) = Arc::clone(hit).downcast::<Vec<T>>() {
                    tracing::debug!(?resource, filter, "list cache hit");
                    return Ok(rows);
                }
            }
            inner.generation(resource)
        };

        let rows = Arc::new(load().await?);

        let mut inner = self.inner.write().await;
        if inner.generation(resource) == generation {
            if !key.filter.is_empty()
                && !inner.entries.contains_key(&key)
                && inner.filtered_count(resource) >= MAX_FILTERED_ENTRIES
            {
                tracing::debug!(?resource, "filtered list limit reached, evicting");
                inner
                    .entries
                    .retain(|k, _| k.resource != resource || k.filter.is_empty());
            }
            let entry: Entry = rows.clone();
            inner.entries.insert(key, entry);
        } else {
            tracing::debug!(?resource, "list invalidated during load, not caching");
        }
        Ok(rows)
    }

    /// Number of lists currently cached for `resource`.
    pub async fn len(&self, resource: Resource) -> usize {
        let inner = self.inner.read().await;
        inner.entries.keys().filter(|key| key.resource == resource).count()
    }

    /// Drops every cached list that may contain rows of `resource`.
    pub async fn invalidate(&self, resource: Resource) {
        let mut inner = self.inner.write().await;
        for &affected in resource.affected() {
            *inner.generations.entry(affected).or_insert(0) += 1;
            inner.entries.retain(|key, _| key.resource != affected);
        }
        tracing::debug!(?resource, "list cache invalidated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    async fn load_counted(
        cache: &ListCache,
        resource: Resource,
        filter: &str,
        calls: &AtomicUsize,
    ) -> Arc<Vec<u32>> {
        cache
            .get_or_load(resource, filter, move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(vec![1, 2, 3])
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn second_read_is_served_from_cache() {
        let cache = ListCache::new();
        let calls = AtomicUsize::new(0);

        load_counted(&cache, Resource::Avatar, "", &calls).await;
        let rows = load_counted(&cache, Resource::Avatar, "", &calls).await;

        assert_eq!(*rows, vec![1, 2, 3]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn filters_are_cached_separately() {
        let cache = ListCache::new();
        let calls = AtomicUsize::new(0);

        load_counted(&cache, Resource::Avatar, "", &calls).await;
        load_counted(&cache, Resource::Avatar, "png", &calls).await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn distinct_filters_stay_bounded() {
        let cache = ListCache::new();
        let calls = AtomicUsize::new(0);

        load_counted(&cache, Resource::Avatar, "", &calls).await;
        for i in 0..10_000 {
            load_counted(&cache, Resource::Avatar, &format!("term{i}"), &calls).await;
        }

        let cached = cache.len(Resource::Avatar).await;
        assert!(cached <= MAX_FILTERED_ENTRIES + 1, "{cached} lists cached");

        // the unfiltered list survives eviction
        let before = calls.load(Ordering::SeqCst);
        load_counted(&cache, Resource::Avatar, "", &calls).await;
        assert_eq!(calls.load(Ordering::SeqCst), before);
    }

    #[tokio::test]
    async fn category_invalidation_clears_question_lists() {
        let cache = ListCache::new();
        let calls = AtomicUsize::new(0);

        load_counted(&cache, Resource::Question, "", &calls).await;
        load_counted(&cache, Resource::Avatar, "", &calls).await;
        cache.invalidate(Resource::Category).await;
        load_counted(&cache, Resource::Question, "", &calls).await;
        load_counted(&cache, Resource::Avatar, "", &calls).await;

        // question reloaded, avatar still cached
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn load_racing_an_invalidation_is_not_stored() {
        let cache = ListCache::new();
        let calls = AtomicUsize::new(0);

        let shared = &cache;
        let stale = cache
            .get_or_load(Resource::Category, "", move || async move {
                shared.invalidate(Resource::Category).await;
                Ok(vec![0u32])
            })
            .await
            .unwrap();
        assert_eq!(*stale, vec![0]);

        let fresh = load_counted(&cache, Resource::Category, "", &calls).await;
        assert_eq!(*fresh, vec![1, 2, 3]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn load_errors_are_returned_and_not_cached() {
        let cache = ListCache::new();
        let calls = AtomicUsize::new(0);

        let err = cache
            .get_or_load::<u32, _, _>(Resource::Avatar, "", || async {
                Err(AppError::InternalServerError("down".to_string()))
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InternalServerError(_)));

        load_counted(&cache, Resource::Avatar, "", &calls).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
