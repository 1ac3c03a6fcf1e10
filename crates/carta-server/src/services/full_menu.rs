//! Full-menu export service.

use std::sync::Arc;

use carta_cache::CacheRepository;
use carta_core::{FullMenu, Result};
use carta_storage::FullMenuStore;

/// Read-through over the denormalized export.
///
/// The export is cached as one blob and never partially updated. Every
/// mutation anywhere in the hierarchy already dropped the blob through the
/// mutating entity's own cascade, so this service performs no invalidation
/// of its own.
pub struct FullMenuService {
    storage: Arc<dyn FullMenuStore>,
    cache: Arc<CacheRepository>,
}

impl FullMenuService {
    pub fn new(storage: Arc<dyn FullMenuStore>, cache: Arc<CacheRepository>) -> Self {
        Self { storage, cache }
    }

    /// Returns the nested projection, rebuilding the blob on a miss.
    pub async fn get(&self) -> Result<FullMenu> {
        if let Some(full_menu) = self.cache.get_full_menu().await {
            return Ok(full_menu);
        }
        let full_menu = self.storage.get_full().await?;
        self.cache.set_full_menu(&full_menu).await;
        Ok(full_menu)
    }
}
