//! Process-lifetime memoization of a discovery run.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::OnceCell;

use crate::discovery::{DiscoverOptions, DiscoveredExtensions, ExtensionDiscovery};
use crate::error::Result;

/// Runs discovery at most once and hands out the shared result afterwards.
///
/// Concurrent first callers wait on the same run. A failed run is not
/// cached; the next call tries again.
#[derive(Debug)]
pub struct DiscoveryCache {
    discovery: ExtensionDiscovery,
    options: DiscoverOptions,
    result: OnceCell<Arc<DiscoveredExtensions>>,
    runs: AtomicUsize,
}

impl DiscoveryCache {
    pub fn new(discovery: ExtensionDiscovery, options: DiscoverOptions) -> Self {
        Self {
            discovery,
            options,
            result: OnceCell::new(),
            runs: AtomicUsize::new(0),
        }
    }

    /// The discovery result, running discovery on first use.
    pub async fn get(&self) -> Result<Arc<DiscoveredExtensions>> {
        self.result
            .get_or_try_init(|| async {
                let run = self.runs.fetch_add(1, Ordering::Relaxed) + 1;
                tracing::debug!(run, "running extension discovery");
                self.discovery.discover(&self.options).await.map(Arc::new)
            })
            .await
            .cloned()
    }

    /// The result if discovery has already run.
    pub fn cached(&self) -> Option<Arc<DiscoveredExtensions>> {
        self.result.get().cloned()
    }
}
