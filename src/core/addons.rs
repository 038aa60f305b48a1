//! Addon bundle loading.
//!
//! Sessions declare a set of capability bundles (line editor, fit addon,
//! the widget library itself) that must be present in the execution
//! environment before the widget is constructed. Loading is awaited and
//! idempotent per bundle: a loaded bundle is never loaded again, and a
//! re-invocation with a grown set only fetches the new entries.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to load bundle {name}: {reason}")]
    Bundle { name: String, reason: String },
}

/// Fetches one capability bundle into the execution environment.
#[async_trait]
pub trait BundleLoader: Send + Sync {
    async fn load(&self, name: &str) -> Result<(), LoadError>;
}

/// Tracks which bundles are already present and loads the rest.
pub struct AddonLoader {
    loader: Arc<dyn BundleLoader>,
    loaded: BTreeSet<String>,
}

impl AddonLoader {
    pub fn new(loader: Arc<dyn BundleLoader>) -> Self {
        Self {
            loader,
            loaded: BTreeSet::new(),
        }
    }

    /// Ensure every declared bundle is loaded, in order.
    ///
    /// Awaits each missing bundle before returning; callers must not
    /// construct the widget until this resolves. Already-loaded bundles
    /// are skipped.
    pub async fn ensure_loaded(&mut self, declared: &BTreeSet<String>) -> Result<(), LoadError> {
        for name in declared {
            if self.loaded.contains(name) {
                continue;
            }
            debug!(bundle = %name, "loading addon bundle");
            self.loader.load(name).await?;
            self.loaded.insert(name.clone());
        }
        Ok(())
    }

    /// Whether a bundle has been loaded.
    pub fn is_loaded(&self, name: &str) -> bool {
        self.loaded.contains(name)
    }
}

/// Loader for environments where every bundle is already linked in.
///
/// The demo binary statically links its widget and addons, so "loading" a
/// bundle resolves immediately.
#[derive(Debug, Default)]
pub struct StaticBundleLoader;

#[async_trait]
impl BundleLoader for StaticBundleLoader {
    async fn load(&self, _name: &str) -> Result<(), LoadError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct CountingLoader {
        calls: Mutex<Vec<String>>,
        total: AtomicUsize,
    }

    #[async_trait]
    impl BundleLoader for CountingLoader {
        async fn load(&self, name: &str) -> Result<(), LoadError> {
            self.calls.lock().unwrap().push(name.to_string());
            self.total.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn bundles(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn loads_each_bundle_once() {
        let counting = Arc::new(CountingLoader::default());
        let mut loader = AddonLoader::new(counting.clone());

        let declared = bundles(&["xterm", "local-echo", "fit"]);
        loader.ensure_loaded(&declared).await.unwrap();
        loader.ensure_loaded(&declared).await.unwrap();
        loader.ensure_loaded(&declared).await.unwrap();

        assert_eq!(counting.total.load(Ordering::SeqCst), 3);
        assert!(loader.is_loaded("xterm"));
        assert!(loader.is_loaded("fit"));
    }

    #[tokio::test]
    async fn grown_set_loads_only_new_bundles() {
        let counting = Arc::new(CountingLoader::default());
        let mut loader = AddonLoader::new(counting.clone());

        loader.ensure_loaded(&bundles(&["xterm"])).await.unwrap();
        loader
            .ensure_loaded(&bundles(&["xterm", "local-echo"]))
            .await
            .unwrap();

        let calls = counting.calls.lock().unwrap().clone();
        assert_eq!(calls, vec!["xterm".to_string(), "local-echo".to_string()]);
    }

    #[tokio::test]
    async fn failed_bundle_is_retried_next_pass() {
        struct FlakyLoader {
            failures_left: AtomicUsize,
        }

        #[async_trait]
        impl BundleLoader for FlakyLoader {
            async fn load(&self, name: &str) -> Result<(), LoadError> {
                if self.failures_left.fetch_sub(1, Ordering::SeqCst) > 0 {
                    return Err(LoadError::Bundle {
                        name: name.to_string(),
                        reason: "network".to_string(),
                    });
                }
                Ok(())
            }
        }

        let mut loader = AddonLoader::new(Arc::new(FlakyLoader {
            failures_left: AtomicUsize::new(1),
        }));
        let declared = bundles(&["xterm"]);
        assert!(loader.ensure_loaded(&declared).await.is_err());
        assert!(!loader.is_loaded("xterm"));
        assert!(loader.ensure_loaded(&declared).await.is_ok());
        assert!(loader.is_loaded("xterm"));
    }
}
