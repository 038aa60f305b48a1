//! Resize coordination.
//!
//! Watches container size changes and re-fits the display surface on each
//! one. `fit` recomputes rows/columns without reconstructing the widget, so
//! repeated rapid changes just call it repeatedly; the only coalescing is
//! what the watch channel itself provides.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::ui::surface::{ContainerSize, DisplaySurface};

/// Spawns the task that keeps a surface fitted to its container.
pub struct ResizeCoordinator;

impl ResizeCoordinator {
    /// Observe `sizes` until `shutdown` flips true, fitting on each change.
    pub fn spawn(
        surface: Arc<dyn DisplaySurface>,
        mut sizes: watch::Receiver<ContainerSize>,
        mut shutdown: watch::Receiver<bool>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    changed = sizes.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let (cols, rows) = *sizes.borrow_and_update();
                        debug!(cols, rows, "container resized, refitting surface");
                        surface.fit();
                    }
                    changed = shutdown.changed() => {
                        // A dropped sender counts as shutdown, same as the
                        // prompt cycle's close check.
                        if changed.is_err() || *shutdown.borrow() {
                            break;
                        }
                    }
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::surface::testing::RecordingSurface;
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    async fn wait_for_fits(surface: &RecordingSurface, at_least: usize) {
        tokio::time::timeout(Duration::from_secs(1), async {
            while surface.fit_count.load(Ordering::SeqCst) < at_least {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("surface was never fitted");
    }

    #[tokio::test]
    async fn refits_on_every_size_change() {
        let surface = RecordingSurface::new();
        let (size_tx, size_rx) = watch::channel((80, 24));
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);

        let task = ResizeCoordinator::spawn(surface.clone(), size_rx, shutdown_rx);

        size_tx.send((100, 30)).unwrap();
        wait_for_fits(&surface, 1).await;

        size_tx.send((90, 28)).unwrap();
        wait_for_fits(&surface, 2).await;

        drop(size_tx);
        task.await.unwrap();
        assert_eq!(surface.fit_count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn shutdown_stops_the_coordinator() {
        let surface = RecordingSurface::new();
        let (size_tx, size_rx) = watch::channel((80, 24));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let task = ResizeCoordinator::spawn(surface.clone(), size_rx, shutdown_rx);
        shutdown_tx.send(true).unwrap();
        task.await.unwrap();

        // Later size changes go nowhere.
        let _ = size_tx.send((120, 40));
        assert_eq!(surface.fit_count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn dropped_shutdown_sender_stops_the_coordinator() {
        let surface = RecordingSurface::new();
        let (_size_tx, size_rx) = watch::channel((80, 24));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let task = ResizeCoordinator::spawn(surface.clone(), size_rx, shutdown_rx);
        drop(shutdown_tx);

        tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .expect("coordinator kept running without a shutdown sender")
            .unwrap();
    }
}
