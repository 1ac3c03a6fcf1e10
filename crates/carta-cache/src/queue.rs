//! Deferred invalidation queue.
//!
//! Cascade fan-out work (multi-key deletes, dependency-set bookkeeping) is
//! dispatched here instead of blocking the request that triggered it. The
//! primary entity write always happens synchronously in the repository; only
//! the ancestor/collection cleanup goes through the queue, with entry TTL as
//! the consistency backstop if the process dies with work pending.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info, warn};

use crate::backend::KvBackend;
use crate::health::BackendHealth;

/// Unit of deferred work.
#[derive(Debug)]
pub(crate) enum InvalidationJob {
    /// Borra todas las keys listadas
    DeleteKeys(Vec<String>),
    /// Saca un member de un dependency set
    RemoveMember { set_key: String, member: String },
    /// Marca de drenado para tests
    Notify(oneshot::Sender<()>),
}

/// Handle for controlling the running invalidation worker.
pub struct QueueHandle {
    shutdown_tx: watch::Sender<bool>,
}

impl QueueHandle {
    /// Signals the worker to stop.
    pub fn stop(&self) {
        let _ = self.shutdown_tx.send(true);
    }
}

impl Drop for QueueHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Sender half used by the repository.
#[derive(Clone)]
pub(crate) struct InvalidationQueue {
    tx: mpsc::UnboundedSender<InvalidationJob>,
}

impl InvalidationQueue {
    /// Encola un borrado multi-key.
    pub(crate) fn delete_keys(&self, keys: Vec<String>) {
        if self.tx.send(InvalidationJob::DeleteKeys(keys)).is_err() {
            warn!("invalidation worker is gone, dropping delete job");
        }
    }

    /// Encola la baja de un member en un dependency set.
    pub(crate) fn remove_member(&self, set_key: String, member: String) {
        let job = InvalidationJob::RemoveMember { set_key, member };
        if self.tx.send(job).is_err() {
            warn!("invalidation worker is gone, dropping srem job");
        }
    }

    /// Waits until every job enqueued before this call has been processed.
    pub(crate) async fn drain(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        if self.tx.send(InvalidationJob::Notify(done_tx)).is_ok() {
            let _ = done_rx.await;
        }
    }
}

/// Spawns the worker task and returns the queue plus its control handle.
pub(crate) fn start(
    backend: Arc<dyn KvBackend>,
    health: Arc<BackendHealth>,
) -> (InvalidationQueue, QueueHandle) {
    let (tx, rx) = mpsc::unbounded_channel();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    tokio::spawn(run(rx, shutdown_rx, backend, health));

    (InvalidationQueue { tx }, QueueHandle { shutdown_tx })
}

async fn run(
    mut rx: mpsc::UnboundedReceiver<InvalidationJob>,
    mut shutdown_rx: watch::Receiver<bool>,
    backend: Arc<dyn KvBackend>,
    health: Arc<BackendHealth>,
) {
    info!("Invalidation worker started");

    loop {
        tokio::select! {
            job = rx.recv() => {
                match job {
                    Some(job) => process(&*backend, &health, job).await,
                    None => {
                        debug!("Invalidation queue closed");
                        break;
                    },
                }
            }
            result = shutdown_rx.changed() => {
                if result.is_err() || *shutdown_rx.borrow() {
                    info!("Invalidation worker shutting down");
                    break;
                }
            }
        }
    }
}

async fn process(backend: &dyn KvBackend, health: &BackendHealth, job: InvalidationJob) {
    match job {
        InvalidationJob::DeleteKeys(keys) => {
            debug!(count = keys.len(), "Invalidating cache keys");
            if let Err(e) = backend.delete(&keys).await {
                // El TTL de las entries hace de backstop
                health.mark_disconnected();
                warn!(error = %e, "Deferred invalidation failed, relying on TTL expiry");
            }
        },
        InvalidationJob::RemoveMember { set_key, member } => {
            if let Err(e) = backend.srem(&set_key, &member).await {
                health.mark_disconnected();
                warn!(error = %e, set_key = %set_key, "Deferred set removal failed");
            }
        },
        InvalidationJob::Notify(done) => {
            let _ = done.send(());
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryKv;
    use std::time::Duration;

    #[tokio::test]
    async fn test_worker_processes_deletes() {
        let kv = Arc::new(MemoryKv::new());
        kv.set("a", "1".to_string(), Duration::from_secs(60))
            .await
            .unwrap();
        kv.set("b", "2".to_string(), Duration::from_secs(60))
            .await
            .unwrap();

        let health = Arc::new(BackendHealth::new());
        let (queue, _handle) = start(kv.clone(), health);

        queue.delete_keys(vec!["a".to_string(), "b".to_string()]);
        queue.drain().await;

        assert_eq!(kv.get("a").await.unwrap(), None);
        assert_eq!(kv.get("b").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_worker_processes_member_removals() {
        let kv = Arc::new(MemoryKv::new());
        kv.sadd("deps:menu_1", "submenu_a").await.unwrap();

        let health = Arc::new(BackendHealth::new());
        let (queue, _handle) = start(kv.clone(), health);

        queue.remove_member("deps:menu_1".to_string(), "submenu_a".to_string());
        queue.drain().await;

        assert!(kv.smembers("deps:menu_1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_job_marks_backend_unhealthy() {
        let kv = Arc::new(MemoryKv::new());
        let health = Arc::new(BackendHealth::new());
        assert!(health.take_disconnected());

        let (queue, _handle) = start(kv.clone(), health.clone());

        kv.set_failing(true);
        queue.delete_keys(vec!["a".to_string()]);
        queue.drain().await;

        assert!(health.is_disconnected());
    }

    #[tokio::test]
    async fn test_handle_stop_ends_worker() {
        let kv = Arc::new(MemoryKv::new());
        let health = Arc::new(BackendHealth::new());
        let (queue, handle) = start(kv, health);

        handle.stop();
        // Tras el stop el drain no debe colgarse aunque el worker ya no lea
        tokio::time::timeout(Duration::from_secs(1), queue.drain())
            .await
            .expect("drain should resolve after shutdown");
    }
}
