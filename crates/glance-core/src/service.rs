//! VisionService - wiring and the request admission path.
//!
//! Owns the validation boundary and the FIFO queue, and spawns the two
//! long-lived tasks (worker, reaper). Task lifetimes are tied to service
//! startup/shutdown via `ServiceTasks`, not to individual requests.
//!
//! # Admission path（withResource より手前の部分）
//! 1. operation selector を allow-list で検証（モデルには触れない）
//! 2. payload をデコード（同上）
//! 3. envelope を enqueue、completion handle を await

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::info;

use crate::config::ServiceConfig;
use crate::domain::{CompletionHandle, OperationSet, RequestEnvelope};
use crate::error::GlanceError;
use crate::impls::Base64Codec;
use crate::manager::ModelManager;
use crate::ports::{Clock, PayloadCodec, SystemClock, VisionEngine};
use crate::queue::RequestQueue;
use crate::{reaper, worker};

pub struct VisionService {
    operations: OperationSet,
    codec: Arc<dyn PayloadCodec>,
    queue: RequestQueue,
    manager: Arc<ModelManager>,
}

impl VisionService {
    /// Spawn with production defaults (system clock, base64 payloads).
    pub fn spawn(config: ServiceConfig, engine: Arc<dyn VisionEngine>) -> (Arc<Self>, ServiceTasks) {
        Self::spawn_with(config, engine, Arc::new(Base64Codec), Arc::new(SystemClock))
    }

    /// Spawn with explicit ports. Tests use this to control time and decode.
    pub fn spawn_with(
        config: ServiceConfig,
        engine: Arc<dyn VisionEngine>,
        codec: Arc<dyn PayloadCodec>,
        clock: Arc<dyn Clock>,
    ) -> (Arc<Self>, ServiceTasks) {
        let manager = Arc::new(ModelManager::new(engine, clock));
        let (queue, requests) = RequestQueue::new(config.queue_depth);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let worker = tokio::spawn(worker::run(
            requests,
            Arc::clone(&manager),
            shutdown_rx.clone(),
        ));
        let reaper = tokio::spawn(reaper::run(
            Arc::clone(&manager),
            config.idle_threshold,
            config.reaper_interval,
            shutdown_rx,
        ));
        info!(
            model = manager.model_id(),
            idle_threshold_secs = config.idle_threshold.as_secs(),
            queue_depth = config.queue_depth,
            "vision service started"
        );

        let service = Arc::new(Self {
            operations: OperationSet::new(config.operations),
            codec,
            queue,
            manager,
        });
        (
            service,
            ServiceTasks {
                shutdown_tx,
                joins: vec![worker, reaper],
            },
        )
    }

    /// Validate, decode, enqueue, await. All per-request errors come back
    /// through here; nothing is delivered out of band.
    pub async fn process(&self, operation: &str, payload: &str) -> Result<String, GlanceError> {
        let Some(operation) = self.operations.resolve(operation) else {
            return Err(GlanceError::InvalidOperation);
        };
        let image = self
            .codec
            .decode(payload)
            .map_err(|e| GlanceError::InvalidPayload(e.to_string()))?;

        let (reply, rx) = CompletionHandle::channel();
        self.queue
            .enqueue(RequestEnvelope::new(operation, image, reply))?;
        rx.await
            .map_err(|_| GlanceError::Internal("request dropped before completion".to_string()))?
    }

    pub fn operations(&self) -> &OperationSet {
        &self.operations
    }

    pub fn model_id(&self) -> &str {
        self.manager.model_id()
    }

    pub async fn model_loaded(&self) -> bool {
        self.manager.is_loaded().await
    }
}

/// Handles for the service's background tasks.
/// - `request_shutdown` stops taking new work but does not abort an
///   in-flight invocation
/// - `shutdown_and_join` waits for both loops to exit
pub struct ServiceTasks {
    shutdown_tx: watch::Sender<bool>,
    joins: Vec<JoinHandle<()>>,
}

impl ServiceTasks {
    pub fn request_shutdown(&self) {
        // ignore send error: receivers may already be dropped
        let _ = self.shutdown_tx.send(true);
    }

    pub async fn shutdown_and_join(self) {
        self.request_shutdown();
        for join in self.joins {
            let _ = join.await;
        }
    }
}
