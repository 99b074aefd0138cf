//! ModelManager - model lifecycle + total invocation serialization.
//!
//! # Locking discipline
//! 1つの `tokio::sync::Mutex` がライフサイクル状態と実行の両方を守る。
//! session は並行実行に耐えない（mutable execution state を持つ）ので、
//! ロックは invocation の間ずっと保持する。lock 越しの await は意図的:
//! スループットより正しさの単純さを取る。
//!
//! # State machine
//! `Unloaded --load ok--> Ready --idle > threshold--> Unloaded`
//! `Unloaded --load err--> Unloaded` (retryable)
//! Other transitions do not exist. A release failure during eviction keeps
//! the state Ready rather than guessing the session is safely gone.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::Mutex;
use tracing::info;

use crate::domain::{ImagePayload, Operation};
use crate::error::GlanceError;
use crate::ports::{Clock, EngineSession, VisionEngine};

enum ModelState {
    Unloaded,
    Ready {
        session: Box<dyn EngineSession>,
        /// Meaningful only while Ready; non-decreasing until unload.
        last_used_at: DateTime<Utc>,
    },
}

pub struct ModelManager {
    engine: Arc<dyn VisionEngine>,
    clock: Arc<dyn Clock>,
    state: Mutex<ModelState>,
}

impl ModelManager {
    pub fn new(engine: Arc<dyn VisionEngine>, clock: Arc<dyn Clock>) -> Self {
        Self {
            engine,
            clock,
            state: Mutex::new(ModelState::Unloaded),
        }
    }

    pub fn model_id(&self) -> &str {
        self.engine.model_id()
    }

    pub async fn is_loaded(&self) -> bool {
        matches!(*self.state.lock().await, ModelState::Ready { .. })
    }

    /// Load the model if it is not loaded yet. Idempotent under the lock:
    /// concurrent callers see exactly one load.
    pub async fn ensure_loaded(&self) -> Result<(), GlanceError> {
        let mut state = self.state.lock().await;
        self.load_if_unloaded(&mut state).await
    }

    /// Scoped acquisition: lock, load on demand, stamp `last_used_at`, run
    /// the opaque operation. The lock is released on every exit path by
    /// guard drop (success, failure, or cancellation mid-await).
    pub async fn invoke(
        &self,
        operation: &Operation,
        image: &ImagePayload,
    ) -> Result<String, GlanceError> {
        let mut state = self.state.lock().await;
        self.load_if_unloaded(&mut state).await?;

        let ModelState::Ready {
            session,
            last_used_at,
        } = &mut *state
        else {
            return Err(GlanceError::Internal("model state out of sync".to_string()));
        };

        *last_used_at = self.clock.now();
        session
            .run(operation, image)
            .await
            .map_err(|e| GlanceError::Operation(e.to_string()))
    }

    /// Unload the model when it has been idle strictly longer than
    /// `threshold`. Returns whether an unload happened. Never runs
    /// concurrently with an invocation; both contend for the same lock.
    ///
    /// On a release failure the state stays Ready and the error is returned
    /// so the caller can log it; a later tick will retry.
    pub async fn evict_if_idle(&self, threshold: Duration) -> Result<bool, GlanceError> {
        let mut state = self.state.lock().await;
        let ModelState::Ready {
            session,
            last_used_at,
        } = &mut *state
        else {
            return Ok(false);
        };

        let idle = self.clock.now().signed_duration_since(*last_used_at);
        if idle <= TimeDelta::from_std(threshold).unwrap_or(TimeDelta::MAX) {
            return Ok(false);
        }

        session
            .release()
            .await
            .map_err(|e| GlanceError::Internal(format!("model release failed: {e}")))?;
        *state = ModelState::Unloaded;
        info!(model = self.engine.model_id(), "model unloaded after idle timeout");
        Ok(true)
    }

    async fn load_if_unloaded(&self, state: &mut ModelState) -> Result<(), GlanceError> {
        if let ModelState::Ready { .. } = state {
            return Ok(());
        }
        // Load failure leaves the state Unloaded so the next call retries.
        let session = self
            .engine
            .load()
            .await
            .map_err(|e| GlanceError::Initialization(e.to_string()))?;
        *state = ModelState::Ready {
            session,
            last_used_at: self.clock.now(),
        };
        info!(model = self.engine.model_id(), "model loaded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impls::StubEngine;
    use crate::ports::ManualClock;

    const THRESHOLD: Duration = Duration::from_secs(300);

    fn manager(engine: &Arc<StubEngine>, clock: &Arc<ManualClock>) -> ModelManager {
        ModelManager::new(
            Arc::clone(engine) as Arc<dyn VisionEngine>,
            Arc::clone(clock) as Arc<dyn Clock>,
        )
    }

    fn fixtures() -> (Arc<StubEngine>, Arc<ManualClock>) {
        (
            Arc::new(StubEngine::new("stub-model")),
            Arc::new(ManualClock::starting_at(Utc::now())),
        )
    }

    fn caption() -> Operation {
        Operation::new("<CAPTION>")
    }

    fn image() -> ImagePayload {
        ImagePayload::new(vec![1, 2, 3])
    }

    #[tokio::test]
    async fn loads_lazily_and_only_once() {
        let (engine, clock) = fixtures();
        let mgr = manager(&engine, &clock);

        assert!(!mgr.is_loaded().await);
        mgr.invoke(&caption(), &image()).await.unwrap();
        mgr.invoke(&caption(), &image()).await.unwrap();

        assert!(mgr.is_loaded().await);
        assert_eq!(engine.loads(), 1);
    }

    #[tokio::test]
    async fn concurrent_invokes_share_one_load() {
        let (engine, clock) = fixtures();
        let mgr = Arc::new(manager(&engine, &clock));

        let mut joins = Vec::new();
        for _ in 0..8 {
            let mgr = Arc::clone(&mgr);
            joins.push(tokio::spawn(async move {
                mgr.invoke(&caption(), &image()).await
            }));
        }
        for join in joins {
            join.await.unwrap().unwrap();
        }

        assert_eq!(engine.loads(), 1);
    }

    #[tokio::test]
    async fn failed_load_stays_unloaded_and_retries() {
        let clock = Arc::new(ManualClock::starting_at(Utc::now()));
        let engine = Arc::new(StubEngine::new("stub-model").with_load_failures(1));
        let mgr = manager(&engine, &clock);

        let err = mgr.invoke(&caption(), &image()).await.unwrap_err();
        assert!(matches!(err, GlanceError::Initialization(_)));
        assert!(!mgr.is_loaded().await);

        // Next call retries the load and succeeds.
        mgr.invoke(&caption(), &image()).await.unwrap();
        assert_eq!(engine.loads(), 1);
    }

    #[tokio::test]
    async fn evicts_only_strictly_past_threshold() {
        let (engine, clock) = fixtures();
        let mgr = manager(&engine, &clock);
        mgr.invoke(&caption(), &image()).await.unwrap();

        clock.advance(TimeDelta::seconds(300));
        assert!(!mgr.evict_if_idle(THRESHOLD).await.unwrap()); // idle == threshold
        assert!(mgr.is_loaded().await);

        clock.advance(TimeDelta::seconds(1));
        assert!(mgr.evict_if_idle(THRESHOLD).await.unwrap());
        assert!(!mgr.is_loaded().await);
    }

    #[tokio::test]
    async fn invocation_refreshes_idle_clock() {
        let (engine, clock) = fixtures();
        let mgr = manager(&engine, &clock);
        mgr.invoke(&caption(), &image()).await.unwrap();

        clock.advance_secs(200);
        mgr.invoke(&caption(), &image()).await.unwrap();

        clock.advance_secs(200);
        assert!(!mgr.evict_if_idle(THRESHOLD).await.unwrap()); // only 200s idle
        clock.advance_secs(101);
        assert!(mgr.evict_if_idle(THRESHOLD).await.unwrap());
    }

    #[tokio::test]
    async fn evict_on_unloaded_is_a_noop() {
        let (engine, clock) = fixtures();
        let mgr = manager(&engine, &clock);
        assert!(!mgr.evict_if_idle(THRESHOLD).await.unwrap());
        assert_eq!(engine.loads(), 0);
    }

    #[tokio::test]
    async fn release_failure_keeps_model_loaded() {
        let clock = Arc::new(ManualClock::starting_at(Utc::now()));
        let engine = Arc::new(StubEngine::new("stub-model").with_release_failures(1));
        let mgr = manager(&engine, &clock);
        mgr.invoke(&caption(), &image()).await.unwrap();

        clock.advance_secs(301);
        assert!(mgr.evict_if_idle(THRESHOLD).await.is_err());
        assert!(mgr.is_loaded().await); // conservative: unknown state counts as Ready

        // A later tick retries and succeeds.
        assert!(mgr.evict_if_idle(THRESHOLD).await.unwrap());
        assert!(!mgr.is_loaded().await);
    }

    #[tokio::test]
    async fn run_failure_keeps_model_loaded() {
        let clock = Arc::new(ManualClock::starting_at(Utc::now()));
        let engine = Arc::new(StubEngine::new("stub-model").with_run_failures(1));
        let mgr = manager(&engine, &clock);

        let err = mgr.invoke(&caption(), &image()).await.unwrap_err();
        assert!(matches!(err, GlanceError::Operation(_)));
        assert!(mgr.is_loaded().await);

        mgr.invoke(&caption(), &image()).await.unwrap();
        assert_eq!(engine.loads(), 1);
    }
}
