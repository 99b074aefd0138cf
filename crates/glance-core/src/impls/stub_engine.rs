//! StubEngine - 開発・テスト用の VisionEngine 実装
//!
//! 本物のモデルなしで配線とライフサイクルを確認するためのもの:
//! - 決定的な出力（operation とバイト数を返すだけ）
//! - load/run/release の失敗を注入できる
//! - load 回数と実行順を記録する（single-flight / FIFO の検証に使う）

use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{ImagePayload, Operation};
use crate::ports::{EngineError, EngineSession, VisionEngine};

#[derive(Debug, Default)]
struct StubShared {
    loads: AtomicUsize,
    remaining_load_failures: AtomicU32,
    remaining_run_failures: AtomicU32,
    remaining_release_failures: AtomicU32,
    observed: Mutex<Vec<String>>,
}

/// Deterministic engine standing in for a real inference backend.
pub struct StubEngine {
    model_id: String,
    shared: Arc<StubShared>,
}

impl StubEngine {
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
            shared: Arc::new(StubShared::default()),
        }
    }

    /// Fail the next `n` load attempts.
    pub fn with_load_failures(self, n: u32) -> Self {
        self.shared.remaining_load_failures.store(n, Ordering::Relaxed);
        self
    }

    /// Fail the next `n` run attempts.
    pub fn with_run_failures(self, n: u32) -> Self {
        self.shared.remaining_run_failures.store(n, Ordering::Relaxed);
        self
    }

    /// Fail the next `n` release attempts.
    pub fn with_release_failures(self, n: u32) -> Self {
        self.shared.remaining_release_failures.store(n, Ordering::Relaxed);
        self
    }

    /// How many times `load` has succeeded.
    pub fn loads(&self) -> usize {
        self.shared.loads.load(Ordering::Relaxed)
    }

    /// Operation selectors in the order the engine ran them.
    pub fn observed(&self) -> Vec<String> {
        self.shared.observed.lock().expect("stub state poisoned").clone()
    }
}

fn take_failure(counter: &AtomicU32) -> bool {
    // fetch_update so concurrent callers cannot consume the same failure
    counter
        .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1))
        .is_ok()
}

#[async_trait]
impl VisionEngine for StubEngine {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn load(&self) -> Result<Box<dyn EngineSession>, EngineError> {
        if take_failure(&self.shared.remaining_load_failures) {
            return Err(EngineError::new("injected load failure"));
        }
        self.shared.loads.fetch_add(1, Ordering::Relaxed);
        Ok(Box::new(StubSession {
            shared: Arc::clone(&self.shared),
        }))
    }
}

struct StubSession {
    shared: Arc<StubShared>,
}

#[async_trait]
impl EngineSession for StubSession {
    async fn run(
        &mut self,
        operation: &Operation,
        image: &ImagePayload,
    ) -> Result<String, EngineError> {
        self.shared
            .observed
            .lock()
            .expect("stub state poisoned")
            .push(operation.as_str().to_string());
        if take_failure(&self.shared.remaining_run_failures) {
            return Err(EngineError::new("injected run failure"));
        }
        Ok(format!("{} ({} bytes)", operation, image.len()))
    }

    async fn release(&mut self) -> Result<(), EngineError> {
        if take_failure(&self.shared.remaining_release_failures) {
            return Err(EngineError::new("injected release failure"));
        }
        Ok(())
    }
}
