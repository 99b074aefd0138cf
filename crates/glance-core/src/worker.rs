//! Worker - the single consumer loop.
//!
//! Drains the queue strictly in order and pushes every invocation through
//! `ModelManager::invoke`. One worker + FIFO channel + one lock means start
//! order, and therefore completion order, equals arrival order.
//!
//! A failure while processing one envelope is attached to that envelope's
//! completion handle only; it never terminates this loop.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tracing::{debug, warn};

use crate::domain::RequestEnvelope;
use crate::manager::ModelManager;

pub async fn run(
    mut requests: mpsc::Receiver<RequestEnvelope>,
    manager: Arc<ModelManager>,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        if *shutdown.borrow() {
            break;
        }

        let envelope = tokio::select! {
            changed = shutdown.changed() => {
                if changed.is_err() {
                    break; // shutdown sender gone
                }
                continue;
            }
            env = requests.recv() => match env {
                Some(env) => env,
                None => break, // all producers dropped
            },
        };

        let (operation, image, reply) = envelope.into_parts();

        // Cancellation check before the invocation starts. Queued-then-
        // abandoned requests must not trigger a model load.
        if reply.is_abandoned() {
            debug!(operation = %operation, "caller gone before start, skipping");
            continue;
        }

        let result = manager.invoke(&operation, &image).await;
        if let Err(err) = &result {
            warn!(operation = %operation, error = %err, "request failed");
        }
        reply.resolve(result);
    }
}
