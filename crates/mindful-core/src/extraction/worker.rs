//! Background extraction worker
//!
//! Extraction runs after a reply is computed and must not add latency
//! to the conversation turn, so jobs are handed to a worker task over
//! an unbounded channel and the submitter never waits. Failures are
//! captured and logged by the worker; nothing propagates back.
//!
//! No ordering guarantee exists between the background extraction of
//! turn N and the context retrieval of turn N+1: a fast-following
//! message may not yet see entities mined from the previous one. That
//! staleness is accepted.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::storage::GraphStore;

/// One queued extraction request: a full conversation turn
#[derive(Debug, Clone)]
pub struct ExtractionJob {
    /// Owning profile
    pub profile_id: String,
    /// Conversation the turn belongs to
    pub conversation_id: String,
    /// Raw user message, the mined text
    pub user_text: String,
    /// The AI's reply; logged for audit symmetry, not mined
    pub reply_text: String,
}

/// Fire-and-forget worker that drains extraction jobs sequentially
pub struct ExtractionWorker {
    tx: mpsc::UnboundedSender<ExtractionJob>,
    handle: JoinHandle<()>,
}

impl ExtractionWorker {
    /// Spawn the worker loop on the current tokio runtime
    pub fn spawn(store: Arc<GraphStore>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<ExtractionJob>();

        let handle = tokio::spawn(async move {
            while let Some(job) = rx.recv().await {
                if let Err(e) = super::run_extraction(&store, &job) {
                    tracing::warn!(
                        profile_id = %job.profile_id,
                        conversation_id = %job.conversation_id,
                        error = %e,
                        "Extraction failed; turn unaffected"
                    );
                }
            }
            tracing::debug!("Extraction worker stopped");
        });

        Self { tx, handle }
    }

    /// Queue one job. Never blocks and never fails the caller; if the
    /// worker is gone the job is dropped with a warning.
    pub fn submit(&self, job: ExtractionJob) {
        if self.tx.send(job).is_err() {
            tracing::warn!("Extraction worker unavailable; dropping job");
        }
    }

    /// Close the queue and wait for in-flight jobs to finish
    pub async fn shutdown(self) {
        drop(self.tx);
        let _ = self.handle.await;
    }
}

// ============================================================================
// TESTS
// ============================================================================
