//! # Mindful Core
//!
//! Personal-memory engine for a conversational wellness companion.
//! Turns free-text user utterances into a durable, queryable graph of
//! entities and relationships, retrieves relevant fragments of that
//! graph to ground future replies, tracks a daily-engagement streak,
//! and screens every inbound message for crisis signals before any
//! reply is generated.
//!
//! The crate is invoked in-process by an orchestrator (HTTP layer,
//! prompt builder, LLM client); it has no network surface of its own.
//!
//! ## Components
//!
//! - **Graph store** ([`GraphStore`]): typed entity nodes keyed by
//!   (profile, type, name) with idempotent upsert and
//!   recency/frequency bookkeeping, plus relationship edges populated
//!   by collaborators.
//! - **Extraction pipeline** ([`extraction`]): deterministic,
//!   rule-based entity mining from one conversation turn, dispatched
//!   fire-and-forget through [`ExtractionWorker`].
//! - **Context retrieval** ([`context::build_context`]): bounded
//!   textual digest of recent graph fragments for prompt injection.
//! - **Crisis detector** ([`crisis::classify`]): pure three-tier
//!   keyword classifier with a fixed-priority escalation rule.
//! - **Streak tracker** ([`streak`]): date-arithmetic state machine
//!   for daily-engagement continuity, with lazy decay on profile read.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use mindful_core::{context, crisis, ExtractionJob, ExtractionWorker, GraphStore};
//!
//! let store = Arc::new(GraphStore::new(None)?);
//!
//! // Screen the message before anything else.
//! let assessment = crisis::classify("I had lunch with Sarah and felt happy");
//! assert!(assessment.level.allows_normal_reply());
//!
//! // Ground the reply in recent memory.
//! let memory = context::build_context(&store, "profile-1", "how was my week?");
//!
//! // Mine the turn in the background once the reply is out.
//! let worker = ExtractionWorker::spawn(store.clone());
//! worker.submit(ExtractionJob {
//!     profile_id: "profile-1".into(),
//!     conversation_id: "conv-1".into(),
//!     user_text: "I had lunch with Sarah and felt happy".into(),
//!     reply_text: memory,
//! });
//! ```

#![warn(rustdoc::missing_crate_level_docs)]

// ============================================================================
// MODULES
// ============================================================================

pub mod context;
pub mod crisis;
pub mod extraction;
pub mod graph;
pub mod storage;
pub mod streak;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// Graph types
pub use graph::{
    CrisisLogEntry, EntityNode, EntityType, ExtractionRecord, GraphStats, NewEdge,
    RelationshipEdge, RelationshipType,
};

// Storage layer
pub use storage::{GraphStore, Result, StoreError};

// Crisis screening
pub use crisis::{CrisisAssessment, CrisisLevel};

// Extraction
pub use extraction::{ExtractionJob, ExtractionWorker};

// Streak tracking
pub use streak::{StreakProfile, StreakState};

// ============================================================================
// VERSION INFO
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// PRELUDE
// ============================================================================

/// Convenient imports for common usage
pub mod prelude {
    pub use crate::context::build_context;
    pub use crate::crisis::{classify, CrisisAssessment, CrisisLevel};
    pub use crate::extraction::{ExtractionJob, ExtractionWorker};
    pub use crate::{
        EntityNode, EntityType, GraphStats, GraphStore, NewEdge, RelationshipEdge,
        RelationshipType, Result, StoreError, StreakProfile, StreakState,
    };
}
