//! Graph module - Core types for the personal-memory graph
//!
//! Defines the data model the rest of the crate operates on:
//! - Entity nodes keyed by (profile, type, name)
//! - Relationship edges between nodes (collaborator-populated)
//! - Append-only audit records for extraction and crisis events
//! - Aggregate statistics for external surfaces

mod edge;
mod node;

pub use edge::{NewEdge, RelationshipEdge, RelationshipType};
pub use node::{EntityNode, EntityType};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// AUDIT RECORDS
// ============================================================================

/// Append-only audit record of one extraction event
///
/// Never updated or deleted. `edge_ids` is always empty today: the
/// extraction pipeline stores nodes only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionRecord {
    /// Unique identifier (UUID v4)
    pub id: String,
    /// Owning profile
    pub profile_id: String,
    /// Conversation the mined message belongs to
    pub conversation_id: String,
    /// Full source message text
    pub message: String,
    /// Ids of nodes produced by this extraction event
    pub node_ids: Vec<String>,
    /// Ids of edges produced (currently always empty)
    pub edge_ids: Vec<String>,
    /// When the extraction ran
    pub created_at: DateTime<Utc>,
}

/// Append-only audit record of one medium/high crisis detection
///
/// The stored message is bounded to 500 characters for privacy.
/// Write-only from this crate; never read back by the core.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrisisLogEntry {
    /// Unique identifier (UUID v4)
    pub id: String,
    /// Owning profile
    pub profile_id: String,
    /// Truncated message text (at most 500 characters)
    pub message: String,
    /// Classified risk level
    pub risk_level: String,
    /// Keywords that matched, in tier order
    pub matched_keywords: Vec<String>,
    /// Whether a human/collaborator has handled the event
    pub handled: bool,
    /// When the detection happened
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// GRAPH STATISTICS
// ============================================================================

/// Aggregate statistics over one profile's memory graph
///
/// Read-only surface for external collaborators (dashboards, insight
/// endpoints); nothing in this crate consumes it.
#[non_exhaustive]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphStats {
    /// Total number of entity nodes
    pub total_nodes: i64,
    /// Total number of relationship edges
    pub total_edges: i64,
    /// Node counts grouped by entity type
    pub nodes_by_type: BTreeMap<String, i64>,
    /// Edge counts grouped by relationship type
    pub edges_by_type: BTreeMap<String, i64>,
}
