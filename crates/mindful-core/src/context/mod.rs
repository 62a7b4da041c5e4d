//! Context Retrieval - Bounded textual digest of the memory graph
//!
//! Ranks recent graph fragments and formats them into a single string
//! the prompt builder injects before reply generation. Retrieval is
//! recency/frequency-based; the triggering message is accepted for
//! interface stability but not used to filter. A lossy, best-effort
//! summarizer: it never fails the caller.

use crate::graph::{EntityNode, RelationshipEdge};
use crate::storage::{GraphStore, Result};

/// Sentinel for a profile with no stored entities; the prompt layer
/// recognizes this as "no memory".
pub const NO_CONTEXT: &str = "No previous context available.";

/// Sentinel for a profile with entities but nothing worth surfacing
/// (no recurring entities, no resolvable connections).
pub const NO_SPECIFIC_CONTEXT: &str = "No specific context available.";

/// Sentinel returned when retrieval itself failed.
pub const CONTEXT_UNAVAILABLE: &str = "Context retrieval unavailable.";

/// How many recently mentioned nodes to consider
const NODE_WINDOW: i64 = 20;
/// How many recently updated edges to consider
const EDGE_WINDOW: i64 = 15;
/// At most this many entities in the "Key entities" clause
const KEY_ENTITY_CAP: usize = 10;
/// Only the first edges of the window are eligible for the
/// "Recent connections" clause
const CONNECTION_CAP: usize = 5;

/// Build the context string for one profile.
///
/// Any internal error is caught, logged, and mapped to
/// [`CONTEXT_UNAVAILABLE`]; the caller always gets a usable string.
pub fn build_context(store: &GraphStore, profile_id: &str, message: &str) -> String {
    match try_build(store, profile_id, message) {
        Ok(context) => context,
        Err(e) => {
            tracing::warn!(profile_id = %profile_id, error = %e, "Context retrieval failed");
            CONTEXT_UNAVAILABLE.to_string()
        }
    }
}

fn try_build(store: &GraphStore, profile_id: &str, _message: &str) -> Result<String> {
    let nodes = store.recent_nodes(profile_id, NODE_WINDOW)?;
    if nodes.is_empty() {
        return Ok(NO_CONTEXT.to_string());
    }
    let edges = store.recent_edges(profile_id, EDGE_WINDOW)?;

    let mut clauses = Vec::new();
    if let Some(clause) = key_entities_clause(&nodes) {
        clauses.push(clause);
    }
    if let Some(clause) = connections_clause(&nodes, &edges) {
        clauses.push(clause);
    }

    if clauses.is_empty() {
        Ok(NO_SPECIFIC_CONTEXT.to_string())
    } else {
        Ok(clauses.join(" | "))
    }
}

/// Recurring entities (mentioned more than once), most recent first
fn key_entities_clause(nodes: &[EntityNode]) -> Option<String> {
    let entities: Vec<String> = nodes
        .iter()
        .filter(|node| node.mention_count > 1)
        .take(KEY_ENTITY_CAP)
        .map(|node| format!("{} ({})", node.entity_name, node.entity_type))
        .collect();

    if entities.is_empty() {
        None
    } else {
        Some(format!("Key entities: {}", entities.join(", ")))
    }
}

/// Connections among the fetched node window.
///
/// Endpoint names resolve against the 20-node window only; an edge
/// whose endpoint fell outside it is silently dropped, not an error.
fn connections_clause(nodes: &[EntityNode], edges: &[RelationshipEdge]) -> Option<String> {
    let find_name = |id: &str| {
        nodes
            .iter()
            .find(|node| node.id == id)
            .map(|node| node.entity_name.as_str())
    };

    let connections: Vec<String> = edges
        .iter()
        .take(CONNECTION_CAP)
        .filter_map(|edge| {
            let source = find_name(&edge.source_node_id)?;
            let target = find_name(&edge.target_node_id)?;
            Some(format!("{source} {} {target}", edge.relationship_type))
        })
        .collect();

    if connections.is_empty() {
        None
    } else {
        Some(format!("Recent connections: {}", connections.join("; ")))
    }
}

// ============================================================================
// TESTS
// ============================================================================
