//! Relationship Edge - A directed connection between two entity nodes
//!
//! Edges are stored and retrievable but the extraction pipeline never
//! creates them: relation extraction is reserved for collaborators
//! outside this crate. The asymmetry is deliberate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// RELATIONSHIP TYPES
// ============================================================================

/// Known relationship types
///
/// Open-ended like [`super::EntityType`]: records carry the raw string,
/// so collaborator-defined types pass through unchanged.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipType {
    /// Subject experienced the target (an emotion, an event)
    Experienced,
    /// Source caused the target
    Caused,
    /// Source triggers the target
    Triggers,
    /// Subject enjoys the target
    Enjoys,
    /// Subject avoids the target
    Avoids,
    /// Generic association
    RelatedTo,
    /// Employment relationship
    WorksAt,
    /// Residence relationship
    LivesIn,
}

impl RelationshipType {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipType::Experienced => "experienced",
            RelationshipType::Caused => "caused",
            RelationshipType::Triggers => "triggers",
            RelationshipType::Enjoys => "enjoys",
            RelationshipType::Avoids => "avoids",
            RelationshipType::RelatedTo => "related_to",
            RelationshipType::WorksAt => "works_at",
            RelationshipType::LivesIn => "lives_in",
        }
    }

    /// Parse from string name, `None` for values outside the known set
    pub fn parse_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "experienced" => Some(RelationshipType::Experienced),
            "caused" => Some(RelationshipType::Caused),
            "triggers" => Some(RelationshipType::Triggers),
            "enjoys" => Some(RelationshipType::Enjoys),
            "avoids" => Some(RelationshipType::Avoids),
            "related_to" | "relatedto" => Some(RelationshipType::RelatedTo),
            "works_at" | "worksat" => Some(RelationshipType::WorksAt),
            "lives_in" | "livesin" => Some(RelationshipType::LivesIn),
            _ => None,
        }
    }
}

impl std::fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// RELATIONSHIP EDGE
// ============================================================================

/// A directed relationship between two entity nodes of the same profile
#[non_exhaustive]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipEdge {
    /// Unique identifier (UUID v4)
    pub id: String,
    /// Owning profile; must match both endpoint nodes
    pub profile_id: String,
    /// Source node id
    pub source_node_id: String,
    /// Target node id
    pub target_node_id: String,
    /// Type of relationship (experienced, caused, triggers, ...)
    pub relationship_type: String,
    /// Open string-keyed properties, default empty
    pub properties: BTreeMap<String, String>,
    /// Confidence in the relationship, default 1.0
    pub confidence: f64,
    /// When the edge was created, set once
    pub created_at: DateTime<Utc>,
    /// When the edge was last updated
    pub last_updated: DateTime<Utc>,
}

impl RelationshipEdge {
    /// Parsed relationship type, `None` for open values outside the known set
    pub fn get_relationship_type(&self) -> Option<RelationshipType> {
        RelationshipType::parse_name(&self.relationship_type)
    }
}

/// Input for creating a relationship edge
///
/// Only collaborators outside this crate build edges today; the
/// extraction pipeline stores nodes exclusively.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewEdge {
    /// Owning profile
    pub profile_id: String,
    /// Source node id, must exist under the same profile
    pub source_node_id: String,
    /// Target node id, must exist under the same profile
    pub target_node_id: String,
    /// Type of relationship
    pub relationship_type: String,
    /// Open string-keyed properties
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
    /// Confidence in the relationship
    #[serde(default = "default_confidence")]
    pub confidence: f64,
}

fn default_confidence() -> f64 {
    1.0
}

// ============================================================================
// TESTS
// ============================================================================
