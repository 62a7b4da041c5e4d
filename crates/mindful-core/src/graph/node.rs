//! Entity Node - The fundamental unit of personal memory
//!
//! Each node represents one entity observed in the user's messages:
//! a person, an emotion, an activity, and so on. Nodes are keyed by
//! the natural triple (profile, type, name) and carry recency and
//! frequency bookkeeping that the upsert path maintains.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// ENTITY TYPES
// ============================================================================

/// Known entity types
///
/// The set is open-ended: records store the type as a free string, so
/// values outside this enum survive storage and retrieval untouched.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    /// A person in the user's life
    Person,
    /// A discrete event or occasion
    Event,
    /// An emotion the user expressed
    Emotion,
    /// A recurring habit
    Habit,
    /// A goal the user is working toward
    Goal,
    /// Something that provokes a reaction
    Trigger,
    /// A location
    Place,
    /// Something the user did
    Activity,
    /// A hobby or topic of interest
    Interest,
}

impl EntityType {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Person => "person",
            EntityType::Event => "event",
            EntityType::Emotion => "emotion",
            EntityType::Habit => "habit",
            EntityType::Goal => "goal",
            EntityType::Trigger => "trigger",
            EntityType::Place => "place",
            EntityType::Activity => "activity",
            EntityType::Interest => "interest",
        }
    }

    /// Parse from string name, `None` for values outside the known set
    pub fn parse_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "person" => Some(EntityType::Person),
            "event" => Some(EntityType::Event),
            "emotion" => Some(EntityType::Emotion),
            "habit" => Some(EntityType::Habit),
            "goal" => Some(EntityType::Goal),
            "trigger" => Some(EntityType::Trigger),
            "place" => Some(EntityType::Place),
            "activity" => Some(EntityType::Activity),
            "interest" => Some(EntityType::Interest),
            _ => None,
        }
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// ENTITY NODE
// ============================================================================

/// An entity node in the personal-memory graph
///
/// Identity is the natural key (profile, type, name); the surrogate `id`
/// is assigned once at creation and never changes. `mention_count` equals
/// the number of extraction events that produced this key.
#[non_exhaustive]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityNode {
    /// Unique identifier (UUID v4), immutable after creation
    pub id: String,
    /// Owning profile
    pub profile_id: String,
    /// Type of entity (person, emotion, activity, ...), part of the key
    pub entity_type: String,
    /// Entity name as extracted, case-sensitive, part of the key
    pub entity_name: String,
    /// Open string-keyed properties, default empty
    pub properties: BTreeMap<String, String>,
    /// Extraction confidence, default 1.0, never recomputed here
    pub confidence: f64,
    /// First time the entity was observed, set once
    pub first_mentioned: DateTime<Utc>,
    /// Last time the entity was observed, updated on every re-observation
    pub last_mentioned: DateTime<Utc>,
    /// Number of observations, incremented on every re-observation
    pub mention_count: i64,
}

impl EntityNode {
    /// Parsed entity type, `None` for open values outside the known set
    pub fn get_entity_type(&self) -> Option<EntityType> {
        EntityType::parse_name(&self.entity_type)
    }

    /// Whether this node has been observed more than once
    pub fn is_recurring(&self) -> bool {
        self.mention_count > 1
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_type_roundtrip() {
        for entity_type in [
            EntityType::Person,
            EntityType::Event,
            EntityType::Emotion,
            EntityType::Habit,
            EntityType::Goal,
            EntityType::Trigger,
            EntityType::Place,
            EntityType::Activity,
            EntityType::Interest,
        ] {
            assert_eq!(EntityType::parse_name(entity_type.as_str()), Some(entity_type));
        }
    }

    #[test]
    fn test_entity_type_open_set() {
        // Unknown type names are not an error at the type layer; records
        // store the raw string and the parse simply yields None.
        assert_eq!(EntityType::parse_name("medication"), None);
    }
}
