//! SQLite Storage Implementation
//!
//! Durable home of the entity graph, the append-only audit logs, and
//! the per-profile streak record. Uses separate reader/writer
//! connections for interior mutability: all methods take `&self`, so
//! callers can share an `Arc<GraphStore>` across tasks without an
//! outer mutex.

use chrono::{DateTime, NaiveDate, Utc};
use directories::ProjectDirs;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Mutex;
use uuid::Uuid;

use crate::crisis::CrisisAssessment;
use crate::graph::{
    CrisisLogEntry, EntityNode, ExtractionRecord, GraphStats, NewEdge, RelationshipEdge,
};
use crate::streak::{self, StreakProfile, StreakState};

/// Crisis audit records keep at most this many characters of the
/// triggering message.
const CRISIS_MESSAGE_LIMIT: usize = 500;

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Storage error type
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    /// Node not found
    #[error("Node not found: {0}")]
    NotFound(String),
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Malformed journal date (expected YYYY-MM-DD)
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    /// Edge references a missing node or one from another profile
    #[error("Invalid edge reference: {0}")]
    InvalidReference(String),
    /// Initialization error
    #[error("Initialization error: {0}")]
    Init(String),
}

/// Storage result type
pub type Result<T> = std::result::Result<T, StoreError>;

// ============================================================================
// GRAPH STORE
// ============================================================================

/// Durable store for entity nodes, relationship edges, audit logs, and
/// streak profiles
///
/// Owns the Node and Edge lifecycles exclusively. There is no delete
/// operation: retention and cleanup belong to collaborators.
pub struct GraphStore {
    writer: Mutex<Connection>,
    reader: Mutex<Connection>,
}

impl GraphStore {
    /// Apply PRAGMAs to a connection
    fn configure_connection(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA temp_store = MEMORY;
             PRAGMA foreign_keys = ON;
             PRAGMA busy_timeout = 5000;",
        )?;
        Ok(())
    }

    /// Create new storage instance
    ///
    /// With no path, the database lands in the platform data directory.
    pub fn new(db_path: Option<PathBuf>) -> Result<Self> {
        let path = match db_path {
            Some(p) => p,
            None => {
                let proj_dirs = ProjectDirs::from("com", "mindfulme", "core").ok_or_else(|| {
                    StoreError::Init("Could not determine project directories".to_string())
                })?;

                let data_dir = proj_dirs.data_dir();
                std::fs::create_dir_all(data_dir)?;
                // Restrict directory permissions to owner-only on Unix
                #[cfg(unix)]
                {
                    use std::os::unix::fs::PermissionsExt;
                    let perms = std::fs::Permissions::from_mode(0o700);
                    let _ = std::fs::set_permissions(data_dir, perms);
                }
                data_dir.join("mindful.db")
            }
        };

        let writer_conn = Connection::open(&path)?;

        #[cfg(unix)]
        if path.exists() {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            let _ = std::fs::set_permissions(&path, perms);
        }

        Self::configure_connection(&writer_conn)?;

        // Apply migrations on writer only
        super::migrations::apply_migrations(&writer_conn)?;

        let reader_conn = Connection::open(&path)?;
        Self::configure_connection(&reader_conn)?;

        Ok(Self {
            writer: Mutex::new(writer_conn),
            reader: Mutex::new(reader_conn),
        })
    }

    // ========================================================================
    // ENTITY NODES
    // ========================================================================

    /// Upsert an entity node by its natural key (profile, type, name).
    ///
    /// Absent: created with `mention_count = 1` and both timestamps set
    /// to now. Present: `last_mentioned` advances and `mention_count`
    /// increments in one atomic statement; identity fields and
    /// `first_mentioned` never change. Safe under concurrent calls for
    /// the same key — the unique index makes one creation win and the
    /// rest degrade to the update path.
    pub fn upsert_node(
        &self,
        profile_id: &str,
        entity_type: &str,
        entity_name: &str,
    ) -> Result<EntityNode> {
        let now = Utc::now();
        let id = Uuid::new_v4().to_string();

        {
            let writer = self
                .writer
                .lock()
                .map_err(|_| StoreError::Init("Writer lock poisoned".into()))?;
            writer.execute(
                "INSERT INTO entity_nodes (
                    id, profile_id, entity_type, entity_name,
                    properties, confidence, first_mentioned, last_mentioned, mention_count
                ) VALUES (?1, ?2, ?3, ?4, '{}', 1.0, ?5, ?5, 1)
                ON CONFLICT(profile_id, entity_type, entity_name) DO UPDATE SET
                    last_mentioned = excluded.last_mentioned,
                    mention_count = mention_count + 1",
                params![id, profile_id, entity_type, entity_name, now],
            )?;
        }

        self.find_node(profile_id, entity_type, entity_name)?
            .ok_or_else(|| StoreError::NotFound(format!("{profile_id}/{entity_type}/{entity_name}")))
    }

    /// Look up a node by surrogate id
    pub fn get_node(&self, id: &str) -> Result<Option<EntityNode>> {
        let reader = self
            .reader
            .lock()
            .map_err(|_| StoreError::Init("Reader lock poisoned".into()))?;
        let node = reader
            .query_row(
                "SELECT * FROM entity_nodes WHERE id = ?1",
                params![id],
                Self::row_to_node,
            )
            .optional()?;
        Ok(node)
    }

    /// Look up a node by its natural key
    pub fn find_node(
        &self,
        profile_id: &str,
        entity_type: &str,
        entity_name: &str,
    ) -> Result<Option<EntityNode>> {
        let reader = self
            .reader
            .lock()
            .map_err(|_| StoreError::Init("Reader lock poisoned".into()))?;
        let node = reader
            .query_row(
                "SELECT * FROM entity_nodes
                 WHERE profile_id = ?1 AND entity_type = ?2 AND entity_name = ?3",
                params![profile_id, entity_type, entity_name],
                Self::row_to_node,
            )
            .optional()?;
        Ok(node)
    }

    /// Most recently mentioned nodes for a profile, most recent first.
    /// Ties on `last_mentioned` break toward the later insertion.
    pub fn recent_nodes(&self, profile_id: &str, limit: i64) -> Result<Vec<EntityNode>> {
        let reader = self
            .reader
            .lock()
            .map_err(|_| StoreError::Init("Reader lock poisoned".into()))?;
        let mut stmt = reader.prepare(
            "SELECT * FROM entity_nodes WHERE profile_id = ?1
             ORDER BY last_mentioned DESC, rowid DESC LIMIT ?2",
        )?;
        let rows = stmt.query_map(params![profile_id, limit], Self::row_to_node)?;

        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    /// Node counts grouped by entity type
    pub fn count_nodes_by_type(&self, profile_id: &str) -> Result<BTreeMap<String, i64>> {
        let reader = self
            .reader
            .lock()
            .map_err(|_| StoreError::Init("Reader lock poisoned".into()))?;
        let mut stmt = reader.prepare(
            "SELECT entity_type, COUNT(*) FROM entity_nodes
             WHERE profile_id = ?1 GROUP BY entity_type",
        )?;
        let rows = stmt.query_map(params![profile_id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;

        let mut result = BTreeMap::new();
        for row in rows {
            let (entity_type, count) = row?;
            result.insert(entity_type, count);
        }
        Ok(result)
    }

    // ========================================================================
    // RELATIONSHIP EDGES
    // ========================================================================

    /// Insert a relationship edge.
    ///
    /// Reserved for collaborators: the extraction pipeline never calls
    /// this. Both endpoints must already exist under the edge's profile.
    pub fn insert_edge(&self, input: NewEdge) -> Result<RelationshipEdge> {
        for node_id in [&input.source_node_id, &input.target_node_id] {
            match self.get_node(node_id)? {
                None => return Err(StoreError::InvalidReference(node_id.clone())),
                Some(node) if node.profile_id != input.profile_id => {
                    return Err(StoreError::InvalidReference(format!(
                        "{node_id} belongs to another profile"
                    )));
                }
                Some(_) => {}
            }
        }

        let now = Utc::now();
        let edge = RelationshipEdge {
            id: Uuid::new_v4().to_string(),
            profile_id: input.profile_id,
            source_node_id: input.source_node_id,
            target_node_id: input.target_node_id,
            relationship_type: input.relationship_type,
            properties: input.properties,
            confidence: input.confidence,
            created_at: now,
            last_updated: now,
        };

        let properties_json =
            serde_json::to_string(&edge.properties).unwrap_or_else(|_| "{}".to_string());

        let writer = self
            .writer
            .lock()
            .map_err(|_| StoreError::Init("Writer lock poisoned".into()))?;
        writer.execute(
            "INSERT INTO relationship_edges (
                id, profile_id, source_node_id, target_node_id,
                relationship_type, properties, confidence, created_at, last_updated
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                edge.id,
                edge.profile_id,
                edge.source_node_id,
                edge.target_node_id,
                edge.relationship_type,
                properties_json,
                edge.confidence,
                edge.created_at,
                edge.last_updated,
            ],
        )?;

        Ok(edge)
    }

    /// Most recently updated edges for a profile, most recent first
    pub fn recent_edges(&self, profile_id: &str, limit: i64) -> Result<Vec<RelationshipEdge>> {
        let reader = self
            .reader
            .lock()
            .map_err(|_| StoreError::Init("Reader lock poisoned".into()))?;
        let mut stmt = reader.prepare(
            "SELECT * FROM relationship_edges WHERE profile_id = ?1
             ORDER BY last_updated DESC, rowid DESC LIMIT ?2",
        )?;
        let rows = stmt.query_map(params![profile_id, limit], Self::row_to_edge)?;

        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    /// Edge counts grouped by relationship type
    pub fn count_edges_by_type(&self, profile_id: &str) -> Result<BTreeMap<String, i64>> {
        let reader = self
            .reader
            .lock()
            .map_err(|_| StoreError::Init("Reader lock poisoned".into()))?;
        let mut stmt = reader.prepare(
            "SELECT relationship_type, COUNT(*) FROM relationship_edges
             WHERE profile_id = ?1 GROUP BY relationship_type",
        )?;
        let rows = stmt.query_map(params![profile_id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;

        let mut result = BTreeMap::new();
        for row in rows {
            let (relationship_type, count) = row?;
            result.insert(relationship_type, count);
        }
        Ok(result)
    }

    /// Aggregate statistics for a profile's graph (external surface)
    pub fn get_stats(&self, profile_id: &str) -> Result<GraphStats> {
        let nodes_by_type = self.count_nodes_by_type(profile_id)?;
        let edges_by_type = self.count_edges_by_type(profile_id)?;
        Ok(GraphStats {
            total_nodes: nodes_by_type.values().sum(),
            total_edges: edges_by_type.values().sum(),
            nodes_by_type,
            edges_by_type,
        })
    }

    // ========================================================================
    // AUDIT LOGS
    // ========================================================================

    /// Append one extraction audit record.
    ///
    /// Called once per extraction event, including events that produced
    /// no candidates (empty id lists).
    pub fn append_extraction_record(
        &self,
        profile_id: &str,
        conversation_id: &str,
        message: &str,
        node_ids: Vec<String>,
    ) -> Result<ExtractionRecord> {
        let record = ExtractionRecord {
            id: Uuid::new_v4().to_string(),
            profile_id: profile_id.to_string(),
            conversation_id: conversation_id.to_string(),
            message: message.to_string(),
            node_ids,
            edge_ids: Vec::new(),
            created_at: Utc::now(),
        };

        let node_ids_json =
            serde_json::to_string(&record.node_ids).unwrap_or_else(|_| "[]".to_string());

        let writer = self
            .writer
            .lock()
            .map_err(|_| StoreError::Init("Writer lock poisoned".into()))?;
        writer.execute(
            "INSERT INTO extraction_log (
                id, profile_id, conversation_id, message, node_ids, edge_ids, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, '[]', ?6)",
            params![
                record.id,
                record.profile_id,
                record.conversation_id,
                record.message,
                node_ids_json,
                record.created_at,
            ],
        )?;

        Ok(record)
    }

    /// Append one crisis audit record, truncating the message to 500
    /// characters. Callers fire-and-forget this: a failed audit write
    /// must never suppress the safety reply.
    pub fn append_crisis_log(
        &self,
        profile_id: &str,
        message: &str,
        assessment: &CrisisAssessment,
    ) -> Result<CrisisLogEntry> {
        let truncated: String = message.chars().take(CRISIS_MESSAGE_LIMIT).collect();
        let entry = CrisisLogEntry {
            id: Uuid::new_v4().to_string(),
            profile_id: profile_id.to_string(),
            message: truncated,
            risk_level: assessment.level.as_str().to_string(),
            matched_keywords: assessment.matched_keywords.clone(),
            handled: false,
            created_at: Utc::now(),
        };

        let keywords_json =
            serde_json::to_string(&entry.matched_keywords).unwrap_or_else(|_| "[]".to_string());

        let writer = self
            .writer
            .lock()
            .map_err(|_| StoreError::Init("Writer lock poisoned".into()))?;
        writer.execute(
            "INSERT INTO crisis_log (
                id, profile_id, message, risk_level, matched_keywords, handled, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6)",
            params![
                entry.id,
                entry.profile_id,
                entry.message,
                entry.risk_level,
                keywords_json,
                entry.created_at,
            ],
        )?;

        Ok(entry)
    }

    // ========================================================================
    // STREAK PROFILE
    // ========================================================================

    /// Get the profile record, creating it with zeroed counters on first
    /// access, then apply lazy streak decay as of today.
    ///
    /// Reading can mutate stored state: a streak not extended yesterday
    /// is persisted back as zero here. This read-side coupling stands in
    /// for a scheduled job and is part of the operation's contract.
    pub fn get_or_create_profile(&self, profile_id: &str) -> Result<StreakProfile> {
        self.get_or_create_profile_as_of(profile_id, Utc::now().date_naive())
    }

    /// Clock-injected variant of [`Self::get_or_create_profile`]
    pub fn get_or_create_profile_as_of(
        &self,
        profile_id: &str,
        today: NaiveDate,
    ) -> Result<StreakProfile> {
        self.ensure_profile(profile_id)?;
        let mut profile = self.read_profile(profile_id)?;

        let decayed = streak::apply_decay(&profile.streak, today);
        if decayed != profile.streak {
            let writer = self
                .writer
                .lock()
                .map_err(|_| StoreError::Init("Writer lock poisoned".into()))?;
            writer.execute(
                "UPDATE profiles SET current_streak = ?1 WHERE profile_id = ?2",
                params![decayed.current_streak, profile_id],
            )?;
            profile.streak = decayed;
        }

        Ok(profile)
    }

    /// Record a journal-entry creation for `date` (YYYY-MM-DD) and run
    /// the streak transition. Malformed dates reject the operation.
    ///
    /// Same-day re-entry is a no-op; the caller deduplicates journal
    /// documents per date, and the transition never double-counts.
    pub fn record_journal(&self, profile_id: &str, date: &str) -> Result<StreakState> {
        let parsed = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| StoreError::InvalidDate(date.to_string()))?;
        self.record_journal_on(profile_id, parsed)
    }

    /// Journal-creation transition with an already-parsed date
    pub fn record_journal_on(&self, profile_id: &str, date: NaiveDate) -> Result<StreakState> {
        self.ensure_profile(profile_id)?;
        let profile = self.read_profile(profile_id)?;

        let next = streak::advance(&profile.streak, date);
        if next != profile.streak {
            let writer = self
                .writer
                .lock()
                .map_err(|_| StoreError::Init("Writer lock poisoned".into()))?;
            writer.execute(
                "UPDATE profiles SET
                    current_streak = ?1,
                    longest_streak = ?2,
                    total_journal_days = ?3,
                    last_journal_date = ?4
                 WHERE profile_id = ?5",
                params![
                    next.current_streak,
                    next.longest_streak,
                    next.total_journal_days,
                    next.last_journal_date,
                    profile_id,
                ],
            )?;
        }

        Ok(next)
    }

    /// Replace the collaborator-owned preferences map
    pub fn update_preferences(
        &self,
        profile_id: &str,
        preferences: &BTreeMap<String, serde_json::Value>,
    ) -> Result<StreakProfile> {
        self.ensure_profile(profile_id)?;
        let preferences_json =
            serde_json::to_string(preferences).unwrap_or_else(|_| "{}".to_string());

        {
            let writer = self
                .writer
                .lock()
                .map_err(|_| StoreError::Init("Writer lock poisoned".into()))?;
            writer.execute(
                "UPDATE profiles SET preferences = ?1 WHERE profile_id = ?2",
                params![preferences_json, profile_id],
            )?;
        }

        self.read_profile(profile_id)
    }

    fn ensure_profile(&self, profile_id: &str) -> Result<()> {
        let writer = self
            .writer
            .lock()
            .map_err(|_| StoreError::Init("Writer lock poisoned".into()))?;
        writer.execute(
            "INSERT OR IGNORE INTO profiles (profile_id, created_at) VALUES (?1, ?2)",
            params![profile_id, Utc::now()],
        )?;
        Ok(())
    }

    fn read_profile(&self, profile_id: &str) -> Result<StreakProfile> {
        let reader = self
            .reader
            .lock()
            .map_err(|_| StoreError::Init("Reader lock poisoned".into()))?;
        let profile = reader.query_row(
            "SELECT profile_id, current_streak, longest_streak, total_journal_days,
                    last_journal_date, preferences
             FROM profiles WHERE profile_id = ?1",
            params![profile_id],
            |row| {
                let preferences_json: String = row.get("preferences")?;
                Ok(StreakProfile {
                    profile_id: row.get("profile_id")?,
                    streak: StreakState {
                        current_streak: row.get("current_streak")?,
                        longest_streak: row.get("longest_streak")?,
                        total_journal_days: row.get("total_journal_days")?,
                        last_journal_date: row.get("last_journal_date")?,
                    },
                    preferences: serde_json::from_str(&preferences_json).unwrap_or_default(),
                })
            },
        )?;
        Ok(profile)
    }

    // ========================================================================
    // ROW MAPPING
    // ========================================================================

    fn row_to_node(row: &Row<'_>) -> rusqlite::Result<EntityNode> {
        let properties_json: String = row.get("properties")?;
        Ok(EntityNode {
            id: row.get("id")?,
            profile_id: row.get("profile_id")?,
            entity_type: row.get("entity_type")?,
            entity_name: row.get("entity_name")?,
            properties: serde_json::from_str(&properties_json).unwrap_or_default(),
            confidence: row.get("confidence")?,
            first_mentioned: row.get::<_, DateTime<Utc>>("first_mentioned")?,
            last_mentioned: row.get::<_, DateTime<Utc>>("last_mentioned")?,
            mention_count: row.get("mention_count")?,
        })
    }

    fn row_to_edge(row: &Row<'_>) -> rusqlite::Result<RelationshipEdge> {
        let properties_json: String = row.get("properties")?;
        Ok(RelationshipEdge {
            id: row.get("id")?,
            profile_id: row.get("profile_id")?,
            source_node_id: row.get("source_node_id")?,
            target_node_id: row.get("target_node_id")?,
            relationship_type: row.get("relationship_type")?,
            properties: serde_json::from_str(&properties_json).unwrap_or_default(),
            confidence: row.get("confidence")?,
            created_at: row.get::<_, DateTime<Utc>>("created_at")?,
            last_updated: row.get::<_, DateTime<Utc>>("last_updated")?,
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crisis;
    use chrono::Duration;
    use tempfile::tempdir;

    fn create_test_store() -> GraphStore {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        GraphStore::new(Some(db_path)).unwrap()
    }

    #[test]
    fn test_store_creation() {
        let store = create_test_store();
        let stats = store.get_stats("p1").unwrap();
        assert_eq!(stats.total_nodes, 0);
        assert_eq!(stats.total_edges, 0);
    }

    #[test]
    fn test_upsert_is_idempotent_on_natural_key() {
        let store = create_test_store();

        let first = store.upsert_node("p1", "person", "Sarah").unwrap();
        assert_eq!(first.mention_count, 1);
        assert_eq!(first.first_mentioned, first.last_mentioned);

        let second = store.upsert_node("p1", "person", "Sarah").unwrap();
        assert_eq!(second.id, first.id);
        assert_eq!(second.mention_count, 2);
        assert!(second.last_mentioned >= first.last_mentioned);
        assert_eq!(second.first_mentioned, first.first_mentioned);

        // Still exactly one stored node.
        let nodes = store.recent_nodes("p1", 10).unwrap();
        assert_eq!(nodes.len(), 1);
    }

    #[test]
    fn test_name_collision_across_types_is_distinct() {
        let store = create_test_store();
        let person = store.upsert_node("p1", "person", "Jordan").unwrap();
        let place = store.upsert_node("p1", "place", "Jordan").unwrap();
        assert_ne!(person.id, place.id);
        assert_eq!(store.recent_nodes("p1", 10).unwrap().len(), 2);
    }

    #[test]
    fn test_recent_nodes_ordering() {
        let store = create_test_store();
        for name in ["a", "b", "c", "d"] {
            store.upsert_node("p1", "activity", name).unwrap();
        }
        // Touch "a" again so it becomes the most recent.
        store.upsert_node("p1", "activity", "a").unwrap();

        let nodes = store.recent_nodes("p1", 10).unwrap();
        assert_eq!(nodes.len(), 4);
        assert_eq!(nodes[0].entity_name, "a");

        let limited = store.recent_nodes("p1", 2).unwrap();
        assert_eq!(limited.len(), 2);
    }

    #[test]
    fn test_recent_nodes_scoped_by_profile() {
        let store = create_test_store();
        store.upsert_node("p1", "person", "Sarah").unwrap();
        store.upsert_node("p2", "person", "Maya").unwrap();

        let nodes = store.recent_nodes("p1", 10).unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].entity_name, "Sarah");
    }

    #[test]
    fn test_count_by_type() {
        let store = create_test_store();
        store.upsert_node("p1", "person", "Sarah").unwrap();
        store.upsert_node("p1", "person", "Maya").unwrap();
        store.upsert_node("p1", "emotion", "happy").unwrap();

        let counts = store.count_nodes_by_type("p1").unwrap();
        assert_eq!(counts.get("person"), Some(&2));
        assert_eq!(counts.get("emotion"), Some(&1));
    }

    #[test]
    fn test_edge_insert_and_recency() {
        let store = create_test_store();
        let source = store.upsert_node("p1", "person", "Sarah").unwrap();
        let target = store.upsert_node("p1", "emotion", "happy").unwrap();

        let edge = store
            .insert_edge(NewEdge {
                profile_id: "p1".to_string(),
                source_node_id: source.id.clone(),
                target_node_id: target.id.clone(),
                relationship_type: "experienced".to_string(),
                properties: BTreeMap::new(),
                confidence: 1.0,
            })
            .unwrap();
        assert_eq!(edge.created_at, edge.last_updated);

        let edges = store.recent_edges("p1", 10).unwrap();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].id, edge.id);

        let counts = store.count_edges_by_type("p1").unwrap();
        assert_eq!(counts.get("experienced"), Some(&1));
    }

    #[test]
    fn test_edge_rejects_missing_or_foreign_endpoints() {
        let store = create_test_store();
        let mine = store.upsert_node("p1", "person", "Sarah").unwrap();
        let theirs = store.upsert_node("p2", "person", "Maya").unwrap();

        let missing = store.insert_edge(NewEdge {
            profile_id: "p1".to_string(),
            source_node_id: mine.id.clone(),
            target_node_id: "nope".to_string(),
            relationship_type: "related_to".to_string(),
            properties: BTreeMap::new(),
            confidence: 1.0,
        });
        assert!(matches!(missing, Err(StoreError::InvalidReference(_))));

        let foreign = store.insert_edge(NewEdge {
            profile_id: "p1".to_string(),
            source_node_id: mine.id,
            target_node_id: theirs.id,
            relationship_type: "related_to".to_string(),
            properties: BTreeMap::new(),
            confidence: 1.0,
        });
        assert!(matches!(foreign, Err(StoreError::InvalidReference(_))));
    }

    #[test]
    fn test_extraction_record_append() {
        let store = create_test_store();
        let node = store.upsert_node("p1", "person", "Sarah").unwrap();

        let record = store
            .append_extraction_record("p1", "c1", "I saw Sarah", vec![node.id.clone()])
            .unwrap();
        assert_eq!(record.node_ids, vec![node.id]);
        assert!(record.edge_ids.is_empty());
    }

    #[test]
    fn test_crisis_log_truncates_message() {
        let store = create_test_store();
        let assessment = crisis::classify("I want to die");
        let long_message = "x".repeat(800);

        let entry = store
            .append_crisis_log("p1", &long_message, &assessment)
            .unwrap();
        assert_eq!(entry.message.chars().count(), 500);
        assert_eq!(entry.risk_level, "high");
        assert!(!entry.handled);
    }

    #[test]
    fn test_profile_created_with_zeroed_counters() {
        let store = create_test_store();
        let profile = store.get_or_create_profile("p1").unwrap();
        assert_eq!(profile.streak.current_streak, 0);
        assert_eq!(profile.streak.longest_streak, 0);
        assert_eq!(profile.streak.total_journal_days, 0);
        assert!(profile.streak.last_journal_date.is_none());
        assert!(profile.preferences.is_empty());
    }

    #[test]
    fn test_record_journal_rejects_malformed_date() {
        let store = create_test_store();
        let result = store.record_journal("p1", "03/15/2025");
        assert!(matches!(result, Err(StoreError::InvalidDate(_))));
    }

    #[test]
    fn test_journal_sequence_with_lazy_decay() {
        let store = create_test_store();
        let d = |n: u32| NaiveDate::from_ymd_opt(2025, 3, n).unwrap();

        assert_eq!(store.record_journal_on("p1", d(1)).unwrap().current_streak, 1);
        let state = store.record_journal_on("p1", d(2)).unwrap();
        assert_eq!(state.current_streak, 2);
        assert_eq!(state.longest_streak, 2);

        let state = store.record_journal_on("p1", d(5)).unwrap();
        assert_eq!(state.current_streak, 1);
        assert_eq!(state.longest_streak, 2);
        assert_eq!(state.total_journal_days, 3);

        // Reading three days later decays the streak and persists it.
        let profile = store.get_or_create_profile_as_of("p1", d(8)).unwrap();
        assert_eq!(profile.streak.current_streak, 0);
        assert_eq!(profile.streak.longest_streak, 2);
        assert_eq!(profile.streak.total_journal_days, 3);

        let reread = store.get_or_create_profile_as_of("p1", d(8)).unwrap();
        assert_eq!(reread.streak, profile.streak);
    }

    #[test]
    fn test_decay_spares_streak_extended_yesterday() {
        let store = create_test_store();
        let yesterday = Utc::now().date_naive() - Duration::days(1);

        store.record_journal_on("p1", yesterday).unwrap();
        let profile = store.get_or_create_profile("p1").unwrap();
        assert_eq!(profile.streak.current_streak, 1);
    }

    #[test]
    fn test_update_preferences() {
        let store = create_test_store();
        let mut prefs = BTreeMap::new();
        prefs.insert("voiceEnabled".to_string(), serde_json::json!(false));

        let profile = store.update_preferences("p1", &prefs).unwrap();
        assert_eq!(
            profile.preferences.get("voiceEnabled"),
            Some(&serde_json::json!(false))
        );
    }
}
