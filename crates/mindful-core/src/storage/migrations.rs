//! Database Migrations
//!
//! Schema migration definitions for the storage layer.

/// Migration definitions
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        description: "Initial schema: entity graph, audit logs, profiles",
        up: MIGRATION_V1_UP,
    },
    Migration {
        version: 2,
        description: "Profile preferences map",
        up: MIGRATION_V2_UP,
    },
];

/// A database migration
#[derive(Debug, Clone)]
pub struct Migration {
    /// Version number
    pub version: u32,
    /// Description
    pub description: &'static str,
    /// SQL to apply
    pub up: &'static str,
}

/// V1: Initial schema
const MIGRATION_V1_UP: &str = r#"
CREATE TABLE IF NOT EXISTS entity_nodes (
    id TEXT PRIMARY KEY,
    profile_id TEXT NOT NULL,
    entity_type TEXT NOT NULL,
    entity_name TEXT NOT NULL,
    properties TEXT NOT NULL DEFAULT '{}',
    confidence REAL NOT NULL DEFAULT 1.0,
    first_mentioned TEXT NOT NULL,
    last_mentioned TEXT NOT NULL,
    mention_count INTEGER NOT NULL DEFAULT 1,

    -- Natural key: at most one node per (profile, type, name)
    UNIQUE(profile_id, entity_type, entity_name)
);

CREATE INDEX IF NOT EXISTS idx_nodes_profile_recency
    ON entity_nodes(profile_id, last_mentioned DESC);
CREATE INDEX IF NOT EXISTS idx_nodes_profile_type
    ON entity_nodes(profile_id, entity_type);

CREATE TABLE IF NOT EXISTS relationship_edges (
    id TEXT PRIMARY KEY,
    profile_id TEXT NOT NULL,
    source_node_id TEXT NOT NULL REFERENCES entity_nodes(id),
    target_node_id TEXT NOT NULL REFERENCES entity_nodes(id),
    relationship_type TEXT NOT NULL,
    properties TEXT NOT NULL DEFAULT '{}',
    confidence REAL NOT NULL DEFAULT 1.0,
    created_at TEXT NOT NULL,
    last_updated TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_edges_profile_recency
    ON relationship_edges(profile_id, last_updated DESC);
CREATE INDEX IF NOT EXISTS idx_edges_profile_type
    ON relationship_edges(profile_id, relationship_type);

-- Append-only audit of extraction events; never updated or deleted
CREATE TABLE IF NOT EXISTS extraction_log (
    id TEXT PRIMARY KEY,
    profile_id TEXT NOT NULL,
    conversation_id TEXT NOT NULL,
    message TEXT NOT NULL,
    node_ids TEXT NOT NULL DEFAULT '[]',
    edge_ids TEXT NOT NULL DEFAULT '[]',
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_extraction_profile ON extraction_log(profile_id, created_at);

-- Append-only audit of medium/high crisis detections; message bounded
-- to 500 characters at write time
CREATE TABLE IF NOT EXISTS crisis_log (
    id TEXT PRIMARY KEY,
    profile_id TEXT NOT NULL,
    message TEXT NOT NULL,
    risk_level TEXT NOT NULL,
    matched_keywords TEXT NOT NULL DEFAULT '[]',
    handled INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_crisis_profile ON crisis_log(profile_id, created_at);

-- Per-profile singleton streak record
CREATE TABLE IF NOT EXISTS profiles (
    profile_id TEXT PRIMARY KEY,
    current_streak INTEGER NOT NULL DEFAULT 0,
    longest_streak INTEGER NOT NULL DEFAULT 0,
    total_journal_days INTEGER NOT NULL DEFAULT 0,
    last_journal_date TEXT,
    created_at TEXT NOT NULL
);

-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL
);

INSERT OR IGNORE INTO schema_version (version, applied_at) VALUES (1, datetime('now'));
"#;

/// V2: Free-form preferences on the profile record (collaborator-owned)
const MIGRATION_V2_UP: &str = r#"
ALTER TABLE profiles ADD COLUMN preferences TEXT NOT NULL DEFAULT '{}';

UPDATE schema_version SET version = 2, applied_at = datetime('now');
"#;

/// Get current schema version from database
pub fn get_current_version(conn: &rusqlite::Connection) -> rusqlite::Result<u32> {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )
    .or(Ok(0))
}

/// Apply pending migrations
pub fn apply_migrations(conn: &rusqlite::Connection) -> rusqlite::Result<u32> {
    let current_version = get_current_version(conn)?;
    let mut applied = 0;

    for migration in MIGRATIONS {
        if migration.version > current_version {
            tracing::info!(
                "Applying migration v{}: {}",
                migration.version,
                migration.description
            );

            conn.execute_batch(migration.up)?;
            applied += 1;
        }
    }

    Ok(applied)
}
