//! Database Migrations
//!
//! Schema migration definitions for the SQLite corpus.

/// Migration definitions
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        description: "Documents table with FTS5 index over title, summary, text and identifier",
        up: MIGRATION_V1_UP,
    },
    Migration {
        version: 2,
        description: "Document embeddings for semantic search",
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

/// V1: Documents and full-text index
const MIGRATION_V1_UP: &str = r#"
CREATE TABLE IF NOT EXISTS documents (
    id TEXT PRIMARY KEY,
    document_type TEXT NOT NULL,
    identifier TEXT NOT NULL,
    title TEXT NOT NULL,
    summary TEXT NOT NULL DEFAULT '',
    full_text TEXT NOT NULL DEFAULT '',
    status TEXT,
    chamber TEXT,
    introduced_date TEXT,
    last_action_date TEXT,

    -- Typed sponsor, flattened
    sponsor_name TEXT,
    sponsor_party TEXT,
    sponsor_state TEXT,
    sponsor_bioguide_id TEXT,

    metadata TEXT NOT NULL DEFAULT '{}'
);

CREATE INDEX IF NOT EXISTS idx_documents_identifier ON documents(identifier);
CREATE INDEX IF NOT EXISTS idx_documents_type ON documents(document_type);
CREATE INDEX IF NOT EXISTS idx_documents_last_action ON documents(last_action_date);

-- FTS5 virtual table for full-text search (porter stemming)
CREATE VIRTUAL TABLE IF NOT EXISTS documents_fts USING fts5(
    title,
    summary,
    full_text,
    identifier,
    content='documents',
    content_rowid='rowid',
    tokenize='porter ascii'
);

-- Triggers to keep FTS in sync
CREATE TRIGGER IF NOT EXISTS documents_ai AFTER INSERT ON documents BEGIN
    INSERT INTO documents_fts(rowid, title, summary, full_text, identifier)
    VALUES (NEW.rowid, NEW.title, NEW.summary, NEW.full_text, NEW.identifier);
END;

CREATE TRIGGER IF NOT EXISTS documents_ad AFTER DELETE ON documents BEGIN
    INSERT INTO documents_fts(documents_fts, rowid, title, summary, full_text, identifier)
    VALUES ('delete', OLD.rowid, OLD.title, OLD.summary, OLD.full_text, OLD.identifier);
END;

CREATE TRIGGER IF NOT EXISTS documents_au AFTER UPDATE ON documents BEGIN
    INSERT INTO documents_fts(documents_fts, rowid, title, summary, full_text, identifier)
    VALUES ('delete', OLD.rowid, OLD.title, OLD.summary, OLD.full_text, OLD.identifier);
    INSERT INTO documents_fts(rowid, title, summary, full_text, identifier)
    VALUES (NEW.rowid, NEW.title, NEW.summary, NEW.full_text, NEW.identifier);
END;

-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL
);

INSERT OR IGNORE INTO schema_version (version, applied_at) VALUES (1, datetime('now'));
"#;

/// V2: Embedding blobs (little-endian f32)
const MIGRATION_V2_UP: &str = r#"
CREATE TABLE IF NOT EXISTS document_embeddings (
    document_id TEXT PRIMARY KEY REFERENCES documents(id) ON DELETE CASCADE,
    embedding BLOB NOT NULL,
    dimensions INTEGER NOT NULL,
    model TEXT NOT NULL DEFAULT 'nomic-ai/nomic-embed-text-v1.5',
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

INSERT OR IGNORE INTO schema_version (version, applied_at) VALUES (2, datetime('now'));
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

/// Apply pending migrations, returning how many ran
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
