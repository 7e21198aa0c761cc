use rusqlite::Connection;
use tracing::info;

use crate::error::DbError;

pub fn run(conn: &Connection) -> Result<(), DbError> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;

    if version < 1 {
        info!("Running migration v1 (messages, tags, pins, users)");
        conn.execute_batch(
            "
            BEGIN;

            CREATE TABLE users (
                id          TEXT PRIMARY KEY,
                username    TEXT NOT NULL UNIQUE,
                nickname    TEXT NOT NULL DEFAULT '',
                status      TEXT NOT NULL DEFAULT '',
                created_at  INTEGER NOT NULL,
                updated_at  INTEGER NOT NULL
            );

            -- channel_id and author_id are owned elsewhere: no foreign keys
            CREATE TABLE messages (
                id          TEXT PRIMARY KEY,
                channel_id  TEXT NOT NULL,
                author_id   TEXT NOT NULL,
                content     TEXT NOT NULL,
                created_at  INTEGER NOT NULL,
                updated_at  INTEGER NOT NULL
            );

            CREATE INDEX idx_messages_channel
                ON messages(channel_id, created_at);

            CREATE TABLE tags (
                hashed_tag  TEXT PRIMARY KEY,
                raw_tag     TEXT NOT NULL,
                created_at  INTEGER NOT NULL
            );

            CREATE TABLE tag_relations (
                message_id  TEXT NOT NULL REFERENCES messages(id) ON DELETE CASCADE,
                channel_id  TEXT NOT NULL,
                hashed_tag  TEXT NOT NULL REFERENCES tags(hashed_tag),
                PRIMARY KEY (message_id, hashed_tag)
            );

            CREATE INDEX idx_tag_relations_tag
                ON tag_relations(hashed_tag, channel_id);

            CREATE TABLE pinned_messages (
                message_id  TEXT PRIMARY KEY REFERENCES messages(id) ON DELETE CASCADE,
                channel_id  TEXT NOT NULL,
                created_at  INTEGER NOT NULL
            );

            CREATE INDEX idx_pinned_channel
                ON pinned_messages(channel_id, created_at);

            INSERT INTO schema_version (version) VALUES (1);

            COMMIT;
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}
