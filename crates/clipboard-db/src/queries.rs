use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, Params, params, params_from_iter};
use uuid::Uuid;

use clipboard_core::NewTag;
use clipboard_types::models::{Message, Tag, User};

use crate::Database;
use crate::error::{DbError, is_unique_violation};
use crate::models::{
    MessageRow, TaggedRow, UserRow, from_micros, into_messages, now_micros, to_micros, to_micros_ceil,
};

const MESSAGE_COLUMNS: &str = "m.id, m.channel_id, m.author_id, m.content, m.created_at, m.updated_at";

impl Database {
    // -- Messages --

    pub fn insert_message(&self, channel_id: Uuid, author_id: Uuid, content: &str) -> Result<Message, DbError> {
        let id = Uuid::new_v4().to_string();
        let now = now_micros();

        let row = self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO messages (id, channel_id, author_id, content, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
                params![id, channel_id.to_string(), author_id.to_string(), content, now],
            )?;
            // Read back through the writer so the caller sees exactly what was stored
            query_message(conn, &id)?.ok_or(DbError::NotFound)
        })?;

        row.try_into()
    }

    pub fn get_message(&self, id: Uuid) -> Result<Message, DbError> {
        self.with_conn(|conn| query_message(conn, &id.to_string()))?
            .ok_or(DbError::NotFound)?
            .try_into()
    }

    pub fn get_messages(&self, channel_id: Uuid, limit: i64, offset: i64) -> Result<Vec<Message>, DbError> {
        let sql = format!(
            "SELECT {MESSAGE_COLUMNS}
             FROM messages m
             WHERE m.channel_id = ?1
             ORDER BY m.created_at DESC, m.rowid DESC
             LIMIT ?2 OFFSET ?3"
        );
        self.with_conn(|conn| query_messages(conn, &sql, params![channel_id.to_string(), limit, offset]))
    }

    pub fn get_messages_in_range(
        &self,
        channel_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Message>, DbError> {
        let sql = format!(
            "SELECT {MESSAGE_COLUMNS}
             FROM messages m
             WHERE m.channel_id = ?1 AND m.created_at BETWEEN ?2 AND ?3
             ORDER BY m.created_at DESC, m.rowid DESC"
        );
        self.with_conn(|conn| {
            query_messages(
                conn,
                &sql,
                params![channel_id.to_string(), to_micros_ceil(start), to_micros(end)],
            )
        })
    }

    /// Pinned messages of a channel, most recently pinned first.
    pub fn get_pinned_messages(&self, channel_id: Uuid) -> Result<Vec<Message>, DbError> {
        let sql = format!(
            "SELECT {MESSAGE_COLUMNS}
             FROM messages m
             JOIN pinned_messages p ON p.message_id = m.id
             WHERE m.channel_id = ?1
             ORDER BY p.created_at DESC, p.rowid DESC"
        );
        self.with_conn(|conn| query_messages(conn, &sql, [channel_id.to_string()]))
    }

    pub fn update_message_content(&self, id: Uuid, content: &str) -> Result<Message, DbError> {
        let id = id.to_string();
        let row = self.with_conn_mut(|conn| {
            let changed = conn.execute(
                "UPDATE messages SET content = ?1, updated_at = ?2 WHERE id = ?3",
                params![content, now_micros(), id],
            )?;
            if changed == 0 {
                return Err(DbError::NotFound);
            }
            query_message(conn, &id)?.ok_or(DbError::NotFound)
        })?;

        row.try_into()
    }

    pub fn delete_message(&self, id: Uuid) -> Result<(), DbError> {
        self.with_conn_mut(|conn| {
            let changed = conn.execute("DELETE FROM messages WHERE id = ?1", [id.to_string()])?;
            if changed == 0 {
                return Err(DbError::NotFound);
            }
            Ok(())
        })
    }

    // -- Pins --

    pub fn pin_message(&self, id: Uuid) -> Result<(), DbError> {
        let id = id.to_string();
        self.with_conn_mut(|conn| {
            let channel_id: String = conn
                .query_row("SELECT channel_id FROM messages WHERE id = ?1", [&id], |row| {
                    row.get(0)
                })
                .optional()?
                .ok_or(DbError::NotFound)?;

            match conn.execute(
                "INSERT INTO pinned_messages (message_id, channel_id, created_at) VALUES (?1, ?2, ?3)",
                params![id, channel_id, now_micros()],
            ) {
                Ok(_) => Ok(()),
                Err(e) if is_unique_violation(&e) => Err(DbError::AlreadyPinned),
                Err(e) => Err(e.into()),
            }
        })
    }

    pub fn unpin_message(&self, id: Uuid) -> Result<(), DbError> {
        self.with_conn_mut(|conn| {
            let changed = conn.execute(
                "DELETE FROM pinned_messages WHERE message_id = ?1",
                [id.to_string()],
            )?;
            if changed == 0 {
                return Err(DbError::NotPinned);
            }
            Ok(())
        })
    }

    // -- Tags --

    /// Insert-or-update by hash: identity never changes, display text is
    /// last-write-wins.
    pub fn save_tags(&self, tags: &[NewTag]) -> Result<(), DbError> {
        if tags.is_empty() {
            return Ok(());
        }

        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            {
                let mut stmt = tx.prepare_cached(
                    "INSERT INTO tags (hashed_tag, raw_tag, created_at) VALUES (?1, ?2, ?3)
                     ON CONFLICT(hashed_tag) DO UPDATE SET raw_tag = excluded.raw_tag",
                )?;
                let now = now_micros();
                for tag in tags {
                    stmt.execute(params![tag.hashed_tag, tag.raw_tag, now])?;
                }
            }
            tx.commit()?;
            Ok(())
        })
    }

    /// Bulk-insert relations in a single statement, so either every row
    /// lands or none does.
    pub fn insert_tag_relations(
        &self,
        message_id: Uuid,
        channel_id: Uuid,
        hashed_tags: &[String],
    ) -> Result<(), DbError> {
        if hashed_tags.is_empty() {
            return Ok(());
        }

        // ?1 and ?2 are shared by every tuple; hashes start at ?3
        let tuples: Vec<String> = (0..hashed_tags.len())
            .map(|i| format!("(?1, ?2, ?{})", i + 3))
            .collect();
        let sql = format!(
            "INSERT INTO tag_relations (message_id, channel_id, hashed_tag) VALUES {}",
            tuples.join(", ")
        );

        let mut values = Vec::with_capacity(hashed_tags.len() + 2);
        values.push(message_id.to_string());
        values.push(channel_id.to_string());
        values.extend(hashed_tags.iter().cloned());

        self.with_conn_mut(|conn| {
            conn.execute(&sql, params_from_iter(values.iter()))?;
            Ok(())
        })
    }

    /// Batch-fetch tags for a set of message IDs. Every requested ID is a key
    /// of the result.
    pub fn get_tags_for_messages(&self, message_ids: &[Uuid]) -> Result<HashMap<Uuid, Vec<Tag>>, DbError> {
        let mut tags: HashMap<Uuid, Vec<Tag>> = message_ids.iter().map(|id| (*id, Vec::new())).collect();
        if message_ids.is_empty() {
            return Ok(tags);
        }

        let rows = self.with_conn(|conn| {
            let sql = format!(
                "SELECT r.message_id, t.hashed_tag, t.raw_tag, t.created_at
                 FROM tag_relations r
                 JOIN tags t ON t.hashed_tag = r.hashed_tag
                 WHERE r.message_id IN ({})
                 ORDER BY r.rowid",
                placeholders(message_ids.len())
            );
            let ids: Vec<String> = message_ids.iter().map(Uuid::to_string).collect();

            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(params_from_iter(ids.iter()), |row| {
                    Ok(TaggedRow {
                        message_id: row.get(0)?,
                        hashed_tag: row.get(1)?,
                        raw_tag: row.get(2)?,
                        created_at: row.get(3)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })?;

        for row in rows {
            let (message_id, tag) = row.into_parts()?;
            tags.entry(message_id).or_default().push(tag);
        }

        Ok(tags)
    }

    /// Joins back to `messages`, so a relation can only ever surface a
    /// message that still exists.
    pub fn find_messages_by_tag(&self, hashed_tag: &str, limit: i64, offset: i64) -> Result<Vec<Message>, DbError> {
        let sql = format!(
            "SELECT {MESSAGE_COLUMNS}
             FROM messages m
             JOIN tag_relations r ON r.message_id = m.id
             WHERE r.hashed_tag = ?1
             ORDER BY m.created_at DESC, m.rowid DESC
             LIMIT ?2 OFFSET ?3"
        );
        self.with_conn(|conn| query_messages(conn, &sql, params![hashed_tag, limit, offset]))
    }

    /// Filters on the relation's own channel id.
    pub fn find_messages_by_tag_in_channel(
        &self,
        channel_id: Uuid,
        hashed_tag: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Message>, DbError> {
        let sql = format!(
            "SELECT {MESSAGE_COLUMNS}
             FROM messages m
             JOIN tag_relations r ON r.message_id = m.id
             WHERE r.hashed_tag = ?1 AND r.channel_id = ?2
             ORDER BY m.created_at DESC, m.rowid DESC
             LIMIT ?3 OFFSET ?4"
        );
        self.with_conn(|conn| {
            query_messages(
                conn,
                &sql,
                params![hashed_tag, channel_id.to_string(), limit, offset],
            )
        })
    }

    pub fn delete_tag_relations(&self, message_id: Uuid) -> Result<(), DbError> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "DELETE FROM tag_relations WHERE message_id = ?1",
                [message_id.to_string()],
            )?;
            Ok(())
        })
    }

    // -- Users --

    pub fn insert_user(&self, username: &str, nickname: &str, status: &str) -> Result<User, DbError> {
        let id = Uuid::new_v4();
        let now = now_micros();

        self.with_conn_mut(|conn| {
            match conn.execute(
                "INSERT INTO users (id, username, nickname, status, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
                params![id.to_string(), username, nickname, status, now],
            ) {
                Ok(_) => Ok(()),
                Err(e) if is_unique_violation(&e) => Err(DbError::AlreadyExists),
                Err(e) => Err(e.into()),
            }
        })?;

        Ok(User {
            id,
            username: username.to_string(),
            nickname: nickname.to_string(),
            status: status.to_string(),
            created_at: from_micros(now)?,
            updated_at: from_micros(now)?,
        })
    }

    /// Batch-fetch users. Unknown ids are skipped.
    pub fn get_users_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, DbError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        let rows = self.with_conn(|conn| {
            let sql = format!(
                "SELECT id, username, nickname, status, created_at, updated_at
                 FROM users WHERE id IN ({})",
                placeholders(ids.len())
            );
            let ids: Vec<String> = ids.iter().map(Uuid::to_string).collect();

            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(params_from_iter(ids.iter()), |row| {
                    Ok(UserRow {
                        id: row.get(0)?,
                        username: row.get(1)?,
                        nickname: row.get(2)?,
                        status: row.get(3)?,
                        created_at: row.get(4)?,
                        updated_at: row.get(5)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })?;

        rows.into_iter().map(User::try_from).collect()
    }
}

fn placeholders(count: usize) -> String {
    (1..=count)
        .map(|i| format!("?{}", i))
        .collect::<Vec<_>>()
        .join(", ")
}

fn map_message(row: &rusqlite::Row<'_>) -> rusqlite::Result<MessageRow> {
    Ok(MessageRow {
        id: row.get(0)?,
        channel_id: row.get(1)?,
        author_id: row.get(2)?,
        content: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

fn query_message(conn: &Connection, id: &str) -> Result<Option<MessageRow>, DbError> {
    let sql = format!("SELECT {MESSAGE_COLUMNS} FROM messages m WHERE m.id = ?1");
    conn.query_row(&sql, [id], map_message).optional()
}

fn query_messages<P: Params>(conn: &Connection, sql: &str, params: P) -> Result<Vec<Message>, DbError> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params, map_message)?
        .collect::<Result<Vec<_>, _>>()?;
    into_messages(rows)
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>, DbError>;
}

impl<T> OptionalExt<T> for Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>, DbError> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
