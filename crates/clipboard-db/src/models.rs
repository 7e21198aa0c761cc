//! Database row types. These map directly to SQLite rows.
//! Ids are stored as TEXT and timestamps as INTEGER microseconds since the
//! Unix epoch; conversion into the shared models happens here.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use clipboard_types::models::{Message, Tag, User};

use crate::error::DbError;

pub struct UserRow {
    pub id: String,
    pub username: String,
    pub nickname: String,
    pub status: String,
    pub created_at: i64,
    pub updated_at: i64,
}

pub struct MessageRow {
    pub id: String,
    pub channel_id: String,
    pub author_id: String,
    pub content: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// A tag as seen through one of its relations.
pub struct TaggedRow {
    pub message_id: String,
    pub hashed_tag: String,
    pub raw_tag: String,
    pub created_at: i64,
}

pub fn now_micros() -> i64 {
    Utc::now().timestamp_micros()
}

/// Truncates toward the earlier microsecond.
pub fn to_micros(ts: DateTime<Utc>) -> i64 {
    ts.timestamp_micros()
}

/// Rounds up to the next whole microsecond, so a lower bound never admits
/// a row stored before it.
pub fn to_micros_ceil(ts: DateTime<Utc>) -> i64 {
    ts.timestamp_micros() + i64::from(ts.timestamp_subsec_nanos() % 1000 != 0)
}

pub fn from_micros(micros: i64) -> Result<DateTime<Utc>, DbError> {
    DateTime::from_timestamp_micros(micros)
        .ok_or_else(|| DbError::Corrupt(format!("timestamp out of range: {}", micros)))
}

pub fn parse_id(field: &str, value: &str) -> Result<Uuid, DbError> {
    value
        .parse()
        .map_err(|e| DbError::Corrupt(format!("{} '{}': {}", field, value, e)))
}

impl TryFrom<MessageRow> for Message {
    type Error = DbError;

    fn try_from(row: MessageRow) -> Result<Self, Self::Error> {
        Ok(Message {
            id: parse_id("message id", &row.id)?,
            channel_id: parse_id("channel_id", &row.channel_id)?,
            author_id: parse_id("author_id", &row.author_id)?,
            content: row.content,
            created_at: from_micros(row.created_at)?,
            updated_at: from_micros(row.updated_at)?,
        })
    }
}

impl TryFrom<UserRow> for User {
    type Error = DbError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: parse_id("user id", &row.id)?,
            username: row.username,
            nickname: row.nickname,
            status: row.status,
            created_at: from_micros(row.created_at)?,
            updated_at: from_micros(row.updated_at)?,
        })
    }
}

impl TaggedRow {
    pub fn into_parts(self) -> Result<(Uuid, Tag), DbError> {
        let message_id = parse_id("message_id", &self.message_id)?;
        let tag = Tag {
            hashed_tag: self.hashed_tag,
            raw_tag: self.raw_tag,
            created_at: from_micros(self.created_at)?,
        };
        Ok((message_id, tag))
    }
}

pub fn into_messages(rows: Vec<MessageRow>) -> Result<Vec<Message>, DbError> {
    rows.into_iter().map(Message::try_from).collect()
}
