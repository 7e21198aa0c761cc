use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub nickname: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A message as persisted. `id`, `channel_id` and `author_id` never change
/// after creation; only `content` (and with it `updated_at`) can be patched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub channel_id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A stored tag. `hashed_tag` is derived from the normalized raw text and is
/// the storage key; `raw_tag` is the most recently submitted display text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub hashed_tag: String,
    pub raw_tag: String,
    pub created_at: DateTime<Utc>,
}

/// A message enriched with its author and full tag list.
///
/// `author` is `None` when the author no longer exists. `tags` is always
/// present and may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageDetail {
    #[serde(flatten)]
    pub message: Message,
    pub author: Option<User>,
    pub tags: Vec<Tag>,
}
