//! Capabilities the services need from storage.
//!
//! Implementations are synchronous: each call is one (or a few) round trips
//! to the substrate and runs on whatever thread serves the request.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use clipboard_types::models::{Message, Tag, User};

use crate::error::Result;
use crate::tag::NewTag;

pub trait MessageStore: Send + Sync {
    /// Persist a new message and return the stored row, generated id and
    /// timestamps included.
    fn create(&self, channel_id: Uuid, author_id: Uuid, content: &str) -> Result<Message>;

    /// Fails with `MessageNotFound` if no such message exists.
    fn get_by_id(&self, id: Uuid) -> Result<Message>;

    /// Newest first.
    fn list_by_channel(&self, channel_id: Uuid, limit: i64, offset: i64) -> Result<Vec<Message>>;

    /// Inclusive on both ends, newest first. Callers guarantee `start <= end`.
    fn list_in_time_range(
        &self,
        channel_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Message>>;

    /// Most recently pinned first.
    fn list_pinned(&self, channel_id: Uuid) -> Result<Vec<Message>>;

    /// Fails with `MessageNotFound` when no row matched.
    fn patch_content(&self, id: Uuid, content: &str) -> Result<Message>;

    /// Fails with `MessageNotFound` or `AlreadyPinned`.
    fn pin(&self, id: Uuid) -> Result<()>;

    /// Fails with `NotPinned` when there was no marker.
    fn unpin(&self, id: Uuid) -> Result<()>;

    /// Fails with `MessageNotFound` when no row matched.
    fn delete(&self, id: Uuid) -> Result<()>;
}

pub trait TagIndex: Send + Sync {
    /// Insert unseen tags; for known hashes overwrite the display text.
    /// Empty input is a no-op.
    fn upsert_tags(&self, tags: &[NewTag]) -> Result<()>;

    /// Insert one relation per hash, all or nothing. Empty input is a no-op.
    fn create_relations(&self, message_id: Uuid, channel_id: Uuid, hashed_tags: &[String]) -> Result<()>;

    /// Every requested id is a key of the result, bound to an empty list when
    /// the message carries no tags.
    fn tags_by_message_ids(&self, message_ids: &[Uuid]) -> Result<HashMap<Uuid, Vec<Tag>>>;

    /// Messages carrying the tag, newest first.
    fn find_by_tag(&self, hashed_tag: &str, limit: i64, offset: i64) -> Result<Vec<Message>>;

    /// Like [`TagIndex::find_by_tag`], restricted to relations recorded in `channel_id`.
    fn find_by_tag_in_channel(
        &self,
        channel_id: Uuid,
        hashed_tag: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Message>>;

    /// Idempotent.
    fn delete_relations_by_message_id(&self, message_id: Uuid) -> Result<()>;
}

pub trait UserLookup: Send + Sync {
    /// Unknown ids are simply absent from the result.
    fn users_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>>;
}

pub trait UserStore: UserLookup {
    /// Fails with `AlreadyExists` when the username is taken.
    fn create_user(&self, username: &str, nickname: &str, status: &str) -> Result<User>;
}
