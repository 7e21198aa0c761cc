//! Capability trait implementations backed by [`Database`].

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use clipboard_core::{MessageStore, NewTag, Result, TagIndex, UserLookup, UserStore};
use clipboard_types::models::{Message, Tag, User};

use crate::Database;

impl MessageStore for Database {
    fn create(&self, channel_id: Uuid, author_id: Uuid, content: &str) -> Result<Message> {
        Ok(self.insert_message(channel_id, author_id, content)?)
    }

    fn get_by_id(&self, id: Uuid) -> Result<Message> {
        Ok(self.get_message(id)?)
    }

    fn list_by_channel(&self, channel_id: Uuid, limit: i64, offset: i64) -> Result<Vec<Message>> {
        Ok(self.get_messages(channel_id, limit, offset)?)
    }

    fn list_in_time_range(
        &self,
        channel_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Message>> {
        Ok(self.get_messages_in_range(channel_id, start, end)?)
    }

    fn list_pinned(&self, channel_id: Uuid) -> Result<Vec<Message>> {
        Ok(self.get_pinned_messages(channel_id)?)
    }

    fn patch_content(&self, id: Uuid, content: &str) -> Result<Message> {
        Ok(self.update_message_content(id, content)?)
    }

    fn pin(&self, id: Uuid) -> Result<()> {
        Ok(self.pin_message(id)?)
    }

    fn unpin(&self, id: Uuid) -> Result<()> {
        Ok(self.unpin_message(id)?)
    }

    fn delete(&self, id: Uuid) -> Result<()> {
        Ok(self.delete_message(id)?)
    }
}

impl TagIndex for Database {
    fn upsert_tags(&self, tags: &[NewTag]) -> Result<()> {
        Ok(self.save_tags(tags)?)
    }

    fn create_relations(&self, message_id: Uuid, channel_id: Uuid, hashed_tags: &[String]) -> Result<()> {
        Ok(self.insert_tag_relations(message_id, channel_id, hashed_tags)?)
    }

    fn tags_by_message_ids(&self, message_ids: &[Uuid]) -> Result<HashMap<Uuid, Vec<Tag>>> {
        Ok(self.get_tags_for_messages(message_ids)?)
    }

    fn find_by_tag(&self, hashed_tag: &str, limit: i64, offset: i64) -> Result<Vec<Message>> {
        Ok(self.find_messages_by_tag(hashed_tag, limit, offset)?)
    }

    fn find_by_tag_in_channel(
        &self,
        channel_id: Uuid,
        hashed_tag: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Message>> {
        Ok(self.find_messages_by_tag_in_channel(channel_id, hashed_tag, limit, offset)?)
    }

    fn delete_relations_by_message_id(&self, message_id: Uuid) -> Result<()> {
        Ok(self.delete_tag_relations(message_id)?)
    }
}

impl UserLookup for Database {
    fn users_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>> {
        Ok(self.get_users_by_ids(ids)?)
    }
}

impl UserStore for Database {
    fn create_user(&self, username: &str, nickname: &str, status: &str) -> Result<User> {
        Ok(self.insert_user(username, nickname, status)?)
    }
}
