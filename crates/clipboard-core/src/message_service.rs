use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};
use uuid::Uuid;

use clipboard_types::models::{Message, MessageDetail};

use crate::composer::DetailComposer;
use crate::error::{ClipError, Result};
use crate::store::{MessageStore, TagIndex};
use crate::tag::{self, NewTag};

/// Inclusive bounds on the page size of a channel listing.
pub const MIN_LIST_LIMIT: i64 = 1;
pub const MAX_LIST_LIMIT: i64 = 1000;

pub(crate) fn validate_limit(limit: i64) -> Result<()> {
    if (MIN_LIST_LIMIT..=MAX_LIST_LIMIT).contains(&limit) {
        Ok(())
    } else {
        Err(ClipError::InvalidLimit(limit))
    }
}

fn validate_content(content: &str) -> Result<()> {
    if content.trim().is_empty() {
        return Err(ClipError::InvalidContent);
    }
    Ok(())
}

#[derive(Clone)]
pub struct MessageService {
    messages: Arc<dyn MessageStore>,
    tags: Arc<dyn TagIndex>,
    composer: DetailComposer,
}

impl MessageService {
    pub fn new(messages: Arc<dyn MessageStore>, tags: Arc<dyn TagIndex>, composer: DetailComposer) -> Self {
        Self {
            messages,
            tags,
            composer,
        }
    }

    /// Persist a message, then tag it.
    ///
    /// Tag writes are advisory: once the message row exists, a failing tag
    /// upsert or relation insert is logged and the message is returned with
    /// whatever tags did land.
    pub fn create_message(
        &self,
        channel_id: Uuid,
        author_id: Uuid,
        content: &str,
        raw_tags: &[String],
    ) -> Result<MessageDetail> {
        validate_content(content)?;

        let message = self.messages.create(channel_id, author_id, content)?;
        debug!(message_id = %message.id, %channel_id, "message created");

        let tags = tag::prepare_tags(raw_tags);
        if !tags.is_empty() {
            self.attach_tags_best_effort(&message, &tags);
        }

        self.composer.compose_one(message)
    }

    fn attach_tags_best_effort(&self, message: &Message, tags: &[NewTag]) {
        if let Err(e) = self.tags.upsert_tags(tags) {
            warn!(message_id = %message.id, "tag upsert failed, continuing without it: {}", e);
        }
        let hashes = tag::hashes(tags);
        if let Err(e) = self.tags.create_relations(message.id, message.channel_id, &hashes) {
            warn!(message_id = %message.id, "tag relation insert failed, message left untagged: {}", e);
        }
    }

    pub fn get_message(&self, message_id: Uuid) -> Result<MessageDetail> {
        let message = self.messages.get_by_id(message_id)?;
        self.composer.compose_one(message)
    }

    pub fn get_messages(&self, channel_id: Uuid, limit: i64, offset: i64) -> Result<Vec<MessageDetail>> {
        validate_limit(limit)?;
        let messages = self.messages.list_by_channel(channel_id, limit, offset)?;
        self.composer.compose(messages)
    }

    pub fn get_messages_in_range(
        &self,
        channel_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<MessageDetail>> {
        if start > end {
            return Err(ClipError::InvalidTimeRange);
        }
        let messages = self.messages.list_in_time_range(channel_id, start, end)?;
        self.composer.compose(messages)
    }

    pub fn get_pinned(&self, channel_id: Uuid) -> Result<Vec<MessageDetail>> {
        let messages = self.messages.list_pinned(channel_id)?;
        self.composer.compose(messages)
    }

    /// Apply a partial update. With nothing to change, returns the current
    /// state of the message.
    pub fn patch_message(&self, message_id: Uuid, content: Option<&str>) -> Result<MessageDetail> {
        let message = match content {
            Some(content) => {
                validate_content(content)?;
                self.messages.patch_content(message_id, content)?
            }
            None => self.messages.get_by_id(message_id)?,
        };
        self.composer.compose_one(message)
    }

    pub fn pin(&self, message_id: Uuid) -> Result<()> {
        self.messages.pin(message_id)?;
        debug!(%message_id, "message pinned");
        Ok(())
    }

    pub fn unpin(&self, message_id: Uuid) -> Result<()> {
        self.messages.unpin(message_id)?;
        debug!(%message_id, "message unpinned");
        Ok(())
    }

    pub fn delete_message(&self, message_id: Uuid) -> Result<()> {
        self.messages.delete(message_id)?;
        debug!(%message_id, "message deleted");
        Ok(())
    }
}
