use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use clipboard_types::models::MessageDetail;

use crate::composer::DetailComposer;
use crate::error::Result;
use crate::store::{MessageStore, TagIndex};
use crate::tag;

/// Page size used when a search asks for a negative limit.
pub const DEFAULT_SEARCH_LIMIT: i64 = 50;

// SQLite reads a negative LIMIT as "no limit"
fn search_limit(limit: i64) -> i64 {
    if limit < 0 {
        DEFAULT_SEARCH_LIMIT
    } else {
        limit
    }
}

#[derive(Clone)]
pub struct TagService {
    messages: Arc<dyn MessageStore>,
    tags: Arc<dyn TagIndex>,
    composer: DetailComposer,
}

impl TagService {
    pub fn new(messages: Arc<dyn MessageStore>, tags: Arc<dyn TagIndex>, composer: DetailComposer) -> Self {
        Self {
            messages,
            tags,
            composer,
        }
    }

    /// Replace the message's tag set with `raw_tags`.
    ///
    /// Existing relations are dropped first, then the new set is written. Once
    /// the drop has succeeded both the upsert and the relation insert are
    /// attempted even if the other fails; the first error is returned. An
    /// empty list clears every tag.
    pub fn modify_tags(&self, message_id: Uuid, raw_tags: &[String]) -> Result<MessageDetail> {
        let message = self.messages.get_by_id(message_id)?;

        self.tags.delete_relations_by_message_id(message.id)?;

        let tags = tag::prepare_tags(raw_tags);
        if !tags.is_empty() {
            let upserted = self.tags.upsert_tags(&tags);
            let related = self
                .tags
                .create_relations(message.id, message.channel_id, &tag::hashes(&tags));
            upserted.and(related)?;
        }
        debug!(%message_id, count = tags.len(), "message tags replaced");

        let updated = self.messages.get_by_id(message_id)?;
        self.composer.compose_one(updated)
    }

    pub fn find_by_tag(&self, raw_tag: &str, limit: i64, offset: i64) -> Result<Vec<MessageDetail>> {
        let hashed = tag::hash_tag(raw_tag);
        let messages = self.tags.find_by_tag(&hashed, search_limit(limit), offset)?;
        self.composer.compose(messages)
    }

    pub fn find_by_tag_in_channel(
        &self,
        channel_id: Uuid,
        raw_tag: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<MessageDetail>> {
        let hashed = tag::hash_tag(raw_tag);
        let messages = self
            .tags
            .find_by_tag_in_channel(channel_id, &hashed, search_limit(limit), offset)?;
        self.composer.compose(messages)
    }
}
