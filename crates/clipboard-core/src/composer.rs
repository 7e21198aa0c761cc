use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use anyhow::anyhow;
use uuid::Uuid;

use clipboard_types::models::{Message, MessageDetail, User};

use crate::error::{ClipError, Result};
use crate::store::{TagIndex, UserLookup};

/// Builds [`MessageDetail`]s from bare messages.
///
/// Whatever the number of messages, a call issues at most one user lookup and
/// one tag lookup. Output order and length always match the input.
#[derive(Clone)]
pub struct DetailComposer {
    users: Arc<dyn UserLookup>,
    tags: Arc<dyn TagIndex>,
}

impl DetailComposer {
    pub fn new(users: Arc<dyn UserLookup>, tags: Arc<dyn TagIndex>) -> Self {
        Self { users, tags }
    }

    pub fn compose(&self, messages: Vec<Message>) -> Result<Vec<MessageDetail>> {
        if messages.is_empty() {
            return Ok(Vec::new());
        }

        let mut seen_authors = HashSet::new();
        let author_ids: Vec<Uuid> = messages
            .iter()
            .map(|m| m.author_id)
            .filter(|id| seen_authors.insert(*id))
            .collect();
        let message_ids: Vec<Uuid> = messages.iter().map(|m| m.id).collect();

        let users = self.users.users_by_ids(&author_ids)?;
        let tags_map = self.tags.tags_by_message_ids(&message_ids)?;

        let user_map: HashMap<Uuid, User> = users.into_iter().map(|u| (u.id, u)).collect();

        let details = messages
            .into_iter()
            .map(|message| {
                let author = user_map.get(&message.author_id).cloned();
                let tags = tags_map.get(&message.id).cloned().unwrap_or_default();
                MessageDetail {
                    message,
                    author,
                    tags,
                }
            })
            .collect();

        Ok(details)
    }

    pub fn compose_one(&self, message: Message) -> Result<MessageDetail> {
        self.compose(vec![message])?
            .into_iter()
            .next()
            .ok_or_else(|| ClipError::Storage(anyhow!("composer returned no detail for a single message")))
    }
}
