//! In-memory stores with call counters and fault switches.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use anyhow::anyhow;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use clipboard_types::models::{Message, Tag, User};

use crate::error::{ClipError, Result};
use crate::store::{MessageStore, TagIndex, UserLookup, UserStore};
use crate::tag::NewTag;

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
    store_calls: AtomicUsize,
    user_lookups: AtomicUsize,
    tag_lookups: AtomicUsize,
    fail_relations: AtomicBool,
    fail_tag_lookups: AtomicBool,
}

#[derive(Default)]
struct Inner {
    messages: Vec<Message>,
    pins: Vec<Uuid>,
    tags: HashMap<String, Tag>,
    relations: Vec<(Uuid, Uuid, String)>,
    users: HashMap<Uuid, User>,
}

impl MemoryStore {
    pub fn add_user(&self, username: &str) -> User {
        self.create_user(username, "", "").unwrap()
    }

    pub fn seed_tags(&self, message_id: Uuid, channel_id: Uuid, tags: &[NewTag]) {
        self.upsert_tags(tags).unwrap();
        let hashes: Vec<String> = tags.iter().map(|t| t.hashed_tag.clone()).collect();
        self.create_relations(message_id, channel_id, &hashes).unwrap();
    }

    pub fn store_calls(&self) -> usize {
        self.store_calls.load(Ordering::SeqCst)
    }

    pub fn user_lookups(&self) -> usize {
        self.user_lookups.load(Ordering::SeqCst)
    }

    pub fn tag_lookups(&self) -> usize {
        self.tag_lookups.load(Ordering::SeqCst)
    }

    pub fn relation_count(&self) -> usize {
        self.inner.lock().unwrap().relations.len()
    }

    pub fn fail_relations(&self, fail: bool) {
        self.fail_relations.store(fail, Ordering::SeqCst);
    }

    pub fn fail_tag_lookups(&self, fail: bool) {
        self.fail_tag_lookups.store(fail, Ordering::SeqCst);
    }

    fn touch(&self) {
        self.store_calls.fetch_add(1, Ordering::SeqCst);
    }
}

/// Newest first, later insertions winning ties.
fn newest_first(mut messages: Vec<(usize, Message)>) -> Vec<Message> {
    messages.sort_by(|(ia, a), (ib, b)| b.created_at.cmp(&a.created_at).then(ib.cmp(ia)));
    messages.into_iter().map(|(_, m)| m).collect()
}

fn page(messages: Vec<Message>, limit: i64, offset: i64) -> Vec<Message> {
    messages
        .into_iter()
        .skip(offset.max(0) as usize)
        .take(limit.max(0) as usize)
        .collect()
}

impl MessageStore for MemoryStore {
    fn create(&self, channel_id: Uuid, author_id: Uuid, content: &str) -> Result<Message> {
        self.touch();
        let now = Utc::now();
        let message = Message {
            id: Uuid::new_v4(),
            channel_id,
            author_id,
            content: content.to_string(),
            created_at: now,
            updated_at: now,
        };
        self.inner.lock().unwrap().messages.push(message.clone());
        Ok(message)
    }

    fn get_by_id(&self, id: Uuid) -> Result<Message> {
        self.touch();
        let inner = self.inner.lock().unwrap();
        inner
            .messages
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or(ClipError::MessageNotFound)
    }

    fn list_by_channel(&self, channel_id: Uuid, limit: i64, offset: i64) -> Result<Vec<Message>> {
        self.touch();
        let inner = self.inner.lock().unwrap();
        let matching = inner
            .messages
            .iter()
            .cloned()
            .enumerate()
            .filter(|(_, m)| m.channel_id == channel_id)
            .collect();
        Ok(page(newest_first(matching), limit, offset))
    }

    fn list_in_time_range(
        &self,
        channel_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Message>> {
        self.touch();
        let inner = self.inner.lock().unwrap();
        let matching = inner
            .messages
            .iter()
            .cloned()
            .enumerate()
            .filter(|(_, m)| m.channel_id == channel_id && m.created_at >= start && m.created_at <= end)
            .collect();
        Ok(newest_first(matching))
    }

    fn list_pinned(&self, channel_id: Uuid) -> Result<Vec<Message>> {
        self.touch();
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .pins
            .iter()
            .rev()
            .filter_map(|id| inner.messages.iter().find(|m| m.id == *id))
            .filter(|m| m.channel_id == channel_id)
            .cloned()
            .collect())
    }

    fn patch_content(&self, id: Uuid, content: &str) -> Result<Message> {
        self.touch();
        let mut inner = self.inner.lock().unwrap();
        let message = inner
            .messages
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(ClipError::MessageNotFound)?;
        message.content = content.to_string();
        message.updated_at = Utc::now();
        Ok(message.clone())
    }

    fn pin(&self, id: Uuid) -> Result<()> {
        self.touch();
        let mut inner = self.inner.lock().unwrap();
        if !inner.messages.iter().any(|m| m.id == id) {
            return Err(ClipError::MessageNotFound);
        }
        if inner.pins.contains(&id) {
            return Err(ClipError::AlreadyPinned);
        }
        inner.pins.push(id);
        Ok(())
    }

    fn unpin(&self, id: Uuid) -> Result<()> {
        self.touch();
        let mut inner = self.inner.lock().unwrap();
        let before = inner.pins.len();
        inner.pins.retain(|p| *p != id);
        if inner.pins.len() == before {
            return Err(ClipError::NotPinned);
        }
        Ok(())
    }

    fn delete(&self, id: Uuid) -> Result<()> {
        self.touch();
        let mut inner = self.inner.lock().unwrap();
        let before = inner.messages.len();
        inner.messages.retain(|m| m.id != id);
        if inner.messages.len() == before {
            return Err(ClipError::MessageNotFound);
        }
        inner.pins.retain(|p| *p != id);
        inner.relations.retain(|(m, _, _)| *m != id);
        Ok(())
    }
}

impl TagIndex for MemoryStore {
    fn upsert_tags(&self, tags: &[NewTag]) -> Result<()> {
        self.touch();
        let mut inner = self.inner.lock().unwrap();
        for tag in tags {
            inner
                .tags
                .entry(tag.hashed_tag.clone())
                .and_modify(|t| t.raw_tag = tag.raw_tag.clone())
                .or_insert_with(|| Tag {
                    hashed_tag: tag.hashed_tag.clone(),
                    raw_tag: tag.raw_tag.clone(),
                    created_at: Utc::now(),
                });
        }
        Ok(())
    }

    fn create_relations(&self, message_id: Uuid, channel_id: Uuid, hashed_tags: &[String]) -> Result<()> {
        self.touch();
        if self.fail_relations.load(Ordering::SeqCst) {
            return Err(anyhow!("relation insert rejected").into());
        }
        let mut inner = self.inner.lock().unwrap();
        for hashed in hashed_tags {
            inner.relations.push((message_id, channel_id, hashed.clone()));
        }
        Ok(())
    }

    fn tags_by_message_ids(&self, message_ids: &[Uuid]) -> Result<HashMap<Uuid, Vec<Tag>>> {
        self.tag_lookups.fetch_add(1, Ordering::SeqCst);
        if self.fail_tag_lookups.load(Ordering::SeqCst) {
            return Err(anyhow!("tag lookup unavailable").into());
        }
        let inner = self.inner.lock().unwrap();
        let mut map: HashMap<Uuid, Vec<Tag>> = message_ids.iter().map(|id| (*id, Vec::new())).collect();
        for (message_id, _, hashed) in &inner.relations {
            if let (Some(list), Some(tag)) = (map.get_mut(message_id), inner.tags.get(hashed)) {
                list.push(tag.clone());
            }
        }
        Ok(map)
    }

    fn find_by_tag(&self, hashed_tag: &str, limit: i64, offset: i64) -> Result<Vec<Message>> {
        self.touch();
        let inner = self.inner.lock().unwrap();
        let matching = inner
            .messages
            .iter()
            .cloned()
            .enumerate()
            .filter(|(_, m)| inner.relations.iter().any(|(id, _, h)| *id == m.id && h == hashed_tag))
            .collect();
        Ok(page(newest_first(matching), limit, offset))
    }

    fn find_by_tag_in_channel(
        &self,
        channel_id: Uuid,
        hashed_tag: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Message>> {
        self.touch();
        let inner = self.inner.lock().unwrap();
        let matching = inner
            .messages
            .iter()
            .cloned()
            .enumerate()
            .filter(|(_, m)| {
                inner
                    .relations
                    .iter()
                    .any(|(id, ch, h)| *id == m.id && *ch == channel_id && h == hashed_tag)
            })
            .collect();
        Ok(page(newest_first(matching), limit, offset))
    }

    fn delete_relations_by_message_id(&self, message_id: Uuid) -> Result<()> {
        self.touch();
        self.inner
            .lock()
            .unwrap()
            .relations
            .retain(|(m, _, _)| *m != message_id);
        Ok(())
    }
}

impl UserLookup for MemoryStore {
    fn users_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>> {
        self.user_lookups.fetch_add(1, Ordering::SeqCst);
        let inner = self.inner.lock().unwrap();
        Ok(ids.iter().filter_map(|id| inner.users.get(id).cloned()).collect())
    }
}

impl UserStore for MemoryStore {
    fn create_user(&self, username: &str, nickname: &str, status: &str) -> Result<User> {
        let mut inner = self.inner.lock().unwrap();
        if inner.users.values().any(|u| u.username == username) {
            return Err(ClipError::AlreadyExists);
        }
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            nickname: nickname.to_string(),
            status: status.to_string(),
            created_at: now,
            updated_at: now,
        };
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }
}
