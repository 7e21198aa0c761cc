use std::sync::Arc;

use tracing::debug;

use clipboard_types::models::User;

use crate::error::{ClipError, Result};
use crate::store::UserStore;

/// Registers authors so messages have someone to compose against.
/// Name format rules belong to the account system, not here.
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserStore>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    pub fn create_user(&self, username: &str, nickname: &str, status: &str) -> Result<User> {
        let username = username.trim();
        if username.is_empty() {
            return Err(ClipError::InvalidUser("username must not be empty".into()));
        }
        let user = self.users.create_user(username, nickname, status)?;
        debug!(user_id = %user.id, "user created");
        Ok(user)
    }
}
