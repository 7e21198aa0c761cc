use std::sync::Arc;

use clipboard_core::{MessageService, TagService, UserService};

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub messages: MessageService,
    pub tags: TagService,
    pub users: UserService,
}
