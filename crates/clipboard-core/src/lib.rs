//! Message retrieval and tag indexing.
//!
//! Storage is reached only through the capability traits in [`store`];
//! `clipboard-db` provides the SQLite implementation. The services validate
//! input, orchestrate the stores and hand raw rows to the [`DetailComposer`],
//! which enriches them with authors and tags in one batch round trip each.

pub mod composer;
pub mod error;
pub mod message_service;
pub mod store;
pub mod tag;
pub mod tag_service;
pub mod user_service;

#[cfg(test)]
mod testing;

pub use composer::DetailComposer;
pub use error::{ClipError, Result};
pub use message_service::MessageService;
pub use store::{MessageStore, TagIndex, UserLookup, UserStore};
pub use tag::NewTag;
pub use tag_service::TagService;
pub use user_service::UserService;
