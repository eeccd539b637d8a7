//! Blog posts: listing, creation and author-only editing

pub mod handlers;
mod models;

pub use handlers::get_post;
pub use models::{Post, PostForm, PostId};
