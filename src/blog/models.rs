//! Blog models

use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub use crate::db::Post;

/// Post id from the URL. Segments that are not an integer id match no
/// post, so they are a 404 rather than a bad request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostId(pub i64);

impl<S> FromRequestParts<S> for PostId
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self> {
        let Path(id) = Path::<i64>::from_request_parts(parts, state)
            .await
            .map_err(|_| Error::NotFound("Not Found".to_string()))?;
        Ok(PostId(id))
    }
}

/// Submitted create/update form. The body may be empty; the title may not.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct PostForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
}

impl PostForm {
    /// Form prefilled with a stored post
    pub fn from_post(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            body: post.body.clone(),
        }
    }

    pub fn validate(&self) -> Option<&'static str> {
        self.title.is_empty().then_some("Title is required.")
    }
}
