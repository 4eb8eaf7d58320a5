use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Category, Principal};

/// Post entity - a single article on the platform.
///
/// `author_name`/`author_email` are a point-in-time snapshot of the author's
/// profile taken at creation. They are never refreshed afterwards, even when
/// the identity provider reports a changed profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub slug: String,
    pub cover_image: Option<String>,
    pub excerpt: Option<String>,
    pub published: bool,
    pub archived: bool,
    pub author_id: Uuid,
    pub author_name: String,
    pub author_email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post owned by `author`, with generated ID and timestamps.
    pub fn new(
        title: String,
        content: String,
        slug: String,
        cover_image: Option<String>,
        excerpt: Option<String>,
        published: bool,
        author: &Principal,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title,
            content,
            slug,
            cover_image,
            excerpt,
            published,
            archived: false,
            author_id: author.id,
            author_name: author.name.clone(),
            author_email: author.email.clone(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// A post joined with its associated categories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostWithCategories {
    pub post: Post,
    pub categories: Vec<Category>,
}
