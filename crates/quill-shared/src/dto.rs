//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use quill_core::domain::{Category, CategoryWithCount, Post, PostWithCategories};

/// Request to create a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
    pub cover_image: Option<String>,
    pub excerpt: Option<String>,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub category_ids: Vec<Uuid>,
}

/// Request to update a post. Absent fields are left untouched; a present
/// `category_ids` (even `[]`) replaces the post's full category set.
///
/// For `cover_image` and `excerpt`, `null` and absent are equivalent: both
/// leave the stored value as is. There is no way to clear either field
/// through this request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub cover_image: Option<String>,
    pub excerpt: Option<String>,
    pub published: Option<bool>,
    pub archived: Option<bool>,
    pub category_ids: Option<Vec<Uuid>>,
}

/// Query parameters for listing or counting posts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListPostsParams {
    pub published: Option<bool>,
    pub category_id: Option<Uuid>,
    pub author_id: Option<Uuid>,
    pub search: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// Request to create a category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub description: Option<String>,
}

/// Request to update a category.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// A post as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
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

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            title: post.title,
            content: post.content,
            slug: post.slug,
            cover_image: post.cover_image,
            excerpt: post.excerpt,
            published: post.published,
            archived: post.archived,
            author_id: post.author_id,
            author_name: post.author_name,
            author_email: post.author_email,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

/// A post joined with its categories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDetailResponse {
    #[serde(flatten)]
    pub post: PostResponse,
    pub categories: Vec<CategoryResponse>,
}

impl From<PostWithCategories> for PostDetailResponse {
    fn from(detail: PostWithCategories) -> Self {
        Self {
            post: detail.post.into(),
            categories: detail.categories.into_iter().map(Into::into).collect(),
        }
    }
}

/// A category as returned by the API, optionally annotated with the number
/// of posts associated with it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryResponse {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_count: Option<u64>,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
            slug: category.slug,
            description: category.description,
            created_at: category.created_at,
            post_count: None,
        }
    }
}

impl From<CategoryWithCount> for CategoryResponse {
    fn from(annotated: CategoryWithCount) -> Self {
        let mut response: Self = annotated.category.into();
        response.post_count = Some(annotated.post_count);
        response
    }
}

/// Response for the post count endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountResponse {
    pub count: u64,
}
