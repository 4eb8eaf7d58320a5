use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Category, CategoryWithCount, Post};
use crate::error::RepoError;

/// Conjunctive filters for post listing and counting.
///
/// Archived posts are always excluded by `list` and `count`, regardless of
/// any filter combination. `ids` restricts the result to the given post ids
/// (used for category filtering, resolved by the content service).
#[derive(Debug, Clone, Default)]
pub struct PostFilter {
    pub published: Option<bool>,
    pub author_id: Option<Uuid>,
    /// Case-insensitive substring match against title, content, or excerpt.
    pub search: Option<String>,
    pub ids: Option<Vec<Uuid>>,
}

/// Post repository.
///
/// Writes that violate a store-level unique constraint must surface as
/// `RepoError::Constraint`. `insert` and `update` persist the post row and
/// its category associations inside a single transaction; on update, a
/// `Some` category set replaces all existing associations, while `None`
/// leaves them untouched.
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError>;

    /// Whether any post other than `exclude` already uses `slug`.
    async fn slug_taken(&self, slug: &str, exclude: Option<Uuid>) -> Result<bool, RepoError>;

    async fn insert(&self, post: Post, category_ids: &[Uuid]) -> Result<Post, RepoError>;

    async fn update(&self, post: Post, category_ids: Option<&[Uuid]>) -> Result<Post, RepoError>;

    /// Delete a post; association rows are removed by cascade.
    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;

    /// List non-archived posts matching `filter`, ordered by creation time
    /// descending with id descending as tie-break.
    async fn list(&self, filter: &PostFilter, limit: u64, offset: u64)
    -> Result<Vec<Post>, RepoError>;

    /// Count non-archived posts matching `filter`.
    async fn count(&self, filter: &PostFilter) -> Result<u64, RepoError>;

    /// All of an author's posts (any publish/archive state), ordered by
    /// last-updated descending.
    async fn find_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError>;

    /// Categories associated with a post.
    async fn categories_of(&self, post_id: Uuid) -> Result<Vec<Category>, RepoError>;

    /// Ids of all posts associated with a category.
    async fn ids_in_category(&self, category_id: Uuid) -> Result<Vec<Uuid>, RepoError>;
}

/// Category repository.
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, RepoError>;

    /// Whether any category other than `exclude` already uses `name` or `slug`.
    async fn name_or_slug_taken(
        &self,
        name: &str,
        slug: &str,
        exclude: Option<Uuid>,
    ) -> Result<bool, RepoError>;

    async fn insert(&self, category: Category) -> Result<Category, RepoError>;

    async fn update(&self, category: Category) -> Result<Category, RepoError>;

    /// Delete a category; association rows are removed by cascade.
    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;

    /// All categories ordered by name, annotated with per-category post counts.
    async fn list_with_counts(&self) -> Result<Vec<CategoryWithCount>, RepoError>;
}
