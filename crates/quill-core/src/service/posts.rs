//! Post operations: lifecycle, ownership, visibility, and the query contract.

use chrono::Utc;
use uuid::Uuid;

use crate::domain::{Post, PostWithCategories, Principal};
use crate::error::DomainError;
use crate::ports::PostFilter;
use crate::slug::slugify;

use super::{ContentService, CreatePostInput, PostQuery, UpdatePostInput};

impl ContentService {
    /// Create a post owned by `principal`.
    ///
    /// The slug is derived from the title and must not collide with any
    /// existing post. The author's name and email are captured as a
    /// point-in-time snapshot.
    pub async fn create_post(
        &self,
        input: CreatePostInput,
        principal: &Principal,
    ) -> Result<Post, DomainError> {
        input.validate()?;

        let slug = derive_slug(&input.title)?;
        if self.posts.slug_taken(&slug, None).await? {
            return Err(DomainError::Conflict(format!(
                "a post with slug '{slug}' already exists"
            )));
        }

        let post = Post::new(
            input.title,
            input.content,
            slug,
            input.cover_image,
            input.excerpt,
            input.published,
            principal,
        );

        Ok(self.posts.insert(post, &input.category_ids).await?)
    }

    /// Update a post. Only the owner may update; a changed title re-derives
    /// the slug and is checked against all other posts. A present
    /// `category_ids` replaces the full association set.
    pub async fn update_post(
        &self,
        id: Uuid,
        input: UpdatePostInput,
        principal: &Principal,
    ) -> Result<Post, DomainError> {
        input.validate()?;

        let mut post = self
            .posts
            .find_by_id(id)
            .await?
            .ok_or(DomainError::NotFound { entity: "Post" })?;
        if post.author_id != principal.id {
            return Err(DomainError::Forbidden);
        }

        if let Some(title) = input.title {
            let slug = derive_slug(&title)?;
            if slug != post.slug && self.posts.slug_taken(&slug, Some(id)).await? {
                return Err(DomainError::Conflict(format!(
                    "a post with slug '{slug}' already exists"
                )));
            }
            post.title = title;
            post.slug = slug;
        }
        if let Some(content) = input.content {
            post.content = content;
        }
        if let Some(cover_image) = input.cover_image {
            post.cover_image = Some(cover_image);
        }
        if let Some(excerpt) = input.excerpt {
            post.excerpt = Some(excerpt);
        }
        if let Some(published) = input.published {
            post.published = published;
        }
        if let Some(archived) = input.archived {
            post.archived = archived;
        }
        // author_name/author_email are deliberately never touched here.
        post.updated_at = Utc::now();

        Ok(self.posts.update(post, input.category_ids.as_deref()).await?)
    }

    /// Delete a post. Only the owner may delete; associations go with it.
    pub async fn delete_post(&self, id: Uuid, principal: &Principal) -> Result<(), DomainError> {
        let post = self
            .posts
            .find_by_id(id)
            .await?
            .ok_or(DomainError::NotFound { entity: "Post" })?;
        if post.author_id != principal.id {
            return Err(DomainError::Forbidden);
        }

        Ok(self.posts.delete(id).await?)
    }

    /// Public lookup by slug.
    ///
    /// Drafts are visible only to their own author; everyone else gets
    /// `NotFound`. Archived state does not gate this lookup, so an author
    /// can still reach an archived post by its slug.
    pub async fn get_post_by_slug(
        &self,
        slug: &str,
        principal: Option<&Principal>,
    ) -> Result<PostWithCategories, DomainError> {
        let post = self
            .posts
            .find_by_slug(slug)
            .await?
            .ok_or(DomainError::NotFound { entity: "Post" })?;

        let is_author = principal.is_some_and(|p| p.id == post.author_id);
        if !post.published && !is_author {
            return Err(DomainError::NotFound { entity: "Post" });
        }

        let categories = self.posts.categories_of(post.id).await?;
        Ok(PostWithCategories { post, categories })
    }

    /// Public listing. Filters are conjunctive; archived posts never appear.
    /// Ordered by creation time descending, id descending as tie-break.
    /// `limit`/`offset` are honored as received; has-more detection is the
    /// caller's responsibility.
    pub async fn list_posts(
        &self,
        query: &PostQuery,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<Post>, DomainError> {
        match self.resolve_filter(query).await? {
            Some(filter) => Ok(self.posts.list(&filter, limit, offset).await?),
            None => Ok(Vec::new()),
        }
    }

    /// Count posts matching the same filter semantics as [`Self::list_posts`].
    pub async fn count_posts(&self, query: &PostQuery) -> Result<u64, DomainError> {
        match self.resolve_filter(query).await? {
            Some(filter) => Ok(self.posts.count(&filter).await?),
            None => Ok(0),
        }
    }

    /// All of the principal's own posts, any state, last-updated first.
    pub async fn get_user_posts(&self, principal: &Principal) -> Result<Vec<Post>, DomainError> {
        Ok(self.posts.find_by_author(principal.id).await?)
    }

    /// Ownership-gated lookup by id, joined with categories. Used for
    /// edit-form hydration.
    pub async fn get_post(
        &self,
        id: Uuid,
        principal: &Principal,
    ) -> Result<PostWithCategories, DomainError> {
        let post = self
            .posts
            .find_by_id(id)
            .await?
            .ok_or(DomainError::NotFound { entity: "Post" })?;
        if post.author_id != principal.id {
            return Err(DomainError::Forbidden);
        }

        let categories = self.posts.categories_of(post.id).await?;
        Ok(PostWithCategories { post, categories })
    }

    /// Translate a [`PostQuery`] into a repository filter. A category filter
    /// is resolved by collecting the associated post ids first; `None` means
    /// the category has no posts and the result is empty without further
    /// querying.
    async fn resolve_filter(&self, query: &PostQuery) -> Result<Option<PostFilter>, DomainError> {
        let mut filter = PostFilter {
            published: query.published,
            author_id: query.author_id,
            search: query.search.clone(),
            ids: None,
        };

        if let Some(category_id) = query.category_id {
            let ids = self.posts.ids_in_category(category_id).await?;
            if ids.is_empty() {
                return Ok(None);
            }
            filter.ids = Some(ids);
        }

        Ok(Some(filter))
    }
}

fn derive_slug(title: &str) -> Result<String, DomainError> {
    let slug = slugify(title);
    if slug.is_empty() {
        return Err(DomainError::Validation(
            "title must contain at least one representable character".into(),
        ));
    }
    Ok(slug)
}
