//! In-memory repositories - used as fallback when no database is configured,
//! and as the test double for content-service behavior tests.
//!
//! The single lock around the whole store mirrors the store-level guarantees
//! the service relies on: unique constraints, cascade deletes, and atomic
//! association replacement. Data is lost on process restart.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::domain::{Category, CategoryWithCount, Post};
use quill_core::error::RepoError;
use quill_core::ports::{CategoryRepository, PostFilter, PostRepository};

#[derive(Default)]
struct StoreInner {
    posts: HashMap<Uuid, Post>,
    categories: HashMap<Uuid, Category>,
    associations: HashSet<(Uuid, Uuid)>,
}

impl StoreInner {
    fn slug_taken(&self, slug: &str, exclude: Option<Uuid>) -> bool {
        self.posts
            .values()
            .any(|p| p.slug == slug && Some(p.id) != exclude)
    }

    fn category_taken(&self, name: &str, slug: &str, exclude: Option<Uuid>) -> bool {
        self.categories
            .values()
            .any(|c| (c.name == name || c.slug == slug) && Some(c.id) != exclude)
    }

    /// Every id must pass this check before any association row is written,
    /// so a rejected set leaves the store exactly as it was.
    fn check_category_ids(&self, category_ids: &[Uuid]) -> Result<(), RepoError> {
        for cid in category_ids {
            if !self.categories.contains_key(cid) {
                return Err(RepoError::Constraint(format!(
                    "foreign key violation: category {cid} does not exist"
                )));
            }
        }
        Ok(())
    }

    fn link_categories(&mut self, post_id: Uuid, category_ids: &[Uuid]) {
        for cid in category_ids {
            self.associations.insert((post_id, *cid));
        }
    }
}

/// Shared backing store for the in-memory repository pair.
#[derive(Default)]
pub struct InMemoryStore {
    inner: RwLock<StoreInner>,
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Build the post and category repositories over this store.
    pub fn repositories(
        self: &Arc<Self>,
    ) -> (InMemoryPostRepository, InMemoryCategoryRepository) {
        (
            InMemoryPostRepository {
                store: Arc::clone(self),
            },
            InMemoryCategoryRepository {
                store: Arc::clone(self),
            },
        )
    }
}

/// In-memory post repository.
pub struct InMemoryPostRepository {
    store: Arc<InMemoryStore>,
}

/// In-memory category repository.
pub struct InMemoryCategoryRepository {
    store: Arc<InMemoryStore>,
}

fn matches_filter(post: &Post, filter: &PostFilter) -> bool {
    if post.archived {
        return false;
    }
    if let Some(published) = filter.published {
        if post.published != published {
            return false;
        }
    }
    if let Some(author_id) = filter.author_id {
        if post.author_id != author_id {
            return false;
        }
    }
    if let Some(ids) = &filter.ids {
        if !ids.contains(&post.id) {
            return false;
        }
    }
    if let Some(search) = &filter.search {
        let needle = search.to_lowercase();
        let in_title = post.title.to_lowercase().contains(&needle);
        let in_content = post.content.to_lowercase().contains(&needle);
        let in_excerpt = post
            .excerpt
            .as_deref()
            .is_some_and(|e| e.to_lowercase().contains(&needle));
        if !in_title && !in_content && !in_excerpt {
            return false;
        }
    }
    true
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let inner = self.store.inner.read().await;
        Ok(inner.posts.get(&id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        let inner = self.store.inner.read().await;
        Ok(inner.posts.values().find(|p| p.slug == slug).cloned())
    }

    async fn slug_taken(&self, slug: &str, exclude: Option<Uuid>) -> Result<bool, RepoError> {
        let inner = self.store.inner.read().await;
        Ok(inner.slug_taken(slug, exclude))
    }

    async fn insert(&self, new_post: Post, category_ids: &[Uuid]) -> Result<Post, RepoError> {
        let mut inner = self.store.inner.write().await;

        if inner.slug_taken(&new_post.slug, None) {
            return Err(RepoError::Constraint(format!(
                "unique violation: slug '{}'",
                new_post.slug
            )));
        }
        inner.check_category_ids(category_ids)?;
        inner.link_categories(new_post.id, category_ids);
        inner.posts.insert(new_post.id, new_post.clone());

        Ok(new_post)
    }

    async fn update(
        &self,
        updated: Post,
        category_ids: Option<&[Uuid]>,
    ) -> Result<Post, RepoError> {
        let mut inner = self.store.inner.write().await;

        if !inner.posts.contains_key(&updated.id) {
            return Err(RepoError::NotFound);
        }
        if inner.slug_taken(&updated.slug, Some(updated.id)) {
            return Err(RepoError::Constraint(format!(
                "unique violation: slug '{}'",
                updated.slug
            )));
        }

        if let Some(ids) = category_ids {
            inner.check_category_ids(ids)?;
            inner.associations.retain(|(pid, _)| *pid != updated.id);
            inner.link_categories(updated.id, ids);
        }
        inner.posts.insert(updated.id, updated.clone());

        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut inner = self.store.inner.write().await;

        if inner.posts.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        inner.associations.retain(|(pid, _)| *pid != id);

        Ok(())
    }

    async fn list(
        &self,
        filter: &PostFilter,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<Post>, RepoError> {
        let inner = self.store.inner.read().await;

        let mut result: Vec<Post> = inner
            .posts
            .values()
            .filter(|p| matches_filter(p, filter))
            .cloned()
            .collect();
        result.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        Ok(result
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn count(&self, filter: &PostFilter) -> Result<u64, RepoError> {
        let inner = self.store.inner.read().await;
        Ok(inner
            .posts
            .values()
            .filter(|p| matches_filter(p, filter))
            .count() as u64)
    }

    async fn find_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError> {
        let inner = self.store.inner.read().await;

        let mut result: Vec<Post> = inner
            .posts
            .values()
            .filter(|p| p.author_id == author_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

        Ok(result)
    }

    async fn categories_of(&self, post_id: Uuid) -> Result<Vec<Category>, RepoError> {
        let inner = self.store.inner.read().await;

        let mut result: Vec<Category> = inner
            .associations
            .iter()
            .filter(|(pid, _)| *pid == post_id)
            .filter_map(|(_, cid)| inner.categories.get(cid).cloned())
            .collect();
        result.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(result)
    }

    async fn ids_in_category(&self, category_id: Uuid) -> Result<Vec<Uuid>, RepoError> {
        let inner = self.store.inner.read().await;
        Ok(inner
            .associations
            .iter()
            .filter(|(_, cid)| *cid == category_id)
            .map(|(pid, _)| *pid)
            .collect())
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, RepoError> {
        let inner = self.store.inner.read().await;
        Ok(inner.categories.get(&id).cloned())
    }

    async fn name_or_slug_taken(
        &self,
        name: &str,
        slug: &str,
        exclude: Option<Uuid>,
    ) -> Result<bool, RepoError> {
        let inner = self.store.inner.read().await;
        Ok(inner.category_taken(name, slug, exclude))
    }

    async fn insert(&self, new_category: Category) -> Result<Category, RepoError> {
        let mut inner = self.store.inner.write().await;

        if inner.category_taken(&new_category.name, &new_category.slug, None) {
            return Err(RepoError::Constraint(format!(
                "unique violation: category '{}'",
                new_category.name
            )));
        }
        inner.categories.insert(new_category.id, new_category.clone());

        Ok(new_category)
    }

    async fn update(&self, updated: Category) -> Result<Category, RepoError> {
        let mut inner = self.store.inner.write().await;

        if !inner.categories.contains_key(&updated.id) {
            return Err(RepoError::NotFound);
        }
        if inner.category_taken(&updated.name, &updated.slug, Some(updated.id)) {
            return Err(RepoError::Constraint(format!(
                "unique violation: category '{}'",
                updated.name
            )));
        }
        inner.categories.insert(updated.id, updated.clone());

        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut inner = self.store.inner.write().await;

        if inner.categories.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        inner.associations.retain(|(_, cid)| *cid != id);

        Ok(())
    }

    async fn list_with_counts(&self) -> Result<Vec<CategoryWithCount>, RepoError> {
        let inner = self.store.inner.read().await;

        let mut result: Vec<CategoryWithCount> = inner
            .categories
            .values()
            .map(|c| CategoryWithCount {
                category: c.clone(),
                post_count: inner
                    .associations
                    .iter()
                    .filter(|(_, cid)| *cid == c.id)
                    .count() as u64,
            })
            .collect();
        result.sort_by(|a, b| a.category.name.cmp(&b.category.name));

        Ok(result)
    }
}
