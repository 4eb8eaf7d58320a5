//! PostgreSQL repository implementations.
//!
//! Uniqueness is enforced by the store's constraints; the service-level
//! pre-checks are a convenience only. Post writes and their association
//! changes share one transaction so a concurrent reader never observes an
//! empty association set mid-update.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DbConn, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use quill_core::domain::{Category, CategoryWithCount, Post};
use quill_core::error::RepoError;
use quill_core::ports::{CategoryRepository, PostFilter, PostRepository};

use super::entity::{category, post, post_category};

/// PostgreSQL post repository.
pub struct PostgresPostRepository {
    db: DbConn,
}

impl PostgresPostRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

/// PostgreSQL category repository.
pub struct PostgresCategoryRepository {
    db: DbConn,
}

impl PostgresCategoryRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

fn query_err(e: DbErr) -> RepoError {
    RepoError::Query(e.to_string())
}

/// Map write failures: unique/foreign-key violations become `Constraint` so
/// a lost uniqueness race surfaces the same way as a pre-check failure.
fn write_err(e: DbErr) -> RepoError {
    if matches!(e, DbErr::RecordNotUpdated) {
        return RepoError::NotFound;
    }
    let err_str = e.to_string();
    if err_str.contains("duplicate") || err_str.contains("unique") || err_str.contains("foreign key")
    {
        RepoError::Constraint(err_str)
    } else {
        RepoError::Query(err_str)
    }
}

/// Escape LIKE wildcards so search input matches literally.
fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Build the WHERE condition for list/count. Archived posts are excluded
/// unconditionally; all other filters are conjunctive.
fn filter_condition(filter: &PostFilter) -> Condition {
    let mut cond = Condition::all().add(post::Column::Archived.eq(false));

    if let Some(published) = filter.published {
        cond = cond.add(post::Column::Published.eq(published));
    }
    if let Some(author_id) = filter.author_id {
        cond = cond.add(post::Column::AuthorId.eq(author_id));
    }
    if let Some(ids) = &filter.ids {
        cond = cond.add(post::Column::Id.is_in(ids.iter().copied()));
    }
    if let Some(search) = &filter.search {
        let pattern = format!("%{}%", escape_like(&search.to_lowercase()));
        cond = cond.add(
            Condition::any()
                .add(Expr::expr(Func::lower(Expr::col(post::Column::Title))).like(pattern.as_str()))
                .add(
                    Expr::expr(Func::lower(Expr::col(post::Column::Content)))
                        .like(pattern.as_str()),
                )
                .add(
                    Expr::expr(Func::lower(Expr::col(post::Column::Excerpt)))
                        .like(pattern.as_str()),
                ),
        );
    }

    cond
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let result = post::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        let result = post::Entity::find()
            .filter(post::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.map(Into::into))
    }

    async fn slug_taken(&self, slug: &str, exclude: Option<Uuid>) -> Result<bool, RepoError> {
        let mut query = post::Entity::find().filter(post::Column::Slug.eq(slug));
        if let Some(id) = exclude {
            query = query.filter(post::Column::Id.ne(id));
        }

        let count = query.count(&self.db).await.map_err(query_err)?;
        Ok(count > 0)
    }

    async fn insert(&self, new_post: Post, category_ids: &[Uuid]) -> Result<Post, RepoError> {
        let txn = self.db.begin().await.map_err(query_err)?;

        let model: post::ActiveModel = new_post.clone().into();
        model.insert(&txn).await.map_err(write_err)?;

        if !category_ids.is_empty() {
            let rows = category_ids.iter().map(|cid| post_category::ActiveModel {
                post_id: Set(new_post.id),
                category_id: Set(*cid),
            });
            post_category::Entity::insert_many(rows)
                .exec(&txn)
                .await
                .map_err(write_err)?;
        }

        txn.commit().await.map_err(query_err)?;
        Ok(new_post)
    }

    async fn update(
        &self,
        updated: Post,
        category_ids: Option<&[Uuid]>,
    ) -> Result<Post, RepoError> {
        let txn = self.db.begin().await.map_err(query_err)?;

        let model: post::ActiveModel = updated.clone().into();
        model.update(&txn).await.map_err(write_err)?;

        // Replace-all semantics: a present category set drops every existing
        // association before inserting the new ones, inside this transaction.
        if let Some(ids) = category_ids {
            post_category::Entity::delete_many()
                .filter(post_category::Column::PostId.eq(updated.id))
                .exec(&txn)
                .await
                .map_err(query_err)?;

            if !ids.is_empty() {
                let rows = ids.iter().map(|cid| post_category::ActiveModel {
                    post_id: Set(updated.id),
                    category_id: Set(*cid),
                });
                post_category::Entity::insert_many(rows)
                    .exec(&txn)
                    .await
                    .map_err(write_err)?;
            }
        }

        txn.commit().await.map_err(query_err)?;
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let result = post::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(query_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }

    async fn list(
        &self,
        filter: &PostFilter,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<Post>, RepoError> {
        let result = post::Entity::find()
            .filter(filter_condition(filter))
            .order_by_desc(post::Column::CreatedAt)
            .order_by_desc(post::Column::Id)
            .limit(limit)
            .offset(offset)
            .all(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn count(&self, filter: &PostFilter) -> Result<u64, RepoError> {
        post::Entity::find()
            .filter(filter_condition(filter))
            .count(&self.db)
            .await
            .map_err(query_err)
    }

    async fn find_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError> {
        let result = post::Entity::find()
            .filter(post::Column::AuthorId.eq(author_id))
            .order_by_desc(post::Column::UpdatedAt)
            .all(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn categories_of(&self, post_id: Uuid) -> Result<Vec<Category>, RepoError> {
        let ids: Vec<Uuid> = post_category::Entity::find()
            .filter(post_category::Column::PostId.eq(post_id))
            .all(&self.db)
            .await
            .map_err(query_err)?
            .into_iter()
            .map(|row| row.category_id)
            .collect();

        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = category::Entity::find()
            .filter(category::Column::Id.is_in(ids))
            .order_by_asc(category::Column::Name)
            .all(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn ids_in_category(&self, category_id: Uuid) -> Result<Vec<Uuid>, RepoError> {
        let rows = post_category::Entity::find()
            .filter(post_category::Column::CategoryId.eq(category_id))
            .all(&self.db)
            .await
            .map_err(query_err)?;

        Ok(rows.into_iter().map(|row| row.post_id).collect())
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, RepoError> {
        let result = category::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.map(Into::into))
    }

    async fn name_or_slug_taken(
        &self,
        name: &str,
        slug: &str,
        exclude: Option<Uuid>,
    ) -> Result<bool, RepoError> {
        let mut query = category::Entity::find().filter(
            Condition::any()
                .add(category::Column::Name.eq(name))
                .add(category::Column::Slug.eq(slug)),
        );
        if let Some(id) = exclude {
            query = query.filter(category::Column::Id.ne(id));
        }

        let count = query.count(&self.db).await.map_err(query_err)?;
        Ok(count > 0)
    }

    async fn insert(&self, new_category: Category) -> Result<Category, RepoError> {
        let model: category::ActiveModel = new_category.clone().into();
        model.insert(&self.db).await.map_err(write_err)?;

        Ok(new_category)
    }

    async fn update(&self, updated: Category) -> Result<Category, RepoError> {
        let model: category::ActiveModel = updated.clone().into();
        model.update(&self.db).await.map_err(write_err)?;

        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let result = category::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(query_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }

    async fn list_with_counts(&self) -> Result<Vec<CategoryWithCount>, RepoError> {
        let categories = category::Entity::find()
            .order_by_asc(category::Column::Name)
            .all(&self.db)
            .await
            .map_err(query_err)?;

        let counts: Vec<(Uuid, i64)> = post_category::Entity::find()
            .select_only()
            .column(post_category::Column::CategoryId)
            .column_as(post_category::Column::PostId.count(), "post_count")
            .group_by(post_category::Column::CategoryId)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(query_err)?;
        let counts: HashMap<Uuid, i64> = counts.into_iter().collect();

        Ok(categories
            .into_iter()
            .map(|model| {
                let post_count = counts.get(&model.id).copied().unwrap_or(0) as u64;
                CategoryWithCount {
                    category: model.into(),
                    post_count,
                }
            })
            .collect())
    }
}
