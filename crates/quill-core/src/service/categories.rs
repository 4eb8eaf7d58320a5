//! Category operations.
//!
//! Categories are a shared taxonomy: any authenticated principal may create,
//! rename, or delete any category. The transport layer enforces the
//! authentication gate; no per-resource ownership applies here.

use uuid::Uuid;

use crate::domain::{Category, CategoryWithCount, Principal};
use crate::error::DomainError;
use crate::slug::slugify;

use super::{ContentService, CreateCategoryInput, UpdateCategoryInput};

impl ContentService {
    /// Public, unpaginated category listing with per-category post counts.
    pub async fn list_categories(&self) -> Result<Vec<CategoryWithCount>, DomainError> {
        Ok(self.categories.list_with_counts().await?)
    }

    /// Create a category. The slug is derived from the name; both must be
    /// globally unique.
    pub async fn create_category(
        &self,
        input: CreateCategoryInput,
        _principal: &Principal,
    ) -> Result<Category, DomainError> {
        input.validate()?;

        let slug = derive_slug(&input.name)?;
        if self
            .categories
            .name_or_slug_taken(&input.name, &slug, None)
            .await?
        {
            return Err(DomainError::Conflict(format!(
                "a category named '{}' already exists",
                input.name
            )));
        }

        let category = Category::new(input.name, slug, input.description);
        Ok(self.categories.insert(category).await?)
    }

    /// Update a category. Renaming re-derives the slug, which must not
    /// collide with another category's.
    pub async fn update_category(
        &self,
        id: Uuid,
        input: UpdateCategoryInput,
        _principal: &Principal,
    ) -> Result<Category, DomainError> {
        input.validate()?;

        let mut category = self
            .categories
            .find_by_id(id)
            .await?
            .ok_or(DomainError::NotFound { entity: "Category" })?;

        if let Some(name) = input.name {
            let slug = derive_slug(&name)?;
            if (name != category.name || slug != category.slug)
                && self
                    .categories
                    .name_or_slug_taken(&name, &slug, Some(id))
                    .await?
            {
                return Err(DomainError::Conflict(format!(
                    "a category named '{name}' already exists"
                )));
            }
            category.name = name;
            category.slug = slug;
        }
        if let Some(description) = input.description {
            category.description = Some(description);
        }

        Ok(self.categories.update(category).await?)
    }

    /// Delete a category; its post associations are removed by cascade and
    /// the posts themselves are unaffected.
    pub async fn delete_category(
        &self,
        id: Uuid,
        _principal: &Principal,
    ) -> Result<(), DomainError> {
        self.categories
            .find_by_id(id)
            .await?
            .ok_or(DomainError::NotFound { entity: "Category" })?;

        Ok(self.categories.delete(id).await?)
    }
}

fn derive_slug(name: &str) -> Result<String, DomainError> {
    let slug = slugify(name);
    if slug.is_empty() {
        return Err(DomainError::Validation(
            "name must contain at least one representable character".into(),
        ));
    }
    Ok(slug)
}
