//! Service input types and their schema validation.
//!
//! Validation runs before any business logic; failures surface as
//! [`DomainError::Validation`].

use uuid::Uuid;

use crate::error::DomainError;

const TITLE_MAX: usize = 255;
const EXCERPT_MAX: usize = 500;
const COVER_IMAGE_MAX: usize = 2048;
const CATEGORY_NAME_MAX: usize = 100;
const DESCRIPTION_MAX: usize = 500;

/// Input for creating a post.
#[derive(Debug, Clone)]
pub struct CreatePostInput {
    pub title: String,
    pub content: String,
    pub cover_image: Option<String>,
    pub excerpt: Option<String>,
    pub published: bool,
    pub category_ids: Vec<Uuid>,
}

impl CreatePostInput {
    pub fn validate(&self) -> Result<(), DomainError> {
        check_title(&self.title)?;
        if self.content.is_empty() {
            return Err(DomainError::Validation("content must not be empty".into()));
        }
        check_optional(self.excerpt.as_deref(), "excerpt", EXCERPT_MAX)?;
        check_optional(self.cover_image.as_deref(), "cover image", COVER_IMAGE_MAX)?;
        Ok(())
    }
}

/// Partial input for updating a post. Absent fields are left untouched;
/// a present `category_ids` (even an empty list) replaces the full
/// association set. `cover_image` and `excerpt` can be set but not
/// cleared: `None` means "leave as is".
#[derive(Debug, Clone, Default)]
pub struct UpdatePostInput {
    pub title: Option<String>,
    pub content: Option<String>,
    pub cover_image: Option<String>,
    pub excerpt: Option<String>,
    pub published: Option<bool>,
    pub archived: Option<bool>,
    pub category_ids: Option<Vec<Uuid>>,
}

impl UpdatePostInput {
    pub fn validate(&self) -> Result<(), DomainError> {
        if let Some(title) = &self.title {
            check_title(title)?;
        }
        if let Some(content) = &self.content {
            if content.is_empty() {
                return Err(DomainError::Validation("content must not be empty".into()));
            }
        }
        check_optional(self.excerpt.as_deref(), "excerpt", EXCERPT_MAX)?;
        check_optional(self.cover_image.as_deref(), "cover image", COVER_IMAGE_MAX)?;
        Ok(())
    }
}

/// Filters for listing/counting posts. All filters are conjunctive; archived
/// posts are excluded unconditionally.
#[derive(Debug, Clone, Default)]
pub struct PostQuery {
    pub published: Option<bool>,
    pub category_id: Option<Uuid>,
    pub author_id: Option<Uuid>,
    pub search: Option<String>,
}

/// Input for creating a category.
#[derive(Debug, Clone)]
pub struct CreateCategoryInput {
    pub name: String,
    pub description: Option<String>,
}

impl CreateCategoryInput {
    pub fn validate(&self) -> Result<(), DomainError> {
        check_category_name(&self.name)?;
        check_optional(self.description.as_deref(), "description", DESCRIPTION_MAX)
    }
}

/// Partial input for updating a category.
#[derive(Debug, Clone, Default)]
pub struct UpdateCategoryInput {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl UpdateCategoryInput {
    pub fn validate(&self) -> Result<(), DomainError> {
        if let Some(name) = &self.name {
            check_category_name(name)?;
        }
        check_optional(self.description.as_deref(), "description", DESCRIPTION_MAX)
    }
}

fn check_title(title: &str) -> Result<(), DomainError> {
    let len = title.chars().count();
    if len == 0 {
        return Err(DomainError::Validation("title must not be empty".into()));
    }
    if len > TITLE_MAX {
        return Err(DomainError::Validation(format!(
            "title must be at most {TITLE_MAX} characters"
        )));
    }
    Ok(())
}

fn check_category_name(name: &str) -> Result<(), DomainError> {
    let len = name.chars().count();
    if len == 0 {
        return Err(DomainError::Validation("name must not be empty".into()));
    }
    if len > CATEGORY_NAME_MAX {
        return Err(DomainError::Validation(format!(
            "name must be at most {CATEGORY_NAME_MAX} characters"
        )));
    }
    Ok(())
}

fn check_optional(value: Option<&str>, field: &str, max: usize) -> Result<(), DomainError> {
    if let Some(value) = value {
        if value.chars().count() > max {
            return Err(DomainError::Validation(format!(
                "{field} must be at most {max} characters"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_post_valid() {
        let input = CreatePostInput {
            title: "Hello".into(),
            content: "body".into(),
            cover_image: None,
            excerpt: None,
            published: false,
            category_ids: vec![],
        };
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_create_post_rejects_empty_title_and_content() {
        let mut input = CreatePostInput {
            title: "".into(),
            content: "body".into(),
            cover_image: None,
            excerpt: None,
            published: false,
            category_ids: vec![],
        };
        assert!(matches!(
            input.validate(),
            Err(DomainError::Validation(_))
        ));

        input.title = "Hello".into();
        input.content = "".into();
        assert!(matches!(
            input.validate(),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_title_length_bound_is_in_chars() {
        let input = CreatePostInput {
            title: "é".repeat(255),
            content: "body".into(),
            cover_image: None,
            excerpt: None,
            published: false,
            category_ids: vec![],
        };
        assert!(input.validate().is_ok());

        let too_long = CreatePostInput {
            title: "é".repeat(256),
            ..input
        };
        assert!(too_long.validate().is_err());
    }

    #[test]
    fn test_excerpt_bound() {
        let input = CreatePostInput {
            title: "Hello".into(),
            content: "body".into(),
            cover_image: None,
            excerpt: Some("x".repeat(501)),
            published: false,
            category_ids: vec![],
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_update_post_empty_is_valid() {
        assert!(UpdatePostInput::default().validate().is_ok());
    }

    #[test]
    fn test_category_name_bounds() {
        let input = CreateCategoryInput {
            name: "x".repeat(101),
            description: None,
        };
        assert!(input.validate().is_err());

        let input = CreateCategoryInput {
            name: "Tech".into(),
            description: None,
        };
        assert!(input.validate().is_ok());
    }
}
