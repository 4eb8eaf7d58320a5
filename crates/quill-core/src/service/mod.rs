//! Content service - the authorization and business-rule layer.
//!
//! Implements post CRUD, category CRUD, and the list/search/pagination query
//! contract on top of the repository ports. Stateless: every call stands
//! alone, and all state lives behind the persistence port.

mod categories;
mod input;
mod posts;

use std::sync::Arc;

use crate::ports::{CategoryRepository, PostRepository};

pub use input::{
    CreateCategoryInput, CreatePostInput, PostQuery, UpdateCategoryInput, UpdatePostInput,
};

/// The content-management engine.
///
/// Protected operations take the resolved [`crate::domain::Principal`]
/// explicitly; the transport layer is responsible for rejecting calls that
/// arrive without one.
pub struct ContentService {
    posts: Arc<dyn PostRepository>,
    categories: Arc<dyn CategoryRepository>,
}

impl ContentService {
    pub fn new(posts: Arc<dyn PostRepository>, categories: Arc<dyn CategoryRepository>) -> Self {
        Self { posts, categories }
    }
}
