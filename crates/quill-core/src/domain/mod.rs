//! Domain entities - the core business objects.

mod category;
mod post;
mod principal;

pub use category::{Category, CategoryWithCount};
pub use post::{Post, PostWithCategories};
pub use principal::Principal;
