//! SeaORM entities mirroring the relational schema.

pub mod category;
pub mod post;
pub mod post_category;
