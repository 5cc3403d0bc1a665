pub mod validation;

pub use validation::{slugify, validate_new_category, validate_new_snippet};
