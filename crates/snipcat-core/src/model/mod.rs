pub mod category;
pub mod code;
pub mod snippet;

pub use category::{Category, NewCategory};
pub use code::SnippetCode;
pub use snippet::{NewSnippet, Snippet};
