mod article;
mod category;
mod country;
mod search;

pub use article::{Article, ArticleFilter, SortOption};
pub use category::{Category, SAVED_CATEGORY};
pub use country::Country;
pub use search::Search;
