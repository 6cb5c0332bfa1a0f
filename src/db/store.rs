use std::future::Future;

use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{Article, ArticleFilter, Category, Search};

/// The narrow persistence interface the sync service and the front end work
/// through. Every write is committed before the returned future resolves.
pub trait Store: Send + Sync {
    fn find_article(&self, id: i64) -> impl Future<Output = Result<Option<Article>>> + Send;

    fn find_article_by_url(&self, url: &str) -> impl Future<Output = Result<Option<Article>>> + Send;

    /// Articles matching `filter`, newest first.
    fn list_articles(&self, filter: &ArticleFilter) -> impl Future<Output = Result<Vec<Article>>> + Send;

    /// Returns the new row id, or `None` when an article with the same URL
    /// already exists.
    fn insert_article(&self, article: &Article) -> impl Future<Output = Result<Option<i64>>> + Send;

    /// Writes the user-editable fields: category, notes and both save flags.
    fn update_article(&self, article: &Article) -> impl Future<Output = Result<()>> + Send;

    fn delete_article(&self, id: i64) -> impl Future<Output = Result<bool>> + Send;

    fn find_category_by_name(&self, name: &str) -> impl Future<Output = Result<Option<Category>>> + Send;

    fn list_categories(&self) -> impl Future<Output = Result<Vec<Category>>> + Send;

    /// Returns `false` when a category with the same name already exists.
    fn insert_category(&self, category: &Category) -> impl Future<Output = Result<bool>> + Send;

    /// Returns `false` when the keyword is already in the history.
    fn insert_search(&self, search: &Search) -> impl Future<Output = Result<bool>> + Send;

    /// Most recent first.
    fn list_searches(&self, limit: usize) -> impl Future<Output = Result<Vec<Search>>> + Send;

    fn delete_search(&self, id: Uuid) -> impl Future<Output = Result<bool>> + Send;

    /// Upsert-by-name: returns the existing category or creates it. An existing
    /// category is never modified.
    fn category_named(&self, name: &str) -> impl Future<Output = Result<Category>> + Send {
        async move {
            if let Some(existing) = self.find_category_by_name(name).await? {
                return Ok(existing);
            }

            let category = Category::new(name);
            if self.insert_category(&category).await? {
                tracing::debug!("Created category {}", name);
                return Ok(category);
            }

            // Lost a race against another writer; the row is there now.
            self.find_category_by_name(name)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("category {name}")))
        }
    }
}
