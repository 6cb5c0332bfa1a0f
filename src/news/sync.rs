use std::collections::HashSet;

use futures::stream::{self, StreamExt};
use tokio::sync::Mutex;

use crate::db::Store;
use crate::error::Result;
use crate::models::{Article, Category};

use super::client::{ArticleRecord, NewsApiClient};

/// Topics swept by [`ArticleSyncService::sync_all_categories`].
pub const TOPICS: [&str; 6] = [
    "general",
    "technology",
    "business",
    "health",
    "sports",
    "entertainment",
];

const MAX_CONCURRENT_FETCHES: usize = 3;

#[derive(Debug)]
pub struct CategoryOutcome {
    pub category: String,
    /// Number of newly inserted articles, or why the category was skipped.
    pub result: std::result::Result<usize, String>,
}

#[derive(Debug, Default)]
pub struct SweepReport {
    pub outcomes: Vec<CategoryOutcome>,
}

impl SweepReport {
    pub fn inserted(&self) -> usize {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok())
            .sum()
    }

    pub fn failures(&self) -> impl Iterator<Item = &CategoryOutcome> {
        self.outcomes.iter().filter(|o| o.result.is_err())
    }
}

/// Moves articles from NewsAPI into a [`Store`], never inserting the same URL
/// twice and never touching articles that are already stored.
pub struct ArticleSyncService {
    client: NewsApiClient,
    // Held while merging so overlapping syncs can't both pass the same dedup check.
    sync_guard: Mutex<()>,
}

impl ArticleSyncService {
    pub fn new(client: NewsApiClient) -> Self {
        Self {
            client,
            sync_guard: Mutex::new(()),
        }
    }

    /// Fetches top headlines for every topic and merges them into `store`.
    ///
    /// A topic whose request or decode fails is logged and recorded in the
    /// report; the remaining topics are still processed. Store failures abort
    /// the sweep and no report is returned. Articles inserted before the
    /// failure stay in the store; the next sweep skips them by URL.
    pub async fn sync_all_categories<S: Store>(&self, store: &S) -> Result<SweepReport> {
        let fetched: Vec<(String, Result<Vec<ArticleRecord>>)> = stream::iter(TOPICS)
            .map(|topic| async move {
                let name = topic.to_lowercase();
                tracing::debug!("Fetching articles for category {}", name);
                let result = self.client.top_headlines(None, &name).await;
                (name, result)
            })
            .buffered(MAX_CONCURRENT_FETCHES)
            .collect()
            .await;

        let _guard = self.sync_guard.lock().await;
        let mut report = SweepReport::default();

        for (name, result) in fetched {
            let result = match result {
                Ok(records) => {
                    let inserted = self.merge_category(store, &name, records).await?;
                    tracing::info!("Inserted {} new articles into {}", inserted, name);
                    Ok(inserted)
                }
                Err(e) => {
                    tracing::warn!("Failed to fetch articles for category {}: {}", name, e);
                    Err(e.to_string())
                }
            };
            report.outcomes.push(CategoryOutcome {
                category: name,
                result,
            });
        }

        Ok(report)
    }

    /// Ingests one topic's records under `category_name`. Records without a
    /// URL and URLs already in the store are skipped.
    pub async fn merge_category<S: Store>(
        &self,
        store: &S,
        category_name: &str,
        records: Vec<ArticleRecord>,
    ) -> Result<usize> {
        let category = store.category_named(category_name).await?;
        let mut inserted = 0;

        for record in records {
            let Some(url) = record.url.as_deref() else {
                continue;
            };
            if store.find_article_by_url(url).await?.is_some() {
                continue;
            }

            let mut article = record.into_article();
            article.category = Some(category.clone());
            if store.insert_article(&article).await?.is_some() {
                inserted += 1;
            }
        }

        Ok(inserted)
    }

    /// Top headlines for one country and category. Failures are returned to
    /// the caller. Nothing is stored.
    pub async fn fetch_headlines(&self, country: &str, category: &str) -> Result<Vec<Article>> {
        let records = self.client.top_headlines(Some(country), category).await?;

        Ok(records
            .into_iter()
            .map(|record| {
                let mut article = record.into_article();
                article.country = Some(country.to_string());
                article.country_code = Some(country.to_string());
                article
            })
            .collect())
    }

    /// Inserts the topics that have no category yet. Existing categories are
    /// left as they are.
    pub async fn sync_categories<S: Store>(&self, store: &S) -> Result<Vec<Category>> {
        let _guard = self.sync_guard.lock().await;

        let existing: HashSet<String> = store
            .list_categories()
            .await?
            .into_iter()
            .map(|c| c.name)
            .collect();

        let mut created = Vec::new();
        for name in TOPICS.iter().filter(|name| !existing.contains(**name)) {
            let category = Category::new(*name);
            if store.insert_category(&category).await? {
                tracing::info!("Inserted category: {}", category.name);
                created.push(category);
            }
        }

        Ok(created)
    }

    /// Full-text search. Never fails: any error is logged and yields no
    /// results.
    pub async fn search(&self, keyword: &str) -> Vec<Article> {
        match self.client.everything(keyword).await {
            Ok(records) => records.into_iter().map(ArticleRecord::into_article).collect(),
            Err(e) => {
                tracing::warn!("Error searching articles for {:?}: {}", keyword, e);
                Vec::new()
            }
        }
    }
}
