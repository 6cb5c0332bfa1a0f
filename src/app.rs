use uuid::Uuid;

use crate::config::Config;
use crate::db::{Repository, Store};
use crate::error::{AppError, Result};
use crate::models::{
    Article, ArticleFilter, Category, Country, Search, SortOption, SAVED_CATEGORY,
};
use crate::news::{ArticleSyncService, NewsApiClient, SweepReport};

const SEARCH_HISTORY_LIMIT: usize = 50;

pub struct App {
    pub config: Config,
    pub repository: Repository,
    sync: ArticleSyncService,
}

impl App {
    pub async fn new(config: Config) -> Result<Self> {
        let repository = Repository::new(&config.db_path).await?;
        let sync = ArticleSyncService::new(NewsApiClient::new(&config)?);
        Ok(Self::with_parts(config, repository, sync))
    }

    pub fn with_parts(config: Config, repository: Repository, sync: ArticleSyncService) -> Self {
        Self {
            config,
            repository,
            sync,
        }
    }

    /// Makes sure every topic has a category, then sweeps all topics.
    pub async fn refresh(&self) -> Result<SweepReport> {
        self.sync.sync_categories(&self.repository).await?;
        self.sync.sync_all_categories(&self.repository).await
    }

    pub async fn articles(&self, filter: &ArticleFilter) -> Result<Vec<Article>> {
        self.repository.list_articles(filter).await
    }

    pub async fn categories(&self) -> Result<Vec<Category>> {
        self.repository.list_categories().await
    }

    /// Live headlines, capped at the configured count. Falls back to the
    /// configured country and category.
    pub async fn headlines(
        &self,
        country: Option<&str>,
        category: Option<&str>,
    ) -> Result<(Country, Vec<Article>)> {
        let code = country.unwrap_or(self.config.default_country.as_str());
        let country = Country::find(code)
            .ok_or_else(|| AppError::InvalidRequest(format!("unknown country code '{code}'")))?;
        let category = category
            .unwrap_or(self.config.default_category.as_str())
            .to_lowercase();

        let mut headlines = self.sync.fetch_headlines(&country.code, &category).await?;
        headlines.truncate(self.config.headline_count());
        Ok((country, headlines))
    }

    /// Records the keyword in the history and runs the search. Blank
    /// keywords do nothing.
    pub async fn search(&self, keyword: &str, sort: SortOption) -> Result<Vec<Article>> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Ok(Vec::new());
        }

        self.record_search(keyword).await?;

        let mut results = self.sync.search(keyword).await;
        sort.sort(&mut results);
        Ok(results)
    }

    /// Returns `false` when the keyword was already in the history.
    pub async fn record_search(&self, keyword: &str) -> Result<bool> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Ok(false);
        }
        self.repository.insert_search(&Search::new(keyword)).await
    }

    pub async fn recent_searches(&self) -> Result<Vec<Search>> {
        self.repository.list_searches(SEARCH_HISTORY_LIMIT).await
    }

    pub async fn forget_search(&self, id: Uuid) -> Result<()> {
        if !self.repository.delete_search(id).await? {
            return Err(AppError::NotFound(format!("search {id}")));
        }
        Ok(())
    }

    /// Keeps a search or headline result. If an article with the same URL is
    /// already stored it is flagged instead of inserted again.
    pub async fn save_search_result(&self, article: &Article) -> Result<Article> {
        let Some(url) = article.url.as_deref() else {
            return Err(AppError::InvalidRequest(format!(
                "'{}' has no URL and cannot be saved",
                article.title
            )));
        };

        if let Some(mut existing) = self.repository.find_article_by_url(url).await? {
            if !existing.is_saved_from_search {
                existing.is_saved_from_search = true;
                self.repository.update_article(&existing).await?;
            }
            return Ok(existing);
        }

        let mut article = article.clone();
        article.is_saved_from_search = true;
        match self.repository.insert_article(&article).await? {
            Some(id) => self.article(id).await,
            None => self
                .repository
                .find_article_by_url(url)
                .await?
                .ok_or_else(|| AppError::NotFound(url.to_string())),
        }
    }

    /// Saving files the article under the "Saved" category; unsaving takes it
    /// out of that category again.
    pub async fn toggle_saved(&self, id: i64) -> Result<Article> {
        let mut article = self.article(id).await?;

        if article.is_saved {
            if article.category_name() == Some(SAVED_CATEGORY) {
                article.category = None;
            }
            article.is_saved = false;
        } else {
            article.category = Some(self.repository.category_named(SAVED_CATEGORY).await?);
            article.is_saved = true;
        }

        self.repository.update_article(&article).await?;
        Ok(article)
    }

    pub async fn assign_category(&self, id: i64, name: &str) -> Result<Article> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::InvalidRequest("category name must not be empty".to_string()));
        }

        let mut article = self.article(id).await?;
        article.category = Some(self.repository.category_named(name).await?);
        self.repository.update_article(&article).await?;
        Ok(article)
    }

    /// Empty text clears the notes.
    pub async fn set_notes(&self, id: i64, notes: &str) -> Result<Article> {
        let mut article = self.article(id).await?;
        let notes = notes.trim();
        article.notes = (!notes.is_empty()).then(|| notes.to_string());
        self.repository.update_article(&article).await?;
        Ok(article)
    }

    pub async fn delete_article(&self, id: i64) -> Result<()> {
        if !self.repository.delete_article(id).await? {
            return Err(AppError::NotFound(format!("article {id}")));
        }
        Ok(())
    }

    pub async fn open_article(&self, id: i64) -> Result<Article> {
        let article = self.article(id).await?;
        let Some(url) = article.url.as_deref() else {
            return Err(AppError::InvalidRequest(format!("article {id} has no URL")));
        };
        open::that(url)?;
        Ok(article)
    }

    async fn article(&self, id: i64) -> Result<Article> {
        self.repository
            .find_article(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("article {id}")))
    }
}
