use chrono::{DateTime, Utc};

use super::Category;

#[derive(Debug, Clone, PartialEq)]
pub struct Article {
    /// Row id, `None` until the article has been written to the store.
    pub id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    pub author: Option<String>,
    /// Identity key used for de-duplication.
    pub url: Option<String>,
    pub image_url: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub category: Option<Category>,
    pub notes: Option<String>,
    pub is_saved: bool,
    pub is_saved_from_search: bool,
    pub country: Option<String>,
    pub country_code: Option<String>,
    pub popularity: Option<i64>,
    created_at: DateTime<Utc>,
}

impl Article {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            description: None,
            author: None,
            url: None,
            image_url: None,
            published_at: None,
            category: None,
            notes: None,
            is_saved: false,
            is_saved_from_search: false,
            country: None,
            country_code: None,
            popularity: None,
            created_at: Utc::now(),
        }
    }

    /// Rebuilds an article loaded from the store with its original creation time.
    pub(crate) fn restored(mut self, id: i64, created_at: DateTime<Utc>) -> Self {
        self.id = Some(id);
        self.created_at = created_at;
        self
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_fully_saved(&self) -> bool {
        self.is_saved || self.is_saved_from_search
    }

    pub fn category_name(&self) -> Option<&str> {
        self.category.as_ref().map(|c| c.name.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ArticleFilter {
    #[default]
    All,
    /// Matches the category name case-insensitively.
    Category(String),
    Saved,
}

impl ArticleFilter {
    pub fn label(&self) -> String {
        match self {
            ArticleFilter::All => "All".to_string(),
            ArticleFilter::Category(name) => name.clone(),
            ArticleFilter::Saved => "Favorites".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOption {
    #[default]
    ReleaseDate,
    Popularity,
}

impl SortOption {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "date" | "release" | "releasedate" => Some(SortOption::ReleaseDate),
            "popularity" | "popular" => Some(SortOption::Popularity),
            _ => None,
        }
    }

    /// Newest first for release date; unset dates sort last. Highest first for
    /// popularity, with unset scores counted as zero.
    pub fn sort(self, articles: &mut [Article]) {
        match self {
            SortOption::ReleaseDate => {
                articles.sort_by(|a, b| b.published_at.cmp(&a.published_at));
            }
            SortOption::Popularity => {
                articles.sort_by(|a, b| b.popularity.unwrap_or(0).cmp(&a.popularity.unwrap_or(0)));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn dated(title: &str, day: Option<u32>) -> Article {
        let mut article = Article::new(title);
        article.published_at = day.map(|d| Utc.with_ymd_and_hms(2024, 5, d, 8, 0, 0).unwrap());
        article
    }

    #[test]
    fn new_article_is_unsaved_and_unpersisted() {
        let article = Article::new("Headline");
        assert!(article.id.is_none());
        assert!(!article.is_fully_saved());
        assert!(article.created_at() <= Utc::now());
    }

    #[test]
    fn either_save_flag_counts_as_fully_saved() {
        let mut article = Article::new("Headline");
        article.is_saved_from_search = true;
        assert!(article.is_fully_saved());

        article.is_saved_from_search = false;
        article.is_saved = true;
        assert!(article.is_fully_saved());
    }

    #[test]
    fn filter_labels() {
        assert_eq!(ArticleFilter::Saved.label(), "Favorites");
        assert_eq!(ArticleFilter::Category("sports".into()).label(), "sports");
    }

    #[test]
    fn release_date_sort_puts_undated_last() {
        let mut articles = vec![dated("old", Some(1)), dated("none", None), dated("new", Some(9))];
        SortOption::ReleaseDate.sort(&mut articles);

        let titles: Vec<_> = articles.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, ["new", "old", "none"]);
    }

    #[test]
    fn popularity_sort_treats_unset_as_zero() {
        let mut low = Article::new("low");
        low.popularity = Some(-3);
        let unset = Article::new("unset");
        let mut high = Article::new("high");
        high.popularity = Some(42);

        let mut articles = vec![low, unset, high];
        SortOption::Popularity.sort(&mut articles);

        let titles: Vec<_> = articles.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, ["high", "unset", "low"]);
    }

    #[test]
    fn sort_option_parses_cli_names() {
        assert_eq!(SortOption::parse("Date"), Some(SortOption::ReleaseDate));
        assert_eq!(SortOption::parse("popularity"), Some(SortOption::Popularity));
        assert_eq!(SortOption::parse("random"), None);
    }
}
