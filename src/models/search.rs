use chrono::{DateTime, Utc};
use uuid::Uuid;

/// An entry in the search history.
#[derive(Debug, Clone, PartialEq)]
pub struct Search {
    pub id: Uuid,
    pub keyword: String,
    pub timestamp: DateTime<Utc>,
}

impl Search {
    pub fn new(keyword: impl Into<String>) -> Self {
        Self::at(keyword, Utc::now())
    }

    pub fn at(keyword: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            keyword: keyword.into(),
            timestamp,
        }
    }
}
