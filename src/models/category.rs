use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Name of the category that saved articles are filed under.
pub const SAVED_CATEGORY: &str = "Saved";

#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }
}
