pub const SCHEMA: &str = r#"
PRAGMA foreign_keys = ON;

-- categories table
CREATE TABLE IF NOT EXISTS categories (
    id BLOB PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    notes TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- articles table (url is nullable; SQLite allows any number of NULLs under UNIQUE)
CREATE TABLE IF NOT EXISTS articles (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    description TEXT,
    author TEXT,
    url TEXT UNIQUE,
    image_url TEXT,
    published_at TEXT,
    category_id BLOB REFERENCES categories(id) ON DELETE SET NULL,
    notes TEXT,
    is_saved INTEGER NOT NULL DEFAULT 0,
    is_saved_from_search INTEGER NOT NULL DEFAULT 0,
    country TEXT,
    country_code TEXT,
    popularity INTEGER,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_articles_category_id ON articles(category_id);
CREATE INDEX IF NOT EXISTS idx_articles_published_at ON articles(published_at DESC);
CREATE INDEX IF NOT EXISTS idx_articles_is_saved ON articles(is_saved);

-- searches table (search history)
CREATE TABLE IF NOT EXISTS searches (
    id BLOB PRIMARY KEY,
    keyword TEXT NOT NULL UNIQUE,
    timestamp TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_searches_timestamp ON searches(timestamp DESC);
"#;
