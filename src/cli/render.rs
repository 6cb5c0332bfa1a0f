use textwrap::Options;

use crate::models::{Article, Category, Country, Search};
use crate::news::SweepReport;

const WRAP_WIDTH: usize = 80;

pub fn print_articles(articles: &[Article], empty_message: &str) {
    if articles.is_empty() {
        println!("{empty_message}");
        return;
    }
    for (index, article) in articles.iter().enumerate() {
        println!("{}", format_article(index + 1, article));
    }
}

/// Stored articles are labelled with their row id, unstored results with
/// their position in the list.
pub fn format_article(position: usize, article: &Article) -> String {
    let label = match article.id {
        Some(id) => format!("#{id}"),
        None => format!("{position}."),
    };

    let flags = if !article.is_fully_saved() {
        ""
    } else if article.is_saved {
        " [saved]"
    } else {
        " [kept]"
    };

    let mut lines = vec![format!("{label} {}{flags}", article.title)];

    let mut meta = Vec::new();
    if let Some(category) = article.category_name() {
        meta.push(category.to_string());
    }
    if let Some(published) = article.published_at {
        meta.push(published.format("%Y-%m-%d %H:%M").to_string());
    }
    if let Some(author) = &article.author {
        meta.push(author.clone());
    }
    if !meta.is_empty() {
        lines.push(format!("    {}", meta.join(" | ")));
    }

    let indent = Options::new(WRAP_WIDTH)
        .initial_indent("    ")
        .subsequent_indent("    ");
    if let Some(description) = article.description.as_deref().filter(|d| !d.trim().is_empty()) {
        lines.push(textwrap::fill(description.trim(), &indent));
    }
    if let Some(notes) = &article.notes {
        lines.push(textwrap::fill(&format!("Notes: {notes}"), &indent));
    }
    if let Some(url) = &article.url {
        lines.push(format!("    {url}"));
    }

    lines.join("\n")
}

pub fn print_categories(categories: &[Category]) {
    if categories.is_empty() {
        println!("No categories yet. Run `unbiased sync` first.");
        return;
    }
    for category in categories {
        match &category.notes {
            Some(notes) => println!("{} - {}", category.name, notes),
            None => println!("{}", category.name),
        }
    }
}

pub fn print_searches(searches: &[Search]) {
    if searches.is_empty() {
        println!("No searches yet.");
        return;
    }
    for search in searches {
        println!(
            "{}  {}  {}",
            search.timestamp.format("%Y-%m-%d %H:%M"),
            search.keyword,
            search.id
        );
    }
}

pub fn print_countries(countries: &[Country]) {
    for country in countries {
        println!("{}  {}", country.code, country.name);
    }
}

pub fn print_report(report: &SweepReport) {
    for outcome in &report.outcomes {
        match &outcome.result {
            Ok(inserted) => println!("{:<14} {} new", outcome.category, inserted),
            Err(e) => println!("{:<14} failed: {}", outcome.category, e),
        }
    }
    let failed = report.failures().count();
    if failed > 0 {
        println!("Added {} articles, {} categories failed", report.inserted(), failed);
    } else {
        println!("Added {} articles", report.inserted());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn unstored_results_are_numbered_by_position() {
        let mut article = Article::new("Rates hold");
        article.url = Some("https://news.test/rates".into());

        let text = format_article(3, &article);

        assert!(text.starts_with("3. Rates hold"));
        assert!(text.ends_with("    https://news.test/rates"));
    }

    #[test]
    fn stored_articles_show_id_flags_and_metadata() {
        let mut article = Article::new("Chips").restored(42, Utc::now());
        article.is_saved = true;
        article.category = Some(Category::new("technology"));
        article.published_at = Some(Utc.with_ymd_and_hms(2024, 5, 2, 10, 15, 0).unwrap());

        let text = format_article(1, &article);
        let mut lines = text.lines();

        assert_eq!(lines.next(), Some("#42 Chips [saved]"));
        assert_eq!(lines.next(), Some("    technology | 2024-05-02 10:15"));
    }

    #[test]
    fn long_descriptions_are_wrapped_and_indented() {
        let mut article = Article::new("Long");
        article.description = Some("word ".repeat(40));

        let text = format_article(1, &article);

        for line in text.lines().skip(1) {
            assert!(line.starts_with("    "));
            assert!(line.len() <= WRAP_WIDTH);
        }
        assert!(text.lines().count() > 2);
    }
}
