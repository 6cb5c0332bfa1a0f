mod app;
mod cli;
mod config;
mod db;
mod error;
mod models;
mod news;

use app::App;
use cli::{parse_args, Command, USAGE};
use config::Config;
use error::{AppError, Result};
use models::Country;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (only show warnings and errors by default)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = parse_args(&args)?;

    let config = Config::load()?;
    let app = App::new(config).await?;

    run(&app, command).await
}

async fn run(app: &App, command: Command) -> Result<()> {
    match command {
        Command::Sync => {
            let report = app.refresh().await?;
            cli::print_report(&report);
        }

        Command::List(filter) => {
            let articles = app.articles(&filter).await?;
            println!("[{}] {} articles\n", filter.label(), articles.len());
            cli::print_articles(&articles, "Nothing here yet. Run `unbiased sync` first.");
        }

        Command::Categories => {
            cli::print_categories(&app.categories().await?);
        }

        Command::Headlines { country, category } => {
            let (country, headlines) = app
                .headlines(country.as_deref(), category.as_deref())
                .await?;
            println!("Top headlines for {} ({})\n", country.name, country.code);
            cli::print_articles(&headlines, "No headlines available.");
        }

        Command::Search {
            keyword,
            sort,
            save,
        } => {
            let results = app.search(&keyword, sort).await?;
            match save {
                Some(position) => {
                    let result = results.get(position - 1).ok_or_else(|| {
                        AppError::NotFound(format!(
                            "result {} ({} results for '{}')",
                            position,
                            results.len(),
                            keyword
                        ))
                    })?;
                    let saved = app.save_search_result(result).await?;
                    println!("Saved #{}: {}", saved.id.unwrap_or_default(), saved.title);
                }
                None => cli::print_articles(&results, "No results."),
            }
        }

        Command::History => {
            cli::print_searches(&app.recent_searches().await?);
        }

        Command::Forget(id) => {
            app.forget_search(id).await?;
            println!("Removed search {id}");
        }

        Command::ToggleSave(id) => {
            let article = app.toggle_saved(id).await?;
            let state = if article.is_saved { "Saved" } else { "Unsaved" };
            println!("{state}: {}", article.title);
        }

        Command::Assign { id, category } => {
            let article = app.assign_category(id, &category).await?;
            println!(
                "Moved '{}' to {}",
                article.title,
                article.category_name().unwrap_or(&category)
            );
        }

        Command::Note { id, text } => {
            let article = app.set_notes(id, &text).await?;
            match article.notes {
                Some(_) => println!("Updated notes for '{}'", article.title),
                None => println!("Cleared notes for '{}'", article.title),
            }
        }

        Command::Delete(id) => {
            app.delete_article(id).await?;
            println!("Deleted article {id}");
        }

        Command::Open(id) => {
            let article = app.open_article(id).await?;
            tracing::info!("Opened {}", article.url.unwrap_or_default());
        }

        Command::ShowConfig => {
            let config = &app.config;
            println!("config file:      {}", Config::config_path().display());
            println!("database:         {}", config.db_path);
            println!("api:              {}", config.base_url);
            println!(
                "api key:          {}",
                if config.uses_default_api_key() { "built-in default" } else { "user provided" }
            );
            println!("country:          {}", config.default_country);
            println!("category:         {}", config.default_category);
            println!("headline count:   {}", config.headline_count());
            println!("request timeout:  {}s", config.request_timeout_secs);
        }

        Command::Countries => {
            cli::print_countries(&Country::known());
        }

        Command::Help => {
            println!("{USAGE}");
        }
    }

    Ok(())
}
