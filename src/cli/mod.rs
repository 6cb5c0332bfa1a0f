mod render;

use uuid::Uuid;

use crate::error::Result;
use crate::models::{ArticleFilter, SortOption};

pub use render::{print_articles, print_categories, print_countries, print_report, print_searches};

pub const USAGE: &str = "\
Usage: unbiased <command> [args]

Commands:
  sync                               Fetch headlines for every topic into the local store
  list [--category NAME | --saved]   List stored articles
  categories                         List categories
  headlines [COUNTRY] [CATEGORY]     Show live headlines (not stored)
  countries                          List country codes accepted by `headlines`
  search KEYWORD [--sort date|popularity] [--save N]
                                     Search all news; --save keeps the Nth result
  history                            Show recent searches
  forget SEARCH_ID                   Remove a search from the history
  save ID                            Save or unsave an article
  assign ID CATEGORY                 Move an article to a category
  note ID TEXT...                    Replace an article's notes (empty clears them)
  delete ID                          Delete an article
  open ID                            Open an article in the browser
  config                             Show the configuration in use
  help                               Show this message";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Sync,
    List(ArticleFilter),
    Categories,
    Headlines {
        country: Option<String>,
        category: Option<String>,
    },
    Countries,
    Search {
        keyword: String,
        sort: SortOption,
        save: Option<usize>,
    },
    History,
    Forget(Uuid),
    ToggleSave(i64),
    Assign {
        id: i64,
        category: String,
    },
    Note {
        id: i64,
        text: String,
    },
    Delete(i64),
    Open(i64),
    ShowConfig,
    Help,
}

/// Parses the arguments that follow the program name.
pub fn parse_args(args: &[String]) -> Result<Command> {
    let Some((command, rest)) = args.split_first() else {
        return Ok(Command::Help);
    };

    let command = match command.as_str() {
        "sync" | "--refresh" => Command::Sync,
        "list" => Command::List(parse_filter(rest)?),
        "categories" => Command::Categories,
        "headlines" => Command::Headlines {
            country: rest.first().cloned(),
            category: rest.get(1).cloned(),
        },
        "countries" => Command::Countries,
        "search" => parse_search(rest)?,
        "history" => Command::History,
        "forget" => {
            let raw = required(rest, 0, "SEARCH_ID")?;
            let id = Uuid::parse_str(raw)
                .map_err(|e| anyhow::anyhow!("Invalid search id '{}': {}", raw, e))?;
            Command::Forget(id)
        }
        "save" => Command::ToggleSave(parse_id(rest)?),
        "assign" => Command::Assign {
            id: parse_id(rest)?,
            category: required(rest, 1, "CATEGORY")?.to_string(),
        },
        "note" => Command::Note {
            id: parse_id(rest)?,
            text: rest.get(1..).unwrap_or_default().join(" "),
        },
        "delete" => Command::Delete(parse_id(rest)?),
        "open" => Command::Open(parse_id(rest)?),
        "config" => Command::ShowConfig,
        "help" | "--help" | "-h" => Command::Help,
        other => return Err(anyhow::anyhow!("Unknown command '{}'\n\n{}", other, USAGE).into()),
    };

    Ok(command)
}

fn required<'a>(args: &'a [String], index: usize, name: &str) -> Result<&'a str> {
    args.get(index)
        .map(String::as_str)
        .ok_or_else(|| anyhow::anyhow!("Missing argument {}", name).into())
}

fn parse_id(args: &[String]) -> Result<i64> {
    let raw = required(args, 0, "ID")?;
    raw.parse()
        .map_err(|_| anyhow::anyhow!("Invalid article id '{}'", raw).into())
}

fn parse_filter(args: &[String]) -> Result<ArticleFilter> {
    match args.first().map(String::as_str) {
        None => Ok(ArticleFilter::All),
        Some("--saved") | Some("--favorites") => Ok(ArticleFilter::Saved),
        Some("--category") => Ok(ArticleFilter::Category(
            required(args, 1, "NAME")?.to_string(),
        )),
        Some(other) => Err(anyhow::anyhow!("Unknown list option '{}'", other).into()),
    }
}

fn parse_search(args: &[String]) -> Result<Command> {
    let mut keyword = Vec::new();
    let mut sort = SortOption::default();
    let mut save = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--sort" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--sort needs a value"))?;
                sort = SortOption::parse(value)
                    .ok_or_else(|| anyhow::anyhow!("Unknown sort option '{}'", value))?;
            }
            "--save" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--save needs a result number"))?;
                let index: usize = value
                    .parse()
                    .ok()
                    .filter(|n| *n > 0)
                    .ok_or_else(|| anyhow::anyhow!("Invalid result number '{}'", value))?;
                save = Some(index);
            }
            word => keyword.push(word),
        }
    }

    if keyword.is_empty() {
        return Err(anyhow::anyhow!("Missing argument KEYWORD").into());
    }

    Ok(Command::Search {
        keyword: keyword.join(" "),
        sort,
        save,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    fn args(line: &str) -> Vec<String> {
        line.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn no_arguments_shows_help() {
        assert_eq!(parse_args(&[]).unwrap(), Command::Help);
    }

    #[test]
    fn refresh_flag_is_an_alias_for_sync() {
        assert_eq!(parse_args(&args("--refresh")).unwrap(), Command::Sync);
    }

    #[test]
    fn list_filters() {
        assert_eq!(parse_args(&args("list")).unwrap(), Command::List(ArticleFilter::All));
        assert_eq!(
            parse_args(&args("list --saved")).unwrap(),
            Command::List(ArticleFilter::Saved)
        );
        assert_eq!(
            parse_args(&args("list --category sports")).unwrap(),
            Command::List(ArticleFilter::Category("sports".into()))
        );
        assert!(parse_args(&args("list --category")).is_err());
    }

    #[test]
    fn search_collects_keyword_and_options() {
        assert_eq!(
            parse_args(&args("search central banks --sort popularity --save 2")).unwrap(),
            Command::Search {
                keyword: "central banks".into(),
                sort: SortOption::Popularity,
                save: Some(2),
            }
        );
        assert!(parse_args(&args("search --save 0 rates")).is_err());
        assert!(parse_args(&args("search --sort")).is_err());
        assert!(parse_args(&args("search")).is_err());
    }

    #[test]
    fn note_joins_remaining_words() {
        assert_eq!(
            parse_args(&args("note 7 check the numbers")).unwrap(),
            Command::Note {
                id: 7,
                text: "check the numbers".into(),
            }
        );
        assert_eq!(
            parse_args(&args("note 7")).unwrap(),
            Command::Note {
                id: 7,
                text: String::new(),
            }
        );
    }

    #[test]
    fn ids_must_be_numeric() {
        assert!(matches!(parse_args(&args("save abc")), Err(AppError::Other(_))));
        assert!(parse_args(&args("forget not-a-uuid")).is_err());
        assert_eq!(parse_args(&args("delete 3")).unwrap(), Command::Delete(3));
    }

    #[test]
    fn unknown_command_is_an_error() {
        let err = parse_args(&args("frobnicate")).unwrap_err();
        assert!(err.to_string().contains("Unknown command 'frobnicate'"));
    }
}
