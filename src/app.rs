use anyhow::{anyhow, bail, Context, Result};
use serde_json::{json, Value};
use std::env;
use tracing::info;

use crate::catalog::{Catalog, Category};
use crate::sort::{self, SortKey};

pub const USAGE: &str = "\
Usage:
  cinescope list <category> [page] [--genre <id>] [--sort <default|title|year|rating>]
  cinescope movie <id>
  cinescope search <query...>
  cinescope featured
  cinescope trailer <id>
Categories: popular, top_rated, upcoming, now_playing, trending_today";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List {
        category: Category,
        page: u32,
        genre: Option<u32>,
        sort: SortKey,
    },
    Movie {
        id: String,
    },
    Search {
        query: String,
    },
    Featured,
    Trailer {
        id: String,
    },
}

pub fn parse_args<I>(args: I) -> Result<Command>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let Some(command) = args.next() else {
        bail!("missing command\n{USAGE}");
    };
    match command.as_str() {
        "list" => {
            let category: Category = args
                .next()
                .ok_or_else(|| anyhow!("list needs a category\n{USAGE}"))?
                .parse()?;
            let mut page = 1;
            let mut genre = None;
            let mut sort = SortKey::Default;
            while let Some(arg) = args.next() {
                match arg.as_str() {
                    "--genre" => {
                        let v = args.next().context("--genre needs a value")?;
                        genre = Some(v.parse().with_context(|| format!("bad genre id '{v}'"))?);
                    }
                    "--sort" => {
                        sort = args.next().context("--sort needs a value")?.parse()?;
                    }
                    other => {
                        page = other
                            .parse()
                            .with_context(|| format!("bad page number '{other}'"))?;
                    }
                }
            }
            Ok(Command::List {
                category,
                page,
                genre,
                sort,
            })
        }
        "movie" => Ok(Command::Movie {
            id: args.next().context("movie needs an id")?,
        }),
        "trailer" => Ok(Command::Trailer {
            id: args.next().context("trailer needs an id")?,
        }),
        "search" => Ok(Command::Search {
            query: args.collect::<Vec<_>>().join(" "),
        }),
        "featured" => Ok(Command::Featured),
        other => bail!("unknown command '{other}'\n{USAGE}"),
    }
}

/// Runs one command and returns the normalized result as JSON.
pub async fn execute(catalog: &Catalog, command: Command) -> Result<Value> {
    let value = match command {
        Command::List {
            category,
            page,
            genre,
            sort: key,
        } => {
            let mut list = catalog.fetch_category(category, page, genre).await;
            sort::sort_movies(&mut list.movies, key);
            serde_json::to_value(list)?
        }
        Command::Movie { id } => serde_json::to_value(catalog.movie_details(&id).await)?,
        Command::Search { query } => serde_json::to_value(catalog.search(&query).await)?,
        Command::Featured => serde_json::to_value(catalog.featured().await)?,
        Command::Trailer { id } => match catalog.trailer(&id).await {
            Some(trailer) => serde_json::to_value(trailer)?,
            None => json!(null),
        },
    };
    Ok(value)
}

pub async fn run_cli() -> Result<()> {
    let command = parse_args(env::args().skip(1))?;
    let catalog = Catalog::from_env()?;
    info!(?command, "Running");
    let output = execute(&catalog, command).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
