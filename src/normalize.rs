//! Upstream JSON in, stable view model out.
//!
//! Every field has one default, listed here rather than at the call sites:
//!
//! | field                     | default            |
//! |---------------------------|--------------------|
//! | id, year, rating          | `"N/A"`            |
//! | title                     | `"Untitled"`       |
//! | plot                      | `""`               |
//! | posterUrl, backdropUrl    | `"N/A"`            |
//! | runtime, website, votes   | `"N/A"`            |
//! | releaseDate, imdbUrl      | `"N/A"`            |
//! | list fields               | `[]`               |
//! | trailer                   | absent             |
//!
//! Shape problems never surface as errors. A list payload without a
//! `results` array becomes [`ListPage::empty`], a detail payload without an
//! object body or id becomes [`MovieDetails::not_found`].

use serde_json::Value;

use crate::config::CatalogConfig;
use crate::models::{
    format_rating, rating_value, CastCredit, CrewCredit, ListPage, Movie, MovieDetails, Review, NOT_AVAILABLE,
    UNTITLED,
};
use crate::trailer;
use crate::utils;

/// Upstream refuses pages past this.
pub const MAX_TOTAL_PAGES: u32 = 500;
pub const CAST_LIMIT: usize = 10;
pub const CREW_LIMIT: usize = 10;
pub const REVIEW_LIMIT: usize = 10;
pub const SIMILAR_LIMIT: usize = 5;
pub const CREW_JOBS: &[&str] = &["Director", "Writer", "Screenplay", "Producer"];

const IMDB_TITLE_BASE: &str = "https://www.imdb.com/title/";

#[derive(Debug, Clone)]
pub struct Normalizer {
    poster_base: String,
    backdrop_base: String,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::from_config(&CatalogConfig::new(""))
    }
}

impl Normalizer {
    pub fn from_config(config: &CatalogConfig) -> Self {
        Self {
            poster_base: config.poster_base(),
            backdrop_base: config.backdrop_base(),
        }
    }

    /// Accepts upstream records and records already in [`Movie`] shape, so
    /// feeding a normalized movie back in returns it unchanged.
    pub fn movie(&self, raw: &Value) -> Movie {
        Movie {
            id: utils::id(raw, "id").unwrap_or_else(na),
            title: utils::text(raw, "title").unwrap_or_else(|| UNTITLED.to_string()),
            year: utils::text(raw, "release_date")
                .or_else(|| utils::text(raw, "year"))
                .and_then(|d| year_of(&d))
                .unwrap_or_else(na),
            poster_url: image_url(
                &self.poster_base,
                utils::text(raw, "poster_path").or_else(|| absolute_url(raw, "posterUrl")),
            ),
            backdrop_url: image_url(
                &self.backdrop_base,
                utils::text(raw, "backdrop_path").or_else(|| absolute_url(raw, "backdropUrl")),
            ),
            plot: utils::text(raw, "overview")
                .or_else(|| utils::text(raw, "plot"))
                .unwrap_or_default(),
            rating: format_rating(utils::number(raw, "vote_average").or_else(|| {
                utils::text(raw, "rating").and_then(|r| rating_value(&r))
            })),
        }
    }

    pub fn list(&self, raw: &Value) -> ListPage {
        let Some(results) = raw.get("results").and_then(Value::as_array) else {
            return ListPage::empty();
        };
        let movies: Vec<Movie> = results
            .iter()
            .filter(|r| r.is_object())
            .map(|r| self.movie(r))
            .collect();

        let page = utils::number(raw, "page")
            .map(|p| p as u32)
            .filter(|p| *p >= 1)
            .unwrap_or(1);
        let total_results = utils::number(raw, "total_results")
            .map(|t| t as u64)
            .unwrap_or(movies.len() as u64);
        let reported_pages = utils::number(raw, "total_pages")
            .map(|t| t as u32)
            .unwrap_or(u32::from(!movies.is_empty()));

        ListPage {
            movies,
            total_results,
            page,
            total_pages: reported_pages.min(MAX_TOTAL_PAGES),
        }
    }

    pub fn details(&self, raw: &Value, similar_raw: &Value, reviews_raw: &Value) -> MovieDetails {
        if !raw.is_object() || utils::id(raw, "id").is_none() {
            return MovieDetails::not_found();
        }
        let credits = raw.get("credits").unwrap_or(&Value::Null);

        MovieDetails {
            movie: self.movie(raw),
            release_date: utils::text(raw, "release_date").unwrap_or_else(na),
            runtime: utils::number(raw, "runtime")
                .filter(|m| *m > 0.0)
                .map(|m| format!("{} min", m.round() as u32))
                .unwrap_or_else(na),
            genres: utils::names(raw, "genres"),
            production_companies: utils::names(raw, "production_companies"),
            website: utils::text(raw, "homepage").unwrap_or_else(na),
            votes: utils::number(raw, "vote_count")
                .filter(|v| *v >= 0.0)
                .map(|v| (v as u64).to_string())
                .unwrap_or_else(na),
            imdb_url: utils::text(raw, "imdb_id")
                .filter(|id| id.starts_with("tt"))
                .map(|id| format!("{IMDB_TITLE_BASE}{id}"))
                .unwrap_or_else(na),
            cast: cast(credits),
            crew: crew(credits),
            reviews: reviews(reviews_raw),
            similar_movies: utils::items(similar_raw, "results")
                .iter()
                .filter(|r| r.is_object())
                .take(SIMILAR_LIMIT)
                .map(|r| self.movie(r))
                .collect(),
            trailer: trailer::trailer_from(raw.get("videos").unwrap_or(&Value::Null)),
        }
    }
}

fn na() -> String {
    NOT_AVAILABLE.to_string()
}

fn image_url(base: &str, path: Option<String>) -> String {
    match path {
        None => na(),
        Some(p) if p.starts_with("http://") || p.starts_with("https://") => p,
        Some(p) if p.starts_with('/') => format!("{base}{p}"),
        Some(p) => format!("{base}/{p}"),
    }
}

/// Already-built image URL. The "N/A" sentinel and bare paths read as absent.
fn absolute_url(raw: &Value, key: &str) -> Option<String> {
    utils::text(raw, key).filter(|u| u.starts_with("http://") || u.starts_with("https://"))
}

fn year_of(date: &str) -> Option<String> {
    let year = date.get(..4)?;
    year.chars()
        .all(|c| c.is_ascii_digit())
        .then(|| year.to_string())
}

fn cast(credits: &Value) -> Vec<CastCredit> {
    utils::items(credits, "cast")
        .iter()
        .filter_map(|c| {
            Some(CastCredit {
                name: utils::text(c, "name")?,
                id: utils::id(c, "id").unwrap_or_else(na),
                character: utils::text(c, "character").unwrap_or_else(na),
            })
        })
        .take(CAST_LIMIT)
        .collect()
}

fn crew(credits: &Value) -> Vec<CrewCredit> {
    utils::items(credits, "crew")
        .iter()
        .filter_map(|c| {
            let job = utils::text(c, "job")?;
            if !CREW_JOBS.contains(&job.as_str()) {
                return None;
            }
            Some(CrewCredit {
                name: utils::text(c, "name")?,
                id: utils::id(c, "id").unwrap_or_else(na),
                department: utils::text(c, "department").unwrap_or_else(na),
                job,
            })
        })
        .take(CREW_LIMIT)
        .collect()
}

fn reviews(raw: &Value) -> Vec<Review> {
    utils::items(raw, "results")
        .iter()
        .filter(|r| r.is_object())
        .take(REVIEW_LIMIT)
        .map(|r| {
            let details = r.get("author_details").unwrap_or(&Value::Null);
            Review {
                id: utils::id(r, "id").unwrap_or_else(na),
                author: utils::text(r, "author")
                    .or_else(|| utils::text(details, "username"))
                    .unwrap_or_else(|| "Anonymous".to_string()),
                content: utils::text(r, "content").unwrap_or_default(),
                created_at: utils::text(r, "created_at").unwrap_or_else(na),
                rating: utils::number(details, "rating").or_else(|| utils::number(r, "rating")),
            }
        })
        .collect()
}
