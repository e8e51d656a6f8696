use anyhow::{anyhow, Result};
use chrono::{Local, NaiveDate};
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::CatalogConfig;
use crate::models::{ListPage, Movie};
use crate::normalize::{Normalizer, MAX_TOTAL_PAGES};
use crate::tmdb::{ListQuery, MovieApi, TmdbClient};

pub const FEATURED_COUNT: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Popular,
    TopRated,
    Upcoming,
    NowPlaying,
    TrendingToday,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Popular,
        Category::TopRated,
        Category::Upcoming,
        Category::NowPlaying,
        Category::TrendingToday,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Category::Popular => "popular",
            Category::TopRated => "top_rated",
            Category::Upcoming => "upcoming",
            Category::NowPlaying => "now_playing",
            Category::TrendingToday => "trending_today",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Popular => "Popular",
            Category::TopRated => "Top Rated",
            Category::Upcoming => "Upcoming",
            Category::NowPlaying => "Now Playing",
            Category::TrendingToday => "Trending Today",
        }
    }

    /// Upstream endpoint and parameters for one page of this category.
    /// `genre` only applies to [`Category::Popular`].
    pub fn query(
        &self,
        page: u32,
        genre: Option<u32>,
        today: NaiveDate,
        config: &CatalogConfig,
    ) -> ListQuery {
        let query = match (self, genre) {
            (Category::Popular, Some(genre)) => ListQuery::new("/discover/movie")
                .param("with_genres", genre)
                .param("sort_by", "popularity.desc"),
            (Category::Popular, None) => ListQuery::new("/movie/popular"),
            (Category::TopRated, _) => ListQuery::new("/movie/top_rated"),
            (Category::Upcoming, _) => ListQuery::new("/movie/upcoming"),
            (Category::NowPlaying, _) => {
                ListQuery::new("/movie/now_playing").param("region", &config.region)
            }
            (Category::TrendingToday, _) => {
                let filter = &config.trending;
                let query = ListQuery::new("/discover/movie")
                    .param("sort_by", "popularity.desc")
                    .param(
                        &format!("release_date.{}", filter.date.operator()),
                        today.format("%Y-%m-%d"),
                    );
                match &filter.region {
                    Some(region) => query.param("region", region),
                    None => query,
                }
            }
        };
        query.param("page", page)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Category {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "popular" => Ok(Category::Popular),
            "top_rated" | "toprated" => Ok(Category::TopRated),
            "upcoming" => Ok(Category::Upcoming),
            "now_playing" => Ok(Category::NowPlaying),
            "trending_today" | "hot_right_now" => Ok(Category::TrendingToday),
            other => Err(anyhow!("unknown category '{}'", other)),
        }
    }
}

/// Source of "today" for the date-filtered categories.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Entry point for the presentation layer. None of the public operations
/// fail; upstream trouble comes back as sentinel data.
#[derive(Clone)]
pub struct Catalog {
    pub(crate) api: Arc<dyn MovieApi>,
    pub(crate) config: CatalogConfig,
    pub(crate) normalizer: Normalizer,
    clock: Arc<dyn Clock>,
}

impl Catalog {
    pub fn new(api: Arc<dyn MovieApi>, config: CatalogConfig) -> Self {
        Self {
            api,
            normalizer: Normalizer::from_config(&config),
            config,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn from_env() -> Result<Self> {
        let config = CatalogConfig::from_env()?;
        let api: Arc<dyn MovieApi> = Arc::new(TmdbClient::new(&config)?);
        Ok(Self::new(api, config))
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Runs one upstream call under the configured timeout.
    pub(crate) async fn timed<F>(&self, what: &str, call: F) -> Result<Value>
    where
        F: Future<Output = Result<Value>>,
    {
        let limit = self.config.request_timeout;
        match tokio::time::timeout(limit, call).await {
            Ok(result) => result,
            Err(_) => Err(anyhow!("{} timed out after {:?}", what, limit)),
        }
    }

    pub async fn fetch_category(
        &self,
        category: Category,
        page: u32,
        genre: Option<u32>,
    ) -> ListPage {
        let page = page.clamp(1, MAX_TOTAL_PAGES);
        if genre.is_some() && category != Category::Popular {
            debug!(%category, ?genre, "Genre filter only applies to popular, ignoring");
        }
        let query = category.query(page, genre, self.clock.today(), &self.config);
        debug!(%category, page, path = %query.path, "Fetching category");

        match self.timed(category.id(), self.api.list(&query)).await {
            Ok(raw) => self.normalizer.list(&raw),
            Err(e) => {
                warn!(%category, page, error = %e, "Category fetch failed, returning empty page");
                ListPage::empty()
            }
        }
    }

    /// Leading popular titles for the home carousel, in upstream order.
    pub async fn featured(&self) -> Vec<Movie> {
        self.fetch_category(Category::Popular, 1, None)
            .await
            .movies
            .into_iter()
            .take(FEATURED_COUNT)
            .collect()
    }
}
