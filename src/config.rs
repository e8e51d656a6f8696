use anyhow::{Context, Result};
use std::env;
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_API_BASE: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_IMAGE_BASE: &str = "https://image.tmdb.org/t/p";
pub const POSTER_SIZE: &str = "w500";
pub const BACKDROP_SIZE: &str = "original";
pub const DEFAULT_REGION: &str = "US";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// Which side of "today" the trending category keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFilter {
    OnOrAfter,
    OnOrBefore,
}

impl DateFilter {
    /// Suffix used by the discover endpoint (`release_date.gte` / `release_date.lte`).
    pub fn operator(&self) -> &'static str {
        match self {
            DateFilter::OnOrAfter => "gte",
            DateFilter::OnOrBefore => "lte",
        }
    }

    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "gte" | "after" => Some(DateFilter::OnOrAfter),
            "lte" | "before" => Some(DateFilter::OnOrBefore),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendingFilter {
    pub region: Option<String>,
    pub date: DateFilter,
}

#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub api_key: String,
    pub api_base: String,
    pub image_base: String,
    pub region: String,
    pub trending: TrendingFilter,
    pub request_timeout: Duration,
    pub search_debounce: Duration,
}

impl CatalogConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            image_base: DEFAULT_IMAGE_BASE.to_string(),
            region: DEFAULT_REGION.to_string(),
            trending: TrendingFilter {
                region: Some(DEFAULT_REGION.to_string()),
                date: DateFilter::OnOrAfter,
            },
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            search_debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
        }
    }

    /// The one place the required key is checked; binaries rely on it.
    pub fn from_env() -> Result<Self> {
        let lookup = |key: &str| env::var(key).ok();
        let api_key = required_key(&lookup)?;
        Ok(Self::from_lookup(api_key, lookup))
    }

    fn from_lookup(api_key: String, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::new(api_key);
        if let Some(base) = lookup("TMDB_BASE_URL").filter(|s| !s.trim().is_empty()) {
            config.api_base = base.trim().trim_end_matches('/').to_string();
        }
        if let Some(base) = lookup("TMDB_IMAGE_BASE_URL").filter(|s| !s.trim().is_empty()) {
            config.image_base = base.trim().trim_end_matches('/').to_string();
        }
        if let Some(region) = lookup("CATALOG_REGION").filter(|s| !s.trim().is_empty()) {
            config.region = region.trim().to_ascii_uppercase();
        }
        // An explicitly empty TRENDING_REGION turns region scoping off.
        config.trending.region = match lookup("TRENDING_REGION") {
            Some(r) if r.trim().is_empty() => None,
            Some(r) => Some(r.trim().to_ascii_uppercase()),
            None => Some(config.region.clone()),
        };
        if let Some(raw) = lookup("TRENDING_DATE_FILTER") {
            match DateFilter::parse(&raw) {
                Some(filter) => config.trending.date = filter,
                None => warn!(value = %raw, "Unknown TRENDING_DATE_FILTER, using gte"),
            }
        }
        if let Some(secs) = parse_u64(&lookup, "REQUEST_TIMEOUT_SECS") {
            config.request_timeout = Duration::from_secs(secs.max(1));
        }
        if let Some(ms) = parse_u64(&lookup, "SEARCH_DEBOUNCE_MS") {
            config.search_debounce = Duration::from_millis(ms);
        }
        config
    }

    pub fn poster_base(&self) -> String {
        format!("{}/{POSTER_SIZE}", self.image_base)
    }

    pub fn backdrop_base(&self) -> String {
        format!("{}/{BACKDROP_SIZE}", self.image_base)
    }
}

fn required_key(lookup: &impl Fn(&str) -> Option<String>) -> Result<String> {
    lookup("TMDB_API_KEY")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .context("Missing required environment variable: TMDB_API_KEY")
}

fn parse_u64(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<u64> {
    let raw = lookup(key)?;
    match raw.trim().parse::<u64>() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!(key, value = %raw, "Ignoring unparseable value, using default");
            None
        }
    }
}
