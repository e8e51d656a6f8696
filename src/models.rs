use serde::{Deserialize, Serialize};

/// Sentinel for any absent scalar, images included.
pub const NOT_AVAILABLE: &str = "N/A";
pub const UNTITLED: &str = "Untitled";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: String,
    pub title: String,
    pub year: String,
    pub poster_url: String,
    pub backdrop_url: String,
    pub plot: String,
    /// 0-10 with one decimal, or "N/A".
    pub rating: String,
}

impl Movie {
    pub fn placeholder() -> Self {
        Self {
            id: NOT_AVAILABLE.to_string(),
            title: UNTITLED.to_string(),
            year: NOT_AVAILABLE.to_string(),
            poster_url: NOT_AVAILABLE.to_string(),
            backdrop_url: NOT_AVAILABLE.to_string(),
            plot: String::new(),
            rating: NOT_AVAILABLE.to_string(),
        }
    }

    pub fn has_poster(&self) -> bool {
        self.poster_url != NOT_AVAILABLE
    }

    pub fn has_backdrop(&self) -> bool {
        self.backdrop_url != NOT_AVAILABLE
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CastCredit {
    pub id: String,
    pub name: String,
    pub character: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrewCredit {
    pub id: String,
    pub name: String,
    pub job: String,
    pub department: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    pub author: String,
    pub content: String,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trailer {
    pub key: String,
    pub name: String,
    pub site: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieDetails {
    #[serde(flatten)]
    pub movie: Movie,
    pub release_date: String,
    pub runtime: String,
    pub genres: Vec<String>,
    pub production_companies: Vec<String>,
    pub website: String,
    pub votes: String,
    pub imdb_url: String,
    pub cast: Vec<CastCredit>,
    pub crew: Vec<CrewCredit>,
    pub reviews: Vec<Review>,
    pub similar_movies: Vec<Movie>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trailer: Option<Trailer>,
}

impl MovieDetails {
    /// What the detail view gets when the primary record can't be loaded.
    pub fn not_found() -> Self {
        Self {
            movie: Movie::placeholder(),
            release_date: NOT_AVAILABLE.to_string(),
            runtime: NOT_AVAILABLE.to_string(),
            genres: Vec::new(),
            production_companies: Vec::new(),
            website: NOT_AVAILABLE.to_string(),
            votes: NOT_AVAILABLE.to_string(),
            imdb_url: NOT_AVAILABLE.to_string(),
            cast: Vec::new(),
            crew: Vec::new(),
            reviews: Vec::new(),
            similar_movies: Vec::new(),
            trailer: None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.movie.id == NOT_AVAILABLE
    }

    pub fn genre_line(&self) -> String {
        join_or_na(&self.genres)
    }

    pub fn production_line(&self) -> String {
        join_or_na(&self.production_companies)
    }
}

fn join_or_na(values: &[String]) -> String {
    if values.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        values.join(", ")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPage {
    pub movies: Vec<Movie>,
    pub total_results: u64,
    pub page: u32,
    pub total_pages: u32,
}

impl ListPage {
    pub fn empty() -> Self {
        Self {
            movies: Vec::new(),
            total_results: 0,
            page: 1,
            total_pages: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub id: String,
    pub title: String,
    pub year: String,
    pub poster_url: String,
}

impl From<&Movie> for Suggestion {
    fn from(movie: &Movie) -> Self {
        Self {
            id: movie.id.clone(),
            title: movie.title.clone(),
            year: movie.year.clone(),
            poster_url: movie.poster_url.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingScale {
    FivePoint,
    TenPoint,
}

/// Upstream 0-10 score as stored on [`Movie::rating`]. Zero counts as unrated.
pub fn format_rating(score: Option<f64>) -> String {
    match score {
        Some(s) if s > 0.0 => format!("{:.1}", s.min(10.0)),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Numeric value of a stored rating; "N/A" and garbage read as `None`.
pub fn rating_value(rating: &str) -> Option<f64> {
    rating.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Converts a stored 0-10 rating for display on the requested scale.
pub fn display_rating(rating: &str, scale: RatingScale) -> String {
    match (rating_value(rating), scale) {
        (None, _) => NOT_AVAILABLE.to_string(),
        (Some(v), RatingScale::TenPoint) => format!("{v:.1}"),
        (Some(v), RatingScale::FivePoint) => format!("{:.1}", v / 2.0),
    }
}
