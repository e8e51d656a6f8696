use serde_json::Value;
use tracing::{debug, warn};

use crate::catalog::Catalog;
use crate::models::{MovieDetails, Trailer};
use crate::trailer;

impl Catalog {
    /// Primary record, similar titles and reviews, fetched side by side.
    ///
    /// Each branch settles on its own. A failed or timed-out secondary call
    /// leaves its list empty; a failed primary call yields
    /// [`MovieDetails::not_found`] whatever the other two returned.
    pub async fn movie_details(&self, id: &str) -> MovieDetails {
        let id = id.trim();
        if id.is_empty() {
            return MovieDetails::not_found();
        }
        debug!(movie_id = %id, "Fetching movie details");

        let (primary, similar, reviews) = tokio::join!(
            self.timed("movie", self.api.movie(id)),
            self.timed("similar", self.api.similar(id)),
            self.timed("reviews", self.api.reviews(id)),
        );

        let primary = match primary {
            Ok(raw) => raw,
            Err(e) => {
                warn!(movie_id = %id, error = %e, "Movie record unavailable");
                return MovieDetails::not_found();
            }
        };
        let similar = similar.unwrap_or_else(|e| {
            warn!(movie_id = %id, error = %e, "Similar titles unavailable");
            Value::Null
        });
        let reviews = reviews.unwrap_or_else(|e| {
            warn!(movie_id = %id, error = %e, "Reviews unavailable");
            Value::Null
        });

        self.normalizer.details(&primary, &similar, &reviews)
    }

    /// Trailer from the standalone videos endpoint.
    pub async fn trailer(&self, id: &str) -> Option<Trailer> {
        let id = id.trim();
        if id.is_empty() {
            return None;
        }
        match self.timed("videos", self.api.videos(id)).await {
            Ok(raw) => trailer::trailer_from(&raw),
            Err(e) => {
                warn!(movie_id = %id, error = %e, "Videos unavailable");
                None
            }
        }
    }
}
