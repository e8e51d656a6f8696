use anyhow::anyhow;
use chrono::NaiveDate;
use cinescope::catalog::{Catalog, Category, FixedClock, FEATURED_COUNT};
use cinescope::config::CatalogConfig;
use cinescope::models::{ListPage, MovieDetails};
use cinescope::normalize::MAX_TOTAL_PAGES;
use cinescope::search::DebouncedSearch;
use cinescope::tmdb::{ListQuery, MovieApi};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Clone)]
enum Reply {
    Json(Value),
    Fail,
    Hang,
}

impl Reply {
    async fn resolve(&self, what: &str) -> anyhow::Result<Value> {
        match self {
            Reply::Json(v) => Ok(v.clone()),
            Reply::Fail => Err(anyhow!("{} -> 503 Service Unavailable", what)),
            Reply::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(anyhow!("{} never answered", what))
            }
        }
    }
}

struct FakeApi {
    movie: Reply,
    similar: Reply,
    reviews: Reply,
    videos: Reply,
    list: Reply,
    search: Reply,
    search_delays: HashMap<String, Duration>,
    list_calls: Mutex<Vec<ListQuery>>,
    search_calls: Mutex<Vec<String>>,
}

impl Default for FakeApi {
    fn default() -> Self {
        Self {
            movie: Reply::Json(movie_record()),
            similar: Reply::Json(results(similar_records(3))),
            reviews: Reply::Json(results(review_records(2))),
            videos: Reply::Json(json!({ "results": [] })),
            list: Reply::Json(list_payload(20, 1, 12)),
            search: Reply::Json(list_payload(5, 1, 1)),
            search_delays: HashMap::new(),
            list_calls: Mutex::new(Vec::new()),
            search_calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl MovieApi for FakeApi {
    async fn movie(&self, _id: &str) -> anyhow::Result<Value> {
        self.movie.resolve("movie").await
    }
    async fn similar(&self, _id: &str) -> anyhow::Result<Value> {
        self.similar.resolve("similar").await
    }
    async fn reviews(&self, _id: &str) -> anyhow::Result<Value> {
        self.reviews.resolve("reviews").await
    }
    async fn videos(&self, _id: &str) -> anyhow::Result<Value> {
        self.videos.resolve("videos").await
    }
    async fn search(&self, query: &str, _page: u32) -> anyhow::Result<Value> {
        self.search_calls.lock().unwrap().push(query.to_string());
        if let Some(delay) = self.search_delays.get(query) {
            tokio::time::sleep(*delay).await;
        }
        self.search.resolve("search").await
    }
    async fn list(&self, query: &ListQuery) -> anyhow::Result<Value> {
        self.list_calls.lock().unwrap().push(query.clone());
        self.list.resolve("list").await
    }
}

fn movie_record() -> Value {
    let cast: Vec<Value> = (0..14)
        .map(|i| json!({ "id": i, "name": format!("Actor {i}"), "character": format!("Role {i}") }))
        .collect();
    json!({
        "id": 603,
        "title": "The Matrix",
        "release_date": "1999-03-30",
        "poster_path": "/matrix.jpg",
        "backdrop_path": "/matrix-wide.jpg",
        "overview": "A hacker learns the truth.",
        "vote_average": 8.2,
        "vote_count": 26000,
        "runtime": 136,
        "genres": [{ "id": 28, "name": "Action" }],
        "credits": {
            "cast": cast,
            "crew": [
                { "id": 9339, "name": "Lana Wachowski", "job": "Director", "department": "Directing" },
                { "id": 1, "name": "Someone", "job": "Gaffer", "department": "Lighting" }
            ]
        },
        "videos": { "results": [
            { "type": "Trailer", "site": "YouTube", "official": false, "key": "vKQi3bBA1y8" }
        ]}
    })
}

fn results(items: Vec<Value>) -> Value {
    json!({ "results": items, "page": 1, "total_pages": 1, "total_results": 0 })
}

fn similar_records(n: usize) -> Vec<Value> {
    (0..n)
        .map(|i| json!({ "id": 700 + i, "title": format!("Similar {i}"), "vote_average": 6.0 }))
        .collect()
}

fn review_records(n: usize) -> Vec<Value> {
    (0..n)
        .map(|i| json!({ "id": format!("rev{i}"), "author": format!("critic{i}"), "content": "Fine." }))
        .collect()
}

fn list_payload(n: usize, page: u32, total_pages: u32) -> Value {
    let items: Vec<Value> = (0..n)
        .map(|i| json!({ "id": 100 + i, "title": format!("Movie {i}"), "release_date": "2024-05-01" }))
        .collect();
    json!({
        "results": items,
        "page": page,
        "total_pages": total_pages,
        "total_results": n as u32 * total_pages
    })
}

fn catalog_with(api: Arc<FakeApi>) -> Catalog {
    Catalog::new(api, CatalogConfig::new("test-key"))
}

#[tokio::test]
async fn failing_reviews_leave_the_rest_of_the_details() {
    let api = Arc::new(FakeApi {
        reviews: Reply::Fail,
        ..FakeApi::default()
    });
    let details = catalog_with(api).movie_details("603").await;

    assert!(!details.is_not_found());
    assert_eq!(details.movie.title, "The Matrix");
    assert!(details.reviews.is_empty());
    assert_eq!(details.cast.len(), 10);
    assert_eq!(details.crew.len(), 1);
    assert_eq!(details.similar_movies.len(), 3);
    assert_eq!(
        details.trailer.map(|t| t.url),
        Some("https://www.youtube.com/watch?v=vKQi3bBA1y8".to_string())
    );
}

#[tokio::test]
async fn failing_primary_is_the_not_found_sentinel() {
    let api = Arc::new(FakeApi {
        movie: Reply::Fail,
        ..FakeApi::default()
    });
    let details = catalog_with(api).movie_details("603").await;
    assert_eq!(details, MovieDetails::not_found());
}

#[tokio::test]
async fn blank_id_never_reaches_upstream() {
    let api = Arc::new(FakeApi {
        movie: Reply::Hang,
        ..FakeApi::default()
    });
    let details = catalog_with(api).movie_details("  ").await;
    assert!(details.is_not_found());
}

#[tokio::test(start_paused = true)]
async fn timed_out_similar_degrades_to_empty() {
    let api = Arc::new(FakeApi {
        similar: Reply::Hang,
        ..FakeApi::default()
    });
    let details = catalog_with(api).movie_details("603").await;
    assert!(!details.is_not_found());
    assert!(details.similar_movies.is_empty());
    assert_eq!(details.reviews.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn timed_out_primary_is_not_found() {
    let api = Arc::new(FakeApi {
        movie: Reply::Hang,
        ..FakeApi::default()
    });
    let details = catalog_with(api).movie_details("603").await;
    assert_eq!(details, MovieDetails::not_found());
}

#[tokio::test]
async fn category_pages_are_capped() {
    let api = Arc::new(FakeApi {
        list: Reply::Json(list_payload(20, 2, 40_000)),
        ..FakeApi::default()
    });
    let page = catalog_with(api).fetch_category(Category::TopRated, 2, None).await;
    assert_eq!(page.total_pages, MAX_TOTAL_PAGES);
    assert_eq!(page.page, 2);
    assert_eq!(page.movies.len(), 20);
}

#[tokio::test]
async fn category_transport_failure_is_an_empty_page() {
    let api = Arc::new(FakeApi {
        list: Reply::Fail,
        ..FakeApi::default()
    });
    let catalog = catalog_with(api.clone());
    for category in Category::ALL {
        assert_eq!(catalog.fetch_category(category, 1, None).await, ListPage::empty());
    }
    assert_eq!(api.list_calls.lock().unwrap().len(), Category::ALL.len());
}

#[tokio::test]
async fn requested_pages_are_clamped_before_dispatch() {
    let api = Arc::new(FakeApi::default());
    let catalog = catalog_with(api.clone());
    catalog.fetch_category(Category::Upcoming, 0, None).await;
    catalog.fetch_category(Category::Upcoming, 9_999, None).await;
    let calls = api.list_calls.lock().unwrap();
    assert_eq!(calls[0].get("page"), Some("1"));
    assert_eq!(calls[1].get("page"), Some("500"));
}

#[tokio::test]
async fn trending_uses_the_injected_clock() {
    let api = Arc::new(FakeApi::default());
    let today = NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date");
    let catalog = catalog_with(api.clone()).with_clock(Arc::new(FixedClock(today)));

    catalog.fetch_category(Category::TrendingToday, 1, None).await;
    catalog.fetch_category(Category::Popular, 1, Some(878)).await;

    let calls = api.list_calls.lock().unwrap();
    assert_eq!(calls[0].path, "/discover/movie");
    assert_eq!(calls[0].get("release_date.gte"), Some("2025-06-01"));
    assert_eq!(calls[0].get("region"), Some("US"));
    assert_eq!(calls[1].path, "/discover/movie");
    assert_eq!(calls[1].get("with_genres"), Some("878"));
}

#[tokio::test]
async fn featured_is_the_head_of_popular() {
    let api = Arc::new(FakeApi::default());
    let featured = catalog_with(api.clone()).featured().await;
    assert_eq!(featured.len(), FEATURED_COUNT);
    assert_eq!(featured[0].id, "100");
    assert_eq!(api.list_calls.lock().unwrap()[0].path, "/movie/popular");
}

#[tokio::test]
async fn trailer_lookup_uses_videos_endpoint() {
    let api = Arc::new(FakeApi {
        videos: Reply::Json(json!({ "results": [
            { "type": "Teaser", "site": "YouTube", "official": true, "key": "teaser" },
            { "type": "Trailer", "site": "YouTube", "official": true, "key": "main" }
        ]})),
        ..FakeApi::default()
    });
    let catalog = catalog_with(api);
    assert_eq!(catalog.trailer("603").await.map(|t| t.key), Some("main".to_string()));
    assert_eq!(catalog.trailer("").await, None);
}

#[tokio::test]
async fn empty_search_skips_the_network() {
    let api = Arc::new(FakeApi::default());
    let catalog = catalog_with(api.clone());
    assert_eq!(catalog.search("").await, ListPage::empty());
    assert_eq!(catalog.search("   ").await, ListPage::empty());
    assert!(catalog.suggestions("").await.is_empty());
    assert!(api.search_calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn suggestions_are_unique_by_id() {
    let api = Arc::new(FakeApi {
        search: Reply::Json(json!({ "results": [
            { "id": 1, "title": "Alien" },
            { "id": 1, "title": "Alien (duplicate)" },
            { "title": "No id" },
            { "id": 2, "title": "Aliens", "release_date": "1986-07-18" }
        ]})),
        ..FakeApi::default()
    });
    let suggestions = catalog_with(api).suggestions("alien").await;
    let titles: Vec<&str> = suggestions.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["Alien", "Aliens"]);
    assert_eq!(suggestions[1].year, "1986");
}

#[tokio::test(start_paused = true)]
async fn debounce_only_searches_the_settled_query() {
    let api = Arc::new(FakeApi::default());
    let catalog = Arc::new(catalog_with(api.clone()));
    let search = DebouncedSearch::new(catalog).with_delay(Duration::from_millis(500));

    let first = search.clone();
    let early = tokio::spawn(async move { first.submit("ma").await });
    tokio::time::sleep(Duration::from_millis(100)).await;
    let second = search.clone();
    let late = tokio::spawn(async move { second.submit("matrix").await });

    assert_eq!(early.await.unwrap(), None);
    let suggestions = late.await.unwrap().expect("latest query answers");
    assert_eq!(suggestions.len(), 5);
    assert_eq!(*api.search_calls.lock().unwrap(), vec!["matrix".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn stale_responses_are_discarded() {
    let api = Arc::new(FakeApi {
        search_delays: HashMap::from([("slow".to_string(), Duration::from_secs(2))]),
        ..FakeApi::default()
    });
    let catalog = Arc::new(catalog_with(api.clone()));
    let search = DebouncedSearch::new(catalog).with_delay(Duration::from_millis(10));

    let first = search.clone();
    let slow = tokio::spawn(async move { first.submit("slow").await });
    tokio::time::sleep(Duration::from_millis(100)).await;
    let fresh = search.submit("fast").await;

    assert!(fresh.is_some());
    assert_eq!(slow.await.unwrap(), None);
    assert_eq!(api.search_calls.lock().unwrap().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn cancel_discards_pending_search() {
    let api = Arc::new(FakeApi::default());
    let search = DebouncedSearch::new(Arc::new(catalog_with(api.clone())));

    let pending = search.clone();
    let handle = tokio::spawn(async move { pending.submit("matrix").await });
    tokio::time::sleep(Duration::from_millis(50)).await;
    search.cancel();

    assert_eq!(handle.await.unwrap(), None);
    assert!(api.search_calls.lock().unwrap().is_empty());
    assert_eq!(search.submit("").await, Some(Vec::new()));
}
