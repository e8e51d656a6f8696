use anyhow::anyhow;
use std::cmp::Ordering;
use std::str::FromStr;

use crate::models::{rating_value, ListPage, Movie};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortKey {
    #[default]
    Default,
    Title,
    Year,
    Rating,
}

pub struct SortOption {
    pub key: SortKey,
    pub id: &'static str,
    pub label: &'static str,
    pub compare: fn(&Movie, &Movie) -> Ordering,
}

/// Indexed by `SortKey as usize`.
pub static SORT_OPTIONS: [SortOption; 4] = [
    SortOption {
        key: SortKey::Default,
        id: "default",
        label: "Default",
        compare: upstream_order,
    },
    SortOption {
        key: SortKey::Title,
        id: "title",
        label: "Title",
        compare: by_title,
    },
    SortOption {
        key: SortKey::Year,
        id: "year",
        label: "Year",
        compare: by_year,
    },
    SortOption {
        key: SortKey::Rating,
        id: "rating",
        label: "Rating",
        compare: by_rating,
    },
];

impl SortKey {
    pub fn option(&self) -> &'static SortOption {
        &SORT_OPTIONS[*self as usize]
    }

    pub fn id(&self) -> &'static str {
        self.option().id
    }

    pub fn label(&self) -> &'static str {
        self.option().label
    }
}

impl FromStr for SortKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        SORT_OPTIONS
            .iter()
            .find(|o| o.id == wanted)
            .map(|o| o.key)
            .ok_or_else(|| anyhow!("unknown sort key '{}'", s))
    }
}

fn upstream_order(_: &Movie, _: &Movie) -> Ordering {
    Ordering::Equal
}

fn by_title(a: &Movie, b: &Movie) -> Ordering {
    a.title
        .to_lowercase()
        .cmp(&b.title.to_lowercase())
        .then_with(|| a.title.cmp(&b.title))
}

fn by_year(a: &Movie, b: &Movie) -> Ordering {
    year_value(&b.year).cmp(&year_value(&a.year))
}

fn by_rating(a: &Movie, b: &Movie) -> Ordering {
    let a = rating_value(&a.rating).unwrap_or(0.0);
    let b = rating_value(&b.rating).unwrap_or(0.0);
    b.total_cmp(&a)
}

fn year_value(year: &str) -> u32 {
    year.trim().parse().unwrap_or(0)
}

/// Stable in-place sort; equal entries keep upstream order.
pub fn sort_movies(movies: &mut [Movie], key: SortKey) {
    if key == SortKey::Default {
        return;
    }
    movies.sort_by(key.option().compare);
}

/// Sorted copy of the loaded page only; other pages are never consulted.
pub fn sorted_page(page: &ListPage, key: SortKey) -> Vec<Movie> {
    let mut movies = page.movies.clone();
    sort_movies(&mut movies, key);
    movies
}
