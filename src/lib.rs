pub mod app;
pub mod catalog;
pub mod config;
pub mod details;
pub mod models;
pub mod normalize;
pub mod search;
pub mod sort;
pub mod tmdb;
pub mod trailer;
pub mod utils;

pub use catalog::{Catalog, Category};
pub use models::{ListPage, Movie, MovieDetails};
