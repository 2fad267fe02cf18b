#![forbid(unsafe_code)]

//! Backend for the TrendTube dashboard.
//!
//! The crate proxies the YouTube Data API: it lists categories for a region
//! and serves trending videos ranked by views, likes or comments, with
//! optional shorts filtering. The `backend` binary wraps [`api::router`].

pub mod api;
pub mod categories;
pub mod config;
pub mod dashboard;
pub mod duration;
pub mod enrich;
pub mod metadata;
pub mod ranking;
pub mod retriever;
pub mod youtube;

#[cfg(test)]
mod testing;
