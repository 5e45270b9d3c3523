//! LeetCode stats fetching.
//!
//! [`StatsFetcher`] is the seam the services depend on; [`LeetCodeClient`]
//! talks to the public GraphQL endpoint.

pub mod client;

pub use client::{LeetCodeClient, DEFAULT_GRAPHQL_URL};

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// No matched profile upstream, or the response had an unexpected shape
    #[error("LeetCode profile not found")]
    NotFound,
    /// Transport failure, timeout, non-2xx status or a non-JSON body
    #[error("LeetCode API unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait StatsFetcher: Send + Sync {
    /// Fetch the "All" accepted-submission count for a LeetCode username
    async fn fetch_solved_count(&self, username: &str) -> Result<u32, FetchError>;
}

#[cfg(test)]
pub use mock::MockStatsFetcher;
