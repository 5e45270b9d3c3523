//! LeetCode GraphQL client for accepted-submission counts.

use super::{FetchError, StatsFetcher};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_GRAPHQL_URL: &str = "https://leetcode.com/graphql";

const USER_PROFILE_QUERY: &str = r#"
query getUserProfile($username: String!) {
  matchedUser(username: $username) {
    submitStats {
      acSubmissionNum {
        difficulty
        count
      }
    }
  }
}
"#;

/// Difficulty bucket that holds the overall solved count
const ALL_DIFFICULTY: &str = "All";

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<ProfileData>,
}

#[derive(Debug, Deserialize)]
struct ProfileData {
    #[serde(rename = "matchedUser")]
    matched_user: Option<MatchedUser>,
}

#[derive(Debug, Deserialize)]
struct MatchedUser {
    #[serde(rename = "submitStats")]
    submit_stats: SubmitStats,
}

#[derive(Debug, Deserialize)]
struct SubmitStats {
    #[serde(rename = "acSubmissionNum")]
    ac_submission_num: Vec<SubmissionCount>,
}

#[derive(Debug, Deserialize)]
struct SubmissionCount {
    difficulty: String,
    count: u32,
}

/// Extract the "All" solved count from a raw GraphQL response body.
///
/// A body that is not JSON is `Unavailable`; JSON of the wrong shape, a null
/// `matchedUser`, or a missing "All" bucket is `NotFound`.
pub fn parse_solved_count(body: &str) -> Result<u32, FetchError> {
    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| FetchError::Unavailable(format!("invalid JSON response: {}", e)))?;

    let response: GraphQlResponse = serde_json::from_value(value).map_err(|e| {
        log::debug!("LeetCode: Unexpected response shape: {}", e);
        FetchError::NotFound
    })?;

    let user = response
        .data
        .and_then(|d| d.matched_user)
        .ok_or(FetchError::NotFound)?;

    user.submit_stats
        .ac_submission_num
        .into_iter()
        .find(|entry| entry.difficulty == ALL_DIFFICULTY)
        .map(|entry| entry.count)
        .ok_or(FetchError::NotFound)
}

pub struct LeetCodeClient {
    client: reqwest::Client,
    endpoint: String,
}

impl LeetCodeClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, String> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| format!("Failed to build HTTP client: {}", e))?;
        Ok(Self::with_client(client, endpoint))
    }

    /// Use a preconfigured reqwest client (e.g. custom proxy settings)
    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl StatsFetcher for LeetCodeClient {
    async fn fetch_solved_count(&self, username: &str) -> Result<u32, FetchError> {
        let body = serde_json::json!({
            "query": USER_PROFILE_QUERY,
            "variables": { "username": username },
        });

        let resp = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::REFERER, "https://leetcode.com")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                log::error!("LeetCode: Request for {} failed: {}", username, e);
                FetchError::Unavailable(format!("request failed: {}", e))
            })?;

        let status = resp.status();
        if !status.is_success() {
            log::error!("LeetCode: HTTP {} fetching stats for {}", status, username);
            return Err(FetchError::Unavailable(format!("HTTP {}", status)));
        }

        let text = resp.text().await.map_err(|e| {
            log::error!("LeetCode: Failed to read response for {}: {}", username, e);
            FetchError::Unavailable(format!("failed to read response: {}", e))
        })?;

        let result = parse_solved_count(&text);
        match &result {
            Ok(count) => log::debug!("LeetCode: {} has {} problems solved", username, count),
            Err(e) => log::info!("LeetCode: No stats for {}: {}", username, e),
        }
        result
    }
}
