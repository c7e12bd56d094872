//! LeetCode question-of-the-day adapter
//!
//! Queries the public GraphQL endpoint and classifies the answer:
//! - 2xx: parse the `activeDailyCodingChallengeQuestion` envelope
//! - soft block (`cf-mitigated` header or 403): run the fallback helper once
//! - any other status or transport failure: give up for this run
//!
//! Every failure degrades to [`Availability::Absent`]; nothing is raised past
//! [`LeetCodeSource::fetch_daily`].

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, REFERER, USER_AGENT};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

use super::fallback::FallbackFetcher;
use crate::config::LeetCodeConfig;
use crate::models::{Availability, DailyProblem, Difficulty, TopicTag};
use crate::utils::error::{FetchError, ParseError};
use crate::utils::truncate_text;

/// Default GraphQL endpoint
pub const DEFAULT_GRAPHQL_URL: &str = "https://leetcode.com/graphql";

/// Referer LeetCode expects on GraphQL requests
const PROBLEMSET_REFERER: &str = "https://leetcode.com/problemset/";

/// Header set by the CDN when a request was answered with a challenge
const MITIGATION_HEADER: &str = "cf-mitigated";

const OPERATION_NAME: &str = "questionOfToday";

/// GraphQL query for the daily challenge
pub const QUESTION_OF_TODAY_QUERY: &str = r#"query questionOfToday {
  activeDailyCodingChallengeQuestion {
    date
    userStatus
    link
    question {
      acRate
      difficulty
      freqBar
      frontendQuestionId: questionFrontendId
      isFavor
      paidOnly: isPaidOnly
      status
      title
      titleSlug
      hasVideoSolution
      hasSolution
      topicTags {
        name
        id
        slug
      }
    }
  }
}"#;

// ============================================================================
// Response envelope
// ============================================================================

#[derive(Debug, Deserialize)]
struct GraphQlEnvelope {
    data: Option<QuestionOfTodayData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuestionOfTodayData {
    active_daily_coding_challenge_question: Option<ActiveDailyChallenge>,
}

#[derive(Debug, Deserialize)]
struct ActiveDailyChallenge {
    link: Option<String>,
    question: Option<QuestionRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuestionRecord {
    title: Option<String>,
    difficulty: Option<String>,
    #[serde(default)]
    topic_tags: Vec<TopicTag>,
}

/// Parse a GraphQL response body into a fully populated [`DailyProblem`]
///
/// # Errors
///
/// Returns `ParseError::InvalidPayload` for malformed JSON,
/// `ParseError::MissingField` when a required field is absent or empty and
/// `ParseError::UnknownDifficulty` for unexpected difficulty labels.
pub fn parse_daily_response(body: &str) -> Result<DailyProblem, ParseError> {
    let envelope: GraphQlEnvelope =
        serde_json::from_str(body).map_err(|e| ParseError::InvalidPayload(e.to_string()))?;

    let challenge = envelope
        .data
        .ok_or(ParseError::MissingField("data"))?
        .active_daily_coding_challenge_question
        .ok_or(ParseError::MissingField("activeDailyCodingChallengeQuestion"))?;

    let link = non_empty(challenge.link).ok_or(ParseError::MissingField("link"))?;
    let question = challenge
        .question
        .ok_or(ParseError::MissingField("question"))?;
    let title = non_empty(question.title).ok_or(ParseError::MissingField("title"))?;
    let difficulty: Difficulty = non_empty(question.difficulty)
        .ok_or(ParseError::MissingField("difficulty"))?
        .parse()?;

    Ok(DailyProblem {
        title,
        difficulty,
        link,
        topic_tags: question.topic_tags,
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// ============================================================================
// Source
// ============================================================================

/// LeetCode daily question source
pub struct LeetCodeSource {
    client: Client,
    graphql_url: String,
    fallback: Option<FallbackFetcher>,
}

impl LeetCodeSource {
    /// Create a source from configuration
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Http` if the HTTP client cannot be created
    pub fn new(config: &LeetCodeConfig, timeout: Duration) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(REFERER, HeaderValue::from_static(PROBLEMSET_REFERER));
        if let Ok(agent) = HeaderValue::from_str(&config.user_agent) {
            headers.insert(USER_AGENT, agent);
        }

        let client = Client::builder()
            .timeout(timeout)
            .gzip(true)
            .cookie_store(true)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            graphql_url: config.graphql_url.clone(),
            fallback: FallbackFetcher::from_command(&config.fallback_command, timeout),
        })
    }

    /// Replace the fallback helper
    pub fn with_fallback(mut self, fallback: Option<FallbackFetcher>) -> Self {
        self.fallback = fallback;
        self
    }

    /// Whether a fallback helper is configured
    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    /// Fetch today's question, degrading every failure to `Absent`
    pub async fn fetch_daily(&self) -> Availability<DailyProblem> {
        match self.query().await {
            Ok(problem) => {
                tracing::info!(
                    title = %problem.title,
                    difficulty = %problem.difficulty,
                    tags = %problem.tag_names(),
                    "Fetched LeetCode daily question"
                );
                Availability::Present(problem)
            }
            Err(FetchError::SoftBlocked(status)) => {
                tracing::warn!(status, "LeetCode API blocked the request");
                self.fetch_via_fallback().await
            }
            Err(e) => {
                tracing::error!(error = %e, "There was a problem fetching data from the LeetCode API");
                Availability::Absent
            }
        }
    }

    async fn fetch_via_fallback(&self) -> Availability<DailyProblem> {
        let Some(fallback) = &self.fallback else {
            tracing::warn!("No fallback helper configured, daily question unavailable");
            return Availability::Absent;
        };

        match fallback.fetch().await {
            Ok(problem) => {
                tracing::info!(title = %problem.title, "Fetched LeetCode daily question via fallback helper");
                Availability::Present(problem)
            }
            Err(e) => {
                tracing::error!(error = %e, "Fallback helper output unusable");
                Availability::Absent
            }
        }
    }

    /// Issue the GraphQL request and classify the response
    async fn query(&self) -> Result<DailyProblem, FetchError> {
        let body = serde_json::json!({
            "query": QUESTION_OF_TODAY_QUERY,
            "operationName": OPERATION_NAME,
            "variables": {},
        });

        let response = self
            .client
            .post(&self.graphql_url)
            .header(CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::Timeout
                } else {
                    FetchError::Http(e)
                }
            })?;

        let status = response.status();
        if is_soft_block(status, response.headers()) {
            return Err(FetchError::SoftBlocked(status.as_u16()));
        }

        let text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = status.as_u16(),
                body = %truncate_text(&text, 500),
                "LeetCode API returned an error"
            );
            return Err(FetchError::ServerError(status.as_u16()));
        }

        parse_daily_response(&text).map_err(|e| FetchError::Decode(e.to_string()))
    }
}

/// Platform-level mitigation rather than an ordinary error
fn is_soft_block(status: StatusCode, headers: &HeaderMap) -> bool {
    headers.contains_key(MITIGATION_HEADER) || status == StatusCode::FORBIDDEN
}
