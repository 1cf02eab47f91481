//! Supplementary resource search.
//!
//! Search is best-effort: the orchestrator logs a failure and carries on with
//! no resources.

use async_trait::async_trait;
use log::debug;
use reqwest::Client as HttpClient;
use serde::Deserialize;
use std::collections::HashSet;
use std::time::Duration;

use cadence_core::checkins::{CheckInContext, CheckInResource};

use crate::error::CheckInError;

/// Most resources attached to one check-in.
pub const MAX_RESOURCES: usize = 3;

const BRAVE_SEARCH_URL: &str = "https://api.search.brave.com/res/v1/web/search";
const MAX_QUERIES: usize = 2;

/// Trait for finding reading or media resources relevant to a context.
#[async_trait]
pub trait ResourceSearcherTrait: Send + Sync {
    async fn search(&self, context: &CheckInContext) -> Result<Vec<CheckInResource>, CheckInError>;
}

/// Searcher used when no search API key is configured.
pub struct DisabledResourceSearcher;

#[async_trait]
impl ResourceSearcherTrait for DisabledResourceSearcher {
    async fn search(&self, _context: &CheckInContext) -> Result<Vec<CheckInResource>, CheckInError> {
        Ok(Vec::new())
    }
}

/// Brave Search web API.
pub struct BraveResourceSearcher {
    client: HttpClient,
    api_key: String,
    endpoint: String,
}

impl BraveResourceSearcher {
    pub fn new(api_key: String) -> Result<Self, CheckInError> {
        let client = HttpClient::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| CheckInError::internal(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            api_key,
            endpoint: BRAVE_SEARCH_URL.to_string(),
        })
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    async fn query(&self, query: &str) -> Result<Vec<BraveResult>, CheckInError> {
        let response = self
            .client
            .get(&self.endpoint)
            .header("Accept", "application/json")
            .header("X-Subscription-Token", &self.api_key)
            .query(&[("q", query), ("count", "5"), ("safesearch", "strict")])
            .send()
            .await
            .map_err(|e| CheckInError::Search(e.to_string()))?;

        if !response.status().is_success() {
            return Err(CheckInError::Search(format!(
                "search returned HTTP {}",
                response.status()
            )));
        }

        let body: BraveResponse = response
            .json()
            .await
            .map_err(|e| CheckInError::Search(e.to_string()))?;
        Ok(body.web.map(|w| w.results).unwrap_or_default())
    }
}

#[async_trait]
impl ResourceSearcherTrait for BraveResourceSearcher {
    async fn search(&self, context: &CheckInContext) -> Result<Vec<CheckInResource>, CheckInError> {
        let mut results = Vec::new();
        for query in build_queries(context) {
            debug!("Searching resources for \"{}\"", query);
            results.extend(self.query(&query).await?);
        }
        Ok(collect_resources(results))
    }
}

#[derive(Debug, Deserialize)]
struct BraveResponse {
    #[serde(default)]
    web: Option<BraveWeb>,
}

#[derive(Debug, Deserialize)]
struct BraveWeb {
    #[serde(default)]
    results: Vec<BraveResult>,
}

#[derive(Debug, Clone, Deserialize)]
struct BraveResult {
    title: String,
    url: String,
    #[serde(default)]
    description: String,
}

/// Queries from the most active activity types, and their goal names.
fn build_queries(context: &CheckInContext) -> Vec<String> {
    let mut active: Vec<_> = context.activities.iter().filter(|a| a.entry_count > 0).collect();
    active.sort_by(|a, b| b.entry_count.cmp(&a.entry_count));

    active
        .into_iter()
        .take(MAX_QUERIES)
        .map(|activity| match activity.goals.first() {
            Some(goal) => format!(
                "{} tips to {}",
                activity.name.to_lowercase(),
                goal.name.to_lowercase()
            ),
            None if activity.is_negative => format!("how to reduce {}", activity.name.to_lowercase()),
            None => format!("{} habit tips", activity.name.to_lowercase()),
        })
        .collect()
}

fn collect_resources(results: Vec<BraveResult>) -> Vec<CheckInResource> {
    let mut seen = HashSet::new();
    results
        .into_iter()
        .filter(|r| !r.url.is_empty() && seen.insert(r.url.clone()))
        .take(MAX_RESOURCES)
        .map(|r| CheckInResource {
            resource_type: resource_type_for(&r.url).to_string(),
            title: strip_markup(&r.title),
            description: strip_markup(&r.description),
            url: r.url,
        })
        .collect()
}

fn resource_type_for(url: &str) -> &'static str {
    let url = url.to_lowercase();
    if url.contains("youtube.com") || url.contains("youtu.be") || url.contains("vimeo.com") {
        "video"
    } else if url.contains("podcast") || url.contains("spotify.com/episode") {
        "podcast"
    } else {
        "article"
    }
}

/// Search snippets highlight matches with inline tags.
fn strip_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_tag = false;
    for c in text.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out.replace("&amp;", "&").replace("&#x27;", "'").replace("&quot;", "\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(url: &str) -> BraveResult {
        BraveResult {
            title: format!("<strong>Title</strong> {}", url),
            url: url.to_string(),
            description: "Tips &amp; tricks".to_string(),
        }
    }

    #[test]
    fn dedupes_by_url_and_caps() {
        let resources = collect_resources(vec![
            result("https://a.example"),
            result("https://a.example"),
            result("https://www.youtube.com/watch?v=1"),
            result("https://b.example"),
            result("https://c.example"),
        ]);

        assert_eq!(resources.len(), MAX_RESOURCES);
        assert_eq!(resources[0].title, "Title https://a.example");
        assert_eq!(resources[0].description, "Tips & tricks");
        assert_eq!(resources[1].resource_type, "video");
        assert_eq!(resources[2].resource_type, "article");
    }

    #[test]
    fn parses_brave_payload_without_web_section() {
        let body: BraveResponse = serde_json::from_str(r#"{"type": "search"}"#).unwrap();
        assert!(body.web.is_none());
    }

    #[tokio::test]
    async fn disabled_searcher_returns_nothing() {
        let context = crate::env::test_env::empty_context();
        let found = DisabledResourceSearcher.search(&context).await.unwrap();
        assert!(found.is_empty());
    }
}
