use reqwest::Client;
use serde::Deserialize;

use crate::domain::{
    common::entities::app_errors::CoreError,
    food_analysis::{ports::VideoLookup, value_objects::VideoMatch},
};

const YOUTUBE_SEARCH_ENDPOINT: &str = "https://www.googleapis.com/youtube/v3/search";

/// YouTube Data API v3 search. Without an API key every lookup finds nothing.
#[derive(Debug, Clone)]
pub struct YoutubeVideoLookup {
    api_key: Option<String>,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
    #[serde(default)]
    snippet: Option<Snippet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItemId {
    #[serde(default)]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Snippet {
    #[serde(default)]
    thumbnails: Thumbnails,
}

#[derive(Debug, Default, Deserialize)]
struct Thumbnails {
    high: Option<Thumbnail>,
    medium: Option<Thumbnail>,
    default: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

impl YoutubeVideoLookup {
    pub fn new(api_key: Option<String>, client: Client) -> Self {
        Self {
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            client,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }
}

fn first_match(response: SearchResponse) -> Option<VideoMatch> {
    response.items.into_iter().find_map(|item| {
        let video_id = item.id.video_id?;
        let thumbnail_url = item.snippet.and_then(|snippet| {
            let thumbnails = snippet.thumbnails;
            thumbnails
                .high
                .or(thumbnails.medium)
                .or(thumbnails.default)
                .map(|t| t.url)
        });

        Some(VideoMatch {
            video_id,
            thumbnail_url,
        })
    })
}

impl VideoLookup for YoutubeVideoLookup {
    async fn search_video(&self, query: String) -> Result<Option<VideoMatch>, CoreError> {
        let Some(api_key) = &self.api_key else {
            return Ok(None);
        };

        let response = self
            .client
            .get(YOUTUBE_SEARCH_ENDPOINT)
            .query(&[
                ("part", "snippet"),
                ("type", "video"),
                ("maxResults", "1"),
                ("q", query.as_str()),
                ("key", api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("YouTube search request failed: {}", e);
                CoreError::UpstreamFailed(format!("video search error: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(CoreError::UpstreamFailed(format!(
                "video search returned {}",
                status
            )));
        }

        let body: SearchResponse = response.json().await.map_err(|e| {
            CoreError::UpstreamFailed(format!("Failed to parse video search response: {}", e))
        })?;

        Ok(first_match(body))
    }
}
