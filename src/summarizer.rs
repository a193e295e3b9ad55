// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Sumanize

//! Generative-AI summarizer collaborator.
//!
//! Treated as an opaque remote procedure: prompt in, markdown out. The
//! trait keeps handlers testable; the HTTP implementation posts to the
//! configured endpoint.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::models::SummarySource;

/// Upper bound on a single summarizer call.
const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(60);

#[derive(Debug, Error)]
pub enum SummarizeError {
    #[error("summarizer request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("summarizer returned an unusable response")]
    BadResponse,
}

#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Produce a markdown summary of `content`.
    async fn summarize(
        &self,
        source: SummarySource,
        content: &str,
    ) -> Result<String, SummarizeError>;
}

#[derive(Serialize)]
struct SummarizerRequest {
    prompt: String,
}

#[derive(Deserialize)]
struct SummarizerResponse {
    markdown: String,
}

/// Build the prompt sent to the generative endpoint.
fn prompt_for(source: SummarySource, content: &str) -> String {
    match source {
        SummarySource::Text | SummarySource::Document => format!(
            "Summarize the following content as well-structured markdown with \
             a title heading and bullet points for the key ideas.\n\n{content}"
        ),
        SummarySource::Youtube => format!(
            "Summarize the video at the following YouTube URL as well-structured \
             markdown with a title heading and bullet points for the key ideas.\n\n{content}"
        ),
    }
}

/// HTTP [`Summarizer`] against the configured endpoint.
pub struct HttpSummarizer {
    endpoint: Url,
    client: reqwest::Client,
}

impl HttpSummarizer {
    pub fn new(endpoint: Url) -> Self {
        Self {
            endpoint,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Summarizer for HttpSummarizer {
    async fn summarize(
        &self,
        source: SummarySource,
        content: &str,
    ) -> Result<String, SummarizeError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .timeout(REQUEST_TIMEOUT)
            .json(&SummarizerRequest {
                prompt: prompt_for(source, content),
            })
            .send()
            .await?;

        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), "summarizer returned an error status");
            return Err(SummarizeError::BadResponse);
        }

        let body: SummarizerResponse =
            response.json().await.map_err(|_| SummarizeError::BadResponse)?;

        if body.markdown.trim().is_empty() {
            return Err(SummarizeError::BadResponse);
        }

        Ok(body.markdown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompts_ask_for_markdown_and_carry_the_content() {
        let text = prompt_for(SummarySource::Text, "a long article");
        assert!(text.contains("markdown"));
        assert!(text.ends_with("a long article"));

        let video = prompt_for(SummarySource::Youtube, "https://youtu.be/abc");
        assert!(video.contains("YouTube"));
        assert!(video.ends_with("https://youtu.be/abc"));
    }

    #[test]
    fn document_and_text_share_a_prompt_shape() {
        assert_eq!(
            prompt_for(SummarySource::Text, "x"),
            prompt_for(SummarySource::Document, "x")
        );
    }
}
