// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Sumanize

//! # API Data Models
//!
//! Request and response data structures for the REST API. All types derive
//! `Serialize`, `Deserialize`, and `ToSchema` for JSON handling and OpenAPI
//! documentation.
//!
//! ## Model Categories
//!
//! - **Summaries**: submitted content and the markdown produced for it
//! - **Profiles**: the per-user record kept alongside sessions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;
use utoipa::ToSchema;

use crate::error::ApiError;

/// What kind of content a summary was produced from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SummarySource {
    /// Raw text pasted by the user.
    Text,
    /// Text extracted from an uploaded document. Extraction happens
    /// client-side; the API receives plain text.
    Document,
    /// A YouTube link.
    Youtube,
}

impl std::fmt::Display for SummarySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SummarySource::Text => write!(f, "text"),
            SummarySource::Document => write!(f, "document"),
            SummarySource::Youtube => write!(f, "youtube"),
        }
    }
}

/// A produced summary, as stored and as returned to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Summary {
    /// Unique identifier.
    pub id: String,
    /// Owning user.
    pub user_id: String,
    /// What the summary was produced from.
    pub source: SummarySource,
    /// The markdown text returned by the summarizer.
    pub markdown: String,
    /// When the summary was produced.
    pub created_at: DateTime<Utc>,
}

/// Request body for `POST /api/summarize`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SummarizeRequest {
    pub source: SummarySource,
    /// The text to summarize, or the YouTube URL for [`SummarySource::Youtube`].
    pub content: String,
}

/// Hosts accepted for YouTube submissions.
const YOUTUBE_HOSTS: [&str; 4] = [
    "youtube.com",
    "www.youtube.com",
    "m.youtube.com",
    "youtu.be",
];

impl SummarizeRequest {
    /// Validate the submission before spending a summarizer call on it.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.content.trim().is_empty() {
            return Err(ApiError::bad_request("content must not be empty"));
        }

        if self.source == SummarySource::Youtube {
            let url = Url::parse(self.content.trim())
                .map_err(|_| ApiError::bad_request("content must be a valid URL"))?;
            let host_ok = url
                .host_str()
                .map(|host| YOUTUBE_HOSTS.contains(&host))
                .unwrap_or(false);
            if !host_ok {
                return Err(ApiError::bad_request("content must be a YouTube link"));
            }
        }

        Ok(())
    }
}

/// The per-user profile record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserProfile {
    /// Canonical user id (matches the session identity).
    pub user_id: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Last write, for last-write-wins reconciliation.
    pub updated_at: DateTime<Utc>,
}

/// Request body for `PUT /api/account/profile`.
///
/// Only the fields named in the request are overwritten.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl UpdateProfileRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if let Some(email) = &self.email {
            if !email.contains('@') {
                return Err(ApiError::bad_request("email must contain '@'"));
            }
        }
        if let Some(name) = &self.display_name {
            if name.trim().is_empty() {
                return Err(ApiError::bad_request("display_name must not be empty"));
            }
        }
        Ok(())
    }
}
