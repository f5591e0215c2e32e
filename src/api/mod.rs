//! Client for the external words/days REST service.
//!
//! Every call is single-shot: no caching, no retry. Navigation re-fetches.

use reqwest::{
    Client,
    Response,
    StatusCode,
};
use serde::Deserialize;

use crate::core::{
    BucketSummary,
    OwnerSpaceSummary,
    StudySpace,
    TangochoError,
    WordDraft,
    WordEntry,
    WordPatch,
};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Error body the API attaches to non-2xx responses. The field is optional;
/// when absent we fall back to a generic status message.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    detail: Option<String>,
}

pub fn error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(|b| b.detail)
        .unwrap_or_else(|| format!("Error {}", status))
}

#[derive(Clone)]
pub struct WordStore {
    client: Client,
    base_url: String,
}

impl WordStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { client: Client::new(), base_url: base_url.into() }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Turns a non-2xx response into an error. 404 on id-addressed
    /// operations is distinguished so views can show an inline "not found"
    /// instead of a transport failure.
    async fn check(response: Response) -> Result<Response, TangochoError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(TangochoError::NotFound);
        }
        let body = response.text().await.unwrap_or_default();
        Err(TangochoError::Api {
            status: status.as_u16(),
            message: error_message(status.as_u16(), &body),
        })
    }

    /// `GET /words?search=&day=&user_id=`
    pub async fn list(
        &self,
        space: StudySpace,
        search: Option<&str>,
        day: Option<u32>,
    ) -> Result<Vec<WordEntry>, TangochoError> {
        let mut request = self
            .client
            .get(self.url("/words"))
            .query(&[("user_id", space.owner().to_string())]);
        if let Some(search) = search.filter(|s| !s.is_empty()) {
            request = request.query(&[("search", search)]);
        }
        if let Some(day) = day {
            request = request.query(&[("day", day.to_string())]);
        }
        let response = Self::check(request.send().await?).await?;
        Ok(response.json().await?)
    }

    /// `GET /words/:id`
    pub async fn word(&self, id: &str) -> Result<WordEntry, TangochoError> {
        let response = self.client.get(self.url(&format!("/words/{}", id))).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// `POST /words`
    pub async fn create(
        &self,
        space: StudySpace,
        mut draft: WordDraft,
    ) -> Result<WordEntry, TangochoError> {
        if space.is_personal() {
            draft.user_id = Some(space.owner());
        }
        let response = self.client.post(self.url("/words")).json(&draft).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// `PUT /words/:id`
    pub async fn update(&self, id: &str, patch: WordPatch) -> Result<WordEntry, TangochoError> {
        let response =
            self.client.put(self.url(&format!("/words/{}", id))).json(&patch).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// `DELETE /words/:id`: 204 on success.
    pub async fn delete(&self, id: &str) -> Result<(), TangochoError> {
        let response = self.client.delete(self.url(&format!("/words/{}", id))).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    /// `GET /days?user_id=`: all buckets with their word counts.
    pub async fn buckets(&self, space: StudySpace) -> Result<Vec<BucketSummary>, TangochoError> {
        let response = self
            .client
            .get(self.url("/days"))
            .query(&[("user_id", space.owner().to_string())])
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// `GET /days/:day/words?user_id=&_t=`: the `_t` timestamp busts any
    /// intermediary cache so a fresh bucket selection never replays stale
    /// contents.
    pub async fn bucket_words(
        &self,
        space: StudySpace,
        day: u32,
    ) -> Result<Vec<WordEntry>, TangochoError> {
        let cachebust = chrono::Utc::now().timestamp_millis().to_string();
        let response = self
            .client
            .get(self.url(&format!("/days/{}/words", day)))
            .query(&[("user_id", space.owner().to_string()), ("_t", cachebust)])
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// `GET /personal/summary`: word counts for the 10 personal spaces.
    pub async fn personal_summary(&self) -> Result<Vec<OwnerSpaceSummary>, TangochoError> {
        let response = self.client.get(self.url("/personal/summary")).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_prefers_detail_field() {
        let msg = error_message(422, r#"{"detail": "Word not found."}"#);
        assert_eq!(msg, "Word not found.");
    }

    #[test]
    fn error_message_falls_back_to_status() {
        assert_eq!(error_message(500, ""), "Error 500");
        assert_eq!(error_message(502, "<html>bad gateway</html>"), "Error 502");
        assert_eq!(error_message(400, r#"{"other": 1}"#), "Error 400");
    }

    #[test]
    fn base_url_trailing_slash_is_tolerated() {
        let store = WordStore::new("http://localhost:8000/");
        assert_eq!(store.url("/words"), "http://localhost:8000/words");
    }
}
