use async_trait::async_trait;
use chrono::{DateTime, Utc};
use octocrab::Octocrab;
use serde::{Deserialize, Serialize};

use crate::error::{NudgeError, Result};
use crate::query;
use crate::source::NotificationSource;
use crate::types::{Notification, Reason};

const API_BASE: &str = "https://api.github.com";

pub struct GitHub {
    client: Octocrab,
    http: reqwest::Client,
    token: String,
}

impl std::fmt::Debug for GitHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHub").finish_non_exhaustive()
    }
}

impl From<octocrab::Error> for NudgeError {
    fn from(err: octocrab::Error) -> Self {
        NudgeError::Api(err.to_string())
    }
}

impl GitHub {
    pub fn new(token: String) -> Result<Self> {
        let client = Octocrab::builder()
            .personal_token(token.clone())
            .build()
            .map_err(|e| NudgeError::Auth(e.to_string()))?;

        Ok(Self {
            client,
            http: reqwest::Client::new(),
            token,
        })
    }

    fn thread_url(thread_id: &str) -> String {
        format!(
            "{}/notifications/threads/{}",
            API_BASE,
            urlencoding::encode(thread_id)
        )
    }

    async fn thread_request(&self, method: reqwest::Method, thread_id: &str) -> Result<()> {
        let response = self
            .http
            .request(method.clone(), Self::thread_url(thread_id))
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", "nudge")
            .send()
            .await?;

        // 205 Reset Content for PATCH, 204 No Content for DELETE, both without a body
        if !response.status().is_success() {
            let status = response.status();
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            tracing::warn!(%method, thread_id, %status, "thread request failed");
            return Err(NudgeError::Api(format!("{} {}: {}", method, status, text)));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct ListParams {
    all: bool,
    page: u32,
    per_page: usize,
}

#[derive(Debug, Deserialize)]
struct RawNotification {
    id: String,
    repository: RawRepository,
    subject: RawSubject,
    reason: String,
    unread: bool,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct RawRepository {
    full_name: String,
}

#[derive(Debug, Deserialize)]
struct RawSubject {
    title: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(rename = "type")]
    kind: String,
}

impl From<RawNotification> for Notification {
    fn from(raw: RawNotification) -> Self {
        Notification {
            url: raw.subject.url.as_deref().map(web_url).unwrap_or_default(),
            thread_id: raw.id.clone(),
            id: raw.id,
            title: raw.subject.title,
            subject_type: raw.subject.kind,
            repository: raw.repository.full_name,
            reason: Reason::new(raw.reason),
            unread: raw.unread,
            updated_at: raw.updated_at,
        }
    }
}

#[async_trait]
impl NotificationSource for GitHub {
    async fn fetch_page(
        &self,
        page: u32,
        per_page: usize,
        query: &str,
    ) -> Result<Vec<Notification>> {
        let params = ListParams {
            all: !query::unread_only(query),
            page,
            per_page,
        };
        tracing::debug!(page, per_page, all = params.all, "GET /notifications");

        let raw: Vec<RawNotification> = self.client.get("/notifications", Some(&params)).await?;
        Ok(raw.into_iter().map(Notification::from).collect())
    }

    async fn mark_read(&self, thread_id: &str) -> Result<()> {
        self.thread_request(reqwest::Method::PATCH, thread_id).await
    }

    async fn mark_done(&self, thread_id: &str) -> Result<()> {
        self.thread_request(reqwest::Method::DELETE, thread_id).await
    }
}

/// Turn an API subject URL (`https://api.github.com/repos/o/r/pulls/1`) into the
/// page a person would open. Unknown kinds fall back to the repository page.
pub fn web_url(api_url: &str) -> String {
    let Ok(parsed) = url::Url::parse(api_url) else {
        return String::new();
    };
    let parts: Vec<&str> = parsed
        .path_segments()
        .map(|segments| segments.collect())
        .unwrap_or_default();

    // repos / owner / repo / kind / id
    match parts.as_slice() {
        ["repos", owner, repo, kind, id, ..] => {
            let base = format!("https://github.com/{}/{}", owner, repo);
            match *kind {
                "issues" => format!("{}/issues/{}", base, id),
                "pulls" => format!("{}/pull/{}", base, id),
                "commits" => format!("{}/commit/{}", base, id),
                "discussions" => format!("{}/discussions/{}", base, id),
                "releases" => format!("{}/releases/tag/{}", base, id),
                _ => base,
            }
        }
        ["repos", owner, repo, ..] => format!("https://github.com/{}/{}", owner, repo),
        _ => String::new(),
    }
}
