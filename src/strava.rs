use std::sync::Arc;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::{
    config::Config,
    error::StravaError,
    types::{
        activity::{Activity, ActivityDetail, Athlete},
        bounds::Tile,
        segment::{ExploreResponse, RawSegment, SegmentDetail},
    },
};

/// Calls against the fitness provider's API, scoped to one bearer credential.
#[async_trait]
pub trait StravaApi: Send + Sync {
    /// Owner of the credential this client was built with.
    async fn current_athlete(&self) -> Result<Athlete, StravaError>;

    /// Climbing segments (categories 1..=5, riding) inside `tile`.
    async fn explore_segments(&self, tile: &Tile) -> Result<Vec<RawSegment>, StravaError>;

    /// Activities started after `after` (epoch seconds), one page.
    async fn list_activities(
        &self,
        after: Option<i64>,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Activity>, StravaError>;

    async fn get_activity(&self, id: u64) -> Result<ActivityDetail, StravaError>;

    async fn get_segment(&self, id: u64) -> Result<SegmentDetail, StravaError>;
}

/// Builds a [`StravaApi`] for a caller's credential.
pub trait StravaConnector: Send + Sync {
    fn connect(&self, access_token: &str) -> Arc<dyn StravaApi>;
}

/// Shares one connection pool; every connection gets its own credential.
#[derive(Clone)]
pub struct HttpConnector {
    http: reqwest::Client,
    base_url: String,
}

impl HttpConnector {
    pub fn new(config: &Config) -> Result<Self, StravaError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("vamscout/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| StravaError::Transport(format!("Failed to build HTTP client: {}", err)))?;

        Ok(Self {
            http,
            base_url: config.strava_api_url.clone(),
        })
    }
}

impl StravaConnector for HttpConnector {
    fn connect(&self, access_token: &str) -> Arc<dyn StravaApi> {
        Arc::new(StravaClient::new(
            self.http.clone(),
            self.base_url.clone(),
            access_token,
        ))
    }
}

pub struct StravaClient {
    http: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl StravaClient {
    pub fn new(http: reqwest::Client, base_url: String, access_token: &str) -> Self {
        Self {
            http,
            base_url,
            access_token: access_token.to_string(),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, StravaError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.access_token)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_failure(status, body));
        }

        response
            .json::<T>()
            .await
            .map_err(|err| StravaError::Decode(err.to_string()))
    }
}

#[async_trait]
impl StravaApi for StravaClient {
    async fn current_athlete(&self) -> Result<Athlete, StravaError> {
        self.get_json("/athlete", &[]).await
    }

    async fn explore_segments(&self, tile: &Tile) -> Result<Vec<RawSegment>, StravaError> {
        let payload: ExploreResponse = self
            .get_json(
                "/segments/explore",
                &[
                    ("bounds", tile.to_query()),
                    ("activity_type", "riding".to_string()),
                    ("min_cat", "1".to_string()),
                    ("max_cat", "5".to_string()),
                ],
            )
            .await?;
        Ok(payload.segments)
    }

    async fn list_activities(
        &self,
        after: Option<i64>,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Activity>, StravaError> {
        let mut query = vec![
            ("page", page.to_string()),
            ("per_page", per_page.to_string()),
        ];
        if let Some(after) = after {
            query.push(("after", after.to_string()));
        }
        self.get_json("/athlete/activities", &query).await
    }

    async fn get_activity(&self, id: u64) -> Result<ActivityDetail, StravaError> {
        self.get_json(&format!("/activities/{}", id), &[]).await
    }

    async fn get_segment(&self, id: u64) -> Result<SegmentDetail, StravaError> {
        self.get_json(&format!("/segments/{}", id), &[]).await
    }
}

/// Maps a non-success response onto the error taxonomy.
pub fn classify_failure(status: StatusCode, body: String) -> StravaError {
    let lowered = body.to_lowercase();
    let invalid_token = lowered.contains("authorization error")
        || (lowered.contains("access_token") && lowered.contains("invalid"));

    if status == StatusCode::UNAUTHORIZED || invalid_token {
        StravaError::Unauthorized(format!("{} {}", status.as_u16(), body.trim()))
    } else if status == StatusCode::TOO_MANY_REQUESTS {
        StravaError::RateLimited
    } else {
        StravaError::Status {
            status: status.as_u16(),
            body,
        }
    }
}
