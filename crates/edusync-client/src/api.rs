//! REST implementation of [`LmsApi`].

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use tracing::instrument;

use edusync_core::context::SessionContext;
use edusync_core::error::ApiError;
use edusync_core::model::{
    Assessment, Course, Credentials, LoginResponse, RemoteResult, ResultSubmission,
};
use edusync_core::traits::LmsApi;

use crate::config::EdusyncConfig;
use crate::http::{bearer_headers, path_segment, HttpClient};

/// LMS REST API client.
#[derive(Debug, Clone)]
pub struct RestApi {
    http: HttpClient,
}

impl RestApi {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, ApiError> {
        Ok(Self {
            http: HttpClient::new(base_url, timeout_secs)?,
        })
    }

    pub fn from_config(config: &EdusyncConfig) -> Result<Self, ApiError> {
        Self::new(&config.base_url, config.timeout_secs)
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// Bearer headers when a token is present; endpoints that tolerate
    /// anonymous access are called without them.
    fn optional_auth(ctx: &SessionContext) -> Result<Option<HeaderMap>, ApiError> {
        ctx.token().map(bearer_headers).transpose()
    }
}

#[async_trait]
impl LmsApi for RestApi {
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        let body = serde_json::to_value(credentials).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.http
            .post("/Auth/login", Some(&body), None)
            .await?
            .json()
    }

    #[instrument(skip(self, ctx))]
    async fn get_assessment(
        &self,
        ctx: &SessionContext,
        assessment_id: &str,
    ) -> Result<Assessment, ApiError> {
        let headers = bearer_headers(ctx.require_token()?)?;
        let id = path_segment(assessment_id)?;
        self.http
            .get(&format!("/Assessments/{id}"), Some(headers))
            .await?
            .json()
    }

    #[instrument(skip(self, ctx))]
    async fn list_assessments(&self, ctx: &SessionContext) -> Result<Vec<Assessment>, ApiError> {
        self.http
            .get("/Assessments", Self::optional_auth(ctx)?)
            .await?
            .json()
    }

    #[instrument(skip(self, ctx))]
    async fn list_courses(&self, ctx: &SessionContext) -> Result<Vec<Course>, ApiError> {
        self.http
            .get("/Course", Self::optional_auth(ctx)?)
            .await?
            .json()
    }

    #[instrument(skip(self, ctx, result), fields(assessment = %result.assessment_id))]
    async fn submit_result(
        &self,
        ctx: &SessionContext,
        result: &ResultSubmission,
    ) -> Result<(), ApiError> {
        let headers = bearer_headers(ctx.require_token()?)?;
        let body = serde_json::to_value(result).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.http.post("/Results", Some(&body), Some(headers)).await?;
        Ok(())
    }

    #[instrument(skip(self, ctx))]
    async fn list_assessment_results(
        &self,
        ctx: &SessionContext,
        assessment_id: &str,
    ) -> Result<Vec<RemoteResult>, ApiError> {
        let id = path_segment(assessment_id)?;
        self.http
            .get(
                &format!("/Results/Assessment/{id}"),
                Self::optional_auth(ctx)?,
            )
            .await?
            .json()
    }
}
