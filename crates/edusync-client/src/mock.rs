//! Mock API for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use edusync_core::context::SessionContext;
use edusync_core::error::ApiError;
use edusync_core::model::{
    Assessment, Course, Credentials, LoginResponse, RemoteResult, ResultSubmission, UserProfile,
};
use edusync_core::traits::LmsApi;

/// An in-memory [`LmsApi`] for exercising the session handler without a server.
///
/// Requests that need a token fail with `AuthenticationMissing` when the
/// context has none, like the real client.
#[derive(Default)]
pub struct MockApi {
    assessments: HashMap<String, Assessment>,
    courses: Vec<Course>,
    user: Option<UserProfile>,
    /// Error returned by `get_assessment`, if set.
    load_error: Option<ApiError>,
    /// Error returned by `submit_result`, if set.
    submit_error: Option<ApiError>,
    submit_calls: AtomicU32,
    submitted: Mutex<Vec<ResultSubmission>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_assessment(mut self, assessment: Assessment) -> Self {
        self.assessments
            .insert(assessment.assessment_id.clone(), assessment);
        self
    }

    pub fn with_course(mut self, course: Course) -> Self {
        self.courses.push(course);
        self
    }

    pub fn with_user(mut self, user: UserProfile) -> Self {
        self.user = Some(user);
        self
    }

    pub fn failing_load(mut self, error: ApiError) -> Self {
        self.load_error = Some(error);
        self
    }

    pub fn failing_submit(mut self, error: ApiError) -> Self {
        self.submit_error = Some(error);
        self
    }

    /// Number of `submit_result` calls, including failed ones.
    pub fn submit_calls(&self) -> u32 {
        self.submit_calls.load(Ordering::Relaxed)
    }

    /// Results the mock accepted.
    pub fn submitted(&self) -> Vec<ResultSubmission> {
        self.submitted.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl LmsApi for MockApi {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        match &self.user {
            Some(user) if user.email == credentials.email => Ok(LoginResponse {
                token: format!("mock-token-{}", user.user_id),
                user: user.clone(),
            }),
            _ => Err(ApiError::AuthenticationFailed(
                "invalid email or password".into(),
            )),
        }
    }

    async fn get_assessment(
        &self,
        ctx: &SessionContext,
        assessment_id: &str,
    ) -> Result<Assessment, ApiError> {
        ctx.require_token()?;
        if let Some(err) = &self.load_error {
            return Err(err.clone());
        }
        self.assessments
            .get(assessment_id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("/Assessments/{assessment_id}")))
    }

    async fn list_assessments(&self, _ctx: &SessionContext) -> Result<Vec<Assessment>, ApiError> {
        let mut all: Vec<Assessment> = self.assessments.values().cloned().collect();
        all.sort_by(|a, b| a.assessment_id.cmp(&b.assessment_id));
        Ok(all)
    }

    async fn list_courses(&self, _ctx: &SessionContext) -> Result<Vec<Course>, ApiError> {
        Ok(self.courses.clone())
    }

    async fn submit_result(
        &self,
        ctx: &SessionContext,
        result: &ResultSubmission,
    ) -> Result<(), ApiError> {
        self.submit_calls.fetch_add(1, Ordering::Relaxed);
        ctx.require_token()?;
        if let Some(err) = &self.submit_error {
            return Err(err.clone());
        }
        self.submitted
            .lock()
            .map_err(|_| ApiError::Network("mock lock poisoned".into()))?
            .push(result.clone());
        Ok(())
    }

    async fn list_assessment_results(
        &self,
        _ctx: &SessionContext,
        assessment_id: &str,
    ) -> Result<Vec<RemoteResult>, ApiError> {
        Ok(self
            .submitted()
            .into_iter()
            .filter(|r| r.assessment_id == assessment_id)
            .map(|r| RemoteResult {
                result_id: None,
                assessment_id: r.assessment_id,
                user_id: r.user_id,
                score: r.score,
                attempt_date: Some(r.attempt_date.to_rfc3339()),
                time_taken: Some(r.time_taken),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edusync_core::model::Role;

    #[tokio::test]
    async fn login_matches_configured_user() {
        let api = MockApi::new().with_user(UserProfile {
            user_id: "u-1".into(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            role: Role::Student,
        });

        let ok = api
            .login(&Credentials {
                email: "ada@example.com".into(),
                password: "x".into(),
            })
            .await
            .unwrap();
        assert_eq!(ok.token, "mock-token-u-1");

        let err = api
            .login(&Credentials {
                email: "bob@example.com".into(),
                password: "x".into(),
            })
            .await
            .unwrap_err();
        assert!(err.is_auth());
    }

    #[tokio::test]
    async fn submitted_results_are_listed() {
        let api = MockApi::new();
        let ctx = SessionContext::authenticated("tok", None);
        api.submit_result(
            &ctx,
            &ResultSubmission {
                assessment_id: "a1".into(),
                user_id: None,
                score: 5,
                attempt_date: chrono::Utc::now(),
                time_taken: 3,
            },
        )
        .await
        .unwrap();

        assert_eq!(api.submit_calls(), 1);
        assert_eq!(api.list_assessment_results(&ctx, "a1").await.unwrap().len(), 1);
        assert!(api.list_assessment_results(&ctx, "a2").await.unwrap().is_empty());
    }
}
