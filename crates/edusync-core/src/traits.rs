//! Core trait definitions for the LMS API and the local result history.
//!
//! `LmsApi` is implemented by `edusync-client`; `ResultHistory` is
//! implemented in [`crate::history`].

use async_trait::async_trait;

use crate::context::SessionContext;
use crate::error::ApiError;
use crate::model::{
    Assessment, Course, Credentials, HistoryEntry, LoginResponse, RemoteResult, ResultSubmission,
};

// ---------------------------------------------------------------------------
// LMS API trait
// ---------------------------------------------------------------------------

/// Typed access to the LMS REST API.
#[async_trait]
pub trait LmsApi: Send + Sync {
    /// `POST /Auth/login`.
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError>;

    /// `GET /Assessments/{id}`, authenticated.
    async fn get_assessment(
        &self,
        ctx: &SessionContext,
        assessment_id: &str,
    ) -> Result<Assessment, ApiError>;

    /// `GET /Assessments`.
    async fn list_assessments(&self, ctx: &SessionContext) -> Result<Vec<Assessment>, ApiError>;

    /// `GET /Course`.
    async fn list_courses(&self, ctx: &SessionContext) -> Result<Vec<Course>, ApiError>;

    /// `POST /Results`, authenticated.
    async fn submit_result(
        &self,
        ctx: &SessionContext,
        result: &ResultSubmission,
    ) -> Result<(), ApiError>;

    /// `GET /Results/Assessment/{id}`.
    async fn list_assessment_results(
        &self,
        ctx: &SessionContext,
        assessment_id: &str,
    ) -> Result<Vec<RemoteResult>, ApiError>;
}

// ---------------------------------------------------------------------------
// Result history trait
// ---------------------------------------------------------------------------

/// Durable, append-only list of past attempts.
#[async_trait]
pub trait ResultHistory: Send + Sync {
    /// Append one attempt.
    async fn append(&self, entry: &HistoryEntry) -> anyhow::Result<()>;

    /// All recorded attempts, oldest first.
    async fn entries(&self) -> anyhow::Result<Vec<HistoryEntry>>;
}
