//! Assessment session handler.
//!
//! Loads an assessment, tracks the user's answers, scores the attempt and
//! records the result: first in the local history, then on the server.
//! Submission is single-shot; afterwards the session is read-only.

use std::fmt;

use chrono::{DateTime, Utc};
use tokio::time::Instant;
use uuid::Uuid;

use crate::context::SessionContext;
use crate::error::{ParseError, SessionError};
use crate::model::{AnswerSet, Assessment, HistoryEntry, Question, ResultSubmission};
use crate::parser::{parse_questions, PayloadFormat};
use crate::scoring::{grade, QuestionReview};
use crate::traits::{LmsApi, ResultHistory};

/// Non-fatal conditions raised while loading or submitting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionWarning {
    /// The question payload could not be parsed; the session has no questions.
    ParseFailed(ParseError),
    /// The result was saved locally but the server rejected or never got it.
    SubmissionPartial(String),
    /// The local history could not be written.
    LocalHistoryFailed(String),
}

impl fmt::Display for SessionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionWarning::ParseFailed(e) => write!(f, "could not parse questions: {e}"),
            SessionWarning::SubmissionPartial(reason) => {
                write!(f, "result saved locally only: {reason}")
            }
            SessionWarning::LocalHistoryFailed(reason) => {
                write!(f, "result not saved locally: {reason}")
            }
        }
    }
}

/// The outcome of a submitted attempt.
#[derive(Debug, Clone)]
pub struct Submission {
    pub score: u32,
    pub max_score: u32,
    pub correct: usize,
    pub total: usize,
    /// Whole seconds from load to submit.
    pub time_taken: u64,
    pub attempt_date: DateTime<Utc>,
    /// `true` once the server accepted the result.
    pub result_submitted: bool,
    pub saved_locally: bool,
    pub reviews: Vec<QuestionReview>,
    pub warnings: Vec<SessionWarning>,
}

impl Submission {
    /// Saved in the local history but not on the server.
    pub fn is_local_only(&self) -> bool {
        self.saved_locally && !self.result_submitted
    }
}

/// One user's pass through an assessment.
#[derive(Debug)]
pub struct AssessmentSession {
    assessment: Assessment,
    questions: Vec<Question>,
    format: PayloadFormat,
    answers: AnswerSet,
    started_at: Instant,
    warnings: Vec<SessionWarning>,
    submission: Option<Submission>,
}

impl AssessmentSession {
    /// Fetch `assessment_id` and start an attempt.
    ///
    /// Fails with a distinct error for a missing token, a rejected token,
    /// a forbidden assessment, or any other load failure.
    #[tracing::instrument(skip(api, ctx))]
    pub async fn load(
        api: &dyn LmsApi,
        ctx: &SessionContext,
        assessment_id: &str,
    ) -> Result<Self, SessionError> {
        if !ctx.is_authenticated() {
            return Err(SessionError::AuthenticationMissing);
        }
        let assessment = api.get_assessment(ctx, assessment_id).await?;
        Ok(Self::start(assessment))
    }

    /// Start an attempt from an already fetched assessment.
    pub fn start(assessment: Assessment) -> Self {
        let parsed = parse_questions(assessment.payload());
        let mut warnings = Vec::new();
        if let Some(err) = parsed.error {
            tracing::warn!(
                assessment = %assessment.assessment_id,
                "question payload unusable: {err}"
            );
            warnings.push(SessionWarning::ParseFailed(err));
        } else if parsed.dropped_blocks > 0 {
            tracing::debug!(
                dropped = parsed.dropped_blocks,
                "malformed question blocks dropped"
            );
        }
        tracing::info!(
            assessment = %assessment.assessment_id,
            questions = parsed.questions.len(),
            "assessment loaded"
        );

        Self {
            assessment,
            questions: parsed.questions,
            format: parsed.format,
            answers: AnswerSet::new(),
            started_at: Instant::now(),
            warnings,
            submission: None,
        }
    }

    pub fn assessment(&self) -> &Assessment {
        &self.assessment
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn payload_format(&self) -> PayloadFormat {
        self.format
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    /// Warnings raised while loading.
    pub fn warnings(&self) -> &[SessionWarning] {
        &self.warnings
    }

    pub fn has_questions(&self) -> bool {
        !self.questions.is_empty()
    }

    pub fn is_submitted(&self) -> bool {
        self.submission.is_some()
    }

    pub fn submission(&self) -> Option<&Submission> {
        self.submission.as_ref()
    }

    /// Record `option` as the answer to question `index`.
    ///
    /// Returns `false` (and changes nothing) after submission or when `index`
    /// is out of range.
    pub fn answer(&mut self, index: usize, option: impl Into<String>) -> bool {
        if self.is_submitted() || index >= self.questions.len() {
            return false;
        }
        self.answers.record(index, option);
        true
    }

    /// Score the attempt and record the result.
    ///
    /// The local history append always happens first; the remote post is a
    /// single best-effort attempt whose failure is reported as
    /// [`SessionWarning::SubmissionPartial`].
    #[tracing::instrument(skip_all, fields(assessment = %self.assessment.assessment_id))]
    pub async fn submit(
        &mut self,
        api: &dyn LmsApi,
        ctx: &SessionContext,
        history: &dyn ResultHistory,
    ) -> Result<&Submission, SessionError> {
        if self.is_submitted() {
            return Err(SessionError::AlreadySubmitted);
        }
        if self.questions.is_empty() {
            return Err(SessionError::NoQuestions);
        }

        let graded = grade(&self.questions, &self.answers);
        let max_score = self.assessment.max_score;
        let score = graded.score(max_score);
        let time_taken = self.started_at.elapsed().as_secs();
        let attempt_date = Utc::now();
        let user_id = ctx.user_id().map(str::to_string);

        let mut submission = Submission {
            score,
            max_score,
            correct: graded.correct,
            total: graded.total,
            time_taken,
            attempt_date,
            result_submitted: false,
            saved_locally: false,
            reviews: graded.reviews,
            warnings: Vec::new(),
        };

        let entry = HistoryEntry {
            id: Uuid::new_v4(),
            assessment_id: self.assessment.assessment_id.clone(),
            assessment_title: self.assessment.title.clone(),
            user_id: user_id.clone(),
            score,
            max_score,
            time_taken,
            attempt_date,
            questions: submission.total,
            correct_answers: submission.correct,
        };
        match history.append(&entry).await {
            Ok(()) => submission.saved_locally = true,
            Err(e) => {
                tracing::warn!("failed to save result locally: {e:#}");
                submission
                    .warnings
                    .push(SessionWarning::LocalHistoryFailed(format!("{e:#}")));
            }
        }

        let remote = ResultSubmission {
            assessment_id: self.assessment.assessment_id.clone(),
            user_id,
            score,
            attempt_date,
            time_taken,
        };
        match api.submit_result(ctx, &remote).await {
            Ok(()) => submission.result_submitted = true,
            Err(e) => {
                tracing::warn!("failed to submit result: {e}");
                submission
                    .warnings
                    .push(SessionWarning::SubmissionPartial(e.to_string()));
            }
        }

        tracing::info!(
            score,
            max_score,
            correct = submission.correct,
            total = submission.total,
            result_submitted = submission.result_submitted,
            "attempt submitted"
        );

        Ok(&*self.submission.insert(submission))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assessment(payload: &str) -> Assessment {
        Assessment {
            assessment_id: "a1".into(),
            title: "Arithmetic".into(),
            max_score: 10,
            question_payload: Some(payload.into()),
            course_id: None,
        }
    }

    #[test]
    fn start_parses_text_payload() {
        let session =
            AssessmentSession::start(assessment("Q1: 1+1?\nOptions: 1, 2\nAnswer: 2"));
        assert_eq!(session.questions().len(), 1);
        assert_eq!(session.payload_format(), PayloadFormat::Text);
        assert!(session.warnings().is_empty());
        assert!(!session.is_submitted());
    }

    #[test]
    fn unparseable_payload_gives_zero_questions_and_a_warning() {
        let session = AssessmentSession::start(assessment(r#"{"not":"an array"}"#));
        assert!(!session.has_questions());
        assert_eq!(
            session.warnings(),
            &[SessionWarning::ParseFailed(ParseError::NotAnArray)]
        );
    }

    #[test]
    fn answers_overwrite_and_ignore_out_of_range() {
        let mut session =
            AssessmentSession::start(assessment("Q1: 1+1?\nOptions: 1, 2\nAnswer: 2"));
        assert!(session.answer(0, "1"));
        assert!(session.answer(0, "2"));
        assert!(!session.answer(3, "2"));
        assert_eq!(session.answers().get(0), Some("2"));
        assert_eq!(session.answers().len(), 1);
    }

    #[test]
    fn warning_display() {
        let w = SessionWarning::SubmissionPartial("HTTP 403".into());
        assert!(w.to_string().contains("saved locally only"));
    }
}
