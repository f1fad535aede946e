//! Assessment session scenarios against the mock API and a wiremock server.

use std::time::Duration;

use edusync_client::mock::MockApi;
use edusync_client::RestApi;
use edusync_core::context::SessionContext;
use edusync_core::error::{ApiError, SessionError};
use edusync_core::history::{JsonFileHistory, MemoryHistory};
use edusync_core::model::{Assessment, Question, Role, UserProfile};
use edusync_core::session::{AssessmentSession, SessionWarning};
use edusync_core::traits::ResultHistory;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn user() -> UserProfile {
    UserProfile {
        user_id: "student-1".into(),
        name: "Ada".into(),
        email: "ada@example.com".into(),
        role: Role::Student,
    }
}

fn ctx() -> SessionContext {
    SessionContext::authenticated("tok", Some(user()))
}

fn questions(n: usize) -> Vec<Question> {
    (0..n)
        .map(|i| Question {
            question_text: format!("Question {i}"),
            options: vec!["yes".into(), "no".into()],
            correct_answer: "yes".into(),
        })
        .collect()
}

fn json_assessment(id: &str, n: usize, max_score: u32) -> Assessment {
    Assessment {
        assessment_id: id.into(),
        title: format!("Assessment {id}"),
        max_score,
        question_payload: Some(serde_json::to_string(&questions(n)).unwrap()),
        course_id: Some("c1".into()),
    }
}

// --- Scoring scenarios ---

#[tokio::test]
async fn two_correct_answers_out_of_ten() {
    let api = MockApi::new().with_assessment(json_assessment("a1", 2, 10));
    let history = MemoryHistory::new();

    let mut session = AssessmentSession::load(&api, &ctx(), "a1").await.unwrap();
    session.answer(0, "yes");
    session.answer(1, "yes");

    let submission = session.submit(&api, &ctx(), &history).await.unwrap();
    assert_eq!(submission.score, 10);
    assert!(submission.result_submitted);
    assert!(submission.saved_locally);
    assert!(!submission.is_local_only());
    assert!(submission.warnings.is_empty());

    let posted = api.submitted();
    assert_eq!(posted.len(), 1);
    assert_eq!(posted[0].user_id.as_deref(), Some("student-1"));
    assert_eq!(posted[0].score, 10);
}

#[tokio::test]
async fn three_of_four_scores_75() {
    let api = MockApi::new().with_assessment(json_assessment("a1", 4, 100));
    let history = MemoryHistory::new();

    let mut session = AssessmentSession::load(&api, &ctx(), "a1").await.unwrap();
    session.answer(0, "yes");
    session.answer(1, "yes");
    session.answer(2, "yes");
    session.answer(3, "no");

    let submission = session.submit(&api, &ctx(), &history).await.unwrap();
    assert_eq!(submission.score, 75);
    assert_eq!(submission.correct, 3);
    assert_eq!(submission.total, 4);
    assert_eq!(submission.reviews.iter().filter(|r| !r.is_correct).count(), 1);
}

#[tokio::test]
async fn unanswered_questions_count_as_wrong() {
    let api = MockApi::new().with_assessment(json_assessment("a1", 3, 9));
    let history = MemoryHistory::new();

    let mut session = AssessmentSession::load(&api, &ctx(), "a1").await.unwrap();
    session.answer(1, "yes");

    let submission = session.submit(&api, &ctx(), &history).await.unwrap();
    assert_eq!(submission.score, 3);
}

// --- Single-shot submission ---

#[tokio::test]
async fn second_submit_has_no_effect() {
    let api = MockApi::new().with_assessment(json_assessment("a1", 2, 10));
    let history = MemoryHistory::new();

    let mut session = AssessmentSession::load(&api, &ctx(), "a1").await.unwrap();
    session.answer(0, "yes");
    let first_score = session.submit(&api, &ctx(), &history).await.unwrap().score;
    assert_eq!(first_score, 5);

    assert!(!session.answer(1, "yes"));
    assert_eq!(session.answers().get(1), None);

    let err = session.submit(&api, &ctx(), &history).await.unwrap_err();
    assert_eq!(err, SessionError::AlreadySubmitted);
    assert_eq!(session.submission().unwrap().score, first_score);
    assert_eq!(api.submit_calls(), 1);
    assert_eq!(history.entries().await.unwrap().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn time_taken_is_whole_seconds_from_load_to_submit() {
    let api = MockApi::new().with_assessment(json_assessment("a1", 2, 10));
    let history = MemoryHistory::new();

    let mut session = AssessmentSession::load(&api, &ctx(), "a1").await.unwrap();
    session.answer(0, "yes");
    tokio::time::advance(Duration::from_millis(3_700)).await;

    let submission = session.submit(&api, &ctx(), &history).await.unwrap();
    assert_eq!(submission.time_taken, 3);

    assert_eq!(api.submitted()[0].time_taken, 3);
    assert_eq!(history.entries().await.unwrap()[0].time_taken, 3);
}

#[tokio::test]
async fn zero_questions_cannot_be_submitted() {
    let mut assessment = json_assessment("empty", 0, 10);
    assessment.question_payload = None;
    let api = MockApi::new().with_assessment(assessment);
    let history = MemoryHistory::new();

    let mut session = AssessmentSession::load(&api, &ctx(), "empty").await.unwrap();
    assert!(!session.has_questions());

    let err = session.submit(&api, &ctx(), &history).await.unwrap_err();
    assert_eq!(err, SessionError::NoQuestions);
    assert!(!session.is_submitted());
    assert_eq!(api.submit_calls(), 0);
    assert!(history.entries().await.unwrap().is_empty());
}

// --- Remote failure and local fallback ---

#[tokio::test]
async fn remote_failure_keeps_local_result() {
    let dir = tempfile::tempdir().unwrap();
    let history = JsonFileHistory::new(dir.path().join("results.json"));
    let api = MockApi::new()
        .with_assessment(json_assessment("a1", 2, 10))
        .failing_submit(ApiError::PermissionDenied("instructors only".into()));

    let mut session = AssessmentSession::load(&api, &ctx(), "a1").await.unwrap();
    session.answer(0, "yes");
    let submission = session.submit(&api, &ctx(), &history).await.unwrap();

    assert!(!submission.result_submitted);
    assert!(submission.is_local_only());
    assert!(matches!(
        submission.warnings.as_slice(),
        [SessionWarning::SubmissionPartial(msg)] if msg.contains("instructors only")
    ));

    let entries = history.entries().await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].assessment_id, "a1");
    assert_eq!(entries[0].assessment_title, "Assessment a1");
    assert_eq!(entries[0].score, 5);
    assert_eq!(entries[0].max_score, 10);
    assert_eq!(entries[0].questions, 2);
    assert_eq!(entries[0].correct_answers, 1);
    assert_eq!(entries[0].user_id.as_deref(), Some("student-1"));
}

struct BrokenHistory;

#[async_trait::async_trait]
impl ResultHistory for BrokenHistory {
    async fn append(&self, _: &edusync_core::model::HistoryEntry) -> anyhow::Result<()> {
        anyhow::bail!("disk full")
    }

    async fn entries(&self) -> anyhow::Result<Vec<edusync_core::model::HistoryEntry>> {
        Ok(Vec::new())
    }
}

#[tokio::test]
async fn local_history_failure_still_posts_remotely() {
    let api = MockApi::new().with_assessment(json_assessment("a1", 1, 4));

    let mut session = AssessmentSession::load(&api, &ctx(), "a1").await.unwrap();
    session.answer(0, "yes");
    let submission = session.submit(&api, &ctx(), &BrokenHistory).await.unwrap();

    assert!(submission.result_submitted);
    assert!(!submission.saved_locally);
    assert!(matches!(
        submission.warnings.as_slice(),
        [SessionWarning::LocalHistoryFailed(msg)] if msg.contains("disk full")
    ));
}

// --- Load errors ---

#[tokio::test]
async fn missing_token_is_authentication_missing() {
    let api = MockApi::new().with_assessment(json_assessment("a1", 2, 10));
    let err = AssessmentSession::load(&api, &SessionContext::anonymous(), "a1")
        .await
        .unwrap_err();
    assert_eq!(err, SessionError::AuthenticationMissing);
}

#[tokio::test]
async fn load_errors_are_distinct() {
    let cases = [
        (
            ApiError::AuthenticationFailed("expired".into()),
            "AuthenticationFailed",
        ),
        (ApiError::PermissionDenied("no".into()), "PermissionDenied"),
        (ApiError::Timeout(30), "LoadFailed"),
    ];
    for (api_error, expected) in cases {
        let api = MockApi::new()
            .with_assessment(json_assessment("a1", 2, 10))
            .failing_load(api_error);
        let err = AssessmentSession::load(&api, &ctx(), "a1").await.unwrap_err();
        let actual = match err {
            SessionError::AuthenticationFailed(_) => "AuthenticationFailed",
            SessionError::PermissionDenied(_) => "PermissionDenied",
            SessionError::LoadFailed(_) => "LoadFailed",
            other => panic!("unexpected error: {other:?}"),
        };
        assert_eq!(actual, expected);
    }
}

#[tokio::test]
async fn unknown_assessment_is_load_failed() {
    let api = MockApi::new();
    let err = AssessmentSession::load(&api, &ctx(), "nope").await.unwrap_err();
    assert!(matches!(err, SessionError::LoadFailed(m) if m.contains("not found")));
}

// --- Over HTTP ---

#[tokio::test]
async fn text_payload_over_http_with_rejected_post() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/Assessments/a7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "assessmentId": "a7",
            "title": "Geography",
            "maxScore": 20,
            "question": "Q1: Capital of France?\nOptions: Paris, Rome\nAnswer: Paris\n\nQ2: Broken block\nAnswer: x\n\nQ3: Capital of Italy?\nOptions: Paris, Rome\nAnswer: Rome"
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/Results"))
        .and(body_partial_json(serde_json::json!({"assessmentId": "a7", "score": 10})))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(serde_json::json!({"title": "Forbidden"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let api = RestApi::new(&server.uri(), 5).unwrap();
    let history = MemoryHistory::new();

    let mut session = AssessmentSession::load(&api, &ctx(), "a7").await.unwrap();
    assert_eq!(session.questions().len(), 2);
    assert_eq!(session.questions()[1].question_text, "Capital of Italy?");

    session.answer(0, "Paris");
    session.answer(1, "Paris");
    let submission = session.submit(&api, &ctx(), &history).await.unwrap();

    assert_eq!(submission.score, 10);
    assert!(submission.is_local_only());
    assert_eq!(history.entries().await.unwrap().len(), 1);
}

#[tokio::test]
async fn forbidden_load_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Assessments/a1"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let api = RestApi::new(&server.uri(), 5).unwrap();
    let err = AssessmentSession::load(&api, &ctx(), "a1").await.unwrap_err();
    assert!(matches!(err, SessionError::PermissionDenied(_)));
}
