//! Course/assessment catalog views.
//!
//! Fetches courses and assessments and joins them once, so callers get typed,
//! pre-grouped view models instead of re-joining the two lists themselves.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::context::SessionContext;
use crate::error::ApiError;
use crate::model::{Assessment, Course};
use crate::traits::LmsApi;

/// Title used for assessments whose course is unknown.
pub const UNASSIGNED_COURSE: &str = "Unassigned";

/// An assessment summary without its question payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentSummary {
    pub assessment_id: String,
    pub title: String,
    pub max_score: u32,
}

/// A course and the assessments that belong to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseAssessments {
    /// `None` for the unassigned group.
    pub course_id: Option<String>,
    pub course_title: String,
    pub assessments: Vec<AssessmentSummary>,
}

/// Group `assessments` under `courses`, keeping course order.
///
/// Courses without assessments are kept and a repeated course id is listed
/// once; assessments whose course is missing go to a trailing
/// [`UNASSIGNED_COURSE`] group.
pub fn join_course_assessments(
    courses: &[Course],
    assessments: &[Assessment],
) -> Vec<CourseAssessments> {
    let mut by_course: HashMap<&str, Vec<AssessmentSummary>> = HashMap::new();
    let mut unassigned = Vec::new();

    for a in assessments {
        let summary = AssessmentSummary {
            assessment_id: a.assessment_id.clone(),
            title: a.title.clone(),
            max_score: a.max_score,
        };
        match a.course_id.as_deref() {
            Some(id) if courses.iter().any(|c| c.course_id == id) => {
                by_course.entry(id).or_default().push(summary)
            }
            _ => unassigned.push(summary),
        }
    }

    let mut seen = HashSet::new();
    let mut views: Vec<CourseAssessments> = courses
        .iter()
        .filter(|c| seen.insert(c.course_id.as_str()))
        .map(|c| CourseAssessments {
            course_id: Some(c.course_id.clone()),
            course_title: c.title.clone(),
            assessments: by_course.remove(c.course_id.as_str()).unwrap_or_default(),
        })
        .collect();

    if !unassigned.is_empty() {
        views.push(CourseAssessments {
            course_id: None,
            course_title: UNASSIGNED_COURSE.to_string(),
            assessments: unassigned,
        });
    }

    views
}

/// Load the catalog, optionally restricted to one course.
pub async fn load_catalog(
    api: &dyn LmsApi,
    ctx: &SessionContext,
    course_filter: Option<&str>,
) -> Result<Vec<CourseAssessments>, ApiError> {
    let (courses, assessments) =
        tokio::try_join!(api.list_courses(ctx), api.list_assessments(ctx))?;
    tracing::debug!(
        courses = courses.len(),
        assessments = assessments.len(),
        "catalog fetched"
    );

    let mut views = join_course_assessments(&courses, &assessments);
    if let Some(filter) = course_filter {
        views.retain(|v| v.course_id.as_deref() == Some(filter));
    }
    Ok(views)
}
