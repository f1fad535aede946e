//! Attempt grading and score computation.
//!
//! score = round(correct / total × max_score), with answers compared to the
//! correct answer by exact string equality.

use crate::model::{AnswerSet, Question};

/// Compute the score for `correct` right answers out of `total` questions.
///
/// Returns 0 when there are no questions. Halves round away from zero.
pub fn compute_score(correct: usize, total: usize, max_score: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    let ratio = correct.min(total) as f64 / total as f64;
    (ratio * max_score as f64).round() as u32
}

/// How one question was answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionReview {
    pub index: usize,
    pub question_text: String,
    pub selected: Option<String>,
    pub correct_answer: String,
    pub is_correct: bool,
}

/// Outcome of grading an answer set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grade {
    pub correct: usize,
    pub total: usize,
    pub reviews: Vec<QuestionReview>,
}

impl Grade {
    pub fn score(&self, max_score: u32) -> u32 {
        compute_score(self.correct, self.total, max_score)
    }

    /// Reviews of the questions that were missed or left unanswered.
    pub fn missed(&self) -> impl Iterator<Item = &QuestionReview> {
        self.reviews.iter().filter(|r| !r.is_correct)
    }
}

/// Grade `answers` against `questions`.
pub fn grade(questions: &[Question], answers: &AnswerSet) -> Grade {
    let reviews: Vec<QuestionReview> = questions
        .iter()
        .enumerate()
        .map(|(index, q)| {
            let selected = answers.get(index);
            QuestionReview {
                index,
                question_text: q.question_text.clone(),
                selected: selected.map(str::to_string),
                correct_answer: q.correct_answer.clone(),
                is_correct: selected == Some(q.correct_answer.as_str()),
            }
        })
        .collect();

    Grade {
        correct: reviews.iter().filter(|r| r.is_correct).count(),
        total: questions.len(),
        reviews,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn questions(n: usize) -> Vec<Question> {
        (0..n)
            .map(|i| Question {
                question_text: format!("Q{i}"),
                options: vec!["right".into(), "wrong".into()],
                correct_answer: "right".into(),
            })
            .collect()
    }

    #[test]
    fn three_of_four_out_of_100() {
        assert_eq!(compute_score(3, 4, 100), 75);
    }

    #[test]
    fn rounding() {
        assert_eq!(compute_score(1, 3, 10), 3); // 3.33
        assert_eq!(compute_score(2, 3, 10), 7); // 6.67
        assert_eq!(compute_score(1, 2, 5), 3); // 2.5
        assert_eq!(compute_score(0, 4, 100), 0);
        assert_eq!(compute_score(4, 4, 100), 100);
    }

    #[test]
    fn zero_questions_scores_zero() {
        assert_eq!(compute_score(0, 0, 100), 0);
    }

    #[test]
    fn score_matches_formula_across_range() {
        for total in 1..=12usize {
            for correct in 0..=total {
                for max in [1u32, 7, 10, 100, 250] {
                    let expected =
                        ((correct as f64 / total as f64) * max as f64).round() as u32;
                    assert_eq!(compute_score(correct, total, max), expected);
                }
            }
        }
    }

    #[test]
    fn grade_uses_exact_match() {
        let qs = questions(4);
        let mut answers = AnswerSet::new();
        answers.record(0, "right");
        answers.record(1, "Right");
        answers.record(2, "right ");
        let g = grade(&qs, &answers);
        assert_eq!(g.correct, 1);
        assert_eq!(g.total, 4);
        assert_eq!(g.missed().count(), 3);
        assert_eq!(g.reviews[3].selected, None);
        assert_eq!(g.score(100), 25);
    }

    #[test]
    fn answers_beyond_question_list_are_ignored() {
        let qs = questions(2);
        let mut answers = AnswerSet::new();
        answers.record(0, "right");
        answers.record(5, "right");
        let g = grade(&qs, &answers);
        assert_eq!(g.correct, 1);
        assert_eq!(g.score(10), 5);
    }
}
