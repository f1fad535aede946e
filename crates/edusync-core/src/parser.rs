//! Question payload parser.
//!
//! An assessment carries its questions as a single string. Instructors author
//! it either as a JSON array of question objects or as delimited text:
//!
//! ```text
//! Q1: What is 2 + 2?
//! Options: 3, 4, 5
//! Answer: 4
//!
//! Q2: ...
//! ```
//!
//! Any syntactically valid JSON payload goes through the JSON path only;
//! everything else goes through the text path.

use std::collections::HashSet;

use crate::error::ParseError;
use crate::model::Question;

/// Which parser produced the questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadFormat {
    Json,
    Text,
    /// The payload was blank.
    Empty,
}

/// Result of parsing a question payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedPayload {
    pub questions: Vec<Question>,
    pub format: PayloadFormat,
    /// Text blocks discarded for missing a prompt, options or answer.
    pub dropped_blocks: usize,
    /// Set when a non-blank payload yielded no questions.
    pub error: Option<ParseError>,
}

/// Parse an assessment's question payload.
///
/// Never fails: a payload that cannot be parsed yields zero questions and a
/// `ParseError` describing why.
pub fn parse_questions(payload: &str) -> ParsedPayload {
    if payload.trim().is_empty() {
        return ParsedPayload {
            questions: Vec::new(),
            format: PayloadFormat::Empty,
            dropped_blocks: 0,
            error: None,
        };
    }

    match serde_json::from_str::<serde_json::Value>(payload) {
        Ok(value) => {
            let (questions, error) = match questions_from_json(value) {
                Ok(q) => (q, None),
                Err(e) => (Vec::new(), Some(e)),
            };
            ParsedPayload {
                questions,
                format: PayloadFormat::Json,
                dropped_blocks: 0,
                error,
            }
        }
        Err(_) => {
            let (questions, dropped_blocks) = parse_text_questions(payload);
            let error = questions
                .is_empty()
                .then_some(ParseError::NoWellFormedBlocks {
                    dropped: dropped_blocks,
                });
            ParsedPayload {
                questions,
                format: PayloadFormat::Text,
                dropped_blocks,
                error,
            }
        }
    }
}

fn questions_from_json(value: serde_json::Value) -> Result<Vec<Question>, ParseError> {
    if !value.is_array() {
        return Err(ParseError::NotAnArray);
    }
    serde_json::from_value(value).map_err(|e| ParseError::InvalidQuestion(e.to_string()))
}

/// Parse the delimited text format.
///
/// Returns the well-formed questions in order and the number of blocks that
/// were dropped.
pub fn parse_text_questions(payload: &str) -> (Vec<Question>, usize) {
    let normalized = payload.replace("\r\n", "\n");
    let mut questions = Vec::new();
    let mut dropped = 0;

    for block in normalized.split("\n\n").filter(|b| !b.trim().is_empty()) {
        match parse_block(block) {
            Some(q) => questions.push(q),
            None => dropped += 1,
        }
    }

    (questions, dropped)
}

fn parse_block(block: &str) -> Option<Question> {
    let lines: Vec<&str> = block
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    if lines.len() < 3 {
        return None;
    }

    let question_text = strip_question_marker(lines[0]);
    let options: Vec<String> = lines
        .iter()
        .find_map(|l| l.strip_prefix("Options:"))?
        .split(',')
        .map(|o| o.trim().to_string())
        .collect();
    let correct_answer = lines
        .iter()
        .find_map(|l| l.strip_prefix("Answer:"))?
        .trim();

    if question_text.is_empty() || correct_answer.is_empty() {
        return None;
    }

    Some(Question {
        question_text: question_text.to_string(),
        options,
        correct_answer: correct_answer.to_string(),
    })
}

/// Strip a leading `Q<digits>:` marker and the whitespace after it.
fn strip_question_marker(line: &str) -> &str {
    let Some(rest) = line.strip_prefix('Q') else {
        return line;
    };
    let digits = rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return line;
    }
    match rest[digits..].strip_prefix(':') {
        Some(text) => text.trim_start(),
        None => line,
    }
}

/// Render questions in the delimited text format.
pub fn format_text_questions(questions: &[Question]) -> String {
    questions
        .iter()
        .enumerate()
        .map(|(i, q)| {
            format!(
                "Q{}: {}\nOptions: {}\nAnswer: {}",
                i + 1,
                q.question_text,
                q.options.join(", "),
                q.correct_answer
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// A warning from question validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// Zero-based question index.
    pub index: usize,
    /// Warning message.
    pub message: String,
}

/// Check questions for authoring mistakes. Warnings never remove a question.
pub fn validate_questions(questions: &[Question]) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    for (index, q) in questions.iter().enumerate() {
        let mut warn = |message: String| warnings.push(ValidationWarning { index, message });

        if q.question_text.trim().is_empty() {
            warn("question text is empty".into());
        }
        if q.options.len() < 2 {
            warn(format!("only {} option(s)", q.options.len()));
        }

        let mut seen = HashSet::new();
        for option in &q.options {
            if !seen.insert(option.as_str()) {
                warn(format!("duplicate option: {option}"));
            }
        }

        if !q.options.iter().any(|o| o == &q.correct_answer) {
            warn(format!(
                "answer '{}' is not one of the options",
                q.correct_answer
            ));
        }
    }

    warnings
}
