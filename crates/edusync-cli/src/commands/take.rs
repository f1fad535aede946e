//! The `edusync take` command.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};

use edusync_client::session_store::resolve_context;
use edusync_core::history::JsonFileHistory;
use edusync_core::model::Question;
use edusync_core::session::{AssessmentSession, SessionWarning};

pub async fn execute(
    config_path: Option<PathBuf>,
    assessment_id: String,
    answers: Option<String>,
) -> Result<()> {
    let (config, api) = super::client(config_path)?;
    let ctx = resolve_context(&config)?;

    let mut session = AssessmentSession::load(&api, &ctx, &assessment_id).await?;
    let assessment = session.assessment();
    println!(
        "{} ({} question(s), max score {})",
        assessment.title,
        session.questions().len(),
        assessment.max_score
    );
    for warning in session.warnings() {
        eprintln!("WARNING: {warning}");
    }

    if !session.has_questions() {
        println!("No questions found for this assessment. Please contact your instructor.");
        return Ok(());
    }

    let picks = match answers {
        Some(list) => parse_answer_list(&list, session.questions())?,
        None => {
            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            prompt_answers(session.questions(), stdin.lock(), stdout.lock())?
        }
    };
    for (index, option) in picks {
        session.answer(index, option);
    }

    if session.answers().is_empty() {
        println!("No answers recorded; nothing submitted.");
        return Ok(());
    }

    let history = JsonFileHistory::new(config.history_path());
    let submission = session.submit(&api, &ctx, &history).await?;

    println!();
    println!(
        "You scored {} / {}",
        submission.score, submission.max_score
    );
    println!(
        "Correct answers: {} / {}",
        submission.correct, submission.total
    );
    println!("Time taken: {} seconds", submission.time_taken);

    for warning in &submission.warnings {
        match warning {
            SessionWarning::SubmissionPartial(reason) => {
                println!("Result saved locally only (server submission failed: {reason})")
            }
            other => eprintln!("WARNING: {other}"),
        }
    }
    if submission.result_submitted {
        println!("Result submitted.");
    }

    for review in submission.reviews.iter().filter(|r| !r.is_correct) {
        println!(
            "Q{}: your answer: {}, correct answer: {}",
            review.index + 1,
            review.selected.as_deref().unwrap_or("(none)"),
            review.correct_answer
        );
    }

    Ok(())
}

/// Parse `--answers "1,3,,2"`: one entry per question, 1-based option numbers.
fn parse_answer_list(list: &str, questions: &[Question]) -> Result<Vec<(usize, String)>> {
    let mut picks = Vec::new();
    for (index, entry) in list.split(',').enumerate() {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        let Some(question) = questions.get(index) else {
            anyhow::bail!(
                "{} answers given but the assessment has {} question(s)",
                list.split(',').count(),
                questions.len()
            );
        };
        let number: usize = entry
            .parse()
            .with_context(|| format!("answer for Q{} is not an option number: {entry}", index + 1))?;
        let option = number
            .checked_sub(1)
            .and_then(|i| question.options.get(i))
            .with_context(|| {
                format!(
                    "answer for Q{} must be between 1 and {}",
                    index + 1,
                    question.options.len()
                )
            })?;
        picks.push((index, option.clone()));
    }
    Ok(picks)
}

/// Ask each question on `output` and read the choice from `input`.
///
/// Accepts an option number or the option text; a blank line skips the
/// question and end of input stops asking.
fn prompt_answers(
    questions: &[Question],
    mut input: impl BufRead,
    mut output: impl Write,
) -> Result<Vec<(usize, String)>> {
    let mut picks = Vec::new();

    for (index, q) in questions.iter().enumerate() {
        writeln!(output, "\nQ{}. {}", index + 1, q.question_text)?;
        for (i, option) in q.options.iter().enumerate() {
            writeln!(output, "  {}) {}", i + 1, option)?;
        }
        write!(output, "Your answer (blank to skip): ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        let choice = line.trim();
        if choice.is_empty() {
            continue;
        }

        let picked = choice
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| q.options.get(i))
            .or_else(|| q.options.iter().find(|o| o.as_str() == choice));
        match picked {
            Some(option) => picks.push((index, option.clone())),
            None => writeln!(output, "Not an option, skipped.")?,
        }
    }

    Ok(picks)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn questions() -> Vec<Question> {
        vec![
            Question {
                question_text: "2 + 2?".into(),
                options: vec!["3".into(), "4".into()],
                correct_answer: "4".into(),
            },
            Question {
                question_text: "Capital of France?".into(),
                options: vec!["Paris".into(), "Rome".into(), "Oslo".into()],
                correct_answer: "Paris".into(),
            },
            Question {
                question_text: "Skip me".into(),
                options: vec!["a".into(), "b".into()],
                correct_answer: "a".into(),
            },
        ]
    }

    #[test]
    fn answer_list_by_number() {
        let picks = parse_answer_list("2,1,", &questions()).unwrap();
        assert_eq!(picks, vec![(0, "4".to_string()), (1, "Paris".to_string())]);
    }

    #[test]
    fn answer_list_rejects_bad_entries() {
        assert!(parse_answer_list("5", &questions()).is_err());
        assert!(parse_answer_list("0", &questions()).is_err());
        assert!(parse_answer_list("x", &questions()).is_err());
        assert!(parse_answer_list("1,1,1,1", &questions()).is_err());
    }

    #[test]
    fn prompt_accepts_numbers_and_text() {
        let input = b"2\nRome\n\n" as &[u8];
        let mut output = Vec::new();
        let picks = prompt_answers(&questions(), input, &mut output).unwrap();
        assert_eq!(picks, vec![(0, "4".to_string()), (1, "Rome".to_string())]);

        let shown = String::from_utf8(output).unwrap();
        assert!(shown.contains("Q2. Capital of France?"));
        assert!(shown.contains("  3) Oslo"));
    }

    #[test]
    fn prompt_stops_at_end_of_input() {
        let input = b"1\n" as &[u8];
        let picks = prompt_answers(&questions(), input, Vec::<u8>::new()).unwrap();
        assert_eq!(picks, vec![(0, "3".to_string())]);
    }

    #[test]
    fn prompt_skips_unknown_choice() {
        let input = b"9\nOslo\n" as &[u8];
        let mut output = Vec::new();
        let picks = prompt_answers(&questions(), input, &mut output).unwrap();
        assert_eq!(picks, vec![(1, "Oslo".to_string())]);
        assert!(String::from_utf8(output).unwrap().contains("Not an option"));
    }
}
