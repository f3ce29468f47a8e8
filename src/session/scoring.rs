use chrono::NaiveDateTime;

use crate::models::domain::{Assessment, Submission};

/// Marks available in an assessment, split by question type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScoreSummary {
    pub total: u32,
    pub mcq: u32,
    pub text: u32,
}

impl ScoreSummary {
    pub fn for_assessment(assessment: &Assessment) -> Self {
        ScoreSummary {
            total: assessment.total_marks(),
            mcq: assessment.mcq_marks(),
            text: assessment.text_marks(),
        }
    }
}

/// Teacher-awarded marks for text answers, absent until both totals are known.
pub fn text_answer_marks(submission: &Submission) -> Option<u32> {
    let awarded = submission.marks_awarded?;
    let auto = submission.auto_graded_marks?;
    Some(awarded.saturating_sub(auto))
}

pub fn percentage(awarded: u32, total: u32) -> Option<u32> {
    if total == 0 {
        return None;
    }
    Some((f64::from(awarded) / f64::from(total) * 100.0).round() as u32)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeedbackVerdict {
    Correct,
    Incorrect,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionFeedback {
    pub question_id: String,
    pub given: String,
    pub correct_answer: String,
    pub verdict: FeedbackVerdict,
}

/// Everything the results page renders for a submitted attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultsView {
    pub summary: ScoreSummary,
    pub mcq_marks: Option<u32>,
    pub text_marks: Option<u32>,
    pub marks_awarded: Option<u32>,
    pub percentage: Option<u32>,
    pub grading_pending: bool,
    pub results_visible: bool,
    pub due_at: NaiveDateTime,
    pub feedback: Vec<QuestionFeedback>,
}

impl ResultsView {
    pub fn build(assessment: &Assessment, submission: &Submission, now: NaiveDateTime) -> Self {
        let summary = ScoreSummary::for_assessment(assessment);
        let results_visible = now > assessment.due_at() && submission.is_completed;

        let feedback = if results_visible {
            assessment
                .questions
                .iter()
                .filter(|q| q.is_multiple_choice())
                .filter_map(|q| {
                    let given = submission.answer_for(&q.id)?;
                    Some(QuestionFeedback {
                        question_id: q.id.clone(),
                        given: given.to_string(),
                        correct_answer: q.correct_answer.clone().unwrap_or_default(),
                        verdict: if q.is_correct(given) {
                            FeedbackVerdict::Correct
                        } else {
                            FeedbackVerdict::Incorrect
                        },
                    })
                })
                .collect()
        } else {
            Vec::new()
        };

        ResultsView {
            summary,
            mcq_marks: submission.auto_graded_marks,
            text_marks: text_answer_marks(submission),
            marks_awarded: submission.marks_awarded,
            percentage: submission
                .marks_awarded
                .and_then(|awarded| percentage(awarded, summary.total)),
            grading_pending: summary.text > 0 && submission.marks_awarded.is_none(),
            results_visible,
            due_at: assessment.due_at(),
            feedback,
        }
    }
}
